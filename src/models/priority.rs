use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Task priority, 0 (normal) to 3 (urgent).
///
/// Out-of-range values are rejected at construction, never clamped, so a
/// `Priority` that exists is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Priority(u8);

impl Priority {
    pub const NORMAL: Priority = Priority(0);
    pub const MEDIUM: Priority = Priority(1);
    pub const IMPORTANT: Priority = Priority(2);
    pub const URGENT: Priority = Priority(3);

    pub const MAX: u8 = 3;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Priority(value as u8))
        } else {
            Err(ValidationError::PriorityOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Normal",
            1 => "Medium",
            2 => "Important",
            _ => "Urgent",
        }
    }
}

impl TryFrom<i64> for Priority {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Priority::new(value)
    }
}

impl From<Priority> for i64 {
    fn from(p: Priority) -> Self {
        p.0 as i64
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(v) => Priority::new(v),
            // Label names are accepted too, for CLI input.
            Err(_) => match trimmed.to_ascii_lowercase().as_str() {
                "normal" => Ok(Priority::NORMAL),
                "medium" => Ok(Priority::MEDIUM),
                "important" => Ok(Priority::IMPORTANT),
                "urgent" => Ok(Priority::URGENT),
                _ => Err(ValidationError::InvalidPriority(trimmed.to_string())),
            },
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Normal")]
    #[case(1, "Medium")]
    #[case(2, "Important")]
    #[case(3, "Urgent")]
    fn test_valid_priorities(#[case] value: i64, #[case] label: &str) {
        let p = Priority::new(value).unwrap();
        assert_eq!(p.value() as i64, value);
        assert_eq!(p.label(), label);
    }

    #[rstest]
    #[case(-1)]
    #[case(4)]
    #[case(100)]
    fn test_out_of_range_is_rejected(#[case] value: i64) {
        assert_eq!(
            Priority::new(value),
            Err(ValidationError::PriorityOutOfRange(value))
        );
    }

    #[test]
    fn test_parse_from_label_or_number() {
        assert_eq!("urgent".parse::<Priority>(), Ok(Priority::URGENT));
        assert_eq!(" 2 ".parse::<Priority>(), Ok(Priority::IMPORTANT));
        assert!("high".parse::<Priority>().is_err());
        assert!("7".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priorities_order_by_urgency() {
        assert!(Priority::URGENT > Priority::IMPORTANT);
        assert!(Priority::MEDIUM > Priority::NORMAL);
    }
}
