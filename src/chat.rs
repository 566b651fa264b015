//! 聊天关键词注册表 - 把一句话映射到一个界面命令

/// 聊天消息能触发的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatIntent {
    AddTask,
    CompleteTask,
    DeleteTask,
    Refresh,
    ShowToday,
    Help,
    Unknown,
}

/// 关键词定义
#[derive(Debug, Clone)]
pub struct KeywordDef {
    pub intent: ChatIntent,
    /// 小写关键词，消息中包含任意一个即命中
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

/// 没有关键词命中时的默认回复
pub const DEFAULT_REPLY: &str =
    "I'm your task assistant! Try \"add task\", \"complete\", \"delete\", \"refresh\", \"today\" or \"help\".";

/// 关键词注册表，按注册顺序匹配，先命中者优先
pub struct ChatRegistry {
    entries: Vec<KeywordDef>,
}

impl ChatRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
        };
        registry.register_default_keywords();
        registry
    }

    fn register_default_keywords(&mut self) {
        self.register(KeywordDef {
            intent: ChatIntent::AddTask,
            keywords: &["add task", "new task", "添加任务", "新任务"],
            description: "Open the add-task form",
        });

        self.register(KeywordDef {
            intent: ChatIntent::CompleteTask,
            keywords: &["complete", "mark done", "finish", "完成任务", "标记完成"],
            description: "Complete the selected task",
        });

        self.register(KeywordDef {
            intent: ChatIntent::DeleteTask,
            keywords: &["delete", "remove", "删除任务"],
            description: "Delete the selected task",
        });

        self.register(KeywordDef {
            intent: ChatIntent::Refresh,
            keywords: &["refresh", "reload", "刷新", "更新"],
            description: "Reload the task list",
        });

        self.register(KeywordDef {
            intent: ChatIntent::ShowToday,
            keywords: &["today", "今日"],
            description: "Show today's tasks",
        });

        self.register(KeywordDef {
            intent: ChatIntent::Help,
            keywords: &["help", "帮助"],
            description: "Show help",
        });
    }

    fn register(&mut self, def: KeywordDef) {
        self.entries.push(def);
    }

    /// 匹配一条消息。空白消息返回 None，调用方直接忽略
    pub fn dispatch(&self, message: &str) -> Option<ChatIntent> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let lower = message.to_lowercase();
        let intent = self
            .entries
            .iter()
            .find(|def| def.keywords.iter().any(|kw| lower.contains(kw)))
            .map(|def| def.intent)
            .unwrap_or(ChatIntent::Unknown);
        Some(intent)
    }

    /// 获取所有关键词定义（帮助界面使用）
    pub fn entries(&self) -> &[KeywordDef] {
        &self.entries
    }
}

impl Default for ChatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("add task", ChatIntent::AddTask)]
    #[case("Please ADD TASK for tomorrow", ChatIntent::AddTask)]
    #[case("我要添加任务", ChatIntent::AddTask)]
    #[case("新任务", ChatIntent::AddTask)]
    #[case("mark done", ChatIntent::CompleteTask)]
    #[case("I finished it, complete please", ChatIntent::CompleteTask)]
    #[case("标记完成", ChatIntent::CompleteTask)]
    #[case("remove this one", ChatIntent::DeleteTask)]
    #[case("删除任务", ChatIntent::DeleteTask)]
    #[case("Reload", ChatIntent::Refresh)]
    #[case("更新一下", ChatIntent::Refresh)]
    #[case("what's on today?", ChatIntent::ShowToday)]
    #[case("今日任务", ChatIntent::ShowToday)]
    #[case("help", ChatIntent::Help)]
    #[case("帮助", ChatIntent::Help)]
    #[case("hello there", ChatIntent::Unknown)]
    fn test_dispatch(#[case] message: &str, #[case] expected: ChatIntent) {
        let registry = ChatRegistry::new();
        assert_eq!(registry.dispatch(message), Some(expected));
    }

    #[test]
    fn test_first_registered_keyword_wins() {
        let registry = ChatRegistry::new();
        // 同时包含 "add task" 和 "today"
        assert_eq!(
            registry.dispatch("add task for today"),
            Some(ChatIntent::AddTask)
        );
    }

    #[test]
    fn test_blank_message_is_ignored() {
        let registry = ChatRegistry::new();
        assert_eq!(registry.dispatch(""), None);
        assert_eq!(registry.dispatch("   \t"), None);
    }

    #[test]
    fn test_every_intent_is_reachable() {
        let registry = ChatRegistry::new();
        for def in registry.entries() {
            assert!(!def.keywords.is_empty());
            assert_eq!(registry.dispatch(def.keywords[0]), Some(def.intent));
        }
    }
}
