use crate::models::Priority;

/// 应用命令枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // ===== 退出 =====
    Quit,

    // ===== 任务导航 =====
    /// 选择上一个任务
    TaskUp,
    /// 选择下一个任务
    TaskDown,

    // ===== 任务操作 =====
    /// 创建新任务
    NewTask,
    /// 编辑当前任务
    EditTask,
    /// 完成当前任务
    CompleteTask,
    /// 删除当前任务（需确认）
    DeleteTask,
    /// 设置任务优先级
    SetPriority(Priority),

    // ===== 视图 =====
    /// 重新加载任务列表
    Refresh,
    /// 显示今日任务
    ShowToday,
    /// 进入聊天输入
    EnterChatMode,
    /// 显示帮助
    ShowHelp,
}
