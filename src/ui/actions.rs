//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    SelectTab(usize),
    MoveSelectionUp,
    MoveSelectionDown,

    // 触发特定功能
    StartAdd,
    StartEdit,
    StartDelete,
    Export,
    Print,

    // 表单/通用交互
    NextField,
    PrevField,
    Cancel,      // Esc / n
    Submit,      // Enter / y
    Input(char), // 输入字符
    NewLine,     // Alt+Enter
    DeleteChar,  // Backspace
    DismissAlert,
}
