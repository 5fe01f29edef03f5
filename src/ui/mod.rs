//! 终端界面
//!
//! 分层方式：
//! - state.rs: App 状态、标签页、各分区的表单编辑器
//! - actions.rs / input.rs: 按键按当前模式映射为 Action
//! - logic.rs: `App::dispatch` 处理 Action 并更新简历
//! - view/: 根据 App 绘制标签页、列表、预览和弹窗

pub mod actions;
pub mod input;
pub mod logic;
pub mod state;
pub mod view;

pub use input::handle_key_event;
pub use state::App;
pub use view::render;
