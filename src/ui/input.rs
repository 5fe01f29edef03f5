//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, alert_open: bool, key: KeyEvent) -> Option<Action> {
    // 提示框打开时只接受关闭
    if alert_open {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => Some(Action::DismissAlert),
            _ => None,
        };
    }

    match mode {
        AppMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::NextTab),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevTab),
            KeyCode::Char(c @ '1'..='6') => Some(Action::SelectTab(c as usize - '1' as usize)),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('a') => Some(Action::StartAdd),
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::StartEdit),
            KeyCode::Char('d') => Some(Action::StartDelete),
            KeyCode::Char('x') => Some(Action::Export),
            KeyCode::Char('p') => Some(Action::Print),
            _ => None,
        },
        AppMode::EditingField(_) => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => Some(Action::NewLine),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::EditingItem(_) => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => Some(Action::NewLine),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Confirm(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 处理按键事件，返回是否退出
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> io::Result<bool> {
    if let Some(action) = get_action(&app.mode, app.alert.is_some(), key) {
        Ok(app.dispatch(action))
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonalField;
    use crate::ui::state::{ConfirmAction, Section};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_keys() {
        let mode = AppMode::Normal;
        assert_eq!(get_action(&mode, false, press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            get_action(&mode, false, press(KeyCode::Char('3'))),
            Some(Action::SelectTab(2))
        );
        assert_eq!(get_action(&mode, false, press(KeyCode::Char('7'))), None);
        assert_eq!(get_action(&mode, false, press(KeyCode::Char('x'))), Some(Action::Export));
    }

    #[test]
    fn test_typing_in_forms() {
        let field = AppMode::EditingField(PersonalField::Email);
        assert_eq!(
            get_action(&field, false, press(KeyCode::Char('q'))),
            Some(Action::Input('q'))
        );

        let item = AppMode::EditingItem(Section::Projects);
        assert_eq!(get_action(&item, false, press(KeyCode::Tab)), Some(Action::NextField));
        assert_eq!(
            get_action(&item, false, press(KeyCode::Char(' '))),
            Some(Action::Input(' '))
        );
    }

    #[test]
    fn test_alert_blocks_other_keys() {
        let item = AppMode::EditingItem(Section::Experience);
        assert_eq!(get_action(&item, true, press(KeyCode::Char('a'))), None);
        assert_eq!(get_action(&item, true, press(KeyCode::Esc)), Some(Action::DismissAlert));
    }

    #[test]
    fn test_confirm_keys() {
        let mode = AppMode::Confirm(ConfirmAction::Delete(Section::Education, "x".to_string()));
        assert_eq!(get_action(&mode, false, press(KeyCode::Char('y'))), Some(Action::Submit));
        assert_eq!(get_action(&mode, false, press(KeyCode::Esc)), Some(Action::Cancel));
        assert_eq!(get_action(&mode, false, press(KeyCode::Char('d'))), None);
    }

    #[test]
    fn test_alt_enter_inserts_newline() {
        let alt_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT);
        let item = AppMode::EditingItem(Section::Projects);
        assert_eq!(get_action(&item, false, alt_enter), Some(Action::NewLine));
        assert_eq!(get_action(&item, false, press(KeyCode::Enter)), Some(Action::Submit));

        let field = AppMode::EditingField(PersonalField::Summary);
        assert_eq!(get_action(&field, false, alt_enter), Some(Action::NewLine));

        // 普通模式下 Alt+Enter 仍是编辑
        assert_eq!(get_action(&AppMode::Normal, false, alt_enter), Some(Action::StartEdit));
    }
}
