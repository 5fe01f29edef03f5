//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use tracing::{debug, error, info};

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, EditorSlot, Section, Tab};
use crate::export::ExportError;
use crate::export::print::send_to_printer;
use crate::models::{
    Certification, Education, Experience, FieldKind, PersonalField, PersonalInfo, Project, SectionItem,
    SectionUpdate,
};
use crate::preview;

/// 打印时每行字符数
const PRINT_WIDTH: usize = 80;

/// 作用于某个列表分区的操作
#[derive(Debug, Clone, PartialEq)]
enum SectionOp {
    Add,
    Edit(String),
    Save,
    Delete(String),
}

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> bool {
        debug!(?action, mode = ?self.mode, "dispatch");
        match action {
            Action::Quit => return true,
            Action::NextTab => self.switch_tab(self.tab.next()),
            Action::PrevTab => self.switch_tab(self.tab.prev()),
            Action::SelectTab(index) => {
                if let Some(tab) = Tab::from_index(index) {
                    self.switch_tab(tab);
                }
            }
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::StartAdd => self.start_add(),
            Action::StartEdit => self.start_edit(),
            Action::StartDelete => self.start_delete(),
            Action::Export => self.export_pdf(),
            Action::Print => self.print(),

            Action::NextField => {
                if let AppMode::EditingItem(section) = self.mode {
                    self.editors.form_mut(section).focus_next();
                }
            }
            Action::PrevField => {
                if let AppMode::EditingItem(section) = self.mode {
                    self.editors.form_mut(section).focus_prev();
                }
            }

            Action::Cancel => self.cancel(),

            Action::Submit => match &self.mode {
                AppMode::EditingField(field) => {
                    let field = *field;
                    self.confirm_edit_field(field);
                }
                AppMode::EditingItem(section) => {
                    let section = *section;
                    self.run(section, SectionOp::Save);
                }
                AppMode::Confirm(_) => self.execute_confirm(),
                AppMode::Normal => {}
            },

            Action::Input(c) => match self.mode {
                AppMode::EditingField(_) => self.input_buffer.push(c),
                AppMode::EditingItem(section) => self.editors.form_mut(section).input(c),
                _ => {}
            },

            Action::NewLine => match self.mode {
                AppMode::EditingField(field) => {
                    let multiline = PersonalInfo::field_spec(field)
                        .is_some_and(|spec| spec.kind == FieldKind::Multiline);
                    if multiline {
                        self.input_buffer.push('\n');
                    }
                }
                AppMode::EditingItem(section) => self.editors.form_mut(section).input('\n'),
                _ => {}
            },

            Action::DeleteChar => match self.mode {
                AppMode::EditingField(_) => {
                    self.input_buffer.pop();
                }
                AppMode::EditingItem(section) => self.editors.form_mut(section).backspace(),
                _ => {}
            },

            Action::DismissAlert => self.alert = None,
        }
        false
    }

    // ============ 导航相关 ============

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selected_index = 0;
        self.preview_scroll = 0;
        self.message = None;
    }

    /// 向上移动选择
    pub fn move_up(&mut self) {
        match self.tab {
            Tab::Personal => self.personal_index = self.personal_index.saturating_sub(1),
            Tab::Preview => self.preview_scroll = self.preview_scroll.saturating_sub(1),
            _ => self.selected_index = self.selected_index.saturating_sub(1),
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        match self.tab {
            Tab::Personal => {
                if self.personal_index + 1 < PersonalInfo::FIELDS.len() {
                    self.personal_index += 1;
                }
            }
            Tab::Preview => {
                if self.preview_scroll < self.max_preview_scroll() {
                    self.preview_scroll += 1;
                }
            }
            _ => {
                let len = self.tab.section().map_or(0, |s| self.section_len(s));
                if self.selected_index + 1 < len {
                    self.selected_index += 1;
                }
            }
        }
    }

    /// 预览最多滚动到最后一行
    fn max_preview_scroll(&self) -> u16 {
        let rows = preview::build(&self.resume).map_or(0, |doc| doc.row_count());
        u16::try_from(rows.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    // ============ 列表分区 ============

    /// 开始添加条目
    pub fn start_add(&mut self) {
        if let Some(section) = self.tab.section() {
            self.run(section, SectionOp::Add);
        }
    }

    /// 开始编辑（个人信息字段或列表条目）
    pub fn start_edit(&mut self) {
        match self.tab.section() {
            Some(section) => {
                if let Some(id) = self.selected_item_id() {
                    self.run(section, SectionOp::Edit(id));
                }
            }
            None if self.tab == Tab::Personal => {
                let field = self.selected_personal_field();
                self.input_buffer = self.resume.personal_info.text(field).to_string();
                self.mode = AppMode::EditingField(field);
            }
            None => {}
        }
    }

    /// 开始删除条目（需确认）
    pub fn start_delete(&mut self) {
        if let (Some(section), Some(id)) = (self.tab.section(), self.selected_item_id()) {
            self.mode = AppMode::Confirm(ConfirmAction::Delete(section, id));
        }
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self) {
        if let AppMode::Confirm(ConfirmAction::Delete(section, id)) = &self.mode {
            let (section, id) = (*section, id.clone());
            self.mode = AppMode::Normal;
            self.run(section, SectionOp::Delete(id));
        }
    }

    fn run(&mut self, section: Section, op: SectionOp) {
        match section {
            Section::Experience => self.run_in::<Experience>(section, op),
            Section::Education => self.run_in::<Education>(section, op),
            Section::Projects => self.run_in::<Project>(section, op),
            Section::Certifications => self.run_in::<Certification>(section, op),
        }
    }

    /// 编辑器返回整个替换列表，这里合并回文档
    fn run_in<T: EditorSlot>(&mut self, section: Section, op: SectionOp) {
        let items = T::section(&self.resume);
        let editor = T::editor(&mut self.editors);

        match op {
            SectionOp::Add => {
                editor.add(items);
                self.mode = AppMode::EditingItem(section);
                self.message = None;
            }
            SectionOp::Edit(id) => {
                if editor.edit(items, &id) {
                    self.mode = AppMode::EditingItem(section);
                    self.message = None;
                }
            }
            SectionOp::Save => match editor.save(items) {
                Ok(updated) => {
                    self.resume = self.resume.merge(T::into_update(updated));
                    self.mode = AppMode::Normal;
                    self.message = Some(format!("{}已保存", T::NOUN));
                }
                Err(err) => self.alert = Some(err.to_string()),
            },
            SectionOp::Delete(id) => {
                let updated = editor.delete(items, &id);
                self.resume = self.resume.merge(T::into_update(updated));
                self.clamp_selection();
                self.message = Some(format!("已删除{}", T::NOUN));
                info!(section = T::NOUN, id = %id, "item deleted");
            }
        }
    }

    // ============ 个人信息 ============

    /// 确认编辑字段
    pub fn confirm_edit_field(&mut self, field: PersonalField) {
        let value = std::mem::take(&mut self.input_buffer);
        let info = self.resume.personal_info.with_field(field, value);
        self.resume = self.resume.merge(SectionUpdate::PersonalInfo(info));
        self.mode = AppMode::Normal;
        self.message = Some("个人信息已更新".to_string());
    }

    // ============ 导出/打印 ============

    /// 导出 PDF；失败只记录一次日志并给出通用提示
    pub fn export_pdf(&mut self) {
        if self.tab != Tab::Preview {
            return;
        }
        match self.exporter.export(&self.resume) {
            Ok(path) => self.message = Some(format!("已导出到 {}", path.display())),
            Err(ExportError::Empty) => self.message = Some("暂无内容可导出".to_string()),
            Err(err) => {
                error!(error = %err, "pdf export failed");
                self.alert = Some("导出 PDF 失败，请重试".to_string());
            }
        }
    }

    /// 发送到打印命令
    pub fn print(&mut self) {
        if self.tab != Tab::Preview {
            return;
        }
        let Some(doc) = preview::build(&self.resume) else {
            self.message = Some("暂无内容可打印".to_string());
            return;
        };
        match send_to_printer(&doc.to_plain_text(PRINT_WIDTH), &self.print_command) {
            Ok(()) => self.message = Some("已发送到打印机".to_string()),
            Err(err) => {
                error!(error = %err, "print failed");
                self.alert = Some("打印失败，请检查打印命令配置".to_string());
            }
        }
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        if let AppMode::EditingItem(section) = self.mode {
            self.editors.form_mut(section).cancel();
        }
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
        self.message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::ResumeData;

    fn app() -> App {
        let mut config = Config::default();
        config.print.command = vec!["cat".to_string()];
        App::new(ResumeData::default(), &config)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    fn add_experience(app: &mut App, title: &str) {
        app.switch_tab(Tab::Experience);
        app.dispatch(Action::StartAdd);
        type_str(app, title);
        app.dispatch(Action::NextField);
        type_str(app, "Acme");
        app.dispatch(Action::NextField);
        app.dispatch(Action::NextField);
        type_str(app, "2020-01");
        app.dispatch(Action::Submit);
    }

    #[test]
    fn test_add_and_save_experience() {
        let mut app = app();
        add_experience(&mut app, "Engineer");

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.alert.is_none());
        assert_eq!(app.resume.experience.len(), 1);
        assert_eq!(app.resume.experience[0].title, "Engineer");
    }

    #[test]
    fn test_add_then_cancel() {
        let mut app = app();
        app.switch_tab(Tab::Education);
        app.dispatch(Action::StartAdd);
        type_str(&mut app, "BSc");
        app.dispatch(Action::Cancel);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.resume.education.is_empty());
        assert!(!app.editors.education.is_editing());
    }

    #[test]
    fn test_validation_alert_keeps_editing() {
        let mut app = app();
        app.switch_tab(Tab::Certifications);
        app.dispatch(Action::StartAdd);
        app.dispatch(Action::Submit);

        assert!(app.alert.is_some());
        assert_eq!(app.mode, AppMode::EditingItem(Section::Certifications));
        assert!(app.resume.certifications.is_empty());

        app.dispatch(Action::DismissAlert);
        assert!(app.alert.is_none());
        assert!(app.editors.certifications.is_editing());
    }

    #[test]
    fn test_delete_requires_confirm() {
        let mut app = app();
        add_experience(&mut app, "First");
        add_experience(&mut app, "Second");
        assert_eq!(app.resume.experience.len(), 2);

        app.dispatch(Action::StartDelete);
        assert!(matches!(app.mode, AppMode::Confirm(_)));
        app.dispatch(Action::Cancel);
        assert_eq!(app.resume.experience.len(), 2);

        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::StartDelete);
        app.dispatch(Action::Submit);
        assert_eq!(app.resume.experience.len(), 1);
        assert_eq!(app.resume.experience[0].title, "First");
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_edit_personal_field() {
        let mut app = app();
        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::StartEdit);
        assert_eq!(app.mode, AppMode::EditingField(PersonalField::LastName));

        type_str(&mut app, "Doe");
        app.dispatch(Action::DeleteChar);
        app.dispatch(Action::Submit);
        assert_eq!(app.resume.personal_info.last_name, "Do");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_tab_navigation() {
        let mut app = app();
        app.dispatch(Action::PrevTab);
        assert_eq!(app.tab, Tab::Preview);
        app.dispatch(Action::NextTab);
        assert_eq!(app.tab, Tab::Personal);
        app.dispatch(Action::SelectTab(3));
        assert_eq!(app.tab, Tab::Projects);
    }

    #[test]
    fn test_export_empty_and_print() {
        let mut app = app();
        app.switch_tab(Tab::Preview);
        app.dispatch(Action::Export);
        assert!(app.alert.is_none());
        assert_eq!(app.message.as_deref(), Some("暂无内容可导出"));

        app.resume.personal_info.first_name = "Ada".to_string();
        app.dispatch(Action::Print);
        assert!(app.alert.is_none());
        assert_eq!(app.message.as_deref(), Some("已发送到打印机"));
    }

    #[test]
    fn test_export_failure_shows_generic_alert() {
        let mut app = app();
        app.resume.personal_info.first_name = "Ada".to_string();
        let dir = tempfile::tempdir().unwrap();
        // 输出路径是一个已存在的文件，创建目录会失败
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let mut config = Config::default();
        config.export.output_dir = blocker;
        app.exporter = crate::export::Exporter::new(config.export);

        app.switch_tab(Tab::Preview);
        app.dispatch(Action::Export);
        assert_eq!(app.alert.as_deref(), Some("导出 PDF 失败，请重试"));
        assert_eq!(app.resume.personal_info.first_name, "Ada");
    }

    #[test]
    fn test_preview_scroll_is_bounded() {
        let mut app = app();
        app.switch_tab(Tab::Preview);
        for _ in 0..10 {
            app.dispatch(Action::MoveSelectionDown);
        }
        assert_eq!(app.preview_scroll, 0);

        app.resume.personal_info.first_name = "Ada".to_string();
        app.resume.personal_info.email = "ada@example.com".to_string();
        let rows = preview::build(&app.resume).unwrap().row_count();
        for _ in 0..100 {
            app.dispatch(Action::MoveSelectionDown);
        }
        assert_eq!(usize::from(app.preview_scroll), rows - 1);

        app.dispatch(Action::MoveSelectionUp);
        assert_eq!(usize::from(app.preview_scroll), rows - 2);
    }

    #[test]
    fn test_newline_in_multiline_fields() {
        let mut app = app();
        // 名字是单行字段
        app.dispatch(Action::StartEdit);
        type_str(&mut app, "Ada");
        app.dispatch(Action::NewLine);
        app.dispatch(Action::Submit);
        assert_eq!(app.resume.personal_info.first_name, "Ada");

        app.personal_index = PersonalInfo::FIELDS.len() - 1;
        app.dispatch(Action::StartEdit);
        assert_eq!(app.mode, AppMode::EditingField(PersonalField::Summary));
        type_str(&mut app, "one");
        app.dispatch(Action::NewLine);
        type_str(&mut app, "two");
        app.dispatch(Action::Submit);
        assert_eq!(app.resume.personal_info.summary, "one\ntwo");

        app.switch_tab(Tab::Projects);
        app.dispatch(Action::StartAdd);
        type_str(&mut app, "Site");
        app.dispatch(Action::NewLine);
        app.dispatch(Action::NextField);
        type_str(&mut app, "a");
        app.dispatch(Action::NewLine);
        type_str(&mut app, "b");
        app.dispatch(Action::NextField);
        type_str(&mut app, "Rust");
        app.dispatch(Action::Submit);
        assert!(app.alert.is_none());
        assert_eq!(app.resume.projects[0].name, "Site");
        assert_eq!(app.resume.projects[0].description, "a\nb");
    }
}
