//! 分区编辑器
//!
//! 每个列表分区（工作/教育/项目/证书）一个实例，最多持有一份草稿。
//! 编辑器从不直接修改列表，而是返回替换后的整个列表，由调用方合并回简历。

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{FieldKind, FieldSpec, SectionItem, generate_id, parse_month};

/// 保存草稿时的校验错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("请填写所有必填项: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{label} 格式应为 YYYY-MM，当前为 \"{value}\"")]
    InvalidMonth { label: &'static str, value: String },
    #[error("当前没有正在编辑的条目")]
    NotEditing,
}

/// 正在编辑的草稿
#[derive(Debug, Clone)]
pub struct Draft<T> {
    pub item: T,
    pub is_new: bool,
    pub focus: usize,
}

/// 表单中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct FormRow {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub marked: bool,
    pub disabled: bool,
    pub focused: bool,
}

/// 通用列表编辑器
#[derive(Debug, Clone)]
pub struct SectionEditor<T: SectionItem> {
    draft: Option<Draft<T>>,
}

impl<T: SectionItem> Default for SectionEditor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SectionItem> SectionEditor<T> {
    pub fn new() -> Self {
        Self { draft: None }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.draft.as_ref().map(|d| d.item.id())
    }

    /// 新建条目草稿，返回生成的 ID
    pub fn add(&mut self, items: &[T]) -> String {
        let id = generate_id(items.iter().map(|item| item.id()));
        debug!(section = T::NOUN, id = %id, "start add");
        self.draft = Some(Draft {
            item: T::with_id(id.clone()),
            is_new: true,
            focus: 0,
        });
        id
    }

    /// 载入已有条目到草稿
    pub fn edit(&mut self, items: &[T], id: &str) -> bool {
        match items.iter().find(|item| item.id() == id) {
            Some(item) => {
                self.draft = Some(Draft {
                    item: item.clone(),
                    is_new: false,
                    focus: 0,
                });
                true
            }
            None => false,
        }
    }

    /// 校验并提交草稿，成功时返回替换后的列表
    pub fn save(&mut self, items: &[T]) -> Result<Vec<T>, ValidationError> {
        let draft = self.draft.as_ref().ok_or(ValidationError::NotEditing)?;
        if let Err(err) = validate(&draft.item) {
            warn!(section = T::NOUN, error = %err, "validation failed");
            return Err(err);
        }

        let mut item = draft.item.clone();
        item.normalize();

        let mut updated = items.to_vec();
        match updated.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => *slot = item,
            None => updated.push(item),
        }

        self.draft = None;
        Ok(updated)
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// 删除条目（调用方负责确认），返回替换后的列表
    pub fn delete(&mut self, items: &[T], id: &str) -> Vec<T> {
        if self.editing_id() == Some(id) {
            self.draft = None;
        }
        items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect()
    }

    // ============ 表单操作 ============

    fn focused_spec(&self) -> Option<&'static FieldSpec<T::Field>> {
        self.draft.as_ref().and_then(|d| T::FIELDS.get(d.focus))
    }

    pub fn focus_next(&mut self) {
        self.step_focus(true);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(false);
    }

    fn step_focus(&mut self, forward: bool) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let len = T::FIELDS.len();
        let mut focus = draft.focus;
        // 跳过不可编辑字段，最多绕一圈
        for _ in 0..len {
            focus = if forward {
                (focus + 1) % len
            } else {
                (focus + len - 1) % len
            };
            if !draft.item.is_disabled(T::FIELDS[focus].field) {
                break;
            }
        }
        draft.focus = focus;
    }

    pub fn input(&mut self, c: char) {
        let Some(spec) = self.focused_spec() else {
            return;
        };
        // 勾选项只响应空格
        if spec.kind == FieldKind::Flag {
            if c == ' ' {
                self.toggle();
            }
            return;
        }
        // 只有多行字段接受换行
        if c == '\n' && spec.kind != FieldKind::Multiline {
            return;
        }
        if let Some(draft) = self.draft.as_mut()
            && !draft.item.is_disabled(spec.field)
            && let Some(text) = draft.item.text_mut(spec.field)
        {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let Some(spec) = self.focused_spec() else {
            return;
        };
        if let Some(draft) = self.draft.as_mut()
            && !draft.item.is_disabled(spec.field)
            && let Some(text) = draft.item.text_mut(spec.field)
        {
            text.pop();
        }
    }

    pub fn toggle(&mut self) {
        let Some(spec) = self.focused_spec() else {
            return;
        };
        if let Some(flag) = self
            .draft
            .as_mut()
            .and_then(|draft| draft.item.flag_mut(spec.field))
        {
            *flag = !*flag;
        }
    }

    /// 用于渲染的表单行
    pub fn form_rows(&self) -> Vec<FormRow> {
        let Some(draft) = self.draft.as_ref() else {
            return Vec::new();
        };
        T::FIELDS
            .iter()
            .enumerate()
            .map(|(i, spec)| FormRow {
                label: spec.label,
                value: draft.item.display_value(spec.field),
                kind: spec.kind,
                marked: spec.marked,
                disabled: draft.item.is_disabled(spec.field),
                focused: i == draft.focus,
            })
            .collect()
    }
}

/// 与条目类型无关的草稿表单操作，供 TUI 使用
pub trait DraftForm {
    fn is_editing(&self) -> bool;
    fn is_new(&self) -> bool;
    fn rows(&self) -> Vec<FormRow>;
    fn focus_next(&mut self);
    fn focus_prev(&mut self);
    fn input(&mut self, c: char);
    fn backspace(&mut self);
    fn cancel(&mut self);
}

impl<T: SectionItem> DraftForm for SectionEditor<T> {
    fn is_editing(&self) -> bool {
        SectionEditor::is_editing(self)
    }

    fn is_new(&self) -> bool {
        self.draft.as_ref().is_some_and(|d| d.is_new)
    }

    fn rows(&self) -> Vec<FormRow> {
        self.form_rows()
    }

    fn focus_next(&mut self) {
        SectionEditor::focus_next(self);
    }

    fn focus_prev(&mut self) {
        SectionEditor::focus_prev(self);
    }

    fn input(&mut self, c: char) {
        SectionEditor::input(self, c);
    }

    fn backspace(&mut self) {
        SectionEditor::backspace(self);
    }

    fn cancel(&mut self) {
        SectionEditor::cancel(self);
    }
}

/// 必填项非空，月份字段格式正确
pub fn validate<T: SectionItem>(item: &T) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = T::FIELDS
        .iter()
        .filter(|spec| spec.required)
        .filter(|spec| item.text(spec.field).is_some_and(|v| v.trim().is_empty()))
        .map(|spec| spec.label)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    for spec in T::FIELDS.iter().filter(|s| s.kind == FieldKind::Month) {
        if item.is_disabled(spec.field) {
            continue;
        }
        if let Some(value) = item.text(spec.field)
            && !value.trim().is_empty()
            && parse_month(value).is_none()
        {
            return Err(ValidationError::InvalidMonth {
                label: spec.label,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Certification, Education, Experience, ExperienceField, Project};

    fn filled_experience(editor: &mut SectionEditor<Experience>, items: &[Experience]) {
        editor.add(items);
        for c in "Engineer".chars() {
            editor.input(c);
        }
        editor.focus_next();
        for c in "Acme".chars() {
            editor.input(c);
        }
        editor.focus_next(); // 地点
        editor.focus_next(); // 开始日期
        for c in "2020-01".chars() {
            editor.input(c);
        }
    }

    /// 依次填写所有必填项，月份字段填合法值
    fn fill_required<T: SectionItem>(editor: &mut SectionEditor<T>) {
        for spec in T::FIELDS {
            if spec.required {
                let value = if spec.kind == FieldKind::Month {
                    "2020-01"
                } else {
                    "x"
                };
                for c in value.chars() {
                    editor.input(c);
                }
            }
            editor.focus_next();
        }
    }

    fn add_cancel_then_add_save<T: SectionItem>() {
        let existing = vec![T::with_id("keep".to_string())];
        let mut editor = SectionEditor::<T>::new();

        editor.add(&existing);
        fill_required(&mut editor);
        editor.cancel();
        assert!(!editor.is_editing());

        let kept = editor.add(&existing);
        fill_required(&mut editor);
        let saved = editor.save(&existing).unwrap();

        let ids: Vec<&str> = saved.iter().map(|item| item.id()).collect();
        assert_eq!(ids, vec!["keep", kept.as_str()], "{}", T::NOUN);
    }

    fn delete_exactly_one<T: SectionItem + PartialEq>() {
        let items: Vec<T> = ["a", "b", "c"]
            .iter()
            .map(|id| T::with_id(id.to_string()))
            .collect();
        let mut editor = SectionEditor::<T>::new();

        assert!(editor.edit(&items, "b"));
        let updated = editor.delete(&items, "b");
        assert_eq!(updated, vec![items[0].clone(), items[2].clone()]);
        assert!(!editor.is_editing());

        assert_eq!(editor.delete(&updated, "missing"), updated);
    }

    #[test]
    fn test_add_then_cancel_leaves_list() {
        add_cancel_then_add_save::<Experience>();
        add_cancel_then_add_save::<Education>();
        add_cancel_then_add_save::<Project>();
        add_cancel_then_add_save::<Certification>();
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        delete_exactly_one::<Experience>();
        delete_exactly_one::<Education>();
        delete_exactly_one::<Project>();
        delete_exactly_one::<Certification>();
    }

    #[test]
    fn test_save_without_draft() {
        let mut editor: SectionEditor<Certification> = SectionEditor::new();
        editor.add(&[]);
        editor.cancel();
        assert_eq!(editor.save(&[]), Err(ValidationError::NotEditing));
    }

    #[test]
    fn test_newline_only_in_multiline_fields() {
        let mut editor: SectionEditor<Experience> = SectionEditor::new();
        editor.add(&[]);
        editor.input('a');
        editor.input('\n');

        // 移到工作描述
        while editor.draft.as_ref().unwrap().focus != 6 {
            editor.focus_next();
        }
        for c in "one\ntwo".chars() {
            editor.input(c);
        }

        let item = &editor.draft.as_ref().unwrap().item;
        assert_eq!(item.title, "a");
        assert_eq!(item.description, "one\ntwo");
    }

    #[test]
    fn test_save_with_missing_required_keeps_editing() {
        let items = vec![Experience::with_id("a".to_string())];
        let mut editor = SectionEditor::new();
        editor.add(&items);
        editor.input('X');

        let err = editor.save(&items).unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["公司", "开始日期"]));
        assert!(editor.is_editing());
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut editor: SectionEditor<Project> = SectionEditor::new();
        editor.add(&[]);
        editor.input(' ');
        assert!(matches!(
            editor.save(&[]),
            Err(ValidationError::MissingFields(fields)) if fields.len() == 3
        ));
    }

    #[test]
    fn test_save_new_appends() {
        let mut editor = SectionEditor::new();
        filled_experience(&mut editor, &[]);
        editor.focus_next(); // 结束日期
        editor.focus_next(); // 目前在职
        editor.input(' ');

        let updated = editor.save(&[]).unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].title, "Engineer");
        assert_eq!(updated[0].company, "Acme");
        assert_eq!(updated[0].start_date, "2020-01");
        assert!(updated[0].current);
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_invalid_month_rejected() {
        let mut editor: SectionEditor<Education> = SectionEditor::new();
        editor.add(&[]);
        for c in "BSc".chars() {
            editor.input(c);
        }
        editor.focus_next();
        for c in "MIT".chars() {
            editor.input(c);
        }
        editor.focus_next();
        editor.focus_next();
        for c in "soon".chars() {
            editor.input(c);
        }
        assert!(matches!(
            editor.save(&[]),
            Err(ValidationError::InvalidMonth { label: "开始日期", .. })
        ));
    }

    #[test]
    fn test_edit_a_does_not_touch_b() {
        let a = Experience {
            id: "a".to_string(),
            title: "A".to_string(),
            company: "Acme".to_string(),
            start_date: "2019-02".to_string(),
            ..Experience::default()
        };
        let b = Experience {
            id: "b".to_string(),
            title: "B".to_string(),
            company: "Beta".to_string(),
            start_date: "2018-03".to_string(),
            ..Experience::default()
        };
        let items = vec![a, b.clone()];

        let mut editor = SectionEditor::new();
        assert!(editor.edit(&items, "a"));
        editor.input('!');
        let updated = editor.save(&items).unwrap();

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].title, "A!");
        assert_eq!(updated[1], b);
    }

    #[test]
    fn test_edit_unknown_id() {
        let mut editor: SectionEditor<Experience> = SectionEditor::new();
        assert!(!editor.edit(&[], "missing"));
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_current_clears_end_date_on_save() {
        let items = vec![Experience {
            id: "a".to_string(),
            title: "A".to_string(),
            company: "Acme".to_string(),
            start_date: "2019-02".to_string(),
            end_date: "2020-02".to_string(),
            ..Experience::default()
        }];
        let mut editor = SectionEditor::new();
        editor.edit(&items, "a");
        while editor.draft.as_ref().unwrap().focus != 5 {
            editor.focus_next();
        }
        editor.toggle();
        let updated = editor.save(&items).unwrap();
        assert!(updated[0].current);
        assert!(updated[0].end_date.is_empty());
    }

    #[test]
    fn test_focus_skips_disabled_end_date() {
        let mut editor: SectionEditor<Experience> = SectionEditor::new();
        editor.add(&[]);
        // 先勾选在职
        while editor.draft.as_ref().unwrap().focus != 5 {
            editor.focus_next();
        }
        editor.toggle();
        editor.focus_prev();
        assert_eq!(editor.draft.as_ref().unwrap().focus, 3);

        let rows = editor.form_rows();
        let end = rows
            .iter()
            .position(|r| r.label == "结束日期")
            .unwrap();
        assert!(rows[end].disabled);
        assert_eq!(
            Experience::FIELDS[end].field,
            ExperienceField::EndDate
        );
    }
}
