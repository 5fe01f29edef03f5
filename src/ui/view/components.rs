//! 通用 UI 组件
//!
//! 对话框、输入框、表单行等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::editor::FormRow;
use crate::models::FieldKind;

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str, color: Color) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 带有标题和样式的输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    active_color: Color,
) {
    let style = if is_focused {
        Style::default()
            .fg(active_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let input = Paragraph::new(value)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);
}

/// 列表里只占一行，换行显示为 ↵
pub fn single_line(value: &str) -> String {
    value.replace('\n', " ↵ ")
}

/// 字段标签，标记项带 `*`
pub fn field_label(label: &str, marked: bool) -> String {
    if marked {
        format!("{} *", label)
    } else {
        label.to_string()
    }
}

/// [组件] 表单字段列表，每行 "标签: 值"
pub fn render_form_rows(frame: &mut Frame, area: Rect, rows: &[FormRow]) {
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let label = format!("{:<14}", field_label(row.label, row.marked));
            let value = if row.disabled {
                "(不可用)".to_string()
            } else if row.focused && row.kind != FieldKind::Flag {
                format!("{}▏", single_line(&row.value))
            } else {
                single_line(&row.value)
            };

            let style = if row.focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if row.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let hint = if row.kind == FieldKind::Month && row.focused {
                "  (YYYY-MM)"
            } else {
                ""
            };

            ListItem::new(Line::from(vec![
                Span::styled(label, if row.focused { style } else { style.fg(Color::Cyan) }),
                Span::styled(value, style),
                Span::styled(hint, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(rows.iter().position(|r| r.focused));

    frame.render_stateful_widget(List::new(items), area, &mut state);
}
