//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use super::state::{App, AppMode, ConfirmAction, Section, Tab};
use crate::models::PersonalInfo;
use crate::preview::{self, LineStyle};
use components::{
    field_label, render_dialog_framework, render_form_rows, render_input_widget, single_line,
};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 标签页
            Constraint::Min(10),   // 内容
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    match app.tab {
        Tab::Personal => render_personal(frame, app, chunks[2]),
        Tab::Preview => render_preview(frame, app, chunks[2]),
        tab => {
            if let Some(section) = tab.section() {
                render_section(frame, app, section, chunks[2]);
            }
        }
    }
    render_help(frame, app, chunks[3]);

    // 渲染弹窗
    match &app.mode {
        AppMode::EditingField(field) => {
            let label = PersonalInfo::FIELDS
                .iter()
                .find(|spec| spec.field == *field)
                .map_or("", |spec| spec.label);
            render_edit_field_dialog(frame, app, label);
        }
        AppMode::EditingItem(section) => render_item_form(frame, app, *section),
        AppMode::Confirm(action) => render_confirm_dialog(frame, action),
        AppMode::Normal => {}
    }

    // 提示框始终在最上层
    if let Some(alert) = &app.alert {
        render_alert(frame, alert);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("📄 Vitae 简历编辑器")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
    frame.render_widget(tabs, area);
}

fn render_personal(frame: &mut Frame, app: &App, area: Rect) {
    let info = &app.resume.personal_info;
    let items: Vec<ListItem> = PersonalInfo::FIELDS
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let label = format!("{:<12}", field_label(spec.label, spec.marked));
            let value = info.text(spec.field);
            let style = if i == app.personal_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(label, style.fg(Color::Cyan)),
                Span::styled(single_line(value), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().title("个人信息").borders(Borders::ALL));
    let mut state = ListState::default();
    state.select(Some(app.personal_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_section(frame: &mut Frame, app: &App, section: Section, area: Rect) {
    let summaries = app.summaries(section);
    let block = Block::default()
        .title(section.noun())
        .borders(Borders::ALL);

    if summaries.is_empty() {
        let empty = Paragraph::new(format!("还没有{}，按 'a' 添加第一条", section.noun()))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = summaries
        .iter()
        .enumerate()
        .map(|(i, (_, summary))| {
            let selected = i == app.selected_index;
            let title_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            ListItem::new(vec![
                Line::from(Span::styled(summary.title.clone(), title_style)),
                Line::from(Span::styled(
                    format!("  {}", summary.subtitle),
                    Style::default().fg(Color::Green),
                )),
                Line::from(Span::styled(
                    format!("  {}", summary.detail),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn preview_style(style: LineStyle) -> Style {
    match style {
        LineStyle::Name => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        LineStyle::Heading => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineStyle::Title => Style::default().add_modifier(Modifier::BOLD),
        LineStyle::Subtitle | LineStyle::Contact => Style::default().fg(Color::Green),
        LineStyle::Date => Style::default().fg(Color::Gray),
        LineStyle::Body | LineStyle::Blank => Style::default(),
    }
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("简历预览").borders(Borders::ALL);

    let Some(doc) = preview::build(&app.resume) else {
        let empty = Paragraph::new("暂无可预览的内容\n\n请先在其他标签页填写信息")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let lines: Vec<Line> = doc
        .lines
        .iter()
        .flat_map(|line| {
            let text = match line.style {
                LineStyle::Name | LineStyle::Heading => line.text.to_uppercase(),
                _ => line.text.clone(),
            };
            // 多行描述按换行拆开
            text.split('\n')
                .map(|row| {
                    let rendered =
                        Line::from(Span::styled(row.to_string(), preview_style(line.style)));
                    if line.style.is_centered() {
                        rendered.alignment(Alignment::Center)
                    } else {
                        rendered
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.alert.is_some() {
        "[Enter/Esc] 关闭提示"
    } else {
        match &app.mode {
            AppMode::Normal => match app.tab {
                Tab::Personal => "[j/k] 选择字段  [e/Enter] 编辑  [1-6/Tab] 切换标签  [q] 退出",
                Tab::Preview => "[j/k] 滚动  [x] 导出 PDF  [p] 打印  [1-6/Tab] 切换标签  [q] 退出",
                _ => "[a] 添加  [e] 编辑  [d] 删除  [j/k] 导航  [1-6/Tab] 切换标签  [q] 退出",
            },
            AppMode::EditingField(_) => "[Enter] 保存  [Alt+Enter] 换行  [Esc] 取消",
            AppMode::EditingItem(_) => {
                "[Tab/↓] 下一项  [↑] 上一项  [Space] 勾选  [Alt+Enter] 换行  [Enter] 保存  [Esc] 取消"
            }
            AppMode::Confirm(_) => "[y] 确认  [n] 取消",
        }
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_edit_field_dialog(frame: &mut Frame, app: &App, label: &str) {
    let area = centered_rect(70, 30, frame.area());
    let inner = render_dialog_framework(frame, area, "编辑个人信息", Color::Cyan);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    render_input_widget(
        frame,
        chunks[0],
        label,
        &app.input_buffer,
        true,
        Color::Yellow,
    );

    let hint = Paragraph::new("按 Enter 保存，Esc 取消").style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[1]);
}

fn render_item_form(frame: &mut Frame, app: &App, section: Section) {
    let form = app.editors.form(section);
    let title = if form.is_new() {
        format!("添加{}", section.noun())
    } else {
        format!("编辑{}", section.noun())
    };

    let area = centered_rect(80, 70, frame.area());
    let inner = render_dialog_framework(frame, area, &title, Color::Cyan);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    render_form_rows(frame, chunks[0], &form.rows());

    let hint = Paragraph::new("* 为必填项，Enter 保存，Esc 取消")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[1]);
}

fn render_confirm_dialog(frame: &mut Frame, action: &ConfirmAction) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let message = match action {
        ConfirmAction::Delete(section, _) => format!("确认删除该{}？", section.noun()),
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] 确认  [n] 取消", message))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("⚠️ 确认操作").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}

fn render_alert(frame: &mut Frame, alert: &str) {
    let area = centered_rect(60, 25, frame.area());
    let inner = render_dialog_framework(frame, area, "⚠️ 提示", Color::Red);

    let body = Paragraph::new(format!("{}\n\n[Enter] 确定", alert))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Experience, ResumeData, SectionItem};
    use crate::ui::actions::Action;
    use ratatui::{Terminal, backend::TestBackend};

    /// 渲染并返回屏幕文本（去掉空格，宽字符后的占位格也是空格）
    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .filter(|s| *s != " ")
            .collect()
    }

    #[test]
    fn test_preview_empty_state() {
        let mut app = App::new(ResumeData::default(), &Config::default());
        app.switch_tab(Tab::Preview);
        assert!(screen(&mut app).contains("暂无可预览的内容"));
    }

    #[test]
    fn test_preview_shows_experience() {
        let resume = ResumeData {
            experience: vec![Experience {
                id: "x".to_string(),
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: "2020-01".to_string(),
                current: true,
                description: "Built things".to_string(),
                ..Experience::default()
            }],
            ..ResumeData::default()
        };
        let mut app = App::new(resume, &Config::default());
        app.switch_tab(Tab::Preview);

        let text = screen(&mut app);
        assert!(text.contains("Engineer"));
        assert!(text.contains("Acme"));
        assert!(text.contains("January2020-Present"));
        assert!(text.contains("Builtthings"));
    }

    #[test]
    fn test_form_title_and_alert() {
        let mut app = App::new(ResumeData::default(), &Config::default());
        app.switch_tab(Tab::Experience);
        assert!(screen(&mut app).contains("按'a'添加"));

        app.dispatch(Action::StartAdd);
        assert!(screen(&mut app).contains(&format!("添加{}", Experience::NOUN)));

        app.dispatch(Action::Submit);
        assert!(screen(&mut app).contains("[Enter]确定"));
    }

    #[test]
    fn test_preview_splits_multiline_description() {
        let resume = ResumeData {
            experience: vec![Experience {
                id: "x".to_string(),
                title: "Engineer".to_string(),
                description: "alpha\nbeta".to_string(),
                ..Experience::default()
            }],
            ..ResumeData::default()
        };
        let mut app = App::new(resume, &Config::default());
        app.switch_tab(Tab::Preview);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect();

        let alpha = rows.iter().position(|row| row.contains("alpha")).unwrap();
        assert!(rows[alpha + 1].contains("beta"));
    }
}
