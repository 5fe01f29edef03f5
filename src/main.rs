mod config;
mod editor;
mod error;
mod export;
mod logging;
mod models;
mod preview;
mod ui;

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::models::ResumeData;
use crate::ui::{App, render};

fn main() -> Result<(), AppError> {
    let config = Config::load()?;

    let log_dir = logging::log_dir()
        .ok_or_else(|| AppError::Logging("无法获取用户数据目录".to_string()))?;
    let (log_path, _log_guard) = logging::init(&config.log.level, &log_dir)?;
    info!(log = %log_path.display(), "vitae started");

    // 简历只保存在内存中
    let mut app = App::new(ResumeData::default(), &config);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("vitae exited");
    result.map_err(AppError::from)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if let Event::Key(key) = crossterm::event::read()?
            && key.kind == KeyEventKind::Press
            && ui::handle_key_event(app, key)?
        {
            break;
        }
    }
    Ok(())
}
