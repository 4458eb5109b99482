mod app_service;
mod app_state;
mod commands;
mod config;
mod storage;
mod ui;
mod view;

use anyhow::Context;
use chrono::{Local, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::app_service::StoreService;
use crate::app_state::{App, AppEvent};
use crate::commands::AppCommand;
use crate::config::AppConfig;
use crate::storage::repository::{JobStore, LoadState};
use crate::storage::FileSlot;
use crate::ui::draw;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut startup_info = Vec::new();

    // 加载 .env（可选）
    match dotenv::dotenv() {
        Ok(path) => startup_info.push(format!("✓ 已加载 .env 文件: {}", path.display())),
        Err(_) => startup_info.push("未找到 .env 文件，使用系统环境变量".to_string()),
    }
    let (cfg, cfg_info) = AppConfig::from_env();
    startup_info.extend(cfg_info);

    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    std::fs::create_dir_all(&cfg.log_dir)
        .with_context(|| format!("无法创建日志目录 {}", cfg.log_dir.display()))?;
    let log_path = cfg.log_dir.join(format!("app-{}.log", ts));
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("无法创建日志文件 {}", log_path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file))) // 输出重定向到文件，避免干扰 TUI
        .filter_level(log::LevelFilter::Warn)
        .filter_module("jobtrack", log::LevelFilter::Info)
        .init();
    info!("jobtrack starting, data dir {}", cfg.data_dir.display());

    // 加载记录
    let mut store = JobStore::load(Box::new(FileSlot::new(&cfg.data_dir)));
    match store.load_state() {
        LoadState::Absent => startup_info.push("尚无保存的岗位记录".to_string()),
        LoadState::Loaded => {
            startup_info.push(format!("✓ 已加载 {} 条岗位记录", store.all().len()))
        }
        LoadState::Unreadable => {
            startup_info.push("⚠ 已保存的岗位数据无法解析，已从空列表开始".to_string())
        }
    }
    if cfg.seed_samples {
        match storage::seed::seed_if_empty(&mut store, Utc::now()) {
            Ok(true) => startup_info.push("✓ 已添加示例数据".to_string()),
            Ok(false) => {}
            Err(e) => {
                error!("Failed to seed sample data: {}", e);
                startup_info.push(format!("✗ 写入示例数据失败: {}", e));
            }
        }
    }

    // 创建核心 Channel
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();

    // 存储服务独占记录集合
    let service = StoreService::new(store);
    tokio::spawn(service.run(cmd_rx, evt_tx));

    // TUI 初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(startup_info, cfg.notice_ttl, cmd_tx, evt_rx);

    // 主循环
    let res = match app.evt_rx.take() {
        Some(rx) => run_app_loop(&mut terminal, &mut app, rx).await,
        None => Ok(()),
    };

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        error!("UI loop failed: {}", e);
        return Err(e.into());
    }
    info!("jobtrack exited");
    Ok(())
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        while let Ok(event) = evt_rx.try_recv() {
            app.apply_event(event);
        }
        app.tick(Instant::now());

        terminal.draw(|f| draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key) {
                    return Ok(());
                }
            }
        }

        // 单线程运行时：让存储服务处理完刚发出的命令再重绘
        tokio::task::yield_now().await;
    }
}
