//! Open Library 图书搜索。
//!
//! 输入书名，调用 Open Library 搜索接口，列出结果卡片，点击后查看详情。
//!
//! 代码结构（读代码入口）：
//! - `base_system`：配置/日志等基础设施
//! - `book_search`：数据模型、HTTP 客户端、HTML 片段渲染与搜索控制器
//! - `ui`：Web UI、TUI 与无 UI（old cli）三套交互

use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::Path;

mod base_system;
mod book_search;
mod ui;

use base_system::config::load_or_create_with_base;
use base_system::context::Config;
use base_system::logging::{LogOptions, LogSystem};
use tracing::{debug, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "openlibrary-search")]
#[command(about = "Open Library book search (Web UI / TUI / CLI)")]
struct Cli {
    /// 启用调试日志输出
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// 启用服务器模式（Web UI）
    #[arg(long, default_value_t = false)]
    server: bool,

    /// 使用旧版 CLI（读屏友好），覆盖配置里的 old_cli
    #[arg(long, default_value_t = false)]
    cli: bool,

    /// 搜索一次并打印结果后退出（旧版 CLI 输出格式）
    #[arg(long)]
    query: Option<String>,

    /// 显示版本信息后退出
    #[arg(long, default_value_t = false)]
    version: bool,

    /// 数据目录路径（用于存放 config.yml 和 logs 等文件）
    #[arg(long)]
    data_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Web,
    Tui,
    OldCli,
    Once,
}

impl Cli {
    fn mode(&self, config: &Config) -> Mode {
        if self.server {
            Mode::Web
        } else if self.query.is_some() {
            Mode::Once
        } else if self.cli || config.old_cli {
            Mode::OldCli
        } else {
            Mode::Tui
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("openlibrary-search v{}", VERSION);
        return Ok(());
    }

    let data_dir = cli.data_dir.as_deref().map(Path::new);
    let config = load_or_create_with_base::<Config>(None, data_dir)
        .map_err(|e| anyhow!(e.to_string()))?;
    let mode = cli.mode(&config);

    let log = init_logging(cli.debug, mode, data_dir)?;
    info!(target: "startup", "openlibrary-search v{VERSION}, mode: {mode:?}");
    debug!(target: "startup", "logs dir: {}", log.logs_dir().display());

    let result = match mode {
        Mode::Web => ui::web::run(&config),
        Mode::Once => ui::noui::run_once(&config, cli.query.as_deref().unwrap_or_default()),
        Mode::OldCli => ui::noui::run(&config),
        Mode::Tui => ui::tui::run(&config),
    };

    log.safe_exit();
    result
}

/// 控制台日志只在 Web 模式输出；TUI 通过广播通道显示在日志框里。
fn init_logging(debug: bool, mode: Mode, base_dir: Option<&Path>) -> Result<LogSystem> {
    let opts = LogOptions {
        debug,
        console: mode == Mode::Web,
        broadcast_to_ui: mode == Mode::Tui,
        ..LogOptions::default()
    };
    LogSystem::init_with_base(opts, base_dir).map_err(|e| anyhow!(e))
}
