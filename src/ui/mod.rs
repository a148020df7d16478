//! 交互层入口。
//!
//! 包含 Web UI、TUI 与无 UI（旧 CLI）三套交互实现，共用 `book_search` 的控制器。

pub mod noui;
pub mod tui;
pub mod web;
