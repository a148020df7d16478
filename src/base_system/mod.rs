//! 基础设施：配置读写、日志。

pub mod config;
pub mod context;
pub mod logging;
