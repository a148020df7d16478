//! Web Server UI（服务端渲染的单页搜索）。

mod page;
mod router;
mod routes;
mod state;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{info, warn};

use crate::base_system::context::Config;
use crate::book_search::{OpenLibraryClient, SearchBackend};
use state::AppState;

const ADDR_ENV: &str = "BOOK_SEARCH_WEB_ADDR";

pub fn run(config: &Config) -> Result<()> {
    let bind_raw = std::env::var(ADDR_ENV).unwrap_or_else(|_| config.web_addr.clone());
    let bind_addrs = parse_bind_addrs(&bind_raw)?;

    // blocking 客户端必须在 runtime 之外创建和销毁；这里持有一份引用直到 block_on 返回。
    let backend: Arc<dyn SearchBackend> = Arc::new(OpenLibraryClient::from_config(config)?);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let state = AppState::new(bind_addrs.clone(), Arc::clone(&backend), &config.cover_api_url);
    let result = rt.block_on(run_async(bind_addrs, state));
    drop(rt);
    drop(backend);
    result
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(anyhow!("empty bind addr"));
    }

    if let Ok(a) = s.parse::<SocketAddr>() {
        return Ok(a);
    }

    // 容忍 IPv6 不带方括号，例如 "::1:18424"：最后一段全数字视为端口。
    if !s.starts_with('[')
        && let Some((host, port)) = s.rsplit_once(':')
        && host.contains(':')
        && !port.is_empty()
        && port.chars().all(|c| c.is_ascii_digit())
        && let Ok(a) = format!("[{host}]:{port}").parse::<SocketAddr>()
    {
        return Ok(a);
    }

    Err(anyhow!(
        "invalid bind address '{s}'. Use '127.0.0.1:18424' or '[::1]:18424'; separate multiple binds with commas."
    ))
}

fn parse_bind_addrs(raw: &str) -> Result<Vec<SocketAddr>> {
    let mut out = Vec::new();
    for part in raw.split([',', ';']).map(str::trim).filter(|s| !s.is_empty()) {
        let a = parse_bind_addr(part)?;
        if !out.contains(&a) {
            out.push(a);
        }
    }

    if out.is_empty() {
        return Err(anyhow!("no bind address configured ({ADDR_ENV} / web_addr)"));
    }
    Ok(out)
}

async fn run_async(bind_addrs: Vec<SocketAddr>, state: AppState) -> Result<()> {
    let notify = Arc::new(tokio::sync::Notify::new());
    {
        let notify = notify.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            notify.notify_waiters();
        });
    }

    let mut servers = Vec::new();
    for bind in bind_addrs {
        let listener = match tokio::net::TcpListener::bind(bind).await {
            Ok(l) => l,
            Err(e) => {
                // 双栈系统上 [::] 可能已经覆盖 0.0.0.0
                if !servers.is_empty() && e.kind() == std::io::ErrorKind::AddrInUse {
                    warn!(target: "web", bind = %bind, error = %e, "bind failed (AddrInUse), skipping");
                    continue;
                }
                return Err(anyhow!(e).context(format!("bind failed: {bind}")));
            }
        };

        info!(target: "web", "Web UI listening on http://{bind}/");
        println!("Web UI listening on http://{bind}/");

        let app = router::build_router(state.clone());
        let notify = notify.clone();
        servers.push(tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                notify.notified().await;
            })
            .await
        }));
    }

    if servers.is_empty() {
        return Err(anyhow!("no listeners started"));
    }

    println!("Press Ctrl+C to stop.");

    for h in servers {
        h.await
            .map_err(|e| anyhow!("server task join failed: {e}"))?
            .map_err(|e| anyhow!(e))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("Stopping server...");
}
