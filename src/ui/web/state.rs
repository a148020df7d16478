use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::book_search::{SearchBackend, SearchController};
use crate::ui::web::page::HtmlPage;

pub(crate) type WebController = SearchController<dyn SearchBackend, HtmlPage>;

/// 整个进程共享一个控制器（也就共享“最近一次搜索结果”）。
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) bind_addrs: Arc<Vec<SocketAddr>>,
    pub(crate) controller: Arc<Mutex<WebController>>,
}

impl AppState {
    pub(crate) fn new(
        bind_addrs: Vec<SocketAddr>,
        backend: Arc<dyn SearchBackend>,
        cover_api_url: &str,
    ) -> Self {
        Self {
            bind_addrs: Arc::new(bind_addrs),
            controller: Arc::new(Mutex::new(SearchController::new(
                backend,
                HtmlPage::new(cover_api_url),
            ))),
        }
    }

    /// 锁中毒时沿用内部数据。
    pub(crate) fn controller(&self) -> MutexGuard<'_, WebController> {
        self.controller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
