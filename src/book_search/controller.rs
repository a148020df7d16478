//! 搜索控制器：校验输入、发起请求、保存最近一次结果并驱动渲染面。
//!
//! 渲染面通过 [`SearchView`] 抽象，Web/TUI/CLI 各自实现；控制器本身不关心具体 UI。
//! 一次搜索拆成 `begin_search` → `fetch_search_results` → `complete_search` 三步，
//! 有事件循环的界面可以把中间的网络请求放到别的线程。三步之间没有序号/取消令牌，
//! 重叠的搜索以最后完成的那次为准。

use std::sync::Arc;

use tracing::{error, info};

use super::client::{SearchBackend, SearchError};
use super::models::{BookRecord, SearchQuery, SearchResponse};

/// 结果区域要展示的内容。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListView<'a> {
    Results(&'a [BookRecord]),
    NoResults,
    Error,
}

/// 渲染面的最小能力集合。
pub trait SearchView {
    fn toggle_hint(&mut self, visible: bool);
    fn toggle_loading(&mut self, visible: bool);
    fn render_list(&mut self, list: ListView<'_>);
    fn render_detail(&mut self, book: &BookRecord);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    Results(usize),
    NoResults,
    Error,
}

impl UiState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Results(_) => "results",
            UiState::NoResults => "no_results",
            UiState::Error => "error",
        }
    }
}

/// 结果列表上的一次点击。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsClick {
    ViewDetails { book_title: String },
    Elsewhere,
}

pub struct SearchController<B: SearchBackend + ?Sized, V: SearchView> {
    backend: Arc<B>,
    view: V,
    results: Vec<BookRecord>,
    last_query: Option<SearchQuery>,
    state: UiState,
    selected: Option<BookRecord>,
}

impl<B: SearchBackend + ?Sized, V: SearchView> SearchController<B, V> {
    pub fn new(backend: Arc<B>, view: V) -> Self {
        Self {
            backend,
            view,
            results: Vec::new(),
            last_query: None,
            state: UiState::Idle,
            selected: None,
        }
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// 最近一次成功搜索的结果集。
    pub fn results(&self) -> &[BookRecord] {
        &self.results
    }

    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    pub fn selected(&self) -> Option<&BookRecord> {
        self.selected.as_ref()
    }

    /// 同步执行一次完整搜索（校验 → 请求 → 渲染）。
    pub fn handle_search(&mut self, input: &str) -> UiState {
        let Some(query) = self.begin_search(input) else {
            return self.state;
        };
        let outcome = self.fetch_search_results(&query);
        self.complete_search(outcome)
    }

    /// 校验输入；合法时隐藏提示并打开加载指示，返回待请求的查询。
    pub fn begin_search(&mut self, input: &str) -> Option<SearchQuery> {
        let query = SearchQuery::parse(input);
        self.view.toggle_hint(query.is_none());
        let query = query?;

        info!(target: "search", "searching title: {query}");
        self.last_query = Some(query.clone());
        self.state = UiState::Loading;
        self.view.toggle_loading(true);
        Some(query)
    }

    pub fn fetch_search_results(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        self.backend.search(query)
    }

    /// 应用请求结果；无论成功失败都会关闭加载指示。
    pub fn complete_search(&mut self, outcome: Result<SearchResponse, SearchError>) -> UiState {
        match outcome {
            Ok(resp) => {
                self.results = resp.into_docs();
                info!(target: "search", "search returned {} records", self.results.len());
                self.render_search_results();
            }
            Err(err) => {
                error!(target: "search", "Search error: {err}");
                self.state = UiState::Error;
                self.view.render_list(ListView::Error);
            }
        }
        self.view.toggle_loading(false);
        self.state
    }

    fn render_search_results(&mut self) {
        if self.results.is_empty() {
            self.state = UiState::NoResults;
            self.view.render_list(ListView::NoResults);
            return;
        }
        self.state = UiState::Results(self.results.len());
        self.view.render_list(ListView::Results(&self.results));
    }

    /// 只响应「查看详情」；按书名精确匹配结果集中的第一条。
    pub fn handle_book_selection(&mut self, click: &ResultsClick) -> bool {
        let ResultsClick::ViewDetails { book_title } = click else {
            return false;
        };
        let Some(book) = self.results.iter().find(|b| b.title == *book_title) else {
            return false;
        };
        self.view.render_detail(book);
        self.selected = Some(book.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        calls: AtomicUsize,
        replies: Mutex<Vec<Result<SearchResponse, SearchError>>>,
    }

    impl FakeBackend {
        fn with(replies: Vec<Result<SearchResponse, SearchError>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                replies: Mutex::new(replies),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SearchBackend for FakeBackend {
        fn search(&self, _query: &SearchQuery) -> Result<SearchResponse, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies.lock().unwrap().remove(0)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Hint(bool),
        Loading(bool),
        List(Vec<String>),
        NoResults,
        Error,
        Detail(String),
    }

    #[derive(Default)]
    struct RecordingView {
        events: Vec<Event>,
    }

    impl SearchView for RecordingView {
        fn toggle_hint(&mut self, visible: bool) {
            self.events.push(Event::Hint(visible));
        }
        fn toggle_loading(&mut self, visible: bool) {
            self.events.push(Event::Loading(visible));
        }
        fn render_list(&mut self, list: ListView<'_>) {
            self.events.push(match list {
                ListView::Results(books) => {
                    Event::List(books.iter().map(|b| b.title.clone()).collect())
                }
                ListView::NoResults => Event::NoResults,
                ListView::Error => Event::Error,
            });
        }
        fn render_detail(&mut self, book: &BookRecord) {
            self.events.push(Event::Detail(book.title.clone()));
        }
    }

    fn book(title: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn response(titles: &[&str]) -> SearchResponse {
        SearchResponse {
            docs: Some(titles.iter().map(|t| book(t)).collect()),
            num_found: Some(titles.len() as u64),
        }
    }

    #[test]
    fn blank_query_shows_hint_without_request() {
        let backend = FakeBackend::with(vec![]);
        let mut ctl = SearchController::new(backend.clone(), RecordingView::default());
        for input in ["", "   ", "\t\n"] {
            assert_eq!(ctl.handle_search(input), UiState::Idle);
        }
        assert_eq!(backend.calls(), 0);
        assert!(ctl.view().events.iter().all(|e| *e == Event::Hint(true)));
        assert!(ctl.last_query().is_none());
    }

    #[test]
    fn valid_query_hides_hint_before_loading() {
        let backend = FakeBackend::with(vec![Ok(response(&["Dune"]))]);
        let mut ctl = SearchController::new(backend.clone(), RecordingView::default());
        assert_eq!(ctl.handle_search("  Dune "), UiState::Results(1));
        assert_eq!(backend.calls(), 1);
        assert_eq!(
            ctl.view().events,
            vec![
                Event::Hint(false),
                Event::Loading(true),
                Event::List(vec!["Dune".to_string()]),
                Event::Loading(false),
            ]
        );
        assert_eq!(ctl.last_query().map(|q| q.as_str()), Some("Dune"));
    }

    #[test]
    fn results_render_in_input_order() {
        let backend = FakeBackend::with(vec![Ok(response(&["C", "A", "B"]))]);
        let mut ctl = SearchController::new(backend, RecordingView::default());
        ctl.handle_search("letters");
        assert!(ctl.view().events.contains(&Event::List(vec![
            "C".to_string(),
            "A".to_string(),
            "B".to_string()
        ])));
        assert_eq!(ctl.results().len(), 3);
    }

    #[test]
    fn empty_or_missing_docs_render_no_results() {
        let backend = FakeBackend::with(vec![
            Ok(response(&[])),
            Ok(SearchResponse::default()),
        ]);
        let mut ctl = SearchController::new(backend, RecordingView::default());
        assert_eq!(ctl.handle_search("nothing"), UiState::NoResults);
        assert_eq!(ctl.handle_search("nothing again"), UiState::NoResults);
        let events = &ctl.view().events;
        assert_eq!(events.iter().filter(|e| **e == Event::NoResults).count(), 2);
        assert!(!events.contains(&Event::Error));
        assert_eq!(events.last(), Some(&Event::Loading(false)));
    }

    #[test]
    fn failure_renders_error_and_clears_loading() {
        let backend = FakeBackend::with(vec![
            Ok(response(&["Dune"])),
            Err(SearchError::Status(503)),
        ]);
        let mut ctl = SearchController::new(backend, RecordingView::default());
        ctl.handle_search("Dune");
        assert_eq!(ctl.handle_search("Dune Messiah"), UiState::Error);

        let events = &ctl.view().events;
        assert_eq!(events[events.len() - 2], Event::Error);
        assert_eq!(events.last(), Some(&Event::Loading(false)));
        // 失败不覆盖上一次的结果集
        assert_eq!(ctl.results().len(), 1);
        assert!(ctl.handle_book_selection(&ResultsClick::ViewDetails {
            book_title: "Dune".to_string()
        }));
    }

    #[test]
    fn selection_looks_up_first_exact_title() {
        let mut first = book("Dune");
        first.first_publish_year = Some(1965);
        let mut second = book("Dune");
        second.first_publish_year = Some(2021);
        let backend = FakeBackend::with(vec![Ok(SearchResponse {
            docs: Some(vec![book("dune"), first, second]),
            num_found: None,
        })]);
        let mut ctl = SearchController::new(backend, RecordingView::default());
        ctl.handle_search("Dune");

        assert!(ctl.handle_book_selection(&ResultsClick::ViewDetails {
            book_title: "Dune".to_string()
        }));
        assert_eq!(ctl.selected().and_then(|b| b.first_publish_year), Some(1965));
        assert_eq!(ctl.view().events.last(), Some(&Event::Detail("Dune".to_string())));
    }

    #[test]
    fn selection_ignores_other_clicks_and_unknown_titles() {
        let backend = FakeBackend::with(vec![Ok(response(&["Dune"]))]);
        let mut ctl = SearchController::new(backend, RecordingView::default());
        ctl.handle_search("Dune");
        let before = ctl.view().events.len();

        assert!(!ctl.handle_book_selection(&ResultsClick::Elsewhere));
        assert!(!ctl.handle_book_selection(&ResultsClick::ViewDetails {
            book_title: "Children of Dune".to_string()
        }));
        assert_eq!(ctl.view().events.len(), before);
        assert!(ctl.selected().is_none());
    }

    #[test]
    fn new_search_replaces_lookup_table() {
        let backend = FakeBackend::with(vec![
            Ok(response(&["Dune"])),
            Ok(response(&["Emma"])),
        ]);
        let mut ctl = SearchController::new(backend, RecordingView::default());
        ctl.handle_search("Dune");
        assert!(ctl.handle_book_selection(&ResultsClick::ViewDetails {
            book_title: "Dune".to_string()
        }));

        ctl.handle_search("Emma");
        // 旧详情不会自动失效
        assert_eq!(ctl.selected().map(|b| b.title.as_str()), Some("Dune"));
        assert!(!ctl.handle_book_selection(&ResultsClick::ViewDetails {
            book_title: "Dune".to_string()
        }));
        assert!(ctl.handle_book_selection(&ResultsClick::ViewDetails {
            book_title: "Emma".to_string()
        }));
    }

    #[test]
    fn overlapping_searches_last_completion_wins() {
        let backend = FakeBackend::with(vec![]);
        let mut ctl = SearchController::new(backend.clone(), RecordingView::default());

        let first = ctl.begin_search("first").expect("valid");
        let second = ctl.begin_search("second").expect("valid");
        assert_eq!(first.as_str(), "first");
        assert_eq!(second.as_str(), "second");

        // 第二次先返回，第一次后返回
        ctl.complete_search(Ok(response(&["Second Book"])));
        ctl.complete_search(Ok(response(&["First Book"])));

        assert_eq!(ctl.results()[0].title, "First Book");
        assert_eq!(ctl.state(), UiState::Results(1));
        assert_eq!(backend.calls(), 0);
    }
}
