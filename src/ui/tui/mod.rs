//! TUI 交互：输入框 + 结果列表 + 详情面板 + 日志框。
//!
//! 网络请求放在工作线程里执行，结果通过通道回到 UI 线程再交给控制器。

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use tracing::{info, warn};

mod home;
mod view;

use crate::base_system::context::Config;
use crate::base_system::logging::take_broadcast_rx;
use crate::book_search::{
    OpenLibraryClient, ResultsClick, SearchBackend, SearchController, SearchError,
    SearchResponse, UiState,
};
use view::TuiView;

const SPINNER_FRAMES: &[char] = &['|', '/', '-', '\\'];
const LOG_HEIGHT: u16 = 7;
const MAX_LOG_LINES: usize = 200;
const IDLE_STATUS: &str = "Type a title, Enter to search, Tab to switch focus, Ctrl+C to quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    Results,
}

#[derive(Debug)]
enum WorkerMsg {
    SearchDone(Result<SearchResponse, SearchError>),
}

type TuiController = SearchController<dyn SearchBackend, TuiView>;

pub(super) struct App {
    input: String,
    focus: Focus,
    status: String,
    logs: Vec<String>,
    list_state: ListState,
    controller: TuiController,
    should_quit: bool,

    // worker
    worker_tx: Sender<WorkerMsg>,
    worker_rx: Receiver<WorkerMsg>,

    // spinner
    spinner_idx: usize,
    spinner_last: Instant,

    // log
    log_rx: Option<crossbeam_channel::Receiver<String>>,
}

impl App {
    fn new(backend: Arc<dyn SearchBackend>, cover_api_url: &str) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel();
        Self {
            input: String::new(),
            focus: Focus::Input,
            status: IDLE_STATUS.to_string(),
            logs: Vec::new(),
            list_state: ListState::default(),
            controller: SearchController::new(backend, TuiView::new(cover_api_url)),
            should_quit: false,
            worker_tx,
            worker_rx,
            spinner_idx: 0,
            spinner_last: Instant::now(),
            log_rx: take_broadcast_rx(),
        }
    }

    fn view(&self) -> &TuiView {
        self.controller.view()
    }

    fn push_log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.logs
            .push(msg.trim_end_matches(['\r', '\n']).to_string());
        if self.logs.len() > MAX_LOG_LINES {
            let overflow = self.logs.len() - MAX_LOG_LINES;
            self.logs.drain(0..overflow);
        }
    }

    fn select_next(&mut self) {
        let len = self.view().books().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let next = match self.list_state.selected() {
            Some(idx) if idx + 1 < len => idx + 1,
            _ => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        let len = self.view().books().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let prev = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(idx) => idx - 1,
        };
        self.list_state.select(Some(prev));
    }
}

pub fn run(config: &Config) -> Result<()> {
    let backend: Arc<dyn SearchBackend> = Arc::new(
        OpenLibraryClient::from_config(config).context("build search client")?,
    );

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term).context("init terminal")?;

    let mut app = App::new(backend, &config.cover_api_url);
    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        tick_spinner(app);
        poll_worker(app);
        drain_log_channel(app);

        terminal.draw(|f| home::draw_home(f, app))?;

        if event::poll(Duration::from_millis(150)).context("poll event")? {
            let evt: Event = event::read().context("read event")?;
            home::handle_event_home(app, evt);
        }
    }
    Ok(())
}

/// 输入框回车：校验通过才起工作线程。
pub(super) fn submit_search(app: &mut App) {
    let Some(query) = app.controller.begin_search(&app.input) else {
        app.status = "Please enter a book title to search.".to_string();
        return;
    };

    info!(target: "ui", "search submitted: {query}");
    app.spinner_idx = 0;
    app.spinner_last = Instant::now();
    app.status = format!("Searching \"{query}\"... {}", SPINNER_FRAMES[0]);

    let backend = app.controller.backend();
    let tx = app.worker_tx.clone();
    thread::spawn(move || {
        let result = backend.search(&query);
        let _ = tx.send(WorkerMsg::SearchDone(result));
    });
}

/// 结果列表回车：对当前选中项触发「查看详情」。
pub(super) fn view_selected_details(app: &mut App) {
    let click = match app
        .list_state
        .selected()
        .and_then(|idx| app.view().books().get(idx))
    {
        Some(book) => ResultsClick::ViewDetails {
            book_title: book.title.clone(),
        },
        None => ResultsClick::Elsewhere,
    };
    if !app.controller.handle_book_selection(&click) {
        warn!(target: "ui", "no record to show for {click:?}");
    }
}

fn poll_worker(app: &mut App) {
    while let Ok(msg) = app.worker_rx.try_recv() {
        apply_worker_msg(app, msg);
    }
}

fn apply_worker_msg(app: &mut App, msg: WorkerMsg) {
    match msg {
        WorkerMsg::SearchDone(result) => {
            let state = app.controller.complete_search(result);
            app.status = match state {
                UiState::Results(n) => {
                    app.list_state.select(Some(0));
                    app.focus = Focus::Results;
                    format!("Found {n} books. Up/Down to choose, Enter for details.")
                }
                UiState::NoResults => {
                    app.list_state.select(None);
                    app.focus = Focus::Input;
                    "No results found".to_string()
                }
                UiState::Error => {
                    app.list_state.select(None);
                    app.focus = Focus::Input;
                    "Error fetching data (see log)".to_string()
                }
                UiState::Idle | UiState::Loading => IDLE_STATUS.to_string(),
            };
        }
    }
}

fn tick_spinner(app: &mut App) {
    if !app.view().loading {
        return;
    }
    if app.spinner_last.elapsed() < Duration::from_millis(140) {
        return;
    }
    app.spinner_idx = (app.spinner_idx + 1) % SPINNER_FRAMES.len();
    app.spinner_last = Instant::now();
    let query = app
        .controller
        .last_query()
        .map(|q| q.to_string())
        .unwrap_or_default();
    app.status = format!("Searching \"{query}\"... {}", SPINNER_FRAMES[app.spinner_idx]);
}

fn drain_log_channel(app: &mut App) {
    if let Some(rx) = app.log_rx.clone() {
        for line in rx.try_iter() {
            app.push_log(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book_search::client::DEFAULT_COVER_API_URL;
    use crate::book_search::{BookRecord, SearchQuery};

    struct StaticBackend(Vec<&'static str>);

    impl SearchBackend for StaticBackend {
        fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
            if query.as_str() == "fail" {
                return Err(SearchError::Status(503));
            }
            Ok(SearchResponse {
                docs: Some(
                    self.0
                        .iter()
                        .map(|t| BookRecord {
                            title: t.to_string(),
                            ..Default::default()
                        })
                        .collect(),
                ),
                num_found: None,
            })
        }
    }

    fn app_with(titles: Vec<&'static str>) -> App {
        App::new(Arc::new(StaticBackend(titles)), DEFAULT_COVER_API_URL)
    }

    fn wait_for_worker(app: &mut App) {
        let msg = app
            .worker_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker reply");
        apply_worker_msg(app, msg);
    }

    #[test]
    fn blank_input_shows_hint_and_spawns_nothing() {
        let mut app = app_with(vec!["Dune"]);
        app.input = "   ".to_string();
        submit_search(&mut app);
        assert!(app.view().hint_visible);
        assert!(!app.view().loading);
        assert!(
            app.worker_rx
                .recv_timeout(Duration::from_millis(100))
                .is_err()
        );
    }

    #[test]
    fn search_then_view_details() {
        let mut app = app_with(vec!["Dune", "Emma"]);
        app.input = "anything".to_string();
        submit_search(&mut app);
        assert!(!app.view().hint_visible);
        assert!(app.view().loading);

        wait_for_worker(&mut app);
        assert!(!app.view().loading);
        assert_eq!(app.view().books().len(), 2);
        assert_eq!(app.focus, Focus::Results);

        app.select_next();
        view_selected_details(&mut app);
        let detail = app.view().detail.clone().expect("detail");
        assert_eq!(detail.title, "Emma");
    }

    #[test]
    fn failed_search_returns_focus_to_input() {
        let mut app = app_with(vec!["Dune"]);
        app.input = "Dune".to_string();
        submit_search(&mut app);
        wait_for_worker(&mut app);
        assert_eq!(app.focus, Focus::Results);

        app.input = "fail".to_string();
        submit_search(&mut app);
        wait_for_worker(&mut app);
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.list_state.selected(), None);
        assert_eq!(app.view().list.placeholder(), Some("Error fetching data"));
    }

    #[test]
    fn empty_reply_shows_placeholder() {
        let mut app = app_with(vec![]);
        app.input = "nothing".to_string();
        submit_search(&mut app);
        wait_for_worker(&mut app);
        assert_eq!(app.view().list.placeholder(), Some("No results found"));
        assert_eq!(app.list_state.selected(), None);
        assert_eq!(app.focus, Focus::Input);
    }
}
