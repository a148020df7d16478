//! 无 UI（旧 CLI）交互入口。
//!
//! 使用标准输入输出进行交互，并在进入前尽量恢复终端模式。

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crossterm::event::DisableMouseCapture;
use crossterm::execute;
use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::base_system::context::Config;
use crate::book_search::client::cover_url;
use crate::book_search::html_utils::{format_authors, format_subjects, format_year};
use crate::book_search::render::{ERROR_TEXT, NO_RESULTS_TEXT};
use crate::book_search::{
    BookRecord, ListView, OpenLibraryClient, ResultsClick, SearchBackend, SearchController,
    SearchView,
};

const HINT_TEXT: &str = "Please enter a book title to search.";

/// 逐行打印的渲染面。加载期间在终端显示一个 spinner。
pub(crate) struct NouiView<W: Write> {
    out: W,
    cover_api_url: String,
    show_spinner: bool,
    spinner: Option<ProgressBar>,
}

impl<W: Write> NouiView<W> {
    pub(crate) fn new(out: W, cover_api_url: impl Into<String>, show_spinner: bool) -> Self {
        Self {
            out,
            cover_api_url: cover_api_url.into(),
            show_spinner,
            spinner: None,
        }
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }

    fn start_spinner(&mut self) {
        if !self.show_spinner || self.spinner.is_some() {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Searching...");
        pb.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn print_card(&mut self, idx: usize, book: &BookRecord) {
        let _ = writeln!(self.out, "[#{idx}] {}", book.title);
        let _ = writeln!(
            self.out,
            "      Author: {}",
            format_authors(book.author_name.as_deref())
        );
    }
}

impl<W: Write> SearchView for NouiView<W> {
    fn toggle_hint(&mut self, visible: bool) {
        if visible {
            let _ = writeln!(self.out, "{HINT_TEXT}");
        }
    }

    fn toggle_loading(&mut self, visible: bool) {
        if visible {
            self.start_spinner();
        } else {
            self.stop_spinner();
        }
    }

    fn render_list(&mut self, list: ListView<'_>) {
        match list {
            ListView::Results(books) => {
                let _ = writeln!(self.out, "共 {} 条结果：", books.len());
                for (i, book) in books.iter().enumerate() {
                    self.print_card(i + 1, book);
                }
                let _ = writeln!(self.out, "输入 #序号 查看详情。");
            }
            ListView::NoResults => {
                let _ = writeln!(self.out, "{NO_RESULTS_TEXT}");
            }
            ListView::Error => {
                let _ = writeln!(self.out, "{ERROR_TEXT}");
            }
        }
        let _ = self.out.flush();
    }

    fn render_detail(&mut self, book: &BookRecord) {
        let _ = writeln!(self.out, "==== {} ====", book.title);
        if let Some(id) = book.cover_id() {
            let _ = writeln!(self.out, "Cover: {}", cover_url(&self.cover_api_url, id));
        }
        let _ = writeln!(
            self.out,
            "Author: {}",
            format_authors(book.author_name.as_deref())
        );
        let _ = writeln!(
            self.out,
            "First Published: {}",
            format_year(book.first_publish_year)
        );
        let _ = writeln!(
            self.out,
            "Subjects: {}",
            format_subjects(book.subject.as_deref())
        );
        let _ = self.out.flush();
    }
}

type CliController<W> = SearchController<dyn SearchBackend, NouiView<W>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// 处理一行输入：`q` 退出，`#N` 查看第 N 张卡片的详情，其余内容（包括 `#` 后面不是数字的）作为书名搜索。
fn handle_line<W: Write>(ctl: &mut CliController<W>, line: &str) -> Step {
    let text = line.trim();
    if text.eq_ignore_ascii_case("q") {
        return Step::Quit;
    }

    if let Some(num) = text.strip_prefix('#').and_then(|n| n.trim().parse::<usize>().ok()) {
        let picked = num
            .checked_sub(1)
            .and_then(|i| ctl.results().get(i))
            .map(|b| b.title.clone());
        let Some(book_title) = picked else {
            let _ = writeln!(ctl.view_mut().out, "没有这个序号：{text}");
            return Step::Continue;
        };
        ctl.handle_book_selection(&ResultsClick::ViewDetails { book_title });
        return Step::Continue;
    }

    let state = ctl.handle_search(text);
    debug!(target: "ui", "cli search finished: {}", state.as_str());
    Step::Continue
}

fn new_controller<W: Write>(config: &Config, out: W) -> Result<CliController<W>> {
    let backend: Arc<dyn SearchBackend> = Arc::new(
        OpenLibraryClient::from_config(config).context("build search client")?,
    );
    Ok(SearchController::new(
        backend,
        NouiView::new(out, config.cover_api_url.clone(), true),
    ))
}

/// `--query` 单次模式：搜索、打印结果后返回。
pub fn run_once(config: &Config, query: &str) -> Result<()> {
    let mut ctl = new_controller(config, io::stdout())?;
    handle_line(&mut ctl, query);
    Ok(())
}

pub fn run(config: &Config) -> Result<()> {
    // 上次可能停在 TUI 的 raw 模式里，先尽量恢复终端。
    let _ = disable_raw_mode();
    let mut out = io::stdout();
    let _ = execute!(out, DisableMouseCapture, LeaveAlternateScreen);

    println!(
        "Open Library 图书搜索 v{}\n输入书名搜索，#序号 查看详情，q 退出。",
        env!("CARGO_PKG_VERSION")
    );

    let mut ctl = new_controller(config, out)?;
    loop {
        let Some(input) = read_line("> ")? else {
            break;
        };
        if handle_line(&mut ctl, &input) == Step::Quit {
            println!("已退出。");
            break;
        }
    }

    Ok(())
}

/// 读取一行；标准输入结束时返回 `None`。
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let stdin = io::stdin();
    let mut line = String::new();
    let n = stdin.lock().read_line(&mut line)?;
    Ok((n > 0).then_some(line))
}
