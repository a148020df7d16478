//! TUI 的渲染面：把控制器的渲染指令保存成结构化状态，绘制时再读取。

use crate::book_search::client::cover_url;
use crate::book_search::html_utils::{format_authors, format_subjects, format_year};
use crate::book_search::render::{ERROR_TEXT, NO_RESULTS_TEXT};
use crate::book_search::{BookRecord, ListView, SearchView};

#[derive(Debug, Clone, Default, PartialEq)]
pub(super) enum ListContent {
    #[default]
    Empty,
    Books(Vec<BookRecord>),
    NoResults,
    Error,
}

impl ListContent {
    pub(super) fn placeholder(&self) -> Option<&'static str> {
        match self {
            ListContent::NoResults => Some(NO_RESULTS_TEXT),
            ListContent::Error => Some(ERROR_TEXT),
            _ => None,
        }
    }
}

/// 详情面板的文本行（已格式化）。
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DetailLines {
    pub(super) title: String,
    pub(super) cover: Option<String>,
    pub(super) authors: String,
    pub(super) year: String,
    pub(super) subjects: String,
}

#[derive(Debug, Default)]
pub(super) struct TuiView {
    cover_api_url: String,
    pub(super) hint_visible: bool,
    pub(super) loading: bool,
    pub(super) list: ListContent,
    pub(super) detail: Option<DetailLines>,
}

impl TuiView {
    pub(super) fn new(cover_api_url: impl Into<String>) -> Self {
        Self {
            cover_api_url: cover_api_url.into(),
            ..Default::default()
        }
    }

    pub(super) fn books(&self) -> &[BookRecord] {
        match &self.list {
            ListContent::Books(books) => books.as_slice(),
            _ => &[],
        }
    }
}

impl SearchView for TuiView {
    fn toggle_hint(&mut self, visible: bool) {
        self.hint_visible = visible;
    }

    fn toggle_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn render_list(&mut self, list: ListView<'_>) {
        self.list = match list {
            ListView::Results(books) => ListContent::Books(books.to_vec()),
            ListView::NoResults => ListContent::NoResults,
            ListView::Error => ListContent::Error,
        };
    }

    fn render_detail(&mut self, book: &BookRecord) {
        self.detail = Some(DetailLines {
            title: book.title.clone(),
            cover: book.cover_id().map(|id| cover_url(&self.cover_api_url, id)),
            authors: format_authors(book.author_name.as_deref()),
            year: format_year(book.first_publish_year),
            subjects: format_subjects(book.subject.as_deref()),
        });
    }
}
