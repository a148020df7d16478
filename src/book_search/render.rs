//! 搜索结果与详情的 HTML 片段。
//!
//! 所有来自用户或接口的文本都经过 [`escape_html`] 后再拼进标记。

use super::client::cover_url;
use super::html_utils::{escape_html, format_authors, format_subjects, format_year};
use super::models::BookRecord;

pub const NO_RESULTS_TEXT: &str = "No results found";
pub const ERROR_TEXT: &str = "Error fetching data";

/// 「查看详情」控件携带书名的属性。
pub const BOOK_TITLE_ATTR: &str = "data-book-title";

pub fn create_book_card(book: &BookRecord) -> String {
    let title = escape_html(&book.title);
    let authors = escape_html(&format_authors(book.author_name.as_deref()));
    format!(
        r#"<div class="col-12 mb-4">
  <div class="card">
    <div class="card-body">
      <h5 class="card-title">{title}</h5>
      <p class="card-text">Author: {authors}</p>
      <form method="get" action="/details">
        <button type="submit" class="btn btn-primary btn-sm" name="title" value="{title}" {BOOK_TITLE_ATTR}="{title}">View Details</button>
      </form>
    </div>
  </div>
</div>"#
    )
}

/// 每条记录一张卡片，保持接口返回的顺序。
pub fn render_results(books: &[BookRecord]) -> String {
    books
        .iter()
        .map(create_book_card)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_no_results() -> String {
    format!(
        r#"<div class="col-12">
  <p class="text-center">{NO_RESULTS_TEXT}</p>
</div>"#
    )
}

pub fn render_error() -> String {
    format!(
        r#"<div class="col-12">
  <p class="text-center text-danger">{ERROR_TEXT}</p>
</div>"#
    )
}

pub fn render_book_details(book: &BookRecord, cover_base: &str) -> String {
    let title = escape_html(&book.title);
    let mut out = String::new();
    if let Some(id) = book.cover_id() {
        let src = escape_html(&cover_url(cover_base, id));
        out.push_str(&format!(
            "<img class=\"responsive\" src=\"{src}\" alt=\"{title}\"/>\n"
        ));
    }
    out.push_str(&format!("<h3>{title}</h3>\n"));
    out.push_str(&format!(
        "<p><strong>Author:</strong> {}</p>\n",
        escape_html(&format_authors(book.author_name.as_deref()))
    ));
    out.push_str(&format!(
        "<p><strong>First Published:</strong> {}</p>\n",
        format_year(book.first_publish_year)
    ));
    out.push_str(&format!(
        "<p class=\"d-inline-block text-truncate\"><strong>Subjects:</strong> {}</p>",
        escape_html(&format_subjects(book.subject.as_deref()))
    ));
    out
}
