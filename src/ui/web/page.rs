//! 服务端渲染的单页：把各个页面区域（结果列表、详情、加载指示、校验提示）保存为 HTML 片段。

use crate::book_search::html_utils::escape_html;
use crate::book_search::render;
use crate::book_search::{BookRecord, ListView, SearchView};
use crate::ui::web::templates;

const HIDDEN: &str = "d-none";
const SHOWN: &str = "d-block";

#[derive(Debug, Clone)]
pub(crate) struct HtmlPage {
    cover_api_url: String,
    search_input: String,
    results_list: String,
    book_details: String,
    loading_visible: bool,
    hint_visible: bool,
}

impl HtmlPage {
    pub(crate) fn new(cover_api_url: impl Into<String>) -> Self {
        Self {
            cover_api_url: cover_api_url.into(),
            search_input: String::new(),
            results_list: String::new(),
            book_details: String::new(),
            loading_visible: false,
            hint_visible: false,
        }
    }

    /// 输入框里回显的内容（原始文本，渲染时转义）。
    pub(crate) fn set_search_input(&mut self, raw: &str) {
        self.search_input = raw.to_string();
    }

    #[cfg(test)]
    pub(crate) fn results_list(&self) -> &str {
        &self.results_list
    }

    #[cfg(test)]
    pub(crate) fn book_details(&self) -> &str {
        &self.book_details
    }

    pub(crate) fn loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub(crate) fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub(crate) fn render_document(&self) -> String {
        let visibility = |shown: bool| if shown { SHOWN } else { HIDDEN };
        let search_value = escape_html(&self.search_input);
        fill_template(
            templates::INDEX_HTML,
            &[
                ("SEARCH_VALUE", search_value.as_str()),
                ("HINT_CLASS", visibility(self.hint_visible)),
                ("LOADING_CLASS", visibility(self.loading_visible)),
                ("RESULTS", self.results_list.as_str()),
                ("DETAILS", self.book_details.as_str()),
            ],
        )
    }
}

impl SearchView for HtmlPage {
    fn toggle_hint(&mut self, visible: bool) {
        self.hint_visible = visible;
    }

    fn toggle_loading(&mut self, visible: bool) {
        self.loading_visible = visible;
    }

    fn render_list(&mut self, list: ListView<'_>) {
        self.results_list = match list {
            ListView::Results(books) => render::render_results(books),
            ListView::NoResults => render::render_no_results(),
            ListView::Error => render::render_error(),
        };
    }

    fn render_detail(&mut self, book: &BookRecord) {
        self.book_details = render::render_book_details(book, &self.cover_api_url);
    }
}

/// 单遍替换 `{{KEY}}`；已插入的内容不会再次参与替换。未知占位符原样保留。
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book_search::client::DEFAULT_COVER_API_URL;

    #[test]
    fn template_fill_is_single_pass() {
        let out = fill_template("<a>{{X}}</a><b>{{Y}}</b>{{Z}}", &[("X", "{{Y}}"), ("Y", "y")]);
        assert_eq!(out, "<a>{{Y}}</a><b>y</b>{{Z}}");
    }

    #[test]
    fn document_reflects_toggles() {
        let mut page = HtmlPage::new(DEFAULT_COVER_API_URL);
        page.toggle_hint(true);
        let html = page.render_document();
        assert!(html.contains(r#"id="emptyTextAlert" class="alert alert-warning d-block""#));
        assert!(html.contains(r#"id="loadingSpinner" class="spinner d-none""#));

        page.toggle_hint(false);
        page.toggle_loading(true);
        let html = page.render_document();
        assert!(html.contains("alert-warning d-none"));
        assert!(html.contains(r#"class="spinner d-block""#));
    }

    #[test]
    fn search_value_is_escaped() {
        let mut page = HtmlPage::new(DEFAULT_COVER_API_URL);
        page.set_search_input(r#""><script>x</script>"#);
        let html = page.render_document();
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;x&lt;/script&gt;""#));
    }

    #[test]
    fn list_and_detail_land_in_their_containers() {
        let mut page = HtmlPage::new(DEFAULT_COVER_API_URL);
        let book = BookRecord {
            title: "Dune".to_string(),
            cover_i: Some(12345),
            ..Default::default()
        };
        page.render_list(ListView::Results(std::slice::from_ref(&book)));
        page.render_detail(&book);

        assert!(page.results_list().contains("card-title"));
        assert!(page.book_details().contains("/12345-L.jpg"));

        let html = page.render_document();
        let results_at = html.find(r#"id="resultsList""#).expect("results container");
        let details_at = html.find(r#"id="bookDetails""#).expect("details container");
        let card_at = html.find("card-title").expect("card");
        let img_at = html.find("12345-L.jpg").expect("cover");
        assert!(results_at < card_at && card_at < details_at && details_at < img_at);

        page.render_list(ListView::Error);
        assert!(page.results_list().contains("Error fetching data"));
        assert!(!page.results_list().contains("card-title"));
    }
}
