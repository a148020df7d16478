//! 文本转义与展示用的兜底格式化。

// ── HTML 转义 ───────────────────────────────────────────────────

/// 转义 `& < > " '`，结果可同时用于元素文本与属性值。
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ── 兜底格式化 ──────────────────────────────────────────────────

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NOT_AVAILABLE: &str = "N/A";

fn join_or(list: Option<&[String]>, fallback: &str) -> String {
    match list {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => fallback.to_string(),
    }
}

pub fn format_authors(authors: Option<&[String]>) -> String {
    join_or(authors, UNKNOWN_AUTHOR)
}

pub fn format_subjects(subjects: Option<&[String]>) -> String {
    join_or(subjects, NOT_AVAILABLE)
}

/// 0 年与缺失同样显示 `N/A`。
pub fn format_year(year: Option<i32>) -> String {
    match year {
        Some(y) if y != 0 => y.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
