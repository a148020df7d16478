pub(crate) const INDEX_HTML: &str = include_str!("templates/index.html");
pub(crate) const APP_CSS: &str = include_str!("templates/app.css");
