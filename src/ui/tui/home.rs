//! TUI 首页：搜索框、提示、结果列表、详情、状态与日志。

use super::*;

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::book_search::html_utils::format_authors;
use crate::book_search::render::ERROR_TEXT;

const HINT_TEXT: &str = "Please enter a book title to search.";

pub(super) fn handle_event_home(app: &mut App, event: Event) {
    match event {
        Event::Paste(s) => {
            if app.focus == Focus::Input {
                app.input.push_str(&s);
            }
        }
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.should_quit = true;
                return;
            }
            match app.focus {
                Focus::Input => match key.code {
                    KeyCode::Enter => submit_search(app),
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Esc => app.input.clear(),
                    KeyCode::Tab => {
                        if !app.view().books().is_empty() {
                            app.focus = Focus::Results;
                        }
                    }
                    KeyCode::Char(c)
                        if !key.modifiers.contains(KeyModifiers::CONTROL)
                            && !key.modifiers.contains(KeyModifiers::ALT) =>
                    {
                        app.input.push(c);
                    }
                    _ => {}
                },
                Focus::Results => match key.code {
                    KeyCode::Up => app.select_prev(),
                    KeyCode::Down => app.select_next(),
                    KeyCode::Enter => view_selected_details(app),
                    KeyCode::Tab | KeyCode::Esc => app.focus = Focus::Input,
                    KeyCode::Char('q') => app.should_quit = true,
                    _ => {}
                },
            }
        }
        _ => {}
    }
}

fn split_with_log(area: Rect) -> (Rect, Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(LOG_HEIGHT.max(4)),
            Constraint::Length(LOG_HEIGHT),
        ])
        .split(area);
    let main = layout.first().copied().unwrap_or(area);
    let log = layout.get(1).copied().unwrap_or(Rect {
        x: area.x,
        y: area
            .y
            .saturating_add(area.height.saturating_sub(LOG_HEIGHT)),
        width: area.width,
        height: LOG_HEIGHT,
    });
    (main, log)
}

fn focus_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn list_items(app: &App) -> Vec<ListItem<'static>> {
    let view = app.view();
    if let Some(text) = view.list.placeholder() {
        let color = if text == ERROR_TEXT { Color::Red } else { Color::Gray };
        return vec![ListItem::new(Span::styled(text, Style::default().fg(color)))];
    }
    view.books()
        .iter()
        .map(|b| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    b.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!(
                    "  Author: {}",
                    format_authors(b.author_name.as_deref())
                )),
            ])
        })
        .collect()
}

fn label(name: &'static str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {value}")),
    ])
}

fn detail_lines(app: &App) -> Vec<Line<'static>> {
    let Some(detail) = app.view().detail.as_ref() else {
        return vec![Line::from(Span::styled(
            "Select a book and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))];
    };

    let mut lines = vec![Line::from(Span::styled(
        detail.title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(cover) = detail.cover.as_ref() {
        lines.push(label("Cover:", cover));
    }
    lines.push(Line::from(""));
    lines.push(label("Author:", &detail.authors));
    lines.push(label("First Published:", &detail.year));
    lines.push(label("Subjects:", &detail.subjects));
    lines
}

pub(super) fn draw_home(frame: &mut ratatui::Frame, app: &mut App) {
    let (main, log_area) = split_with_log(frame.size());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(main);

    let input = Paragraph::new(format!("> {}", app.input))
        .style(focus_style(app.focus == Focus::Input))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search books (Enter 搜索, Tab 切换)"),
        );
    frame.render_widget(input, layout[0]);

    let hint = if app.view().hint_visible {
        Line::from(Span::styled(HINT_TEXT, Style::default().fg(Color::Red)))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(hint), layout[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[2]);

    let list = List::new(list_items(app))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::Results))
                .title("Results (上下选择, Enter 详情)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, body[0], &mut app.list_state);

    let details = Paragraph::new(detail_lines(app))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    frame.render_widget(details, body[1]);

    let status_style = if app.view().loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let status = Paragraph::new(Line::from(Span::styled(app.status.clone(), status_style)))
        .block(Block::default().borders(Borders::ALL).title("状态"));
    frame.render_widget(status, layout[3]);

    render_log_box(frame, log_area, app);
}

fn render_log_box(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    if app.logs.is_empty() {
        lines.push(Line::from("日志: 暂无"));
    } else {
        let visible = area.height.saturating_sub(2).max(1) as usize;
        lines.extend(
            app.logs
                .iter()
                .rev()
                .take(visible)
                .rev()
                .map(|m| style_log_line(m)),
        );
    }

    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("日志"));
    frame.render_widget(log, area);
}

/// 广播层的行格式为 `LEVEL message`（无时间、无 target）。
fn style_log_line(line: &str) -> Line<'static> {
    let trimmed = line.trim_start();
    let (level_raw, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let level = level_raw.to_ascii_uppercase();

    let color = match level.as_str() {
        "ERROR" => Color::Red,
        "WARN" => Color::Yellow,
        "INFO" => Color::Cyan,
        "DEBUG" | "TRACE" => Color::Gray,
        _ => return Line::from(trimmed.to_string()),
    };

    Line::from(vec![
        Span::styled(level, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::raw(rest.trim_start().to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    use crate::book_search::client::DEFAULT_COVER_API_URL;
    use crate::book_search::{SearchError, SearchQuery, SearchResponse};

    struct NeverBackend;

    impl SearchBackend for NeverBackend {
        fn search(&self, _query: &SearchQuery) -> Result<SearchResponse, SearchError> {
            Err(SearchError::Status(503))
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_and_quitting() {
        let mut app = App::new(Arc::new(NeverBackend), DEFAULT_COVER_API_URL);
        for c in "Dq".chars() {
            handle_event_home(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.input, "Dq");
        assert!(!app.should_quit);

        handle_event_home(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input, "D");

        // 没有结果时 Tab 不会切到列表
        handle_event_home(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Input);

        handle_event_home(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn log_line_levels() {
        let line = style_log_line(" WARN slow response");
        assert_eq!(line.spans[0].content, "WARN");
        assert_eq!(line.spans[2].content, "slow response");

        let plain = style_log_line("no level here");
        assert_eq!(plain.spans.len(), 1);
    }
}
