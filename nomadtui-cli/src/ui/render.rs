//! Frame layout: app header, filter line, then the active page's viewport.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use nomadtui_core::controller::{APP_HEADER_HEIGHT, NavigationController};
use nomadtui_core::page::Page;
use nomadtui_core::page_state::{FILTER_HEIGHT, PageState};
use nomadtui_core::viewport::{Viewport, highlight_ranges, slice_columns};
use unicode_width::UnicodeWidthStr;

use super::styles;

pub fn draw(f: &mut Frame, nav: &NavigationController, address: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(APP_HEADER_HEIGHT as u16),
            Constraint::Length(FILTER_HEIGHT as u16),
            Constraint::Min(0),
        ])
        .split(f.area());

    let state = nav.current_state();
    f.render_widget(
        Paragraph::new(header_lines(nav.current_page(), address)),
        chunks[0],
    );
    draw_filter_line(f, chunks[1], state);
    draw_viewport(f, chunks[2], state);
}

// ---------- header ----------

fn header_lines(page: Page, address: &str) -> Vec<Line<'static>> {
    let title = Line::from(vec![
        Span::styled(" nomadtui ", styles::logo()),
        Span::styled(address.to_string(), styles::text_dim()),
        Span::styled("  ·  ", styles::text_muted()),
        Span::styled(page.label(), styles::text()),
    ]);

    let mut help = vec![Span::raw(" ")];
    for (key, desc) in page.key_help() {
        help.push(Span::styled(*key, styles::key_hint()));
        help.push(Span::styled(format!(" {desc}  "), styles::text_dim()));
    }

    vec![title, Line::from(help)]
}

// ---------- filter line ----------

fn filter_line(state: &PageState) -> Line<'_> {
    let filter = state.filter();
    let focused = filter.focused();
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(filter.prefix(), styles::filter_prefix(focused)),
    ];
    if focused || filter.applied() {
        spans.push(Span::styled(" / ", styles::text_muted()));
        spans.push(Span::styled(filter.text(), styles::filter_text(focused)));
        if focused {
            spans.push(Span::styled("█", styles::filter_text(true)));
        }
    } else {
        spans.push(Span::styled("  (/ to filter)", styles::text_muted()));
    }
    Line::from(spans)
}

/// Load status shown at the right of the filter line.
fn status_span(state: &PageState) -> Option<Span<'static>> {
    if state.loading() && state.loaded() {
        return Some(Span::styled(state.page().reloading_text(), styles::warn()));
    }
    state
        .error()
        .map(|e| Span::styled(format!("Error: {e}"), styles::error()))
}

fn draw_filter_line(f: &mut Frame, area: Rect, state: &PageState) {
    let Some(status) = status_span(state) else {
        f.render_widget(Paragraph::new(filter_line(state)), area);
        return;
    };

    let status_width = u16::try_from(status.width())
        .unwrap_or(u16::MAX)
        .saturating_add(1)
        .min(area.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(status_width)])
        .split(area);
    f.render_widget(Paragraph::new(filter_line(state)), chunks[0]);
    f.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Right),
        chunks[1],
    );
}

// ---------- viewport ----------

fn draw_viewport(f: &mut Frame, area: Rect, state: &PageState) {
    let vp = state.viewport();
    let footer = footer_line(vp);
    let footer_height = u16::from(footer.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
        .split(area);

    f.render_widget(Paragraph::new(body_lines(state)), chunks[0]);
    if let Some(footer) = footer {
        f.render_widget(Paragraph::new(footer), chunks[1]);
    }
}

fn body_lines(state: &PageState) -> Vec<Line<'_>> {
    if state.loading() && !state.loaded() {
        return vec![Line::styled(
            format!(" {}", state.page().loading_text()),
            styles::text_muted(),
        )];
    }

    let vp = state.viewport();
    let (x, width) = (vp.x_offset(), vp.width());
    let mut lines = Vec::with_capacity(vp.height());

    if !vp.header().is_empty() {
        lines.push(Line::styled(
            slice_columns(vp.header(), x, width),
            styles::column_header(),
        ));
    }

    if vp.lines().is_empty() && state.loaded() {
        let empty = if state.filter().applied() {
            "No rows match the filter"
        } else {
            "No results"
        };
        lines.push(Line::styled(empty, styles::text_muted()));
        return lines;
    }

    let base = styles::content(vp.style());
    let cursor = vp.cursor();
    for (idx, text) in vp.visible_lines() {
        let visible = slice_columns(text, x, width);
        let style = if cursor == Some(idx) {
            base.patch(styles::selection())
        } else {
            base
        };
        let mut spans = highlighted_spans(visible, vp.highlight(), style);
        if cursor == Some(idx) {
            let used = UnicodeWidthStr::width(visible);
            if used < width {
                spans.push(Span::styled(" ".repeat(width - used), style));
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Splits `text` so every occurrence of `term` carries the match style.
fn highlighted_spans<'a>(text: &'a str, term: &str, base: Style) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut last = 0;
    for (start, end) in highlight_ranges(text, term) {
        if start > last {
            spans.push(Span::styled(&text[last..start], base));
        }
        spans.push(Span::styled(
            &text[start..end],
            base.patch(styles::highlight()),
        ));
        last = end;
    }
    if last < text.len() || spans.is_empty() {
        spans.push(Span::styled(&text[last..], base));
    }
    spans
}

fn footer_line(vp: &Viewport) -> Option<Line<'_>> {
    if let Some(prompt) = vp.save_prompt() {
        let mut spans = vec![
            Span::styled(" Save as: ", styles::filter_prefix(true)),
            Span::styled(prompt.filename.as_str(), styles::text()),
            Span::styled("█", styles::text_dim()),
        ];
        if let Some(err) = &prompt.error {
            spans.push(Span::styled(format!("  {err}"), styles::error()));
        }
        spans.push(Span::styled(
            "  (enter to save, esc to cancel)",
            styles::text_muted(),
        ));
        return Some(Line::from(spans));
    }
    vp.toast()
        .map(|toast| Line::styled(format!(" {toast}"), styles::success()))
}

#[cfg(test)]
mod tests {
    use nomadtui_core::error::LoadError;
    use nomadtui_core::input::Key;
    use nomadtui_core::row::{PageData, Row};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn jobs_state() -> PageState {
        let mut state = PageState::new(Page::Jobs, 40, 10);
        state.begin_load(1);
        state.finish_load(
            1,
            Ok(PageData::new(
                "ID   Status",
                vec![
                    Row::keyed("web  running", "web", "default"),
                    Row::keyed("api  dead", "api", "default"),
                ],
            )),
        );
        state
    }

    #[test]
    fn test_highlighted_spans() {
        let base = Style::default();
        let spans = highlighted_spans("a-web-b-web", "web", base);
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["a-", "web", "-b-", "web"]);
        assert_eq!(spans[1].style, base.patch(styles::highlight()));

        let plain = highlighted_spans("nothing", "", base);
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].content, "nothing");

        let empty = highlighted_spans("", "x", base);
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_header_shows_page_key_help() {
        let lines = header_lines(Page::Logs, "http://nomad:4646");
        assert!(line_text(&lines[0]).contains("http://nomad:4646"));
        let help = line_text(&lines[1]);
        assert!(help.contains("o stdout"));
        assert!(help.contains("e stderr"));
    }

    #[test]
    fn test_body_shows_loading_text_before_first_load() {
        let mut state = PageState::new(Page::Jobs, 40, 10);
        state.begin_load(1);
        let lines = body_lines(&state);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]).trim(), Page::Jobs.loading_text());
    }

    #[test]
    fn test_body_keeps_rows_while_reloading() {
        let mut state = jobs_state();
        state.begin_load(2);
        let lines = body_lines(&state);
        assert_eq!(line_text(&lines[0]), "ID   Status");
        assert!(line_text(&lines[1]).starts_with("web  running"));
        let status = status_span(&state).map(|s| s.content.into_owned());
        assert_eq!(status, Some(Page::Jobs.reloading_text()));
    }

    #[test]
    fn test_body_pads_selected_row_to_width() {
        let state = jobs_state();
        let lines = body_lines(&state);
        assert_eq!(line_text(&lines[1]).width(), 40);
        assert_eq!(line_text(&lines[2]), "api  dead");
    }

    #[test]
    fn test_body_pads_wide_selected_row_by_columns() {
        let mut state = PageState::new(Page::Jobs, 10, 10);
        state.begin_load(1);
        state.finish_load(
            1,
            Ok(PageData::new("", vec![Row::keyed("日本語", "web", "default")])),
        );
        let lines = body_lines(&state);
        assert_eq!(line_text(&lines[0]).width(), 10);
        assert_eq!(line_text(&lines[0]), "日本語    ");
    }

    #[test]
    fn test_long_error_fits_filter_line() {
        let mut state = PageState::new(Page::Jobs, 20, 10);
        state.begin_load(1);
        state.finish_load(
            1,
            Err(LoadError::Status {
                code: 500,
                body: "x".repeat(70_000),
            }),
        );
        let mut terminal = Terminal::new(TestBackend::new(20, 1)).unwrap();
        terminal
            .draw(|f| draw_filter_line(f, f.area(), &state))
            .unwrap();
        let row: String = (0..20)
            .map(|x| terminal.backend().buffer()[(x, 0)].symbol().to_string())
            .collect();
        assert!(!row.contains("Jobs"));
        assert_eq!(row.trim().len(), 20);
    }

    #[test]
    fn test_body_reports_empty_filter_result() {
        let mut state = jobs_state();
        state.handle_key(Key::Char('/'));
        state.handle_key(Key::Char('z'));
        let lines = body_lines(&state);
        assert_eq!(line_text(&lines[1]), "No rows match the filter");
        assert!(line_text(&filter_line(&state)).contains("/ z"));
    }

    #[test]
    fn test_status_shows_error() {
        let mut state = PageState::new(Page::Jobs, 40, 10);
        state.begin_load(1);
        state.finish_load(1, Err(LoadError::Transport("connection refused".into())));
        let status = status_span(&state).map(|s| s.content.into_owned());
        assert!(status.is_some_and(|s| s.contains("connection refused")));
    }

    #[test]
    fn test_footer_shows_save_prompt() {
        let mut state = jobs_state();
        state.handle_key(Key::Ctrl('s'));
        state.handle_key(Key::Char('o'));
        let footer = footer_line(state.viewport()).map(|l| line_text(&l));
        assert!(footer.is_some_and(|f| f.contains("Save as: o")));
    }
}
