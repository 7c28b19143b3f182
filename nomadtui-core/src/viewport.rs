//! Scrollable text display with an optional row cursor, substring highlight
//! and a save-to-file prompt.

use std::path::Path;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::SaveError;
use crate::input::{Action, Key, ViewportAction, action_for, viewport_action_for};

/// How the renderer should colour the viewport content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentStyle {
    #[default]
    Plain,
    StdErr,
}

/// Filename prompt shown while the viewport is in save sub-mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SavePrompt {
    pub filename: String,
    pub error: Option<String>,
}

/// What a key press inside the viewport asks its owner to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewportEvent {
    None,
    /// The operator confirmed the save prompt with this destination.
    SaveRequested(String),
}

#[derive(Clone, Debug)]
pub struct Viewport {
    header: String,
    lines: Vec<String>,
    content_width: usize,
    width: usize,
    height: usize,
    y_offset: usize,
    x_offset: usize,
    cursor: usize,
    cursor_enabled: bool,
    highlight: String,
    style: ContentStyle,
    save: Option<SavePrompt>,
    toast: Option<String>,
}

impl Viewport {
    pub fn new(width: usize, height: usize, cursor_enabled: bool) -> Self {
        Self {
            header: String::new(),
            lines: Vec::new(),
            content_width: 0,
            width,
            height,
            y_offset: 0,
            x_offset: 0,
            cursor: 0,
            cursor_enabled,
            highlight: String::new(),
            style: ContentStyle::Plain,
            save: None,
            toast: None,
        }
    }

    // ---------- content ----------

    /// Replaces all content. Offsets go back to the origin; the cursor is kept
    /// but clamped into the new range.
    pub fn set_content(&mut self, header: impl Into<String>, lines: Vec<String>) {
        self.header = header.into();
        self.lines = lines;
        self.content_width = std::iter::once(&self.header)
            .chain(self.lines.iter())
            .map(|l| l.width())
            .max()
            .unwrap_or(0);
        self.y_offset = 0;
        self.x_offset = 0;
        self.cursor = self.cursor.min(self.lines.len().saturating_sub(1));
        self.scroll_to_cursor();
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn set_highlight(&mut self, term: impl Into<String>) {
        self.highlight = term.into();
    }

    pub fn highlight(&self) -> &str {
        &self.highlight
    }

    pub fn set_style(&mut self, style: ContentStyle) {
        self.style = style;
    }

    pub fn style(&self) -> ContentStyle {
        self.style
    }

    // ---------- geometry ----------

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.clamp_offsets();
        self.scroll_to_cursor();
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn x_offset(&self) -> usize {
        self.x_offset
    }

    fn header_rows(&self) -> usize {
        usize::from(!self.header.is_empty())
    }

    fn footer_rows(&self) -> usize {
        usize::from(self.save.is_some() || self.toast.is_some())
    }

    /// Rows available for body lines once header and footer are drawn.
    pub fn content_height(&self) -> usize {
        self.height
            .saturating_sub(self.header_rows() + self.footer_rows())
            .max(1)
    }

    fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.content_height())
    }

    fn max_x_offset(&self) -> usize {
        self.content_width.saturating_sub(self.width)
    }

    fn clamp_offsets(&mut self) {
        self.y_offset = self.y_offset.min(self.max_y_offset());
        self.x_offset = self.x_offset.min(self.max_x_offset());
    }

    /// Body lines currently on screen, paired with their index into [`Viewport::lines`].
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .skip(self.y_offset)
            .take(self.content_height())
            .map(|(i, l)| (i, l.as_str()))
    }

    // ---------- cursor ----------

    pub fn cursor_enabled(&self) -> bool {
        self.cursor_enabled
    }

    /// Index of the selected body line, if this viewport selects and has lines.
    pub fn cursor(&self) -> Option<usize> {
        (self.cursor_enabled && !self.lines.is_empty()).then_some(self.cursor)
    }

    pub fn set_cursor_row(&mut self, row: usize) {
        self.cursor = row.min(self.lines.len().saturating_sub(1));
        self.scroll_to_cursor();
    }

    /// Selects the last line and scrolls it into view.
    pub fn set_selection_to_bottom(&mut self) {
        self.set_cursor_row(self.lines.len().saturating_sub(1));
        self.y_offset = self.max_y_offset();
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.lines.is_empty() {
            return;
        }
        let target = self.cursor.saturating_add_signed(delta);
        self.set_cursor_row(target);
    }

    fn scroll_to_cursor(&mut self) {
        if !self.cursor_enabled || self.lines.is_empty() {
            return;
        }
        let height = self.content_height();
        if self.cursor < self.y_offset {
            self.y_offset = self.cursor;
        } else if self.cursor >= self.y_offset + height {
            self.y_offset = self.cursor + 1 - height;
        }
    }

    // ---------- scrolling ----------

    fn scroll_by(&mut self, delta: isize) {
        self.y_offset = self
            .y_offset
            .saturating_add_signed(delta)
            .min(self.max_y_offset());
    }

    fn scroll_x_by(&mut self, delta: isize) {
        self.x_offset = self
            .x_offset
            .saturating_add_signed(delta)
            .min(self.max_x_offset());
    }

    fn vertical(&mut self, delta: isize) {
        if self.cursor_enabled {
            self.move_cursor(delta);
        } else {
            self.scroll_by(delta);
        }
    }

    pub fn apply(&mut self, action: ViewportAction) {
        let page = self.content_height() as isize;
        let half = (page / 2).max(1);
        let step_x = (self.width / 4).max(1) as isize;
        match action {
            ViewportAction::LineUp => self.vertical(-1),
            ViewportAction::LineDown => self.vertical(1),
            ViewportAction::HalfPageUp => self.vertical(-half),
            ViewportAction::HalfPageDown => self.vertical(half),
            ViewportAction::PageUp => self.vertical(-page),
            ViewportAction::PageDown => self.vertical(page),
            ViewportAction::Top => {
                if self.cursor_enabled {
                    self.set_cursor_row(0);
                }
                self.y_offset = 0;
            }
            ViewportAction::Bottom => {
                if self.cursor_enabled {
                    self.set_cursor_row(self.lines.len().saturating_sub(1));
                }
                self.y_offset = self.max_y_offset();
            }
            ViewportAction::Left => self.scroll_x_by(-step_x),
            ViewportAction::Right => self.scroll_x_by(step_x),
        }
    }

    // ---------- save sub-mode ----------

    pub fn saving(&self) -> bool {
        self.save.is_some()
    }

    pub fn save_prompt(&self) -> Option<&SavePrompt> {
        self.save.as_ref()
    }

    pub fn start_save(&mut self) {
        self.toast = None;
        self.save = Some(SavePrompt::default());
        self.clamp_offsets();
        self.scroll_to_cursor();
    }

    /// Records the outcome of a save the owner performed for us. Success leaves
    /// save sub-mode with a toast; failure stays in it so the operator can retry.
    pub fn finish_save(&mut self, result: Result<&Path, &SaveError>) {
        match result {
            Ok(path) => {
                self.save = None;
                self.toast = Some(format!("Saved to {}", path.display()));
            }
            Err(e) => {
                if let Some(prompt) = self.save.as_mut() {
                    prompt.error = Some(e.to_string());
                }
            }
        }
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    pub fn hide_toast(&mut self) {
        self.toast = None;
        self.clamp_offsets();
    }

    // ---------- input ----------

    pub fn handle_key(&mut self, key: Key) -> ViewportEvent {
        if let Some(prompt) = self.save.as_mut() {
            match key {
                Key::Char(c) => {
                    prompt.filename.push(c);
                    prompt.error = None;
                }
                Key::Backspace => {
                    prompt.filename.pop();
                    prompt.error = None;
                }
                Key::Esc => {
                    self.save = None;
                    self.clamp_offsets();
                }
                Key::Enter => return ViewportEvent::SaveRequested(prompt.filename.clone()),
                _ => {}
            }
            return ViewportEvent::None;
        }

        self.hide_toast();
        if action_for(key) == Some(Action::Save) {
            self.start_save();
        } else if let Some(action) = viewport_action_for(key) {
            self.apply(action);
        }
        ViewportEvent::None
    }
}

/// The part of `line` starting `x` terminal columns in, at most `width` columns
/// wide. A wide character cut by either edge is left out.
pub fn slice_columns(line: &str, x: usize, width: usize) -> &str {
    let mut chars = line.char_indices().peekable();
    let mut col = 0;
    while let Some(&(_, c)) = chars.peek() {
        if col >= x {
            break;
        }
        col += c.width().unwrap_or(0);
        chars.next();
    }
    let Some(&(start, _)) = chars.peek() else {
        return "";
    };

    let mut used = 0;
    let mut end = line.len();
    for (i, c) in chars {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            end = i;
            break;
        }
        used += w;
    }
    &line[start..end]
}

/// Byte ranges of every non-overlapping occurrence of `term` in `line`.
pub fn highlight_ranges(line: &str, term: &str) -> Vec<(usize, usize)> {
    if term.is_empty() {
        return Vec::new();
    }
    line.match_indices(term)
        .map(|(start, m)| (start, start + m.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    fn list_viewport(n: usize, height: usize) -> Viewport {
        let mut vp = Viewport::new(40, height, true);
        vp.set_content("", numbered(n));
        vp
    }

    #[test]
    fn test_cursor_moves_and_clamps() {
        let mut vp = list_viewport(3, 10);
        assert_eq!(vp.cursor(), Some(0));
        vp.apply(ViewportAction::LineUp);
        assert_eq!(vp.cursor(), Some(0));
        vp.apply(ViewportAction::LineDown);
        vp.apply(ViewportAction::LineDown);
        vp.apply(ViewportAction::LineDown);
        assert_eq!(vp.cursor(), Some(2));
    }

    #[test]
    fn test_cursor_autoscrolls() {
        let mut vp = list_viewport(20, 5);
        for _ in 0..7 {
            vp.apply(ViewportAction::LineDown);
        }
        assert_eq!(vp.cursor(), Some(7));
        assert_eq!(vp.y_offset(), 3);
        vp.apply(ViewportAction::Top);
        assert_eq!(vp.cursor(), Some(0));
        assert_eq!(vp.y_offset(), 0);
    }

    #[test]
    fn test_bottom_selects_last_line() {
        let mut vp = list_viewport(20, 5);
        vp.apply(ViewportAction::Bottom);
        assert_eq!(vp.cursor(), Some(19));
        assert_eq!(vp.y_offset(), 15);
        let visible: Vec<_> = vp.visible_lines().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_no_cursor_on_empty_content() {
        let vp = list_viewport(0, 5);
        assert_eq!(vp.cursor(), None);
    }

    #[test]
    fn test_detail_viewport_scrolls_without_cursor() {
        let mut vp = Viewport::new(40, 5, false);
        vp.set_content("", numbered(8));
        assert_eq!(vp.cursor(), None);
        vp.apply(ViewportAction::PageDown);
        assert_eq!(vp.y_offset(), 3);
        vp.apply(ViewportAction::LineUp);
        assert_eq!(vp.y_offset(), 2);
        vp.apply(ViewportAction::Top);
        assert_eq!(vp.y_offset(), 0);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut vp = Viewport::new(40, 10, false);
        vp.set_content("", numbered(3));
        vp.apply(ViewportAction::Bottom);
        assert_eq!(vp.y_offset(), 0);
    }

    #[test]
    fn test_set_content_resets_offsets_and_clamps_cursor() {
        let mut vp = Viewport::new(4, 5, true);
        vp.set_content("", numbered(20));
        vp.apply(ViewportAction::Bottom);
        vp.apply(ViewportAction::Right);
        assert!(vp.x_offset() > 0);
        vp.set_content("", numbered(4));
        assert_eq!(vp.y_offset(), 0);
        assert_eq!(vp.x_offset(), 0);
        assert_eq!(vp.cursor(), Some(3));
    }

    #[test]
    fn test_header_takes_a_row() {
        let mut vp = Viewport::new(40, 5, true);
        vp.set_content("ID  Status", numbered(10));
        assert_eq!(vp.content_height(), 4);
    }

    #[test]
    fn test_horizontal_scroll_clamped_to_widest_line() {
        let mut vp = Viewport::new(4, 5, false);
        vp.set_content("", vec!["0123456789".to_string()]);
        for _ in 0..10 {
            vp.apply(ViewportAction::Right);
        }
        assert_eq!(vp.x_offset(), 6);
        vp.apply(ViewportAction::Left);
        assert_eq!(vp.x_offset(), 5);
    }

    #[test]
    fn test_resize_keeps_cursor_visible() {
        let mut vp = list_viewport(20, 10);
        vp.set_cursor_row(9);
        vp.set_size(40, 4);
        assert_eq!(vp.cursor(), Some(9));
        assert!(vp.y_offset() <= 9 && 9 < vp.y_offset() + vp.content_height());
    }

    #[test]
    fn test_selection_to_bottom() {
        let mut vp = list_viewport(12, 5);
        vp.set_selection_to_bottom();
        assert_eq!(vp.cursor(), Some(11));
        assert_eq!(vp.y_offset(), 7);
    }

    #[test]
    fn test_save_mode_captures_keys() {
        let mut vp = list_viewport(5, 10);
        assert_eq!(vp.handle_key(Key::Ctrl('s')), ViewportEvent::None);
        assert!(vp.saving());
        for c in "out.txt".chars() {
            vp.handle_key(Key::Char(c));
        }
        vp.handle_key(Key::Down);
        assert_eq!(vp.cursor(), Some(0));
        assert_eq!(
            vp.handle_key(Key::Enter),
            ViewportEvent::SaveRequested("out.txt".to_string())
        );
        assert!(vp.saving());
    }

    #[test]
    fn test_save_cancel() {
        let mut vp = list_viewport(5, 10);
        vp.start_save();
        vp.handle_key(Key::Char('x'));
        vp.handle_key(Key::Esc);
        assert!(!vp.saving());
        assert!(vp.toast().is_none());
    }

    #[test]
    fn test_save_failure_stays_in_save_mode() {
        let mut vp = list_viewport(5, 10);
        vp.start_save();
        vp.finish_save(Err(&SaveError::EmptyPath));
        assert!(vp.saving());
        assert_eq!(
            vp.save_prompt().and_then(|p| p.error.as_deref()),
            Some("no filename given")
        );

        let path = PathBuf::from("/tmp/out.txt");
        vp.finish_save(Ok(path.as_path()));
        assert!(!vp.saving());
        assert_eq!(vp.toast(), Some("Saved to /tmp/out.txt"));
        vp.handle_key(Key::Down);
        assert!(vp.toast().is_none());
    }

    #[test]
    fn test_slice_columns() {
        assert_eq!(slice_columns("hello world", 6, 3), "wor");
        assert_eq!(slice_columns("hello", 3, 10), "lo");
        assert_eq!(slice_columns("hello", 9, 3), "");
        assert_eq!(slice_columns("héllo", 1, 2), "él");
    }

    #[test]
    fn test_slice_columns_counts_wide_characters_twice() {
        assert_eq!(slice_columns("日本語テキスト", 0, 4), "日本");
        assert_eq!(slice_columns("日本語テキスト", 2, 4), "本語");
        // The straddled half of a wide character is dropped.
        assert_eq!(slice_columns("日本語", 1, 4), "本語");
        assert_eq!(slice_columns("日本語", 0, 3), "日");
        assert_eq!(slice_columns("a日b", 0, 2), "a");
    }

    #[test]
    fn test_horizontal_limit_uses_display_width() {
        let mut vp = Viewport::new(4, 5, false);
        vp.set_content("", vec!["日本語テキスト".to_string()]);
        for _ in 0..20 {
            vp.apply(ViewportAction::Right);
        }
        assert_eq!(vp.x_offset(), 10);
    }

    #[test]
    fn test_hiding_toast_reclamps_scroll() {
        let mut vp = Viewport::new(40, 5, false);
        vp.set_content("", numbered(20));
        vp.start_save();
        vp.finish_save(Ok(Path::new("/tmp/out.txt")));
        vp.apply(ViewportAction::Bottom);
        assert_eq!(vp.y_offset(), 16);

        vp.handle_key(Key::Char('x'));
        assert!(vp.toast().is_none());
        assert_eq!(vp.y_offset(), 15);
        let visible: Vec<_> = vp.visible_lines().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_highlight_ranges() {
        assert_eq!(highlight_ranges("abcabc", "bc"), vec![(1, 3), (4, 6)]);
        assert_eq!(highlight_ranges("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert!(highlight_ranges("abc", "").is_empty());
        assert!(highlight_ranges("abc", "B").is_empty());
    }
}
