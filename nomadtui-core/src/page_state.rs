//! Per-page state: rows, filter, viewport and load status.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::NavigationContext;
use crate::error::{LoadError, RowError, SaveError};
use crate::filter::FilterBox;
use crate::input::{Action, Key, action_for};
use crate::message::RequestId;
use crate::page::Page;
use crate::row::{PageData, Row};
use crate::viewport::{Viewport, ViewportEvent};

/// Rows the filter line occupies above the viewport.
pub const FILTER_HEIGHT: usize = 1;

#[derive(Clone, Debug)]
pub struct PageState {
    page: Page,
    header: String,
    raw_rows: Vec<Row>,
    filtered_rows: Vec<Row>,
    viewport: Viewport,
    filter: FilterBox,
    loading: bool,
    loaded: bool,
    error: Option<LoadError>,
    latest_request: Option<RequestId>,
}

impl PageState {
    pub fn new(page: Page, width: usize, height: usize) -> Self {
        Self {
            page,
            header: String::new(),
            raw_rows: Vec::new(),
            filtered_rows: Vec::new(),
            viewport: Viewport::new(
                width,
                height.saturating_sub(FILTER_HEIGHT),
                page.cursor_enabled(),
            ),
            filter: FilterBox::new(page.filter_prefix(&NavigationContext::default())),
            loading: false,
            loaded: false,
            error: None,
            latest_request: None,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn filter(&self) -> &FilterBox {
        &self.filter
    }

    pub fn raw_rows(&self) -> &[Row] {
        &self.raw_rows
    }

    pub fn filtered_rows(&self) -> &[Row] {
        &self.filtered_rows
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// True once any load for this page has succeeded.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn set_window_size(&mut self, width: usize, height: usize) {
        self.viewport
            .set_size(width, height.saturating_sub(FILTER_HEIGHT));
    }

    pub fn set_filter_prefix(&mut self, prefix: impl Into<String>) {
        self.filter.set_prefix(prefix);
    }

    // ---------- load lifecycle ----------

    /// Marks a load as in flight. Only a result carrying `request` will be applied.
    pub fn begin_load(&mut self, request: RequestId) {
        self.loading = true;
        self.latest_request = Some(request);
    }

    /// Applies a load result. Returns false when the result belongs to a
    /// superseded request and was dropped.
    pub fn finish_load(&mut self, request: RequestId, result: Result<PageData, LoadError>) -> bool {
        if self.latest_request != Some(request) {
            debug!(page = %self.page, request, latest = ?self.latest_request, "dropping stale load result");
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.error = None;
                self.loaded = true;
                self.set_data(data);
            }
            Err(e) => {
                warn!(page = %self.page, error = %e, "load failed");
                self.error = Some(e);
            }
        }
        true
    }

    /// Replaces the raw rows and rebuilds the filtered view.
    pub fn set_data(&mut self, data: PageData) {
        self.header = data.header;
        self.raw_rows = data.rows;
        self.refilter();
    }

    // ---------- filtering ----------

    fn refilter(&mut self) {
        let filter = self.filter.text();
        self.filtered_rows = self
            .raw_rows
            .iter()
            .filter(|r| r.matches_filter(filter))
            .cloned()
            .collect();
        self.viewport.set_highlight(filter);
        self.viewport.set_content(
            self.header.clone(),
            self.filtered_rows.iter().map(|r| r.display.clone()).collect(),
        );
        self.viewport.set_cursor_row(0);
    }

    pub fn clear_filter(&mut self) {
        self.filter.blur_and_clear();
        self.refilter();
    }

    // ---------- selection ----------

    pub fn selected_row(&self) -> Result<&Row, RowError> {
        self.viewport
            .cursor()
            .and_then(|i| self.filtered_rows.get(i))
            .ok_or(RowError::NoRows)
    }

    pub fn set_selection_to_bottom(&mut self) {
        self.viewport.set_selection_to_bottom();
    }

    // ---------- input ----------

    /// Handles a key the controller did not consume: save prompt first, then
    /// the filter box, then filter focus, save entry and scrolling.
    pub fn handle_key(&mut self, key: Key) {
        if self.viewport.saving() {
            self.handle_viewport_key(key);
            return;
        }
        if self.filter.focused() {
            if self.filter.handle_key(key) {
                self.refilter();
            }
            return;
        }
        if action_for(key) == Some(Action::Filter) {
            self.viewport.hide_toast();
            self.filter.focus();
            return;
        }
        self.handle_viewport_key(key);
    }

    fn handle_viewport_key(&mut self, key: Key) {
        if let ViewportEvent::SaveRequested(name) = self.viewport.handle_key(key) {
            let result = self.save_to(&name);
            match &result {
                Ok(path) => debug!(page = %self.page, path = %path.display(), "saved page content"),
                Err(e) => warn!(page = %self.page, error = %e, "save failed"),
            }
            self.viewport
                .finish_save(result.as_ref().map(PathBuf::as_path));
        }
    }

    // ---------- save ----------

    /// Full unfiltered content: the header line, then every raw row.
    pub fn saved_text(&self) -> String {
        let mut out = String::new();
        if !self.header.is_empty() {
            out.push_str(&self.header);
            out.push('\n');
        }
        for row in &self.raw_rows {
            out.push_str(&row.display);
            out.push('\n');
        }
        out
    }

    pub fn save_to(&self, name: &str) -> Result<PathBuf, SaveError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SaveError::EmptyPath);
        }
        let path = expand_home(name);
        std::fs::write(&path, self.saved_text()).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(name: &str) -> PathBuf {
    match (name.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(name).to_path_buf(),
    }
}
