//! Top-level dispatcher: routes messages, owns every page's state and decides
//! page transitions.

use tracing::debug;

use crate::context::{LogType, NavigationContext};
use crate::error::TransitionError;
use crate::input::{Action, Key, action_for};
use crate::message::{LoadCommand, LoadRequest, Message, RequestId};
use crate::page::Page;
use crate::page_state::PageState;
use crate::registry::PageRegistry;
use crate::row::split_key;
use crate::viewport::ContentStyle;

/// Terminal rows taken by the app header above every page.
pub const APP_HEADER_HEIGHT: usize = 2;

/// Side effects the event loop must carry out after an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Load(LoadCommand),
    Exit,
}

pub struct NavigationController {
    ctx: NavigationContext,
    registry: PageRegistry,
    next_request_id: RequestId,
    width: usize,
    height: usize,
}

impl NavigationController {
    /// Builds every page sized to the initial window. Nothing is loaded until [`Self::init`].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            ctx: NavigationContext::default(),
            registry: PageRegistry::new(width, page_height(height)),
            next_request_id: 1,
            width,
            height,
        }
    }

    /// Enters the first page and returns its load.
    pub fn init(&mut self) -> Vec<Effect> {
        self.navigate(Page::Jobs)
    }

    pub fn current_page(&self) -> Page {
        self.ctx.page
    }

    pub fn context(&self) -> &NavigationContext {
        &self.ctx
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    pub fn current_state(&self) -> &PageState {
        self.registry.get(self.ctx.page)
    }

    fn current_state_mut(&mut self) -> &mut PageState {
        self.registry.get_mut(self.ctx.page)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn update(&mut self, msg: Message) -> Vec<Effect> {
        match msg {
            Message::Key(key) => self.handle_key(key),
            Message::Resize { width, height } => {
                self.resize(width, height);
                Vec::new()
            }
            Message::LoadResult {
                page,
                request_id,
                result,
            } => {
                let succeeded = result.is_ok();
                let state = self.registry.get_mut(page);
                if state.finish_load(request_id, result) {
                    debug!(%page, request_id, succeeded, "applied load result");
                    if succeeded && page == Page::Logs {
                        state.set_selection_to_bottom();
                    }
                }
                Vec::new()
            }
        }
    }

    // ---------- keys ----------

    fn handle_key(&mut self, key: Key) -> Vec<Effect> {
        let action = action_for(key);
        let state = self.current_state();
        let capturing = state.filter().focused() || state.viewport().saving();

        match action {
            Some(Action::ForceExit) => return vec![Effect::Exit],
            Some(Action::Exit) if !capturing => return vec![Effect::Exit],
            _ => {}
        }

        if !capturing {
            let page = self.ctx.page;
            match action {
                Some(Action::Forward) if page.cursor_enabled() => return self.forward(),
                Some(Action::Back) => return self.back(),
                Some(Action::Reload) if page.loads() => {
                    return vec![self.issue_load(page)];
                }
                Some(Action::Spec) if page.spec_jump().is_some() => return self.spec(),
                Some(Action::StdOut) if page == Page::Logs => {
                    return self.switch_log_type(LogType::StdOut);
                }
                Some(Action::StdErr) if page == Page::Logs => {
                    return self.switch_log_type(LogType::StdErr);
                }
                _ => {}
            }
        }

        self.current_state_mut().handle_key(key);
        Vec::new()
    }

    fn forward(&mut self) -> Vec<Effect> {
        let page = self.ctx.page;
        if let Err(e) = self.resolve_selection() {
            debug!(%page, error = %e, "forward ignored");
            return Vec::new();
        }
        match page.forward() {
            Some(next) => self.navigate(next),
            None => Vec::new(),
        }
    }

    fn spec(&mut self) -> Vec<Effect> {
        let page = self.ctx.page;
        let Some(target) = page.spec_jump() else {
            return Vec::new();
        };
        if let Err(e) = self.resolve_selection() {
            debug!(%page, error = %e, "spec jump ignored");
            return Vec::new();
        }
        self.navigate(target)
    }

    fn back(&mut self) -> Vec<Effect> {
        if self.current_state().filter().applied() {
            self.current_state_mut().clear_filter();
            return Vec::new();
        }
        match self.ctx.page.backward() {
            Some(prev) => self.navigate(prev),
            None => Vec::new(),
        }
    }

    fn switch_log_type(&mut self, log_type: LogType) -> Vec<Effect> {
        if self.current_state().loading() || self.ctx.log_type == log_type {
            return Vec::new();
        }
        self.ctx.log_type = log_type;
        let style = match log_type {
            LogType::StdOut => ContentStyle::Plain,
            LogType::StdErr => ContentStyle::StdErr,
        };
        let prefix = Page::Logs.filter_prefix(&self.ctx);
        let state = self.registry.get_mut(Page::Logs);
        state.viewport_mut().set_style(style);
        state.set_filter_prefix(prefix);
        vec![self.issue_load(Page::Logs)]
    }

    /// Copies the identifiers behind the selected row into the navigation context.
    fn resolve_selection(&mut self) -> Result<(), TransitionError> {
        let page = self.ctx.page;
        let row = self.registry.get(page).selected_row()?;
        match page {
            Page::Jobs => {
                let (job_id, namespace) = split_key(&row.key)?;
                self.ctx.job_id = job_id;
                self.ctx.job_namespace = namespace;
            }
            Page::Allocations => {
                let (alloc_id, task_name) = split_key(&row.key)?;
                self.ctx.alloc_id = alloc_id;
                self.ctx.task_name = task_name;
            }
            Page::Logs => self.ctx.log_line = row.display.clone(),
            Page::JobSpec | Page::AllocSpec | Page::LogLine => {}
        }
        Ok(())
    }

    // ---------- transitions ----------

    fn navigate(&mut self, page: Page) -> Vec<Effect> {
        debug!(from = %self.ctx.page, to = %page, "changing page");
        self.current_state_mut().viewport_mut().hide_toast();
        self.ctx.page = page;
        let prefix = page.filter_prefix(&self.ctx);
        self.registry.get_mut(page).set_filter_prefix(prefix);
        vec![self.issue_load(page)]
    }

    fn issue_load(&mut self, page: Page) -> Effect {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.registry.get_mut(page).begin_load(request_id);
        debug!(%page, request_id, "issuing load");
        Effect::Load(LoadCommand {
            page,
            request_id,
            request: LoadRequest::for_page(page, &self.ctx),
        })
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        for state in self.registry.iter_mut() {
            state.set_window_size(width, page_height(height));
        }
    }
}

fn page_height(window_height: usize) -> usize {
    window_height.saturating_sub(APP_HEADER_HEIGHT)
}
