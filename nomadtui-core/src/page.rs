//! The six navigable pages and their fixed transition tables.

use std::fmt;

use crate::context::NavigationContext;

/// One of the six views of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Page {
    Jobs,
    JobSpec,
    Allocations,
    AllocSpec,
    Logs,
    LogLine,
}

impl Page {
    /// Every page in registry order.
    pub const ALL: [Page; 6] = [
        Page::Jobs,
        Page::JobSpec,
        Page::Allocations,
        Page::AllocSpec,
        Page::Logs,
        Page::LogLine,
    ];

    /// Position of this page in [`Page::ALL`].
    pub fn index(self) -> usize {
        match self {
            Page::Jobs => 0,
            Page::JobSpec => 1,
            Page::Allocations => 2,
            Page::AllocSpec => 3,
            Page::Logs => 4,
            Page::LogLine => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Jobs => "jobs",
            Page::JobSpec => "job spec",
            Page::Allocations => "allocations",
            Page::AllocSpec => "allocation spec",
            Page::Logs => "logs",
            Page::LogLine => "log line",
        }
    }

    pub fn loading_text(self) -> String {
        format!("Loading {}...", self.label())
    }

    pub fn reloading_text(self) -> String {
        format!("Reloading {}...", self.label())
    }

    /// Whether the reload key re-fetches this page from the cluster.
    pub fn loads(self) -> bool {
        !matches!(self, Page::LogLine)
    }

    /// List pages have a selectable cursor row; detail pages only scroll.
    pub fn cursor_enabled(self) -> bool {
        matches!(self, Page::Jobs | Page::Allocations | Page::Logs)
    }

    pub fn forward(self) -> Option<Page> {
        match self {
            Page::Jobs => Some(Page::Allocations),
            Page::Allocations => Some(Page::Logs),
            Page::Logs => Some(Page::LogLine),
            Page::JobSpec | Page::AllocSpec | Page::LogLine => None,
        }
    }

    pub fn backward(self) -> Option<Page> {
        match self {
            Page::JobSpec | Page::Allocations => Some(Page::Jobs),
            Page::AllocSpec | Page::Logs => Some(Page::Allocations),
            Page::LogLine => Some(Page::Logs),
            Page::Jobs => None,
        }
    }

    /// Target of the spec key, independent of the forward table.
    pub fn spec_jump(self) -> Option<Page> {
        match self {
            Page::Jobs => Some(Page::JobSpec),
            Page::Allocations => Some(Page::AllocSpec),
            _ => None,
        }
    }

    /// Prompt shown in front of the filter box, qualified by the current selection.
    pub fn filter_prefix(self, ctx: &NavigationContext) -> String {
        match self {
            Page::Jobs => "Jobs".to_string(),
            Page::JobSpec => format!("Job Spec for {}", ctx.job_id),
            Page::Allocations => format!("Allocations for {}", ctx.job_id),
            Page::AllocSpec => format!("Allocation Spec for {}", short_id(&ctx.alloc_id)),
            Page::Logs => format!(
                "Logs for {} ({}) [{}]",
                ctx.task_name,
                short_id(&ctx.alloc_id),
                ctx.log_type
            ),
            Page::LogLine => format!("Log Line for {}", ctx.task_name),
        }
    }

    /// Key hints rendered in the app header.
    pub fn key_help(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Page::Jobs => &[
                ("enter", "allocations"),
                ("s", "spec"),
                ("/", "filter"),
                ("r", "reload"),
                ("ctrl+s", "save"),
                ("q", "quit"),
            ],
            Page::Allocations => &[
                ("enter", "logs"),
                ("s", "spec"),
                ("esc", "back"),
                ("/", "filter"),
                ("r", "reload"),
                ("ctrl+s", "save"),
                ("q", "quit"),
            ],
            Page::Logs => &[
                ("enter", "log line"),
                ("o", "stdout"),
                ("e", "stderr"),
                ("esc", "back"),
                ("/", "filter"),
                ("r", "reload"),
                ("ctrl+s", "save"),
                ("q", "quit"),
            ],
            Page::JobSpec | Page::AllocSpec => &[
                ("esc", "back"),
                ("/", "filter"),
                ("r", "reload"),
                ("ctrl+s", "save"),
                ("q", "quit"),
            ],
            Page::LogLine => &[
                ("esc", "back"),
                ("/", "filter"),
                ("ctrl+s", "save"),
                ("q", "quit"),
            ],
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// First eight characters of a Nomad UUID, the way the Nomad CLI abbreviates them.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_table() {
        assert_eq!(Page::Jobs.forward(), Some(Page::Allocations));
        assert_eq!(Page::Allocations.forward(), Some(Page::Logs));
        assert_eq!(Page::Logs.forward(), Some(Page::LogLine));
        assert_eq!(Page::JobSpec.forward(), None);
        assert_eq!(Page::AllocSpec.forward(), None);
        assert_eq!(Page::LogLine.forward(), None);
    }

    #[test]
    fn test_backward_table() {
        assert_eq!(Page::JobSpec.backward(), Some(Page::Jobs));
        assert_eq!(Page::Allocations.backward(), Some(Page::Jobs));
        assert_eq!(Page::AllocSpec.backward(), Some(Page::Allocations));
        assert_eq!(Page::Logs.backward(), Some(Page::Allocations));
        assert_eq!(Page::LogLine.backward(), Some(Page::Logs));
        assert_eq!(Page::Jobs.backward(), None);
    }

    #[test]
    fn test_spec_jump() {
        assert_eq!(Page::Jobs.spec_jump(), Some(Page::JobSpec));
        assert_eq!(Page::Allocations.spec_jump(), Some(Page::AllocSpec));
        assert_eq!(Page::Logs.spec_jump(), None);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, page) in Page::ALL.iter().enumerate() {
            assert_eq!(page.index(), i);
        }
    }

    #[test]
    fn test_cursor_pages() {
        let cursor: Vec<_> = Page::ALL.into_iter().filter(|p| p.cursor_enabled()).collect();
        assert_eq!(cursor, vec![Page::Jobs, Page::Allocations, Page::Logs]);
    }

    #[test]
    fn test_filter_prefix_uses_context() {
        let ctx = NavigationContext {
            job_id: "web".into(),
            alloc_id: "0123456789abcdef".into(),
            task_name: "server".into(),
            ..Default::default()
        };
        assert_eq!(Page::Allocations.filter_prefix(&ctx), "Allocations for web");
        assert_eq!(
            Page::Logs.filter_prefix(&ctx),
            "Logs for server (01234567) [stdout]"
        );
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789"), "01234567");
    }
}
