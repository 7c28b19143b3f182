use std::fmt;

use crate::page::Page;

/// Which output stream of a task the logs page is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogType {
    #[default]
    StdOut,
    StdErr,
}

impl LogType {
    /// Value of the `type` query parameter on the Nomad logs endpoint.
    pub fn as_query(self) -> &'static str {
        match self {
            LogType::StdOut => "stdout",
            LogType::StdErr => "stderr",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Identifiers carried between pages, resolved from the rows the user selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationContext {
    pub page: Page,
    pub job_id: String,
    pub job_namespace: String,
    pub alloc_id: String,
    pub task_name: String,
    pub log_line: String,
    pub log_type: LogType,
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self {
            page: Page::Jobs,
            job_id: String::new(),
            job_namespace: String::new(),
            alloc_id: String::new(),
            task_name: String::new(),
            log_line: String::new(),
            log_type: LogType::StdOut,
        }
    }
}
