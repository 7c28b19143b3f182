//! The closed set of messages the controller consumes, and the load commands it emits.

use crate::context::{LogType, NavigationContext};
use crate::error::LoadError;
use crate::input::Key;
use crate::page::Page;
use crate::row::PageData;

/// Monotonically increasing id attached to every issued load.
pub type RequestId = u64;

/// What a page needs fetched, with every identifier resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    Jobs,
    JobSpec { job_id: String, namespace: String },
    Allocations { job_id: String, namespace: String },
    AllocSpec { alloc_id: String },
    Logs {
        alloc_id: String,
        task_name: String,
        log_type: LogType,
    },
    /// Pseudo-load: re-renders a log line already held in memory.
    LogLine { line: String },
}

impl LoadRequest {
    pub fn for_page(page: Page, ctx: &NavigationContext) -> Self {
        match page {
            Page::Jobs => LoadRequest::Jobs,
            Page::JobSpec => LoadRequest::JobSpec {
                job_id: ctx.job_id.clone(),
                namespace: ctx.job_namespace.clone(),
            },
            Page::Allocations => LoadRequest::Allocations {
                job_id: ctx.job_id.clone(),
                namespace: ctx.job_namespace.clone(),
            },
            Page::AllocSpec => LoadRequest::AllocSpec {
                alloc_id: ctx.alloc_id.clone(),
            },
            Page::Logs => LoadRequest::Logs {
                alloc_id: ctx.alloc_id.clone(),
                task_name: ctx.task_name.clone(),
                log_type: ctx.log_type,
            },
            Page::LogLine => LoadRequest::LogLine {
                line: ctx.log_line.clone(),
            },
        }
    }
}

/// A one-shot unit of work for the loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadCommand {
    pub page: Page,
    pub request_id: RequestId,
    pub request: LoadRequest,
}

#[derive(Clone, Debug)]
pub enum Message {
    Key(Key),
    Resize {
        width: usize,
        height: usize,
    },
    LoadResult {
        page: Page,
        request_id: RequestId,
        result: Result<PageData, LoadError>,
    },
}
