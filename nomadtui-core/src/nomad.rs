//! Nomad HTTP API endpoints and the decoding of their responses into rows.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::error::LoadError;
use crate::message::LoadRequest;
use crate::row::{PageData, Row};

/// Bytes of log tail requested when no other size is configured.
pub const DEFAULT_LOG_TAIL_BYTES: u64 = 1_000_000;

/// A relative API path plus query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    fn namespace(self, namespace: &str) -> Self {
        if namespace.is_empty() {
            self
        } else {
            self.param("namespace", namespace)
        }
    }
}

/// The endpoint serving `request`, or `None` for in-memory pseudo-loads.
pub fn endpoint(request: &LoadRequest, log_tail_bytes: u64) -> Option<Endpoint> {
    match request {
        LoadRequest::Jobs => Some(Endpoint::new("/v1/jobs")),
        LoadRequest::JobSpec { job_id, namespace } => {
            Some(Endpoint::new(format!("/v1/job/{job_id}")).namespace(namespace))
        }
        LoadRequest::Allocations { job_id, namespace } => Some(
            Endpoint::new(format!("/v1/job/{job_id}/allocations")).namespace(namespace),
        ),
        LoadRequest::AllocSpec { alloc_id } => {
            Some(Endpoint::new(format!("/v1/allocation/{alloc_id}")))
        }
        LoadRequest::Logs {
            alloc_id,
            task_name,
            log_type,
        } => Some(
            Endpoint::new(format!("/v1/client/fs/logs/{alloc_id}"))
                .param("task", task_name.as_str())
                .param("type", log_type.as_query())
                .param("origin", "end")
                .param("offset", log_tail_bytes.to_string())
                .param("plain", "true"),
        ),
        LoadRequest::LogLine { .. } => None,
    }
}

/// Turns a response body into rows for the page that asked for it.
pub fn decode(request: &LoadRequest, body: &[u8]) -> Result<PageData, LoadError> {
    match request {
        LoadRequest::Jobs => decode_jobs(body),
        LoadRequest::Allocations { .. } => decode_allocations(body),
        LoadRequest::JobSpec { .. } | LoadRequest::AllocSpec { .. } => pretty_json_lines(body),
        LoadRequest::Logs { .. } => decode_logs(body),
        LoadRequest::LogLine { line } => Ok(log_line_rows(line)),
    }
}

// ---------- response shapes ----------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JobStub {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    namespace: String,
    #[serde(rename = "Type", default)]
    job_type: String,
    #[serde(default)]
    priority: i64,
    #[serde(default)]
    status: String,
    #[serde(default)]
    submit_time: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AllocStub {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    task_group: String,
    #[serde(default)]
    task_states: Option<BTreeMap<String, TaskState>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TaskState {
    #[serde(default)]
    state: String,
    #[serde(default)]
    started_at: Option<String>,
    #[serde(default)]
    finished_at: Option<String>,
}

// ---------- decoders ----------

pub fn decode_jobs(body: &[u8]) -> Result<PageData, LoadError> {
    let mut jobs: Vec<JobStub> = serde_json::from_slice(body)?;
    jobs.sort_by(|a, b| a.id.cmp(&b.id));

    let cells = jobs
        .iter()
        .map(|j| {
            vec![
                j.id.clone(),
                j.job_type.clone(),
                j.priority.to_string(),
                j.status.clone(),
                format_nanos(j.submit_time),
            ]
        })
        .collect();
    let (header, lines) = format_table(&["ID", "Type", "Priority", "Status", "Submitted"], cells);

    let rows = lines
        .into_iter()
        .zip(&jobs)
        .map(|(line, job)| Row::keyed(line, &job.id, &job.namespace))
        .collect();
    Ok(PageData::new(header, rows))
}

/// One row per (allocation, task) pair.
pub fn decode_allocations(body: &[u8]) -> Result<PageData, LoadError> {
    let allocs: Vec<AllocStub> = serde_json::from_slice(body)?;

    let mut entries: Vec<(&AllocStub, &str, &TaskState)> = allocs
        .iter()
        .flat_map(|a| {
            a.task_states
                .iter()
                .flatten()
                .map(move |(task, state)| (a, task.as_str(), state))
        })
        .collect();
    entries.sort_by(|a, b| (&a.0.name, a.1).cmp(&(&b.0.name, b.1)));

    let cells = entries
        .iter()
        .map(|(alloc, task, state)| {
            vec![
                crate::page::short_id(&alloc.id).to_string(),
                alloc.task_group.clone(),
                alloc.name.clone(),
                task.to_string(),
                state.state.clone(),
                format_rfc3339(state.started_at.as_deref()),
                format_rfc3339(state.finished_at.as_deref()),
            ]
        })
        .collect();
    let (header, lines) = format_table(
        &[
            "Alloc ID",
            "Task Group",
            "Alloc Name",
            "Task Name",
            "State",
            "Started",
            "Finished",
        ],
        cells,
    );

    let rows = lines
        .into_iter()
        .zip(&entries)
        .map(|(line, (alloc, task, _))| Row::keyed(line, &alloc.id, task))
        .collect();
    Ok(PageData::new(header, rows))
}

/// Any JSON document, pretty-printed one row per line.
pub fn pretty_json_lines(body: &[u8]) -> Result<PageData, LoadError> {
    let value: Value = serde_json::from_slice(body)?;
    let pretty = serde_json::to_string_pretty(&value)?;
    Ok(PageData::from_lines(pretty.lines()))
}

pub fn decode_logs(body: &[u8]) -> Result<PageData, LoadError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| LoadError::Decode(format!("log output is not UTF-8: {e}")))?;
    Ok(PageData::from_lines(text.lines()))
}

/// A single log line, expanded when it holds a JSON object.
pub fn log_line_rows(line: &str) -> PageData {
    match serde_json::from_str::<Value>(line) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => {
            match serde_json::to_string_pretty(&value) {
                Ok(pretty) => PageData::from_lines(pretty.lines()),
                Err(_) => PageData::from_lines([line]),
            }
        }
        _ => PageData::from_lines([line]),
    }
}

// ---------- formatting ----------

/// Pads every column to its widest cell. Returns the header line and one line per row.
pub fn format_table(headers: &[&str], rows: Vec<Vec<String>>) -> (String, Vec<String>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let header = render_row(headers.iter().copied(), &widths);
    let lines = rows
        .iter()
        .map(|row| render_row(row.iter().map(String::as_str), &widths))
        .collect();
    (header, lines)
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell}{}", " ".repeat(w.saturating_sub(cell.width()))))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    if dt.year() <= 1 {
        return "-".to_string();
    }
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Nomad's nanosecond epoch timestamps.
pub fn format_nanos(nanos: i64) -> String {
    if nanos <= 0 {
        return "-".to_string();
    }
    let secs = nanos.div_euclid(1_000_000_000);
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::<Utc>::from_timestamp(secs, sub)
        .map(format_datetime)
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_rfc3339(ts: Option<&str>) -> String {
    ts.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| format_datetime(dt.with_timezone(&Utc)))
        .unwrap_or_else(|| "-".to_string())
}
