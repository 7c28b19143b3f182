//! Executes load commands against a [`Fetcher`] and turns the outcome into a
//! [`Message::LoadResult`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::LoadError;
use crate::message::{LoadCommand, Message};
use crate::nomad::{self, DEFAULT_LOG_TAIL_BYTES, Endpoint};

/// Transport seam: performs one GET against the cluster API.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, LoadError>;
}

#[derive(Clone)]
pub struct Loader {
    fetcher: Arc<dyn Fetcher>,
    log_tail_bytes: u64,
}

impl Loader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            log_tail_bytes: DEFAULT_LOG_TAIL_BYTES,
        }
    }

    pub fn with_log_tail_bytes(mut self, bytes: u64) -> Self {
        self.log_tail_bytes = bytes;
        self
    }

    /// Runs one command to completion. Never retries; every failure becomes
    /// an error result for the command's page.
    pub async fn run(&self, command: LoadCommand) -> Message {
        let LoadCommand {
            page,
            request_id,
            request,
        } = command;

        let result = match nomad::endpoint(&request, self.log_tail_bytes) {
            Some(endpoint) => {
                debug!(%page, request_id, path = %endpoint.path, "fetching");
                match self.fetcher.get(&endpoint).await {
                    Ok(body) => nomad::decode(&request, &body),
                    Err(e) => Err(e),
                }
            }
            None => nomad::decode(&request, &[]),
        };

        Message::LoadResult {
            page,
            request_id,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;
    use crate::message::LoadRequest;
    use crate::page::Page;

    /// Serves canned bodies by path and records every request.
    #[derive(Default)]
    struct FakeFetcher {
        bodies: BTreeMap<String, Result<Vec<u8>, LoadError>>,
        calls: Mutex<Vec<Endpoint>>,
    }

    impl FakeFetcher {
        fn with(mut self, path: &str, body: Result<&str, LoadError>) -> Self {
            self.bodies
                .insert(path.to_string(), body.map(|b| b.as_bytes().to_vec()));
            self
        }
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, LoadError> {
            self.calls.lock().unwrap().push(endpoint.clone());
            self.bodies
                .get(&endpoint.path)
                .cloned()
                .unwrap_or_else(|| Err(LoadError::Status { code: 404, body: "not found".into() }))
        }
    }

    fn command(page: Page, request: LoadRequest) -> LoadCommand {
        LoadCommand {
            page,
            request_id: 7,
            request,
        }
    }

    #[tokio::test]
    async fn test_successful_load() {
        let fetcher = Arc::new(FakeFetcher::default().with(
            "/v1/jobs",
            Ok(r#"[{"ID":"web","Namespace":"default","Type":"service","Status":"running"}]"#),
        ));
        let loader = Loader::new(fetcher.clone());

        let msg = loader.run(command(Page::Jobs, LoadRequest::Jobs)).await;
        let Message::LoadResult { page, request_id, result } = msg else {
            panic!("expected load result");
        };
        assert_eq!(page, Page::Jobs);
        assert_eq!(request_id, 7);
        assert_eq!(result.unwrap().rows.len(), 1);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let fetcher = Arc::new(FakeFetcher::default().with("/v1/job/web/allocations", Ok("<html>")));
        let loader = Loader::new(fetcher);

        let msg = loader
            .run(command(
                Page::Allocations,
                LoadRequest::Allocations {
                    job_id: "web".into(),
                    namespace: String::new(),
                },
            ))
            .await;
        assert!(matches!(
            msg,
            Message::LoadResult { result: Err(LoadError::Decode(_)), .. }
        ));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let fetcher = Arc::new(
            FakeFetcher::default().with("/v1/jobs", Err(LoadError::Transport("refused".into()))),
        );
        let msg = Loader::new(fetcher)
            .run(command(Page::Jobs, LoadRequest::Jobs))
            .await;
        assert!(matches!(
            msg,
            Message::LoadResult { result: Err(LoadError::Transport(_)), .. }
        ));
    }

    #[tokio::test]
    async fn test_log_line_needs_no_network() {
        let fetcher = Arc::new(FakeFetcher::default());
        let loader = Loader::new(fetcher.clone());
        let msg = loader
            .run(command(
                Page::LogLine,
                LoadRequest::LogLine {
                    line: "hello".into(),
                },
            ))
            .await;
        let Message::LoadResult { result, .. } = msg else {
            panic!("expected load result");
        };
        assert_eq!(result.unwrap().rows[0].display, "hello");
        assert!(fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_log_tail_size_is_forwarded() {
        let fetcher = Arc::new(FakeFetcher::default().with("/v1/client/fs/logs/abc", Ok("a\nb\n")));
        let loader = Loader::new(fetcher.clone()).with_log_tail_bytes(4096);
        loader
            .run(command(
                Page::Logs,
                LoadRequest::Logs {
                    alloc_id: "abc".into(),
                    task_name: "nginx".into(),
                    log_type: Default::default(),
                },
            ))
            .await;
        let calls = fetcher.calls.lock().unwrap();
        assert!(calls[0].query.contains(&("offset".into(), "4096".into())));
    }
}
