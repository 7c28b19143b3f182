use async_trait::async_trait;
use reqwest::Client;

use nomadtui_core::error::LoadError;
use nomadtui_core::loader::Fetcher;
use nomadtui_core::nomad::Endpoint;

/// Header Nomad reads the ACL token from.
const TOKEN_HEADER: &str = "X-Nomad-Token";

/// Read-only HTTP client for the Nomad API.
pub struct NomadClient {
    http: Client,
    address: String,
    token: Option<String>,
}

impl NomadClient {
    pub fn new(address: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            address: address.into(),
            token,
        }
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.address, endpoint.path)
    }
}

/// First non-blank line of an error body, enough for the one-line status display.
fn first_line(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Fetcher for NomadClient {
    async fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, LoadError> {
        let mut request = self.http.get(self.url(endpoint)).query(&endpoint.query);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(LoadError::Status {
                code: status.as_u16(),
                body: first_line(&body),
            });
        }
        Ok(body.to_vec())
    }
}
