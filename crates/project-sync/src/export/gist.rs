//! Gist publishing
//!
//! POSTs the rendered checklist as a new private gist with a bearer token.
//! Failures are reported once; nothing is retried.

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ExportConfig;
use crate::domain::Project;
use super::markdown::{gist_description, gist_filename, render_checklist};

const GITHUB_JSON: &str = "application/vnd.github+json";
const CLIENT_AGENT: &str = concat!("project-cards/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// No bearer credential configured
    MissingToken,
    /// Non-2xx response; `message` is the server's explanation
    Rejected { status: u16, message: String },
    /// The request never completed
    Transport(String),
    /// 2xx response without a usable body
    InvalidResponse(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::MissingToken => {
                write!(f, "Error creating gist: no GitHub token configured (set {})", crate::config::ENV_GITHUB_TOKEN)
            }
            ExportError::Rejected { message, .. } => write!(f, "Error creating gist: {}", message),
            ExportError::Transport(msg) => write!(f, "An error occurred: {}", msg),
            ExportError::InvalidResponse(msg) => write!(f, "An error occurred: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GistFile {
    pub content: String,
}

/// Request body for `POST /gists`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GistRequest {
    pub description: String,
    pub public: bool,
    pub files: BTreeMap<String, GistFile>,
}

impl GistRequest {
    pub fn for_project(project: &Project) -> Self {
        let mut files = BTreeMap::new();
        files.insert(
            gist_filename(&project.title),
            GistFile { content: render_checklist(project) },
        );
        Self {
            description: gist_description(&project.title),
            public: false,
            files,
        }
    }
}

/// Successful creation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistCreated {
    pub html_url: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Deserialize)]
struct GistFailure {
    message: Option<String>,
}

pub struct GistClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GistClient {
    pub fn new(config: &ExportConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config.api_base.clone(), config.github_token.clone())
    }

    pub fn with_client(http: reqwest::Client, api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    fn endpoint(&self) -> String {
        format!("{}/gists", self.api_base.trim_end_matches('/'))
    }

    /// Publish `project` as a new private gist
    pub async fn publish(&self, project: &Project) -> Result<GistCreated, ExportError> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExportError::MissingToken)?;

        let request = GistRequest::for_project(project);
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_JSON)
            .header(USER_AGENT, CLIENT_AGENT)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        if status.is_success() {
            let created: GistCreated = serde_json::from_str(&body)
                .map_err(|e| ExportError::InvalidResponse(e.to_string()))?;
            log::info!("published gist for {} at {}", project.id, created.html_url);
            Ok(created)
        } else {
            let message = serde_json::from_str::<GistFailure>(&body)
                .ok()
                .and_then(|f| f.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            log::warn!("gist export rejected with {}: {}", status, message);
            Err(ExportError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoItem;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn project() -> Project {
        Project {
            id: "p1".to_string(),
            title: "Weekend plan".to_string(),
            user: "alice".to_string(),
            todos: vec![
                TodoItem { text: "a".to_string(), completed: false },
                TodoItem { text: "b".to_string(), completed: true },
            ],
        }
    }

    fn client(server: &MockServer, token: Option<&str>) -> GistClient {
        GistClient::with_client(reqwest::Client::new(), server.uri(), token.map(str::to_string))
    }

    #[test]
    fn test_request_body_shape() {
        let request = GistRequest::for_project(&project());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["description"], "Weekend plan Todo List");
        assert_eq!(json["public"], false);
        let content = json["files"]["Weekend_plan.md"]["content"].as_str().unwrap();
        assert!(content.starts_with("# Weekend plan\n\n**Summary:** 1 / 2 completed"));
    }

    #[tokio::test]
    async fn test_publish_success_returns_html_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gists"))
            .and(header("authorization", "Bearer s3cret"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "description": "Weekend plan Todo List",
                "public": false,
                "files": { "Weekend_plan.md": {} }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "abc123",
                "html_url": "https://gist.github.com/abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client(&server, Some("s3cret")).publish(&project()).await.unwrap();
        assert_eq!(created.html_url, "https://gist.github.com/abc123");
        assert_eq!(created.id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_publish_reports_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gists"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, Some("wrong")).publish(&project()).await.unwrap_err();
        assert_eq!(
            err,
            ExportError::Rejected { status: 401, message: "Bad credentials".to_string() }
        );
        assert_eq!(err.to_string(), "Error creating gist: Bad credentials");
    }

    #[tokio::test]
    async fn test_publish_without_message_uses_status_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>upstream</html>"))
            .mount(&server)
            .await;

        let err = client(&server, Some("t")).publish(&project()).await.unwrap_err();
        assert!(matches!(err, ExportError::Rejected { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[tokio::test]
    async fn test_publish_without_token_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let gist = client(&server, Some("  "));
        assert!(!gist.has_token());
        assert_eq!(gist.publish(&project()).await.unwrap_err(), ExportError::MissingToken);
        assert_eq!(client(&server, None).publish(&project()).await.unwrap_err(), ExportError::MissingToken);
    }

    #[tokio::test]
    async fn test_publish_transport_error() {
        let gist = GistClient::with_client(reqwest::Client::new(), "http://127.0.0.1:1", Some("t".to_string()));
        let err = gist.publish(&project()).await.unwrap_err();
        assert!(matches!(err, ExportError::Transport(_)));
        assert!(err.to_string().starts_with("An error occurred: "));
    }
}
