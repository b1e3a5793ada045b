use jiff::civil::Date;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use tracing::{debug, info};

use crate::config::BugQueryConfig;
use crate::error::{Error, Result};
use crate::tracker::models::*;
use crate::tracker::payload::{CreateIssueRequest, TransitionRequest};

/// Search for bugs carrying a project label that changed on or after a date
#[derive(Debug, Clone, PartialEq)]
pub struct BugQuery {
    pub project: String,
    pub label_field: String,
    pub label: String,
    pub updated_from: Date,
    pub page_size: u32,
}

impl BugQuery {
    pub fn new(config: &BugQueryConfig, label: impl Into<String>, updated_from: Date) -> Self {
        BugQuery {
            project: config.project.clone(),
            label_field: config.label_field.clone(),
            label: label.into(),
            updated_from,
            page_size: config.page_size,
        }
    }

    /// Only a lower bound on `updated` is applied: an issue touched after the
    /// window closes can still carry transitions from inside it.
    pub fn jql(&self) -> String {
        format!(
            "project={} and {}={} and updated>=\"{}\"",
            self.project,
            quote_jql(&self.label_field),
            quote_jql(&self.label),
            self.updated_from
        )
    }
}

/// Double-quote a JQL string literal, escaping backslashes and quotes
fn quote_jql(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Tracker client abstraction
pub enum TrackerClient {
    Http(HttpTracker),
    #[cfg(test)]
    Mock(MockTracker),
}

impl TrackerClient {
    /// Create a client talking to a real tracker over HTTP
    pub fn new(endpoint: &str, username: &str, password: &str) -> Result<Self> {
        Ok(TrackerClient::Http(HttpTracker::new(endpoint, username, password)?))
    }

    /// Create a mock client for testing
    #[cfg(test)]
    pub fn mock() -> Self {
        TrackerClient::Mock(MockTracker::new())
    }

    /// Base URL of the tracker, without a trailing slash
    pub fn endpoint(&self) -> &str {
        match self {
            TrackerClient::Http(client) => &client.endpoint,
            #[cfg(test)]
            TrackerClient::Mock(client) => &client.endpoint,
        }
    }

    /// Fetch every matching issue with its changelog
    pub fn search(&self, query: &BugQuery) -> Result<Vec<Issue>> {
        match self {
            TrackerClient::Http(client) => client.search(query),
            #[cfg(test)]
            TrackerClient::Mock(client) => client.search(query),
        }
    }

    /// Create a story or sub-task
    pub fn create_issue(&self, request: &CreateIssueRequest) -> Result<CreatedIssue> {
        match self {
            TrackerClient::Http(client) => client.create_issue(request),
            #[cfg(test)]
            TrackerClient::Mock(client) => client.create_issue(request),
        }
    }

    /// Move an issue through a workflow transition
    pub fn transition(
        &self,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<Option<serde_json::Value>> {
        match self {
            TrackerClient::Http(client) => client.transition(issue_key, transition_id),
            #[cfg(test)]
            TrackerClient::Mock(client) => client.transition(issue_key, transition_id),
        }
    }
}

/// Tracker REST API client using HTTP basic auth
pub struct HttpTracker {
    client: HttpClient,
    endpoint: String,
    username: String,
    password: String,
}

impl HttpTracker {
    pub fn new(endpoint: &str, username: &str, password: &str) -> Result<Self> {
        let client = HttpClient::builder().build()?;

        Ok(HttpTracker {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.endpoint, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.username, Some(&self.password))
    }

    /// Fetch all pages of a search
    pub fn search(&self, query: &BugQuery) -> Result<Vec<Issue>> {
        let jql = query.jql();
        info!("Searching issues: {}", jql);

        let mut issues = Vec::new();
        let mut start_at: u32 = 0;

        loop {
            let params = [
                ("jql", jql.clone()),
                ("expand", "changelog".to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", query.page_size.to_string()),
            ];

            let response = self
                .authed(self.client.get(self.url("search/")))
                .query(&params)
                .send()?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::Query {
                    status: status.as_u16(),
                    reason: reason(&response),
                });
            }

            let page: SearchPage = response.json()?;
            let fetched = page.issues.len() as u32;
            debug!(
                "Fetched {} issues starting at {} of {}",
                fetched, page.start_at, page.total
            );

            issues.extend(page.issues);
            start_at += fetched;

            if fetched == 0 || start_at >= page.total {
                break;
            }
        }

        Ok(issues)
    }

    pub fn create_issue(&self, request: &CreateIssueRequest) -> Result<CreatedIssue> {
        let response = self
            .authed(self.client.post(self.url("issue/")))
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let reason = reason(&response);
            let body = response.text().unwrap_or_default();
            return Err(Error::Creation {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        let created: CreatedIssue = response.json()?;
        debug!("Created {}", created.key);
        Ok(created)
    }

    pub fn transition(
        &self,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<Option<serde_json::Value>> {
        let path = format!("issue/{}/transitions", issue_key);
        let response = self
            .authed(self.client.post(self.url(&path)))
            .json(&TransitionRequest::new(transition_id))
            .send()?;

        let status = response.status();
        let reason = reason(&response);
        let body = response.text()?;

        if !status.is_success() {
            return Err(Error::Transition {
                key: issue_key.to_string(),
                status: status.as_u16(),
                reason,
                body,
            });
        }

        debug!("Transitioned {} via {}", issue_key, transition_id);

        // Usually 204 No Content
        if body.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(serde_json::from_str(&body)?))
        }
    }
}

fn reason(response: &Response) -> String {
    response
        .status()
        .canonical_reason()
        .unwrap_or_default()
        .to_string()
}

/// Mock tracker for testing
#[cfg(test)]
pub struct MockTracker {
    pub endpoint: String,
    pub issues: Vec<Issue>,
    pub queries: std::cell::RefCell<Vec<BugQuery>>,
    pub created: std::cell::RefCell<Vec<CreateIssueRequest>>,
    pub transitions: std::cell::RefCell<Vec<(String, String)>>,
    /// Zero-based index of the creation call that should be rejected
    pub fail_create_at: Option<usize>,
}

#[cfg(test)]
impl MockTracker {
    pub fn new() -> Self {
        MockTracker {
            endpoint: "https://tracker.test".to_string(),
            issues: vec![],
            queries: std::cell::RefCell::new(vec![]),
            created: std::cell::RefCell::new(vec![]),
            transitions: std::cell::RefCell::new(vec![]),
            fail_create_at: None,
        }
    }

    pub fn search(&self, query: &BugQuery) -> Result<Vec<Issue>> {
        self.queries.borrow_mut().push(query.clone());
        Ok(self.issues.clone())
    }

    pub fn create_issue(&self, request: &CreateIssueRequest) -> Result<CreatedIssue> {
        let mut created = self.created.borrow_mut();
        if self.fail_create_at == Some(created.len()) {
            return Err(Error::Creation {
                status: 400,
                reason: "Bad Request".to_string(),
                body: r#"{"errors":{"summary":"required"}}"#.to_string(),
            });
        }

        let project = request
            .fields
            .get("project")
            .and_then(|p| p.get("key"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("MOCK")
            .to_string();
        created.push(request.clone());
        let number = created.len();

        Ok(CreatedIssue {
            id: number.to_string(),
            key: format!("{}-{}", project, number),
            self_url: format!("{}/rest/api/2/issue/{}", self.endpoint, number),
        })
    }

    pub fn transition(
        &self,
        issue_key: &str,
        transition_id: &str,
    ) -> Result<Option<serde_json::Value>> {
        self.transitions
            .borrow_mut()
            .push((issue_key.to_string(), transition_id.to_string()));
        Ok(None)
    }
}
