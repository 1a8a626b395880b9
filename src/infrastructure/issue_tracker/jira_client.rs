use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::tracker_interface::{Issue, IssueTracker, IssueTrackerError, Transition};
use crate::domain::entities::configuration::IssueTrackerCredentials;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Jira REST API v2 client using basic authentication
pub struct JiraClient {
    base_url: Url,
    username: String,
    password: String,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: Option<String>,
    assignee: Option<UserField>,
    status: Option<StatusField>,
}

#[derive(Debug, Deserialize)]
struct UserField {
    name: Option<String>,
    #[serde(rename = "accountId")]
    account_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    transitions: Vec<Transition>,
}

impl JiraClient {
    pub fn new(credentials: &IssueTrackerCredentials) -> Result<Self, IssueTrackerError> {
        Self::with_timeout(credentials, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        credentials: &IssueTrackerCredentials,
        timeout: Duration,
    ) -> Result<Self, IssueTrackerError> {
        let mut base_url =
            Url::parse(&credentials.server).map_err(|e| IssueTrackerError::InvalidServerUrl {
                url: credentials.server.clone(),
                reason: e.to_string(),
            })?;

        if base_url.cannot_be_a_base() {
            return Err(IssueTrackerError::InvalidServerUrl {
                url: credentials.server.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        // Url::join drops the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IssueTrackerError> {
        self.base_url
            .join(path)
            .map_err(|e| IssueTrackerError::InvalidServerUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        endpoint: &Url,
    ) -> Result<Response, IssueTrackerError> {
        debug!("Jira request: {}", endpoint);
        let response = self.authorized(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(IssueTrackerError::Api {
            status: status.as_u16(),
            endpoint: endpoint.path().to_string(),
            message: message.trim().to_string(),
        })
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn issue(&self, key: &str) -> Result<Issue, IssueTrackerError> {
        let mut url = self.endpoint(&format!("rest/api/2/issue/{}", key))?;
        url.query_pairs_mut()
            .append_pair("fields", "summary,assignee,status");

        let response = match self.send(self.http_client.get(url.clone()), &url).await {
            Err(IssueTrackerError::Api { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                return Err(IssueTrackerError::IssueNotFound(key.to_string()));
            }
            other => other?,
        };

        let body: IssueResponse = response.json().await?;
        Ok(Issue {
            key: body.key,
            summary: body.fields.summary,
            assignee: body
                .fields
                .assignee
                .and_then(|user| user.name.or(user.account_id)),
            status: body.fields.status.map(|status| status.name),
        })
    }

    async fn assign_issue(&self, key: &str, username: &str) -> Result<(), IssueTrackerError> {
        let url = self.endpoint(&format!("rest/api/2/issue/{}/assignee", key))?;
        let request = self
            .http_client
            .put(url.clone())
            .json(&json!({ "name": username }));
        self.send(request, &url).await?;
        Ok(())
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, IssueTrackerError> {
        let url = self.endpoint(&format!("rest/api/2/issue/{}/transitions", key))?;
        let response = self.send(self.http_client.get(url.clone()), &url).await?;
        let body: TransitionsResponse = response.json().await?;
        Ok(body.transitions)
    }

    async fn transition_issue(
        &self,
        key: &str,
        transition_id: &str,
    ) -> Result<(), IssueTrackerError> {
        let url = self.endpoint(&format!("rest/api/2/issue/{}/transitions", key))?;
        let request = self
            .http_client
            .post(url.clone())
            .json(&json!({ "transition": { "id": transition_id } }));
        self.send(request, &url).await?;
        Ok(())
    }
}
