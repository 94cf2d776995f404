//! forge::github
//!
//! GitHub forge implementation over the REST API.
//!
//! # Design
//!
//! Construction is split in two. [`GitHubClient::new`] checks the token's
//! shape and builds an HTTP client with the auth headers baked in; it makes no
//! request, so a revoked token only shows up on the first real call as
//! [`ForgeError::Unauthorized`] or [`ForgeError::Forbidden`].
//! [`GitHubClient::for_repository`] then scopes that client to one repository.
//! The split lets startup build the client while the origin remote is still
//! being resolved.
//!
//! # Rate Limiting
//!
//! GitHub signals exhausted limits with 429, or with 403 plus
//! `x-ratelimit-remaining: 0`. Both map to `ForgeError::RateLimited`. There
//! is no automatic retry.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::traits::{
    CreatePrRequest, Forge, ForgeError, PrState, PullRequestFilter, PullRequestRecord,
};
use crate::core::types::RemoteIdentity;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("gitray/", env!("CARGO_PKG_VERSION"));

/// Page size for list endpoints (GitHub's maximum).
const PER_PAGE: usize = 100;

/// Check a token's shape without contacting the API.
pub fn validate_token(token: &str) -> Result<(), ForgeError> {
    if token.is_empty() {
        return Err(ForgeError::Authentication("token is empty".into()));
    }

    if token.len() < 10 {
        return Err(ForgeError::Authentication(
            "token appears to be too short".into(),
        ));
    }

    if token.contains(char::is_whitespace) {
        return Err(ForgeError::Authentication(
            "token should not contain spaces or newlines".into(),
        ));
    }

    Ok(())
}

/// Authenticated HTTP client, not yet bound to a repository.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

// Custom Debug to keep the auth header out of logs
impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubClient {
    /// Build a client for `api_base` (e.g. `https://api.github.com`).
    ///
    /// # Errors
    ///
    /// [`ForgeError::Authentication`] if the token is empty or malformed.
    pub fn new(token: &str, api_base: &str) -> Result<Self, ForgeError> {
        validate_token(token)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ForgeError::Authentication("token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Scope the client to one repository.
    pub fn for_repository(self, identity: &RemoteIdentity) -> GitHubForge {
        GitHubForge {
            client: self.client,
            api_base: self.api_base,
            owner: identity.owner.clone(),
            repo: identity.repo.clone(),
        }
    }
}

/// GitHub forge scoped to one owner/repo pair.
#[derive(Clone)]
pub struct GitHubForge {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
}

impl fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubForge")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

// Request bodies

#[derive(Debug, Serialize)]
struct CreatePrBody<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ReviewBody<'a> {
    body: &'a str,
    event: &'static str,
}

#[derive(Debug, Serialize)]
struct RequestReviewersBody<'a> {
    reviewers: Vec<&'a str>,
}

// Response bodies

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    number: u64,
    html_url: String,
    state: String,
    title: String,
    head: GitHubRef,
    base: GitHubRef,
    user: Option<GitHubUser>,
    #[serde(default)]
    merged_at: Option<String>,
}

impl From<GitHubPullRequest> for PullRequestRecord {
    fn from(pr: GitHubPullRequest) -> Self {
        let state = if pr.merged_at.is_some() {
            PrState::Merged
        } else if pr.state == "closed" {
            PrState::Closed
        } else {
            PrState::Open
        };

        PullRequestRecord {
            number: pr.number,
            title: pr.title,
            base: pr.base.ref_name,
            head: pr.head.ref_name,
            // Deleted accounts come back as null
            author: pr.user.map(|u| u.login).unwrap_or_else(|| "ghost".to_string()),
            state,
            url: pr.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
    #[serde(default)]
    errors: Vec<GitHubErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorDetail {
    message: Option<String>,
}

impl GitHubForge {
    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    /// Send a request, mapping transport and status failures.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ForgeError> {
        let response = request
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        log::debug!("-> {}", status);

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ForgeError> {
        let response = self.send(request).await?;
        let status = response.status();
        response.json().await.map_err(|e| ForgeError::ApiError {
            status: status.as_u16(),
            message: format!("failed to parse response: {}", e),
        })
    }

    async fn error_from_response(response: Response, status: StatusCode) -> ForgeError {
        let rate_limit_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => {
                let details: Vec<String> = err.errors.into_iter().filter_map(|d| d.message).collect();
                if details.is_empty() {
                    err.message
                } else {
                    format!("{}: {}", err.message, details.join("; "))
                }
            }
            Err(_) => "unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::Unauthorized(message),
            StatusCode::FORBIDDEN if rate_limit_exhausted => ForgeError::RateLimited,
            StatusCode::FORBIDDEN => ForgeError::Forbidden(message),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn authenticated_user(&self) -> Result<String, ForgeError> {
        let url = format!("{}/user", self.api_base);
        log::debug!("GET {}", url);
        let user: GitHubUser = self.send_json(self.client.get(&url)).await?;
        Ok(user.login)
    }

    async fn list_pull_requests(
        &self,
        filter: &PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>, ForgeError> {
        let url = self.repo_url("pulls");
        let mut records = Vec::new();
        let mut page = 1usize;

        loop {
            let mut query = vec![
                ("state", "open".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ];
            if let Some(base) = &filter.base {
                query.push(("base", base.clone()));
            }

            log::debug!("GET {} (page {})", url, page);
            let batch: Vec<GitHubPullRequest> =
                self.send_json(self.client.get(&url).query(&query)).await?;
            let fetched = batch.len();

            records.extend(
                batch
                    .into_iter()
                    .map(PullRequestRecord::from)
                    .filter(|pr| filter.matches(pr)),
            );

            if fetched < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    async fn create_pull_request(
        &self,
        request: CreatePrRequest,
    ) -> Result<PullRequestRecord, ForgeError> {
        let url = self.repo_url("pulls");
        let body = CreatePrBody {
            title: &request.title,
            head: &request.head,
            base: &request.base,
            body: request.body.as_deref(),
        };

        log::debug!("POST {} ({} -> {})", url, request.head, request.base);
        let pr: GitHubPullRequest = self.send_json(self.client.post(&url).json(&body)).await?;
        Ok(pr.into())
    }

    async fn add_review_comment(&self, number: u64, text: &str) -> Result<(), ForgeError> {
        let url = self.repo_url(&format!("pulls/{}/reviews", number));
        let body = ReviewBody {
            body: text,
            event: "COMMENT",
        };

        log::debug!("POST {}", url);
        self.send(self.client.post(&url).json(&body)).await?;
        Ok(())
    }

    async fn forward_pull_request(&self, number: u64, user: &str) -> Result<(), ForgeError> {
        let url = self.repo_url(&format!("pulls/{}/requested_reviewers", number));
        let body = RequestReviewersBody {
            reviewers: vec![user],
        };

        log::debug!("POST {} (reviewer {})", url, user);
        self.send(self.client.post(&url).json(&body)).await?;
        Ok(())
    }
}
