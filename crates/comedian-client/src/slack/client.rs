//! Slack Web API client
//!
//! Every call goes through [`SlackClient::call`] (JSON POST) or
//! [`SlackClient::get`] (query string), both of which unwrap Slack's
//! `{"ok": bool, "error": "..."}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use comedian_core::entities::{Attachment, WorkspaceMember};
use comedian_core::traits::{ChatGateway, RepoResult};

use super::types::{AuthInfo, ConnectionUrl, ConversationEnvelope, UsersPage};
use crate::error::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USERS_PAGE_LIMIT: &str = "200";

/// Thin client bound to one token (bot token for Web API calls, app token
/// for opening Socket Mode connections)
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// POST a JSON payload to a Web API method
    async fn call<T: DeserializeOwned>(&self, method: &str, payload: &Value) -> ClientResult<T> {
        let response = self
            .http
            .post(self.url(method))
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;
        read_response(method, response).await
    }

    /// GET a Web API method with query parameters
    async fn get<T: DeserializeOwned>(&self, method: &str, query: &[(&str, &str)]) -> ClientResult<T> {
        let response = self
            .http
            .get(self.url(method))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        read_response(method, response).await
    }

    /// Identify the token owner (bot user and workspace)
    #[instrument(skip(self))]
    pub async fn auth_test(&self) -> ClientResult<AuthInfo> {
        self.call("auth.test", &json!({})).await
    }

    /// Request a Socket Mode WebSocket URL; needs an app-level token
    #[instrument(skip(self))]
    pub async fn open_socket_url(&self) -> ClientResult<String> {
        let response = self
            .http
            .post(self.url("apps.connections.open"))
            .bearer_auth(&self.token)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send()
            .await?;
        let opened: ConnectionUrl = read_response("apps.connections.open", response).await?;
        Ok(opened.url)
    }

    #[instrument(skip(self, text, attachments))]
    pub async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> ClientResult<()> {
        let mut payload = json!({ "channel": channel_id, "text": text });
        if !attachments.is_empty() {
            payload["attachments"] = serde_json::to_value(attachments)?;
        }
        let _: Value = self.call("chat.postMessage", &payload).await?;
        Ok(())
    }

    #[instrument(skip(self, text))]
    pub async fn post_ephemeral(&self, channel_id: &str, user_id: &str, text: &str) -> ClientResult<()> {
        let payload = json!({ "channel": channel_id, "user": user_id, "text": text });
        let _: Value = self.call("chat.postEphemeral", &payload).await?;
        Ok(())
    }

    /// Open (or reuse) the DM conversation with a user and return its id
    #[instrument(skip(self))]
    pub async fn open_direct_channel(&self, user_id: &str) -> ClientResult<String> {
        let opened: ConversationEnvelope = self
            .call("conversations.open", &json!({ "users": user_id }))
            .await?;
        Ok(opened.channel.id)
    }

    #[instrument(skip(self))]
    pub async fn conversation_name(&self, channel_id: &str) -> ClientResult<String> {
        let info: ConversationEnvelope = self
            .get("conversations.info", &[("channel", channel_id)])
            .await?;
        Ok(info.channel.name)
    }

    /// Walk every page of `users.list`
    #[instrument(skip(self))]
    pub async fn users(&self) -> ClientResult<Vec<WorkspaceMember>> {
        let mut members = Vec::new();
        let mut cursor = String::new();
        loop {
            let mut query = vec![("limit", USERS_PAGE_LIMIT)];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }
            let page: UsersPage = self.get("users.list", &query).await?;
            let next = page.next_cursor().map(str::to_string);
            members.extend(page.members.into_iter().map(WorkspaceMember::from));
            match next {
                Some(next) => cursor = next,
                None => break,
            }
        }
        debug!(count = members.len(), "Fetched workspace members");
        Ok(members)
    }
}

/// Unwrap status codes and the `ok` envelope of a Web API response
async fn read_response<T: DeserializeOwned>(method: &str, response: Response) -> ClientResult<T> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        return Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Http { status, body });
    }

    let body: Value = response.json().await?;
    if body.get("ok").and_then(Value::as_bool) != Some(true) {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        return Err(ClientError::Api {
            method: method.to_string(),
            code,
        });
    }

    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl ChatGateway for SlackClient {
    async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> RepoResult<()> {
        self.post_message(channel_id, text, attachments)
            .await
            .map_err(ClientError::into_chat_error)
    }

    async fn send_ephemeral(&self, channel_id: &str, user_id: &str, text: &str) -> RepoResult<()> {
        self.post_ephemeral(channel_id, user_id, text)
            .await
            .map_err(ClientError::into_chat_error)
    }

    async fn send_direct_message(&self, user_id: &str, text: &str) -> RepoResult<()> {
        let channel_id = self
            .open_direct_channel(user_id)
            .await
            .map_err(ClientError::into_chat_error)?;
        self.post_message(&channel_id, text, &[])
            .await
            .map_err(ClientError::into_chat_error)
    }

    async fn channel_name(&self, channel_id: &str) -> RepoResult<String> {
        self.conversation_name(channel_id)
            .await
            .map_err(ClientError::into_chat_error)
    }

    async fn list_members(&self) -> RepoResult<Vec<WorkspaceMember>> {
        self.users().await.map_err(ClientError::into_chat_error)
    }
}
