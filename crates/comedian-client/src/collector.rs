//! Collector analytics client
//!
//! `GET {url}/rest/api/v1/logger/{team}/{scope}/{key}/{from}/{to}/` returns
//! commit and worklog totals for a user, a project or a user within a
//! project over an inclusive date range.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{instrument, warn};

use comedian_common::CollectorConfig;
use comedian_core::traits::{Collector, CollectorData, CollectorScope, RepoResult};

use crate::error::{ClientError, ClientResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct CollectorClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl CollectorClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// `None` when no collector URL is configured
    pub fn from_config(config: &CollectorConfig) -> ClientResult<Option<Self>> {
        match &config.url {
            Some(url) if config.is_enabled() => Self::new(
                url.clone(),
                config.token.clone(),
                Duration::from_secs(config.timeout_secs),
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    fn url(&self, team_name: &str, scope: &CollectorScope, from: NaiveDate, to: NaiveDate) -> String {
        format!(
            "{}/rest/api/v1/logger/{team_name}/{}/{}/{}/",
            self.base_url,
            scope.path(),
            from.format(DATE_FORMAT),
            to.format(DATE_FORMAT),
        )
    }

    #[instrument(skip(self))]
    pub async fn get_data(
        &self,
        team_name: &str,
        scope: &CollectorScope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ClientResult<CollectorData> {
        let mut request = self.http.get(self.url(team_name, scope, from, to));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, scope = %scope.path(), "Collector request failed");
            return Err(ClientError::Http { status, body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Collector for CollectorClient {
    async fn fetch(
        &self,
        team_name: &str,
        scope: &CollectorScope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<CollectorData> {
        self.get_data(team_name, scope, from, to)
            .await
            .map_err(ClientError::into_collector_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comedian_core::error::DomainError;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_user_in_project() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/rest/api/v1/logger/acme/user-in-project/U1/backend/2024-03-04/2024-03-04/",
            ))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"total_commits": 3, "worklogs": 28800})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = CollectorClient::new(
            format!("{}/", server.uri()),
            Some("secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let scope = CollectorScope::UserInProject {
            user_id: "U1".to_string(),
            project: "backend".to_string(),
        };
        let data = client.fetch("acme", &scope, date(4), date(4)).await.unwrap();
        assert_eq!(data.total_commits, 3);
        assert_eq!(data.worklogs, 28_800);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_collector_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = CollectorClient::new(server.uri(), None, Duration::from_secs(5)).unwrap();
        let err = client
            .fetch("acme", &CollectorScope::User("U1".to_string()), date(1), date(7))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CollectorError(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"total_commits": 1, "worklogs": 1}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = CollectorClient::new(server.uri(), None, Duration::from_millis(50)).unwrap();
        let err = client
            .get_data("acme", &CollectorScope::Project("x".to_string()), date(1), date(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
    }

    #[test]
    fn test_disabled_without_url() {
        let config = CollectorConfig {
            url: None,
            token: None,
            timeout_secs: 10,
        };
        assert!(CollectorClient::from_config(&config).unwrap().is_none());
    }
}
