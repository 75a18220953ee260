//! Slash command handler
//!
//! POST /commands

use axum::{extract::State, Json};
use comedian_common::AppError;
use comedian_service::dto::{CommandRequest, CommandResponse};
use comedian_service::services::CommandService;
use tracing::instrument;

use crate::extractors::ValidatedForm;
use crate::response::ApiResult;
use crate::state::AppState;

/// Run a slash command and answer with an ephemeral message.
///
/// Access denials and argument errors are answered with 200 and a
/// human-readable text; only transport level failures use error statuses.
#[instrument(
    skip(state, request),
    fields(team_id = %request.team_id, user_id = %request.user_id, command = %request.command)
)]
pub async fn handle_command(
    State(state): State<AppState>,
    ValidatedForm(request): ValidatedForm<CommandRequest>,
) -> ApiResult<Json<CommandResponse>> {
    if !tokens_match(request.token.as_bytes(), state.verification_token().as_bytes()) {
        return Err(AppError::InvalidVerificationToken.into());
    }

    let text = CommandService::new(state.service_context())
        .handle(&request)
        .await?;

    Ok(Json(CommandResponse::ephemeral(text)))
}

/// Compare without stopping at the first differing byte
fn tokens_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use comedian_common::{AppConfig, Translator};
    use comedian_core::entities::{BotSettings, User, UserRole};
    use comedian_core::mocks::{InMemoryStore, MockChatGateway};
    use comedian_core::traits::{BotSettingsRepository, UserRepository};
    use comedian_core::TimeOfDay;
    use comedian_service::ServiceContextBuilder;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::server::create_app;
    use crate::state::AppState;

    const TOKEN: &str = "verify";

    fn config() -> AppConfig {
        let vars = [
            ("API_PORT", "8080"),
            ("DATABASE_URL", "postgres://127.0.0.1:1/comedian"),
            ("SLACK_BOT_TOKEN", "xoxb-1"),
            ("SLACK_APP_TOKEN", "xapp-1"),
            ("SLACK_VERIFICATION_TOKEN", TOKEN),
            ("NOTIFIER_INTERVAL", "60"),
            ("REMINDER_REPEATS_MAX", "3"),
            ("REMINDER_TIME", "15"),
            ("REMINDER_OFFSET", "10"),
            ("REPORTING_CHANNEL", "CREPORT"),
            ("REPORT_TIME", "9:00"),
            ("LANGUAGE", "en"),
        ];
        AppConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        })
        .unwrap()
    }

    fn settings() -> BotSettings {
        BotSettings {
            id: 0,
            team_id: "T1".to_string(),
            team_name: "acme".to_string(),
            bot_user_id: "UBOT".to_string(),
            bot_access_token: "xoxb-1".to_string(),
            language: "en".to_string(),
            notifier_interval: 60,
            reminder_repeats_max: 3,
            reminder_time: 15,
            reminder_offset: 10,
            reporting_channel: "CREPORT".to_string(),
            report_time: TimeOfDay::NINE_AM,
            individual_reports_on: false,
            timezone: "UTC".to_string(),
        }
    }

    async fn app() -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        BotSettingsRepository::upsert(store.as_ref(), &settings())
            .await
            .unwrap();
        UserRepository::upsert(
            store.as_ref(),
            &User {
                id: 0,
                team_id: "T1".to_string(),
                user_id: "U1".to_string(),
                user_name: "alice".to_string(),
                real_name: "Alice".to_string(),
                role: UserRole::Admin,
                tz: String::new(),
            },
        )
        .await
        .unwrap();

        let ctx = ServiceContextBuilder::new()
            .store(store.clone())
            .chat(Arc::new(MockChatGateway::new()))
            .translator(Arc::new(Translator::new().unwrap()))
            .build()
            .unwrap();
        let config = config();
        // never connects; readiness sees the database as down
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(&config.database.url)
            .unwrap();
        let app = create_app(AppState::new(ctx, pool, config)).unwrap();
        (app, store)
    }

    fn form(pairs: &[(&str, &str)]) -> Request<Body> {
        let body = pairs
            .iter()
            .map(|(k, v)| format!("{k}={}", v.replace(' ', "+").replace('/', "%2F")))
            .collect::<Vec<_>>()
            .join("&");
        Request::post("/commands")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn command(token: &str, team: &str, command: &str, text: &str, user: &str) -> Request<Body> {
        form(&[
            ("token", token),
            ("team_id", team),
            ("command", command),
            ("text", text),
            ("channel_id", "C1"),
            ("channel_name", "general"),
            ("user_id", user),
        ])
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_help_is_answered_ephemerally() {
        let (app, _) = app().await;
        let response = app
            .oneshot(command(TOKEN, "T1", "/comedian", "help", "U1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response_type"], "ephemeral");
        assert!(body["text"].as_str().unwrap().contains("add_deadline"));
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let (app, _) = app().await;
        let response = app
            .oneshot(command("nope", "T1", "/comedian", "help", "U1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // same length, one byte off
        let (app, _) = self::app().await;
        let response = app
            .oneshot(command("verifx", "T1", "/comedian", "help", "U1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_tokens_match() {
        assert!(super::tokens_match(b"verify", b"verify"));
        assert!(!super::tokens_match(b"verify", b"verifx"));
        assert!(!super::tokens_match(b"verify", b"verify-long"));
        assert!(!super::tokens_match(b"", b"verify"));
    }

    #[tokio::test]
    async fn test_malformed_forms_are_bad_requests() {
        let (app, _) = app().await;
        let missing_user = form(&[
            ("token", TOKEN),
            ("team_id", "T1"),
            ("command", "/comedian"),
            ("channel_id", "C1"),
        ]);
        let response = app.clone().oneshot(missing_user).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(command(TOKEN, "T1", "/comedian", "help", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_team_or_user_is_not_found() {
        let (app, _) = app().await;
        let response = app
            .clone()
            .oneshot(command(TOKEN, "T9", "/comedian", "help", "U1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(command(TOKEN, "T1", "/comedian", "help", "U404"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_foreign_command_is_not_implemented() {
        let (app, _) = app().await;
        let response = app
            .oneshot(command(TOKEN, "T1", "/weather", "", "U1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let (app, store) = app().await;
        store.set_failing(true);
        let response = app
            .oneshot(command(TOKEN, "T1", "/comedian", "show", "U1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_probes() {
        let (app, _) = app().await;
        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["checks"]["database"], "unhealthy");
    }
}
