//! Bot runtime integration tests
//!
//! These tests require a running PostgreSQL instance and `DATABASE_URL`.
//! Slack is replaced by a local wiremock server.
//!
//! Run with: cargo test -p integration-tests --test bot_tests

use std::sync::Arc;

use comedian_core::events::{MessageDeletedPayload, MessagePayload};
use comedian_core::traits::{StandupRepository, StanduperRepository};
use comedian_core::ChatEvent;
use comedian_db::{create_pool, migrations_dir, run_migrations, PgStandupRepository, PgStanduperRepository, PoolConfig};
use comedian_gateway::bot::Bot;
use comedian_gateway::server::build_service_context;
use integration_tests::{check_test_env, mock_slack, test_config, unique_id, Workspace};

#[tokio::test]
async fn test_standup_lifecycle() {
    if !check_test_env() {
        return;
    }

    let slack = mock_slack().await;
    let config = test_config(&slack.uri()).unwrap();
    let pool = create_pool(&PoolConfig::from(&config.database)).await.unwrap();
    run_migrations(&pool, &migrations_dir()).await.unwrap();
    let ws = Workspace::seed(&pool).await.unwrap();

    let ctx = Arc::new(build_service_context(&pool, &config).unwrap());
    let bot = Bot::new(ctx, ws.settings.clone());

    let user = unique_id("U");
    let ts = unique_id("1700000000.");
    let message = |text: &str| MessagePayload {
        team_id: ws.team_id().to_string(),
        channel_id: ws.channel_id.clone(),
        user_id: user.clone(),
        text: text.to_string(),
        ts: ts.clone(),
    };

    bot.handle_event(&ChatEvent::MessageCreated(message(
        "<@UBOT> yesterday fixed login, today reports, no problems",
    )))
    .await;

    let standups = PgStandupRepository::new(pool.clone());
    let stored = standups
        .find_by_message_ts(&ws.channel_id, &ts)
        .await
        .unwrap()
        .expect("standup stored");
    assert_eq!(stored.comment, "yesterday fixed login, today reports, no problems");

    // first-time posters are enrolled as developers
    assert!(PgStanduperRepository::new(pool.clone())
        .find(&user, &ws.channel_id)
        .await
        .unwrap()
        .is_some());

    bot.handle_event(&ChatEvent::MessageEdited(message(
        "<@UBOT> yesterday fixed login, today reports, problem with CI",
    )))
    .await;
    let edited = standups
        .find_by_message_ts(&ws.channel_id, &ts)
        .await
        .unwrap()
        .unwrap();
    assert!(edited.comment.ends_with("problem with CI"));

    bot.handle_event(&ChatEvent::MessageDeleted(MessageDeletedPayload {
        team_id: ws.team_id().to_string(),
        channel_id: ws.channel_id.clone(),
        deleted_ts: ts.clone(),
    }))
    .await;
    assert!(standups
        .find_by_message_ts(&ws.channel_id, &ts)
        .await
        .unwrap()
        .is_none());
}
