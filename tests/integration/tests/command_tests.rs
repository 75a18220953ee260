//! Slash-command integration tests
//!
//! These tests require a running PostgreSQL instance and `DATABASE_URL`.
//!
//! Run with: cargo test -p integration-tests --test command_tests

use comedian_core::traits::{ChannelRepository, StanduperRepository};
use comedian_core::{ChannelRole, TimeOfDay};
use comedian_db::{PgChannelRepository, PgStanduperRepository};
use integration_tests::{
    assert_json, assert_status, check_test_env, unique_id, TestServer, Workspace,
    VERIFICATION_TOKEN,
};
use reqwest::StatusCode;
use serde_json::Value;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_probes() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Command Tests
// ============================================================================

#[tokio::test]
async fn test_help() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let ws = Workspace::seed(&server.pool).await.unwrap();

    let response = server
        .command(VERIFICATION_TOKEN, ws.team_id(), &ws.channel_id, &ws.admin_id, "help")
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["response_type"], "ephemeral");
    assert!(body["text"].as_str().unwrap().contains("add_deadline"));
}

#[tokio::test]
async fn test_add_and_show_members() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let ws = Workspace::seed(&server.pool).await.unwrap();
    let dev = unique_id("U");

    let response = server
        .command(
            VERIFICATION_TOKEN,
            ws.team_id(),
            &ws.channel_id,
            &ws.admin_id,
            &format!("add <@{dev}|dev> / developer"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let standuper = PgStanduperRepository::new(server.pool.clone())
        .find(&dev, &ws.channel_id)
        .await
        .unwrap()
        .expect("standuper stored");
    assert_eq!(standuper.role, ChannelRole::Developer);

    let response = server
        .command(VERIFICATION_TOKEN, ws.team_id(), &ws.channel_id, &ws.admin_id, "show")
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body["text"].as_str().unwrap().contains(&dev));
}

#[tokio::test]
async fn test_deadline_round_trip() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let ws = Workspace::seed(&server.pool).await.unwrap();

    let response = server
        .command(
            VERIFICATION_TOKEN,
            ws.team_id(),
            &ws.channel_id,
            &ws.admin_id,
            "add_deadline 10:30 mon tue wed thu fri",
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let channel = PgChannelRepository::new(server.pool.clone())
        .find_by_channel_id(&ws.channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(channel.standup_deadline, TimeOfDay::from_hm(10, 30));

    let response = server
        .command(
            VERIFICATION_TOKEN,
            ws.team_id(),
            &ws.channel_id,
            &ws.admin_id,
            "show_deadline",
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body["text"].as_str().unwrap().contains("10:30"));
}

#[tokio::test]
async fn test_rejections() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let ws = Workspace::seed(&server.pool).await.unwrap();

    let response = server
        .command("wrong", ws.team_id(), &ws.channel_id, &ws.admin_id, "help")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .command(VERIFICATION_TOKEN, &unique_id("T"), &ws.channel_id, &ws.admin_id, "help")
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
