//! API Integration Tests
//!
//! Each test starts a gateway on the in-memory store, so no external
//! services are required.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, fixtures::*, test_config, TestServer};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let health: HealthBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.tracked_users, 0);
    assert_eq!(health.events_received, 0);
}

// ============================================================================
// Ingest Tests
// ============================================================================

#[tokio::test]
async fn test_ingest_single_event() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user, group) = (unique_id(), unique_id());

    let response = server
        .post("/events", &member_add(user, group, base_time()))
        .await
        .unwrap();
    let ingest: IngestBody = assert_json(response, StatusCode::ACCEPTED).await.unwrap();
    assert_eq!(ingest.queued, 1);

    server.wait_for_dispatch().await.unwrap();

    let response = server.get(&format!("/users/{user}/presence")).await.unwrap();
    let presence: PresenceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(presence.tracked);
    assert_eq!(presence.anchor_group, Some(group.to_string()));
    assert!(!presence.engaged);
}

#[tokio::test]
async fn test_ingest_invalid_event() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/events", &json!({ "t": "MESSAGE_CREATE", "d": {} }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_EVENT");

    let response = server.post_raw("/events", "{not json").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_bots_are_not_tracked() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (bot, group) = (unique_id(), unique_id());

    server.send_events(&[bot_add(bot, group)]).await.unwrap();

    let response = server.get(&format!("/users/{bot}/presence")).await.unwrap();
    let presence: PresenceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!presence.tracked);
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_session_lifecycle_across_groups() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user, g1, g2) = (unique_id(), unique_id(), unique_id());

    server
        .send_events(&[
            member_add(user, g1, at_minutes(0)),
            member_add(user, g2, at_minutes(0)),
            presence(user, Some("chess"), at_minutes(0)),
            presence(user, None, at_minutes(60)),
        ])
        .await
        .unwrap();

    let response = server.get(&format!("/users/{user}/stats")).await.unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.duration_of("chess"), Some(60 * MINUTE_MS));
    assert_eq!(stats.total_duration_ms, 60 * MINUTE_MS);

    // Leaving the anchor group promotes the other one
    server
        .send_events(&[member_remove(user, g1, at_minutes(61))])
        .await
        .unwrap();
    let response = server.get(&format!("/users/{user}/presence")).await.unwrap();
    let presence: PresenceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(presence.tracked);
    assert_eq!(presence.anchor_group, Some(g2.to_string()));
    assert!(presence.other_groups.is_empty());

    // Leaving the last group forgets the user but keeps the stats
    server
        .send_events(&[member_remove(user, g2, at_minutes(62))])
        .await
        .unwrap();
    let response = server.get(&format!("/users/{user}/presence")).await.unwrap();
    let presence: PresenceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!presence.tracked);

    let response = server.get(&format!("/users/{user}/stats")).await.unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.duration_of("chess"), Some(60 * MINUTE_MS));
}

#[tokio::test]
async fn test_switching_activity_closes_previous_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user, group) = (unique_id(), unique_id());

    server
        .send_events(&[
            member_add(user, group, at_minutes(0)),
            presence(user, Some("chess"), at_minutes(0)),
            presence(user, Some("go"), at_minutes(30)),
            presence(user, None, at_minutes(45)),
        ])
        .await
        .unwrap();

    let response = server.get(&format!("/users/{user}/stats")).await.unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.duration_of("chess"), Some(30 * MINUTE_MS));
    assert_eq!(stats.duration_of("go"), Some(15 * MINUTE_MS));
    assert_eq!(stats.distinct_games, 2);
    // Default listing is most played first
    assert_eq!(stats.stats[0].game, "chess");
}

#[tokio::test]
async fn test_leaving_last_group_closes_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user, group) = (unique_id(), unique_id());

    server
        .send_events(&[
            member_add(user, group, at_minutes(0)),
            presence(user, Some("chess"), at_minutes(0)),
            member_remove(user, group, at_minutes(20)),
        ])
        .await
        .unwrap();

    let response = server.get(&format!("/users/{user}/stats")).await.unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.duration_of("chess"), Some(20 * MINUTE_MS));
}

#[tokio::test]
async fn test_presence_for_unknown_user_is_ignored() {
    let server = TestServer::start().await.expect("Failed to start server");
    let user = unique_id();

    server
        .send_events(&[
            presence(user, Some("chess"), at_minutes(0)),
            presence(user, None, at_minutes(10)),
        ])
        .await
        .unwrap();

    let response = server.get(&format!("/users/{user}/stats")).await.unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(stats.stats.is_empty());
    assert_eq!(stats.total_duration_ms, 0);
}

#[tokio::test]
async fn test_group_lifecycle() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, bob, group) = (unique_id(), unique_id(), unique_id());

    server
        .send_events(&[
            group_available(group, &[(alice, Some("chess")), (bob, None)], at_minutes(0)),
            group_removed(group, at_minutes(15)),
        ])
        .await
        .unwrap();

    let response = server.get(&format!("/users/{alice}/stats")).await.unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.duration_of("chess"), Some(15 * MINUTE_MS));

    for user in [alice, bob] {
        let response = server.get(&format!("/users/{user}/presence")).await.unwrap();
        let presence: PresenceBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(!presence.tracked);
    }
}

// ============================================================================
// Stats Tests
// ============================================================================

#[tokio::test]
async fn test_ignore_hides_game() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user, group) = (unique_id(), unique_id());

    server
        .send_events(&[
            member_add(user, group, at_minutes(0)),
            presence(user, Some("chess"), at_minutes(0)),
            presence(user, Some("go"), at_minutes(10)),
            presence(user, None, at_minutes(20)),
        ])
        .await
        .unwrap();

    let response = server
        .put(&format!("/users/{user}/stats/chess/ignored"), &json!({ "ignored": true }))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/users/{user}/stats")).await.unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.stats.len(), 1);
    assert_eq!(stats.stats[0].game, "go");
    assert_eq!(stats.visible_count, 1);
    assert_eq!(stats.ignored_count, 1);

    let response = server
        .get(&format!("/users/{user}/stats?include_ignored=true"))
        .await
        .unwrap();
    let stats: UserStatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.stats.len(), 2);
    assert!(stats.stats.iter().any(|s| s.game == "chess" && s.ignored));
}

#[tokio::test]
async fn test_ignore_unknown_game_not_found() {
    let server = TestServer::start().await.expect("Failed to start server");
    let user = unique_id();

    let response = server
        .put(&format!("/users/{user}/stats/chess/ignored"), &json!({ "ignored": true }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_stats_query_validation() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/users/not-a-number/stats").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let user = unique_id();
    let response = server
        .get(&format!("/users/{user}/stats?limit=0"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let response = server
        .get(&format!("/users/{user}/stats?limit=101"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let response = server
        .get(&format!("/users/{user}/stats?sort=sideways"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_malformed_bodies_return_error_json() {
    let server = TestServer::start().await.expect("Failed to start server");
    let user = unique_id();

    let response = server
        .put(&format!("/users/{user}/stats/chess/ignored"), &json!({ "ignored": "yes" }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_REQUEST_BODY");

    let response = server
        .patch(&format!("/users/{user}/settings"), &json!({ "graph_type": "radar" }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_REQUEST_BODY");

    let response = server.put("/icons/chess", &json!({ "color": "#336699" })).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_REQUEST_BODY");
}

#[tokio::test]
async fn test_icon_location_validation() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.put("/icons/chess", &json!({ "location": "" })).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let response = server.put("/icons/chess", &json!({ "location": "   " })).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let response = server.get("/icons/chess").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_global_summary() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, bob, group) = (unique_id(), unique_id(), unique_id());

    server
        .send_events(&[
            member_add(alice, group, at_minutes(0)),
            member_add(bob, group, at_minutes(0)),
            presence(alice, Some("chess"), at_minutes(0)),
            presence(bob, Some("chess"), at_minutes(0)),
            presence(alice, None, at_minutes(10)),
            presence(bob, None, at_minutes(5)),
        ])
        .await
        .unwrap();

    let response = server.get("/stats").await.unwrap();
    let summary: SummaryBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary.tracked_users, 2);
    assert_eq!(summary.stat_records, 2);
    assert_eq!(summary.distinct_games, 1);
    assert_eq!(summary.total_duration_ms, 15 * MINUTE_MS);
    assert_eq!(summary.lost_increments, 0);
}

// ============================================================================
// Settings Tests
// ============================================================================

#[tokio::test]
async fn test_settings_defaults_and_update() {
    let server = TestServer::start().await.expect("Failed to start server");
    let user = unique_id();

    let response = server.get(&format!("/users/{user}/settings")).await.unwrap();
    let settings: SettingsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(settings.user_id, user.to_string());
    assert_eq!(settings.graph_type, "bar");
    assert!(!settings.mention_for_stats);

    let response = server
        .patch(
            &format!("/users/{user}/settings"),
            &json!({ "graph_type": "pie", "mention_for_stats": true }),
        )
        .await
        .unwrap();
    let settings: SettingsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(settings.graph_type, "pie");
    assert!(settings.mention_for_stats);

    // A partial update keeps the other field
    let response = server
        .patch(&format!("/users/{user}/settings"), &json!({ "graph_type": "bar" }))
        .await
        .unwrap();
    let settings: SettingsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(settings.graph_type, "bar");
    assert!(settings.mention_for_stats);
}

#[tokio::test]
async fn test_configured_default_graph() {
    let config = test_config(&[("DEFAULT_GRAPH_TYPE", "pie")]).unwrap();
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    let (user, group) = (unique_id(), unique_id());

    server
        .send_events(&[member_add(user, group, base_time())])
        .await
        .unwrap();

    let response = server.get(&format!("/users/{user}/settings")).await.unwrap();
    let settings: SettingsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(settings.graph_type, "pie");
}

// ============================================================================
// Icon Tests
// ============================================================================

#[tokio::test]
async fn test_icon_register_and_blacklist() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/icons/chess").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .put(
            "/icons/chess",
            &json!({ "location": "https://cdn.example.com/chess.png", "color": "#336699" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get("/icons/chess").await.unwrap();
    let icon: IconBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(icon.game, "chess");
    assert_eq!(icon.location, "https://cdn.example.com/chess.png");
    assert_eq!(icon.color.as_deref(), Some("#336699"));

    let response = server.put("/icons/chess/blacklist", &json!({})).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/icons/chess").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
