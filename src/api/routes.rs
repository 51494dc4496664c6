use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{admin, games, players, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/venues", get(games::list_venues))
        .route("/api/games", get(games::list_games))
        .route("/api/games/:id", get(games::get_game))
        .route("/api/games/:id/players", get(games::get_game_players))
        .route("/api/games/:id/register", post(games::register))
        .route("/api/games/:id/drop-out", post(games::drop_out))
        .route("/api/games/:id/preferences", put(games::update_preferences))
        .route("/api/games/:id/teams", get(games::get_teams))
        .route("/api/players", get(players::list_players))
        .route("/api/players/:id", get(players::get_player))
        .route("/api/players/:id/discipline", get(players::get_discipline))
        .route("/api/admin/players", post(admin::create_player))
        .route("/api/admin/players/:id", put(admin::update_player))
        .route("/api/admin/players/:id/stats", put(admin::update_stats))
        .route("/api/admin/players/:id/credits", post(admin::adjust_credits))
        .route("/api/admin/venues", post(admin::create_venue))
        .route("/api/admin/games", post(admin::create_games))
        .route("/api/admin/games/:id", delete(admin::cancel_game))
        .route("/api/admin/games/:id/series", delete(admin::cancel_series))
        .route("/api/admin/games/:id/players", post(admin::add_player))
        .route("/api/admin/games/:id/players/:player_id", delete(admin::remove_player))
        .route("/api/admin/games/:id/generate-teams", post(admin::generate_teams))
        .route("/api/admin/games/:id/complete", post(admin::complete_game))
        .route("/api/admin/discipline", post(admin::record_discipline))
        .route("/api/admin/recalculate-tiers", post(admin::recalculate_tiers))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::settings::AppConfig;
    use crate::database::{create_memory_pool, get_connection, setup};

    const ADMIN: &str = "Bearer secret";

    fn app() -> Router {
        let pool = create_memory_pool().unwrap();
        setup::ensure_schema(&get_connection(&pool).unwrap()).unwrap();
        create_router(Arc::new(AppState {
            pool,
            config: AppConfig::new(),
        }))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn new_player(app: &Router, name: &str, credits: i64) -> i64 {
        let (status, player) = send(
            app,
            "POST",
            "/api/admin/players",
            &[("Authorization", ADMIN)],
            Some(json!({ "fullName": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = player["id"].as_i64().unwrap();

        if credits != 0 {
            let (status, _) = send(
                app,
                "POST",
                &format!("/api/admin/players/{id}/credits"),
                &[("Authorization", ADMIN)],
                Some(json!({ "amount": credits })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        id
    }

    async fn new_game(app: &Router, date: &str) -> i64 {
        let (status, created) = send(
            app,
            "POST",
            "/api/admin/games",
            &[("Authorization", ADMIN)],
            Some(json!({
                "gameDate": date,
                "maxPlayers": 10,
                "costPerPlayer": 500,
                "format": "5-a-side"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        created["games"][0]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let app = app();
        let body = json!({ "fullName": "X" });
        let (status, body) = send(&app, "POST", "/api/admin/players", &[], Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "admin token required");

        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/recalculate-tiers",
            &[("Authorization", "Bearer wrong")],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_games_listing_needs_identity() {
        let app = app();
        let (status, _) = send(&app, "GET", "/api/games", &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = [("Authorization", ADMIN)];
        let (status, body) = send(&app, "GET", "/api/games", &admin, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_booking_flow() {
        let app = app();
        let game = new_game(&app, "2099-05-05T19:00:00").await;
        let mut players = Vec::new();
        for (name, credits) in [("Ann Lee", 500), ("Bob Fox", 500), ("Cat Ng", 100)] {
            players.push(new_player(&app, name, credits).await);
        }

        let identity = players[0].to_string();
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/games/{game}/register"),
            &[("X-Player-Id", identity.as_str())],
            Some(json!({ "position": "GK", "pairs": [players[1]] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "confirmed");

        let broke = players[2].to_string();
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/games/{game}/register"),
            &[("X-Player-Id", broke.as_str())],
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "insufficient credits");

        let uri = format!("/api/games/{game}/players");
        let (status, roster) = send(&app, "GET", &uri, &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(roster[0]["isGoalkeeper"], true);
        assert_eq!(roster[0]["pairs"][0].as_i64(), Some(players[1]));

        let (status, detail) = send(&app, "GET", &format!("/api/games/{game}"), &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["currentPlayers"], 1);
        assert_eq!(detail["registeredPlayers"][0]["displayName"], "Ann");

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/games/{game}/drop-out"),
            &[("X-Player-Id", identity.as_str())],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["refunded"], 500);
    }

    #[tokio::test]
    async fn test_generate_teams_and_complete() {
        let app = app();
        let game = new_game(&app, "2099-06-01T19:00:00").await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/admin/games/{game}/generate-teams"),
            &[("Authorization", ADMIN)],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least 2"));

        for name in ["Dee", "Eve", "Fay", "Gus"] {
            let id = new_player(&app, name, 0).await;
            let (status, _) = send(
                &app,
                "POST",
                &format!("/api/admin/games/{game}/players"),
                &[("Authorization", ADMIN)],
                Some(json!({ "playerId": id })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, result) = send(
            &app,
            "POST",
            &format!("/api/admin/games/{game}/generate-teams"),
            &[("Authorization", ADMIN)],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["redTeam"].as_array().unwrap().len(), 2);
        assert_eq!(result["blueTeam"].as_array().unwrap().len(), 2);

        let uri = format!("/api/games/{game}/teams");
        let (status, sheet) = send(&app, "GET", &uri, &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sheet["redTeam"].as_array().unwrap().len(), 2);

        let (status, outcome) = send(
            &app,
            "POST",
            &format!("/api/admin/games/{game}/complete"),
            &[("Authorization", ADMIN)],
            Some(json!({ "winningTeam": "red" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["nominees"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_entities_are_not_found() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/games/77", &[], None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "game not found");

        let (status, _) = send(&app, "GET", "/api/players/5/discipline", &[], None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let admin = [("Authorization", ADMIN)];
        let (status, _) = send(&app, "DELETE", "/api/admin/games/9", &admin, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/players/5", &admin, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_player_directory_and_profiles() {
        let app = app();
        let zed = new_player(&app, "Zed Adams", 250).await;
        let amy = new_player(&app, "Amy Cole", 0).await;
        let admin = [("Authorization", ADMIN)];

        let (status, _) = send(&app, "GET", "/api/players", &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/admin/players/{zed}"),
            &admin,
            Some(json!({ "squadNumber": 7, "totalGoals": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let viewer = amy.to_string();
        let identity = [("X-Player-Id", viewer.as_str())];
        let (status, directory) = send(&app, "GET", "/api/players", &identity, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(directory[0]["id"].as_i64(), Some(zed));
        assert_eq!(directory[0]["squadNumber"], 7);
        assert_eq!(directory[1]["displayName"], "Amy");

        // Someone else's profile is the public view.
        let uri = format!("/api/players/{zed}");
        let (status, public) = send(&app, "GET", &uri, &identity, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(public["totalGoals"], 3);
        assert!(public.get("credits").is_none());
        assert!(public.get("phone").is_none());

        let (status, full) = send(&app, "GET", &uri, &admin, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(full["credits"], 250);
        assert_eq!(full["fullName"], "Zed Adams");

        let uri = format!("/api/players/{amy}");
        let (status, own) = send(&app, "GET", &uri, &identity, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(own["credits"], 0);

        let (status, _) = send(&app, "GET", &uri, &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_player_edit() {
        let app = app();
        let player = new_player(&app, "Ann Lee", 100).await;
        let uri = format!("/api/admin/players/{player}");
        let update = json!({ "squadNumber": 4, "phone": "0712", "balance": 900 });

        let (status, _) = send(&app, "PUT", &uri, &[], Some(update.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = [("Authorization", ADMIN)];
        let (status, body) = send(&app, "PUT", &uri, &admin, Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["squadNumber"], 4);
        assert_eq!(body["phone"], "0712");
        assert_eq!(body["credits"], 900);

        let (status, body) =
            send(&app, "PUT", &uri, &admin, Some(json!({ "squadNumber": -3 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "squad number must be positive");

        let (status, _) =
            send(&app, "PUT", "/api/admin/players/999", &admin, Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let stats = json!({ "shooting": 3_000_000_000i64 });
        let (status, _) =
            send(&app, "PUT", &format!("{uri}/stats"), &admin, Some(stats)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_standalone_discipline_record() {
        let app = app();
        let game = new_game(&app, "2099-07-07T19:00:00").await;
        let player = new_player(&app, "Bob Fox", 0).await;
        let record = json!({
            "playerId": player,
            "gameId": game,
            "points": 7,
            "reason": "No show"
        });

        let uri = "/api/admin/discipline";
        let (status, _) = send(&app, "POST", uri, &[], Some(record.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = [("Authorization", ADMIN)];
        let (status, body) = send(&app, "POST", uri, &admin, Some(record)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reliabilityTier"], "white");

        let summary_uri = format!("/api/players/{player}/discipline");
        let (status, summary) = send(&app, "GET", &summary_uri, &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["totalPoints"], 7);
        assert_eq!(summary["records"][0]["reason"], "No show");

        let bad = json!({ "playerId": player, "gameId": game, "points": 0, "reason": "x" });
        let (status, _) = send(&app, "POST", uri, &admin, Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
