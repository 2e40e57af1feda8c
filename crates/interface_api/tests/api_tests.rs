//! HTTP API tests against in-memory storage

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use core_kernel::MemberId;
use domain_ledger::{
    ActivityCategory, InMemoryLedger, InMemoryRooms, LedgerConfig, LedgerService,
    RecordingActivitySink,
};
use interface_api::auth::create_token;
use interface_api::config::{ApiConfig, StorageBackend};
use interface_api::demo::seed_demo_household;
use interface_api::notifications::{BroadcastingActivitySink, RoomBroadcaster};
use interface_api::{create_router, AppState};
use test_utils::TestHousehold;

const SECRET: &str = "api-test-secret";

fn test_config() -> ApiConfig {
    ApiConfig {
        jwt_secret: SECRET.to_string(),
        storage: StorageBackend::Memory,
        ..ApiConfig::default()
    }
}

struct TestApp {
    router: Router,
    household: TestHousehold,
}

impl TestApp {
    async fn new() -> Self {
        let household = TestHousehold::new().await;
        let state = AppState::new(
            household.service.clone(),
            Arc::new(RoomBroadcaster::new()),
            test_config(),
        );
        Self {
            router: create_router(state),
            household,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        member: Option<MemberId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        call(&self.router, method, uri, member, body).await
    }
}

async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    member: Option<MemberId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(member_id) = member {
        let token = create_token(member_id, SECRET, 300).unwrap();
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ============================================================================
// Authentication and health
// ============================================================================

mod access_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let app = TestApp::new().await;
        let (status, body) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_storage() {
        let app = TestApp::new().await;
        let (status, body) = app.call(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["storage"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = TestApp::new().await;
        let (status, _) = app.call(Method::GET, "/api/v1/expenses", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_foreign_signature_is_unauthorized() {
        let app = TestApp::new().await;
        let token = create_token(app.household.ravi.id, "someone-else", 300).unwrap();
        let request = Request::builder()
            .uri("/api/v1/expenses")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_member_without_room() {
        let app = TestApp::new().await;
        let stranger = app.household.stranger.id;
        let (status, body) = app
            .call(Method::GET, "/api/v1/expenses/split", Some(stranger), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "You are not in a room.");
    }

    #[tokio::test]
    async fn test_demo_household_is_usable_with_its_tokens() {
        let rooms = Arc::new(InMemoryRooms::new());
        let demo = seed_demo_household(&rooms, &test_config()).await.unwrap();
        let service = Arc::new(LedgerService::new(
            rooms,
            Arc::new(InMemoryLedger::new()),
            Arc::new(RecordingActivitySink::new()),
            LedgerConfig::default(),
        ));
        let router = create_router(AppState::new(
            service,
            Arc::new(RoomBroadcaster::new()),
            test_config(),
        ));

        let owner = &demo.members[0];
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/expenses")
            .header(header::AUTHORIZATION, format!("Bearer {}", owner.token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "description": "Rent", "amount": 300 }).to_string()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let (status, split) = call(
            &router,
            Method::GET,
            "/api/v1/expenses/split",
            Some(demo.members[1].member.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(split["perHead"], 100.0);
        assert_eq!(split["balances"]["Asha"]["owes"], -200.0);
    }
}

// ============================================================================
// Expenses
// ============================================================================

mod expense_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_then_list() {
        let app = TestApp::new().await;
        let ravi = app.household.ravi.id;

        let (status, created) = app
            .call(
                Method::POST,
                "/api/v1/expenses",
                Some(ravi),
                Some(json!({ "description": "Groceries", "amount": 450.5 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["description"], "Groceries");
        assert_eq!(created["amount"], 450.5);
        assert_eq!(created["currency"], "INR");

        let owner = app.household.owner.id;
        let (status, listed) = app
            .call(Method::GET, "/api/v1/expenses", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["paidBy"], created["paidBy"]);
    }

    #[tokio::test]
    async fn test_invalid_bodies_rejected() {
        let app = TestApp::new().await;
        let ravi = app.household.ravi.id;

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/expenses",
                Some(ravi),
                Some(json!({ "description": "", "amount": 10 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/expenses",
                Some(ravi),
                Some(json!({ "description": "Refund", "amount": -5 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/expenses",
                Some(ravi),
                Some(json!({ "description": "   ", "amount": 5 })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_oversized_amounts_leave_the_room_usable() {
        let app = TestApp::new().await;
        let ravi = app.household.ravi.id;

        for _ in 0..2 {
            let (status, body) = app
                .call(
                    Method::POST,
                    "/api/v1/expenses",
                    Some(ravi),
                    Some(json!({ "description": "Yacht", "amount": 5.0e28 })),
                )
                .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error"], "validation_error");
        }

        let (status, body) = app
            .call(Method::GET, "/api/v1/expenses/split", Some(ravi), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0.0);
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let app = TestApp::new().await;
        let (ravi, meera) = (app.household.ravi.id, app.household.meera.id);

        let (_, created) = app
            .call(
                Method::POST,
                "/api/v1/expenses",
                Some(ravi),
                Some(json!({ "description": "Gas", "amount": 900 })),
            )
            .await;
        let uri = format!("/api/v1/expenses/{}", created["id"].as_str().unwrap());

        let (status, _) = app.call(Method::DELETE, &uri, Some(meera), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.call(Method::DELETE, &uri, Some(ravi), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Expense removed.");

        let (status, body) = app.call(Method::DELETE, &uri, Some(ravi), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Expense not found.");
    }

    #[tokio::test]
    async fn test_malformed_expense_id() {
        let app = TestApp::new().await;
        let owner = app.household.owner.id;
        let (status, _) = app
            .call(Method::DELETE, "/api/v1/expenses/not-an-id", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_clear_is_owner_only() {
        let app = TestApp::new().await;
        let (owner, ravi) = (app.household.owner.id, app.household.ravi.id);
        app.call(
            Method::POST,
            "/api/v1/expenses",
            Some(ravi),
            Some(json!({ "description": "Rent", "amount": 3000 })),
        )
        .await;

        let (status, _) = app
            .call(Method::DELETE, "/api/v1/expenses/clear", Some(ravi), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .call(Method::DELETE, "/api/v1/expenses/clear", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "All expenses and settlements have been cleared.");
        assert_eq!(body["expensesRemoved"], 1);

        let (_, split) = app
            .call(Method::GET, "/api/v1/expenses/split", Some(owner), None)
            .await;
        assert_eq!(split["total"], 0.0);
    }
}

// ============================================================================
// Balances and settle-up
// ============================================================================

mod balance_tests {
    use super::*;

    #[tokio::test]
    async fn test_split_and_chart() {
        let app = TestApp::new().await;
        let owner = app.household.owner.id;
        app.call(
            Method::POST,
            "/api/v1/expenses",
            Some(owner),
            Some(json!({ "description": "Internet", "amount": 100 })),
        )
        .await;

        let (status, split) = app
            .call(Method::GET, "/api/v1/expenses/split", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(split["total"], 100.0);
        assert_eq!(split["perHead"], 33.33);
        assert_eq!(split["balances"]["Asha"]["owes"], -66.67);
        assert_eq!(split["balances"]["Ravi"]["owes"], 33.33);
        assert_eq!(
            split["balances"]["Meera"]["userId"],
            app.household.meera.id.as_uuid().to_string()
        );

        let (status, chart) = app
            .call(Method::GET, "/api/v1/expenses/chart-data", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(chart, json!({ "Asha": 100.0 }));
    }

    #[tokio::test]
    async fn test_settle_flow() {
        let app = TestApp::new().await;
        let (owner, ravi) = (app.household.owner.id, app.household.ravi.id);
        app.call(
            Method::POST,
            "/api/v1/expenses",
            Some(owner),
            Some(json!({ "description": "Electricity", "amount": 300 })),
        )
        .await;

        let (status, body) = app
            .call(Method::POST, "/api/v1/expenses/settle", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You do not have an outstanding balance to settle.");

        let (status, body) = app
            .call(Method::POST, "/api/v1/expenses/settle", Some(ravi), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Balance settled successfully.");
        assert_eq!(body["settlement"]["amount"], 100.0);

        let (status, _) = app
            .call(Method::POST, "/api/v1/expenses/settle", Some(ravi), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, split) = app
            .call(Method::GET, "/api/v1/expenses/split", Some(ravi), None)
            .await;
        assert_eq!(split["balances"]["Asha"]["owes"], -100.0);
        assert_eq!(split["balances"]["Ravi"]["owes"], 0.0);
        assert_eq!(split["balances"]["Meera"]["owes"], 100.0);
    }

    #[tokio::test]
    async fn test_settle_notifies_room() {
        let household = TestHousehold::new().await;
        let broadcaster = Arc::new(RoomBroadcaster::new());
        let sink = Arc::new(BroadcastingActivitySink::new(
            household.activity.clone(),
            broadcaster.clone(),
        ));
        let service = Arc::new(LedgerService::new(
            household.rooms.clone(),
            household.ledger.clone(),
            sink,
            household.service.config().clone(),
        ));
        let router = create_router(AppState::new(service, broadcaster.clone(), test_config()));
        let mut feed = broadcaster.subscribe(household.room.id);

        call(
            &router,
            Method::POST,
            "/api/v1/expenses",
            Some(household.owner.id),
            Some(json!({ "description": "Water", "amount": 90 })),
        )
        .await;
        let (status, _) = call(
            &router,
            Method::POST,
            "/api/v1/expenses/settle",
            Some(household.meera.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let added = feed.recv().await.unwrap();
        assert_eq!(added.user_name, "Asha");
        let settled = feed.recv().await.unwrap();
        assert_eq!(settled.category, ActivityCategory::Expense);
        assert_eq!(settled.description, "Meera settled their expenses for ₹30.00");
        assert_eq!(household.activity.events().await.len(), 2);
    }
}
