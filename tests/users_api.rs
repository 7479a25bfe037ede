use buddymatch::api::users::{SESSION_COOKIE, recover_error, routes};
use buddymatch::domain_model::UserId;
use buddymatch::domain_port::SessionStore;
use buddymatch::server::Server;
use buddymatch::settings::parse_settings;
use serde_json::Value;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

struct TestApp {
    server: Arc<Server>,
}

struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestApp {
    /// Memory store seeded from `fixtures/user_data.json`, fresh per test.
    async fn new() -> Self {
        let settings = parse_settings(Some("settings/dev.toml")).unwrap();
        let server = Server::try_new(&settings).await.unwrap();
        TestApp {
            server: Arc::new(server),
        }
    }

    async fn call(&self, method: &str, path: &str, user: Option<i64>) -> TestResponse {
        let api = warp::path("api")
            .and(routes(self.server.clone()))
            .recover(recover_error);

        let mut request = warp::test::request().method(method).path(path);
        if let Some(user) = user {
            let session = self
                .server
                .session_store
                .open(UserId(user))
                .await
                .unwrap();
            request = request.header("cookie", format!("{SESSION_COOKIE}={session}"));
        }

        let response = request.reply(&api).await;
        let body = if response.body().is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(response.body()).unwrap()
        };
        TestResponse {
            status: response.status(),
            body,
        }
    }

    async fn buddy_ids(&self, user: i64) -> Vec<i64> {
        let response = self.call("GET", "/api/users/buddy", Some(user)).await;
        assert_eq!(response.status, StatusCode::OK);
        response
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_i64().unwrap())
            .collect()
    }
}

#[tokio::test]
async fn get_self() {
    let app = TestApp::new().await;
    let response = app.call("GET", "/api/users", Some(1)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], 1);
    assert_eq!(response.body["name"], "Pink Elephant");
    assert_eq!(response.body["email"], "pink.elephant@gmail.com");
    assert_eq!(response.body["pairingEnabled"], false);
    assert_eq!(response.body["buddyCount"], 3);
}

#[tokio::test]
async fn get_self_without_session_is_unauthorized() {
    let app = TestApp::new().await;
    let response = app.call("GET", "/api/users", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"]["code"], "Unauthenticated");
}

#[tokio::test]
async fn get_existing_user() {
    let app = TestApp::new().await;
    let response = app.call("GET", "/api/users/1", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], 1);
    assert_eq!(response.body["name"], "Pink Elephant");
    assert_eq!(response.body["buddyCount"], 3);
}

#[tokio::test]
async fn get_non_existing_user() {
    let app = TestApp::new().await;
    let response = app
        .call("GET", "/api/users/8123456789012345678?pairingEnabled=true", None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["code"], "UserNotFound");
}

#[tokio::test]
async fn update_pairing_enabled_for_self() {
    let app = TestApp::new().await;
    let response = app
        .call("PUT", "/api/users?pairingEnabled=true", Some(1))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let me = app.call("GET", "/api/users", Some(1)).await;
    assert_eq!(me.body["pairingEnabled"], true);
    let other = app.call("GET", "/api/users/2", None).await;
    assert_eq!(other.body["pairingEnabled"], false);
}

#[tokio::test]
async fn update_pairing_without_flag_is_bad_request() {
    let app = TestApp::new().await;
    let response = app.call("PUT", "/api/users", Some(1)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_user_buddy() {
    let app = TestApp::new().await;
    let response = app.call("GET", "/api/users/buddy", Some(2)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[0]["name"], "Pink Elephant");
    assert_eq!(body[0]["email"], "pink.elephant@gmail.com");
    assert_eq!(body[0]["pairingEnabled"], false);
    assert_eq!(body[1]["id"], 3);
    assert_eq!(body[1]["name"], "Hiruna Smith");
    assert_eq!(body[1]["email"], "hiruna.smith@gmail.com");
    assert_eq!(body[2]["id"], 4);
    assert_eq!(body[2]["name"], "Flynn Smith");
    assert_eq!(body[2]["email"], "flynn.smith@gmail.com");
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn get_user_buddies_in_course() {
    let app = TestApp::new().await;
    let response = app.call("GET", "/api/users/buddy/course/1", Some(1)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    assert_eq!(body[0]["id"], 2);
    assert_eq!(body[0]["name"], "Green Dinosaur");
    assert_eq!(body[0]["email"], "green.dinosaur@gmail.com");
    assert_eq!(body[1]["id"], 4);
    assert_eq!(body[1]["name"], "Flynn Smith");
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn buddies_in_unknown_course_is_not_found() {
    let app = TestApp::new().await;
    let response = app.call("GET", "/api/users/buddy/course/77", Some(1)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["code"], "CourseNotFound");
}

#[tokio::test]
async fn create_and_delete_user_buddy() {
    let app = TestApp::new().await;

    let response = app.call("POST", "/api/users/buddy/4", Some(3)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.buddy_ids(4).await.contains(&3));

    let response = app.call("DELETE", "/api/users/buddy/4", Some(3)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.buddy_ids(3).await, vec![1, 2]);
}

#[tokio::test]
async fn adding_self_or_blocked_user_is_forbidden() {
    let app = TestApp::new().await;

    let response = app.call("POST", "/api/users/buddy/3", Some(3)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"]["code"], "SelfTarget");

    // user 5 blocks user 1 in the seed
    let response = app.call("POST", "/api/users/buddy/5", Some(1)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"]["code"], "Blocked");

    let response = app.call("POST", "/api/users/buddy/404", Some(1)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn block_user() {
    let app = TestApp::new().await;

    assert_eq!(app.buddy_ids(2).await[0], 1);

    let response = app.call("POST", "/api/users/buddy/1/block", Some(2)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.buddy_ids(2).await[0], 3);

    let response = app.call("POST", "/api/users/buddy/3/block", Some(2)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.buddy_ids(2).await[0], 4);

    // symmetric and reflected in the count
    assert_eq!(app.buddy_ids(1).await, vec![3, 4]);
    let me = app.call("GET", "/api/users", Some(2)).await;
    assert_eq!(me.body["buddyCount"], 1);
}

#[tokio::test]
async fn unblock_lists_and_lifts_blocks() {
    let app = TestApp::new().await;
    app.call("POST", "/api/users/buddy/1/block", Some(2)).await;

    let blocked = app.call("GET", "/api/users/buddy/blocked", Some(2)).await;
    assert_eq!(blocked.status, StatusCode::OK);
    assert_eq!(blocked.body[0]["id"], 1);

    let response = app.call("DELETE", "/api/users/buddy/1/block", Some(2)).await;
    assert_eq!(response.status, StatusCode::OK);

    let blocked = app.call("GET", "/api/users/buddy/blocked", Some(2)).await;
    assert_eq!(blocked.body, serde_json::json!([]));
    // the dissolved link stays dissolved
    assert_eq!(app.buddy_ids(2).await, vec![3, 4]);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new().await;
    let response = app.call("GET", "/api/courses", Some(1)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dev_session_cookie_identifies_user() {
    let app = TestApp::new().await;
    let api = warp::path("api")
        .and(routes(app.server.clone()))
        .recover(recover_error);

    let response = warp::test::request()
        .method("GET")
        .path("/api/users")
        .header("cookie", format!("{SESSION_COOKIE}=dev3"))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Hiruna Smith");
}

#[tokio::test]
async fn course_listing_hides_blocked_buddy() {
    let app = TestApp::new().await;

    let response = app.call("POST", "/api/users/buddy/1/block", Some(4)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.call("GET", "/api/users/buddy/course/1", Some(1)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);
    assert_eq!(response.body[0]["id"], 2);
}
