use mockbin_api::app::actions::Actions;
use mockbin_auth::IdentityResolver;
use mockbin_core::{Api, Bin, User, UserId};
use mockbin_store::Store;
use reqwest::StatusCode;
use serde_json::Value;

struct TestServer {
    base_url: String,
    store: Store,
    actions: Actions,
    resolver: IdentityResolver,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build the same router as prod, over a fresh in-memory store, and
        // bind to an ephemeral port.
        let store = Store::in_memory().await.expect("in-memory store");
        let app = mockbin_api::app::build_app(store.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            actions: Actions::new(store.clone()),
            resolver: IdentityResolver::new(store.clone()),
            store,
            handle,
        }
    }

    async fn user(&self, subject: &str) -> User {
        self.resolver
            .resolve_session(&UserId::from(subject))
            .await
            .expect("resolve session")
    }

    async fn bin_for(&self, subject: &str) -> Bin {
        let user = self.user(subject).await;
        self.actions
            .create_request_bin(&user.id)
            .await
            .expect("create bin")
    }

    async fn api_for(&self, subject: &str, data: &str) -> (User, Api) {
        let user = self.user(subject).await;
        let api = self
            .actions
            .create_mock_api(&user.id, data)
            .await
            .expect("create api");
        (user, api)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn capture_records_request_verbatim() {
    let srv = TestServer::spawn().await;
    let bin = srv.bin_for("alice").await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!(
            "{}/bin/{}?param1=value1&param2=value2",
            srv.base_url, bin.bin_id
        ))
        .header("content-type", "application/json")
        .header("x-test-agent", "black-box")
        .body(r#"{"test":"data"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());

    let logs = srv.store.logs_for_bin(&bin.bin_id).await.unwrap();
    assert_eq!(logs.len(), 1);
    let log = &logs[0];
    assert_eq!(log.method, "POST");
    assert_eq!(log.body, r#"{"test":"data"}"#);

    let headers: Value = serde_json::from_str(&log.headers).unwrap();
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["x-test-agent"], "black-box");

    let query: Value = serde_json::from_str(&log.query).unwrap();
    assert_eq!(query["param1"], "value1");
    assert_eq!(query["param2"], "value2");
}

#[tokio::test]
async fn capture_never_rejects_content() {
    let srv = TestServer::spawn().await;
    let bin = srv.bin_for("alice").await;
    let client = reqwest::Client::new();

    // Malformed JSON, empty, and huge bodies all land verbatim. The huge
    // case sits above axum's 2 MiB default body limit, which the capture
    // route must not inherit.
    let huge = "x".repeat(3 * 1024 * 1024);
    for body in ["not json {{{", "", huge.as_str()] {
        let res = client
            .post(format!("{}/bin/{}", srv.base_url, bin.bin_id))
            .body(body.to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let logs = srv.store.logs_for_bin(&bin.bin_id).await.unwrap();
    let bodies: Vec<&str> = logs.iter().map(|l| l.body.as_str()).collect();
    assert_eq!(bodies, ["not json {{{", "", huge.as_str()]);
}

#[tokio::test]
async fn capture_accepts_every_method() {
    let srv = TestServer::spawn().await;
    let bin = srv.bin_for("alice").await;
    let client = reqwest::Client::new();
    let url = format!("{}/bin/{}", srv.base_url, bin.bin_id);

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let res = client
            .request(method.parse().unwrap(), &url)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "method {method}");
    }

    let logs = srv.store.logs_for_bin(&bin.bin_id).await.unwrap();
    let methods: Vec<&str> = logs.iter().map(|l| l.method.as_str()).collect();
    assert_eq!(methods, ["GET", "POST", "PUT", "PATCH", "DELETE"]);
}

#[tokio::test]
async fn capture_of_unknown_bin_is_404_and_writes_nothing() {
    let srv = TestServer::spawn().await;
    let bin = srv.bin_for("alice").await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/bin/no-such-bin", srv.base_url))
        .body("dropped")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Bin not found" }));

    assert!(srv.store.logs_for_bin(&bin.bin_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn capture_of_blank_bin_id_is_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // %20 decodes to a lone space: present as a path segment, blank as an id.
    let res = client
        .post(format!("{}/bin/%20", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Invalid bin id" }));
}

#[tokio::test]
async fn concurrent_captures_yield_one_row_each() {
    let srv = TestServer::spawn().await;
    let bin = srv.bin_for("alice").await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = format!("{}/bin/{}", srv.base_url, bin.bin_id);
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .body(format!("payload-{i}"))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let logs = srv.store.logs_for_bin(&bin.bin_id).await.unwrap();
    assert_eq!(logs.len(), 20);
}

#[tokio::test]
async fn mock_returns_stored_payload_for_every_method() {
    let srv = TestServer::spawn().await;
    let (user, api) = srv.api_for("alice", r#"{"feature":true}"#).await;
    let client = reqwest::Client::new();
    let url = format!("{}/mock/{}", srv.base_url, api.api_id);

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let res = client
            .request(method.parse().unwrap(), &url)
            .header("token", user.token.as_str())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "method {method}");
        assert_eq!(
            res.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(res.text().await.unwrap(), r#"{"feature":true}"#);
    }
}

#[tokio::test]
async fn mock_returns_invalid_payloads_verbatim_too() {
    let srv = TestServer::spawn().await;
    let (user, api) = srv.api_for("alice", "certainly <not> json").await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/mock/{}", srv.base_url, api.api_id))
        .header("token", user.token.as_str())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "certainly <not> json");
}

#[tokio::test]
async fn mock_requires_a_known_token() {
    let srv = TestServer::spawn().await;
    let (_, api) = srv.api_for("alice", "{}").await;
    let client = reqwest::Client::new();
    let url = format!("{}/mock/{}", srv.base_url, api.api_id);

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "token not found" }));

    let res = client
        .get(&url)
        .header("token", "no-such-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "invalid token" }));
}

#[tokio::test]
async fn mock_never_unlocks_another_users_api() {
    let srv = TestServer::spawn().await;
    let (_, api) = srv.api_for("alice", r#"{"secret":true}"#).await;
    let intruder = srv.user("bob").await;

    let client = reqwest::Client::new();

    // Correctly guessed public id + valid token of the wrong user: same 400
    // as a nonexistent id, never the payload.
    let res = client
        .get(format!("{}/mock/{}", srv.base_url, api.api_id))
        .header("token", intruder.token.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "invalid api id" }));

    let res = client
        .get(format!("{}/mock/does-not-exist", srv.base_url))
        .header("token", intruder.token.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bin_listing_requires_session_and_reports_shapes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let url = format!("{}/bins", srv.base_url);

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "unauthorized" }));

    // Known session, no bins yet.
    let res = client
        .get(&url)
        .header("userid", "alice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "message": "unauthorized or no mock bins found" })
    );

    // With a bin and a captured request, the listing embeds the logs.
    let bin = srv.bin_for("alice").await;
    client
        .post(format!("{}/bin/{}", srv.base_url, bin.bin_id))
        .body("hello")
        .send()
        .await
        .unwrap();

    let res = client
        .get(&url)
        .header("userid", "alice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "success");
    assert_eq!(body["bins"].as_array().unwrap().len(), 1);
    assert_eq!(body["bins"][0]["binId"], bin.bin_id.as_str());
    assert_eq!(body["bins"][0]["logs"][0]["body"], "hello");
}

#[tokio::test]
async fn api_listing_is_owner_scoped() {
    let srv = TestServer::spawn().await;
    let (_, api) = srv.api_for("alice", r#"{"v":1}"#).await;
    srv.user("bob").await;

    let client = reqwest::Client::new();
    let url = format!("{}/apis", srv.base_url);

    let res = client
        .get(&url)
        .header("userid", "alice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "success");
    assert_eq!(body["apis"][0]["apiId"], api.api_id.as_str());
    assert_eq!(body["apis"][0]["data"], r#"{"v":1}"#);

    // Bob owns nothing; Alice's apis are not visible to him.
    let res = client
        .get(&url)
        .header("userid", "bob")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_middleware_creates_user_on_first_sight() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // First request from a brand-new subject: listing is empty, but the
    // user row now exists with a usable token.
    let res = client
        .get(format!("{}/bins", srv.base_url))
        .header("userid", "fresh-subject")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let user = srv
        .store
        .user_by_id(&UserId::from("fresh-subject"))
        .await
        .unwrap()
        .expect("user created by middleware");
    assert!(!user.token.as_str().is_empty());
}

#[tokio::test]
async fn deleted_bin_no_longer_captures() {
    let srv = TestServer::spawn().await;
    let user = srv.user("alice").await;
    let bin = srv.bin_for("alice").await;
    let client = reqwest::Client::new();
    let url = format!("{}/bin/{}", srv.base_url, bin.bin_id);

    let res = client.post(&url).body("kept").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    srv.actions
        .delete_request_bin(&user.id, Some(bin.bin_id.as_str()))
        .await
        .unwrap();

    let res = client.post(&url).body("dropped").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(srv.store.logs_for_bin(&bin.bin_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
