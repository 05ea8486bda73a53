use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let services = ledger_api::app::services::build_in_memory_services()
            .await
            .expect("failed to build services");
        let app = ledger_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> (StatusCode, Value) {
    let res = client.post(url).json(&body).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn create_account_then_fetch_it() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        srv.url("/accounts"),
        json!({ "document_number": "123456765432" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "account_id": 1, "document_number": "123456765432" }));

    let (status, body) = get_json(&client, srv.url("/accounts/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_number"], "123456765432");
}

#[tokio::test]
async fn invalid_document_number_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(&client, srv.url("/accounts"), json!({ "document_number": "abcd" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid document number" }));
}

#[tokio::test]
async fn duplicate_account_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let body = json!({ "document_number": "12345678911" });

    let (status, _) = post_json(&client, srv.url("/accounts"), body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&client, srv.url("/accounts"), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "account already exists" }));
}

#[tokio::test]
async fn unknown_and_malformed_account_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, srv.url("/accounts/17")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "account not found" }));

    let (status, body) = get_json(&client, srv.url("/accounts/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid account ID" }));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/accounts"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn end_to_end_credit_transaction() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, account) = post_json(
        &client,
        srv.url("/accounts"),
        json!({ "document_number": "123456765432" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["account_id"], 1);

    let (status, tx) = post_json(
        &client,
        srv.url("/transactions"),
        json!({ "account_id": 1, "operation_type_id": 4, "amount": 100 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["transaction_id"], 1);
    assert_eq!(tx["account_id"], 1);
    assert_eq!(tx["operation_type_id"], 4);
    assert_eq!(tx["amount"].as_f64(), Some(100.0));
    assert!(tx["event_date"].is_string());
}

#[tokio::test]
async fn debit_response_echoes_submitted_amount() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    post_json(&client, srv.url("/accounts"), json!({ "document_number": "1" })).await;

    let (status, tx) = post_json(
        &client,
        srv.url("/transactions"),
        json!({ "account_id": 1, "operation_type_id": 3, "amount": 50.25 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["amount"].as_f64(), Some(50.25));
}

#[tokio::test]
async fn decimal_string_amount_is_accepted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    post_json(&client, srv.url("/accounts"), json!({ "document_number": "1" })).await;

    let (status, tx) = post_json(
        &client,
        srv.url("/transactions"),
        json!({ "account_id": 1, "operation_type_id": 1, "amount": "100.005" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["transaction_id"], 1);
    assert_eq!(tx["amount"].as_f64(), Some(100.005));
}

#[tokio::test]
async fn transaction_with_unknown_operation_type() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        srv.url("/transactions"),
        json!({ "account_id": 1, "operation_type_id": 10, "amount": 100 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid operation type" }));
}

#[tokio::test]
async fn transaction_with_unknown_account() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        srv.url("/transactions"),
        json!({ "account_id": 17, "operation_type_id": 4, "amount": 100 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "account not found" }));
}

#[tokio::test]
async fn operation_types_are_seeded() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, srv.url("/operation-types")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[3]["description"], "Credit Voucher");
    assert_eq!(items[3]["transaction_type"], 1);
    assert_eq!(items[0]["transaction_type"], 0);
}
