use catalog_api::app::services::AppServices;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over a fresh in-memory store, bound to an ephemeral port.
        let app = catalog_api::app::build_app(AppServices::in_memory());
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

async fn create_category(client: &reqwest::Client, srv: &TestServer, name: &str) -> Value {
    let res = client
        .post(srv.url("/api/categories/"))
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn create_product(
    client: &reqwest::Client,
    srv: &TestServer,
    name: &str,
    price: f64,
    category_id: &Value,
) -> Value {
    let res = client
        .post(srv.url("/api/products/"))
        .json(&json!({
            "name": name,
            "description": "Test Description",
            "price": price,
            "category_id": category_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public_and_reports_backend() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "in_memory");
}

#[tokio::test]
async fn client_request_id_is_echoed() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .get(srv.url("/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn category_create_read_update_list() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_category(&client, &srv, "Test Category").await;
    assert_eq!(created["name"], "Test Category");
    assert!(created["id"].is_i64());
    assert!(created["created_at"].is_string());
    let id = created["id"].clone();

    let res = client
        .get(srv.url(&format!("/api/categories/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    let res = client
        .put(srv.url(&format!("/api/categories/{id}")))
        .json(&json!({ "name": "Updated Category" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "Updated Category");

    create_category(&client, &srv, "Second").await;

    // Collection route answers with and without the trailing slash.
    for path in ["/api/categories", "/api/categories/"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let list: Vec<Value> = res.json().await.unwrap();
        let names: Vec<_> = list.iter().map(|c| c["name"].clone()).collect();
        assert_eq!(names, vec![json!("Updated Category"), json!("Second")]);
    }
}

#[tokio::test]
async fn missing_category_is_404_with_fixed_message() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/categories/9999"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Category not found");
    assert_eq!(body["detail"], "Category not found");

    let res = client
        .put(srv.url("/api/categories/9999"))
        .json(&json!({ "name": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_name_is_validated() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/categories/"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["violations"][0]["field"], "name");
    assert_eq!(body["violations"][0]["kind"], "missing");

    let res = client
        .post(srv.url("/api/categories/"))
        .json(&json!({ "name": "x".repeat(101) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["violations"][0]["kind"], "too_long");

    let res = client
        .post(srv.url("/api/categories/"))
        .json(&json!({ "name": "a\u{0}b" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["violations"][0]["kind"], "invalid_character");
}

#[tokio::test]
async fn product_create_read_update() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let category = create_category(&client, &srv, "Test Category").await;
    let product = create_product(&client, &srv, "Test Product", 10.99, &category["id"]).await;
    assert_eq!(product["name"], "Test Product");
    assert_eq!(product["description"], "Test Description");
    assert_eq!(product["price"], 10.99);
    assert_eq!(product["category_id"], category["id"]);
    let id = product["id"].clone();

    let res = client
        .get(srv.url(&format!("/api/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, product);

    let res = client
        .put(srv.url(&format!("/api/products/{id}")))
        .json(&json!({
            "name": "Updated Product",
            "description": "Updated Description",
            "price": 15.99,
            "category_id": category["id"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "Updated Product");
    assert_eq!(updated["description"], "Updated Description");
    assert_eq!(updated["price"], 15.99);
    assert_eq!(updated["created_at"], product["created_at"]);
}

#[tokio::test]
async fn missing_product_is_404_with_fixed_message() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for req in [
        client.get(srv.url("/api/products/9999")),
        client.delete(srv.url("/api/products/9999")),
    ] {
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Product not found");
        assert_eq!(body["detail"], "Product not found");
    }
}

#[tokio::test]
async fn product_list_filter_selects_middle_price() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let category = create_category(&client, &srv, "Test Category").await;
    for (name, price) in [("Product A", 5.99), ("Product B", 15.99), ("Product C", 25.99)] {
        create_product(&client, &srv, name, price, &category["id"]).await;
    }

    let res = client
        .get(srv.url("/api/products/?name=Product&price_min=10&price_max=20"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hits: Vec<Value> = res.json().await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Product B");

    let res = client.get(srv.url("/api/products")).send().await.unwrap();
    let all: Vec<Value> = res.json().await.unwrap();
    let names: Vec<_> = all.iter().map(|p| p["name"].clone()).collect();
    assert_eq!(
        names,
        vec![json!("Product A"), json!("Product B"), json!("Product C")]
    );

    let res = client
        .get(srv.url("/api/products/?price_min=cheap"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_query");
}

#[tokio::test]
async fn non_positive_price_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let category = create_category(&client, &srv, "Test Category").await;

    let res = client
        .post(srv.url("/api/products/"))
        .json(&json!({
            "name": "Invalid Product",
            "description": "Test Description",
            "price": 0,
            "category_id": category["id"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["violations"][0]["field"], "price");
    assert_eq!(body["violations"][0]["kind"], "not_positive");

    let list: Vec<Value> = client
        .get(srv.url("/api/products/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn every_violation_is_reported_at_once() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .post(srv.url("/api/products/"))
        .json(&json!({ "price": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    let fields: Vec<_> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["name", "description", "price", "category_id"]);
}

#[tokio::test]
async fn unknown_category_reference_persists_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/products/"))
        .json(&json!({
            "name": "Orphan",
            "description": "Test Description",
            "price": 1.0,
            "category_id": 9999,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "constraint_violation");

    let list: Vec<Value> = client
        .get(srv.url("/api/products/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn delete_returns_record_then_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let category = create_category(&client, &srv, "Test Category").await;
    let product = create_product(&client, &srv, "Doomed", 3.0, &category["id"]).await;
    let path = format!("/api/products/{}", product["id"]);

    let res = client.delete(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: Value = res.json().await.unwrap();
    assert_eq!(deleted, product);

    let res = client.get(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_products_lists_only_that_category() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let a = create_category(&client, &srv, "A").await;
    let b = create_category(&client, &srv, "B").await;
    create_product(&client, &srv, "in a", 1.0, &a["id"]).await;
    create_product(&client, &srv, "in b", 1.0, &b["id"]).await;

    let res = client
        .get(srv.url(&format!("/api/categories/{}/products", a["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Vec<Value> = res.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "in a");

    let res = client
        .get(srv.url("/api/categories/9999/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_and_bodies_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/products/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = client
        .post(srv.url("/api/products/"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let res = client
        .post(srv.url("/api/products/"))
        .json(&json!({ "name": "p", "description": "d", "price": "ten", "category_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
