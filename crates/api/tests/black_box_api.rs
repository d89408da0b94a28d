use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode as AxumStatusCode, response::IntoResponse, routing::get, Json, Router};
use reqwest::StatusCode;
use serde_json::json;

use bookstack_api::app::{build_app, services::AppConfig};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Build the prod router against a fresh in-memory database, bound to an
    /// ephemeral port.
    async fn spawn(external_books_url: &str) -> Self {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            external_books_url: external_books_url.to_string(),
        };
        let app = build_app(config).await.expect("failed to build app");
        Self::serve(app).await
    }

    async fn serve(app: Router) -> Self {
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
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Stand-in for the external catalog: serves `/api/books` with a canned
/// record in the upstream's shape, plus trigger names for error statuses.
async fn spawn_catalog_stub() -> TestServer {
    async fn books(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
        match params.get("name").map(String::as_str).unwrap_or("") {
            "A Game of Thrones" => Json(json!([{
                "url": "https://catalog.example/api/books/1",
                "name": "A Game of Thrones",
                "isbn": "978-0553103540",
                "authors": ["George R. R. Martin"],
                "numberOfPages": 694,
                "publisher": "Bantam Books",
                "country": "United States",
                "mediaType": "Hardcover",
                "released": "1996-08-01T00:00:00",
                "characters": ["https://catalog.example/api/characters/2"],
                "povCharacters": ["https://catalog.example/api/characters/2"]
            }]))
            .into_response(),
            "boom" => (AxumStatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"}))).into_response(),
            "teapot" => (AxumStatusCode::IM_A_TEAPOT, Json(json!({"detail": "teapot"}))).into_response(),
            _ => Json(json!([])).into_response(),
        }
    }

    let app = Router::new().route("/api/books", get(books));
    TestServer::serve(app).await
}

fn sample_book_body(authors: &[&str]) -> serde_json::Value {
    json!({
        "name": "A Game of Thrones",
        "isbn": "978-0553103540",
        "country": "United States",
        "number_of_pages": 694,
        "authors": authors,
        "publisher": "Bantam Books",
        "release_date": "1996-08-01"
    })
}

#[tokio::test]
async fn health_endpoint_is_up() {
    let srv = TestServer::spawn("http://127.0.0.1:1/api/books").await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn book_crud_lifecycle() {
    let srv = TestServer::spawn("http://127.0.0.1:1/api/books").await;
    let client = reqwest::Client::new();
    let books_url = format!("{}/api/v1/books", srv.base_url);

    // Create.
    let res = client
        .post(&books_url)
        .json(&sample_book_body(&["test1"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["status"], "success");
    let created = &body["data"][0]["book"];
    assert_eq!(created["name"], "A Game of Thrones");
    assert_eq!(created["authors"], json!(["test1"]));
    let id = created["id"].as_i64().unwrap();
    assert_eq!(id, 1);

    // List holds exactly the created book.
    let res = client.get(&books_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["isbn"], "978-0553103540");

    // Retrieve by id; a missing id is a 404.
    let res = client.get(format!("{books_url}/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["name"], "A Game of Thrones");

    let res = client.get(format!("{books_url}/2")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Partial update; the message quotes the new name.
    let res = client
        .patch(format!("{books_url}/{id}"))
        .json(&json!({"name": "A Clash of Kings"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "The book A Clash of Kings was updated successfully."
    );
    assert_eq!(body["data"]["name"], "A Clash of Kings");
    assert_eq!(body["data"]["isbn"], "978-0553103540");

    // Delete; the message quotes the pre-delete name and data is empty.
    let res = client.delete(format!("{books_url}/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "The book A Clash of Kings was deleted successfully."
    );
    assert_eq!(body["data"], json!([]));

    let res = client.delete(format!("{books_url}/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(&books_url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn oversized_fields_are_rejected_with_400() {
    let srv = TestServer::spawn("http://127.0.0.1:1/api/books").await;
    let client = reqwest::Client::new();

    let mut body = sample_book_body(&["test1"]);
    body["isbn"] = json!("9".repeat(15));
    let res = client
        .post(format!("{}/api/v1/books", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn concurrent_creates_share_one_author_row() {
    let srv = TestServer::spawn("http://127.0.0.1:1/api/books").await;
    let client = reqwest::Client::new();
    let books_url = format!("{}/api/v1/books", srv.base_url);

    let post = |client: reqwest::Client, url: String| async move {
        client
            .post(url)
            .json(&sample_book_body(&["shared-author"]))
            .send()
            .await
            .unwrap()
    };

    let (a, b) = tokio::join!(
        post(client.clone(), books_url.clone()),
        post(client.clone(), books_url.clone())
    );
    assert_eq!(a.status(), StatusCode::CREATED);
    assert_eq!(b.status(), StatusCode::CREATED);

    let body_a: serde_json::Value = a.json().await.unwrap();
    let body_b: serde_json::Value = b.json().await.unwrap();
    assert_eq!(body_a["data"][0]["book"]["authors"], json!(["shared-author"]));
    assert_eq!(body_b["data"][0]["book"]["authors"], json!(["shared-author"]));

    let res = client.get(&books_url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_author_names_collapse_to_one_association() {
    let srv = TestServer::spawn("http://127.0.0.1:1/api/books").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/books", srv.base_url))
        .json(&sample_book_body(&["test1", "test1", "test2"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"][0]["book"]["authors"], json!(["test1", "test2"]));
}

#[tokio::test]
async fn external_books_reshapes_upstream_records() {
    let stub = spawn_catalog_stub().await;
    let srv = TestServer::spawn(&format!("{}/api/books", stub.base_url)).await;

    let res = reqwest::get(format!(
        "{}/api/external-books?name=A%20Game%20of%20Thrones",
        srv.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["status_code"], 200);
    assert_eq!(body["status"], "success");
    let record = body["data"][0].as_object().unwrap();
    assert_eq!(record.len(), 7);
    assert_eq!(record["release_date"], "1996-08-01");
    assert!(!record.contains_key("released"));
    assert!(!record.contains_key("url"));
    assert!(!record.contains_key("mediaType"));
    assert!(!record.contains_key("characters"));
    assert!(!record.contains_key("povCharacters"));
}

#[tokio::test]
async fn external_books_empty_name_returns_upstream_listing() {
    let stub = spawn_catalog_stub().await;
    let srv = TestServer::spawn(&format!("{}/api/books", stub.base_url)).await;

    let res = reqwest::get(format!("{}/api/external-books", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn external_books_maps_upstream_error_statuses() {
    let stub = spawn_catalog_stub().await;
    let srv = TestServer::spawn(&format!("{}/api/books", stub.base_url)).await;

    let res = reqwest::get(format!("{}/api/external-books?name=boom", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status_code"], 500);
    assert_eq!(body["status"], "internal server error");
    assert!(body.get("data").is_none());

    // A code outside the label table falls back to "unknown".
    let res = reqwest::get(format!("{}/api/external-books?name=teapot", srv.base_url))
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status_code"], 418);
    assert_eq!(body["status"], "unknown");
}

#[tokio::test]
async fn external_books_offline_body_ships_with_success_status() {
    // Nothing listens on this port; the outbound call fails to connect.
    let srv = TestServer::spawn("http://127.0.0.1:1/api/books").await;

    let res = reqwest::get(format!("{}/api/external-books?name=x", srv.base_url))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "You are not connected to internet!");
}
