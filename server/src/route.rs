mod book;
mod consistency;
mod record;
mod user;

pub use self::{book::*, consistency::*, record::*, user::*};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::AppModule;

pub fn router(module: AppModule) -> Router {
    let api = Router::new()
        .route_book()
        .route_user()
        .route_record()
        .route_consistency();
    Router::new()
        .route("/", get(home))
        .nest("/api", api)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(module)
}

async fn home() -> impl IntoResponse {
    Json(json!({
        "message": "Book Management API",
        "endpoints": {
            "books": "/api/books",
            "users": "/api/users",
            "records": "/api/records",
            "consistency": "/api/consistency",
        },
    }))
}

async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}

#[cfg(test)]
mod test {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::handler::AppModule;

    async fn app() -> Router {
        let config = Config {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            seed_sample_data: true,
            log_dir: PathBuf::from("./logs"),
        };
        let module = AppModule::new(&config).await.expect("sample data loads");
        super::router(module)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("valid request");
        let response = app.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn borrow_and_return_over_http() {
        let app = app().await;
        let borrow = Some(json!({ "bookId": 2 }));

        let (status, body) = call(&app, Method::POST, "/api/users/1/borrow", borrow.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["book"]["copiesAvailable"], json!(9));
        assert_eq!(body["data"]["borrowRecord"]["status"], json!("borrowed"));
        assert_eq!(body["data"]["user"]["borrowedBooks"][0]["bookId"], json!(2));

        let (status, body) = call(&app, Method::POST, "/api/users/1/borrow", borrow.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            json!("User with ID 1 has already borrowed the book with ID 2")
        );

        let (status, body) = call(&app, Method::POST, "/api/users/1/return", borrow.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["book"]["copiesAvailable"], json!(10));
        assert_eq!(body["data"]["borrowRecord"]["status"], json!("returned"));
        assert!(body["data"].get("warning").is_none());

        let (status, _) = call(&app, Method::POST, "/api/users/1/return", borrow).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, Method::GET, "/api/users/1/records", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

        let (_, body) = call(&app, Method::GET, "/api/consistency", None).await;
        assert_eq!(body["data"]["consistent"], json!(true));
    }

    #[tokio::test]
    async fn single_record_by_id() {
        let app = app().await;
        let (_, body) =
            call(&app, Method::POST, "/api/users/2/borrow", Some(json!({ "bookId": 1 }))).await;
        let id = body["data"]["borrowRecord"]["id"].clone();
        let uri = format!("/api/records/{id}");

        let (status, body) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["userId"], json!(2));
        assert_eq!(body["data"]["bookId"], json!(1));
        assert_eq!(body["data"]["status"], json!("borrowed"));

        let (status, body) = call(&app, Method::GET, "/api/records/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Borrow record with ID 999 not found"));
    }

    #[tokio::test]
    async fn lending_errors_have_statuses() {
        let app = app().await;
        let (status, body) =
            call(&app, Method::POST, "/api/users/9/borrow", Some(json!({ "bookId": 1 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("User with ID 9 not found"));

        let (status, body) = call(&app, Method::POST, "/api/users/1/borrow", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], json!("bookId"));
    }

    #[tokio::test]
    async fn book_crud_over_http() {
        let app = app().await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/books",
            Some(json!({
                "title": "The Pragmatic Programmer",
                "author": "david thomas",
                "isbn": "9780135957059",
                "publishedDate": "2019-09-13",
                "totalCopies": 2,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], json!(4));
        assert_eq!(body["data"]["author"], json!("David Thomas"));
        assert_eq!(body["data"]["copiesAvailable"], json!(2));

        let (status, body) = call(&app, Method::POST, "/api/books", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["errors"].as_array().is_some_and(|errors| !errors.is_empty()));

        let (status, body) = call(&app, Method::DELETE, "/api/books/4", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Book with ID 4 deleted successfully"));

        let (status, body) = call(&app, Method::GET, "/api/books/4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Book with ID 4 not found"));

        let (status, _) = call(&app, Method::DELETE, "/api/books/4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_routes_fall_back() {
        let app = app().await;
        let (status, body) = call(&app, Method::GET, "/api/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Route not found"));

        let (status, body) = call(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Book Management API"));
    }
}
