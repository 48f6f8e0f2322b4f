mod common;

use axum::http::{Method, StatusCode};
use chrono::DateTime;
use orderdesk_api::entities::{order_item, sales_order};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn create_order_returns_assigned_id_and_submitted_items() {
    let app = TestApp::new().await;

    let payload = json!({
        "customer_name": "Alice",
        "items": [
            {"product_name": "Widget", "quantity": 2, "price": 9.99}
        ]
    });

    let body = app
        .request_json(
            Method::POST,
            "/sales_orders/",
            Some(payload),
            StatusCode::OK,
        )
        .await;

    assert_eq!(body["id"], 1);
    assert_eq!(body["customer_name"], "Alice");
    assert_eq!(
        body["items"],
        json!([{"product_name": "Widget", "quantity": 2, "price": 9.99}])
    );

    // order_date is a server-assigned ISO-8601 timestamp
    let order_date = body["order_date"].as_str().expect("order_date present");
    DateTime::parse_from_rfc3339(order_date).expect("order_date should parse");

    // The order is immediately readable under its assigned id
    let fetched = app
        .request_json(Method::GET, "/sales_orders/1", None, StatusCode::OK)
        .await;
    assert_eq!(fetched["id"], 1);
    assert_eq!(fetched["customer_name"], "Alice");
    assert_eq!(
        fetched["items"],
        json!([{"product_name": "Widget", "quantity": 2, "price": 9.99}])
    );
}

#[tokio::test]
async fn get_returns_exactly_what_was_submitted() {
    let app = TestApp::new().await;

    let payload = json!({
        "customer_name": "Bob",
        "items": [
            {"product_name": "Gadget", "quantity": 1, "price": 19.5},
            {"product_name": "Gizmo", "quantity": 3, "price": 0.5}
        ]
    });

    let created = app
        .request_json(
            Method::POST,
            "/sales_orders/",
            Some(payload),
            StatusCode::OK,
        )
        .await;
    let id = created["id"].as_i64().expect("id is an integer");
    assert!(id > 0);

    let fetched = app
        .request_json(
            Method::GET,
            &format!("/sales_orders/{id}"),
            None,
            StatusCode::OK,
        )
        .await;

    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["customer_name"], "Bob");
    assert_eq!(
        fetched["items"],
        json!([
            {"product_name": "Gadget", "quantity": 1, "price": 19.5},
            {"product_name": "Gizmo", "quantity": 3, "price": 0.5}
        ])
    );
    let order_date = fetched["order_date"].as_str().expect("order_date present");
    DateTime::parse_from_rfc3339(order_date).expect("order_date should parse");
}

#[tokio::test]
async fn order_ids_are_increasing_across_creates() {
    let app = TestApp::new().await;

    let mut last_id = 0;
    for customer in ["Ann", "Ben", "Cid"] {
        let body = app
            .request_json(
                Method::POST,
                "/sales_orders/",
                Some(json!({"customer_name": customer, "items": []})),
                StatusCode::OK,
            )
            .await;
        let id = body["id"].as_i64().unwrap();
        assert!(id > last_id);
        last_id = id;
    }
}

#[tokio::test]
async fn unknown_id_returns_not_found_detail() {
    let app = TestApp::new().await;

    let body = app
        .request_json(
            Method::GET,
            "/sales_orders/4242",
            None,
            StatusCode::NOT_FOUND,
        )
        .await;

    assert_eq!(body, json!({"detail": "Order not found"}));
}

#[tokio::test]
async fn empty_item_list_round_trips() {
    let app = TestApp::new().await;

    let created = app
        .request_json(
            Method::POST,
            "/sales_orders/",
            Some(json!({"customer_name": "Carol", "items": []})),
            StatusCode::OK,
        )
        .await;
    assert_eq!(created["items"], json!([]));

    let id = created["id"].as_i64().unwrap();
    let fetched = app
        .request_json(
            Method::GET,
            &format!("/sales_orders/{id}"),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(fetched["items"], json!([]));
}

#[tokio::test]
async fn negative_quantity_and_price_are_accepted_silently() {
    let app = TestApp::new().await;

    let body = app
        .request_json(
            Method::POST,
            "/sales_orders/",
            Some(json!({
                "customer_name": "Dave",
                "items": [{"product_name": "Refund line", "quantity": -1, "price": -4.25}]
            })),
            StatusCode::OK,
        )
        .await;

    assert_eq!(body["items"][0]["quantity"], -1);
    assert_eq!(body["items"][0]["price"], -4.25);
}

#[tokio::test]
async fn malformed_bodies_are_rejected_before_the_store() {
    let app = TestApp::new().await;

    // Missing required field
    let response = app
        .request(
            Method::POST,
            "/sales_orders/",
            Some(json!({"items": []})),
        )
        .await;
    assert!(response.status().is_client_error());

    // Mistyped field
    let response = app
        .request(
            Method::POST,
            "/sales_orders/",
            Some(json!({
                "customer_name": "Alice",
                "items": [{"product_name": "Widget", "quantity": "two", "price": 9.99}]
            })),
        )
        .await;
    assert!(response.status().is_client_error());

    // JSON of the wrong shape entirely
    let response = app
        .request(Method::POST, "/sales_orders/", Some(json!("not an order")))
        .await;
    assert!(response.status().is_client_error());

    // Nothing was persisted by the rejected requests
    let response = app.request(Method::GET, "/sales_orders/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_path_id_is_a_client_error() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/sales_orders/abc", None).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn create_works_without_trailing_slash_too() {
    let app = TestApp::new().await;

    let body = app
        .request_json(
            Method::POST,
            "/sales_orders",
            Some(json!({"customer_name": "Eve", "items": []})),
            StatusCode::OK,
        )
        .await;
    assert_eq!(body["customer_name"], "Eve");
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::new().await;

    let body = app
        .request_json(Method::GET, "/health", None, StatusCode::OK)
        .await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"]["status"], "up");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let body = app
        .request_json(Method::GET, "/api-docs/openapi.json", None, StatusCode::OK)
        .await;
    assert!(body["paths"]["/sales_orders/{order_id}"].is_object());
}

#[tokio::test]
async fn created_rows_are_persisted_with_their_foreign_keys() {
    let app = TestApp::new().await;

    let body = app
        .request_json(
            Method::POST,
            "/sales_orders/",
            Some(json!({
                "customer_name": "Grace",
                "items": [
                    {"product_name": "Widget", "quantity": 2, "price": 9.99},
                    {"product_name": "Sprocket", "quantity": 5, "price": 3.0}
                ]
            })),
            StatusCode::OK,
        )
        .await;
    let id = body["id"].as_i64().unwrap();

    let saved_order = sales_order::Entity::find_by_id(id)
        .one(&*app.state.db)
        .await
        .expect("query order")
        .expect("order should exist");
    assert_eq!(saved_order.customer_name, "Grace");

    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(id))
        .all(&*app.state.db)
        .await
        .expect("query order items");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.order_id == id));
}

#[tokio::test]
async fn schema_is_created_against_a_fresh_database_file() {
    // TestApp::new points at a database file that does not exist yet; the
    // startup migration path must create the full schema before first use.
    let app = TestApp::new().await;

    let body = app
        .request_json(
            Method::POST,
            "/sales_orders/",
            Some(json!({
                "customer_name": "Fresh",
                "items": [{"product_name": "First", "quantity": 1, "price": 1.0}]
            })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(body["id"], 1);
}
