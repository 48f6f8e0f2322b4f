use axum::{response::Json, routing::get, Router};
use utoipa::OpenApi;

use crate::handlers;
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orderdesk API",
        version = "0.1.0",
        description = "A small service for recording sales orders and retrieving them by id."
    ),
    paths(
        handlers::sales_orders::create_sales_order,
        handlers::sales_orders::get_sales_order,
    ),
    components(schemas(
        handlers::sales_orders::CreateSalesOrderRequest,
        handlers::sales_orders::CreateOrderItemRequest,
        handlers::sales_orders::SalesOrderResponse,
        handlers::sales_orders::OrderItemResponse,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "Sales Orders", description = "Sales order recording and lookup")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document as JSON
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
