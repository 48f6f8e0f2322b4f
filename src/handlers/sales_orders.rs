use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::orders::{NewOrderItem, NewSalesOrder, SalesOrder};
use crate::{errors::ServiceError, AppState};

// Sales order DTOs

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSalesOrderRequest {
    #[schema(example = "Alice")]
    pub customer_name: String,
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    #[schema(example = "Widget")]
    pub product_name: String,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = 9.99)]
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalesOrderResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Alice")]
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    #[schema(example = "Widget")]
    pub product_name: String,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = 9.99)]
    pub price: f64,
}

impl From<SalesOrder> for SalesOrderResponse {
    fn from(order: SalesOrder) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name,
            order_date: order.order_date,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_name: item.product_name,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        }
    }
}

/// Create a sales order
#[utoipa::path(
    post,
    path = "/sales_orders/",
    summary = "Create sales order",
    description = "Record a new sales order together with its line items",
    request_body = CreateSalesOrderRequest,
    responses(
        (status = 200, description = "Sales order created", body = SalesOrderResponse),
        (status = 422, description = "Malformed request body"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Sales Orders"
)]
pub async fn create_sales_order(
    State(state): State<AppState>,
    Json(request): Json<CreateSalesOrderRequest>,
) -> Result<Json<SalesOrderResponse>, ServiceError> {
    let order = NewSalesOrder {
        customer_name: request.customer_name,
        items: request
            .items
            .into_iter()
            .map(|item| NewOrderItem {
                product_name: item.product_name,
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
    };

    let created = state.store.create_order(order).await?;
    Ok(Json(created.into()))
}

/// Get a sales order by id
#[utoipa::path(
    get,
    path = "/sales_orders/{order_id}",
    summary = "Get sales order",
    description = "Retrieve a sales order and its line items by identifier",
    params(
        ("order_id" = i64, Path, description = "Sales order identifier"),
    ),
    responses(
        (status = 200, description = "Sales order retrieved", body = SalesOrderResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Sales Orders"
)]
pub async fn get_sales_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<SalesOrderResponse>, ServiceError> {
    match state.store.get_order(order_id).await? {
        Some(order) => Ok(Json(order.into())),
        None => Err(ServiceError::NotFound("Order not found".to_string())),
    }
}
