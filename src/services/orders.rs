use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::{
    db::DbPool,
    entities::order_item::{self, ActiveModel as OrderItemActiveModel, Model as OrderItemModel},
    entities::sales_order::{
        ActiveModel as SalesOrderActiveModel, Entity as SalesOrderEntity, Model as SalesOrderModel,
    },
    errors::ServiceError,
};

/// Input for a new order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
}

/// Input for a new sales order together with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSalesOrder {
    pub customer_name: String,
    pub items: Vec<NewOrderItem>,
}

/// A fully-loaded sales order as handed back to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: i64,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub items: Vec<SalesOrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderItem {
    pub id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
}

/// Storage access capability for sales orders.
///
/// Handlers depend on this trait rather than on a connection handle, so the
/// persistence wiring stays behind one seam and connection scope is owned by
/// each operation.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order and all of its items, returning the loaded order
    /// with its generated identifier and timestamp.
    async fn create_order(&self, order: NewSalesOrder) -> Result<SalesOrder, ServiceError>;

    /// Loads an order with its items, or `None` when the id is unknown.
    async fn get_order(&self, id: i64) -> Result<Option<SalesOrder>, ServiceError>;
}

/// Service for recording and reading sales orders against the database
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    /// Creates a new order service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn assemble(order: SalesOrderModel, items: Vec<OrderItemModel>) -> SalesOrder {
        SalesOrder {
            id: order.id,
            customer_name: order.customer_name,
            order_date: order.order_date,
            items: items
                .into_iter()
                .map(|item| SalesOrderItem {
                    id: item.id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl OrderStore for OrderService {
    #[instrument(skip(self, order), fields(customer_name = %order.customer_name, item_count = order.items.len()))]
    async fn create_order(&self, order: NewSalesOrder) -> Result<SalesOrder, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        // One transaction covers the order row and every item row. The order id
        // is available from the first insert while the transaction is still
        // open, so a crash mid-create never leaves an order without its items.
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_model = SalesOrderActiveModel {
            customer_name: Set(order.customer_name),
            order_date: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to insert sales order");
            ServiceError::DatabaseError(e)
        })?;

        let mut item_models = Vec::with_capacity(order.items.len());
        for item in order.items {
            let item_model = OrderItemActiveModel {
                order_id: Set(order_model.id),
                product_name: Set(item.product_name),
                quantity: Set(item.quantity),
                price: Set(item.price),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = order_model.id, "Failed to insert order item");
                ServiceError::DatabaseError(e)
            })?;
            item_models.push(item_model);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = order_model.id, "Failed to commit order creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = order_model.id, item_count = item_models.len(), "Sales order created");

        Ok(Self::assemble(order_model, item_models))
    }

    #[instrument(skip(self))]
    async fn get_order(&self, id: i64) -> Result<Option<SalesOrder>, ServiceError> {
        let db = &*self.db_pool;

        let order = SalesOrderEntity::find_by_id(id).one(db).await.map_err(|e| {
            error!(error = %e, order_id = id, "Failed to fetch sales order");
            ServiceError::DatabaseError(e)
        })?;

        let Some(order) = order else {
            info!(order_id = id, "Sales order not found");
            return Ok(None);
        };

        // Items come back in insertion order.
        let items = order
            .find_related(order_item::Entity)
            .order_by_asc(order_item::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = id, "Failed to fetch order items");
                ServiceError::DatabaseError(e)
            })?;

        Ok(Some(Self::assemble(order, items)))
    }
}
