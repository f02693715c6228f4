//! Order handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::OrderStorage;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use laundry_ledger::{apply_order, ensure_order_deletable, open_order, OrderCommand, OrderError};
use laundry_relay::{order_view, OrderQuery, Page};
use laundry_types::{DeliveryStatus, EntityKind, EventAction, Order, OrderId, OrderItem};
use serde::{Deserialize, Serialize};

/// Create order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    /// Paid at checkout
    #[serde(default)]
    pub paid: bool,
}

/// Update order request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub delivery_status: Option<DeliveryStatus>,
    pub paid: Option<bool>,
    pub expected_revision: Option<u64>,
}

/// Delete order response
#[derive(Debug, Serialize)]
pub struct DeleteOrderResponse {
    pub deleted: bool,
}

/// List orders with filters, sorting and pagination
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<Json<Page<Order>>> {
    let orders = state.storage.list_orders().await?;
    Ok(Json(order_view(&orders, &query)))
}

/// Get a specific order
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    let order_id = parse_order_id(&id)?;
    Ok(Json(load_order(&state, &order_id).await?))
}

/// Place a new order
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let mut order = open_order(&request.customer_name, request.items)?;
    if request.paid {
        order.paid_at = Some(order.created_at);
    }

    state.storage.insert_order(order.clone()).await?;

    tracing::info!(order_id = %order.id, total = order.total, paid = request.paid, "Created order");
    state.announce_order(EventAction::Created, &order).await;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Record payment and/or move the order along its delivery track
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> ApiResult<Json<Order>> {
    let order_id = parse_order_id(&id)?;
    let current = load_order(&state, &order_id).await?;

    if let Some(expected) = request.expected_revision {
        if expected != current.revision {
            return Err(ApiError::Conflict(format!(
                "Order {} is at revision {}, not {}",
                order_id, current.revision, expected
            )));
        }
    }

    let commands = order_commands(&current, &request)?;
    if commands.is_empty() {
        return Ok(Json(current));
    }

    let order = apply_order(&current, &commands)?;
    state
        .storage
        .replace_order(order.clone(), current.revision)
        .await?;

    tracing::info!(
        order_id = %order.id,
        revision = order.revision,
        status = %order.delivery_status,
        "Updated order"
    );
    state.announce_order(EventAction::Updated, &order).await;

    Ok(Json(order))
}

/// Remove an unpaid order
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOrderResponse>> {
    let order_id = parse_order_id(&id)?;
    let order = load_order(&state, &order_id).await?;
    ensure_order_deletable(&order)?;

    state.storage.delete_order(&order_id, order.revision).await?;

    tracing::info!(order_id = %order_id, "Deleted order");
    state
        .announce_deleted(EntityKind::Order, order_id.as_uuid().to_string())
        .await;

    Ok(Json(DeleteOrderResponse { deleted: true }))
}

/// Payment first, then the delivery move
fn order_commands(current: &Order, request: &UpdateOrderRequest) -> ApiResult<Vec<OrderCommand>> {
    let mut commands = Vec::new();

    match request.paid {
        Some(true) if !current.is_paid() => commands.push(OrderCommand::MarkPaid),
        Some(false) if current.is_paid() => {
            return Err(ApiError::Validation(
                "No se puede revertir el pago de un pedido".to_string(),
            ));
        }
        _ => {}
    }

    if let Some(target) = request.delivery_status {
        if target != current.delivery_status {
            let command = OrderCommand::for_status(target).ok_or(OrderError::InvalidTransition {
                from: current.delivery_status,
                to: target,
            })?;
            commands.push(command);
        }
    }

    Ok(commands)
}

async fn load_order(state: &AppState, id: &OrderId) -> ApiResult<Order> {
    state
        .storage
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {} not found", id)))
}

/// Helper to parse order ID from string (UUID-based)
fn parse_order_id(id: &str) -> ApiResult<OrderId> {
    OrderId::parse(id).ok_or_else(|| ApiError::BadRequest(format!("Invalid order ID: {}", id)))
}
