//! Order delivery lifecycle
//!
//! `pending → dispatched → delivered`, with `cancelled` reachable until the
//! order is delivered. Payment is a single flag set once.

use crate::error::OrderError;
use chrono::Utc;
use laundry_types::{DeliveryStatus, Order, OrderItem};
use serde::{Deserialize, Serialize};

/// A mutation requested on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderCommand {
    MarkPaid,
    Dispatch,
    Deliver,
    Cancel,
}

impl OrderCommand {
    /// Command that moves an order to the given delivery status
    pub fn for_status(status: DeliveryStatus) -> Option<Self> {
        match status {
            DeliveryStatus::Pending => None,
            DeliveryStatus::Dispatched => Some(OrderCommand::Dispatch),
            DeliveryStatus::Delivered => Some(OrderCommand::Deliver),
            DeliveryStatus::Cancelled => Some(OrderCommand::Cancel),
        }
    }
}

/// Validate items and open a new order
pub fn open_order(customer_name: &str, items: Vec<OrderItem>) -> Result<Order, OrderError> {
    let customer_name = customer_name.trim();
    if customer_name.is_empty() {
        return Err(OrderError::MissingCustomer);
    }
    if items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    if let Some(bad) = items.iter().find(|i| i.quantity == 0 || i.unit_price <= 0) {
        return Err(OrderError::InvalidItem(bad.name.clone()));
    }

    Order::new(customer_name, items).ok_or(OrderError::TotalOverflow)
}

/// Apply commands to a copy of the order; all or nothing
pub fn apply_order(order: &Order, commands: &[OrderCommand]) -> Result<Order, OrderError> {
    let now = Utc::now();
    let mut working = order.clone();
    let mut changed = false;

    for command in commands {
        let from = working.delivery_status;
        match command {
            OrderCommand::MarkPaid => {
                if from == DeliveryStatus::Cancelled {
                    return Err(OrderError::Cancelled);
                }
                if working.is_paid() {
                    return Err(OrderError::AlreadyPaid);
                }
                working.paid_at = Some(now);
            }
            OrderCommand::Dispatch => {
                transition(from, DeliveryStatus::Dispatched, &[DeliveryStatus::Pending])?;
                working.delivery_status = DeliveryStatus::Dispatched;
                working.dispatched_at = Some(now);
            }
            OrderCommand::Deliver => {
                transition(from, DeliveryStatus::Delivered, &[DeliveryStatus::Dispatched])?;
                working.delivery_status = DeliveryStatus::Delivered;
                working.delivered_at = Some(now);
            }
            OrderCommand::Cancel => {
                transition(
                    from,
                    DeliveryStatus::Cancelled,
                    &[DeliveryStatus::Pending, DeliveryStatus::Dispatched],
                )?;
                working.delivery_status = DeliveryStatus::Cancelled;
                working.cancelled_at = Some(now);
            }
        }
        changed = true;
    }

    if changed {
        working.revision = order.revision + 1;
        working.updated_at = now;
    }

    Ok(working)
}

/// Orders may be hard-deleted only before payment
pub fn ensure_order_deletable(order: &Order) -> Result<(), OrderError> {
    if order.is_paid() {
        return Err(OrderError::PaidOrderNotDeletable);
    }
    Ok(())
}

fn transition(
    from: DeliveryStatus,
    to: DeliveryStatus,
    allowed_from: &[DeliveryStatus],
) -> Result<(), OrderError> {
    if allowed_from.contains(&from) {
        Ok(())
    } else {
        Err(OrderError::InvalidTransition { from, to })
    }
}
