//! Shop order types
//!
//! Orders are simpler than notes: paid in one go, then shipped.

use crate::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shipping stage of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Dispatched,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Dispatched => "dispatched",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line on an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// Unit price in minor units
    pub unit_price: i64,
}

impl OrderItem {
    /// Price times quantity; `None` on overflow
    pub fn subtotal(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }
}

/// A shop order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,

    pub customer_name: String,

    pub items: Vec<OrderItem>,

    /// Sum of item subtotals, computed at creation
    pub total: i64,

    pub delivery_status: DeliveryStatus,

    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub dispatched_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub revision: u64,
}

impl Order {
    /// Open a pending order. Returns `None` if the item total overflows.
    pub fn new(customer_name: impl Into<String>, items: Vec<OrderItem>) -> Option<Self> {
        let now = Utc::now();
        let total = items
            .iter()
            .try_fold(0i64, |sum, item| sum.checked_add(item.subtotal()?))?;
        Some(Self {
            id: OrderId::generate(),
            customer_name: customer_name.into(),
            items,
            total,
            delivery_status: DeliveryStatus::Pending,
            paid_at: None,
            dispatched_at: None,
            delivered_at: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
            revision: 1,
        })
    }

    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }
}
