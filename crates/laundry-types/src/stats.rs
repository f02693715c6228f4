//! Dashboard statistics pushed with `statsUpdated`

use serde::{Deserialize, Serialize};

/// Note counts by payment status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCounts {
    pub total: usize,
    pub pendiente: usize,
    pub pagado: usize,
    pub entregado: usize,
    pub cancelado: usize,
}

/// Live notes per cleaning stage (delivered and cancelled notes excluded)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningQueue {
    pub sucia: usize,
    pub lavado: usize,
    pub listo_para_entregar: usize,
}

/// Order counts by delivery status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCounts {
    pub total: usize,
    pub pending: usize,
    pub dispatched: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

/// Aggregate view of the shop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaundryStats {
    pub notes: NoteCounts,
    pub cleaning: CleaningQueue,
    /// Money received through abonos on non-cancelled notes
    pub collected: i64,
    /// Balance still owed on pending notes
    pub outstanding: i64,
    pub orders: OrderCounts,
    /// Revenue from paid, non-cancelled orders
    pub order_revenue: i64,
}
