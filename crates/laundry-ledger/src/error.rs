use laundry_types::{CleaningStatus, DeliveryStatus};
use thiserror::Error;

/// Rejections from the note state machine.
///
/// Messages are shown to shop staff as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    // --- Creation ---
    #[error("El nombre del cliente es obligatorio")]
    MissingCustomer,

    #[error("El total debe ser mayor a cero")]
    InvalidTotal,

    // --- Abonos ---
    #[error("El abono debe ser mayor a cero")]
    InvalidAmount,

    #[error("El abono excede el restante")]
    AbonoExceedsRemaining { amount: i64, remaining: i64 },

    #[error("Selecciona un método de pago")]
    PaymentMethodRequired,

    // --- Status ---
    #[error("La nota ya fue pagada")]
    AlreadyPaid,

    #[error("La nota ya fue entregada")]
    AlreadyDelivered,

    #[error("La nota está cancelada")]
    Cancelled,

    #[error("La nota debe estar pagada antes de entregarse")]
    NotPaid,

    #[error("La ropa no está lista para entregar (estado: {0})")]
    NotReadyForDelivery(CleaningStatus),

    // --- Cleaning ---
    #[error("No se puede regresar de {from} a {to}")]
    CleaningBackwards {
        from: CleaningStatus,
        to: CleaningStatus,
    },

    #[error("La ropa solo se marca como entregada al entregar la nota")]
    CleaningRequiresDelivery,

    // --- Removal ---
    #[error("La nota tiene abonos; cancélala en lugar de eliminarla")]
    HasPayments,
}

impl NoteError {
    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            NoteError::MissingCustomer => "MISSING_CUSTOMER",
            NoteError::InvalidTotal => "INVALID_TOTAL",
            NoteError::InvalidAmount => "INVALID_AMOUNT",
            NoteError::AbonoExceedsRemaining { .. } => "ABONO_EXCEEDS_REMAINING",
            NoteError::PaymentMethodRequired => "PAYMENT_METHOD_REQUIRED",
            NoteError::AlreadyPaid => "ALREADY_PAID",
            NoteError::AlreadyDelivered => "ALREADY_DELIVERED",
            NoteError::Cancelled => "NOTE_CANCELLED",
            NoteError::NotPaid => "NOT_PAID",
            NoteError::NotReadyForDelivery(_) => "NOT_READY_FOR_DELIVERY",
            NoteError::CleaningBackwards { .. } => "CLEANING_BACKWARDS",
            NoteError::CleaningRequiresDelivery => "CLEANING_REQUIRES_DELIVERY",
            NoteError::HasPayments => "NOTE_HAS_PAYMENTS",
        }
    }
}

/// Rejections from the order lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("El nombre del cliente es obligatorio")]
    MissingCustomer,

    #[error("El pedido no tiene artículos")]
    EmptyOrder,

    #[error("Cantidad y precio deben ser mayores a cero ({0})")]
    InvalidItem(String),

    #[error("El total del pedido es demasiado grande")]
    TotalOverflow,

    #[error("El pedido ya fue pagado")]
    AlreadyPaid,

    #[error("No se puede pasar de {from} a {to}")]
    InvalidTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("El pedido está cancelado")]
    Cancelled,

    #[error("No se puede eliminar un pedido pagado")]
    PaidOrderNotDeletable,
}

impl OrderError {
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::MissingCustomer => "MISSING_CUSTOMER",
            OrderError::EmptyOrder => "EMPTY_ORDER",
            OrderError::InvalidItem(_) => "INVALID_ITEM",
            OrderError::TotalOverflow => "TOTAL_OVERFLOW",
            OrderError::AlreadyPaid => "ALREADY_PAID",
            OrderError::InvalidTransition { .. } => "INVALID_TRANSITION",
            OrderError::Cancelled => "ORDER_CANCELLED",
            OrderError::PaidOrderNotDeletable => "PAID_ORDER_NOT_DELETABLE",
        }
    }
}
