//! Payment methods and partial payments (abonos)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a customer paid
///
/// The wire names are the ones printed on tickets (`efectivo`, `tarjeta`,
/// `transferencia`). Parsing also accepts the English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PaymentMethod {
    #[serde(rename = "efectivo")]
    Cash,
    #[serde(rename = "tarjeta")]
    Card,
    #[serde(rename = "transferencia")]
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
    ];

    /// Wire name of this method
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "efectivo",
            PaymentMethod::Card => "tarjeta",
            PaymentMethod::Transfer => "transferencia",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected payment method string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Método de pago desconocido: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efectivo" | "cash" => Ok(PaymentMethod::Cash),
            "tarjeta" | "card" => Ok(PaymentMethod::Card),
            "transferencia" | "transfer" => Ok(PaymentMethod::Transfer),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = UnknownPaymentMethod;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A partial payment applied toward a note's total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abono {
    /// Amount in minor units
    pub amount: i64,

    /// How it was paid
    pub method: PaymentMethod,

    /// When it was received
    pub date: DateTime<Utc>,
}

impl Abono {
    pub fn new(amount: i64, method: PaymentMethod) -> Self {
        Self {
            amount,
            method,
            date: Utc::now(),
        }
    }
}
