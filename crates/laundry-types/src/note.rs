//! Laundry note types
//!
//! A note is the ticket a customer gets when dropping off laundry. It moves
//! through two independent tracks: cleaning (`sucia` to `entregado`) and
//! payment (`pendiente` to `entregado`). Delivery joins the two.

use crate::{Abono, Folio, NoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment/delivery status of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    /// Balance still open
    Pendiente,
    /// Fully paid, waiting for pickup
    Pagado,
    /// Handed back to the customer
    Entregado,
    /// Voided; kept for the record
    Cancelado,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Pendiente => "pendiente",
            NoteStatus::Pagado => "pagado",
            NoteStatus::Entregado => "entregado",
            NoteStatus::Cancelado => "cancelado",
        }
    }

    /// No further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, NoteStatus::Entregado | NoteStatus::Cancelado)
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaning stage of the garments on a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStatus {
    Sucia,
    Lavado,
    ListoParaEntregar,
    Entregado,
}

impl CleaningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningStatus::Sucia => "sucia",
            CleaningStatus::Lavado => "lavado",
            CleaningStatus::ListoParaEntregar => "listo_para_entregar",
            CleaningStatus::Entregado => "entregado",
        }
    }
}

impl Default for CleaningStatus {
    fn default() -> Self {
        CleaningStatus::Sucia
    }
}

impl fmt::Display for CleaningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A laundry note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique note identifier
    #[serde(alias = "_id")]
    pub id: NoteId,

    /// Ticket number shown to the customer
    pub folio: Folio,

    pub customer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Amount owed in minor units, fixed at creation
    pub total: i64,

    /// Partial payments in the order they were received
    #[serde(default)]
    pub abonos: Vec<Abono>,

    pub note_status: NoteStatus,

    pub cleaning_status: CleaningStatus,

    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Bumped on every accepted mutation
    pub revision: u64,
}

impl Note {
    /// Create a fresh pending note with dirty laundry and no payments
    pub fn new(folio: Folio, customer_name: impl Into<String>, total: i64) -> Self {
        let now = Utc::now();
        Self {
            id: NoteId::generate(),
            folio,
            customer_name: customer_name.into(),
            customer_phone: None,
            description: None,
            total,
            abonos: Vec::new(),
            note_status: NoteStatus::Pendiente,
            cleaning_status: CleaningStatus::Sucia,
            paid_at: None,
            delivered_at: None,
            cancelled_at: None,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
            revision: 1,
        }
    }

    /// Sum of all abonos received so far
    pub fn paid_total(&self) -> i64 {
        self.abonos.iter().map(|a| a.amount).sum()
    }

    /// Balance still owed
    pub fn remaining(&self) -> i64 {
        self.total - self.paid_total()
    }

    pub fn has_payments(&self) -> bool {
        !self.abonos.is_empty()
    }
}
