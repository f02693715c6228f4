//! Note payment state machine
//!
//! Payment track: `pendiente → pagado → entregado`, with `cancelado`
//! reachable from the first two. Cleaning track moves forward only:
//! `sucia → lavado → listo_para_entregar`, and `entregado` is set by
//! delivery.
//!
//! Commands are applied to a working copy. The caller's note is replaced
//! only when every command in the batch succeeds, so a combined
//! abono-plus-payment either lands entirely or not at all.

use crate::error::NoteError;
use chrono::{DateTime, Utc};
use laundry_types::{Abono, CleaningStatus, Folio, Note, NoteStatus, PaymentMethod};
use serde::{Deserialize, Serialize};

/// A mutation requested on a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteCommand {
    /// Record a partial payment
    AddAbono { amount: i64, method: PaymentMethod },

    /// Close the balance. A method is needed only if a balance remains.
    MarkPaid { method: Option<PaymentMethod> },

    /// Hand the laundry back to the customer
    Deliver,

    /// Move the garments to a later cleaning stage
    SetCleaningStatus { status: CleaningStatus },

    /// Void the note
    Cancel { reason: Option<String> },
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteTransition {
    AbonoAdded {
        amount: i64,
        method: PaymentMethod,
        remaining: i64,
    },
    Paid {
        /// Abono appended to settle the balance, if one was needed
        settled_with: Option<i64>,
    },
    Delivered,
    CleaningAdvanced {
        from: CleaningStatus,
        to: CleaningStatus,
    },
    Cancelled,
}

/// Result of applying a command batch
#[derive(Debug, Clone)]
pub struct Applied {
    pub note: Note,
    pub transitions: Vec<NoteTransition>,
}

impl Applied {
    /// Whether the batch changed anything
    pub fn changed(&self) -> bool {
        !self.transitions.is_empty()
    }
}

/// Validated input for a new note
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub description: Option<String>,
    pub total: i64,
    /// Deposit taken at drop-off
    pub initial_abono: Option<(i64, PaymentMethod)>,
}

impl NoteDraft {
    pub fn new(customer_name: impl Into<String>, total: i64) -> Self {
        Self {
            customer_name: customer_name.into(),
            total,
            ..Default::default()
        }
    }

    pub fn with_deposit(mut self, amount: i64, method: PaymentMethod) -> Self {
        self.initial_abono = Some((amount, method));
        self
    }

    /// Open the note under the given folio
    pub fn open(self, folio: Folio) -> Result<Note, NoteError> {
        let customer_name = self.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(NoteError::MissingCustomer);
        }
        if self.total <= 0 {
            return Err(NoteError::InvalidTotal);
        }

        let mut note = Note::new(folio, customer_name, self.total);
        note.customer_phone = self.customer_phone.filter(|p| !p.trim().is_empty());
        note.description = self.description.filter(|d| !d.trim().is_empty());

        if let Some((amount, method)) = self.initial_abono {
            let now = note.created_at;
            step(&mut note, &NoteCommand::AddAbono { amount, method }, now)?;
        }

        Ok(note)
    }
}

/// Combined payment form: an optional abono followed by an optional
/// settle-up, both with the same method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub abono: Option<i64>,
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub mark_paid: bool,
}

impl Checkout {
    /// Expand into the command batch it stands for
    pub fn commands(&self) -> Result<Vec<NoteCommand>, NoteError> {
        let mut commands = Vec::with_capacity(2);
        if let Some(amount) = self.abono {
            let method = self.method.ok_or(NoteError::PaymentMethodRequired)?;
            commands.push(NoteCommand::AddAbono { amount, method });
        }
        if self.mark_paid {
            commands.push(NoteCommand::MarkPaid {
                method: self.method,
            });
        }
        Ok(commands)
    }
}

/// Apply a single command
pub fn apply(note: &Note, command: NoteCommand) -> Result<Applied, NoteError> {
    apply_all(note, &[command])
}

/// Apply a batch of commands atomically
pub fn apply_all(note: &Note, commands: &[NoteCommand]) -> Result<Applied, NoteError> {
    let now = Utc::now();
    let mut working = note.clone();
    let mut transitions = Vec::with_capacity(commands.len());

    for command in commands {
        if let Some(transition) = step(&mut working, command, now)? {
            transitions.push(transition);
        }
    }

    if !transitions.is_empty() {
        working.revision = note.revision + 1;
        working.updated_at = now;
        tracing::debug!(
            folio = %working.folio,
            revision = working.revision,
            steps = transitions.len(),
            "Applied note commands"
        );
    }

    Ok(Applied {
        note: working,
        transitions,
    })
}

/// Check that a note may be physically removed
pub fn ensure_deletable(note: &Note) -> Result<(), NoteError> {
    if note.has_payments() {
        return Err(NoteError::HasPayments);
    }
    Ok(())
}

fn step(
    note: &mut Note,
    command: &NoteCommand,
    now: DateTime<Utc>,
) -> Result<Option<NoteTransition>, NoteError> {
    match command {
        NoteCommand::AddAbono { amount, method } => add_abono(note, *amount, *method, now),
        NoteCommand::MarkPaid { method } => mark_paid(note, *method, now),
        NoteCommand::Deliver => deliver(note, now),
        NoteCommand::SetCleaningStatus { status } => set_cleaning(note, *status),
        NoteCommand::Cancel { reason } => cancel(note, reason.clone(), now),
    }
}

/// Payments are only accepted while the balance is open
fn ensure_open(note: &Note) -> Result<(), NoteError> {
    match note.note_status {
        NoteStatus::Pendiente => Ok(()),
        NoteStatus::Pagado => Err(NoteError::AlreadyPaid),
        NoteStatus::Entregado => Err(NoteError::AlreadyDelivered),
        NoteStatus::Cancelado => Err(NoteError::Cancelled),
    }
}

fn add_abono(
    note: &mut Note,
    amount: i64,
    method: PaymentMethod,
    now: DateTime<Utc>,
) -> Result<Option<NoteTransition>, NoteError> {
    ensure_open(note)?;

    if amount <= 0 {
        return Err(NoteError::InvalidAmount);
    }

    let remaining = note.remaining();
    if amount > remaining {
        return Err(NoteError::AbonoExceedsRemaining { amount, remaining });
    }

    note.abonos.push(Abono {
        amount,
        method,
        date: now,
    });

    Ok(Some(NoteTransition::AbonoAdded {
        amount,
        method,
        remaining: remaining - amount,
    }))
}

fn mark_paid(
    note: &mut Note,
    method: Option<PaymentMethod>,
    now: DateTime<Utc>,
) -> Result<Option<NoteTransition>, NoteError> {
    ensure_open(note)?;

    let remaining = note.remaining();
    let settled_with = if remaining > 0 {
        let method = method.ok_or(NoteError::PaymentMethodRequired)?;
        note.abonos.push(Abono {
            amount: remaining,
            method,
            date: now,
        });
        Some(remaining)
    } else {
        None
    };

    note.note_status = NoteStatus::Pagado;
    note.paid_at = Some(now);

    Ok(Some(NoteTransition::Paid { settled_with }))
}

fn deliver(note: &mut Note, now: DateTime<Utc>) -> Result<Option<NoteTransition>, NoteError> {
    match note.note_status {
        NoteStatus::Pagado => {}
        NoteStatus::Pendiente => return Err(NoteError::NotPaid),
        NoteStatus::Entregado => return Err(NoteError::AlreadyDelivered),
        NoteStatus::Cancelado => return Err(NoteError::Cancelled),
    }

    if note.cleaning_status != CleaningStatus::ListoParaEntregar {
        return Err(NoteError::NotReadyForDelivery(note.cleaning_status));
    }

    note.note_status = NoteStatus::Entregado;
    note.cleaning_status = CleaningStatus::Entregado;
    note.delivered_at = Some(now);

    Ok(Some(NoteTransition::Delivered))
}

fn set_cleaning(
    note: &mut Note,
    target: CleaningStatus,
) -> Result<Option<NoteTransition>, NoteError> {
    ensure_not_closed(note)?;

    let current = note.cleaning_status;
    if target == current {
        return Ok(None);
    }
    if target == CleaningStatus::Entregado {
        return Err(NoteError::CleaningRequiresDelivery);
    }
    if target < current {
        return Err(NoteError::CleaningBackwards {
            from: current,
            to: target,
        });
    }

    note.cleaning_status = target;

    Ok(Some(NoteTransition::CleaningAdvanced {
        from: current,
        to: target,
    }))
}

fn cancel(
    note: &mut Note,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<Option<NoteTransition>, NoteError> {
    ensure_not_closed(note)?;

    note.note_status = NoteStatus::Cancelado;
    note.cancelled_at = Some(now);
    note.cancel_reason = reason.filter(|r| !r.trim().is_empty());

    Ok(Some(NoteTransition::Cancelled))
}

/// Delivered and cancelled notes take no further edits
fn ensure_not_closed(note: &Note) -> Result<(), NoteError> {
    if !note.note_status.is_terminal() {
        return Ok(());
    }
    Err(match note.note_status {
        NoteStatus::Entregado => NoteError::AlreadyDelivered,
        _ => NoteError::Cancelled,
    })
}
