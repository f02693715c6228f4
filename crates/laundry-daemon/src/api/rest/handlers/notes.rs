//! Note handlers
//!
//! Every mutation loads the note, runs the ledger on a copy, and commits it
//! with one revision-checked replace. Events go out only after the commit.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::NoteStorage;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use laundry_ledger::{apply_all, ensure_deletable, Checkout, NoteCommand, NoteDraft, NoteError};
use laundry_relay::{note_view, NoteQuery, Page};
use laundry_types::{
    CleaningStatus, EntityKind, EventAction, Folio, Note, NoteId, NoteStatus, PaymentMethod,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Create note request
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub description: Option<String>,
    pub total: i64,
    /// Deposit taken at drop-off
    pub abono: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
}

/// Combined edit form: cleaning stage, an abono, and a target status
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub cleaning_status: Option<CleaningStatus>,
    pub abono: Option<i64>,
    pub note_status: Option<NoteStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub cancel_reason: Option<String>,
    pub expected_revision: Option<u64>,
}

/// Add abono request
#[derive(Debug, Deserialize)]
pub struct AddAbonoRequest {
    pub amount: i64,
    pub method: PaymentMethod,
    pub expected_revision: Option<u64>,
}

/// Pay note request
#[derive(Debug, Default, Deserialize)]
pub struct PayNoteRequest {
    pub method: Option<PaymentMethod>,
    pub expected_revision: Option<u64>,
}

/// Deliver note request
#[derive(Debug, Default, Deserialize)]
pub struct DeliverNoteRequest {
    pub expected_revision: Option<u64>,
}

/// Cancel note request
#[derive(Debug, Default, Deserialize)]
pub struct CancelNoteRequest {
    pub reason: Option<String>,
    pub expected_revision: Option<u64>,
}

/// Delete note response
#[derive(Debug, Serialize)]
pub struct DeleteNoteResponse {
    pub deleted: bool,
}

/// List notes with filters, sorting and pagination
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<NoteQuery>,
) -> ApiResult<Json<Page<Note>>> {
    let notes = state.storage.list_notes().await?;
    Ok(Json(note_view(&notes, &query)))
}

/// Get a specific note
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let note_id = parse_note_id(&id)?;
    Ok(Json(load_note(&state, &note_id).await?))
}

/// Open a new note
pub async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let mut draft = NoteDraft::new(request.customer_name, request.total);
    draft.customer_phone = request.customer_phone;
    draft.description = request.description;
    if let Some(amount) = request.abono {
        let method = request
            .payment_method
            .ok_or(NoteError::PaymentMethodRequired)?;
        draft = draft.with_deposit(amount, method);
    }

    let sequence = state.storage.next_folio().await?;
    let note = draft.open(Folio::from_sequence(&state.folio_prefix, sequence))?;

    state.storage.insert_note(note.clone()).await?;

    tracing::info!(note_id = %note.id, folio = %note.folio, total = note.total, "Created note");
    state.announce_note(EventAction::Created, &note).await;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Apply the combined edit form atomically
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let note_id = parse_note_id(&id)?;
    let current = load_note(&state, &note_id).await?;
    let commands = edit_commands(&current, &request)?;

    let note = commit(&state, current, request.expected_revision, &commands).await?;
    Ok(Json(note))
}

/// Record a partial payment
pub async fn add_abono(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddAbonoRequest>,
) -> ApiResult<Json<Note>> {
    let note_id = parse_note_id(&id)?;
    let current = load_note(&state, &note_id).await?;
    let command = NoteCommand::AddAbono {
        amount: request.amount,
        method: request.method,
    };

    let note = commit(&state, current, request.expected_revision, &[command]).await?;
    Ok(Json(note))
}

/// Settle the balance and mark the note paid
pub async fn pay_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Note>> {
    let request: PayNoteRequest = optional_body(&body)?;
    let note_id = parse_note_id(&id)?;
    let current = load_note(&state, &note_id).await?;
    let command = NoteCommand::MarkPaid {
        method: request.method,
    };

    let note = commit(&state, current, request.expected_revision, &[command]).await?;
    Ok(Json(note))
}

/// Hand the laundry back
pub async fn deliver_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Note>> {
    let request: DeliverNoteRequest = optional_body(&body)?;
    let note_id = parse_note_id(&id)?;
    let current = load_note(&state, &note_id).await?;

    let note = commit(
        &state,
        current,
        request.expected_revision,
        &[NoteCommand::Deliver],
    )
    .await?;
    Ok(Json(note))
}

/// Void a note
pub async fn cancel_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Note>> {
    let request: CancelNoteRequest = optional_body(&body)?;
    let note_id = parse_note_id(&id)?;
    let current = load_note(&state, &note_id).await?;
    let command = NoteCommand::Cancel {
        reason: request.reason,
    };

    let note = commit(&state, current, request.expected_revision, &[command]).await?;
    Ok(Json(note))
}

/// Remove a note that never received a payment
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteNoteResponse>> {
    let note_id = parse_note_id(&id)?;
    let note = load_note(&state, &note_id).await?;
    ensure_deletable(&note)?;

    state.storage.delete_note(&note_id, note.revision).await?;

    tracing::info!(note_id = %note_id, folio = %note.folio, "Deleted note");
    state
        .announce_deleted(EntityKind::Note, note_id.as_uuid().to_string())
        .await;

    Ok(Json(DeleteNoteResponse { deleted: true }))
}

/// Translate the edit form into ledger commands, cleaning first so a note
/// can be marked ready and delivered in one request
fn edit_commands(current: &Note, request: &UpdateNoteRequest) -> ApiResult<Vec<NoteCommand>> {
    let mut commands = Vec::new();

    if let Some(status) = request.cleaning_status {
        commands.push(NoteCommand::SetCleaningStatus { status });
    }

    let target = request
        .note_status
        .filter(|status| *status != current.note_status);

    let checkout = Checkout {
        abono: request.abono,
        method: request.payment_method,
        mark_paid: target == Some(NoteStatus::Pagado),
    };
    commands.extend(checkout.commands()?);

    match target {
        None | Some(NoteStatus::Pagado) => {}
        Some(NoteStatus::Entregado) => commands.push(NoteCommand::Deliver),
        Some(NoteStatus::Cancelado) => commands.push(NoteCommand::Cancel {
            reason: request.cancel_reason.clone(),
        }),
        Some(NoteStatus::Pendiente) => {
            return Err(ApiError::Validation(format!(
                "No se puede regresar una nota {} a pendiente",
                current.note_status
            )));
        }
    }

    Ok(commands)
}

/// Apply commands to `current` and persist the result
async fn commit(
    state: &AppState,
    current: Note,
    expected_revision: Option<u64>,
    commands: &[NoteCommand],
) -> ApiResult<Note> {
    if let Some(expected) = expected_revision {
        if expected != current.revision {
            return Err(ApiError::Conflict(format!(
                "Note {} is at revision {}, not {}",
                current.folio, current.revision, expected
            )));
        }
    }

    let applied = apply_all(&current, commands)?;
    if !applied.changed() {
        return Ok(applied.note);
    }

    state
        .storage
        .replace_note(applied.note.clone(), current.revision)
        .await?;

    tracing::info!(
        note_id = %applied.note.id,
        folio = %applied.note.folio,
        revision = applied.note.revision,
        status = %applied.note.note_status,
        steps = ?applied.transitions,
        "Updated note"
    );
    state
        .announce_note(EventAction::Updated, &applied.note)
        .await;

    Ok(applied.note)
}

async fn load_note(state: &AppState, id: &NoteId) -> ApiResult<Note> {
    state
        .storage
        .get_note(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Note {} not found", id)))
}

/// Action endpoints accept an empty body
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Helper to parse note ID from string (UUID-based)
fn parse_note_id(id: &str) -> ApiResult<NoteId> {
    NoteId::parse(id).ok_or_else(|| ApiError::BadRequest(format!("Invalid note ID: {}", id)))
}
