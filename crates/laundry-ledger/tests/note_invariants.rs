//! Property tests: note payment invariants hold under any command sequence.

use laundry_ledger::{apply, NoteCommand, NoteDraft, NoteError};
use laundry_types::{CleaningStatus, Folio, Note, NoteStatus, PaymentMethod};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_method() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::Card),
        Just(PaymentMethod::Transfer),
    ]
}

fn arb_cleaning() -> impl Strategy<Value = CleaningStatus> {
    prop_oneof![
        Just(CleaningStatus::Sucia),
        Just(CleaningStatus::Lavado),
        Just(CleaningStatus::ListoParaEntregar),
        Just(CleaningStatus::Entregado),
    ]
}

fn arb_command() -> impl Strategy<Value = NoteCommand> {
    prop_oneof![
        4 => (-50i64..20_000, arb_method())
            .prop_map(|(amount, method)| NoteCommand::AddAbono { amount, method }),
        2 => proptest::option::of(arb_method())
            .prop_map(|method| NoteCommand::MarkPaid { method }),
        2 => Just(NoteCommand::Deliver),
        3 => arb_cleaning().prop_map(|status| NoteCommand::SetCleaningStatus { status }),
        1 => Just(NoteCommand::Cancel { reason: None }),
    ]
}

fn fresh_note(total: i64) -> Note {
    NoteDraft::new("Propiedad", total)
        .open(Folio::new("N-99999"))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Accepted abonos never push the paid sum past the total.
    #[test]
    fn abonos_never_exceed_total(
        total in 1i64..10_000,
        commands in proptest::collection::vec(arb_command(), 0..24),
    ) {
        let mut note = fresh_note(total);
        for command in commands {
            if let Ok(applied) = apply(&note, command) {
                note = applied.note;
            }
            prop_assert!(note.paid_total() <= note.total);
            prop_assert!(note.remaining() >= 0);
        }
    }

    /// Delivery only ever follows a paid note with ready laundry.
    #[test]
    fn delivery_requires_paid_and_ready(
        total in 1i64..10_000,
        commands in proptest::collection::vec(arb_command(), 0..24),
    ) {
        let mut note = fresh_note(total);
        for command in commands {
            let before = note.clone();
            if let Ok(applied) = apply(&note, command) {
                note = applied.note;
            }
            if note.note_status == NoteStatus::Entregado
                && before.note_status != NoteStatus::Entregado
            {
                prop_assert_eq!(before.note_status, NoteStatus::Pagado);
                prop_assert_eq!(before.cleaning_status, CleaningStatus::ListoParaEntregar);
                prop_assert!(note.delivered_at.is_some());
            }
        }
    }

    /// Abonos on paid or delivered notes are rejected and change nothing.
    #[test]
    fn abono_after_payment_rejected(
        total in 1i64..10_000,
        amount in 1i64..10_000,
        method in arb_method(),
        deliver in any::<bool>(),
    ) {
        let mut note = apply(&fresh_note(total), NoteCommand::MarkPaid { method: Some(method) })
            .unwrap()
            .note;
        if deliver {
            note = apply(&note, NoteCommand::SetCleaningStatus {
                status: CleaningStatus::ListoParaEntregar,
            })
            .unwrap()
            .note;
            note = apply(&note, NoteCommand::Deliver).unwrap().note;
        }

        let snapshot = note.clone();
        let err = apply(&note, NoteCommand::AddAbono { amount, method }).unwrap_err();
        prop_assert!(matches!(err, NoteError::AlreadyPaid | NoteError::AlreadyDelivered));
        prop_assert_eq!(note, snapshot);
    }

    /// Paying needs a method exactly when a balance remains.
    #[test]
    fn method_required_only_with_balance(
        total in 2i64..10_000,
        paid_fraction in 1u32..=100,
        method in arb_method(),
    ) {
        let deposit = (total * i64::from(paid_fraction) / 100).max(1);
        let note = apply(&fresh_note(total), NoteCommand::AddAbono { amount: deposit, method })
            .unwrap()
            .note;

        let result = apply(&note, NoteCommand::MarkPaid { method: None });
        if note.remaining() == 0 {
            let paid = result.unwrap().note;
            prop_assert_eq!(paid.note_status, NoteStatus::Pagado);
            prop_assert_eq!(paid.abonos.len(), 1);
        } else {
            prop_assert_eq!(result.unwrap_err(), NoteError::PaymentMethodRequired);
            let paid = apply(&note, NoteCommand::MarkPaid { method: Some(method) })
                .unwrap()
                .note;
            prop_assert_eq!(paid.remaining(), 0);
            prop_assert!(paid.paid_at.is_some());
        }
    }

    /// Revisions only move forward, one step per accepted mutation.
    #[test]
    fn revision_is_monotonic(
        commands in proptest::collection::vec(arb_command(), 0..24),
    ) {
        let mut note = fresh_note(5_000);
        for command in commands {
            let before = note.revision;
            if let Ok(applied) = apply(&note, command) {
                let expected = if applied.changed() { before + 1 } else { before };
                prop_assert_eq!(applied.note.revision, expected);
                note = applied.note;
            }
        }
    }
}

#[test]
fn walkthrough_partial_then_settle() {
    let note = fresh_note(100);

    let note = apply(
        &note,
        NoteCommand::AddAbono {
            amount: 60,
            method: PaymentMethod::Cash,
        },
    )
    .unwrap()
    .note;
    assert_eq!(note.remaining(), 40);
    assert_eq!(note.note_status, NoteStatus::Pendiente);

    let note = apply(
        &note,
        NoteCommand::MarkPaid {
            method: Some(PaymentMethod::Card),
        },
    )
    .unwrap()
    .note;
    assert_eq!(note.note_status, NoteStatus::Pagado);
    assert!(note.paid_at.is_some());
    assert_eq!(note.abonos.last().map(|a| a.amount), Some(40));
}

#[test]
fn walkthrough_oversized_abono() {
    let note = fresh_note(100);
    let err = apply(
        &note,
        NoteCommand::AddAbono {
            amount: 150,
            method: PaymentMethod::Cash,
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "El abono excede el restante");
    assert!(note.abonos.is_empty());
}
