//! Aggregate statistics over notes and orders

use laundry_types::{
    CleaningStatus, DeliveryStatus, LaundryStats, Note, NoteStatus, Order,
};

/// Compute the dashboard numbers from the current documents
///
/// Money sums saturate at `i64::MAX` instead of overflowing.
pub fn compute_stats<'a>(
    notes: impl IntoIterator<Item = &'a Note>,
    orders: impl IntoIterator<Item = &'a Order>,
) -> LaundryStats {
    let mut stats = LaundryStats::default();

    for note in notes {
        stats.notes.total += 1;
        match note.note_status {
            NoteStatus::Pendiente => stats.notes.pendiente += 1,
            NoteStatus::Pagado => stats.notes.pagado += 1,
            NoteStatus::Entregado => stats.notes.entregado += 1,
            NoteStatus::Cancelado => stats.notes.cancelado += 1,
        }

        if note.note_status == NoteStatus::Cancelado {
            continue;
        }

        stats.collected = stats.collected.saturating_add(note.paid_total());

        if note.note_status == NoteStatus::Pendiente {
            stats.outstanding = stats.outstanding.saturating_add(note.remaining());
        }

        if note.note_status != NoteStatus::Entregado {
            match note.cleaning_status {
                CleaningStatus::Sucia => stats.cleaning.sucia += 1,
                CleaningStatus::Lavado => stats.cleaning.lavado += 1,
                CleaningStatus::ListoParaEntregar => stats.cleaning.listo_para_entregar += 1,
                CleaningStatus::Entregado => {}
            }
        }
    }

    for order in orders {
        stats.orders.total += 1;
        match order.delivery_status {
            DeliveryStatus::Pending => stats.orders.pending += 1,
            DeliveryStatus::Dispatched => stats.orders.dispatched += 1,
            DeliveryStatus::Delivered => stats.orders.delivered += 1,
            DeliveryStatus::Cancelled => stats.orders.cancelled += 1,
        }
        if order.is_paid() && order.delivery_status != DeliveryStatus::Cancelled {
            stats.order_revenue = stats.order_revenue.saturating_add(order.total);
        }
    }

    stats
}
