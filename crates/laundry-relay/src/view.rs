//! Derived list views
//!
//! Filtering, sorting and pagination over a fetched or mirrored list. These
//! are pure functions; the daemon uses the same code for its list endpoints.

use laundry_types::{CleaningStatus, DeliveryStatus, Note, NoteStatus, Order};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Total,
    Customer,
    /// Folio for notes; falls back to creation time for orders
    Folio,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// One page of a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches before pagination
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Query accepted by note lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteQuery {
    pub status: Option<NoteStatus>,
    pub cleaning_status: Option<CleaningStatus>,
    /// Case-insensitive search over folio, customer and phone
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortDirection,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Query accepted by order lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub delivery_status: Option<DeliveryStatus>,
    /// Case-insensitive search over customer and item names
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortDirection,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Filter, sort and paginate notes
pub fn note_view(notes: &[Note], query: &NoteQuery) -> Page<Note> {
    let needle = normalized(query.q.as_deref());

    let mut matches: Vec<&Note> = notes
        .iter()
        .filter(|n| query.status.map_or(true, |s| n.note_status == s))
        .filter(|n| query.cleaning_status.map_or(true, |s| n.cleaning_status == s))
        .filter(|n| {
            needle.as_deref().map_or(true, |needle| {
                contains(n.folio.as_str(), needle)
                    || contains(&n.customer_name, needle)
                    || n.customer_phone
                        .as_deref()
                        .is_some_and(|p| contains(p, needle))
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        let ord = match query.sort {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::Total => a.total.cmp(&b.total),
            SortKey::Customer => cmp_text(&a.customer_name, &b.customer_name),
            SortKey::Folio => a.folio.cmp(&b.folio),
        };
        directed(ord, query.order).then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });

    paginate(matches, query.page, query.per_page)
}

/// Filter, sort and paginate orders
pub fn order_view(orders: &[Order], query: &OrderQuery) -> Page<Order> {
    let needle = normalized(query.q.as_deref());

    let mut matches: Vec<&Order> = orders
        .iter()
        .filter(|o| query.delivery_status.map_or(true, |s| o.delivery_status == s))
        .filter(|o| {
            needle.as_deref().map_or(true, |needle| {
                contains(&o.customer_name, needle)
                    || o.items.iter().any(|i| contains(&i.name, needle))
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        let ord = match query.sort {
            SortKey::CreatedAt | SortKey::Folio => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::Total => a.total.cmp(&b.total),
            SortKey::Customer => cmp_text(&a.customer_name, &b.customer_name),
        };
        directed(ord, query.order).then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });

    paginate(matches, query.page, query.per_page)
}

/// Cut one page out of an already ordered list. Pages are 1-based; the
/// page size is clamped to `1..=MAX_PER_PAGE`.
pub fn paginate<T: Clone>(items: Vec<&T>, page: Option<usize>, per_page: Option<usize>) -> Page<T> {
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let page = page.unwrap_or(1).max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect();

    Page {
        items,
        total,
        page,
        per_page,
        total_pages,
    }
}

fn directed(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

fn normalized(q: Option<&str>) -> Option<String> {
    q.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
