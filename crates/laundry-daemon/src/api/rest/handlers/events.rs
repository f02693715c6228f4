//! Event history and live stream handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::stream::{self, Stream};
use laundry_relay::{RelayError, TopicFilter};
use laundry_types::{EntityKind, RelayEvent};
use serde::Deserialize;
use std::convert::Infallible;

/// Get events query params
#[derive(Debug, Deserialize)]
pub struct GetEventsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Comma-separated entity kinds, e.g. `note,order`
    pub entity: Option<String>,
    /// Include `statsUpdated`; defaults to true only when no entity is given
    pub stats: Option<bool>,
}

/// Stream query params
#[derive(Debug, Deserialize)]
pub struct StreamEventsQuery {
    pub entity: Option<String>,
    pub stats: Option<bool>,
}

fn default_limit() -> usize {
    50
}

/// Get recent events, oldest first
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<GetEventsQuery>,
) -> ApiResult<Json<Vec<RelayEvent>>> {
    let filter = parse_filter(query.entity.as_deref(), query.stats)?;
    Ok(Json(state.bus.recent(query.limit, &filter)))
}

/// Stream events via SSE. The SSE event name is the relay event name and
/// the SSE id is its sequence.
pub async fn stream_events(
    State(state): State<AppState>,
    Query(query): Query<StreamEventsQuery>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let filter = parse_filter(query.entity.as_deref(), query.stats)?;
    let subscription = state.bus.subscribe(filter);

    tracing::debug!(subscribers = state.bus.subscriber_count(), "SSE client connected");

    let stream = stream::unfold(subscription, |mut subscription| async move {
        match subscription.recv().await {
            Ok(event) => Some((Ok(to_sse(&event)), subscription)),
            Err(RelayError::Lagged(skipped)) => {
                // Client lagged behind, continue
                let comment = format!("lagged {}", skipped);
                Some((Ok(Event::default().comment(comment)), subscription))
            }
            Err(_) => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(state.keep_alive)
            .text("ping"),
    ))
}

fn to_sse(event: &RelayEvent) -> Event {
    Event::default()
        .event(event.name.as_str())
        .id(event.sequence.to_string())
        .json_data(event)
        .unwrap_or_else(|e| {
            tracing::warn!(name = %event.name, error = %e, "Dropping unserializable event");
            Event::default().comment("unserializable")
        })
}

/// Build a topic filter from `entity=note,order` and `stats=bool`
fn parse_filter(entity: Option<&str>, stats: Option<bool>) -> ApiResult<TopicFilter> {
    let Some(raw) = entity.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(TopicFilter::all().with_stats(stats.unwrap_or(true)));
    };

    let kinds = raw
        .split(',')
        .map(|kind| {
            kind.trim()
                .parse::<EntityKind>()
                .map_err(ApiError::BadRequest)
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(TopicFilter::entities(kinds).with_stats(stats.unwrap_or(false)))
}
