//! End-to-end tests against the router

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use futures_util::StreamExt;
use laundry_daemon::{create_router, AppState, DaemonConfig, Server};
use laundry_relay::{EntityMirror, PatchOutcome, TopicFilter};
use laundry_types::{EntityKind, Note};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

fn test_app(tokens: &[&str]) -> (Router, AppState) {
    let mut config = DaemonConfig::default();
    config.auth.tokens = tokens.iter().map(|t| t.to_string()).collect();
    let state = Server::new(config).unwrap().state();
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, method, uri, body, None).await
}

async fn send_as(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_note(app: &Router, body: Value) -> Value {
    let (status, note) = send(app, "POST", "/api/notes", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{note}");
    note
}

#[tokio::test]
async fn health_is_open() {
    let (app, _) = test_app(&["caja-1"]);
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn tokens_gate_the_api() {
    let (app, _) = test_app(&["caja-1"]);

    let (status, body) = send(&app, "GET", "/api/notes", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send_as(&app, "GET", "/api/notes", None, Some("caja-9")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_as(&app, "GET", "/api/notes", None, Some("caja-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn note_lifecycle_emits_events() {
    let (app, state) = test_app(&[]);

    let note = create_note(
        &app,
        json!({ "customer_name": "Rosa", "total": 10000, "abono": 4000, "payment_method": "efectivo" }),
    )
    .await;
    assert_eq!(note["folio"], "N-00001");
    assert_eq!(note["note_status"], "pendiente");
    assert_eq!(note["revision"], 1);
    let id = note["id"].as_str().unwrap().to_string();

    // Oversized abono: rejected, nothing changes
    let (status, err) = send(
        &app,
        "POST",
        &format!("/api/notes/{id}/abonos"),
        Some(json!({ "amount": 7000, "method": "tarjeta" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "El abono excede el restante");
    assert_eq!(err["details"]["remaining"], 6000);

    // Partial abono keeps the note pending
    let (status, note) = send(
        &app,
        "POST",
        &format!("/api/notes/{id}/abonos"),
        Some(json!({ "amount": 1000, "method": "transferencia" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["note_status"], "pendiente");
    assert_eq!(note["revision"], 2);

    // Paying with a balance needs a method
    let (status, err) = send(&app, "POST", &format!("/api/notes/{id}/pay"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "Selecciona un método de pago");

    let (status, note) = send(
        &app,
        "POST",
        &format!("/api/notes/{id}/pay"),
        Some(json!({ "method": "tarjeta" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["note_status"], "pagado");
    assert_eq!(note["abonos"].as_array().unwrap().len(), 3);
    assert_eq!(note["abonos"][2]["amount"], 5000);

    // Not ready yet
    let (status, err) = send(&app, "POST", &format!("/api/notes/{id}/deliver"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["code"], "NOT_READY_FOR_DELIVERY");

    // Ready and delivered in one combined edit
    let (status, note) = send(
        &app,
        "PUT",
        &format!("/api/notes/{id}"),
        Some(json!({ "cleaning_status": "listo_para_entregar", "note_status": "entregado" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["note_status"], "entregado");
    assert_eq!(note["cleaning_status"], "entregado");
    assert_eq!(note["revision"], 4);

    let names: Vec<String> = state
        .bus
        .recent(100, &TopicFilter::all())
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "noteCreated",
            "statsUpdated",
            "noteUpdated",
            "statsUpdated",
            "noteUpdated",
            "statsUpdated",
            "noteUpdated",
            "statsUpdated",
        ]
    );

    // A client mirror fed from the same events ends on the final revision
    let mut mirror: EntityMirror<Note> = EntityMirror::new();
    for event in state.bus.recent(100, &TopicFilter::entities([EntityKind::Note])) {
        mirror.apply(&event).unwrap();
    }
    assert_eq!(mirror.len(), 1);
    assert_eq!(mirror.get(&id).unwrap().revision, 4);

    // Replaying an old event does not roll it back
    let first = state.bus.recent(100, &TopicFilter::entities([EntityKind::Note]))[0].clone();
    assert_eq!(mirror.apply(&first).unwrap(), PatchOutcome::Stale);
}

#[tokio::test]
async fn stale_revision_conflicts() {
    let (app, _) = test_app(&[]);
    let note = create_note(&app, json!({ "customer_name": "Ana", "total": 500 })).await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/notes/{id}/abonos"),
        Some(json!({ "amount": 100, "method": "efectivo", "expected_revision": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, note) = send(&app, "GET", &format!("/api/notes/{id}"), None).await;
    assert_eq!(note["revision"], 1);
    assert!(note["abonos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn notes_with_abonos_are_cancelled_not_deleted() {
    let (app, state) = test_app(&[]);

    let plain = create_note(&app, json!({ "customer_name": "Ana", "total": 500 })).await;
    let paid = create_note(
        &app,
        json!({ "customer_name": "Luis", "total": 500, "abono": 100, "payment_method": "cash" }),
    )
    .await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/notes/{}", paid["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "NOTE_HAS_PAYMENTS");

    let (status, note) = send(
        &app,
        "POST",
        &format!("/api/notes/{}/cancel", paid["id"].as_str().unwrap()),
        Some(json!({ "reason": "No regresó" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["note_status"], "cancelado");
    assert_eq!(note["cancel_reason"], "No regresó");

    let plain_id = plain["id"].as_str().unwrap();
    let (status, body) = send(&app, "DELETE", &format!("/api/notes/{plain_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let deleted = state
        .bus
        .recent(1, &TopicFilter::entities([EntityKind::Note]))
        .pop()
        .unwrap();
    assert_eq!(deleted.name, "noteDeleted");
    assert_eq!(deleted.payload, json!({ "_id": plain_id }));

    let (status, _) = send(&app, "GET", &format!("/api/notes/{plain_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_input_is_rejected_at_the_boundary() {
    let (app, _) = test_app(&[]);

    let (status, _) = send(&app, "GET", "/api/notes/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({ "customer_name": "Ana", "total": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_TOTAL");

    // Unknown payment method never reaches the ledger
    let (status, _) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({ "customer_name": "Ana", "total": 100, "abono": 10, "payment_method": "bitcoin" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn note_list_filters_and_paginates() {
    let (app, _) = test_app(&[]);
    for i in 1..=5 {
        create_note(&app, json!({ "customer_name": format!("Cliente {i}"), "total": i * 100 })).await;
    }

    let (status, page) = send(
        &app,
        "GET",
        "/api/notes?sort=total&order=asc&per_page=2&page=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["items"][0]["total"], 300);

    let (_, page) = send(&app, "GET", "/api/notes?q=n-00004", None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["customer_name"], "Cliente 4");
}

#[tokio::test]
async fn order_lifecycle_and_stats() {
    let (app, _) = test_app(&[]);

    let (status, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "customer_name": "Pedro",
            "items": [
                { "name": "Detergente", "quantity": 2, "unit_price": 4500 },
                { "name": "Suavizante", "quantity": 1, "unit_price": 3000 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total"], 12000);
    let id = order["id"].as_str().unwrap();

    let (status, order) = send(
        &app,
        "PUT",
        &format!("/api/orders/{id}"),
        Some(json!({ "paid": true, "delivery_status": "dispatched" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["delivery_status"], "dispatched");
    assert_eq!(order["revision"], 2);

    let (status, body) = send(&app, "DELETE", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "PAID_ORDER_NOT_DELETABLE");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/orders/{id}"),
        Some(json!({ "delivery_status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    create_note(
        &app,
        json!({ "customer_name": "Rosa", "total": 1000, "abono": 250, "payment_method": "efectivo" }),
    )
    .await;

    let (status, stats) = send(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["orders"]["dispatched"], 1);
    assert_eq!(stats["order_revenue"], 12000);
    assert_eq!(stats["notes"]["pendiente"], 1);
    assert_eq!(stats["collected"], 250);
    assert_eq!(stats["outstanding"], 750);
}

#[tokio::test]
async fn huge_amounts_keep_stats_and_events_flowing() {
    let (app, state) = test_app(&[]);

    create_note(
        &app,
        json!({ "customer_name": "A", "total": i64::MAX, "abono": i64::MAX, "payment_method": "efectivo" }),
    )
    .await;
    create_note(
        &app,
        json!({ "customer_name": "B", "total": i64::MAX, "abono": 5, "payment_method": "efectivo" }),
    )
    .await;

    let names: Vec<String> = state
        .bus
        .recent(10, &TopicFilter::all())
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(
        names,
        vec!["noteCreated", "statsUpdated", "noteCreated", "statsUpdated"]
    );

    let (status, stats) = send(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["collected"], i64::MAX);
    assert_eq!(stats["outstanding"], i64::MAX - 5);
}

#[tokio::test]
async fn overflowing_order_total_is_rejected() {
    let (app, _) = test_app(&[]);

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "customer_name": "Pedro",
            "items": [{ "name": "Lavadora", "quantity": 3, "unit_price": i64::MAX / 2 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "TOTAL_OVERFLOW");

    let (_, orders) = send(&app, "GET", "/api/orders", None).await;
    assert_eq!(orders["total"], 0);
}

#[tokio::test]
async fn event_history_respects_entity_filter() {
    let (app, _) = test_app(&[]);
    create_note(&app, json!({ "customer_name": "Ana", "total": 100 })).await;

    let (status, events) = send(&app, "GET", "/api/events?entity=note", None).await;
    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "noteCreated");
    assert_eq!(events[0]["sequence"], 1);

    let (status, _) = send(&app, "GET", "/api/events?entity=boat", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stream_delivers_named_events() {
    let (app, _) = test_app(&[]);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/events/stream?entity=note")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let mut frames = resp.into_body().into_data_stream();

    create_note(&app, json!({ "customer_name": "Ana", "total": 100 })).await;

    let frame = tokio::time::timeout(Duration::from_secs(2), frames.next())
        .await
        .expect("no event within timeout")
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.contains("event: noteCreated"), "{text}");
    assert!(text.contains("id: 1"), "{text}");
}
