//! End-to-end API tests against an in-memory SQLite database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use caja_server::api;
use caja_server::db;
use caja_server::state::AppState;

async fn test_app() -> Router {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::migrate(&pool).await.expect("schema");
    api::create_router(AppState { pool })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_prof(app: &Router, nombre: &str, categoria: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/profesionales",
        Some(json!({"nombre": nombre, "categoria": categoria})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create {nombre}: {body}");
    body
}

async fn save_entries(app: &Router, entries: Value) {
    let (status, body) = send(
        app,
        "POST",
        "/guardar-caja",
        Some(json!({"entries": entries})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "guardar-caja: {body}");
}

#[tokio::test]
async fn health_check_responds() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_and_list_profesionales() {
    let app = test_app().await;

    let created = create_prof(&app, "Dr. A", "ORL").await;
    assert_eq!(created["status"], "success");
    assert_eq!(created["nombre"], "Dr. A");

    // categoria defaults to ORL when omitted
    let (status, _) = send(&app, "POST", "/profesionales", Some(json!({"nombre": "Dr. B"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/profesionales", None).await;
    assert_eq!(status, StatusCode::OK);
    let profs = body.as_array().unwrap();
    assert_eq!(profs.len(), 2);
    assert_eq!(profs[0]["nombre"], "Dr. A");
    assert_eq!(profs[1]["categoria"], "ORL");
}

#[tokio::test]
async fn duplicate_profesional_name_rejected() {
    let app = test_app().await;
    create_prof(&app, "Dr. A", "ORL").await;

    let (status, body) = send(
        &app,
        "POST",
        "/profesionales",
        Some(json!({"nombre": "Dr. A"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn profesional_without_name_rejected() {
    let app = test_app().await;
    let (status, body) = send(&app, "POST", "/profesionales", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn delete_profesional_keeps_history_with_null_slot() {
    let app = test_app().await;
    let created = create_prof(&app, "Dr. A", "ORL").await;
    let id = created["id"].as_i64().unwrap();

    save_entries(
        &app,
        json!([{
            "fecha": "2025-01-10",
            "paciente": "Paciente X",
            "prof_1": "Dr. A",
            "liq_prof_1": 100.0
        }]),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/profesionales/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    // Row survives, slot resolves to empty name.
    let (status, body) = send(&app, "GET", "/caja", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["paciente"], "Paciente X");
    assert_eq!(rows[0]["prof_1"], "");

    // The professional no longer resolves for reports.
    let (status, _) = send(&app, "GET", "/liquidacion/Dr.%20A", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_profesional_is_404() {
    let app = test_app().await;
    let (status, body) = send(&app, "DELETE", "/profesionales/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn report_buckets_totals_by_currency() {
    let app = test_app().await;
    create_prof(&app, "Dr. A", "ORL").await;

    save_entries(
        &app,
        json!([
            {
                "fecha": "2025-01-10",
                "paciente": "P1",
                "prof_1": "Dr. A",
                "liq_prof_1": 100.0,
                "liq_prof_1_currency": "ARS"
            },
            {
                "fecha": "2025-01-11",
                "paciente": "P2",
                "prof_2": "Dr. A",
                "liq_prof_2": 50.0,
                "liq_prof_2_currency": "USD"
            }
        ]),
    )
    .await;

    let (status, body) = send(&app, "GET", "/liquidacion/Dr.%20A?role=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profesional"], "Dr. A");
    assert_eq!(body["categoria"], "ORL");
    assert_eq!(body["totales"]["liq_pesos"], 100.0);
    assert_eq!(body["totales"]["liq_dolares"], 50.0);

    // Rows ascending by date, rendered day-first.
    let entradas = body["entradas"].as_array().unwrap();
    assert_eq!(entradas.len(), 2);
    assert_eq!(entradas[0]["fecha"], "10/01/2025");
    assert_eq!(entradas[0]["liq_amount"], 100.0);
    assert_eq!(entradas[1]["liq_currency"], "USD");
}

#[tokio::test]
async fn report_counts_only_first_matching_slot() {
    let app = test_app().await;
    create_prof(&app, "Dr. A", "ORL").await;

    // Same professional in slot 1 and as anesthetist on one row.
    save_entries(
        &app,
        json!([{
            "fecha": "2025-01-10",
            "paciente": "P1",
            "prof_1": "Dr. A",
            "liq_prof_1": 100.0,
            "anestesista": "Dr. A",
            "liq_anestesista": 999.0,
            "liq_anestesista_currency": "USD"
        }]),
    )
    .await;

    let (_, body) = send(&app, "GET", "/liquidacion/Dr.%20A", None).await;
    assert_eq!(body["totales"]["liq_pesos"], 100.0);
    assert_eq!(body["totales"]["liq_dolares"], 0.0);
}

#[tokio::test]
async fn report_respects_date_bounds() {
    let app = test_app().await;
    create_prof(&app, "Dr. A", "ORL").await;

    save_entries(
        &app,
        json!([
            {"fecha": "2025-01-05", "paciente": "P1", "prof_1": "Dr. A", "liq_prof_1": 10.0},
            {"fecha": "2025-01-15", "paciente": "P2", "prof_1": "Dr. A", "liq_prof_1": 20.0},
            {"fecha": "2025-01-25", "paciente": "P3", "prof_1": "Dr. A", "liq_prof_1": 40.0}
        ]),
    )
    .await;

    let (_, body) = send(
        &app,
        "GET",
        "/liquidacion/Dr.%20A?start_date=2025-01-10&end_date=2025-01-20",
        None,
    )
    .await;
    assert_eq!(body["totales"]["liq_pesos"], 20.0);

    // Either bound alone is honored (inclusive).
    let (_, body) = send(&app, "GET", "/liquidacion/Dr.%20A?start_date=2025-01-15", None).await;
    assert_eq!(body["totales"]["liq_pesos"], 60.0);
}

#[tokio::test]
async fn unresolved_slot_names_are_saved_as_null() {
    let app = test_app().await;

    save_entries(
        &app,
        json!([{
            "fecha": "2025-01-10",
            "paciente": "P1",
            "prof_1": "Nadie Conocido",
            "liq_prof_1": 100.0
        }]),
    )
    .await;

    let (_, body) = send(&app, "GET", "/caja", None).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows[0]["prof_1"], "");
    assert_eq!(rows[0]["liq_prof_1"], 100.0);
}

#[tokio::test]
async fn batch_with_bad_date_rolls_back_entirely() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/guardar-caja",
        Some(json!({"entries": [
            {"fecha": "2025-01-10", "paciente": "ok"},
            {"fecha": "no-es-fecha", "paciente": "mala"}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    // Nothing persisted, not even the valid first entry.
    let (_, body) = send(&app, "GET", "/caja", None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn manual_settlement_rows_hidden_unless_requested() {
    let app = test_app().await;

    save_entries(
        &app,
        json!([
            {"fecha": "2025-01-10", "paciente": "Normal"},
            {"fecha": "2025-01-10", "paciente": "Otro", "comentario": "Liquidación Manual"},
            {"fecha": "2025-01-10", "paciente": "Juan (Liq. Manual)"}
        ]),
    )
    .await;

    let (_, body) = send(&app, "GET", "/caja", None).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["paciente"], "Normal");

    let (_, body) = send(&app, "GET", "/caja?include_manual=1", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn listing_sorts_most_recent_first() {
    let app = test_app().await;

    save_entries(
        &app,
        json!([
            {"fecha": "2025-01-10", "paciente": "A"},
            {"fecha": "2025-01-20", "paciente": "B"},
            {"fecha": "2025-01-20", "paciente": "C"}
        ]),
    )
    .await;

    let (_, body) = send(&app, "GET", "/caja", None).await;
    let rows = body.as_array().unwrap();
    // Date desc, then id desc within the same date.
    assert_eq!(rows[0]["paciente"], "C");
    assert_eq!(rows[1]["paciente"], "B");
    assert_eq!(rows[2]["paciente"], "A");
}

#[tokio::test]
async fn exact_date_filter_takes_precedence_over_range() {
    let app = test_app().await;

    save_entries(
        &app,
        json!([
            {"fecha": "2025-01-10", "paciente": "A"},
            {"fecha": "2025-01-20", "paciente": "B"}
        ]),
    )
    .await;

    let (_, body) = send(
        &app,
        "GET",
        "/caja?date=2025-01-10&start_date=2025-01-01&end_date=2025-01-31",
        None,
    )
    .await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["paciente"], "A");
}

#[tokio::test]
async fn partial_update_touches_only_sent_fields() {
    let app = test_app().await;
    create_prof(&app, "Dr. A", "ORL").await;

    save_entries(
        &app,
        json!([{
            "fecha": "2025-01-10",
            "paciente": "P1",
            "dni": "123",
            "prof_1": "Dr. A",
            "pesos": 500.0,
            "liq_prof_1": 100.0,
            "coat_pesos": 30.0
        }]),
    )
    .await;
    let (_, body) = send(&app, "GET", "/caja", None).await;
    let id = body[0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/caja/{id}"),
        Some(json!({"comentario": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/caja", None).await;
    let row = &body[0];
    assert_eq!(row["comentario"], "x");
    assert_eq!(row["fecha"], "2025-01-10");
    assert_eq!(row["paciente"], "P1");
    assert_eq!(row["dni"], "123");
    assert_eq!(row["prof_1"], "Dr. A");
    assert_eq!(row["pesos"], 500.0);
    assert_eq!(row["liq_prof_1"], 100.0);
    assert_eq!(row["coat_pesos"], 30.0);
}

#[tokio::test]
async fn update_slot_name_resolution_semantics() {
    let app = test_app().await;
    create_prof(&app, "Dr. A", "ORL").await;
    create_prof(&app, "Dr. B", "Anestesista").await;

    save_entries(
        &app,
        json!([{"fecha": "2025-01-10", "paciente": "P1", "prof_1": "Dr. A"}]),
    )
    .await;
    let (_, body) = send(&app, "GET", "/caja", None).await;
    let id = body[0]["id"].as_i64().unwrap();

    // Unresolvable name: slot silently left unchanged.
    send(
        &app,
        "PUT",
        &format!("/caja/{id}"),
        Some(json!({"prof_1": "Desconocido"})),
    )
    .await;
    let (_, body) = send(&app, "GET", "/caja", None).await;
    assert_eq!(body[0]["prof_1"], "Dr. A");

    // Known name: slot reassigned.
    send(
        &app,
        "PUT",
        &format!("/caja/{id}"),
        Some(json!({"prof_1": "Dr. B"})),
    )
    .await;
    let (_, body) = send(&app, "GET", "/caja", None).await;
    assert_eq!(body[0]["prof_1"], "Dr. B");

    // Null clears the slot.
    send(
        &app,
        "PUT",
        &format!("/caja/{id}"),
        Some(json!({"prof_1": null})),
    )
    .await;
    let (_, body) = send(&app, "GET", "/caja", None).await;
    assert_eq!(body[0]["prof_1"], "");
}

#[tokio::test]
async fn update_and_delete_unknown_entry_are_404() {
    let app = test_app().await;

    let (status, _) = send(&app, "PUT", "/caja/42", Some(json!({"comentario": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/caja/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn delete_single_entry() {
    let app = test_app().await;
    save_entries(&app, json!([{"fecha": "2025-01-10", "paciente": "P1"}])).await;
    let (_, body) = send(&app, "GET", "/caja", None).await;
    let id = body[0]["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/caja/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/caja", None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn delete_day_removes_entries_and_comment() {
    let app = test_app().await;

    save_entries(
        &app,
        json!([
            {"fecha": "2025-01-01", "paciente": "A"},
            {"fecha": "2025-01-01", "paciente": "B"},
            {"fecha": "2025-01-02", "paciente": "C"}
        ]),
    )
    .await;
    send(
        &app,
        "POST",
        "/daily-comment",
        Some(json!({"date": "2025-01-01", "comment": "día ocupado"})),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/caja/dia/2025-01-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Día eliminado (2 entradas)");

    let (_, body) = send(&app, "GET", "/caja?date=2025-01-01", None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (_, body) = send(&app, "GET", "/daily-comment/2025-01-01", None).await;
    assert_eq!(body["comment"], "");

    // The other day is untouched.
    let (_, body) = send(&app, "GET", "/caja?date=2025-01-02", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_day_with_invalid_date_is_400() {
    let app = test_app().await;
    let (status, body) = send(&app, "DELETE", "/caja/dia/not-a-date", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn pin_defaults_and_round_trips() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/config/pin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pin"], "1234");

    let (status, _) = send(&app, "POST", "/config/pin", Some(json!({"pin": "9876"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/config/pin", None).await;
    assert_eq!(body["pin"], "9876");

    let (status, _) = send(&app, "POST", "/config/pin", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn daily_comment_upserts_by_date() {
    let app = test_app().await;

    let (_, body) = send(&app, "GET", "/daily-comment/2025-03-01", None).await;
    assert_eq!(body["comment"], "");

    send(
        &app,
        "POST",
        "/daily-comment",
        Some(json!({"date": "2025-03-01", "comment": "primero"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/daily-comment",
        Some(json!({"date": "2025-03-01", "comment": "segundo"})),
    )
    .await;

    let (_, body) = send(&app, "GET", "/daily-comment/2025-03-01", None).await;
    assert_eq!(body["comment"], "segundo");

    let (status, body) = send(
        &app,
        "POST",
        "/daily-comment",
        Some(json!({"comment": "sin fecha"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Falta fecha");
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/profesionales")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
}
