use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::store::Entity;

use super::{new_id, str_field};

const SESSION_MINUTES: i64 = 50;
const DEFAULT_AMOUNT_CENTS: i64 = 1700;
const DEFAULT_CURRENCY: &str = "EUR";

struct BookingInput<'a> {
    psychologist_id: &'a str,
    scheduled_at: &'a str,
    package_code: &'a str,
}

fn booking_input(body: &Value) -> Result<BookingInput<'_>, ApiError> {
    match (
        str_field(body, "psychologistId"),
        str_field(body, "scheduledAt"),
        str_field(body, "packageCode"),
    ) {
        (Some(psychologist_id), Some(scheduled_at), Some(package_code)) => Ok(BookingInput {
            psychologist_id,
            scheduled_at,
            package_code,
        }),
        _ => Err(ApiError::validation("Dados incompletos")),
    }
}

fn appointment_record(user_id: &str, input: &BookingInput<'_>, status: &str) -> (String, Value) {
    let id = new_id();
    let record = json!({
        "id": id,
        "user_id": user_id,
        "psychologist_id": input.psychologist_id,
        "scheduled_at": input.scheduled_at,
        "duration_minutes": SESSION_MINUTES,
        "status": status,
        "package_code": input.package_code,
    });
    (id, record)
}

/// POST /api/appointments - book an unpaid slot. No overlap detection.
pub async fn create_appointment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let input = booking_input(&body)?;
    let store = state.adapter.ready().await?;
    let (id, record) = appointment_record(&user.claims.user_id, &input, "scheduled");
    store
        .insert(
            Entity::Appointments,
            record.as_object().cloned().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({"ok": true, "appointmentId": id})))
}

/// POST /api/checkout - book and pay in one call. Two independent writes;
/// a crash between them leaves a paid appointment without a payment row.
pub async fn checkout(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let input = booking_input(&body)?;
    let store = state.adapter.ready().await?;

    let (appointment_id, record) = appointment_record(&user.claims.user_id, &input, "paid");
    store
        .insert(
            Entity::Appointments,
            record.as_object().cloned().unwrap_or_default(),
        )
        .await?;

    let amount_cents = body
        .get("amountCents")
        .and_then(Value::as_i64)
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_AMOUNT_CENTS);
    let currency = str_field(&body, "currency").unwrap_or(DEFAULT_CURRENCY);

    let payment_id = new_id();
    let payment = json!({
        "id": payment_id,
        "appointment_id": appointment_id,
        "user_id": user.claims.user_id,
        "amount_cents": amount_cents,
        "currency": currency,
        "status": "paid",
        "provider": "card",
    });
    store
        .insert(
            Entity::Payments,
            payment.as_object().cloned().unwrap_or_default(),
        )
        .await?;

    Ok(Json(
        json!({"ok": true, "appointmentId": appointment_id, "paymentId": payment_id}),
    ))
}

/// GET /api/appointments - the caller's bookings, newest first
pub async fn list_appointments(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let rows = store
        .list_where(
            Entity::Appointments,
            "user_id",
            &Value::String(user.claims.user_id.clone()),
            Entity::Appointments.default_order(),
        )
        .await?;
    Ok(Json(Value::Array(
        rows.into_iter().map(Value::Object).collect(),
    )))
}
