//! Appointment booking and lifecycle handlers.
//!
//! ```text
//! POST  /appointments
//! PATCH /appointments/{id}/cancel
//! PATCH /appointments/{id}/complete
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, patch, post, web};

use crate::domain::ports::{CreateAppointmentRequest, ThrottleScope};
use crate::domain::{Appointment, AppointmentId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::throttle::enforce;

/// Book an appointment. Responds `201 Created` with the stored record.
#[post("/appointments")]
pub async fn create_appointment(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<CreateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    enforce(&state, ThrottleScope::AppointmentWrites, &request)?;
    let appointment = state
        .appointments
        .create_appointment(payload.into_inner())
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/appointments/{}", appointment.id()),
        ))
        .json(appointment))
}

#[patch("/appointments/{id}/cancel")]
pub async fn cancel_appointment(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<AppointmentId>,
) -> ApiResult<web::Json<Appointment>> {
    enforce(&state, ThrottleScope::AppointmentWrites, &request)?;
    let appointment = state.appointments.cancel_appointment(path.into_inner()).await?;
    Ok(web::Json(appointment))
}

#[patch("/appointments/{id}/complete")]
pub async fn complete_appointment(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<AppointmentId>,
) -> ApiResult<web::Json<Appointment>> {
    enforce(&state, ThrottleScope::AppointmentWrites, &request)?;
    let appointment = state
        .appointments
        .complete_appointment(path.into_inner())
        .await?;
    Ok(web::Json(appointment))
}

#[cfg(test)]
#[path = "appointments_tests.rs"]
mod tests;
