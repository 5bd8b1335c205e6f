//! Practitioner availability handler.
//!
//! ```text
//! GET /practitioners/{id}/availability?fromDate=2026-03-02&toDate=2026-03-06
//! ```

use actix_web::{HttpRequest, get, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::PractitionerId;
use crate::domain::ports::{AvailabilityRequest, PractitionerAvailability, ThrottleScope};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::throttle::enforce;

/// Query string for availability reads. Dates are practitioner-local.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

#[get("/practitioners/{id}/availability")]
pub async fn get_availability(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<PractitionerId>,
    params: web::Query<AvailabilityParams>,
) -> ApiResult<web::Json<PractitionerAvailability>> {
    enforce(&state, ThrottleScope::General, &request)?;
    let AvailabilityParams { from_date, to_date } = params.into_inner();
    let availability = state
        .availability
        .get_availability(AvailabilityRequest {
            practitioner_id: path.into_inner(),
            from_date,
            to_date,
        })
        .await?;
    Ok(web::Json(availability))
}
