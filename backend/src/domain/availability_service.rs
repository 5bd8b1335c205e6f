//! Availability read service.
//!
//! Resolves the practitioner's calendar, fetches scheduled busy ranges for
//! the whole query window in one call and hands both to the pure slot
//! calculator.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::port_errors::{map_directory_error, map_repository_error};
use crate::domain::ports::{
    AppointmentRepository, AvailabilityQuery, AvailabilityRequest, ClinicDirectory,
    PractitionerAvailability,
};
use crate::domain::{Error, LocalDateRange, compute_availability};

/// Domain service implementing the availability query port.
pub struct AvailabilityService<D, R> {
    directory: Arc<D>,
    appointments: Arc<R>,
}

impl<D, R> Clone for AvailabilityService<D, R> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            appointments: Arc::clone(&self.appointments),
        }
    }
}

impl<D, R> AvailabilityService<D, R> {
    pub fn new(directory: Arc<D>, appointments: Arc<R>) -> Self {
        Self {
            directory,
            appointments,
        }
    }
}

#[async_trait]
impl<D, R> AvailabilityQuery for AvailabilityService<D, R>
where
    D: ClinicDirectory,
    R: AppointmentRepository,
{
    async fn get_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<PractitionerAvailability, Error> {
        let range = LocalDateRange::new(request.from_date, request.to_date)
            .map_err(|err| Error::invalid_interval(err.to_string()))?;

        let practitioner = self
            .directory
            .find_practitioner(&request.practitioner_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "practitioner {} not found",
                    request.practitioner_id
                ))
            })?;
        if !practitioner.is_active() {
            return Err(Error::inactive_resource(format!(
                "practitioner {} is not accepting bookings",
                practitioner.id()
            )));
        }
        let calendar = practitioner.calendar();

        let window = calendar
            .query_window(&range)
            .map_err(|err| Error::invalid_interval(err.to_string()))?;
        let busy = self
            .appointments
            .list_scheduled_overlapping(&request.practitioner_id, &window)
            .await
            .map_err(map_repository_error)?;

        let slots = compute_availability(calendar, &range, &busy);
        debug!(
            practitioner_id = %request.practitioner_id,
            %range,
            busy = busy.len(),
            slots = slots.len(),
            "availability computed"
        );

        Ok(PractitionerAvailability {
            practitioner_id: request.practitioner_id,
            window_start: window.start(),
            window_end: window.end(),
            slot_minutes: calendar.slot_minutes(),
            slots,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for availability assembly.

    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockAppointmentRepository, MockClinicDirectory};
    use crate::domain::test_fixtures::{monday_at, practitioner};
    use crate::domain::{BusyRange, ErrorCode, PractitionerId, TimeInterval};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    fn directory(active: bool) -> MockClinicDirectory {
        let mut directory = MockClinicDirectory::new();
        directory
            .expect_find_practitioner()
            .times(1)
            .returning(move |id| Ok(Some(practitioner(*id, active))));
        directory
    }

    #[rstest]
    #[tokio::test]
    async fn queries_busy_ranges_over_whole_window_and_excludes_them() {
        let practitioner_id = PractitionerId::random();
        let mut repo = MockAppointmentRepository::new();
        repo.expect_list_scheduled_overlapping()
            .withf(|_, window| {
                window.start() == monday_at(9, 0) && window.end() == monday_at(17, 0)
            })
            .times(1)
            .return_once(|_, _| {
                Ok(vec![BusyRange::new(
                    TimeInterval::new(monday_at(10, 0), monday_at(10, 30)).expect("interval"),
                )])
            });

        let availability = AvailabilityService::new(Arc::new(directory(true)), Arc::new(repo))
            .get_availability(AvailabilityRequest {
                practitioner_id,
                from_date: monday(),
                to_date: monday(),
            })
            .await
            .expect("availability");

        assert_eq!(availability.practitioner_id, practitioner_id);
        assert_eq!(availability.slot_minutes, 30);
        assert_eq!(availability.window_start, monday_at(9, 0));
        assert_eq!(availability.window_end, monday_at(17, 0));
        assert_eq!(availability.slots.len(), 13);
        assert!(
            availability
                .slots
                .iter()
                .all(|slot| slot.start() != monday_at(10, 0))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn inactive_practitioner_is_rejected() {
        let mut repo = MockAppointmentRepository::new();
        repo.expect_list_scheduled_overlapping().times(0);

        let err = AvailabilityService::new(Arc::new(directory(false)), Arc::new(repo))
            .get_availability(AvailabilityRequest {
                practitioner_id: PractitionerId::random(),
                from_date: monday(),
                to_date: monday(),
            })
            .await
            .expect_err("inactive practitioner");

        assert_eq!(err.code(), ErrorCode::InactiveResource);
    }

    #[rstest]
    #[tokio::test]
    async fn inverted_date_range_is_invalid_interval() {
        let mut directory = MockClinicDirectory::new();
        directory.expect_find_practitioner().times(0);

        let err = AvailabilityService::new(
            Arc::new(directory),
            Arc::new(MockAppointmentRepository::new()),
        )
        .get_availability(AvailabilityRequest {
            practitioner_id: PractitionerId::random(),
            from_date: monday(),
            to_date: monday().pred_opt().expect("previous day"),
        })
        .await
        .expect_err("inverted range");

        assert_eq!(err.code(), ErrorCode::InvalidInterval);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_practitioner_is_not_found() {
        let mut directory = MockClinicDirectory::new();
        directory
            .expect_find_practitioner()
            .times(1)
            .return_once(|_| Ok(None));

        let err = AvailabilityService::new(
            Arc::new(directory),
            Arc::new(MockAppointmentRepository::new()),
        )
        .get_availability(AvailabilityRequest {
            practitioner_id: PractitionerId::random(),
            from_date: monday(),
            to_date: monday(),
        })
        .await
        .expect_err("missing practitioner");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
