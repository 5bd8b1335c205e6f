//! Regression coverage for appointment creation and status transitions.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    AppointmentRepositoryError, MockAppointmentRepository, MockClinicDirectory,
};
use crate::domain::test_fixtures::{
    appointment, booking_request, fixture_clock, monday_at, patient, practitioner,
};
use crate::domain::{ErrorCode, PatientId, PractitionerId};

fn service(
    directory: MockClinicDirectory,
    repo: MockAppointmentRepository,
) -> AppointmentService<MockClinicDirectory, MockAppointmentRepository> {
    AppointmentService::new(Arc::new(directory), Arc::new(repo), fixture_clock())
}

fn open_directory() -> MockClinicDirectory {
    let mut directory = MockClinicDirectory::new();
    directory
        .expect_find_patient()
        .returning(|id| Ok(Some(patient(*id))));
    directory
        .expect_find_practitioner()
        .returning(|id| Ok(Some(practitioner(*id, true))));
    directory
}

fn stored(status: AppointmentStatus) -> Appointment {
    appointment(
        PractitionerId::random(),
        monday_at(10, 0),
        monday_at(10, 30),
        status,
    )
}

#[rstest]
#[tokio::test]
async fn create_persists_scheduled_appointment_stamped_by_clock() {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_list_scheduled_overlapping()
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    repo.expect_insert()
        .withf(|appointment| appointment.status() == AppointmentStatus::Scheduled)
        .times(1)
        .return_once(|_| Ok(()));

    let mut request = booking_request(
        PatientId::random(),
        PractitionerId::random(),
        monday_at(10, 30),
        monday_at(11, 0),
    );
    request.notes = Some("follow-up".to_owned());

    let created = service(open_directory(), repo)
        .create_appointment(request.clone())
        .await
        .expect("booking succeeds");

    assert_eq!(created.patient_id(), request.patient_id);
    assert_eq!(created.practitioner_id(), request.practitioner_id);
    assert_eq!(created.start_utc(), monday_at(10, 30));
    assert_eq!(created.notes(), Some("follow-up"));
    assert_eq!(created.created_at_utc(), monday_at(7, 45));
}

#[rstest]
#[tokio::test]
async fn create_does_not_insert_after_pre_check_conflict() {
    let practitioner_id = PractitionerId::random();
    let existing = stored(AppointmentStatus::Scheduled);
    let mut repo = MockAppointmentRepository::new();
    repo.expect_list_scheduled_overlapping()
        .times(1)
        .return_once(move |_, _| Ok(existing.busy_range().into_iter().collect()));
    repo.expect_insert().times(0);

    let err = service(open_directory(), repo)
        .create_appointment(booking_request(
            PatientId::random(),
            practitioner_id,
            monday_at(10, 15),
            monday_at(10, 45),
        ))
        .await
        .expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_reports_store_overlap_as_conflict() {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_list_scheduled_overlapping()
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(AppointmentRepositoryError::overlap("lost the race")));

    let err = service(open_directory(), repo)
        .create_appointment(booking_request(
            PatientId::random(),
            PractitionerId::random(),
            monday_at(10, 0),
            monday_at(10, 30),
        ))
        .await
        .expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn cancel_scheduled_writes_cancelled_status() {
    let current = stored(AppointmentStatus::Scheduled);
    let id = current.id();
    let cancelled = current.clone().with_status(AppointmentStatus::Cancelled);

    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(current)));
    repo.expect_update_status()
        .withf(move |target, expected, next| {
            *target == id
                && *expected == AppointmentStatus::Scheduled
                && *next == AppointmentStatus::Cancelled
        })
        .times(1)
        .return_once(move |_, _, _| Ok(Some(cancelled)));

    let result = service(MockClinicDirectory::new(), repo)
        .cancel_appointment(id)
        .await
        .expect("cancel succeeds");

    assert_eq!(result.status(), AppointmentStatus::Cancelled);
}

#[rstest]
#[tokio::test]
async fn cancel_is_idempotent_without_writing() {
    let current = stored(AppointmentStatus::Cancelled);
    let id = current.id();
    let expected = current.clone();

    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(Some(current.clone())));
    repo.expect_update_status().times(0);
    let service = service(MockClinicDirectory::new(), repo);

    let first = service.cancel_appointment(id).await.expect("first cancel");
    let second = service.cancel_appointment(id).await.expect("second cancel");

    assert_eq!(first, expected);
    assert_eq!(second, expected);
}

#[rstest]
#[case(AppointmentStatus::Completed, LifecycleAction::Cancel)]
#[case(AppointmentStatus::Cancelled, LifecycleAction::Complete)]
#[tokio::test]
async fn crossing_terminal_states_is_invalid_transition(
    #[case] status: AppointmentStatus,
    #[case] action: LifecycleAction,
) {
    let current = stored(status);
    let id = current.id();
    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(current)));
    repo.expect_update_status().times(0);
    let service = service(MockClinicDirectory::new(), repo);

    let err = match action {
        LifecycleAction::Cancel => service.cancel_appointment(id).await,
        LifecycleAction::Complete => service.complete_appointment(id).await,
    }
    .expect_err("refused");

    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[rstest]
#[tokio::test]
async fn unknown_appointment_is_not_found() {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let err = service(MockClinicDirectory::new(), repo)
        .complete_appointment(AppointmentId::random())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn lost_update_re_reads_and_returns_winner_when_equivalent() {
    let current = stored(AppointmentStatus::Scheduled);
    let id = current.id();
    let winner = current.clone().with_status(AppointmentStatus::Cancelled);
    let mut reads = vec![winner, current];

    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(reads.pop()));
    repo.expect_update_status()
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let result = service(MockClinicDirectory::new(), repo)
        .cancel_appointment(id)
        .await
        .expect("concurrent cancel is idempotent");

    assert_eq!(result.status(), AppointmentStatus::Cancelled);
}

#[rstest]
#[tokio::test]
async fn lost_update_to_other_terminal_state_is_invalid_transition() {
    let current = stored(AppointmentStatus::Scheduled);
    let id = current.id();
    let winner = current.clone().with_status(AppointmentStatus::Completed);
    let mut reads = vec![winner, current];

    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(reads.pop()));
    repo.expect_update_status()
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let err = service(MockClinicDirectory::new(), repo)
        .cancel_appointment(id)
        .await
        .expect_err("completed first");

    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_service_unavailable() {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Err(AppointmentRepositoryError::connection("timeout")));

    let err = service(MockClinicDirectory::new(), repo)
        .cancel_appointment(AppointmentId::random())
        .await
        .expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
