//! End-to-end booking behaviour over the in-memory clinic store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clinic_backend::domain::ports::{
    AppointmentCommand, AvailabilityQuery, AvailabilityRequest, CreateAppointmentRequest,
};
use clinic_backend::domain::{
    AppointmentService, AppointmentStatus, AvailabilityService, ErrorCode, Patient, PatientId,
    Practitioner, PractitionerId, TimeZonePolicy, WorkingCalendar, WorkingCalendarDraft,
};
use clinic_backend::outbound::memory::InMemoryClinicStore;
use futures::future::join_all;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .expect("valid instant")
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

struct Clinic {
    commands: Arc<dyn AppointmentCommand>,
    availability: Arc<dyn AvailabilityQuery>,
    patient_id: PatientId,
    practitioner_id: PractitionerId,
}

impl Clinic {
    fn booking(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            patient_id: self.patient_id,
            practitioner_id: self.practitioner_id,
            start_utc: start,
            end_utc: end,
            notes: None,
        }
    }

    async fn free_slots_on_monday(&self) -> Vec<DateTime<Utc>> {
        self.availability
            .get_availability(AvailabilityRequest {
                practitioner_id: self.practitioner_id,
                from_date: monday(),
                to_date: monday(),
            })
            .await
            .expect("availability")
            .slots
            .iter()
            .map(|slot| slot.start())
            .collect()
    }
}

fn clinic_with(draft: WorkingCalendarDraft) -> Clinic {
    let store = Arc::new(InMemoryClinicStore::new());
    let patient_id = PatientId::random();
    let practitioner_id = PractitionerId::random();
    store
        .add_patient(Patient::new(patient_id, "Noor Haddad", None, None))
        .expect("add patient");
    let calendar = WorkingCalendar::new(draft, TimeZonePolicy::Strict).expect("calendar");
    store
        .add_practitioner(Practitioner::new(
            practitioner_id,
            "Dr. Lena Ortiz",
            None,
            true,
            calendar,
        ))
        .expect("add practitioner");

    Clinic {
        commands: Arc::new(AppointmentService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(DefaultClock),
        )),
        availability: Arc::new(AvailabilityService::new(Arc::clone(&store), store)),
        patient_id,
        practitioner_id,
    }
}

#[fixture]
fn clinic() -> Clinic {
    clinic_with(WorkingCalendarDraft::clinic_default())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_overlapping_bookings_admit_exactly_one(clinic: Clinic) {
    // Every request covers 10:21-10:30, so each pair overlaps.
    let attempts = (0..8u32).map(|k| {
        let commands = Arc::clone(&clinic.commands);
        let request = clinic.booking(monday_at(10, 3 * k), monday_at(10, 3 * k + 30));
        tokio::spawn(async move { commands.create_appointment(request).await })
    });

    let outcomes: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let booked = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(booked, 1);
    assert!(
        outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .all(|err| err.code() == ErrorCode::Conflict)
    );
}

#[rstest]
#[tokio::test]
async fn booking_cancelling_and_completing(clinic: Clinic) {
    assert_eq!(clinic.free_slots_on_monday().await.len(), 14);

    let booked = clinic
        .commands
        .create_appointment(clinic.booking(monday_at(10, 0), monday_at(10, 30)))
        .await
        .expect("first booking");
    let free = clinic.free_slots_on_monday().await;
    assert_eq!(free.len(), 13);
    assert!(!free.contains(&monday_at(10, 0)));

    let clash = clinic
        .commands
        .create_appointment(clinic.booking(monday_at(10, 15), monday_at(10, 45)))
        .await
        .expect_err("overlapping booking");
    assert_eq!(clash.code(), ErrorCode::Conflict);

    let adjacent = clinic
        .commands
        .create_appointment(clinic.booking(monday_at(10, 30), monday_at(11, 0)))
        .await
        .expect("adjacent booking");

    let cancelled = clinic
        .commands
        .cancel_appointment(booked.id())
        .await
        .expect("cancel");
    assert_eq!(cancelled.status(), AppointmentStatus::Cancelled);
    let again = clinic
        .commands
        .cancel_appointment(booked.id())
        .await
        .expect("second cancel is idempotent");
    assert_eq!(again, cancelled);

    let free = clinic.free_slots_on_monday().await;
    assert!(free.contains(&monday_at(10, 0)));
    assert!(!free.contains(&monday_at(10, 30)));

    let not_after_cancel = clinic
        .commands
        .complete_appointment(booked.id())
        .await
        .expect_err("cancelled appointments stay cancelled");
    assert_eq!(not_after_cancel.code(), ErrorCode::InvalidTransition);

    let completed = clinic
        .commands
        .complete_appointment(adjacent.id())
        .await
        .expect("complete");
    assert_eq!(completed.status(), AppointmentStatus::Completed);
    assert!(clinic.free_slots_on_monday().await.contains(&monday_at(10, 30)));
}

#[rstest]
#[tokio::test]
async fn rebooking_a_cancelled_interval_succeeds(clinic: Clinic) {
    let first = clinic
        .commands
        .create_appointment(clinic.booking(monday_at(14, 0), monday_at(14, 30)))
        .await
        .expect("booking");
    clinic
        .commands
        .cancel_appointment(first.id())
        .await
        .expect("cancel");

    let second = clinic
        .commands
        .create_appointment(clinic.booking(monday_at(14, 0), monday_at(14, 30)))
        .await
        .expect("cancelled intervals are free again");
    assert_ne!(second.id(), first.id());
}

#[rstest]
#[tokio::test]
async fn bookings_at_the_edge_of_a_late_lunch_are_never_offered() {
    let clinic = clinic_with(WorkingCalendarDraft {
        lunch_break: Some((
            NaiveTime::from_hms_opt(16, 0, 0).expect("valid time"),
            NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        )),
        ..WorkingCalendarDraft::clinic_default()
    });
    clinic
        .commands
        .create_appointment(clinic.booking(monday_at(9, 0), monday_at(9, 30)))
        .await
        .expect("opening booking");
    clinic
        .commands
        .create_appointment(clinic.booking(monday_at(15, 30), monday_at(16, 0)))
        .await
        .expect("pre-lunch booking");

    let free = clinic.free_slots_on_monday().await;

    assert_eq!(free.len(), 12);
    assert!(!free.contains(&monday_at(9, 0)));
    assert!(!free.contains(&monday_at(15, 30)));
    assert!(free.iter().all(|start| *start < monday_at(16, 0)));
}
