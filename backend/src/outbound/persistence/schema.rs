//! Diesel table definitions for the clinic schema.
//!
//! These must match `backend/migrations` exactly; `diesel print-schema`
//! against a migrated database regenerates them.

diesel::table! {
    /// Patients who may hold appointments.
    patients (id) {
        id -> Uuid,
        full_name -> Varchar,
        email -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Practitioners and their working calendars.
    practitioners (id) {
        id -> Uuid,
        full_name -> Varchar,
        specialty -> Nullable<Varchar>,
        is_active -> Bool,
        /// IANA zone identifier; blank means UTC.
        time_zone_id -> Varchar,
        open_time -> Time,
        close_time -> Time,
        lunch_start -> Nullable<Time>,
        lunch_end -> Nullable<Time>,
        slot_minutes -> Int4,
        /// Weekday bit mask, Monday in bit 0.
        working_days -> Int2,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Booked intervals. Scheduled rows of one practitioner never overlap
    /// (`ex_appointments_no_overlap`).
    appointments (id) {
        id -> Uuid,
        patient_id -> Uuid,
        practitioner_id -> Uuid,
        start_utc -> Timestamptz,
        end_utc -> Timestamptz,
        status -> Varchar,
        notes -> Nullable<Varchar>,
        created_at_utc -> Timestamptz,
    }
}

diesel::joinable!(appointments -> patients (patient_id));
diesel::joinable!(appointments -> practitioners (practitioner_id));

diesel::allow_tables_to_appear_in_same_query!(appointments, patients, practitioners);
