//! Strongly typed identifiers for booking aggregates.
//!
//! Each identifier wraps a UUID so a patient id can never be passed where a
//! practitioner id is expected. Serialised form is the plain UUID string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id! {
    /// Identifier of a patient.
    PatientId
}

define_id! {
    /// Identifier of a practitioner.
    PractitionerId
}

define_id! {
    /// Identifier of an appointment.
    AppointmentId
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parses_and_displays_uuid() {
        let raw = "3f0c8a9e-8f5e-4a7b-9c51-1d2f6e0b4c11";
        let id: AppointmentId = raw.parse().expect("valid uuid");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    fn rejects_non_uuid_input() {
        assert!("not-a-uuid".parse::<PatientId>().is_err());
    }

    #[rstest]
    fn serialises_transparently() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_value(PractitionerId::from_uuid(uuid)).expect("json");
        assert_eq!(json, serde_json::Value::String(uuid.to_string()));
    }
}
