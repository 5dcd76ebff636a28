//! Data models for the AgriSense backend.
//!
//! Request payloads arrive with every field optional so each route can apply
//! its own presence policy before anything touches the database:
//! - sensor and irrigation writes reject only absent fields (a zero value or
//!   an empty string is real data from the field),
//! - profile, device-binding, and alert writes also reject empty strings.
//!
//! `validate()` collapses a payload into its complete, insertable form.
//! `None` means at least one required field failed that route's policy and
//! the request must be rejected before any query runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---

/// One stored sensor measurement, as served by `GET /api/readings`.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    pub temperature: f64,
    pub humidity: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub humidity_air: f64,
    pub created_at: DateTime<Utc>,
    pub device_id: String,
}

/// Raw `POST /api/receive-data` body.
#[derive(Debug, Deserialize)]
pub struct ReadingPayload {
    // ---
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub humidity_air: Option<f64>,
    pub device_id: Option<String>,
}

impl ReadingPayload {
    /// All eight fields must be present. Zeros and empty strings pass; the
    /// sensors legitimately report them.
    pub fn validate(self) -> Option<Reading> {
        // ---
        Some(Reading {
            temperature: self.temperature?,
            humidity: self.humidity?,
            nitrogen: self.nitrogen?,
            phosphorus: self.phosphorus?,
            potassium: self.potassium?,
            humidity_air: self.humidity_air?,
            created_at: self.created_at?,
            device_id: self.device_id?,
        })
    }
}

// ---

/// A user's binding of an email to one device, with contact details and the
/// device's access key. Stored in and read back from the `profiles` relation.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Profile {
    // ---
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub device_id: String,
    pub device_key: String,
}

/// Raw `POST /api/profile` body. The mobile client sends the device field as
/// `device_ID`; that spelling is part of the wire contract.
#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    // ---
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(rename = "device_ID")]
    pub device_id: Option<String>,
    pub device_key: Option<String>,
}

impl ProfilePayload {
    /// All five fields must be present and non-empty.
    pub fn validate(self) -> Option<Profile> {
        // ---
        Some(Profile {
            email: non_empty(self.email)?,
            first_name: non_empty(self.first_name)?,
            last_name: non_empty(self.last_name)?,
            device_id: non_empty(self.device_id)?,
            device_key: non_empty(self.device_key)?,
        })
    }
}

/// Raw `POST /api/add-device` body. Same `device_ID` wire spelling as the
/// profile route.
#[derive(Debug, Deserialize)]
pub struct AddDevicePayload {
    // ---
    pub email: Option<String>,
    #[serde(rename = "device_ID")]
    pub device_id: Option<String>,
}

/// A validated email-to-device association, without profile details.
#[derive(Debug)]
pub struct DeviceBinding {
    // ---
    pub email: String,
    pub device_id: String,
}

impl AddDevicePayload {
    /// Both fields must be present and non-empty.
    pub fn validate(self) -> Option<DeviceBinding> {
        // ---
        Some(DeviceBinding {
            email: non_empty(self.email)?,
            device_id: non_empty(self.device_id)?,
        })
    }
}

// ---

/// One alert row as served by `GET /api/alerts`. The device id is used only
/// for filtering and is not echoed back.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Alert {
    // ---
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Raw `POST /api/alerts` body.
#[derive(Debug, Deserialize)]
pub struct AlertPayload {
    // ---
    pub created_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub device_id: Option<String>,
}

/// A validated alert ready for insertion.
#[derive(Debug)]
pub struct NewAlert {
    // ---
    pub created_at: DateTime<Utc>,
    pub message: String,
    pub device_id: String,
}

impl AlertPayload {
    /// Timestamp must be present; message and device id must be non-empty.
    pub fn validate(self) -> Option<NewAlert> {
        // ---
        Some(NewAlert {
            created_at: self.created_at?,
            message: non_empty(self.message)?,
            device_id: non_empty(self.device_id)?,
        })
    }
}

// ---

/// One dispenser/water event, both the insert form and the row shape served
/// by `GET /api/irrigation`.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct IrrigationEvent {
    // ---
    pub device_id: String,
    pub water: f64,
    pub dispenser1: f64,
    pub dispenser2: f64,
    pub dispenser3: f64,
    pub dispenser4: f64,
    pub dispenser5: f64,
    pub created_at: DateTime<Utc>,
}

/// Raw `POST /api/irrigation` body.
#[derive(Debug, Deserialize)]
pub struct IrrigationPayload {
    // ---
    pub device_id: Option<String>,
    pub water: Option<f64>,
    pub dispenser1: Option<f64>,
    pub dispenser2: Option<f64>,
    pub dispenser3: Option<f64>,
    pub dispenser4: Option<f64>,
    pub dispenser5: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl IrrigationPayload {
    /// Device id, water, and each dispenser value are checked individually
    /// for presence; a dispenser that reports 0 is an idle dispenser, not a
    /// missing field. The timestamp defaults to now when omitted.
    pub fn validate(self) -> Option<IrrigationEvent> {
        // ---
        Some(IrrigationEvent {
            device_id: self.device_id?,
            water: self.water?,
            dispenser1: self.dispenser1?,
            dispenser2: self.dispenser2?,
            dispenser3: self.dispenser3?,
            dispenser4: self.dispenser4?,
            dispenser5: self.dispenser5?,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

// ---

/// JS-style truthiness for string fields: absent and empty both fail.
/// Shared by payload validation and the route layer's query parameters so
/// the policy lives in one place.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn full_reading_payload() -> ReadingPayload {
        // ---
        ReadingPayload {
            temperature: Some(24.6),
            humidity: Some(61.2),
            nitrogen: Some(38.0),
            phosphorus: Some(12.5),
            potassium: Some(20.1),
            created_at: Some(Utc.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap()),
            humidity_air: Some(55.0),
            device_id: Some("field-07".to_string()),
        }
    }

    fn full_profile_payload() -> ProfilePayload {
        // ---
        ProfilePayload {
            email: Some("ana@example.com".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: Some("Moreira".to_string()),
            device_id: Some("field-07".to_string()),
            device_key: Some("k-5531".to_string()),
        }
    }

    fn full_irrigation_payload() -> IrrigationPayload {
        // ---
        IrrigationPayload {
            device_id: Some("field-07".to_string()),
            water: Some(12.0),
            dispenser1: Some(1.0),
            dispenser2: Some(0.0),
            dispenser3: Some(2.5),
            dispenser4: Some(0.0),
            dispenser5: Some(1.0),
            created_at: Some(Utc.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap()),
        }
    }

    #[test]
    fn reading_with_all_fields_passes() {
        // ---
        let reading = full_reading_payload().validate().unwrap();
        assert_eq!(reading.device_id, "field-07");
        assert_eq!(reading.nitrogen, 38.0);
    }

    #[test]
    fn reading_accepts_falsy_values() {
        // ---
        // A frozen field reports 0.0 everywhere; a bench unit has no id yet.
        let mut payload = full_reading_payload();
        payload.temperature = Some(0.0);
        payload.nitrogen = Some(0.0);
        payload.device_id = Some(String::new());
        assert!(payload.validate().is_some());
    }

    #[test]
    fn reading_rejects_any_absent_field() {
        // ---
        let mut payload = full_reading_payload();
        payload.humidity_air = None;
        assert!(payload.validate().is_none());

        let mut payload = full_reading_payload();
        payload.created_at = None;
        assert!(payload.validate().is_none());

        let mut payload = full_reading_payload();
        payload.device_id = None;
        assert!(payload.validate().is_none());
    }

    #[test]
    fn profile_requires_non_empty_fields() {
        // ---
        assert!(full_profile_payload().validate().is_some());

        let mut payload = full_profile_payload();
        payload.first_name = Some(String::new());
        assert!(payload.validate().is_none());

        let mut payload = full_profile_payload();
        payload.device_key = None;
        assert!(payload.validate().is_none());
    }

    #[test]
    fn profile_uses_device_id_wire_spelling() {
        // ---
        let payload: ProfilePayload = serde_json::from_value(json!({
            "email": "ana@example.com",
            "first_name": "Ana",
            "last_name": "Moreira",
            "device_ID": "field-07",
            "device_key": "k-5531",
        }))
        .unwrap();
        assert_eq!(payload.device_id.as_deref(), Some("field-07"));

        // The lowercase spelling is a different key and must not bind.
        let payload: ProfilePayload = serde_json::from_value(json!({
            "email": "ana@example.com",
            "first_name": "Ana",
            "last_name": "Moreira",
            "device_id": "field-07",
            "device_key": "k-5531",
        }))
        .unwrap();
        assert!(payload.validate().is_none());
    }

    #[test]
    fn non_empty_rejects_absent_and_empty_alike() {
        // ---
        assert_eq!(non_empty(Some("field-07".to_string())).as_deref(), Some("field-07"));
        assert!(non_empty(Some(String::new())).is_none());
        assert!(non_empty(None).is_none());
    }

    #[test]
    fn add_device_requires_both_fields() {
        // ---
        let payload: AddDevicePayload = serde_json::from_value(json!({
            "email": "ana@example.com",
            "device_ID": "field-07",
        }))
        .unwrap();
        let binding = payload.validate().unwrap();
        assert_eq!(binding.email, "ana@example.com");
        assert_eq!(binding.device_id, "field-07");

        let payload = AddDevicePayload {
            email: Some(String::new()),
            device_id: Some("field-07".to_string()),
        };
        assert!(payload.validate().is_none());
    }

    #[test]
    fn alert_requires_message_and_device() {
        // ---
        let payload = AlertPayload {
            created_at: Some(Utc.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap()),
            message: Some("Soil nitrogen below threshold".to_string()),
            device_id: Some("field-07".to_string()),
        };
        assert!(payload.validate().is_some());

        let payload = AlertPayload {
            created_at: Some(Utc.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap()),
            message: Some(String::new()),
            device_id: Some("field-07".to_string()),
        };
        assert!(payload.validate().is_none());

        let payload = AlertPayload {
            created_at: None,
            message: Some("Soil nitrogen below threshold".to_string()),
            device_id: Some("field-07".to_string()),
        };
        assert!(payload.validate().is_none());
    }

    #[test]
    fn irrigation_accepts_idle_dispensers() {
        // ---
        let mut payload = full_irrigation_payload();
        payload.water = Some(0.0);
        payload.dispenser1 = Some(0.0);
        let event = payload.validate().unwrap();
        assert_eq!(event.water, 0.0);
        assert_eq!(event.dispenser3, 2.5);
    }

    #[test]
    fn irrigation_rejects_missing_dispenser() {
        // ---
        let mut payload = full_irrigation_payload();
        payload.dispenser3 = None;
        assert!(payload.validate().is_none());

        let mut payload = full_irrigation_payload();
        payload.water = None;
        assert!(payload.validate().is_none());
    }

    #[test]
    fn irrigation_timestamp_defaults_to_now() {
        // ---
        let mut payload = full_irrigation_payload();
        payload.created_at = None;

        let before = Utc::now();
        let event = payload.validate().unwrap();
        assert!(event.created_at >= before);

        // An explicit timestamp is preserved as-is.
        let event = full_irrigation_payload().validate().unwrap();
        assert_eq!(
            event.created_at,
            Utc.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap()
        );
    }
}
