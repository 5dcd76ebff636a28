//! User store adapter: profiles, device bindings, alerts, and irrigation
//! events, all living in the second database.

use sqlx::PgPool;

use crate::models::{Alert, DeviceBinding, IrrigationEvent, NewAlert, Profile};

// ---

/// Alerts served per device query.
const ALERTS_CAP: i64 = 10;

/// Irrigation events served per device query.
const IRRIGATION_CAP: i64 = 30;

/// Whether a profile save updated an existing row or created a new one.
/// Clients are told which, so the distinction is part of the contract.
#[derive(Debug, PartialEq, Eq)]
pub enum ProfileSaveOutcome {
    Created,
    Updated,
}

/// Handle on the users/profiles/alerts/irrigation database. Cheap to clone;
/// every clone shares the same pool.
#[derive(Clone)]
pub struct UserStore {
    // ---
    pool: PgPool,
}

impl UserStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- profiles ---

    /// Save a profile: update the `(email, device_id)` row if it exists,
    /// insert it otherwise.
    ///
    /// The check and the write are two statements, not one transaction;
    /// concurrent saves for the same pair can race. The unique constraint
    /// on `(email, device_id)` keeps the worst case to a rejected duplicate
    /// insert or a lost update, never duplicate rows.
    pub async fn save_profile(&self, profile: &Profile) -> Result<ProfileSaveOutcome, sqlx::Error> {
        // ---
        let existing = self.find_profile(&profile.email, &profile.device_id).await?;

        if existing.is_some() {
            sqlx::query(
                r#"
                UPDATE profiles
                SET first_name = $1, last_name = $2, device_key = $3
                WHERE email = $4 AND device_id = $5
                "#,
            )
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.device_key)
            .bind(&profile.email)
            .bind(&profile.device_id)
            .execute(&self.pool)
            .await?;

            Ok(ProfileSaveOutcome::Updated)
        } else {
            sqlx::query(
                r#"
                INSERT INTO profiles (email, first_name, last_name, device_id, device_key)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&profile.email)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.device_id)
            .bind(&profile.device_key)
            .execute(&self.pool)
            .await?;

            Ok(ProfileSaveOutcome::Created)
        }
    }

    /// Exact composite lookup; at most one row thanks to the unique
    /// constraint.
    pub async fn find_profile(
        &self,
        email: &str,
        device_id: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        // ---
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT email, first_name, last_name, device_id, device_key
            FROM profiles
            WHERE email = $1 AND device_id = $2
            "#,
        )
        .bind(email)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Every profile row for an email, most recently inserted first.
    pub async fn profiles_for_email(&self, email: &str) -> Result<Vec<Profile>, sqlx::Error> {
        // ---
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT email, first_name, last_name, device_id, device_key
            FROM profiles
            WHERE email = $1
            ORDER BY id DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    /// The most recently inserted profile row for an email, if any.
    pub async fn latest_profile_for_email(
        &self,
        email: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        // ---
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT email, first_name, last_name, device_id, device_key
            FROM profiles
            WHERE email = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Bind a device to an email with empty name/key fields. A repeat call
    /// for the same pair is a silent no-op and never touches details a
    /// profile save already filled in.
    pub async fn bind_device(&self, binding: &DeviceBinding) -> Result<(), sqlx::Error> {
        // ---
        sqlx::query(
            r#"
            INSERT INTO profiles (email, first_name, last_name, device_id, device_key)
            VALUES ($1, '', '', $2, '')
            ON CONFLICT (email, device_id) DO NOTHING
            "#,
        )
        .bind(&binding.email)
        .bind(&binding.device_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // --- alerts ---

    /// Append one alert row.
    pub async fn insert_alert(&self, alert: &NewAlert) -> Result<(), sqlx::Error> {
        // ---
        sqlx::query(
            r#"
            INSERT INTO alerts (created_at, message, device_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&alert.created_at)
        .bind(&alert.message)
        .bind(&alert.device_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The newest alerts for a device, newest first.
    pub async fn recent_alerts(&self, device_id: &str) -> Result<Vec<Alert>, sqlx::Error> {
        // ---
        sqlx::query_as::<_, Alert>(
            r#"
            SELECT created_at, message
            FROM alerts
            WHERE device_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(device_id)
        .bind(ALERTS_CAP)
        .fetch_all(&self.pool)
        .await
    }

    // --- irrigation ---

    /// Append one dispenser/water event.
    pub async fn insert_irrigation(&self, event: &IrrigationEvent) -> Result<(), sqlx::Error> {
        // ---
        sqlx::query(
            r#"
            INSERT INTO irrigation_data (
                device_id, water, dispenser1, dispenser2, dispenser3,
                dispenser4, dispenser5, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&event.device_id)
        .bind(event.water)
        .bind(event.dispenser1)
        .bind(event.dispenser2)
        .bind(event.dispenser3)
        .bind(event.dispenser4)
        .bind(event.dispenser5)
        .bind(&event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The newest irrigation events for a device, newest first.
    pub async fn recent_irrigation(
        &self,
        device_id: &str,
    ) -> Result<Vec<IrrigationEvent>, sqlx::Error> {
        // ---
        sqlx::query_as::<_, IrrigationEvent>(
            r#"
            SELECT device_id, water, dispenser1, dispenser2, dispenser3,
                   dispenser4, dispenser5, created_at
            FROM irrigation_data
            WHERE device_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(device_id)
        .bind(IRRIGATION_CAP)
        .fetch_all(&self.pool)
        .await
    }
}
