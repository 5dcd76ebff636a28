//! Sensor store adapter: parameterized access to the `readings` relation.

use sqlx::PgPool;

use crate::models::Reading;

// ---

/// Most recent rows served per query. Fixed by the route contract, not
/// configuration.
const READINGS_CAP: i64 = 300;

/// Handle on the sensor-readings database. Cheap to clone; every clone
/// shares the same pool.
#[derive(Clone)]
pub struct SensorStore {
    // ---
    pool: PgPool,
}

impl SensorStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one reading. Duplicates are permitted; the relation has no
    /// uniqueness constraint.
    pub async fn insert_reading(&self, reading: &Reading) -> Result<(), sqlx::Error> {
        // ---
        sqlx::query(
            r#"
            INSERT INTO readings (
                temperature, humidity, nitrogen, phosphorus, potassium,
                humidity_air, created_at, device_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.nitrogen)
        .bind(reading.phosphorus)
        .bind(reading.potassium)
        .bind(reading.humidity_air)
        .bind(&reading.created_at)
        .bind(&reading.device_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent readings, newest first, optionally filtered to one
    /// device.
    pub async fn recent_readings(
        &self,
        device_id: Option<&str>,
    ) -> Result<Vec<Reading>, sqlx::Error> {
        // ---
        match device_id {
            Some(device_id) => {
                sqlx::query_as::<_, Reading>(
                    r#"
                    SELECT temperature, humidity, nitrogen, phosphorus, potassium,
                           humidity_air, created_at, device_id
                    FROM readings
                    WHERE device_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(device_id)
                .bind(READINGS_CAP)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Reading>(
                    r#"
                    SELECT temperature, humidity, nitrogen, phosphorus, potassium,
                           humidity_air, created_at, device_id
                    FROM readings
                    ORDER BY created_at DESC
                    LIMIT $1
                    "#,
                )
                .bind(READINGS_CAP)
                .fetch_all(&self.pool)
                .await
            }
        }
    }
}
