//! Database schema management for the AgriSense backend.
//!
//! Ensures required tables and indexes exist in both stores before serving
//! requests. Applied once on startup from `main.rs`, one call per store
//! (EMBP: two gateway calls, one per pool).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the sensor store schema (idempotent).
///
/// Creates the append-only `readings` table fed by `/api/receive-data` and
/// served by `/api/readings`. Safe to call on every startup; no-op if the
/// objects already exist.
pub async fn create_sensor_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id           SERIAL PRIMARY KEY,
            temperature  DOUBLE PRECISION NOT NULL,
            humidity     DOUBLE PRECISION NOT NULL,
            nitrogen     DOUBLE PRECISION NOT NULL,
            phosphorus   DOUBLE PRECISION NOT NULL,
            potassium    DOUBLE PRECISION NOT NULL,
            humidity_air DOUBLE PRECISION NOT NULL,
            created_at   TIMESTAMPTZ      NOT NULL,
            device_id    TEXT             NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Both access paths: per-device filtering and newest-first ordering
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_device_id
            ON readings (device_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_created_at
            ON readings (created_at);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Create or update the user store schema (idempotent).
///
/// Creates `users`, `profiles`, `alerts`, and `irrigation_data`. The
/// `users` table is only referenced by a historical revision of the profile
/// flow but remains part of the persisted schema. Safe to call on every
/// startup.
pub async fn create_user_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            email TEXT PRIMARY KEY
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // The (email, device_id) constraint is the conflict target for the
    // add-device upsert and what keeps profile saves race-bounded.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id         SERIAL PRIMARY KEY,
            email      TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name  TEXT NOT NULL,
            device_id  TEXT NOT NULL,
            device_key TEXT NOT NULL,
            UNIQUE (email, device_id)
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            id         SERIAL PRIMARY KEY,
            created_at TIMESTAMPTZ NOT NULL,
            message    TEXT        NOT NULL,
            device_id  TEXT        NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS irrigation_data (
            id         SERIAL PRIMARY KEY,
            device_id  TEXT             NOT NULL,
            water      DOUBLE PRECISION NOT NULL,
            dispenser1 DOUBLE PRECISION NOT NULL,
            dispenser2 DOUBLE PRECISION NOT NULL,
            dispenser3 DOUBLE PRECISION NOT NULL,
            dispenser4 DOUBLE PRECISION NOT NULL,
            dispenser5 DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ      NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Basic indexes for the common lookups
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_profiles_email
            ON profiles (email);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_alerts_device_id
            ON alerts (device_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_irrigation_data_device_id
            ON irrigation_data (device_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
