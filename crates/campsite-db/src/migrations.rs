use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (bookings, capacities, admin users)");
        conn.execute_batch(
            "
            CREATE TABLE bookings (
                id                TEXT PRIMARY KEY,
                last_name         TEXT NOT NULL,
                first_name        TEXT NOT NULL,
                email             TEXT NOT NULL,
                phone             TEXT NOT NULL,
                address           TEXT NOT NULL,
                postal_code       TEXT NOT NULL,
                city              TEXT NOT NULL,
                message           TEXT NOT NULL DEFAULT '',
                check_in          TEXT,
                check_out         TEXT,
                site_type         TEXT NOT NULL,
                tent_length       TEXT,
                tent_width        TEXT,
                vehicle_length    TEXT,
                cable_length      TEXT,
                adults            INTEGER NOT NULL DEFAULT 1,
                children_over_8   INTEGER NOT NULL DEFAULT 0,
                children_under_8  INTEGER NOT NULL DEFAULT 0,
                pets              INTEGER NOT NULL DEFAULT 0,
                extra_vehicles    INTEGER NOT NULL DEFAULT 0,
                extra_tents       INTEGER NOT NULL DEFAULT 0,
                electricity       INTEGER NOT NULL DEFAULT 0,
                deposit_paid      INTEGER NOT NULL DEFAULT 0,
                status            TEXT NOT NULL DEFAULT 'pending',
                created_at        TEXT NOT NULL,
                updated_at        TEXT NOT NULL
            );

            CREATE INDEX idx_bookings_check_out ON bookings(check_out);
            CREATE INDEX idx_bookings_created ON bookings(created_at);

            CREATE TABLE capacities (
                category    TEXT PRIMARY KEY,
                max_places  INTEGER NOT NULL CHECK (max_places >= 1)
            );

            CREATE TABLE admin_users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (tariffs, supplements)");
        conn.execute_batch(
            "
            CREATE TABLE tariffs (
                category                          TEXT NOT NULL,
                season                            TEXT NOT NULL,
                one_person_with_electricity       TEXT,
                two_persons_with_electricity      TEXT,
                one_person_without_electricity    TEXT,
                two_persons_without_electricity   TEXT,
                PRIMARY KEY (category, season)
            );

            -- Single row, id is always 1
            CREATE TABLE supplements (
                id             INTEGER PRIMARY KEY CHECK (id = 1),
                extra_adult    TEXT NOT NULL DEFAULT '0',
                child_over_8   TEXT NOT NULL DEFAULT '0',
                child_under_8  TEXT NOT NULL DEFAULT '0',
                pet            TEXT NOT NULL DEFAULT '0',
                extra_vehicle  TEXT,
                extra_tent     TEXT
            );

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
