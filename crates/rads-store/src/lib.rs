// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rads_app::simulate::simulate_run;
use rads_app::{
    FlightId, FlightRuns, Measurements, RUN_GROUND, RUN_STATES, RunRecord, SimulatorState,
};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

pub const APP_NAME: &str = "rads";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("flights", &["id", "created_at"]),
    (
        "runs",
        &[
            "flight_id",
            "label",
            "seq",
            "record",
            "recorded_at",
            "updated_at",
        ],
    ),
    ("settings", &["key", "value", "updated_at"]),
];

struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[RequiredIndex {
    name: "idx_runs_flight_seq",
    create_sql: "CREATE INDEX IF NOT EXISTS idx_runs_flight_seq ON runs (flight_id, seq)",
}];

/// Session context that survives a restart, stored in `settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub flight_id: Option<FlightId>,
    pub tail_number: Option<String>,
    pub aircraft_type: Option<String>,
    pub flight_plan: Option<String>,
}

impl SessionSnapshot {
    pub fn capture(state: &SimulatorState) -> Self {
        Self {
            flight_id: state.flight_id.clone(),
            tail_number: state.tail_number.clone(),
            aircraft_type: state.aircraft_type.clone(),
            flight_plan: state.flight_plan.clone(),
        }
    }

    /// Copies every stored field into `state`, leaving absent ones alone.
    pub fn apply(self, state: &mut SimulatorState) {
        if self.flight_id.is_some() {
            state.flight_id = self.flight_id;
        }
        if self.tail_number.is_some() {
            state.tail_number = self.tail_number;
        }
        if self.aircraft_type.is_some() {
            state.aircraft_type = self.aircraft_type;
        }
        if self.flight_plan.is_some() {
            state.flight_plan = self.flight_plan;
        }
    }
}

const SETTING_FLIGHT: &str = "session.flight_id";
const SETTING_TAIL: &str = "session.tail_number";
const SETTING_AIRCRAFT: &str = "session.aircraft_type";
const SETTING_PLAN: &str = "session.flight_plan";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        debug!(path = %path.display(), "database opened");
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
            info!("database schema created");
        }
        ensure_required_indexes(&self.conn)
    }

    pub fn ensure_flight(&self, flight_id: &FlightId) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "INSERT OR IGNORE INTO flights (id, created_at) VALUES (?, ?)",
                params![flight_id.as_str(), now],
            )
            .with_context(|| format!("insert flight {flight_id}"))?;
        Ok(())
    }

    pub fn list_flights(&self) -> Result<Vec<FlightId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM flights ORDER BY id ASC")
            .context("prepare flights query")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query flights")?;
        let ids = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect flights")?;
        Ok(ids.into_iter().map(FlightId::new).collect())
    }

    /// Stores `record` under `label`. A new label is appended after the
    /// flight's existing runs; an existing one keeps its position.
    pub fn upsert_run(&self, flight_id: &FlightId, label: &str, record: &RunRecord) -> Result<()> {
        if label.trim().is_empty() {
            bail!("run label must not be empty for flight {flight_id}");
        }
        self.ensure_flight(flight_id)?;
        let json = serde_json::to_string(record)
            .with_context(|| format!("encode run {flight_id}/{label}"))?;
        let recorded_at = record
            .recorded_at
            .map(|value| value.format(&Rfc3339))
            .transpose()
            .context("format run timestamp")?;
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO runs (flight_id, label, seq, record, recorded_at, updated_at)
                VALUES (
                  ?1,
                  ?2,
                  (SELECT COALESCE(MAX(seq), 0) + 1 FROM runs WHERE flight_id = ?1),
                  ?3,
                  ?4,
                  ?5
                )
                ON CONFLICT(flight_id, label) DO UPDATE SET
                  record = excluded.record,
                  recorded_at = excluded.recorded_at,
                  updated_at = excluded.updated_at
                WHERE runs.record IS NOT excluded.record
                ",
                params![flight_id.as_str(), label, json, recorded_at, now],
            )
            .with_context(|| format!("upsert run {flight_id}/{label}"))?;
        debug!(flight = %flight_id, run = label, "run stored");
        Ok(())
    }

    pub fn load_runs(&self, flight_id: &FlightId) -> Result<FlightRuns> {
        let mut stmt = self
            .conn
            .prepare("SELECT label, record FROM runs WHERE flight_id = ? ORDER BY seq ASC")
            .context("prepare runs query")?;
        let rows = stmt
            .query_map(params![flight_id.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .with_context(|| format!("query runs for {flight_id}"))?;

        let mut runs = FlightRuns::default();
        for row in rows {
            let (label, json) = row.with_context(|| format!("read run row for {flight_id}"))?;
            let record: RunRecord = serde_json::from_str(&json).with_context(|| {
                format!(
                    "run {flight_id}/{label} holds invalid data; delete it or re-acquire the run"
                )
            })?;
            runs.insert(label, record);
        }
        Ok(runs)
    }

    pub fn load_measurements(&self) -> Result<Measurements> {
        self.list_flights()?
            .into_iter()
            .map(|flight_id| -> Result<(FlightId, FlightRuns)> {
                let runs = self.load_runs(&flight_id)?;
                Ok((flight_id, runs))
            })
            .collect()
    }

    /// Writes every flight and run, in run order, in one transaction. Runs
    /// whose record is unchanged keep their `updated_at`.
    pub fn save_measurements(&self, measurements: &Measurements) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin measurements transaction")?;
        for (flight_id, runs) in measurements.iter() {
            self.ensure_flight(flight_id)?;
            for (label, record) in runs.iter() {
                self.upsert_run(flight_id, label, record)?;
            }
        }
        tx.commit().context("commit measurements")
    }

    pub fn load_session(&self) -> Result<SessionSnapshot> {
        Ok(SessionSnapshot {
            flight_id: self.get_setting_raw(SETTING_FLIGHT)?.map(FlightId::new),
            tail_number: self.get_setting_raw(SETTING_TAIL)?,
            aircraft_type: self.get_setting_raw(SETTING_AIRCRAFT)?,
            flight_plan: self.get_setting_raw(SETTING_PLAN)?,
        })
    }

    pub fn save_session(&self, session: &SessionSnapshot) -> Result<()> {
        self.put_setting_opt(
            SETTING_FLIGHT,
            session.flight_id.as_ref().map(FlightId::as_str),
        )?;
        self.put_setting_opt(SETTING_TAIL, session.tail_number.as_deref())?;
        self.put_setting_opt(SETTING_AIRCRAFT, session.aircraft_type.as_deref())?;
        self.put_setting_opt(SETTING_PLAN, session.flight_plan.as_deref())
    }

    /// Loads stored flights and session context into a freshly booted state.
    pub fn restore_state(&self, state: &mut SimulatorState) -> Result<()> {
        state.measurements = self.load_measurements()?;
        self.load_session()?.apply(state);
        if let Some(flight_id) = &state.flight_id
            && !state.measurements.contains(flight_id)
        {
            warn!(flight = %flight_id, "stored active flight has no record; clearing it");
            state.flight_id = None;
        }
        info!(
            flights = state.measurements.len(),
            active = state.flight_id.as_ref().map(FlightId::as_str),
            "session restored"
        );
        Ok(())
    }

    pub fn save_state(&self, state: &SimulatorState) -> Result<()> {
        self.save_measurements(&state.measurements)?;
        self.save_session(&SessionSnapshot::capture(state))
    }

    /// Two simulated flights on a Bell 412: F100 with every flight state,
    /// F101 with a ground run only.
    pub fn seed_demo_data(&self) -> Result<()> {
        let aircraft = "412";
        let mut measurements = Measurements::default();
        let first = FlightId::from("F100");
        for label in RUN_STATES {
            measurements.record_run(first.clone(), label, simulate_run(&first, label, aircraft));
        }
        let second = FlightId::from("F101");
        measurements.record_run(
            second.clone(),
            RUN_GROUND,
            simulate_run(&second, RUN_GROUND, aircraft),
        );
        self.save_measurements(&measurements)?;
        self.save_session(&SessionSnapshot {
            flight_id: Some(first),
            tail_number: Some("N412RA".to_owned()),
            aircraft_type: Some(aircraft.to_owned()),
            flight_plan: Some("TRK+BAL".to_owned()),
        })?;
        info!("demo data seeded");
        Ok(())
    }

    fn get_setting_raw(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read setting {key}"))
    }

    fn put_setting_opt(&self, key: &str, value: Option<&str>) -> Result<()> {
        let Some(value) = value else {
            self.conn
                .execute("DELETE FROM settings WHERE key = ?", params![key])
                .with_context(|| format!("clear setting {key}"))?;
            return Ok(());
        };
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO settings (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("upsert setting {key}"))?;
        Ok(())
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("RADS_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set RADS_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("rads.db"))
}

/// Rejects database locations SQLite would treat as URIs or that name no
/// file. `:memory:` is accepted for demo sessions.
pub fn validate_db_path(path: &str) -> Result<()> {
    const HINT: &str = "set [storage].db_path or RADS_DB_PATH to a plain file path";
    if path.trim().is_empty() {
        bail!("database path must not be empty; {HINT}");
    }
    if path == ":memory:" {
        return Ok(());
    }
    if let Some((scheme, _)) = path.split_once("://")
        && !scheme.is_empty()
        && scheme.chars().all(char::is_alphabetic)
    {
        bail!("database path {path:?} looks like a URI ({scheme}://); {HINT}");
    }
    if path.starts_with("file:") || path.contains('?') {
        bail!("database path {path:?} uses SQLite URI syntax; {HINT}");
    }
    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    conn.query_row(
        "
        SELECT EXISTS (
          SELECT 1 FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
        )
        ",
        [],
        |row| row.get(0),
    )
    .context("inspect existing tables")
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        let columns = table_columns(conn, table)?;
        if columns.is_empty() {
            bail!(
                "database is missing required table `{table}`; point RADS_DB_PATH at a rads database"
            );
        }

        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; move the old database aside and relaunch",
                missing.join(", ")
            );
        }
    }
    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}
