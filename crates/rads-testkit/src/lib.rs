// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rads_app::{
    Blade, FlightId, FlightRuns, Key, LcdFrame, Measurements, RunRecord, ScreenId,
    ScreenRegistry, SimulatorState, dispatch,
};
use std::path::PathBuf;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A session booted on the main menu with every screen registered.
pub fn booted_state() -> Result<SimulatorState> {
    booted_state_at(rads_menus::MAIN_SCREEN)
}

pub fn booted_state_at(root: ScreenId) -> Result<SimulatorState> {
    let mut screens = ScreenRegistry::default();
    rads_menus::register_all(&mut screens);
    SimulatorState::boot(screens, root).context("boot session")
}

/// Booted session with a Bell 412 selected and an active flight.
pub fn bht412_state(flight: &str) -> Result<SimulatorState> {
    let mut state = booted_state()?;
    state.aircraft_type = Some("412".to_owned());
    state.tail_number = Some("N412RA".to_owned());
    state.flight_id = Some(FlightId::from(flight));
    Ok(state)
}

/// Feeds `keys` through the engine, returning the frame after the last one.
pub fn press(state: &mut SimulatorState, keys: &[Key]) -> Result<Option<LcdFrame>> {
    let mut frame = None;
    for key in keys {
        frame = Some(dispatch(state, *key).with_context(|| format!("dispatch {key:?}"))?);
    }
    Ok(frame)
}

/// Track-only run with offsets in BLU, RED, ORG, GRN order.
pub fn track_run(offsets: [i32; 4]) -> RunRecord {
    RunRecord {
        track_rel_mm: Blade::ALL.into_iter().zip(offsets).collect(),
        recorded_at: fixture_datetime().ok(),
        ..RunRecord::default()
    }
}

/// Airborne run: track plus vertical, lateral and 4R amplitudes in ips.
pub fn airborne_run(offsets: [i32; 4], vert: f64, lat: f64, four_per_rev: f64) -> RunRecord {
    RunRecord {
        vert_1r_ips: Some(vert),
        vert_1r_phase_deg: Some(35.0),
        lat_1r_ips: Some(lat),
        lat_1r_phase_deg: Some(190.0),
        vib_4r_ips: Some(four_per_rev),
        vib_4r_phase_deg: Some(270.0),
        ..track_run(offsets)
    }
}

/// A flight whose every run is within limits.
pub fn clean_flight() -> FlightRuns {
    [
        ("GROUND", track_run([1, -1, 1, -1])),
        ("HOVER", airborne_run([1, 0, 0, -1], 0.08, 0.05, 0.0)),
        ("80KT", airborne_run([2, -1, 0, -1], 0.10, 0.06, 0.12)),
        ("120KT", airborne_run([1, -2, 1, 0], 0.12, 0.07, 0.18)),
    ]
    .into_iter()
    .collect()
}

/// `F100` with a `pre` then a `post` run.
pub fn pre_post_measurements() -> Measurements {
    let runs: FlightRuns = [
        ("pre", track_run([4, -4, 2, -2])),
        ("post", track_run([1, -1, 0, 0])),
    ]
    .into_iter()
    .collect();
    [(FlightId::from("F100"), runs)].into_iter().collect()
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("rads.db");
    Ok((dir, db_path))
}

pub fn fixture_datetime() -> Result<OffsetDateTime> {
    OffsetDateTime::parse("2026-03-14T09:26:53Z", &Rfc3339).context("parse fixture datetime")
}

#[cfg(test)]
mod tests {
    use super::{booted_state, clean_flight, pre_post_measurements, press, track_run};
    use anyhow::Result;
    use rads_app::{FlightId, Key, MEASURE_SCREEN};

    #[test]
    fn booted_state_starts_on_main() -> Result<()> {
        let state = booted_state()?;
        assert_eq!(state.current(), rads_menus::MAIN_SCREEN);
        assert_eq!(state.stack().depth(), 1);
        Ok(())
    }

    #[test]
    fn press_returns_last_frame() -> Result<()> {
        let mut state = booted_state()?;
        assert!(press(&mut state, &[])?.is_none());
        let frame = press(&mut state, &[Key::Down, Key::F1])?;
        assert_eq!(state.current(), MEASURE_SCREEN);
        assert!(frame.is_some_and(|frame| frame.contains_text("Aircraft")));
        Ok(())
    }

    #[test]
    fn fixtures_keep_insertion_order() {
        let measurements = pre_post_measurements();
        let runs = measurements.runs(&FlightId::from("F100"));
        assert_eq!(runs.and_then(|runs| runs.last()).map(|(label, _)| label), Some("post"));
        assert_eq!(clean_flight().len(), 4);
        assert_eq!(track_run([3, -3, 0, 0]).track_spread_mm(), Some(6));
    }
}
