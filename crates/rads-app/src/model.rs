// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::ids::FlightId;

pub const RUN_GROUND: &str = "GROUND";
pub const RUN_HOVER: &str = "HOVER";
pub const RUN_80KT: &str = "80KT";
pub const RUN_120KT: &str = "120KT";

/// Flight states the acquisition screen offers, in flight order.
pub const RUN_STATES: [&str; 4] = [RUN_GROUND, RUN_HOVER, RUN_80KT, RUN_120KT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Blade {
    #[serde(rename = "BLU")]
    Blu,
    #[serde(rename = "RED")]
    Red,
    #[serde(rename = "ORG")]
    Org,
    #[serde(rename = "GRN")]
    Grn,
}

impl Blade {
    pub const ALL: [Self; 4] = [Self::Blu, Self::Red, Self::Org, Self::Grn];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blu => "BLU",
            Self::Red => "RED",
            Self::Org => "ORG",
            Self::Grn => "GRN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|blade| blade.as_str() == value)
    }

    /// Blade whose quadrant contains a once-per-rev phase angle.
    pub fn for_phase(phase_deg: f64) -> Self {
        let quadrant = (phase_deg.rem_euclid(360.0) / 90.0) as usize;
        Self::ALL[quadrant.min(Self::ALL.len() - 1)]
    }
}

/// One acquisition for a flight state. Fields absent from a run stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub track_rel_mm: BTreeMap<Blade, i32>,
    #[serde(default)]
    pub lat_1r_ips: Option<f64>,
    #[serde(default)]
    pub lat_1r_phase_deg: Option<f64>,
    #[serde(default)]
    pub vert_1r_ips: Option<f64>,
    #[serde(default)]
    pub vert_1r_phase_deg: Option<f64>,
    #[serde(default)]
    pub vib_1r_ips: Option<f64>,
    #[serde(default)]
    pub vib_1r_phase_deg: Option<f64>,
    #[serde(default)]
    pub vib_4r_ips: Option<f64>,
    #[serde(default)]
    pub vib_4r_phase_deg: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub recorded_at: Option<OffsetDateTime>,
}

impl RunRecord {
    pub fn lateral_1r(&self) -> Option<f64> {
        self.lat_1r_ips.or(self.vib_1r_ips)
    }

    pub fn lateral_1r_phase(&self) -> Option<f64> {
        self.lat_1r_phase_deg.or(self.vib_1r_phase_deg)
    }

    /// Highest minus lowest blade, or `None` without track data.
    pub fn track_spread_mm(&self) -> Option<i32> {
        let max = self.track_rel_mm.values().max()?;
        let min = self.track_rel_mm.values().min()?;
        Some(max - min)
    }

    /// Blade furthest from the mean path, with its offset.
    pub fn worst_blade(&self) -> Option<(Blade, i32)> {
        self.track_rel_mm
            .iter()
            .max_by_key(|(_, offset)| offset.abs())
            .map(|(blade, offset)| (*blade, *offset))
    }
}

/// Runs of one flight keyed by flight-state label, in acquisition order.
/// Re-recording a label replaces the record but keeps its slot, so `last()`
/// is the run that was first recorded most recently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightRuns {
    entries: Vec<(String, RunRecord)>,
}

impl FlightRuns {
    pub fn insert(&mut self, label: impl Into<String>, record: RunRecord) -> Option<RunRecord> {
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => Some(std::mem::replace(slot, record)),
            None => {
                self.entries.push((label, record));
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&RunRecord> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, record)| record)
    }

    pub fn last(&self) -> Option<(&str, &RunRecord)> {
        self.entries
            .last()
            .map(|(label, record)| (label.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RunRecord)> {
        self.entries
            .iter()
            .map(|(label, record)| (label.as_str(), record))
    }
}

impl<S: Into<String>> FromIterator<(S, RunRecord)> for FlightRuns {
    fn from_iter<T: IntoIterator<Item = (S, RunRecord)>>(iter: T) -> Self {
        let mut runs = Self::default();
        for (label, record) in iter {
            runs.insert(label, record);
        }
        runs
    }
}

/// Every flight's runs. Iteration is in sorted flight-id order, which is the
/// order every list screen presents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    flights: BTreeMap<FlightId, FlightRuns>,
}

impl Measurements {
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn contains(&self, flight_id: &FlightId) -> bool {
        self.flights.contains_key(flight_id)
    }

    pub fn runs(&self, flight_id: &FlightId) -> Option<&FlightRuns> {
        self.flights.get(flight_id)
    }

    pub fn flight_ids(&self) -> Vec<FlightId> {
        self.flights.keys().cloned().collect()
    }

    pub fn latest_flight(&self) -> Option<&FlightId> {
        self.flights.keys().next_back()
    }

    /// Registers a flight with no runs; existing runs are left alone.
    pub fn ensure_flight(&mut self, flight_id: FlightId) -> &mut FlightRuns {
        self.flights.entry(flight_id).or_default()
    }

    pub fn record_run(
        &mut self,
        flight_id: FlightId,
        label: impl Into<String>,
        record: RunRecord,
    ) -> Option<RunRecord> {
        self.ensure_flight(flight_id).insert(label, record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FlightId, &FlightRuns)> {
        self.flights.iter()
    }

    /// Next unused id in the `F100, F101, ...` sequence.
    pub fn next_flight_id(&self) -> FlightId {
        let next = self
            .flights
            .keys()
            .filter_map(FlightId::number)
            .max()
            .map_or(100, |highest| highest + 1);
        FlightId::new(format!("F{next}"))
    }
}

impl FromIterator<(FlightId, FlightRuns)> for Measurements {
    fn from_iter<T: IntoIterator<Item = (FlightId, FlightRuns)>>(iter: T) -> Self {
        Self {
            flights: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Needs,
    Locked,
    Missing,
}

impl StepStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "DONE",
            Self::Needs => "NEEDS",
            Self::Locked => "LOCKED",
            Self::Missing => "MISSING",
        }
    }

    /// Four-column tag used in step lists.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Done => "DONE",
            Self::Needs => "NEED",
            Self::Locked => "LOCK",
            Self::Missing => "MISS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSummary {
    pub step_id: &'static str,
    pub label: &'static str,
    pub status: StepStatus,
}

/// Viewer buffer handed from the step list to the step viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagHandoff {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagOptions {
    /// Feed the 4R step from the 120 kt run instead of the 80 kt run.
    pub option_120k: bool,
}

impl Default for DiagOptions {
    fn default() -> Self {
        Self { option_120k: true }
    }
}

#[cfg(test)]
mod tests {
    use super::{Blade, FlightRuns, Measurements, RunRecord};
    use crate::FlightId;

    fn track(offsets: [i32; 4]) -> RunRecord {
        RunRecord {
            track_rel_mm: Blade::ALL.into_iter().zip(offsets).collect(),
            ..RunRecord::default()
        }
    }

    #[test]
    fn reinsert_keeps_position_and_last_is_most_recent_new_label() {
        let mut runs = FlightRuns::default();
        runs.insert("pre", track([1, 0, 0, -1]));
        runs.insert("post", track([2, 0, 0, -2]));
        let previous = runs.insert("pre", track([3, 0, 0, -3]));

        assert!(previous.is_some());
        assert_eq!(runs.labels().collect::<Vec<_>>(), vec!["pre", "post"]);
        assert_eq!(runs.last().map(|(label, _)| label), Some("post"));
        assert_eq!(runs.get("pre").and_then(RunRecord::track_spread_mm), Some(6));
    }

    #[test]
    fn worst_blade_picks_largest_magnitude() {
        let record = track([2, -5, 1, 2]);
        assert_eq!(record.worst_blade(), Some((Blade::Red, -5)));
        assert_eq!(record.track_spread_mm(), Some(7));
        assert_eq!(RunRecord::default().worst_blade(), None);
    }

    #[test]
    fn lateral_values_fall_back_to_generic_1r() {
        let record = RunRecord {
            vib_1r_ips: Some(0.12),
            vib_1r_phase_deg: Some(45.0),
            ..RunRecord::default()
        };
        assert_eq!(record.lateral_1r(), Some(0.12));
        assert_eq!(record.lateral_1r_phase(), Some(45.0));
    }

    #[test]
    fn blade_for_phase_wraps_quadrants() {
        assert_eq!(Blade::for_phase(10.0), Blade::Blu);
        assert_eq!(Blade::for_phase(100.0), Blade::Red);
        assert_eq!(Blade::for_phase(359.9), Blade::Grn);
        assert_eq!(Blade::for_phase(-30.0), Blade::Grn);
    }

    #[test]
    fn next_flight_id_follows_highest_number() {
        let mut measurements = Measurements::default();
        assert_eq!(measurements.next_flight_id().as_str(), "F100");
        measurements.ensure_flight(FlightId::from("F100"));
        measurements.ensure_flight(FlightId::from("F104"));
        measurements.ensure_flight(FlightId::from("GROUND-TEST"));
        assert_eq!(measurements.next_flight_id().as_str(), "F105");
        assert_eq!(
            measurements.latest_flight().map(FlightId::as_str),
            Some("GROUND-TEST")
        );
    }
}
