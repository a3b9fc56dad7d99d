// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Read side of the measurement data: run lookup and the BHT-412-MM
//! sequential diagnostic steps derived from a flight's runs.

use crate::{
    Blade, DiagOptions, FlightId, FlightRuns, Measurements, RUN_80KT, RUN_120KT, RUN_GROUND,
    RUN_HOVER, RunRecord, SimulatorState, StepStatus, StepSummary,
};

pub const TRACK_LIMIT_MM: i32 = 6;
pub const ONE_PER_REV_LIMIT_IPS: f64 = 0.20;
pub const FOUR_PER_REV_LIMIT_IPS: f64 = 0.30;

/// Millimetres of track moved by one pitch-link flat.
const MM_PER_FLAT: i32 = 2;
/// Grams of hub weight per 0.01 ips of 1R.
const GRAMS_PER_CENTI_IPS: f64 = 0.8;

pub fn runs_for_flight(measurements: &Measurements, flight_id: &FlightId) -> FlightRuns {
    measurements.runs(flight_id).cloned().unwrap_or_default()
}

/// The flight the screens work against: the active flight when it has
/// runs recorded, otherwise the highest flight id, otherwise nothing.
pub fn active_runs(state: &SimulatorState) -> (Option<FlightId>, FlightRuns) {
    match active_flight(state) {
        Some(flight_id) => {
            let runs = runs_for_flight(&state.measurements, &flight_id);
            (Some(flight_id), runs)
        }
        None => (None, FlightRuns::default()),
    }
}

pub fn active_flight(state: &SimulatorState) -> Option<FlightId> {
    state
        .flight_id
        .as_ref()
        .filter(|flight_id| state.measurements.contains(flight_id))
        .or_else(|| state.measurements.latest_flight())
        .cloned()
}

/// Most recently inserted run of the active flight.
pub fn last_run(state: &SimulatorState) -> Option<(FlightId, String, RunRecord)> {
    let (flight_id, runs) = active_runs(state);
    let flight_id = flight_id?;
    let (label, record) = runs.last()?;
    Some((flight_id, label.to_owned(), record.clone()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Track,
    Vertical1R,
    Lateral1R,
    FourPerRev,
}

#[derive(Debug, Clone, Copy)]
struct StepDef {
    id: &'static str,
    label: &'static str,
    check: Check,
    requires: &'static [&'static str],
}

const STEPS: [StepDef; 5] = [
    StepDef {
        id: "TRK",
        label: "Track ground run",
        check: Check::Track,
        requires: &[],
    },
    StepDef {
        id: "VRT",
        label: "Vertical 1R hover",
        check: Check::Vertical1R,
        requires: &["TRK"],
    },
    StepDef {
        id: "LAT",
        label: "Lateral 1R hover",
        check: Check::Lateral1R,
        requires: &["TRK"],
    },
    StepDef {
        id: "FFT",
        label: "Track forward flight",
        check: Check::Track,
        requires: &["TRK"],
    },
    StepDef {
        id: "4R",
        label: "4R vibration",
        check: Check::FourPerRev,
        requires: &["VRT", "LAT"],
    },
];

impl StepDef {
    fn run_label(&self, options: DiagOptions) -> &'static str {
        match (self.id, self.check) {
            ("TRK", _) => RUN_GROUND,
            ("FFT", _) => RUN_80KT,
            (_, Check::FourPerRev) if options.option_120k => RUN_120KT,
            (_, Check::FourPerRev) => RUN_80KT,
            _ => RUN_HOVER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Reading {
    Track { spread: i32, worst: Blade, offset: i32 },
    OnePerRev { ips: f64, phase: Option<f64> },
    FourPerRev { ips: f64, phase: Option<f64> },
}

impl Reading {
    fn within_limit(self) -> bool {
        match self {
            Self::Track { spread, .. } => spread <= TRACK_LIMIT_MM,
            Self::OnePerRev { ips, .. } => ips <= ONE_PER_REV_LIMIT_IPS,
            Self::FourPerRev { ips, .. } => ips <= FOUR_PER_REV_LIMIT_IPS,
        }
    }
}

fn read(check: Check, record: &RunRecord) -> Option<Reading> {
    match check {
        Check::Track => {
            let spread = record.track_spread_mm()?;
            let (worst, offset) = record.worst_blade()?;
            Some(Reading::Track {
                spread,
                worst,
                offset,
            })
        }
        Check::Vertical1R => Some(Reading::OnePerRev {
            ips: record.vert_1r_ips?,
            phase: record.vert_1r_phase_deg,
        }),
        Check::Lateral1R => Some(Reading::OnePerRev {
            ips: record.lateral_1r()?,
            phase: record.lateral_1r_phase(),
        }),
        Check::FourPerRev => Some(Reading::FourPerRev {
            ips: record.vib_4r_ips?,
            phase: record.vib_4r_phase_deg,
        }),
    }
}

struct Evaluated {
    def: StepDef,
    status: StepStatus,
    reading: Option<Reading>,
}

fn evaluate(runs: &FlightRuns, options: DiagOptions) -> Vec<Evaluated> {
    let mut evaluated: Vec<Evaluated> = Vec::with_capacity(STEPS.len());
    for def in STEPS {
        let locked = def.requires.iter().any(|required| {
            !evaluated
                .iter()
                .any(|step| step.def.id == *required && step.status == StepStatus::Done)
        });
        let reading = runs
            .get(def.run_label(options))
            .and_then(|record| read(def.check, record));
        let status = match reading {
            _ if locked => StepStatus::Locked,
            None => StepStatus::Missing,
            Some(reading) if reading.within_limit() => StepStatus::Done,
            Some(_) => StepStatus::Needs,
        };
        evaluated.push(Evaluated {
            def,
            status,
            reading,
        });
    }
    evaluated
}

/// The five BHT-412-MM steps in procedure order. A step is LOCKED until its
/// prerequisites are DONE, MISSING until its feeding run exists, and NEEDS
/// when the reading exceeds its limit.
pub fn step_summaries(runs: &FlightRuns, options: DiagOptions) -> Vec<StepSummary> {
    evaluate(runs, options)
        .into_iter()
        .map(|step| StepSummary {
            step_id: step.def.id,
            label: step.def.label,
            status: step.status,
        })
        .collect()
}

/// Title and body lines for the step viewer.
pub fn step_detail(
    runs: &FlightRuns,
    step_id: &str,
    options: DiagOptions,
) -> (String, Vec<String>) {
    let steps = evaluate(runs, options);
    let Some((position, step)) = steps
        .iter()
        .enumerate()
        .find(|(_, step)| step.def.id == step_id)
    else {
        return ("DIAGS".to_owned(), vec![format!("Unknown step {step_id}")]);
    };

    let title = format!("STEP {} {}", position + 1, step.def.id);
    let run_label = step.def.run_label(options);
    let mut lines = vec![
        step.def.label.to_owned(),
        format!("Status: {}", step.status.as_str()),
        format!("Run: {run_label}"),
    ];

    if step.status == StepStatus::Locked {
        lines.push(format!("Complete first: {}", step.def.requires.join(", ")));
    }

    match step.reading {
        None => {
            lines.push(format!("No {run_label} data recorded."));
            lines.push(format!("Fly {run_label} in MEASURE."));
        }
        Some(Reading::Track {
            spread,
            worst,
            offset,
        }) => {
            if let Some(record) = runs.get(run_label) {
                for blade in Blade::ALL {
                    if let Some(value) = record.track_rel_mm.get(&blade) {
                        lines.push(format!("{} {value:>4} mm", blade.as_str()));
                    }
                }
            }
            lines.push(format!("Spread {spread} mm  limit {TRACK_LIMIT_MM} mm"));
            if step.status == StepStatus::Needs {
                let flats = (offset.abs() + MM_PER_FLAT - 1) / MM_PER_FLAT;
                let direction = if offset > 0 { "DOWN" } else { "UP" };
                lines.push(format!(
                    "Pitch link {} {direction} {flats} flat{}",
                    worst.as_str(),
                    if flats == 1 { "" } else { "s" }
                ));
            } else {
                lines.push("Track within limits".to_owned());
            }
        }
        Some(Reading::OnePerRev { ips, phase }) => {
            lines.push(format!("1R {ips:.3} ips @ {}", format_phase(phase)));
            lines.push(format!("Limit {ONE_PER_REV_LIMIT_IPS:.2} ips"));
            if step.status == StepStatus::Needs {
                let grams = (ips * 100.0 * GRAMS_PER_CENTI_IPS).round();
                let blade = Blade::for_phase(phase.unwrap_or(0.0));
                lines.push(format!("Add {grams:.0} g hub weight"));
                lines.push(format!("opposite {} blade", blade.as_str()));
            } else {
                lines.push("1R within limits".to_owned());
            }
        }
        Some(Reading::FourPerRev { ips, phase }) => {
            lines.push(format!("4R {ips:.3} ips @ {}", format_phase(phase)));
            lines.push(format!("Limit {FOUR_PER_REV_LIMIT_IPS:.2} ips"));
            if step.status == StepStatus::Needs {
                lines.push("Check 4R absorber tuning".to_owned());
                lines.push("and pylon mount wear".to_owned());
            } else {
                lines.push("4R within limits".to_owned());
            }
        }
    }

    (title, lines)
}

fn format_phase(phase: Option<f64>) -> String {
    match phase {
        Some(phase) => format!("{phase:.1} deg"),
        None => "- deg".to_owned(),
    }
}
