// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rads_app::selection::{selected, window_start};
use rads_app::{
    Blade, DISPLAY_SCREEN, Footer, Key, LcdFrame, NavError, RunRecord, Screen, ScreenId,
    ScreenRegistry, SimulatorState, last_run,
};

use crate::lcd::{context_line, marked, render_header};
use crate::list::{ListAction, handle_guard_key, handle_list_key};
use crate::{DISPLAY_SUMMARY_SCREEN, DISPLAY_TRACK_SCREEN, DISPLAY_VIB_SCREEN};

const MENU: [(&str, ScreenId); 3] = [
    ("Summary", DISPLAY_SUMMARY_SCREEN),
    ("Track", DISPLAY_TRACK_SCREEN),
    ("Vibration", DISPLAY_VIB_SCREEN),
];
const SUMMARY_FIRST_ROW: usize = 5;
const SUMMARY_ROWS: usize = 4;

pub fn register(screens: &mut ScreenRegistry) {
    screens.register(Screen::new(
        DISPLAY_SCREEN,
        "DISPLAY",
        "View last results",
        render_menu,
        handle_menu,
    ));
    screens.register(Screen::new(
        DISPLAY_SUMMARY_SCREEN,
        "DISPLAY / SUMMARY",
        "Session summary",
        render_summary,
        handle_summary,
    ));
    screens.register(Screen::new(
        DISPLAY_TRACK_SCREEN,
        "DISPLAY / TRACK",
        "Track view",
        render_track,
        handle_guard_key,
    ));
    screens.register(Screen::new(
        DISPLAY_VIB_SCREEN,
        "DISPLAY / VIBRATION",
        "Vibration view",
        render_vib,
        handle_guard_key,
    ));
}

fn render_menu(state: &SimulatorState) -> LcdFrame {
    let index = selected(state.menu_index, MENU.len());
    let mut lines = render_header(state, "DISPLAY");
    lines.push(String::new());
    for (row, (label, _)) in MENU.iter().enumerate() {
        lines.push(marked(label, row == index));
    }
    lines.extend([String::new(), context_line(state), String::new()]);
    LcdFrame::builder(lines)
        .highlight(Some(4 + index))
        .footer(Footer::text("UP/DN  DO  QUIT"))
        .build()
}

fn handle_menu(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    if let ListAction::Activate(row) = handle_list_key(state, key, MENU.len())? {
        state.navigate(MENU[row].1)?;
    }
    Ok(())
}

/// "Nothing recorded yet" layout shared by the result views.
fn empty_frame(state: &SimulatorState, title: &str, what: &str) -> LcdFrame {
    let mut lines = render_header(state, title);
    lines.extend([
        String::new(),
        what.to_owned(),
        "Run MEASURE first.".to_owned(),
        String::new(),
        context_line(state),
    ]);
    LcdFrame::builder(lines).footer(Footer::text("QUIT")).build()
}

fn render_summary(state: &SimulatorState) -> LcdFrame {
    let flights = state.measurements.flight_ids();
    if flights.is_empty() {
        return empty_frame(state, "Summary", "No results yet.");
    }

    let index = selected(state.menu_index, flights.len());
    let start = window_start(index, flights.len(), SUMMARY_ROWS);
    let mut lines = render_header(state, "Summary");
    lines.push(String::new());
    lines.push(format!("Flights: {}", flights.len()));
    for (row, flight_id) in flights.iter().enumerate().skip(start).take(SUMMARY_ROWS) {
        let count = state
            .measurements
            .runs(flight_id)
            .map_or(0, |runs| runs.len());
        lines.push(marked(&format!("{flight_id}  ({count} runs)"), row == index));
    }
    LcdFrame::builder(lines)
        .highlight(Some(SUMMARY_FIRST_ROW + index - start))
        .footer(Footer::text("DO set active  QUIT"))
        .build()
}

fn handle_summary(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    let flights = state.measurements.flight_ids();
    if let ListAction::Activate(row) = handle_list_key(state, key, flights.len())? {
        let flight_id = flights[row].clone();
        state.set_message(format!("Active Flight: {flight_id}"));
        state.flight_id = Some(flight_id);
        state.back();
    }
    Ok(())
}

fn track_cell(record: &RunRecord, blade: Blade) -> String {
    let value = record
        .track_rel_mm
        .get(&blade)
        .map_or_else(|| "-".to_owned(), i32::to_string);
    format!("{} {value:>4} mm", blade.as_str())
}

fn render_track(state: &SimulatorState) -> LcdFrame {
    let Some((flight_id, label, record)) = last_run(state) else {
        return empty_frame(state, "Track", "No track data.");
    };

    let mut lines = render_header(state, "Track");
    lines.extend([
        String::new(),
        format!("Flight {flight_id}  {label}"),
        format!(
            "{}   {}",
            track_cell(&record, Blade::Blu),
            track_cell(&record, Blade::Red)
        ),
        format!(
            "{}   {}",
            track_cell(&record, Blade::Org),
            track_cell(&record, Blade::Grn)
        ),
        String::new(),
        "(values rel. mean)".to_owned(),
    ]);
    LcdFrame::builder(lines).footer(Footer::text("QUIT")).build()
}

fn number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => "-".to_owned(),
    }
}

fn render_vib(state: &SimulatorState) -> LcdFrame {
    let Some((flight_id, label, record)) = last_run(state) else {
        return empty_frame(state, "Vibration", "No vibration data.");
    };

    let row = |name: &str, ips: Option<f64>, phase: Option<f64>| {
        format!("{name:<5}: {} ips @ {}°", number(ips, 3), number(phase, 1))
    };
    let mut lines = render_header(state, "Vibration");
    lines.extend([
        String::new(),
        format!("Flight {flight_id}  {label}"),
        row("LAT1R", record.lateral_1r(), record.lateral_1r_phase()),
        row("VRT1R", record.vert_1r_ips, record.vert_1r_phase_deg),
        row("4R", record.vib_4r_ips, record.vib_4r_phase_deg),
        "(simulated numbers)".to_owned(),
    ]);
    LcdFrame::builder(lines).footer(Footer::text("QUIT")).build()
}
