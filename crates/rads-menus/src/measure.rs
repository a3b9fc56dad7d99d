// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rads_app::selection::selected;
use rads_app::simulate::simulate_run;
use rads_app::{
    Footer, Key, LcdFrame, MEASURE_SCREEN, NavError, RUN_STATES, RunRecord, Screen, ScreenId,
    ScreenRegistry, SimulatorState,
};
use time::OffsetDateTime;
use tracing::info;

use crate::lcd::{context_line, guard_frame, marked, render_footer, render_header};
use crate::list::{ListAction, handle_guard_key, handle_list_key};
use crate::{MEASURE_ACQUIRE_SCREEN, MEASURE_AIRCRAFT_SCREEN, MEASURE_PLAN_SCREEN};

pub const AIRCRAFT_TYPES: [&str; 5] = ["206", "407", "412", "412EP", "UH-1H"];
pub const FLIGHT_PLANS: [&str; 3] = ["TRACK", "BALANCE", "TRK+BAL"];

const MENU: [(&str, ScreenId); 3] = [
    ("Aircraft", MEASURE_AIRCRAFT_SCREEN),
    ("Flight Plan", MEASURE_PLAN_SCREEN),
    ("Acquire Run", MEASURE_ACQUIRE_SCREEN),
];

pub fn register(screens: &mut ScreenRegistry) {
    screens.register(Screen::new(
        MEASURE_SCREEN,
        "MEASURE",
        "Set up and acquire runs",
        render_menu,
        handle_menu,
    ));
    screens.register(Screen::new(
        MEASURE_AIRCRAFT_SCREEN,
        "MEASURE / AIRCRAFT",
        "Select aircraft type",
        render_aircraft,
        handle_aircraft,
    ));
    screens.register(Screen::new(
        MEASURE_PLAN_SCREEN,
        "MEASURE / PLAN",
        "Select flight plan",
        render_plan,
        handle_plan,
    ));
    screens.register(Screen::new(
        MEASURE_ACQUIRE_SCREEN,
        "MEASURE / ACQUIRE",
        "Acquire a run for the active flight",
        render_acquire,
        handle_acquire,
    ));
}

fn render_menu(state: &SimulatorState) -> LcdFrame {
    let index = selected(state.menu_index, MENU.len());
    let values = [
        state.aircraft_type.as_deref(),
        state.flight_plan.as_deref(),
        None,
    ];

    let mut lines = render_header(state, "MEASURE");
    lines.push(String::new());
    for (row, ((label, _), value)) in MENU.iter().zip(values).enumerate() {
        let item = match value {
            Some(value) => format!("{label:<14}{value}"),
            None => (*label).to_owned(),
        };
        lines.push(marked(&item, row == index));
    }
    lines.push(String::new());
    lines.push(context_line(state));
    LcdFrame::builder(lines)
        .highlight(Some(4 + index))
        .footer(render_footer(state))
        .build()
}

fn handle_menu(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    if let ListAction::Activate(row) = handle_list_key(state, key, MENU.len())? {
        state.navigate(MENU[row].1)?;
    }
    Ok(())
}

fn render_choice(
    state: &SimulatorState,
    title: &str,
    choices: &[&str],
    current: Option<&str>,
) -> LcdFrame {
    let index = selected(state.menu_index, choices.len());
    let mut lines = render_header(state, title);
    for (row, choice) in choices.iter().enumerate() {
        let active = if current == Some(*choice) { "  *" } else { "" };
        lines.push(marked(&format!("{choice}{active}"), row == index));
    }
    lines.resize(8, String::new());
    lines.push("DO select  QUIT back".to_owned());
    LcdFrame::builder(lines)
        .highlight(Some(3 + index))
        .inverse([8])
        .footer(render_footer(state))
        .build()
}

fn render_aircraft(state: &SimulatorState) -> LcdFrame {
    render_choice(
        state,
        "AIRCRAFT TYPE",
        &AIRCRAFT_TYPES,
        state.aircraft_type.as_deref(),
    )
}

fn handle_aircraft(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    if let ListAction::Activate(row) = handle_list_key(state, key, AIRCRAFT_TYPES.len())? {
        let aircraft = AIRCRAFT_TYPES[row];
        state.aircraft_type = Some(aircraft.to_owned());
        state.set_message(format!("Aircraft: {aircraft}"));
        state.back();
    }
    Ok(())
}

fn render_plan(state: &SimulatorState) -> LcdFrame {
    render_choice(
        state,
        "FLIGHT PLAN",
        &FLIGHT_PLANS,
        state.flight_plan.as_deref(),
    )
}

fn handle_plan(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    if let ListAction::Activate(row) = handle_list_key(state, key, FLIGHT_PLANS.len())? {
        let plan = FLIGHT_PLANS[row];
        state.flight_plan = Some(plan.to_owned());
        state.set_message(format!("Plan: {plan}"));
        state.back();
    }
    Ok(())
}

/// What acquisition still needs, if anything.
fn acquire_blocker(state: &SimulatorState) -> Option<[&'static str; 2]> {
    if state.flight_id.is_none() {
        return Some(["No active flight.", "Create one in MANAGER (F4)."]);
    }
    if state.aircraft_type.is_none() {
        return Some(["No aircraft selected.", "Select Aircraft in MEASURE."]);
    }
    None
}

fn render_acquire(state: &SimulatorState) -> LcdFrame {
    if let Some(guidance) = acquire_blocker(state) {
        return guard_frame(state, "ACQUIRE", &guidance);
    }

    let index = selected(state.menu_index, RUN_STATES.len());
    let runs = state
        .flight_id
        .as_ref()
        .and_then(|flight_id| state.measurements.runs(flight_id));
    let flight = state
        .flight_id
        .as_ref()
        .map_or("-", |flight_id| flight_id.as_str());
    let plan = state.flight_plan.as_deref().unwrap_or("-");

    let mut lines = render_header(state, "ACQUIRE");
    lines.push(format!("FLT {flight}  PLAN {plan}"));
    for (row, label) in RUN_STATES.iter().enumerate() {
        let recorded = runs.is_some_and(|runs| runs.get(label).is_some());
        let item = format!("{label:<8}{}", if recorded { "recorded" } else { "" });
        lines.push(marked(&item, row == index));
    }
    lines.push(state.last_message.clone().unwrap_or_default());
    LcdFrame::builder(lines)
        .highlight(Some(4 + index))
        .inverse([8])
        .footer(Footer::text("DO acquire  QUIT back"))
        .build()
}

fn handle_acquire(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    if acquire_blocker(state).is_some() {
        return handle_guard_key(state, key);
    }
    let ListAction::Activate(row) = handle_list_key(state, key, RUN_STATES.len())? else {
        return Ok(());
    };
    let (Some(flight_id), Some(aircraft)) = (state.flight_id.clone(), state.aircraft_type.clone())
    else {
        return Ok(());
    };

    let label = RUN_STATES[row];
    let record = RunRecord {
        recorded_at: Some(OffsetDateTime::now_utc()),
        ..simulate_run(&flight_id, label, &aircraft)
    };
    let replaced = state
        .measurements
        .record_run(flight_id.clone(), label, record)
        .is_some();
    info!(flight = %flight_id, run = label, replaced, "run acquired");
    state.set_message(format!("{flight_id} {label} recorded"));
    Ok(())
}
