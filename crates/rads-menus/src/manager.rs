// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rads_app::selection::{selected, window_start};
use rads_app::{Key, LcdFrame, MANAGER_SCREEN, NavError, Screen, ScreenRegistry, SimulatorState};
use tracing::info;

use crate::lcd::{marked, render_footer, render_header};
use crate::list::{ListAction, handle_list_key};

const NEW_FLIGHT: &str = "+ New Flight";
const FIRST_ROW: usize = 4;
const VISIBLE_ROWS: usize = 4;

pub fn register(screens: &mut ScreenRegistry) {
    screens.register(Screen::new(
        MANAGER_SCREEN,
        "FLIGHT MANAGER",
        "Create and select flights",
        render,
        handle,
    ));
}

/// `+ New Flight` followed by every known flight in id order.
fn items(state: &SimulatorState) -> Vec<String> {
    std::iter::once(NEW_FLIGHT.to_owned())
        .chain(state.measurements.iter().map(|(flight_id, runs)| {
            format!("{flight_id:<8}{:>2} runs", runs.len())
        }))
        .collect()
}

fn render(state: &SimulatorState) -> LcdFrame {
    let items = items(state);
    let index = selected(state.menu_index, items.len());
    let start = window_start(index, items.len(), VISIBLE_ROWS);
    let active = state
        .flight_id
        .as_ref()
        .map_or("-", |flight_id| flight_id.as_str());

    let mut lines = render_header(state, "FLIGHT MANAGER");
    lines.push(format!("Active: {active}"));
    for (row, item) in items.iter().enumerate().skip(start).take(VISIBLE_ROWS) {
        lines.push(marked(item, row == index));
    }
    lines.resize(8, String::new());
    lines.push("DO select  QUIT back".to_owned());
    LcdFrame::builder(lines)
        .highlight(Some(FIRST_ROW + index - start))
        .inverse([8])
        .footer(render_footer(state))
        .build()
}

fn handle(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    let flights = state.measurements.flight_ids();
    let ListAction::Activate(row) = handle_list_key(state, key, flights.len() + 1)? else {
        return Ok(());
    };
    match row.checked_sub(1).and_then(|row| flights.get(row)) {
        None => {
            let flight_id = state.measurements.next_flight_id();
            state.measurements.ensure_flight(flight_id.clone());
            info!(flight = %flight_id, "flight created");
            state.set_message(format!("New flight {flight_id}"));
            state.flight_id = Some(flight_id);
        }
        Some(flight_id) => {
            state.set_message(format!("Active Flight: {flight_id}"));
            state.flight_id = Some(flight_id.clone());
        }
    }
    Ok(())
}
