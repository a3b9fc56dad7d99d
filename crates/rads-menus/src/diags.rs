// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! BHT-412-MM step list and the paging viewer it hands step detail to.

use rads_app::selection::{max_scroll, selected};
use rads_app::{
    DIAGS_SCREEN, DiagHandoff, Footer, Key, LcdFrame, NavError, Screen, ScreenRegistry,
    SimulatorState, active_runs, step_detail, step_summaries,
};
use tracing::info;

use crate::DIAGS_VIEW_SCREEN;
use crate::lcd::{guard_frame, render_footer, render_header};
use crate::list::{ListAction, handle_guard_key, handle_list_key, handle_viewer_key};

const FIRST_STEP_ROW: usize = 4;
const VIEW_ROWS: usize = 5;

pub fn register(screens: &mut ScreenRegistry) {
    screens.register(Screen::new(
        DIAGS_SCREEN,
        "DIAGS",
        "BHT-412-MM troubleshooting steps",
        render_steps,
        handle_steps,
    ));
    screens.register(Screen::new(
        DIAGS_VIEW_SCREEN,
        "DIAGS / STEP",
        "Step detail",
        render_view,
        handle_view,
    ));
}

fn render_steps(state: &SimulatorState) -> LcdFrame {
    if !state.is_bht412() {
        return guard_frame(
            state,
            "DIAGS",
            &["", "BHT-412-MM only", "Select Bell 412 in MEASURE"],
        );
    }

    let (flight_id, runs) = active_runs(state);
    let steps = step_summaries(&runs, state.diag_options);
    let index = selected(state.menu_index, steps.len());
    let flight = flight_id.map_or_else(|| "(no flight)".to_owned(), |id| id.to_string());

    let mut lines = render_header(state, "DIAGS");
    lines.push(format!("BHT-412-MM  FLT {flight}"));
    for (number, step) in (1..).zip(&steps) {
        lines.push(format!("{number}. {:<28}{:>6}", step.label, step.status.tag()));
    }
    LcdFrame::builder(lines)
        .highlight(Some(FIRST_STEP_ROW + index))
        .footer(render_footer(state))
        .build()
}

fn handle_steps(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    if !state.is_bht412() {
        return handle_guard_key(state, key);
    }

    let (_, runs) = active_runs(state);
    let steps = step_summaries(&runs, state.diag_options);
    let ListAction::Activate(row) = handle_list_key(state, key, steps.len())? else {
        return Ok(());
    };
    let step = &steps[row];
    let (title, lines) = step_detail(&runs, step.step_id, state.diag_options);
    info!(step = step.step_id, status = step.status.as_str(), "diagnostic step opened");
    state.diag = Some(DiagHandoff { title, lines });
    state.navigate(DIAGS_VIEW_SCREEN)?;
    state.set_message(format!("DIAGS: {} ({})", step.step_id, step.status.as_str()));
    Ok(())
}

fn view_body(state: &SimulatorState) -> (&str, Vec<String>) {
    match &state.diag {
        Some(diag) if !diag.lines.is_empty() => (diag.title.as_str(), diag.lines.clone()),
        Some(diag) => (diag.title.as_str(), vec!["No data".to_owned()]),
        None => ("DIAGS", vec!["No data".to_owned()]),
    }
}

fn render_view(state: &SimulatorState) -> LcdFrame {
    let (title, body) = view_body(state);
    let start = state.menu_index.min(max_scroll(body.len(), VIEW_ROWS));

    let mut lines = render_header(state, title);
    lines.push(format!("Line {}/{}", start + 1, body.len()));
    lines.extend(body.into_iter().skip(start).take(VIEW_ROWS));
    LcdFrame::builder(lines)
        .footer(Footer::text("UP/DN Scroll  QUIT Back"))
        .build()
}

fn handle_view(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    let (_, body) = view_body(state);
    handle_viewer_key(state, key, body.len(), VIEW_ROWS)
}
