// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Header, footer and fallback layouts shared by every screen.

use rads_app::{Footer, LCD_COLS, LCD_ROWS, LcdFrame, Section, SimulatorState, Softkey};

pub const HEADER_ROWS: usize = 3;
const TITLE_COLS: usize = 26;

/// The three fixed rows at the top of every screen: unit banner, screen
/// title with aircraft and tail, and a rule.
pub fn render_header(state: &SimulatorState, title: &str) -> Vec<String> {
    let title: String = title.chars().take(TITLE_COLS).collect();
    let aircraft = [state.aircraft_type.as_deref(), state.tail_number.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<&str>>()
        .join(" ");
    let aircraft: String = aircraft.chars().take(LCD_COLS - TITLE_COLS).collect();
    vec![
        format!("{:<20}{:>18}", "RADS-AT", "SCIENTIFIC ATLANTA"),
        format!(
            "{title:<title_cols$}{aircraft:>aircraft_cols$}",
            title_cols = TITLE_COLS,
            aircraft_cols = LCD_COLS - TITLE_COLS
        ),
        "-".repeat(LCD_COLS),
    ]
}

/// Softkey bar for the sections other than the one on top of the stack.
pub fn render_footer(state: &SimulatorState) -> Footer {
    let current = state.current();
    Footer::Softkeys(
        Section::ALL
            .into_iter()
            .filter(|section| section.screen_id() != current)
            .map(|section| Softkey {
                key: section.key(),
                label: section.softkey_label(),
            })
            .collect(),
    )
}

pub fn context_line(state: &SimulatorState) -> String {
    let tail = state.tail_number.as_deref().unwrap_or("-");
    let plan = state.flight_plan.as_deref().unwrap_or("-");
    let flight = state
        .flight_id
        .as_ref()
        .map_or("-", |flight_id| flight_id.as_str());
    format!("Tail:{tail}  Plan:{plan}  F:{flight}")
}

/// `> item` for the selected row, `  item` otherwise.
pub fn marked(item: &str, is_selected: bool) -> String {
    let prefix = if is_selected { '>' } else { ' ' };
    format!("{prefix} {item}")
}

/// Short guidance frame for screens whose precondition is unmet: header,
/// the guidance lines, blank padding and an inverse bottom row.
pub fn guard_frame(state: &SimulatorState, title: &str, guidance: &[&str]) -> LcdFrame {
    let mut lines = render_header(state, title);
    lines.extend(guidance.iter().map(|line| (*line).to_owned()));
    LcdFrame::builder(lines)
        .inverse([LCD_ROWS - 1])
        .footer(render_footer(state))
        .build()
}
