// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rads_app::selection::selected;
use rads_app::{
    DIAGS_SCREEN, DISPLAY_SCREEN, Key, LcdFrame, MANAGER_SCREEN, MEASURE_SCREEN, NavError, Screen,
    ScreenId, ScreenRegistry, SimulatorState,
};

use crate::MAIN_SCREEN;
use crate::lcd::{context_line, marked, render_footer, render_header};
use crate::list::{ListAction, handle_list_key};

const ITEMS: [(&str, ScreenId); 4] = [
    ("Measure", MEASURE_SCREEN),
    ("Display", DISPLAY_SCREEN),
    ("Diags", DIAGS_SCREEN),
    ("Flight Manager", MANAGER_SCREEN),
];
const FIRST_ITEM_ROW: usize = 4;

pub fn register(screens: &mut ScreenRegistry) {
    screens.register(Screen::new(
        MAIN_SCREEN,
        "MAIN MENU",
        "RADS-AT top level",
        render,
        handle,
    ));
}

fn render(state: &SimulatorState) -> LcdFrame {
    let index = selected(state.menu_index, ITEMS.len());
    let mut lines = render_header(state, "MAIN MENU");
    lines.push(String::new());
    for (row, (label, _)) in ITEMS.iter().enumerate() {
        lines.push(marked(label, row == index));
    }
    lines.push(context_line(state));
    LcdFrame::builder(lines)
        .highlight(Some(FIRST_ITEM_ROW + index))
        .footer(render_footer(state))
        .build()
}

fn handle(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    if let ListAction::Activate(row) = handle_list_key(state, key, ITEMS.len())? {
        state.navigate(ITEMS[row].1)?;
    }
    Ok(())
}
