// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Key conventions shared by list screens, guarded screens and viewers.

use rads_app::selection::{scroll_clamped, selected, step_wrapping};
use rads_app::{Key, NavError, SimulatorState, global_shortcut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    /// The key was fully handled (moved, navigated or ignored).
    Handled,
    /// DO on the item at this row.
    Activate(usize),
}

/// Function keys jump to their section, UP/DOWN wrap the cursor over `len`
/// rows, QUIT goes back and DO reports the selected row. An empty list
/// ignores UP, DOWN and DO.
pub fn handle_list_key(
    state: &mut SimulatorState,
    key: Key,
    len: usize,
) -> Result<ListAction, NavError> {
    if global_shortcut(state, key)? {
        return Ok(ListAction::Handled);
    }
    match key {
        Key::Quit => state.back(),
        Key::Up | Key::Down => state.menu_index = step_wrapping(state.menu_index, key, len),
        Key::Do if len > 0 => {
            return Ok(ListAction::Activate(selected(state.menu_index, len)));
        }
        _ => {}
    }
    Ok(ListAction::Handled)
}

/// Missing-context screens honor only QUIT and the function keys.
pub fn handle_guard_key(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
    handle_list_key(state, key, 0).map(|_| ())
}

/// Paging viewers: UP/DOWN move a clamped offset, QUIT goes back.
pub fn handle_viewer_key(
    state: &mut SimulatorState,
    key: Key,
    body_len: usize,
    window: usize,
) -> Result<(), NavError> {
    if global_shortcut(state, key)? {
        return Ok(());
    }
    match key {
        Key::Up | Key::Down => {
            state.menu_index = scroll_clamped(state.menu_index, key, body_len, window);
        }
        Key::Quit => state.back(),
        _ => {}
    }
    Ok(())
}
