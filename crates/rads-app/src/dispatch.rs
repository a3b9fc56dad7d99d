// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::debug;

use crate::{Key, LcdFrame, NavError, Section, SimulatorState};

/// Runs one key through the top screen, then renders whatever is on top
/// afterwards. `handle` always completes before `render` starts.
pub fn dispatch(state: &mut SimulatorState, key: Key) -> Result<LcdFrame, NavError> {
    let screen = state.current_screen()?;
    screen.handle(state, key)?;
    let current = state.current();
    if current != screen.id {
        debug!(key = key.as_str(), from = %screen.id, to = %current, "transition");
    }
    render_current(state)
}

pub fn render_current(state: &SimulatorState) -> Result<LcdFrame, NavError> {
    Ok(state.current_screen()?.render(state))
}

/// F1-F4 jump straight to a top-level section from any depth. The jump is
/// always a push at row 0, never an unwind, so repeated presses grow the
/// stack. Returns whether `key` was a shortcut.
pub fn global_shortcut(state: &mut SimulatorState, key: Key) -> Result<bool, NavError> {
    let Some(section) = Section::for_key(key) else {
        return Ok(false);
    };
    state.navigate(section.screen_id())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{dispatch, global_shortcut, render_current};
    use crate::{
        DIAGS_SCREEN, DISPLAY_SCREEN, Key, LcdFrame, MANAGER_SCREEN, MEASURE_SCREEN, NavError,
        Screen, ScreenId, ScreenRegistry, SimulatorState,
    };

    const ROOT: ScreenId = ScreenId::new("root");

    fn render_id(state: &SimulatorState) -> LcdFrame {
        LcdFrame::builder([state.current().as_str()]).build()
    }

    fn handle_shortcuts(state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
        if global_shortcut(state, key)? {
            return Ok(());
        }
        match key {
            Key::Quit => state.back(),
            Key::Down => state.menu_index += 1,
            Key::Do => state.navigate(ScreenId::new("nowhere"))?,
            _ => {}
        }
        Ok(())
    }

    fn state() -> Result<SimulatorState, NavError> {
        let mut screens = ScreenRegistry::default();
        for id in [ROOT, MEASURE_SCREEN, DISPLAY_SCREEN, DIAGS_SCREEN, MANAGER_SCREEN] {
            screens.register(Screen::new(id, "T", "", render_id, handle_shortcuts));
        }
        SimulatorState::boot(screens, ROOT)
    }

    #[test]
    fn dispatch_renders_the_new_top_screen() -> Result<(), NavError> {
        let mut state = state()?;
        let frame = dispatch(&mut state, Key::F2)?;
        assert!(frame.contains_text("display"));
        assert_eq!(render_current(&state)?, frame);
        Ok(())
    }

    #[test]
    fn shortcuts_push_without_unwinding() -> Result<(), NavError> {
        let mut state = state()?;
        for key in [Key::F2, Key::F3, Key::F4, Key::F2, Key::F1] {
            dispatch(&mut state, Key::Down)?;
            dispatch(&mut state, key)?;
            assert_eq!(state.menu_index, 0);
        }
        assert_eq!(state.current(), MEASURE_SCREEN);
        assert_eq!(state.stack().depth(), 6);
        Ok(())
    }

    #[test]
    fn shortcut_to_current_section_still_pushes() -> Result<(), NavError> {
        let mut state = state()?;
        dispatch(&mut state, Key::F1)?;
        dispatch(&mut state, Key::Down)?;
        dispatch(&mut state, Key::F1)?;
        dispatch(&mut state, Key::F1)?;
        assert_eq!(state.stack().depth(), 4);
        assert_eq!(state.current(), MEASURE_SCREEN);
        assert_eq!(state.menu_index, 0);
        Ok(())
    }

    #[test]
    fn unknown_push_from_handle_surfaces_error() -> Result<(), NavError> {
        let mut state = state()?;
        let error = dispatch(&mut state, Key::Do).expect_err("nowhere is unregistered");
        assert_eq!(error, NavError::UnknownScreen("nowhere".to_owned()));
        assert_eq!(state.current(), ROOT);
        Ok(())
    }
}
