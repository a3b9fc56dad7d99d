// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rads_app::{Key, LcdFrame, SimulatorState, dispatch, render_current};
use rads_store::Store;

/// Saves the session to the store after every handled key.
pub struct StoreRuntime<'a> {
    store: &'a Store,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl rads_tui::SessionRuntime for StoreRuntime<'_> {
    fn persist(&mut self, state: &SimulatorState) -> Result<()> {
        self.store.save_state(state)
    }
}

/// Headless replay: feeds `keys` in order and returns the final frame. With
/// no keys it is the frame of the start screen.
pub fn replay(state: &mut SimulatorState, keys: &[Key]) -> Result<LcdFrame> {
    let mut frame = render_current(state).context("render start screen")?;
    for (position, key) in keys.iter().enumerate() {
        frame = dispatch(state, *key).with_context(|| {
            format!(
                "key {} ({}) on screen {}",
                position + 1,
                key.as_str(),
                state.current()
            )
        })?;
    }
    Ok(frame)
}
