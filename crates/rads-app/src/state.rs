// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::{DiagHandoff, DiagOptions, FlightId, Key, LcdFrame, Measurements, ScreenId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// A screen id was pushed or resolved before anything registered it.
    UnknownScreen(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownScreen(id) => write!(
                f,
                "unknown screen `{id}`; register it before navigating to it"
            ),
        }
    }
}

impl std::error::Error for NavError {}

pub type RenderFn = fn(&SimulatorState) -> LcdFrame;
pub type HandleFn = fn(&mut SimulatorState, Key) -> Result<(), NavError>;

/// A registered screen. Screens carry no mutable state of their own; all of
/// it lives in [`SimulatorState`].
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    pub id: ScreenId,
    pub title: &'static str,
    pub help_text: &'static str,
    render: RenderFn,
    handle: HandleFn,
}

impl Screen {
    pub const fn new(
        id: ScreenId,
        title: &'static str,
        help_text: &'static str,
        render: RenderFn,
        handle: HandleFn,
    ) -> Self {
        Self {
            id,
            title,
            help_text,
            render,
            handle,
        }
    }

    pub fn render(&self, state: &SimulatorState) -> LcdFrame {
        (self.render)(state)
    }

    pub fn handle(&self, state: &mut SimulatorState, key: Key) -> Result<(), NavError> {
        (self.handle)(state, key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenRegistry {
    screens: BTreeMap<ScreenId, Screen>,
}

impl ScreenRegistry {
    /// Inserts `screen`, replacing any earlier registration for its id.
    pub fn register(&mut self, screen: Screen) -> Option<Screen> {
        let previous = self.screens.insert(screen.id, screen);
        if previous.is_some() {
            debug!(screen = %screen.id, "screen registration replaced");
        }
        previous
    }

    pub fn resolve(&self, id: ScreenId) -> Result<Screen, NavError> {
        self.screens
            .get(&id)
            .copied()
            .ok_or_else(|| NavError::UnknownScreen(id.as_str().to_owned()))
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.screens.contains_key(&id)
    }

    /// Maps a textual id (config, scripts) onto a registered screen.
    pub fn lookup(&self, name: &str) -> Result<ScreenId, NavError> {
        self.screens
            .keys()
            .copied()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| NavError::UnknownScreen(name.to_owned()))
    }

    pub fn ids(&self) -> impl Iterator<Item = ScreenId> + '_ {
        self.screens.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

/// Screen stack whose root can never be popped, so it is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStack {
    root: ScreenId,
    above: Vec<ScreenId>,
}

impl NavStack {
    pub fn new(root: ScreenId) -> Self {
        Self {
            root,
            above: Vec::new(),
        }
    }

    pub fn push(&mut self, id: ScreenId) {
        self.above.push(id);
    }

    /// Removes the top frame. At the root this is a no-op returning `None`.
    pub fn pop(&mut self) -> Option<ScreenId> {
        self.above.pop()
    }

    pub fn current(&self) -> ScreenId {
        self.above.last().copied().unwrap_or(self.root)
    }

    pub fn root(&self) -> ScreenId {
        self.root
    }

    pub fn depth(&self) -> usize {
        self.above.len() + 1
    }

    /// Bottom to top.
    pub fn ids(&self) -> impl Iterator<Item = ScreenId> + '_ {
        std::iter::once(self.root).chain(self.above.iter().copied())
    }
}

/// The one mutable context shared by every screen of a session.
///
/// `menu_index` belongs to whichever screen is on top of the stack. List
/// screens read it as a wrapping selection cursor, viewer screens read it as
/// a clamped scroll offset. [`SimulatorState::navigate`] and
/// [`SimulatorState::back`] zero it on every change of top screen so one
/// screen never inherits another's meaning.
#[derive(Debug, Clone)]
pub struct SimulatorState {
    screens: ScreenRegistry,
    stack: NavStack,
    pub menu_index: usize,
    pub flight_id: Option<FlightId>,
    pub tail_number: Option<String>,
    pub flight_plan: Option<String>,
    pub aircraft_type: Option<String>,
    pub measurements: Measurements,
    pub diag: Option<DiagHandoff>,
    pub diag_options: DiagOptions,
    pub last_message: Option<String>,
}

impl SimulatorState {
    /// Seals a populated registry into a fresh session rooted at `root`.
    pub fn boot(screens: ScreenRegistry, root: ScreenId) -> Result<Self, NavError> {
        screens.resolve(root)?;
        debug!(root = %root, screens = screens.len(), "session booted");
        Ok(Self {
            screens,
            stack: NavStack::new(root),
            menu_index: 0,
            flight_id: None,
            tail_number: None,
            flight_plan: None,
            aircraft_type: None,
            measurements: Measurements::default(),
            diag: None,
            diag_options: DiagOptions::default(),
            last_message: None,
        })
    }

    pub fn screens(&self) -> &ScreenRegistry {
        &self.screens
    }

    pub fn stack(&self) -> &NavStack {
        &self.stack
    }

    pub fn current(&self) -> ScreenId {
        self.stack.current()
    }

    pub fn current_screen(&self) -> Result<Screen, NavError> {
        self.screens.resolve(self.current())
    }

    /// Raw push. Callers reset `menu_index` themselves; prefer
    /// [`SimulatorState::navigate`].
    pub fn push(&mut self, id: ScreenId) -> Result<(), NavError> {
        self.screens.resolve(id)?;
        self.stack.push(id);
        debug!(screen = %id, depth = self.stack.depth(), "push");
        Ok(())
    }

    /// Raw pop; returns whether a frame was removed.
    pub fn pop(&mut self) -> bool {
        match self.stack.pop() {
            Some(id) => {
                debug!(screen = %id, depth = self.stack.depth(), "pop");
                true
            }
            None => false,
        }
    }

    pub fn navigate(&mut self, id: ScreenId) -> Result<(), NavError> {
        self.push(id)?;
        self.menu_index = 0;
        Ok(())
    }

    pub fn back(&mut self) {
        self.pop();
        self.menu_index = 0;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "status");
        self.last_message = Some(message);
    }

    /// Whether the selected aircraft is a Bell 412 variant.
    pub fn is_bht412(&self) -> bool {
        self.aircraft_type
            .as_deref()
            .is_some_and(|code| code.starts_with("412"))
    }
}

#[cfg(test)]
mod tests {
    use super::{NavError, NavStack, Screen, ScreenRegistry, SimulatorState};
    use crate::{Key, LcdFrame, ScreenId};

    const ROOT: ScreenId = ScreenId::new("root");
    const CHILD: ScreenId = ScreenId::new("child");

    fn blank(_: &SimulatorState) -> LcdFrame {
        LcdFrame::builder(["blank"]).build()
    }

    fn titled(_: &SimulatorState) -> LcdFrame {
        LcdFrame::builder(["titled"]).build()
    }

    fn ignore(_: &mut SimulatorState, _: Key) -> Result<(), NavError> {
        Ok(())
    }

    fn registry() -> ScreenRegistry {
        let mut screens = ScreenRegistry::default();
        screens.register(Screen::new(ROOT, "ROOT", "", blank, ignore));
        screens.register(Screen::new(CHILD, "CHILD", "", blank, ignore));
        screens
    }

    #[test]
    fn last_registration_wins() -> Result<(), NavError> {
        let mut screens = registry();
        let previous = screens.register(Screen::new(CHILD, "CHILD 2", "", titled, ignore));
        assert!(previous.is_some());
        assert_eq!(screens.len(), 2);

        let state = SimulatorState::boot(screens.clone(), ROOT)?;
        let child = screens.resolve(CHILD)?;
        assert_eq!(child.title, "CHILD 2");
        assert!(child.render(&state).contains_text("titled"));
        Ok(())
    }

    #[test]
    fn resolve_and_lookup_fail_for_unregistered_ids() {
        let screens = registry();
        assert_eq!(
            screens.resolve(ScreenId::new("ghost")).err(),
            Some(NavError::UnknownScreen("ghost".to_owned()))
        );
        assert!(screens.lookup("ghost").is_err());
        assert_eq!(screens.lookup("child").ok(), Some(CHILD));
    }

    #[test]
    fn boot_rejects_unregistered_root() {
        let error = SimulatorState::boot(ScreenRegistry::default(), ROOT)
            .expect_err("empty registry cannot boot");
        assert!(error.to_string().contains("unknown screen `root`"));
    }

    #[test]
    fn push_rejects_unknown_screen_and_leaves_stack_alone() -> Result<(), NavError> {
        let mut state = SimulatorState::boot(registry(), ROOT)?;
        let error = state.push(ScreenId::new("ghost")).expect_err("ghost is unregistered");
        assert_eq!(error, NavError::UnknownScreen("ghost".to_owned()));
        assert_eq!(state.stack().depth(), 1);
        assert_eq!(state.current(), ROOT);
        Ok(())
    }

    #[test]
    fn pop_at_root_is_a_no_op() -> Result<(), NavError> {
        let mut state = SimulatorState::boot(registry(), ROOT)?;
        let before = state.stack().clone();
        assert!(!state.pop());
        assert_eq!(state.stack(), &before);

        state.back();
        assert_eq!(state.current(), ROOT);
        assert_eq!(state.stack().depth(), 1);
        Ok(())
    }

    #[test]
    fn navigate_and_back_zero_the_cursor() -> Result<(), NavError> {
        let mut state = SimulatorState::boot(registry(), ROOT)?;
        state.menu_index = 3;
        state.navigate(CHILD)?;
        assert_eq!(state.current(), CHILD);
        assert_eq!(state.menu_index, 0);

        state.menu_index = 2;
        state.back();
        assert_eq!(state.current(), ROOT);
        assert_eq!(state.menu_index, 0);
        Ok(())
    }

    #[test]
    fn stack_lists_frames_bottom_to_top() {
        let mut stack = NavStack::new(ROOT);
        stack.push(CHILD);
        stack.push(CHILD);
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.ids().collect::<Vec<_>>(), vec![ROOT, CHILD, CHILD]);
        assert_eq!(stack.pop(), Some(CHILD));
        assert_eq!(stack.root(), ROOT);
    }

    #[test]
    fn bht412_detection_uses_type_prefix() -> Result<(), NavError> {
        let mut state = SimulatorState::boot(registry(), ROOT)?;
        assert!(!state.is_bht412());
        state.aircraft_type = Some("206".to_owned());
        assert!(!state.is_bht412());
        state.aircraft_type = Some("412EP".to_owned());
        assert!(state.is_bht412());
        Ok(())
    }
}
