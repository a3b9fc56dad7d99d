// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ScreenId;

pub const MEASURE_SCREEN: ScreenId = ScreenId::new("measure");
pub const DISPLAY_SCREEN: ScreenId = ScreenId::new("display");
pub const DIAGS_SCREEN: ScreenId = ScreenId::new("diags");
pub const MANAGER_SCREEN: ScreenId = ScreenId::new("manager");

/// The terminal's complete input alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Do,
    Quit,
    F1,
    F2,
    F3,
    F4,
}

impl Key {
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::Down,
        Self::Do,
        Self::Quit,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Do => "DO",
            Self::Quit => "QUIT",
            Self::F1 => "F1",
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }
}

/// Top-level sections reachable from anywhere through a function key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Measure,
    Display,
    Diags,
    Manager,
}

impl Section {
    pub const ALL: [Self; 4] = [Self::Measure, Self::Display, Self::Diags, Self::Manager];

    pub const fn for_key(key: Key) -> Option<Self> {
        match key {
            Key::F1 => Some(Self::Measure),
            Key::F2 => Some(Self::Display),
            Key::F3 => Some(Self::Diags),
            Key::F4 => Some(Self::Manager),
            Key::Up | Key::Down | Key::Do | Key::Quit => None,
        }
    }

    pub const fn key(self) -> Key {
        match self {
            Self::Measure => Key::F1,
            Self::Display => Key::F2,
            Self::Diags => Key::F3,
            Self::Manager => Key::F4,
        }
    }

    pub const fn screen_id(self) -> ScreenId {
        match self {
            Self::Measure => MEASURE_SCREEN,
            Self::Display => DISPLAY_SCREEN,
            Self::Diags => DIAGS_SCREEN,
            Self::Manager => MANAGER_SCREEN,
        }
    }

    /// Softkey caption shown in the footer bar.
    pub const fn softkey_label(self) -> &'static str {
        match self {
            Self::Measure => "MEAS",
            Self::Display => "DISP",
            Self::Diags => "DIAG",
            Self::Manager => "MGR",
        }
    }
}
