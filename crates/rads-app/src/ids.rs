// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry key of a screen. Screen ids are compiled into the registration
/// modules, so they are always `'static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenId(&'static str);

impl ScreenId {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(String);

impl FlightId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of ids shaped like `F100`.
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix('F')?.parse().ok()
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for FlightId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for FlightId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::FlightId;

    #[test]
    fn flight_number_parses_f_prefixed_ids() {
        assert_eq!(FlightId::from("F100").number(), Some(100));
        assert_eq!(FlightId::from("F7").number(), Some(7));
        assert_eq!(FlightId::from("TEST").number(), None);
        assert_eq!(FlightId::from("F").number(), None);
    }

    #[test]
    fn flight_ids_order_lexically() {
        let mut ids = vec![FlightId::from("F102"), FlightId::from("F100")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "F100");
    }

    #[test]
    fn display_honors_width() {
        assert_eq!(format!("{:<6}|", FlightId::from("F1")), "F1    |");
    }
}
