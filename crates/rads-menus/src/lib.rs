// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! RADS-AT menu screens. Each module registers one cohesive group of
//! screens; [`register_all`] wires every group into a registry at boot.

pub mod diags;
pub mod display;
pub mod lcd;
pub mod list;
pub mod manager;
pub mod measure;
pub mod root;

use rads_app::{ScreenId, ScreenRegistry};

pub use rads_app::{DIAGS_SCREEN, DISPLAY_SCREEN, MANAGER_SCREEN, MEASURE_SCREEN};

pub const MAIN_SCREEN: ScreenId = ScreenId::new("main");
pub const MEASURE_AIRCRAFT_SCREEN: ScreenId = ScreenId::new("measure_aircraft");
pub const MEASURE_PLAN_SCREEN: ScreenId = ScreenId::new("measure_plan");
pub const MEASURE_ACQUIRE_SCREEN: ScreenId = ScreenId::new("measure_acquire");
pub const DISPLAY_SUMMARY_SCREEN: ScreenId = ScreenId::new("display_summary");
pub const DISPLAY_TRACK_SCREEN: ScreenId = ScreenId::new("display_track");
pub const DISPLAY_VIB_SCREEN: ScreenId = ScreenId::new("display_vib");
pub const DIAGS_VIEW_SCREEN: ScreenId = ScreenId::new("diags_view");

pub fn register_all(screens: &mut ScreenRegistry) {
    root::register(screens);
    measure::register(screens);
    display::register(screens);
    diags::register(screens);
    manager::register(screens);
}
