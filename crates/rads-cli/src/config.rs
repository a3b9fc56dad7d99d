// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rads_app::{ScreenId, ScreenRegistry, SimulatorState};
use rads_menus::measure::{AIRCRAFT_TYPES, FLIGHT_PLANS};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const MAX_TAIL_CHARS: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub diags: Diags,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            session: Session::default(),
            diags: Diags::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

/// Session context a fresh database starts with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Session {
    pub tail_number: Option<String>,
    pub aircraft_type: Option<String>,
    pub flight_plan: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Diags {
    pub option_120k: Option<bool>,
}

impl Default for Diags {
    fn default() -> Self {
        Self {
            option_120k: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub start_screen: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("RADS_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set RADS_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(rads_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and keep values under [storage], [session], [diags], and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with `rads --print-example-config`",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            rads_store::validate_db_path(db_path)?;
        }

        if let Some(tail) = &self.session.tail_number {
            let chars = tail.chars().count();
            if chars == 0 || chars > MAX_TAIL_CHARS || tail.chars().any(char::is_whitespace) {
                bail!(
                    "session.tail_number {:?} in {} must be 1-{} characters without spaces",
                    tail,
                    path.display(),
                    MAX_TAIL_CHARS
                );
            }
        }

        if let Some(aircraft) = &self.session.aircraft_type
            && !AIRCRAFT_TYPES.contains(&aircraft.as_str())
        {
            bail!(
                "session.aircraft_type {:?} in {} is not supported; use one of: {}",
                aircraft,
                path.display(),
                AIRCRAFT_TYPES.join(", ")
            );
        }

        if let Some(plan) = &self.session.flight_plan
            && !FLIGHT_PLANS.contains(&plan.as_str())
        {
            bail!(
                "session.flight_plan {:?} in {} is not supported; use one of: {}",
                plan,
                path.display(),
                FLIGHT_PLANS.join(", ")
            );
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => rads_store::default_db_path(),
        }
    }

    pub fn option_120k(&self) -> bool {
        self.diags.option_120k.unwrap_or(true)
    }

    /// Screen shown above the main menu at launch, if configured.
    pub fn start_screen(&self, screens: &ScreenRegistry) -> Result<Option<ScreenId>> {
        let Some(name) = self.ui.start_screen.as_deref() else {
            return Ok(None);
        };
        let id = screens.lookup(name).with_context(|| {
            let known = screens
                .ids()
                .map(|id| id.as_str())
                .collect::<Vec<&str>>()
                .join(", ");
            format!("ui.start_screen {name:?} is not a screen; use one of: {known}")
        })?;
        Ok(Some(id))
    }

    pub fn apply_session(&self, state: &mut SimulatorState) {
        state.tail_number = self.session.tail_number.clone();
        state.aircraft_type = self.session.aircraft_type.clone();
        state.flight_plan = self.session.flight_plan.clone();
        state.diag_options.option_120k = self.option_120k();
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# rads config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/rads/rads.db)\n# db_path = \"/absolute/path/to/rads.db\"\n\n[session]\n# Used until a session has been saved in the database.\n# tail_number = \"N412RA\"\n# aircraft_type = \"412\"   # one of: {}\n# flight_plan = \"TRACK\"   # one of: {}\n\n[diags]\n# Feed the 4R step from the 120KT run (false: 80KT).\noption_120k = true\n\n[ui]\n# start_screen = \"measure\"\n",
            path.display(),
            AIRCRAFT_TYPES.join(", "),
            FLIGHT_PLANS.join(", "),
        )
    }
}
