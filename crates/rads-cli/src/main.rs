// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use logging::{LogTarget, Verbosity};
use rads_app::{Key, ScreenRegistry, SimulatorState};
use rads_store::Store;
use runtime::{StoreRuntime, replay};
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `rads --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let headless = options.check_only || options.keys.is_some();
    let log_target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(logging::log_file_for(&db_path))
    };
    logging::init(
        Verbosity::from_flags(options.verbose, options.quiet),
        &log_target,
    )?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or RADS_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        store.seed_demo_data()?;
    }

    let mut screens = ScreenRegistry::default();
    rads_menus::register_all(&mut screens);
    let start = config
        .start_screen(&screens)
        .with_context(|| format!("invalid [ui] config in {}", options.config_path.display()))?;

    let mut state = SimulatorState::boot(screens, rads_menus::MAIN_SCREEN)?;
    config.apply_session(&mut state);
    store.restore_state(&mut state)?;
    if let Some(start) = start {
        state.navigate(start)?;
    }
    info!(
        db = %db_path.display(),
        screen = %state.current(),
        flights = state.measurements.len(),
        "session ready"
    );

    if options.check_only {
        return Ok(());
    }

    if let Some(keys) = &options.keys {
        let frame = replay(&mut state, keys)?;
        store.save_state(&state)?;
        println!("{}", frame.to_text());
        if let Some(message) = &state.last_message {
            println!("{message}");
        }
        return Ok(());
    }

    let mut runtime = StoreRuntime::new(&store);
    rads_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    keys: Option<Vec<Key>>,
    verbose: bool,
    quiet: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        keys: None,
        verbose: false,
        quiet: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--keys" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow!("--keys requires a comma-separated key list, for example F1,DOWN,DO")
                })?;
                options.keys = Some(parse_keys(value.as_ref())?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--verbose" | "-v" => {
                options.verbose = true;
            }
            "--quiet" | "-q" => {
                options.quiet = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

/// An empty list is allowed and replays nothing.
fn parse_keys(raw: &str) -> Result<Vec<Key>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|name| {
            Key::parse(name).ok_or_else(|| {
                anyhow!(
                    "unknown key {:?} in --keys; use UP, DOWN, DO, QUIT, F1, F2, F3 or F4",
                    name.trim()
                )
            })
        })
        .collect()
}

fn print_help() {
    println!("rads: RADS-AT rotor diagnostic terminal");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with seeded demo data (in-memory)");
    println!("  --check                  Validate config + DB + screen registry");
    println!("  --keys <K,K,...>         Replay keys headless and print the final LCD");
    println!("  -v, --verbose            Debug logging");
    println!("  -q, --quiet              Errors only");
    println!("  --help                   Show this help");
}
