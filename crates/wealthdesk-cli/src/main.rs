// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;
use wealthdesk_app::AppState;
use wealthdesk_store::Store;

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
            "load config {}; run `wealthdesk --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_dir = config.log_dir()?;
    if let Err(error) = logging::init(&log_dir, config.log_level()) {
        eprintln!("logging disabled: {error}");
    }

    let fixture_path = options.fixture_path.or_else(|| config.fixture_path());
    let store = match &fixture_path {
        Some(path) => Store::load_fixture(path).with_context(|| {
            format!(
                "open fixture {} -- fix the file, or drop --fixture and [data].fixture_path to use demo data",
                path.display()
            )
        })?,
        None => Store::open_demo(),
    };

    let today = OffsetDateTime::now_utc().date();
    let ui_options = config.ui_options(today)?;
    if options.check_only {
        return Ok(());
    }

    let mut state = AppState {
        active_tab: config.start_tab(),
        ..AppState::default()
    };
    info!(
        fixture = ?fixture_path,
        start_tab = state.active_tab.label(),
        "starting wealthdesk"
    );
    let mut runtime = StoreRuntime::new(store);
    wealthdesk_tui::run_app(&mut state, &mut runtime, ui_options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    fixture_path: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        fixture_path: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--fixture" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--fixture requires a JSON file path"))?;
                wealthdesk_store::validate_fixture_path(value.as_ref())?;
                options.fixture_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("wealthdesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --fixture <path>         Load clients, reports, plans and calendar from JSON");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config + fixture and exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/wealthdesk-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                fixture_path: None,
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_fixture_paths() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--config",
                "/custom/config.toml",
                "--fixture",
                "/data/advisory.json",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(
            options.fixture_path,
            Some(PathBuf::from("/data/advisory.json"))
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--fixture"], default_options_path())
            .expect_err("missing fixture value should fail");
        assert!(error.to_string().contains("--fixture requires"));
    }

    #[test]
    fn parse_cli_args_rejects_uri_fixture() {
        let error = parse_cli_args(
            vec!["--fixture", "https://example.com/clients.json"],
            default_options_path(),
        )
        .expect_err("URI fixture should fail");
        assert!(error.to_string().contains("looks like a URI"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--demo"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
