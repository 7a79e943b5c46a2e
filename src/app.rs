use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigError, ConfigFile, Credential, Settings};
use crate::output::{self, export, Theme, View};
use crate::runner::{LookupResult, Runner, RunnerError};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn warn_line(message: &str) {
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        "WRN".bold().yellow(),
        "]".bold().white(),
        message
    );
}

fn error_line(message: &str) {
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        "ERR".bold().red(),
        "]".bold().white(),
        message
    );
}

/// Flush failures on the terminal are logged, never fatal.
fn flush_stream(mut stream: impl Write, name: &str) -> bool {
    match stream.flush() {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(stream = name, error = %e, "flush failed");
            false
        }
    }
}

fn build_settings(
    args: &CliArgs,
    cfg: ConfigFile,
    credential: Option<Credential>,
) -> Result<Settings, ConfigError> {
    validation::validate(args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let timeout_seconds = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(config::DEFAULT_TIMEOUT_SECONDS);
    let timeout = config::check_timeout(timeout_seconds)?;

    let api_url = match args.api_url.clone().or(cfg.api_url) {
        Some(raw) => config::parse_api_url(&raw)?,
        None => Settings::default().api_url,
    };

    let view = match args.view.clone().or(cfg.view) {
        Some(raw) => config::parse_view(&raw)?,
        None => View::All,
    };

    let output_dir = args
        .output_dir
        .clone()
        .or(cfg.output_dir)
        .map(|p| config::expand_tilde(&p))
        .unwrap_or_else(|| PathBuf::from("."));

    let settings = Settings {
        api_url,
        credential,
        mock: args.mock || cfg.mock.unwrap_or(false),
        timeout,
        auto_map: args.auto_map.or(cfg.auto_map).unwrap_or(true),
        theme: Theme::from_dark_mode(args.dark || cfg.dark_mode.unwrap_or(false)),
        view,
        export: args.export || cfg.export.unwrap_or(false),
        output_dir,
        no_color,
    };
    settings.ensure_credential()?;
    Ok(settings)
}

fn load_config_for(args: &CliArgs) -> Result<ConfigFile, ConfigError> {
    match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
}

fn init_config(args: &CliArgs) -> Result<(), ConfigError> {
    let path = match args.config.as_deref() {
        Some(path) => config::expand_tilde(path),
        None => config::default_config_path().ok_or(ConfigError::NoHomeDir)?,
    };
    if config::ensure_default_config_file(&path)? {
        println!("wrote default config to {}", path.display());
    } else {
        println!("config already exists at {}", path.display());
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    let mode = if settings.mock { "mock" } else { "live" };
    format_kv_line("Mode", mode);
    if !settings.mock {
        format_kv_line("Endpoint", settings.api_url.as_str());
    }
    format_kv_line(
        "Timeout",
        &format!("{}s", settings.timeout.as_secs()),
    );
    format_kv_line("Auto-map", format_bool(settings.auto_map));
    if settings.export {
        format_kv_line("Export to", &settings.output_dir.display().to_string());
    }
    eprintln!();
}

fn fetching_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Fetching...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_result(result: &LookupResult, settings: &Settings) {
    print!("{}", output::render_status(result.status));
    if settings.view.shows_results() {
        println!("{}", "== Results ==".bold());
        print!("{}", output::render_results(&result.records, settings.theme));
    }
    if settings.view.shows_json() {
        println!("{}", "== JSON ==".bold());
        print!("{}", output::render_json(&result.raw));
    }
    flush_stream(io::stdout(), "stdout");
}

fn export_result(result: &LookupResult, settings: &Settings) {
    match export::export_to_dir(&settings.output_dir, &result.term, &result.records) {
        Ok(path) => format_kv_line("Exported", &path.display().to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "csv export failed");
            warn_line(&format!("CSV Error: {e}"));
        }
    }
}

/// One user action: lookup, render, and export when enabled.
fn run_lookup(runner: &Runner, term: &str) -> Result<(), RunnerError> {
    let pb = fetching_spinner();
    let result = runner.lookup(term);
    pb.finish_and_clear();
    let result = result?;

    let settings = runner.settings();
    print_result(&result, settings);
    if settings.export {
        export_result(&result, settings);
    }
    Ok(())
}

fn run_interactive(runner: &Runner) -> Result<(), String> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("{} ", "term>".bold());
        flush_stream(io::stderr(), "stderr");
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => return Err(format!("failed to read stdin: {e}")),
            None => break,
        };
        match run_lookup(runner, &line) {
            Ok(()) => println!(),
            Err(RunnerError::EmptyTerm) => error_line("Enter a search term"),
            Err(e) => return Err(e.to_string()),
        }
    }
    eprintln!();
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        return init_config(&args).map_err(|e| e.to_string());
    }

    let cfg = load_config_for(&args).map_err(|e| e.to_string())?;
    let settings =
        build_settings(&args, cfg, config::read_credential()).map_err(|e| e.to_string())?;

    if settings.no_color {
        colored::control::set_override(false);
    } else if args.color {
        colored::control::set_override(true);
    }
    crate::logging::init(args.verbose, !settings.no_color);

    print_settings(&settings);
    let runner = Runner::new(settings).map_err(|e| e.to_string())?;

    match args.term.as_deref() {
        Some(term) => run_lookup(&runner, term).map_err(|e| e.to_string()),
        None => run_interactive(&runner),
    }
}
