// rangefn CLI - call the custom functions through an in-process host

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rangefn_config::Settings;
use rangefn_core::ERROR_PREFIX;
use rangefn_functions::{
    register_all, FunctionSet, HostSlot, InMemoryHost, PollOutcome, PollPolicy, ReadinessPoller,
    EXPORTED_NAMES,
};
use serde_json::Value;

use exit_codes::{EXIT_ERROR, EXIT_FUNCTION_ERROR, EXIT_NOT_READY, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "rangefn")]
#[command(about = "Spreadsheet custom functions, hosted in-process")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// Settings file (default: <config dir>/rangefn/settings.json)
    #[arg(long, global = true, env = "RANGEFN_CONFIG")]
    config: Option<PathBuf>,

    /// Override remote.endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Override remote.timeoutMs (0 disables the timeout)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the exported function names
    List,

    /// Register the functions with a local host and call one
    #[command(after_help = "\
Each ARG is parsed as JSON; anything that is not valid JSON is passed as a string.

Examples:
  rangefn call ADDVALUE '[[1,2],[3,4]]' 10
  rangefn call ADDONE '[[1,2,3]]'
  rangefn call TEST ping")]
    Call {
        /// Function name (case-insensitive)
        name: String,

        /// Arguments, in order
        args: Vec<String>,
    },

    /// Show the effective settings
    Config {
        /// Print settings as JSON only
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("RANGEFN_COMMIT"), ")",
        "\ntarget:  ", env!("RANGEFN_TARGET"),
        "\nexports: ADDONE ADDVALUE TEST",
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn usage(message: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: message.into(), hint: None }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match load_settings(&cli) {
        Ok(settings) => match cli.command {
            Commands::List => cmd_list(),
            Commands::Call { name, args } => cmd_call(&settings, &name, &args),
            Commands::Config { json } => cmd_config(&cli.config, &settings, json),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path).map_err(|e| CliError::usage(e.to_string()))?,
        None => Settings::load(),
    };

    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(ms) = cli.timeout_ms {
        settings.timeout_ms = (ms > 0).then_some(ms);
    }
    Ok(settings)
}

fn cmd_list() -> Result<(), CliError> {
    for name in EXPORTED_NAMES {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_call(settings: &Settings, name: &str, raw_args: &[String]) -> Result<(), CliError> {
    let name = name.to_uppercase();
    if !EXPORTED_NAMES.contains(&name.as_str()) {
        return Err(CliError::usage(format!("unknown function: {}", name))
            .with_hint("run `rangefn list` to see available functions"));
    }

    let host = load_host(settings)?;
    let args: Vec<Value> = raw_args.iter().map(|a| parse_arg(a)).collect();

    let output = host.invoke(&name, &args).ok_or_else(|| CliError {
        code: EXIT_ERROR,
        message: format!("{} was not registered", name),
        hint: None,
    })?;

    let rendered = serde_json::to_string(&output).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })?;
    println!("{}", rendered);

    if is_error_cell(&output) {
        return Err(CliError { code: EXIT_FUNCTION_ERROR, message: String::new(), hint: None });
    }
    Ok(())
}

/// Run the same load sequence a spreadsheet host goes through: start the
/// poller, make the capability available, wait for registration.
fn load_host(settings: &Settings) -> Result<Arc<InMemoryHost>, CliError> {
    let functions = FunctionSet::from_settings(settings).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })?;

    let slot = Arc::new(HostSlot::new());
    let host = Arc::new(InMemoryHost::new());

    let handle = ReadinessPoller::new(PollPolicy::from_settings(settings))
        .spawn(Arc::clone(&slot), move |capability| {
            let report = register_all(capability.as_ref(), &functions);
            for (name, err) in &report.failed {
                log::warn!("{} unavailable: {}", name, err);
            }
        })
        .map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("failed to start readiness poller: {}", e),
            hint: None,
        })?;

    slot.install(host.clone());

    match handle.join() {
        Ok(PollOutcome::Ready { .. }) => Ok(host),
        Ok(PollOutcome::GaveUp { attempts }) => Err(CliError {
            code: EXIT_NOT_READY,
            message: format!("host not ready after {} checks", attempts),
            hint: None,
        }),
        Err(_) => Err(CliError {
            code: EXIT_ERROR,
            message: "readiness poller panicked".into(),
            hint: None,
        }),
    }
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn is_error_cell(value: &Value) -> bool {
    value
        .get(0)
        .and_then(|row| row.get(0))
        .and_then(Value::as_str)
        .is_some_and(|s| s.starts_with(ERROR_PREFIX))
}

fn cmd_config(path: &Option<PathBuf>, settings: &Settings, json: bool) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(settings).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })?;

    if !json {
        let path = path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(Settings::config_path_display);
        println!("# {}", path);
    }
    println!("{}", rendered);
    Ok(())
}
