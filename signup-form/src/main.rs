//! signup-form - command-line front end for account registration
//!
//! Reads a registration draft from flags, environment, a JSON file or an
//! interactive prompt, validates it and submits it to the create-user
//! endpoint.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use signup_common::config::{ClientConfig, ConfigResolver};
use signup_common::{Field, RegistrationRecord, SubmissionStatus};
use signup_form::choices::{day_options, month_options, year_options};
use signup_form::logging;
use signup_form::render::{render_form, render_snapshot};
use signup_form::{validate_now, HttpTransport, RegistrationSession, SubmitOutcome};
use tracing::{info, warn};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const CANCEL_COMMAND: &str = ":cancel";

/// Command-line arguments for signup-form
#[derive(Parser, Debug)]
#[command(name = "signup-form")]
#[command(about = "Create a user account from the command line")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Create-user endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a registration without sending it
    Validate(RecordArgs),
    /// Validate a registration and submit it
    Submit(RecordArgs),
    /// Enter the registration field by field, then submit
    Interactive,
    /// List the birthday selector choices
    Options,
}

/// Registration values; flags override values from `--record`
#[derive(Args, Debug)]
struct RecordArgs {
    /// JSON file holding a registration record
    #[arg(long)]
    record: Option<PathBuf>,

    #[arg(long, env = "SIGNUP_FULL_NAME")]
    full_name: Option<String>,

    #[arg(long, env = "SIGNUP_CONTACT_NUMBER")]
    contact_number: Option<String>,

    #[arg(long, env = "SIGNUP_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "SIGNUP_DAY")]
    day: Option<String>,

    #[arg(long, env = "SIGNUP_MONTH")]
    month: Option<String>,

    #[arg(long, env = "SIGNUP_YEAR")]
    year: Option<String>,

    #[arg(long, env = "SIGNUP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, env = "SIGNUP_CONFIRM_PASSWORD", hide_env_values = true)]
    confirm_password: Option<String>,
}

impl RecordArgs {
    fn into_record(self) -> Result<RegistrationRecord> {
        let mut record = match &self.record {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read record file {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse record file {}", path.display()))?
            }
            None => RegistrationRecord::default(),
        };

        let overrides = [
            (Field::FullName, self.full_name),
            (Field::ContactNumber, self.contact_number),
            (Field::Email, self.email),
            (Field::Day, self.day),
            (Field::Month, self.month),
            (Field::Year, self.year),
            (Field::Password, self.password),
            (Field::ConfirmPassword, self.confirm_password),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                record.set(field, value);
            }
        }
        Ok(record)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Install logging before resolving config so its warnings are visible
    let (subscriber, log_level) =
        logging::subscriber(std::io::stderr, EnvFilter::try_from_default_env().ok());
    subscriber.init();

    info!(
        "Starting signup-form v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ConfigResolver::new()
        .with_cli_endpoint(cli.endpoint.clone())
        .with_cli_config_path(cli.config.clone())
        .resolve()
        .context("Failed to load configuration")?;

    if let Err(e) = log_level.apply_config_level(&config.log_level) {
        warn!("Could not apply log level {}: {}", config.log_level, e);
    }
    if let Some(path) = &config.config_file {
        info!("Config file: {}", path.display());
    }

    match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Submit(args) => run_submit(&config, args).await,
        Command::Interactive => run_interactive(&config).await,
        Command::Options => {
            run_options();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_session(config: &ClientConfig) -> Result<RegistrationSession<HttpTransport>> {
    let transport = HttpTransport::new(&config.endpoint, &config.user_agent)
        .context("Failed to set up the create-user client")?;
    info!("Create-user endpoint: {}", transport.endpoint());
    Ok(RegistrationSession::new(transport))
}

fn run_validate(args: RecordArgs) -> Result<ExitCode> {
    let record = args.into_record()?;
    let errors = validate_now(&record);

    print!("{}", render_form(&record, &errors, SubmissionStatus::None));

    Ok(if errors.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_submit(config: &ClientConfig, args: RecordArgs) -> Result<ExitCode> {
    let record = args.into_record()?;
    let session = build_session(config)?;
    session.set_record(record)?;

    let outcome = session.submit().await?;
    print!("{}", render_snapshot(&session.snapshot()?));

    Ok(exit_code(&outcome))
}

async fn run_interactive(config: &ClientConfig) -> Result<ExitCode> {
    let session = build_session(config)?;

    loop {
        println!(
            "Type {} in a text field or press Esc in a selector to clear the form.",
            CANCEL_COMMAND
        );

        let mut cancelled = false;
        for field in Field::ALL {
            let current = session.record()?.get(field).to_string();
            match prompt_field(field, &current)? {
                Some(value) => session.set_field(field, value)?,
                None => {
                    session.cancel()?;
                    cancelled = true;
                    break;
                }
            }
        }
        if cancelled {
            println!("Form cleared.\n");
            continue;
        }

        let outcome = session.submit().await?;
        print!("{}", render_snapshot(&session.snapshot()?));

        if !matches!(outcome, SubmitOutcome::Invalid(_)) {
            return Ok(exit_code(&outcome));
        }
        println!("\nPlease correct the fields above.");
    }
}

/// Prompt for one field; `None` means the user asked to cancel
///
/// Passwords are read without echo. Birthday parts are picked from the
/// selector lists.
fn prompt_field(field: Field, current: &str) -> Result<Option<String>> {
    match field {
        Field::Day => {
            let days: Vec<String> = day_options().iter().map(|d| d.to_string()).collect();
            select("Birthday day", &days, current)
        }
        Field::Month => {
            let months: Vec<String> = month_options().iter().map(|m| m.to_string()).collect();
            select("Birthday month", &months, current)
        }
        Field::Year => {
            let years: Vec<String> = year_options(signup_common::time::current_year())
                .iter()
                .map(|y| y.to_string())
                .collect();
            select("Birthday year", &years, current)
        }
        Field::Password | Field::ConfirmPassword => {
            let value = Password::new()
                .with_prompt(field.label())
                .allow_empty_password(true)
                .interact()?;
            Ok(unless_cancel(value))
        }
        _ => {
            let value: String = Input::new()
                .with_prompt(field.label())
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            Ok(unless_cancel(value))
        }
    }
}

fn select(prompt: &str, items: &[String], current: &str) -> Result<Option<String>> {
    let default = items.iter().position(|item| item == current).unwrap_or(0);
    let picked = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()?;
    Ok(picked.map(|index| items[index].clone()))
}

fn unless_cancel(value: String) -> Option<String> {
    if value.trim() == CANCEL_COMMAND {
        None
    } else {
        Some(value)
    }
}

fn run_options() {
    let days = day_options()
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let months = month_options()
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let years = year_options(signup_common::time::current_year())
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    println!("Day:   {}", days);
    println!("Month: {}", months);
    println!("Year:  {}", years);
}

fn exit_code(outcome: &SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Completed(SubmissionStatus::Success) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_flags(record: Option<PathBuf>) -> RecordArgs {
        RecordArgs {
            record,
            full_name: None,
            contact_number: None,
            email: None,
            day: None,
            month: None,
            year: None,
            password: None,
            confirm_password: None,
        }
    }

    fn record_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_flags_override_record_file() {
        let file = record_file(
            r#"{"full_name": "Ada", "email": "ada@example.com", "month": "Jan", "password": "Abcdefg1"}"#,
        );
        let mut args = no_flags(Some(file.path().to_path_buf()));
        args.email = Some("lovelace@example.com".to_string());
        args.day = Some("10".to_string());

        let record = args.into_record().unwrap();

        assert_eq!(record.full_name, "Ada");
        assert_eq!(record.email, "lovelace@example.com");
        assert_eq!(record.day, "10");
        assert_eq!(record.month, "Jan");
        assert_eq!(record.password, "Abcdefg1");
        assert_eq!(record.contact_number, "");
    }

    #[test]
    fn test_flags_without_record_file() {
        let mut args = no_flags(None);
        args.full_name = Some("Ada".to_string());

        let record = args.into_record().unwrap();

        assert_eq!(record.full_name, "Ada");
        assert_eq!(record.email, "");
    }

    #[test]
    fn test_malformed_record_file_is_error() {
        let file = record_file("{ not json");
        let err = no_flags(Some(file.path().to_path_buf())).into_record().unwrap_err();
        assert!(err.to_string().contains("Failed to parse record file"));
    }

    #[test]
    fn test_cancel_command_in_text_field() {
        assert_eq!(unless_cancel(" :cancel ".to_string()), None);
        assert_eq!(unless_cancel("Ada".to_string()), Some("Ada".to_string()));
    }
}
