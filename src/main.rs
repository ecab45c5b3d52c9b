// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Operator CLI for the credential and notification documents
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

use bloodbank_notify::notify_core::errors::StoreError;
use bloodbank_notify::notify_core::models::VerifyOutcome;
use bloodbank_notify::store;
use bloodbank_notify::utils::time::timestamp;
use bloodbank_notify::{AccountNotifier, Config};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// YAML config file (defaults to environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding otps.json and notifications.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the data directory and seed empty documents
    Init,
    /// One-time codes
    Otp {
        #[command(subcommand)]
        action: OtpCommand,
    },
    /// Password-reset tokens
    Reset {
        #[command(subcommand)]
        action: ResetCommand,
    },
    /// Record a simulated message
    Notify {
        #[command(subcommand)]
        action: NotifyCommand,
    },
    /// List a recipient's messages, most recent first
    History {
        recipient: String,
        #[arg(long)]
        json: bool,
    },
    /// Purge every expired credential
    Sweep,
}

#[derive(Subcommand, Debug)]
enum OtpCommand {
    Issue {
        identifier: String,
        #[arg(long, default_value = "verification")]
        purpose: String,
        /// Lifetime in minutes
        #[arg(long)]
        ttl: Option<u32>,
        #[arg(long)]
        length: Option<usize>,
    },
    Verify {
        identifier: String,
        code: String,
    },
    Status {
        identifier: String,
    },
}

#[derive(Subcommand, Debug)]
enum ResetCommand {
    /// Generate, store and email a reset token
    Issue { email: String, username: String },
    Verify { email: String, token: String },
}

#[derive(Subcommand, Debug)]
enum NotifyCommand {
    Email {
        recipient: String,
        subject: String,
        body: String,
    },
    Sms {
        recipient: String,
        body: String,
    },
    /// Registration welcome email
    Welcome { recipient: String, username: String },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::from_env().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to load config from env, using defaults: {}",
                e
            );
            Config::default()
        }),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to init tracing: {}", e);
    }
    install_panic_hook();
    debug!(
        credentials = %config.credentials_path().display(),
        notifications = %config.notifications_path().display(),
        "Configuration loaded"
    );

    match run(cli.command, &config) {
        Err(e) => match e.downcast_ref::<StoreError>() {
            // Operators get the short message; the path and cause go to the log.
            Some(store_err) => {
                error!(kind = store_err.kind(), error = %store_err, "Store operation failed");
                eprintln!("{}", store_err.user_message());
                Ok(ExitCode::from(2))
            }
            None => Err(e),
        },
        ok => ok,
    }
}

fn run(command: Command, config: &Config) -> anyhow::Result<ExitCode> {
    let notifier = AccountNotifier::open(config);

    match command {
        Command::Init => {
            let seeded = store::init_data_dir(&config.data_dir)?;
            println!("Seeded {} document(s) in {}", seeded, config.data_dir.display());
        }

        Command::Otp { action } => match action {
            OtpCommand::Issue {
                identifier,
                purpose,
                ttl,
                length,
            } => {
                let otp = match length {
                    Some(n) => notifier.tokens.generate_otp_with_length(n),
                    None => notifier.tokens.generate_otp(),
                };
                let ttl = ttl.unwrap_or(config.otp_ttl_minutes);
                notifier
                    .tokens
                    .store_otp_with_ttl(&identifier, &otp, &purpose, ttl)?;
                println!("{}", otp);
            }
            OtpCommand::Verify { identifier, code } => {
                let outcome = notifier.tokens.verify_otp(&identifier, &code)?;
                return Ok(report(outcome));
            }
            OtpCommand::Status { identifier } => {
                let expires_at = match notifier.tokens.entry(&identifier) {
                    Ok(entry) => Some(entry.expires_at),
                    Err(StoreError::NotFound(_)) => None,
                    Err(e) => return Err(e.into()),
                };
                let state = notifier.tokens.credential_state(&identifier);
                let verified = notifier.tokens.is_otp_verified(&identifier);
                match expires_at {
                    Some(at) => println!(
                        "{} verified={} expires_at={}",
                        state.as_str(),
                        verified,
                        timestamp::format(&at)
                    ),
                    None => println!("{} verified={}", state.as_str(), verified),
                }
            }
        },

        Command::Reset { action } => match action {
            ResetCommand::Issue { email, username } => {
                let token = notifier.initiate_password_reset(&email, &username)?;
                println!("{}", token);
            }
            ResetCommand::Verify { email, token } => {
                let outcome = notifier.complete_password_reset(&email, &token)?;
                return Ok(report(outcome));
            }
        },

        Command::Notify { action } => match action {
            NotifyCommand::Email {
                recipient,
                subject,
                body,
            } => notifier
                .notifications
                .send_email_notification(&recipient, &subject, &body)?,
            NotifyCommand::Sms { recipient, body } => notifier
                .notifications
                .send_sms_notification(&recipient, &body)?,
            NotifyCommand::Welcome {
                recipient,
                username,
            } => notifier.register(&recipient, &username)?,
        },

        Command::History { recipient, json } => {
            let records = notifier.notifications.get_user_notifications(&recipient);
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!(
                        "{}  {:<5}  {}",
                        timestamp::format(&record.timestamp),
                        record.channel,
                        record
                            .subject
                            .as_deref()
                            .unwrap_or_else(|| record.body.trim())
                    );
                }
            }
        }

        Command::Sweep => {
            let removed = notifier.tokens.sweep_expired()?;
            println!("Removed {} expired credential(s)", removed);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn report(outcome: VerifyOutcome) -> ExitCode {
    println!("{}", outcome.as_str());
    if outcome.is_verified() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Route panics through tracing so they land in the same stream, and in the
/// same format, as the rest of the log. The default hook still runs after.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        error!(location = %location, "bloodbank-notify panicked: {}", info);
        default_hook(info);
    }));
}

/// `RUST_LOG` wins over the configured level. Unparseable directives are
/// dropped rather than failing startup.
fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::EnvFilter;

    let directives =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| config.log_level.clone());
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.log_format.as_str() {
        "json" => builder.json().flatten_event(true).try_init(),
        _ => builder.compact().try_init(),
    }
}
