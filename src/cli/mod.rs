use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod directory;
pub mod mail;
pub mod schedule;
pub mod serve;
pub mod token;
pub mod workspace;

use crate::core::AppConfig;
use crate::scheduler::recurrence::RecurrenceMode;

#[derive(Subcommand)]
enum Command {
    /// Show the signed in user's profile
    Me {},
    /// Show the claims carried by the bearer token
    Token {},
    /// List meetings in the coming days
    Meetings {
        #[arg(long, default_value = "7")]
        days: i64,
    },
    /// List chats, optionally with their members
    Chats {
        #[arg(long, action, default_value = "false")]
        members: bool,
    },
    /// List joined teams and their channels
    Teams {
        #[arg(long, action, default_value = "false")]
        channels: bool,
    },
    /// Find the first time all attendees can meet
    FindTime {
        /// Attendee email address, repeat for several
        #[arg(long = "attendee", required = true)]
        attendees: Vec<String>,
        #[arg(long, default_value = "30")]
        duration: i64,
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        #[arg(long, env = "GRAPHDESK_TENANT_DOMAIN")]
        tenant_domain: Option<String>,
        #[arg(long, action, default_value = "false")]
        work_hours: bool,
        /// Book the slot that was found
        #[arg(long, action, default_value = "false")]
        book: bool,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, value_enum)]
        recurrence: Option<RecurrenceMode>,
        #[arg(long, default_value = "1")]
        occurrences: u32,
    },
    /// Query users by one or two attributes
    Users {
        #[arg(long)]
        field: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        field2: Option<String>,
        #[arg(long)]
        value2: Option<String>,
    },
    /// Count the distinct values of an attribute
    Attributes {
        #[arg(long, default_value = "department")]
        primary: String,
        #[arg(long)]
        secondary: Option<String>,
        /// Stop after this many pages
        #[arg(long)]
        pages: Option<usize>,
    },
    /// Download profile photos into a directory
    Photos {
        #[arg(long = "user", required = true)]
        users: Vec<String>,
        #[arg(long)]
        out: String,
    },
    /// Send a message to many recipients in BCC batches
    Mail {
        #[arg(long)]
        subject: String,
        /// Message body, HTML unless --text is given
        #[arg(long)]
        body: String,
        #[arg(long, action, default_value = "false")]
        text: bool,
        #[arg(long = "to", required = true)]
        recipients: Vec<String>,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Bearer token for Microsoft Graph
    #[arg(long, global = true, env = "GRAPHDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Logs go to stderr so JSON on stdout can be piped
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default().with_overrides(args.token, args.base_url);

    if let Some(Command::Serve { host, port }) = args.command {
        return serve::run(host, port, config).await;
    }
    init_tracing();

    // Handle each sub command
    match args.command {
        Some(Command::Me {}) => {
            workspace::me(&config).await?;
        }
        Some(Command::Token {}) => {
            token::run(&config)?;
        }
        Some(Command::Meetings { days }) => {
            workspace::meetings(&config, days).await?;
        }
        Some(Command::Chats { members }) => {
            workspace::chats(&config, members).await?;
        }
        Some(Command::Teams { channels }) => {
            workspace::teams(&config, channels).await?;
        }
        Some(Command::FindTime {
            attendees,
            duration,
            start,
            end,
            tenant_domain,
            work_hours,
            book,
            subject,
            recurrence,
            occurrences,
        }) => {
            schedule::run(
                &config,
                schedule::FindTimeArgs {
                    attendees,
                    duration,
                    start,
                    end,
                    tenant_domain,
                    work_hours,
                    book,
                    subject,
                    recurrence,
                    occurrences,
                },
            )
            .await?;
        }
        Some(Command::Users {
            field,
            value,
            field2,
            value2,
        }) => {
            directory::users(&config, &field, &value, field2.as_deref(), value2.as_deref())
                .await?;
        }
        Some(Command::Attributes {
            primary,
            secondary,
            pages,
        }) => {
            directory::attributes(&config, &primary, secondary.as_deref(), pages).await?;
        }
        Some(Command::Photos { users, out }) => {
            directory::photos(&config, &users, &out).await?;
        }
        Some(Command::Mail {
            subject,
            body,
            text,
            recipients,
        }) => {
            mail::run(&config, &subject, &body, !text, &recipients).await?;
        }
        Some(Command::Serve { .. }) | None => {}
    }

    Ok(())
}
