use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console_core::{
    schema::{BANK_SCHEMA, LIMIT_SCHEMA, MEMBER_SCHEMA, TOPUP_SCHEMA},
    AnonymousSession, ConsoleError, HttpBackend, SessionProvider, TokenSession,
};
use serde_json::Value;
use shared::{
    domain::{ActivityLog, Bank, Member, TransactionLimit, WalletTopUp},
    protocol::{Resource, StatusFlag},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::Context;
use config::{load_settings, normalize_base_url};

#[derive(Parser, Debug)]
#[command(name = "console", about = "Operator console for the admin API")]
struct Cli {
    /// Base URL of the admin API, e.g. http://127.0.0.1:8080/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Bearer token of the signed-in admin.
    #[arg(long, global = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the identity carried by the session token.
    Whoami,
    Banks {
        #[command(subcommand)]
        action: BankAction,
    },
    Members {
        #[command(subcommand)]
        action: MemberAction,
    },
    Logs {
        #[command(subcommand)]
        action: LogAction,
    },
    Limits {
        #[command(subcommand)]
        action: LimitAction,
    },
    Topups {
        #[command(subcommand)]
        action: TopupAction,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive text search.
    #[arg(long)]
    search: Option<String>,
    /// Categorical filter as key=value; `all` removes the constraint.
    #[arg(long = "filter")]
    filters: Vec<String>,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    id: String,
    /// Field assignment as field=value.
    #[arg(long = "set", required = true)]
    sets: Vec<String>,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long = "set")]
    sets: Vec<String>,
}

#[derive(Args, Debug)]
struct IdArgs {
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct StatusArgs {
    #[arg(long)]
    id: String,
    #[arg(long, value_parser = ["verified", "pending"])]
    status: String,
}

#[derive(Subcommand, Debug)]
enum BankAction {
    List(ListArgs),
    Edit(EditArgs),
    Verify(StatusArgs),
    Delete(IdArgs),
}

#[derive(Subcommand, Debug)]
enum MemberAction {
    List(ListArgs),
    Edit(EditArgs),
    Block(IdArgs),
    Unblock(IdArgs),
    Kyc(StatusArgs),
    Delete(IdArgs),
}

#[derive(Subcommand, Debug)]
enum LogAction {
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum LimitAction {
    List(ListArgs),
    Edit(EditArgs),
    Create(CreateArgs),
    Delete(IdArgs),
}

#[derive(Subcommand, Debug)]
enum TopupAction {
    List(ListArgs),
    Create(CreateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<ConsoleError>() {
                Some(console_err) => eprintln!("error: {}", console_err.user_message()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let mut settings = load_settings();
    if let Some(url) = cli.api_url {
        settings.api_base_url = normalize_base_url(&url);
    }
    if let Some(token) = cli.token {
        settings.token = Some(token);
    }

    let session: Arc<dyn SessionProvider> = match settings.token.as_deref() {
        Some(token) => Arc::new(TokenSession::new(token)),
        None => Arc::new(AnonymousSession),
    };
    let backend = HttpBackend::with_timeout(
        &settings.api_base_url,
        session,
        Duration::from_secs(settings.request_timeout_seconds),
    )?;
    debug!(api = %settings.api_base_url, "console configured");

    let ctx = Context::new(backend, settings.page_size);

    match cli.command {
        Command::Whoami => Ok(ctx.whoami()),
        Command::Banks { action } => match action {
            BankAction::List(args) => ctx.list::<Bank>(&args).await,
            BankAction::Edit(args) => ctx.edit(&BANK_SCHEMA, &args.id, &args.sets).await,
            BankAction::Verify(args) => {
                ctx.toggle(
                    &BANK_SCHEMA,
                    &args.id,
                    StatusFlag::BankVerification,
                    Value::String(args.status),
                )
                .await
            }
            BankAction::Delete(args) => ctx.delete(Resource::BANK, &args.id).await,
        },
        Command::Members { action } => match action {
            MemberAction::List(args) => ctx.list::<Member>(&args).await,
            MemberAction::Edit(args) => ctx.edit(&MEMBER_SCHEMA, &args.id, &args.sets).await,
            MemberAction::Block(args) => {
                ctx.toggle(&MEMBER_SCHEMA, &args.id, StatusFlag::Blocked, Value::Bool(true))
                    .await
            }
            MemberAction::Unblock(args) => {
                ctx.toggle(&MEMBER_SCHEMA, &args.id, StatusFlag::Blocked, Value::Bool(false))
                    .await
            }
            MemberAction::Kyc(args) => {
                ctx.toggle(
                    &MEMBER_SCHEMA,
                    &args.id,
                    StatusFlag::Kyc,
                    Value::String(args.status),
                )
                .await
            }
            MemberAction::Delete(args) => ctx.delete(Resource::MEMBER, &args.id).await,
        },
        Command::Logs { action } => match action {
            LogAction::List(args) => ctx.list::<ActivityLog>(&args).await,
        },
        Command::Limits { action } => match action {
            LimitAction::List(args) => ctx.list::<TransactionLimit>(&args).await,
            LimitAction::Edit(args) => ctx.edit(&LIMIT_SCHEMA, &args.id, &args.sets).await,
            LimitAction::Create(args) => ctx.create_limit(&args.sets).await,
            LimitAction::Delete(args) => ctx.delete(Resource::LIMIT, &args.id).await,
        },
        Command::Topups { action } => match action {
            TopupAction::List(args) => ctx.list::<WalletTopUp>(&args).await,
            TopupAction::Create(args) => ctx.create(&TOPUP_SCHEMA, &args.sets).await,
        },
    }
}
