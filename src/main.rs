use clap::Parser;
use ledger_form::args::{Args, Command};
use ledger_form::{commands, Config, ErrorType, IntoResult, Mode, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            match ErrorType::of(&e) {
                Some(error_type) => ExitCode::from(error_type.exit_code()),
                None => ExitCode::FAILURE,
            }
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().ledger_home().path();

    // This allows for running the program without a ledger service. When
    // LEDGER_FORM_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Remote.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.api_url()).await?.print(),

        Command::Login(login_args) => {
            let config = load_config(home).await?;
            commands::login(config, mode, login_args.clone())
                .await?
                .print()
        }

        Command::Logout => commands::logout(load_config(home).await?, mode)
            .await?
            .print(),

        Command::Status => commands::status(load_config(home).await?, mode)
            .await?
            .print(),

        Command::Categories(categories_args) => {
            commands::categories(categories_args.clone())?.print()
        }

        Command::Submit(entry_args) => {
            let config = load_config(home).await?;
            commands::submit(config, mode, entry_args.clone())
                .await?
                .print()
        }

        Command::Edit(edit_args) => {
            let config = load_config(home).await?;
            commands::edit(config, mode, edit_args.clone())
                .await?
                .print()
        }
    };
    Ok(())
}

async fn load_config(home: &Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},ledger_form={}",
                env!("CARGO_CRATE_NAME"),
                level,
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
