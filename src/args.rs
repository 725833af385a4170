//! These structs provide the CLI interface for the ledger CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// ledger: A command-line client for a household ledger.
///
/// The purpose of this program is to record household ledger transactions (monthly dues, special
/// contributions and expenditures) with a remote ledger service. Every entry is checked locally
/// before it is sent, and the most recently submitted transaction can be corrected with `edit`.
///
/// Run `ledger init --api-url <URL>` once, then `ledger login`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is $HOME/ledger;
    /// pass --ledger-home or set LEDGER_HOME to put it somewhere else.
    Init(InitArgs),
    /// Log in to the ledger service. The session is kept until `logout` or until the service
    /// reports that it expired.
    Login(LoginArgs),
    /// Forget the session and the last submitted transaction.
    Logout,
    /// Show who is logged in and which transaction can be edited.
    Status,
    /// List the transaction types and the categories each one allows.
    Categories(CategoriesArgs),
    /// Record a new transaction.
    ///
    /// The date defaults to today. Year, month and month number follow the date unless they are
    /// given explicitly.
    Submit(EntryArgs),
    /// Change the most recently submitted transaction.
    ///
    /// The stored values are loaded and only the fields given here are replaced.
    Edit(EditArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where ledger configuration and client state is held. Defaults to ~/ledger
    #[arg(long, env = "LEDGER_HOME", default_value_t = default_ledger_home())]
    ledger_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, ledger_home: PathBuf) -> Self {
        Self {
            log_level,
            ledger_home: ledger_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn ledger_home(&self) -> &DisplayPath {
        &self.ledger_home
    }
}

/// (Not shown): Args for the `ledger init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of the ledger service endpoint, e.g.
    /// https://script.google.com/macros/s/AKfycbx0/exec
    #[arg(long)]
    api_url: String,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// (Not shown): Args for the `ledger login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,

    /// Can also be given with LEDGER_PASSWORD so that it does not appear in shell history.
    #[arg(long, env = "LEDGER_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// (Not shown): Args for the `ledger categories` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoriesArgs {
    /// Only list the categories of this transaction type, e.g. "Monthly Dues".
    #[arg(long = "type")]
    transaction_type: Option<String>,
}

impl CategoriesArgs {
    pub fn new(transaction_type: Option<String>) -> Self {
        Self { transaction_type }
    }

    pub fn transaction_type(&self) -> Option<&str> {
        self.transaction_type.as_deref()
    }
}

/// The values of one entry form. Every field is optional here; missing required fields are
/// reported by validation.
#[derive(Debug, Parser, Clone, Default)]
pub struct EntryArgs {
    /// "Monthly Dues", "Special Contributions" or "Expenditure".
    #[arg(long = "type")]
    pub transaction_type: Option<String>,

    /// The date of the transaction as YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,

    /// Overrides the year taken from the date.
    #[arg(long)]
    pub year: Option<String>,

    /// Overrides the month name taken from the date.
    #[arg(long)]
    pub month: Option<String>,

    /// Overrides the month number taken from the date.
    #[arg(long)]
    pub month_num: Option<String>,

    #[arg(long)]
    pub family_member: Option<String>,

    /// A positive amount, e.g. 25 or 1,250.50
    #[arg(long)]
    pub amount: Option<String>,

    /// One of the categories allowed for the transaction type. See `ledger categories`.
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

/// (Not shown): Args for the `ledger edit` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct EditArgs {
    /// Only load and show the transaction, do not save it.
    #[arg(long)]
    show: bool,

    #[clap(flatten)]
    entry: EntryArgs,
}

impl EditArgs {
    pub fn new(show: bool, entry: EntryArgs) -> Self {
        Self { show, entry }
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn entry(&self) -> &EntryArgs {
        &self.entry
    }
}

fn default_ledger_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --ledger-home or LEDGER_HOME instead of relying on the default \
                ledger home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
