// titlemap CLI - resolve statement titles against channel and master catalogs

mod exit_codes;
mod inspect;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use exit_codes::{recon_exit_code, EXIT_READ, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE};
use titlemap_recon::model::DatasetRole;
use titlemap_recon::ReconError;

#[derive(Parser)]
#[command(name = "tmap")]
#[command(about = "Map settlement statement titles to channel and master catalog identifiers")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize, match and classify every statement title
    #[command(after_help = "\
Examples:
  tmap run --channel channel.xlsx --statement statement.xlsx --master master.xlsx -o result.xlsx
  tmap run --channel ch.csv --statement jan.csv --statement feb.csv --master master.csv --json
  tmap run --channel ch.xlsx --statement st.xlsx --master m.xlsx --config recon.toml --summary summary.json")]
    Run {
        /// Channel catalog (first sheet)
        #[arg(long)]
        channel: PathBuf,

        /// Statement file(s); every sheet of every file is used
        #[arg(long, required = true, num_args = 1..)]
        statement: Vec<PathBuf>,

        /// Master catalog (first sheet)
        #[arg(long)]
        master: PathBuf,

        /// Run config (TOML). Defaults to <config dir>/titlemap/recon.toml when present
        #[arg(long, env = "TITLEMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Output table (.xlsx, .csv or .tsv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print meta, summary and report lists as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON summary to a file
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Check a run config without running
    #[command(after_help = "\
Examples:
  tmap validate recon.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },

    /// Print the normalized form of titles (one per line)
    #[command(after_help = "\
Examples:
  tmap normalize '나의 이야기 제3권' '[단독] 서울 2023특별'
  cut -d, -f1 titles.csv | tmap normalize")]
    Normalize {
        /// Titles to normalize; reads stdin lines when omitted
        titles: Vec<String>,

        /// Keyword stripping order
        #[arg(long, value_enum, default_value = "longest-first")]
        keyword_order: KeywordOrderArg,
    },

    /// List the columns of a file and which one each role would use
    #[command(after_help = "\
Examples:
  tmap columns statement.xlsx
  tmap columns master.csv --role master")]
    Columns {
        file: PathBuf,

        /// Only show resolution for this role
        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Run config whose candidate lists are used
        #[arg(long, env = "TITLEMAP_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KeywordOrderArg {
    LongestFirst,
    Listed,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Channel,
    Statement,
    Master,
}

impl From<RoleArg> for DatasetRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Channel => DatasetRole::Channel,
            RoleArg::Statement => DatasetRole::Statement,
            RoleArg::Master => DatasetRole::Master,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  titlemap-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  titlemap-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Run { channel, statement, master, config, output, json, summary } => {
            recon::cmd_run(recon::RunArgs { channel, statement, master, config, output, json, summary })
        }
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Normalize { titles, keyword_order } => {
            let order = match keyword_order {
                KeywordOrderArg::LongestFirst => titlemap_recon::config::KeywordOrder::LongestFirst,
                KeywordOrderArg::Listed => titlemap_recon::config::KeywordOrder::Listed,
            };
            inspect::cmd_normalize(titles, order)
        }
        Commands::Columns { file, role, config } => inspect::cmd_columns(file, role.map(Into::into), config),
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

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self { code: EXIT_READ, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::ColumnNotFound { .. } => {
                Some("list the file's columns with `tmap columns <file>` or add a candidate in the config".to_string())
            }
            ReconError::DuplicateKey { .. } => {
                Some("set [matching] duplicates = \"first_seen\" or fix the catalog".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
