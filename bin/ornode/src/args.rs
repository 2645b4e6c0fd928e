//! Arguments shared by the commands.

use clap::{ArgAction, Args, ValueEnum};
use ornode_config::{Config, SyncMode};
use ornode_tracing::{
    tracing::Level, FileInfo, FileWorkerGuard, LayerInfo, LogFormat, OrnodeTracer, Tracer,
    DEFAULT_LOG_FILE_NAME,
};
use std::path::PathBuf;
use tracing::info;

/// Default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "ornode.toml";

/// The configuration file.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// The path to the configuration file. A file with the defaults is written if it does not
    /// exist.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH, env = "ORNODE_CONFIG")]
    pub config: PathBuf,
}

impl ConfigArgs {
    /// Loads the configuration file.
    pub fn load(&self) -> eyre::Result<Config> {
        let config = Config::load(&self.config)?;
        info!(target: "ornode::cli", path = %self.config.display(), "Loaded configuration");
        Ok(config)
    }
}

/// Startup mode selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Follow new events.
    Listen,
    /// Replay a block range.
    Backfill,
}

impl From<ModeArg> for SyncMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Listen => Self::Listen,
            ModeArg::Backfill => Self::Backfill,
        }
    }
}

/// The log configuration.
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Logging")]
pub struct LogArgs {
    /// The format to use for logs written to stdout.
    #[arg(long = "log.stdout.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub log_stdout_format: LogFormat,

    /// The filter to use for logs written to stdout.
    #[arg(long = "log.stdout.filter", value_name = "FILTER", global = true, default_value = "")]
    pub log_stdout_filter: String,

    /// The path to put log files in. No log files are written without it.
    #[arg(long = "log.file.directory", value_name = "PATH", global = true)]
    pub log_file_directory: Option<PathBuf>,

    /// The format to use for logs written to the log file.
    #[arg(long = "log.file.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub log_file_format: LogFormat,

    /// The filter to use for logs written to the log file.
    #[arg(long = "log.file.filter", value_name = "FILTER", global = true, default_value = "debug")]
    pub log_file_filter: String,

    /// Sets whether or not the formatter emits ANSI terminal escape codes for colors and other
    /// text formatting.
    #[arg(long, value_name = "COLOR", global = true, default_value = "always")]
    pub color: String,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl LogArgs {
    /// Initializes tracing with the configured options.
    ///
    /// Returns the guard of the log file, which must be kept alive for as long as events are
    /// logged.
    pub fn init_tracing(&self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut tracer = OrnodeTracer::new().with_stdout(LayerInfo::new(
            self.log_stdout_format,
            self.verbosity.directive(),
            self.log_stdout_filter.clone(),
            Some(self.color.clone()),
        ));

        if let Some(dir) = &self.log_file_directory {
            tracer = tracer.with_file(
                LayerInfo::new(
                    self.log_file_format,
                    self.verbosity.directive(),
                    self.log_file_filter.clone(),
                    None,
                ),
                FileInfo::new(dir, DEFAULT_LOG_FILE_NAME),
            );
        }

        tracer.init()
    }
}

/// The verbosity settings for the cli.
#[derive(Debug, Copy, Clone, Args)]
#[command(next_help_heading = "Display")]
pub struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v      Errors
    /// -vv     Warnings
    /// -vvv    Info
    /// -vvvv   Debug
    /// -vvvvv  Traces (warning: very verbose!)
    #[arg(short, long, action = ArgAction::Count, global = true, default_value_t = 3, verbatim_doc_comment, help_heading = "Display")]
    verbosity: u8,

    /// Silence all log output.
    #[arg(long, alias = "silent", short = 'q', global = true, help_heading = "Display")]
    quiet: bool,
}

impl Verbosity {
    /// Get the corresponding directive for the given verbosity, or `off` if the verbosity
    /// corresponds to silent.
    pub fn directive(&self) -> String {
        if self.quiet {
            return "off".to_string()
        }
        let level = match self.verbosity.saturating_sub(1) {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        };
        level.to_string()
    }
}
