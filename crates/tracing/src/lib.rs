//! Logging setup of the ornode node.
//!
//! [`OrnodeTracer`] installs a global subscriber writing to stdout and, optionally, to a daily
//! rotated file. Both layers are filtered by `RUST_LOG` plus their own directives and can format
//! events for terminals or as JSON.
//!
//! ```
//! use ornode_tracing::{LayerInfo, LogFormat, OrnodeTracer, Tracer};
//!
//! fn main() -> eyre::Result<()> {
//!     let tracer = OrnodeTracer::new().with_stdout(LayerInfo::new(
//!         LogFormat::Json,
//!         "info".to_string(),
//!         "ornode::rpc=debug".to_string(),
//!         None,
//!     ));
//!
//!     let _guard = tracer.init()?;
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/sim31/ordao/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-export tracing crates
pub use tracing;
pub use tracing_appender;
pub use tracing_subscriber;

// Re-export our types
pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard, DEFAULT_LOG_FILE_NAME};
pub use test_tracer::TestTracer;

mod formatter;
mod layers;
mod test_tracer;

use crate::layers::Layers;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

///  Tracer for application logging.
///
///  Manages the configuration and initialization of the stdout layer and the optional file layer.
#[derive(Debug, Clone)]
pub struct OrnodeTracer {
    stdout: LayerInfo,
    file: Option<(LayerInfo, FileInfo)>,
}

impl OrnodeTracer {
    ///  Constructs a new `Tracer` with default settings.
    ///
    ///  Initializes with default stdout layer configuration and no file layer.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), file: None }
    }

    ///  Sets a custom configuration for the stdout layer.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    ///  Sets the file layer configuration and associated file info.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for OrnodeTracer {
    fn default() -> Self {
        Self::new()
    }
}

///  Configuration for a logging layer.
///
///  This struct holds configuration parameters for a tracing layer, including
///  the format, filtering directives, optional coloring, and directive.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    ///  Constructs a new `LayerInfo`.
    ///
    ///  # Arguments
    ///  * `format` - Specifies the format for log messages.
    ///  * `default_directive` - Directive for filtering log messages.
    ///  * `filters` - Additional filtering parameters as a string.
    ///  * `color` - Optional color configuration for the log messages.
    pub const fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    ///  Provides default values for `LayerInfo`.
    ///
    ///  By default, it uses terminal format, INFO level filter,
    ///  no additional filters, and no color configuration.
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// Trait defining a general interface for logging configuration.
pub trait Tracer {
    /// Initialize the logging configuration.
    ///
    /// Returns the guard of the file layer, if one is configured. Events buffered for the file
    /// are flushed when the guard is dropped.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

impl Tracer for OrnodeTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        let file_guard = if let Some((config, file_info)) = self.file {
            Some(layers.file(config.format, &config.filters, file_info)?)
        } else {
            None
        };

        // The error is returned if the global default subscriber is already set,
        // so it's safe to ignore it
        let _ =
            tracing_subscriber::registry().with(layers.into_inner()).try_init().inspect_err(|e| {
                tracing::warn!(%e, "Tracing subscriber could not be initialized");
            });
        Ok(file_guard)
    }
}

///  Initializes a tracing subscriber for tests.
///
///  The filter is configurable via `RUST_LOG`.
///
///  # Note
///
///  The subscriber will silently fail if it could not be installed.
pub fn init_test_tracing() {
    let _ = TestTracer::default().init();
}
