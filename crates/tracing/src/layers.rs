use crate::formatter::LogFormat;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, EnvFilter, Layer, Registry};

/// A worker guard returned by the file layer.
///
/// When a guard is dropped, all events currently in-memory are flushed to the log file this guard
/// belongs to.
pub type FileWorkerGuard = WorkerGuard;

/// A boxed tracing [Layer].
pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Default name of the log file, suffixed with the date by the daily rotation.
pub const DEFAULT_LOG_FILE_NAME: &str = "ornode.log";

/// Manages the collection of layers for a tracing subscriber.
///
/// `Layers` acts as a container for different logging layers such as stdout and file.
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl Layers {
    /// Creates a new `Layers` instance.
    pub(crate) fn new() -> Self {
        Self { inner: vec![] }
    }

    /// Consumes the `Layers` instance, returning the inner vector of layers.
    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    /// Adds a stdout layer with the given format, default directive and filters.
    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<String>,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        self.inner.push(format.apply(filter, color, None));
        Ok(())
    }

    /// Adds a layer writing to a daily rotated file, returning the guard that flushes it.
    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        filter: &str,
        file_info: FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        let (writer, guard) = file_info.create_log_writer()?;
        let filter = build_env_filter(None, filter)?;
        self.inner.push(format.apply(filter, None, Some(writer)));
        Ok(guard)
    }
}

/// Where log files are written.
#[derive(Debug, Clone)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
}

impl FileInfo {
    /// Creates a new `FileInfo` instance.
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self { dir: dir.into(), file_name: file_name.into() }
    }

    /// Returns the directory of the log files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the log directory if missing and returns a non-blocking writer rotating the file
    /// daily.
    fn create_log_writer(
        &self,
    ) -> eyre::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
        std::fs::create_dir_all(&self.dir)?;
        let appender = tracing_appender::rolling::daily(&self.dir, &self.file_name);
        Ok(tracing_appender::non_blocking(appender))
    }
}

/// Builds an environment filter for logging.
///
/// Directives in `RUST_LOG` are applied first, then the given comma separated `directives`. Without
/// a default directive, events not matched by any directive are logged at `INFO` and above.
pub(crate) fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_directive.unwrap_or_else(|| LevelFilter::INFO.into()))
        .from_env_lossy();

    directives
        .split(',')
        .filter(|directive| !directive.trim().is_empty())
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.trim().parse()?))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directives() {
        let filter = build_env_filter(None, "ornode::rpc=trace, ornode::transport=warn").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));

        assert!(build_env_filter(None, "").is_ok());
        assert!(build_env_filter(None, "ornode=notalevel").is_err());
    }

    #[test]
    fn file_writer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let info = FileInfo::new(dir.path().join("logs"), DEFAULT_LOG_FILE_NAME);
        let mut layers = Layers::new();
        let _guard = layers.file(LogFormat::Json, "debug", info.clone()).unwrap();
        assert!(info.dir().is_dir());
        assert_eq!(layers.into_inner().len(), 1);
    }
}
