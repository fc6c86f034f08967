use flexi_logger::{Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming};
use std::path::Path;

/// Colored stderr logging, level from `RUST_LOG` or `default_level`.
pub fn setup_logging(default_level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(default_level)?
        .format(flexi_logger::colored_default_format)
        .start()
}

/// Same as [`setup_logging`] but also writes to rotated files in `directory`.
pub fn setup_file_logging(
    default_level: &str,
    directory: impl AsRef<Path>,
) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(default_level)?
        .log_to_file(FileSpec::default().directory(directory.as_ref()))
        .duplicate_to_stderr(flexi_logger::Duplicate::Info)
        .format(flexi_logger::opt_format)
        .rotate(
            Criterion::Size(10 * 1024 * 1024), // rotate at 10 MB
            Naming::Numbers,
            Cleanup::KeepLogFiles(7),
        )
        .start()
}
