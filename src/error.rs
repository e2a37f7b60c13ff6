// error.rs - Error types surfaced by option resolution

use clap::error::ErrorKind;
use clap::Command;

use crate::providers::BoxError;

/// Exit status used for usage errors, shared with clap.
pub const USAGE_CODE: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration option could not be honoured (unreadable file,
    /// missing section, a value that does not fit its target argument).
    #[error("Invalid value for '{option}': {message}")]
    BadOptionUsage { option: String, message: String },

    /// Errors raised by clap itself, including path validation.
    #[error(transparent)]
    Clap(#[from] clap::Error),

    /// Errors returned by a chained callback, passed through untouched.
    #[error(transparent)]
    Callback(BoxError),
}

impl Error {
    pub fn bad_option_usage(option: impl Into<String>, message: impl Into<String>) -> Self {
        Error::BadOptionUsage {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Exit status for this error, following clap's conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Clap(e) => e.exit_code(),
            Error::BadOptionUsage { .. } | Error::Callback(_) => USAGE_CODE,
        }
    }

    /// Render the error against `cmd` the way clap renders its own errors,
    /// with the usage line and the `--help` hint. Callback errors pass through.
    pub fn with_usage(self, cmd: &Command) -> Self {
        let mut cmd = cmd.clone();
        match self {
            Error::Clap(e) => Error::Clap(e.format(&mut cmd)),
            Error::BadOptionUsage { .. } => {
                let message = format!("{}\n", self);
                Error::Clap(clap::Error::raw(ErrorKind::ValueValidation, message).format(&mut cmd))
            }
            Error::Callback(_) => self,
        }
    }

    /// Print the error with `cmd`'s usage to stderr and terminate the process.
    pub fn exit_with(self, cmd: &Command) -> ! {
        self.with_usage(cmd).exit()
    }

    /// Print the error to stderr and terminate the process.
    pub fn exit(&self) -> ! {
        match self {
            Error::Clap(e) => e.exit(),
            other => {
                eprintln!("Error: {}", other);
                std::process::exit(other.exit_code());
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_option_usage_names_option() {
        let err = Error::bad_option_usage("--config", "Error reading configuration file: boom");
        assert_eq!(
            err.to_string(),
            "Invalid value for '--config': Error reading configuration file: boom"
        );
        assert_eq!(err.exit_code(), USAGE_CODE);
    }

    #[test]
    fn test_usage_rendered_by_clap() {
        let cmd = Command::new("mytool").arg(clap::Arg::new("config").long("config"));
        let err = Error::bad_option_usage("--config", "Error reading configuration file: boom")
            .with_usage(&cmd);
        assert_eq!(err.exit_code(), USAGE_CODE);

        let rendered = err.to_string();
        assert!(rendered.contains("Invalid value for '--config': Error reading"), "{}", rendered);
        assert!(rendered.contains("Usage: mytool"), "{}", rendered);
        assert!(rendered.contains("--help"), "{}", rendered);
        assert!(matches!(err, Error::Clap(ref e) if e.kind() == ErrorKind::ValueValidation));
    }

    #[test]
    fn test_callback_error_keeps_message_with_usage() {
        let cmd = Command::new("mytool");
        let err = Error::Callback("custom failure".into()).with_usage(&cmd);
        assert_eq!(err.to_string(), "custom failure");
    }

    #[test]
    fn test_callback_error_is_transparent() {
        let err = Error::Callback("custom failure".into());
        assert_eq!(err.to_string(), "custom failure");
    }
}
