//! Workspace-wide configuration errors
//!
//! Both bin-facing config loaders (client and devserver) funnel their
//! failures through this one type so `--config` handling reads the same
//! everywhere.

use thiserror::Error;

/// Failure while locating, reading, or validating a fabdash config file.
#[derive(Error, Debug)]
pub enum Error {
    /// A field failed validation after parsing
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias for config loading.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_surfaces_verbatim() {
        let err = Error::Config("timeout_secs must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: timeout_secs must be greater than 0"
        );
    }

    #[test]
    fn toml_parse_failure_converts_via_question_mark() {
        fn parse(contents: &str) -> Result<toml::Value> {
            Ok(toml::from_str(contents)?)
        }

        let err = parse("base_url = [unclosed").unwrap_err();
        assert!(matches!(err, Error::Toml(_)), "got: {err:?}");
        assert!(
            err.to_string().starts_with("config file is not valid TOML:"),
            "got: {err}"
        );
    }

    #[test]
    fn missing_config_file_converts_to_io() {
        fn read(path: &str) -> Result<String> {
            Ok(std::fs::read_to_string(path)?)
        }

        let err = read("/nonexistent/fabdash.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got: {err:?}");
        assert!(
            err.to_string().starts_with("failed to read config file:"),
            "got: {err}"
        );
    }
}
