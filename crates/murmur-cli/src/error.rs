use anyhow::Error;
use murmur_config::ConfigError;
use murmur_core::analysis::ClassifierError;
use murmur_core::CoreError;
use murmur_store::error::{StoreError, StoreErrorKind};
use murmur_sync::error::SyncError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_code_value(err))
}

fn exit_code_value(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            };
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(sync_err) = cause.downcast_ref::<SyncError>() {
            return sync_exit_code(sync_err);
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return EXIT_INVALID_INPUT;
        }
        if cause.downcast_ref::<ClassifierError>().is_some() {
            return EXIT_FAILURE;
        }
    }
    EXIT_FAILURE
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::InvalidComment
        | StoreErrorKind::InvalidCommentId
        | StoreErrorKind::InvalidDataPath => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Schema
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidCommentLimit(_)
        | ConfigError::EmptyField { .. }
        | ConfigError::MissingCredential(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn sync_exit_code(err: &SyncError) -> u8 {
    match err {
        SyncError::Unavailable(_) => EXIT_INVALID_INPUT,
        SyncError::Io(_) | SyncError::Api(_) => EXIT_FAILURE,
        SyncError::Core(_) | SyncError::Parse(_) | SyncError::Json(_) => EXIT_INVALID_INPUT,
        #[cfg(any(feature = "graph-sync", feature = "remote-analysis"))]
        SyncError::Http(_) => EXIT_FAILURE,
        #[cfg(any(feature = "graph-sync", feature = "remote-analysis"))]
        SyncError::Url(_) => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_code_value, invalid_input, EXIT_FAILURE, EXIT_INVALID_INPUT, EXIT_NOT_FOUND};
    use anyhow::Context as _;
    use murmur_config::ConfigError;
    use murmur_store::error::StoreError;
    use murmur_sync::SyncError;

    #[test]
    fn cli_errors_map_to_their_codes() {
        assert_eq!(exit_code_value(&invalid_input("bad limit")), EXIT_INVALID_INPUT);
    }

    #[test]
    fn wrapped_errors_are_found_in_the_chain() {
        let err = Err::<(), _>(StoreError::CommentNotFound("abc".to_string()))
            .context("delete comment")
            .unwrap_err();
        assert_eq!(exit_code_value(&err), EXIT_NOT_FOUND);

        let err = Err::<(), _>(ConfigError::MissingCredential("FB_PAGE_ID"))
            .context("import graph")
            .unwrap_err();
        assert_eq!(exit_code_value(&err), EXIT_INVALID_INPUT);
    }

    #[test]
    fn remote_failures_are_generic_failures() {
        let err = anyhow::Error::from(SyncError::Api("rate limited".to_string()));
        assert_eq!(exit_code_value(&err), EXIT_FAILURE);
        assert_eq!(exit_code_value(&anyhow::anyhow!("boom")), EXIT_FAILURE);
    }
}
