use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad class of a failure that is reported to the user. Command handlers attach one of these
/// to their errors with [`IntoResult::pub_result`] so that `main` can choose an exit code.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The ledger home directory or its config file is missing or broken.
    Config,
    /// There is no usable session, or the server reported that it expired.
    Session,
    /// The form did not pass local validation. No request was sent.
    Validation,
    /// The ledger service answered with `success: false`.
    Server,
    /// No response was obtained from the ledger service.
    Network,
    /// Reading or writing local state failed.
    Storage,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// The process exit code used when a command fails with this type of error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorType::Config => 2,
            ErrorType::Session => 3,
            ErrorType::Validation => 4,
            ErrorType::Server => 5,
            ErrorType::Network => 6,
            ErrorType::Storage => 7,
        }
    }

    /// Finds the `ErrorType` that was attached to `e` by `pub_result`, if any.
    pub fn of(e: &Error) -> Option<ErrorType> {
        e.downcast_ref::<ErrorType>().copied()
    }
}

/// Attaches an [`ErrorType`] to the error of a `Result`.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(error_type))
    }
}
