use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The CA certificate or key could not be decoded.
    #[error("can't decode {what}: {reason}")]
    InputDecode { what: &'static str, reason: String },

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The CA key can't produce a SHA-256 signature over this certificate.
    #[error("signing failed: {0}")]
    Signing(String),

    #[error("invalid issuance options: {0}")]
    InvalidOptions(String),

    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    #[error("invalid extension: {0}")]
    InvalidExtension(String),

    #[error("invalid serial number {0:?}")]
    InvalidSerialNumber(String),
}

impl Error {
    pub(crate) fn ca_cert(reason: impl ToString) -> Self {
        Self::InputDecode {
            what: "CA certificate",
            reason: reason.to_string(),
        }
    }

    pub(crate) fn ca_key(reason: impl ToString) -> Self {
        Self::InputDecode {
            what: "CA private key",
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
