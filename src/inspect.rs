//! Human-readable summary of a PEM certificate.

use std::fmt;

use time::OffsetDateTime;
use x509_parser::pem::parse_x509_pem;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSummary {
    pub oid: String,
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    /// Serial number bytes as lowercase hex.
    pub serial: String,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub signature_algorithm: String,
    pub extensions: Vec<ExtensionSummary>,
}

impl CertificateSummary {
    pub fn from_pem(pem: &str) -> Result<Self> {
        let decode_error = |reason: String| Error::InputDecode {
            what: "certificate",
            reason,
        };
        let (_, pem) = parse_x509_pem(pem.as_bytes()).map_err(|err| decode_error(err.to_string()))?;
        let cert = pem.parse_x509().map_err(|err| decode_error(err.to_string()))?;

        Ok(Self {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: hex::encode(cert.raw_serial()),
            not_before: cert.validity().not_before.to_datetime(),
            not_after: cert.validity().not_after.to_datetime(),
            signature_algorithm: cert.signature_algorithm.algorithm.to_id_string(),
            extensions: cert
                .extensions()
                .iter()
                .map(|ext| ExtensionSummary {
                    oid: ext.oid.to_id_string(),
                    critical: ext.critical,
                })
                .collect(),
        })
    }
}

impl fmt::Display for CertificateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject:    {}", self.subject)?;
        writeln!(f, "Issuer:     {}", self.issuer)?;
        writeln!(f, "Serial:     {}", self.serial)?;
        writeln!(f, "Not before: {}", self.not_before)?;
        writeln!(f, "Not after:  {}", self.not_after)?;
        writeln!(f, "Signature:  {}", self.signature_algorithm)?;
        for ext in &self.extensions {
            let critical = if ext.critical { " (critical)" } else { "" };
            writeln!(f, "Extension:  {}{critical}", ext.oid)?;
        }
        Ok(())
    }
}
