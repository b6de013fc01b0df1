//! Issue a leaf certificate under an existing CA.

use std::fmt;

use pem::{EncodeConfig, LineEnding, Pem};
use rand::{CryptoRng, RngCore};
use time::OffsetDateTime;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::{
    ca::CertificateAuthority,
    error::Result,
    keygen,
    options::IssueOptions,
    params::{dn::Attribute, ext::Extension, LeafTemplate},
    serial::SerialNumber,
};

/// A signed certificate together with its newly generated private key.
pub struct IssuedCertificate {
    /// PKCS#8 PEM, unencrypted. Wiped from memory on drop.
    pub private_key_pem: Zeroizing<String>,
    pub cert_pem: String,
    pub serial_number: SerialNumber,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl fmt::Debug for IssuedCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCertificate")
            .field("private_key_pem", &"<redacted>")
            .field("cert_pem", &self.cert_pem)
            .field("serial_number", &self.serial_number)
            .field("not_before", &self.not_before)
            .field("not_after", &self.not_after)
            .finish()
    }
}

/// Generate a key pair and a certificate for it, signed by the CA.
///
/// The issuer is always the CA certificate's subject. `subject` order is kept,
/// `extensions` are written exactly as given. The signature uses SHA-256, so
/// the CA key must be RSA or ECDSA P-256.
pub fn issue(
    ca_cert_pem: &str,
    ca_key_pem: &str,
    subject: &[Attribute],
    extensions: &[Extension],
    options: &IssueOptions,
) -> Result<IssuedCertificate> {
    issue_with_rng(
        &mut rand::thread_rng(),
        ca_cert_pem,
        ca_key_pem,
        subject,
        extensions,
        options,
    )
}

/// [`issue`] with an explicit random source for key and serial generation.
pub fn issue_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    ca_cert_pem: &str,
    ca_key_pem: &str,
    subject: &[Attribute],
    extensions: &[Extension],
    options: &IssueOptions,
) -> Result<IssuedCertificate> {
    let resolved = options.resolve(subject, rng)?;
    debug!(
        serial = %resolved.serial_number,
        key_length = resolved.key_length,
        expiry_years = resolved.expiry_years,
        "resolved issuance options"
    );

    let template = LeafTemplate::new(&resolved, subject, extensions)?;
    let ca = CertificateAuthority::from_pem(ca_cert_pem, ca_key_pem)?;

    debug!(bits = resolved.key_length, "generating key pair");
    let key = keygen::generate_rsa(rng, resolved.key_length)?;

    let tbs =
        template.tbs_certificate(ca.signature_algorithm(), ca.subject(), &key.public_key_der);
    let der = ca.sign(&tbs)?;
    let cert_pem = pem::encode_config(
        &Pem::new("CERTIFICATE", der),
        EncodeConfig::new().set_line_ending(LineEnding::LF),
    );

    info!(
        serial = %resolved.serial_number,
        not_before = %template.not_before,
        not_after = %template.not_after,
        "issued certificate"
    );

    Ok(IssuedCertificate {
        private_key_pem: key.pem,
        cert_pem,
        serial_number: resolved.serial_number,
        not_before: template.not_before,
        not_after: template.not_after,
    })
}
