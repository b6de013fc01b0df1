//! Issue leaf X.509 certificates under an existing certificate authority.
//!
//! ```no_run
//! use certmint::{issue, Attribute, Extension, IssueOptions, KeyUsage};
//!
//! # fn main() -> Result<(), certmint::Error> {
//! let ca_cert = std::fs::read_to_string("ca_cert.pem").unwrap();
//! let ca_key = std::fs::read_to_string("ca_cert.key").unwrap();
//!
//! let issued = issue(
//!     &ca_cert,
//!     &ca_key,
//!     &[Attribute::common_name("svc.example.com")],
//!     &[
//!         Extension::basic_constraints(false, None),
//!         Extension::key_usage(&[KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment]),
//!     ],
//!     &IssueOptions::new().expiry_years(2),
//! )?;
//! println!("{}", issued.cert_pem);
//! # Ok(())
//! # }
//! ```

mod ca;
pub mod error;
pub mod inspect;
pub mod issue;
mod keygen;
pub mod oid;
pub mod options;
pub mod params;
pub mod serial;

pub use error::{Error, Result};
pub use issue::{issue, issue_with_rng, IssuedCertificate};
pub use options::{IssueOptions, ResolvedOptions, DEFAULT_EXPIRY_YEARS, DEFAULT_KEY_LENGTH};
pub use params::{
    dn::{Attribute, AttributeType},
    ext::{ExtendedKeyUsage, Extension, ExtensionSpec, GeneralName, KeyUsage},
    validity_window,
};
pub use serial::SerialNumber;
