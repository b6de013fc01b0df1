//! Issuance options and their resolved form.

use rand::Rng;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    error::{Error, Result},
    params::dn::Attribute,
    serial::SerialNumber,
};

pub const DEFAULT_KEY_LENGTH: usize = 2048;
pub const DEFAULT_EXPIRY_YEARS: u32 = 1;

/// RSA modulus sizes the signer accepts.
pub const KEY_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 2048..=8192;

/// Caller-facing options. Anything left unset falls back to a default when
/// the options are resolved.
///
/// Only `None` means unset. An explicit `Some(0)` for `key_length` or
/// `expiry_years` is validated like any other value and rejected with
/// [`Error::InvalidOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueOptions {
    pub key_length: Option<usize>,
    pub expiry_years: Option<u32>,
    pub serial_number: Option<SerialNumber>,
    /// Issuance instant; the current time when unset.
    pub issued_at: Option<OffsetDateTime>,
}

impl IssueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_length(mut self, bits: usize) -> Self {
        self.key_length = Some(bits);
        self
    }

    pub fn expiry_years(mut self, years: u32) -> Self {
        self.expiry_years = Some(years);
        self
    }

    pub fn serial_number(mut self, serial: SerialNumber) -> Self {
        self.serial_number = Some(serial);
        self
    }

    pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
        self.issued_at = Some(instant);
        self
    }

    /// Fill in defaults and validate. A missing serial is generated with the
    /// JSON form of `subject` as its namespace.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        subject: &[Attribute],
        rng: &mut R,
    ) -> Result<ResolvedOptions> {
        let key_length = self.key_length.unwrap_or(DEFAULT_KEY_LENGTH);
        if !KEY_LENGTH_RANGE.contains(&key_length) {
            return Err(Error::InvalidOptions(format!(
                "key length {key_length} is outside {}..={}",
                KEY_LENGTH_RANGE.start(),
                KEY_LENGTH_RANGE.end()
            )));
        }

        let expiry_years = self.expiry_years.unwrap_or(DEFAULT_EXPIRY_YEARS);
        if expiry_years == 0 {
            return Err(Error::InvalidOptions(
                "expiry must be at least one year".into(),
            ));
        }

        let issued_at = self
            .issued_at
            .unwrap_or_else(OffsetDateTime::now_utc)
            .to_offset(UtcOffset::UTC)
            .replace_nanosecond(0)
            .map_err(|err| Error::InvalidOptions(err.to_string()))?;

        let serial_number = match &self.serial_number {
            Some(serial) => serial.clone(),
            None => {
                let namespace = serial_namespace(subject)?;
                SerialNumber::generate_with(&namespace, OffsetDateTime::now_utc(), rng)
            }
        };

        Ok(ResolvedOptions {
            key_length,
            expiry_years,
            serial_number,
            issued_at,
        })
    }
}

/// JSON form of the subject, used to namespace generated serials.
fn serial_namespace(subject: &[Attribute]) -> Result<String> {
    serde_json::to_string(subject)
        .map_err(|err| Error::InvalidSubject(format!("can't serialize subject: {err}")))
}

/// Options with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub key_length: usize,
    pub expiry_years: u32,
    pub serial_number: SerialNumber,
    pub issued_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use time::macros::{datetime, offset};

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn omitted_options_use_defaults() {
        let resolved = IssueOptions::new()
            .resolve(&[Attribute::common_name("leaf")], &mut rng())
            .unwrap();

        assert_eq!(resolved.key_length, DEFAULT_KEY_LENGTH);
        assert_eq!(resolved.expiry_years, DEFAULT_EXPIRY_YEARS);
        assert!(resolved.serial_number.is_non_negative());
        assert_eq!(resolved.serial_number.to_bytes()[0], 0);
        assert_eq!(resolved.issued_at.nanosecond(), 0);
    }

    #[test]
    fn partial_options_keep_caller_values() {
        let serial: SerialNumber = "01".parse().unwrap();
        let resolved = IssueOptions::new()
            .expiry_years(5)
            .serial_number(serial.clone())
            .resolve(&[], &mut rng())
            .unwrap();

        assert_eq!(resolved.key_length, DEFAULT_KEY_LENGTH);
        assert_eq!(resolved.expiry_years, 5);
        assert_eq!(resolved.serial_number, serial);
    }

    #[test]
    fn issuance_instant_is_normalised_to_utc_seconds() {
        let resolved = IssueOptions::new()
            .issued_at(datetime!(2024-02-29 13:30:15.75 +01:00))
            .resolve(&[], &mut rng())
            .unwrap();

        assert_eq!(resolved.issued_at, datetime!(2024-02-29 12:30:15 UTC));
        assert_eq!(resolved.issued_at.offset(), offset!(UTC));
    }

    #[test]
    fn out_of_range_options_are_rejected() {
        for options in [
            IssueOptions::new().key_length(1024),
            IssueOptions::new().key_length(16384),
            IssueOptions::new().key_length(0),
            IssueOptions::new().expiry_years(0),
        ] {
            assert!(matches!(
                options.resolve(&[], &mut rng()),
                Err(Error::InvalidOptions(_))
            ));
        }
    }

    #[test]
    fn serial_namespace_is_the_subject_as_json() {
        assert_eq!(
            serial_namespace(&[Attribute::common_name("leaf")]).unwrap(),
            r#"[{"type":"commonName","value":"leaf"}]"#
        );
        assert_eq!(serial_namespace(&[]).unwrap(), "[]");
    }
}
