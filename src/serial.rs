//! Certificate serial numbers.
//!
//! Generated serials hash a caller namespace together with the issuance
//! timestamp and a random token, and carry a leading zero byte so encoders
//! that treat the value as a signed integer never see a negative number.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use time::OffsetDateTime;

use crate::error::Error;

/// Upper bound (exclusive) of the random token mixed into generated serials.
const TOKEN_RANGE: u32 = 100_000;

/// A non-negative serial number, rendered as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerialNumber {
    bytes: Vec<u8>,
}

impl SerialNumber {
    /// Generate a serial for `namespace` using the wall clock and the thread RNG.
    pub fn generate(namespace: &str) -> Self {
        Self::generate_with(namespace, OffsetDateTime::now_utc(), &mut rand::thread_rng())
    }

    /// Generate a serial from an explicit timestamp and random source.
    pub fn generate_with<R: Rng + ?Sized>(
        namespace: &str,
        now: OffsetDateTime,
        rng: &mut R,
    ) -> Self {
        let token = rng.gen_range(0..TOKEN_RANGE);
        let seed = format!("{namespace}.{}.{token}", now.unix_timestamp_nanos());
        let digest = Sha1::digest(seed.as_bytes());

        let mut bytes = Vec::with_capacity(digest.len() + 1);
        bytes.push(0);
        bytes.extend_from_slice(&digest);
        Self { bytes }
    }

    /// Big-endian bytes of the serial, including any leading zero bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// `false` only if the leading byte would read as negative in two's complement.
    pub fn is_non_negative(&self) -> bool {
        self.bytes.first().map_or(true, |byte| byte & 0x80 == 0)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.bytes))
    }
}

impl FromStr for SerialNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        if digits.is_empty() {
            return Err(Error::InvalidSerialNumber(s.to_owned()));
        }

        let padded;
        let digits = if digits.len() % 2 == 1 {
            padded = format!("0{digits}");
            padded.as_str()
        } else {
            digits
        };
        let bytes =
            hex::decode(digits).map_err(|_| Error::InvalidSerialNumber(s.to_owned()))?;
        Ok(Self { bytes })
    }
}

impl TryFrom<String> for SerialNumber {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SerialNumber> for String {
    fn from(value: SerialNumber) -> Self {
        value.to_string()
    }
}

impl SerialNumber {
    /// DER INTEGER, always read as positive.
    pub(crate) fn write(&self, writer: yasna::DERWriter) {
        writer.write_bigint_bytes(&self.bytes, true);
    }
}
