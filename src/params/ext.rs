use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use yasna::{models::ObjectIdentifier, DERWriter, Tag};

use crate::{error::Error, oid};

const BASIC_CONSTRAINTS: &[u64] = &[2, 5, 29, 19];
const KEY_USAGE: &[u64] = &[2, 5, 29, 15];
const EXT_KEY_USAGE: &[u64] = &[2, 5, 29, 37];
const SUBJECT_ALT_NAME: &[u64] = &[2, 5, 29, 17];

/// An X.509 extension as it will appear in the certificate: OID, criticality
/// and the DER encoding of the extension value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    oid: Vec<u64>,
    critical: bool,
    value: Vec<u8>,
}

impl Extension {
    pub fn new(oid: &[u64], critical: bool, value: Vec<u8>) -> Self {
        Self {
            oid: oid.to_vec(),
            critical,
            value,
        }
    }

    pub fn oid(&self) -> &[u64] {
        &self.oid
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn with_criticality(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Critical basicConstraints. `path_len` is only written for CAs.
    pub fn basic_constraints(ca: bool, path_len: Option<u8>) -> Self {
        let value = yasna::construct_der(|writer| {
            writer.write_sequence(|writer| {
                if ca {
                    writer.next().write_bool(true);
                    if let Some(path_len) = path_len {
                        writer.next().write_u8(path_len);
                    }
                }
            })
        });
        Self::new(BASIC_CONSTRAINTS, true, value)
    }

    /// Critical keyUsage.
    pub fn key_usage(usages: &[KeyUsage]) -> Self {
        let bits = usages
            .iter()
            .fold(0u16, |bits, usage| bits | usage.mask());
        let len = (u16::BITS - bits.trailing_zeros()) as usize;
        let value = yasna::construct_der(|writer| {
            writer.write_bitvec_bytes(&bits.to_be_bytes()[..(len + 7) / 8], len)
        });
        Self::new(KEY_USAGE, true, value)
    }

    pub fn extended_key_usage(purposes: &[ExtendedKeyUsage]) -> Self {
        let value = yasna::construct_der(|writer| {
            writer.write_sequence(|writer| {
                for purpose in purposes {
                    writer
                        .next()
                        .write_oid(&ObjectIdentifier::from_slice(purpose.oid()));
                }
            })
        });
        Self::new(EXT_KEY_USAGE, false, value)
    }

    /// Non-critical subjectAltName. Names other than IP addresses must be ASCII.
    pub fn subject_alt_name(names: &[GeneralName]) -> Result<Self, Error> {
        if let Some(name) = names.iter().find(|name| !name.is_ascii()) {
            return Err(Error::InvalidExtension(format!(
                "{name:?} is not an IA5 string"
            )));
        }
        let value = yasna::construct_der(|writer| {
            writer.write_sequence(|writer| {
                for name in names {
                    writer
                        .next()
                        .write_tagged_implicit(Tag::context(name.tag()), |writer| match name {
                            GeneralName::Dns(s) | GeneralName::Email(s) | GeneralName::Uri(s) => {
                                writer.write_ia5_string(s)
                            }
                            GeneralName::Ip(IpAddr::V4(addr)) => writer.write_bytes(&addr.octets()),
                            GeneralName::Ip(IpAddr::V6(addr)) => writer.write_bytes(&addr.octets()),
                        });
                }
            })
        });
        Ok(Self::new(SUBJECT_ALT_NAME, false, value))
    }
}

impl Extension {
    /// `Extension ::= SEQUENCE { extnID, critical DEFAULT FALSE, extnValue }`
    pub(crate) fn write(&self, writer: DERWriter) {
        writer.write_sequence(|writer| {
            writer.next().write_oid(&ObjectIdentifier::from_slice(&self.oid));
            if self.critical {
                writer.next().write_bool(true);
            }
            writer.next().write_bytes(&self.value);
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyUsage {
    DigitalSignature,
    #[serde(alias = "contentCommitment")]
    NonRepudiation,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    #[serde(alias = "cRLSign")]
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

impl KeyUsage {
    /// Position in the KeyUsage BIT STRING, most significant bit first.
    fn mask(self) -> u16 {
        let bit = match self {
            Self::DigitalSignature => 0,
            Self::NonRepudiation => 1,
            Self::KeyEncipherment => 2,
            Self::DataEncipherment => 3,
            Self::KeyAgreement => 4,
            Self::KeyCertSign => 5,
            Self::CrlSign => 6,
            Self::EncipherOnly => 7,
            Self::DecipherOnly => 8,
        };
        0x8000 >> bit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedKeyUsage {
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    OcspSigning,
}

impl ExtendedKeyUsage {
    fn oid(self) -> &'static [u64] {
        match self {
            Self::ServerAuth => &[1, 3, 6, 1, 5, 5, 7, 3, 1],
            Self::ClientAuth => &[1, 3, 6, 1, 5, 5, 7, 3, 2],
            Self::CodeSigning => &[1, 3, 6, 1, 5, 5, 7, 3, 3],
            Self::EmailProtection => &[1, 3, 6, 1, 5, 5, 7, 3, 4],
            Self::TimeStamping => &[1, 3, 6, 1, 5, 5, 7, 3, 8],
            Self::OcspSigning => &[1, 3, 6, 1, 5, 5, 7, 3, 9],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneralName {
    Dns(String),
    Ip(IpAddr),
    Email(String),
    Uri(String),
}

impl GeneralName {
    fn tag(&self) -> u64 {
        match self {
            Self::Email(_) => 1,
            Self::Dns(_) => 2,
            Self::Uri(_) => 6,
            Self::Ip(_) => 7,
        }
    }

    fn is_ascii(&self) -> bool {
        match self {
            Self::Dns(s) | Self::Email(s) | Self::Uri(s) => s.is_ascii(),
            Self::Ip(_) => true,
        }
    }
}

/// File-friendly description of an extension, tagged by `name`.
///
/// ```toml
/// [[extension]]
/// name = "basicConstraints"
/// cA = false
///
/// [[extension]]
/// name = "raw"
/// id = "1.3.6.1.4.1.11129.2.4.3"
/// critical = true
/// value = "0500"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum ExtensionSpec {
    BasicConstraints {
        #[serde(rename = "cA", default)]
        ca: bool,
        #[serde(rename = "pathLenConstraint")]
        path_len: Option<u8>,
        critical: Option<bool>,
    },
    KeyUsage {
        usages: Vec<KeyUsage>,
        critical: Option<bool>,
    },
    ExtKeyUsage {
        purposes: Vec<ExtendedKeyUsage>,
        critical: Option<bool>,
    },
    SubjectAltName {
        #[serde(rename = "altNames")]
        alt_names: Vec<GeneralName>,
        critical: Option<bool>,
    },
    /// Any extension, given as a dotted OID and hex-encoded DER value.
    Raw {
        id: String,
        #[serde(default)]
        critical: bool,
        value: String,
    },
}

impl TryFrom<&ExtensionSpec> for Extension {
    type Error = Error;

    fn try_from(spec: &ExtensionSpec) -> Result<Self, Self::Error> {
        let (ext, critical) = match spec {
            ExtensionSpec::BasicConstraints {
                ca,
                path_len,
                critical,
            } => (Extension::basic_constraints(*ca, *path_len), *critical),
            ExtensionSpec::KeyUsage { usages, critical } => {
                (Extension::key_usage(usages), *critical)
            }
            ExtensionSpec::ExtKeyUsage { purposes, critical } => {
                (Extension::extended_key_usage(purposes), *critical)
            }
            ExtensionSpec::SubjectAltName {
                alt_names,
                critical,
            } => (Extension::subject_alt_name(alt_names)?, *critical),
            ExtensionSpec::Raw {
                id,
                critical,
                value,
            } => {
                let oid = oid::parse(id)
                    .ok_or_else(|| Error::InvalidExtension(format!("bad OID {id:?}")))?;
                let value = hex::decode(value.trim()).map_err(|err| {
                    Error::InvalidExtension(format!("value of {id} is not hex: {err}"))
                })?;
                (Extension::new(&oid, *critical, value), None)
            }
        };
        Ok(match critical {
            Some(critical) => ext.with_criticality(critical),
            None => ext,
        })
    }
}
