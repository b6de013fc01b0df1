use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use yasna::models::ObjectIdentifier;

use crate::{error::Error, oid};

/// The type of one distinguished name component, identified by OID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeType(Cow<'static, [u64]>);

impl AttributeType {
    pub const COMMON_NAME: Self = Self(Cow::Borrowed(&[2, 5, 4, 3]));
    pub const SERIAL_NUMBER: Self = Self(Cow::Borrowed(&[2, 5, 4, 5]));
    pub const COUNTRY_NAME: Self = Self(Cow::Borrowed(&[2, 5, 4, 6]));
    pub const LOCALITY_NAME: Self = Self(Cow::Borrowed(&[2, 5, 4, 7]));
    pub const STATE_OR_PROVINCE_NAME: Self = Self(Cow::Borrowed(&[2, 5, 4, 8]));
    pub const STREET_ADDRESS: Self = Self(Cow::Borrowed(&[2, 5, 4, 9]));
    pub const ORGANIZATION_NAME: Self = Self(Cow::Borrowed(&[2, 5, 4, 10]));
    pub const ORGANIZATIONAL_UNIT_NAME: Self = Self(Cow::Borrowed(&[2, 5, 4, 11]));
    pub const EMAIL_ADDRESS: Self = Self(Cow::Borrowed(&[1, 2, 840, 113549, 1, 9, 1]));

    const NAMED: [(&'static str, &'static str, Self); 9] = [
        ("commonName", "CN", Self::COMMON_NAME),
        ("serialNumber", "SERIALNUMBER", Self::SERIAL_NUMBER),
        ("countryName", "C", Self::COUNTRY_NAME),
        ("localityName", "L", Self::LOCALITY_NAME),
        ("stateOrProvinceName", "ST", Self::STATE_OR_PROVINCE_NAME),
        ("streetAddress", "STREET", Self::STREET_ADDRESS),
        ("organizationName", "O", Self::ORGANIZATION_NAME),
        ("organizationalUnitName", "OU", Self::ORGANIZATIONAL_UNIT_NAME),
        ("emailAddress", "E", Self::EMAIL_ADDRESS),
    ];

    pub fn from_oid(arcs: &[u64]) -> Self {
        Self(Cow::Owned(arcs.to_vec()))
    }

    pub fn oid(&self) -> &[u64] {
        &self.0
    }

    fn name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, _, ty)| ty == self)
            .map(|(name, _, _)| *name)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&oid::format(&self.0)),
        }
    }
}

impl FromStr for AttributeType {
    type Err = Error;

    /// Accepts a long name (`commonName`), a short name (`CN`) or a dotted OID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::NAMED
            .iter()
            .find(|(name, short, _)| *name == s || short.eq_ignore_ascii_case(s))
            .map(|(_, _, ty)| ty.clone())
            .or_else(|| oid::parse(s).map(|arcs| Self::from_oid(&arcs)))
            .ok_or_else(|| Error::InvalidSubject(format!("unknown attribute type {s:?}")))
    }
}

impl TryFrom<String> for AttributeType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        value.to_string()
    }
}

/// One subject component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type", alias = "name", alias = "shortName")]
    pub kind: AttributeType,
    pub value: String,
}

impl Attribute {
    pub fn new(kind: AttributeType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn common_name(value: impl Into<String>) -> Self {
        Self::new(AttributeType::COMMON_NAME, value)
    }
}

/// DER `Name` with one RDN per attribute, in the given order. Repeated
/// attribute types are kept as separate RDNs.
pub fn encode_name(attributes: &[Attribute]) -> Vec<u8> {
    yasna::construct_der(|writer| {
        writer.write_sequence_of(|writer| {
            for attribute in attributes {
                writer.next().write_set(|writer| {
                    writer.next().write_sequence(|writer| {
                        writer
                            .next()
                            .write_oid(&ObjectIdentifier::from_slice(attribute.kind.oid()));
                        attribute.write_value(writer.next());
                    });
                });
            }
        })
    })
}

impl Attribute {
    /// countryName and serialNumber are PrintableString, emailAddress is
    /// IA5String, everything else UTF8String. Values outside the narrower
    /// character sets fall back to UTF8String.
    fn write_value(&self, writer: yasna::DERWriter) {
        let value = self.value.as_str();
        let kind = &self.kind;
        if (*kind == AttributeType::COUNTRY_NAME || *kind == AttributeType::SERIAL_NUMBER)
            && value.chars().all(is_printable)
        {
            writer.write_printable_string(value);
        } else if *kind == AttributeType::EMAIL_ADDRESS && value.is_ascii() {
            writer.write_ia5_string(value);
        } else {
            writer.write_utf8_string(value);
        }
    }
}

fn is_printable(c: char) -> bool {
    c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_types_parse_by_name_short_name_and_oid() {
        assert_eq!("commonName".parse::<AttributeType>().unwrap(), AttributeType::COMMON_NAME);
        assert_eq!("cn".parse::<AttributeType>().unwrap(), AttributeType::COMMON_NAME);
        assert_eq!("2.5.4.10".parse::<AttributeType>().unwrap(), AttributeType::ORGANIZATION_NAME);

        let custom: AttributeType = "1.3.6.1.4.1.99999.1".parse().unwrap();
        assert_eq!(custom.to_string(), "1.3.6.1.4.1.99999.1");
        assert_eq!(AttributeType::COUNTRY_NAME.to_string(), "countryName");

        assert!("favouriteColour".parse::<AttributeType>().is_err());
    }

    #[test]
    fn subject_reads_from_toml() {
        #[derive(Deserialize)]
        struct File {
            subject: Vec<Attribute>,
        }

        let file: File = toml::from_str(
            r#"
            [[subject]]
            shortName = "C"
            value = "NZ"

            [[subject]]
            name = "organizationName"
            value = "Example Ltd"

            [[subject]]
            type = "2.5.4.3"
            value = "svc.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(
            file.subject,
            vec![
                Attribute::new(AttributeType::COUNTRY_NAME, "NZ"),
                Attribute::new(AttributeType::ORGANIZATION_NAME, "Example Ltd"),
                Attribute::common_name("svc.example.com"),
            ]
        );
    }

    #[test]
    fn name_encoding_keeps_order_and_string_types() {
        let name = encode_name(&[
            Attribute::new(AttributeType::COUNTRY_NAME, "NZ"),
            Attribute::common_name("a"),
        ]);

        assert_eq!(
            name,
            vec![
                0x30, 0x19, // Name
                0x31, 0x0b, 0x30, 0x09, 0x06, 0x03, 0x55, 0x04, 0x06, // C
                0x13, 0x02, b'N', b'Z', // PrintableString
                0x31, 0x0a, 0x30, 0x08, 0x06, 0x03, 0x55, 0x04, 0x03, // CN
                0x0c, 0x01, b'a', // UTF8String
            ]
        );
    }

    #[test]
    fn repeated_attribute_types_stay_separate() {
        let name = encode_name(&[
            Attribute::new(AttributeType::ORGANIZATIONAL_UNIT_NAME, "a"),
            Attribute::new(AttributeType::ORGANIZATIONAL_UNIT_NAME, "b"),
        ]);

        let ou = |value: u8| {
            [0x31, 0x0a, 0x30, 0x08, 0x06, 0x03, 0x55, 0x04, 0x0b, 0x0c, 0x01, value]
        };
        let mut expected = vec![0x30, 0x18];
        expected.extend(ou(b'a'));
        expected.extend(ou(b'b'));
        assert_eq!(name, expected);
    }

    #[test]
    fn value_string_types_fall_back_to_utf8() {
        let email = encode_name(&[Attribute::new(AttributeType::EMAIL_ADDRESS, "a@b")]);
        assert_eq!(email[email.len() - 5], 0x16);

        let country = encode_name(&[Attribute::new(AttributeType::COUNTRY_NAME, "Ö")]);
        assert_eq!(country[country.len() - 4], 0x0c);
    }

    #[test]
    fn empty_subject_is_an_empty_name() {
        assert_eq!(encode_name(&[]), vec![0x30, 0x00]);
    }
}
