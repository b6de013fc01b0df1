use time::{util::days_in_year_month, Date, OffsetDateTime};
use yasna::{
    models::{GeneralizedTime, UTCTime},
    DERWriter, Tag,
};

use crate::{
    error::{Error, Result},
    options::ResolvedOptions,
    serial::SerialNumber,
};

use self::{dn::Attribute, ext::Extension};

pub mod dn;
pub mod ext;

/// `[issued_at, issued_at + years]`, stepping calendar years. A 29 February
/// start lands on 28 February when the target year is not a leap year.
pub fn validity_window(
    issued_at: OffsetDateTime,
    years: u32,
) -> Result<(OffsetDateTime, OffsetDateTime)> {
    let out_of_range =
        || Error::InvalidOptions(format!("{years} years after {issued_at} is out of range"));

    let year = i32::try_from(years)
        .ok()
        .and_then(|years| issued_at.year().checked_add(years))
        .ok_or_else(out_of_range)?;
    let start = issued_at.date();
    let day = start.day().min(days_in_year_month(year, start.month()));
    let end = Date::from_calendar_date(year, start.month(), day).map_err(|_| out_of_range())?;

    Ok((issued_at, issued_at.replace_date(end)))
}

/// The parts of a leaf certificate that don't depend on any key.
#[derive(Debug, Clone)]
pub(crate) struct LeafTemplate {
    pub serial_number: SerialNumber,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    /// DER `Name`.
    pub subject: Vec<u8>,
    pub extensions: Vec<Extension>,
}

impl LeafTemplate {
    pub(crate) fn new(
        options: &ResolvedOptions,
        subject: &[Attribute],
        extensions: &[Extension],
    ) -> Result<Self> {
        let (not_before, not_after) = validity_window(options.issued_at, options.expiry_years)?;
        Ok(Self {
            serial_number: options.serial_number.clone(),
            not_before,
            not_after,
            subject: dn::encode_name(subject),
            extensions: extensions.to_vec(),
        })
    }

    /// DER `TBSCertificate` (always v3). `signature_algorithm` and `issuer`
    /// are copied in verbatim.
    pub(crate) fn tbs_certificate(
        &self,
        signature_algorithm: &[u8],
        issuer: &[u8],
        subject_public_key_info: &[u8],
    ) -> Vec<u8> {
        yasna::construct_der(|writer| {
            writer.write_sequence(|writer| {
                writer
                    .next()
                    .write_tagged(Tag::context(0), |writer| writer.write_u8(2));
                self.serial_number.write(writer.next());
                writer.next().write_der(signature_algorithm);
                writer.next().write_der(issuer);
                writer.next().write_sequence(|writer| {
                    write_time(writer.next(), self.not_before);
                    write_time(writer.next(), self.not_after);
                });
                writer.next().write_der(&self.subject);
                writer.next().write_der(subject_public_key_info);
                if !self.extensions.is_empty() {
                    writer.next().write_tagged(Tag::context(3), |writer| {
                        writer.write_sequence(|writer| {
                            for extension in &self.extensions {
                                extension.write(writer.next());
                            }
                        })
                    });
                }
            })
        })
    }
}

/// UTCTime for 1950 through 2049, GeneralizedTime otherwise.
fn write_time(writer: DERWriter, at: OffsetDateTime) {
    if (1950..2050).contains(&at.year()) {
        writer.write_utctime(&UTCTime::from_datetime(at));
    } else {
        writer.write_generalized_time(&GeneralizedTime::from_datetime(at));
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use x509_parser::{certificate::TbsCertificate, prelude::FromDer, x509::X509Version};
    use yasna::models::ObjectIdentifier;

    use super::{dn::AttributeType, ext::KeyUsage, *};

    #[test]
    fn validity_steps_calendar_years() {
        let (from, to) = validity_window(datetime!(2023-06-15 08:00:00 UTC), 1).unwrap();
        assert_eq!(from, datetime!(2023-06-15 08:00:00 UTC));
        assert_eq!(to, datetime!(2024-06-15 08:00:00 UTC));

        // 2024 is a leap year, the span is 366 days
        let (from, to) = validity_window(datetime!(2023-12-01 00:00:00 UTC), 1).unwrap();
        assert_eq!((to - from).whole_days(), 366);
    }

    #[test]
    fn leap_day_clamps_in_common_years() {
        let (_, to) = validity_window(datetime!(2024-02-29 10:11:12 UTC), 1).unwrap();
        assert_eq!(to, datetime!(2025-02-28 10:11:12 UTC));

        let (_, to) = validity_window(datetime!(2024-02-29 10:11:12 UTC), 4).unwrap();
        assert_eq!(to, datetime!(2028-02-29 10:11:12 UTC));
    }

    #[test]
    fn validity_past_supported_dates_is_an_error() {
        let result = validity_window(datetime!(9999-01-01 00:00:00 UTC), 1);
        assert!(matches!(result, Err(Error::InvalidOptions(_))));

        let result = validity_window(datetime!(2024-01-01 00:00:00 UTC), u32::MAX);
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn times_switch_to_generalized_from_2050() {
        let der = |at: OffsetDateTime| yasna::construct_der(|writer| write_time(writer, at));

        assert_eq!(der(datetime!(2049-12-31 23:59:59 UTC)), b"\x17\x0d491231235959Z");
        assert_eq!(der(datetime!(2050-01-01 00:00:00 UTC)), b"\x18\x0f20500101000000Z");
    }

    fn rsa_spki_placeholder() -> Vec<u8> {
        yasna::construct_der(|writer| {
            writer.write_sequence(|writer| {
                writer.next().write_sequence(|writer| {
                    writer
                        .next()
                        .write_oid(&ObjectIdentifier::from_slice(&[1, 2, 840, 113549, 1, 1, 1]));
                    writer.next().write_null();
                });
                writer.next().write_bitvec_bytes(&[0x00], 8);
            })
        })
    }

    #[test]
    fn tbs_certificate_carries_every_field() {
        let options = ResolvedOptions {
            key_length: 2048,
            expiry_years: 2,
            serial_number: "00c0ffee".parse::<SerialNumber>().unwrap(),
            issued_at: datetime!(2024-02-29 00:00:00 UTC),
        };
        let subject = [
            dn::Attribute::new(AttributeType::ORGANIZATIONAL_UNIT_NAME, "a"),
            dn::Attribute::new(AttributeType::ORGANIZATIONAL_UNIT_NAME, "b"),
            dn::Attribute::common_name("leaf"),
        ];
        let extensions = [
            Extension::basic_constraints(false, None),
            Extension::key_usage(&[KeyUsage::DigitalSignature]).with_criticality(false),
        ];
        let issuer = dn::encode_name(&[dn::Attribute::common_name("Issuing CA")]);
        let algorithm = yasna::construct_der(|writer| {
            writer.write_sequence(|writer| {
                writer
                    .next()
                    .write_oid(&ObjectIdentifier::from_slice(&[1, 2, 840, 10045, 4, 3, 2]));
            })
        });

        let template = LeafTemplate::new(&options, &subject, &extensions).unwrap();
        let tbs = template.tbs_certificate(&algorithm, &issuer, &rsa_spki_placeholder());
        let (rest, parsed) = TbsCertificate::from_der(&tbs).unwrap();

        assert!(rest.is_empty());
        assert_eq!(parsed.version, X509Version::V3);
        assert_eq!(parsed.raw_serial(), &[0x00, 0xc0, 0xff, 0xee]);
        assert_eq!(parsed.signature.algorithm.to_id_string(), "1.2.840.10045.4.3.2");
        assert_eq!(parsed.issuer.as_raw(), issuer.as_slice());
        assert_eq!(parsed.subject.as_raw(), template.subject.as_slice());
        assert_eq!(parsed.subject.iter_organizational_unit().count(), 2);
        assert_eq!(
            parsed.validity.not_before.to_datetime(),
            datetime!(2024-02-29 00:00:00 UTC)
        );
        assert_eq!(
            parsed.validity.not_after.to_datetime(),
            datetime!(2026-02-28 00:00:00 UTC)
        );

        let written: Vec<_> = parsed
            .extensions()
            .iter()
            .map(|ext| (ext.oid.to_id_string(), ext.critical))
            .collect();
        assert_eq!(
            written,
            vec![("2.5.29.19".to_owned(), true), ("2.5.29.15".to_owned(), false)]
        );
    }
}
