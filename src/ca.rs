//! The signing CA: its key, its subject name and the signature it produces.

use rcgen::{KeyPair, SigningKey, PKCS_ECDSA_P256_SHA256, PKCS_RSA_SHA256};
use x509_parser::pem::parse_x509_pem;
use yasna::models::ObjectIdentifier;

use crate::{
    error::{Error, Result},
    keygen,
};

const SHA256_WITH_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 11];
const ECDSA_WITH_SHA256: &[u64] = &[1, 2, 840, 10045, 4, 3, 2];

pub(crate) struct CertificateAuthority {
    key_pair: KeyPair,
    /// The CA certificate's subject `Name`, byte for byte.
    subject: Vec<u8>,
    /// DER `AlgorithmIdentifier` of the signatures this key produces.
    signature_algorithm: Vec<u8>,
}

impl CertificateAuthority {
    /// Decode the CA certificate and key and check that they belong together.
    pub(crate) fn from_pem(cert_pem: &str, key_pem: &str) -> Result<Self> {
        let (_, pem) = parse_x509_pem(cert_pem.as_bytes()).map_err(Error::ca_cert)?;
        if pem.label != "CERTIFICATE" {
            return Err(Error::ca_cert(format!(
                "expected a CERTIFICATE block, got {}",
                pem.label
            )));
        }
        let cert = pem.parse_x509().map_err(Error::ca_cert)?;
        let key_pair = keygen::load_ca_key(key_pem)?;

        let alg = key_pair.algorithm();
        let signature_algorithm = if alg == &PKCS_RSA_SHA256 {
            algorithm_identifier(SHA256_WITH_RSA_ENCRYPTION, true)
        } else if alg == &PKCS_ECDSA_P256_SHA256 {
            algorithm_identifier(ECDSA_WITH_SHA256, false)
        } else {
            return Err(Error::Signing(format!(
                "CA key algorithm {alg:?} can't sign with SHA-256"
            )));
        };

        let cert_public_key = cert.tbs_certificate.subject_pki.subject_public_key.data.as_ref();
        if cert_public_key != key_pair.public_key_raw() {
            return Err(Error::Signing(
                "CA private key does not match the CA certificate".into(),
            ));
        }

        Ok(Self {
            subject: cert.subject().as_raw().to_vec(),
            key_pair,
            signature_algorithm,
        })
    }

    pub(crate) fn subject(&self) -> &[u8] {
        &self.subject
    }

    pub(crate) fn signature_algorithm(&self) -> &[u8] {
        &self.signature_algorithm
    }

    /// Sign a DER TBSCertificate and wrap it into a DER Certificate.
    pub(crate) fn sign(&self, tbs_certificate: &[u8]) -> Result<Vec<u8>> {
        let signature = self
            .key_pair
            .sign(tbs_certificate)
            .map_err(|err| Error::Signing(err.to_string()))?;
        Ok(yasna::construct_der(|writer| {
            writer.write_sequence(|writer| {
                writer.next().write_der(tbs_certificate);
                writer.next().write_der(&self.signature_algorithm);
                writer
                    .next()
                    .write_bitvec_bytes(&signature, signature.len() * 8);
            })
        }))
    }
}

/// RSA signature algorithms carry explicit NULL parameters, ECDSA ones none.
fn algorithm_identifier(oid: &[u64], null_parameters: bool) -> Vec<u8> {
    yasna::construct_der(|writer| {
        writer.write_sequence(|writer| {
            writer.next().write_oid(&ObjectIdentifier::from_slice(oid));
            if null_parameters {
                writer.next().write_null();
            }
        })
    })
}
