//! CA fixtures built on the fly with rcgen.

#![allow(dead_code)]

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose,
};
use rsa::{
    pkcs1::EncodeRsaPrivateKey,
    pkcs8::{EncodePrivateKey, LineEnding},
    RsaPrivateKey,
};
use x509_parser::pem::{parse_x509_pem, Pem};

pub struct TestCa {
    pub cert_pem: String,
    pub key_pem: String,
}

fn self_signed_ca(key: &KeyPair) -> String {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CountryName, "NZ");
    dn.push(DnType::OrganizationName, "Certmint Test");
    dn.push(DnType::CommonName, "Certmint Test CA");

    let mut params = CertificateParams::default();
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params.self_signed(key).unwrap().pem()
}

fn ca_from_key(key: KeyPair) -> TestCa {
    TestCa {
        cert_pem: self_signed_ca(&key),
        key_pem: key.serialize_pem(),
    }
}

/// ECDSA P-256 CA, the cheapest to build.
pub fn ecdsa_ca() -> TestCa {
    ca_from_key(KeyPair::generate().unwrap())
}

pub fn p384_ca() -> TestCa {
    ca_from_key(KeyPair::generate_for(&rcgen::PKCS_ECDSA_P384_SHA384).unwrap())
}

pub fn rsa_ca() -> TestCa {
    let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
    let pem = private_key.to_pkcs8_pem(LineEnding::LF).unwrap();
    ca_from_key(KeyPair::from_pem(&pem).unwrap())
}

/// RSA CA whose key is stored as a PKCS#1 `RSA PRIVATE KEY` block.
pub fn rsa_pkcs1_ca() -> TestCa {
    let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
    let pkcs8 = private_key.to_pkcs8_pem(LineEnding::LF).unwrap();
    let key = KeyPair::from_pem(&pkcs8).unwrap();
    TestCa {
        cert_pem: self_signed_ca(&key),
        key_pem: private_key.to_pkcs1_pem(LineEnding::LF).unwrap().to_string(),
    }
}

/// ECDSA P-256 CA whose key is stored as a SEC1 `EC PRIVATE KEY` block.
pub fn ecdsa_sec1_ca() -> TestCa {
    use p256::pkcs8::{DecodePrivateKey, LineEnding};

    let key = KeyPair::generate().unwrap();
    let secret_key = p256::SecretKey::from_pkcs8_pem(&key.serialize_pem()).unwrap();
    TestCa {
        cert_pem: self_signed_ca(&key),
        key_pem: secret_key.to_sec1_pem(LineEnding::LF).unwrap().to_string(),
    }
}

pub fn pem_block(pem: &str) -> Pem {
    parse_x509_pem(pem.as_bytes()).unwrap().1
}

pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
