use std::{net::IpAddr, path::Path};

use anyhow::Context;
use certmint::{Extension, ExtensionSpec, GeneralName, KeyUsage};
use rustyline::DefaultEditor;
use serde::{Deserialize, Serialize};

use crate::utils::read_file;

/// On-disk extension list, one `[[extension]]` table per extension, in order.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExtensionsFile {
    #[serde(rename = "extension", default)]
    pub extensions: Vec<ExtensionSpec>,
}

pub fn read_extensions_file(path: &Path) -> anyhow::Result<Vec<ExtensionSpec>> {
    let data = read_file(path)?;
    let file: ExtensionsFile = toml::from_str(&data)
        .with_context(|| format!("Can't parse extensions from file {path:?}"))?;
    Ok(file.extensions)
}

/// basicConstraints cA=false and keyUsage digitalSignature+keyEncipherment,
/// followed by a subjectAltName when there are any names.
pub fn leaf_defaults(alt_names: Vec<GeneralName>) -> Vec<ExtensionSpec> {
    let mut specs = vec![
        ExtensionSpec::BasicConstraints {
            ca: false,
            path_len: None,
            critical: None,
        },
        ExtensionSpec::KeyUsage {
            usages: vec![KeyUsage::DigitalSignature, KeyUsage::KeyEncipherment],
            critical: None,
        },
    ];
    if !alt_names.is_empty() {
        specs.push(ExtensionSpec::SubjectAltName {
            alt_names,
            critical: None,
        });
    }
    specs
}

pub fn to_extensions(specs: &[ExtensionSpec]) -> anyhow::Result<Vec<Extension>> {
    specs
        .iter()
        .map(|spec| Extension::try_from(spec).with_context(|| format!("bad extension {spec:?}")))
        .collect()
}

/// Comma separated names. IP addresses, `user@host` and `scheme://...` are
/// recognised, anything else is taken as a DNS name.
pub fn parse_alt_names(line: &str) -> Vec<GeneralName> {
    line.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            if let Ok(ip) = name.parse::<IpAddr>() {
                GeneralName::Ip(ip)
            } else if name.contains("://") {
                GeneralName::Uri(name.to_owned())
            } else if name.contains('@') {
                GeneralName::Email(name.to_owned())
            } else {
                GeneralName::Dns(name.to_owned())
            }
        })
        .collect()
}

pub fn get_alt_names_interactive(rl: &mut DefaultEditor) -> anyhow::Result<Vec<GeneralName>> {
    let line = rl.readline("Subject alt names (comma separated) > ")?;
    Ok(parse_alt_names(&line))
}
