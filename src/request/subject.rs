use std::path::Path;

use anyhow::Context;
use certmint::{Attribute, AttributeType};
use rustyline::DefaultEditor;
use serde::{Deserialize, Serialize};

use crate::utils::{read_file, write_file};

/// On-disk subject, one `[[attribute]]` table per component, in order.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubjectFile {
    #[serde(rename = "attribute", default)]
    pub attributes: Vec<Attribute>,
}

pub fn read_subject_file(path: &Path) -> anyhow::Result<Vec<Attribute>> {
    let data = read_file(path)?;
    let file: SubjectFile =
        toml::from_str(&data).with_context(|| format!("Can't parse subject from file {path:?}"))?;
    Ok(file.attributes)
}

pub fn write_subject_file(path: &Path, attributes: &[Attribute]) -> anyhow::Result<()> {
    let file = SubjectFile {
        attributes: attributes.to_vec(),
    };
    write_file(path, &toml::to_string_pretty(&file)?, false)
}

const PROMPTS: [(&str, AttributeType); 5] = [
    ("Country > ", AttributeType::COUNTRY_NAME),
    ("State or Province > ", AttributeType::STATE_OR_PROVINCE_NAME),
    ("Locality > ", AttributeType::LOCALITY_NAME),
    ("Organization > ", AttributeType::ORGANIZATION_NAME),
    ("Common Name > ", AttributeType::COMMON_NAME),
];

pub fn get_subject_interactive(rl: &mut DefaultEditor) -> anyhow::Result<Vec<Attribute>> {
    let mut answers = Vec::with_capacity(PROMPTS.len());
    for (prompt, _) in &PROMPTS {
        answers.push(rl.readline(prompt)?);
    }
    Ok(subject_from_answers(answers))
}

/// Blank answers are left out of the subject.
fn subject_from_answers(answers: Vec<String>) -> Vec<Attribute> {
    PROMPTS
        .into_iter()
        .zip(answers)
        .filter_map(|((_, kind), answer)| {
            let answer = answer.trim();
            (!answer.is_empty()).then(|| Attribute::new(kind, answer))
        })
        .collect()
}
