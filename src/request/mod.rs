//! Gathers the subject and extensions for a certificate from files or prompts.

use anyhow::bail;
use certmint::{Attribute, Extension};
use rustyline::DefaultEditor;
use tracing::info;

use crate::cli::IssuePlan;

use self::{
    extensions::{get_alt_names_interactive, leaf_defaults, read_extensions_file, to_extensions},
    subject::{get_subject_interactive, read_subject_file, write_subject_file},
};

pub mod extensions;
pub mod subject;

pub struct Request {
    pub subject: Vec<Attribute>,
    pub extensions: Vec<Extension>,
}

pub fn create_request(plan: &IssuePlan, rl: &mut DefaultEditor) -> anyhow::Result<Request> {
    Ok(Request {
        subject: get_subject(plan, rl)?,
        extensions: get_extensions(plan, rl)?,
    })
}

fn get_subject(plan: &IssuePlan, rl: &mut DefaultEditor) -> anyhow::Result<Vec<Attribute>> {
    let path = &plan.subject_file;
    if path.exists() {
        return read_subject_file(path);
    }
    if !plan.interactive {
        bail!("subject file {path:?} not found and user input disabled");
    }
    let subject = get_subject_interactive(rl)?;
    write_subject_file(path, &subject)?;
    info!(path = ?path, "saved subject");
    Ok(subject)
}

fn get_extensions(plan: &IssuePlan, rl: &mut DefaultEditor) -> anyhow::Result<Vec<Extension>> {
    let specs = match &plan.extensions_file {
        Some(path) => read_extensions_file(path)?,
        None if plan.interactive => leaf_defaults(get_alt_names_interactive(rl)?),
        None => leaf_defaults(Vec::new()),
    };
    to_extensions(&specs)
}
