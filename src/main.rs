use std::{fs::create_dir_all, path::Path};

use anyhow::{bail, Context};
use certmint::{inspect::CertificateSummary, IssueOptions, IssuedCertificate, SerialNumber};
use clap::Parser;
use cli::{create_plan, Cli, IssuePlan, Plan};
use config::read_config;
use directories::ProjectDirs;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;
use utils::{prompt_question, read_file, write_file};

mod cli;
mod config;
mod request;
mod utils;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("certmint=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = ProjectDirs::from("com", "mc1472", "certmint")
        .context("can't locate a home directory for the config file")?;
    let cli = Cli::parse();

    let config = read_config(&app, cli.config.as_deref())?;

    match create_plan(cli, &config).context("can't resolve the output directory")? {
        Plan::Issue(plan) => issue_cert(&plan)?,
        Plan::Serial { namespace } => println!("{}", SerialNumber::generate(&namespace)),
        Plan::Show { path } => {
            let pem = read_file(&path)?;
            let summary = CertificateSummary::from_pem(&pem)
                .with_context(|| format!("can't show {path:?}"))?;
            print!("{summary}");
        }
    }

    Ok(())
}

fn issue_cert(plan: &IssuePlan) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;

    create_dir_all(&plan.output_path)
        .with_context(|| format!("can't create {:?}", plan.output_path))?;
    let existing = [plan.cert_path(), plan.key_path()]
        .into_iter()
        .find(|path| path.exists());
    if let Some(existing) = existing {
        let question = format!("{existing:?} already exists. Overwrite? (y/N) ");
        let overwrite = plan.force || (plan.interactive && prompt_question(&mut rl, &question)?);
        if !overwrite {
            bail!("not overwriting existing certificate {existing:?}");
        }
    }

    let ca_cert = read_file(&plan.ca_cert)?;
    let ca_key = read_file(&plan.ca_key)?;

    let request = request::create_request(plan, &mut rl).context("can't build the request")?;

    let mut options = IssueOptions::new()
        .key_length(plan.key_length)
        .expiry_years(plan.expiry_years);
    if let Some(serial) = &plan.serial {
        options = options.serial_number(serial.parse()?);
    }

    let issued = certmint::issue(
        &ca_cert,
        &ca_key,
        &request.subject,
        &request.extensions,
        &options,
    )
    .with_context(|| format!("can't issue {}", plan.name))?;

    save_cert(&plan.output_path, &plan.name, &issued)?;
    eprintln!(
        "wrote {:?} and {:?} (serial {})",
        plan.cert_path(),
        plan.key_path(),
        issued.serial_number
    );
    Ok(())
}

fn save_cert(dir: &Path, name: &str, issued: &IssuedCertificate) -> anyhow::Result<()> {
    write_file(&dir.join(format!("{name}.pem")), &issued.cert_pem, false)?;
    write_file(&dir.join(format!("{name}.key")), &issued.private_key_pem, true)
}
