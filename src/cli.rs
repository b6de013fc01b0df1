use std::{env::current_dir, io, path::PathBuf};

use clap::{arg, Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// the config file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a certificate and key signed by the CA.
    Issue(IssueArgs),
    /// Print a freshly generated serial number.
    Serial(SerialArgs),
    /// Print a summary of a PEM certificate.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct IssueArgs {
    /// Directory holding ca_cert.pem and ca_cert.key.
    #[arg(long)]
    ca_dir: Option<PathBuf>,
    #[arg(long)]
    ca_cert: Option<PathBuf>,
    #[arg(long)]
    ca_key: Option<PathBuf>,
    /// Subject TOML file, NAME.subject.toml in the output dir by default.
    #[arg(long)]
    subject: Option<PathBuf>,
    /// Extensions TOML file.
    #[arg(long)]
    extensions: Option<PathBuf>,
    #[arg(long)]
    key_length: Option<usize>,
    #[arg(long)]
    years: Option<u32>,
    /// Serial number as hex.
    #[arg(long)]
    serial: Option<String>,
    /// Output dir
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    non_interactive: bool,
    #[arg(long, short)]
    force: bool,
    name: String,
}

#[derive(Args, Debug)]
struct SerialArgs {
    namespace: Option<String>,
}

#[derive(Args, Debug)]
struct ShowArgs {
    path: PathBuf,
}

#[derive(Debug)]
pub enum Plan {
    Issue(IssuePlan),
    Serial { namespace: String },
    Show { path: PathBuf },
}

#[derive(Debug)]
pub struct IssuePlan {
    pub name: String,
    pub ca_cert: PathBuf,
    pub ca_key: PathBuf,
    pub subject_file: PathBuf,
    pub extensions_file: Option<PathBuf>,
    pub key_length: usize,
    pub expiry_years: u32,
    pub serial: Option<String>,
    pub output_path: PathBuf,
    pub force: bool,
    pub interactive: bool,
}

impl IssuePlan {
    pub fn cert_path(&self) -> PathBuf {
        self.output_path.join(format!("{}.pem", self.name))
    }

    pub fn key_path(&self) -> PathBuf {
        self.output_path.join(format!("{}.key", self.name))
    }
}

pub fn create_plan(cli: Cli, config: &Config) -> io::Result<Plan> {
    Ok(match cli.command {
        Commands::Issue(args) => {
            let ca_dir = args
                .ca_dir
                .unwrap_or_else(|| config.ca.default_ca_path.clone());
            let output_path = match args.out {
                Some(out) => out,
                None => current_dir()?,
            };
            let subject_file = args
                .subject
                .unwrap_or_else(|| output_path.join(format!("{}.subject.toml", args.name)));
            Plan::Issue(IssuePlan {
                ca_cert: args.ca_cert.unwrap_or_else(|| ca_dir.join("ca_cert.pem")),
                ca_key: args.ca_key.unwrap_or_else(|| ca_dir.join("ca_cert.key")),
                subject_file,
                extensions_file: args.extensions,
                key_length: args.key_length.unwrap_or(config.issue.key_length),
                expiry_years: args.years.unwrap_or(config.issue.expiry_years),
                serial: args.serial,
                output_path,
                force: args.force,
                interactive: !args.non_interactive,
                name: args.name,
            })
        }
        Commands::Serial(args) => Plan::Serial {
            namespace: args.namespace.unwrap_or_default(),
        },
        Commands::Show(args) => Plan::Show { path: args.path },
    })
}
