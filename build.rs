use std::env;

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate_to, Shell};

include!("src/cli.rs");

mod config {
    use std::path::PathBuf;
    pub struct Config {
        pub ca: CaConfig,
        pub issue: IssueConfig,
    }

    pub struct CaConfig {
        pub default_ca_path: PathBuf,
    }

    pub struct IssueConfig {
        pub key_length: usize,
        pub expiry_years: u32,
    }
}

fn main() -> Result<(), std::io::Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    let out_dir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(out_dir) => out_dir,
    };
    let mut cli_cmd = Cli::command();
    for &shell in Shell::value_variants() {
        generate_to(shell, &mut cli_cmd, "certmint", &out_dir)?;
    }

    Ok(())
}
