use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use anyhow::Context;
use rustyline::DefaultEditor;

pub fn prompt_question(rl: &mut DefaultEditor, question: &str) -> anyhow::Result<bool> {
    let responce = rl.readline(question)?;
    Ok(is_yes(&responce))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("can't read {path:?}"))
}

/// Create or truncate `path`. Secret files are created owner-only on unix.
pub fn write_file(path: &Path, contents: &str, secret: bool) -> anyhow::Result<()> {
    let mut options = File::options();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if secret {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = secret;

    options
        .open(path)
        .with_context(|| format!("can't open file {path:?}"))?
        .write_all(contents.as_bytes())
        .with_context(|| format!("can't write file {path:?}"))
}
