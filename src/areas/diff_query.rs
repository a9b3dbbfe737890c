//! Runs `git diff` in raw mode and parses its output as it streams in

use crate::artifacts::changes::change::Change;
use crate::artifacts::changes::raw_parser::RawParser;
use anyhow::Context;
use derive_new::new;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::{Command, Stdio};

const RAW_DIFF_ARGS: [&str; 5] = ["--no-pager", "diff", "--raw", "-z", "--abbrev=40"];

#[derive(Debug, Clone, new)]
pub struct DiffQuery {
    /// Extra arguments passed through to `git diff` (revisions, `--cached`, pathspecs)
    args: Vec<String>,
    /// Directory git runs in; pathspecs are relative to it
    #[new(default)]
    dir: Option<PathBuf>,
}

impl DiffQuery {
    pub fn in_dir(mut self, dir: PathBuf) -> Self {
        self.dir = Some(dir);
        self
    }

    pub fn run(&self) -> anyhow::Result<Vec<Change>> {
        let mut command = Command::new("git");
        command
            .args(RAW_DIFF_ARGS)
            .args(&self.args)
            .stdout(Stdio::piped());
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }

        log::debug!("running git {} {}", RAW_DIFF_ARGS.join(" "), self.args.join(" "));
        let mut child = command.spawn().context("Unable to run git diff")?;
        let stdout = child
            .stdout
            .take()
            .context("git diff did not provide an output stream")?;

        let parsed = RawParser::new(BufReader::new(stdout)).parse_all();
        if parsed.is_err() {
            // git may still be blocked writing the rest of its output
            let _ = child.kill();
        }
        let status = child.wait().context("Unable to wait for git diff")?;

        let changes = parsed.context("Malformed git diff output")?;
        if !status.success() {
            anyhow::bail!("git diff exited with {}", status);
        }

        Ok(changes)
    }
}
