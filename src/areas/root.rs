//! Post-processing of the repository root before it is handed to the editor
//!
//! Under Cygwin/MSYS, git reports POSIX-style roots that a native editor cannot `cd` into,
//! so the root is run through `cygpath -w` whenever that tool is available.

use anyhow::Context;
use std::process::Command;

const CYGPATH: &str = "cygpath";

pub trait RootTranslator {
    fn translate(&self, root: &str) -> anyhow::Result<String>;
}

/// Leaves the root untouched
pub struct Identity;

impl RootTranslator for Identity {
    fn translate(&self, root: &str) -> anyhow::Result<String> {
        Ok(root.to_string())
    }
}

/// Converts the root with `cygpath -w`
pub struct Cygpath;

impl RootTranslator for Cygpath {
    fn translate(&self, root: &str) -> anyhow::Result<String> {
        let output = Command::new(CYGPATH)
            .arg("-w")
            .arg(root)
            .output()
            .context("Unable to run cygpath")?;

        if !output.status.success() {
            anyhow::bail!(
                "cygpath failed for {}: {}",
                root,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(strip_line_ending(String::from_utf8(output.stdout)?))
    }
}

/// Pick the translator for the current host
pub fn detect() -> Box<dyn RootTranslator> {
    if is_on_path(CYGPATH) {
        log::debug!("cygpath found, translating repository root");
        Box::new(Cygpath)
    } else {
        Box::new(Identity)
    }
}

fn is_on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                dir.join(program).is_file() || dir.join(format!("{}.exe", program)).is_file()
            })
        })
        .unwrap_or(false)
}

pub(crate) fn strip_line_ending(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}
