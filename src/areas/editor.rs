use crate::artifacts::session::script::SessionScript;
use anyhow::Context;
use std::process::Command;

const DEFAULT_EDITOR: &str = "vim";

/// The editor process that plays a session script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: String,
    args: Vec<String>,
}

impl Editor {
    /// Resolve the editor from an explicit choice, then `$EDITOR`, then vim
    pub fn resolve(explicit: Option<&str>) -> Self {
        let env_editor = std::env::var("EDITOR").ok();
        let command_line = explicit
            .map(str::to_string)
            .or(env_editor)
            .filter(|editor| !editor.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        Self::from_command_line(&command_line)
    }

    fn from_command_line(command_line: &str) -> Self {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        Editor {
            program,
            args: words.collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn open(&self, script: &SessionScript) -> anyhow::Result<()> {
        log::info!("launching {} with {} command(s)", self.program, script.commands().len());

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg("-c")
            .arg(script.render())
            .status()
            .with_context(|| format!("Unable to launch editor {}", self.program))?;

        if !status.success() {
            anyhow::bail!("Editor {} exited with {}", self.program, status);
        }

        Ok(())
    }
}
