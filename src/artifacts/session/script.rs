use crate::artifacts::session::command::SessionCommand;

/// Ordered, append-only list of editor directives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionScript {
    commands: Vec<SessionCommand>,
}

impl SessionScript {
    pub fn push(&mut self, command: SessionCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[SessionCommand] {
        &self.commands
    }

    /// Render the script as newline-terminated ex commands
    pub fn render(&self) -> String {
        self.commands
            .iter()
            .map(|command| format!("{}\n", command))
            .collect()
    }
}

impl IntoIterator for SessionScript {
    type Item = SessionCommand;
    type IntoIter = std::vec::IntoIter<SessionCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
