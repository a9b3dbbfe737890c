//! Editor directives and their Vim ex-command rendering

use crate::artifacts::objects::object_id::ObjectId;
use std::path::{Path, PathBuf};

/// Which line of a freshly read buffer is left over by the read command
///
/// `Last` reads the blob above the initial empty line (`0read`) and drops the trailing line,
/// `First` reads it below (`read`) and drops the leading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactLine {
    #[default]
    Last,
    First,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    ChangeDirectory(PathBuf),
    ShowStatusLine,
    OpenTab,
    ReadBlob { oid: ObjectId, artifact: ArtifactLine },
    EditFile(PathBuf),
    DeleteArtifactLine(ArtifactLine),
    SetReadonly,
    NameBuffer(String),
    DetectFiletype(PathBuf),
    SetStatusLabel(String),
    GotoFirstLine,
    SplitVertically,
    EnableDiff,
    FocusRightPane,
    SelectFirstTab,
    CloseTab,
}

impl std::fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionCommand::ChangeDirectory(path) => write!(f, "cd {}", escape_path(path)),
            SessionCommand::ShowStatusLine => write!(f, "set laststatus=2"),
            SessionCommand::OpenTab => write!(f, "tabnew"),
            SessionCommand::ReadBlob { oid, artifact } => {
                let position = match artifact {
                    ArtifactLine::Last => "0read",
                    ArtifactLine::First => "read",
                };
                write!(f, "silent {} !git --no-pager show {}", position, oid)
            }
            SessionCommand::EditFile(path) => write!(f, "e {}", escape_path(path)),
            SessionCommand::DeleteArtifactLine(ArtifactLine::Last) => write!(f, "$d"),
            SessionCommand::DeleteArtifactLine(ArtifactLine::First) => write!(f, "1d"),
            SessionCommand::SetReadonly => {
                writeln!(f, "set buftype=nowrite")?;
                writeln!(f, "setlocal nomodifiable")?;
                write!(f, "setlocal noswapfile")
            }
            SessionCommand::NameBuffer(name) => write!(f, "silent file {}", escape_file_name(name)),
            SessionCommand::DetectFiletype(path) => {
                write!(f, "silent doautocmd filetypedetect BufRead {}", escape_path(path))
            }
            SessionCommand::SetStatusLabel(label) => {
                write!(f, "setlocal statusline={}", escape_option_value(label))
            }
            SessionCommand::GotoFirstLine => write!(f, "0"),
            SessionCommand::SplitVertically => {
                writeln!(f, "vertical diffsplit")?;
                write!(f, "enew")
            }
            SessionCommand::EnableDiff => write!(f, "diffthis"),
            SessionCommand::FocusRightPane => write!(f, "wincmd l"),
            SessionCommand::SelectFirstTab => write!(f, "tabfirst"),
            SessionCommand::CloseTab => write!(f, "bdelete"),
        }
    }
}

// Same set as Vim's fnameescape(); backslash is a path separator on Windows
#[cfg(not(windows))]
const FILE_NAME_SPECIAL: &str = " \t*?[{`$\\%#'\"|!<";
#[cfg(windows)]
const FILE_NAME_SPECIAL: &str = " \t*?[{`$%#'\"|!<";

fn escape_path(path: &Path) -> String {
    escape_file_name(&path.to_string_lossy())
}

/// Escape a file name argument of `:edit`, `:file`, `:cd` or `:doautocmd`
fn escape_file_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());

    // a leading `+` would be read as `+cmd`, a lone `-` as the previous directory
    if name.starts_with(['+', '>']) || name == "-" {
        escaped.push('\\');
    }

    for c in name.chars() {
        if FILE_NAME_SPECIAL.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Escape the value of a `:set` option; `%` is doubled since statusline expands it
fn escape_option_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            ' ' | '|' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '%' => escaped.push_str("%%"),
            _ => escaped.push(c),
        }
    }

    escaped
}
