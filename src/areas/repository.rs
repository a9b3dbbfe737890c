use crate::areas::database::Database;
use crate::areas::root::{self, RootTranslator};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::session::error::ResolutionError;
use crate::artifacts::session::resolver::ContentResolver;
use anyhow::Context;
use bytes::Bytes;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct Repository {
    // root as the editor must see it, after translation
    editor_root: PathBuf,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Self {
        Repository {
            editor_root: path.to_path_buf(),
            writer: RefCell::new(writer),
            database: Database::new(path.into()),
            workspace: Workspace::new(path.into()),
        }
    }

    /// Find the repository containing `dir` and prepare its root for the host's editor
    pub fn discover(dir: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        Self::discover_with(dir, root::detect().as_ref(), writer)
    }

    pub fn discover_with(
        dir: &Path,
        translator: &dyn RootTranslator,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .output()
            .context("Unable to run git rev-parse")?;

        if !output.status.success() {
            anyhow::bail!(
                "Not inside a git repository: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let top_level = root::strip_line_ending(
            String::from_utf8(output.stdout).context("Repository root is not valid UTF-8")?,
        );
        let editor_root = translator.translate(&top_level)?;
        log::debug!("repository root {} (editor sees {})", top_level, editor_root);

        let mut repository = Self::new(Path::new(&top_level), writer);
        repository.editor_root = PathBuf::from(editor_root);
        Ok(repository)
    }

    pub fn editor_root(&self) -> &Path {
        &self.editor_root
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }
}

impl ContentResolver for Repository {
    fn fetch_blob(&self, oid: &ObjectId) -> Result<Bytes, ResolutionError> {
        self.database.load(oid)
    }

    fn read_working_tree_file(&self, path: &Path) -> Result<Option<Bytes>, ResolutionError> {
        self.workspace.read_file(path)
    }
}
