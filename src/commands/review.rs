use crate::areas::diff_query::DiffQuery;
use crate::areas::editor::Editor;
use crate::areas::repository::Repository;
use crate::artifacts::changes::change::Change;
use crate::artifacts::changes::filter::ChangeFilter;
use crate::artifacts::session::compiler::{CompilerOptions, SessionCompiler};
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Arguments passed through to `git diff`
    pub diff_args: Vec<String>,
    pub filter: ChangeFilter,
    pub compiler: CompilerOptions,
    /// Write the script to the repository writer instead of launching the editor
    pub print_only: bool,
    pub editor: Option<String>,
    /// Where `git diff` runs; the current directory when unset
    pub dir: Option<PathBuf>,
}

impl Repository {
    pub fn review(&self, opts: &ReviewOptions) -> anyhow::Result<()> {
        let mut query = DiffQuery::new(opts.diff_args.clone());
        if let Some(dir) = &opts.dir {
            query = query.in_dir(dir.clone());
        }

        let changes = query.run()?;
        self.review_changes(changes, opts)
    }

    pub fn review_changes(&self, changes: Vec<Change>, opts: &ReviewOptions) -> anyhow::Result<()> {
        let changes = changes
            .into_iter()
            .filter(|change| opts.filter.matches(change))
            .collect::<Vec<_>>();

        if changes.is_empty() {
            log::info!("nothing to review");
            return Ok(());
        }

        let options = CompilerOptions {
            root: Some(self.editor_root().to_path_buf()),
            ..opts.compiler.clone()
        };
        let script = SessionCompiler::new(self, options)
            .compile(&changes)
            .context("Unable to build the review session")?;

        if opts.print_only {
            write!(self.writer(), "{}", script.render())?;
            self.writer().flush()?;
            return Ok(());
        }

        Editor::resolve(opts.editor.as_deref()).open(&script)
    }
}
