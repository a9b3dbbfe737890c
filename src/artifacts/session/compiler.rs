//! Compiles parsed changes into a review session script
//!
//! Every change gets its own tab. Two-sided changes put the destination in the first window,
//! split, put the source in the new window and turn on diff mode, leaving focus on the source.
//! The scratch tab the editor starts with is closed at the end.

use crate::artifacts::changes::change::{Change, ChangeKind, Endpoint, Relocation};
use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::session::command::{ArtifactLine, SessionCommand};
use crate::artifacts::session::error::{CompileError, ResolutionError};
use crate::artifacts::session::resolver::ContentResolver;
use crate::artifacts::session::script::SessionScript;
use derive_new::new;
use std::path::{Path, PathBuf};

const BUFFER_SCHEME: &str = "tabdiff://";

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Open the working tree file instead of a read-only blob buffer when both are identical
    pub prefer_live_file_when_identical: bool,
    pub artifact_line: ArtifactLine,
    /// Directory the editor changes into before opening anything
    pub root: Option<PathBuf>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            prefer_live_file_when_identical: true,
            artifact_line: ArtifactLine::default(),
            root: None,
        }
    }
}

/// One window's worth of content
#[derive(Debug, new)]
struct Pane<'c> {
    mode: &'c FileMode,
    oid: &'c ObjectId,
    path: &'c Path,
    role: ChangeKind,
    score: Option<u8>,
    // the path still names this content in the working tree
    live_eligible: bool,
}

pub struct SessionCompiler<'r> {
    resolver: &'r dyn ContentResolver,
    options: CompilerOptions,
    script: SessionScript,
    buffer_count: usize,
}

impl<'r> SessionCompiler<'r> {
    pub fn new(resolver: &'r dyn ContentResolver, options: CompilerOptions) -> Self {
        SessionCompiler {
            resolver,
            options,
            script: SessionScript::default(),
            buffer_count: 0,
        }
    }

    pub fn compile(mut self, changes: &[Change]) -> Result<SessionScript, CompileError> {
        if let Some(root) = &self.options.root {
            reject_line_breaks(root)?;
        }
        for change in changes {
            change_paths(change).into_iter().try_for_each(reject_line_breaks)?;
        }

        self.write_header();

        for change in changes {
            self.write_change(change)?;
        }

        self.write_footer();
        log::info!(
            "compiled {} change(s) into {} editor command(s)",
            changes.len(),
            self.script.commands().len()
        );

        Ok(self.script)
    }

    fn write_header(&mut self) {
        if let Some(root) = self.options.root.clone() {
            self.script.push(SessionCommand::ChangeDirectory(root));
        }
        self.script.push(SessionCommand::ShowStatusLine);
    }

    fn write_footer(&mut self) {
        self.script.push(SessionCommand::SelectFirstTab);
        self.script.push(SessionCommand::CloseTab);
    }

    fn write_change(&mut self, change: &Change) -> Result<(), ResolutionError> {
        self.script.push(SessionCommand::OpenTab);

        match change {
            Change::Modified(modification) => {
                let path = modification.path.as_path();
                let (src, dst) = (&modification.src, &modification.dst);

                self.write_pane(Pane::new(
                    &dst.mode,
                    &dst.oid,
                    path,
                    ChangeKind::Modified,
                    None,
                    true,
                ))?;
                self.write_split();
                self.write_pane(Pane::new(
                    &src.mode,
                    &src.oid,
                    path,
                    ChangeKind::Modified,
                    None,
                    true,
                ))?;
                self.write_diff();
            }
            Change::Copied(relocation) => self.write_relocation(relocation, ChangeKind::Copied)?,
            Change::Renamed(relocation) => {
                self.write_relocation(relocation, ChangeKind::Renamed)?
            }
            Change::Added(endpoint) => {
                self.write_pane(Self::endpoint_pane(endpoint, ChangeKind::Added, None, true))?
            }
            Change::Deleted(endpoint) => {
                self.write_pane(Self::endpoint_pane(endpoint, ChangeKind::Deleted, None, false))?
            }
            Change::Unmerged { path } => {
                log::warn!("{} is unmerged, showing a placeholder tab", path.display());
                self.script.push(SessionCommand::SetStatusLabel(format!(
                    "unmerged: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    // The score describes how much of the destination came from the source, so only the
    // destination label shows it.
    fn write_relocation(
        &mut self,
        relocation: &Relocation,
        role: ChangeKind,
    ) -> Result<(), ResolutionError> {
        self.write_pane(Self::endpoint_pane(
            &relocation.dst,
            role,
            relocation.score,
            true,
        ))?;
        self.write_split();
        self.write_pane(Self::endpoint_pane(&relocation.src, role, None, false))?;
        self.write_diff();

        Ok(())
    }

    fn endpoint_pane(
        endpoint: &Endpoint,
        role: ChangeKind,
        score: Option<u8>,
        live_eligible: bool,
    ) -> Pane<'_> {
        Pane::new(
            &endpoint.mode,
            &endpoint.oid,
            &endpoint.path,
            role,
            score,
            live_eligible,
        )
    }

    fn write_pane(&mut self, pane: Pane<'_>) -> Result<(), ResolutionError> {
        if pane.mode.is_submodule() {
            self.script.push(SessionCommand::SetStatusLabel(format!(
                "{}: commit {}",
                pane.path.display(),
                pane.oid.to_short_oid()
            )));
            return Ok(());
        }

        if pane.oid.is_null() {
            self.write_live_file(&pane);
            return Ok(());
        }

        let blob = self.resolver.fetch_blob(pane.oid)?;

        if pane.live_eligible && self.options.prefer_live_file_when_identical {
            let on_disk = self.resolver.read_working_tree_file(pane.path)?;

            if on_disk.is_some_and(|content| content == blob) {
                log::debug!(
                    "{} matches {}, opening the working tree file",
                    pane.path.display(),
                    pane.oid.to_short_oid()
                );
                self.write_live_file(&pane);
                return Ok(());
            }
        }

        self.write_blob(&pane);
        Ok(())
    }

    fn write_live_file(&mut self, pane: &Pane<'_>) {
        self.script
            .push(SessionCommand::EditFile(pane.path.to_path_buf()));
        self.script.push(SessionCommand::GotoFirstLine);
        self.script.push(SessionCommand::SetStatusLabel(format!(
            "{} [{}]",
            pane.path.display(),
            pane.role
        )));
    }

    fn write_blob(&mut self, pane: &Pane<'_>) {
        let artifact = self.options.artifact_line;
        self.buffer_count += 1;

        self.script.push(SessionCommand::ReadBlob {
            oid: pane.oid.clone(),
            artifact,
        });
        self.script
            .push(SessionCommand::DeleteArtifactLine(artifact));
        self.script.push(SessionCommand::SetReadonly);
        self.script.push(SessionCommand::NameBuffer(format!(
            "{}{}/{}",
            BUFFER_SCHEME,
            self.buffer_count,
            pane.path.display()
        )));
        self.script
            .push(SessionCommand::DetectFiletype(pane.path.to_path_buf()));
        self.script.push(SessionCommand::SetStatusLabel(Self::blob_label(pane)));
        self.script.push(SessionCommand::GotoFirstLine);
    }

    fn blob_label(pane: &Pane<'_>) -> String {
        match pane.score {
            Some(score) => format!(
                "{} [{}, {}% similar] ({})",
                pane.path.display(),
                pane.role,
                score,
                pane.mode
            ),
            None => format!("{} [{}] ({})", pane.path.display(), pane.role, pane.mode),
        }
    }

    fn write_split(&mut self) {
        self.script.push(SessionCommand::SplitVertically);
    }

    fn write_diff(&mut self) {
        self.script.push(SessionCommand::EnableDiff);
        self.script.push(SessionCommand::FocusRightPane);
    }
}

fn change_paths(change: &Change) -> Vec<&Path> {
    match change {
        Change::Modified(modification) => vec![&modification.path],
        Change::Copied(relocation) | Change::Renamed(relocation) => {
            vec![&relocation.src.path, &relocation.dst.path]
        }
        Change::Added(endpoint) | Change::Deleted(endpoint) => vec![&endpoint.path],
        Change::Unmerged { path } => vec![path],
    }
}

fn reject_line_breaks(path: &Path) -> Result<(), CompileError> {
    if path.as_os_str().as_encoded_bytes().iter().any(|b| matches!(b, b'\n' | b'\r')) {
        return Err(CompileError::LineBreakInPath {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::changes::change::{Modification, Revision};
    use bytes::Bytes;
    use rstest::{fixture, rstest};
    use std::cell::RefCell;
    use std::collections::HashMap;

    const SRC_OID: &str = "1111111111111111111111111111111111111111";
    const DST_OID: &str = "2222222222222222222222222222222222222222";
    const SUBMODULE_OID: &str = "abcdef0123456789abcdef0123456789abcdef01";
    const NULL_OID: &str = "0000000000000000000000000000000000000000";

    #[derive(Default)]
    struct FakeResolver {
        blobs: HashMap<ObjectId, Bytes>,
        files: HashMap<PathBuf, Bytes>,
        fetched: RefCell<Vec<ObjectId>>,
    }

    impl FakeResolver {
        fn with_blob(mut self, oid: &str, content: &str) -> Self {
            self.blobs
                .insert(oid_of(oid), Bytes::from(content.to_string()));
            self
        }

        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files
                .insert(PathBuf::from(path), Bytes::from(content.to_string()));
            self
        }
    }

    impl ContentResolver for FakeResolver {
        fn fetch_blob(&self, oid: &ObjectId) -> Result<Bytes, ResolutionError> {
            self.fetched.borrow_mut().push(oid.clone());
            self.blobs
                .get(oid)
                .cloned()
                .ok_or_else(|| ResolutionError::UnknownObject {
                    oid: oid.clone(),
                    reason: "missing from fake store".to_string(),
                })
        }

        fn read_working_tree_file(&self, path: &Path) -> Result<Option<Bytes>, ResolutionError> {
            Ok(self.files.get(path).cloned())
        }
    }

    fn oid_of(raw: &str) -> ObjectId {
        ObjectId::try_parse(raw.to_string()).unwrap()
    }

    fn endpoint(mode: &str, oid: &str, path: &str) -> Endpoint {
        Endpoint::new(FileMode::from(mode), oid_of(oid), PathBuf::from(path))
    }

    fn modified(path: &str, src: (&str, &str), dst: (&str, &str)) -> Change {
        Change::Modified(Modification::new(
            PathBuf::from(path),
            Revision::new(FileMode::from(src.0), oid_of(src.1)),
            Revision::new(FileMode::from(dst.0), oid_of(dst.1)),
        ))
    }

    fn compile(resolver: &FakeResolver, changes: &[Change]) -> Vec<SessionCommand> {
        SessionCompiler::new(resolver, CompilerOptions::default())
            .compile(changes)
            .unwrap()
            .into_iter()
            .collect()
    }

    fn labels(commands: &[SessionCommand]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|command| match command {
                SessionCommand::SetStatusLabel(label) => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    fn blob_pane(oid: &str, buffer: usize, path: &str, label: &str) -> Vec<SessionCommand> {
        vec![
            SessionCommand::ReadBlob {
                oid: oid_of(oid),
                artifact: ArtifactLine::Last,
            },
            SessionCommand::DeleteArtifactLine(ArtifactLine::Last),
            SessionCommand::SetReadonly,
            SessionCommand::NameBuffer(format!("tabdiff://{}/{}", buffer, path)),
            SessionCommand::DetectFiletype(PathBuf::from(path)),
            SessionCommand::SetStatusLabel(label.to_string()),
            SessionCommand::GotoFirstLine,
        ]
    }

    #[fixture]
    fn resolver() -> FakeResolver {
        FakeResolver::default()
            .with_blob(SRC_OID, "old\n")
            .with_blob(DST_OID, "new\n")
    }

    #[rstest]
    fn test_empty_changes_yield_header_and_footer(resolver: FakeResolver) {
        let commands = compile(&resolver, &[]);

        pretty_assertions::assert_eq!(
            commands,
            vec![
                SessionCommand::ShowStatusLine,
                SessionCommand::SelectFirstTab,
                SessionCommand::CloseTab,
            ]
        );
    }

    #[rstest]
    fn test_root_is_entered_first(resolver: FakeResolver) {
        let options = CompilerOptions {
            root: Some(PathBuf::from("/work/repo")),
            ..Default::default()
        };

        let script = SessionCompiler::new(&resolver, options).compile(&[]).unwrap();

        pretty_assertions::assert_eq!(
            script.commands()[0],
            SessionCommand::ChangeDirectory(PathBuf::from("/work/repo"))
        );
    }

    #[rstest]
    fn test_working_tree_destination_opens_live_file(resolver: FakeResolver) {
        let change = modified("lib.rs", ("100644", SRC_OID), ("100644", NULL_OID));

        let commands = compile(&resolver, &[change]);
        let split = commands
            .iter()
            .position(|c| *c == SessionCommand::SplitVertically)
            .unwrap();
        let dst_block = &commands[..split];

        assert!(dst_block.contains(&SessionCommand::EditFile(PathBuf::from("lib.rs"))));
        assert!(!dst_block.contains(&SessionCommand::SetReadonly));
        assert!(
            !dst_block
                .iter()
                .any(|c| matches!(c, SessionCommand::ReadBlob { .. }))
        );
        pretty_assertions::assert_eq!(*resolver.fetched.borrow(), vec![oid_of(SRC_OID)]);
    }

    #[rstest]
    #[case("160000", "100644")]
    #[case("100644", "160000")]
    fn test_submodule_side_is_label_only(
        resolver: FakeResolver,
        #[case] src_mode: &str,
        #[case] dst_mode: &str,
    ) {
        let src_oid = if src_mode == "160000" { SUBMODULE_OID } else { SRC_OID };
        let dst_oid = if dst_mode == "160000" { SUBMODULE_OID } else { DST_OID };
        let change = modified("vendor/lib", (src_mode, src_oid), (dst_mode, dst_oid));

        let commands = compile(&resolver, &[change]);
        let split = commands
            .iter()
            .position(|c| *c == SessionCommand::SplitVertically)
            .unwrap();
        let diff = commands
            .iter()
            .position(|c| *c == SessionCommand::EnableDiff)
            .unwrap();
        let block = if dst_mode == "160000" {
            &commands[2..split]
        } else {
            &commands[split + 1..diff]
        };

        pretty_assertions::assert_eq!(
            block,
            &[SessionCommand::SetStatusLabel(
                "vendor/lib: commit abcdef01".to_string()
            )]
        );
        assert!(
            !resolver
                .fetched
                .borrow()
                .contains(&oid_of(SUBMODULE_OID))
        );
    }

    #[rstest]
    #[case(Change::Copied as fn(Relocation) -> Change, "copied")]
    #[case(Change::Renamed as fn(Relocation) -> Change, "renamed")]
    fn test_similarity_only_on_destination(
        resolver: FakeResolver,
        #[case] build: fn(Relocation) -> Change,
        #[case] role: &str,
    ) {
        let change = build(Relocation::new(
            endpoint("100644", SRC_OID, "a.txt"),
            endpoint("100644", DST_OID, "b.txt"),
            Some(87),
        ));

        let commands = compile(&resolver, &[change]);

        pretty_assertions::assert_eq!(
            labels(&commands),
            vec![
                format!("b.txt [{}, 87% similar] (100644)", role),
                format!("a.txt [{}] (100644)", role),
            ]
        );
    }

    #[rstest]
    fn test_added_and_deleted_have_no_split(resolver: FakeResolver) {
        let changes = [
            Change::Added(endpoint("100644", DST_OID, "new.txt")),
            Change::Deleted(endpoint("100755", SRC_OID, "old.sh")),
        ];

        let commands = compile(&resolver, &changes);

        assert!(!commands.contains(&SessionCommand::SplitVertically));
        assert!(!commands.contains(&SessionCommand::EnableDiff));
        pretty_assertions::assert_eq!(
            labels(&commands),
            vec![
                "new.txt [added] (100644)".to_string(),
                "old.sh [deleted] (100755)".to_string()
            ]
        );
    }

    #[rstest]
    fn test_identical_blob_prefers_live_file(resolver: FakeResolver) {
        let resolver = resolver.with_file("new.txt", "new\n");
        let change = Change::Added(endpoint("100644", DST_OID, "new.txt"));

        let commands = compile(&resolver, &[change]);

        pretty_assertions::assert_eq!(
            &commands[1..5],
            &[
                SessionCommand::OpenTab,
                SessionCommand::EditFile(PathBuf::from("new.txt")),
                SessionCommand::GotoFirstLine,
                SessionCommand::SetStatusLabel("new.txt [added]".to_string()),
            ]
        );
    }

    #[rstest]
    fn test_identical_blob_kept_when_policy_disabled(resolver: FakeResolver) {
        let resolver = resolver.with_file("new.txt", "new\n");
        let options = CompilerOptions {
            prefer_live_file_when_identical: false,
            ..Default::default()
        };
        let change = Change::Added(endpoint("100644", DST_OID, "new.txt"));

        let script = SessionCompiler::new(&resolver, options)
            .compile(&[change])
            .unwrap();

        assert!(script.commands().contains(&SessionCommand::SetReadonly));
        assert!(
            !script
                .commands()
                .contains(&SessionCommand::EditFile(PathBuf::from("new.txt")))
        );
    }

    #[rstest]
    fn test_deleted_never_uses_working_tree(resolver: FakeResolver) {
        let resolver = resolver.with_file("old.txt", "old\n");
        let change = Change::Deleted(endpoint("100644", SRC_OID, "old.txt"));

        let commands = compile(&resolver, &[change]);

        assert!(commands.contains(&SessionCommand::SetReadonly));
        assert!(!commands.iter().any(|c| matches!(c, SessionCommand::EditFile(_))));
    }

    #[rstest]
    fn test_first_artifact_line_policy(resolver: FakeResolver) {
        let options = CompilerOptions {
            artifact_line: ArtifactLine::First,
            ..Default::default()
        };
        let change = Change::Deleted(endpoint("100644", SRC_OID, "old.txt"));

        let script = SessionCompiler::new(&resolver, options)
            .compile(&[change])
            .unwrap();

        assert!(script.render().contains("silent read !git --no-pager show 1111"));
        assert!(script.render().contains("\n1d\n"));
    }

    #[rstest]
    fn test_unmerged_gets_placeholder_tab(resolver: FakeResolver) {
        let change = Change::Unmerged {
            path: PathBuf::from("conflict.txt"),
        };

        let commands = compile(&resolver, &[change]);

        pretty_assertions::assert_eq!(
            commands,
            vec![
                SessionCommand::ShowStatusLine,
                SessionCommand::OpenTab,
                SessionCommand::SetStatusLabel("unmerged: conflict.txt".to_string()),
                SessionCommand::SelectFirstTab,
                SessionCommand::CloseTab,
            ]
        );
    }

    #[rstest]
    fn test_unknown_blob_fails_compilation() {
        let resolver = FakeResolver::default();
        let change = Change::Added(endpoint("100644", DST_OID, "new.txt"));

        let error = SessionCompiler::new(&resolver, CompilerOptions::default())
            .compile(&[change])
            .unwrap_err();

        assert!(matches!(
            error,
            CompileError::Resolution(ResolutionError::UnknownObject { .. })
        ));
    }

    #[rstest]
    #[case(Change::Added(endpoint("100644", DST_OID, "a\n!touch /tmp/pwned")))]
    #[case(Change::Unmerged { path: PathBuf::from("conflict\r\nqa!") })]
    #[case(Change::Renamed(Relocation::new(
        endpoint("100644", SRC_OID, "old\ncall system('id')"),
        endpoint("100644", DST_OID, "new.txt"),
        Some(90),
    )))]
    fn test_line_break_in_path_is_rejected(resolver: FakeResolver, #[case] change: Change) {
        let error = SessionCompiler::new(&resolver, CompilerOptions::default())
            .compile(&[change])
            .unwrap_err();

        assert!(matches!(error, CompileError::LineBreakInPath { .. }));
        assert!(resolver.fetched.borrow().is_empty());
    }

    #[rstest]
    fn test_line_break_in_root_is_rejected(resolver: FakeResolver) {
        let options = CompilerOptions {
            root: Some(PathBuf::from("/work\n!rm -rf ~")),
            ..Default::default()
        };

        let error = SessionCompiler::new(&resolver, options).compile(&[]).unwrap_err();

        assert!(matches!(error, CompileError::LineBreakInPath { .. }));
    }

    #[rstest]
    fn test_end_to_end_ordering(resolver: FakeResolver) {
        let changes = [
            modified("m.txt", ("100644", SRC_OID), ("100644", NULL_OID)),
            Change::Added(endpoint("100644", DST_OID, "a.txt")),
            Change::Deleted(endpoint("100644", SRC_OID, "d.txt")),
        ];

        let commands = compile(&resolver, &changes);

        let mut expected = vec![
            SessionCommand::ShowStatusLine,
            SessionCommand::OpenTab,
            SessionCommand::EditFile(PathBuf::from("m.txt")),
            SessionCommand::GotoFirstLine,
            SessionCommand::SetStatusLabel("m.txt [modified]".to_string()),
            SessionCommand::SplitVertically,
        ];
        expected.extend(blob_pane(SRC_OID, 1, "m.txt", "m.txt [modified] (100644)"));
        expected.extend([
            SessionCommand::EnableDiff,
            SessionCommand::FocusRightPane,
            SessionCommand::OpenTab,
        ]);
        expected.extend(blob_pane(DST_OID, 2, "a.txt", "a.txt [added] (100644)"));
        expected.push(SessionCommand::OpenTab);
        expected.extend(blob_pane(SRC_OID, 3, "d.txt", "d.txt [deleted] (100644)"));
        expected.extend([SessionCommand::SelectFirstTab, SessionCommand::CloseTab]);

        pretty_assertions::assert_eq!(commands, expected);
    }

    #[rstest]
    fn test_compilation_is_deterministic(resolver: FakeResolver) {
        let changes = [
            modified("m.txt", ("100644", SRC_OID), ("100644", DST_OID)),
            Change::Renamed(Relocation::new(
                endpoint("100644", SRC_OID, "x y.txt"),
                endpoint("100644", DST_OID, "z.txt"),
                Some(50),
            )),
        ];

        let first = SessionCompiler::new(&resolver, CompilerOptions::default())
            .compile(&changes)
            .unwrap()
            .render();
        let second = SessionCompiler::new(&resolver, CompilerOptions::default())
            .compile(&changes)
            .unwrap()
            .render();

        pretty_assertions::assert_eq!(first, second);
    }
}
