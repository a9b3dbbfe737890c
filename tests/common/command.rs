use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A git repository with `1.txt`, `a/2.txt` and `a/b/3.txt` committed
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_git_command(repository_dir.path(), &["init", "--quiet"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one\n".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three\nlines\nof\ntext\n".to_string(),
    );
    write_file(file3);

    git_commit_all(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_tabdiff_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("tabdiff").expect("Failed to find tabdiff binary");
    cmd.env_remove("EDITOR");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_COMMITTER_NAME", "fake_user"),
        ("GIT_COMMITTER_EMAIL", "fake_email@email.com"),
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn git_commit_all(dir: &Path, message: &str) -> Command {
    run_git_command(dir, &["add", "--all"]).assert().success();
    run_git_command(
        dir,
        &["-c", "commit.gpgsign=false", "commit", "--quiet", "-m", message],
    )
}

/// Resolve a revision (e.g. `:1.txt` or `HEAD:1.txt`) to its full object id
pub fn rev_parse(dir: &Path, revision: &str) -> Result<String, Box<dyn std::error::Error>> {
    let output = run_git_command(dir, &["rev-parse", revision]).output()?;

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}
