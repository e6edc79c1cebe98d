//! Throwaway git repositories for tests.

use std::fs;
use std::path::Path;

use crate::utils::exec::Cmd;

/// Run git inside `dir` with a fixed identity; panics on failure.
pub fn git_in(dir: &Path, args: &[&str]) {
    Cmd::new("git")
        .args(args)
        .cwd(dir)
        .envs([
            ("GIT_AUTHOR_NAME", "Ada Lovelace"),
            ("GIT_AUTHOR_EMAIL", "ada@example.com"),
            ("GIT_COMMITTER_NAME", "Ada Lovelace"),
            ("GIT_COMMITTER_EMAIL", "ada@example.com"),
            ("GIT_CONFIG_NOSYSTEM", "1"),
            ("HOME", dir.to_str().unwrap()),
        ])
        .run()
        .unwrap();
}

/// Whether a usable git binary is installed.
pub fn have_git() -> bool {
    which::which("git").is_ok()
}

/// A repository with `commits` commits, each touching `Page.md`.
pub fn repo_with_commits(commits: usize) -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    git_in(dir.path(), &["init", "-q"]);
    for i in 0..commits {
        fs::write(dir.path().join("Page.md"), format!("# Page\n\nrev {i}\n")).unwrap();
        git_in(dir.path(), &["add", "."]);
        git_in(dir.path(), &["commit", "-q", "-m", &format!("rev {i}")]);
    }
    dir
}
