//! Thin wrappers over individual git commands.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::GitError;
use crate::utils::exec::Cmd;

const FIELD_SEP: &str = "\x1f";
const RECORD_SEP: &str = "\x1e";

/// `git log` placeholders, one per [`CommitRecord`] field, in order.
const LOG_FIELDS: [&str; 21] = [
    "%H", "%h", "%T", "%t", "%P", "%p", "%D", "%e", "%s", "%f", "%b", "%N", "%G?", "%GS", "%GK",
    "%aN", "%aE", "%aI", "%cN", "%cE", "%cI",
];

/// Name, email and ISO-8601 time of an author or committer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitUser {
    pub name: String,
    pub email: String,
    pub date: String,
}

/// One commit as shown on the history page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub commit: String,
    pub abbreviated_commit: String,
    pub tree: String,
    pub abbreviated_tree: String,
    pub parent: String,
    pub abbreviated_parent: String,
    pub refs: String,
    pub encoding: String,
    pub subject: String,
    pub sanitized_subject_line: String,
    pub body: String,
    pub commit_notes: String,
    pub verification_flag: String,
    pub signer: String,
    pub signer_key: String,
    pub author: GitUser,
    pub committer: GitUser,
}

impl CommitRecord {
    fn from_fields(fields: &[&str]) -> Option<Self> {
        let [
            commit,
            abbreviated_commit,
            tree,
            abbreviated_tree,
            parent,
            abbreviated_parent,
            refs,
            encoding,
            subject,
            sanitized_subject_line,
            body,
            commit_notes,
            verification_flag,
            signer,
            signer_key,
            author_name,
            author_email,
            author_date,
            committer_name,
            committer_email,
            committer_date,
        ] = fields
        else {
            return None;
        };

        let s = |v: &&str| v.to_string();
        Some(Self {
            commit: s(commit),
            abbreviated_commit: s(abbreviated_commit),
            tree: s(tree),
            abbreviated_tree: s(abbreviated_tree),
            parent: s(parent),
            abbreviated_parent: s(abbreviated_parent),
            refs: s(refs),
            encoding: s(encoding),
            subject: s(subject),
            sanitized_subject_line: s(sanitized_subject_line),
            body: body.trim_end().to_owned(),
            commit_notes: commit_notes.trim_end().to_owned(),
            verification_flag: s(verification_flag),
            signer: s(signer),
            signer_key: s(signer_key),
            author: GitUser {
                name: s(author_name),
                email: s(author_email),
                date: s(author_date),
            },
            committer: GitUser {
                name: s(committer_name),
                email: s(committer_email),
                date: s(committer_date),
            },
        })
    }
}

/// A git repository addressed by its `.git` directory.
#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
    git_dir: PathBuf,
}

impl Git {
    /// Repository whose metadata lives in `<root>/.git`.
    pub fn for_root(program: impl Into<PathBuf>, root: &Path) -> Self {
        Self {
            program: program.into(),
            git_dir: root.join(".git"),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        Cmd::new(&self.program)
            .arg("--git-dir")
            .arg(&self.git_dir)
            .args(args)
            .run_stdout()
            .map_err(|e| GitError::Command {
                command: args.join(" "),
                message: format!("{e:#}"),
            })
    }

    /// Number of commits reachable from `HEAD`.
    pub fn commit_count(&self) -> Result<u64, GitError> {
        let out = self.run(&["rev-list", "--count", "HEAD"])?;
        out.trim().parse().map_err(|_| GitError::Malformed {
            command: "rev-list",
            detail: out.trim().to_owned(),
        })
    }

    /// Up to `limit` commits after skipping `skip`, newest first.
    pub fn log(&self, limit: usize, skip: usize) -> Result<Vec<CommitRecord>, GitError> {
        let format = format!(
            "--pretty=format:{}{RECORD_SEP}",
            LOG_FIELDS.join(FIELD_SEP)
        );
        let max_count = limit.to_string();
        let skip = skip.to_string();
        let out = self.run(&["log", "--max-count", &max_count, "--skip", &skip, &format])?;
        parse_log(&out)
    }

    /// Raw unified diff between two revisions.
    pub fn diff(&self, first: &str, second: &str) -> Result<String, GitError> {
        for rev in [first, second] {
            if rev.is_empty() || rev.starts_with('-') {
                return Err(GitError::InvalidRevision(rev.to_owned()));
            }
        }
        self.run(&["diff", first, second])
    }

    /// URL of the `origin` remote.
    pub fn origin_url(&self) -> Result<String, GitError> {
        Ok(self.run(&["remote", "get-url", "origin"])?.trim().to_owned())
    }

    /// Author name and `YYYY-MM-DD HH:MM:SS` time of the newest commit.
    pub fn last_commit(&self) -> Result<(String, String), GitError> {
        let out = self.run(&[
            "log",
            "-1",
            "--date=format:%Y-%m-%d %H:%M:%S",
            "--pretty=format:%aN%x1f%ad",
        ])?;
        out.trim_end()
            .split_once(FIELD_SEP)
            .map(|(by, at)| (by.to_owned(), at.to_owned()))
            .ok_or_else(|| GitError::Malformed {
                command: "log -1",
                detail: out.clone(),
            })
    }
}

fn parse_log(out: &str) -> Result<Vec<CommitRecord>, GitError> {
    out.split(RECORD_SEP)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.is_empty())
        .map(|record| {
            let fields: Vec<&str> = record.split(FIELD_SEP).collect();
            CommitRecord::from_fields(&fields).ok_or_else(|| GitError::Malformed {
                command: "log",
                detail: format!("expected {} fields, got {}", LOG_FIELDS.len(), fields.len()),
            })
        })
        .collect()
}
