//! Docroot scanning: one pass over the directory, one new snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::links::{first_heading, rewrite_doc_links};
use super::{Document, FileKind, LastModified, Snapshot, render_markdown};
use crate::vcs::{Git, remote};
use crate::{debug, log};

/// Builds snapshots from a flat directory of documents.
pub struct Scanner {
    root: PathBuf,
    git_program: PathBuf,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, git_program: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            git_program: git_program.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read every document under the root into a fresh snapshot.
    ///
    /// Only a failure to list the root is an error. Unreadable documents
    /// are logged and left out; git trouble leaves the git-derived fields
    /// empty.
    pub fn scan(&self) -> Result<Snapshot> {
        let mut entries: Vec<_> = fs::read_dir(&self.root)
            .with_context(|| format!("failed to read docroot {}", self.root.display()))?
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log!("scan"; "skipping unreadable entry: {}", e);
                    None
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        let mut snapshot = Snapshot::default();
        let mut is_repo = false;

        for entry in entries {
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!("scan"; "skipping non UTF-8 name {}", path.display());
                continue;
            };

            if name == ".git" {
                is_repo = path.is_dir();
                continue;
            }

            let kind = FileKind::classify(&name);
            if !matches!(kind, FileKind::Other) && !path.is_file() {
                continue;
            }

            let file_stem = name.rsplit_once('.').map_or(name.as_str(), |(stem, _)| stem);
            match kind {
                FileKind::CustomCss => snapshot.custom_css = true,
                FileKind::CustomJs => snapshot.custom_js = true,
                FileKind::Header => snapshot.header = self.load(&path, file_stem),
                FileKind::Footer => snapshot.footer = self.load(&path, file_stem),
                FileKind::Sidebar => snapshot.sidebar = self.load(&path, file_stem),
                FileKind::Document { id, stem } => {
                    let Some(doc) = self.load(&path, &stem) else {
                        continue;
                    };
                    if let Some(previous) = snapshot.pages.insert(id.clone(), doc) {
                        log!("scan"; "`{}` replaces `{}` (both map to `{}`)", name, previous.name, id);
                    }
                }
                FileKind::Other => {}
            }
        }

        if is_repo {
            self.enrich_from_git(&mut snapshot);
        } else {
            snapshot.set_edit_host(None);
        }

        debug!("scan"; "{} documents from {}", snapshot.len(), self.root.display());
        Ok(snapshot)
    }

    /// Read, render and post-process one document.
    fn load(&self, path: &Path, stem: &str) -> Option<Document> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                log!("scan"; "failed to read {}: {}", path.display(), e);
                return None;
            }
        };

        let body = rewrite_doc_links(&render_markdown(&source));
        let title = first_heading(&body).unwrap_or_else(|| stem.to_owned());
        Some(Document {
            name: stem.to_owned(),
            body,
            title,
            edit_link: String::new(),
        })
    }

    /// Last-commit info and edit links. Each part fails independently.
    fn enrich_from_git(&self, snapshot: &mut Snapshot) {
        let git = Git::for_root(&self.git_program, &self.root);

        match git.last_commit() {
            Ok((by, at)) => snapshot.last_modified = Some(LastModified { by, at }),
            Err(e) => log!("git"; "no last-modified info: {}", e),
        }

        match git.origin_url() {
            Ok(origin) => snapshot.set_edit_host(Some(&remote::edit_host(&origin))),
            Err(e) => {
                log!("git"; "no edit links: {}", e);
                snapshot.set_edit_host(None);
            }
        }
    }
}
