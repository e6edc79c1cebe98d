//! Route → reply: page rendering for every HTTP route.

use std::fmt::Write;
use std::path::PathBuf;

use super::ServeContext;
use super::route::Route;
use crate::content::{DocId, PageView, Snapshot};
use crate::embed::serve::{
    ALL_FILES_HTML, AllFilesVars, DIFF_HTML, DiffVars, HISTORY_HTML, HistoryVars, LAYOUT_HTML,
    LIVE_JS, LayoutVars, LiveVars, PAGE_HTML, PageVars,
};
use crate::utils::html::escape;
use crate::utils::path::is_plain_file_name;
use crate::vcs::{CommitRecord, GitError, pagination};
use crate::{debug, log};

/// What to send back, independent of the HTTP library.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Html { status: u16, body: String },
    File(PathBuf),
    Redirect(String),
    NotFound,
}

impl Reply {
    fn ok(body: String) -> Self {
        Self::Html { status: 200, body }
    }
}

pub fn respond(route: Route, ctx: &ServeContext) -> Reply {
    let snapshot = ctx.store.load();
    match route {
        Route::PrefixRoot => Reply::Redirect(format!("{}/", ctx.prefix())),
        Route::Main if !snapshot.has_main() => {
            Reply::Redirect(format!("{}/all_files", ctx.prefix()))
        }
        Route::Main => document(&snapshot, &DocId::Main, ctx).unwrap_or(Reply::NotFound),
        Route::AllFiles => Reply::ok(all_files(&snapshot, ctx)),
        Route::History { page, limit } => Reply::ok(history(&snapshot, page, limit, ctx)),
        Route::Diff { first, second } => diff(&snapshot, &first, &second, ctx),
        Route::Named(name) => document(&snapshot, &DocId::from_request(&name), ctx)
            .or_else(|| static_file(&name, ctx))
            .unwrap_or(Reply::NotFound),
        Route::NotFound => Reply::NotFound,
    }
}

fn document(snapshot: &Snapshot, id: &DocId, ctx: &ServeContext) -> Option<Reply> {
    let view = snapshot.page_view(id, ctx.prefix())?;
    let content = view.content?;

    let modified = match (view.last_modified_by, view.last_modified_at) {
        ("", _) => String::new(),
        (by, at) => format!("Last modified by {} at {}", escape(by), escape(at)),
    };
    let body = PAGE_HTML.render(&PageVars {
        header: &view.header.body,
        sidebar: &view.sidebar.body,
        content: &content.body,
        footer: &view.footer.body,
        modified: &modified,
        edit_link: &escape(&content.edit_link),
    });

    let live = LIVE_JS.render(&LiveVars {
        ws_port: ctx.ws_port,
        endpoint: &format!("{}/front", ctx.prefix()),
    });
    Some(Reply::ok(layout(&view, &content.title, &body, &live, ctx)))
}

/// Serve `name` straight from the docroot if it is a regular file there.
fn static_file(name: &str, ctx: &ServeContext) -> Option<Reply> {
    if !is_plain_file_name(name) {
        return None;
    }
    let path = ctx.config.content.docroot.join(name);
    path.is_file().then_some(Reply::File(path))
}

fn all_files(snapshot: &Snapshot, ctx: &ServeContext) -> String {
    let mut entries = String::new();
    for (id, title) in snapshot.titles() {
        let _ = writeln!(
            entries,
            r#"      <li><a href="{}/{}">{}</a></li>"#,
            ctx.prefix(),
            escape(id.as_key().trim_start_matches('/')),
            escape(title)
        );
    }
    let body = ALL_FILES_HTML.render(&AllFilesVars { entries: &entries });
    layout(&snapshot.view_with(None, ctx.prefix()), "All pages", &body, "", ctx)
}

fn history(
    snapshot: &Snapshot,
    page: Option<usize>,
    limit: Option<usize>,
    ctx: &ServeContext,
) -> String {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .filter(|&l| l > 0)
        .unwrap_or(ctx.config.history.per_page);
    let skip = (page - 1).saturating_mul(limit);

    let (rows, pages) = match ctx.history.get_history(limit, skip) {
        Ok(found) => {
            let rows = found
                .records
                .iter()
                .map(|record| commit_row(record, ctx.prefix()))
                .collect::<String>();
            let pages = page_links(page, found.total_pages, limit, ctx.prefix());
            (rows, pages)
        }
        Err(e) => {
            log!("git"; "history unavailable: {}", e);
            (
                r#"        <tr><td colspan="5">No history available.</td></tr>"#.to_owned(),
                String::new(),
            )
        }
    };

    let body = HISTORY_HTML.render(&HistoryVars {
        rows: &rows,
        pages: &pages,
    });
    layout(&snapshot.view_with(None, ctx.prefix()), "History", &body, "", ctx)
}

fn commit_row(record: &CommitRecord, prefix: &str) -> String {
    let diff = match record.parent.split_whitespace().next() {
        Some(parent) => format!(
            r#"<a href="{prefix}/history/diff?first={parent}&amp;second={}">diff</a>"#,
            record.commit
        ),
        None => String::new(),
    };
    format!(
        "        <tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&record.abbreviated_commit),
        escape(&record.subject),
        escape(&record.author.name),
        escape(&record.author.date),
        diff
    )
}

fn page_links(page: usize, total: usize, limit: usize, prefix: &str) -> String {
    let page = page.clamp(1, total.max(1));
    pagination::window(page, total)
        .into_iter()
        .map(|p| {
            if p == page {
                format!(r#"<span class="current">{p}</span>"#)
            } else {
                format!(r#"<a href="{prefix}/history?page={p}&amp;limit={limit}">{p}</a>"#)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn diff(snapshot: &Snapshot, first: &str, second: &str, ctx: &ServeContext) -> Reply {
    match ctx.history.get_diff(first, second) {
        Ok(text) => {
            let body = DIFF_HTML.render(&DiffVars {
                first: &escape(first),
                second: &escape(second),
                diff: &escape(&text),
            });
            Reply::ok(layout(
                &snapshot.view_with(None, ctx.prefix()),
                "Diff",
                &body,
                "",
                ctx,
            ))
        }
        Err(GitError::InvalidRevision(rev)) => {
            debug!("git"; "rejected revision {:?}", rev);
            Reply::Html {
                status: 400,
                body: format!("invalid revision: {}", escape(&rev)),
            }
        }
        Err(e) => {
            log!("git"; "diff {}..{} failed: {}", first, second, e);
            Reply::NotFound
        }
    }
}

/// Wrap a body in the document shell with custom assets and extra head.
fn layout(view: &PageView<'_>, title: &str, body: &str, extra: &str, ctx: &ServeContext) -> String {
    let prefix = ctx.prefix();
    let mut head = String::new();
    if view.is_custom_css {
        let _ = writeln!(head, r#"<link rel="stylesheet" href="{prefix}/custom.css">"#);
    }
    if view.is_custom_js {
        let _ = writeln!(head, r#"<script src="{prefix}/custom.js" defer></script>"#);
    }
    head.push_str(extra);

    LAYOUT_HTML.render(&LayoutVars {
        title: &escape(title),
        prefix,
        head: &head,
        body,
    })
}
