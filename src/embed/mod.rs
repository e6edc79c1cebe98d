//! Embedded static resources for rowi.
//!
//! # Module Structure
//!
//! - `template` - `__NAME__` placeholder templates
//! - `serve` - HTML pages and the live-update script
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{LAYOUT_HTML, LayoutVars};
//!
//! let html = LAYOUT_HTML.render(&LayoutVars { title: "Home", prefix: "", head: "", body: "" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use std::borrow::Cow;

    use super::{Template, TemplateVars};

    /// Variables for layout.html: the document shell around every page.
    pub struct LayoutVars<'a> {
        /// Already escaped.
        pub title: &'a str,
        pub prefix: &'a str,
        /// Extra `<head>` markup (custom stylesheet, live script).
        pub head: &'a str,
        pub body: &'a str,
    }

    impl TemplateVars for LayoutVars<'_> {
        fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
            let value = match name {
                "TITLE" => self.title,
                "PREFIX" => self.prefix,
                "HEAD" => self.head,
                "BODY" => self.body,
                _ => return None,
            };
            Some(Cow::Borrowed(value))
        }
    }

    pub const LAYOUT_HTML: Template = Template::new(include_str!("serve/layout.html"));

    /// Variables for page.html. Region ids match what live.js replaces.
    pub struct PageVars<'a> {
        pub header: &'a str,
        pub sidebar: &'a str,
        pub content: &'a str,
        pub footer: &'a str,
        pub modified: &'a str,
        pub edit_link: &'a str,
    }

    impl TemplateVars for PageVars<'_> {
        fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
            let value = match name {
                "HEADER" => self.header,
                "SIDEBAR" => self.sidebar,
                "CONTENT" => self.content,
                "FOOTER" => self.footer,
                "MODIFIED" => self.modified,
                "EDIT_LINK" => self.edit_link,
                "EDIT_HIDDEN" => {
                    return Some(Cow::Borrowed(if self.edit_link.is_empty() {
                        " hidden"
                    } else {
                        ""
                    }));
                }
                _ => return None,
            };
            Some(Cow::Borrowed(value))
        }
    }

    pub const PAGE_HTML: Template = Template::new(include_str!("serve/page.html"));

    pub struct AllFilesVars<'a> {
        pub entries: &'a str,
    }

    impl TemplateVars for AllFilesVars<'_> {
        fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
            (name == "ENTRIES").then_some(Cow::Borrowed(self.entries))
        }
    }

    pub const ALL_FILES_HTML: Template = Template::new(include_str!("serve/all_files.html"));

    pub struct HistoryVars<'a> {
        pub rows: &'a str,
        pub pages: &'a str,
    }

    impl TemplateVars for HistoryVars<'_> {
        fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
            match name {
                "ROWS" => Some(Cow::Borrowed(self.rows)),
                "PAGES" => Some(Cow::Borrowed(self.pages)),
                _ => None,
            }
        }
    }

    pub const HISTORY_HTML: Template = Template::new(include_str!("serve/history.html"));

    /// Variables for diff.html. All values already escaped.
    pub struct DiffVars<'a> {
        pub first: &'a str,
        pub second: &'a str,
        pub diff: &'a str,
    }

    impl TemplateVars for DiffVars<'_> {
        fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
            let value = match name {
                "FIRST" => self.first,
                "SECOND" => self.second,
                "DIFF" => self.diff,
                _ => return None,
            };
            Some(Cow::Borrowed(value))
        }
    }

    pub const DIFF_HTML: Template = Template::new(include_str!("serve/diff.html"));

    /// Variables for live.js.
    pub struct LiveVars<'a> {
        pub ws_port: u16,
        /// Handshake path, `<prefix>/front`.
        pub endpoint: &'a str,
    }

    impl TemplateVars for LiveVars<'_> {
        fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
            match name {
                "WS_PORT" => Some(Cow::Owned(self.ws_port.to_string())),
                "ENDPOINT" => Some(Cow::Owned(
                    serde_json::to_string(self.endpoint).unwrap_or_else(|_| "\"/front\"".into()),
                )),
                _ => None,
            }
        }
    }

    /// Live-update client, inlined into document pages.
    pub const LIVE_JS: Template = Template::new(include_str!("serve/live.js"));

}
