//! The immutable result of one content scan.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DocId, Document, document::EMPTY_DOCUMENT};

/// Author and time of the newest commit in the docroot repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastModified {
    pub by: String,
    /// `YYYY-MM-DD HH:MM:SS` in the commit's own offset.
    pub at: String,
}

/// Every rendered document plus the shared page chrome.
///
/// Built completely by the scanner, then only ever read.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub(super) pages: BTreeMap<DocId, Document>,
    pub(super) header: Option<Document>,
    pub(super) footer: Option<Document>,
    pub(super) sidebar: Option<Document>,
    pub(super) custom_css: bool,
    pub(super) custom_js: bool,
    pub(super) last_modified: Option<LastModified>,
}

impl Snapshot {
    pub fn get(&self, id: &DocId) -> Option<&Document> {
        self.pages.get(id)
    }

    pub fn has_main(&self) -> bool {
        self.pages.contains_key(&DocId::Main)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Document key → title, sorted by key (main document first).
    pub fn titles(&self) -> BTreeMap<&DocId, &str> {
        self.pages
            .iter()
            .map(|(id, doc)| (id, doc.title.as_str()))
            .collect()
    }

    pub fn documents(&self) -> impl Iterator<Item = (&DocId, &Document)> {
        self.pages.iter()
    }

    pub fn last_modified(&self) -> Option<&LastModified> {
        self.last_modified.as_ref()
    }

    pub fn has_custom_css(&self) -> bool {
        self.custom_css
    }

    pub fn has_custom_js(&self) -> bool {
        self.custom_js
    }

    /// Everything a browser needs to draw `id`, or `None` if it is unknown.
    pub fn page_view<'a>(&'a self, id: &DocId, relative_path: &'a str) -> Option<PageView<'a>> {
        self.get(id)
            .map(|doc| self.view_with(Some(doc), relative_path))
    }

    /// Page chrome around arbitrary content (listing pages, history).
    pub fn view_with<'a>(&'a self, content: Option<&'a Document>, relative_path: &'a str) -> PageView<'a> {
        let modified = self.last_modified.as_ref();
        PageView {
            sidebar: self.sidebar.as_ref().unwrap_or(&EMPTY_DOCUMENT),
            header: self.header.as_ref().unwrap_or(&EMPTY_DOCUMENT),
            footer: self.footer.as_ref().unwrap_or(&EMPTY_DOCUMENT),
            content,
            last_modified_by: modified.map_or("", |m| m.by.as_str()),
            last_modified_at: modified.map_or("", |m| m.at.as_str()),
            is_custom_css: self.custom_css,
            is_custom_js: self.custom_js,
            relative_path,
        }
    }

    /// Apply the remote edit host to every document, or clear every link.
    pub(super) fn set_edit_host(&mut self, host: Option<&str>) {
        let docs = self
            .pages
            .values_mut()
            .chain(self.header.as_mut())
            .chain(self.footer.as_mut())
            .chain(self.sidebar.as_mut());
        for doc in docs {
            doc.edit_link = match host {
                Some(host) => format!("{host}/{}", doc.edit_path()),
                None => String::new(),
            };
        }
    }
}

/// One page as sent to browsers over the live connection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageView<'a> {
    pub sidebar: &'a Document,
    pub header: &'a Document,
    pub footer: &'a Document,
    pub content: Option<&'a Document>,
    pub last_modified_by: &'a str,
    pub last_modified_at: &'a str,
    #[serde(rename = "IsCustomCSS")]
    pub is_custom_css: bool,
    #[serde(rename = "IsCustomJS")]
    pub is_custom_js: bool,
    pub relative_path: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, title: &str) -> Document {
        Document {
            name: name.into(),
            body: format!("<p>{name}</p>"),
            title: title.into(),
            edit_link: String::new(),
        }
    }

    fn sample() -> Snapshot {
        let mut snap = Snapshot::default();
        snap.pages.insert(DocId::Main, doc("Home", "Welcome"));
        snap.pages.insert(DocId::Page("foo".into()), doc("Foo", "Foo Page"));
        snap.header = Some(doc("_header", "Top"));
        snap.custom_css = true;
        snap.last_modified = Some(LastModified {
            by: "Ada".into(),
            at: "2024-01-02 03:04:05".into(),
        });
        snap
    }

    #[test]
    fn test_titles_sorted_main_first() {
        let snap = sample();
        let titles: Vec<_> = snap.titles().into_iter().map(|(id, t)| (id.as_key(), t)).collect();
        assert_eq!(titles, vec![("/", "Welcome"), ("foo", "Foo Page")]);
        assert!(snap.has_main());
    }

    #[test]
    fn test_page_view_wire_names() {
        let snap = sample();
        let view = snap.page_view(&DocId::Page("foo".into()), "/wiki").unwrap();
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert_eq!(json["Content"]["Title"], "Foo Page");
        assert_eq!(json["Content"]["Content"], "<p>Foo</p>");
        assert_eq!(json["Header"]["Title"], "Top");
        assert_eq!(json["Footer"]["Content"], "");
        assert_eq!(json["LastModifiedBy"], "Ada");
        assert_eq!(json["LastModifiedAt"], "2024-01-02 03:04:05");
        assert_eq!(json["IsCustomCSS"], true);
        assert_eq!(json["IsCustomJS"], false);
        assert_eq!(json["RelativePath"], "/wiki");
        assert!(json["Content"].get("name").is_none());
    }

    #[test]
    fn test_unknown_page_has_no_view() {
        assert!(sample().page_view(&DocId::Page("nope".into()), "").is_none());
    }

    #[test]
    fn test_edit_host_all_or_nothing() {
        let mut snap = sample();
        snap.set_edit_host(Some("https://host/name/wiki"));
        assert!(snap.documents().all(|(_, d)| d.edit_link.starts_with("https://host/name/wiki/")));
        assert_eq!(
            snap.get(&DocId::Page("foo".into())).unwrap().edit_link,
            "https://host/name/wiki/Foo/_edit"
        );
        assert_eq!(
            snap.header.as_ref().unwrap().edit_link,
            "https://host/name/wiki/_header/_edit"
        );

        snap.set_edit_host(None);
        assert!(snap.documents().all(|(_, d)| d.edit_link.is_empty()));
    }
}
