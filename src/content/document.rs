//! Document identity and file classification.

use serde::Serialize;
use std::fmt;

/// Names that resolve to the main document.
const MAIN_NAMES: [&str; 3] = ["home", "index", "readme"];

/// Extensions treated as wiki documents (compared case-insensitively).
const DOC_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Identity of a servable document.
///
/// Derived from a file stem or a request segment the same way, so
/// `Foo.md`, `foo.MD` and a request for `/FOO` all meet at `Page("foo")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocId {
    /// `home`, `index` or `readme`.
    Main,
    /// Lowercased stem of any other document.
    Page(String),
}

impl DocId {
    pub fn from_name(name: &str) -> Self {
        let key = name.to_lowercase();
        if MAIN_NAMES.contains(&key.as_str()) {
            Self::Main
        } else {
            Self::Page(key)
        }
    }

    /// Identity for a request path segment (`/Foo` → `foo`, `/` → main).
    pub fn from_request(segment: &str) -> Self {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            Self::Main
        } else {
            Self::from_name(segment)
        }
    }

    /// Key used in page listings and links: `/` for the main document.
    pub fn as_key(&self) -> &str {
        match self {
            Self::Main => "/",
            Self::Page(key) => key,
        }
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// What a file directly under the docroot means to the wiki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// A document, with its stem as written on disk.
    Document { id: DocId, stem: String },
    Header,
    Footer,
    Sidebar,
    CustomCss,
    CustomJs,
    /// Anything else (images, `.git`, stray files).
    Other,
}

impl FileKind {
    pub fn classify(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        match lower.as_str() {
            "custom.css" => return Self::CustomCss,
            "custom.js" => return Self::CustomJs,
            _ => {}
        }

        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return Self::Other;
        };
        if stem.is_empty() || !DOC_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            return Self::Other;
        }

        match stem.to_lowercase().as_str() {
            "_header" => Self::Header,
            "_footer" => Self::Footer,
            "_sidebar" => Self::Sidebar,
            _ => Self::Document {
                id: DocId::from_name(stem),
                stem: stem.to_owned(),
            },
        }
    }
}

/// One rendered document. Immutable once built.
///
/// Serializes with the field names the page script reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// File stem as written on disk.
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "Content")]
    pub body: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "EditLink")]
    pub edit_link: String,
}

/// An all-empty document for absent header/footer/sidebar slots.
pub static EMPTY_DOCUMENT: Document = Document {
    name: String::new(),
    body: String::new(),
    title: String::new(),
    edit_link: String::new(),
};

impl Document {
    /// Path fragment the remote wiki uses for editing this document.
    pub fn edit_path(&self) -> String {
        format!("{}/_edit", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_names_case_insensitive() {
        for name in ["home", "Home", "INDEX", "ReadMe"] {
            assert_eq!(DocId::from_name(name), DocId::Main, "{name}");
        }
        assert_eq!(DocId::from_name("Homepage"), DocId::Page("homepage".into()));
    }

    #[test]
    fn test_classify_documents() {
        assert_eq!(
            FileKind::classify("Foo.md"),
            FileKind::Document {
                id: DocId::Page("foo".into()),
                stem: "Foo".into()
            }
        );
        assert_eq!(
            FileKind::classify("guide.MARKDOWN"),
            FileKind::Document {
                id: DocId::Page("guide".into()),
                stem: "guide".into()
            }
        );
        assert_eq!(
            FileKind::classify("README.md"),
            FileKind::Document {
                id: DocId::Main,
                stem: "README".into()
            }
        );
    }

    #[test]
    fn test_classify_special_files() {
        assert_eq!(FileKind::classify("_Header.md"), FileKind::Header);
        assert_eq!(FileKind::classify("_footer.md"), FileKind::Footer);
        assert_eq!(FileKind::classify("_sidebar.markdown"), FileKind::Sidebar);
        assert_eq!(FileKind::classify("Custom.CSS"), FileKind::CustomCss);
        assert_eq!(FileKind::classify("custom.js"), FileKind::CustomJs);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(FileKind::classify(".git"), FileKind::Other);
        assert_eq!(FileKind::classify("logo.png"), FileKind::Other);
        assert_eq!(FileKind::classify(".md"), FileKind::Other);
        assert_eq!(FileKind::classify("notes"), FileKind::Other);
    }

    #[test]
    fn test_main_sorts_first() {
        let mut ids = vec![DocId::Page("alpha".into()), DocId::Main];
        ids.sort();
        assert_eq!(ids[0], DocId::Main);
        assert_eq!(ids[0].as_key(), "/");
    }
}
