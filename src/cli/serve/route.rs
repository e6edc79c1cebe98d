//! Request URL → wiki route.

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::utils::path::last_segment;

/// What a request under the prefix asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The prefix itself without its trailing slash. Relative links on the
    /// main page only resolve under `prefix/`, so this redirects there.
    PrefixRoot,
    /// `/`: the main document.
    Main,
    /// `/all_files`
    AllFiles,
    /// `/history?page=N&limit=L`; `None` means the default.
    History {
        page: Option<usize>,
        limit: Option<usize>,
    },
    /// `/history/diff?first=A&second=B`
    Diff { first: String, second: String },
    /// Anything else, by its last path segment: a document or a file in
    /// the docroot.
    Named(String),
    /// Outside the prefix, or nothing left to look up.
    NotFound,
}

impl Route {
    pub fn parse(url: &str, prefix: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let path = path.split('#').next().unwrap_or_default();
        let path = percent_decode_str(path).decode_utf8_lossy();

        let Some(local) = strip_prefix(&path, prefix) else {
            return Self::NotFound;
        };

        if local.is_empty() && !prefix.is_empty() {
            return Self::PrefixRoot;
        }

        match local.trim_end_matches('/') {
            "" => Self::Main,
            "/all_files" => Self::AllFiles,
            "/history" => Self::History {
                page: query_value(query, "page").and_then(|v| v.parse().ok()),
                limit: query_value(query, "limit").and_then(|v| v.parse().ok()),
            },
            "/history/diff" => Self::Diff {
                first: query_value(query, "first").unwrap_or_default(),
                second: query_value(query, "second").unwrap_or_default(),
            },
            other => match last_segment(other) {
                Some(name) => Self::Named(name.to_owned()),
                None => Self::NotFound,
            },
        }
    }
}

/// Path below `prefix`, or `None` if the path is not under it.
fn strip_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn query_value(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_routes() {
        assert_eq!(Route::parse("/", ""), Route::Main);
        assert_eq!(Route::parse("/all_files", ""), Route::AllFiles);
        assert_eq!(Route::parse("/all_files/", ""), Route::AllFiles);
        assert_eq!(
            Route::parse("/history", ""),
            Route::History {
                page: None,
                limit: None
            }
        );
    }

    #[test]
    fn test_prefix() {
        assert_eq!(Route::parse("/wiki", "/wiki"), Route::PrefixRoot);
        assert_eq!(Route::parse("/wiki?x=1", "/wiki"), Route::PrefixRoot);
        assert_eq!(Route::parse("/wiki/", "/wiki"), Route::Main);
        assert_eq!(Route::parse("", ""), Route::Main);
        assert_eq!(
            Route::parse("/wiki/Foo", "/wiki"),
            Route::Named("Foo".into())
        );
        assert_eq!(Route::parse("/wikipedia", "/wiki"), Route::NotFound);
        assert_eq!(Route::parse("/Foo", "/wiki"), Route::NotFound);
    }

    #[test]
    fn test_history_query() {
        assert_eq!(
            Route::parse("/history?page=3&limit=20", ""),
            Route::History {
                page: Some(3),
                limit: Some(20)
            }
        );
        assert_eq!(
            Route::parse("/history?page=x", ""),
            Route::History {
                page: None,
                limit: None
            }
        );
    }

    #[test]
    fn test_diff_query() {
        assert_eq!(
            Route::parse("/history/diff?first=abc&second=HEAD%7E1", ""),
            Route::Diff {
                first: "abc".into(),
                second: "HEAD~1".into()
            }
        );
    }

    #[test]
    fn test_named_uses_last_segment() {
        assert_eq!(
            Route::parse("/a/../../etc/passwd", ""),
            Route::Named("passwd".into())
        );
        assert_eq!(
            Route::parse("/Caf%C3%A9", ""),
            Route::Named("Café".into())
        );
        assert_eq!(
            Route::parse("/custom.css?v=1", ""),
            Route::Named("custom.css".into())
        );
    }
}
