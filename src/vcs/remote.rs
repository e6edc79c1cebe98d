//! Edit-link base derived from the `origin` remote.

/// Base URL under which `<Page>/_edit` opens the remote wiki editor.
///
/// `https://host/user/name.wiki.git` and `git@host:user/name.wiki.git`
/// both become `https://host/user/name/wiki`.
pub fn edit_host(origin: &str) -> String {
    let origin = origin.trim();
    let url = if let Some(rest) = origin.strip_prefix("git@")
        && let Some((host, path)) = rest.split_once(':')
    {
        format!("https://{host}/{path}")
    } else if let Some(rest) = origin.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, r)| r);
        format!("https://{rest}")
    } else {
        origin.to_owned()
    };

    let url = url.trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    match url.strip_suffix(".wiki") {
        Some(base) => format!("{base}/wiki"),
        None => url.to_owned(),
    }
}
