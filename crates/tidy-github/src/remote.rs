//! Remote URL parsing

/// Owner and repository name from a GitHub remote URL.
///
/// Accepts scp-like (`git@github.com:owner/repo.git`), `ssh://` and
/// `https://` forms, with or without the `.git` suffix.
pub fn parse_remote_slug(url: &str) -> Option<(String, String)> {
    let url = url.trim();

    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/')?.1
    } else if let Some((host, rest)) = url.split_once(':') {
        if host.contains('/') {
            return None;
        }
        rest
    } else {
        return None;
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.rsplitn(2, '/');
    let repo = parts.next()?;
    let owner = parts.next()?.rsplit('/').next()?;

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}
