//! URL helpers

/// Externalise a URL against the host the request arrived on.
///
/// Absolute URLs lose their scheme and host; the remaining path is joined
/// to `host` using `http` in debug mode and `https` otherwise.
pub fn externalise_url(url: &str, host: &str, debug: bool) -> String {
    let mut path = url;

    if path.starts_with("http") {
        path = path.splitn(4, '/').nth(3).unwrap_or("");
    }

    let path = path.strip_prefix('/').unwrap_or(path);
    let scheme = if debug { "http" } else { "https" };

    format!("{}://{}/{}", scheme, host, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path() {
        assert_eq!(
            externalise_url("/committee/12/", "pmg.org.za", false),
            "https://pmg.org.za/committee/12/"
        );
    }

    #[test]
    fn path_without_leading_slash() {
        assert_eq!(
            externalise_url("bills/current/", "pmg.org.za", false),
            "https://pmg.org.za/bills/current/"
        );
    }

    #[test]
    fn absolute_url_is_rehosted() {
        assert_eq!(
            externalise_url("http://api.pmg.org.za/member/7/", "pmg.org.za", false),
            "https://pmg.org.za/member/7/"
        );
    }

    #[test]
    fn debug_uses_http() {
        assert_eq!(
            externalise_url("/search/", "localhost:5000", true),
            "http://localhost:5000/search/"
        );
    }

    #[test]
    fn bare_host_url_maps_to_root() {
        assert_eq!(
            externalise_url("https://pmg.org.za", "pmg.test", true),
            "http://pmg.test/"
        );
    }
}
