use url::Url;

const DEFAULT_SCHEME: &str = "https://";

/// Ensures `raw` carries an explicit scheme.
///
/// The prefix is added to the input as given, never to a re-serialized parse,
/// so the parser cannot rewrite what the operator typed.
pub fn normalize_url(raw: &str) -> String {
    if has_scheme(raw) {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{raw}")
    }
}

fn has_scheme(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => !looks_like_host_and_port(&url),
        Err(_) => false,
    }
}

/// `example.com:8443` parses with scheme `example.com` and an opaque path `8443`.
///
/// That "scheme" is not a recognized one, so such input is treated as a bare
/// host with a port and gets the default scheme like any other scheme-less URL.
fn looks_like_host_and_port(url: &Url) -> bool {
    if !url.cannot_be_a_base() {
        return false;
    }
    let port = url.path().split('/').next().unwrap_or_default();
    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_port_gets_scheme() {
        assert_eq!(normalize_url("example.com:8443"), "https://example.com:8443");
        assert_eq!(normalize_url("localhost:3000/login"), "https://localhost:3000/login");
    }

    #[test]
    fn opaque_scheme_is_kept() {
        assert_eq!(normalize_url("mailto:someone@example.com"), "mailto:someone@example.com");
    }
}
