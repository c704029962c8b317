//! Request signing
//!
//! The service authenticates a request by recomputing
//! `md5(method + url + body + app_master_secret)` and comparing it with the
//! `sign` query parameter.

/// HTTP method every signed request uses
pub const METHOD: &str = "POST";

/// Lowercase hex MD5 over the concatenated inputs, with no separators
pub fn sign(method: &str, url: &str, body: &str, secret: &str) -> String {
    let mut context = md5::Context::new();
    context.consume(method.as_bytes());
    context.consume(url.as_bytes());
    context.consume(body.as_bytes());
    context.consume(secret.as_bytes());
    format!("{:x}", context.compute())
}

/// Append `sign=<signature>` to `url`
///
/// The URL is used verbatim: it must be the exact string that was signed.
pub fn signed_url(url: &str, signature: &str) -> String {
    format!("{url}?sign={signature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://msg.umeng.com/api/send";
    const BODY: &str = r#"{"appkey":"K","type":"customizedcast"}"#;

    #[test]
    fn test_known_digest() {
        assert_eq!(sign("", "", "", ""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(sign("a", "b", "c", ""), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_concatenation_order() {
        let expected = format!("{:x}", md5::compute(format!("POST{URL}{BODY}S")));
        assert_eq!(sign(METHOD, URL, BODY, "S"), expected);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(sign(METHOD, URL, BODY, "S"), sign(METHOD, URL, BODY, "S"));
    }

    #[test]
    fn test_every_input_changes_signature() {
        let base = sign(METHOD, URL, BODY, "S");
        assert_ne!(base, sign("GET", URL, BODY, "S"));
        assert_ne!(base, sign(METHOD, "http://msg.umeng.com/upload", BODY, "S"));
        assert_ne!(base, sign(METHOD, URL, "{}", "S"));
        assert_ne!(base, sign(METHOD, URL, BODY, "T"));
    }

    #[test]
    fn test_signature_shape() {
        let signature = sign(METHOD, URL, BODY, "S");
        assert_eq!(signature.len(), 32);
        assert!(signature.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signed_url() {
        let signature = sign(METHOD, URL, BODY, "S");
        assert_eq!(signed_url(URL, &signature), format!("{URL}?sign={signature}"));
    }
}
