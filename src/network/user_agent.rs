//! User agent and default header values

/// User agent identifying this client to the catalog APIs
pub fn default_user_agent() -> String {
    format!("bookscout/{}", crate::VERSION)
}

/// Standard accept header for JSON API requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

/// Standard accept-language header
pub fn accept_language(lang: &str) -> String {
    if lang == "all" || lang.is_empty() {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en-US;q=0.9,en;q=0.8", lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent() {
        let ua = default_user_agent();
        assert!(ua.starts_with("bookscout/"));
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(accept_language("all"), "en-US,en;q=0.9");
        assert!(accept_language("de").starts_with("de,"));
    }
}
