//! GitHub-flavored markdown heading anchors for the generated README.

/// Link a section title to its heading anchor.
pub fn heading_link(title: &str) -> String {
    format!("[{}](#{})", title, slug(title))
}

/// Indented table-of-contents entry for a prototype.
pub fn toc_entry(title: &str) -> String {
    format!("  * {}", heading_link(title))
}

/// GitHub heading anchor slug:
/// lowercase, strip everything but alphanumerics, spaces and hyphens,
/// then replace spaces with hyphens.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            out.push(c);
        }
    }
    out.replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(slug("Prototype Reference"), "prototype-reference");
    }

    #[test]
    fn slug_keeps_hyphens() {
        assert_eq!(slug("redis-standalone"), "redis-standalone");
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(slug("redis.v2"), "redisv2");
    }

    #[test]
    fn toc_entry_links_to_slug() {
        assert_eq!(
            toc_entry("redis-standalone"),
            "  * [redis-standalone](#redis-standalone)"
        );
    }
}
