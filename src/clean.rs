// Text cleaning — stateless transforms applied to collected post text.
//
// The batch wire format is line-based (one record per line), so text must
// be single-line before it reaches the formatter; `normalize_single_line`
// is the only transform codification itself requires. The rest strip
// social-media noise for datasets that get analyzed outside the model.

use std::sync::OnceLock;

use regex_lite::Regex;

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("static pattern"))
}

fn handle_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Bluesky handles are dotted domains: @someone.bsky.social
    RE.get_or_init(|| Regex::new(r"@\w[\w.-]*").expect("static pattern"))
}

fn hashtag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\w+\b").expect("static pattern"))
}

fn special_chars_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("static pattern"))
}

/// Collapse all whitespace runs (including newlines) into single spaces.
///
/// Required before batching: embedded newlines would split a record across
/// wire-format lines and corrupt the id tagging.
pub fn normalize_single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove http/https URLs.
pub fn remove_urls(text: &str) -> String {
    url_pattern().replace_all(text, "").into_owned()
}

/// Remove @-mentions.
pub fn remove_handles(text: &str) -> String {
    handle_pattern().replace_all(text, "").into_owned()
}

/// Remove hashtags together with their word.
pub fn remove_hashtag_words(text: &str) -> String {
    hashtag_pattern().replace_all(text, "").into_owned()
}

/// Remove everything that is not alphanumeric or whitespace.
pub fn remove_special_characters(text: &str) -> String {
    special_chars_pattern().replace_all(text, "").into_owned()
}

/// Full cleaning chain: strip URLs, handles, and hashtag words, drop
/// special characters, lowercase, and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let text = remove_urls(text);
    let text = remove_handles(&text);
    let text = remove_hashtag_words(&text);
    let text = remove_special_characters(&text);
    normalize_single_line(&text.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_flattens_newlines_and_runs() {
        assert_eq!(
            normalize_single_line("line one\nline two\r\n\tline  three"),
            "line one line two line three"
        );
    }

    #[test]
    fn normalize_leaves_single_line_text_alone() {
        assert_eq!(normalize_single_line("already clean"), "already clean");
    }

    #[test]
    fn urls_are_removed() {
        assert_eq!(remove_urls("see https://example.com/x?y=1 now"), "see  now");
    }

    #[test]
    fn handles_are_removed() {
        let cleaned = remove_handles("cc @someone.bsky.social thanks");
        assert!(!cleaned.contains('@'));
        assert!(cleaned.contains("thanks"));
    }

    #[test]
    fn hashtag_words_are_removed_entirely() {
        let cleaned = remove_hashtag_words("launch day #rustlang #opensource");
        assert!(!cleaned.contains("rustlang"));
        assert!(cleaned.contains("launch day"));
    }

    #[test]
    fn clean_text_composes_and_lowercases() {
        let cleaned = clean_text("Check THIS: https://a.io #wow @me.bsky.social !!");
        assert_eq!(cleaned, "check this");
    }
}
