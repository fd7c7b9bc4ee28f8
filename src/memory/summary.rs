//! Display summaries for long memories

/// Word count above which a summary is truncated
pub const DEFAULT_WORD_THRESHOLD: usize = 20;

/// Characters kept when truncating
pub const DEFAULT_CHAR_LIMIT: usize = 100;

const ELLIPSIS: &str = "...";

/// Summarize text with the default thresholds.
pub fn summarize(text: &str) -> String {
    summarize_with(text, DEFAULT_WORD_THRESHOLD, DEFAULT_CHAR_LIMIT)
}

/// Summarize text: when it has more than `word_threshold` words, keep the
/// first `char_limit` characters of the trimmed text and append `...`;
/// otherwise return it unchanged.
pub fn summarize_with(text: &str, word_threshold: usize, char_limit: usize) -> String {
    if text.split_whitespace().count() <= word_threshold {
        return text.to_string();
    }

    let mut summary: String = text.trim().chars().take(char_limit).collect();
    summary.push_str(ELLIPSIS);
    summary
}
