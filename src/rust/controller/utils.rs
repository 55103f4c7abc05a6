use super::state::TextStats;

/// Minimum number of characters, after trimming, that the service will classify.
pub const MIN_TEXT_CHARS: usize = 10;

pub(crate) fn text_stats(text: &str) -> TextStats {
    TextStats {
        chars: text.chars().count(),
        words: text.split_whitespace().count(),
    }
}

/// Returns the trimmed text when it is long enough to submit.
pub(crate) fn validated_input(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.chars().count() >= MIN_TEXT_CHARS {
        Some(trimmed)
    } else {
        None
    }
}
