//! Korean-title heuristic

/// True when the text contains at least one Hangul syllable (U+AC00..U+D7A3).
///
/// TV ingestion only admits titles passing this check. A mixed-script title
/// passes as long as a single syllable is present. Standalone jamo fall
/// outside the syllable block and do not count.
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| ('\u{AC00}'..='\u{D7A3}').contains(&c))
}
