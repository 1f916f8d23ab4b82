//! Script-based source language detection.
//!
//! This is a character-range heuristic, good enough to pick between the
//! catalog languages while the user types. It never returns a language
//! outside the catalog.

use crate::{LanguageId, LanguagePair};

#[derive(Debug, Default)]
struct ScriptCounts {
    hangul: usize,
    kana: usize,
    han: usize,
    latin: usize,
}

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7AF}').contains(&c) // Hangul Syllables
        || ('\u{1100}'..='\u{11FF}').contains(&c) // Hangul Jamo
        || ('\u{3130}'..='\u{318F}').contains(&c) // Hangul Compatibility Jamo
}

fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c) // Hiragana
        || ('\u{30A0}'..='\u{30FF}').contains(&c) // Katakana
}

fn is_han(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c) // CJK Unified Ideographs
        || ('\u{3400}'..='\u{4DBF}').contains(&c) // CJK Extension A
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c)
}

fn count_scripts(text: &str) -> ScriptCounts {
    let mut counts = ScriptCounts::default();
    for c in text.chars() {
        if is_hangul(c) {
            counts.hangul += 1;
        } else if is_kana(c) {
            counts.kana += 1;
        } else if is_han(c) {
            counts.han += 1;
        } else if is_latin(c) {
            counts.latin += 1;
        }
    }
    counts
}

/// Guess the language of `text`.
///
/// Any kana means Japanese (Japanese text mixes kana with Han ideographs).
/// Otherwise the script with the most characters wins. Text with no letters
/// at all (digits, punctuation, whitespace) yields `None`.
pub fn detect_language(text: &str) -> Option<LanguageId> {
    let counts = count_scripts(text);

    if counts.kana > 0 {
        return Some(LanguageId::Japanese);
    }

    [
        (counts.hangul, LanguageId::Korean),
        (counts.han, LanguageId::ChineseSimplified),
        (counts.latin, LanguageId::English),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    // max_by_key keeps the last maximum, so reverse to prefer earlier entries on ties
    .rev()
    .max_by_key(|(count, _)| *count)
    .map(|(_, language)| language)
}

/// Pair the selection should switch to after detecting the language of `text`.
///
/// Returns `None` when nothing should change: no language detected, or the
/// detected language is already the source. When the detected language is
/// the current target the pair is swapped, so the previous source becomes the
/// target instead of producing an identical pair.
pub fn detect_pair(text: &str, current: LanguagePair) -> Option<LanguagePair> {
    let detected = detect_language(text)?;

    if detected == current.source {
        return None;
    }

    if detected == current.target {
        log::debug!("Detected {} matches target, swapping {}", detected, current);
        return Some(current.swapped());
    }

    Some(LanguagePair::new(detected, current.target))
}
