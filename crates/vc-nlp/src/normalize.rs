//! Transcript canonicalization.
//!
//! Everything downstream of this module sees lowercase English-leaning
//! text: punctuation stripped, Devanagari digits folded to ASCII, and the
//! multilingual phrase table applied longest-phrase-first over whole
//! token windows so partial words are never rewritten.

use std::sync::LazyLock;

use crate::lexicon;

/// Phrase table pre-split into token windows and sorted by descending
/// phrase length, so "pasta dental" wins over "pasta" style overlaps.
static PHRASE_TABLE: LazyLock<Vec<(Vec<&'static str>, Vec<&'static str>)>> = LazyLock::new(|| {
    let mut table: Vec<(Vec<&str>, Vec<&str>)> = lexicon::PHRASE_REPLACEMENTS
        .iter()
        .map(|(from, to)| {
            (from.split_whitespace().collect(), to.split_whitespace().collect())
        })
        .collect();
    table.sort_by_key(|(from, _)| {
        std::cmp::Reverse(from.iter().map(|word| word.chars().count()).sum::<usize>())
    });
    table
});

fn fold_char(c: char) -> char {
    match c {
        // Sentence punctuation, including the Devanagari danda.
        '.' | ',' | '!' | '?' | '।' => ' ',
        '०' => '0',
        '१' => '1',
        '२' => '2',
        '३' => '3',
        '४' => '4',
        '५' => '5',
        '६' => '6',
        '७' => '7',
        '८' => '8',
        '९' => '9',
        other => other,
    }
}

fn replace_token_window(tokens: Vec<String>, from: &[&str], to: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let window_fits = i + from.len() <= tokens.len();
        let window_matches = window_fits
            && tokens[i..i + from.len()].iter().map(String::as_str).eq(from.iter().copied());
        if window_matches {
            out.extend(to.iter().map(|word| (*word).to_string()));
            i += from.len();
        } else {
            out.push(tokens[i].clone());
            i += 1;
        }
    }
    out
}

/// Canonicalize a raw transcript: lowercase, strip punctuation, fold
/// Devanagari digits, translate known phrases, collapse whitespace.
pub fn normalize_transcript(text: &str) -> String {
    let folded: String = text.to_lowercase().chars().map(fold_char).collect();
    let mut tokens: Vec<String> = folded.split_whitespace().map(str::to_string).collect();
    for (from, to) in PHRASE_TABLE.iter() {
        tokens = replace_token_window(tokens, from, to);
    }
    tokens.join(" ")
}

/// Replace spelled-out numbers ("five", "cinco", "पांच") with digits.
/// Applied after phrase translation, on exact tokens.
pub fn replace_number_words(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            match lexicon::NUMBER_WORDS.iter().find(|(word, _)| *word == token) {
                Some((_, value)) => value.to_string(),
                None => token.to_string(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Case/whitespace folding for comparisons: lowercase and trim.
pub fn normalize_term(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// Fold one query token for lexical matching: common chocolate
/// misspellings are corrected, then plurals are stripped ("apples" →
/// "appl"), which still substring-matches the singular entry name.
pub fn normalize_token(token: &str) -> String {
    let mut out = normalize_term(token);
    if out.is_empty() {
        return out;
    }
    out = out.replace("chocholate", "chocolate").replace("choclate", "chocolate");
    let chars = out.chars().count();
    if out.ends_with("es") && chars > 4 {
        out.truncate(out.len() - 2);
    } else if out.ends_with('s') && chars > 3 {
        out.truncate(out.len() - 1);
    }
    out
}

/// Split free text into normalized, stemmed tokens for matching.
pub fn query_tokens(text: &str) -> Vec<String> {
    normalize_term(text)
        .split_whitespace()
        .map(normalize_token)
        .filter(|token| !token.is_empty())
        .collect()
}
