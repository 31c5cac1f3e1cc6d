use crate::loader::StopWords;
use lazy_static::lazy_static;
use regex::Regex;
use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Runs of word characters that are not digits; punctuation, digits and
    // other non-word artifacts act as separators.
    static ref RE: Regex = Regex::new(r"(?u)[\w&&\D]+").expect("valid regex");
}

/// Compatibility-decomposes `text` and drops the nonspacing marks, so "Café"
/// becomes "Cafe". Spacing marks such as Devanagari vowel signs are kept.
pub fn strip_diacritics(text: &str) -> String {
    text.nfkd()
        .filter(|c| get_general_category(*c) != GeneralCategory::NonspacingMark)
        .collect()
}

/// Diacritic-free, lower-cased form of a document. Case is folded after
/// decomposition, which can yield capitals ("ℌ" decomposes to "H").
pub fn normalize(text: &str) -> String {
    strip_diacritics(text).to_lowercase()
}

/// Lazy token stream over one normalized document. Consumed once; call
/// [`tokenize`] again for another pass.
pub struct Tokens<'a> {
    text: String,
    pos: usize,
    stop_words: &'a StopWords,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(m) = RE.find_at(&self.text, self.pos) {
            self.pos = m.end();
            let token = m.as_str();
            if !self.stop_words.contains(token) {
                return Some(token.to_string());
            }
        }
        self.pos = self.text.len();
        None
    }
}

/// Tokenize a raw document: lowercase, strip diacritics, split on non-word
/// boundaries and drop stop words.
pub fn tokenize<'a>(text: &str, stop_words: &'a StopWords) -> Tokens<'a> {
    Tokens { text: normalize(text), pos: 0, stop_words }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let stop = StopWords::new();
        let t: Vec<String> = tokenize("Running, runner's run!", &stop).collect();
        assert_eq!(t, vec!["running", "runner", "s", "run"]);
    }

    #[test]
    fn digits_split_words() {
        let stop = StopWords::new();
        let t: Vec<String> = tokenize("abc123def 2015", &stop).collect();
        assert_eq!(t, vec!["abc", "def"]);
    }

    #[test]
    fn spacing_marks_survive() {
        assert_eq!(strip_diacritics("किताब"), "किताब");
        assert_eq!(strip_diacritics("naïve"), "naive");
        let stop = StopWords::new();
        let t: Vec<String> = tokenize("किताब", &stop).collect();
        assert_eq!(t, vec!["किताब"]);
    }

    #[test]
    fn dotted_capital_i_folds_to_plain_i() {
        assert_eq!(normalize("İstanbul"), "istanbul");
    }

    #[test]
    fn stream_is_finite_and_stays_exhausted() {
        let stop = StopWords::new();
        let mut t = tokenize("one", &stop);
        assert_eq!(t.next().as_deref(), Some("one"));
        assert_eq!(t.next(), None);
        assert_eq!(t.next(), None);
    }
}
