use kwg_core::loader::StopWords;
use kwg_core::tokenizer::tokenize;

fn words(text: &str, stop: &StopWords) -> Vec<String> {
    tokenize(text, stop).collect()
}

#[test]
fn it_normalizes_case_and_diacritics() {
    let toks = words("Running RUNNERS! The café's menu, naïve Ærø.", &StopWords::new());
    assert!(toks.contains(&"running".to_string()));
    assert!(toks.contains(&"runners".to_string()));
    assert!(toks.contains(&"cafe".to_string()));
    assert!(toks.contains(&"naive".to_string()));
    assert!(toks.iter().all(|t| t.chars().all(|c| !c.is_uppercase())));
}

#[test]
fn it_filters_stopwords() {
    let stop: StopWords = ["the", "and"].iter().map(|s| s.to_string()).collect();
    let toks = words("The quick brown fox and THE lazy dog", &stop);
    assert_eq!(toks, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn no_emitted_token_is_a_stopword() {
    let stop: StopWords = ["de", "het", "een", "van", "cafe", "is"].iter().map(|s| s.to_string()).collect();
    let text = "De krant van het jaar is een CAFÉ-krant; Het café van De Haan.\n\tDE HET Een";
    for token in tokenize(text, &stop) {
        assert!(!stop.contains(&token.to_lowercase()), "{token} leaked through");
    }
    assert_eq!(words(text, &stop), vec!["krant", "jaar", "krant", "haan"]);
}

#[test]
fn compatibility_forms_are_folded_before_stop_word_check() {
    let stop: StopWords = ["the".to_string()].into_iter().collect();
    let toks = words("𝐓𝐇𝐄 library ℌello", &stop);
    assert_eq!(toks, vec!["library", "hello"]);
    for token in &toks {
        assert!(!stop.contains(&token.to_lowercase()), "{token} leaked through");
    }
}

#[test]
fn punctuation_and_numbers_are_separators() {
    let toks = words("e-mail: foo@bar.com, 3rd_place 42", &StopWords::new());
    assert_eq!(toks, vec!["e", "mail", "foo", "bar", "com", "rd_place"]);
}
