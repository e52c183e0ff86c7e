use std::sync::OnceLock;

use regex::Regex;

fn boundary_regex() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]\s+").expect("valid sentence boundary regex"))
}

/// Split text into sentences after `.`, `!` or `?` followed by whitespace.
///
/// Sentences keep their terminal punctuation and are trimmed; empty pieces
/// are dropped.
pub fn tokenize_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in boundary_regex().find_iter(text) {
        // The punctuation mark is ASCII, so the split point is a char boundary.
        let end = boundary.start() + 1;
        push_trimmed(&mut sentences, &text[start..end]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// Render sentences as `[<id>] <sentence>` lines, ids starting at 1
pub fn number_sentences(sentences: &[String]) -> String {
    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| format!("[{}] {}", i + 1, sentence))
        .collect::<Vec<_>>()
        .join("\n")
}
