//! Claims: atomic factual statements extracted from text by the judge.

mod extractor;
mod parser;
mod tokenize;


use serde::{Deserialize, Serialize};

pub use extractor::ClaimExtractor;
pub use parser::{is_triplet, parse_claims};
pub use tokenize::{number_sentences, tokenize_sentences};

/// A claim and the sentences it was attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Trimmed claim text; the deduplication key within one extraction
    pub text: String,
    /// Every sentence id the judge attributed this claim to, in reply order
    pub referenced_sentence_ids: Vec<u32>,
    /// `(subject, predicate, object)` form rather than a sentence
    pub is_triplet: bool,
    /// Always false; nothing reads it
    #[serde(default)]
    pub is_processed: bool,
}

impl Claim {
    pub fn new(text: impl Into<String>, referenced_sentence_ids: Vec<u32>) -> Self {
        let text = text.into();
        let is_triplet = is_triplet(&text);
        Self {
            text,
            referenced_sentence_ids,
            is_triplet,
            is_processed: false,
        }
    }
}

/// Keep only sentence-form claims; metric evaluators never see triplets
pub fn non_triplet(claims: Vec<Claim>) -> Vec<Claim> {
    claims.into_iter().filter(|c| !c.is_triplet).collect()
}
