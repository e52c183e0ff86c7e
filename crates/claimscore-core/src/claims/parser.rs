use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::Claim;

fn claim_line_regex() -> &'static Regex {
    static CLAIM_LINE: OnceLock<Regex> = OnceLock::new();
    CLAIM_LINE.get_or_init(|| Regex::new(r"^(.*?)\s*\[(\d+)\]$").expect("valid claim line regex"))
}

fn triplet_regex() -> &'static Regex {
    static TRIPLET: OnceLock<Regex> = OnceLock::new();
    TRIPLET.get_or_init(|| Regex::new(r"^\(.*?,.*?,.*?\).*$").expect("valid triplet regex"))
}

/// Whether a claim text has the `(X, Y, Z)` triplet shape
pub fn is_triplet(text: &str) -> bool {
    triplet_regex().is_match(text)
}

/// Parse `<claim text> [<id>]` lines from a judge reply.
///
/// Identical claim texts (after trimming) merge into one claim that keeps
/// every referenced sentence id. Claims are returned in order of first
/// appearance. Lines without a trailing `[id]` are ignored.
pub fn parse_claims(reply: &str) -> Vec<Claim> {
    let mut claims: Vec<Claim> = Vec::new();
    let mut index_by_text: HashMap<String, usize> = HashMap::new();

    for line in reply.split('\n').map(str::trim) {
        let Some(captures) = claim_line_regex().captures(line) else {
            continue;
        };

        let text = captures[1].trim();
        let sentence_id = match captures[2].parse::<u32>() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping claim with unusable sentence id");
                continue;
            }
        };

        match index_by_text.get(text) {
            Some(&index) => claims[index].referenced_sentence_ids.push(sentence_id),
            None => {
                index_by_text.insert(text.to_string(), claims.len());
                claims.push(Claim::new(text, vec![sentence_id]));
            }
        }
    }

    for claim in &claims {
        tracing::debug!(
            claim = %claim.text,
            sentence_ids = ?claim.referenced_sentence_ids,
            is_triplet = claim.is_triplet,
            "parsed claim"
        );
    }

    claims
}
