//! Prompt templates for each judge operation.
//!
//! Templates use `{{name}}` placeholders. Variables that a template does not
//! reference are ignored; placeholders without a value are left in place.

use super::JudgeOperation;

/// System message sent with every judge request
pub const SYSTEM_PROMPT: &str = "You are a meticulous evaluator of question-answering systems. \
Follow the output format exactly and do not add commentary outside of it.";

const EXTRACT_CLAIMS: &str = r#"Extract every atomic factual claim from the numbered sentences below.

Rules:
- Each claim must be a short, self-contained statement that can be checked on its own.
- Resolve pronouns so the claim makes sense without the surrounding text.
- For every claim, also emit the same fact as a triplet in the form (subject, predicate, object).
- End every line with the id of the sentence the claim comes from, in square brackets.
- Write one claim per line and nothing else.

Example output:
Romeo is a Montague [1]
(Romeo, is, a Montague) [1]

Sentences:
{{response}}"#;

const COMPARE_CLAIMS: &str = r#"Rate how closely the two claims below state the same fact.

1 - unrelated or contradictory
2 - same topic, different fact
3 - mostly the same fact, minor differences
4 - the same fact, worded differently
5 - identical meaning

Claim 1: {{claim_1}}
Claim 2: {{claim_2}}

Start your reply with the score digit, then give a one-sentence explanation."#;

const GROUNDEDNESS: &str = r#"Rate from 1 to 5 how well the answer is supported by the context.
1 means nothing in the answer is supported; 5 means every statement is supported.

Question: {{question}}
Context:
{{context}}
Answer: {{answer}}

Reply with the score digit first, then a short justification."#;

const RELEVANCE: &str = r#"Rate from 1 to 5 how well the answer addresses the question, using the context for reference.
1 means the answer ignores the question; 5 means it fully and directly answers it.

Question: {{question}}
Context:
{{context}}
Answer: {{answer}}

Reply with the score digit first, then a short justification."#;

const COHERENCE: &str = r#"Rate from 1 to 5 how coherent the answer is: whether its sentences fit together and read as one well-organised response.

Question: {{question}}
Answer: {{answer}}

Reply with the score digit first, then a short justification."#;

const FLUENCY: &str = r#"Rate from 1 to 5 the fluency of the answer: grammar, word choice and readability.

Question: {{question}}
Answer: {{answer}}

Reply with the score digit first, then a short justification."#;

const RETRIEVAL_SCORE: &str = r#"Rate from 1 to 5 how relevant the retrieved context is to the question.
1 means none of the context helps answer the question; 5 means the context contains everything needed.

Question: {{question}}
Context:
{{context}}

Reply with the score digit first, then a short justification."#;

const SIMILARITY: &str = r#"Rate from 1 to 5 how similar the answer is to the ground-truth answer for the question.
1 means they share no information; 5 means they are equivalent.

Question: {{question}}
Ground truth: {{ground_truth}}
Answer: {{answer}}

Reply with the score digit first, then a short justification."#;

/// Get the raw template for an operation
pub fn template(operation: JudgeOperation) -> &'static str {
    match operation {
        JudgeOperation::ExtractClaims => EXTRACT_CLAIMS,
        JudgeOperation::CompareClaims => COMPARE_CLAIMS,
        JudgeOperation::Groundedness => GROUNDEDNESS,
        JudgeOperation::Relevance => RELEVANCE,
        JudgeOperation::Coherence => COHERENCE,
        JudgeOperation::Fluency => FLUENCY,
        JudgeOperation::RetrievalScore => RETRIEVAL_SCORE,
        JudgeOperation::Similarity => SIMILARITY,
    }
}

/// Render the template for `operation` with the given variables
pub fn render(operation: JudgeOperation, variables: &[(&str, &str)]) -> String {
    variables
        .iter()
        .fold(template(operation).to_string(), |prompt, (name, value)| {
            prompt.replace(&format!("{{{{{}}}}}", name), value)
        })
}
