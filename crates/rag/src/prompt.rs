//! Retrieval-QA prompt template

use docqa_core::ScoredHit;

/// Render the fixed retrieval-QA prompt: a context-only preamble, numbered
/// context blocks separated by blank lines, the question, and a trailing
/// `Answer:` with no content after it. Used verbatim as the generator's
/// input.
pub fn retrieval_qa_prompt(question: &str, contexts: &[ScoredHit]) -> String {
    let context_text: Vec<String> = contexts
        .iter()
        .enumerate()
        .map(|(i, ctx)| format!("[{}] {}", i + 1, ctx.text))
        .collect();

    format!(
        "You are a helpful assistant. Use only the provided context.\n\n\
         Context:\n{}\n\n\
         Question: {}\n\
         Answer:",
        context_text.join("\n\n"),
        question
    )
}
