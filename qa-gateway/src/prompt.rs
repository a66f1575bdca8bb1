//! Prompt builder: instruction + delimited context + question + answer cue.

/// Phrase the model is told to emit when the context does not cover the question.
pub const FALLBACK_ANSWER: &str = "I don't have enough information to answer this question";

/// Build the single-turn prompt for a context-restricted answer.
///
/// The context is embedded verbatim between `#` delimiter lines; the
/// question follows, then the `Answer:` cue.
///
/// # Example
/// ```
/// use qa_gateway::prompt::{FALLBACK_ANSWER, build_prompt};
///
/// let p = build_prompt("The gym opens at 6am.", "What time does the gym open?");
/// assert!(p.contains("#\nThe gym opens at 6am.\n#"));
/// assert!(p.contains(FALLBACK_ANSWER));
/// assert!(p.ends_with("Question: What time does the gym open?\nAnswer:"));
/// ```
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question based only on the information provided between ##.\n\
         Only answer the question if you can find relevant information in the context, \
         otherwise, answer \"{FALLBACK_ANSWER}\".\n\
         #\n\
         {context}\n\
         #\n\
         \n\
         Question: {question}\n\
         Answer:"
    )
}
