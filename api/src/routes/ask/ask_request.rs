use serde::Serialize;

/// Request payload for /ask-question: any JSON object with `context` and
/// `question`. Absent, null or empty fields read as empty strings.
pub use qa_gateway::QuestionInput as AskRequest;

/// Response payload for /ask-question (wrapped in the success envelope).
#[derive(Debug, Serialize)]
pub struct AskAnswer {
    /// Final model answer (plain text, trimmed).
    pub answer: String,
}
