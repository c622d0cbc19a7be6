pub const EVALUATION_SYSTEM_PROMPT: &str =
    "Evaluate the correctness of the answer and provide a reason.";

/// Renders the user message for one question/answer pair.
///
/// Both inputs are interpolated in a single pass, so braces or
/// placeholder-looking text inside them are left untouched.
pub fn build_user_prompt(question: &str, answer: &str) -> String {
    format!(
        "Question: {question}\nAnswer: {answer}\n\n\
         Response Format:\nScore: (0-1)\nReason: (Brief explanation)"
    )
}
