// All LLM prompt constants for the interview module.

/// System prompt for interview question generation. Output is free-form
/// text, not JSON — the parser copes with format drift.
pub const INTERVIEW_SYSTEM: &str = "You are an experienced interview coach. \
    Follow the requested output format exactly.";

/// Interview questions prompt template. Replace `{role}` before sending.
pub const INTERVIEW_QUESTIONS_PROMPT_TEMPLATE: &str = r#"Generate a list of 10 common interview questions for the role of {role}.
For each question, provide 3-5 tips on how to answer it effectively.
Format the response as follows:

1. [Question text]
   - Tips: [Tip 1], [Tip 2], [Tip 3], etc.

2. [Question text]
   - Tips: [Tip 1], [Tip 2], [Tip 3], etc.

...and so on.

Make sure each question is clearly numbered and each set of tips is on a separate line starting with "- Tips:"."#;
