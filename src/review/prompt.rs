//! Prompt construction for the review model call.

/// Build the instruction prompt for one review request.
///
/// The prompt pins the response shape to the exact JSON object that
/// [`parse_feedback`](crate::review::feedback::parse_feedback) expects, and
/// embeds the submitted code in a fence tagged with its language. Output is a
/// pure function of `(language, code)` so identical submissions always hash
/// to the same cache key and produce the same upstream request.
pub fn build_review_prompt(language: &str, code: &str) -> String {
    format!(
        r#"You are an expert code reviewer. Analyze the following {language} code and provide feedback.

Your response MUST be a valid JSON object with exactly this format:
{{
    "summary": "Brief overall assessment of the code",
    "improvements": ["specific improvement suggestion 1", "specific improvement suggestion 2"],
    "best_practices": ["best practice recommendation 1", "best practice recommendation 2"]
}}

Code to review:
```{language}
{code}
```

Remember: Your entire response must be a valid JSON object that can be parsed as JSON. Do not include any text outside the JSON object."#
    )
}
