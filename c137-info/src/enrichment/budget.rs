//! Input-size budgeting for the completion request
//!
//! Token counts are estimated at 4 characters per token. Text estimated
//! above [`MAX_INPUT_TOKENS`] is cut to its first [`MAX_INPUT_CHARS`]
//! characters and tagged with [`TRUNCATION_NOTICE`].

pub const CHARS_PER_TOKEN: usize = 4;
pub const MAX_INPUT_TOKENS: usize = 8000;
pub const MAX_INPUT_CHARS: usize = MAX_INPUT_TOKENS * CHARS_PER_TOKEN;
pub const TRUNCATION_NOTICE: &str = "\n\n[Content truncated to fit token limit]";

/// `ceil(chars / 4)`
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Budgeted text plus whether it was cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budgeted {
    pub text: String,
    pub estimated_tokens: usize,
    pub truncated: bool,
}

/// Apply the token budget to extracted text
pub fn apply_budget(text: String) -> Budgeted {
    let estimated_tokens = estimate_tokens(&text);
    if estimated_tokens <= MAX_INPUT_TOKENS {
        return Budgeted {
            text,
            estimated_tokens,
            truncated: false,
        };
    }

    let mut truncated: String = text.chars().take(MAX_INPUT_CHARS).collect();
    truncated.push_str(TRUNCATION_NOTICE);

    Budgeted {
        text: truncated,
        estimated_tokens,
        truncated: true,
    }
}
