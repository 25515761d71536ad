/// Tokens accepted as an affirmative answer.
pub const TRUE_TOKENS: &[&str] = &[
    "1", "on", "y", "yes", "yeah", "yep", "sure", "true", "definitely", "right", "aye",
];

/// Tokens accepted as a negative answer.
pub const FALSE_TOKENS: &[&str] = &[
    "0", "off", "n", "no", "nope", "nah", "false", "wrong", "none", "nay",
];

/// Parse a boolean answer. Leading `!` negation markers are stripped
/// before matching (they do not invert the answer); matching is
/// case-insensitive.
pub fn parse_bool_token(input: &str) -> Option<bool> {
    let token = input.trim().trim_start_matches('!').to_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}
