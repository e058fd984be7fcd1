//! Joining tokens into naturally spaced text

/// Joins a token sequence into text with the spacing of the target language
pub trait Spacing {
    fn join(&self, tokens: &[&str]) -> String;
}

impl<S: Spacing + ?Sized> Spacing for &S {
    fn join(&self, tokens: &[&str]) -> String {
        (**self).join(tokens)
    }
}

/// Tokens written without a space before them
const ATTACH_LEFT: &[&str] = &[".", ",", ":", ";", "!", "?", ")", "]", "}", "%", "»", "…", "”", "“", "..."];

/// Tokens written without a space after them
const ATTACH_RIGHT: &[&str] = &["(", "[", "{", "„", "«"];

/// Tokens written without spaces on either side
const ATTACH_BOTH: &[&str] = &["-", "/"];

/// Icelandic punctuation spacing
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSpacing;

impl Spacing for DefaultSpacing {
    fn join(&self, tokens: &[&str]) -> String {
        let mut out = String::with_capacity(tokens.iter().map(|t| t.len() + 1).sum());
        let mut glue_next = true;
        for &token in tokens.iter().filter(|t| !t.is_empty()) {
            let both = ATTACH_BOTH.contains(&token);
            if !glue_next && !both && !ATTACH_LEFT.contains(&token) {
                out.push(' ');
            }
            out.push_str(token);
            glue_next = both || ATTACH_RIGHT.contains(&token);
        }
        out
    }
}
