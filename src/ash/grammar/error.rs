//! Grammar error types

use std::ops::Range;
use thiserror::Error;

/// Errors from tokenizing or parsing with the grammar.
///
/// Running out of input inside an open construct is not an error: it produces
/// zero parse trees. Only a token the grammar cannot accept at its position, or
/// a character no token accepts, is reported here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("unexpected token `{token}` at bytes {}{}", byte_range(.span), expected_suffix(.expected))]
    UnexpectedToken {
        /// Source text of the offending token
        token: String,
        span: Range<usize>,
        expected: Vec<String>,
    },

    #[error("unexpected character `{text}` at bytes {}", byte_range(.span))]
    UnexpectedCharacter { text: String, span: Range<usize> },
}

impl GrammarError {
    /// Byte range of the offending input
    pub fn span(&self) -> Range<usize> {
        match self {
            GrammarError::UnexpectedToken { span, .. } => span.clone(),
            GrammarError::UnexpectedCharacter { span, .. } => span.clone(),
        }
    }

    /// Source text of the offending token or character
    pub fn offending_text(&self) -> &str {
        match self {
            GrammarError::UnexpectedToken { token, .. } => token,
            GrammarError::UnexpectedCharacter { text, .. } => text,
        }
    }
}

fn byte_range(span: &Range<usize>) -> String {
    format!("{}..{}", span.start, span.end)
}

fn expected_suffix(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(", expected one of: {}", expected.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GrammarError::UnexpectedToken {
            token: "end".into(),
            span: 4..7,
            expected: vec![],
        };
        assert_eq!(err.to_string(), "unexpected token `end` at bytes 4..7");

        let err = GrammarError::UnexpectedToken {
            token: ")".into(),
            span: 10..11,
            expected: vec!["newline".into(), "end".into()],
        };
        assert_eq!(
            err.to_string(),
            "unexpected token `)` at bytes 10..11, expected one of: newline, end"
        );
    }

    #[test]
    fn test_offending_text() {
        let err = GrammarError::UnexpectedCharacter {
            text: "$".into(),
            span: 0..1,
        };
        assert_eq!(err.offending_text(), "$");
        assert_eq!(err.span(), 0..1);
    }
}
