//! Name extraction for block and detail keywords
//!
//! Given the text that follows a keyword on its line, the extractor returns the
//! first name token: either a colon-prefixed atom (`:email`) or a bare word
//! (`get_by_subject`), whichever appears first. The trailing block marker (`do`)
//! and inline `do:` bodies are never part of the name.
//!
//! ```text
//! attribute :email, :string      -> ":email"
//! read get_by_subject do         -> "get_by_subject"
//! magic_link do                  -> ""
//! ```

use crate::ash::config::NameShape;
use once_cell::sync::Lazy;
use regex::Regex;

/// An atom (`:name`) or a bare word (`name`), whichever comes first
static NAME_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r":\w+|\w+").unwrap());

/// Trailing `do` block marker
static BLOCK_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|[\s,)\]])do\s*$").unwrap());

/// Inline `do:` body, which ends the positional part of a statement
static INLINE_DO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|[\s,])do:").unwrap());

/// A keyword option key (`allow_nil?: false`) ends the positional arguments
static OPTION_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+[?!]?:(?:\s|$)").unwrap());

/// Cut the block marker and any inline body off the text after a keyword.
pub fn strip_block_marker(rest: &str) -> &str {
    let mut text = rest.trim();
    if let Some(m) = INLINE_DO.find(text) {
        text = &text[..m.start()];
    }
    if let Some(m) = BLOCK_MARKER.find(text) {
        text = &text[..m.start()];
    }
    text.trim()
}

/// Extract the first name token from the text following a keyword.
///
/// Returns an empty string when no atom or word appears before the block marker.
pub fn extract_name(rest: &str) -> String {
    let text = strip_block_marker(rest);
    NAME_TOKEN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Split the leading positional arguments off the text following a keyword.
///
/// Arguments are separated by top-level commas. Collection stops at the first
/// keyword option (`from: :draft`) or at the block marker.
pub fn positional_arguments(rest: &str) -> Vec<String> {
    let mut text = strip_block_marker(rest);
    if let Some(inner) = text.strip_prefix('(') {
        text = inner.strip_suffix(')').unwrap_or(inner);
    }

    split_top_level(text)
        .into_iter()
        .map(str::trim)
        .take_while(|arg| !arg.is_empty() && !OPTION_KEY.is_match(arg))
        .map(str::to_string)
        .collect()
}

/// Capture `(name, arguments)` for a node according to its name shape.
pub fn capture(shape: NameShape, rest: &str) -> (String, Vec<String>) {
    match shape {
        NameShape::Bare => (String::new(), Vec::new()),
        NameShape::Single => (extract_name(rest), Vec::new()),
        NameShape::Positional => (extract_name(rest), positional_arguments(rest)),
    }
}

/// Split on commas that are not nested inside brackets or strings.
pub(crate) fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_name() {
        assert_eq!(extract_name(" :email, :string"), ":email");
    }

    #[test]
    fn test_word_name() {
        assert_eq!(extract_name("get_by_subject do"), "get_by_subject");
    }

    #[test]
    fn test_keyword_followed_by_do_has_empty_name() {
        assert_eq!(extract_name(" do"), "");
        assert_eq!(extract_name("do"), "");
        assert_eq!(extract_name(""), "");
    }

    #[test]
    fn test_first_token_wins_regardless_of_shape() {
        // Atom first
        assert_eq!(extract_name(":default, other do"), ":default");
        // Word first, atom later on the line
        assert_eq!(extract_name("action_type(:read) do"), "action_type");
    }

    #[test]
    fn test_inline_do_is_not_a_name() {
        assert_eq!(extract_name(", do: :ok"), "");
        assert_eq!(extract_name(":publish, do: :ok"), ":publish");
    }

    #[test]
    fn test_word_ending_in_do_is_kept() {
        assert_eq!(extract_name(":todo"), ":todo");
        assert_eq!(extract_name("undo do"), "undo");
    }

    #[test]
    fn test_positional_arguments() {
        assert_eq!(
            positional_arguments(" :author, MyApp.Accounts.User do"),
            vec![":author", "MyApp.Accounts.User"]
        );
        assert_eq!(
            positional_arguments(" :publish, from: :draft, to: :published"),
            vec![":publish"]
        );
        assert_eq!(
            positional_arguments("(:tags, MyApp.Tag, through: MyApp.PostTag)"),
            vec![":tags", "MyApp.Tag"]
        );
        assert!(positional_arguments(" do").is_empty());
    }

    #[test]
    fn test_positional_arguments_respect_nesting() {
        assert_eq!(
            positional_arguments(r#" :full_name, :string, expr(first <> ", " <> last)"#),
            vec![":full_name", ":string", r#"expr(first <> ", " <> last)"#]
        );
    }

    #[test]
    fn test_capture_by_shape() {
        assert_eq!(capture(NameShape::Bare, "()"), (String::new(), vec![]));
        assert_eq!(
            capture(NameShape::Single, " :title, :string"),
            (":title".to_string(), vec![])
        );
        assert_eq!(
            capture(NameShape::Positional, " :title, :string"),
            (
                ":title".to_string(),
                vec![":title".to_string(), ":string".to_string()]
            )
        );
    }
}
