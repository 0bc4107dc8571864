//! Logical line scanner
//!
//! Splits source into logical lines: comments removed, continuation lines
//! joined (open brackets, trailing operators, leading `|>`), heredoc bodies
//! dropped. Each line carries a masked copy with string and sigil contents
//! blanked, so keyword and block-marker detection never sees text inside
//! literals.

use crate::ash::ast::Position;
use once_cell::sync::Lazy;
use regex::Regex;

/// A word that may be a block marker (`do`, `fn`, `end`) or a keyword key (`do:`)
static BLOCK_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*[?!]?:?").unwrap());

const BOM: char = '\u{feff}';

/// Operators that continue an expression on the next line
const CONTINUATIONS: &[&str] = &[",", "|>", "<>", "++", "=", "&&", "||", "\\\\", " and", " or", " when"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    /// 0-based line of the first physical line
    pub line: usize,
    /// Byte column of the first non-blank character
    pub column: usize,
    /// Code text, comments removed, joined and trimmed
    pub text: String,
    /// `text` with string, sigil and char literal contents blanked, byte for byte
    pub masked: String,
    /// Offset in `text` where each joined physical line starts, with its position
    starts: Vec<(usize, Position)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerKind {
    Do,
    Fn,
    End,
}

/// A block marker and its byte range in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Marker {
    pub kind: MarkerKind,
    pub start: usize,
    pub end: usize,
}

impl LogicalLine {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Source position of a byte offset in `text`
    pub fn position_at(&self, offset: usize) -> Position {
        let (start, origin) = self
            .starts
            .iter()
            .rev()
            .find(|(start, _)| *start <= offset)
            .copied()
            .unwrap_or((0, self.position()));
        Position::new(origin.line, origin.column + (offset - start))
    }

    /// Block openers (`do`, `fn`) and closers (`end`), in order.
    ///
    /// Keyword keys (`do:`), atoms (`:end`), attributes and remote calls are not markers.
    pub fn markers(&self) -> Vec<Marker> {
        BLOCK_WORD
            .find_iter(&self.masked)
            .filter_map(|m| {
                let preceding = self.masked[..m.start()].chars().next_back();
                let qualified = matches!(preceding, Some(':') | Some('.') | Some('@'))
                    || preceding.map_or(false, |c| c.is_ascii_alphanumeric());
                if qualified {
                    return None;
                }
                let kind = match m.as_str() {
                    "do" => MarkerKind::Do,
                    "fn" => MarkerKind::Fn,
                    "end" => MarkerKind::End,
                    _ => return None,
                };
                Some(Marker {
                    kind,
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Str { quote: char, interpolation: usize },
    Heredoc { quote: char },
    Sigil { open: char, close: char, depth: usize },
}

/// Split source into logical lines.
///
/// A leading byte order mark is skipped; columns on the first line still count its bytes.
pub(crate) fn logical_lines(source: &str) -> Vec<LogicalLine> {
    let mut lines: Vec<LogicalLine> = Vec::new();
    let mut pending: Option<LogicalLine> = None;
    let mut mode = Mode::Code;
    let mut depth: usize = 0;

    for (index, physical) in source.lines().enumerate() {
        let (physical, bom) = match physical.strip_prefix(BOM) {
            Some(rest) if index == 0 => (rest, BOM.len_utf8()),
            _ => (physical, 0),
        };
        let (code, masked) = scan_line(physical, &mut mode);
        let lead = code.len() - code.trim_start().len();
        let text = code.trim();

        if !text.is_empty() {
            let masked_text = masked.get(lead..lead + text.len()).unwrap_or(text);
            let origin = Position::new(index, lead + bom);
            match pending.as_mut() {
                Some(line) => {
                    line.text.push(' ');
                    line.masked.push(' ');
                    line.starts.push((line.text.len(), origin));
                    line.text.push_str(text);
                    line.masked.push_str(masked_text);
                }
                None => {
                    pending = Some(LogicalLine {
                        line: origin.line,
                        column: origin.column,
                        text: text.to_string(),
                        masked: masked_text.to_string(),
                        starts: vec![(0, origin)],
                    });
                }
            }
            for ch in masked.chars() {
                match ch {
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        }

        if let Some(line) = pending.as_ref() {
            let open_literal = matches!(mode, Mode::Str { .. } | Mode::Sigil { .. });
            let trailing = CONTINUATIONS.iter().any(|op| line.masked.ends_with(op));
            if depth == 0 && !open_literal && !trailing {
                lines.extend(pending.take());
            }
        }
    }
    lines.extend(pending);

    merge_pipelines(lines)
}

/// Fold lines that start with `|>` into the line before them
fn merge_pipelines(lines: Vec<LogicalLine>) -> Vec<LogicalLine> {
    let mut merged: Vec<LogicalLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.last_mut() {
            Some(previous) if line.masked.starts_with("|>") => {
                previous.text.push(' ');
                previous.masked.push(' ');
                let base = previous.text.len();
                previous
                    .starts
                    .extend(line.starts.iter().map(|&(offset, origin)| (base + offset, origin)));
                previous.text.push_str(&line.text);
                previous.masked.push_str(&line.masked);
            }
            _ => merged.push(line),
        }
    }
    merged
}

fn closing_delimiter(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        '/' | '|' | '"' | '\'' => Some(open),
        _ => None,
    }
}

/// Blank a literal character without changing byte offsets
fn blank(masked: &mut String, ch: char) {
    masked.extend(std::iter::repeat(' ').take(ch.len_utf8()));
}

fn is_triple(chars: &[char], i: usize, quote: char) -> bool {
    chars.len() >= i + 3 && chars[i..i + 3].iter().all(|&c| c == quote)
}

/// Scan one physical line, returning `(code, masked)`.
///
/// `mode` carries open strings, heredocs and sigils across lines.
fn scan_line(line: &str, mode: &mut Mode) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut code = String::with_capacity(line.len());
    let mut masked = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match *mode {
            Mode::Heredoc { quote } => {
                if is_triple(&chars, i, quote) {
                    for _ in 0..3 {
                        code.push(quote);
                        masked.push(quote);
                    }
                    *mode = Mode::Code;
                    i += 3;
                } else {
                    i += 1;
                }
            }
            Mode::Str { quote, interpolation } => {
                if ch == '\\' {
                    code.push(ch);
                    masked.push(' ');
                    if let Some(&next) = chars.get(i + 1) {
                        code.push(next);
                        blank(&mut masked, next);
                    }
                    i += 2;
                    continue;
                }
                if ch == '#' && chars.get(i + 1) == Some(&'{') {
                    *mode = Mode::Str { quote, interpolation: interpolation + 1 };
                    code.push_str("#{");
                    masked.push_str("  ");
                    i += 2;
                    continue;
                }
                if ch == '}' && interpolation > 0 {
                    *mode = Mode::Str { quote, interpolation: interpolation - 1 };
                } else if ch == quote && interpolation == 0 {
                    *mode = Mode::Code;
                    code.push(ch);
                    masked.push(ch);
                    i += 1;
                    continue;
                }
                code.push(ch);
                blank(&mut masked, ch);
                i += 1;
            }
            Mode::Sigil { open, close, depth } => {
                if ch == '\\' {
                    code.push(ch);
                    masked.push(' ');
                    if let Some(&next) = chars.get(i + 1) {
                        code.push(next);
                        blank(&mut masked, next);
                    }
                    i += 2;
                    continue;
                }
                if ch == close && depth == 0 {
                    *mode = Mode::Code;
                    code.push(ch);
                    masked.push(ch);
                    i += 1;
                    continue;
                }
                if ch == close {
                    *mode = Mode::Sigil { open, close, depth: depth - 1 };
                } else if ch == open && open != close {
                    *mode = Mode::Sigil { open, close, depth: depth + 1 };
                }
                code.push(ch);
                blank(&mut masked, ch);
                i += 1;
            }
            Mode::Code => match ch {
                '#' => break,
                '"' | '\'' => {
                    if is_triple(&chars, i, ch) {
                        *mode = Mode::Heredoc { quote: ch };
                        for _ in 0..3 {
                            code.push(ch);
                            masked.push(ch);
                        }
                        i += 3;
                    } else {
                        *mode = Mode::Str { quote: ch, interpolation: 0 };
                        code.push(ch);
                        masked.push(ch);
                        i += 1;
                    }
                }
                '~' if chars.get(i + 1).map_or(false, |c| c.is_ascii_alphabetic()) => {
                    let mut j = i + 1;
                    while j < chars.len() && chars[j].is_ascii_alphabetic() {
                        j += 1;
                    }
                    let delimiter = chars.get(j).copied();
                    match delimiter {
                        Some(d) if (d == '"' || d == '\'') && is_triple(&chars, j, d) => {
                            *mode = Mode::Heredoc { quote: d };
                            let opener: String = chars[i..j + 3].iter().collect();
                            code.push_str(&opener);
                            masked.push_str(&opener);
                            i = j + 3;
                        }
                        Some(d) => match closing_delimiter(d) {
                            Some(close) => {
                                *mode = Mode::Sigil { open: d, close, depth: 0 };
                                let opener: String = chars[i..=j].iter().collect();
                                code.push_str(&opener);
                                masked.push_str(&opener);
                                i = j + 1;
                            }
                            None => {
                                code.push(ch);
                                masked.push(ch);
                                i += 1;
                            }
                        },
                        None => {
                            code.push(ch);
                            masked.push(ch);
                            i += 1;
                        }
                    }
                }
                '?' if i + 1 < chars.len()
                    && !i
                        .checked_sub(1)
                        .map_or(false, |p| chars[p].is_alphanumeric() || chars[p] == '_') =>
                {
                    // Character literal: `?#`, `?"`, `?\n`
                    let width = if chars[i + 1] == '\\' { 3 } else { 2 };
                    let end = (i + width).min(chars.len());
                    code.extend(&chars[i..end]);
                    masked.push('?');
                    for &c in &chars[i + 1..end] {
                        blank(&mut masked, c);
                    }
                    i = end;
                }
                _ => {
                    code.push(ch);
                    masked.push(ch);
                    i += 1;
                }
            },
        }
    }

    (code, masked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        logical_lines(source).into_iter().map(|l| l.text).collect()
    }

    fn marker_kinds(source: &str) -> Vec<MarkerKind> {
        logical_lines(source)
            .remove(0)
            .markers()
            .into_iter()
            .map(|m| m.kind)
            .collect()
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(
            texts("attributes do # the fields\n  # full line\n  attribute :a\nend"),
            vec!["attributes do", "attribute :a", "end"]
        );
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        let lines = logical_lines(r##"description "issue #12 do""##);
        assert_eq!(lines[0].text, r##"description "issue #12 do""##);
        assert!(lines[0].markers().is_empty());
    }

    #[test]
    fn test_positions() {
        let lines = logical_lines("defmodule A do\n\n    attributes do\n    end\nend\n");
        assert_eq!(lines[1].position(), Position::new(2, 4));
        assert_eq!(lines[2].position(), Position::new(3, 4));
    }

    #[test]
    fn test_bracket_continuation() {
        assert_eq!(
            texts("use Ash.Resource,\n  otp_app: :app,\n  extensions: [\n    AshPostgres.DataLayer\n  ]\nattributes do"),
            vec![
                "use Ash.Resource, otp_app: :app, extensions: [ AshPostgres.DataLayer ]",
                "attributes do"
            ]
        );
    }

    #[test]
    fn test_pipeline_continuation() {
        assert_eq!(
            texts("change fn changeset, _ ->\n  changeset\n  |> foo()\nend"),
            vec!["change fn changeset, _ ->", "changeset |> foo()", "end"]
        );
    }

    #[test]
    fn test_heredoc_body_dropped() {
        let source = "attribute :a, :string do\n  description \"\"\"\n  It ends here do\n  end\n  \"\"\"\nend";
        assert_eq!(
            texts(source),
            vec!["attribute :a, :string do", "description \"\"\"", "\"\"\"", "end"]
        );
    }

    #[test]
    fn test_sigil_contents_masked() {
        let lines = logical_lines("validate match(:name, ~r/^do end$/)");
        assert!(lines[0].markers().is_empty());
    }

    #[test]
    fn test_char_literal() {
        let lines = logical_lines("x = ?# do");
        assert_eq!(lines[0].text, "x = ?# do");
        assert_eq!(
            lines[0].markers(),
            vec![Marker {
                kind: MarkerKind::Do,
                start: 7,
                end: 9
            }]
        );
    }

    #[test]
    fn test_markers() {
        use MarkerKind::{Do, End, Fn};

        assert_eq!(marker_kinds("password :default do"), vec![Do]);
        assert_eq!(
            marker_kinds("attribute :a, :string do allow_nil? false end"),
            vec![Do, End]
        );
        assert!(marker_kinds("if x, do: :a, else: :b").is_empty());
        assert!(marker_kinds("defaults [:end, :do]").is_empty());
        assert!(marker_kinds("attribute :end_date, :date").is_empty());
        assert_eq!(marker_kinds("change fn changeset, _ ->"), vec![Fn]);
    }

    #[test]
    fn test_position_at_joined_lines() {
        let line = logical_lines("belongs_to :author,
    MyApp.User do").remove(0);
        assert_eq!(line.text, "belongs_to :author, MyApp.User do");
        assert_eq!(line.position_at(0), Position::new(0, 0));
        assert_eq!(line.position_at(11), Position::new(0, 11));
        assert_eq!(line.position_at(20), Position::new(1, 4));
        assert_eq!(line.position_at(31), Position::new(1, 15));
    }

    #[test]
    fn test_masked_keeps_byte_offsets() {
        let line = logical_lines("description \"héllo do\" do").remove(0);
        assert_eq!(line.masked.len(), line.text.len());
        let markers = line.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(&line.text[markers[0].start..markers[0].end], "do");
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let lines = logical_lines("\u{feff}use Ash.Resource\nattributes do");
        assert_eq!(lines[0].text, "use Ash.Resource");
        assert_eq!(lines[0].position(), Position::new(0, 3));
        assert_eq!(lines[1].position(), Position::new(1, 0));
    }
}
