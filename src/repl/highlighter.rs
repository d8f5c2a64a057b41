use crate::engine::special_forms;
use lazy_static::lazy_static;
use owo_colors::OwoColorize;
use regex::Regex;
use rustyline::highlight::{CmdKind, Highlighter, MatchingBracketHighlighter};
use rustyline::validate::MatchingBracketValidator;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow::{self, Borrowed, Owned};

lazy_static! {
    // All regexes are anchored: painting scans the line left to right and
    // tries each one at the current position.
    static ref STRING_RE: Regex = Regex::new(r#"^"([^"\\]|\\.)*""#).unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"^;.*").unwrap();
    static ref BOOLEAN_RE: Regex = Regex::new(r"^#[tf]").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"^-?\d+(\.\d*)?([eE][+-]?\d+)?").unwrap();
    // Built from the classifier's keyword table so the two never drift.
    // Longest alternatives first, since alternation is leftmost-first.
    static ref KEYWORD_RE: Regex = {
        let mut keywords: Vec<&str> = special_forms::SPECIAL_FORMS.to_vec();
        keywords.sort_by_key(|k| std::cmp::Reverse(k.len()));
        let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        Regex::new(&format!("^({})", alternatives.join("|"))).unwrap()
    };
    static ref PARENS_RE: Regex = Regex::new(r"^[()]").unwrap();
}

// Same continuation set the reader allows in symbols; a keyword match only
// counts when the next character is not one of these.
fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || "!$%&*/:<=>?@^_~+-.#".contains(c)
}

fn paint(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    let mut pos = 0;
    while pos < line.len() {
        let rest = &line[pos..];
        if let Some(mat) = STRING_RE.find(rest) {
            out.push_str(&mat.as_str().green().to_string());
            pos += mat.end();
        } else if let Some(mat) = COMMENT_RE.find(rest) {
            out.push_str(&mat.as_str().bright_black().to_string());
            pos += mat.end();
        } else if let Some(mat) = BOOLEAN_RE.find(rest) {
            out.push_str(&mat.as_str().yellow().to_string());
            pos += mat.end();
        } else if let Some(mat) = NUMBER_RE.find(rest) {
            out.push_str(&mat.as_str().magenta().to_string());
            pos += mat.end();
        } else if let Some(mat) = KEYWORD_RE
            .find(rest)
            .filter(|m| !rest[m.end()..].starts_with(is_symbol_char))
        {
            out.push_str(&mat.as_str().cyan().bold().to_string());
            pos += mat.end();
        } else if let Some(mat) = PARENS_RE.find(rest) {
            out.push_str(&mat.as_str().blue().to_string());
            pos += mat.end();
        } else {
            // No token at this position; emit one plain character.
            let char_len = rest
                .chars()
                .next()
                .map_or(1, |c| c.len_utf8());
            out.push_str(&rest[..char_len]);
            pos += char_len;
        }
    }
    out
}

/// Regex-driven syntax highlighting for REPL input, plus bracket matching.
#[derive(Default)]
pub struct SchemeHighlighter {
    matching_bracket: MatchingBracketHighlighter,
}

impl Highlighter for SchemeHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Borrowed(line);
        }
        Owned(paint(line))
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: CmdKind) -> bool {
        // Repaint when the bracket highlighter wants to, and on every edit
        // so token colors track the input.
        self.matching_bracket.highlight_char(line, pos, kind) || !line.is_empty()
    }
}

#[derive(Completer, Helper, Hinter, Validator)]
pub struct ReplHelper {
    highlighter: SchemeHighlighter,
    // Multi-line forms stay open until the brackets balance.
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

impl ReplHelper {
    pub fn new() -> Self {
        Self {
            highlighter: SchemeHighlighter::default(),
            validator: MatchingBracketValidator::new(),
        }
    }
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}
