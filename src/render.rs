//! Text, indented and bracketed renderings of subtrees

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::ifd::{CE_BCE, CLOCK, CONJUNCTIONS, MONTH_NAMES};
use crate::spacing::{DefaultSpacing, Spacing};
use crate::tags::{CASES, TerminalId};
use crate::tree::{NodeRef, TerminalRef, TokenKind};

/// Grammar literals without a word category, and their terminals
const LITERAL_TERMINALS: &[(&str, &str)] = &[
    ("\"hans\"", "pfn_kk_et_ef"),
    ("\"hennar\"", "pfn_kvk_et_ef"),
    ("\"einnig\"", "ao"),
    ("\"hinn\"", "gr_kk_et_þf"),
    ("'það'_nf_et", "pfn_hk_et_nf"),
    ("'hafa'_nh", "so_nh"),
];

/// Gender of ISO currency codes
pub(crate) const CURRENCY_GENDERS: &[(&str, &str)] = &[
    ("ISK", "kvk"),
    ("GBP", "hk"),
    ("USD", "kk"),
    ("CHF", "kk"),
    ("RUB", "kvk"),
    ("INR", "kvk"),
    ("IDR", "kvk"),
    ("JPY", "hk"),
    ("PLN", "hk"),
    ("CNY", "hk"),
    ("EUR", "kvk"),
];

/// Abbreviated multipliers inside amounts
const MULTIPLIER_ABBREVIATIONS: &[&str] = &["þús.", "ma."];

static LITERAL_TERMINAL: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = LITERAL_TERMINALS
        .iter()
        .map(|(literal, _)| regex::escape(literal))
        .collect();
    Regex::new(&alternatives.join("|")).expect("valid literal terminal regex")
});

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d\d(:\d\d)?$").expect("valid regex"));
static DOTTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}\.\d{1,2}(\.\d{2,4})?$").expect("valid regex"));
static SLASHED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}(/\d{2,4})?$").expect("valid regex"));
static ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.$").expect("valid regex"));
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d\d\d\d$").expect("valid regex"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+\-]?\d+(\.\d\d\d)*(,\d+)?$").expect("valid regex"));

fn currency_gender(code: &str) -> Option<&'static str> {
    CURRENCY_GENDERS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, g)| *g)
}

fn replace_literal_terminals(terminal: &str) -> String {
    LITERAL_TERMINAL
        .replace_all(terminal, |caps: &Captures| {
            let matched = &caps[0];
            LITERAL_TERMINALS
                .iter()
                .find(|(literal, _)| *literal == matched)
                .map_or(matched, |(_, replacement)| *replacement)
                .to_string()
        })
        .into_owned()
}

/// A terminal of category `category` with `variants` and the case of
/// `terminal`, or `default_case` if it has none
fn terminal_with_case(category: &str, variants: &[&str], terminal: &str, default_case: &str) -> String {
    let mut all: Vec<&str> = variants.to_vec();
    let before = all.len();
    all.extend(TerminalId::parse(terminal).variants().filter(|v| CASES.contains(v)));
    if all.len() == before {
        all.push(default_case);
    }
    all.sort_unstable();
    all.dedup();
    let mut out = String::from(category);
    for v in all {
        out.push('_');
        out.push_str(v);
    }
    out
}

/// One terminal per word of a date, time, amount or measurement token
///
/// Words are handled last to first, so the currency at the end of an
/// amount is known when the words before it are reached.
fn multiword_terminals(text: &str, kind: TokenKind, terminal: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().rev().collect();
    let mut result: Vec<String> = Vec::with_capacity(words.len());
    for &word in &words {
        let lower = word.to_lowercase();
        let mapped = if CLOCK_TIME.is_match(word) {
            "tími".to_string()
        } else if DOTTED_DATE.is_match(word) || SLASHED_DATE.is_match(word) {
            "dags".to_string()
        } else if ORDINAL.is_match(word) {
            "raðnr".to_string()
        } else if YEAR.is_match(word) && word.parse::<u32>().is_ok_and(|y| (1776..=2100).contains(&y)) {
            "ártal".to_string()
        } else if NUMBER.is_match(word) {
            "tala".to_string()
        } else if lower == "árið" {
            "no_et_gr_hk_þf".to_string()
        } else if MONTH_NAMES.contains(&lower.as_str()) {
            terminal_with_case("no", &["et", "kk"], terminal, "þf")
        } else if CLOCK.contains(&lower.as_str()) {
            "no_et_gr_kvk_nf".to_string()
        } else if CE_BCE.contains(&lower.as_str()) {
            "ao".to_string()
        } else if kind == TokenKind::Amount && MULTIPLIER_ABBREVIATIONS.contains(&lower.as_str()) {
            "töl".to_string()
        } else if kind == TokenKind::Amount
            && let Some(gender) = currency_gender(word)
        {
            terminal_with_case("no", &["ft", gender], terminal, "þf")
        } else {
            terminal.to_string()
        };
        result.push(mapped);
    }

    // A currency code after a noun multiplier is genitive plural
    if kind == TokenKind::Amount
        && let Some(gender) = words.first().and_then(|w| currency_gender(w))
        && result.get(1).is_some_and(|t| t.starts_with("no_"))
    {
        let mut variants = ["ef", "ft", gender];
        variants.sort_unstable();
        result[0] = format!("no_{}", variants.join("_"));
    }
    result.reverse();
    result
}

/// Error from [`parse_flat`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlatError {
    #[error("Flat error: '/{found}' closes '{expected}'")]
    Mismatched { expected: String, found: String },

    #[error("Flat error: '/{0}' without an opening tag")]
    UnexpectedClose(String),

    #[error("Flat error: '{0}' is never closed")]
    Unclosed(String),
}

/// Element of a bracketed flat rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatItem {
    Open(String),
    Terminal(String),
    Close(String),
}

/// Parse the output of [`NodeRef::flat`] back into its pre-order elements
///
/// Tokens starting with an upper case letter open a nonterminal, `/TAG`
/// closes it and anything else is a terminal.
pub fn parse_flat(flat: &str) -> Result<Vec<FlatItem>, FlatError> {
    let mut open: Vec<&str> = Vec::new();
    let mut items = Vec::new();
    for token in flat.split_whitespace() {
        if let Some(tag) = token.strip_prefix('/')
            && !tag.is_empty()
        {
            match open.pop() {
                Some(expected) if expected == tag => items.push(FlatItem::Close(tag.to_string())),
                Some(expected) => {
                    return Err(FlatError::Mismatched {
                        expected: expected.to_string(),
                        found: tag.to_string(),
                    });
                }
                None => return Err(FlatError::UnexpectedClose(tag.to_string())),
            }
        } else if token.starts_with(char::is_uppercase) {
            open.push(token);
            items.push(FlatItem::Open(token.to_string()));
        } else {
            items.push(FlatItem::Terminal(token.to_string()));
        }
    }
    match open.pop() {
        Some(tag) => Err(FlatError::Unclosed(tag.to_string())),
        None => Ok(items),
    }
}

impl<'t> NodeRef<'t> {
    /// Texts of the terminals in this subtree, left to right
    fn leaf_texts(&self) -> Vec<&'t str> {
        self.leaves()
            .filter_map(|leaf| leaf.terminal())
            .map(|t| t.text())
            .collect()
    }

    /// Terminal texts joined with single spaces
    pub fn text(&self) -> String {
        self.leaf_texts().join(" ")
    }

    /// Terminal texts with natural punctuation spacing
    pub fn tidy_text(&self) -> String {
        DefaultSpacing.join(&self.leaf_texts())
    }

    /// Indented outline of the subtree, one node per line
    pub fn view(&self) -> String {
        let mut out = String::new();
        self.view_at(0, &mut out);
        out
    }

    fn view_at(&self, level: usize, out: &mut String) {
        if level > 0 {
            out.push('\n');
            out.push_str(&"  ".repeat(level - 1));
            out.push_str("+-");
        }
        match (self.tag(), self.terminal()) {
            (Some(tag), _) => {
                out.push_str(tag);
                for child in self.children() {
                    child.view_at(level + 1, out);
                }
            }
            (None, Some(t)) if t.is_punctuation() => {
                out.push('\'');
                out.push_str(t.text());
                out.push('\'');
            }
            (None, Some(t)) => {
                out.push_str(&format!("{}: '{}'", t.terminal_id(), t.text()));
            }
            (None, None) => {}
        }
    }

    /// Bracketed rendering with terminal identifiers, i.e. `NP no_et_nf_kvk /NP`
    pub fn flat(&self) -> String {
        self.flat_with(|t| t.terminal_id())
    }

    /// Like [`flat`](Self::flat), with augmented terminals
    pub fn flat_with_all_variants(&self) -> String {
        self.flat_with(|t| t.augmented())
    }

    fn flat_with(&self, terminal: fn(&TerminalRef<'t>) -> &'t str) -> String {
        let mut parts = Vec::new();
        self.flat_parts(terminal, &mut parts);
        parts.join(" ")
    }

    fn flat_parts(&self, terminal: fn(&TerminalRef<'t>) -> &'t str, parts: &mut Vec<String>) {
        if let Some(tag) = self.tag() {
            parts.push(tag.to_string());
            for child in self.children() {
                child.flat_parts(terminal, parts);
            }
            parts.push(format!("/{tag}"));
            return;
        }
        let Some(t) = self.terminal() else {
            return;
        };
        if t.is_punctuation() {
            parts.push("p".to_string());
            return;
        }
        let id = terminal(&t);
        let text = t.text();
        let words = text.split_whitespace().count();
        if words <= 1 {
            parts.push(replace_literal_terminals(id));
        } else if t.category() == "fs" {
            parts.extend(std::iter::repeat_n("ao".to_string(), words - 1));
            parts.push(id.to_string());
        } else if t.kind().is_multiword() {
            parts.extend(multiword_terminals(text, t.kind(), id));
        } else {
            parts.extend(text.split_whitespace().map(|word| {
                if CONJUNCTIONS.contains(&word) { "st" } else { id }.to_string()
            }));
        }
    }
}
