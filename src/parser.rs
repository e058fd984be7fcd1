//! Pattern language parser
//!
//! Parses pattern strings into the [`Pattern`] AST using a pest grammar.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

use crate::pattern::{Atom, Containment, Group, Pattern, Repeat, SeqItem, Term};

#[derive(Parser)]
#[grammar = "pattern.pest"]
struct PatternParser;

/// Error type for pattern compilation failures
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Pattern error: {0}")]
    Syntax(Box<pest::error::Error<Rule>>),

    #[error("Pattern error: repetition '{0}' is only allowed inside [ ] sequences")]
    RepeatOutsideSequence(char),

    #[error("Pattern error: '$' is only allowed inside [ ] sequences")]
    EndOutsideSequence,

    #[error("Pattern error: malformed {0}")]
    Malformed(&'static str),
}

impl From<pest::error::Error<Rule>> for PatternError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        PatternError::Syntax(Box::new(err))
    }
}

/// Parse a pattern string
pub fn compile(source: &str) -> Result<Pattern, PatternError> {
    let mut pairs = PatternParser::parse(Rule::pattern, source)?;
    let Some(pattern) = pairs.next() else {
        return Err(PatternError::Malformed("pattern"));
    };

    let mut terms = Vec::new();
    for element in pattern.into_inner() {
        if element.as_rule() == Rule::element {
            terms.push(parse_unordered(element)?);
        }
    }
    Ok(Pattern {
        source: source.to_string(),
        terms,
    })
}

/// Parse an element outside a sequence, where `$` and repetition are errors
fn parse_unordered(element: Pair<Rule>) -> Result<Term, PatternError> {
    match parse_element(element)? {
        SeqItem::Term { term, repeat: None } => Ok(term),
        SeqItem::Term {
            repeat: Some(repeat),
            ..
        } => Err(PatternError::RepeatOutsideSequence(match repeat {
            Repeat::ZeroOrMore => '*',
            Repeat::OneOrMore => '+',
            Repeat::ZeroOrOne => '?',
        })),
        SeqItem::End => Err(PatternError::EndOutsideSequence),
    }
}

fn parse_element(element: Pair<Rule>) -> Result<SeqItem, PatternError> {
    let mut inner = element.into_inner();
    let Some(first) = inner.next() else {
        return Err(PatternError::Malformed("element"));
    };
    if first.as_rule() == Rule::end_marker {
        return Ok(SeqItem::End);
    }
    let term = parse_term(first)?;
    let repeat = match inner.next().map(|p| p.as_str()) {
        None => None,
        Some("*") => Some(Repeat::ZeroOrMore),
        Some("+") => Some(Repeat::OneOrMore),
        Some("?") => Some(Repeat::ZeroOrOne),
        Some(_) => return Err(PatternError::Malformed("repetition")),
    };
    Ok(SeqItem::Term { term, repeat })
}

fn parse_term(term: Pair<Rule>) -> Result<Term, PatternError> {
    let mut inner = term.into_inner();
    let Some(atom) = inner.next() else {
        return Err(PatternError::Malformed("term"));
    };
    let atom = parse_atom(atom)?;
    let containment = match inner.next() {
        Some(pair) => Some(Box::new(parse_containment(pair)?)),
        None => None,
    };
    Ok(Term { atom, containment })
}

fn parse_atom(atom: Pair<Rule>) -> Result<Atom, PatternError> {
    match atom.as_rule() {
        Rule::wildcard => Ok(Atom::Any),
        Rule::identifier => Ok(Atom::Identifier(atom.as_str().to_string())),
        Rule::literal => {
            let Some(text) = atom.into_inner().next() else {
                return Err(PatternError::Malformed("literal"));
            };
            Ok(Atom::Literal(text.as_str().to_lowercase()))
        }
        Rule::lemma => {
            let Some(text) = atom.into_inner().next() else {
                return Err(PatternError::Malformed("lemma"));
            };
            Ok(Atom::Lemma(text.as_str().to_string()))
        }
        Rule::choice => {
            let options = atom
                .into_inner()
                .map(parse_term)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Atom::Choice(options))
        }
        _ => Err(PatternError::Malformed("atom")),
    }
}

fn parse_containment(pair: Pair<Rule>) -> Result<Containment, PatternError> {
    let mut inner = pair.into_inner();
    let Some(op) = inner.next() else {
        return Err(PatternError::Malformed("containment operator"));
    };
    let deep = op.as_rule() == Rule::deep_op;
    let Some(body) = inner.next() else {
        return Err(PatternError::Malformed("containment"));
    };

    let group = match body.as_rule() {
        Rule::set => Group::Set(
            body.into_inner()
                .map(parse_unordered)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Rule::sequence => Group::Sequence(
            body.into_inner()
                .map(parse_element)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        // A lone term is a set of one
        Rule::term => Group::Set(vec![parse_term(body)?]),
        _ => return Err(PatternError::Malformed("containment")),
    };
    Ok(Containment { deep, group })
}
