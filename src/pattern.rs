//! Pattern AST and the compiled pattern cache
//!
//! A pattern is a list of terms which must all match a node. Each term is
//! an atom (wildcard, literal text, lemma, tag or terminal identifier, or a
//! choice between terms), optionally followed by a containment clause
//! constraining the node's children or descendants.

use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::parser::{PatternError, compile};

/// Number of compiled patterns kept before the cache is cleared
const CACHE_CAPACITY: usize = 256;

static CACHE: LazyLock<Mutex<FxHashMap<String, Arc<Pattern>>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// `.`
    Any,
    /// `"text"`, stored in lower case
    Literal(String),
    /// `'lemma'`
    Lemma(String),
    /// Nonterminal tag or terminal identifier
    Identifier(String),
    /// `(A | B | ...)`
    Choice(Vec<Term>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub atom: Atom,
    pub containment: Option<Box<Containment>>,
}

impl Term {
    pub fn new(atom: Atom) -> Self {
        Self {
            atom,
            containment: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    ZeroOrOne,
}

impl Repeat {
    /// Minimum and maximum (`None` for unbounded) number of repetitions
    pub fn bounds(self) -> (usize, Option<usize>) {
        match self {
            Self::ZeroOrMore => (0, None),
            Self::OneOrMore => (1, None),
            Self::ZeroOrOne => (0, Some(1)),
        }
    }
}

/// Item of an ordered `[ ... ]` sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeqItem {
    Term { term: Term, repeat: Option<Repeat> },
    /// `$`: the sequence must end here
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    /// `{ ... }`: every term matches some child, in any order
    Set(Vec<Term>),
    /// `[ ... ]`: the items match the children in order
    Sequence(Vec<SeqItem>),
}

/// `> group` (children) or `>> group` (any one level of descendants)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Containment {
    pub deep: bool,
    pub group: Group,
}

/// A compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub source: String,
    pub terms: Vec<Term>,
}

impl Pattern {
    /// Compile `source`
    pub fn new(source: &str) -> Result<Self, PatternError> {
        compile(source)
    }

    /// Compile `source`, reusing an earlier compilation of the same string
    pub fn compile_cached(source: &str) -> Result<Arc<Self>, PatternError> {
        if let Some(pattern) = CACHE
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            return Ok(Arc::clone(pattern));
        }

        debug!(pattern = source, "compiling pattern");
        let pattern = Arc::new(compile(source)?);

        let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= CACHE_CAPACITY {
            debug!(entries = cache.len(), "clearing pattern cache");
            cache.clear();
        }
        cache.insert(source.to_string(), Arc::clone(&pattern));
        Ok(pattern)
    }
}
