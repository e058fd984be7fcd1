//! Simpletree: queryable constituency parse trees
//!
//! Immutable simplified parse trees of Icelandic sentences, with
//! navigation, a small pattern language for searching subtrees, text and
//! lemma extraction, IFD tagging, and case transformation of noun phrases.

pub mod builder; // Tree construction and tag simplification
pub mod extract; // Lemmas and word categories of subtrees
pub mod ifd; // IFD tags for terminals
pub mod inflect; // Noun phrase case, number and definiteness transformation
pub mod matcher; // Pattern evaluation against nodes
pub mod morphology; // Grammatical features and the lexicon lookup trait
pub mod parser; // Pattern language parser
pub mod pattern; // Pattern AST and compile cache
pub mod reader; // Tree table files, treebanks and match sets
pub mod render; // Text, view and flat bracket forms
pub mod searcher; // Subtree search
pub mod spacing; // Token joining
pub mod tags; // Tag and terminal identifier matching
pub mod tree; // Tree arena and navigation

#[cfg(test)]
mod samples;

// Re-exports for convenience
pub use builder::{Simplifier, SimplifierConfig, TerminalInfo, TreeBuilder};
pub use inflect::{Inflector, Target};
pub use morphology::{Case, Definiteness, Features, Gender, MemoryMorphology, Morphology, NoMorphology, Number};
pub use parser::PatternError;
pub use pattern::Pattern;
pub use reader::{MatchSet, ReadError, TreeReader, Treebank};
pub use render::{FlatError, FlatItem, parse_flat};
pub use searcher::{Matches, SearchMode};
pub use spacing::{DefaultSpacing, Spacing};
pub use tags::tag_matches;
pub use tree::{NodeId, NodeRef, TerminalRef, TokenKind, Tree, TreeError};
