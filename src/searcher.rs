//! Tree search with compiled patterns
//!
//! Every search runs the same pre-order traversal. In [`SearchMode::All`]
//! the traversal continues below a matching node, so nested matches are
//! reported too; in [`SearchMode::Top`] the subtree of a match is skipped,
//! so the reported nodes never overlap.

use std::sync::Arc;

use crate::parser::PatternError;
use crate::pattern::Pattern;
use crate::tree::{NodeId, NodeRef, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Every matching node, including nodes inside other matches
    All,
    /// Only the topmost matching nodes
    Top,
}

/// Lazy iterator over the nodes matching a pattern
pub struct Matches<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
    pattern: Arc<Pattern>,
    prune: bool,
}

impl<'t> Matches<'t> {
    fn new(start: NodeRef<'t>, pattern: Arc<Pattern>, mode: SearchMode) -> Self {
        Self {
            tree: start.tree(),
            stack: vec![start.id()],
            pattern,
            prune: mode == SearchMode::Top,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl<'t> Iterator for Matches<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.tree.node(id)?;
            let found = self.pattern.is_match(node);
            if !(found && self.prune) {
                let start = self.stack.len();
                self.stack.extend(node.children().map(|child| child.id()));
                self.stack[start..].reverse();
            }
            if found {
                return Some(node);
            }
        }
        None
    }
}

impl<'t> NodeRef<'t> {
    /// Search this subtree, including this node, with a compiled pattern
    pub fn search(&self, pattern: Arc<Pattern>, mode: SearchMode) -> Matches<'t> {
        Matches::new(*self, pattern, mode)
    }

    /// True if this node matches `pattern`
    pub fn matches(&self, pattern: &str) -> Result<bool, PatternError> {
        Ok(Pattern::compile_cached(pattern)?.is_match(*self))
    }

    /// The first node in pre-order, starting with this one, matching `pattern`
    pub fn first_match(&self, pattern: &str) -> Result<Option<NodeRef<'t>>, PatternError> {
        Ok(self.all_matches(pattern)?.next())
    }

    /// Every matching node in this subtree, nested matches included
    pub fn all_matches(&self, pattern: &str) -> Result<Matches<'t>, PatternError> {
        let pattern = Pattern::compile_cached(pattern)?;
        Ok(self.search(pattern, SearchMode::All))
    }

    /// The topmost matching nodes in this subtree; matches are not searched further
    pub fn top_matches(&self, pattern: &str) -> Result<Matches<'t>, PatternError> {
        let pattern = Pattern::compile_cached(pattern)?;
        Ok(self.search(pattern, SearchMode::Top))
    }
}
