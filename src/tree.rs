//! Immutable constituency trees
//!
//! A [`Tree`] owns a flat arena of nodes. Parent links are arena indices and
//! all strings are interned once per tree, so a finished tree is cheap to
//! share between threads. Navigation goes through [`NodeRef`], a copyable
//! cursor pairing the tree with a node id.
//!
//! Trees are created with [`TreeBuilder`](crate::builder::TreeBuilder) and
//! never change afterwards. Every iterator in this module is finite, can be
//! restarted by asking the node again, and may be dropped half way.

use std::fmt;
use std::iter;

use lasso::{RodeoResolver, Spur};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::tags::{TerminalId, tag_matches};

/// Index of a node within its tree's arena
pub type NodeId = usize;

/// Error during tree construction or navigation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Tree error: no child matching '{0}'")]
    NoSuchChild(String),

    #[error("Tree error: child index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Tree error: nonterminal node {0} has no children")]
    EmptySpan(NodeId),

    #[error("Tree error: invalid child identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Tree error: token index {found} at node {node} does not follow token {previous}")]
    TokenOrder {
        node: NodeId,
        previous: usize,
        found: usize,
    },

    #[error("Tree error: pop without a matching push")]
    Unbalanced,

    #[error("Tree error: {0} nonterminal(s) still open")]
    Unclosed(usize),

    #[error("Tree error: more than one root node")]
    MultipleRoots,

    #[error("Tree error: no nodes")]
    EmptyTree,
}

/// Kind of the token a terminal was matched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    #[default]
    Word,
    Punctuation,
    Person,
    Entity,
    Number,
    Amount,
    Measurement,
    Percent,
    Date,
    DateAbs,
    DateRel,
    Time,
    Timestamp,
    TimestampAbs,
    TimestampRel,
    Year,
    Ordinal,
    Currency,
    Unknown,
}

impl TokenKind {
    /// Parse the upper case kind name used by the tokenizer (`PUNCTUATION`, `DATEABS`, ...)
    pub fn from_name(name: &str) -> Self {
        match name {
            "WORD" => Self::Word,
            "PUNCTUATION" => Self::Punctuation,
            "PERSON" => Self::Person,
            "ENTITY" => Self::Entity,
            "NUMBER" => Self::Number,
            "AMOUNT" => Self::Amount,
            "MEASUREMENT" => Self::Measurement,
            "PERCENT" => Self::Percent,
            "DATE" => Self::Date,
            "DATEABS" => Self::DateAbs,
            "DATEREL" => Self::DateRel,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPABS" => Self::TimestampAbs,
            "TIMESTAMPREL" => Self::TimestampRel,
            "YEAR" => Self::Year,
            "ORDINAL" => Self::Ordinal,
            "CURRENCY" => Self::Currency,
            _ => Self::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Word => "WORD",
            Self::Punctuation => "PUNCTUATION",
            Self::Person => "PERSON",
            Self::Entity => "ENTITY",
            Self::Number => "NUMBER",
            Self::Amount => "AMOUNT",
            Self::Measurement => "MEASUREMENT",
            Self::Percent => "PERCENT",
            Self::Date => "DATE",
            Self::DateAbs => "DATEABS",
            Self::DateRel => "DATEREL",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampAbs => "TIMESTAMPABS",
            Self::TimestampRel => "TIMESTAMPREL",
            Self::Year => "YEAR",
            Self::Ordinal => "ORDINAL",
            Self::Currency => "CURRENCY",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Kinds whose multi-word tokens get one terminal per word when flattened
    pub fn is_multiword(self) -> bool {
        matches!(
            self,
            Self::Amount
                | Self::Measurement
                | Self::Time
                | Self::TimestampAbs
                | Self::TimestampRel
                | Self::DateAbs
                | Self::DateRel
        )
    }
}

/// Terminal payload, with strings interned in the owning tree
#[derive(Debug, Clone)]
pub struct Terminal {
    pub(crate) terminal: Spur,
    pub(crate) augmented: Option<Spur>,
    pub(crate) token_index: usize,
    pub(crate) text: Spur,
    pub(crate) lemma: Spur,
    pub(crate) kind: TokenKind,
    pub(crate) word_class: Option<Spur>,
    pub(crate) domain: Option<Spur>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Nonterminal { tag: Spur, children: Vec<NodeId> },
    Terminal(Terminal),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

/// A parse tree for a single sentence
#[derive(Debug)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) strings: RodeoResolver,
    pub(crate) sentence_text: Option<String>,
    pub(crate) metadata: FxHashMap<String, String>,
}

impl Tree {
    /// The root node
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    /// Look up a node by arena index
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The `# text = ...` value the tree was read with, if any
    pub fn sentence_text(&self) -> Option<&str> {
        self.sentence_text.as_deref()
    }

    pub fn metadata(&self) -> &FxHashMap<String, String> {
        &self.metadata
    }

    /// Terminal nodes, left to right
    pub fn terminals(&self) -> Leaves<'_> {
        self.root().leaves()
    }

    /// Check the structural invariants of the tree
    ///
    /// Every nonterminal must have children, and token indices must
    /// strictly increase from left to right.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.root();
        let mut previous: Option<usize> = None;
        for node in iter::once(root).chain(root.descendants()) {
            match &self.nodes[node.id].kind {
                NodeKind::Nonterminal { children, .. } if children.is_empty() => {
                    return Err(TreeError::EmptySpan(node.id));
                }
                NodeKind::Nonterminal { .. } => {}
                NodeKind::Terminal(t) => {
                    if let Some(prev) = previous
                        && t.token_index <= prev
                    {
                        return Err(TreeError::TokenOrder {
                            node: node.id,
                            previous: prev,
                            found: t.token_index,
                        });
                    }
                    previous = Some(t.token_index);
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn resolve(&self, sym: Spur) -> &str {
        self.strings.resolve(&sym)
    }
}

/// A node within a tree
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tag(), self.terminal()) {
            (Some(tag), _) => write!(f, "NodeRef({} {} len={})", self.id, tag, self.len()),
            (None, Some(t)) => write!(f, "NodeRef({} {}: '{}')", self.id, t.terminal_id(), t.text()),
            (None, None) => write!(f, "NodeRef({})", self.id),
        }
    }
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    #[inline]
    fn node(&self) -> &'t Node {
        &self.tree.nodes[self.id]
    }

    /// The tag of a nonterminal, i.e. `NP-OBJ`
    pub fn tag(&self) -> Option<&'t str> {
        match &self.node().kind {
            NodeKind::Nonterminal { tag, .. } => Some(self.tree.resolve(*tag)),
            NodeKind::Terminal(_) => None,
        }
    }

    /// Terminal data, if this is a terminal node
    pub fn terminal(&self) -> Option<TerminalRef<'t>> {
        match &self.node().kind {
            NodeKind::Terminal(data) => Some(TerminalRef {
                tree: self.tree,
                data,
            }),
            NodeKind::Nonterminal { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.node().kind, NodeKind::Terminal(_))
    }

    pub fn has_children(&self) -> bool {
        self.len() > 0
    }

    /// Number of immediate children
    pub fn len(&self) -> usize {
        self.child_ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if this is a nonterminal whose tag matches `identifier`
    pub fn matches_tag(&self, identifier: &str) -> bool {
        self.tag().is_some_and(|tag| tag_matches(tag, identifier))
    }

    fn child_ids(&self) -> &'t [NodeId] {
        match &self.node().kind {
            NodeKind::Nonterminal { children, .. } => children,
            NodeKind::Terminal(_) => &[],
        }
    }

    /// Immediate children in source order
    pub fn children(&self) -> Children<'t> {
        Children {
            tree: self.tree,
            ids: self.child_ids().iter(),
        }
    }

    /// All nodes below this one, in pre-order, left-first
    pub fn descendants(&self) -> Descendants<'t> {
        let mut stack = Vec::with_capacity(16);
        stack.extend(self.child_ids().iter().rev());
        Descendants {
            tree: self.tree,
            stack,
        }
    }

    /// Terminal nodes of this subtree, left to right
    ///
    /// A terminal node is its own single leaf.
    pub fn leaves(&self) -> Leaves<'t> {
        Leaves {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// First and last token index covered by this subtree
    pub fn span(&self) -> Result<(usize, usize), TreeError> {
        let mut bounds: Option<(usize, usize)> = None;
        for node in iter::once(*self).chain(self.descendants()) {
            match &node.node().kind {
                NodeKind::Nonterminal { children, .. } if children.is_empty() => {
                    return Err(TreeError::EmptySpan(node.id));
                }
                NodeKind::Nonterminal { .. } => {}
                NodeKind::Terminal(t) => {
                    let ix = t.token_index;
                    bounds = Some(match bounds {
                        None => (ix, ix),
                        Some((lo, hi)) => (lo.min(ix), hi.max(ix)),
                    });
                }
            }
        }
        bounds.ok_or(TreeError::EmptySpan(self.id))
    }

    /// The child at position `index` (0-based)
    pub fn child_at(&self, index: usize) -> Result<NodeRef<'t>, TreeError> {
        let ids = self.child_ids();
        ids.get(index)
            .map(|&id| NodeRef {
                tree: self.tree,
                id,
            })
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: ids.len(),
            })
    }

    /// The first child whose tag matches `identifier`
    pub fn child_by_tag(&self, identifier: &str) -> Result<NodeRef<'t>, TreeError> {
        self.nth_child_by_tag(identifier, 1)
    }

    /// The `n`th (1-based) child whose tag matches `identifier`
    pub fn nth_child_by_tag(&self, identifier: &str, n: usize) -> Result<NodeRef<'t>, TreeError> {
        if n == 0 {
            return Err(TreeError::InvalidIdentifier(format!("{identifier}0")));
        }
        self.children()
            .filter(|child| child.matches_tag(identifier))
            .nth(n - 1)
            .ok_or_else(|| match n {
                1 => TreeError::NoSuchChild(identifier.to_string()),
                _ => TreeError::NoSuchChild(format!("{identifier}{n}")),
            })
    }

    /// Attribute-style child lookup
    ///
    /// Underscores stand for hyphens, and a trailing number selects among
    /// several matching children: `get("NP_POSS")` is the first `NP-POSS`
    /// child, `get("NP2")` the second `NP` child. The numbered form needs a
    /// digit-free identifier, so tags such as `S0` are reached through
    /// [`child_by_tag`](Self::child_by_tag).
    pub fn get(&self, name: &str) -> Result<NodeRef<'t>, TreeError> {
        let name = name.replace('_', "-");
        let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
        if stem.len() == name.len() || stem.is_empty() || stem.chars().any(|c| c.is_ascii_digit()) {
            return self.child_by_tag(&name);
        }
        let n: usize = name[stem.len()..]
            .parse()
            .map_err(|_| TreeError::InvalidIdentifier(name.clone()))?;
        if n == 0 {
            return Err(TreeError::InvalidIdentifier(name));
        }
        self.nth_child_by_tag(stem, n)
    }

    /// Chained [`get`](Self::get), i.e. `path(&["S_MAIN", "IP", "NP_SUBJ"])`
    pub fn path(&self, names: &[&str]) -> Result<NodeRef<'t>, TreeError> {
        names.iter().try_fold(*self, |node, name| node.get(name))
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.node().parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// The root of the whole tree
    pub fn root(&self) -> NodeRef<'t> {
        self.tree.root()
    }

    /// The closest ancestor whose tag matches `identifier`
    pub fn enclosing(&self, identifier: &str) -> Option<NodeRef<'t>> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.matches_tag(identifier) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }
}

/// Terminal fields of a node
#[derive(Clone, Copy)]
pub struct TerminalRef<'t> {
    tree: &'t Tree,
    data: &'t Terminal,
}

impl<'t> TerminalRef<'t> {
    /// Terminal identifier, i.e. `no_et_nf_kvk`
    pub fn terminal_id(&self) -> &'t str {
        self.tree.resolve(self.data.terminal)
    }

    /// Augmented terminal with the full variant set, or the terminal identifier
    pub fn augmented(&self) -> &'t str {
        match self.data.augmented {
            Some(sym) => self.tree.resolve(sym),
            None => self.terminal_id(),
        }
    }

    pub fn token_index(&self) -> usize {
        self.data.token_index
    }

    /// Surface text, which may contain spaces for multi-word tokens
    pub fn text(&self) -> &'t str {
        self.tree.resolve(self.data.text)
    }

    /// Dictionary lemma, or the literal text for non-word tokens
    pub fn lemma(&self) -> &'t str {
        self.tree.resolve(self.data.lemma)
    }

    pub fn kind(&self) -> TokenKind {
        self.data.kind
    }

    pub fn is_punctuation(&self) -> bool {
        self.data.kind == TokenKind::Punctuation
    }

    /// Lexicon word class (`kk`, `lo`, `so`, `gr`, ...)
    pub fn word_class(&self) -> Option<&'t str> {
        self.data.word_class.map(|sym| self.tree.resolve(sym))
    }

    /// Lexicon subclass (`ism`, `örn`, `lönd`, ...)
    pub fn domain(&self) -> Option<&'t str> {
        self.data.domain.map(|sym| self.tree.resolve(sym))
    }

    /// Terminal category, i.e. `no` for `no_et_nf_kvk`
    pub fn category(&self) -> &'t str {
        TerminalId::parse(self.terminal_id()).category()
    }

    /// Variants of the terminal identifier
    pub fn variants(&self) -> impl Iterator<Item = &'t str> + use<'t> {
        TerminalId::parse(self.terminal_id()).variants()
    }

    /// Variants of the augmented terminal
    pub fn all_variants(&self) -> impl Iterator<Item = &'t str> + use<'t> {
        TerminalId::parse(self.augmented()).variants()
    }

    /// True if the augmented variant set contains `variant`
    pub fn has_variant(&self, variant: &str) -> bool {
        TerminalId::parse(self.augmented()).has_variant(variant)
    }

    /// First augmented variant that is a member of `set`
    pub fn variant_in(&self, set: &[&str]) -> Option<&'t str> {
        TerminalId::parse(self.augmented()).variant_in(set)
    }
}

impl fmt::Debug for TerminalRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalRef")
            .field("terminal", &self.terminal_id())
            .field("text", &self.text())
            .field("lemma", &self.lemma())
            .field("token_index", &self.token_index())
            .finish()
    }
}

/// Iterator over immediate children
#[derive(Clone)]
pub struct Children<'t> {
    tree: &'t Tree,
    ids: std::slice::Iter<'t, NodeId>,
}

impl<'t> Iterator for Children<'t> {
    type Item = NodeRef<'t>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.ids.next().map(|&id| NodeRef { tree, id })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.ids.next_back().map(|&id| NodeRef { tree, id })
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Pre-order iterator over the nodes below a node
#[derive(Clone)]
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let NodeKind::Nonterminal { children, .. } = &self.tree.nodes[id].kind {
            self.stack.extend(children.iter().rev());
        }
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}

/// Left-to-right iterator over terminal nodes
#[derive(Clone)]
pub struct Leaves<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Leaves<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            match &self.tree.nodes[id].kind {
                NodeKind::Terminal(_) => {
                    return Some(NodeRef {
                        tree: self.tree,
                        id,
                    });
                }
                NodeKind::Nonterminal { children, .. } => {
                    self.stack.extend(children.iter().rev());
                }
            }
        }
        None
    }
}
