//! Tree construction
//!
//! [`TreeBuilder`] assembles a [`Tree`] from a stream of push/pop calls in
//! the order a parser visits its result. [`Simplifier`] sits in front of it
//! and maps grammar nonterminal names to the simplified tags used for
//! searching, collapsing redundant levels as it goes.

use lasso::Rodeo;
use rustc_hash::FxHashMap;

use crate::tags::TerminalId;
use crate::tree::{Node, NodeId, NodeKind, Terminal, TokenKind, Tree, TreeError};

/// Everything known about a token matched to a terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalInfo {
    terminal: String,
    token_index: usize,
    text: String,
    lemma: Option<String>,
    augmented: Option<String>,
    kind: TokenKind,
    word_class: Option<String>,
    domain: Option<String>,
}

impl TerminalInfo {
    pub fn new(terminal: impl Into<String>, token_index: usize, text: impl Into<String>) -> Self {
        Self {
            terminal: terminal.into(),
            token_index,
            text: text.into(),
            lemma: None,
            augmented: None,
            kind: TokenKind::Word,
            word_class: None,
            domain: None,
        }
    }

    /// A punctuation token; its lemma is its text
    pub fn punctuation(token_index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), token_index, text).kind(TokenKind::Punctuation)
    }

    /// Dictionary lemma; defaults to the token text
    pub fn lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    /// Terminal with the full variant set, i.e. `so_1_þf_et_fh_gm_p3_þt`
    pub fn augmented(mut self, augmented: impl Into<String>) -> Self {
        self.augmented = Some(augmented.into());
        self
    }

    pub fn kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn word_class(mut self, word_class: impl Into<String>) -> Self {
        self.word_class = Some(word_class.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    fn category(&self) -> &str {
        TerminalId::parse(&self.terminal).category()
    }
}

/// Builds a tree from nested push/pop calls
///
/// ```
/// use simpletree::{TerminalInfo, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder.push_nonterminal("NP").unwrap();
/// builder
///     .push_terminal(TerminalInfo::new("no_et_nf_kvk", 0, "sól").word_class("kvk"))
///     .unwrap();
/// builder.pop_nonterminal().unwrap();
/// let tree = builder.finish().unwrap();
/// assert_eq!(tree.root().tag(), Some("NP"));
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    strings: Rodeo,
    nodes: Vec<Node>,
    stack: Vec<NodeId>,
    root: Option<NodeId>,
    sentence_text: Option<String>,
    metadata: FxHashMap<String, String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sentence_text(&mut self, text: impl Into<String>) {
        self.sentence_text = Some(text.into());
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    fn attach(&mut self, kind: NodeKind) -> Result<NodeId, TreeError> {
        let id = self.nodes.len();
        let parent = self.stack.last().copied();
        match parent {
            Some(parent_id) => {
                if let NodeKind::Nonterminal { children, .. } = &mut self.nodes[parent_id].kind {
                    children.push(id);
                }
            }
            None if self.root.is_some() => return Err(TreeError::MultipleRoots),
            None => self.root = Some(id),
        }
        self.nodes.push(Node { parent, kind });
        Ok(id)
    }

    /// Open a nonterminal; following pushes become its children
    pub fn push_nonterminal(&mut self, tag: &str) -> Result<NodeId, TreeError> {
        let tag = self.strings.get_or_intern(tag);
        let id = self.attach(NodeKind::Nonterminal {
            tag,
            children: Vec::new(),
        })?;
        self.stack.push(id);
        Ok(id)
    }

    /// Add a terminal to the open nonterminal
    pub fn push_terminal(&mut self, info: TerminalInfo) -> Result<NodeId, TreeError> {
        let strings = &mut self.strings;
        let text = strings.get_or_intern(&info.text);
        let terminal = Terminal {
            terminal: strings.get_or_intern(&info.terminal),
            augmented: info.augmented.as_deref().map(|a| strings.get_or_intern(a)),
            token_index: info.token_index,
            text,
            lemma: match &info.lemma {
                Some(lemma) => strings.get_or_intern(lemma),
                None => text,
            },
            kind: info.kind,
            word_class: info.word_class.as_deref().map(|c| strings.get_or_intern(c)),
            domain: info.domain.as_deref().map(|d| strings.get_or_intern(d)),
        };
        self.attach(NodeKind::Terminal(terminal))
    }

    /// Close the most recently opened nonterminal
    pub fn pop_nonterminal(&mut self) -> Result<NodeId, TreeError> {
        self.stack.pop().ok_or(TreeError::Unbalanced)
    }

    /// Finish and validate the tree
    pub fn finish(self) -> Result<Tree, TreeError> {
        if !self.stack.is_empty() {
            return Err(TreeError::Unclosed(self.stack.len()));
        }
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        let tree = Tree {
            nodes: self.nodes,
            root,
            strings: self.strings.into_resolver(),
            sentence_text: self.sentence_text,
            metadata: self.metadata,
        };
        tree.validate()?;
        Ok(tree)
    }
}

/// Constraints on a simplified tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRule {
    /// Do not open this tag directly inside any of these tags
    pub subject_to: Vec<String>,
    /// A single child with this tag is absorbed into a node with this tag,
    /// and a single child with this tag replaces a parent of the overridden tag
    pub overrides: Option<String>,
}

/// Mapping from grammar nonterminals to simplified tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifierConfig {
    pub nonterminals: FxHashMap<String, Vec<String>>,
    pub rules: FxHashMap<String, TagRule>,
    /// Terminal categories that get wrapped in a nonterminal of their own
    pub terminals: FxHashMap<String, String>,
}

impl SimplifierConfig {
    /// A configuration without any mappings
    pub fn empty() -> Self {
        Self {
            nonterminals: FxHashMap::default(),
            rules: FxHashMap::default(),
            terminals: FxHashMap::default(),
        }
    }

    pub fn map_nonterminal(mut self, name: &str, tags: &[&str]) -> Self {
        self.nonterminals
            .insert(name.to_string(), tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn rule(mut self, tag: &str, subject_to: &[&str], overrides: Option<&str>) -> Self {
        self.rules.insert(
            tag.to_string(),
            TagRule {
                subject_to: subject_to.iter().map(|t| t.to_string()).collect(),
                overrides: overrides.map(str::to_string),
            },
        );
        self
    }

    pub fn map_terminal(mut self, category: &str, tag: &str) -> Self {
        self.terminals.insert(category.to_string(), tag.to_string());
        self
    }

    fn overrides(&self, tag: &str) -> Option<&str> {
        self.rules.get(tag).and_then(|r| r.overrides.as_deref())
    }

    fn is_subject_to(&self, tag: &str, scope: &str) -> bool {
        self.rules
            .get(tag)
            .is_some_and(|r| r.subject_to.iter().any(|s| s == scope))
    }
}

const DEFAULT_NONTERMINALS: &[(&str, &[&str])] = &[
    ("S0", &["P"]),
    ("HreinYfirsetning", &["S-MAIN"]),
    ("Setning", &["S"]),
    ("SetningLo", &["S"]),
    ("SetningÁnF", &["S"]),
    ("SetningAukafall", &["S", "IP"]),
    ("SetningAukafallForgangur", &["S", "IP"]),
    ("SetningSkilyrði", &["S"]),
    ("SetningUmAðRæða", &["S"]),
    ("StViðtenging", &["S"]),
    ("Tilvísunarsetning", &["S-REF"]),
    ("Skilyrði", &["S-COND"]),
    ("Afleiðing", &["S-CONS"]),
    ("NlSkýring", &["S-EXPLAIN"]),
    ("Útskýring", &["S-EXPLAIN"]),
    ("FrumlagsInnskot", &["S-EXPLAIN"]),
    ("Tilvitnun", &["S-QUOTE"]),
    ("Forskeyti", &["S-PREFIX"]),
    ("Tíðarsetning", &["S-ADV-TEMP"]),
    ("Tilgangssetning", &["S-ADV-PURP"]),
    ("Viðurkenningarsetning", &["S-ADV-ACK"]),
    ("Afleiðingarsetning", &["S-ADV-CONS"]),
    ("Orsakarsetning", &["S-ADV-CAUSE"]),
    ("Skilyrðissetning", &["S-ADV-COND"]),
    ("Skýringarsetning", &["S-THT"]),
    ("Spurnaraukasetning", &["S-QUE"]),
    ("Spurnarsetning", &["S-QUE"]),
    ("Fyrirsögn", &["S-HEADING"]),
    ("BeygingarliðurÁnF", &["IP"]),
    ("BeygingarliðurÁnUmröðunar", &["IP"]),
    ("BeygingarliðurMeðUmröðun", &["IP"]),
    ("Nl", &["NP"]),
    ("EfLiður", &["NP-POSS"]),
    ("EfLiðurForskeyti", &["NP-POSS"]),
    ("OkkarFramhald", &["NP-POSS"]),
    ("LoEftirNlMeðÞgf", &["NP-DAT"]),
    ("Heimilisfang", &["NP-ADDR"]),
    ("Magn", &["NP-MEASURE"]),
    ("Titill", &["NP-TITLE"]),
    ("Frumlag", &["NP-SUBJ"]),
    ("NlFrumlag", &["NP-SUBJ"]),
    ("NlFrumlagÞað", &["NP-SUBJ"]),
    ("NlBeintAndlag", &["NP-OBJ"]),
    ("NlÓbeintAndlag", &["NP-IOBJ"]),
    ("NlSagnfylling", &["NP-PRD"]),
    ("SögnErLoBotn", &["NP-PRD"]),
    ("Aldur", &["NP-AGE"]),
    ("Sagnliður", &["VP"]),
    ("SagnliðurMeðF", &["VP"]),
    ("So", &["VP"]),
    ("NhLiðir", &["VP-SEQ"]),
    ("NhSögn", &["VP"]),
    ("SagnliðurÁnF", &["VP"]),
    ("ÖfugurSagnliður", &["VP-REV"]),
    ("SagnliðurVh", &["VP"]),
    ("SögnLhNt", &["VP-PP"]),
    ("SögnSagnbBreyting", &["VP"]),
    ("SögnLhNtBreyting", &["VP"]),
    ("SögnNhBreyting", &["VP"]),
    ("SagnHluti", &["VP-SEQ"]),
    ("SagnRuna", &["VP-SEQ"]),
    ("SagnRunaStýfð", &["VP-SEQ"]),
    ("SetningSo", &["VP-SEQ"]),
    ("FsLiður", &["PP"]),
    ("FsMeðFallstjórn", &["PP"]),
    ("LoTengtSögn", &["ADJP"]),
    ("SagnInnskot", &["ADVP"]),
    ("FsAtv", &["ADVP"]),
    ("AtvFs", &["ADVP"]),
    ("Atviksliður", &["ADVP"]),
    ("LoAtviksliðir", &["ADVP"]),
    ("Dagsetning", &["ADVP-DATE"]),
    ("Tímasetning", &["ADVP-DATE"]),
    ("FöstDagsetning", &["ADVP-DATE-ABS"]),
    ("AfstæðDagsetning", &["ADVP-DATE-REL"]),
    ("FasturTímapunktur", &["ADVP-TIMESTAMP-ABS"]),
    ("AfstæðurTímapunktur", &["ADVP-TIMESTAMP-REL"]),
    ("Tíðni", &["ADVP-TMP-SET"]),
    ("Tímabil", &["ADVP-DUR"]),
    ("FastTímabil", &["ADVP-DUR-ABS"]),
    ("AfstættTímabil", &["ADVP-DUR-REL"]),
    ("TímabilTími", &["ADVP-DUR-TIME"]),
];

// (tag, subject_to, overrides)
const DEFAULT_RULES: &[(&str, &[&str], Option<&str>)] = &[
    ("S-MAIN", &["S-MAIN"], Some("S")),
    ("S", &["S", "S-EXPLAIN", "S-REF", "IP"], None),
    ("S-HEADING", &[], Some("S")),
    ("S-COND", &[], Some("S")),
    ("S-CONS", &[], Some("S")),
    ("S-REF", &["S-REF"], Some("S")),
    ("VP", &["VP"], Some("VP-SEQ")),
    ("VP-PP", &[], Some("PP")),
    ("NP", &["NP-SUBJ", "NP-OBJ", "NP-IOBJ", "NP-PRD"], None),
    ("NP-POSS", &[], Some("NP")),
    ("NP-DAT", &[], Some("NP")),
    ("NP-ADDR", &[], Some("NP")),
    ("NP-TITLE", &[], Some("NP")),
    ("NP-MEASURE", &[], Some("NP")),
    ("NP-SUBJ", &["NP-SUBJ"], None),
    ("ADVP", &["ADVP"], None),
    ("ADVP-DUR-ABS", &[], Some("ADVP-DUR")),
    ("ADVP-DUR-REL", &[], Some("ADVP-DUR")),
    ("ADVP-DUR-TIME", &[], Some("ADVP-DUR")),
    ("PP", &[], Some("ADVP")),
    ("ADJP", &["ADJP"], None),
];

impl Default for SimplifierConfig {
    /// The sentence, clause and phrase tags of the Icelandic grammar
    fn default() -> Self {
        let config = DEFAULT_NONTERMINALS
            .iter()
            .fold(Self::empty(), |config, (name, tags)| config.map_nonterminal(name, tags));
        DEFAULT_RULES
            .iter()
            .fold(config, |config, (tag, subject_to, overrides)| {
                config.rule(tag, subject_to, *overrides)
            })
    }
}

#[derive(Debug)]
enum Item {
    Nonterminal { tag: String, children: Vec<Item> },
    Terminal(TerminalInfo),
}

#[derive(Debug)]
struct Frame {
    tag: String,
    children: Vec<Item>,
}

/// Builds a simplified tree from a walk over a full grammar parse
///
/// Call [`push_nonterminal`](Self::push_nonterminal) with the grammar
/// nonterminal name (or `None` for interior nodes) when entering a node,
/// [`push_terminal`](Self::push_terminal) at each token and
/// [`pop_nonterminal`](Self::pop_nonterminal) when leaving a node.
#[derive(Debug)]
pub struct Simplifier {
    config: SimplifierConfig,
    frames: Vec<Frame>,
    roots: Vec<Item>,
    pushed: Vec<usize>,
    sentence_text: Option<String>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new(SimplifierConfig::default())
    }
}

impl Simplifier {
    pub fn new(config: SimplifierConfig) -> Self {
        Self {
            config,
            frames: Vec::new(),
            roots: Vec::new(),
            pushed: Vec::new(),
            sentence_text: None,
        }
    }

    pub fn set_sentence_text(&mut self, text: impl Into<String>) {
        self.sentence_text = Some(text.into());
    }

    fn add(&mut self, item: Item) {
        match self.frames.last_mut() {
            Some(frame) => frame.children.push(item),
            None => self.roots.push(item),
        }
    }

    /// Enter a grammar nonterminal
    pub fn push_nonterminal(&mut self, name: Option<&str>) {
        self.pushed.push(0);
        let Some(tags) = name.and_then(|n| self.config.nonterminals.get(n)) else {
            return;
        };
        let mut count = 0;
        for tag in tags {
            if let Some(scope) = self.frames.last()
                && self.config.is_subject_to(tag, &scope.tag)
            {
                continue;
            }
            self.frames.push(Frame {
                tag: tag.clone(),
                children: Vec::new(),
            });
            count += 1;
        }
        if let Some(pushed) = self.pushed.last_mut() {
            *pushed = count;
        }
    }

    pub fn push_terminal(&mut self, info: TerminalInfo) {
        match self.config.terminals.get(info.category()) {
            Some(tag) => {
                let item = Item::Nonterminal {
                    tag: tag.clone(),
                    children: vec![Item::Terminal(info)],
                };
                self.add(item);
            }
            None => self.add(Item::Terminal(info)),
        }
    }

    /// Leave a grammar nonterminal, closing whatever its push opened
    pub fn pop_nonterminal(&mut self) -> Result<(), TreeError> {
        let count = self.pushed.pop().ok_or(TreeError::Unbalanced)?;
        for _ in 0..count {
            let frame = self.frames.pop().ok_or(TreeError::Unbalanced)?;
            let item = self.collapse(frame);
            self.add(item);
        }
        Ok(())
    }

    fn collapse(&self, mut frame: Frame) -> Item {
        if let [Item::Nonterminal { tag: child_tag, .. }] = frame.children.as_slice() {
            let absorb = *child_tag == frame.tag
                || self.config.overrides(&frame.tag) == Some(child_tag.as_str());
            let replace = self.config.overrides(child_tag) == Some(frame.tag.as_str());
            if absorb {
                if let Some(Item::Nonterminal { children, .. }) = frame.children.pop() {
                    frame.children = children;
                }
            } else if replace && let Some(child) = frame.children.pop() {
                return child;
            }
        }
        Item::Nonterminal {
            tag: frame.tag,
            children: frame.children,
        }
    }

    /// Finish the walk and build the tree
    pub fn finish(mut self) -> Result<Tree, TreeError> {
        if !self.pushed.is_empty() {
            return Err(TreeError::Unclosed(self.pushed.len()));
        }
        let root = match self.roots.len() {
            0 => return Err(TreeError::EmptyTree),
            1 => self.roots.remove(0),
            _ => return Err(TreeError::MultipleRoots),
        };
        let mut builder = TreeBuilder::new();
        if let Some(text) = self.sentence_text {
            builder.set_sentence_text(text);
        }
        emit(&mut builder, root)?;
        builder.finish()
    }
}

fn emit(builder: &mut TreeBuilder, item: Item) -> Result<(), TreeError> {
    match item {
        Item::Terminal(info) => {
            builder.push_terminal(info)?;
        }
        Item::Nonterminal { tag, children } => {
            builder.push_nonterminal(&tag)?;
            for child in children {
                emit(builder, child)?;
            }
            builder.pop_nonterminal()?;
        }
    }
    Ok(())
}
