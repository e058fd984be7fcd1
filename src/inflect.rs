//! Case, number and definiteness transformation of noun phrases
//!
//! An [`Inflector`] rewrites a subtree into another grammatical form. The
//! head noun of a noun phrase takes the requested case, number and
//! definiteness; adjectives, articles, determiners, pronouns and number
//! words follow the head so the phrase stays in agreement. Word forms come
//! from a [`Morphology`]; a word without a form keeps its text.
//!
//! ```
//! use simpletree::{Inflector, MemoryMorphology, TerminalInfo, TreeBuilder};
//!
//! let mut b = TreeBuilder::new();
//! b.push_nonterminal("NP").unwrap();
//! b.push_terminal(TerminalInfo::new("no_et_þf_kvk", 0, "sól").lemma("sól").word_class("kvk")).unwrap();
//! b.pop_nonterminal().unwrap();
//! let tree = b.finish().unwrap();
//!
//! let lexicon = MemoryMorphology::new().with("sól", "kvk", "nf_et", "sól").with("sól", "kvk", "ef_et", "sólar");
//! let inflector = Inflector::new(lexicon);
//! assert_eq!(inflector.nominative_np(tree.root()), "sól");
//! ```

use tracing::trace;

use crate::morphology::{Case, Declension, Definiteness, Features, Gender, Morphology, Number};
use crate::spacing::{DefaultSpacing, Spacing};
use crate::tags::GENDERS;
use crate::tree::{NodeRef, TerminalRef};

/// Word classes whose forms vary with case
const DECLINABLE: &[&str] = &["kk", "kvk", "hk", "lo", "to", "fn", "pfn", "gr"];

/// Word classes that agree with the head noun of their phrase
const AGREEING: &[&str] = &["lo", "to", "fn", "pfn", "gr"];

/// Forms of the definite and demonstrative pronouns `sá`, `þessi` and `hinn`
const DEFINITE_PRONOUNS: &[&str] = &[
    "þau", "þeirri", "það", "þessi", "hinnar", "þessu", "hinar", "þeirra", "því", "hinn",
    "þennan", "hins", "þetta", "þessara", "hin", "hinu", "sá", "þessari", "hinni", "þeim",
    "þessa", "þess", "þessir", "sú", "þessar", "þær", "þessarar", "hinna", "hinum", "þeir",
    "hinir", "þessum", "þeirrar", "hina", "hitt", "þá", "þann",
];

/// Subphrases that keep their text, or are removed from reduced phrases
const KEPT_PHRASES: &[&str] = &["NP-POSS", "S", "CP", "PP", "ADVP"];

const TRAILING_PUNCTUATION: &[char] = &[',', ':', ';', '!', '-', '.'];

/// The form a phrase should be transformed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub case: Case,
    /// Number of the head noun; `None` keeps the phrase's own number
    pub number: Option<Number>,
    /// `None` keeps the phrase's own definiteness
    pub definiteness: Option<Definiteness>,
    /// Drop possessives, clauses, prepositional phrases and plural numbers
    pub reduce: bool,
}

impl Target {
    pub fn new(case: Case) -> Self {
        Self {
            case,
            number: None,
            definiteness: None,
            reduce: false,
        }
    }

    pub fn number(mut self, number: Number) -> Self {
        self.number = Some(number);
        self
    }

    pub fn definiteness(mut self, definiteness: Definiteness) -> Self {
        self.definiteness = Some(definiteness);
        self
    }

    pub fn reduced(mut self, reduce: bool) -> Self {
        self.reduce = reduce;
        self
    }

    pub fn nominative() -> Self {
        Self::new(Case::Nominative)
    }

    pub fn indefinite() -> Self {
        Self::nominative().definiteness(Definiteness::Indefinite)
    }

    /// Singular, indefinite, nominative and reduced
    pub fn canonical() -> Self {
        Self::indefinite().number(Number::Singular).reduced(true)
    }

    fn cuts_definite(&self) -> bool {
        self.reduce || self.definiteness == Some(Definiteness::Indefinite)
    }
}

/// Gender and number the dependents of a head noun agree with
#[derive(Debug, Clone, Copy, Default)]
struct Agreement {
    gender: Option<Gender>,
    number: Option<Number>,
}

fn own_features(t: &TerminalRef<'_>) -> Features {
    Features::from_variants(t.all_variants())
}

fn is_noun(t: &TerminalRef<'_>) -> bool {
    t.category() == "no" || t.word_class().is_some_and(|c| GENDERS.contains(&c))
}

/// Remove leading definite pronouns, unless nothing else is left
fn cut_definite_pronouns(text: &str) -> String {
    let lower = text.to_lowercase();
    if lower.starts_with("það að") {
        return text.to_string();
    }
    for prefix in ["sá að ", "sú að "] {
        if lower.starts_with(prefix) {
            let rest: String = text.chars().skip(prefix.chars().count()).collect();
            return format!("það að {rest}");
        }
    }
    let mut rest = text.trim_start();
    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        if word.is_empty() || !DEFINITE_PRONOUNS.contains(&word.to_lowercase().as_str()) {
            break;
        }
        rest = rest[word_end..].trim_start();
    }
    if rest.is_empty() {
        text.to_string()
    } else {
        rest.to_string()
    }
}

fn cut_trailing_punctuation(text: &str) -> &str {
    let mut text = text.trim();
    while text.chars().count() >= 2 && text.ends_with(TRAILING_PUNCTUATION) {
        text = text[..text.len() - 1].trim_end();
    }
    text
}

/// Give `form` the capitalisation of the word it replaces
fn match_case(form: &str, original: &str, after_prefix: bool) -> String {
    if after_prefix {
        return form.to_lowercase();
    }
    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            if original.chars().any(char::is_alphabetic) && !original.chars().any(char::is_lowercase) {
                form.to_uppercase()
            } else {
                let mut out = String::with_capacity(form.len());
                let mut form_chars = form.chars();
                if let Some(c) = form_chars.next() {
                    out.extend(c.to_uppercase());
                }
                out.push_str(&form_chars.as_str().to_lowercase());
                out
            }
        }
        _ => form.to_lowercase(),
    }
}

/// Transforms subtrees into requested grammatical forms
#[derive(Debug, Clone)]
pub struct Inflector<M, S = DefaultSpacing> {
    morphology: M,
    spacing: S,
}

impl<M: Morphology> Inflector<M> {
    pub fn new(morphology: M) -> Self {
        Self {
            morphology,
            spacing: DefaultSpacing,
        }
    }
}

impl<M: Morphology, S: Spacing> Inflector<M, S> {
    pub fn with_spacing(morphology: M, spacing: S) -> Self {
        Self { morphology, spacing }
    }

    /// Rewrite `node` into the `target` form
    ///
    /// Noun phrases and terminals are inflected; any other nonterminal is
    /// returned as its spaced text.
    pub fn inflect(&self, node: NodeRef<'_>, target: &Target) -> String {
        let text = if let Some(t) = node.terminal() {
            let agreement = Agreement::default();
            self.terminal_in_phrase(&t, target, &agreement).unwrap_or_default()
        } else if node.matches_tag("NP") {
            self.noun_phrase(node, target)
        } else {
            return self.spaced_text(node);
        };
        if target.cuts_definite() {
            cut_definite_pronouns(&text)
        } else {
            text
        }
    }

    pub fn nominative_np(&self, node: NodeRef<'_>) -> String {
        self.inflect(node, &Target::nominative())
    }

    pub fn indefinite_np(&self, node: NodeRef<'_>) -> String {
        self.inflect(node, &Target::indefinite())
    }

    pub fn canonical_np(&self, node: NodeRef<'_>) -> String {
        self.inflect(node, &Target::canonical())
    }

    /// Nominative form of a single word, keeping its number and definiteness
    pub fn nominative(&self, terminal: TerminalRef<'_>) -> String {
        self.word(&terminal, &Target::nominative(), &Agreement::default())
    }

    /// Indefinite nominative form of a single word
    pub fn indefinite(&self, terminal: TerminalRef<'_>) -> String {
        self.word(&terminal, &Target::indefinite(), &Agreement::default())
    }

    /// Singular indefinite nominative form of a single word
    pub fn canonical(&self, terminal: TerminalRef<'_>) -> String {
        self.word(&terminal, &Target::canonical(), &Agreement::default())
    }

    fn spaced_text(&self, node: NodeRef<'_>) -> String {
        let texts: Vec<&str> = node
            .leaves()
            .filter_map(|leaf| leaf.terminal())
            .map(|t| t.text())
            .collect();
        self.spacing.join(&texts)
    }

    fn noun_phrase(&self, node: NodeRef<'_>, target: &Target) -> String {
        let mut children: Vec<NodeRef<'_>> = node.children().collect();

        // Leading adverbs belong to the phrase only if it has an adjective
        let has_adjective = children
            .iter()
            .any(|c| c.terminal().is_some_and(|t| t.category() == "lo"));
        if !has_adjective {
            let leading = children
                .iter()
                .take_while(|c| c.terminal().is_some_and(|t| t.category() == "eo"))
                .count();
            if leading < children.len() {
                children.drain(..leading);
            }
        }

        if let [only] = children.as_slice()
            && only.tag() == Some("S-THT")
        {
            if target.reduce {
                return String::new();
            }
            return format!("það {}", self.spaced_text(*only));
        }

        let agreement = self.head_agreement(&children, target);
        let mut tokens: Vec<String> = Vec::with_capacity(children.len());
        for child in &children {
            self.phrase_child(*child, target, &agreement, &mut tokens);
        }
        let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let joined = self.spacing.join(&refs);
        cut_trailing_punctuation(&joined).to_string()
    }

    /// Agreement features from the last noun among `children`
    fn head_agreement(&self, children: &[NodeRef<'_>], target: &Target) -> Agreement {
        let Some(head) = children
            .iter()
            .rev()
            .filter_map(|c| c.terminal())
            .find(is_noun)
        else {
            return Agreement::default();
        };
        Agreement {
            gender: head.word_class().and_then(Gender::from_variant),
            number: target.number.or(own_features(&head).number),
        }
    }

    fn phrase_child(&self, child: NodeRef<'_>, target: &Target, agreement: &Agreement, tokens: &mut Vec<String>) {
        if let Some(t) = child.terminal() {
            if let Some(word) = self.terminal_in_phrase(&t, target, agreement) {
                tokens.push(word);
            }
            return;
        }
        if KEPT_PHRASES.iter().any(|tag| child.matches_tag(tag)) {
            if !target.reduce {
                tokens.extend(child.leaves().filter_map(|l| l.terminal()).map(|t| t.text().to_string()));
            }
        } else if child.matches_tag("NP") {
            let inner = self.noun_phrase(child, target);
            if !inner.is_empty() {
                tokens.push(inner);
            }
        } else if child.matches_tag("ADJP") {
            for grandchild in child.children() {
                self.phrase_child(grandchild, target, agreement, tokens);
            }
        } else {
            tokens.extend(child.leaves().filter_map(|l| l.terminal()).map(|t| t.text().to_string()));
        }
    }

    /// The form of a terminal within a phrase, or `None` if it is dropped
    fn terminal_in_phrase(&self, t: &TerminalRef<'_>, target: &Target, agreement: &Agreement) -> Option<String> {
        if t.is_punctuation() {
            return Some(t.text().to_string());
        }
        let class = t.word_class().unwrap_or_else(|| t.category());
        if class == "gr" && target.cuts_definite() {
            return None;
        }
        if target.reduce && (t.category() == "töl" || (t.category() == "tala" && t.has_variant("ft"))) {
            return None;
        }
        let word = self.word(t, target, agreement);
        (!word.is_empty()).then_some(word)
    }

    /// Inflect one word; an empty string means the word has no reduced form
    fn word(&self, t: &TerminalRef<'_>, target: &Target, agreement: &Agreement) -> String {
        let class = t.word_class().unwrap_or_else(|| t.category());
        if t.category() == "person" {
            return self.person(t, target, class);
        }
        if !DECLINABLE.contains(&class) {
            return t.text().to_string();
        }

        let own = own_features(t);
        let mut request = Features {
            case: Some(target.case),
            ..Features::default()
        };
        if is_noun(t) {
            request.number = target.number.or(own.number);
            request.definiteness = target.definiteness.or(Some(if own.definiteness.is_some() {
                Definiteness::Definite
            } else {
                Definiteness::Indefinite
            }));
        } else if AGREEING.contains(&class) {
            request.number = target.number.or(agreement.number).or(own.number);
            if class != "pfn" {
                request.gender = agreement.gender.or(own.gender);
            }
            if class == "lo" {
                request.declension = match target.definiteness {
                    Some(Definiteness::Indefinite) => Some(Declension::Strong),
                    Some(Definiteness::Definite) => Some(Declension::Weak),
                    None => own.declension,
                };
                request.degree = own.degree;
            }
        }

        let text = t.text();
        let lemma = t.lemma();
        let (surface_prefix, rest, base_lemma) = match lemma.rsplit_once('-') {
            Some((head, base)) if !t.has_variant("abbrev") => {
                let prefix_len: usize = head.chars().filter(|&c| c != '-').count();
                let split = text
                    .char_indices()
                    .nth(prefix_len)
                    .map_or(text.len(), |(i, _)| i);
                let (mut prefix, mut rest) = text.split_at(split);
                if let Some(stripped) = rest.strip_prefix('-') {
                    prefix = &text[..split + 1];
                    rest = stripped;
                }
                (prefix, rest, base)
            }
            _ => ("", text, lemma),
        };

        match self.morphology.lookup(base_lemma, class, &request) {
            Some(form) => {
                let after_prefix = !surface_prefix.is_empty() && !surface_prefix.ends_with('-');
                format!("{surface_prefix}{}", match_case(&form, rest, after_prefix))
            }
            None => {
                trace!(lemma = base_lemma, word_class = class, ?request, "no form in lexicon");
                if class == "to" && own.number == Some(Number::Plural) && target.reduce {
                    String::new()
                } else {
                    text.to_string()
                }
            }
        }
    }

    /// Person names inflect each name with the person's gender
    fn person(&self, t: &TerminalRef<'_>, target: &Target, gender: &str) -> String {
        if target.case == Case::Nominative {
            return t.lemma().to_string();
        }
        let names: Vec<&str> = t.lemma().split_whitespace().collect();
        let words: Vec<&str> = t.text().split_whitespace().collect();
        if names.len() != words.len() {
            return t.text().to_string();
        }
        let request = Features {
            case: Some(target.case),
            number: Some(Number::Singular),
            ..Features::default()
        };
        names
            .iter()
            .zip(&words)
            .map(|(name, word)| {
                self.morphology
                    .lookup(name, gender, &request)
                    .unwrap_or_else(|| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
