//! Morphological features and the inflection lookup seam
//!
//! The case transformer never inflects words itself. It asks a
//! [`Morphology`] implementation for the form of a lemma with a given
//! feature set, and keeps the original text when no form exists.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    Nominative,
    Accusative,
    Dative,
    Genitive,
}

impl Case {
    pub fn variant(self) -> &'static str {
        match self {
            Self::Nominative => "nf",
            Self::Accusative => "þf",
            Self::Dative => "þgf",
            Self::Genitive => "ef",
        }
    }

    pub fn from_variant(variant: &str) -> Option<Self> {
        match variant {
            "nf" => Some(Self::Nominative),
            "þf" => Some(Self::Accusative),
            "þgf" => Some(Self::Dative),
            "ef" => Some(Self::Genitive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    Singular,
    Plural,
}

impl Number {
    pub fn variant(self) -> &'static str {
        match self {
            Self::Singular => "et",
            Self::Plural => "ft",
        }
    }

    pub fn from_variant(variant: &str) -> Option<Self> {
        match variant {
            "et" => Some(Self::Singular),
            "ft" => Some(Self::Plural),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

impl Gender {
    pub fn variant(self) -> &'static str {
        match self {
            Self::Masculine => "kk",
            Self::Feminine => "kvk",
            Self::Neuter => "hk",
        }
    }

    pub fn from_variant(variant: &str) -> Option<Self> {
        match variant {
            "kk" => Some(Self::Masculine),
            "kvk" => Some(Self::Feminine),
            "hk" => Some(Self::Neuter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Definiteness {
    Definite,
    Indefinite,
}

/// Adjective declension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Declension {
    Strong,
    Weak,
}

/// Adjective degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Degree {
    Positive,
    Comparative,
    Superlative,
}

/// A partial set of grammatical features
///
/// `None` means unspecified: in a request it accepts any value, and in a
/// lexicon entry it is accepted by any request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Features {
    pub case: Option<Case>,
    pub number: Option<Number>,
    pub gender: Option<Gender>,
    pub definiteness: Option<Definiteness>,
    pub declension: Option<Declension>,
    pub degree: Option<Degree>,
}

impl Features {
    /// Read features from terminal variants such as `et_gr_kk_nf` or `fvb`
    pub fn from_variants<'a>(variants: impl IntoIterator<Item = &'a str>) -> Self {
        let mut f = Self::default();
        for v in variants {
            match v {
                "gr" => f.definiteness = Some(Definiteness::Definite),
                "sb" => f.declension = Some(Declension::Strong),
                "vb" => f.declension = Some(Declension::Weak),
                "fsb" => {
                    f.degree = Some(Degree::Positive);
                    f.declension = Some(Declension::Strong);
                }
                "fvb" => {
                    f.degree = Some(Degree::Positive);
                    f.declension = Some(Declension::Weak);
                }
                "mst" => f.degree = Some(Degree::Comparative),
                "est" => f.degree = Some(Degree::Superlative),
                "esb" => {
                    f.degree = Some(Degree::Superlative);
                    f.declension = Some(Declension::Strong);
                }
                "evb" => {
                    f.degree = Some(Degree::Superlative);
                    f.declension = Some(Declension::Weak);
                }
                _ => {
                    if let Some(case) = Case::from_variant(v) {
                        f.case = Some(case);
                    } else if let Some(number) = Number::from_variant(v) {
                        f.number = Some(number);
                    } else if let Some(gender) = Gender::from_variant(v) {
                        f.gender = Some(gender);
                    }
                }
            }
        }
        f
    }

    /// Like [`from_variants`](Self::from_variants), but nouns without `gr` are indefinite
    pub fn for_word_class<'a>(word_class: &str, variants: impl IntoIterator<Item = &'a str>) -> Self {
        let mut f = Self::from_variants(variants);
        if Gender::from_variant(word_class).is_some() && f.definiteness.is_none() {
            f.definiteness = Some(Definiteness::Indefinite);
        }
        f
    }

    /// True if every feature the request specifies is compatible with this set
    pub fn satisfies(&self, request: &Features) -> bool {
        fn ok<T: PartialEq>(have: Option<T>, want: Option<T>) -> bool {
            match (have, want) {
                (Some(h), Some(w)) => h == w,
                _ => true,
            }
        }
        ok(self.case, request.case)
            && ok(self.number, request.number)
            && ok(self.gender, request.gender)
            && ok(self.definiteness, request.definiteness)
            && ok(self.declension, request.declension)
            && ok(self.degree, request.degree)
    }
}

/// Source of inflected word forms
pub trait Morphology {
    /// The form of `lemma` in `word_class` having `features`, if the lexicon has one
    fn lookup(&self, lemma: &str, word_class: &str, features: &Features) -> Option<String>;
}

impl<M: Morphology + ?Sized> Morphology for &M {
    fn lookup(&self, lemma: &str, word_class: &str, features: &Features) -> Option<String> {
        (**self).lookup(lemma, word_class, features)
    }
}

/// A lexicon without any forms; every word keeps its text
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMorphology;

impl Morphology for NoMorphology {
    fn lookup(&self, _lemma: &str, _word_class: &str, _features: &Features) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
struct Entry {
    word_class: String,
    features: Features,
    form: String,
}

/// In-memory lexicon, suitable for tests and small word lists
///
/// Lookups return the first inserted form whose features satisfy the request.
#[derive(Debug, Clone, Default)]
pub struct MemoryMorphology {
    entries: FxHashMap<String, Vec<Entry>>,
}

impl MemoryMorphology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a form, with its features given as underscore separated variants
    ///
    /// ```
    /// use simpletree::{Case, Features, MemoryMorphology, Morphology};
    ///
    /// let mut lexicon = MemoryMorphology::new();
    /// lexicon.insert("hestur", "kk", "ef_et", "hests");
    /// let request = Features { case: Some(Case::Genitive), ..Features::default() };
    /// assert_eq!(lexicon.lookup("hestur", "kk", &request).as_deref(), Some("hests"));
    /// ```
    pub fn insert(&mut self, lemma: &str, word_class: &str, variants: &str, form: &str) {
        let features = Features::for_word_class(word_class, variants.split('_'));
        self.entries.entry(lemma.to_string()).or_default().push(Entry {
            word_class: word_class.to_string(),
            features,
            form: form.to_string(),
        });
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, lemma: &str, word_class: &str, variants: &str, form: &str) -> Self {
        self.insert(lemma, word_class, variants, form);
        self
    }

    /// Number of forms
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Morphology for MemoryMorphology {
    fn lookup(&self, lemma: &str, word_class: &str, features: &Features) -> Option<String> {
        self.entries
            .get(lemma)?
            .iter()
            .find(|e| e.word_class == word_class && e.features.satisfies(features))
            .map(|e| e.form.clone())
    }
}
