//! Icelandic Frequency Dictionary (IFD) tags for terminals
//!
//! The IFD tagset encodes a word's class and inflection in a short string
//! such as `nkeog` (noun, masculine, singular, accusative, definite). Tags
//! are derived from the terminal category, the augmented variant set, the
//! lexicon word class and domain, and the token kind.

use crate::tags::GENDERS;
use crate::tree::{TerminalRef, TokenKind};

/// Tags of token kinds that bypass the category scheme
fn kind_tag(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Date
        | TokenKind::DateRel
        | TokenKind::DateAbs
        | TokenKind::Time
        | TokenKind::Timestamp
        | TokenKind::TimestampRel
        | TokenKind::TimestampAbs
        | TokenKind::Measurement => Some("to"),
        TokenKind::Percent => Some("tp"),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Noun,
    Pronoun,
    Article,
    Numeral,
    Number,
    Ordinal,
    Year,
    Verb,
    Adjective,
    Adverb,
    Conjunction,
    Entity,
}

fn scheme(key: &str) -> Option<Scheme> {
    Some(match key {
        "no" | "kk" | "kvk" | "hk" | "sérnafn" | "fyrirtæki" | "person" | "gata" => Scheme::Noun,
        "fn" | "abfn" | "pfn" => Scheme::Pronoun,
        "gr" => Scheme::Article,
        "to" | "töl" | "prósenta" => Scheme::Numeral,
        "tala" => Scheme::Number,
        "raðnr" => Scheme::Ordinal,
        "ártal" => Scheme::Year,
        "so" => Scheme::Verb,
        "lo" => Scheme::Adjective,
        "ao" | "eo" | "spao" | "tao" | "fs" | "uh" => Scheme::Adverb,
        "st" | "stt" | "nhm" => Scheme::Conjunction,
        "entity" => Scheme::Entity,
        _ => return None,
    })
}

/// Pronoun subclasses by lemma
const PRONOUN_CLASSES: &[(&str, &str)] = &[
    ("sá", "a"),
    ("þessi", "a"),
    ("hinn", "a"),
    ("slíkur", "b"),
    ("sjálfur", "b"),
    ("samur", "b"),
    ("sami", "b"),
    ("þvílíkur", "b"),
    ("minn", "e"),
    ("þinn", "e"),
    ("sinn", "e"),
    ("vor", "e"),
    ("einhver", "o"),
    ("sérhver", "o"),
    ("nokkur", "o"),
    ("allnokkur", "o"),
    ("hvorugur", "o"),
    ("allur", "o"),
    ("mestallur", "o"),
    ("flestallur", "o"),
    ("sumur", "o"),
    ("enginn", "o"),
    ("margur", "o"),
    ("flestir", "o"),
    ("einn", "o"),
    ("annar", "o"),
    ("neinn", "o"),
    ("sitthvað", "o"),
    ("ýmis", "o"),
    ("fáeinir", "o"),
    ("báðir", "o"),
    ("hver", "s"),
    ("hvor", "s"),
    ("hvaða", "s"),
    ("hvílíkur", "s"),
];

/// Forms shared by the demonstrative `sá` and the personal pronouns
const SHARED_PRONOUN_FORMS: &[&str] = &[
    "það", "því", "þess", "þau", "þeir", "þá", "þær", "þeim", "þeirra",
];

const SHARED_PRONOUN_LEMMAS: &[&str] = &["sá", "það"];

/// Person or gender of personal pronouns by lemma
const PERSONAL_PRONOUNS: &[(&str, &str)] = &[
    ("ég", "1"),
    ("þú", "2"),
    ("hann", "k"),
    ("hún", "v"),
    ("það", "h"),
    ("þér", "2"),
    ("vér", "1"),
];

/// Governed case of prepositions, used when the terminal has no case
const PREPOSITION_CASES: &[(&str, &str)] = &[
    ("af", "þ"),
    ("andspænis", "þ"),
    ("auk", "e"),
    ("austan", "e"),
    ("austur", "o"),
    ("að", "þ"),
    ("eftir", "o"),
    ("fjarri", "þ"),
    ("fram", "o"),
    ("framhjá", "þ"),
    ("frá", "þ"),
    ("fyrir", "o"),
    ("gagnvart", "þ"),
    ("gegn", "þ"),
    ("gegnt", "þ"),
    ("gegnum", "o"),
    ("handa", "þ"),
    ("handan", "e"),
    ("heim", "o"),
    ("hjá", "þ"),
    ("inn", "o"),
    ("innan", "o"),
    ("innanundir", "þ"),
    ("jafnfætis", "þ"),
    ("kringum", "o"),
    ("lengi", "e"),
    ("megin", "e"),
    ("með", "þ"),
    ("meðal", "e"),
    ("meðfram", "þ"),
    ("milli", "e"),
    ("millum", "e"),
    ("mót", "þ"),
    ("móti", "þ"),
    ("neðan", "e"),
    ("niður", "o"),
    ("norðan", "e"),
    ("norður", "o"),
    ("nálægt", "þ"),
    ("nær", "þ"),
    ("ofan", "e"),
    ("sakir", "e"),
    ("samkvæmt", "þ"),
    ("samtímis", "þ"),
    ("snemma", "e"),
    ("sunnan", "e"),
    ("suður", "o"),
    ("síðla", "e"),
    ("sökum", "e"),
    ("til", "e"),
    ("um", "o"),
    ("umfram", "o"),
    ("umhverfis", "o"),
    ("undan", "þ"),
    ("undir", "þ"),
    ("upp", "o"),
    ("utan", "o"),
    ("vegna", "e"),
    ("vestan", "e"),
    ("vestur", "o"),
    ("við", "o"),
    ("yfir", "o"),
    ("á", "o"),
    ("án", "e"),
    ("árla", "e"),
    ("ásamt", "þ"),
    ("í", "þ"),
    ("öndvert", "þ"),
    ("úr", "þ"),
    ("út", "o"),
];

/// Ordinal lemmas, which decline weakly
const ORDINALS: &[&str] = &[
    "fyrstur",
    "annar",
    "þriðji",
    "fjórði",
    "fimmti",
    "sjötti",
    "sjöundi",
    "áttundi",
    "níundi",
    "tíundi",
    "ellefti",
    "tólfti",
    "þrettándi",
    "fjórtándi",
    "fimmtándi",
    "sextándi",
    "sautjándi",
    "átjándi",
    "nítjándi",
    "tuttugasti",
    "þrítugasti",
    "fertugasti",
    "fimmtugasti",
    "sextugasti",
    "sjötugasti",
    "átttugasti",
    "nítugasti",
    "hundraðasti",
    "tvöhundraðasti",
    "þrjúhundraðasti",
    "fjögurhundraðasti",
    "fimmhundraðasti",
    "sexhundraðasti",
    "sjöhundraðasti",
    "áttahundraðasti",
    "níuhundraðasti",
    "þúsundasti",
    "tvöþúsundasti",
    "þrjúþúsundasti",
    "fjögurþúsundasti",
    "fimmþúsundasti",
    "sexþúsundasti",
    "sjöþúsundasti",
    "áttaþúsundasti",
    "níuþúsundasti",
    "tíuþúsundasti",
    "milljónasti",
    "milljarðasti",
];

pub(crate) const CONJUNCTIONS: &[&str] = &["og", "eða"];

pub(crate) const MONTH_NAMES: &[&str] = &[
    "janúar",
    "febrúar",
    "mars",
    "apríl",
    "maí",
    "júní",
    "júlí",
    "ágúst",
    "september",
    "október",
    "nóvember",
    "desember",
    "jan.",
    "feb.",
    "mar.",
    "apr.",
    "jún.",
    "júl.",
    "ágú.",
    "ág.",
    "sep.",
    "sept.",
    "okt.",
    "nóv.",
    "des.",
];

pub(crate) const CLOCK: &[&str] = &["klukkan", "kl."];

/// Era abbreviations, lower case
pub(crate) const CE_BCE: &[&str] = &["e.kr.", "e.kr", "f.kr.", "f.kr"];

fn lookup<'a>(table: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Everything the tag of one terminal depends on
struct Tagset<'t> {
    kind: TokenKind,
    category: &'t str,
    word_class: Option<&'t str>,
    domain: Option<&'t str>,
    text: &'t str,
    lemma: &'t str,
    variants: Vec<&'t str>,
}

impl<'t> Tagset<'t> {
    fn new(t: TerminalRef<'t>) -> Self {
        let mut variants: Vec<&'t str> = t.all_variants().collect();
        if let Some(class) = t.word_class()
            && GENDERS.contains(&class)
        {
            variants.push(class);
        }
        Self {
            kind: t.kind(),
            category: t.category(),
            word_class: t.word_class(),
            domain: t.domain(),
            text: t.text(),
            lemma: t.lemma(),
            variants,
        }
    }

    fn has(&self, variant: &str) -> bool {
        self.variants.contains(&variant)
    }

    fn tag(&self) -> String {
        if self.kind == TokenKind::Punctuation {
            return self.text.to_lowercase();
        }
        if let Some(tag) = kind_tag(self.kind) {
            return tag.to_string();
        }
        let Some(scheme) = scheme(self.category).or_else(|| self.word_class.and_then(scheme)) else {
            return "x".to_string();
        };
        match scheme {
            Scheme::Noun => [
                "n",
                self.gender(),
                self.number("e"),
                self.case("n"),
                self.article(),
                self.proper(),
            ]
            .concat(),
            Scheme::Pronoun => [
                "f",
                self.pronoun_class(),
                self.pronoun_person(),
                self.number("e"),
                self.case("n"),
            ]
            .concat(),
            Scheme::Article => ["g", self.gender(), self.number("e"), self.case("n")].concat(),
            Scheme::Numeral => [
                "t",
                self.numeral_class(),
                self.gender(),
                self.number("f"),
                self.case("n"),
            ]
            .concat(),
            Scheme::Number => self.number_value(),
            Scheme::Ordinal => self.ordinal(),
            Scheme::Year => "ta".to_string(),
            Scheme::Verb => self.verb(),
            Scheme::Adjective => [
                "l",
                self.gender(),
                self.number("e"),
                self.case("n"),
                self.declension(),
                self.degree(),
            ]
            .concat(),
            Scheme::Adverb => ["a", self.adverb_class(), self.adverb_degree()].concat(),
            Scheme::Conjunction => ["c", self.conjunction_class()].concat(),
            Scheme::Entity => match self.text.chars().next() {
                Some(c) if c.is_uppercase() => "nxex-s".to_string(),
                _ => "e".to_string(),
            },
        }
    }

    fn gender(&self) -> &'static str {
        if self.has("kk") {
            "k"
        } else if self.has("kvk") {
            "v"
        } else if self.has("hk") {
            "h"
        } else {
            "x"
        }
    }

    fn number(&self, default: &'static str) -> &'static str {
        if self.has("ft") {
            "f"
        } else if self.has("et") {
            "e"
        } else {
            default
        }
    }

    fn case<'a>(&self, default: &'a str) -> &'a str {
        if self.has("nf") {
            "n"
        } else if self.has("þf") {
            "o"
        } else if self.has("þgf") {
            "þ"
        } else if self.has("ef") {
            "e"
        } else {
            default
        }
    }

    fn article(&self) -> &'static str {
        if self.has("gr") { "g" } else { "" }
    }

    /// Proper noun suffix
    fn proper(&self) -> &'static str {
        let definite = self.has("gr");
        if self.lemma.is_empty() {
            ""
        } else if matches!(self.domain, Some("örn" | "göt" | "lönd")) {
            if definite { "ö" } else { "-ö" }
        } else if self.kind == TokenKind::Person {
            "-m"
        } else if self.kind == TokenKind::Currency {
            if definite { "e" } else { "-e" }
        } else if self.lemma.chars().next().is_some_and(char::is_uppercase) {
            if definite { "s" } else { "-s" }
        } else {
            ""
        }
    }

    fn degree(&self) -> &'static str {
        if self.has("esb") || self.has("evb") {
            "e"
        } else if self.has("mst") {
            "m"
        } else {
            "f"
        }
    }

    fn declension(&self) -> &'static str {
        if self.has("fsb") || self.has("esb") {
            "s"
        } else if self.has("fvb") || self.has("evb") || self.has("mst") || ORDINALS.contains(&self.lemma) {
            "v"
        } else {
            "o"
        }
    }

    fn pronoun_class(&self) -> &'static str {
        if matches!(self.word_class, Some("abfn" | "pfn")) {
            return "p";
        }
        let lower = self.text.to_lowercase();
        if SHARED_PRONOUN_FORMS.contains(&lower.as_str()) && SHARED_PRONOUN_LEMMAS.contains(&self.lemma) {
            return "p";
        }
        lookup(PRONOUN_CLASSES, self.lemma).unwrap_or("x")
    }

    fn pronoun_person(&self) -> &'static str {
        if let Some(p) = lookup(PERSONAL_PRONOUNS, self.lemma) {
            return p;
        }
        for (variant, tag) in [("kk", "k"), ("kvk", "v"), ("hk", "h"), ("p1", "1"), ("p2", "2")] {
            if self.has(variant) {
                return tag;
            }
        }
        "x"
    }

    fn numeral_class(&self) -> &'static str {
        if self.kind == TokenKind::Percent { "p" } else { "f" }
    }

    /// Cardinal written with digits: plural unless the value ends in a 1 (but not 11)
    fn number_value(&self) -> String {
        let value = self
            .text
            .replace('.', "")
            .replace(',', ".")
            .parse::<f64>()
            .ok();
        let singular = value.is_some_and(|v| v != 11.0 && v % 10.0 == 1.0);
        if singular { "tfken" } else { "tfkfn" }.to_string()
    }

    fn ordinal(&self) -> String {
        if self.variants.is_empty() {
            "lxexvf".to_string()
        } else {
            ["l", self.gender(), "e", self.case("n"), "vf"].concat()
        }
    }

    fn voice(&self) -> &'static str {
        if self.has("mm") { "m" } else { "g" }
    }

    fn verb(&self) -> String {
        if self.has("lh") && self.has("nt") {
            return "slg".to_string();
        }
        if self.has("lhþt") {
            return ["sþ", self.voice(), self.gender(), self.number("e"), self.case("n")].concat();
        }
        if self.has("nh") {
            let past = if self.has("þt") { "--þ" } else { "" };
            return ["sn", self.voice(), past].concat();
        }
        if self.has("bh") {
            return ["sb", self.voice(), "2", self.number("e"), "n"].concat();
        }
        if self.has("sagnb") {
            return ["ss", self.voice()].concat();
        }
        let mood = if self.has("vh") { "v" } else { "f" };
        let person = if self.has("op") {
            "3"
        } else if self.has("p1") {
            "1"
        } else if self.has("p2") {
            "2"
        } else {
            "3"
        };
        let tense = if self.has("þt") { "þ" } else { "n" };
        ["s", mood, self.voice(), person, self.number("e"), tense].concat()
    }

    fn adverb_class(&self) -> &'t str {
        match self.word_class.unwrap_or(self.category) {
            "uh" => "u",
            "fs" => self.case(lookup(PREPOSITION_CASES, self.lemma).unwrap_or("o")),
            _ => "a",
        }
    }

    fn adverb_degree(&self) -> &'static str {
        if self.has("mst") {
            "m"
        } else if self.has("est") {
            "e"
        } else {
            ""
        }
    }

    fn conjunction_class(&self) -> &'static str {
        if self.category == "stt" {
            "t"
        } else if self.word_class == Some("nhm") {
            "n"
        } else {
            ""
        }
    }
}

/// The IFD tag of a single terminal
pub fn ifd_tag(terminal: TerminalRef<'_>) -> String {
    Tagset::new(terminal).tag()
}

/// IFD tags for each whitespace separated word of a terminal's text
///
/// Multi-word tokens such as amounts and dates get one tag per word:
/// conjunctions become `c`, numbers `ta` (or a numeral agreeing with a noun
/// tag), and the words of dates and amounts are tagged by their shape.
pub fn ifd_tags(terminal: TerminalRef<'_>) -> Vec<String> {
    let tag = ifd_tag(terminal);
    let text = terminal.text();
    if text.split_whitespace().nth(1).is_none() {
        return vec![tag];
    }
    let lower = text.to_lowercase();
    lower
        .split_whitespace()
        .map(|part| {
            if CONJUNCTIONS.contains(&part) {
                "c".to_string()
            } else if part.starts_with(|c: char| c.is_ascii_digit()) {
                if tag.starts_with('n') {
                    let mut numeral = String::from("tf");
                    numeral.extend(tag.chars().skip(1).take(3));
                    numeral
                } else {
                    "ta".to_string()
                }
            } else if tag == "to" || tag == "ta" {
                let word_tag = if part == "árið" {
                    "nheo"
                } else if CE_BCE.contains(&part) {
                    "aa"
                } else if CLOCK.contains(&part) {
                    "nven"
                } else if MONTH_NAMES.contains(&part) {
                    "nkeo"
                } else {
                    "x"
                };
                word_tag.to_string()
            } else {
                tag.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TerminalInfo, TreeBuilder};
    use crate::samples;
    use crate::tree::Tree;

    fn single(info: TerminalInfo) -> Tree {
        let mut b = TreeBuilder::new();
        b.push_nonterminal("X").unwrap();
        b.push_terminal(info).unwrap();
        b.pop_nonterminal().unwrap();
        b.finish().unwrap()
    }

    fn tag_of(info: TerminalInfo) -> String {
        let tree = single(info);
        let leaf = tree.root().leaves().next().unwrap();
        ifd_tag(leaf.terminal().unwrap())
    }

    #[test]
    fn test_sentence_tags() {
        let tree = samples::asa_sa_sol();
        let tags: Vec<String> = tree
            .terminals()
            .map(|n| ifd_tag(n.terminal().unwrap()))
            .collect();
        assert_eq!(tags, vec!["nven-s", "sfg3eþ", "nveo", "."]);
    }

    #[test]
    fn test_noun_and_adjective_tags() {
        let tree = samples::plural_np();
        let tags: Vec<String> = tree
            .terminals()
            .map(|n| ifd_tag(n.terminal().unwrap()))
            .collect();
        assert_eq!(tags, vec!["fakfn", "lkfnvf", "nkfng", "nkeeg"]);
    }

    #[test]
    fn test_pronoun_tags() {
        let tree = samples::two_objects();
        let tags: Vec<String> = tree
            .terminals()
            .map(|n| ifd_tag(n.terminal().unwrap()))
            .collect();
        assert_eq!(tags, vec!["fpven", "sfg3en", "fpkeþ", "nveo", "."]);
    }

    #[test]
    fn test_kind_tags() {
        let percent = TerminalInfo::new("prósenta_nf", 0, "30%").kind(TokenKind::Percent);
        assert_eq!(tag_of(percent), "tp");
        let date = TerminalInfo::new("dagsföst", 0, "17. júní").kind(TokenKind::DateAbs);
        assert_eq!(tag_of(date), "to");
        assert_eq!(tag_of(TerminalInfo::new("tala", 0, "21")), "tfken");
        assert_eq!(tag_of(TerminalInfo::new("tala", 0, "11")), "tfkfn");
        assert_eq!(tag_of(TerminalInfo::new("tala", 0, "1.234,5")), "tfkfn");
        assert_eq!(tag_of(TerminalInfo::new("ártal", 0, "1981")), "ta");
        assert_eq!(tag_of(TerminalInfo::new("raðnr", 0, "3.")), "lxexvf");
        assert_eq!(tag_of(TerminalInfo::new("xyz_et", 0, "foo")), "x");
    }

    #[test]
    fn test_verb_forms() {
        let inf = TerminalInfo::new("so_0_nh", 0, "sjá").lemma("sjá").word_class("so");
        assert_eq!(tag_of(inf), "sng");
        let mid = TerminalInfo::new("so_0_et_mm_p1_vh_þt", 0, "sæist").lemma("sjá");
        assert_eq!(tag_of(mid), "svm1eþ");
        let part = TerminalInfo::new("so_lhþt_sb_kvk_et_nf", 0, "séð").lemma("sjá");
        assert_eq!(tag_of(part), "sþgven");
        let imperative = TerminalInfo::new("so_0_bh_et_p2", 0, "sjáðu").lemma("sjá");
        assert_eq!(tag_of(imperative), "sbg2en");
        let indicative = TerminalInfo::new("so_1_þf_et_fh_gm_p3_þt", 0, "sá").lemma("sjá");
        assert_eq!(tag_of(indicative), "sfg3eþ");
    }

    #[test]
    fn test_prepositions_and_conjunctions() {
        let fs = TerminalInfo::new("fs_þgf", 0, "frá").lemma("frá").word_class("fs");
        assert_eq!(tag_of(fs), "aþ");
        let bare = TerminalInfo::new("fs", 0, "til").lemma("til").word_class("fs");
        assert_eq!(tag_of(bare), "ae");
        assert_eq!(tag_of(TerminalInfo::new("st", 0, "og").word_class("st")), "c");
        assert_eq!(tag_of(TerminalInfo::new("stt", 0, "sem").word_class("st")), "ct");
        assert_eq!(tag_of(TerminalInfo::new("nhm", 0, "að").word_class("nhm")), "cn");
    }

    #[test]
    fn test_multiword_person() {
        let tree = samples::multiword();
        let person = tree.root().leaves().next().unwrap().terminal().unwrap();
        assert_eq!(ifd_tags(person), vec!["nken-m", "nken-m", "nken-m"]);
    }

    #[test]
    fn test_multiword_amount_and_date() {
        let tree = samples::multiword();
        let amount = tree.root().leaves().last().unwrap().terminal().unwrap();
        assert_eq!(ifd_tags(amount), vec!["tfvfo", "nvfo", "nvfo"]);

        let date = TerminalInfo::new("dagsföst", 0, "árið 1981 e.Kr. og klukkan 12 í júní")
            .kind(TokenKind::DateAbs);
        let tree = single(date);
        let t = tree.root().leaves().next().unwrap().terminal().unwrap();
        assert_eq!(
            ifd_tags(t),
            vec!["nheo", "ta", "aa", "c", "nven", "ta", "x", "nkeo"]
        );
    }

    #[test]
    fn test_tags_follow_unicode_whitespace() {
        let amount = TerminalInfo::new("no_ft_þf_kvk", 0, "10\u{a0}kr.").kind(TokenKind::Amount);
        let tree = single(amount);
        let root = tree.root();
        assert_eq!(root.ifd_tags(), vec!["tfvfo", "nvfo"]);
        assert_eq!(root.ifd_tags().len(), root.text().split_whitespace().count());
    }
}
