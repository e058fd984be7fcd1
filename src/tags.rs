//! Tag and terminal identifier matching
//!
//! Nonterminal tags are hierarchical: `NP-OBJ` is an `NP` with the `OBJ`
//! subcategory. A requested identifier matches a tag when its segments are
//! a prefix of the tag's segments. Underscores and hyphens are both segment
//! separators, so `NP_SUBJ` and `NP-SUBJ` name the same tag.
//!
//! Every lookup and search in the crate goes through [`tag_matches`].

use memchr::memchr;

/// Grammatical case variants
pub const CASES: [&str; 4] = ["nf", "þf", "þgf", "ef"];

/// Gender variants (also the lexicon word classes of nouns)
pub const GENDERS: [&str; 3] = ["kk", "kvk", "hk"];

/// Number variants
pub const NUMBERS: [&str; 2] = ["et", "ft"];

#[inline]
fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split(['-', '_'])
}

/// Return true if `identifier` matches `tag` fully or as a segment prefix
///
/// `NP` matches `NP`, `NP-OBJ` and `NP-OBJ-PRIMARY`; `NP-OBJ` does not match
/// `NP`, and `NP` does not match `NPX`.
pub fn tag_matches(tag: &str, identifier: &str) -> bool {
    let mut tag_segments = segments(tag);
    segments(identifier).all(|wanted| tag_segments.next() == Some(wanted))
}

/// Return the base of a tag, i.e. `NP` for `NP-OBJ`
pub fn tag_base(tag: &str) -> &str {
    match tag.find(['-', '_']) {
        Some(pos) => &tag[..pos],
        None => tag,
    }
}

/// A terminal identifier of the form `category[_variant]*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalId<'a> {
    category: &'a str,
    variants: &'a str,
}

impl<'a> TerminalId<'a> {
    pub fn parse(terminal: &'a str) -> Self {
        match memchr(b'_', terminal.as_bytes()) {
            Some(pos) => Self {
                category: &terminal[..pos],
                variants: &terminal[pos + 1..],
            },
            None => Self {
                category: terminal,
                variants: "",
            },
        }
    }

    /// The word category, i.e. `no` for `no_et_nf_kvk`
    pub fn category(&self) -> &'a str {
        self.category
    }

    /// The variants following the category, in identifier order
    pub fn variants(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        let variants = self.variants;
        variants.split('_').filter(|v| !v.is_empty())
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants().any(|v| v == variant)
    }

    /// Return the first variant that is also a member of `set`
    pub fn variant_in(&self, set: &[&str]) -> Option<&'a str> {
        self.variants().find(|v| set.contains(v))
    }
}

/// Return true if a pattern terminal `wanted` matches the node terminal `terminal`
///
/// The categories must be equal, and every variant in `wanted` must be
/// present among the node terminal's variants.
pub fn terminal_matches(terminal: &str, wanted: &str) -> bool {
    if terminal == wanted {
        return true;
    }
    let have = TerminalId::parse(terminal);
    let want = TerminalId::parse(wanted);
    have.category() == want.category() && want.variants().all(|v| have.has_variant(v))
}

/// Assemble an augmented terminal identifier in canonical form
///
/// Verb argument cases (and a `subj` tail) stay immediately after the
/// category in their original order; every other variant, including the
/// `extra` ones, follows in sorted order without duplicates.
pub fn augment_terminal<'a>(terminal: &'a str, extra: impl IntoIterator<Item = &'a str>) -> String {
    let parts: Vec<&str> = terminal.split('_').collect();
    let category = parts[0];
    let mut fixed: Vec<&str> = Vec::new();
    let mut start = 1;
    if category == "so" && parts.len() > 1 {
        if let Some(args) = parts[1].parse::<usize>().ok().filter(|n| *n <= 2) {
            let end = (2 + args).min(parts.len());
            fixed.extend_from_slice(&parts[1..end]);
            start = end;
        }
        if parts.get(start) == Some(&"subj") {
            fixed.extend_from_slice(&parts[start..]);
            start = parts.len();
        }
    }
    let mut rest: Vec<&str> = parts[start..]
        .iter()
        .copied()
        .chain(extra)
        .filter(|v| !v.is_empty() && !fixed.contains(v))
        .collect();
    if category == "gata" {
        rest.retain(|v| !NUMBERS.contains(v));
    }
    if rest.contains(&"esb") {
        rest.retain(|v| *v != "sb");
    } else if rest.contains(&"evb") {
        rest.retain(|v| *v != "vb");
    }
    rest.sort_unstable();
    rest.dedup();

    let mut out = String::from(category);
    for v in fixed.into_iter().chain(rest) {
        out.push('_');
        out.push_str(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_prefix_matching() {
        assert!(tag_matches("NP-OBJ", "NP"));
        assert!(!tag_matches("NP", "NP-OBJ"));
        assert!(tag_matches("NP_SUBJ", "NP-SUBJ"));
        assert!(tag_matches("NP-SUBJ", "NP_SUBJ"));
        assert!(tag_matches("NP-OBJ-PRIMARY", "NP-OBJ"));
        assert!(tag_matches("S0", "S0"));
    }

    #[test]
    fn test_tag_matching_respects_segments() {
        assert!(!tag_matches("NPX", "NP"));
        assert!(!tag_matches("S-MAIN", "S-MA"));
        assert!(!tag_matches("VP", "NP"));
        assert!(!tag_matches("NP", ""));
    }

    #[test]
    fn test_tag_base() {
        assert_eq!(tag_base("NP-POSS"), "NP");
        assert_eq!(tag_base("S0"), "S0");
        assert_eq!(tag_base("ADVP-DATE-ABS"), "ADVP");
    }

    #[test]
    fn test_terminal_id() {
        let t = TerminalId::parse("no_et_nf_kvk");
        assert_eq!(t.category(), "no");
        assert_eq!(t.variants().collect::<Vec<_>>(), vec!["et", "nf", "kvk"]);
        assert_eq!(t.variant_in(&CASES), Some("nf"));
        assert_eq!(t.variant_in(&GENDERS), Some("kvk"));

        let bare = TerminalId::parse("ao");
        assert_eq!(bare.category(), "ao");
        assert_eq!(bare.variants().count(), 0);
    }

    #[test]
    fn test_terminal_matching() {
        assert!(terminal_matches("no_et_nf_kvk", "no"));
        assert!(terminal_matches("no_et_nf_kvk", "no_kvk"));
        assert!(terminal_matches("no_et_nf_kvk", "no_nf_et"));
        assert!(!terminal_matches("no_et_nf_kvk", "no_kk"));
        assert!(!terminal_matches("no_et_nf_kvk", "so"));
        assert!(!terminal_matches("so_1_þf_et_p3", "no"));
    }

    #[test]
    fn test_augment_terminal() {
        assert_eq!(augment_terminal("no_et_nf_kvk", []), "no_et_kvk_nf");
        assert_eq!(
            augment_terminal("so_1_þf_et_p3", ["fh", "gm", "þt"]),
            "so_1_þf_et_fh_gm_p3_þt"
        );
        assert_eq!(augment_terminal("lo_nf_et", ["esb", "sb", "kk"]), "lo_esb_et_kk_nf");
        assert_eq!(augment_terminal("gata_et_nf", ["kvk"]), "gata_kvk_nf");
        assert_eq!(augment_terminal("pfn_et_nf", ["p1", "nf"]), "pfn_et_nf_p1");

        let terminal = String::from("no_nf_et");
        let extra = vec![String::from("kvk")];
        let augmented = augment_terminal(&terminal, extra.iter().map(String::as_str));
        assert_eq!(augmented, "no_et_kvk_nf");
    }

    #[test]
    fn test_variants_outlive_terminal_id() {
        let terminal = String::from("so_1_þf_et_p3");
        let variants = TerminalId::parse(&terminal).variants();
        assert_eq!(variants.collect::<Vec<_>>(), vec!["1", "þf", "et", "p3"]);
    }
}
