//! Lemma and category extraction over subtrees

use crate::ifd;
use crate::tags::GENDERS;
use crate::tree::{NodeRef, TerminalRef};

impl<'t> NodeRef<'t> {
    fn terminal_refs(&self) -> impl Iterator<Item = TerminalRef<'t>> + 't {
        self.leaves().filter_map(|leaf| leaf.terminal())
    }

    fn lemmas_where(&self, keep: impl Fn(&TerminalRef<'t>) -> bool) -> Vec<&'t str> {
        self.terminal_refs()
            .filter(|t| keep(t))
            .map(|t| t.lemma())
            .collect()
    }

    /// Lemmas of the terminals in this subtree, left to right
    ///
    /// Non-word tokens contribute their text, so the list has one entry per
    /// terminal.
    pub fn lemmas(&self) -> Vec<&'t str> {
        self.lemmas_where(|_| true)
    }

    /// The lemmas joined with spaces
    pub fn lemma(&self) -> String {
        self.lemmas().join(" ")
    }

    /// Lemmas of nouns, i.e. `no` terminals and words of a gender word class
    pub fn nouns(&self) -> Vec<&'t str> {
        self.lemmas_where(|t| {
            t.category() == "no" || t.word_class().is_some_and(|c| GENDERS.contains(&c))
        })
    }

    pub fn verbs(&self) -> Vec<&'t str> {
        self.lemmas_where(|t| t.category() == "so")
    }

    /// Full names of persons, in the nominative
    pub fn persons(&self) -> Vec<&'t str> {
        self.lemmas_where(|t| t.category() == "person")
    }

    pub fn entities(&self) -> Vec<&'t str> {
        self.lemmas_where(|t| t.category() == "entity")
    }

    pub fn proper_names(&self) -> Vec<&'t str> {
        self.lemmas_where(|t| t.category() == "sérnafn")
    }

    /// IFD tags, one per whitespace separated word of the terminals' text
    pub fn ifd_tags(&self) -> Vec<String> {
        self.terminal_refs().flat_map(ifd::ifd_tags).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{TerminalInfo, TreeBuilder};
    use crate::samples;
    use crate::tree::TokenKind;

    #[test]
    fn test_lemmas_follow_leaves() {
        let tree = samples::asa_sa_sol();
        let root = tree.root();
        assert_eq!(root.lemmas(), vec!["Ása", "sjá", "sól", "."]);
        assert_eq!(root.lemma(), "Ása sjá sól .");
        let (lo, hi) = root.span().unwrap();
        assert_eq!(root.lemmas().len(), hi - lo + 1);

        for node in root.descendants() {
            assert_eq!(node.lemmas().len(), node.leaves().count());
        }
    }

    #[test]
    fn test_category_filters() {
        let tree = samples::asa_sa_sol();
        let root = tree.root();
        assert_eq!(root.nouns(), vec!["Ása", "sól"]);
        assert_eq!(root.verbs(), vec!["sjá"]);
        assert!(root.persons().is_empty());

        let tree = samples::multiword();
        let root = tree.root();
        assert_eq!(root.persons(), vec!["Guðbjörn J. Óskarsson"]);
        assert_eq!(root.verbs(), vec!["kaupa"]);
        // The person terminal has a gender word class
        assert_eq!(root.nouns(), vec!["Guðbjörn J. Óskarsson", "17 þús. ISK"]);
    }

    #[test]
    fn test_entities_and_proper_names() {
        let mut b = TreeBuilder::new();
        b.push_nonterminal("NP").unwrap();
        b.push_terminal(
            TerminalInfo::new("entity", 0, "Samsung")
                .lemma("Samsung")
                .kind(TokenKind::Entity),
        )
        .unwrap();
        b.push_terminal(TerminalInfo::new("sérnafn_nf", 1, "Jón").lemma("Jón"))
            .unwrap();
        b.pop_nonterminal().unwrap();
        let tree = b.finish().unwrap();

        assert_eq!(tree.root().entities(), vec!["Samsung"]);
        assert_eq!(tree.root().proper_names(), vec!["Jón"]);
        assert_eq!(tree.root().ifd_tags(), vec!["nxex-s", "nxen-s"]);
    }

    #[test]
    fn test_ifd_tags_count_words() {
        let tree = samples::multiword();
        let root = tree.root();
        let tags = root.ifd_tags();
        assert_eq!(tags.len(), root.text().split_whitespace().count());
        assert_eq!(tags[3], "sfg3eþ");
    }
}
