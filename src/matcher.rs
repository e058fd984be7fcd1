//! Pattern evaluation against a single node

use std::iter;

use crate::pattern::{Atom, Containment, Group, Pattern, SeqItem, Term};
use crate::tags::{tag_matches, terminal_matches};
use crate::tree::NodeRef;

impl Pattern {
    /// True if every top-level term matches `node`
    pub fn is_match(&self, node: NodeRef<'_>) -> bool {
        self.terms.iter().all(|term| term.is_match(node))
    }
}

impl Term {
    /// True if the atom matches `node` and its containment clause holds
    pub fn is_match(&self, node: NodeRef<'_>) -> bool {
        self.atom.is_match(node)
            && self
                .containment
                .as_deref()
                .is_none_or(|c| c.is_match(node))
    }
}

impl Atom {
    pub fn is_match(&self, node: NodeRef<'_>) -> bool {
        match self {
            Atom::Any => true,
            Atom::Literal(text) => node
                .terminal()
                .is_some_and(|t| t.text().to_lowercase() == *text),
            Atom::Lemma(lemma) => node.terminal().is_some_and(|t| t.lemma() == lemma),
            Atom::Identifier(id) => match node.terminal() {
                Some(t) => terminal_matches(t.terminal_id(), id),
                None => node.tag().is_some_and(|tag| tag_matches(tag, id)),
            },
            Atom::Choice(options) => options.iter().any(|term| term.is_match(node)),
        }
    }
}

impl Containment {
    /// Check the group against the children of `node`, or with `>>`
    /// against the children of `node` or of any node below it
    pub fn is_match(&self, node: NodeRef<'_>) -> bool {
        if !self.deep {
            return self.group.is_match(node);
        }
        iter::once(node)
            .chain(node.descendants())
            .filter(|n| n.has_children())
            .any(|n| self.group.is_match(n))
    }
}

impl Group {
    /// Match against the immediate children of `node`
    fn is_match(&self, node: NodeRef<'_>) -> bool {
        match self {
            Group::Set(terms) => terms
                .iter()
                .all(|term| node.children().any(|child| term.is_match(child))),
            Group::Sequence(items) => {
                let children: Vec<NodeRef<'_>> = node.children().collect();
                match_sequence(items, &children)
            }
        }
    }
}

/// Match `items` against a prefix of `children`, backtracking over repeats
fn match_sequence(items: &[SeqItem], children: &[NodeRef<'_>]) -> bool {
    let Some((first, rest)) = items.split_first() else {
        return true;
    };
    match first {
        SeqItem::End => children.is_empty() && match_sequence(rest, children),
        SeqItem::Term { term, repeat } => {
            let (min, max) = repeat.map_or((1, Some(1)), |r| r.bounds());
            let limit = max.unwrap_or(children.len()).min(children.len());
            let available = children[..limit]
                .iter()
                .take_while(|&&child| term.is_match(child))
                .count();
            if available < min {
                return false;
            }
            (min..=available)
                .rev()
                .any(|n| match_sequence(rest, &children[n..]))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pattern::Pattern;
    use crate::samples;

    fn check(pattern: &str, node: crate::tree::NodeRef<'_>) -> bool {
        Pattern::new(pattern).unwrap().is_match(node)
    }

    #[test]
    fn test_atoms() {
        let tree = samples::asa_sa_sol();
        let subj = tree.root().path(&["S_MAIN", "IP", "NP_SUBJ"]).unwrap();
        let asa = subj.child_at(0).unwrap();

        assert!(check(".", subj));
        assert!(check("NP", subj));
        assert!(check("NP-SUBJ", subj));
        assert!(!check("NP-OBJ", subj));
        assert!(!check("no", subj));

        assert!(check("\"ása\"", asa));
        assert!(check("'Ása'", asa));
        assert!(!check("'ása'", asa));
        assert!(check("no_kvk_nf", asa));
        assert!(!check("no_kk", asa));
        assert!(!check("NP", asa));
        assert!(check("(so | no)", asa));
        assert!(!check("(so | lo)", asa));
    }

    #[test]
    fn test_all_top_level_terms_must_match() {
        let tree = samples::asa_sa_sol();
        let asa = tree.root().leaves().next().unwrap();
        assert!(check("no 'Ása'", asa));
        assert!(!check("no 'sól'", asa));
    }

    #[test]
    fn test_set_containment() {
        let tree = samples::two_objects();
        let vp = tree.root().child_by_tag("VP").unwrap();
        assert!(check("VP > { NP-OBJ so }", vp));
        assert!(check("VP > { }", vp));
        assert!(check("VP > NP-IOBJ", vp));
        assert!(!check("VP > { NP-SUBJ }", vp));
        assert!(!check("VP > 'bók'", vp));
        assert!(check("VP >> 'bók'", vp));
        assert!(check("IP >> { NP-IOBJ NP-OBJ }", tree.root()));
        // The set items must be found at a single level
        assert!(!check("IP >> { NP-SUBJ NP-OBJ }", tree.root()));
    }

    #[test]
    fn test_sequence_containment() {
        let tree = samples::two_objects();
        let vp = tree.root().child_by_tag("VP").unwrap();
        assert!(check("VP > [ so NP NP ]", vp));
        assert!(check("VP > [ so NP NP $ ]", vp));
        assert!(check("VP > [ so ]", vp));
        assert!(!check("VP > [ so $ ]", vp));
        assert!(!check("VP > [ NP so ]", vp));
        assert!(check("VP > [ so . * NP-OBJ $ ]", vp));
        assert!(check("VP > [ lo? so NP+ $ ]", vp));
        assert!(!check("VP > [ so NP-IOBJ+ NP-IOBJ ]", vp));
        assert!(check("IP > [ NP VP > [ so NP-IOBJ ] \".\" ]", tree.root()));
    }

    #[test]
    fn test_sequence_backtracks() {
        let tree = samples::plural_np();
        let np = tree.root();
        // The wildcard must give back the last child for NP-POSS to match
        assert!(check("NP > [ . * NP-POSS $ ]", np));
        assert!(check("NP > [ fn . + no NP $ ]", np));
        assert!(!check("NP > [ . + fn ]", np));
    }

    #[test]
    fn test_nested_deep_containment() {
        let tree = samples::asa_sa_sol();
        let root = tree.root();
        assert!(check("P >> { VP >> { NP-OBJ >> 'sól' } }", root));
        assert!(!check("P >> { VP >> { NP-SUBJ } }", root));
        assert!(check("S > IP > VP", root.child_at(0).unwrap()));
    }
}
