//! Small hand-built trees and a lexicon shared by the unit tests

use crate::builder::{TerminalInfo, TreeBuilder};
use crate::morphology::MemoryMorphology;
use crate::tree::{TokenKind, Tree};

fn open(b: &mut TreeBuilder, tag: &str) {
    b.push_nonterminal(tag).unwrap();
}

fn close(b: &mut TreeBuilder) {
    b.pop_nonterminal().unwrap();
}

fn word(b: &mut TreeBuilder, info: TerminalInfo) {
    b.push_terminal(info).unwrap();
}

/// "Ása sá sól."
pub fn asa_sa_sol() -> Tree {
    let mut b = TreeBuilder::new();
    b.set_sentence_text("Ása sá sól.");
    open(&mut b, "P");
    open(&mut b, "S-MAIN");
    open(&mut b, "IP");
    open(&mut b, "NP-SUBJ");
    word(
        &mut b,
        TerminalInfo::new("no_et_nf_kvk", 0, "Ása")
            .lemma("Ása")
            .word_class("kvk")
            .domain("ism"),
    );
    close(&mut b);
    open(&mut b, "VP");
    open(&mut b, "VP");
    word(
        &mut b,
        TerminalInfo::new("so_1_þf_et_p3", 1, "sá")
            .lemma("sjá")
            .word_class("so")
            .augmented("so_1_þf_et_fh_gm_p3_þt"),
    );
    close(&mut b);
    open(&mut b, "NP-OBJ");
    word(
        &mut b,
        TerminalInfo::new("no_et_þf_kvk", 2, "sól")
            .lemma("sól")
            .word_class("kvk"),
    );
    close(&mut b);
    close(&mut b);
    close(&mut b);
    close(&mut b);
    word(&mut b, TerminalInfo::punctuation(3, "."));
    close(&mut b);
    b.finish().unwrap()
}

/// "Hún gaf honum bók."
pub fn two_objects() -> Tree {
    let mut b = TreeBuilder::new();
    open(&mut b, "IP");
    open(&mut b, "NP-SUBJ");
    word(
        &mut b,
        TerminalInfo::new("pfn_kvk_et_nf", 0, "Hún").lemma("hún").word_class("pfn"),
    );
    close(&mut b);
    open(&mut b, "VP");
    word(
        &mut b,
        TerminalInfo::new("so_2_þgf_þf_et_p3", 1, "gaf").lemma("gefa").word_class("so"),
    );
    open(&mut b, "NP-IOBJ");
    word(
        &mut b,
        TerminalInfo::new("pfn_kk_et_þgf", 2, "honum").lemma("hann").word_class("pfn"),
    );
    close(&mut b);
    open(&mut b, "NP-OBJ");
    word(
        &mut b,
        TerminalInfo::new("no_et_þf_kvk", 3, "bók").lemma("bók").word_class("kvk"),
    );
    close(&mut b);
    close(&mut b);
    word(&mut b, TerminalInfo::punctuation(4, "."));
    close(&mut b);
    b.finish().unwrap()
}

/// "Ég las bók kennarans", with the possessive NP nested in the object NP
pub fn nested_np() -> Tree {
    let mut b = TreeBuilder::new();
    open(&mut b, "S");
    open(&mut b, "NP-SUBJ");
    word(
        &mut b,
        TerminalInfo::new("pfn_et_nf_p1", 0, "Ég").lemma("ég").word_class("pfn"),
    );
    close(&mut b);
    open(&mut b, "VP");
    word(
        &mut b,
        TerminalInfo::new("so_1_þf_et_p1", 1, "las").lemma("lesa").word_class("so"),
    );
    open(&mut b, "NP-OBJ");
    word(
        &mut b,
        TerminalInfo::new("no_et_þf_kvk", 2, "bók").lemma("bók").word_class("kvk"),
    );
    open(&mut b, "NP-POSS");
    word(
        &mut b,
        TerminalInfo::new("no_et_ef_gr_kk", 3, "kennarans")
            .lemma("kennari")
            .word_class("kk"),
    );
    close(&mut b);
    close(&mut b);
    close(&mut b);
    close(&mut b);
    b.finish().unwrap()
}

/// "þessir stóru hestarnir bóndans"
pub fn plural_np() -> Tree {
    let mut b = TreeBuilder::new();
    open(&mut b, "NP-SUBJ");
    word(
        &mut b,
        TerminalInfo::new("fn_ft_kk_nf", 0, "þessir").lemma("þessi").word_class("fn"),
    );
    word(
        &mut b,
        TerminalInfo::new("lo_ft_kk_nf_vb", 1, "stóru")
            .lemma("stór")
            .word_class("lo")
            .augmented("lo_ft_fvb_kk_nf"),
    );
    word(
        &mut b,
        TerminalInfo::new("no_ft_gr_kk_nf", 2, "hestarnir")
            .lemma("hestur")
            .word_class("kk"),
    );
    open(&mut b, "NP-POSS");
    word(
        &mut b,
        TerminalInfo::new("no_et_ef_gr_kk", 3, "bóndans")
            .lemma("bóndi")
            .word_class("kk"),
    );
    close(&mut b);
    close(&mut b);
    b.finish().unwrap()
}

/// "Guðbjörn J. Óskarsson keypti 17 þús. ISK"
pub fn multiword() -> Tree {
    let mut b = TreeBuilder::new();
    open(&mut b, "S");
    open(&mut b, "NP-SUBJ");
    word(
        &mut b,
        TerminalInfo::new("person_kk_nf", 0, "Guðbjörn J. Óskarsson")
            .lemma("Guðbjörn J. Óskarsson")
            .word_class("kk")
            .kind(TokenKind::Person),
    );
    close(&mut b);
    open(&mut b, "VP");
    word(
        &mut b,
        TerminalInfo::new("so_1_þf_et_p3", 1, "keypti")
            .lemma("kaupa")
            .word_class("so")
            .augmented("so_1_þf_et_fh_gm_p3_þt"),
    );
    open(&mut b, "NP-OBJ");
    word(
        &mut b,
        TerminalInfo::new("no_ft_þf_kvk", 2, "17 þús. ISK")
            .lemma("17 þús. ISK")
            .word_class("kvk")
            .kind(TokenKind::Amount),
    );
    close(&mut b);
    close(&mut b);
    close(&mut b);
    b.finish().unwrap()
}

/// Forms for the words in the sample trees
pub fn lexicon() -> MemoryMorphology {
    MemoryMorphology::new()
        .with("hestur", "kk", "nf_et", "hestur")
        .with("hestur", "kk", "þf_et", "hest")
        .with("hestur", "kk", "þgf_et", "hesti")
        .with("hestur", "kk", "ef_et", "hests")
        .with("hestur", "kk", "nf_et_gr", "hesturinn")
        .with("hestur", "kk", "ef_et_gr", "hestsins")
        .with("hestur", "kk", "nf_ft", "hestar")
        .with("hestur", "kk", "nf_ft_gr", "hestarnir")
        .with("hestur", "kk", "þgf_ft_gr", "hestunum")
        .with("stór", "lo", "fsb_kk_nf_et", "stór")
        .with("stór", "lo", "fsb_kk_ef_et", "stórs")
        .with("stór", "lo", "fsb_kk_nf_ft", "stórir")
        .with("stór", "lo", "fvb_kk_nf_et", "stóri")
        .with("stór", "lo", "fvb_kk_nf_ft", "stóru")
        .with("stór", "lo", "fvb_kk_þgf_ft", "stóru")
        .with("þessi", "fn", "kk_nf_et", "þessi")
        .with("þessi", "fn", "kk_ef_et", "þessa")
        .with("þessi", "fn", "kk_nf_ft", "þessir")
        .with("þessi", "fn", "kk_þgf_ft", "þessum")
        .with("bóndi", "kk", "nf_et", "bóndi")
        .with("bóndi", "kk", "ef_et_gr", "bóndans")
        .with("sól", "kvk", "nf_et", "sól")
        .with("sól", "kvk", "þf_et", "sól")
        .with("sól", "kvk", "ef_et", "sólar")
        .with("Ása", "kvk", "nf_et", "Ása")
        .with("Ása", "kvk", "þf_et", "Ásu")
        .with("Ása", "kvk", "þgf_et", "Ásu")
        .with("Ása", "kvk", "ef_et", "Ásu")
        .with("bók", "kvk", "nf_et", "bók")
        .with("bók", "kvk", "ef_et", "bókar")
        .with("upplýsing", "kvk", "nf_ft", "upplýsingar")
        .with("upplýsing", "kvk", "þgf_ft", "upplýsingum")
        .with("Guðbjörn", "kk", "þgf_et", "Guðbirni")
        .with("Óskarsson", "kk", "þgf_et", "Óskarssyni")
}
