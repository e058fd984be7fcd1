//! Tree table parsing and treebank collections
//!
//! A tree table holds one sentence per block, separated by blank lines.
//! `# key = value` comment lines carry sentence metadata; `# text = ...`
//! is the sentence text. Each node is one line with nine tab-separated
//! fields:
//!
//! ```text
//! ID  HEAD  LABEL  TOKEN  FORM  LEMMA  AUGMENTED  CLASS  KIND
//! ```
//!
//! `ID` counts from 1 and `HEAD` is 0 for the root. `LABEL` is the tag of a
//! nonterminal or the terminal identifier of a terminal. Nonterminals have
//! `_` as `TOKEN`; terminals have their token index there. `CLASS` is the
//! word class, optionally followed by `/domain`, and `KIND` is a token kind
//! name such as `PUNCTUATION`. `_` marks an absent value. Children follow
//! their parent's other children in line order.
//!
//! Files ending in `.gz` are decompressed when the `gzip` feature is on.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use atoi::FromRadix10Checked;
use bstr::ByteSlice;
use thiserror::Error;
use tracing::warn;

use crate::builder::{TerminalInfo, TreeBuilder};
use crate::parser::PatternError;
use crate::pattern::Pattern;
use crate::searcher::SearchMode;
use crate::tree::{NodeId, TokenKind, Tree, TreeError};

const FIELD_COUNT: usize = 9;

/// Error while reading a tree table
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line_num}: {message}")]
    Line { line_num: usize, message: String },

    #[error("Invalid tree at line {line_num}: {source}")]
    Tree {
        line_num: usize,
        #[source]
        source: TreeError,
    },
}

fn line_error(line_num: usize, message: impl Into<String>) -> ReadError {
    ReadError::Line {
        line_num,
        message: message.into(),
    }
}

/// Reader that iterates over the sentences of a tree table
pub struct TreeReader<R: BufRead> {
    reader: R,
    line_num: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> TreeReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_num: 0,
            buf: Vec::with_capacity(256),
        }
    }
}

impl TreeReader<Cursor<String>> {
    /// Create a reader over an in-memory table
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::new(Cursor::new(text.into()))
    }
}

impl TreeReader<Box<dyn BufRead + Send>> {
    /// Create a reader from a file path, decompressing `.gz` files
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(open_decoded(path, file)))
    }
}

#[cfg(feature = "gzip")]
fn open_decoded(path: &Path, file: File) -> Box<dyn BufRead + Send> {
    if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    }
}

#[cfg(not(feature = "gzip"))]
fn open_decoded(_path: &Path, file: File) -> Box<dyn BufRead + Send> {
    Box::new(BufReader::new(file))
}

/// Sentence text and metadata from the comment lines of a block
#[derive(Debug, Default)]
struct Header {
    text: Option<String>,
    metadata: Vec<(String, String)>,
}

impl Header {
    fn parse_comment(&mut self, comment: &[u8]) {
        let Some((key, value)) = comment.split_once_str("=") else {
            return;
        };
        let key = key.trim().to_str_lossy();
        let value = value.trim().to_str_lossy().into_owned();
        if key == "text" {
            self.text = Some(value);
        } else {
            self.metadata.push((key.into_owned(), value));
        }
    }
}

impl<R: BufRead> Iterator for TreeReader<R> {
    type Item = Result<Tree, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut lines: Vec<(usize, Vec<u8>)> = Vec::new();
        let mut header = Header::default();

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) if lines.is_empty() => return None,
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_num += 1;

            let line = self.buf.trim_end_with(|c| c == '\n' || c == '\r');
            if line.trim().is_empty() {
                if lines.is_empty() {
                    continue;
                }
                break;
            }
            if let Some(comment) = line.strip_prefix(b"#") {
                header.parse_comment(comment);
                continue;
            }
            lines.push((self.line_num, line.to_vec()));
        }

        Some(parse_sentence(&lines, header))
    }
}

/// One node line
#[derive(Debug)]
struct Row<'a> {
    line_num: usize,
    head: usize,
    label: &'a str,
    token: Option<usize>,
    form: Option<&'a str>,
    lemma: Option<&'a str>,
    augmented: Option<&'a str>,
    class: Option<&'a str>,
    kind: Option<&'a str>,
}

fn number(field: &[u8]) -> Option<usize> {
    match usize::from_radix_10_checked(field) {
        (Some(n), used) if used > 0 && used == field.len() => Some(n),
        _ => None,
    }
}

/// A text field, or `None` for `_`
fn text(field: &[u8], line_num: usize) -> Result<Option<&str>, ReadError> {
    if field == b"_" {
        return Ok(None);
    }
    field
        .to_str()
        .map(Some)
        .map_err(|_| line_error(line_num, format!("Invalid UTF-8 in field '{}'", field.as_bstr())))
}

fn parse_row(line: &[u8], line_num: usize, expected_id: usize) -> Result<Row<'_>, ReadError> {
    let fields: Vec<&[u8]> = line.split_str("\t").collect();
    if fields.len() != FIELD_COUNT {
        return Err(line_error(
            line_num,
            format!("Expected {FIELD_COUNT} fields, found {}", fields.len()),
        ));
    }

    let id = number(fields[0])
        .ok_or_else(|| line_error(line_num, format!("Invalid ID: {}", fields[0].as_bstr())))?;
    if id != expected_id {
        return Err(line_error(line_num, format!("Expected ID {expected_id}, found {id}")));
    }
    let head = number(fields[1])
        .ok_or_else(|| line_error(line_num, format!("Invalid HEAD: {}", fields[1].as_bstr())))?;
    let label = text(fields[2], line_num)?.ok_or_else(|| line_error(line_num, "Missing LABEL"))?;
    let token = match fields[3] {
        b"_" => None,
        field => Some(
            number(field)
                .ok_or_else(|| line_error(line_num, format!("Invalid TOKEN: {}", field.as_bstr())))?,
        ),
    };

    Ok(Row {
        line_num,
        head,
        label,
        token,
        form: text(fields[4], line_num)?,
        lemma: text(fields[5], line_num)?,
        augmented: text(fields[6], line_num)?,
        class: text(fields[7], line_num)?,
        kind: text(fields[8], line_num)?,
    })
}

impl Row<'_> {
    fn terminal_info(&self, token_index: usize) -> Result<TerminalInfo, ReadError> {
        let form = self
            .form
            .ok_or_else(|| line_error(self.line_num, "Missing FORM for terminal"))?;
        let kind = self.kind.map_or(TokenKind::Word, TokenKind::from_name);
        let mut info = TerminalInfo::new(self.label, token_index, form).kind(kind);
        if let Some(lemma) = self.lemma {
            info = info.lemma(lemma);
        }
        if let Some(augmented) = self.augmented {
            info = info.augmented(augmented);
        }
        match self.class.map(|c| c.split_once('/').unwrap_or((c, ""))) {
            Some((class, "")) => info = info.word_class(class),
            Some((class, domain)) => info = info.word_class(class).domain(domain),
            None => {}
        }
        Ok(info)
    }
}

fn parse_sentence(lines: &[(usize, Vec<u8>)], header: Header) -> Result<Tree, ReadError> {
    let rows = lines
        .iter()
        .enumerate()
        .map(|(i, (line_num, line))| parse_row(line, *line_num, i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    let last_line = lines.last().map_or(0, |(line_num, _)| *line_num);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut root = None;
    for (i, row) in rows.iter().enumerate() {
        match row.head {
            0 if root.is_some() => return Err(line_error(row.line_num, "More than one root (HEAD 0)")),
            0 => root = Some(i),
            head if head > rows.len() || head == i + 1 => {
                return Err(line_error(row.line_num, format!("Invalid HEAD: {head}")));
            }
            head => children[head - 1].push(i),
        }
    }
    let root = root.ok_or_else(|| line_error(last_line, "No root (HEAD 0)"))?;

    let mut builder = TreeBuilder::new();
    if let Some(text) = header.text {
        builder.set_sentence_text(text);
    }
    for (key, value) in header.metadata {
        builder.insert_metadata(key, value);
    }

    let mut emitted = 0;
    emit(&rows, &children, root, &mut builder, &mut emitted)?;
    if emitted != rows.len() {
        return Err(line_error(last_line, "Nodes not connected to the root"));
    }
    builder.finish().map_err(|source| ReadError::Tree {
        line_num: last_line,
        source,
    })
}

/// Push row `i` and its subtree, depth first
fn emit(
    rows: &[Row<'_>],
    children: &[Vec<usize>],
    i: usize,
    builder: &mut TreeBuilder,
    emitted: &mut usize,
) -> Result<(), ReadError> {
    let row = &rows[i];
    *emitted += 1;
    let tree_error = |source| ReadError::Tree {
        line_num: row.line_num,
        source,
    };
    match row.token {
        None => {
            builder.push_nonterminal(row.label).map_err(tree_error)?;
            for &child in &children[i] {
                emit(rows, children, child, builder, emitted)?;
            }
            builder.pop_nonterminal().map_err(tree_error)?;
        }
        Some(token_index) => {
            if let Some(&child) = children[i].first() {
                return Err(line_error(
                    rows[child].line_num,
                    format!("HEAD {} is a terminal", i + 1),
                ));
            }
            builder
                .push_terminal(row.terminal_info(token_index)?)
                .map_err(tree_error)?;
        }
    }
    Ok(())
}

/// Source of trees for a collection
#[derive(Debug, Clone)]
enum TreeSource {
    /// In-memory tree table
    String(String),
    File(PathBuf),
    /// Multiple file paths (from glob or explicit paths)
    Files(Vec<PathBuf>),
}

/// Collection of trees from a string, file, or glob pattern
///
/// Unreadable files and malformed sentences are logged and skipped.
///
/// ```no_run
/// use simpletree::Treebank;
///
/// for tree in Treebank::from_file("trees.tsv.gz") {
///     println!("{}", tree.root().text());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Treebank {
    source: TreeSource,
}

impl Treebank {
    pub fn from_string(text: &str) -> Self {
        Self {
            source: TreeSource::String(text.to_string()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            source: TreeSource::File(path.as_ref().to_path_buf()),
        }
    }

    /// Create from a glob pattern
    ///
    /// Files are read in sorted order.
    pub fn from_glob(pattern: &str) -> Result<Self, glob::PatternError> {
        let mut file_paths: Vec<PathBuf> = glob::glob(pattern)?.filter_map(Result::ok).collect();
        file_paths.sort();
        Ok(Self::from_paths(file_paths))
    }

    pub fn from_paths(file_paths: Vec<PathBuf>) -> Self {
        Self {
            source: TreeSource::Files(file_paths),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Arc<Tree>>> {
        self.clone().into_iter()
    }
}

impl IntoIterator for Treebank {
    type Item = Arc<Tree>;
    type IntoIter = Box<dyn Iterator<Item = Self::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        match self.source {
            TreeSource::String(text) => Box::new(valid_trees(TreeReader::from_string(text))),
            TreeSource::File(path) => open_file_trees(path),
            TreeSource::Files(paths) => Box::new(paths.into_iter().flat_map(open_file_trees)),
        }
    }
}

fn valid_trees<R: BufRead>(reader: TreeReader<R>) -> impl Iterator<Item = Arc<Tree>> {
    reader.filter_map(|result| match result {
        Ok(tree) => Some(Arc::new(tree)),
        Err(e) => {
            warn!(error = %e, "skipping malformed sentence");
            None
        }
    })
}

fn open_file_trees(path: PathBuf) -> Box<dyn Iterator<Item = Arc<Tree>>> {
    match TreeReader::from_file(&path) {
        Ok(reader) => Box::new(valid_trees(reader)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable file");
            Box::new(std::iter::empty())
        }
    }
}

/// Every match of a pattern across a treebank
///
/// Yields the tree and the id of the matching node, in treebank order and
/// pre-order within each tree.
///
/// ```no_run
/// use simpletree::{MatchSet, SearchMode, Treebank};
///
/// let treebank = Treebank::from_glob("trees/*.tsv").unwrap();
/// let matches = MatchSet::new(&treebank, "NP > { lo no }", SearchMode::Top).unwrap();
/// for (tree, id) in matches {
///     if let Some(node) = tree.node(id) {
///         println!("{}", node.text());
///     }
/// }
/// ```
#[derive(Clone)]
pub struct MatchSet {
    treebank: Treebank,
    pattern: Arc<Pattern>,
    mode: SearchMode,
}

impl MatchSet {
    /// Compile `pattern` and prepare a search over `treebank`
    pub fn new(treebank: &Treebank, pattern: &str, mode: SearchMode) -> Result<Self, PatternError> {
        Ok(Self {
            treebank: treebank.clone(),
            pattern: Pattern::compile_cached(pattern)?,
            mode,
        })
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = (Arc<Tree>, NodeId)>> {
        self.clone().into_iter()
    }
}

impl IntoIterator for MatchSet {
    type Item = (Arc<Tree>, NodeId);
    type IntoIter = Box<dyn Iterator<Item = Self::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        let Self {
            treebank,
            pattern,
            mode,
        } = self;
        let iter = treebank.into_iter().flat_map(move |tree| {
            let ids: Vec<NodeId> = tree
                .root()
                .search(Arc::clone(&pattern), mode)
                .map(|node| node.id())
                .collect();
            ids.into_iter().map(move |id| (Arc::clone(&tree), id))
        });
        Box::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    const ASA_SA_SOL: &str = "# text = Ása sá sól.\n\
                              # id = s1\n\
                              1\t0\tP\t_\t_\t_\t_\t_\t_\n\
                              2\t1\tS-MAIN\t_\t_\t_\t_\t_\t_\n\
                              3\t2\tIP\t_\t_\t_\t_\t_\t_\n\
                              4\t3\tNP-SUBJ\t_\t_\t_\t_\t_\t_\n\
                              5\t4\tno_et_nf_kvk\t0\tÁsa\tÁsa\t_\tkvk/ism\tWORD\n\
                              6\t3\tVP\t_\t_\t_\t_\t_\t_\n\
                              7\t6\tVP\t_\t_\t_\t_\t_\t_\n\
                              8\t7\tso_1_þf_et_p3\t1\tsá\tsjá\tso_1_þf_et_fh_gm_p3_þt\tso\t_\n\
                              9\t6\tNP-OBJ\t_\t_\t_\t_\t_\t_\n\
                              10\t9\tno_et_þf_kvk\t2\tsól\tsól\t_\tkvk\t_\n\
                              11\t1\t.\t3\t.\t_\t_\t_\tPUNCTUATION\n";

    const PLURAL_NP: &str = "1\t0\tNP-SUBJ\t_\t_\t_\t_\t_\t_\n\
                             2\t1\tfn_ft_kk_nf\t0\tþessir\tþessi\t_\tfn\t_\n\
                             3\t1\tlo_ft_kk_nf_vb\t1\tstóru\tstór\tlo_ft_fvb_kk_nf\tlo\t_\n\
                             4\t1\tno_ft_gr_kk_nf\t2\thestarnir\thestur\t_\tkk\t_\n\
                             5\t1\tNP-POSS\t_\t_\t_\t_\t_\t_\n\
                             6\t5\tno_et_ef_gr_kk\t3\tbóndans\tbóndi\t_\tkk\t_\n";

    fn two_sentences() -> String {
        format!("{ASA_SA_SOL}\n{PLURAL_NP}\n")
    }

    #[test]
    fn test_read_sentence() {
        let mut reader = TreeReader::from_string(ASA_SA_SOL);
        let tree = reader.next().unwrap().unwrap();
        assert!(reader.next().is_none());

        let expected = samples::asa_sa_sol();
        assert_eq!(tree.len(), expected.len());
        assert_eq!(tree.root().flat(), expected.root().flat());
        assert_eq!(
            tree.root().flat_with_all_variants(),
            expected.root().flat_with_all_variants()
        );
        assert_eq!(tree.root().view(), expected.root().view());
        assert_eq!(tree.sentence_text(), Some("Ása sá sól."));
        assert_eq!(tree.metadata().get("id").map(String::as_str), Some("s1"));

        let asa = tree.root().leaves().next().unwrap().terminal().unwrap();
        assert_eq!(asa.word_class(), Some("kvk"));
        assert_eq!(asa.domain(), Some("ism"));
        let period = tree.root().leaves().last().unwrap().terminal().unwrap();
        assert!(period.is_punctuation());
        assert_eq!(period.lemma(), ".");
    }

    #[test]
    fn test_children_keep_line_order() {
        let tree = TreeReader::from_string(PLURAL_NP).next().unwrap().unwrap();
        assert_eq!(tree.root().text(), "þessir stóru hestarnir bóndans");
        assert_eq!(tree.root().lemmas(), vec!["þessi", "stór", "hestur", "bóndi"]);
        assert_eq!(tree.root().flat(), samples::plural_np().root().flat());
    }

    #[test]
    fn test_blank_lines_and_missing_trailing_newline() {
        let text = format!("\n\n{ASA_SA_SOL}\n\n\n{}", PLURAL_NP.trim_end());
        let trees: Vec<_> = TreeReader::from_string(text).collect::<Result<_, _>>().unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[1].sentence_text(), None);
        assert!(trees[1].metadata().is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let text = PLURAL_NP.replace('\n', "\r\n");
        let tree = TreeReader::from_string(text).next().unwrap().unwrap();
        assert_eq!(tree.root().leaves().count(), 4);
    }

    fn read_error(text: &str) -> ReadError {
        TreeReader::from_string(text).next().unwrap().unwrap_err()
    }

    #[test]
    fn test_line_errors() {
        let err = read_error("1\t0\tNP\t_\t_\n");
        assert!(matches!(err, ReadError::Line { line_num: 1, .. }));
        assert!(err.to_string().contains("Expected 9 fields, found 5"));

        let err = read_error("1\t0\tNP\t_\t_\t_\t_\t_\t_\n3\t1\tno\t0\tx\t_\t_\t_\t_\n");
        assert!(matches!(err, ReadError::Line { line_num: 2, .. }));

        let err = read_error("1\t0\tNP\t_\t_\t_\t_\t_\t_\n2\t0\tno\t0\tx\t_\t_\t_\t_\n");
        assert!(err.to_string().contains("More than one root"));

        let err = read_error("1\t0\tNP\t_\t_\t_\t_\t_\t_\n2\t7\tno\t0\tx\t_\t_\t_\t_\n");
        assert!(err.to_string().contains("Invalid HEAD: 7"));

        let err = read_error("1\t0\tNP\t_\t_\t_\t_\t_\t_\n2\t1\tno\t1x\tx\t_\t_\t_\t_\n");
        assert!(err.to_string().contains("Invalid TOKEN: 1x"));

        let err = read_error("1\t0\tNP\t_\t_\t_\t_\t_\t_\n2\t1\tno\t0\t_\t_\t_\t_\t_\n");
        assert!(err.to_string().contains("Missing FORM"));
    }

    #[test]
    fn test_structure_errors() {
        let err = read_error("1\t0\tno\t0\tx\t_\t_\t_\t_\n2\t1\tno\t1\ty\t_\t_\t_\t_\n");
        assert!(err.to_string().contains("HEAD 1 is a terminal"));

        let err = read_error("1\t2\tNP\t_\t_\t_\t_\t_\t_\n2\t1\tNP\t_\t_\t_\t_\t_\t_\n");
        assert!(err.to_string().contains("No root"));

        let err = read_error(
            "1\t0\tNP\t_\t_\t_\t_\t_\t_\n2\t1\tno\t0\tx\t_\t_\t_\t_\n\
             3\t4\tVP\t_\t_\t_\t_\t_\t_\n4\t3\tVP\t_\t_\t_\t_\t_\t_\n",
        );
        assert!(err.to_string().contains("not connected"));

        let err = read_error("1\t0\tNP\t_\t_\t_\t_\t_\t_\n2\t1\tVP\t_\t_\t_\t_\t_\t_\n");
        assert!(matches!(
            err,
            ReadError::Tree {
                source: TreeError::EmptySpan(1),
                ..
            }
        ));

        let err = read_error("1\t0\tNP\t_\t_\t_\t_\t_\t_\n2\t1\tno\t3\tx\t_\t_\t_\t_\n3\t1\tno\t2\ty\t_\t_\t_\t_\n");
        assert!(matches!(
            err,
            ReadError::Tree {
                source: TreeError::TokenOrder { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_reader_continues_after_error() {
        let text = format!("1\t0\tNP\n\n{PLURAL_NP}");
        let results: Vec<_> = TreeReader::from_string(text).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_treebank_from_string() {
        let trees: Vec<_> = Treebank::from_string(&two_sentences()).into_iter().collect();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].root().leaves().count(), 4);
        assert_eq!(trees[1].root().tag(), Some("NP-SUBJ"));
    }

    #[test]
    fn test_treebank_skips_bad_sentences() {
        let text = format!("1\t0\tNP\t_\t_\t_\t_\t_\t_\n\n{}", two_sentences());
        let treebank = Treebank::from_string(&text);
        assert_eq!(treebank.iter().count(), 2);
        // Iterating again starts over
        assert_eq!(treebank.iter().count(), 2);
    }

    #[test]
    fn test_match_set_modes() {
        let treebank = Treebank::from_string(&two_sentences());
        let all: Vec<_> = MatchSet::new(&treebank, "NP", SearchMode::All)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(all.len(), 4);
        let top = MatchSet::new(&treebank, "NP", SearchMode::Top).unwrap();
        assert_eq!(top.iter().count(), 3);

        let tags: Vec<_> = all
            .iter()
            .filter_map(|(tree, id)| tree.node(*id).and_then(|n| n.tag()).map(str::to_string))
            .collect();
        assert_eq!(tags, vec!["NP-SUBJ", "NP-OBJ", "NP-SUBJ", "NP-POSS"]);
    }

    #[test]
    fn test_match_set_bad_pattern() {
        let treebank = Treebank::from_string(ASA_SA_SOL);
        assert!(MatchSet::new(&treebank, "NP > {", SearchMode::All).is_err());
    }

    #[test]
    fn test_match_set_no_matches() {
        let treebank = Treebank::from_string(PLURAL_NP);
        let matches = MatchSet::new(&treebank, "VP", SearchMode::All).unwrap();
        assert_eq!(matches.iter().count(), 0);
    }

    mod multi_file {
        use super::*;
        use std::fs;
        use std::io::Write;
        use tempfile::{TempDir, tempdir};

        fn create_test_files(contents: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
            let dir = tempdir().unwrap();
            let mut paths = Vec::new();
            for (filename, content) in contents {
                let path = dir.path().join(filename);
                let mut file = fs::File::create(&path).unwrap();
                write!(file, "{content}").unwrap();
                paths.push(path);
            }
            (dir, paths)
        }

        #[test]
        fn test_treebank_from_paths() {
            let (_dir, paths) =
                create_test_files(&[("a.tsv", ASA_SA_SOL), ("b.tsv", PLURAL_NP)]);
            let trees: Vec<_> = Treebank::from_paths(paths).into_iter().collect();
            assert_eq!(trees.len(), 2);
            assert_eq!(trees[0].sentence_text(), Some("Ása sá sól."));
        }

        #[test]
        fn test_treebank_from_glob_sorted() {
            let (dir, _paths) = create_test_files(&[
                ("b.tsv", ASA_SA_SOL),
                ("a.tsv", PLURAL_NP),
                ("notes.txt", "ignored"),
            ]);
            let pattern = format!("{}/*.tsv", dir.path().display());
            let trees: Vec<_> = Treebank::from_glob(&pattern).unwrap().into_iter().collect();
            assert_eq!(trees.len(), 2);
            assert_eq!(trees[0].root().tag(), Some("NP-SUBJ"));
            assert_eq!(trees[1].root().tag(), Some("P"));
        }

        #[test]
        fn test_skips_missing_files() {
            let (dir, paths) = create_test_files(&[("good.tsv", PLURAL_NP)]);
            let missing = dir.path().join("missing.tsv");
            let paths = vec![paths[0].clone(), missing, paths[0].clone()];
            assert_eq!(Treebank::from_paths(paths).iter().count(), 2);
        }

        #[test]
        fn test_match_set_from_glob() {
            let (dir, _paths) =
                create_test_files(&[("a.tsv", ASA_SA_SOL), ("b.tsv", PLURAL_NP)]);
            let pattern = format!("{}/*.tsv", dir.path().display());
            let treebank = Treebank::from_glob(&pattern).unwrap();
            let matches = MatchSet::new(&treebank, "NP > no", SearchMode::All).unwrap();
            assert_eq!(matches.iter().count(), 4);
        }

        #[cfg(feature = "gzip")]
        #[test]
        fn test_gzip_file() {
            use flate2::Compression;
            use flate2::write::GzEncoder;

            let dir = tempdir().unwrap();
            let path = dir.path().join("trees.tsv.gz");
            let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
            encoder.write_all(two_sentences().as_bytes()).unwrap();
            encoder.finish().unwrap();

            let trees: Vec<_> = TreeReader::from_file(&path)
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();
            assert_eq!(trees.len(), 2);
            assert_eq!(Treebank::from_file(&path).iter().count(), 2);
        }
    }
}
