//! API Catalog Parser: line-by-line state machine over the method catalog.
//!
//! Line classes, in priority order: object header (`■…のメソッド`), title
//! (`〇…`, optionally followed by `返り値：…`), zero-parameter method
//! (`Name()`), method start (`Name(`), and parameter lines while a method
//! block is open. Parameter lines go through three grammars, strict, loose
//! and bare, in that order; the order decides ambiguous lines and must not
//! change.

use super::params::{build_parameter, UNKNOWN_TYPE};
use super::result::{DiagnosticSink, Parsed, SkipReason};
use super::returns::build_return;
use super::CatalogParser;
use crate::model::ApiEntry;
use crate::source::{normalize_text, SourceFragment};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^■(.+?)(?:のメソッド)?$").unwrap());

static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^〇(.+)$").unwrap());

static RE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*返り値[:：]\s*(.+)$").unwrap());

// Signature continues on the following lines
static RE_METHOD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\($").unwrap());

// e.g. Quit() / Create3DDocument();
static RE_ZERO_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\(\)\s*;?$").unwrap());

// name, // Type：description
static RE_PARAM_STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*,?\s*//\s*([^:：]+)[:：]\s*(.+)$").unwrap()
});

// name, // comment
static RE_PARAM_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*,?\s*//\s*(.+)$").unwrap());

static RE_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[:：]").unwrap());

// `name) // …` / `name); // …` -> `name// …`
static RE_CLOSE_BEFORE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\)\s*;?\s*//").unwrap());

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

const COMMENT: &str = "//";

// -- Grammars -----------------------------------------------------------------

/// A parameter line split into its raw parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParam {
    pub name: String,
    pub raw_type: String,
    pub description: String,
}

impl RawParam {
    fn new(name: &str, raw_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_type: raw_type.trim().to_string(),
            description: description.trim().to_string(),
        }
    }
}

/// `name, // Type：description`
pub fn match_strict(line: &str) -> Option<RawParam> {
    let caps = RE_PARAM_STRICT.captures(line)?;
    Some(RawParam::new(&caps[1], &caps[2], &caps[3]))
}

/// `name, // comment`; the comment is `Type：description` or just a type
pub fn match_loose(line: &str) -> Option<RawParam> {
    let caps = RE_PARAM_LOOSE.captures(line)?;
    let comment = caps[2].trim();
    let mut parts = RE_COLON.splitn(comment, 2);
    let raw_type = parts.next().unwrap_or_default();
    let description = parts.next().unwrap_or_default();
    Some(RawParam::new(&caps[1], raw_type, description))
}

/// Uncommented `[Type…] name` text; the last token must be an identifier
pub fn match_bare(candidate: &str) -> Option<RawParam> {
    let candidate = candidate.trim().trim_end_matches(',');
    let tokens: Vec<&str> = candidate.split_whitespace().collect();
    let (name, type_tokens) = tokens.split_last()?;
    if !RE_IDENT.is_match(name) {
        return None;
    }
    let raw_type = if type_tokens.is_empty() {
        UNKNOWN_TYPE.to_string()
    } else {
        type_tokens.join(" ")
    };
    Some(RawParam::new(name, &raw_type, ""))
}

/// Code before `)` and `//`, as the bare grammar sees a full line
fn bare_code(line: &str) -> &str {
    let code = line.split(')').next().unwrap_or_default();
    code.split(COMMENT).next().unwrap_or_default()
}

/// Strict, then loose, then bare
pub fn match_parameter(line: &str) -> Option<RawParam> {
    let line = RE_CLOSE_BEFORE_COMMENT.replace_all(line, COMMENT);
    match_strict(&line)
        .or_else(|| match_loose(&line))
        .or_else(|| match_bare(bare_code(&line)))
}

/// Code portion (before `//`, without trailing `;`) ends with `)`
pub fn is_closing_line(line: &str) -> bool {
    code_portion(line).ends_with(')')
}

fn code_portion(line: &str) -> &str {
    let code = line.split(COMMENT).next().unwrap_or_default().trim_end();
    code.trim_end_matches(';').trim_end()
}

/// Rebuild the last parameter of a closing line as `name // comment`.
///
/// Returns the synthetic line and the bare candidate, or `None` when nothing
/// precedes the final `)`.
fn synthetic_reparse_input(line: &str) -> Option<(String, String)> {
    let code = code_portion(line);
    let close = code.rfind(')')?;
    let before = &code[..close];
    let candidate = before
        .rsplit(',')
        .next()
        .unwrap_or(before)
        .trim()
        .trim_end_matches(')')
        .trim()
        .to_string();
    if candidate.is_empty() {
        return None;
    }

    let comment = line
        .split_once(COMMENT)
        .map(|(_, c)| c.trim())
        .unwrap_or_default();
    let synthetic = if comment.is_empty() {
        candidate.clone()
    } else {
        format!("{} {} {}", candidate, COMMENT, comment)
    };
    Some((synthetic, candidate))
}

fn synthetic_reparse(line: &str) -> Result<RawParam, Option<String>> {
    let Some((synthetic, candidate)) = synthetic_reparse_input(line) else {
        return Err(None);
    };
    match_strict(&synthetic)
        .or_else(|| match_loose(&synthetic))
        .or_else(|| match_bare(&candidate))
        .ok_or(Some(synthetic))
}

// -- Parser state -------------------------------------------------------------

/// Parser for the method catalog document
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiCatalogParser;

impl CatalogParser for ApiCatalogParser {
    type Item = ApiEntry;

    fn parse(&self, path: &str, text: &str) -> Parsed<ApiEntry> {
        parse_api_entries(path, text)
    }
}

/// A method whose signature is still being read
struct OpenEntry {
    entry: ApiEntry,
    /// 0-based line of `Name(`
    start: usize,
}

struct ApiCatalogState<'a> {
    path: &'a str,
    lines: Vec<&'a str>,

    current_object: String,
    current_title: String,
    current_return: String,
    /// Line of the most recent title, start of zero-parameter fragments
    title_line: Option<usize>,
    open: Option<OpenEntry>,
    /// Last non-empty line seen
    last_line: usize,

    entries: Vec<ApiEntry>,
    sink: DiagnosticSink,
}

impl<'a> ApiCatalogState<'a> {
    fn new(path: &'a str, text: &'a str) -> Self {
        Self {
            path,
            lines: text.split('\n').collect(),
            current_object: String::new(),
            current_title: String::new(),
            current_return: String::new(),
            title_line: None,
            open: None,
            last_line: 0,
            entries: Vec::new(),
            sink: DiagnosticSink::new(path),
        }
    }

    fn run(&mut self) {
        let mut index = 0;
        while index < self.lines.len() {
            index = self.process_line(index);
        }
        if let Some(open) = self.open.take() {
            self.flush_unterminated(open, self.last_line);
        }
    }

    /// Handle one line, returning the index of the next unread line
    fn process_line(&mut self, index: usize) -> usize {
        let line = self.lines[index];
        let line = line.trim();
        if line.is_empty() {
            return index + 1;
        }
        let previous = self.last_line;
        self.last_line = index;

        // 1. Object header
        if let Some(caps) = RE_HEADER.captures(line) {
            self.current_object = caps[1].trim().to_string();
            self.title_line = None;
            return index + 1;
        }

        // 2. Title, with the return line that may follow it
        if let Some(caps) = RE_TITLE.captures(line) {
            self.current_title = caps[1].trim().to_string();
            self.current_return.clear();
            self.title_line = Some(index);

            let next = self.lines.get(index + 1).copied().map(str::trim);
            if let Some(ret) = next.and_then(|l| RE_RETURN.captures(l)) {
                self.current_return = ret[1].trim().to_string();
                self.last_line = index + 1;
                return index + 2;
            }
            return index + 1;
        }

        // 3. Zero-parameter method
        if let Some(caps) = RE_ZERO_PARAM.captures(line) {
            let mut entry = self.new_entry(&caps[1]);
            let start = self.title_line.unwrap_or(index);
            entry.source = self.fragment(start, index);
            self.entries.push(entry);
            return index + 1;
        }

        // 4. Method start
        if let Some(caps) = RE_METHOD_START.captures(line) {
            if let Some(open) = self.open.take() {
                self.flush_unterminated(open, previous);
            }
            self.open = Some(OpenEntry {
                entry: self.new_entry(&caps[1]),
                start: index,
            });
            return index + 1;
        }

        // 5. Parameter lines
        if self.open.is_some() {
            self.process_parameter_line(index, line);
        }
        index + 1
    }

    fn process_parameter_line(&mut self, index: usize, line: &str) {
        let closing = is_closing_line(line);

        if let Some(raw) = match_parameter(line) {
            self.push_parameter(raw);
            if closing {
                self.close(index);
            }
            return;
        }

        if !closing {
            self.sink.push(index, SkipReason::UnparsedParameter, line);
            return;
        }

        match synthetic_reparse(line) {
            Ok(raw) => self.push_parameter(raw),
            // Lone `)` / `);`
            Err(None) => {}
            Err(Some(_)) => self.sink.push(index, SkipReason::UnparsedParameter, line),
        }
        self.close(index);
    }

    fn push_parameter(&mut self, raw: RawParam) {
        if let Some(open) = self.open.as_mut() {
            let position = open.entry.params.len();
            let param = build_parameter(&raw.name, &raw.raw_type, &raw.description, position);
            open.entry.params.push(param);
        }
    }

    /// Finalize the open entry with its fragment ending at `end`
    fn close(&mut self, end: usize) {
        if let Some(open) = self.open.take() {
            self.finalize(open, end);
        }
    }

    fn flush_unterminated(&mut self, open: OpenEntry, end: usize) {
        self.sink
            .push(open.start, SkipReason::UnterminatedEntry, self.lines[open.start].trim());
        self.finalize(open, end);
    }

    fn finalize(&mut self, open: OpenEntry, end: usize) {
        let OpenEntry { mut entry, start } = open;
        entry.source = self.fragment(start, end.max(start));
        self.entries.push(entry);
    }

    fn new_entry(&self, name: &str) -> ApiEntry {
        let mut entry = ApiEntry::function(name);
        entry.description = self.current_title.clone();
        entry.category = self.current_object.clone();
        entry.object_name = non_empty(&self.current_object);
        entry.title = non_empty(&self.current_title);
        entry.raw_return = non_empty(&self.current_return);
        entry.returns = build_return(&self.current_return);
        entry
    }

    fn fragment(&self, start: usize, end: usize) -> SourceFragment {
        SourceFragment::from_lines(self.path, &self.lines, start, end)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// -- Public API ---------------------------------------------------------------

/// Parse the method catalog into API entries.
///
/// Never fails: lines that cannot be read are skipped and reported in
/// [`Parsed::diagnostics`].
pub fn parse_api_entries(path: &str, text: &str) -> Parsed<ApiEntry> {
    let normalized = normalize_text(text);
    let mut state = ApiCatalogState::new(path, &normalized);
    state.run();

    log::info!(
        "[api] {}: {} entries, {} diagnostics",
        path,
        state.entries.len(),
        state.sink.len()
    );

    Parsed {
        line_count: state.lines.len(),
        items: state.entries,
        diagnostics: state.sink.into_vec(),
    }
}
