//! Parser for the indented text dumps printed by `pacmd list-*`
//!
//! The output is a loose tree:
//! - numbered items introduced by `index: N` (the default one starred, `* index: N`)
//! - `key: value` fields
//! - `key:` headers opening a deeper block (e.g. `properties:`)
//! - `key = "value"` property lines inside those blocks
//!
//! The format is not versioned, so anything that fits none of the above is
//! dropped rather than rejected.

use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Width of a tab stop when measuring indentation.
///
/// `pacmd` indents item headers with spaces and fields with tabs, so tabs
/// have to be expanded for fields to sit deeper than their header.
pub const TAB_WIDTH: usize = 8;

/// Id of the pseudo-item produced when a dump has no `index:` header at all
pub const EMPTY_ITEM_ID: i64 = -1;

/// A value in the parsed tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNode {
    Scalar(String),
    Record(Record),
    IndexedList(IndexedList),
}

impl ParsedNode {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParsedNode::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            ParsedNode::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&IndexedList> {
        match self {
            ParsedNode::IndexedList(list) => Some(list),
            _ => None,
        }
    }
}

/// Ordered string-keyed mapping; keys keep the order they appeared in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, ParsedNode)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. A repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: ParsedNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParsedNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParsedNode::as_scalar)
    }

    pub fn record(&self, key: &str) -> Option<&Record> {
        self.get(key).and_then(ParsedNode::as_record)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParsedNode)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Items keyed by their `index:` value, plus the starred (active) one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedList {
    items: BTreeMap<i64, Record>,
    active: Option<i64>,
}

impl IndexedList {
    pub fn get(&self, id: i64) -> Option<&Record> {
        self.items.get(&id)
    }

    pub fn active_id(&self) -> Option<i64> {
        self.active
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.items.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &Record)> {
        self.items.iter().map(|(id, record)| (*id, record))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the dump carried no items, only the `-1` pseudo-item
    pub fn is_empty_marker(&self) -> bool {
        self.items.len() == 1 && self.items.contains_key(&EMPTY_ITEM_ID)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum LineKind {
    Index { id: i64, active: bool },
    Field { key: String, value: String },
    Unrecognized,
}

#[derive(Debug, Clone)]
struct Line<'a> {
    indent: usize,
    text: &'a str,
    kind: LineKind,
}

impl<'a> Line<'a> {
    fn classify(raw: &'a str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            indent: indent_width(raw),
            text,
            kind: classify_text(text),
        })
    }
}

fn indent_width(raw: &str) -> usize {
    let mut width = 0;
    for c in raw.chars() {
        match c {
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            c if c.is_whitespace() => width += 1,
            _ => break,
        }
    }
    width
}

fn classify_text(text: &str) -> LineKind {
    let (starred, rest) = match text.strip_prefix('*') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };

    if let Some(id) = rest.strip_prefix("index:") {
        if let Ok(id) = id.trim().parse::<i64>() {
            return LineKind::Index { id, active: starred };
        }
    }
    if starred {
        return LineKind::Unrecognized;
    }

    if let Some((key, value)) = text.split_once(" = ") {
        let key = key.trim();
        if !key.is_empty() && !key.contains(':') {
            return LineKind::Field {
                key: key.to_string(),
                value: unquote(value.trim()).to_string(),
            };
        }
    }

    if let Some((key, value)) = text.split_once(':') {
        let key = key.trim();
        if !key.is_empty() {
            return LineKind::Field {
                key: key.to_string(),
                value: unquote(value.trim()).to_string(),
            };
        }
    }

    LineKind::Unrecognized
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

/// Index of the first line from `start` that is not deeper than `indent`
fn block_end(lines: &[Line<'_>], start: usize, indent: usize) -> usize {
    lines[start..]
        .iter()
        .position(|line| line.indent <= indent)
        .map_or(lines.len(), |offset| start + offset)
}

struct RecordParser {
    dropped: usize,
}

impl RecordParser {
    fn parse(&mut self, lines: &[Line<'_>], record: &mut Record) {
        let mut pos = 0;
        while pos < lines.len() {
            let line = &lines[pos];
            let end = block_end(lines, pos + 1, line.indent);
            let has_block = end > pos + 1;

            match &line.kind {
                LineKind::Field { key, value } if value.is_empty() && has_block => {
                    let mut nested = Record::new();
                    self.parse(&lines[pos + 1..end], &mut nested);
                    record.insert(key.as_str(), ParsedNode::Record(nested));
                    pos = end;
                }
                LineKind::Field { key, value } => {
                    if has_block {
                        trace!(key = %key, lines = end - pos - 1, "Discarding block under scalar field");
                    }
                    record.insert(key.as_str(), ParsedNode::Scalar(value.clone()));
                    pos = end;
                }
                LineKind::Index { .. } | LineKind::Unrecognized => {
                    trace!(line = line.text, "Dropping unrecognized line");
                    self.dropped += 1;
                    pos += 1;
                }
            }
        }
    }
}

/// Parse one `pacmd list-*` dump.
///
/// Lines deeper than an `index:` header belong to that item. Text outside any
/// item is ignored, except when the dump has no items at all: then whatever
/// fields were found end up in a single item with id [`EMPTY_ITEM_ID`].
pub fn parse(text: &str) -> IndexedList {
    let lines: Vec<Line<'_>> = text.lines().filter_map(Line::classify).collect();
    let mut parser = RecordParser { dropped: 0 };
    let mut list = IndexedList::default();
    let mut loose = Record::new();

    let mut pos = 0;
    while pos < lines.len() {
        match lines[pos].kind {
            LineKind::Index { id, active } => {
                let end = block_end(&lines, pos + 1, lines[pos].indent);
                let mut record = Record::new();
                parser.parse(&lines[pos + 1..end], &mut record);
                if active {
                    list.active = Some(id);
                }
                list.items.insert(id, record);
                pos = end;
            }
            _ => {
                let end = lines[pos..]
                    .iter()
                    .position(|line| matches!(line.kind, LineKind::Index { .. }))
                    .map_or(lines.len(), |offset| pos + offset);
                parser.parse(&lines[pos..end], &mut loose);
                pos = end;
            }
        }
    }

    if list.items.is_empty() {
        list.items.insert(EMPTY_ITEM_ID, loose);
    }

    debug!(
        items = list.len(),
        active = ?list.active,
        dropped = parser.dropped,
        "Parsed pacmd output"
    );
    list
}
