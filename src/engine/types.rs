// src/engine/types.rs
use crate::source::SourceKind;

/// Where a field's value starts.
#[derive(Clone, Copy, Debug)]
pub enum Marker {
    /// Markup text node exactly equal to the string
    Text(&'static str),
    /// First markup element carrying the class
    Class(&'static str),
    /// First text line containing the substring
    Line(&'static str),
    /// JSON pointers into the document, first non-null wins
    Pointer(&'static [&'static str]),
    /// The document identifier itself
    Identifier,
}

/// How far a `Between` slice runs.
#[derive(Clone, Copy, Debug)]
pub enum Close {
    /// Up to the last occurrence of the string
    Before(&'static str),
    /// Up to `n` bytes before the last occurrence of the string
    BackOff(&'static str, usize),
}

/// What to cut out once the marker is found.
#[derive(Clone, Copy, Debug)]
pub enum Slice {
    /// The located node, line or value as is
    Whole,
    /// Text of the node `n` places after the marker in document order
    NextElement(usize),
    /// Last `n` characters of the line
    Tail(usize),
    /// Line from `n` characters past the marker start
    Offset(usize),
    /// From after the last `open` to the first matching close (or end of line)
    Between { open: &'static str, close: &'static [Close] },
}

/// Typed clean-up after slicing and stripping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Post {
    None,
    /// Raw ticket number → `PUR-nnnn` / `NOC-nnnnn`
    TicketRef,
    /// ISO timestamp → `MM-DD-YYYY`
    SheetDate,
    /// Spaces → `_`, dots removed
    SiteKey,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldAnchor {
    pub field: &'static str,
    pub marker: Marker,
    pub slice: Slice,
    /// Character sets trimmed off both ends, one pass per entry
    pub strip: &'static [&'static str],
    pub post: Post,
    pub default: &'static str,
}

/// The fixed, exhaustive anchor set of one source kind.
#[derive(Debug)]
pub struct FieldTable {
    pub kind: SourceKind,
    pub anchors: &'static [FieldAnchor],
    /// Field whose default means "this identifier does not exist"
    pub sentinel: Option<&'static str>,
}

impl FieldTable {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.anchors.iter().map(|a| a.field)
    }
}

/// Why a field fell back to its default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Miss {
    AnchorMissing,
    EmptySlice,
    Malformed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStatus {
    Extracted,
    Defaulted(Miss),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldValue {
    pub name: &'static str,
    pub value: String,
    pub status: FieldStatus,
}

/// Every declared field, in declaration order. Never partially populated.
#[derive(Clone, Debug)]
pub struct ExtractedRecord {
    kind: SourceKind,
    identifier: String,
    fields: Vec<FieldValue>,
    sentinel: Option<&'static str>,
}

impl ExtractedRecord {
    pub(crate) fn new(
        kind: SourceKind,
        identifier: String,
        fields: Vec<FieldValue>,
        sentinel: Option<&'static str>,
    ) -> Self {
        Self { kind, identifier, fields, sentinel }
    }

    pub fn kind(&self) -> SourceKind { self.kind }
    pub fn identifier(&self) -> &str { &self.identifier }
    pub fn fields(&self) -> &[FieldValue] { &self.fields }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.value.as_str())
    }

    /// Fields that fell back to their default, with the reason.
    pub fn misses(&self) -> impl Iterator<Item = (&'static str, Miss)> + '_ {
        self.fields.iter().filter_map(|f| match f.status {
            FieldStatus::Defaulted(m) => Some((f.name, m)),
            FieldStatus::Extracted => None,
        })
    }

    /// The page exists but carries the "does not exist" placeholder: the
    /// sentinel field is absent or empty. A value that is present but
    /// unparseable is an ordinary miss.
    pub fn is_sentinel(&self) -> bool {
        self.sentinel.and_then(|name| self.field(name)).is_some_and(|f| {
            matches!(f.status, FieldStatus::Defaulted(Miss::AnchorMissing | Miss::EmptySlice))
        })
    }
}
