//! Annotation records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounding rectangle in PDF user space: `[x0, y0, x1, y1]`.
pub type Rect = [f32; 4];

/// A single markup annotation read from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Page index (0-based)
    pub page: u32,

    /// Annotation type
    #[serde(rename = "type")]
    pub kind: AnnotationKind,

    /// Text content (`/Contents`); empty when the annotation carries none
    pub content: String,

    /// Author (`/T`), if present
    pub author: Option<String>,

    /// Bounding rectangle (`/Rect`)
    pub rect: Rect,
}

impl Annotation {
    /// Create an annotation with empty content and no author.
    pub fn new(page: u32, kind: AnnotationKind, rect: Rect) -> Self {
        Self {
            page,
            kind,
            content: String::new(),
            author: None,
            rect,
        }
    }

    /// Set the text content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Annotation type.
///
/// Known PDF subtypes map to stable lowercase labels; anything else keeps the
/// raw `/Subtype` value so that no annotation is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationKind {
    /// Sticky note (`/Text`)
    Comment,
    Highlight,
    Underline,
    StrikeOut,
    Squiggly,
    FreeText,
    Ink,
    Square,
    Circle,
    Line,
    Polygon,
    PolyLine,
    Stamp,
    Caret,
    Popup,
    Link,
    FileAttachment,
    /// Any subtype not listed above, by raw name
    Other(String),
}

/// (PDF subtype, label) pairs for the known kinds.
const KNOWN_KINDS: &[(&str, &str, AnnotationKind)] = &[
    ("Text", "comment", AnnotationKind::Comment),
    ("Highlight", "highlight", AnnotationKind::Highlight),
    ("Underline", "underline", AnnotationKind::Underline),
    ("StrikeOut", "strike-out", AnnotationKind::StrikeOut),
    ("Squiggly", "squiggly", AnnotationKind::Squiggly),
    ("FreeText", "free-text", AnnotationKind::FreeText),
    ("Ink", "ink", AnnotationKind::Ink),
    ("Square", "square", AnnotationKind::Square),
    ("Circle", "circle", AnnotationKind::Circle),
    ("Line", "line", AnnotationKind::Line),
    ("Polygon", "polygon", AnnotationKind::Polygon),
    ("PolyLine", "polyline", AnnotationKind::PolyLine),
    ("Stamp", "stamp", AnnotationKind::Stamp),
    ("Caret", "caret", AnnotationKind::Caret),
    ("Popup", "popup", AnnotationKind::Popup),
    ("Link", "link", AnnotationKind::Link),
    ("FileAttachment", "file-attachment", AnnotationKind::FileAttachment),
];

impl AnnotationKind {
    /// Map a PDF `/Subtype` name to a kind.
    ///
    /// A subtype spelled like a label (`/highlight`) maps to that kind;
    /// `Other` never holds a known label.
    pub fn from_subtype(subtype: &str) -> Self {
        KNOWN_KINDS
            .iter()
            .find(|(name, _, _)| *name == subtype)
            .map(|(_, _, kind)| kind.clone())
            .unwrap_or_else(|| AnnotationKind::from_label(subtype))
    }

    /// Map a serialized label back to a kind.
    pub fn from_label(label: &str) -> Self {
        KNOWN_KINDS
            .iter()
            .find(|(_, known, _)| *known == label)
            .map(|(_, _, kind)| kind.clone())
            .unwrap_or_else(|| AnnotationKind::Other(label.to_string()))
    }

    /// Serialized label.
    pub fn label(&self) -> &str {
        if let AnnotationKind::Other(raw) = self {
            return raw;
        }
        KNOWN_KINDS
            .iter()
            .find(|(_, _, kind)| kind == self)
            .map(|(_, label, _)| *label)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for AnnotationKind {
    fn from(label: String) -> Self {
        AnnotationKind::from_label(&label)
    }
}

impl From<AnnotationKind> for String {
    fn from(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}
