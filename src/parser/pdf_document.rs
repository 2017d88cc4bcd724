//! lopdf-backed document handle.

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::Rect;

use super::backend::{decode_text_string, AnnotationRead, PdfBackend, RawAnnotation};

/// An open PDF document.
///
/// Owns the parsed lopdf document for the duration of one extraction.
/// Dropping the handle releases it, so every exit path (including `?` on an
/// extraction error) closes the document.
pub struct PdfDocument {
    doc: LopdfDocument,
    /// Page object ids in page order
    pages: Vec<ObjectId>,
    source: String,
    path: PathBuf,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Reject non-PDF content before lopdf tries to parse it
        let format = detect_format_from_path(path).map_err(|e| match e {
            Error::Io(io) => Error::document_open(path, io.to_string()),
            other => other,
        })?;
        if format.header_offset > 0 {
            log::debug!(
                "{}: {} header at byte {}",
                path.display(),
                format,
                format.header_offset
            );
        }

        let doc = LopdfDocument::load(path).map_err(|e| open_error(path, e))?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::from_lopdf(doc, source, path.to_path_buf()))
    }

    /// Open a PDF held in memory. `source` names it in results and logs.
    pub fn from_bytes(data: &[u8], source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let doc = LopdfDocument::load_mem(data).map_err(|e| open_error(Path::new(&source), e))?;
        let path = PathBuf::from(&source);
        Ok(Self::from_lopdf(doc, source, path))
    }

    fn from_lopdf(doc: LopdfDocument, source: String, path: PathBuf) -> Self {
        if doc.is_encrypted() {
            log::warn!("{} is encrypted; text and annotations may be unreadable", source);
        }

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        log::debug!("opened {} ({} pages)", source, pages.len());

        Self {
            doc,
            pages,
            source,
            path,
        }
    }

    /// Path the document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PDF version string from the header.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(page as usize)
            .copied()
            .ok_or_else(|| Error::PageRead {
                page,
                reason: format!("out of range (document has {} pages)", self.pages.len()),
            })
    }

    /// Make sure every content stream of a page can be reached and decoded.
    ///
    /// lopdf's text extraction reports an unreadable stream as an empty page,
    /// so the streams are checked up front.
    fn check_contents(&self, page: u32, page_id: ObjectId) -> Result<()> {
        let page_error = |reason: String| Error::PageRead { page, reason };

        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| page_error(e.to_string()))?;
        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => self
                .resolve(obj)
                .map_err(|e| page_error(format!("unresolvable /Contents: {}", e)))?,
            Err(_) => return Ok(()),
        };

        let entries: Vec<&Object> = match contents {
            Object::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for entry in entries {
            let stream = self
                .resolve(entry)
                .and_then(|obj| obj.as_stream())
                .map_err(|e| page_error(format!("unreadable content stream: {}", e)))?;
            if !stream.dict.has(b"Filter") {
                continue;
            }

            let decoded = stream
                .decompressed_content()
                .map_err(|e| page_error(format!("undecodable content stream: {}", e)))?;
            if decoded.is_empty() && !stream.content.is_empty() {
                return Err(page_error(
                    "undecodable content stream: no data after decoding".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Follow an indirect reference, if `obj` is one.
    fn resolve<'a>(&'a self, obj: &'a Object) -> lopdf::Result<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id),
            other => Ok(other),
        }
    }

    fn read_annotation(&self, entry: &Object) -> AnnotationRead {
        let dict = self
            .resolve(entry)
            .and_then(|obj| obj.as_dict())
            .map_err(|e| format!("not a dictionary: {}", e))?;

        let subtype = dict
            .get(b"Subtype")
            .ok()
            .and_then(|obj| self.resolve(obj).ok())
            .and_then(|obj| obj.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).into_owned());

        let rect = self.read_rect(dict)?;

        Ok(RawAnnotation {
            subtype,
            contents: self.read_string(dict, b"Contents"),
            author: self.read_string(dict, b"T"),
            rect,
        })
    }

    fn read_rect(&self, dict: &Dictionary) -> std::result::Result<Rect, String> {
        let array = dict
            .get(b"Rect")
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_array())
            .map_err(|e| format!("missing /Rect: {}", e))?;

        if array.len() != 4 {
            return Err(format!("/Rect has {} values, expected 4", array.len()));
        }

        let mut rect = [0.0f32; 4];
        for (slot, value) in rect.iter_mut().zip(array) {
            *slot = self
                .resolve(value)
                .and_then(|obj| obj.as_float())
                .map_err(|e| format!("non-numeric /Rect value: {}", e))?;
        }
        Ok(rect)
    }

    fn read_string(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        let obj = self.resolve(dict.get(key).ok()?).ok()?;
        match obj {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

impl PdfBackend for PdfDocument {
    fn source_name(&self) -> &str {
        &self.source
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let page_id = self.page_id(page)?;
        self.check_contents(page, page_id)?;
        // lopdf numbers pages from 1
        self.doc
            .extract_text(&[page + 1])
            .map_err(|e| Error::PageRead {
                page,
                reason: e.to_string(),
            })
    }

    fn page_annotations(&self, page: u32) -> Result<Vec<AnnotationRead>> {
        let page_id = self.page_id(page)?;
        let page_error = |e: lopdf::Error| Error::PageRead {
            page,
            reason: e.to_string(),
        };

        let page_dict = self.doc.get_dictionary(page_id).map_err(page_error)?;
        let annots = match page_dict.get(b"Annots") {
            Ok(obj) => self.resolve(obj).map_err(page_error)?,
            Err(_) => return Ok(Vec::new()),
        };
        let entries = annots.as_array().map_err(page_error)?;

        Ok(entries
            .iter()
            .map(|entry| self.read_annotation(entry))
            .collect())
    }
}

impl Drop for PdfDocument {
    fn drop(&mut self) {
        log::debug!("closed {}", self.source);
    }
}

fn open_error(path: &Path, err: lopdf::Error) -> Error {
    match err {
        lopdf::Error::Decryption(_) => Error::document_open(path, "document is encrypted"),
        other => Error::document_open(path, other.to_string()),
    }
}
