//! Synthetic PDFs for integration tests, built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

/// An annotation to place on a generated page.
pub struct AnnotSpec {
    pub subtype: &'static str,
    pub contents: Option<&'static str>,
    pub author: Option<&'static str>,
    pub rect: [i64; 4],
}

impl AnnotSpec {
    pub fn new(subtype: &'static str, rect: [i64; 4]) -> Self {
        Self {
            subtype,
            contents: None,
            author: None,
            rect,
        }
    }

    pub fn contents(mut self, contents: &'static str) -> Self {
        self.contents = Some(contents);
        self
    }

    pub fn author(mut self, author: &'static str) -> Self {
        self.author = Some(author);
        self
    }
}

/// How a generated page's content stream is damaged.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    None,
    /// `/FlateDecode` stream whose bytes are not zlib data
    BadFlate,
    /// `/Contents` points at an object that does not exist
    DanglingContents,
}

/// A page to generate: one line of text plus annotations.
pub struct PageSpec {
    pub text: &'static str,
    pub annotations: Vec<AnnotSpec>,
    pub damage: Damage,
}

impl PageSpec {
    pub fn text(text: &'static str) -> Self {
        Self {
            text,
            annotations: Vec::new(),
            damage: Damage::None,
        }
    }

    pub fn damaged(damage: Damage) -> Self {
        Self {
            text: "",
            annotations: Vec::new(),
            damage,
        }
    }

    pub fn annotate(mut self, annot: AnnotSpec) -> Self {
        self.annotations.push(annot);
        self
    }
}

/// Build a PDF with the given pages and return its bytes.
pub fn build_pdf(pages: &[PageSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(page.text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let contents: Object = match page.damage {
            Damage::None => doc
                .add_object(Stream::new(
                    dictionary! {},
                    content.encode().expect("encode content"),
                ))
                .into(),
            Damage::BadFlate => doc
                .add_object(Stream::new(
                    dictionary! { "Filter" => "FlateDecode" },
                    b"this is not zlib data".to_vec(),
                ))
                .into(),
            Damage::DanglingContents => Object::Reference((9999, 0)),
        };

        let mut annot_refs: Vec<Object> = Vec::new();
        for annot in &page.annotations {
            let mut dict = dictionary! {
                "Type" => "Annot",
                "Subtype" => Object::Name(annot.subtype.as_bytes().to_vec()),
                "Rect" => annot.rect.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
            };
            if let Some(contents) = annot.contents {
                dict.set("Contents", Object::string_literal(contents));
            }
            if let Some(author) = annot.author {
                dict.set("T", Object::string_literal(author));
            }
            annot_refs.push(doc.add_object(dict).into());
        }

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
        };
        if !annot_refs.is_empty() {
            page_dict.set("Annots", annot_refs);
        }
        kids.push(doc.add_object(page_dict).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save pdf");
    buffer
}

/// Write a generated PDF to `path`.
pub fn write_pdf(path: &Path, pages: &[PageSpec]) {
    std::fs::write(path, build_pdf(pages)).expect("write pdf");
}
