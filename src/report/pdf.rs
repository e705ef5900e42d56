// src/report/pdf.rs

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

use crate::errors::Result;
use crate::report::{Canvas, Font, PAGE_HEIGHT, PAGE_WIDTH};

/// A [`Canvas`] that collects content-stream operations per page and
/// assembles them into a PDF document with lopdf.
pub struct PdfCanvas {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    font: Font,
    size: i64,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            font: Font::Helvetica,
            size: 12,
        }
    }

    /// Builds the document. The page being drawn on is included even if empty.
    pub fn finish(mut self) -> Result<Document> {
        self.pages.push(std::mem::take(&mut self.current));

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(resource_name(font), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let mut doc = self.finish()?;
        doc.save(path)?;
        Ok(())
    }
}

impl Canvas for PdfCanvas {
    fn set_font(&mut self, font: Font, size: i64) {
        self.font = font;
        self.size = size;
    }

    fn draw_text(&mut self, x: i64, y: i64, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![resource_name(self.font).into(), self.size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }
}

fn resource_name(font: Font) -> &'static str {
    match font {
        Font::Helvetica => "F1",
        Font::HelveticaBold => "F2",
        Font::Courier => "F3",
    }
}

/// Encodes text for the standard fonts. Latin-1 maps straight onto
/// WinAnsi; everything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x09 => b' ',
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
