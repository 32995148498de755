//! In-memory document backend for integration tests.
//!
//! A fake document is UTF-8 text with pages separated by form feeds (`\x0c`).
//! Page directives:
//!
//! - `@img q:slot q:slot ...` - no text layer; renders a 500x2000 page with a
//!   solid mark in each listed question band / option slot
//! - `@blank` - no text layer; renders an empty white page
//! - `@fail` - no text layer; rendering fails
//! - anything else is the page's text layer and renders blank
//!
//! A document starting with `%CORRUPT` cannot be opened, one starting with
//! `%PANIC` panics while opening.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use answer_sheet::{DocumentLoader, Error, Result, SheetDocument};
use image::{GrayImage, Luma};

pub const PAGE_WIDTH: u32 = 500;
pub const PAGE_HEIGHT: u32 = 2000;

#[derive(Default)]
pub struct FakeLoader {
    pub renders: AtomicUsize,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

pub struct FakeDocument<'a> {
    pages: Vec<&'a str>,
    renders: &'a AtomicUsize,
}

impl DocumentLoader for FakeLoader {
    type Document<'a> = FakeDocument<'a>;

    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<FakeDocument<'a>> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| Error::MalformedDocument(e.to_string()))?;
        if text.starts_with("%CORRUPT") {
            return Err(Error::MalformedDocument("bad header".to_string()));
        }
        if text.starts_with("%PANIC") {
            panic!("backend crashed");
        }
        Ok(FakeDocument {
            pages: text.split('\x0c').collect(),
            renders: &self.renders,
        })
    }
}

impl SheetDocument for FakeDocument<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<String> {
        let content = self.pages[page];
        if content.starts_with('@') {
            Ok(String::new())
        } else {
            Ok(content.to_string())
        }
    }

    fn render_page(&self, page: usize, _scale: f32) -> Result<GrayImage> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let content = self.pages[page];
        if content.starts_with("@fail") {
            return Err(Error::Rasterization {
                page,
                reason: "renderer crashed".to_string(),
            });
        }

        let mut bitmap = GrayImage::from_pixel(PAGE_WIDTH, PAGE_HEIGHT, Luma([255]));
        if let Some(marks) = content.strip_prefix("@img") {
            for mark in marks.split_whitespace() {
                let (question, slot) = mark.split_once(':').expect("mark as q:slot");
                paint_mark(
                    &mut bitmap,
                    question.parse().expect("question number"),
                    slot.parse().expect("slot index"),
                );
            }
        }
        Ok(bitmap)
    }
}

/// Paint a 10x10 ink square inside a question band and option slot.
pub fn paint_mark(bitmap: &mut GrayImage, question: u32, slot: u32) {
    let band_height = PAGE_HEIGHT / 20;
    let slot_width = PAGE_WIDTH / 5;
    let y0 = (question - 1) * band_height + 20;
    let x0 = slot * slot_width + 20;
    for y in y0..y0 + 10 {
        for x in x0..x0 + 10 {
            bitmap.put_pixel(x, y, Luma([0]));
        }
    }
}

/// Join page strings into fake document bytes.
pub fn document(pages: &[&str]) -> Vec<u8> {
    pages.join("\x0c").into_bytes()
}
