//! Mark detection for a single page.
//!
//! - [`text`] reads the page's text layer and is always tried first
//! - [`density`] counts dark pixels on a rendered bitmap, used only while a
//!   document has produced no answers at all

pub mod density;
pub mod text;

pub use density::{rgba_to_gray, scan_image};
pub use text::{detect_mark, scan_text, ScanState, MARK_GLYPH};
