//! Pixel-density fallback scanner.
//!
//! Used when a page has no usable text layer (a scanned sheet). The rendered
//! page is cut into `band_divisions` equal horizontal bands and the first
//! `max_bands` are treated as questions 1..=max_bands. A band with enough ink
//! is split into `option_slots` equal columns; the leftmost column with enough
//! ink is the selected option.
//!
//! Only the a..e grid is modelled. True/false answers are never produced here.

use image::GrayImage;

use crate::answers::{DetectedAnswers, QuestionNumber, Symbol};
use crate::config::ImageScanConfig;

/// Convert a packed RGBA buffer to 8-bit grayscale (ITU-R 601-2 luma, alpha ignored).
///
/// Returns `None` when the buffer does not hold `width * height` pixels.
pub fn rgba_to_gray(width: u32, height: u32, rgba: &[u8]) -> Option<GrayImage> {
    let pixels = (width as usize).checked_mul(height as usize)?;
    if rgba.len() != pixels.checked_mul(4)? {
        return None;
    }

    let luma: Vec<u8> = rgba
        .chunks_exact(4)
        .map(|px| {
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            ((r * 299 + g * 587 + b * 114) / 1000) as u8
        })
        .collect();

    GrayImage::from_raw(width, height, luma)
}

/// Count pixels darker than `threshold` inside `[x0, x1) x [y0, y1)`.
fn count_dark(page: &GrayImage, x0: u32, x1: u32, y0: u32, y1: u32, threshold: u8) -> u32 {
    let width = page.width() as usize;
    let raw = page.as_raw();
    let mut dark = 0;
    for y in y0..y1 {
        let row_start = y as usize * width;
        let row = &raw[row_start + x0 as usize..row_start + x1 as usize];
        dark += row.iter().filter(|&&v| v < threshold).count() as u32;
    }
    dark
}

/// Scan a grayscale page bitmap for marked options.
///
/// Never returns question numbers above `config.max_bands`.
pub fn scan_image(page: &GrayImage, config: &ImageScanConfig) -> DetectedAnswers {
    let mut answers = DetectedAnswers::new();
    let (width, height) = page.dimensions();
    if config.band_divisions == 0 || config.option_slots == 0 {
        return answers;
    }

    let band_height = height / config.band_divisions;
    if band_height == 0 || width == 0 {
        log::debug!("Page {}x{} too small for {} bands", width, height, config.band_divisions);
        return answers;
    }

    let slots = config.option_slots.min(Symbol::MULTIPLE_CHOICE.len() as u32);

    for band in 0..config.max_bands {
        let y0 = band * band_height;
        let y1 = y0 + band_height;
        if y1 > height {
            break;
        }

        let band_dark = count_dark(page, 0, width, y0, y1, config.dark_threshold);
        if band_dark <= config.band_min_dark {
            continue;
        }

        let question: QuestionNumber = band + 1;
        for slot in 0..slots {
            let x0 = (width as u64 * slot as u64 / slots as u64) as u32;
            let x1 = (width as u64 * (slot as u64 + 1) / slots as u64) as u32;
            let slot_dark = count_dark(page, x0, x1, y0, y1, config.dark_threshold);
            if slot_dark > config.slot_min_dark {
                if let Some(symbol) = Symbol::from_option_slot(slot as usize) {
                    log::debug!(
                        "Question {} marked '{}' by density ({} dark px in slot, {} in band)",
                        question,
                        symbol,
                        slot_dark,
                        band_dark
                    );
                    answers.insert(question, symbol);
                }
                break;
            }
        }
    }

    answers
}
