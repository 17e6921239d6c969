//! Font registration and DPI-aware text styles.
//!
//! Plotters is built without its system font backend, so chart text needs a
//! TrueType file registered with `ab_glyph` before drawing. We look for one
//! once per process: an explicit `--font` / `INSIGHTS_FONT` path first, then
//! a short list of common system locations. Without a font the charts are
//! still drawn, just without captions, tick labels or legends.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{BLACK, FontDesc, FontFamily, FontStyle, TextStyle, register_font};

const SYSTEM_FONTS: [&str; 9] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register a sans-serif font for chart text. Returns whether text can be drawn.
///
/// Only the first call does any work; later calls return the cached outcome.
pub fn init_fonts(explicit: Option<&Path>) -> bool {
    *FONT_READY.get_or_init(|| {
        let candidates = explicit
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            match try_register(&path) {
                Ok(()) => {
                    log::debug!("chart font: {}", path.display());
                    return true;
                }
                Err(e) if explicit == Some(path.as_path()) => {
                    log::warn!("Could not use font '{}': {e}", path.display());
                }
                Err(_) => {}
            }
        }

        log::warn!(
            "No TrueType font found; charts will be rendered without text (use --font to set one)."
        );
        false
    })
}

fn try_register(path: &Path) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    // ab_glyph keeps a reference to the font data for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    for style in [FontStyle::Normal, FontStyle::Bold] {
        register_font(FontFamily::SansSerif.as_str(), style, bytes)
            .map_err(|_| format!("'{}' is not a valid TrueType font", path.display()))?;
    }
    Ok(())
}

/// Converts point sizes to pixels for a given DPI, and hands out text styles
/// only when a font is available.
#[derive(Debug, Clone, Copy)]
pub struct Typography {
    text: bool,
    scale: f64,
}

impl Typography {
    pub fn new(text: bool, dpi: u32) -> Self {
        Self {
            text,
            scale: f64::from(dpi) / 72.0,
        }
    }

    pub fn has_text(&self) -> bool {
        self.text
    }

    /// Points to pixels.
    pub fn px(&self, pt: f64) -> f64 {
        pt * self.scale
    }

    /// Points to whole pixels, at least one.
    pub fn px_u32(&self, pt: f64) -> u32 {
        self.px(pt).round().max(1.0) as u32
    }

    pub fn text(&self, pt: f64) -> Option<TextStyle<'static>> {
        self.text.then(|| {
            FontDesc::new(FontFamily::SansSerif, self.px(pt), FontStyle::Normal).color(&BLACK)
        })
    }

    pub fn bold(&self, pt: f64) -> Option<TextStyle<'static>> {
        self.text.then(|| {
            FontDesc::new(FontFamily::SansSerif, self.px(pt), FontStyle::Bold).color(&BLACK)
        })
    }
}
