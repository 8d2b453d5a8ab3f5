//! # Font — glyph metrics and atlas rasterization
//!
//! The text layer needs two things per character: where its cell sits in a
//! font atlas (UV rectangle) and how to advance the layout cursor (metrics).
//! [`Font`] is that table, and it is plain data — tests and custom atlas
//! pipelines can build one by hand with [`Font::from_glyphs`].
//!
//! [`rasterize_font`] (behind the `text` feature) builds the table the easy
//! way: [fontdue](https://docs.rs/fontdue) rasterizes ASCII 32–126 at a
//! requested pixel size, the bitmaps are row-packed into a fixed-size RGBA
//! atlas (`[255, 255, 255, coverage]`), and the resulting pixels upload into
//! the shared [`TextureArray`](super::texture::TextureArray) like any other
//! layer. White texels with coverage alpha mean the glyph shader's
//! `color × coverage` path tints text for free.

/// Per-glyph metrics and atlas UV coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// UV rectangle in the atlas (normalized 0..1, V grows downward).
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
    /// Horizontal advance to the next glyph (in pixels).
    pub advance: f32,
    /// Horizontal offset from cursor to glyph left edge.
    pub offset_x: f32,
    /// Vertical offset: distance from baseline to glyph bottom (Y-up).
    pub offset_y: f32,
    /// Glyph pixel dimensions.
    pub width: f32,
    pub height: f32,
}

/// Glyph table for one font at one pixel size. ASCII 32–126.
#[derive(Debug, Clone)]
pub struct Font {
    glyphs: Vec<Option<Glyph>>,
    line_height: f32,
}

impl Font {
    /// Build a table directly from glyph entries indexed by
    /// `char as u32 - 32`.
    pub fn from_glyphs(glyphs: Vec<Option<Glyph>>, line_height: f32) -> Self {
        Self {
            glyphs,
            line_height,
        }
    }

    /// Look up a character. Returns `None` outside ASCII 32–126 or for
    /// glyphs that didn't fit the atlas.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        let idx = ch as u32;
        if !(32..=126).contains(&idx) {
            return None;
        }
        self.glyphs.get((idx - 32) as usize)?.as_ref()
    }

    /// Vertical advance for newlines, in pixels.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// A rasterized font: the metric table plus the atlas bitmap to upload.
#[cfg(feature = "text")]
pub struct FontAtlas {
    pub font: Font,
    /// RGBA8 pixels, `size` × `size`.
    pub pixels: Vec<u8>,
    pub size: u32,
}

#[cfg(feature = "text")]
const ATLAS_SIZE: u32 = 512;
#[cfg(feature = "text")]
const GLYPH_PADDING: u32 = 1;

/// Rasterize a TTF/OTF font from disk at the given pixel size.
///
/// ASCII 32–126 is packed row-by-row into a 512×512 atlas with 1px padding.
/// Characters that overflow the atlas are logged and skipped.
#[cfg(feature = "text")]
pub fn rasterize_font(path: &str, size: f32) -> FontAtlas {
    let font_data =
        std::fs::read(path).unwrap_or_else(|e| panic!("Failed to read font '{}': {}", path, e));

    let font = fontdue::Font::from_bytes(
        font_data,
        fontdue::FontSettings {
            scale: size,
            ..Default::default()
        },
    )
    .unwrap_or_else(|e| panic!("Failed to parse font '{}': {}", path, e));

    let atlas_w = ATLAS_SIZE;
    let atlas_h = ATLAS_SIZE;
    let mut atlas_rgba = vec![0u8; (atlas_w * atlas_h * 4) as usize];
    let mut cursor_x: u32 = GLYPH_PADDING;
    let mut cursor_y: u32 = GLYPH_PADDING;
    let mut row_height: u32 = 0;

    let mut glyphs: Vec<Option<Glyph>> = Vec::with_capacity(95);
    let line_height = size * 1.2;

    for code in 32u8..=126 {
        let ch = code as char;
        let (metrics, bitmap) = font.rasterize(ch, size);
        let gw = metrics.width as u32;
        let gh = metrics.height as u32;

        // Space and other zero-size glyphs: advance only.
        if gw == 0 || gh == 0 {
            glyphs.push(Some(Glyph {
                u_min: 0.0,
                v_min: 0.0,
                u_max: 0.0,
                v_max: 0.0,
                advance: metrics.advance_width,
                offset_x: 0.0,
                offset_y: 0.0,
                width: 0.0,
                height: 0.0,
            }));
            continue;
        }

        // Wrap to the next row if needed.
        if cursor_x + gw + GLYPH_PADDING > atlas_w {
            cursor_x = GLYPH_PADDING;
            cursor_y += row_height + GLYPH_PADDING;
            row_height = 0;
        }

        if cursor_y + gh + GLYPH_PADDING > atlas_h {
            log::warn!(
                "Font atlas overflow at char '{}' (U+{:04X}) — atlas too small",
                ch,
                ch as u32
            );
            glyphs.push(None);
            continue;
        }

        // Copy glyph coverage into the atlas as [255, 255, 255, alpha].
        for gy in 0..gh {
            for gx in 0..gw {
                let src_idx = (gy * gw + gx) as usize;
                let dst_x = cursor_x + gx;
                let dst_y = cursor_y + gy;
                let dst_idx = ((dst_y * atlas_w + dst_x) * 4) as usize;
                let alpha = bitmap[src_idx];
                atlas_rgba[dst_idx] = 255;
                atlas_rgba[dst_idx + 1] = 255;
                atlas_rgba[dst_idx + 2] = 255;
                atlas_rgba[dst_idx + 3] = alpha;
            }
        }

        glyphs.push(Some(Glyph {
            u_min: cursor_x as f32 / atlas_w as f32,
            v_min: cursor_y as f32 / atlas_h as f32,
            u_max: (cursor_x + gw) as f32 / atlas_w as f32,
            v_max: (cursor_y + gh) as f32 / atlas_h as f32,
            advance: metrics.advance_width,
            offset_x: metrics.xmin as f32,
            offset_y: metrics.ymin as f32,
            width: gw as f32,
            height: gh as f32,
        }));

        cursor_x += gw + GLYPH_PADDING;
        row_height = row_height.max(gh);
    }

    FontAtlas {
        font: Font::from_glyphs(glyphs, line_height),
        pixels: atlas_rgba,
        size: ATLAS_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_font() -> Font {
        let mut glyphs = vec![None; 95];
        glyphs[('A' as usize) - 32] = Some(Glyph {
            u_min: 0.0,
            v_min: 0.0,
            u_max: 0.1,
            v_max: 0.1,
            advance: 10.0,
            offset_x: 1.0,
            offset_y: 0.0,
            width: 8.0,
            height: 12.0,
        });
        Font::from_glyphs(glyphs, 16.0)
    }

    #[test]
    fn lookup_is_ascii_bounded() {
        let font = test_font();
        assert!(font.glyph('A').is_some());
        assert!(font.glyph('B').is_none()); // present slot, empty entry
        assert!(font.glyph('\n').is_none());
        assert!(font.glyph('é').is_none());
    }

    #[test]
    fn metrics_round_trip() {
        let font = test_font();
        let glyph = font.glyph('A').unwrap();
        assert_eq!(glyph.advance, 10.0);
        assert_eq!(font.line_height(), 16.0);
    }
}
