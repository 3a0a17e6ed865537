use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::RgbaImage;
use thiserror::Error;

use super::rgba::blend_pixel;
use super::{FontFamily, FontSpec};
use crate::geometry::{Color, ImagePoint};

pub type FontResult<T> = std::result::Result<T, FontError>;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid font data in {path}")]
    Parse { path: PathBuf },
}

/// Fonts available to the text primitive, keyed by family.
#[derive(Clone, Default)]
pub struct FontBook {
    fonts: HashMap<FontFamily, FontArc>,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut families = self.fonts.keys().map(|family| family.as_str()).collect::<Vec<_>>();
        families.sort_unstable();
        f.debug_struct("FontBook").field("families", &families).finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: FontFamily, font: FontArc) {
        self.fonts.insert(family, font);
    }

    pub fn load_file(&mut self, family: FontFamily, path: &Path) -> FontResult<()> {
        let bytes = fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|_| FontError::Parse {
            path: path.to_path_buf(),
        })?;
        tracing::debug!(family = family.as_str(), ?path, "loaded font");
        self.insert(family, font);
        Ok(())
    }

    pub fn contains(&self, family: FontFamily) -> bool {
        self.fonts.contains_key(&family)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Renders `text` with its top-left corner at `at`. Returns `false` when the
    /// requested family has no font loaded.
    pub(super) fn draw(
        &self,
        image: &mut RgbaImage,
        at: ImagePoint,
        text: &str,
        color: Color,
        spec: &FontSpec,
    ) -> bool {
        let Some(font) = self.fonts.get(&spec.family) else {
            return false;
        };

        let scaled = font.as_scaled(PxScale::from(spec.size.max(1) as f32));
        let line_advance = scaled.height() + scaled.line_gap();
        let origin_x = at.x as f32;
        let mut caret = point(origin_x, at.y as f32 + scaled.ascent());

        for ch in text.chars() {
            if ch == '\n' {
                caret.x = origin_x;
                caret.y += line_advance;
                continue;
            }
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = caret;
            caret.x += scaled.h_advance(glyph.id);

            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = i64::from(x) + bounds.min.x as i64;
                let py = i64::from(y) + bounds.min.y as i64;
                blend_pixel(image, px, py, color, coverage);
            });
        }
        true
    }
}
