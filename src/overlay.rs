use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};
use log::{debug, error, info};

use crate::{
    error::RenderError,
    face::{CONFIDENCE_THRESHOLD, FaceMatch, PixelRect},
};

#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Matches must score strictly above this to be drawn.
    pub threshold: f32,
    /// Rectangle outline thickness in pixels, drawn inward.
    pub stroke_width: u32,
    /// How far above the box top the label starts.
    pub label_offset: i32,
    pub box_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    pub font_scale: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            threshold: CONFIDENCE_THRESHOLD,
            stroke_width: 3,
            label_offset: 20,
            box_color: Rgb([255, 0, 0]),
            text_color: Rgb([255, 255, 255]),
            font_scale: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing to draw; no file was written.
    Skipped,
    Saved { output: PathBuf, drawn: usize },
}

/// Draws face matches onto images. Without a font only the boxes are drawn.
pub struct Annotator {
    style: OverlayStyle,
    font: Option<FontVec>,
}

impl Annotator {
    pub fn new(style: OverlayStyle, font: Option<FontVec>) -> Self {
        Self { style, font }
    }

    pub fn load_font(path: &Path) -> Result<FontVec, RenderError> {
        let data = std::fs::read(path).map_err(|e| RenderError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        FontVec::try_from_vec(data).map_err(|e| RenderError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Draws every match above the threshold, in input order, and returns
    /// how many were drawn. Overlapping labels simply paint over each other.
    pub fn draw_matches(&self, image: &mut RgbImage, matches: &[FaceMatch]) -> usize {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return 0;
        }

        let mut drawn = 0;
        for face in matches {
            if !face.passes(self.style.threshold) {
                debug!("skipping {} at confidence {:.2}", face.name, face.confidence);
                continue;
            }

            let rect = PixelRect::from_fractions(&face.bounding_box, width, height);
            self.draw_box(image, &rect);
            self.draw_label(image, &rect, &face.name);
            drawn += 1;
        }
        drawn
    }

    fn draw_box(&self, image: &mut RgbImage, rect: &PixelRect) {
        let (w, h) = (rect.width(), rect.height());
        for i in 0..self.style.stroke_width {
            if w <= 2 * i || h <= 2 * i {
                break;
            }
            let inset = Rect::at(rect.left + i as i32, rect.top + i as i32)
                .of_size(w - 2 * i, h - 2 * i);
            draw_hollow_rect_mut(image, inset, self.style.box_color);
        }
    }

    fn draw_label(&self, image: &mut RgbImage, rect: &PixelRect, text: &str) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(self.style.font_scale);
        let (x, y) = (rect.left, rect.top - self.style.label_offset);

        let (text_w, text_h) = text_size(scale, font, text);
        if text_w > 0 && text_h > 0 {
            draw_filled_rect_mut(
                image,
                Rect::at(x, y).of_size(text_w, text_h),
                self.style.box_color,
            );
        }
        draw_text_mut(image, self.style.text_color, x, y, scale, font, text);
    }

    /// Draws `matches` onto a fresh copy of `source` and saves it to
    /// `output`. The source file is never modified.
    pub fn annotate_file(
        &self,
        source: &Path,
        output: &Path,
        matches: &[FaceMatch],
    ) -> Result<RenderOutcome, RenderError> {
        if matches.is_empty() {
            return Ok(RenderOutcome::Skipped);
        }
        if same_file(source, output) {
            return Err(RenderError::OutputIsSource(output.to_path_buf()));
        }

        let mut image = image::open(source).map_err(RenderError::Decode)?.to_rgb8();
        let drawn = self.draw_matches(&mut image, matches);
        image.save(output).map_err(RenderError::Encode)?;

        info!("Image saved with results at: {}", output.display());
        Ok(RenderOutcome::Saved {
            output: output.to_path_buf(),
            drawn,
        })
    }

    /// Fail-open variant of [`Annotator::annotate_file`].
    pub fn annotate_file_or_log(
        &self,
        source: &Path,
        output: &Path,
        matches: &[FaceMatch],
    ) -> Option<RenderOutcome> {
        match self.annotate_file(source, output, matches) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log_render_failure(source, &e);
                None
            }
        }
    }
}

pub(crate) fn log_render_failure(source: &Path, e: &RenderError) {
    error!("Error drawing boxes on {}: {}", source.display(), e);
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
