/// Matches at or below this confidence are never drawn.
pub const CONFIDENCE_THRESHOLD: f32 = 90.0;

/// Label used when the service does not name a match.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Face location as fractions of the image width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub name: String,
    /// Service certainty in the 0-100 range.
    pub confidence: f32,
    pub bounding_box: BoundingBox,
    /// Celebrity id assigned by the service.
    pub id: Option<String>,
    /// Info links the service returns for the celebrity.
    pub urls: Vec<String>,
}

impl FaceMatch {
    pub fn new(name: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            name: name.into(),
            confidence,
            bounding_box,
            id: None,
            urls: Vec::new(),
        }
    }

    /// Strictly greater than: a match exactly at the threshold is rejected.
    pub fn passes(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}

/// Everything one recognition call returned for an image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recognition {
    pub faces: Vec<FaceMatch>,
    /// Faces the service detected but could not match to anyone.
    pub unrecognized: usize,
}

/// Pixel rectangle with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Scales a fractional box to an image of `width` x `height` pixels.
    ///
    /// Each edge is `floor(fraction * dimension)`. The result is then
    /// reordered so `left <= right` and `top <= bottom`, and clamped into
    /// the image, so a malformed box never yields an inverted rectangle.
    pub fn from_fractions(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        let left = f64::from(bbox.left);
        let top = f64::from(bbox.top);

        let x0 = scale(left, w);
        let y0 = scale(top, h);
        let x1 = scale(left + f64::from(bbox.width), w);
        let y1 = scale(top + f64::from(bbox.height), h);

        let max_x = width.saturating_sub(1) as i32;
        let max_y = height.saturating_sub(1) as i32;

        Self {
            left: x0.min(x1).clamp(0, max_x),
            top: y0.min(y1).clamp(0, max_y),
            right: x0.max(x1).clamp(0, max_x),
            bottom: y0.max(y1).clamp(0, max_y),
        }
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left).saturating_add(1)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top).saturating_add(1)
    }
}

// Saturating cast; NaN maps to 0.
fn scale(fraction: f64, dimension: f64) -> i32 {
    (fraction * dimension).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(left: f32, top: f32, width: f32, height: f32) -> BoundingBox {
        BoundingBox {
            left,
            top,
            width,
            height,
        }
    }

    #[test]
    fn scales_fractions_to_pixels() {
        let rect = PixelRect::from_fractions(&bbox(0.1, 0.2, 0.3, 0.25), 1000, 800);
        assert_eq!(
            rect,
            PixelRect {
                left: 100,
                top: 160,
                right: 400,
                bottom: 360,
            }
        );
        assert_eq!(rect.width(), 301);
        assert_eq!(rect.height(), 201);
    }

    #[test]
    fn floors_fractional_pixels() {
        let rect = PixelRect::from_fractions(&bbox(0.125, 0.5, 0.5, 0.25), 10, 10);
        assert_eq!((rect.left, rect.top, rect.right, rect.bottom), (1, 5, 6, 7));
    }

    #[test]
    fn negative_extent_is_reordered() {
        let rect = PixelRect::from_fractions(&bbox(0.5, 0.5, -0.25, -0.25), 100, 100);
        assert_eq!((rect.left, rect.top, rect.right, rect.bottom), (25, 25, 50, 50));
    }

    #[test]
    fn out_of_range_box_is_clamped() {
        let rect = PixelRect::from_fractions(&bbox(-0.25, 0.875, 1.5, 0.5), 200, 100);
        assert_eq!((rect.left, rect.top, rect.right, rect.bottom), (0, 87, 199, 99));
    }

    #[test]
    fn nan_box_collapses_to_origin() {
        let rect = PixelRect::from_fractions(&bbox(f32::NAN, f32::NAN, 0.1, 0.1), 50, 50);
        assert_eq!((rect.left, rect.top), (0, 0));
    }

    #[test]
    fn hand_built_inverted_rect_has_positive_size() {
        let rect = PixelRect {
            left: 10,
            top: 7,
            right: 9,
            bottom: 3,
        };
        assert_eq!(rect.width(), 2);
        assert_eq!(rect.height(), 5);

        let widest = PixelRect {
            left: i32::MIN,
            top: 0,
            right: i32::MAX,
            bottom: 0,
        };
        assert_eq!(widest.width(), u32::MAX);
    }

    #[test]
    fn threshold_is_strict() {
        let at = FaceMatch::new("A", 90.0, BoundingBox::default());
        let above = FaceMatch::new("B", 90.01, BoundingBox::default());
        assert!(!at.passes(CONFIDENCE_THRESHOLD));
        assert!(above.passes(CONFIDENCE_THRESHOLD));
    }
}
