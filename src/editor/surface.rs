//! Video surface geometry: letterboxing and pointer normalization

use serde::{Deserialize, Serialize};

use crate::utils::time::clamp;

/// Axis-aligned rectangle in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Point relative to this rect as fractions of its size, clamped to [0,1]
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        if self.is_empty() {
            return (0.0, 0.0);
        }
        (
            clamp(0.0, (x - self.left) / self.width, 1.0),
            clamp(0.0, (y - self.top) / self.height, 1.0),
        )
    }
}

/// Region of `element` actually covered by video pixels when a frame of
/// `frame_size` is fitted inside it (letterboxed or pillarboxed).
pub fn content_rect(element: Rect, frame_size: Option<(u32, u32)>) -> Rect {
    let (fw, fh) = match frame_size {
        Some((w, h)) if w > 0 && h > 0 => (w as f64, h as f64),
        _ => return element,
    };
    if element.is_empty() {
        return element;
    }

    let frame_aspect = fw / fh;
    let element_aspect = element.width / element.height;

    if frame_aspect > element_aspect {
        // bars above and below
        let height = element.width / frame_aspect;
        Rect::new(
            element.left,
            element.top + (element.height - height) / 2.0,
            element.width,
            height,
        )
    } else {
        // bars left and right
        let width = element.height * frame_aspect;
        Rect::new(
            element.left + (element.width - width) / 2.0,
            element.top,
            width,
            element.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_rect_letterbox() {
        // 16:9 video in a square element
        let element = Rect::new(0.0, 0.0, 1600.0, 1600.0);
        let content = content_rect(element, Some((1920, 1080)));
        assert_eq!(content.width, 1600.0);
        assert!((content.height - 900.0).abs() < 1e-9);
        assert!((content.top - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_rect_pillarbox() {
        // portrait video in a landscape element
        let element = Rect::new(100.0, 0.0, 1000.0, 500.0);
        let content = content_rect(element, Some((1080, 1920)));
        assert!((content.width - 281.25).abs() < 1e-9);
        assert!((content.left - (100.0 + (1000.0 - 281.25) / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_content_rect_without_frame_size_is_element() {
        let element = Rect::new(10.0, 20.0, 300.0, 200.0);
        assert_eq!(content_rect(element, None), element);
    }

    #[test]
    fn test_normalize_clamps_into_bars() {
        let content = Rect::new(0.0, 350.0, 1600.0, 900.0);
        assert_eq!(content.normalize(800.0, 0.0), (0.5, 0.0));
        assert_eq!(content.normalize(1600.0, 1250.0), (1.0, 1.0));
        assert_eq!(Rect::default().normalize(4.0, 4.0), (0.0, 0.0));
    }
}
