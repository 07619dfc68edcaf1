//! Pixel rectangles.
//!
//! Coordinates follow the usual image convention: origin (0, 0) at the
//! top-left corner, X to the right, Y downward. The origin is signed so a
//! caller can ask for a window hanging off the left or top edge; clipping
//! against the image resolves it to an in-bounds part.

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// Left/top edges are inclusive, right/bottom edges exclusive.
///
/// # Example
///
/// ```rust
/// use jpegthumb::Rect;
///
/// let rect = Rect::new(-5, 10, 20, 20);
/// let clipped = rect.intersect(&Rect::from_size(50, 50)).unwrap();
/// assert_eq!(clipped, Rect::new(0, 10, 15, 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: i32,
    /// Y coordinate of the top edge (inclusive)
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at (0, 0) with the given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// X coordinate of the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the intersection of this rectangle with another, or `None`
    /// if they share no pixel.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = (self.x as i64).max(other.x as i64);
        let y = (self.y as i64).max(other.y as i64);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(
                x as i32,
                y as i32,
                (right - x) as u32,
                (bottom - y) as u32,
            ))
        } else {
            None
        }
    }
}
