//! Integer rectangles for cell and editor bounds.

/// A rectangle in list client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `(x, y)` lies inside the rectangle. The right and bottom
    /// edges are exclusive.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_excludes_far_edges() {
        let r = Rect::new(10, 10, 20, 5);
        assert!(r.contains(10, 10));
        assert!(r.contains(29, 14));
        assert!(!r.contains(30, 10));
        assert!(!r.contains(10, 15));
    }

    #[test]
    fn test_empty() {
        assert!(Rect::default().is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }
}
