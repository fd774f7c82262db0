/// Axis-aligned rectangle stored as center and size, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self { cx, cy, w, h }
    }

    pub fn left(&self) -> f64 {
        self.cx - self.w / 2.0
    }

    pub fn right(&self) -> f64 {
        self.cx + self.w / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.cy - self.h / 2.0
    }

    pub fn top(&self) -> f64 {
        self.cy + self.h / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }
}
