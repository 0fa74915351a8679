/// Screen rectangles and pixel extents

/// Integer screen rectangle with inclusive bounds
///
/// `xmax`/`ymax` are the last covered pixel, so a rectangle from (0,0) to
/// (99,99) spans 100 pixels and `size_x()` returns 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl Rect {
    /// Create a rectangle from its corners
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    /// Horizontal distance between the bounds
    pub fn size_x(&self) -> i64 {
        self.xmax as i64 - self.xmin as i64
    }

    /// Vertical distance between the bounds
    pub fn size_y(&self) -> i64 {
        self.ymax as i64 - self.ymin as i64
    }

    /// True if a max bound lies before its min bound
    pub fn is_degenerate(&self) -> bool {
        self.xmax < self.xmin || self.ymax < self.ymin
    }
}

/// Size of a GPU resource in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Extent2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
