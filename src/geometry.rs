/// Screen or window coordinate. Origin is the top left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest normalized rectangle containing both points.
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn at(point: Point) -> Self {
        Self::spanning(point, point)
    }

    pub fn normalized(self) -> Self {
        Self::spanning(
            Point::new(self.left, self.top),
            Point::new(self.right, self.bottom),
        )
    }

    pub fn is_normalized(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> i64 {
        let r = self.normalized();
        i64::from(r.width()) * i64::from(r.height())
    }
}

/// Where the overlay goes on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Offset of a window's client origin from its window origin: sizing
/// border on x, border plus caption on y.
///
/// `client_origin` is client (0, 0) mapped to screen coordinates.
pub fn client_offset(window_rect: Rect, client_origin: Point) -> Point {
    Point::new(
        client_origin.x - window_rect.left,
        client_origin.y - window_rect.top,
    )
}

/// Convert a client-area pointer position into window-relative coordinates,
/// which is what window regions are expressed in.
pub fn client_to_window(point: Point, offset: Point) -> Point {
    Point::new(point.x + offset.x, point.y + offset.y)
}

/// Overlay placement for a given underlay rectangle.
///
/// Both the underlay's caption and the overlay's own caption are kept out of
/// the covered area, hence the doubled title bar offset.
pub fn overlay_placement(underlay: Rect, title_bar_height: i32) -> Placement {
    let inset = title_bar_height.saturating_mul(2);
    Placement {
        x: underlay.left,
        y: underlay.top + inset,
        width: underlay.width(),
        height: (underlay.height() - inset).max(0),
    }
}
