/// Integer pixel rectangles used by every collision test.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// A `w`×`h` rectangle centred on (`cx`, `cy`).
    pub const fn centered(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Rect { x: cx - w / 2, y: cy - h / 2, w, h }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    /// Copy shifted by (`dx`, `dy`).
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Rect { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
