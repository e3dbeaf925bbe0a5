use hanyu_types::{Point, Rect, Size};

/// One pointer-down..pointer-up drag of an overlay by its handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pointer_start: Point,
    origin: Point,
}

impl DragSession {
    /// `origin` is the overlay's top-left when the pointer went down
    pub fn begin(pointer: Point, origin: Point) -> Self {
        Self {
            pointer_start: pointer,
            origin,
        }
    }

    /// New top-left for the current pointer, kept fully inside `bounds`
    pub fn update(&self, pointer: Point, element: Size, bounds: Rect) -> Point {
        let x = self.origin.x + (pointer.x - self.pointer_start.x);
        let y = self.origin.y + (pointer.y - self.pointer_start.y);
        Point::new(
            clamp_axis(x, bounds.left, bounds.width, element.width),
            clamp_axis(y, bounds.top, bounds.height, element.height),
        )
    }
}

fn clamp_axis(value: f64, start: f64, extent: f64, element: f64) -> f64 {
    let max = start + (extent - element).max(0.0);
    value.max(start).min(max)
}
