use hanyu_types::{Point, Rect, Size, Viewport};

/// Coordinate space an overlay is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
    /// Viewport coordinates, unaffected by scrolling
    Fixed,
    /// Document coordinates, the viewport origin plus the scroll offset
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub mode: PositionMode,
    /// Minimum distance from the viewport edges
    pub margin: f64,
    /// Distance below the anchor
    pub offset: f64,
    /// Widths above this are treated as this
    pub max_width: Option<f64>,
    /// Widths below this are treated as this, winning over `max_width`
    pub min_width: Option<f64>,
}

impl Placement {
    pub fn fixed(margin: f64, offset: f64) -> Self {
        Self {
            mode: PositionMode::Fixed,
            margin,
            offset,
            max_width: None,
            min_width: None,
        }
    }

    pub fn absolute(margin: f64, offset: f64) -> Self {
        Self {
            mode: PositionMode::Absolute,
            margin,
            offset,
            max_width: None,
            min_width: None,
        }
    }

    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = Some(min_width);
        self
    }

    /// Width the element occupies once both bounds apply
    pub fn effective_width(&self, measured: f64) -> f64 {
        let capped = match self.max_width {
            Some(max) => measured.min(max),
            None => measured,
        };
        match self.min_width {
            Some(min) => capped.max(min),
            None => capped,
        }
    }
}

/// Place an element of `element` size under `anchor`.
///
/// Horizontally centered on the anchor and kept `margin` away from both
/// viewport edges; an element too wide for that is left-aligned at the
/// margin. Depends only on its arguments.
pub fn position(element: Size, anchor: Rect, viewport: Viewport, placement: &Placement) -> Point {
    let width = placement.effective_width(element.width);
    let margin = placement.margin;

    let left = if width > viewport.width - 2.0 * margin {
        margin
    } else {
        let centered = anchor.center_x() - width / 2.0;
        centered.max(margin).min(viewport.width - width - margin)
    };
    let top = anchor.bottom() + placement.offset;

    match placement.mode {
        PositionMode::Fixed => Point::new(left, top),
        PositionMode::Absolute => Point::new(left + viewport.scroll_x, top + viewport.scroll_y),
    }
}

/// Area an overlay may occupy in its own coordinate space
pub fn bounds(mode: PositionMode, viewport: Viewport) -> Rect {
    match mode {
        PositionMode::Fixed => Rect::new(0.0, 0.0, viewport.width, viewport.height),
        PositionMode::Absolute => Rect::new(
            viewport.scroll_x,
            viewport.scroll_y,
            viewport.width,
            viewport.height,
        ),
    }
}

/// Convert a viewport-relative point into the overlay's coordinate space
pub fn to_mode(point: Point, mode: PositionMode, viewport: Viewport) -> Point {
    match mode {
        PositionMode::Fixed => point,
        PositionMode::Absolute => Point::new(point.x + viewport.scroll_x, point.y + viewport.scroll_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1200.0, 800.0)
    }

    #[test]
    fn centers_under_anchor() {
        let anchor = Rect::new(500.0, 100.0, 200.0, 20.0);
        let point = position(
            Size::new(300.0, 150.0),
            anchor,
            viewport(),
            &Placement::fixed(10.0, 5.0),
        );
        assert_eq!(point, Point::new(450.0, 125.0));
    }

    #[test]
    fn clamps_to_both_edges() {
        let placement = Placement::fixed(10.0, 5.0);
        let near_left = position(
            Size::new(300.0, 100.0),
            Rect::new(0.0, 0.0, 20.0, 20.0),
            viewport(),
            &placement,
        );
        assert_eq!(near_left.x, 10.0);

        let near_right = position(
            Size::new(300.0, 100.0),
            Rect::new(1180.0, 0.0, 20.0, 20.0),
            viewport(),
            &placement,
        );
        assert_eq!(near_right.x, 1200.0 - 300.0 - 10.0);
    }

    #[test]
    fn too_wide_is_left_aligned() {
        let point = position(
            Size::new(1190.0, 100.0),
            Rect::new(900.0, 0.0, 20.0, 20.0),
            viewport(),
            &Placement::fixed(10.0, 5.0),
        );
        assert_eq!(point.x, 10.0);
    }

    #[test]
    fn max_width_caps_the_measured_width() {
        let point = position(
            Size::new(1500.0, 100.0),
            Rect::new(500.0, 0.0, 200.0, 20.0),
            viewport(),
            &Placement::fixed(10.0, 5.0).with_max_width(1000.0),
        );
        assert_eq!(point.x, 100.0);
    }

    #[test]
    fn min_width_widens_narrow_elements() {
        let placement = Placement::fixed(10.0, 5.0)
            .with_max_width(1000.0)
            .with_min_width(300.0);
        let point = position(
            Size::new(120.0, 60.0),
            Rect::new(500.0, 0.0, 200.0, 20.0),
            viewport(),
            &placement,
        );
        assert_eq!(point.x, 450.0);

        assert_eq!(placement.effective_width(1500.0), 1000.0);
        let conflicting = Placement::fixed(0.0, 0.0)
            .with_max_width(200.0)
            .with_min_width(300.0);
        assert_eq!(conflicting.effective_width(250.0), 300.0);
    }

    #[test]
    fn absolute_adds_scroll_offset() {
        let anchor = Rect::new(500.0, 100.0, 200.0, 20.0);
        let scrolled = viewport().scrolled(0.0, 640.0);
        let fixed = position(Size::new(300.0, 150.0), anchor, scrolled, &Placement::fixed(10.0, 10.0));
        let absolute = position(
            Size::new(300.0, 150.0),
            anchor,
            scrolled,
            &Placement::absolute(10.0, 10.0),
        );
        assert_eq!(fixed.y, 130.0);
        assert_eq!(absolute.y, 770.0);
        assert_eq!(fixed.x, absolute.x);
    }

    #[test]
    fn repeated_calls_agree() {
        let anchor = Rect::new(321.5, 77.0, 48.0, 18.0);
        let size = Size::new(420.0, 260.0);
        let placement = Placement::fixed(10.0, 5.0).with_max_width(1000.0);
        let first = position(size, anchor, viewport(), &placement);
        let second = position(size, anchor, viewport(), &placement);
        assert_eq!(first, second);
    }
}
