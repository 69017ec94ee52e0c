// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cell geometry in container- and page-relative coordinates.
//!
//! All coordinates are `f64` with the origin at the top-left and `y` growing downward, matching
//! how rectangles are measured on screen.

/// A measured bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Half-open containment: the right and bottom edges belong to the neighbour.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// A rectangle that has no area cannot be measured against.
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl From<ratatui::layout::Rect> for Rect {
    fn from(value: ratatui::layout::Rect) -> Self {
        Self::new(
            f64::from(value.x),
            f64::from(value.y),
            f64::from(value.width),
            f64::from(value.height),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Document scroll position, used by the page-relative variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Center of `cell` relative to the top-left corner of `container`.
///
/// Returns `None` while the container is not measurable (not mounted yet).
pub fn cell_center(cell: Rect, container: Option<Rect>) -> Option<Point> {
    let container = container.filter(Rect::is_measurable)?;
    Some(Point::new(
        cell.left + cell.width / 2.0 - container.left,
        cell.top + cell.height / 2.0 - container.top,
    ))
}

/// Center of `cell` relative to the whole document, for page-fixed overlays.
pub fn cell_center_in_page(cell: Rect, scroll: ScrollOffset) -> Point {
    Point::new(
        cell.left + cell.width / 2.0 + scroll.x,
        cell.top + cell.height / 2.0 + scroll.y,
    )
}

/// The coordinate space one overlay pass is expressed in.
///
/// Container-scoped and page-fixed overlays are alternatives; a render pass picks exactly one so
/// every primitive shares the same origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayAnchor {
    Container(Option<Rect>),
    Page(ScrollOffset),
}

impl OverlayAnchor {
    pub fn resolve(&self, cell: Rect) -> Option<Point> {
        match self {
            Self::Container(container) => cell_center(cell, *container),
            Self::Page(scroll) => Some(cell_center_in_page(cell, *scroll)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{cell_center, cell_center_in_page, OverlayAnchor, Point, Rect, ScrollOffset};

    #[rstest]
    #[case(Rect::new(100.0, 50.0, 40.0, 20.0), Rect::new(10.0, 5.0, 500.0, 300.0), Point::new(110.0, 55.0))]
    #[case(Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(0.0, 0.0, 10.0, 10.0), Point::new(5.0, 5.0))]
    #[case(Rect::new(12.5, 7.0, 3.0, 1.0), Rect::new(20.0, 10.0, 30.0, 30.0), Point::new(-6.0, -2.5))]
    fn cell_center_is_container_relative(
        #[case] cell: Rect,
        #[case] container: Rect,
        #[case] expected: Point,
    ) {
        assert_eq!(cell_center(cell, Some(container)), Some(expected));
    }

    #[test]
    fn cell_center_requires_a_measurable_container() {
        let cell = Rect::new(1.0, 1.0, 4.0, 4.0);
        assert_eq!(cell_center(cell, None), None);
        assert_eq!(cell_center(cell, Some(Rect::new(0.0, 0.0, 0.0, 10.0))), None);
    }

    #[test]
    fn page_variant_adds_scroll_offsets() {
        let cell = Rect::new(100.0, 50.0, 40.0, 20.0);
        let scroll = ScrollOffset { x: 7.0, y: 300.0 };
        assert_eq!(cell_center_in_page(cell, scroll), Point::new(127.0, 360.0));
        assert_eq!(OverlayAnchor::Page(scroll).resolve(cell), Some(Point::new(127.0, 360.0)));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(2.0, 2.0, 3.0, 1.0);
        assert!(rect.contains(Point::new(2.0, 2.0)));
        assert!(rect.contains(Point::new(4.9, 2.5)));
        assert!(!rect.contains(Point::new(5.0, 2.0)));
        assert!(!rect.contains(Point::new(3.0, 3.0)));
    }

    #[test]
    fn converts_terminal_rects() {
        let rect = Rect::from(ratatui::layout::Rect::new(3, 4, 10, 2));
        assert_eq!(rect, Rect::new(3.0, 4.0, 10.0, 2.0));
    }
}
