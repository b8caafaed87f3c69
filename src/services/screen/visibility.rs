use std::sync::Arc;

use crate::services::layout::EventLayoutInfo;

/// Viewport size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when there is nothing to render into yet.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Events intersecting the viewport, as published by one recompute.
#[derive(Debug, Clone, Default)]
pub struct VisibleSet {
    revision: u64,
    infos: Arc<[EventLayoutInfo]>,
}

impl VisibleSet {
    pub(crate) fn new(revision: u64, infos: Vec<EventLayoutInfo>) -> Self {
        Self {
            revision,
            infos: infos.into(),
        }
    }

    /// Incremented by every recompute; `0` before the first one.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn infos(&self) -> &[EventLayoutInfo] {
        &self.infos
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventLayoutInfo> {
        self.infos.iter()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.infos.iter().map(|info| info.index).collect()
    }
}

/// Layout infos intersecting the viewport placed at `(offset_x, offset_y)`.
///
/// Edges are inclusive: an event touching the viewport border is visible.
pub fn visible_layout_infos(
    infos: &[EventLayoutInfo],
    size: ScreenSize,
    offset_x: f32,
    offset_y: f32,
) -> Vec<EventLayoutInfo> {
    if size.is_empty() {
        return Vec::new();
    }

    let screen_right_x = offset_x + size.width as f32;
    let screen_bottom_y = offset_y + size.height as f32;

    infos
        .iter()
        .filter(|info| {
            spans_intersect(
                info.left_px as f32,
                info.right_px() as f32,
                offset_x,
                screen_right_x,
            ) && spans_intersect(
                info.top_px as f32,
                info.bottom_px() as f32,
                offset_y,
                screen_bottom_y,
            )
        })
        .copied()
        .collect()
}

fn spans_intersect(start: f32, end: f32, view_start: f32, view_end: f32) -> bool {
    start <= view_end && end >= view_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn info(index: usize, left: i32, top: i32, width: i32, height: i32) -> EventLayoutInfo {
        EventLayoutInfo {
            index,
            day_index: (left / 200) as usize,
            left_px: left,
            top_px: top,
            width_px: width,
            height_px: height,
        }
    }

    #[test]
    fn test_event_in_viewport_then_scrolled_out() {
        let infos = [info(0, 0, 0, 200, 100)];
        let size = ScreenSize::new(1000, 800);

        assert_eq!(visible_layout_infos(&infos, size, 0.0, 0.0).len(), 1);
        assert!(visible_layout_infos(&infos, size, 1000.0, 0.0).is_empty());
    }

    #[test_case(200.0, 0.0 => true; "right edge touches left border")]
    #[test_case(200.5, 0.0 => false; "just past right edge")]
    #[test_case(-1000.0, 0.0 => true; "left edge touches right border")]
    #[test_case(0.0, 100.0 => true; "bottom edge touches top border")]
    #[test_case(0.0, -800.0 => true; "top edge touches bottom border")]
    #[test_case(0.0, -800.5 => false; "just above viewport")]
    fn test_boundaries_are_inclusive(offset_x: f32, offset_y: f32) -> bool {
        let infos = [info(0, 0, 0, 200, 100)];
        !visible_layout_infos(&infos, ScreenSize::new(1000, 800), offset_x, offset_y).is_empty()
    }

    #[test]
    fn test_event_larger_than_viewport_is_visible() {
        let infos = [info(0, 0, 0, 200, 5000)];
        let visible = visible_layout_infos(&infos, ScreenSize::new(150, 300), 20.0, 1200.0);
        assert_eq!(visible.len(), 1);
    }

    #[test_case(ScreenSize::ZERO; "zero")]
    #[test_case(ScreenSize::new(0, 800); "zero width")]
    #[test_case(ScreenSize::new(1000, 0); "zero height")]
    #[test_case(ScreenSize::new(-5, 800); "negative width")]
    fn test_empty_viewport_shows_nothing(size: ScreenSize) {
        let infos = [info(0, 0, 0, 200, 100)];
        assert!(visible_layout_infos(&infos, size, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_overlapping_events_are_both_visible() {
        let infos = [info(0, 0, 100, 200, 300), info(1, 0, 150, 200, 50), info(2, 200, 5000, 200, 50)];
        let visible = visible_layout_infos(&infos, ScreenSize::new(400, 400), 0.0, 0.0);
        assert_eq!(visible.iter().map(|i| i.index).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_visible_set_accessors() {
        let set = VisibleSet::new(3, vec![info(4, 0, 0, 10, 10), info(9, 0, 0, 10, 10)]);
        assert_eq!(set.revision(), 3);
        assert_eq!(set.indices(), vec![4, 9]);
        assert_eq!(VisibleSet::default().revision(), 0);
        assert!(VisibleSet::default().is_empty());
    }
}
