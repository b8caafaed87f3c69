//! Virtualized measure/place pass over the visible events.

use crate::services::screen::visibility::ScreenSize;
use crate::services::screen::TimetableScreenState;

/// Exact size an item slot is measured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSize {
    pub width: i32,
    pub height: i32,
}

/// The toolkit side of a layout pass.
#[cfg_attr(test, mockall::automock(type Placeable = (usize, FixedSize);))]
pub trait LazyLayoutHost {
    type Placeable;

    /// Measure item `index` at exactly `size`. Zero heights are legal.
    fn measure(&mut self, index: usize, size: FixedSize) -> Self::Placeable;

    /// Place a measured item with its top-left corner at `(x, y)`, relative
    /// to the viewport.
    fn place(&mut self, placeable: Self::Placeable, x: i32, y: i32);
}

/// Run one layout pass: push `constraints`, then measure and place every
/// event of the current visible set. Returns the number of items placed.
pub fn layout_visible_items<H: LazyLayoutHost>(
    state: &mut TimetableScreenState,
    constraints: ScreenSize,
    host: &mut H,
) -> usize {
    state.update_screen_constraints(constraints.width, constraints.height);

    let visible = state.visible_layout_infos();
    let offset_x = state.offset_x();
    let offset_y = state.offset_y();

    let measured: Vec<_> = visible
        .iter()
        .map(|info| {
            let size = FixedSize {
                width: info.width_px,
                height: info.height_px,
            };
            (info, host.measure(info.index, size))
        })
        .collect();

    let count = measured.len();
    for (info, placeable) in measured {
        let x = (info.left_px as f32 - offset_x).round() as i32;
        let y = (info.top_px as f32 - offset_y).round() as i32;
        host.place(placeable, x, y);
    }
    count
}
