use egui::{Painter, Rect};

use crate::models::event::{EventId, TimetableEvent};

/// Supplies the timetable with its item count and draws one item into a
/// measured slot on request.
pub struct ItemProvider<'a, F>
where
    F: FnMut(&Painter, Rect, usize, &TimetableEvent),
{
    items: &'a [TimetableEvent],
    content: F,
}

impl<'a, F> ItemProvider<'a, F>
where
    F: FnMut(&Painter, Rect, usize, &TimetableEvent),
{
    pub fn new(items: &'a [TimetableEvent], content: F) -> Self {
        Self { items, content }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Stable identity of the item at `index`.
    pub fn key(&self, index: usize) -> Option<&EventId> {
        self.items.get(index).map(|item| &item.id)
    }

    /// Draw item `index` into `slot`. Unknown indices are ignored.
    pub fn item(&mut self, painter: &Painter, slot: Rect, index: usize) {
        if let Some(item) = self.items.get(index) {
            (self.content)(painter, slot, index, item);
        }
    }
}
