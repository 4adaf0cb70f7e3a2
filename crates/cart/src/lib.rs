//! Cart engine: owns the ordered sequence of order lines and every rule for
//! creating, merging, splitting and removing them.

use shared::domain::{MenuEntry, OrderLine, Quantity};
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    LinesChanged,
}

/// The cart is an ordered sequence of [`OrderLine`]; order reflects
/// insertion/split order and determines print and confirmation order.
///
/// All `line_index` arguments must be in bounds. The engine indexes directly:
/// an out-of-bounds index is a caller bug, not a recoverable condition.
pub struct CartEngine {
    lines: Vec<OrderLine>,
    events: broadcast::Sender<CartEvent>,
}

impl CartEngine {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            lines: Vec::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Merge into an existing bare line with the same name, or append a fresh
    /// quantity-1 line. Lines with a note or an open note editor never merge;
    /// no global re-compaction ever runs.
    pub fn add_item(&mut self, entry: &MenuEntry) {
        let mergeable = self
            .lines
            .iter()
            .position(|line| line.name == entry.name && line.is_bare());
        match mergeable {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = Quantity::Set(line.quantity.settled() + 1);
                debug!(name = %entry.name, index, "merged item into existing line");
            }
            None => {
                self.lines.push(OrderLine::new(entry));
                debug!(name = %entry.name, "appended new cart line");
            }
        }
        self.notify();
    }

    /// Add `delta` to the line's quantity; a result of zero or less removes
    /// the line entirely (never clamped).
    pub fn change_quantity(&mut self, line_index: usize, delta: i64) {
        let next = self.lines[line_index].quantity.settled() + delta;
        if next <= 0 {
            self.lines.remove(line_index);
        } else {
            self.lines[line_index].quantity = Quantity::Set(next);
        }
        self.notify();
    }

    /// Raw keystrokes from the quantity field. Empty text is kept as the
    /// explicit `Unset` sentinel so the field can be cleared mid-edit;
    /// non-integer text is rejected (prior value retained); valid integers
    /// are stored verbatim, including non-positive ones, pending blur.
    pub fn set_quantity_text(&mut self, line_index: usize, text: &str) {
        if text.is_empty() {
            self.lines[line_index].quantity = Quantity::Unset;
            self.notify();
            return;
        }
        if let Ok(value) = text.parse::<i64>() {
            self.lines[line_index].quantity = Quantity::Set(value);
            self.notify();
        }
    }

    /// Blur settlement: the only place minimum-quantity enforcement happens
    /// for direct text entry.
    pub fn settle_quantity(&mut self, line_index: usize) {
        if self.lines[line_index].quantity.settled() < 1 {
            self.lines[line_index].quantity = Quantity::Set(1);
            self.notify();
        }
    }

    pub fn remove_line(&mut self, line_index: usize) {
        self.lines.remove(line_index);
        self.notify();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        debug!("cart cleared");
        self.notify();
    }

    /// Overwrites the note; merge eligibility of other lines is unaffected
    /// until the editor closes.
    pub fn set_note(&mut self, line_index: usize, text: &str) {
        self.lines[line_index].note = text.to_string();
        self.notify();
    }

    /// Open or close a line's note editor.
    ///
    /// Opening on a line with quantity > 1 splits: one unit comes off the
    /// existing line and a fresh quantity-1 line with an open editor is
    /// inserted directly after it. Opening on a quantity-1 line just flips
    /// the flag. Closing is a cancel: the note is discarded.
    ///
    /// Returns the index the caller should move input focus to, when opening.
    pub fn toggle_note_editor(&mut self, line_index: usize, open: bool) -> Option<usize> {
        if open {
            let quantity = self.lines[line_index].quantity.settled();
            if quantity > 1 {
                self.lines[line_index].quantity = Quantity::Set(quantity - 1);
                let source = &self.lines[line_index];
                let mut split = OrderLine::new(&MenuEntry::new(
                    source.name.clone(),
                    source.unit_price,
                ));
                split.note_editor_open = true;
                self.lines.insert(line_index + 1, split);
                debug!(index = line_index, "split one unit off for a note");
                self.notify();
                Some(line_index + 1)
            } else {
                self.lines[line_index].note_editor_open = true;
                self.notify();
                Some(line_index)
            }
        } else {
            let line = &mut self.lines[line_index];
            line.note_editor_open = false;
            line.note.clear();
            self.notify();
            None
        }
    }

    /// Recomputed from the current lines on every call; transient unset
    /// quantities count as zero.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn count(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| line.quantity.settled())
            .sum()
    }

    fn notify(&self) {
        // No subscribers is fine; the engine does not care who listens.
        let _ = self.events.send(CartEvent::LinesChanged);
    }
}

impl Default for CartEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
