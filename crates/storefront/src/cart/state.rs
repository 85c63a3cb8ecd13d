//! In-memory cart state and its transitions.
//!
//! Every transition reports whether the item collection changed, which is
//! what decides if a persistence write gets scheduled.

use gbones_core::{ItemCandidate, LineItem, LineItemId};

use super::lifecycle::CartPhase;

/// The line items, the transient open flag, and the lifecycle phase.
#[derive(Debug, Default)]
pub(crate) struct CartState {
    items: Vec<LineItem>,
    is_open: bool,
    phase: CartPhase,
}

impl CartState {
    pub(crate) fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub(crate) fn item(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub(crate) const fn is_open(&self) -> bool {
        self.is_open
    }

    pub(crate) const fn phase(&self) -> CartPhase {
        self.phase
    }

    pub(crate) const fn set_phase(&mut self, phase: CartPhase) {
        self.phase = phase;
    }

    /// Sum of unit price times quantity over all lines.
    pub(crate) fn subtotal_cents(&self) -> u64 {
        self.items
            .iter()
            .fold(0, |sum, item| sum.saturating_add(item.line_total_cents()))
    }

    /// Sum of quantities over all lines.
    pub(crate) fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Merge into an existing line with the same key, or append a new one.
    pub(crate) fn add(&mut self, candidate: ItemCandidate, quantity: u32, id: LineItemId) -> bool {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == id) {
            let before = existing.quantity;
            existing.increment(quantity);
            return existing.quantity != before;
        }

        self.items
            .push(LineItem::from_candidate(candidate, id, quantity));
        true
    }

    pub(crate) fn remove(&mut self, id: &LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Set a line's quantity; non-positive quantities remove the line.
    pub(crate) fn update_qty(&mut self, id: &LineItemId, quantity: i64) -> bool {
        let Ok(requested) = u64::try_from(quantity) else {
            return self.remove(id);
        };
        if requested == 0 {
            return self.remove(id);
        }

        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        let next = item.clamp_quantity(requested);
        if next == item.quantity {
            return false;
        }
        item.quantity = next;
        true
    }

    pub(crate) fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }

    pub(crate) const fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Replace the collection with restored items.
    ///
    /// Items are normalized; later duplicates of a key merge into the first.
    pub(crate) fn replace_items(&mut self, restored: Vec<LineItem>) {
        let mut items: Vec<LineItem> = Vec::with_capacity(restored.len());
        for item in restored.into_iter().filter_map(LineItem::normalized) {
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => existing.increment(item.quantity),
                None => items.push(item),
            }
        }
        self.items = items;
    }
}
