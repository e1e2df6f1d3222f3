//! Collection synchronizer.
//!
//! [`RowList`] owns the editable rows of one collection (experience,
//! education or projects) and keeps the matching ordered entry list of the
//! [`ResumeDocument`](crate::models::ResumeDocument) aligned with them.
//!
//! Rows are addressed by [`RowKey`], an opaque handle that stays valid while
//! the row exists. Positions are never stored; they are derived from the row
//! order whenever an operation needs one. Entry ids are position tags and
//! are rewritten to `position + 1` after every add, remove and resync.
//!
//! [`RowList::resync`] is the reconciliation primitive: it discards the entry
//! list and rebuilds it from the rows. Any transient divergence introduced by
//! in-place row edits is gone after the next resync.

use crate::models::rows::{PositionTagged, RowModel};

/// Opaque handle of one editable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(u64);

impl RowKey {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One editable row: its handle, its display label and its input values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<R> {
    key: RowKey,
    label: String,
    pub view: R,
}

impl<R> Row<R> {
    pub fn key(&self) -> RowKey {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowList<R: RowModel> {
    rows: Vec<Row<R>>,
    /// Monotonic label counter; never decremented by removals
    counter: u32,
    next_key: u64,
}

impl<R: RowModel> Default for RowList<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite every entry id to `position + 1`.
pub fn renumber<E: PositionTagged>(entries: &mut [E]) {
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.set_id(position as u32 + 1);
    }
}

impl<R: RowModel> RowList<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            counter: 0,
            next_key: 1,
        }
    }

    /// Append a blank row and a zero-valued entry.
    ///
    /// The row is labelled with the incremented collection counter
    /// ("Experience 3"); the label is cosmetic and may repeat positions after
    /// removals.
    pub fn add(&mut self, entries: &mut Vec<R::Entry>) -> RowKey {
        self.counter += 1;
        let key = RowKey(self.next_key);
        self.next_key += 1;

        self.rows.push(Row {
            key,
            label: format!("{} {}", R::KIND.label_prefix(), self.counter),
            view: R::default(),
        });

        entries.push(R::Entry::default());
        renumber(entries);

        tracing::debug!(
            "Added {} row {} (rows: {}, entries: {})",
            R::KIND,
            self.counter,
            self.rows.len(),
            entries.len()
        );
        key
    }

    /// Remove the row behind `key` and the entry at the row's position.
    ///
    /// The entry removal is skipped when the position is outside the current
    /// entry list (rows and entries briefly out of step). Returns false, and
    /// changes nothing, when no row has this key.
    pub fn remove(&mut self, key: RowKey, entries: &mut Vec<R::Entry>) -> bool {
        let Some(position) = self.position(key) else {
            tracing::warn!("Remove ignored: no {} row with key {}", R::KIND, key.0);
            return false;
        };

        if position < entries.len() {
            entries.remove(position);
        } else {
            tracing::debug!(
                "{} entry at position {} already absent (entries: {})",
                R::KIND,
                position,
                entries.len()
            );
        }
        self.rows.remove(position);
        renumber(entries);

        tracing::debug!(
            "Removed {} row at position {} (rows left: {})",
            R::KIND,
            position,
            self.rows.len()
        );
        true
    }

    /// Serialize every row, in order, into entries with ids `1..=n`.
    pub fn to_entries(&self) -> Vec<R::Entry> {
        self.rows
            .iter()
            .enumerate()
            .map(|(position, row)| row.view.to_entry(position as u32 + 1))
            .collect()
    }

    /// Replace `entries` with a full rebuild from the rows.
    pub fn resync(&self, entries: &mut Vec<R::Entry>) {
        *entries = self.to_entries();
    }

    pub fn position(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|row| row.key == key)
    }

    pub fn row(&self, key: RowKey) -> Option<&Row<R>> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// In-place access to a row's inputs. Does not touch the entry list.
    pub fn row_mut(&mut self, key: RowKey) -> Option<&mut R> {
        self.rows
            .iter_mut()
            .find(|row| row.key == key)
            .map(|row| &mut row.view)
    }

    pub fn row_at_mut(&mut self, position: usize) -> Option<&mut R> {
        self.rows.get_mut(position).map(|row| &mut row.view)
    }

    pub fn rows(&self) -> &[Row<R>] {
        &self.rows
    }

    pub fn keys(&self) -> Vec<RowKey> {
        self.rows.iter().map(|row| row.key).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Placeholder text shown in place of rows while the collection is empty.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.rows.is_empty().then(|| R::KIND.placeholder())
    }

    /// Drop every row and restart the label counter.
    ///
    /// Row keys keep increasing so handles from before the reset never match
    /// a new row.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.counter = 0;
    }
}
