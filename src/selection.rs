//! Selection state machine: which of the 20 numbers are picked, in pick order.

use crate::geometry::CELL_COUNT;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

/// Maximum simultaneously selected numbers.
pub const SELECTION_CAP: usize = 10;

/// One numbered ball. `value` is fixed at construction (index + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberCell {
    pub value: u8,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added(u8),
    Removed(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("You can only select 10 numbers!")]
    SelectionFull,
    #[error("no cell at index {0}")]
    NoSuchCell(usize),
}

/// Cells plus the ordered list of picked values. The two are only changed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    cells: [NumberCell; CELL_COUNT],
    picked: Vec<u8>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        let cells = std::array::from_fn(|i| NumberCell {
            value: i as u8 + 1,
            selected: false,
        });
        Self {
            cells,
            picked: Vec::with_capacity(SELECTION_CAP),
        }
    }

    pub fn cells(&self) -> &[NumberCell; CELL_COUNT] {
        &self.cells
    }

    /// Picked values in the order they were picked (tray order).
    pub fn picked(&self) -> &[u8] {
        &self.picked
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.picked.len() >= SELECTION_CAP
    }

    pub fn remaining_capacity(&self) -> usize {
        SELECTION_CAP.saturating_sub(self.picked.len())
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|c| c.selected)
    }

    /// True when the cell at `index` can be clicked: it is picked (so it can be dropped)
    /// or there is still room.
    pub fn is_selectable(&self, index: usize) -> bool {
        index < CELL_COUNT && (self.is_selected(index) || !self.is_full())
    }

    /// Flip the cell at `index`. Dropping is always allowed; adding fails at the cap.
    pub fn toggle(&mut self, index: usize) -> Result<Toggle, SelectionError> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(SelectionError::NoSuchCell(index))?;
        if cell.selected {
            cell.selected = false;
            let value = cell.value;
            self.picked.retain(|&v| v != value);
            return Ok(Toggle::Removed(value));
        }
        if self.picked.len() >= SELECTION_CAP {
            return Err(SelectionError::SelectionFull);
        }
        cell.selected = true;
        self.picked.push(cell.value);
        Ok(Toggle::Added(cell.value))
    }

    /// Pick up to `count` random unpicked numbers, never exceeding the cap.
    /// Returns the values appended, in the order they were appended.
    pub fn quick_fill<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<u8> {
        let mut available: Vec<usize> = (0..CELL_COUNT)
            .filter(|&i| !self.cells[i].selected)
            .collect();
        available.shuffle(rng);
        let take = count.min(self.remaining_capacity()).min(available.len());
        let mut added = Vec::with_capacity(take);
        for &i in &available[..take] {
            let cell = &mut self.cells[i];
            cell.selected = true;
            self.picked.push(cell.value);
            added.push(cell.value);
        }
        added
    }

    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.selected = false;
        }
        self.picked.clear();
    }
}
