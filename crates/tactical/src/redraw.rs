use bitvec::vec::BitVec;

use crate::coord::{Cell, MAP_CELL_TOTAL};

/// Per-cell dirty bits consulted by the frame renderer.
///
/// Sized once per map load. `pending` records that anything at all asked for
/// a repaint since the renderer last ran.
#[derive(Debug, Clone)]
pub struct RedrawFlags {
    cells: BitVec,
    pending: bool,
}

impl Default for RedrawFlags {
    fn default() -> Self {
        Self::with_len(MAP_CELL_TOTAL as usize)
    }
}

impl RedrawFlags {
    pub fn with_len(len: usize) -> Self {
        Self {
            cells: BitVec::repeat(false, len),
            pending: true,
        }
    }

    /// Reallocates for a freshly loaded map. Never called mid-frame.
    pub fn resize(&mut self, len: usize) {
        self.cells = BitVec::repeat(false, len);
        self.pending = true;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn flag_cell(&mut self, cell: Cell) {
        let Some(index) = self.slot(cell) else {
            return;
        };
        self.cells.set(index, true);
        self.pending = true;
    }

    pub fn flag_all(&mut self) {
        self.cells.fill(true);
        self.pending = true;
    }

    pub fn is_flagged(&self, cell: Cell) -> bool {
        self.slot(cell)
            .and_then(|index| self.cells.get(index).map(|bit| *bit))
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn flagged_count(&self) -> usize {
        self.cells.count_ones()
    }

    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Reads and resets the "something to redraw" flag.
    pub fn take_pending(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    fn slot(&self, cell: Cell) -> Option<usize> {
        let index = usize::try_from(cell.0).ok()?;
        (index < self.cells.len()).then_some(index)
    }
}
