//! Pointer-gesture state machine that turns drags into cell writes.
//!
//! # Responsibility
//! - Track whether a paint drag is active and which button started it.
//! - Write the matching brush into the field for each visited cell.
//!
//! # Invariants
//! - Only primary and secondary buttons start a drag.
//! - The button recorded at `pointer_down` decides the brush for the whole
//!   gesture.
//! - `pointer_up` and `pointer_leave_canvas` always end the gesture.
//! - No cell is written while idle.
//!
//! Context-menu suppression for the secondary button belongs to the host.

use crate::model::field::{Field, FieldError};
use crate::model::selection::{BrushSlot, Selection};

/// Pointer button as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u8),
}

impl PointerButton {
    /// Maps DOM `MouseEvent.button` codes (0 left, 1 middle, 2 right).
    pub fn from_dom_button(code: u8) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }

    /// Brush painted by this button, if it paints at all.
    pub fn brush_slot(self) -> Option<BrushSlot> {
        match self {
            Self::Primary => Some(BrushSlot::Foreground),
            Self::Secondary => Some(BrushSlot::Background),
            Self::Middle | Self::Other(_) => None,
        }
    }
}

/// Gesture state; not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaintState {
    #[default]
    Idle,
    Dragging(PointerButton),
}

/// Interprets pointer events against a field and a brush selection.
#[derive(Debug, Clone, Default)]
pub struct PaintController {
    state: PaintState,
}

impl PaintController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PaintState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PaintState::Dragging(_))
    }

    /// Starts a drag and paints the pressed cell.
    ///
    /// Buttons without a brush are ignored entirely. The drag starts even if
    /// the cell address is rejected by the field.
    ///
    /// Returns whether a cell was written.
    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        row: usize,
        col: usize,
        field: &mut Field,
        selection: &Selection,
    ) -> Result<bool, FieldError> {
        if button.brush_slot().is_none() {
            return Ok(false);
        }
        self.state = PaintState::Dragging(button);
        self.paint(row, col, field, selection)
    }

    /// Paints the entered cell while a drag is active.
    pub fn pointer_over(
        &mut self,
        row: usize,
        col: usize,
        field: &mut Field,
        selection: &Selection,
    ) -> Result<bool, FieldError> {
        self.paint(row, col, field, selection)
    }

    pub fn pointer_up(&mut self) {
        self.state = PaintState::Idle;
    }

    /// Leaving the canvas cancels the gesture; re-entering does not resume it.
    pub fn pointer_leave_canvas(&mut self) {
        self.state = PaintState::Idle;
    }

    fn paint(
        &self,
        row: usize,
        col: usize,
        field: &mut Field,
        selection: &Selection,
    ) -> Result<bool, FieldError> {
        let PaintState::Dragging(button) = self.state else {
            return Ok(false);
        };
        let Some(slot) = button.brush_slot() else {
            return Ok(false);
        };
        field.set_cell(row, col, selection.brush(slot))?;
        Ok(true)
    }
}
