use crate::{error::Error, sweep::Coordinate};
use num_traits::ToPrimitive;
use ratatui::layout::Rect;

/// Where board cells sit on screen, in terminal character cells.
///
/// Cell `(x, y)` has its top-left corner at
/// `(padding + x * (cell_width + spacing), padding + top_margin + y * (cell_height + spacing))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, typed_builder::TypedBuilder)]
pub(crate) struct BoardLayout {
    #[builder(default = 5)]
    pub(crate) cell_width: usize,
    #[builder(default = 3)]
    pub(crate) cell_height: usize,
    #[builder(default = 0)]
    pub(crate) spacing: usize,
    #[builder(default = 1)]
    pub(crate) padding: usize,
    #[builder(default = 3)]
    pub(crate) top_margin: usize,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Splits a position along one axis into a cell index, rejecting positions
/// that land in a gutter or past the last cell.
fn axis_cell(position: usize, size: usize, spacing: usize, cells: usize) -> Option<usize> {
    let stride = size + spacing;
    let index = position.checked_div(stride)?;
    (position % stride < size && index < cells).then_some(index)
}

impl BoardLayout {
    pub(crate) fn cell_origin(&self, (x, y): Coordinate) -> (usize, usize) {
        (
            self.padding + x * (self.cell_width + self.spacing),
            self.padding + self.top_margin + y * (self.cell_height + self.spacing),
        )
    }

    /// Screen rectangle of a cell, `None` if it does not fit in terminal
    /// coordinates.
    pub(crate) fn cell_rect(&self, coord: Coordinate) -> Option<Rect> {
        let (left, top) = self.cell_origin(coord);
        Some(Rect::new(
            left.to_u16()?,
            top.to_u16()?,
            self.cell_width.to_u16()?,
            self.cell_height.to_u16()?,
        ))
    }

    /// Inverse of [`BoardLayout::cell_origin`]: the cell under a 0-based
    /// screen position on a `width` x `height` board.
    pub(crate) fn cell_at(
        &self,
        column: u16,
        row: u16,
        width: usize,
        height: usize,
    ) -> Option<Coordinate> {
        let column = usize::from(column).checked_sub(self.padding)?;
        let row = usize::from(row).checked_sub(self.padding + self.top_margin)?;
        Some((
            axis_cell(column, self.cell_width, self.spacing, width)?,
            axis_cell(row, self.cell_height, self.spacing, height)?,
        ))
    }

    /// Columns and rows needed to draw a `width` x `height` board, status
    /// area included.
    pub(crate) fn window_size(&self, width: usize, height: usize) -> (usize, usize) {
        let extent = |cells: usize, size: usize| {
            cells * size + cells.saturating_sub(1) * self.spacing + 2 * self.padding
        };
        (
            extent(width, self.cell_width),
            extent(height, self.cell_height) + self.top_margin,
        )
    }

    /// [`BoardLayout::window_size`] in terminal coordinates. A board too
    /// large to address on a terminal is an error.
    pub(crate) fn terminal_size(&self, width: usize, height: usize) -> Result<(u16, u16), Error> {
        let (columns, rows) = self.window_size(width, height);
        Ok((
            columns.to_u16().ok_or(Error::ConvertUsizeToU16)?,
            rows.to_u16().ok_or(Error::ConvertUsizeToU16)?,
        ))
    }

    /// The status area above the board.
    pub(crate) fn status_rect(&self, width: usize) -> Option<Rect> {
        let (columns, _) = self.window_size(width, 1);
        Some(Rect::new(
            self.padding.to_u16()?,
            self.padding.to_u16()?,
            columns.checked_sub(2 * self.padding)?.to_u16()?,
            self.top_margin.to_u16()?,
        ))
    }
}
