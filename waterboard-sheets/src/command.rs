//! Sheet edit commands.
//!
//! Edits arrive as explicit commands instead of cell-level listeners, so
//! every mutation goes through one dispatch point and recalculation is a
//! consequence of the data model, not of the input surface.

use crate::model::{derive_row, Derived, Row, Sheet, Totals};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    #[error("row {row} out of range (sheet has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
}

/// Editable columns. E, H (on computed sheets) and I are derived and have
/// no command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    A,
    B,
    C,
    D,
    F,
    G,
    /// The direct H input, only meaningful when the sheet's
    /// `h_is_input` is set.
    HDirect,
    Remarks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCommand {
    SetCell { row: usize, col: Column, raw: String },
    SetName { row: usize, name: String },
    AddRow,
    ClearAll,
}

/// What a single command changed: the affected row's fresh derived values
/// (when one row was edited) and the always-fresh column totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Recalc {
    pub row: Option<(usize, Derived)>,
    pub totals: Totals,
}

impl Sheet {
    /// Applies one command and recomputes what it affected.
    pub fn apply(&mut self, command: SheetCommand) -> Result<Recalc, SheetError> {
        let row = match command {
            SheetCommand::SetCell { row, col, raw } => {
                let cell = self.cell_mut(row, col)?;
                *cell = raw;
                Some(row)
            }
            SheetCommand::SetName { row, name } => {
                self.row_mut(row)?.name = name;
                Some(row)
            }
            SheetCommand::AddRow => {
                self.rows.push(Row::default());
                None
            }
            SheetCommand::ClearAll => {
                // Designation names survive a clear; only the data cells go.
                for row in &mut self.rows {
                    let name = std::mem::take(&mut row.name);
                    *row = Row::named(&name);
                }
                None
            }
        };

        Ok(Recalc {
            row: row.map(|r| (r, derive_row(&self.rows[r], &self.config))),
            totals: self.totals(),
        })
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut Row, SheetError> {
        let len = self.rows.len();
        self.rows
            .get_mut(row)
            .ok_or(SheetError::RowOutOfRange { row, len })
    }

    fn cell_mut(&mut self, row: usize, col: Column) -> Result<&mut String, SheetError> {
        let row = self.row_mut(row)?;
        Ok(match col {
            Column::A => &mut row.a,
            Column::B => &mut row.b,
            Column::C => &mut row.c,
            Column::D => &mut row.d,
            Column::F => &mut row.f,
            Column::G => &mut row.g,
            Column::HDirect => &mut row.h_direct,
            Column::Remarks => &mut row.remarks,
        })
    }
}
