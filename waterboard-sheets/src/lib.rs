//! Staff-cadre sheets.
//!
//! Pure, synchronous sheet model: raw cell text in, derived columns and
//! totals out. No I/O; the cloud crate stores the collected payloads like
//! any other record.

pub mod command;
pub mod model;
pub mod payload;

pub use command::{Column, Recalc, SheetCommand, SheetError};
pub use model::{coerce_num, derive_row, Derived, Row, Sheet, SheetConfig, Totals};
pub use payload::{collect_payload, RowSnapshot, SheetMeta, SheetPayload, TotalsSnapshot};
