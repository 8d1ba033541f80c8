//! Sheet model and derived-field calculation.
//!
//! Cells hold raw text exactly as entered. Numbers are coerced at
//! calculation time: blank or non-numeric reads as zero, so a half-filled
//! row still yields derived values instead of being skipped.

use serde::{Deserialize, Serialize};

/// Per-sheet configuration.
///
/// Most sheets compute column H as F + G; a few take H as a direct input
/// (their forms have no F/G columns). The toggle lives here so the formula
/// set is data, not a sheet-type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub key: String,
    pub title: String,
    pub h_is_input: bool,
}

impl SheetConfig {
    pub fn new(key: &str, title: &str, h_is_input: bool) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            h_is_input,
        }
    }
}

/// Coerces raw cell text to a number. Blank, non-numeric and non-finite
/// input all read as zero.
pub fn coerce_num(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// One sheet row: the designation name, the raw input cells and remarks.
///
/// A = approved cadre, B/C/D = staffing splits summed into E,
/// F/G = feed into H (or `h_direct` on direct-input sheets).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub name: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub f: String,
    pub g: String,
    pub h_direct: String,
    pub remarks: String,
}

impl Row {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Derived columns of one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    pub e: f64,
    pub h: f64,
    pub i: f64,
}

/// Computes the derived columns: E = B + C + D, H = F + G (or the direct
/// input), I = H - E. A negative I means surplus staff and is reported
/// as-is.
pub fn derive_row(row: &Row, config: &SheetConfig) -> Derived {
    let e = coerce_num(&row.b) + coerce_num(&row.c) + coerce_num(&row.d);
    let h = if config.h_is_input {
        coerce_num(&row.h_direct)
    } else {
        coerce_num(&row.f) + coerce_num(&row.g)
    };
    Derived { e, h, i: h - e }
}

/// Column totals across all rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub i: f64,
}

/// One cadre sheet: configuration plus its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub config: SheetConfig,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            config,
            rows: Vec::new(),
        }
    }

    /// Builds a sheet pre-populated with the standard designation rows.
    pub fn with_designations(config: SheetConfig, designations: &[&str]) -> Self {
        Self {
            rows: designations.iter().map(|name| Row::named(name)).collect(),
            config,
        }
    }

    pub fn derived(&self, row: usize) -> Option<Derived> {
        self.rows.get(row).map(|r| derive_row(r, &self.config))
    }

    /// Sums every column. Derived columns are recomputed from the raw
    /// cells, never read back from a snapshot.
    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for row in &self.rows {
            let derived = derive_row(row, &self.config);
            totals.a += coerce_num(&row.a);
            totals.b += coerce_num(&row.b);
            totals.c += coerce_num(&row.c);
            totals.d += coerce_num(&row.d);
            totals.e += derived.e;
            totals.f += coerce_num(&row.f);
            totals.g += coerce_num(&row.g);
            totals.h += derived.h;
            totals.i += derived.i;
        }
        totals
    }
}
