//! Sheet snapshot payloads.
//!
//! A saved sheet is one document in the `hrmSheets` collection: metadata,
//! every row with its derived values baked in, and the column totals. The
//! wire field names are the sheet's column letters.

use crate::model::{coerce_num, derive_row, Sheet, Totals};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use waterboard_types::now_iso;

/// Free-text context captured above the sheet. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMeta {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub connections: String,
    #[serde(default)]
    pub capacity: String,
}

/// One row as stored: raw inputs coerced to numbers, derived columns
/// included so readers never recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub name: String,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "F")]
    pub f: f64,
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "I")]
    pub i: f64,
    pub remarks: String,
}

/// Full sheet snapshot, the document shape of the `hrmSheets` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPayload {
    pub sheet_key: String,
    pub meta: SheetMeta,
    pub rows: Vec<RowSnapshot>,
    pub totals: TotalsSnapshot,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub updated_at: Value,
}

/// Totals with the wire column names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsSnapshot {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "F")]
    pub f: f64,
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "I")]
    pub i: f64,
}

impl From<Totals> for TotalsSnapshot {
    fn from(t: Totals) -> Self {
        Self {
            a: t.a,
            b: t.b,
            c: t.c,
            d: t.d,
            e: t.e,
            f: t.f,
            g: t.g,
            h: t.h,
            i: t.i,
        }
    }
}

/// Collects the full snapshot of a sheet, stamped with the current time.
pub fn collect_payload(sheet: &Sheet, meta: &SheetMeta) -> SheetPayload {
    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            let derived = derive_row(row, &sheet.config);
            RowSnapshot {
                name: row.name.clone(),
                a: coerce_num(&row.a),
                b: coerce_num(&row.b),
                c: coerce_num(&row.c),
                d: coerce_num(&row.d),
                e: derived.e,
                f: coerce_num(&row.f),
                g: coerce_num(&row.g),
                h: derived.h,
                i: derived.i,
                remarks: row.remarks.clone(),
            }
        })
        .collect();

    SheetPayload {
        sheet_key: sheet.config.key.clone(),
        meta: meta.clone(),
        rows,
        totals: sheet.totals().into(),
        updated_at: Value::String(now_iso()),
    }
}
