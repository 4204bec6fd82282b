//! Untyped result sets for ad-hoc report queries

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

/// A single report value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Option<String>> for Cell {
    fn from(v: Option<String>) -> Self {
        v.map(Cell::Text).unwrap_or(Cell::Null)
    }
}

/// Column names plus rows, in query order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub keys: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column named `key`.
    pub fn column(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Append a column, computing each row's value from the existing row.
    pub fn push_column(&mut self, key: &str, mut value: impl FnMut(&[Cell]) -> Cell) {
        for row in &mut self.rows {
            let cell = value(row);
            row.push(cell);
        }
        self.keys.push(key.to_string());
    }

    /// The first `limit` rows, and whether any were cut off.
    pub fn truncated(&self, limit: usize) -> (&[Vec<Cell>], bool) {
        if self.rows.len() > limit {
            (&self.rows[..limit], true)
        } else {
            (&self.rows[..], false)
        }
    }

    /// Decode database rows under `keys`, the statement's column names.
    ///
    /// Keys come from the prepared statement rather than the first row so
    /// an empty result still has its header.
    pub fn from_rows(keys: Vec<String>, rows: &[PgRow]) -> Result<Self, sqlx::Error> {
        let rows = rows
            .iter()
            .map(|row| (0..row.len()).map(|idx| decode_cell(row, idx)).collect())
            .collect::<Result<Vec<Vec<Cell>>, _>>()?;

        Ok(Self { keys, rows })
    }
}

fn decode_cell(row: &PgRow, idx: usize) -> Result<Cell, sqlx::Error> {
    let type_name = row.columns()[idx].type_info().name().to_string();

    let cell = match type_name.as_str() {
        "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Cell::Bool),
        "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(|v| Cell::Int(v.into())),
        "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(|v| Cell::Int(v.into())),
        "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Cell::Int),
        "FLOAT4" => row.try_get::<Option<f32>, _>(idx)?.map(|v| Cell::Float(v.into())),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Cell::Float),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(idx)?
            .map(|d| Cell::Text(d.format("%Y-%m-%d").to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(idx)?
            .map(|t| Cell::Text(t.format("%H:%M").to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|t| Cell::Text(t.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|t| Cell::Text(t.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row.try_get::<Option<String>, _>(idx)?.map(Cell::Text),
        other => match row.try_get::<Option<String>, _>(idx) {
            Ok(v) => v.map(Cell::Text),
            Err(e) => {
                tracing::warn!(column = idx, type_name = other, error = %e, "Unsupported report column type");
                None
            }
        },
    };

    Ok(cell.unwrap_or(Cell::Null))
}
