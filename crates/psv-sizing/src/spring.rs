//! Spring range resolver.
//!
//! The range table is CSV text: a header naming the spring-id column followed by
//! one column per orifice letter, then one row per spring. Cells hold
//! `"<min>-<max>"` in barg; blank cells mean the spring does not fit that
//! orifice.
//!
//! ```text
//! Spring,D,E,F
//! S-101,0.5-3.0,0.5-2.5,
//! S-102,3.0-8.0,2.5-7.0,1.0-6.0
//! ```
//!
//! Lookups never fail hard: every miss is a [`SpringLookup`] variant the caller
//! can render.

use crate::error::{CalcResult, SizingError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpringRange {
    pub spring_id: String,
    pub min_barg: f64,
    pub max_barg: f64,
}

impl SpringRange {
    pub fn contains(&self, set_pressure_barg: f64) -> bool {
        (self.min_barg..=self.max_barg).contains(&set_pressure_barg)
    }
}

/// Outcome of a spring lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpringLookup {
    Found(SpringRange),
    /// The column has ranges but none contains the set pressure.
    OutOfRange,
    /// The column exists but holds no readable range.
    RangeNotFound { reason: String },
    /// No table, or no column for the orifice.
    Unavailable { reason: String },
}

impl SpringLookup {
    pub fn label(&self) -> String {
        match self {
            Self::Found(range) => format!(
                "{} ({:.2}-{:.2} barg)",
                range.spring_id, range.min_barg, range.max_barg
            ),
            Self::OutOfRange => "Out of Spring Range".to_string(),
            Self::RangeNotFound { .. } => "Range not found".to_string(),
            Self::Unavailable { .. } => "Spring table unavailable".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SpringRow {
    spring_id: String,
    cells: Vec<String>,
}

/// Parsed spring range table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringTable {
    columns: Vec<String>,
    rows: Vec<SpringRow>,
}

impl SpringTable {
    /// Parse CSV text. Only the header shape is checked here; cell contents
    /// are interpreted at lookup time.
    pub fn parse(text: &str) -> CalcResult<Self> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let header = lines.next().ok_or_else(|| SizingError::RangeNotFound {
            what: "spring table is empty".to_string(),
        })?;
        let mut header_cells = split_csv_line(header);
        if header_cells.len() < 2 {
            return Err(SizingError::RangeNotFound {
                what: "spring table header needs a spring column and at least one orifice column"
                    .to_string(),
            });
        }
        header_cells.remove(0);
        let columns = header_cells
            .into_iter()
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let rows = lines
            .map(|line| {
                let mut cells = split_csv_line(line);
                let spring_id = if cells.is_empty() {
                    String::new()
                } else {
                    cells.remove(0)
                };
                SpringRow { spring_id, cells }
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn orifice_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Spring whose range for `designation` contains the set pressure.
    pub fn resolve(&self, designation: char, set_pressure_barg: f64) -> SpringLookup {
        let key = designation.to_ascii_uppercase().to_string();
        let Some(column) = self.columns.iter().position(|c| *c == key) else {
            return SpringLookup::Unavailable {
                reason: format!("no spring column for orifice {key}"),
            };
        };

        let mut readable = 0usize;
        let mut malformed = 0usize;
        for row in &self.rows {
            let cell = row.cells.get(column).map(String::as_str).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            match parse_range(cell) {
                Some((min_barg, max_barg)) => {
                    readable += 1;
                    let range = SpringRange {
                        spring_id: row.spring_id.clone(),
                        min_barg,
                        max_barg,
                    };
                    if range.contains(set_pressure_barg) {
                        tracing::debug!(
                            orifice = %key,
                            spring = %range.spring_id,
                            set_pressure_barg,
                            "spring resolved"
                        );
                        return SpringLookup::Found(range);
                    }
                }
                None => {
                    malformed += 1;
                    tracing::warn!(
                        orifice = %key,
                        spring = %row.spring_id,
                        cell,
                        "unreadable spring range"
                    );
                }
            }
        }

        if readable == 0 {
            SpringLookup::RangeNotFound {
                reason: if malformed > 0 {
                    format!("{malformed} unreadable range(s) for orifice {key}")
                } else {
                    format!("no ranges listed for orifice {key}")
                },
            }
        } else {
            SpringLookup::OutOfRange
        }
    }

    /// Like [`resolve`](Self::resolve) but any miss is an error.
    pub fn resolve_strict(&self, designation: char, set_pressure_barg: f64) -> CalcResult<SpringRange> {
        match self.resolve(designation, set_pressure_barg) {
            SpringLookup::Found(range) => Ok(range),
            SpringLookup::OutOfRange => Err(SizingError::RangeNotFound {
                what: format!(
                    "no spring for orifice {designation} covers {set_pressure_barg:.2} barg"
                ),
            }),
            SpringLookup::RangeNotFound { reason } | SpringLookup::Unavailable { reason } => {
                Err(SizingError::RangeNotFound { what: reason })
            }
        }
    }
}

/// One CSV record. Double-quoted cells may hold commas; `""` is a literal quote.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

/// `"min-max"` with a hyphen or en dash; both bounds finite, min ≤ max.
fn parse_range(cell: &str) -> Option<(f64, f64)> {
    let (min, max) = cell.split_once('–').or_else(|| cell.split_once('-'))?;
    let min: f64 = min.trim().parse().ok()?;
    let max: f64 = max.trim().parse().ok()?;
    (min.is_finite() && max.is_finite() && min <= max).then_some((min, max))
}
