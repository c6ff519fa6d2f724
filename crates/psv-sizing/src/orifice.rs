//! Orifice table and selection.

use crate::error::{CalcResult, SizingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One standard orifice size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrificeRecord {
    pub designation: char,
    /// Effective flow area [mm²]
    pub area_mm2: f64,
    /// Highest set pressure for a threaded (non-flanged) body [barg]
    pub max_set_pressure_barg: f64,
}

/// Which designations a valve standard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandardFamily {
    /// API 526 letters D through T.
    Api526,
    /// Every letter B through T.
    NonApi,
}

impl StandardFamily {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Api526 => "API 526",
            Self::NonApi => "non-API",
        }
    }

    pub fn includes(&self, designation: char) -> bool {
        match self {
            Self::Api526 => API_526_LETTERS.contains(&designation),
            Self::NonApi => true,
        }
    }
}

impl fmt::Display for StandardFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StandardFamily {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "api526" | "api-526" => Ok(Self::Api526),
            "non-api" | "nonapi" => Ok(Self::NonApi),
            _ => Err(SizingError::InvalidInput {
                what: "orifice family must be api526 or non-api",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mounting {
    Flanged,
    /// Subject to the per-orifice set pressure limit.
    NonFlanged,
}

pub const API_526_LETTERS: [char; 14] = [
    'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'T',
];

const STANDARD_ORIFICES: [(char, f64, f64); 16] = [
    ('B', 28.0, 275.0),
    ('C', 57.0, 275.0),
    ('D', 71.0, 206.0),
    ('E', 126.0, 206.0),
    ('F', 198.0, 103.0),
    ('G', 325.0, 103.0),
    ('H', 506.0, 68.0),
    ('J', 830.0, 51.0),
    ('K', 1186.0, 41.0),
    ('L', 1841.0, 27.0),
    ('M', 2323.0, 20.0),
    ('N', 2800.0, 20.0),
    ('P', 4116.0, 13.0),
    ('Q', 7129.0, 10.0),
    ('R', 10323.0, 6.9),
    ('T', 16774.0, 4.1),
];

/// Orifice chosen for a calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrificeSelection {
    pub record: OrificeRecord,
    pub warnings: Vec<String>,
}

/// Orifice sizes ordered by strictly increasing area.
#[derive(Debug, Clone, PartialEq)]
pub struct OrificeTable {
    records: Vec<OrificeRecord>,
}

impl Default for OrificeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl OrificeTable {
    /// Built-in letters B through T.
    pub fn standard() -> Self {
        Self {
            records: STANDARD_ORIFICES
                .iter()
                .map(|&(designation, area_mm2, max_set_pressure_barg)| OrificeRecord {
                    designation,
                    area_mm2,
                    max_set_pressure_barg,
                })
                .collect(),
        }
    }

    /// Caller-supplied table; must be non-empty with unique letters and
    /// strictly increasing positive areas.
    pub fn new(records: Vec<OrificeRecord>) -> CalcResult<Self> {
        if records.is_empty() {
            return Err(SizingError::InvalidInput {
                what: "orifice table is empty",
            });
        }
        for record in &records {
            if !record.area_mm2.is_finite() || record.area_mm2 <= 0.0 {
                return Err(SizingError::InvalidInput {
                    what: "orifice area must be positive and finite",
                });
            }
            if record.max_set_pressure_barg.is_nan() || record.max_set_pressure_barg <= 0.0 {
                return Err(SizingError::InvalidInput {
                    what: "orifice pressure limit must be positive",
                });
            }
        }
        if records.windows(2).any(|w| w[1].area_mm2 <= w[0].area_mm2) {
            return Err(SizingError::InvalidInput {
                what: "orifice areas must be strictly increasing",
            });
        }
        for (i, record) in records.iter().enumerate() {
            if records[..i]
                .iter()
                .any(|other| other.designation == record.designation)
            {
                return Err(SizingError::InvalidInput {
                    what: "orifice designations must be unique",
                });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[OrificeRecord] {
        &self.records
    }

    /// Records offered by `family`, in increasing-area order.
    pub fn family(&self, family: StandardFamily) -> impl Iterator<Item = &OrificeRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| family.includes(r.designation))
    }

    pub fn get(&self, designation: char) -> Option<&OrificeRecord> {
        let designation = designation.to_ascii_uppercase();
        self.records.iter().find(|r| r.designation == designation)
    }

    /// Smallest orifice in `family` whose area covers `required_mm2` and whose
    /// pressure limit (non-flanged only) admits the set pressure.
    pub fn select_for_area(
        &self,
        required_mm2: f64,
        family: StandardFamily,
        mounting: Mounting,
        set_pressure_barg: f64,
    ) -> CalcResult<OrificeRecord> {
        if !required_mm2.is_finite() || required_mm2 < 0.0 {
            return Err(SizingError::InvalidInput {
                what: "required area must be finite and non-negative",
            });
        }

        let selected = self
            .family(family)
            .filter(|r| r.area_mm2 >= required_mm2)
            .find(|r| match mounting {
                Mounting::Flanged => true,
                Mounting::NonFlanged => set_pressure_barg <= r.max_set_pressure_barg,
            })
            .copied();

        match selected {
            Some(record) => {
                tracing::debug!(
                    required_mm2,
                    designation = %record.designation,
                    area_mm2 = record.area_mm2,
                    "orifice selected"
                );
                Ok(record)
            }
            None => Err(SizingError::NoOrificeFound {
                family: family.label(),
                required_mm2,
                set_pressure_barg,
            }),
        }
    }

    /// Look up a caller-chosen designation for a capacity calculation.
    ///
    /// Exceeding the pressure limit or picking a letter outside the family only
    /// produces warnings.
    pub fn select_by_designation(
        &self,
        designation: &str,
        family: StandardFamily,
        mounting: Mounting,
        set_pressure_barg: f64,
    ) -> CalcResult<OrificeSelection> {
        let letter = parse_designation(designation)?;
        let record = *self.get(letter).ok_or_else(|| SizingError::UnknownOrifice {
            designation: designation.trim().to_string(),
        })?;

        let mut warnings = Vec::new();
        if !family.includes(record.designation) {
            warnings.push(format!(
                "Orifice {} is outside the {} family",
                record.designation,
                family.label()
            ));
        }
        if mounting == Mounting::NonFlanged && set_pressure_barg > record.max_set_pressure_barg {
            tracing::warn!(
                designation = %record.designation,
                set_pressure_barg,
                limit_barg = record.max_set_pressure_barg,
                "set pressure exceeds orifice rating"
            );
            warnings.push(format!(
                "Set pressure ({set_pressure_barg:.1} barg) exceeds orifice {} rating ({} barg)",
                record.designation, record.max_set_pressure_barg
            ));
        }

        Ok(OrificeSelection { record, warnings })
    }
}

fn parse_designation(text: &str) -> CalcResult<char> {
    let mut chars = text.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(SizingError::UnknownOrifice {
            designation: text.trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn just_below_breakpoint_selects_that_letter() {
        let table = OrificeTable::standard();
        let d = table
            .select_for_area(70.0, StandardFamily::Api526, Mounting::Flanged, 10.0)
            .unwrap();
        assert_eq!(d.designation, 'D');
        assert_eq!(d.area_mm2, 71.0);

        let exact = table
            .select_for_area(71.0, StandardFamily::Api526, Mounting::Flanged, 10.0)
            .unwrap();
        assert_eq!(exact.designation, 'D');

        let e = table
            .select_for_area(71.5, StandardFamily::Api526, Mounting::Flanged, 10.0)
            .unwrap();
        assert_eq!(e.designation, 'E');
    }

    #[test]
    fn api_family_skips_b_and_c() {
        let table = OrificeTable::standard();
        let api = table
            .select_for_area(20.0, StandardFamily::Api526, Mounting::Flanged, 10.0)
            .unwrap();
        assert_eq!(api.designation, 'D');

        let non_api = table
            .select_for_area(20.0, StandardFamily::NonApi, Mounting::NonFlanged, 10.0)
            .unwrap();
        assert_eq!(non_api.designation, 'B');
    }

    #[test]
    fn non_flanged_limit_pushes_to_next_allowed_size() {
        let table = OrificeTable::standard();
        // F is limited to 103 barg threaded, and so is G; H is lower still.
        let err = table
            .select_for_area(150.0, StandardFamily::NonApi, Mounting::NonFlanged, 150.0)
            .unwrap_err();
        assert!(matches!(err, SizingError::NoOrificeFound { .. }));

        let flanged = table
            .select_for_area(150.0, StandardFamily::NonApi, Mounting::Flanged, 150.0)
            .unwrap();
        assert_eq!(flanged.designation, 'F');
    }

    #[test]
    fn area_above_largest_is_no_orifice_found() {
        let table = OrificeTable::standard();
        let err = table
            .select_for_area(20_000.0, StandardFamily::Api526, Mounting::Flanged, 5.0)
            .unwrap_err();
        assert!(err.to_string().contains("20000.00"));
    }

    #[test]
    fn capacity_lookup_warns_but_succeeds() {
        let table = OrificeTable::standard();
        let sel = table
            .select_by_designation("t", StandardFamily::NonApi, Mounting::NonFlanged, 10.0)
            .unwrap();
        assert_eq!(sel.record.designation, 'T');
        assert_eq!(sel.warnings.len(), 1);

        let b = table
            .select_by_designation("B", StandardFamily::Api526, Mounting::Flanged, 10.0)
            .unwrap();
        assert!(b.warnings[0].contains("outside the API 526 family"));

        assert!(matches!(
            table.select_by_designation("Z", StandardFamily::NonApi, Mounting::Flanged, 1.0),
            Err(SizingError::UnknownOrifice { .. })
        ));
        assert!(table
            .select_by_designation("DE", StandardFamily::NonApi, Mounting::Flanged, 1.0)
            .is_err());
    }

    #[test]
    fn custom_table_must_increase() {
        let rec = |designation, area_mm2| OrificeRecord {
            designation,
            area_mm2,
            max_set_pressure_barg: 100.0,
        };
        assert!(OrificeTable::new(vec![rec('A', 10.0), rec('B', 20.0)]).is_ok());
        assert!(OrificeTable::new(vec![rec('A', 20.0), rec('B', 20.0)]).is_err());
        assert!(OrificeTable::new(vec![rec('A', 10.0), rec('A', 20.0)]).is_err());
        assert!(OrificeTable::new(vec![]).is_err());
    }

    proptest! {
        #[test]
        fn selection_is_smallest_covering(required in 0.0f64..16_774.0, api in any::<bool>()) {
            let table = OrificeTable::standard();
            let family = if api { StandardFamily::Api526 } else { StandardFamily::NonApi };
            let chosen = table
                .select_for_area(required, family, Mounting::Flanged, 1.0)
                .unwrap();
            prop_assert!(chosen.area_mm2 >= required);
            for smaller in table.family(family).filter(|r| r.area_mm2 < chosen.area_mm2) {
                prop_assert!(smaller.area_mm2 < required);
            }
        }
    }
}
