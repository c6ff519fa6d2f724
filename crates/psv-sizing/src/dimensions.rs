//! API 526 reference data: flange ratings, valve sizes and center-to-face
//! dimensions.

use crate::error::SizingError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlangeRating {
    Class150,
    Class300,
    Class600,
    Class900,
    Class1500,
    Class2500,
}

impl FlangeRating {
    pub const ALL: [FlangeRating; 6] = [
        Self::Class150,
        Self::Class300,
        Self::Class600,
        Self::Class900,
        Self::Class1500,
        Self::Class2500,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Class150 => "150#",
            Self::Class300 => "300#",
            Self::Class600 => "600#",
            Self::Class900 => "900#",
            Self::Class1500 => "1500#",
            Self::Class2500 => "2500#",
        }
    }

    /// Highest set pressure the inlet flange class is good for [barg].
    pub fn max_set_pressure_barg(&self) -> f64 {
        match self {
            Self::Class150 => 19.6,
            Self::Class300 => 51.1,
            Self::Class600 => 102.1,
            Self::Class900 => 153.2,
            Self::Class1500 => 255.3,
            Self::Class2500 => 425.5,
        }
    }
}

impl fmt::Display for FlangeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FlangeRating {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_end_matches('#')
            .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == ' ');
        match digits {
            "150" => Ok(Self::Class150),
            "300" => Ok(Self::Class300),
            "600" => Ok(Self::Class600),
            "900" => Ok(Self::Class900),
            "1500" => Ok(Self::Class1500),
            "2500" => Ok(Self::Class2500),
            _ => Err(SizingError::InvalidInput {
                what: "flange rating must be one of 150#, 300#, 600#, 900#, 1500#, 2500#",
            }),
        }
    }
}

impl Serialize for FlangeRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for FlangeRating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Center-to-face dimensions [mm].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterToFace {
    pub inlet_mm: f64,
    pub outlet_mm: f64,
}

/// Nominal inlet and outlet sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValveSize {
    pub inlet: &'static str,
    pub outlet: &'static str,
}

impl fmt::Display for ValveSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.inlet, self.outlet)
    }
}

const VALVE_SIZES: [(char, &str, &str); 14] = [
    ('D', "1\"", "2\""),
    ('E', "1\"", "2\""),
    ('F', "1.5\"", "2\""),
    ('G', "1.5\"", "2.5\""),
    ('H', "1.5\"", "3\""),
    ('J', "2\"", "3\""),
    ('K', "3\"", "4\""),
    ('L', "3\"", "4\""),
    ('M', "4\"", "6\""),
    ('N', "4\"", "6\""),
    ('P', "4\"", "6\""),
    ('Q', "6\"", "8\""),
    ('R', "6\"", "8\""),
    ('T', "8\"", "10\""),
];

/// Inlet x outlet size for an API 526 letter.
pub fn api_526_valve_size(designation: char) -> Option<ValveSize> {
    let designation = designation.to_ascii_uppercase();
    VALVE_SIZES
        .iter()
        .find(|(letter, _, _)| *letter == designation)
        .map(|&(_, inlet, outlet)| ValveSize { inlet, outlet })
}

use FlangeRating::{Class150 as C150, Class300 as C300, Class600 as C600, Class900 as C900, Class1500 as C1500};

#[rustfmt::skip]
const CENTER_TO_FACE: [(char, FlangeRating, FlangeRating, f64, f64); 45] = [
    ('D', C150, C150, 105.0, 114.0), ('D', C300, C150, 105.0, 114.0), ('D', C600, C150, 105.0, 114.0),
    ('D', C900, C300, 140.0, 165.0), ('D', C1500, C300, 140.0, 165.0),
    ('E', C150, C150, 105.0, 121.0), ('E', C300, C150, 105.0, 121.0), ('E', C600, C150, 105.0, 121.0),
    ('E', C900, C300, 140.0, 165.0), ('E', C1500, C300, 140.0, 165.0),
    ('F', C150, C150, 124.0, 121.0), ('F', C300, C150, 124.0, 121.0), ('F', C600, C150, 124.0, 121.0),
    ('G', C150, C150, 124.0, 121.0), ('G', C300, C150, 124.0, 121.0), ('G', C600, C150, 124.0, 121.0),
    ('H', C150, C150, 130.0, 124.0), ('H', C300, C150, 130.0, 124.0), ('H', C600, C150, 130.0, 124.0),
    ('J', C150, C150, 137.0, 124.0), ('J', C300, C150, 137.0, 124.0), ('J', C600, C150, 137.0, 124.0),
    ('K', C150, C150, 156.0, 162.0), ('K', C300, C150, 156.0, 162.0), ('K', C600, C150, 156.0, 162.0),
    ('L', C150, C150, 156.0, 165.0), ('L', C300, C150, 156.0, 165.0), ('L', C600, C150, 156.0, 165.0),
    ('M', C150, C150, 181.0, 184.0), ('M', C300, C150, 181.0, 184.0), ('M', C600, C150, 181.0, 184.0),
    ('N', C150, C150, 197.0, 197.0), ('N', C300, C150, 197.0, 197.0), ('N', C600, C150, 197.0, 197.0),
    ('P', C150, C150, 181.0, 229.0), ('P', C300, C150, 181.0, 229.0), ('P', C600, C150, 181.0, 229.0),
    ('Q', C150, C150, 240.0, 241.0), ('Q', C300, C150, 240.0, 241.0), ('Q', C600, C150, 240.0, 241.0),
    ('R', C150, C150, 240.0, 267.0), ('R', C300, C150, 240.0, 267.0), ('R', C600, C150, 240.0, 267.0),
    ('T', C150, C150, 276.0, 279.0), ('T', C300, C150, 276.0, 279.0),
];

/// Standard center-to-face dimensions, or `None` when the combination is not
/// standardized.
pub fn api_526_dimensions(
    designation: char,
    inlet: FlangeRating,
    outlet: FlangeRating,
) -> Option<CenterToFace> {
    let designation = designation.to_ascii_uppercase();
    CENTER_TO_FACE
        .iter()
        .find(|(letter, i, o, _, _)| *letter == designation && *i == inlet && *o == outlet)
        .map(|&(_, _, _, inlet_mm, outlet_mm)| CenterToFace {
            inlet_mm,
            outlet_mm,
        })
}
