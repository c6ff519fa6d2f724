//! Unit normalizer.
//!
//! Process conditions arrive as a number plus a unit symbol (`"10 barg"`,
//! `"150 C"`, `"1000 kg/hr"`). Everything is converted to the base units the
//! sizing equations use:
//!
//! - pressure: kPa gauge, with [`normalize_pressure_abs`] adding the atmospheric
//!   reference of 101.325 kPa
//! - temperature: K
//! - flow: kg/h
//!
//! Every conversion has an exact inverse so a capacity can be reported back in
//! the unit the caller asked for.

use crate::error::{CalcResult, SizingError};
use psv_core::constants::ATM_KPA;
use psv_fluids::FluidProperties;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Normal molar volume at 0 °C, 1 atm [Nm³/kmol].
pub const NORMAL_MOLAR_VOLUME: f64 = 22.414;
/// Standard molar volume at 15 °C, 1 atm [Sm³/kmol].
pub const STANDARD_MOLAR_VOLUME: f64 = 23.64;
/// Standard molar volume at 60 °F, 14.696 psia [scf/lbmol].
pub const SCF_PER_LBMOL: f64 = 379.5;

const KG_PER_LB: f64 = 0.453_592;

/// A unit with a printable symbol.
pub trait UnitSymbol: Copy {
    fn symbol(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureUnit {
    Barg,
    Psig,
    KgCm2g,
    KPag,
}

impl PressureUnit {
    pub const ALL: [PressureUnit; 4] = [Self::Barg, Self::Psig, Self::KPag, Self::KgCm2g];

    /// Multiplier from this unit to kPa.
    pub fn kpa_factor(&self) -> f64 {
        match self {
            Self::Barg => 100.0,
            Self::Psig => 6.894_76,
            Self::KgCm2g => 98.066_5,
            Self::KPag => 1.0,
        }
    }
}

impl UnitSymbol for PressureUnit {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Barg => "barg",
            Self::Psig => "psig",
            Self::KgCm2g => "kg/cm2g",
            Self::KPag => "kPag",
        }
    }
}

impl FromStr for PressureUnit {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "barg" => Ok(Self::Barg),
            "psig" => Ok(Self::Psig),
            "kg/cm2g" | "kgf/cm2g" | "kg/cm²g" | "kgf/cm²g" => Ok(Self::KgCm2g),
            "kpag" => Ok(Self::KPag),
            "bar" | "psi" | "kpa" | "bara" | "psia" | "kpaa" => Err(SizingError::Unit {
                message: format!("'{s}' is not a gauge unit; use barg, psig, kPag or kg/cm2g"),
            }),
            _ => Err(SizingError::Unit {
                message: format!("unknown pressure unit '{s}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [Self::Celsius, Self::Fahrenheit, Self::Kelvin];
}

impl UnitSymbol for TemperatureUnit {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
            Self::Kelvin => "K",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "°c" | "degc" | "celsius" => Ok(Self::Celsius),
            "f" | "°f" | "degf" | "fahrenheit" => Ok(Self::Fahrenheit),
            "k" | "kelvin" => Ok(Self::Kelvin),
            _ => Err(SizingError::Unit {
                message: format!("unknown temperature unit '{s}'"),
            }),
        }
    }
}

/// How a flow unit relates to mass flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowBasis {
    Mass,
    /// Volumetric at reference conditions; needs molecular weight.
    GasVolumetric,
    /// Volumetric at flowing conditions; needs specific gravity.
    LiquidVolumetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowUnit {
    KgPerHr,
    LbPerHr,
    Nm3PerHr,
    Sm3PerHr,
    Scfm,
    Scfh,
    /// Normal litres per minute of gas.
    Lpm,
    M3PerHr,
    Lph,
}

impl FlowUnit {
    pub const ALL: [FlowUnit; 9] = [
        Self::KgPerHr,
        Self::LbPerHr,
        Self::Nm3PerHr,
        Self::Sm3PerHr,
        Self::Scfm,
        Self::Scfh,
        Self::Lpm,
        Self::M3PerHr,
        Self::Lph,
    ];

    pub fn basis(&self) -> FlowBasis {
        match self {
            Self::KgPerHr | Self::LbPerHr => FlowBasis::Mass,
            Self::Nm3PerHr | Self::Sm3PerHr | Self::Scfm | Self::Scfh | Self::Lpm => {
                FlowBasis::GasVolumetric
            }
            Self::M3PerHr | Self::Lph => FlowBasis::LiquidVolumetric,
        }
    }

    /// Kilomoles per hour represented by one unit of gas flow.
    fn kmol_per_hr(&self) -> f64 {
        match self {
            Self::Nm3PerHr => 1.0 / NORMAL_MOLAR_VOLUME,
            Self::Sm3PerHr => 1.0 / STANDARD_MOLAR_VOLUME,
            // lbmol/h -> kg/h at the end, so fold the lb factor in here
            Self::Scfm => 60.0 / SCF_PER_LBMOL * KG_PER_LB,
            Self::Scfh => KG_PER_LB / SCF_PER_LBMOL,
            Self::Lpm => 0.06 / NORMAL_MOLAR_VOLUME,
            _ => 0.0,
        }
    }

    /// Cubic metres per hour represented by one unit of liquid flow.
    fn m3_per_hr(&self) -> f64 {
        match self {
            Self::M3PerHr => 1.0,
            Self::Lph => 1.0e-3,
            _ => 0.0,
        }
    }
}

impl UnitSymbol for FlowUnit {
    fn symbol(&self) -> &'static str {
        match self {
            Self::KgPerHr => "kg/hr",
            Self::LbPerHr => "lb/hr",
            Self::Nm3PerHr => "Nm3/hr",
            Self::Sm3PerHr => "Sm3/hr",
            Self::Scfm => "SCFM",
            Self::Scfh => "SCFH",
            Self::Lpm => "LPM",
            Self::M3PerHr => "m3/hr",
            Self::Lph => "LPH",
        }
    }
}

impl FromStr for FlowUnit {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = s.trim();
        // Nm3 and m3 differ only by case, so match those before folding.
        match unit {
            "Nm3/hr" | "Nm3/h" | "Nm³/h" | "Nm³/hr" => return Ok(Self::Nm3PerHr),
            "Sm3/hr" | "Sm3/h" | "Sm³/h" | "Sm³/hr" => return Ok(Self::Sm3PerHr),
            "m3/hr" | "m3/h" | "m³/h" | "m³/hr" => return Ok(Self::M3PerHr),
            _ => {}
        }
        match unit.to_lowercase().as_str() {
            "kg/hr" | "kg/h" => Ok(Self::KgPerHr),
            "lb/hr" | "lb/h" | "lbm/hr" | "lbm/h" => Ok(Self::LbPerHr),
            "scfm" => Ok(Self::Scfm),
            "scfh" => Ok(Self::Scfh),
            "lpm" | "l/min" => Ok(Self::Lpm),
            "lph" | "l/h" | "l/hr" => Ok(Self::Lph),
            _ => Err(SizingError::Unit {
                message: format!("unknown flow unit '{unit}'"),
            }),
        }
    }
}

macro_rules! symbol_display_and_serde {
    ($($unit:ty),*) => {$(
        impl fmt::Display for $unit {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        }

        impl Serialize for $unit {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.symbol())
            }
        }

        impl<'de> Deserialize<'de> for $unit {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    )*};
}

symbol_display_and_serde!(PressureUnit, TemperatureUnit, FlowUnit);

/// A value tagged with the unit it was entered in.
///
/// Serialized as unit text, e.g. `"10 barg"`, keeping the caller's input
/// readable in case files and datasheets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measured<U> {
    pub value: f64,
    pub unit: U,
}

impl<U> Measured<U> {
    pub fn new(value: f64, unit: U) -> Self {
        Self { value, unit }
    }
}

impl<U: UnitSymbol> fmt::Display for Measured<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

impl<U: FromStr<Err = SizingError>> FromStr for Measured<U> {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = split_value_and_unit(s)?;
        if unit.is_empty() {
            return Err(SizingError::Unit {
                message: format!("'{}' has no unit", s.trim()),
            });
        }
        if !value.is_finite() {
            return Err(SizingError::Unit {
                message: format!("'{}' is not a finite number", s.trim()),
            });
        }
        Ok(Self {
            value,
            unit: unit.parse()?,
        })
    }
}

impl<U: UnitSymbol> Serialize for Measured<U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, U: FromStr<Err = SizingError>> Deserialize<'de> for Measured<U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Split a value+unit string into (numeric_value, unit_string).
///
/// Examples:
/// - "10 barg" -> (10.0, "barg")
/// - "150C" -> (150.0, "C")
/// - "-20 F" -> (-20.0, "F")
fn split_value_and_unit(input: &str) -> CalcResult<(f64, &str)> {
    let trimmed = input.trim();

    // Exponent markers only count when followed by a digit or sign.
    let bytes = trimmed.as_bytes();
    let split_idx = trimmed
        .char_indices()
        .find(|&(i, c)| {
            let exponent = (c == 'e' || c == 'E')
                && i > 0
                && bytes
                    .get(i + 1)
                    .is_some_and(|b| b.is_ascii_digit() || *b == b'-' || *b == b'+');
            !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || exponent)
        })
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let value: f64 = num_part.trim().parse().map_err(|_| SizingError::Unit {
        message: format!("could not parse numeric value from '{input}'"),
    })?;

    Ok((value, unit_part.trim()))
}

/// Convert a gauge pressure to kPa gauge.
pub fn normalize_pressure(value: f64, unit: PressureUnit) -> f64 {
    value * unit.kpa_factor()
}

/// Inverse of [`normalize_pressure`].
pub fn denormalize_pressure(gauge_kpa: f64, unit: PressureUnit) -> f64 {
    gauge_kpa / unit.kpa_factor()
}

/// Gauge kPa to absolute kPa.
pub fn normalize_pressure_abs(gauge_kpa: f64) -> f64 {
    gauge_kpa + ATM_KPA
}

/// Convert a temperature to kelvin; rejects values at or below absolute zero.
pub fn normalize_temperature(value: f64, unit: TemperatureUnit) -> CalcResult<f64> {
    let kelvin = match unit {
        TemperatureUnit::Celsius => value + 273.15,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + 273.15,
        TemperatureUnit::Kelvin => value,
    };
    if !kelvin.is_finite() || kelvin <= 0.0 {
        return Err(SizingError::InvalidInput {
            what: "absolute temperature must be > 0 K",
        });
    }
    Ok(kelvin)
}

pub fn denormalize_temperature(kelvin: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => kelvin - 273.15,
        TemperatureUnit::Fahrenheit => (kelvin - 273.15) * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Kelvin => kelvin,
    }
}

/// Multiplier from one unit of `unit` to kg/h for the given fluid.
fn kg_per_hr_factor(unit: FlowUnit, props: &FluidProperties) -> CalcResult<f64> {
    match unit.basis() {
        FlowBasis::Mass => Ok(match unit {
            FlowUnit::LbPerHr => KG_PER_LB,
            _ => 1.0,
        }),
        FlowBasis::GasVolumetric => {
            let mw = props.molecular_weight;
            if !mw.is_finite() || mw <= 0.0 {
                return Err(SizingError::InvalidProperty {
                    what: "molecular weight must be positive to convert volumetric gas flow",
                });
            }
            Ok(unit.kmol_per_hr() * mw)
        }
        FlowBasis::LiquidVolumetric => {
            let sg = props.specific_gravity();
            if !sg.is_finite() || sg <= 0.0 {
                return Err(SizingError::InvalidProperty {
                    what: "specific gravity must be positive to convert volumetric liquid flow",
                });
            }
            Ok(unit.m3_per_hr() * 1000.0 * sg)
        }
    }
}

/// Convert a flow in `unit` to mass flow [kg/h].
pub fn normalize_flow(value: f64, unit: FlowUnit, props: &FluidProperties) -> CalcResult<f64> {
    Ok(value * kg_per_hr_factor(unit, props)?)
}

/// Inverse of [`normalize_flow`]: mass flow [kg/h] expressed in `unit`.
pub fn denormalize_flow(kg_per_hr: f64, unit: FlowUnit, props: &FluidProperties) -> CalcResult<f64> {
    Ok(kg_per_hr / kg_per_hr_factor(unit, props)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use psv_fluids::ManualProperties;

    fn gas(mw: f64) -> FluidProperties {
        FluidProperties::manual(&ManualProperties {
            molecular_weight: mw,
            ..ManualProperties::default()
        })
        .unwrap()
    }

    fn liquid(sg: f64) -> FluidProperties {
        FluidProperties::manual(&ManualProperties {
            specific_gravity: sg,
            ..ManualProperties::default()
        })
        .unwrap()
    }

    #[test]
    fn pressure_factors() {
        assert_relative_eq!(normalize_pressure(10.0, PressureUnit::Barg), 1000.0);
        assert_relative_eq!(normalize_pressure(1.0, PressureUnit::Psig), 6.894_76);
        assert_relative_eq!(normalize_pressure(1.0, PressureUnit::KgCm2g), 98.066_5);
        assert_relative_eq!(normalize_pressure(250.0, PressureUnit::KPag), 250.0);
        assert_relative_eq!(normalize_pressure_abs(1000.0), 1101.325);
    }

    #[test]
    fn temperature_conversions() {
        assert_relative_eq!(
            normalize_temperature(150.0, TemperatureUnit::Celsius).unwrap(),
            423.15
        );
        assert_relative_eq!(
            normalize_temperature(212.0, TemperatureUnit::Fahrenheit).unwrap(),
            373.15,
            max_relative = 1e-12
        );
        assert!(normalize_temperature(-300.0, TemperatureUnit::Celsius).is_err());
        assert!(normalize_temperature(0.0, TemperatureUnit::Kelvin).is_err());
    }

    #[test]
    fn gas_volumetric_flow_uses_molar_volume() {
        let props = gas(44.0);
        assert_relative_eq!(
            normalize_flow(22.414, FlowUnit::Nm3PerHr, &props).unwrap(),
            44.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            normalize_flow(379.5, FlowUnit::Scfh, &props).unwrap(),
            44.0 * 0.453_592,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            normalize_flow(1.0, FlowUnit::Scfm, &props).unwrap(),
            60.0 / 379.5 * 44.0 * 0.453_592,
            max_relative = 1e-12
        );
    }

    #[test]
    fn liquid_volumetric_flow_uses_specific_gravity() {
        let props = liquid(0.8);
        assert_relative_eq!(
            normalize_flow(2.0, FlowUnit::M3PerHr, &props).unwrap(),
            1600.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            normalize_flow(500.0, FlowUnit::Lph, &props).unwrap(),
            400.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn non_positive_molecular_weight_is_rejected() {
        let props = gas(0.0);
        assert!(matches!(
            normalize_flow(100.0, FlowUnit::Nm3PerHr, &props),
            Err(SizingError::InvalidProperty { .. })
        ));
        // Mass units never need Mw.
        assert_relative_eq!(normalize_flow(100.0, FlowUnit::KgPerHr, &props).unwrap(), 100.0);
    }

    #[test]
    fn parse_measured_text() {
        let p: Measured<PressureUnit> = "10 barg".parse().unwrap();
        assert_eq!(p, Measured::new(10.0, PressureUnit::Barg));

        let t: Measured<TemperatureUnit> = "-20F".parse().unwrap();
        assert_eq!(t, Measured::new(-20.0, TemperatureUnit::Fahrenheit));

        let w: Measured<FlowUnit> = "1.5e3 kg/hr".parse().unwrap();
        assert_eq!(w, Measured::new(1500.0, FlowUnit::KgPerHr));

        let nm3: Measured<FlowUnit> = "120 Nm3/hr".parse().unwrap();
        assert_eq!(nm3.unit, FlowUnit::Nm3PerHr);
        let m3: Measured<FlowUnit> = "120 m3/hr".parse().unwrap();
        assert_eq!(m3.unit, FlowUnit::M3PerHr);
    }

    #[test]
    fn reject_missing_or_absolute_units() {
        assert!("10".parse::<Measured<PressureUnit>>().is_err());
        assert!(matches!(
            "10 bara".parse::<Measured<PressureUnit>>(),
            Err(SizingError::Unit { .. })
        ));
        assert!("ten barg".parse::<Measured<PressureUnit>>().is_err());
    }

    #[test]
    fn measured_display_round_trips() {
        let p = Measured::new(6.5, PressureUnit::KgCm2g);
        let back: Measured<PressureUnit> = p.to_string().parse().unwrap();
        assert_eq!(back, p);
    }

    proptest! {
        #[test]
        fn pressure_round_trip(value in -1.0e3f64..1.0e5, idx in 0usize..4) {
            let unit = PressureUnit::ALL[idx];
            let back = denormalize_pressure(normalize_pressure(value, unit), unit);
            prop_assert!((back - value).abs() <= 1e-6 * value.abs().max(1.0));
        }

        #[test]
        fn temperature_round_trip(value in 1.0f64..2_000.0, idx in 0usize..3) {
            let unit = TemperatureUnit::ALL[idx];
            let kelvin = normalize_temperature(value, unit).unwrap();
            let back = denormalize_temperature(kelvin, unit);
            prop_assert!((back - value).abs() <= 1e-6 * value.abs().max(1.0));
        }

        #[test]
        fn flow_round_trip(
            value in 1.0e-3f64..1.0e7,
            idx in 0usize..9,
            mw in 2.0f64..200.0,
            sg in 0.3f64..2.0,
        ) {
            let unit = FlowUnit::ALL[idx];
            let props = FluidProperties::manual(&ManualProperties {
                molecular_weight: mw,
                specific_gravity: sg,
                ..ManualProperties::default()
            })
            .unwrap();
            let kg_h = normalize_flow(value, unit, &props).unwrap();
            let back = denormalize_flow(kg_h, unit, &props).unwrap();
            prop_assert!((back - value).abs() <= 1e-6 * value);
        }
    }
}
