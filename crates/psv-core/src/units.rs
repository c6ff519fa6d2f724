// psv-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, MassDensity as UomMassDensity,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type DynVisc = UomDynamicViscosity;
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

pub mod constants {
    /// Atmospheric reference used for every gauge/absolute conversion [kPa].
    pub const ATM_KPA: f64 = 101.325;

    /// Universal gas constant [J/(kmol·K)].
    pub const R_UNIVERSAL: f64 = 8_314.462_618;

    pub const KPA_PER_BAR: f64 = 100.0;
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_scale_to_si() {
        assert!((kpa(101.325).value - 101_325.0).abs() < 1e-9);
        assert!((pa(5.0).value - 5.0).abs() < 1e-12);
        assert!((k(300.0).value - 300.0).abs() < 1e-12);
        assert!((kg_per_m3(998.0).value - 998.0).abs() < 1e-12);
    }
}
