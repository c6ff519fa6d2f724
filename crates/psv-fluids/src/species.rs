//! Pure fluids that the relief-sizing catalog can look up.

/// Pure fluids commonly relieved through pressure-safety valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Water / steam (H₂O)
    H2O,
    /// Air (pseudo-pure backend fluid)
    Air,
    /// Nitrogen (N₂)
    N2,
    /// Oxygen (O₂)
    O2,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Carbon monoxide (CO)
    CO,
    /// Hydrogen (H₂)
    H2,
    /// Helium (He)
    He,
    /// Argon (Ar)
    Ar,
    /// Methane (CH₄)
    CH4,
    /// Ethane
    Ethane,
    /// Ethylene
    Ethylene,
    /// Propane
    Propane,
    /// Propylene
    Propylene,
    /// n-Butane
    NButane,
    /// Isobutane
    Isobutane,
    /// Ammonia (NH₃)
    Ammonia,
    /// Refrigerant R134a
    R134a,
}

impl Species {
    pub const ALL: [Species; 18] = [
        Species::H2O,
        Species::Air,
        Species::N2,
        Species::O2,
        Species::CO2,
        Species::CO,
        Species::H2,
        Species::He,
        Species::Ar,
        Species::CH4,
        Species::Ethane,
        Species::Ethylene,
        Species::Propane,
        Species::Propylene,
        Species::NButane,
        Species::Isobutane,
        Species::Ammonia,
        Species::R134a,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::H2O => "H2O",
            Species::Air => "Air",
            Species::N2 => "N2",
            Species::O2 => "O2",
            Species::CO2 => "CO2",
            Species::CO => "CO",
            Species::H2 => "H2",
            Species::He => "He",
            Species::Ar => "Ar",
            Species::CH4 => "CH4",
            Species::Ethane => "Ethane",
            Species::Ethylene => "Ethylene",
            Species::Propane => "Propane",
            Species::Propylene => "Propylene",
            Species::NButane => "nButane",
            Species::Isobutane => "Isobutane",
            Species::Ammonia => "NH3",
            Species::R134a => "R134a",
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Species::H2O => "Water",
            Species::Air => "Air",
            Species::N2 => "Nitrogen",
            Species::O2 => "Oxygen",
            Species::CO2 => "Carbon Dioxide",
            Species::CO => "Carbon Monoxide",
            Species::H2 => "Hydrogen",
            Species::He => "Helium",
            Species::Ar => "Argon",
            Species::CH4 => "Methane",
            Species::Ethane => "Ethane",
            Species::Ethylene => "Ethylene",
            Species::Propane => "Propane",
            Species::Propylene => "Propylene",
            Species::NButane => "n-Butane",
            Species::Isobutane => "Isobutane",
            Species::Ammonia => "Ammonia",
            Species::R134a => "R134a",
        }
    }

    /// Get molar mass [kg/kmol] for this species.
    ///
    /// Values sourced from standard reference data (e.g., NIST).
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::H2O => 18.015,
            Species::Air => 28.965,
            Species::N2 => 28.014,
            Species::O2 => 31.999,
            Species::CO2 => 44.010,
            Species::CO => 28.010,
            Species::H2 => 2.016,
            Species::He => 4.003,
            Species::Ar => 39.948,
            Species::CH4 => 16.043,
            Species::Ethane => 30.070,
            Species::Ethylene => 28.054,
            Species::Propane => 44.097,
            Species::Propylene => 42.081,
            Species::NButane => 58.124,
            Species::Isobutane => 58.124,
            Species::Ammonia => 17.031,
            Species::R134a => 102.031,
        }
    }

    /// Get CoolProp fluid name for this species.
    pub fn coolprop_name(&self) -> &'static str {
        match self {
            Species::H2O => "Water",
            Species::Air => "Air",
            Species::N2 => "Nitrogen",
            Species::O2 => "Oxygen",
            Species::CO2 => "CarbonDioxide",
            Species::CO => "CarbonMonoxide",
            Species::H2 => "Hydrogen",
            Species::He => "Helium",
            Species::Ar => "Argon",
            Species::CH4 => "Methane",
            Species::Ethane => "Ethane",
            Species::Ethylene => "Ethylene",
            Species::Propane => "n-Propane",
            Species::Propylene => "Propylene",
            Species::NButane => "n-Butane",
            Species::Isobutane => "Isobutane",
            Species::Ammonia => "Ammonia",
            Species::R134a => "R134a",
        }
    }

    /// Map to rfluids Pure enum (internal use for CoolProp backend).
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Species::H2O => Pure::Water,
            Species::Air => Pure::Air,
            Species::N2 => Pure::Nitrogen,
            Species::O2 => Pure::Oxygen,
            Species::CO2 => Pure::CarbonDioxide,
            Species::CO => Pure::CarbonMonoxide,
            Species::H2 => Pure::Hydrogen,
            Species::He => Pure::Helium,
            Species::Ar => Pure::Argon,
            Species::CH4 => Pure::Methane,
            Species::Ethane => Pure::Ethane,
            Species::Ethylene => Pure::Ethylene,
            Species::Propane => Pure::nPropane,
            Species::Propylene => Pure::Propylene,
            Species::NButane => Pure::nButane,
            Species::Isobutane => Pure::Isobutane,
            Species::Ammonia => Pure::Ammonia,
            Species::R134a => Pure::R134a,
        }
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "H2O" | "WATER" | "STEAM" => Ok(Species::H2O),
            "AIR" => Ok(Species::Air),
            "N2" | "NITROGEN" => Ok(Species::N2),
            "O2" | "OXYGEN" => Ok(Species::O2),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(Species::CO2),
            "CO" | "CARBONMONOXIDE" | "CARBON MONOXIDE" => Ok(Species::CO),
            "H2" | "HYDROGEN" => Ok(Species::H2),
            "HE" | "HELIUM" => Ok(Species::He),
            "AR" | "ARGON" => Ok(Species::Ar),
            "CH4" | "METHANE" => Ok(Species::CH4),
            "ETHANE" | "C2H6" => Ok(Species::Ethane),
            "ETHYLENE" | "C2H4" => Ok(Species::Ethylene),
            "PROPANE" | "C3H8" => Ok(Species::Propane),
            "PROPYLENE" | "C3H6" => Ok(Species::Propylene),
            "NBUTANE" | "N-BUTANE" | "BUTANE" => Ok(Species::NButane),
            "ISOBUTANE" | "I-BUTANE" => Ok(Species::Isobutane),
            "NH3" | "AMMONIA" => Ok(Species::Ammonia),
            "R134A" => Ok(Species::R134a),
            _ => Err("unknown species"),
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl serde::Serialize for Species {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

/// Accepts any catalog name or alias, e.g. `"Nitrogen"`, `"N2"`, `"steam"`.
impl<'de> serde::Deserialize<'de> for Species {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        crate::catalog::lookup_fluid(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolprop_mapping() {
        assert_eq!(Species::O2.coolprop_name(), "Oxygen");
        assert_eq!(Species::Propane.coolprop_name(), "n-Propane");
        assert_eq!(Species::H2O.coolprop_name(), "Water");
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("CO2".parse::<Species>().unwrap(), Species::CO2);
        assert_eq!("Carbon Dioxide".parse::<Species>().unwrap(), Species::CO2);
        assert_eq!("steam".parse::<Species>().unwrap(), Species::H2O);
        assert_eq!("NH3".parse::<Species>().unwrap(), Species::Ammonia);
        assert!("Unobtainium".parse::<Species>().is_err());
    }

    #[test]
    fn canonical_keys_roundtrip() {
        for species in Species::ALL {
            let parsed = species
                .key()
                .parse::<Species>()
                .expect("canonical key should parse");
            assert_eq!(parsed, species);
        }
    }

    #[test]
    fn molar_masses_are_positive() {
        assert!(Species::ALL.iter().all(|s| s.molar_mass() > 0.0));
    }
}
