//! Named-fluid catalog offered to callers that select a fluid by name.

use crate::Species;
use crate::error::{FluidError, FluidResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidCatalogEntry {
    pub species: Species,
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
}

impl FluidCatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    /// Exact, case-insensitive match on id, display name or alias.
    pub fn is_named(&self, name: &str) -> bool {
        let name = name.trim();
        self.canonical_id.eq_ignore_ascii_case(name)
            || self.display_name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

const FLUID_CATALOG: [FluidCatalogEntry; 18] = [
    FluidCatalogEntry {
        species: Species::H2O,
        canonical_id: "Water",
        display_name: "Water",
        aliases: &["water", "steam", "h2o"],
    },
    FluidCatalogEntry {
        species: Species::Air,
        canonical_id: "Air",
        display_name: "Air",
        aliases: &["atmosphere"],
    },
    FluidCatalogEntry {
        species: Species::N2,
        canonical_id: "N2",
        display_name: "Nitrogen",
        aliases: &["nitrogen"],
    },
    FluidCatalogEntry {
        species: Species::O2,
        canonical_id: "O2",
        display_name: "Oxygen",
        aliases: &["oxygen"],
    },
    FluidCatalogEntry {
        species: Species::CO2,
        canonical_id: "CO2",
        display_name: "Carbon Dioxide",
        aliases: &["co2", "carbon dioxide"],
    },
    FluidCatalogEntry {
        species: Species::CO,
        canonical_id: "CO",
        display_name: "Carbon Monoxide",
        aliases: &["carbon monoxide"],
    },
    FluidCatalogEntry {
        species: Species::H2,
        canonical_id: "H2",
        display_name: "Hydrogen",
        aliases: &["hydrogen"],
    },
    FluidCatalogEntry {
        species: Species::He,
        canonical_id: "He",
        display_name: "Helium",
        aliases: &["helium"],
    },
    FluidCatalogEntry {
        species: Species::Ar,
        canonical_id: "Ar",
        display_name: "Argon",
        aliases: &["argon"],
    },
    FluidCatalogEntry {
        species: Species::CH4,
        canonical_id: "CH4",
        display_name: "Methane",
        aliases: &["methane", "natural gas"],
    },
    FluidCatalogEntry {
        species: Species::Ethane,
        canonical_id: "Ethane",
        display_name: "Ethane",
        aliases: &["c2h6"],
    },
    FluidCatalogEntry {
        species: Species::Ethylene,
        canonical_id: "Ethylene",
        display_name: "Ethylene",
        aliases: &["c2h4"],
    },
    FluidCatalogEntry {
        species: Species::Propane,
        canonical_id: "Propane",
        display_name: "Propane",
        aliases: &["c3h8", "lpg"],
    },
    FluidCatalogEntry {
        species: Species::Propylene,
        canonical_id: "Propylene",
        display_name: "Propylene",
        aliases: &["c3h6"],
    },
    FluidCatalogEntry {
        species: Species::NButane,
        canonical_id: "nButane",
        display_name: "n-Butane",
        aliases: &["butane"],
    },
    FluidCatalogEntry {
        species: Species::Isobutane,
        canonical_id: "Isobutane",
        display_name: "Isobutane",
        aliases: &["i-butane"],
    },
    FluidCatalogEntry {
        species: Species::Ammonia,
        canonical_id: "NH3",
        display_name: "Ammonia",
        aliases: &["ammonia"],
    },
    FluidCatalogEntry {
        species: Species::R134a,
        canonical_id: "R134a",
        display_name: "R134a",
        aliases: &[],
    },
];

pub fn fluid_catalog() -> &'static [FluidCatalogEntry] {
    &FLUID_CATALOG
}

pub fn filter_fluid_catalog(query: &str) -> Vec<FluidCatalogEntry> {
    fluid_catalog()
        .iter()
        .copied()
        .filter(|entry| entry.matches_query(query))
        .collect()
}

/// Resolve a user-facing fluid name to a catalog species.
pub fn lookup_fluid(name: &str) -> FluidResult<Species> {
    fluid_catalog()
        .iter()
        .find(|entry| entry.is_named(name))
        .map(|entry| entry.species)
        .or_else(|| name.parse::<Species>().ok())
        .ok_or_else(|| FluidError::UnknownFluid {
            name: name.trim().to_string(),
        })
}
