//! The curated fact table.
//!
//! Static, read-only data shared by every request. Only the geography,
//! population and planet sections drive the matcher; the rest is reference
//! material exposed through the lookup helpers.

#[derive(Debug)]
pub struct Continent {
    pub name: &'static str,
    pub countries: &'static [&'static str],
}

#[derive(Debug)]
pub struct CountryInfo {
    pub name: &'static str,
    pub continent: &'static str,
    pub capital: &'static str,
    pub aliases: &'static [&'static str],
    pub notes: Option<&'static str>,
}

#[derive(Debug)]
pub struct PopulationRank {
    pub name: &'static str,
    pub population: u64,
    pub rank: u8,
}

#[derive(Debug)]
pub struct MostPopulated {
    pub country: &'static str,
    pub population: &'static str,
    pub as_of: &'static str,
    pub source: &'static str,
    pub previous_country: &'static str,
    pub previous_population: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Planet,
    DwarfPlanet,
}

impl BodyKind {
    pub fn label(self) -> &'static str {
        match self {
            BodyKind::Planet => "planet",
            BodyKind::DwarfPlanet => "dwarf planet",
        }
    }
}

#[derive(Debug)]
pub struct CelestialBody {
    pub name: &'static str,
    pub kind: BodyKind,
    pub notes: Option<&'static str>,
}

#[derive(Debug)]
pub struct HistoricalPeriod {
    pub name: &'static str,
    pub period: &'static str,
    /// Ordinal in office, where that is meaningful.
    pub number: Option<u8>,
}

#[derive(Debug)]
pub struct KnowledgeBase {
    pub continents: &'static [Continent],
    pub countries: &'static [CountryInfo],
    pub most_populated: MostPopulated,
    pub population_ranks: &'static [PopulationRank],
    pub oceans: &'static [&'static str],
    pub elements: &'static [&'static str],
    pub bodies: &'static [CelestialBody],
    pub world_wars: &'static [HistoricalPeriod],
    pub us_presidents: &'static [HistoricalPeriod],
}

pub static KNOWLEDGE_BASE: KnowledgeBase = KnowledgeBase {
    continents: &[
        Continent {
            name: "Africa",
            countries: &[
                "Egypt", "Nigeria", "South Africa", "Kenya", "Ethiopia", "Ghana", "Morocco",
                "Tanzania",
            ],
        },
        Continent {
            name: "Antarctica",
            countries: &[],
        },
        Continent {
            name: "Asia",
            countries: &[
                "China", "India", "Japan", "South Korea", "Vietnam", "Thailand", "Indonesia",
                "Malaysia", "Philippines", "Saudi Arabia", "Iran", "Iraq", "Israel", "Turkey",
                "Russia",
            ],
        },
        Continent {
            name: "Australia",
            countries: &["Australia", "New Zealand", "Papua New Guinea", "Fiji"],
        },
        Continent {
            name: "Europe",
            countries: &[
                "United Kingdom", "France", "Germany", "Italy", "Spain", "Portugal",
                "Netherlands", "Belgium", "Switzerland", "Austria", "Poland", "Ukraine",
                "Russia", "Sweden", "Norway", "Finland", "Denmark", "Greece",
            ],
        },
        Continent {
            name: "North America",
            countries: &[
                "United States", "Canada", "Mexico", "Cuba", "Jamaica", "Haiti",
                "Dominican Republic", "Costa Rica", "Panama",
            ],
        },
        Continent {
            name: "South America",
            countries: &[
                "Brazil", "Argentina", "Chile", "Peru", "Colombia", "Venezuela", "Ecuador",
                "Bolivia", "Uruguay", "Paraguay",
            ],
        },
    ],
    countries: &[
        CountryInfo {
            name: "United States",
            continent: "North America",
            capital: "Washington, D.C.",
            aliases: &["USA", "US", "America", "United States of America"],
            notes: None,
        },
        CountryInfo {
            name: "Canada",
            continent: "North America",
            capital: "Ottawa",
            aliases: &[],
            notes: None,
        },
        CountryInfo {
            name: "United Kingdom",
            continent: "Europe",
            capital: "London",
            aliases: &["UK", "Britain", "Great Britain"],
            notes: None,
        },
        CountryInfo {
            name: "China",
            continent: "Asia",
            capital: "Beijing",
            aliases: &[],
            notes: None,
        },
        CountryInfo {
            name: "Russia",
            continent: "Asia/Europe",
            capital: "Moscow",
            aliases: &[],
            notes: Some("Russia spans both Europe and Asia"),
        },
        CountryInfo {
            name: "Australia",
            continent: "Australia",
            capital: "Canberra",
            aliases: &[],
            notes: Some("Australia is both a country and a continent"),
        },
    ],
    most_populated: MostPopulated {
        country: "India",
        population: "1.428 billion",
        as_of: "2023",
        source: "United Nations",
        previous_country: "China",
        previous_population: "1.426 billion",
    },
    population_ranks: &[
        PopulationRank { name: "India", population: 1_428_000_000, rank: 1 },
        PopulationRank { name: "China", population: 1_426_000_000, rank: 2 },
        PopulationRank { name: "United States", population: 335_000_000, rank: 3 },
        PopulationRank { name: "Indonesia", population: 277_000_000, rank: 4 },
        PopulationRank { name: "Pakistan", population: 240_000_000, rank: 5 },
    ],
    oceans: &[
        "Pacific Ocean",
        "Atlantic Ocean",
        "Indian Ocean",
        "Southern Ocean",
        "Arctic Ocean",
    ],
    elements: &[
        "Hydrogen", "Helium", "Lithium", "Beryllium", "Boron", "Carbon", "Nitrogen", "Oxygen",
        "Fluorine", "Neon",
    ],
    bodies: &[
        CelestialBody { name: "Mercury", kind: BodyKind::Planet, notes: None },
        CelestialBody { name: "Venus", kind: BodyKind::Planet, notes: None },
        CelestialBody { name: "Earth", kind: BodyKind::Planet, notes: None },
        CelestialBody { name: "Mars", kind: BodyKind::Planet, notes: None },
        CelestialBody { name: "Jupiter", kind: BodyKind::Planet, notes: None },
        CelestialBody { name: "Saturn", kind: BodyKind::Planet, notes: None },
        CelestialBody { name: "Uranus", kind: BodyKind::Planet, notes: None },
        CelestialBody { name: "Neptune", kind: BodyKind::Planet, notes: None },
        CelestialBody {
            name: "Pluto",
            kind: BodyKind::DwarfPlanet,
            notes: Some("Reclassified as a dwarf planet in 2006"),
        },
    ],
    world_wars: &[
        HistoricalPeriod { name: "World War I", period: "1914-1918", number: None },
        HistoricalPeriod { name: "World War II", period: "1939-1945", number: None },
    ],
    us_presidents: &[
        HistoricalPeriod { name: "George Washington", period: "1789-1797", number: Some(1) },
        HistoricalPeriod { name: "Joe Biden", period: "2021-present", number: Some(46) },
    ],
};

/// What a name in a claim resolved to.
#[derive(Debug, Clone, Copy)]
pub enum CountryMatch {
    /// A country with a detailed entry.
    Known(&'static CountryInfo),
    /// A country only listed under a continent.
    Listed {
        name: &'static str,
        continent: &'static str,
    },
}

impl CountryMatch {
    pub fn name(&self) -> &'static str {
        match self {
            CountryMatch::Known(info) => info.name,
            CountryMatch::Listed { name, .. } => name,
        }
    }

    pub fn continent(&self) -> &'static str {
        match self {
            CountryMatch::Known(info) => info.continent,
            CountryMatch::Listed { continent, .. } => continent,
        }
    }
}

/// Short all-caps aliases ("US", "UK") only match when written in capitals,
/// so the pronoun "us" is not read as a country.
fn alias_matches(alias: &str, text: &str) -> bool {
    let is_acronym = alias.len() <= 3 && alias.chars().all(|c| c.is_ascii_uppercase());
    if is_acronym {
        alias == text || (alias.len() == 3 && alias.eq_ignore_ascii_case(text))
    } else {
        alias.eq_ignore_ascii_case(text)
    }
}

impl KnowledgeBase {
    /// Resolve a country name or alias, case-insensitively.
    pub fn country(&self, text: &str) -> Option<CountryMatch> {
        let text = text.trim();
        if let Some(info) = self.countries.iter().find(|c| {
            c.name.eq_ignore_ascii_case(text) || c.aliases.iter().any(|a| alias_matches(a, text))
        }) {
            return Some(CountryMatch::Known(info));
        }
        self.continents.iter().find_map(|continent| {
            continent
                .countries
                .iter()
                .find(|c| c.eq_ignore_ascii_case(text))
                .map(|name| CountryMatch::Listed {
                    name,
                    continent: continent.name,
                })
        })
    }

    pub fn continent(&self, text: &str) -> Option<&'static Continent> {
        let text = text.trim();
        self.continents
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(text))
    }
}
