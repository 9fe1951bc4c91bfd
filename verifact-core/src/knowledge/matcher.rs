use super::table::{BodyKind, CountryMatch, KnowledgeBase, KNOWLEDGE_BASE};
use regex::Regex;
use std::sync::OnceLock;

/// A knowledge-base decision. Confidence is always in 90..=99.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KbVerdict {
    pub is_accurate: bool,
    pub explanation: String,
    pub confidence: u8,
    pub correction: Option<String>,
}

impl KbVerdict {
    fn accurate(explanation: String, confidence: u8) -> Self {
        Self {
            is_accurate: true,
            explanation,
            confidence,
            correction: None,
        }
    }

    fn inaccurate(explanation: String, confidence: u8, correction: String) -> Self {
        Self {
            is_accurate: false,
            explanation,
            confidence,
            correction: Some(correction),
        }
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "the", "is", "are", "in", "on", "and", "or", "not", "continent", "continents",
];
const MOST_POPULATED: &[&str] = &[
    "most populated",
    "most populous",
    "highest population",
    "largest population",
];
const MOST_POPULATED_COUNTRY: &[&str] = &[
    "most populated country",
    "most populous country",
    "highest population",
    "largest population",
];
/// Words that turn "America" into a region rather than the country.
const AMERICA_QUALIFIERS: &[&str] = &["north", "south", "central", "latin"];
const MAX_NAME_WORDS: usize = 4;

/// Check a claim against the curated table.
///
/// Geography is tried first, then population, then planets. `None` means no
/// rule applies and the caller should fall back to another checker.
pub fn verify(claim: &str) -> Option<KbVerdict> {
    let kb = &KNOWLEDGE_BASE;
    verify_geography(kb, claim)
        .or_else(|| verify_population(kb, claim))
        .or_else(|| verify_science(kb, claim))
}

/// Case-insensitive containment that respects word boundaries on both ends.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn billions(population: u64) -> String {
    format!("{:.3}", population as f64 / 1_000_000_000.0)
}

fn us_continent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(united states of america|united states|usa|us|america) is a continent\b")
            .expect("static regex")
    })
}

/// "USA is a continent" and friends, matched on the whole claim because a
/// word scan can split "United States" apart.
fn is_us_continent_claim(lower: &str) -> bool {
    us_continent_re().find_iter(lower).any(|m| {
        let previous_word = lower[..m.start()].split_whitespace().next_back();
        !previous_word.is_some_and(|w| AMERICA_QUALIFIERS.contains(&w))
    })
}

/// Words with non-letters stripped, keeping original case.
fn clean_words(claim: &str) -> Vec<String> {
    claim
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_ascii_alphabetic()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect()
}

enum NameHit {
    Country(CountryMatch),
    Continent(&'static str),
}

/// Scan word n-grams, longest first at each position, for the first country
/// or continent name. Returns the hit and the word span it covered.
fn first_place_name(kb: &KnowledgeBase, words: &[String]) -> Option<(NameHit, std::ops::Range<usize>)> {
    for start in 0..words.len() {
        let head = words[start].to_ascii_lowercase();
        if head.len() < 2 || STOP_WORDS.contains(&head.as_str()) {
            continue;
        }
        let longest = MAX_NAME_WORDS.min(words.len() - start);
        for n in (1..=longest).rev() {
            let candidate = words[start..start + n].join(" ");
            if candidate.eq_ignore_ascii_case("america")
                && start > 0
                && AMERICA_QUALIFIERS.contains(&words[start - 1].to_ascii_lowercase().as_str())
            {
                continue;
            }
            let span = start..start + n;
            if let Some(country) = kb.country(&candidate) {
                return Some((NameHit::Country(country), span));
            }
            if let Some(continent) = kb.continent(&candidate) {
                return Some((NameHit::Continent(continent.name), span));
            }
        }
    }
    None
}

fn readable_continent(continent: &str) -> String {
    continent.replace('/', " and ")
}

fn verify_geography(kb: &KnowledgeBase, claim: &str) -> Option<KbVerdict> {
    let lower = claim.to_lowercase();
    if !lower.contains("continent") {
        return None;
    }

    if is_us_continent_claim(&lower) {
        return Some(KbVerdict::inaccurate(
            "The United States of America (USA) is a country located in North America, not a continent itself.".to_string(),
            99,
            "The United States is a country in North America, not a continent.".to_string(),
        ));
    }

    let words = clean_words(claim);
    let (hit, span) = first_place_name(kb, &words)?;
    let rest = words
        .iter()
        .enumerate()
        .filter(|(i, _)| !span.contains(i))
        .map(|(_, w)| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    match hit {
        NameHit::Country(country) => {
            let name = country.name();
            if let Some(continent) = kb.continent(name) {
                let notes = match country {
                    CountryMatch::Known(info) => info.notes.map(|n| format!(" {n}.")),
                    CountryMatch::Listed { .. } => None,
                };
                return Some(KbVerdict::accurate(
                    format!(
                        "{} is indeed one of the seven continents of the world.{}",
                        continent.name,
                        notes.unwrap_or_default()
                    ),
                    99,
                ));
            }

            let continent = readable_continent(country.continent());
            let correction = format!("{name} is a country in {continent}, not a continent.");
            // "Kenya is a country on the continent of Africa" is not calling Kenya a continent.
            let names_own_continent = country
                .continent()
                .split('/')
                .any(|c| contains_phrase(&rest, &c.to_lowercase()));
            if names_own_continent {
                return Some(KbVerdict::accurate(
                    format!("{name} is a country located in {continent}."),
                    95,
                ));
            }
            match country {
                CountryMatch::Known(_) => Some(KbVerdict::inaccurate(
                    format!("{name} is a country located in {continent}, not a continent itself."),
                    98,
                    correction,
                )),
                CountryMatch::Listed { .. } => Some(KbVerdict::inaccurate(
                    format!("{name} appears to be a country, not a continent."),
                    90,
                    correction,
                )),
            }
        }
        NameHit::Continent(name) => Some(KbVerdict::accurate(
            format!("{name} is indeed one of the seven continents of the world."),
            99,
        )),
    }
}

fn has_rank_phrase(lower: &str, rank: u8) -> bool {
    let ord = ordinal(rank);
    [
        format!("rank {rank}"),
        format!("ranked {rank}"),
        format!("rank #{rank}"),
        format!("ranked {ord}"),
        format!("position {rank}"),
        format!("{ord} most"),
    ]
    .iter()
    .any(|p| contains_phrase(lower, p))
}

fn verify_population(kb: &KnowledgeBase, claim: &str) -> Option<KbVerdict> {
    let lower = claim.to_lowercase();
    let top = &kb.most_populated;

    if MOST_POPULATED.iter().any(|p| lower.contains(p))
        && MOST_POPULATED_COUNTRY.iter().any(|p| lower.contains(p))
    {
        let correction = format!(
            "{} is the world's most populated country (approximately {} as of {}).",
            top.country, top.population, top.as_of
        );
        if contains_phrase(&lower, &top.previous_country.to_lowercase()) {
            return Some(KbVerdict::inaccurate(
                format!(
                    "As of {}, {} is the world's most populated country with approximately {}, according to {}. {} is now the second most populated with {}.",
                    top.as_of, top.country, top.population, top.source, top.previous_country, top.previous_population
                ),
                98,
                correction,
            ));
        }
        if contains_phrase(&lower, &top.country.to_lowercase()) {
            return Some(KbVerdict::accurate(
                format!(
                    "As of {}, {} is indeed the world's most populated country with approximately {}, according to {}. It recently surpassed {} which has {}.",
                    top.as_of, top.country, top.population, top.source, top.previous_country, top.previous_population
                ),
                98,
            ));
        }
    }

    if !(lower.contains("rank") || lower.contains("position")) {
        return None;
    }
    for country in kb.population_ranks {
        if !contains_phrase(&lower, &country.name.to_lowercase()) {
            continue;
        }
        if has_rank_phrase(&lower, country.rank) {
            return Some(KbVerdict::accurate(
                format!(
                    "{} is indeed ranked {} in world population with approximately {} billion people.",
                    country.name,
                    ordinal(country.rank),
                    billions(country.population)
                ),
                97,
            ));
        }
        for other in kb.population_ranks.iter().filter(|o| o.rank != country.rank) {
            if has_rank_phrase(&lower, other.rank) {
                return Some(KbVerdict::inaccurate(
                    format!(
                        "{} is not ranked {} in world population. It is actually ranked {}. {} is ranked {} with approximately {} billion people.",
                        country.name,
                        ordinal(other.rank),
                        ordinal(country.rank),
                        other.name,
                        ordinal(other.rank),
                        billions(other.population)
                    ),
                    97,
                    format!("{} is ranked {} in world population.", country.name, ordinal(country.rank)),
                ));
            }
        }
    }
    None
}

fn verify_science(kb: &KnowledgeBase, claim: &str) -> Option<KbVerdict> {
    let lower = claim.to_lowercase();
    if !lower.contains("planet") {
        return None;
    }

    if contains_phrase(&lower, "pluto is a planet") {
        return Some(KbVerdict::inaccurate(
            "Pluto was reclassified as a dwarf planet in 2006 by the International Astronomical Union (IAU).".to_string(),
            98,
            "Pluto is a dwarf planet.".to_string(),
        ));
    }

    for body in kb.bodies {
        let phrase = format!("{} is a planet", body.name.to_lowercase());
        if !contains_phrase(&lower, &phrase) {
            continue;
        }
        return Some(match body.kind {
            BodyKind::Planet => KbVerdict::accurate(
                format!("{} is indeed one of the eight planets in our solar system.", body.name),
                99,
            ),
            kind => KbVerdict::inaccurate(
                format!(
                    "{} is classified as a {}, not a planet. {}",
                    body.name,
                    kind.label(),
                    body.notes.unwrap_or_default()
                )
                .trim_end()
                .to_string(),
                98,
                format!("{} is a {}.", body.name, kind.label()),
            ),
        });
    }
    None
}
