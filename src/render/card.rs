//! Card and autocomplete option construction

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dex::{Pokedex, SpeciesRecord};
use crate::grade::Grade;

pub const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const DETAIL_BASE: &str = "https://www.serebii.net/pokedex-swsh";

pub fn artwork_url(number: u16) -> String {
    format!("{ARTWORK_BASE}/{number}.png")
}

pub fn detail_url(slug: &str) -> String {
    format!("{DETAIL_BASE}/{slug}/")
}

/// `#` followed by the dex number padded to three digits
pub fn number_label(number: u16) -> String {
    format!("#{number:03}")
}

/// Preview of the first listed evolution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvolutionPreview {
    pub name: String,
    /// Only known when the evolution is itself in the index
    pub number: Option<u16>,
    pub artwork_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Card {
    /// Element id; the species display name
    pub id: String,
    pub name: String,
    pub number: u16,
    pub number_label: String,
    pub detail_url: String,
    pub artwork_url: String,
    pub grade: Grade,
    pub type_line: String,
    pub evolution: Option<EvolutionPreview>,
}

impl Card {
    pub fn card_class(&self) -> &'static str {
        self.grade.card_class()
    }

    pub fn stamp_class(&self) -> &'static str {
        self.grade.stamp_class()
    }
}

/// Autocomplete entry: the value typed into search and its label
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchOption {
    pub value: String,
    pub label: String,
}

impl SearchOption {
    pub fn for_species(species: &SpeciesRecord) -> Self {
        Self {
            value: species.name.clone(),
            label: format!("#{}", species.num),
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.value.to_lowercase().contains(&query)
    }
}

pub fn build_card(dex: &Pokedex, key: &str, species: &SpeciesRecord, grade: Grade) -> Card {
    let number = species.number();
    let evolution = species.evolutions().first().map(|evo| {
        let target = dex.get(&evo.to_lowercase());
        EvolutionPreview {
            name: target
                .map(|record| record.name.clone())
                .unwrap_or_else(|| evo.clone()),
            number: target.map(SpeciesRecord::number),
            artwork_url: target.map(|record| artwork_url(record.number())),
        }
    });

    Card {
        id: species.name.clone(),
        name: species.name.clone(),
        number,
        number_label: number_label(number),
        detail_url: detail_url(key),
        artwork_url: artwork_url(number),
        grade,
        type_line: species.types.join(" / "),
        evolution,
    }
}
