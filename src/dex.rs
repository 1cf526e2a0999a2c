//! Species dataset and the canonical index built from it

use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Dataset shipped with the binary (slug -> species record)
pub const EMBEDDED_DATASET: &str = include_str!("../assets/pokedex.json");

/// Six base stats of a species
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl BaseStats {
    /// Sum of the six stats, saturating at `u32::MAX`
    pub fn total(&self) -> u32 {
        [self.hp, self.atk, self.def, self.spa, self.spd, self.spe]
            .into_iter()
            .fold(0, u32::saturating_add)
    }

    fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(stats)) = value else {
            return Self::default();
        };
        Self {
            hp: lenient(stats, "hp"),
            atk: lenient(stats, "atk"),
            def: lenient(stats, "def"),
            spa: lenient(stats, "spa"),
            spd: lenient(stats, "spd"),
            spe: lenient(stats, "spe"),
        }
    }
}

/// One record of the raw dataset. Every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeciesRecord {
    pub num: i32,
    pub name: String,
    pub base_stats: BaseStats,
    pub types: Vec<String>,
    pub forme: Option<String>,
    pub evos: Option<Vec<String>>,
}

impl SpeciesRecord {
    /// Reads a record field by field. A field of the wrong type counts as absent.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            num: lenient(fields, "num"),
            name: lenient(fields, "name"),
            base_stats: BaseStats::from_value(fields.get("baseStats")),
            types: lenient(fields, "types"),
            forme: lenient(fields, "forme"),
            evos: lenient(fields, "evos"),
        }
    }

    /// Standard species only: no alternate forme, single-word name, real dex number
    pub fn is_canonical(&self) -> bool {
        let has_forme = self.forme.as_deref().is_some_and(|forme| !forme.is_empty());
        !has_forme && !self.name.contains(' ') && self.num > 0
    }

    pub fn evolutions(&self) -> &[String] {
        self.evos.as_deref().unwrap_or_default()
    }

    /// Dex number as shown on cards; only meaningful for canonical records.
    pub fn number(&self) -> u16 {
        u16::try_from(self.num).unwrap_or_default()
    }
}

/// Raw dataset keyed by internal slug
pub type RawDataset = BTreeMap<String, SpeciesRecord>;

/// Parses a dataset document.
///
/// Only a document that is not an object of objects is an error; malformed
/// fields inside a record fall back to their defaults.
pub fn parse_dataset(json: &str) -> Result<RawDataset, serde_json::Error> {
    let document: BTreeMap<String, Map<String, Value>> = serde_json::from_str(json)?;
    Ok(document
        .iter()
        .map(|(slug, fields)| (slug.clone(), SpeciesRecord::from_fields(fields)))
        .collect())
}

fn lenient<T: DeserializeOwned + Default>(fields: &Map<String, Value>, key: &str) -> T {
    fields
        .get(key)
        .and_then(|value| T::deserialize(value).ok())
        .unwrap_or_default()
}

/// Canonical index: lower-cased species name -> record, in shuffled order.
///
/// Built once and never mutated. Order only affects which cards render first.
#[derive(Clone, Debug, Default)]
pub struct Pokedex {
    order: Vec<String>,
    entries: HashMap<String, SpeciesRecord>,
}

impl Pokedex {
    /// Filters `raw` down to one entry per canonical name.
    ///
    /// Slugs are shuffled with `seed` before insertion. When two records share
    /// a lower-cased name the later one wins and the key keeps its first slot.
    pub fn build(raw: &RawDataset, seed: u64) -> Self {
        let mut slugs: Vec<&String> = raw.keys().collect();
        shuffle(&mut slugs, &mut SeededRng::new(seed));

        let mut order = Vec::new();
        let mut entries = HashMap::new();
        for slug in slugs {
            let record = &raw[slug];
            if !record.is_canonical() {
                continue;
            }
            let key = record.name.to_lowercase();
            if entries.insert(key.clone(), record.clone()).is_none() {
                order.push(key);
            }
        }

        Self { order, entries }
    }

    /// Exact lookup by index key (already lower-cased)
    pub fn get(&self, key: &str) -> Option<&SpeciesRecord> {
        self.entries.get(key)
    }

    /// Lookup for user input: case-insensitive, surrounding whitespace ignored
    pub fn lookup(&self, typed: &str) -> Option<&SpeciesRecord> {
        self.entries.get(&typed.trim().to_lowercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpeciesRecord)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|record| (key.as_str(), record)))
    }

    /// Entry at `position` in render order
    pub fn nth(&self, position: usize) -> Option<(&str, &SpeciesRecord)> {
        let key = self.order.get(position)?;
        self.entries.get(key).map(|record| (key.as_str(), record))
    }

    pub fn keys(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Seeded shuffle
// ---------------------------------------------------------------------------

struct SeededRng {
    state: u64,
}

impl SeededRng {
    fn new(seed: u64) -> Self {
        Self { state: mix64(seed) }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = mix64(self.state.wrapping_add(0x9e37_79b9_7f4a_7c15));
        self.state
    }

    fn next_bounded(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }
}

fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Fisher-Yates, walking down from the last element
fn shuffle<T>(items: &mut [T], rng: &mut SeededRng) {
    for i in (1..items.len()).rev() {
        let j = rng.next_bounded(i as u64 + 1) as usize;
        items.swap(i, j);
    }
}
