//! Page context: everything built once at startup and shared read-only with
//! the effect handler, the search handler and the UI.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::config::Settings;
use crate::dex::{self, Pokedex, RawDataset};
use crate::error::StartupError;
use crate::grade::{Grade, Grader};
use crate::render::{Batch, BatchPlan, CardTemplate, SearchOption, build_card};

pub struct DexContext {
    dex: Pokedex,
    grader: Mutex<Grader>,
    plan: BatchPlan,
    template: CardTemplate,
    batch_delay: Duration,
    artwork: bool,
}

impl DexContext {
    pub fn new(dex: Pokedex, template: CardTemplate, settings: &Settings) -> Self {
        let plan = BatchPlan::new(dex.len(), settings.batch_size);
        Self {
            dex,
            grader: Mutex::new(Grader::new()),
            plan,
            template,
            batch_delay: settings.batch_delay,
            artwork: settings.artwork,
        }
    }

    /// Reads the dataset and template named in `settings`, falling back to the
    /// embedded ones. A template missing an insertion point fails here.
    pub async fn load(settings: &Settings) -> Result<Self, StartupError> {
        let raw: RawDataset = match &settings.dataset {
            Some(path) => dex::parse_dataset(&read_file(path).await?)?,
            None => dex::parse_dataset(dex::EMBEDDED_DATASET)?,
        };
        let template = match &settings.template {
            Some(path) => CardTemplate::parse(&read_file(path).await?)?,
            None => CardTemplate::embedded()?,
        };
        let dex = Pokedex::build(&raw, settings.seed);
        Ok(Self::new(dex, template, settings))
    }

    pub fn dex(&self) -> &Pokedex {
        &self.dex
    }

    pub fn template(&self) -> &CardTemplate {
        &self.template
    }

    pub fn plan(&self) -> BatchPlan {
        self.plan
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    pub fn artwork_enabled(&self) -> bool {
        self.artwork
    }

    pub fn grade(&self, key: &str) -> Grade {
        self.grader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .grade(&self.dex, key)
    }

    /// Builds the cards and options for the batch starting at `offset`
    pub fn render_batch(&self, offset: usize) -> Option<Batch> {
        let range = self.plan.range(offset)?;
        let mut grader = self.grader.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cards = Vec::with_capacity(range.len());
        let mut options = Vec::with_capacity(range.len());
        for position in range {
            let Some((key, species)) = self.dex.nth(position) else {
                continue;
            };
            options.push(SearchOption::for_species(species));
            let grade = grader.grade(&self.dex, key);
            cards.push(build_card(&self.dex, key, species, grade));
        }
        Some(Batch {
            offset,
            cards,
            options,
        })
    }

    /// Card id for a typed search value, if it names a canonical species
    pub fn locate(&self, query: &str) -> Option<String> {
        self.dex.lookup(query).map(|species| species.name.clone())
    }

    /// Card id for a submitted search: the typed value first, then the
    /// highlighted suggestion
    pub fn locate_submitted(&self, query: &str, fallback: Option<&str>) -> Option<String> {
        self.locate(query)
            .or_else(|| fallback.and_then(|name| self.locate(name)))
    }
}

async fn read_file(path: &Path) -> Result<String, StartupError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StartupError::Read {
            path: path.to_path_buf(),
            source,
        })
}
