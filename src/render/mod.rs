//! Incremental renderer: cards and autocomplete options built batch by batch

pub mod card;
pub mod scheduler;
pub mod target;
pub mod template;

pub use card::{Card, EvolutionPreview, SearchOption, artwork_url, build_card, detail_url};
pub use scheduler::{BatchPlan, DEFAULT_BATCH_SIZE, yield_between_batches};
pub use target::{Batch, RenderTarget, apply_batch};
pub use template::{CardStyle, CardTemplate, Slot, TemplateError};
