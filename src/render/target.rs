use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::card::{Card, SearchOption};

/// Output of one batch step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Batch {
    /// Species rendered before this batch
    pub offset: usize,
    pub cards: Vec<Card>,
    pub options: Vec<SearchOption>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn end(&self) -> usize {
        self.offset + self.cards.len()
    }
}

/// Where batches land: two append-only lists plus the search box that reads
/// one of them.
pub trait RenderTarget {
    fn append_cards(&mut self, cards: Vec<Card>);
    fn append_options(&mut self, options: Vec<SearchOption>);
    /// Re-associate the search input with the option list so freshly
    /// appended options are offered.
    fn rebind_search(&mut self);
}

/// One append per list, then the search rebind.
pub fn apply_batch<T: RenderTarget + ?Sized>(target: &mut T, batch: Batch) {
    let Batch { cards, options, .. } = batch;
    target.append_cards(cards);
    target.append_options(options);
    target.rebind_search();
}
