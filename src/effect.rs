//! Effects - side effects declared by the reducer

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Yield, then build the batch starting at `offset`
    RenderBatch { offset: usize },
    /// Resolve a submitted search value to a card id, trying `fallback`
    /// (the highlighted suggestion) when the value names no species
    LocateSpecies {
        query: String,
        fallback: Option<String>,
    },
    /// Clear the highlight after its duration unless it was replaced
    ExpireHighlight { token: u64 },
    LoadArtwork { number: u16, url: String },
}
