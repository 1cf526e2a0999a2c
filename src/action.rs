use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::render::Batch;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Start the batch loop
    Init,

    // ===== Render category =====
    /// Result: one batch of cards and options is ready
    BatchDidRender(Batch),

    /// Result: the batch loop ran out of species
    RenderDidFinish,

    // ===== Search category =====
    SearchOpen,

    SearchClose,

    SearchQueryChange(String),

    /// Highlight a suggestion (by index)
    SearchSelect(usize),

    /// Change event of the search input: the value to look up
    SearchSubmit(String),

    // ===== Card category =====
    /// Result: search resolved to this card id
    CardFocus(String),

    // ===== Highlight category =====
    /// Timer: highlight with this token has run its course
    HighlightDidExpire(u64),

    // ===== Selection category =====
    /// Move by cards (left/right)
    SelectionMove(i16),

    /// Move by grid rows
    SelectionRow(i16),

    /// Move by screens
    SelectionPage(i16),

    SelectionJumpTop,

    SelectionJumpBottom,

    // ===== Artwork category =====
    ArtworkDidLoad(u16, Artwork),

    ArtworkDidError(u16, String),

    // ===== UI category =====
    UiTerminalResize(u16, u16),

    /// Force a re-render (for cursor movement, etc.)
    UiRender,

    // ===== Uncategorized (global) =====
    /// Drives smooth scroll and the highlight pulse
    Tick,

    Quit,
}
