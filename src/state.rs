//! Application state - single source of truth

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{DebugSection, DebugState, ron_string};

use crate::artwork::Artwork;
use crate::layout::GridMetrics;
use crate::render::{Card, RenderTarget, SearchOption};

pub const TICK_MS: u64 = 60;
pub const HIGHLIGHT_DURATION_MS: u64 = 3600;
/// Highlight border flips every this many ticks
pub const PULSE_TICKS: u32 = 5;
pub const MAX_SUGGESTIONS: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RenderPhase {
    #[default]
    Idle,
    Rendering,
    Done,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderProgress {
    pub phase: RenderPhase,
    /// Species in the index
    pub total: usize,
    /// Batches applied so far
    pub batches: usize,
}

/// The two append-only lists batches land in
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Page {
    pub cards: Vec<Card>,
    pub options: Vec<SearchOption>,
    /// Card id -> grid position
    pub positions: HashMap<String, usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub suggestions: Vec<SearchOption>,
    pub selected: usize,
    /// Times the input was re-associated with the option list
    pub bindings: usize,
}

impl SearchState {
    pub fn refresh(&mut self, options: &[SearchOption]) {
        self.suggestions = options
            .iter()
            .filter(|option| option.matches(&self.query))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect();
        if self.selected >= self.suggestions.len() {
            self.selected = 0;
        }
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.suggestions
            .get(self.selected)
            .map(|option| option.value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Highlight {
    pub card_id: String,
    /// Only the expiry carrying this token may clear the highlight
    pub token: u64,
    pub since_tick: u32,
}

impl Highlight {
    pub fn lit(&self, tick: u32) -> bool {
        (tick.wrapping_sub(self.since_tick) / PULSE_TICKS) % 2 == 0
    }
}

/// Scroll position in grid rows; `row` eases toward `target` on ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScrollState {
    pub row: u16,
    pub target: u16,
}

impl ScrollState {
    /// Move a third of the remaining distance, at least one row
    pub fn step(&mut self) -> bool {
        if self.row == self.target {
            return false;
        }
        let distance = self.row.abs_diff(self.target);
        let step = (distance / 3).max(1);
        if self.row < self.target {
            self.row += step;
        } else {
            self.row -= step;
        }
        true
    }

    pub fn clamp(&mut self, max_top: u16) {
        self.row = self.row.min(max_top);
        self.target = self.target.min(max_top);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    /// Card height including border, from the template
    pub card_height: u16,
    pub artwork_enabled: bool,
    pub render: RenderProgress,
    pub page: Page,
    pub selected: usize,
    pub scroll: ScrollState,
    pub highlight: Option<Highlight>,
    pub highlight_seq: u64,
    /// Search hit whose card has not been rendered yet
    pub pending_focus: Option<String>,
    pub search: SearchState,
    pub artwork: HashMap<u16, DataResource<Artwork>>,
    pub message: Option<String>,
    pub tick: u32,
}

impl AppState {
    pub fn new(total: usize, card_height: u16, artwork_enabled: bool) -> Self {
        Self {
            terminal_size: (80, 24),
            card_height,
            artwork_enabled,
            render: RenderProgress {
                total,
                ..Default::default()
            },
            page: Page::default(),
            selected: 0,
            scroll: ScrollState::default(),
            highlight: None,
            highlight_seq: 0,
            pending_focus: None,
            search: SearchState::default(),
            artwork: HashMap::new(),
            message: None,
            tick: 0,
        }
    }

    pub fn metrics(&self) -> GridMetrics {
        GridMetrics::for_terminal(self.terminal_size, self.card_height)
    }

    pub fn rendered(&self) -> usize {
        self.page.cards.len()
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.page.cards.get(self.selected)
    }

    pub fn card_index(&self, id: &str) -> Option<usize> {
        self.page.positions.get(id).copied()
    }

    pub fn is_done(&self) -> bool {
        self.render.phase == RenderPhase::Done
    }

    /// Whether the card should currently be drawn with the highlight border
    pub fn highlight_lit(&self, id: &str) -> bool {
        self.highlight
            .as_ref()
            .is_some_and(|highlight| highlight.card_id == id && highlight.lit(self.tick))
    }

    pub fn artwork_for(&self, number: u16) -> Option<&DataResource<Artwork>> {
        self.artwork.get(&number)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(0, 7, false)
    }
}

impl RenderTarget for AppState {
    fn append_cards(&mut self, cards: Vec<Card>) {
        for card in cards {
            let position = self.page.cards.len();
            self.page.positions.entry(card.id.clone()).or_insert(position);
            self.page.cards.push(card);
        }
    }

    fn append_options(&mut self, options: Vec<SearchOption>) {
        self.page.options.extend(options);
    }

    fn rebind_search(&mut self) {
        self.search.bindings += 1;
        if self.search.active {
            self.search.refresh(&self.page.options);
        }
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Render")
                .entry("phase", ron_string(&self.render.phase))
                .entry("total", ron_string(&self.render.total))
                .entry("rendered", ron_string(&self.rendered()))
                .entry("batches", ron_string(&self.render.batches))
                .entry("options", ron_string(&self.page.options.len())),
            DebugSection::new("Selection")
                .entry("index", ron_string(&self.selected))
                .entry(
                    "card",
                    ron_string(&self.selected_card().map(|card| card.name.clone())),
                )
                .entry("scroll_row", ron_string(&self.scroll.row))
                .entry("scroll_target", ron_string(&self.scroll.target))
                .entry("terminal", ron_string(&self.terminal_size)),
            DebugSection::new("Search")
                .entry("active", ron_string(&self.search.active))
                .entry("query", ron_string(&self.search.query))
                .entry("suggestions", ron_string(&self.search.suggestions.len()))
                .entry("bindings", ron_string(&self.search.bindings))
                .entry("pending_focus", ron_string(&self.pending_focus)),
            DebugSection::new("Highlight")
                .entry(
                    "card",
                    ron_string(&self.highlight.as_ref().map(|h| h.card_id.clone())),
                )
                .entry(
                    "token",
                    ron_string(&self.highlight.as_ref().map(|h| h.token)),
                )
                .entry("seq", ron_string(&self.highlight_seq)),
            DebugSection::new("Status")
                .entry("artwork_enabled", ron_string(&self.artwork_enabled))
                .entry("artwork_cached", ron_string(&self.artwork.len()))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
