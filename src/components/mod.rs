pub mod artwork_view;
pub mod card_grid;
pub mod detail_panel;
pub mod dex_view;
pub mod search_overlay;
pub mod theme;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use artwork_view::ArtworkView;
pub use card_grid::{CardGrid, CardGridProps};
pub use detail_panel::{DetailPanel, DetailPanelProps};
pub use dex_view::{DexView, DexViewProps};
pub use search_overlay::{SearchOverlay, SearchOverlayProps};
