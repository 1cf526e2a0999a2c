//! gradedex - grades every species by its evolutionary line and renders
//! the cards in yielding batches.
//!
//! The library exposes the modules for testing.

pub mod action;
pub mod artwork;
pub mod components;
pub mod config;
pub mod context;
pub mod dex;
pub mod effect;
pub mod error;
pub mod grade;
pub mod layout;
pub mod reducer;
pub mod render;
pub mod state;
