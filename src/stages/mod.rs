//! Stages bundled with the crate, and helpers shared by stages.

pub mod explore_data;
pub mod slideshow;

pub use explore_data::{
    explore_data_stage, ExploreDataLocals, ExploreDataMarker, HUBBLE_SLIDESHOW_TITLES,
    SLIDESHOW_GATE,
};
pub use slideshow::SlideshowProgress;
