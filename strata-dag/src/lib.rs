//! Strata DAG - commit graph model and rendering traversal
//!
//! Provides the in-memory [`Dag`], its set algebra, the children-first
//! ordering and the reserve/row walk consumed by the layout engine.

mod dag;
mod sort;
mod walker;

pub use dag::Dag;
pub use walker::{NearestCache, WalkItem};
