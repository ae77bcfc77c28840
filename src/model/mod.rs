//! Value objects produced by extractors and consumed by renderers.
//!
//! Every type here is request-scoped: built once from a shape or chart
//! subtree, handed to a generator, then dropped.

mod chart;
mod geometry;
mod style;

pub use chart::*;
pub use geometry::*;
pub use style::*;
