//! # Assembly Module
//!
//! Turns a folder (or list) of clips into one reel: ordering, per-clip
//! normalization, transition cards, rendering and cleanup.

pub mod order;
pub mod pipeline;
pub mod report;
pub mod resources;
pub mod timeline;

pub use order::{AssemblyOrder, SegmentSource};
pub use pipeline::{AssemblyOutcome, AssemblyPipeline, AssemblyRequest};
pub use report::{Reporter, RunState, TracingReporter};
pub use resources::ResourceScope;
pub use timeline::{ClipUnit, Timeline};
