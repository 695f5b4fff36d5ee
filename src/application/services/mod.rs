//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (CategoryStore, TagStore, Selector)
//! but are themselves concrete structs, not traits.

mod drill;
mod hierarchy;
mod tagging;

pub use drill::drill_down;
pub use hierarchy::HierarchyService;
pub use tagging::TaggingService;
