//! Category hierarchies for content catalogs.
//!
//! A deployment holds one forest of categories, at most five levels deep.
//! [`domain::TreeBuilder`] turns persisted rows into a [`domain::CategoryForest`];
//! [`domain::PathSelector`] drills down through it one level at a time;
//! [`domain::PathReconstructor`] turns an item's stored id set back into
//! selection paths; [`application::services::HierarchyService`] validates
//! and applies create, rename and cascade delete.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
