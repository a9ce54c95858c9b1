//! License selection, copyright aggregation and license entry construction.
//!
//! - [`selector`] — picks the authoritative license set of a package or project.
//! - [`copyright`] — indexes findings and joins the copyright statements that
//!   belong to a selected license set.
//! - [`entry`] — turns a license identifier into an anchored, renderable entry.
//! - [`texts`] — license-text lookup (memory, then text directories).
//! - [`spdx`] — full display names for SPDX identifiers.

pub mod copyright;
pub mod entry;
pub mod selector;
pub mod spdx;
pub mod texts;
