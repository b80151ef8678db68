#![deny(
    // This is overly strict, of course. The intent is to force inline allows, which give us a
    // mechanism to say "we think this is okay, but you might want to take a second look here."
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]

//! # rn-prep – routing shortcut preparation
//!
//! rn-prep shrinks the search space of later route queries by collapsing chains of pass-through
//! nodes in a road graph into single shortcut edges.
//!
//! ## Pipeline overview
//! 1. Loading ([`rn_core::load_graph`]) – read a JSON or `MessagePack` graph document and validate
//!    it into a [`rn_core::RoadGraph`].
//! 2. Preparation ([`shortcuts::ShortcutPreparation`]) – visit every junction, walk each of its
//!    outgoing edges through the through-nodes behind it, contract them, and insert or shorten
//!    the edge standing for the chain.
//! 3. Output ([`utils`]) – write the prepared graph, a run metadata file with the
//!    [`shortcuts::ShortcutReport`], and optional DOT renderings into a timestamped run directory.
//!
//! Shortcuts can be expanded back into the nodes they replace with [`unpack::unpack_edge`].
//!
//! The pass is annotated with [`tracing`] spans and events so callers can observe progress.

pub mod shortcuts;
pub mod unpack;
pub mod utils;

pub use shortcuts::{
    prepare_shortcuts,
    ShortcutPreparation,
    ShortcutReport,
};
pub use unpack::unpack_edge;
