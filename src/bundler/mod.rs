//! Core dependency resolution and relocation pipeline.
//!
//! The pipeline runs once per produced binary, after compilation and before
//! archiving or signing:
//!
//! 1. [`resolve`] computes the fixpoint closure of shared-library dependencies
//!    reachable from the root binaries, classifying each discovered reference
//!    as system (excluded) or bundleable (copied).
//! 2. [`materialize`] copies the bundleable set into the platform's
//!    [`BundleLayout`], preserving symlink chains.
//! 3. [`rewrite`] patches load-path metadata in every artifact inside the
//!    layout so all references resolve relative to the bundle.

pub mod classify;
pub mod error;
pub mod introspect;
pub mod layout;
pub mod materialize;
pub mod pipeline;
pub mod resolve;
pub mod rewrite;
pub mod settings;
pub mod utils;

pub use error::{Error, Result};
pub use layout::BundleLayout;
pub use pipeline::{RelocationReport, Relocator};
pub use resolve::ResolvedSet;
pub use settings::{Arch, Linkage, ResolvePolicy, Settings, TargetPlatform};
