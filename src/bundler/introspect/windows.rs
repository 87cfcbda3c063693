//! PE dependency discovery via the import table.
//!
//! Parsed in-process with goblin instead of shelling out: PE import entries
//! are bare DLL names with no embedded paths, so there is no loader-token
//! normalization to do and no external dumper to depend on.

use super::{DependencyFuture, Introspect, RawDependency};
use crate::bundler::error::{Error, ErrorExt};
use std::path::Path;

/// Probe backed by goblin's PE parser.
pub struct PeProbe;

impl Introspect for PeProbe {
    fn dependencies<'a>(&'a self, binary: &'a Path) -> DependencyFuture<'a> {
        Box::pin(async move {
            let buffer = tokio::fs::read(binary)
                .await
                .fs_context("failed to read binary", binary)?;

            match goblin::Object::parse(&buffer) {
                Ok(goblin::Object::PE(pe)) => Ok(pe
                    .libraries
                    .iter()
                    .map(|name| RawDependency::Name((*name).to_string()))
                    .collect()),
                Ok(_) => Err(Error::BinaryParse {
                    path: binary.to_path_buf(),
                    reason: "not a PE image".to_string(),
                }),
                Err(e) => Err(Error::BinaryParse {
                    path: binary.to_path_buf(),
                    reason: e.to_string(),
                }),
            }
        })
    }
}
