//! Set-fixpoint closure of dependency edges.
//!
//! The resolver repeatedly probes every known artifact and unions in newly
//! discovered bundleable dependencies until a pass adds nothing. Termination
//! is guaranteed by comparing against an immutable per-iteration snapshot,
//! independent of cycles in the dependency graph.

use crate::bundler::classify::{Class, Classifier};
use crate::bundler::error::{Error, Result};
use crate::bundler::introspect::{Introspect, RawDependency};
use crate::bundler::settings::ResolvePolicy;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// The fixpoint closure reachable from a set of root binaries.
///
/// Invariant: every member of `bundled` is a verified-existing absolute
/// path. A reference whose target is missing fails resolution outright.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolvedSet {
    /// Bundleable dependencies, deduplicated by absolute path
    pub bundled: BTreeSet<PathBuf>,
    /// Bare names no search path directory could satisfy, sorted
    pub unresolved: Vec<String>,
}

/// Compute the dependency closure of `roots`.
///
/// Each pass probes the roots plus every member discovered so far; the loop
/// stops when the set is stable. Probe calls are bounded by
/// `O(depth x fan-out)` over the real dependency graph.
pub async fn resolve(
    roots: &[PathBuf],
    probe: &dyn Introspect,
    classifier: &Classifier,
    policy: ResolvePolicy,
) -> Result<ResolvedSet> {
    let mut bundled: BTreeSet<PathBuf> = BTreeSet::new();
    let mut unresolved: BTreeSet<String> = BTreeSet::new();

    // Runtime DLLs the loader pulls in without an import-table entry
    for name in classifier.runtime_dlls() {
        match classifier.resolve_bare(&name) {
            Some(path) => {
                log::debug!("injecting runtime library {}", path.display());
                bundled.insert(path);
            }
            None => {
                unresolved.insert(name);
            }
        }
    }

    loop {
        let snapshot = bundled.clone();

        let mut artifacts: Vec<PathBuf> = roots.to_vec();
        artifacts.extend(snapshot.iter().cloned());

        for artifact in artifacts {
            for dep in probe.dependencies(&artifact).await? {
                match dep {
                    RawDependency::Path(path) => {
                        if classifier.classify_path(&path) == Class::System {
                            continue;
                        }
                        if !path.exists() {
                            return Err(Error::BrokenDependency {
                                reference: path.display().to_string(),
                                referrer: artifact.clone(),
                            });
                        }
                        bundled.insert(path);
                    }
                    RawDependency::Name(name) => {
                        if classifier.classify_name(&name) == Class::System {
                            continue;
                        }
                        match classifier.resolve_bare(&name) {
                            Some(path) => {
                                bundled.insert(path);
                            }
                            None => {
                                unresolved.insert(name);
                            }
                        }
                    }
                }
            }
        }

        if bundled == snapshot {
            break;
        }
    }

    let unresolved: Vec<String> = unresolved.into_iter().collect();
    if policy == ResolvePolicy::Strict && !unresolved.is_empty() {
        return Err(Error::UnresolvedLibraries(unresolved));
    }

    Ok(ResolvedSet {
        bundled,
        unresolved,
    })
}
