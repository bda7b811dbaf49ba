//! Compiled-script cache
//!
//! Maps a resolved file path to the engine's compiled handle plus the file's
//! modification time at compile time. Entries are never evicted.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use hearth_config::CachePolicy;
use tracing::{debug, trace};

use crate::engine::CompiledScript;
use crate::error::{CompileError, HostError};

/// Cache entry for one resolved path
#[derive(Debug, Clone)]
pub struct CachedScript {
    /// Modification time observed when the script was compiled
    pub modified: Option<SystemTime>,
    pub script: CompiledScript,
}

/// Lookup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub recompiles: u64,
}

/// Compiled-script cache owned by a host.
///
/// Single-threaded: shared through `Rc`, interior state behind `RefCell`.
pub struct ScriptCache {
    policy: CachePolicy,
    entries: RefCell<HashMap<PathBuf, CachedScript>>,
    stats: Cell<CacheStats>,
}

enum Lookup {
    Hit(CompiledScript),
    Stale,
    Miss,
}

impl ScriptCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: RefCell::new(HashMap::new()),
            stats: Cell::new(CacheStats::default()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Return the compiled script for `key`, compiling `source` on a miss.
    ///
    /// Under [`CachePolicy::Revalidate`] an entry whose recorded modification
    /// time differs from `modified` is recompiled and replaced. A compile
    /// failure propagates and leaves no entry for `key`.
    pub fn get_or_compile<F>(
        &self,
        key: &Path,
        source: &str,
        modified: Option<SystemTime>,
        compile: F,
    ) -> Result<CompiledScript, HostError>
    where
        F: FnOnce(&str) -> Result<CompiledScript, CompileError>,
    {
        let stale = match self.lookup_fresh(key, modified) {
            Lookup::Hit(script) => {
                trace!(target: "hearth::cache", path = %key.display(), "cache hit");
                self.bump(|s| s.hits += 1);
                return Ok(script);
            }
            Lookup::Stale => true,
            Lookup::Miss => false,
        };

        if stale {
            debug!(target: "hearth::cache", path = %key.display(), "source changed, recompiling");
            self.bump(|s| s.recompiles += 1);
        } else {
            debug!(target: "hearth::cache", path = %key.display(), "cache miss, compiling");
            self.bump(|s| s.misses += 1);
        }

        // The engine is free to call back into the host while compiling,
        // so no borrow of `entries` is held here.
        match compile(source) {
            Ok(script) => {
                self.entries.borrow_mut().insert(
                    key.to_path_buf(),
                    CachedScript {
                        modified,
                        script: script.clone(),
                    },
                );
                Ok(script)
            }
            Err(err) => {
                self.entries.borrow_mut().remove(key);
                Err(err.into())
            }
        }
    }

    fn lookup_fresh(&self, key: &Path, modified: Option<SystemTime>) -> Lookup {
        let entries = self.entries.borrow();
        let Some(entry) = entries.get(key) else {
            return Lookup::Miss;
        };
        let fresh = match (self.policy, entry.modified, modified) {
            (CachePolicy::Snapshot, _, _) => true,
            (CachePolicy::Revalidate, Some(cached), Some(current)) => cached == current,
            (CachePolicy::Revalidate, _, _) => true,
        };
        if fresh {
            Lookup::Hit(entry.script.clone())
        } else {
            Lookup::Stale
        }
    }

    fn bump(&self, update: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Cached handle for `key`, without any staleness check
    pub fn lookup(&self, key: &Path) -> Option<CompiledScript> {
        self.entries.borrow().get(key).map(|entry| entry.script.clone())
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }
}

impl Default for ScriptCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}
