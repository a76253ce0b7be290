use crate::{PathEntry, RpcError, Sciond};
use scion_addr::IsdAsn;
use std::collections::HashMap;

/// Lazily memoizes daemon path lookups for the lifetime of the process.
///
/// An empty daemon response is cached too: a destination the daemon cannot
/// reach stays unreachable without costing one RPC per packet. Entries are
/// never evicted or refreshed; translator runs are short-lived by design.
pub struct PathCache<D> {
    daemon: D,
    paths: HashMap<IsdAsn, Vec<PathEntry>>,
}

impl<D: Sciond> PathCache<D> {
    pub fn new(daemon: D) -> Self {
        Self {
            daemon,
            paths: HashMap::new(),
        }
    }

    pub fn local_ia(&self) -> IsdAsn {
        self.daemon.local_ia()
    }

    /// Returns the first known path entry for `dst_ia`, querying the daemon
    /// on the first miss.
    ///
    /// The daemon's order is preserved and index 0 is selected, so the
    /// tie-break between paths is daemon-defined.
    pub fn lookup(&mut self, dst_ia: IsdAsn) -> Result<Option<&PathEntry>, RpcError> {
        if !self.paths.contains_key(&dst_ia) {
            let local_ia = self.daemon.local_ia();
            let paths = self.daemon.paths(local_ia, dst_ia)?;

            tracing::debug!(%dst_ia, num_paths = paths.len(), "Fetched paths from daemon");

            self.paths.insert(dst_ia, paths);
        }

        Ok(self.paths.get(&dst_ia).and_then(|paths| paths.first()))
    }
}
