use connectors::memory::MemoryLog;
use engine_core::service::Host;
use std::sync::Arc;

/// Host backed by a message log loaded from disk. A log file has no owner,
/// so the service takes its identity from `FEEDQ_SELF_ID`.
pub struct LogHost {
    pub log: Arc<MemoryLog>,
}

impl Host for LogHost {
    type Store = MemoryLog;

    fn id(&self) -> &str {
        ""
    }

    fn db(&self) -> Option<Arc<MemoryLog>> {
        Some(Arc::clone(&self.log))
    }
}
