use serde::{Deserialize, Serialize};

/// Position in a store's scan order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Start of the log.
    #[default]
    None,

    /// Resume after `offset` log entries have been scanned.
    Offset { offset: usize },
}

impl Cursor {
    pub fn offset(&self) -> usize {
        match self {
            Cursor::None => 0,
            Cursor::Offset { offset } => *offset,
        }
    }
}
