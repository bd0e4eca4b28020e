//! Identifiers for host nodes and visibility watchers.

use serde::{Deserialize, Serialize};

/// Opaque handle for a node owned by the host (DOM element, test node, ...).
///
/// The host assigns these when it describes the page; the core never
/// interprets the number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// The three intersection observers the engine asks the host to run.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatcherId {
    Reveal,
    Stats,
    Sections,
}

impl WatcherId {
    pub const ALL: [WatcherId; 3] = [WatcherId::Reveal, WatcherId::Stats, WatcherId::Sections];

    pub fn as_str(self) -> &'static str {
        match self {
            WatcherId::Reveal => "reveal",
            WatcherId::Stats => "stats",
            WatcherId::Sections => "sections",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_id_is_transparent_in_json() {
        let json = serde_json::to_string(&ElementId(7)).unwrap();
        assert_eq!(json, "7");
        let back: ElementId = serde_json::from_str("7").unwrap();
        assert_eq!(back, ElementId(7));
    }

    #[test]
    fn watcher_names_match_serde() {
        for w in WatcherId::ALL {
            let json = serde_json::to_string(&w).unwrap();
            assert_eq!(json, format!("\"{}\"", w.as_str()));
        }
    }
}
