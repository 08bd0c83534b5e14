use serde::{Deserialize, Serialize};
use std::fmt;

/// Streaming services whose links are kept; every other service is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StreamService {
    Uqload,
    Netu,
    Filmoon,
    DoodStream,
}

impl StreamService {
    /// All allow-listed services
    pub const ALL: [StreamService; 4] = [
        StreamService::Uqload,
        StreamService::Netu,
        StreamService::Filmoon,
        StreamService::DoodStream,
    ];

    /// Name as it appears on the detail page and in the result file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uqload => "Uqload",
            Self::Netu => "Netu",
            Self::Filmoon => "Filmoon",
            Self::DoodStream => "DoodStream",
        }
    }

    /// Looks up a service by its exact displayed name
    ///
    /// Matching is case-sensitive; `"uqload"` is not a known service.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|service| service.as_str() == name)
    }
}

impl fmt::Display for StreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
