use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource kinds served by the remote backend.
///
/// Each domain owns one resource table and is synchronized independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Stations,
    News,
    Prices,
    Careers,
    Faq,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Stations,
        Domain::News,
        Domain::Prices,
        Domain::Careers,
        Domain::Faq,
    ];

    /// Stable name used for table files and remote endpoints
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Stations => "stations",
            Domain::News => "news",
            Domain::Prices => "prices",
            Domain::Careers => "careers",
            Domain::Faq => "faq",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
