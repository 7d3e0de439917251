//! Domain definitions for kernel categorization.
//!
//! Kernels are organized into domains representing different analytical
//! areas. Domains are used for kernel discovery and organization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analytical domain for kernel categorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Domain {
    /// Graph analytics: adjacency construction, cycle and path search.
    GraphAnalytics,

    /// Compliance: laundering-pattern detection, suspicion scoring.
    Compliance,

    /// Core: infrastructure validation.
    Core,
}

impl Domain {
    /// All available domains.
    pub const ALL: &'static [Domain] = &[Domain::GraphAnalytics, Domain::Compliance, Domain::Core];

    /// Returns the domain name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::GraphAnalytics => "GraphAnalytics",
            Domain::Compliance => "Compliance",
            Domain::Core => "Core",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
