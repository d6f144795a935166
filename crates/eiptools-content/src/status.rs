//! Document statuses and their presentation.

use std::fmt;
use std::str::FromStr;

use eiptools_core::Error;
use serde::{Deserialize, Serialize};

/// Lifecycle status from a document header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Draft,
    Review,
    #[serde(rename = "Last Call")]
    LastCall,
    Final,
    Stagnant,
    Withdrawn,
    Living,
    Moved,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Draft,
        Status::Review,
        Status::LastCall,
        Status::Final,
        Status::Stagnant,
        Status::Withdrawn,
        Status::Living,
        Status::Moved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Review => "Review",
            Self::LastCall => "Last Call",
            Self::Final => "Final",
            Self::Stagnant => "Stagnant",
            Self::Withdrawn => "Withdrawn",
            Self::Living => "Living",
            Self::Moved => "Moved",
        }
    }

    /// Badge and graph-node colour.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Draft => "#D69E2E",
            Self::Review => "#F1C40F",
            Self::LastCall => "#38A169",
            Self::Final | Self::Living => "#2ECC71",
            Self::Stagnant => "#E53E3E",
            Self::Withdrawn | Self::Moved => "#95A5A6",
        }
    }

    /// Emoji shown before the status banner.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Draft | Self::Review => "⚠️",
            Self::LastCall => "📢",
            Self::Final => "🎉",
            Self::Stagnant => "🚧",
            Self::Withdrawn => "🛑",
            Self::Living => "🌱",
            Self::Moved => "➡️",
        }
    }

    /// Banner text, worded for a document of the given label (`EIP`, `RIP`).
    pub fn description(&self, label: &str) -> String {
        match self {
            Self::Draft | Self::Review => format!(
                "This {label} is not yet recommended for general use or implementation, \
                 as it is subject to normative (breaking) changes."
            ),
            Self::LastCall => format!(
                "This {label} is in the last call for review stage. The authors wish to \
                 finalize the {label} and ask you to provide feedback."
            ),
            Self::Final => format!("This {label} has been accepted and implemented."),
            Self::Stagnant => format!(
                "This {label} had no activity for at least 6 months. This {label} should not be used."
            ),
            Self::Withdrawn => format!("This {label} has been withdrawn, and should not be used."),
            Self::Living => format!("This {label} is a living document and is continually updated."),
            Self::Moved => format!("This {label} has been moved to another repository."),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    /// Case-insensitive; `LastCall` and `last-call` are accepted for `Last Call`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| Error::invalid_input(format!("unknown status '{s}'")))
    }
}

/// Colour for a raw status string; unknown statuses get the Draft colour.
///
/// ```rust
/// use eiptools_content::status_color;
///
/// assert_eq!(status_color("Final"), "#2ECC71");
/// assert_eq!(status_color("Someday"), "#D69E2E");
/// ```
pub fn status_color(status: &str) -> &'static str {
    status
        .parse::<Status>()
        .map_or(Status::Draft.color(), |s| s.color())
}
