//! Conversation step and intent vocabulary shared with the chat service.
//!
//! Both enums are closed: progress, label and quick-reply lookups match
//! exhaustively so a new step must be handled everywhere it is displayed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationStep {
    #[default]
    Greeting,
    CollectingCategory,
    CollectingDescription,
    CollectingLocation,
    CollectingDate,
    CollectingFeatures,
    CollectingPhone,
    Confirming,
    Completed,
    Cancelled,
}

/// Steps in the order shown by the progress indicator. `Cancelled` is
/// terminal but has no position.
pub const PROGRESS_ORDER: [ConversationStep; 9] = [
    ConversationStep::Greeting,
    ConversationStep::CollectingCategory,
    ConversationStep::CollectingDescription,
    ConversationStep::CollectingLocation,
    ConversationStep::CollectingDate,
    ConversationStep::CollectingFeatures,
    ConversationStep::CollectingPhone,
    ConversationStep::Confirming,
    ConversationStep::Completed,
];

impl ConversationStep {
    /// Zero-based index into [`PROGRESS_ORDER`], or `None` for `Cancelled`.
    pub fn progress_position(self) -> Option<usize> {
        match self {
            ConversationStep::Greeting => Some(0),
            ConversationStep::CollectingCategory => Some(1),
            ConversationStep::CollectingDescription => Some(2),
            ConversationStep::CollectingLocation => Some(3),
            ConversationStep::CollectingDate => Some(4),
            ConversationStep::CollectingFeatures => Some(5),
            ConversationStep::CollectingPhone => Some(6),
            ConversationStep::Confirming => Some(7),
            ConversationStep::Completed => Some(8),
            ConversationStep::Cancelled => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConversationStep::Greeting => "Getting started",
            ConversationStep::CollectingCategory => "Category",
            ConversationStep::CollectingDescription => "Description",
            ConversationStep::CollectingLocation => "Location",
            ConversationStep::CollectingDate => "Date lost",
            ConversationStep::CollectingFeatures => "Distinguishing features",
            ConversationStep::CollectingPhone => "Contact phone",
            ConversationStep::Confirming => "Review",
            ConversationStep::Completed => "Report filed",
            ConversationStep::Cancelled => "Cancelled",
        }
    }

    /// Canned replies offered for this step, in display order. Empty when
    /// the step expects free text.
    pub fn quick_replies(self) -> &'static [&'static str] {
        match self {
            ConversationStep::Greeting => &[
                "I lost something",
                "Search found items",
                "My reports",
                "Check my matches",
                "My pickups",
            ],
            ConversationStep::CollectingCategory => &[
                "Electronics",
                "Bags",
                "Documents",
                "Keys",
                "Clothing",
                "Accessories",
                "Jewelry",
                "Other",
            ],
            ConversationStep::CollectingDate => &["Today", "Yesterday", "Last week"],
            ConversationStep::CollectingFeatures => &["No distinguishing features"],
            ConversationStep::CollectingPhone => &["Skip"],
            ConversationStep::Confirming => &["Yes, submit", "No, cancel"],
            ConversationStep::CollectingDescription
            | ConversationStep::CollectingLocation
            | ConversationStep::Completed
            | ConversationStep::Cancelled => &[],
        }
    }

    /// True once the service will accept no further intake turns.
    pub fn is_terminal(self) -> bool {
        matches!(self, ConversationStep::Completed | ConversationStep::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatIntent {
    FileReport,
    SearchItems,
    MyReports,
    CheckMatches,
    MyPickups,
    #[default]
    Unknown,
}

impl ChatIntent {
    pub fn label(self) -> &'static str {
        match self {
            ChatIntent::FileReport => "Report a lost item",
            ChatIntent::SearchItems => "Search found items",
            ChatIntent::MyReports => "My reports",
            ChatIntent::CheckMatches => "Check matches",
            ChatIntent::MyPickups => "My pickups",
            ChatIntent::Unknown => "General",
        }
    }
}

/// Progress indicator for a step: `(position, total)` with a one-based
/// position, or `None` when the step is outside the progress order.
pub fn step_progress(step: ConversationStep) -> Option<(usize, usize)> {
    step.progress_position().map(|index| (index + 1, PROGRESS_ORDER.len()))
}
