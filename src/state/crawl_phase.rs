/// Crawl phase definitions for the crawl loop state machine
///
/// ```text
/// Idle -> Running -> Drained | BudgetExhausted | DeadlineReached
/// ```
use std::fmt;

/// Represents where the crawl loop is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing enqueued yet
    Idle,

    /// Seed enqueued, pages being processed
    Running,

    // ===== Terminal States =====
    /// The frontier emptied before the page budget ran out
    Drained,

    /// The page budget was used up; remaining frontier entries were abandoned
    BudgetExhausted,

    /// The crawl deadline passed; remaining frontier entries were abandoned
    DeadlineReached,
}

impl CrawlPhase {
    /// Returns true once the loop has stopped dequeuing
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Drained | Self::BudgetExhausted | Self::DeadlineReached
        )
    }

    /// Returns true if the crawl stopped with work still pending
    pub fn abandoned_work(&self) -> bool {
        matches!(self, Self::BudgetExhausted | Self::DeadlineReached)
    }

    /// Validates a state machine transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Idle, Self::Running) => true,
            (Self::Running, next) => next.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Drained => "drained",
            Self::BudgetExhausted => "budget_exhausted",
            Self::DeadlineReached => "deadline_reached",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
