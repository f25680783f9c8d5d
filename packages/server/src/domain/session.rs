//! Connection session lifecycle.

/// Lifecycle phase of one client connection.
///
/// `Connecting -> Active -> Closed`; `Closed` is terminal and there is no resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Connecting,
    Active,
    Closed,
}

impl SessionPhase {
    /// Returns the next phase for a successful accept.
    pub fn activate(self) -> Self {
        match self {
            Self::Connecting => Self::Active,
            other => other,
        }
    }

    /// Returns the terminal phase. Closing twice is a no-op.
    pub fn close(self) -> Self {
        Self::Closed
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
