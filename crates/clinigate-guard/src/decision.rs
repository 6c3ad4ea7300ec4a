//! Authorization decisions and the render gate derived from them.

use std::fmt;

/// Outcome of one guard activation.
///
/// Starts at `Pending` unless the demo flag short-circuits; moves at most once
/// to `Authorized` or `Denied` and stays there for the life of the activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// No answer yet; the remote check is outstanding.
    Pending,
    /// Protected content may render.
    Authorized,
    /// Protected content must not render; a redirect has been issued.
    Denied,
}

impl Decision {
    /// Whether the decision can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Decision::Pending)
    }

    /// Stable name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Pending => "pending",
            Decision::Authorized => "authorized",
            Decision::Denied => "denied",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a protected view should show for the current decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    /// Neutral loading indicator: neither content nor the denied state.
    Loading,
    /// The protected content.
    Content(T),
    /// Nothing at all; navigation away is in progress.
    Nothing,
}

impl<T> Rendered<T> {
    /// Whether protected content was produced.
    pub fn is_content(&self) -> bool {
        matches!(self, Rendered::Content(_))
    }

    /// Get the content, if any.
    pub fn into_content(self) -> Option<T> {
        match self {
            Rendered::Content(content) => Some(content),
            _ => None,
        }
    }
}

/// Identity of a single activation, unique per guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivationId(pub(crate) u64);

impl ActivationId {
    /// Numeric value of the id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "act-{}", self.0)
    }
}
