//! Error types for the host tree.

/// Result type alias for host tree operations.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors raised by structural changes to the host tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The insertion would create a cycle or put a child under a text node.
    #[error("Cannot insert {child} into {parent}: {reason}")]
    HierarchyRequest {
        parent: String,
        child: String,
        reason: &'static str,
    },

    /// The node to remove is not a child of the given parent.
    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },

    /// The node's document has been dropped.
    #[error("{node} no longer belongs to a document")]
    Orphaned { node: String },
}

impl DomError {
    pub(crate) fn hierarchy(
        parent: impl Into<String>,
        child: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::HierarchyRequest {
            parent: parent.into(),
            child: child.into(),
            reason,
        }
    }

    pub(crate) fn orphaned(node: impl Into<String>) -> Self {
        Self::Orphaned { node: node.into() }
    }

    pub(crate) fn not_a_child(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::NotAChild {
            parent: parent.into(),
            child: child.into(),
        }
    }
}
