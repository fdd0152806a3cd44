use crate::document::NodeId;

/// Construction-time failures. These surface before any host mutation.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("node {0:?} is not live in this document")]
    UnknownNode(NodeId),
    #[error("host node {0:?} must be marked foreign before it can be used as a child")]
    UnmarkedForeign(NodeId),
    #[error("child must be empty, text, a descriptor or a foreign element; {0:?} is a text leaf")]
    InvalidChild(NodeId),
    #[error("foreign node {0:?} appears more than once in one child list")]
    RepeatedForeign(NodeId),
    #[error("thunk key could not be serialized: {0}")]
    Key(#[from] serde_json::Error),
}
