use crate::pnc_objects::node::NodeId;

/// Structural errors of a Petri net. Any of these makes the net unusable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    #[error("node #{0} is already part of the net")]
    DuplicateId(NodeId),
    #[error("arc from #{from} to #{to} connects two nodes of the same type")]
    TypeMismatch { from: NodeId, to: NodeId },
    #[error("arc from #{from} to #{to} is already part of the net")]
    DuplicateArc { from: NodeId, to: NodeId },
    #[error("the net does not contain node #{0}")]
    UnknownNode(NodeId),
    #[error("node #{0} is a transition and cannot hold tokens")]
    NotAPlace(NodeId),
    #[error("no initial marking was given")]
    MissingInitialMarking,
    #[error("no final marking was given")]
    MissingFinalMarking,
}

pub type NetResult<T> = std::result::Result<T, NetError>;
