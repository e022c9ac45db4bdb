use strum_macros::{Display, EnumString};

pub type NodeId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeType {
    Place,
    Transition,
}

/// A place or a transition. Neighbours are indices into the nodes of the owning net.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) label: String,
    pub(crate) node_type: NodeType,
    pub(crate) incoming: Vec<usize>,
    pub(crate) outgoing: Vec<usize>,
}

impl Node {
    pub fn new(node_type: NodeType, id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            node_type,
            incoming: vec![],
            outgoing: vec![],
        }
    }

    pub fn place(id: NodeId, label: impl Into<String>) -> Self {
        Self::new(NodeType::Place, id, label)
    }

    pub fn transition(id: NodeId, label: impl Into<String>) -> Self {
        Self::new(NodeType::Transition, id, label)
    }

    pub fn get_id(&self) -> NodeId {
        self.id
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    pub fn get_type(&self) -> NodeType {
        self.node_type
    }

    pub fn is_place(&self) -> bool {
        self.node_type == NodeType::Place
    }

    pub fn is_transition(&self) -> bool {
        self.node_type == NodeType::Transition
    }

    /**
     * A node without a label. For a transition, firing it does not produce an observable event.
     */
    pub fn is_silent(&self) -> bool {
        self.label.is_empty()
    }

    pub fn get_incoming(&self) -> &[usize] {
        &self.incoming
    }

    pub fn get_outgoing(&self) -> &[usize] {
        &self.outgoing
    }
}
