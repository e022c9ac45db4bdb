use anyhow::{Context, Error, Result};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::{fmt, io::BufRead, str::FromStr};

use crate::{
    error::{NetError, NetResult},
    marking::Marking,
    pnc_framework::{
        activity_key::{Activity, ActivityKey},
        importable::Importable,
        infoable::Infoable,
    },
    pnc_objects::{
        net_description::{HEADER, NetDescription},
        node::{Node, NodeId, NodeType},
    },
    semantics::net_execution::NetExecution,
};

/// The structure of a Petri net with its initial and final marking. Immutable during execution:
/// token counts live in a [`NetExecution`].
#[derive(Clone, Debug)]
pub struct PetriNet {
    pub(crate) activity_key: ActivityKey,
    pub(crate) nodes: Vec<Node>,
    pub(crate) id2index: FxHashMap<NodeId, usize>,
    pub(crate) labels: Vec<Option<Activity>>, //for each node: the activity of a labelled transition
    pub(crate) transitions: Vec<usize>, //node indices of the transitions, in declaration order
    pub(crate) initial_marking: Marking,
    pub(crate) final_marking: Marking,
}

impl PetriNet {
    pub fn new() -> Self {
        Self {
            activity_key: ActivityKey::new(),
            nodes: vec![],
            id2index: FxHashMap::default(),
            labels: vec![],
            transitions: vec![],
            initial_marking: Marking::new(),
            final_marking: Marking::new(),
        }
    }

    /**
     * Registers a node and returns its index. Arcs of the node are ignored; use add_arc.
     */
    pub fn add_node(&mut self, mut node: Node) -> NetResult<usize> {
        if self.id2index.contains_key(&node.id) {
            return Err(NetError::DuplicateId(node.id));
        }

        node.incoming.clear();
        node.outgoing.clear();

        let index = self.nodes.len();
        let label = match node.node_type {
            NodeType::Transition if !node.is_silent() => {
                Some(self.activity_key.process_activity(&node.label))
            }
            _ => None,
        };
        if node.is_transition() {
            self.transitions.push(index);
        }

        self.id2index.insert(node.id, index);
        self.labels.push(label);
        self.nodes.push(node);
        Ok(index)
    }

    pub fn add_arc(&mut self, from: NodeId, to: NodeId) -> NetResult<()> {
        let index_from = self.get_index(from)?;
        let index_to = self.get_index(to)?;

        if self.nodes[index_from].node_type == self.nodes[index_to].node_type {
            return Err(NetError::TypeMismatch { from, to });
        }
        if self.nodes[index_from].outgoing.contains(&index_to) {
            return Err(NetError::DuplicateArc { from, to });
        }

        self.nodes[index_from].outgoing.push(index_to);
        self.nodes[index_to].incoming.push(index_from);
        Ok(())
    }

    pub fn get_index(&self, id: NodeId) -> NetResult<usize> {
        self.id2index
            .get(&id)
            .copied()
            .ok_or(NetError::UnknownNode(id))
    }

    /**
     * Returns the node index of a place.
     */
    pub fn get_place_index(&self, id: NodeId) -> NetResult<usize> {
        let index = self.get_index(id)?;
        if self.nodes[index].is_place() {
            Ok(index)
        } else {
            Err(NetError::NotAPlace(id))
        }
    }

    pub fn get_node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn get_nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get_number_of_places(&self) -> usize {
        self.nodes.len() - self.transitions.len()
    }

    pub fn get_number_of_transitions(&self) -> usize {
        self.transitions.len()
    }

    /**
     * Node indices of all transitions, in the order in which they were added.
     */
    pub fn get_transitions(&self) -> &[usize] {
        &self.transitions
    }

    pub fn get_transition_activity(&self, transition: usize) -> Option<Activity> {
        self.labels[transition]
    }

    pub fn is_transition_silent(&self, transition: usize) -> bool {
        self.nodes[transition].is_transition() && self.labels[transition].is_none()
    }

    pub fn get_activity_key(&self) -> &ActivityKey {
        &self.activity_key
    }

    pub fn get_activity_key_mut(&mut self) -> &mut ActivityKey {
        &mut self.activity_key
    }

    pub fn get_initial_marking(&self) -> &Marking {
        &self.initial_marking
    }

    pub fn get_final_marking(&self) -> &Marking {
        &self.final_marking
    }

    pub fn set_initial_marking(&mut self, marking: Marking) -> NetResult<()> {
        self.check_marking(&marking)?;
        self.initial_marking = marking;
        Ok(())
    }

    pub fn set_final_marking(&mut self, marking: Marking) -> NetResult<()> {
        self.check_marking(&marking)?;
        self.final_marking = marking;
        Ok(())
    }

    pub fn check_marking(&self, marking: &Marking) -> NetResult<()> {
        for (place, _) in marking.iter() {
            self.get_place_index(place)?;
        }
        Ok(())
    }

    /**
     * Returns whether the marking is exactly the final marking.
     */
    pub fn is_end_marking(&self, marking: &Marking) -> bool {
        marking.len() == self.final_marking.len() && marking == &self.final_marking
    }

    /**
     * Fires a transition in the given marking without touching any shared state.
     * Returns None if the transition is not enabled in the marking.
     */
    pub fn fire(&self, marking: &Marking, transition: usize) -> NetResult<Option<Marking>> {
        let mut execution = NetExecution::new(self);
        execution.load_marking(marking)?;
        if execution.fire(transition) {
            Ok(Some(execution.get_marking()))
        } else {
            Ok(None)
        }
    }

    /**
     * The transitions that are enabled in the given marking, in declaration order.
     */
    pub fn get_enabled_transitions(&self, marking: &Marking) -> NetResult<Vec<usize>> {
        let mut execution = NetExecution::new(self);
        execution.load_marking(marking)?;
        Ok(execution.get_enabled_transitions())
    }
}

impl TryFrom<NetDescription> for PetriNet {
    type Error = NetError;

    fn try_from(description: NetDescription) -> NetResult<Self> {
        let mut result = PetriNet::new();
        let mut initial_marking = vec![];
        let mut final_marking = vec![];

        for record in description.nodes {
            if let Some(tokens) = record.tokens {
                initial_marking.push((record.id, tokens));
            }
            if let Some(tokens) = record.end_tokens {
                final_marking.push((record.id, tokens));
            }
            result.add_node(Node::new(record.node_type, record.id, record.label))?;
        }

        for arc in description.arcs {
            result.add_arc(arc.from, arc.to)?;
        }

        if initial_marking.is_empty() {
            return Err(NetError::MissingInitialMarking);
        }
        if final_marking.is_empty() {
            return Err(NetError::MissingFinalMarking);
        }

        result.set_initial_marking(initial_marking.into_iter().collect())?;
        result.set_final_marking(final_marking.into_iter().collect())?;

        log::debug!(
            "loaded net with {} places and {} transitions, initial marking {}, final marking {}",
            result.get_number_of_places(),
            result.get_number_of_transitions(),
            result.initial_marking,
            result.final_marking
        );

        Ok(result)
    }
}

impl Importable for PetriNet {
    fn import(reader: &mut dyn BufRead) -> Result<Self> {
        let description = NetDescription::import(reader).context("failed to read net")?;
        Ok(PetriNet::try_from(description).context("the net is not structurally valid")?)
    }
}

impl FromStr for PetriNet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut reader = std::io::Cursor::new(s);
        Self::import(&mut reader)
    }
}

impl Infoable for PetriNet {
    fn info(&self, f: &mut impl std::io::Write) -> Result<()> {
        writeln!(f, "Number of places\t\t{}", self.get_number_of_places())?;
        writeln!(f, "Number of transitions\t\t{}", self.get_number_of_transitions())?;
        writeln!(f, "Number of activities\t\t{}", self.activity_key.get_number_of_activities())?;
        writeln!(
            f,
            "Number of silent transitions\t{}",
            self.transitions
                .iter()
                .filter(|transition| self.is_transition_silent(**transition))
                .count()
        )?;
        writeln!(f, "Initial marking\t\t\t{}", self.initial_marking)?;
        writeln!(f, "Final marking\t\t\t{}", self.final_marking)?;

        Ok(write!(f, "")?)
    }
}

impl fmt::Display for PetriNet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", HEADER)?;

        for node in &self.nodes {
            writeln!(f, "\tnode")?;
            writeln!(f, "\t\ttype={}", node.node_type)?;
            writeln!(f, "\t\tid={}", node.id)?;
            if !node.label.is_empty() {
                writeln!(f, "\t\tlabel={}", node.label)?;
            }
            if node.is_place() {
                let tokens = self.initial_marking.get(node.id);
                if tokens > 0 {
                    writeln!(f, "\t\ttokens={}", tokens)?;
                }
                let tokens = self.final_marking.get(node.id);
                if tokens > 0 {
                    writeln!(f, "\t\tend_tokens={}", tokens)?;
                }
            }
        }

        for node in &self.nodes {
            for to in &node.outgoing {
                writeln!(f, "\tarc\n\t\tfrom={}\n\t\tto={}", node.id, self.nodes[*to].id)?;
            }
        }

        write!(f, "")
    }
}

/// Lists the labels of a set of transitions, silent ones as `tau`.
pub fn transitions_to_string(net: &PetriNet, transitions: &[usize]) -> String {
    transitions
        .iter()
        .map(|transition| match net.get_transition_activity(*transition) {
            Some(activity) => net.activity_key.get_activity_label(&activity).to_string(),
            None => "tau".to_string(),
        })
        .join(", ")
}
