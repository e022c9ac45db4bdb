use crate::{error::NetResult, marking::Marking, pnc_objects::petri_net::PetriNet};

/// Live token game on top of a read-only [`PetriNet`].
///
/// Each transition keeps a counter of its incoming places that hold at least one token. The counters
/// are only ever updated when a place goes from zero to a positive number of tokens or back, so
/// enablement is a constant-time check.
#[derive(Clone, Debug)]
pub struct NetExecution<'a> {
    net: &'a PetriNet,
    tokens: Vec<u64>, //for each node: the tokens of a place
    active_incoming_places: Vec<usize>, //for each node: the marked incoming places of a transition
}

impl<'a> NetExecution<'a> {
    /**
     * Creates an execution in which no place carries tokens.
     */
    pub fn new(net: &'a PetriNet) -> Self {
        Self {
            net,
            tokens: vec![0; net.get_nodes().len()],
            active_incoming_places: vec![0; net.get_nodes().len()],
        }
    }

    pub fn get_net(&self) -> &'a PetriNet {
        self.net
    }

    /**
     * Empties all places and then puts the tokens of the marking in. A marking that names anything
     * else than a place of the net is refused before any place is touched.
     */
    pub fn load_marking(&mut self, marking: &Marking) -> NetResult<()> {
        self.net.check_marking(marking)?;

        for place in 0..self.tokens.len() {
            if self.tokens[place] > 0 {
                self.set_tokens(place, 0);
            }
        }

        for (place_id, tokens) in marking.iter() {
            let place = self.net.get_place_index(place_id)?;
            self.set_tokens(place, tokens);
        }
        Ok(())
    }

    pub fn get_marking(&self) -> Marking {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, tokens)| **tokens > 0)
            .map(|(place, tokens)| (self.net.get_node(place).get_id(), *tokens))
            .collect()
    }

    pub fn get_tokens(&self, place: usize) -> u64 {
        self.tokens[place]
    }

    /**
     * The number of incoming places of the transition that currently hold a token.
     */
    pub fn get_active_incoming_places(&self, transition: usize) -> usize {
        self.active_incoming_places[transition]
    }

    /**
     * A transition is enabled if all its incoming places carry a token. Transitions without incoming
     * or without outgoing arcs are never enabled.
     */
    pub fn is_enabled(&self, transition: usize) -> bool {
        let node = self.net.get_node(transition);
        node.is_transition()
            && !node.get_incoming().is_empty()
            && !node.get_outgoing().is_empty()
            && self.active_incoming_places[transition] == node.get_incoming().len()
    }

    pub fn get_enabled_transitions(&self) -> Vec<usize> {
        self.net
            .get_transitions()
            .iter()
            .copied()
            .filter(|transition| self.is_enabled(*transition))
            .collect()
    }

    /**
     * Moves a token from every incoming place to every outgoing place. Returns false and leaves the
     * marking untouched if the transition is not enabled.
     */
    pub fn fire(&mut self, transition: usize) -> bool {
        if !self.is_enabled(transition) {
            return false;
        }

        let net = self.net;
        let node = net.get_node(transition);
        for place in node.get_incoming() {
            self.set_tokens(*place, self.tokens[*place] - 1);
        }
        for place in node.get_outgoing() {
            self.set_tokens(*place, self.tokens[*place] + 1);
        }
        true
    }

    fn set_tokens(&mut self, place: usize, value: u64) {
        let net = self.net;
        let old = self.tokens[place];

        if old == 0 && value > 0 {
            for transition in net.get_node(place).get_outgoing() {
                self.active_incoming_places[*transition] += 1;
                debug_assert!(
                    self.active_incoming_places[*transition]
                        <= net.get_node(*transition).get_incoming().len()
                );
            }
        } else if old > 0 && value == 0 {
            for transition in net.get_node(place).get_outgoing() {
                debug_assert!(self.active_incoming_places[*transition] > 0);
                self.active_incoming_places[*transition] -= 1;
            }
        }

        self.tokens[place] = value;
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{
        marking::Marking,
        pnc_objects::{node::Node, petri_net::PetriNet},
        semantics::net_execution::NetExecution,
    };

    /**
     * p1 -> t_a -> p2, p1 -> t_b -> p2 + p3, p2 + p3 -> t_c -> p1, and an isolated transition t_d
     */
    fn choice_net() -> PetriNet {
        let mut net = PetriNet::new();
        net.add_node(Node::place(1, "p1")).unwrap();
        net.add_node(Node::place(2, "p2")).unwrap();
        net.add_node(Node::place(3, "p3")).unwrap();
        net.add_node(Node::transition(10, "a")).unwrap();
        net.add_node(Node::transition(11, "b")).unwrap();
        net.add_node(Node::transition(12, "c")).unwrap();
        net.add_node(Node::transition(13, "d")).unwrap();
        net.add_arc(1, 10).unwrap();
        net.add_arc(10, 2).unwrap();
        net.add_arc(1, 11).unwrap();
        net.add_arc(11, 2).unwrap();
        net.add_arc(11, 3).unwrap();
        net.add_arc(2, 12).unwrap();
        net.add_arc(3, 12).unwrap();
        net.add_arc(12, 1).unwrap();
        net.set_initial_marking([(1, 1)].into_iter().collect()).unwrap();
        net.set_final_marking([(2, 1)].into_iter().collect()).unwrap();
        net
    }

    fn assert_counters_consistent(execution: &NetExecution) {
        let net = execution.get_net();
        for transition in net.get_transitions() {
            let marked = net
                .get_node(*transition)
                .get_incoming()
                .iter()
                .filter(|place| execution.get_tokens(**place) > 0)
                .count();
            assert_eq!(execution.get_active_incoming_places(*transition), marked);
        }
    }

    #[test]
    fn enabled_after_load() {
        let net = choice_net();
        let mut execution = NetExecution::new(&net);
        assert!(execution.get_enabled_transitions().is_empty());

        execution.load_marking(net.get_initial_marking()).unwrap();
        assert_eq!(execution.get_enabled_transitions(), vec![3, 4]);
        assert_counters_consistent(&execution);

        //the isolated transition can never fire
        assert!(!execution.is_enabled(6));
        assert!(!execution.fire(6));

        //places cannot fire
        assert!(!execution.fire(0));
    }

    #[test]
    fn load_resets_previous_marking() {
        let net = choice_net();
        let mut execution = NetExecution::new(&net);
        execution.load_marking(&[(1, 2), (3, 1)].into_iter().collect()).unwrap();
        execution.load_marking(&[(2, 1)].into_iter().collect()).unwrap();

        assert_eq!(execution.get_marking(), [(2, 1)].into_iter().collect());
        assert!(execution.get_enabled_transitions().is_empty());
        assert_counters_consistent(&execution);
    }

    #[test]
    fn refused_marking_keeps_previous_marking() {
        let net = choice_net();
        let mut execution = NetExecution::new(&net);
        execution.load_marking(&[(2, 1), (3, 1)].into_iter().collect()).unwrap();
        assert_eq!(execution.get_enabled_transitions(), vec![5]);

        //a place followed by a transition, and a place followed by an unknown node
        assert!(execution.load_marking(&[(1, 1), (10, 1)].into_iter().collect()).is_err());
        assert!(execution.load_marking(&[(1, 1), (99, 1)].into_iter().collect()).is_err());

        assert_eq!(execution.get_marking(), [(2, 1), (3, 1)].into_iter().collect());
        assert_eq!(execution.get_enabled_transitions(), vec![5]);
        assert_counters_consistent(&execution);
    }

    #[test]
    fn firing_conserves_tokens() {
        let net = choice_net();
        let mut execution = NetExecution::new(&net);
        execution.load_marking(net.get_initial_marking()).unwrap();

        for transition in [4, 5, 4] {
            let before = execution.get_marking();
            let node = net.get_node(transition);
            assert!(execution.fire(transition), "transition {} should fire", transition);
            let after = execution.get_marking();

            let sum = |marking: &Marking, places: &[usize]| -> u64 {
                places
                    .iter()
                    .map(|place| marking.get(net.get_node(*place).get_id()))
                    .sum()
            };
            assert_eq!(
                sum(&before, node.get_incoming()) - node.get_incoming().len() as u64,
                sum(&after, node.get_incoming())
            );
            assert_eq!(
                sum(&before, node.get_outgoing()) + node.get_outgoing().len() as u64,
                sum(&after, node.get_outgoing())
            );
            assert_counters_consistent(&execution);
        }

        assert_eq!(execution.get_marking(), [(2, 1), (3, 1)].into_iter().collect());
        assert!(!execution.fire(3));
        assert_counters_consistent(&execution);
    }

    #[test]
    fn multiple_tokens() {
        let net = choice_net();
        let mut execution = NetExecution::new(&net);
        execution.load_marking(&[(1, 2)].into_iter().collect()).unwrap();

        assert!(execution.fire(3));
        assert!(execution.is_enabled(3));
        assert!(execution.fire(3));
        assert!(!execution.is_enabled(3));
        assert_eq!(execution.get_marking(), [(2, 2)].into_iter().collect());
        assert_counters_consistent(&execution);
    }

    #[test]
    fn silent_transition_is_enabled() {
        let fin = fs::read_to_string("testfiles/silent.pnet").unwrap();
        let net = fin.parse::<PetriNet>().unwrap();
        let mut execution = NetExecution::new(&net);
        execution.load_marking(net.get_initial_marking()).unwrap();

        let enabled = execution.get_enabled_transitions();
        assert!(enabled.iter().any(|transition| net.is_transition_silent(*transition)));
        assert!(enabled.iter().any(|transition| !net.is_transition_silent(*transition)));
    }
}
