use rustc_hash::FxHashMap;
use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{
    error::NetResult,
    marking::Marking,
    pnc_framework::activity_key::Activity,
    pnc_objects::{
        alignment::{Alignment, Move, MoveCosts},
        petri_net::{PetriNet, transitions_to_string},
    },
    semantics::net_execution::NetExecution,
    techniques::search_state::SearchState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentParameters {
    pub costs: MoveCosts,

    /**
     * Discard a state if a state with the same marking and the same number of explained trace
     * symbols was already queued with an equal or better evaluation. This makes the search
     * terminate on bounded nets with cycles, but may return a different alignment among those with
     * the same cost.
     */
    pub visited_cache: bool,
}

pub trait Align {
    /**
     * Searches for an alignment of the trace with a run of the net from its initial to its final
     * marking. The trace must use the activity key of the net.
     *
     * Returns None if the search runs out of states without reaching the final marking.
     */
    fn compute_optimal_alignment(
        &self,
        trace: &[Activity],
        parameters: &AlignmentParameters,
    ) -> NetResult<Option<Alignment>>;
}

impl Align for PetriNet {
    fn compute_optimal_alignment(
        &self,
        trace: &[Activity],
        parameters: &AlignmentParameters,
    ) -> NetResult<Option<Alignment>> {
        let mut execution = NetExecution::new(self);
        let mut frontier = Frontier::new(trace, parameters);
        frontier.push_initial(self.get_initial_marking().clone());

        while let Some(state) = frontier.pop() {
            let matched = state.get_matched();

            if self.is_end_marking(state.get_marking()) {
                let mut alignment = state.into_alignment();
                for activity in &trace[matched..] {
                    alignment.push(Move::LogMove(*activity));
                }
                log::debug!(
                    "alignment found with cost {} after expanding {} and queueing {} states",
                    alignment.cost(),
                    frontier.expanded,
                    frontier.queued
                );
                return Ok(Some(alignment));
            }

            //skip ahead: explain the next trace symbol by a log move
            if matched < trace.len() {
                frontier.push_successor(
                    &state,
                    Some(Move::LogMove(trace[matched])),
                    state.get_marking().clone(),
                );
            }

            execution.load_marking(state.get_marking())?;
            let enabled = execution.get_enabled_transitions();
            log::trace!(
                "expand state {} with evaluation {} in marking {}, enabled [{}]",
                state.get_sequence(),
                state.get_evaluation(),
                state.get_marking(),
                transitions_to_string(self, &enabled)
            );

            for transition in enabled {
                execution.load_marking(state.get_marking())?;
                if !execution.fire(transition) {
                    continue;
                }

                let movee = self.get_transition_activity(transition).map(|activity| {
                    if matched < trace.len() && trace[matched] == activity {
                        Move::SynchronousMove(activity)
                    } else {
                        Move::ModelMove(activity)
                    }
                });
                frontier.push_successor(&state, movee, execution.get_marking());
            }

            frontier.expanded += 1;
        }

        log::debug!(
            "no alignment found after expanding {} and queueing {} states",
            frontier.expanded,
            frontier.queued
        );
        Ok(None)
    }
}

/// The queue of states that still have to be expanded, smallest first.
struct Frontier<'t> {
    trace: &'t [Activity],
    costs: MoveCosts,
    queue: BinaryHeap<Reverse<SearchState>>,
    next_sequence: u64,
    visited: Option<FxHashMap<(Marking, usize), u64>>,
    expanded: usize,
    queued: usize,
}

impl<'t> Frontier<'t> {
    fn new(trace: &'t [Activity], parameters: &AlignmentParameters) -> Self {
        Self {
            trace,
            costs: parameters.costs,
            queue: BinaryHeap::new(),
            next_sequence: 0,
            visited: if parameters.visited_cache {
                Some(FxHashMap::default())
            } else {
                None
            },
            expanded: 0,
            queued: 0,
        }
    }

    fn push_initial(&mut self, marking: Marking) {
        let sequence = self.take_sequence();
        let state = SearchState::initial(marking, self.trace, self.costs, sequence);
        self.push(state);
    }

    fn push_successor(&mut self, parent: &SearchState, movee: Option<Move>, marking: Marking) {
        let sequence = self.take_sequence();
        let state = parent.successor(movee, marking, self.trace, sequence);
        self.push(state);
    }

    fn push(&mut self, state: SearchState) {
        if let Some(visited) = &mut self.visited {
            let key = (state.get_marking().clone(), state.get_matched());
            match visited.get(&key) {
                Some(best) if *best <= state.get_evaluation() => return,
                _ => {
                    visited.insert(key, state.get_evaluation());
                }
            }
        }

        self.queued += 1;
        self.queue.push(Reverse(state));
    }

    fn pop(&mut self) -> Option<SearchState> {
        self.queue.pop().map(|Reverse(state)| state)
    }

    fn take_sequence(&mut self) -> u64 {
        let result = self.next_sequence;
        self.next_sequence += 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{
        pnc_framework::activity_key::{Activity, ActivityKey},
        pnc_objects::{
            alignment::{Move, MoveCosts},
            petri_net::PetriNet,
        },
        semantics::net_execution::NetExecution,
        techniques::align::{Align, AlignmentParameters, Frontier},
    };

    fn read_net(file: &str) -> PetriNet {
        let fin = fs::read_to_string(file).unwrap();
        fin.parse::<PetriNet>().unwrap()
    }

    fn process(net: &mut PetriNet, trace: &[&str]) -> Vec<Activity> {
        net.get_activity_key_mut().process_trace(trace)
    }

    fn labels(key: &ActivityKey, moves: &[Move]) -> Vec<String> {
        moves
            .iter()
            .map(|movee| match movee {
                Move::LogMove(activity) => format!("log {}", key.get_activity_label(activity)),
                Move::ModelMove(activity) => format!("model {}", key.get_activity_label(activity)),
                Move::SynchronousMove(activity) => {
                    format!("sync {}", key.get_activity_label(activity))
                }
            })
            .collect()
    }

    #[test]
    fn exact_match() {
        let mut net = read_net("testfiles/a.pnet");
        let trace = process(&mut net, &["a"]);

        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(labels(net.get_activity_key(), alignment.get_moves()), vec!["sync a"]);
        assert_eq!(alignment.cost(), 0);
    }

    #[test]
    fn extra_symbol_is_log_move() {
        let mut net = read_net("testfiles/a.pnet");
        let trace = process(&mut net, &["a", "b"]);

        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            labels(net.get_activity_key(), alignment.get_moves()),
            vec!["sync a", "log b"]
        );
        assert_eq!(alignment.cost(), 1);
    }

    #[test]
    fn missing_symbol_is_model_move() {
        let mut net = read_net("testfiles/a.pnet");
        let trace = process(&mut net, &[]);

        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(labels(net.get_activity_key(), alignment.get_moves()), vec!["model a"]);
    }

    #[test]
    #[ntest::timeout(10000)]
    fn unreachable_final_marking() {
        let mut net = read_net("testfiles/unreachable.pnet");
        let trace = process(&mut net, &["a", "b"]);

        let result = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn silent_transition_adds_no_slot() {
        let mut net = read_net("testfiles/silent.pnet");
        let trace = process(&mut net, &["a"]);

        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(alignment.cost(), 0);
        assert_eq!(labels(net.get_activity_key(), alignment.get_moves()), vec!["sync a"]);

        //b is only reachable through the silent transition
        let trace = process(&mut net, &["b"]);
        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(alignment.cost(), 0);
        assert_eq!(labels(net.get_activity_key(), alignment.get_moves()), vec!["sync b"]);
    }

    #[test]
    #[ntest::timeout(10000)]
    fn loop_net() {
        let mut net = read_net("testfiles/loop.pnet");
        let trace = process(&mut net, &["a", "b", "b", "c"]);

        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(alignment.cost(), 0);
        assert_eq!(
            labels(net.get_activity_key(), alignment.get_moves()),
            vec!["sync a", "sync b", "sync b", "sync c"]
        );

        let trace = process(&mut net, &["a", "c", "x"]);
        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(alignment.cost(), 1);
        assert_eq!(alignment.get_number_of_log_moves(), 1);
    }

    #[test]
    fn costs_are_applied() {
        let mut net = read_net("testfiles/a.pnet");
        let trace = process(&mut net, &["b"]);
        let parameters = AlignmentParameters {
            costs: MoveCosts {
                log_move: 3,
                model_move: 4,
            },
            visited_cache: false,
        };

        let alignment = net
            .compute_optimal_alignment(&trace, &parameters)
            .unwrap()
            .unwrap();
        assert_eq!(alignment.get_number_of_log_moves(), 1);
        assert_eq!(alignment.get_number_of_model_moves(), 1);
        assert_eq!(alignment.cost(), 7);
    }

    /**
     * The number of unexplained trace symbols does not account for the model moves that are still
     * needed, so the first alignment to reach the final marking is not necessarily the cheapest one.
     * Which one is found depends on the order in which the transitions are declared.
     */
    #[test]
    fn heuristic_may_overestimate() {
        let mut net = read_net("testfiles/detour-first.pnet");
        let trace = process(&mut net, &["a"]);
        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            labels(net.get_activity_key(), alignment.get_moves()),
            vec!["model y", "log a"]
        );
        assert_eq!(alignment.cost(), 2);

        let mut net = read_net("testfiles/detour-last.pnet");
        let trace = process(&mut net, &["a"]);
        let alignment = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            labels(net.get_activity_key(), alignment.get_moves()),
            vec!["model x", "sync a"]
        );
        assert_eq!(alignment.cost(), 1);
    }

    #[test]
    #[ntest::timeout(10000)]
    fn visited_cache_terminates_on_cycles() {
        let mut net = read_net("testfiles/cycle-unreachable.pnet");
        let trace = process(&mut net, &["a", "b"]);
        let parameters = AlignmentParameters {
            costs: MoveCosts::default(),
            visited_cache: true,
        };

        assert!(net.compute_optimal_alignment(&trace, &parameters).unwrap().is_none());
    }

    #[test]
    fn visited_cache_finds_same_cost() {
        let mut net = read_net("testfiles/loop.pnet");
        let trace = process(&mut net, &["a", "b", "x", "c"]);
        let with_cache = AlignmentParameters {
            costs: MoveCosts::default(),
            visited_cache: true,
        };

        let plain = net
            .compute_optimal_alignment(&trace, &AlignmentParameters::default())
            .unwrap()
            .unwrap();
        let cached = net
            .compute_optimal_alignment(&trace, &with_cache)
            .unwrap()
            .unwrap();
        assert_eq!(plain.cost(), cached.cost());
    }

    #[test]
    fn revisited_marking_is_queued_again_without_visited_cache() {
        let mut net = read_net("testfiles/loop.pnet");
        let trace = process(&mut net, &["a", "c"]);
        let b = net.get_activity_key_mut().process_activity("b");
        let (transition_a, transition_b) = (net.get_transitions()[0], net.get_transitions()[1]);

        for (visited_cache, expected_queued) in [(false, 4), (true, 2)] {
            let parameters = AlignmentParameters {
                costs: MoveCosts::default(),
                visited_cache,
            };
            let mut execution = NetExecution::new(&net);
            let mut frontier = Frontier::new(&trace, &parameters);

            frontier.push_initial(net.get_initial_marking().clone());
            let initial = frontier.pop().unwrap();

            execution.load_marking(initial.get_marking()).unwrap();
            assert!(execution.fire(transition_a));
            frontier.push_successor(
                &initial,
                Some(Move::SynchronousMove(trace[0])),
                execution.get_marking(),
            );
            let in_loop = frontier.pop().unwrap();

            //going around the loop twice leads back to the same marking both times
            for _ in 0..2 {
                execution.load_marking(in_loop.get_marking()).unwrap();
                assert!(execution.fire(transition_b));
                assert_eq!(&execution.get_marking(), in_loop.get_marking());
                frontier.push_successor(
                    &in_loop,
                    Some(Move::ModelMove(b)),
                    execution.get_marking(),
                );
            }

            assert_eq!(frontier.queued, expected_queued, "visited cache {}", visited_cache);
        }
    }
}
