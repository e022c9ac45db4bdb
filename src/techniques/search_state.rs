use std::cmp::Ordering;

use crate::{
    marking::Marking,
    pnc_framework::activity_key::Activity,
    pnc_objects::{
        alignment::{Alignment, Move, MoveCosts},
        comparable_alignment::ComparableAlignment,
    },
};

/// A node of the alignment search: a partial alignment together with the marking it leads to.
///
/// States are ordered ascending by evaluation, then by the number of marked places, then by the
/// length of the alignment, and finally by the order in which they were created.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub(crate) alignment: Alignment,
    pub(crate) marking: Marking,
    pub(crate) matched: usize, //number of trace symbols explained by the alignment
    pub(crate) evaluation: u64,
    pub(crate) sequence: u64,
}

impl SearchState {
    pub fn initial(marking: Marking, trace: &[Activity], costs: MoveCosts, sequence: u64) -> Self {
        let alignment = Alignment::new(costs);
        Self {
            evaluation: alignment.evaluation(trace),
            alignment,
            marking,
            matched: 0,
            sequence,
        }
    }

    /**
     * Creates the state reached by appending a move (if any; silent transitions add none) and moving to a new marking.
     * A move that explains the next trace symbol advances the matched prefix.
     */
    pub fn successor(
        &self,
        movee: Option<Move>,
        marking: Marking,
        trace: &[Activity],
        sequence: u64,
    ) -> Self {
        let mut alignment = self.alignment.clone();
        let mut matched = self.matched;
        if let Some(movee) = movee {
            if matched < trace.len() && movee.get_log_slot() == Some(trace[matched]) {
                matched += 1;
            }
            alignment.push(movee);
        }
        debug_assert_eq!(matched, alignment.matched_prefix_length(trace));

        Self {
            evaluation: alignment.evaluation_with_matched(trace, matched),
            alignment,
            marking,
            matched,
            sequence,
        }
    }

    pub fn get_alignment(&self) -> &Alignment {
        &self.alignment
    }

    pub fn get_marking(&self) -> &Marking {
        &self.marking
    }

    pub fn get_matched(&self) -> usize {
        self.matched
    }

    pub fn get_evaluation(&self) -> u64 {
        self.evaluation
    }

    pub fn get_sequence(&self) -> u64 {
        self.sequence
    }

    pub fn into_alignment(self) -> Alignment {
        self.alignment
    }
}

impl PartialEq for SearchState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchState {}

impl PartialOrd for SearchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchState {
    fn cmp(&self, other: &Self) -> Ordering {
        self.evaluation
            .cmp(&other.evaluation)
            .then_with(|| self.marking.len().cmp(&other.marking.len()))
            .then_with(|| self.alignment.len().cmp(&other.alignment.len()))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}
