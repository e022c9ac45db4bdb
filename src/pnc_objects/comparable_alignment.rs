use crate::{pnc_framework::activity_key::Activity, pnc_objects::alignment::Alignment};

/// Estimates how far a partial alignment is from explaining a full trace.
pub trait ComparableAlignment {
    /**
     * The number of trace symbols, from the start of the trace, that the log row explains.
     */
    fn matched_prefix_length(&self, trace: &[Activity]) -> usize;

    /**
     * The number of trace symbols that are not explained yet. Model moves that may still be
     * necessary are not taken into account, so this may overestimate the remaining cost.
     */
    fn heuristic(&self, trace: &[Activity]) -> u64 {
        unexplained(trace, self.matched_prefix_length(trace))
    }

    fn evaluation(&self, trace: &[Activity]) -> u64 {
        self.evaluation_with_matched(trace, self.matched_prefix_length(trace))
    }

    /**
     * The evaluation, for when the matched prefix length is already known.
     */
    fn evaluation_with_matched(&self, trace: &[Activity], matched: usize) -> u64;
}

fn unexplained(trace: &[Activity], matched: usize) -> u64 {
    (trace.len() - matched) as u64
}

impl ComparableAlignment for Alignment {
    fn matched_prefix_length(&self, trace: &[Activity]) -> usize {
        let mut result = 0;
        for log_slot in self.get_log_slots().flatten() {
            if result >= trace.len() {
                break;
            }
            if log_slot == trace[result] {
                result += 1;
            }
        }
        result
    }

    fn evaluation_with_matched(&self, trace: &[Activity], matched: usize) -> u64 {
        self.cost() + unexplained(trace, matched)
    }
}
