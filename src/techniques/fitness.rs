use crate::pnc_objects::{alignment::Alignment, alignments::Alignments};

pub trait Fitness {
    /**
     * One minus the weighted cost of the alignments, relative to the cost of explaining every event
     * by the most expensive move. Each alignment weighs as often as its trace occurs in the log.
     * If there is nothing to explain, the fitness is 1.
     */
    fn fitness(&self) -> f64;
}

impl Fitness for [Alignment] {
    fn fitness(&self) -> f64 {
        let mut cost = 0u64;
        let mut worst_cost = 0u64;
        for alignment in self {
            let amount = alignment.get_amount() as u64;
            let costs = alignment.get_costs();

            cost += amount * alignment.cost();
            worst_cost +=
                amount * alignment.len() as u64 * costs.log_move.max(costs.model_move);
        }

        if worst_cost == 0 {
            return 1.0;
        }
        1.0 - cost as f64 / worst_cost as f64
    }
}

impl Fitness for Alignments {
    fn fitness(&self) -> f64 {
        self.get_alignments().fitness()
    }
}
