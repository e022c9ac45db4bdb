use anyhow::{Result, anyhow};
use itertools::Itertools;
use std::fmt::Display;

use crate::pnc_framework::activity_key::{Activity, ActivityKey};

pub const DEFAULT_COST_LOG_MOVE: u64 = 1;
pub const DEFAULT_COST_MODEL_MOVE: u64 = 1;

/// One slot of an alignment. Silent transitions do not produce a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    LogMove(Activity),
    ModelMove(Activity),
    SynchronousMove(Activity),
}

impl Move {
    /**
     * The trace symbol this move explains, if any.
     */
    pub fn get_log_slot(&self) -> Option<Activity> {
        match self {
            Move::LogMove(activity) | Move::SynchronousMove(activity) => Some(*activity),
            Move::ModelMove(_) => None,
        }
    }

    /**
     * The transition label this move executes, if any.
     */
    pub fn get_net_slot(&self) -> Option<Activity> {
        match self {
            Move::ModelMove(activity) | Move::SynchronousMove(activity) => Some(*activity),
            Move::LogMove(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCosts {
    pub log_move: u64,
    pub model_move: u64,
}

impl Default for MoveCosts {
    fn default() -> Self {
        Self {
            log_move: DEFAULT_COST_LOG_MOVE,
            model_move: DEFAULT_COST_MODEL_MOVE,
        }
    }
}

/// A sequence of moves that reconciles a trace with a run of a net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    moves: Vec<Move>,
    costs: MoveCosts,
    amount: usize, //number of traces in the log this alignment stands for
    number_of_log_moves: usize,
    number_of_model_moves: usize,
}

impl Alignment {
    pub fn new(costs: MoveCosts) -> Self {
        Self {
            moves: vec![],
            costs,
            amount: 1,
            number_of_log_moves: 0,
            number_of_model_moves: 0,
        }
    }

    /**
     * Builds an alignment from its two rows. Both rows must have the same length, no position may be empty in both rows, and a position that is filled in both rows must carry the same activity.
     */
    pub fn from_slots(
        log: &[Option<Activity>],
        net: &[Option<Activity>],
        costs: MoveCosts,
    ) -> Result<Self> {
        if log.len() != net.len() {
            return Err(anyhow!(
                "the log row has {} slots, while the net row has {}",
                log.len(),
                net.len()
            ));
        }

        let mut result = Self::new(costs);
        for (position, (log_slot, net_slot)) in log.iter().zip(net.iter()).enumerate() {
            let movee = match (log_slot, net_slot) {
                (Some(log_activity), Some(net_activity)) if log_activity == net_activity => {
                    Move::SynchronousMove(*log_activity)
                }
                (Some(_), Some(_)) => {
                    return Err(anyhow!(
                        "position {} combines two different activities",
                        position
                    ));
                }
                (Some(log_activity), None) => Move::LogMove(*log_activity),
                (None, Some(net_activity)) => Move::ModelMove(*net_activity),
                (None, None) => return Err(anyhow!("position {} is empty", position)),
            };
            result.push(movee);
        }
        Ok(result)
    }

    /**
     * Appends a move. The caller decides whether a move is synchronous.
     */
    pub fn push(&mut self, movee: Move) {
        match movee {
            Move::LogMove(_) => self.number_of_log_moves += 1,
            Move::ModelMove(_) => self.number_of_model_moves += 1,
            Move::SynchronousMove(_) => {}
        }
        self.moves.push(movee);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get_moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn get_log_slots(&self) -> impl Iterator<Item = Option<Activity>> + '_ {
        self.moves.iter().map(Move::get_log_slot)
    }

    pub fn get_net_slots(&self) -> impl Iterator<Item = Option<Activity>> + '_ {
        self.moves.iter().map(Move::get_net_slot)
    }

    pub fn get_number_of_log_moves(&self) -> usize {
        self.number_of_log_moves
    }

    pub fn get_number_of_model_moves(&self) -> usize {
        self.number_of_model_moves
    }

    pub fn get_number_of_synchronous_moves(&self) -> usize {
        self.moves.len() - self.number_of_log_moves - self.number_of_model_moves
    }

    pub fn get_costs(&self) -> MoveCosts {
        self.costs
    }

    pub fn get_amount(&self) -> usize {
        self.amount
    }

    pub fn set_amount(&mut self, amount: usize) {
        self.amount = amount;
    }

    /**
     * The cost of the moves so far: synchronous moves are free.
     */
    pub fn cost(&self) -> u64 {
        self.number_of_log_moves as u64 * self.costs.log_move
            + self.number_of_model_moves as u64 * self.costs.model_move
    }

    pub fn display<'a>(&'a self, activity_key: &'a ActivityKey) -> AlignmentDisplay<'a> {
        AlignmentDisplay {
            alignment: self,
            activity_key,
        }
    }
}

/// Renders an alignment as two quoted rows, empty slots as `''`.
pub struct AlignmentDisplay<'a> {
    alignment: &'a Alignment,
    activity_key: &'a ActivityKey,
}

impl AlignmentDisplay<'_> {
    fn row(&self, slots: impl Iterator<Item = Option<Activity>>) -> String {
        slots
            .map(|slot| match slot {
                Some(activity) => format!("'{}'", self.activity_key.get_activity_label(&activity)),
                None => "''".to_string(),
            })
            .join("\t")
    }
}

impl Display for AlignmentDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alignment = self.alignment;
        writeln!(
            f,
            "Amount = {}, CostMoveLog = {}, CostMoveNet = {}, Distance = {}",
            alignment.amount,
            alignment.costs.log_move,
            alignment.costs.model_move,
            alignment.cost()
        )?;
        writeln!(f, "log:\t{}", self.row(alignment.get_log_slots()))?;
        write!(f, "net:\t{}", self.row(alignment.get_net_slots()))
    }
}
