use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::{
    pnc_framework::{
        activity_key::TranslateActivityKey,
        pnc_command::PncCommand,
        pnc_input::{PncInput, PncInputType},
        pnc_output::{PncOutput, PncOutputType},
    },
    pnc_objects::{
        alignment::{DEFAULT_COST_LOG_MOVE, DEFAULT_COST_MODEL_MOVE, MoveCosts},
        alignments::Alignments,
    },
    techniques::{align::AlignmentParameters, align_log::AlignLog, fitness::Fitness},
};

pub const ARG_ID_COST_LOG_MOVE: &str = "cost-log-move";
pub const ARG_ID_COST_MODEL_MOVE: &str = "cost-model-move";
pub const ARG_ID_VISITED_CACHE: &str = "visited-cache";

pub const PNC_CONFORMANCE: PncCommand = PncCommand::Group {
    name_short: "conf",
    name_long: Some("conformance"),
    explanation_short: "Check the conformance of an event log with a Petri net.",
    explanation_long: None,
    children: &[&CONFORMANCE_ALIGNMENTS, &CONFORMANCE_FITNESS],
};

pub const CONFORMANCE_ALIGNMENTS: PncCommand = PncCommand::Command {
    name_short: "ali",
    name_long: Some("alignments"),
    explanation_short: "Compute an alignment for each distinct trace of the log.",
    explanation_long: Some(
        "Compute an alignment for each distinct trace of the log. An alignment explains a trace by a run of the net from its initial marking to its final marking, using synchronous moves (free), log moves and model moves.",
    ),
    cli_command: Some(alignment_arguments),
    input_types: &[&[PncInputType::PetriNet], &[PncInputType::EventLog]],
    input_names: &["NET", "LOG"],
    input_helps: &["The Petri net to align with.", "The event log to align."],
    execute: |mut inputs, cli_matches| {
        let net = inputs.remove(0);
        let log = inputs.remove(0);
        let alignments = compute_alignments(net, log, cli_matches)?;
        Ok(PncOutput::Alignments(alignments))
    },
    output_type: &PncOutputType::Alignments,
};

pub const CONFORMANCE_FITNESS: PncCommand = PncCommand::Command {
    name_short: "fit",
    name_long: Some("fitness"),
    explanation_short: "Compute the alignment-based fitness of the log with respect to the net.",
    explanation_long: Some(
        "Compute the alignment-based fitness of the log with respect to the net: one minus the cost of the alignments of all traces, divided by the cost of explaining every move of these alignments by the most expensive move. The result is a number between 0 and 1; 1 means that every trace is a run of the net.",
    ),
    cli_command: Some(alignment_arguments),
    input_types: &[&[PncInputType::PetriNet], &[PncInputType::EventLog]],
    input_names: &["NET", "LOG"],
    input_helps: &["The Petri net to check.", "The event log to check."],
    execute: |mut inputs, cli_matches| {
        let net = inputs.remove(0);
        let log = inputs.remove(0);
        let alignments = compute_alignments(net, log, cli_matches)?;
        Ok(PncOutput::Fitness(alignments.fitness()))
    },
    output_type: &PncOutputType::Fitness,
};

fn alignment_arguments(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ID_COST_LOG_MOVE)
                .long(ARG_ID_COST_LOG_MOVE)
                .action(ArgAction::Set)
                .value_name("COST")
                .help(format!(
                    "The cost of a move on the log only (default {}).",
                    DEFAULT_COST_LOG_MOVE
                ))
                .required(false)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_ID_COST_MODEL_MOVE)
                .long(ARG_ID_COST_MODEL_MOVE)
                .action(ArgAction::Set)
                .value_name("COST")
                .help(format!(
                    "The cost of a move on the net only (default {}).",
                    DEFAULT_COST_MODEL_MOVE
                ))
                .required(false)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_ID_VISITED_CACHE)
                .long(ARG_ID_VISITED_CACHE)
                .action(ArgAction::SetTrue)
                .help("Do not revisit a marking with the same part of the trace explained, unless at a lower cost.")
                .long_help("Do not revisit a marking with the same part of the trace explained, unless at a lower cost. This makes the computation terminate on nets with cycles in which the final marking cannot be reached, but may return a different alignment of the same cost.")
                .required(false),
        )
}

pub fn get_alignment_parameters(cli_matches: &ArgMatches) -> AlignmentParameters {
    AlignmentParameters {
        costs: MoveCosts {
            log_move: cli_matches
                .get_one::<u64>(ARG_ID_COST_LOG_MOVE)
                .copied()
                .unwrap_or(DEFAULT_COST_LOG_MOVE),
            model_move: cli_matches
                .get_one::<u64>(ARG_ID_COST_MODEL_MOVE)
                .copied()
                .unwrap_or(DEFAULT_COST_MODEL_MOVE),
        },
        visited_cache: cli_matches.get_flag(ARG_ID_VISITED_CACHE),
    }
}

/**
 * Aligns all distinct traces of the log, showing the progress.
 */
pub fn compute_alignments(
    net: PncInput,
    log: PncInput,
    cli_matches: &ArgMatches,
) -> Result<Alignments> {
    let mut net = net.to_petri_net()?;
    let mut log = log.to_event_log()?;
    let parameters = get_alignment_parameters(cli_matches);
    log::info!("alignment parameters {:?}", parameters);

    log.translate_using_activity_key(net.get_activity_key_mut());

    log::info!(
        "aligning {} distinct traces",
        log.get_number_of_distinct_traces()
    );
    let progress_bar = PncCommand::get_progress_bar(log.get_number_of_distinct_traces())?;

    let mut result = Alignments::new(net.get_activity_key().clone());
    for alignment in net.align_log(&log, &parameters) {
        result.push(alignment.context("computing alignments")?);
        progress_bar.inc(1);
    }
    progress_bar.finish_and_clear();

    Ok(result)
}
