use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fmt::{Debug, Display},
    io::Write,
    path::PathBuf,
};

use crate::{
    pnc_commands::{pnc_command_conformance, pnc_command_info},
    pnc_framework::{
        exportable::Exportable,
        pnc_input::{self, PncInput, PncInputType},
        pnc_output::{PncOutput, PncOutputType},
    },
};

pub const PNC_COMMANDS: PncCommand = PncCommand::Group {
    name_short: "pnc",
    name_long: None,
    explanation_short: "pnc: alignment-based conformance checking of event logs against Petri nets.",
    explanation_long: None,
    children: &[
        &pnc_command_conformance::PNC_CONFORMANCE,
        &pnc_command_info::PNC_INFO,
    ],
};

pub const ARG_SHORT_OUTPUT: char = 'o';
pub const ARG_ID_OUTPUT: &str = "output";

pub enum PncCommand {
    Group {
        name_short: &'static str,
        name_long: Option<&'static str>,
        explanation_short: &'static str,
        explanation_long: Option<&'static str>,
        children: &'static [&'static PncCommand],
    },
    Command {
        name_short: &'static str,
        name_long: Option<&'static str>,
        explanation_short: &'static str,
        explanation_long: Option<&'static str>,
        cli_command: Option<fn(command: Command) -> Command>, //adds command-specific arguments. An output -o argument is always added

        input_types: &'static [&'static [PncInputType]], //for each fixed-position input parameter, the types that are accepted, in the order in which they are tried
        input_names: &'static [&'static str],
        input_helps: &'static [&'static str],

        execute: fn(inputs: Vec<PncInput>, cli_matches: &ArgMatches) -> Result<PncOutput>,
        output_type: &'static PncOutputType,
    },
}

impl PncCommand {
    pub fn build_cli(&self) -> Command {
        let mut command;
        match self {
            PncCommand::Group {
                name_short,
                name_long,
                explanation_short,
                explanation_long,
                children,
            } => {
                command = Command::new(name_long.unwrap_or(*name_short))
                    .about(explanation_short)
                    .subcommand_required(true)
                    .allow_external_subcommands(false);

                if name_long.is_some() {
                    command = command.alias(name_short);
                }

                if let Some(l) = explanation_long {
                    command = command.long_about(l);
                }

                for child in children.iter() {
                    command = command.subcommand(child.build_cli());
                }
            }
            PncCommand::Command {
                name_short,
                name_long,
                explanation_short,
                explanation_long,
                cli_command,
                input_types,
                input_names,
                input_helps,
                ..
            } => {
                command = Command::new(name_long.unwrap_or(*name_short)).about(explanation_short);

                if name_long.is_some() {
                    command = command.alias(name_short);
                }

                if let Some(l) = explanation_long {
                    command = command.long_about(l);
                }

                for (i, (input_name, (input_type, input_help))) in input_names
                    .iter()
                    .zip(input_types.iter().zip(input_helps.iter()))
                    .enumerate()
                {
                    let arg = Arg::new(Self::input_id(input_name, i))
                        .action(ArgAction::Set)
                        .value_name(input_name)
                        .help(input_help)
                        .long_help(format!(
                            "{} Expects {}; `-` reads from STDIN.",
                            input_help,
                            PncInputType::possible_inputs_with_articles(input_type)
                        ))
                        .required(true)
                        .value_parser(value_parser!(PathBuf));

                    command = command.arg(arg);
                }

                if let Some(f) = cli_command {
                    command = (f)(command);
                }

                command = command.arg(
                    Arg::new(ARG_ID_OUTPUT)
                        .short(ARG_SHORT_OUTPUT)
                        .long(ARG_ID_OUTPUT)
                        .action(ArgAction::Set)
                        .value_name("FILE")
                        .help("Saves the result to a file.")
                        .required(false)
                        .value_parser(value_parser!(PathBuf)),
                );
            }
        };
        command
    }

    pub fn long_name(&self) -> &str {
        match self {
            PncCommand::Group {
                name_short,
                name_long,
                ..
            }
            | PncCommand::Command {
                name_short,
                name_long,
                ..
            } => name_long.unwrap_or(*name_short),
        }
    }

    fn input_id(input_name: &str, index: usize) -> String {
        format!("{}x{}", input_name, index)
    }

    pub fn get_progress_bar(total_ticks: usize) -> Result<ProgressBar> {
        let pb = ProgressBar::new(total_ticks as u64);
        pb.set_style(
            ProgressStyle::with_template("[{wide_bar:.cyan/blue}] {pos:>7}/{len:7}")?
                .progress_chars("#>-"),
        );
        pb.set_position(0);
        Ok(pb)
    }

    /**
     * Runs the selected command and writes its result to the output file, or to STDOUT if none was given.
     */
    pub fn execute(&self, cli_matches: &ArgMatches) -> Result<()> {
        let (result, sub_matches) = self.run(cli_matches)?;

        if let Some(to_file) = sub_matches.get_one::<PathBuf>(ARG_ID_OUTPUT) {
            log::info!("writing {} to {:?}", result.get_type(), to_file);
            result.export_to_file(to_file)
        } else {
            log::info!("writing {}", result.get_type());
            let mut stdout = std::io::stdout().lock();
            result.export(&mut stdout)?;
            Ok(stdout.flush()?)
        }
    }

    /**
     * Finds the selected command, reads its inputs and runs it. Returns the result together with the
     * matches of the selected command.
     */
    pub fn run<'a>(&self, cli_matches: &'a ArgMatches) -> Result<(PncOutput, &'a ArgMatches)> {
        match self {
            PncCommand::Group { children, .. } => {
                for child in children.iter() {
                    if let Some(sub_matches) = cli_matches.subcommand_matches(child.long_name()) {
                        return child.run(sub_matches);
                    }
                }
                Err(anyhow!("command not recognised"))
            }
            PncCommand::Command {
                input_types: input_typess,
                input_names,
                execute,
                output_type,
                ..
            } => {
                let mut inputs = vec![];
                for (i, (input_types, input_name)) in
                    input_typess.iter().zip(input_names.iter()).enumerate()
                {
                    let path = cli_matches
                        .get_one::<PathBuf>(&Self::input_id(input_name, i))
                        .ok_or_else(|| anyhow!("argument {} was not given", input_name))?;

                    log::info!("reading {}", input_name);
                    let input = pnc_input::attempt_parse(input_types, path)
                        .with_context(|| format!("reading parameter {}", input_name))?;
                    inputs.push(input);
                }

                log::info!("starting {}", self.long_name());

                let result = (execute)(inputs, cli_matches)?;

                if &result.get_type() != *output_type {
                    return Err(anyhow!(
                        "output type {} does not match the declared output {} of {}",
                        result.get_type(),
                        output_type,
                        self
                    ));
                }

                Ok((result, cli_matches))
            }
        }
    }
}

impl Display for PncCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.long_name())
    }
}

impl Debug for PncCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group {
                name_short,
                name_long,
                ..
            } => f
                .debug_struct("Group")
                .field("name_short", name_short)
                .field("name_long", name_long)
                .finish(),
            Self::Command {
                name_short,
                name_long,
                ..
            } => f
                .debug_struct("Command")
                .field("name_short", name_short)
                .field("name_long", name_long)
                .finish(),
        }
    }
}
