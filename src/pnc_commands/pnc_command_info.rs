use std::io::Write;

use crate::pnc_framework::{
    infoable::Infoable,
    pnc_command::PncCommand,
    pnc_input::PncInputType,
    pnc_output::{PncOutput, PncOutputType},
};

pub const PNC_INFO: PncCommand = PncCommand::Command {
    name_short: "info",
    name_long: Some("information"),
    explanation_short: "Show information about a Petri net or an event log.",
    explanation_long: None,
    cli_command: None,
    input_types: &[&[PncInputType::PetriNet, PncInputType::EventLog]],
    input_names: &["FILE"],
    input_helps: &["A Petri net or an event log."],
    execute: |mut inputs, _| {
        let input = inputs.remove(0);
        let mut f = vec![];

        writeln!(
            f,
            "File was recognised as {} {}.",
            input.get_type().get_article(),
            input.get_type()
        )?;
        input.info(&mut f)?;

        writeln!(f, "\nFormat of {} {}:", input.get_type().get_article(), input.get_type())?;
        writeln!(f, "{}", input.get_type().get_format_specification())?;

        Ok(PncOutput::String(String::from_utf8(f)?))
    },
    output_type: &PncOutputType::String,
};
