use anyhow::{Context, Result, anyhow};
use std::{io::BufRead, path::Path};
use strum_macros::Display;

use crate::{
    pnc_framework::{
        importable::Importable, infoable::Infoable, multiple_reader::MultipleReader,
    },
    pnc_objects::{
        event_log::{self, EventLog},
        net_description,
        petri_net::PetriNet,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PncInputType {
    #[strum(serialize = "Petri net")]
    PetriNet,
    #[strum(serialize = "event log")]
    EventLog,
}

impl PncInputType {
    pub fn get_article(&self) -> &'static str {
        match self {
            PncInputType::PetriNet => "a",
            PncInputType::EventLog => "an",
        }
    }

    pub fn get_format_specification(&self) -> &'static str {
        match self {
            PncInputType::PetriNet => net_description::FORMAT_SPECIFICATION,
            PncInputType::EventLog => event_log::FORMAT_SPECIFICATION,
        }
    }

    pub fn import(&self, reader: &mut dyn BufRead) -> Result<PncInput> {
        Ok(match self {
            PncInputType::PetriNet => PncInput::PetriNet(PetriNet::import(reader)?),
            PncInputType::EventLog => PncInput::EventLog(EventLog::import(reader)?),
        })
    }

    /**
     * Lists the input types for a help text, such as `a Petri net or an event log`.
     */
    pub fn possible_inputs_with_articles(input_types: &[PncInputType]) -> String {
        input_types
            .iter()
            .map(|input_type| format!("{} {}", input_type.get_article(), input_type))
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

#[derive(Debug)]
pub enum PncInput {
    PetriNet(PetriNet),
    EventLog(EventLog),
}

impl PncInput {
    pub fn get_type(&self) -> PncInputType {
        match self {
            PncInput::PetriNet(_) => PncInputType::PetriNet,
            PncInput::EventLog(_) => PncInputType::EventLog,
        }
    }

    pub fn to_petri_net(self) -> Result<PetriNet> {
        match self {
            PncInput::PetriNet(net) => Ok(net),
            _ => Err(anyhow!(
                "expected a Petri net, but found {} {}",
                self.get_type().get_article(),
                self.get_type()
            )),
        }
    }

    pub fn to_event_log(self) -> Result<EventLog> {
        match self {
            PncInput::EventLog(log) => Ok(log),
            _ => Err(anyhow!(
                "expected an event log, but found {} {}",
                self.get_type().get_article(),
                self.get_type()
            )),
        }
    }
}

impl Infoable for PncInput {
    fn info(&self, f: &mut impl std::io::Write) -> Result<()> {
        match self {
            PncInput::PetriNet(net) => net.info(f),
            PncInput::EventLog(log) => log.info(f),
        }
    }
}

/**
 * Attempts to read the file as each of the given input types, in order. Returns the error of the
 * last attempt if none succeeds.
 */
pub fn attempt_parse(input_types: &[PncInputType], path: &Path) -> Result<PncInput> {
    let mut reader = MultipleReader::open(path)?;

    let mut error = None;
    for input_type in input_types {
        let result = input_type
            .import(&mut reader.get()?)
            .with_context(|| format!("parsing as {} {}", input_type.get_article(), input_type));
        match result {
            Ok(input) => {
                log::info!(
                    "read `{}` as {} {}",
                    path.display(),
                    input_type.get_article(),
                    input_type
                );
                return Ok(input);
            }
            Err(e) => error = Some(e),
        }
    }

    match error {
        Some(e) => Err(e),
        None => Err(anyhow!("no input type to read `{}` as", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{PncInputType, attempt_parse};

    const BOTH: &[PncInputType] = &[PncInputType::PetriNet, PncInputType::EventLog];

    #[test]
    fn recognise_files() {
        let input = attempt_parse(BOTH, Path::new("testfiles/a.pnet")).unwrap();
        assert_eq!(input.get_type(), PncInputType::PetriNet);
        assert!(input.to_petri_net().is_ok());

        let input = attempt_parse(BOTH, Path::new("testfiles/mixed.traces")).unwrap();
        assert_eq!(input.get_type(), PncInputType::EventLog);
        assert!(input.to_petri_net().is_err());
    }

    #[test]
    fn last_error_is_reported() {
        let err =
            attempt_parse(BOTH, Path::new("testfiles/invalid-empty-field.traces")).unwrap_err();
        assert!(format!("{:#}", err).contains("event log"));

        assert!(attempt_parse(&[PncInputType::PetriNet], Path::new("testfiles/a.traces")).is_err());
    }

    #[test]
    fn help_text() {
        assert_eq!(
            PncInputType::possible_inputs_with_articles(BOTH),
            "a Petri net or an event log"
        );
    }
}
