use anyhow::{Context, Result};
use std::{fs::File, io::Write, path::Path};
use strum_macros::Display;

use crate::{pnc_framework::exportable::Exportable, pnc_objects::alignments::Alignments};

pub enum PncOutput {
    Alignments(Alignments),
    Fitness(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PncOutputType {
    #[strum(serialize = "alignments")]
    Alignments,
    #[strum(serialize = "fitness")]
    Fitness,
    #[strum(serialize = "text")]
    String,
}

impl PncOutput {
    pub fn get_type(&self) -> PncOutputType {
        match self {
            PncOutput::Alignments(_) => PncOutputType::Alignments,
            PncOutput::Fitness(_) => PncOutputType::Fitness,
            PncOutput::String(_) => PncOutputType::String,
        }
    }

    pub fn export_to_file(&self, to_file: &Path) -> Result<()> {
        let mut file = File::create(to_file)
            .with_context(|| format!("could not create file `{}`", to_file.display()))?;
        self.export(&mut file)?;
        Ok(file.flush()?)
    }

    pub fn export_to_string(&self) -> Result<String> {
        let mut f = vec![];
        self.export(&mut f)?;
        Ok(String::from_utf8(f)?)
    }
}

impl Exportable for PncOutput {
    fn export(&self, f: &mut dyn Write) -> Result<()> {
        match self {
            PncOutput::Alignments(alignments) => alignments.export(f),
            PncOutput::Fitness(fitness) => fitness.export(f),
            PncOutput::String(string) => string.export(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PncOutput, PncOutputType};

    #[test]
    fn export() {
        let output = PncOutput::Fitness(0.75);
        assert_eq!(output.get_type(), PncOutputType::Fitness);
        assert_eq!(output.export_to_string().unwrap(), "0.75\n");

        let output = PncOutput::String("x\n".to_string());
        assert_eq!(output.export_to_string().unwrap(), "x\n");
    }
}
