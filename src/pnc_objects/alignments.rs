use anyhow::Result;
use std::fmt::Display;

use crate::{
    pnc_framework::{activity_key::ActivityKey, exportable::Exportable},
    pnc_objects::alignment::Alignment,
};

pub const HEADER: &str = "alignments";

/// The alignments of the distinct traces of a log, sharing one activity key.
#[derive(Debug, Clone)]
pub struct Alignments {
    activity_key: ActivityKey,
    alignments: Vec<Alignment>,
}

impl Alignments {
    pub fn new(activity_key: ActivityKey) -> Self {
        Self {
            activity_key,
            alignments: vec![],
        }
    }

    pub fn push(&mut self, alignment: Alignment) {
        self.alignments.push(alignment);
    }

    pub fn get_activity_key(&self) -> &ActivityKey {
        &self.activity_key
    }

    pub fn get_alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    pub fn len(&self) -> usize {
        self.alignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }
}

impl Exportable for Alignments {
    fn export(&self, f: &mut dyn std::io::Write) -> Result<()> {
        Ok(write!(f, "{}", self)?)
    }
}

impl Display for Alignments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", HEADER)?;
        writeln!(f, "# number of alignments\n{}", self.alignments.len())?;

        for (i, alignment) in self.alignments.iter().enumerate() {
            writeln!(f, "# alignment {}", i)?;
            writeln!(f, "{}", alignment.display(&self.activity_key))?;
        }

        write!(f, "")
    }
}
