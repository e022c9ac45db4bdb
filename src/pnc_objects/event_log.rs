use anyhow::{Error, Result, anyhow};
use indexmap::IndexMap;
use std::{fmt, io::BufRead, str::FromStr};

use crate::{
    line_reader::LineReader,
    pnc_framework::{
        activity_key::{Activity, ActivityKey, ActivityKeyTranslator, TranslateActivityKey},
        importable::Importable,
        infoable::Infoable,
    },
};

pub const SEPARATOR: &str = ";";

pub const FORMAT_SPECIFICATION: &str = "An event log is a text file with one trace per line.
The events of a trace are separated by `;'; an event cannot be empty, so neither can a line.
For instance:
    a;b;c
    a;c";

/// A multiset of traces. Identical traces are stored once, in the order in which they first occur.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    activity_key: ActivityKey,
    traces: IndexMap<Vec<Activity>, usize>,
}

impl EventLog {
    pub fn new(activity_key: ActivityKey) -> Self {
        Self {
            activity_key,
            traces: IndexMap::new(),
        }
    }

    pub fn push(&mut self, trace: Vec<Activity>) {
        *self.traces.entry(trace).or_insert(0) += 1;
    }

    pub fn get_activity_key(&self) -> &ActivityKey {
        &self.activity_key
    }

    pub fn get_activity_key_mut(&mut self) -> &mut ActivityKey {
        &mut self.activity_key
    }

    pub fn get_number_of_distinct_traces(&self) -> usize {
        self.traces.len()
    }

    pub fn get_number_of_traces(&self) -> usize {
        self.traces.values().sum()
    }

    pub fn get_number_of_events(&self) -> usize {
        self.traces
            .iter()
            .map(|(trace, amount)| trace.len() * amount)
            .sum()
    }

    /**
     * Iterates over the distinct traces together with how often they occur.
     */
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<Activity>, &usize)> {
        self.traces.iter()
    }
}

impl TranslateActivityKey for EventLog {
    fn translate_using_activity_key(&mut self, to_activity_key: &mut ActivityKey) {
        let translator = ActivityKeyTranslator::new(&self.activity_key, to_activity_key);

        self.traces = std::mem::take(&mut self.traces)
            .into_iter()
            .map(|(trace, amount)| (translator.translate_trace(&trace), amount))
            .collect();
        self.activity_key = to_activity_key.clone();
    }
}

impl Importable for EventLog {
    fn import(reader: &mut dyn BufRead) -> Result<Self> {
        let mut lreader = LineReader::new(reader);
        let mut result = EventLog::new(ActivityKey::new());

        while lreader.next_line_raw()? {
            let line_number = lreader.get_last_line_number();
            let events = lreader.get_last_line().split(SEPARATOR).collect::<Vec<_>>();

            if let Some(position) = events.iter().position(|event| event.is_empty()) {
                return Err(anyhow!(
                    "line {} has an empty event at position {}; events are separated by `{}`",
                    line_number,
                    position + 1,
                    SEPARATOR
                ));
            }

            let trace = result.activity_key.process_trace(&events);
            result.push(trace);
        }

        log::debug!(
            "loaded log with {} traces of which {} are distinct",
            result.get_number_of_traces(),
            result.get_number_of_distinct_traces()
        );

        Ok(result)
    }
}

impl FromStr for EventLog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut reader = std::io::Cursor::new(s);
        Self::import(&mut reader)
    }
}

impl Infoable for EventLog {
    fn info(&self, f: &mut impl std::io::Write) -> Result<()> {
        writeln!(f, "Number of traces\t\t{}", self.get_number_of_traces())?;
        writeln!(f, "Number of distinct traces\t{}", self.get_number_of_distinct_traces())?;
        writeln!(f, "Number of events\t\t{}", self.get_number_of_events())?;
        writeln!(f, "Number of activities\t\t{}", self.activity_key.get_number_of_activities())?;

        Ok(write!(f, "")?)
    }
}

impl fmt::Display for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (trace, amount) in &self.traces {
            let line = self.activity_key.deprocess_trace(trace).join(SEPARATOR);
            for _ in 0..*amount {
                writeln!(f, "{}", line)?;
            }
        }
        write!(f, "")
    }
}
