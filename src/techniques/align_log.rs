use anyhow::{Context, Result, anyhow};

use crate::{
    pnc_framework::activity_key::Activity,
    pnc_objects::{alignment::Alignment, event_log::EventLog, petri_net::PetriNet},
    techniques::align::{Align, AlignmentParameters},
};

pub trait AlignLog {
    /**
     * Aligns every distinct trace of the log, one at a time, in the order in which the traces first
     * occur. Each alignment carries the number of times its trace occurs.
     *
     * The log must use the activity key of the net; see TranslateActivityKey.
     */
    fn align_log<'a>(
        &'a self,
        log: &'a EventLog,
        parameters: &'a AlignmentParameters,
    ) -> AlignmentIterator<'a>;
}

impl AlignLog for PetriNet {
    fn align_log<'a>(
        &'a self,
        log: &'a EventLog,
        parameters: &'a AlignmentParameters,
    ) -> AlignmentIterator<'a> {
        AlignmentIterator {
            net: self,
            traces: Box::new(log.iter()),
            parameters,
        }
    }
}

pub struct AlignmentIterator<'a> {
    net: &'a PetriNet,
    traces: Box<dyn Iterator<Item = (&'a Vec<Activity>, &'a usize)> + 'a>,
    parameters: &'a AlignmentParameters,
}

impl Iterator for AlignmentIterator<'_> {
    type Item = Result<Alignment>;

    fn next(&mut self) -> Option<Self::Item> {
        let (trace, amount) = self.traces.next()?;
        Some(align_trace(self.net, trace, *amount, self.parameters))
    }
}

fn align_trace(
    net: &PetriNet,
    trace: &[Activity],
    amount: usize,
    parameters: &AlignmentParameters,
) -> Result<Alignment> {
    let label = || net.get_activity_key().deprocess_trace(trace).join(";");

    log::debug!("align trace `{}` occurring {} times", label(), amount);
    let mut alignment = net
        .compute_optimal_alignment(trace, parameters)
        .with_context(|| format!("computation failed for trace `{}`", label()))?
        .ok_or_else(|| {
            anyhow!(
                "computation failed for trace `{}`: the final marking cannot be reached",
                label()
            )
        })?;
    alignment.set_amount(amount);
    Ok(alignment)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{
        pnc_framework::activity_key::TranslateActivityKey,
        pnc_objects::{event_log::EventLog, petri_net::PetriNet},
        techniques::{align::AlignmentParameters, align_log::AlignLog},
    };

    #[test]
    fn one_alignment_per_distinct_trace() {
        let fin = fs::read_to_string("testfiles/loop.pnet").unwrap();
        let mut net = fin.parse::<PetriNet>().unwrap();
        let fin = fs::read_to_string("testfiles/mixed.traces").unwrap();
        let mut log = fin.parse::<EventLog>().unwrap();
        log.translate_using_activity_key(net.get_activity_key_mut());

        let parameters = AlignmentParameters::default();
        let alignments = net
            .align_log(&log, &parameters)
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(alignments.len(), 3);
        assert_eq!(
            alignments.iter().map(|alignment| alignment.get_amount()).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );
        assert_eq!(
            alignments.iter().map(|alignment| alignment.cost()).collect::<Vec<_>>(),
            vec![0, 0, 3]
        );
    }

    #[test]
    fn unreachable_is_an_error() {
        let fin = fs::read_to_string("testfiles/unreachable.pnet").unwrap();
        let mut net = fin.parse::<PetriNet>().unwrap();
        let mut log = "a\n".parse::<EventLog>().unwrap();
        log.translate_using_activity_key(net.get_activity_key_mut());

        let parameters = AlignmentParameters::default();
        let mut alignments = net.align_log(&log, &parameters);
        let err = alignments.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("computation failed"));
        assert!(alignments.next().is_none());
    }
}
