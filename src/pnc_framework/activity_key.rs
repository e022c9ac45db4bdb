use std::fmt::{Debug, Display};

use rustc_hash::FxHashMap;

/// An interned label: a transition label of a net or an event of a trace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Activity {
    id: usize,
}

impl Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ac{}", self.id)
    }
}

impl Debug for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ac{}", self.id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActivityKey {
    name2activity: FxHashMap<String, Activity>,
    activity2name: Vec<String>,
}

impl ActivityKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_number_of_activities(&self) -> usize {
        self.activity2name.len()
    }

    pub fn process_activity(&mut self, activity: &str) -> Activity {
        match self.name2activity.get(activity) {
            Some(index) => *index,
            None => {
                let result = Activity {
                    id: self.activity2name.len(),
                };
                self.activity2name.push(activity.to_string());
                self.name2activity.insert(activity.to_string(), result);
                result
            }
        }
    }

    pub fn process_trace(&mut self, trace: &[&str]) -> Vec<Activity> {
        trace
            .iter()
            .map(|activity| self.process_activity(activity))
            .collect()
    }

    /**
     * Returns the activity of a label without adding it to the key.
     */
    pub fn get_activity(&self, label: &str) -> Option<Activity> {
        self.name2activity.get(label).copied()
    }

    pub fn get_activity_label(&self, activity: &Activity) -> &str {
        &self.activity2name[activity.id]
    }

    pub fn deprocess_trace(&self, trace: &[Activity]) -> Vec<&str> {
        trace
            .iter()
            .map(|activity| self.get_activity_label(activity))
            .collect()
    }
}

impl Display for ActivityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, label) in self.activity2name.iter().enumerate() {
            write!(f, "ac{}: {}, ", i, label)?;
        }
        write!(f, "")
    }
}

/// Maps the activities of one key onto another key, adding missing labels to the latter.
pub struct ActivityKeyTranslator {
    from2to: Vec<Activity>,
}

impl ActivityKeyTranslator {
    pub fn new(from: &ActivityKey, to: &mut ActivityKey) -> Self {
        Self {
            from2to: from
                .activity2name
                .iter()
                .map(|label_from| to.process_activity(label_from))
                .collect(),
        }
    }

    pub fn translate_activity(&self, activity: &Activity) -> Activity {
        self.from2to[activity.id]
    }

    pub fn translate_trace(&self, trace: &[Activity]) -> Vec<Activity> {
        trace
            .iter()
            .map(|activity| self.translate_activity(activity))
            .collect()
    }
}

pub trait TranslateActivityKey {
    /**
     * Change the activity key of this object, by translating all mentions of activities to the new activity key (which will be updated with activities it did not have yet).
     */
    fn translate_using_activity_key(&mut self, to_activity_key: &mut ActivityKey);
}
