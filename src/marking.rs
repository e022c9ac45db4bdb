use std::{
    collections::BTreeMap,
    fmt::{Debug, Display, Formatter},
};

use crate::pnc_objects::node::NodeId;

/// A sparse marking: places without tokens have no entry.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Marking {
    pub(crate) place2token: BTreeMap<NodeId, u64>, //for each marked place: number of tokens in that place
}

impl Marking {
    pub fn new() -> Self {
        Self {
            place2token: BTreeMap::new(),
        }
    }

    pub fn get(&self, place: NodeId) -> u64 {
        self.place2token.get(&place).copied().unwrap_or(0)
    }

    /**
     * Sets the number of tokens of a place. Setting zero tokens removes the entry.
     */
    pub fn set(&mut self, place: NodeId, tokens: u64) {
        if tokens == 0 {
            self.place2token.remove(&place);
        } else {
            self.place2token.insert(place, tokens);
        }
    }

    /**
     * Returns the number of places that carry tokens.
     */
    pub fn len(&self) -> usize {
        self.place2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.place2token.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        self.place2token
            .iter()
            .map(|(place, tokens)| (*place, *tokens))
    }

    pub fn get_total_tokens(&self) -> u64 {
        self.place2token.values().sum()
    }
}

impl FromIterator<(NodeId, u64)> for Marking {
    fn from_iter<T: IntoIterator<Item = (NodeId, u64)>>(iter: T) -> Self {
        let mut result = Self::new();
        for (place, tokens) in iter {
            result.set(place, tokens);
        }
        result
    }
}

impl Display for Marking {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (place, multiplicity) in self.place2token.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}:{}", place, multiplicity)?;
        }
        write!(f, "}}")
    }
}

impl Debug for Marking {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::Marking;

    #[test]
    fn marking_zero_is_absent() {
        let mut marking = Marking::new();
        marking.set(3, 2);
        marking.set(1, 1);
        assert_eq!(marking.len(), 2);
        assert_eq!(marking.get_total_tokens(), 3);

        marking.set(3, 0);
        assert_eq!(marking.len(), 1);
        assert_eq!(marking.get(3), 0);
        assert_eq!(marking, [(1, 1), (7, 0)].into_iter().collect());
    }

    #[test]
    fn marking_display() {
        let marking: Marking = [(5, 2), (2, 1)].into_iter().collect();
        assert_eq!(marking.to_string(), "{2:1, 5:2}");
        assert_eq!(Marking::new().to_string(), "{}");
    }
}
