use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub trues: u64,
    pub falses: u64,
    pub unknowns: u64,
}

impl Tally {
    pub fn record(&mut self, flag: Option<bool>) {
        let slot = match flag {
            Some(true) => &mut self.trues,
            Some(false) => &mut self.falses,
            None => &mut self.unknowns,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        self.trues
            .saturating_add(self.falses)
            .saturating_add(self.unknowns)
    }

    pub fn merge(&mut self, other: &Tally) {
        self.trues = self.trues.saturating_add(other.trues);
        self.falses = self.falses.saturating_add(other.falses);
        self.unknowns = self.unknowns.saturating_add(other.unknowns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_tracked_apart_from_false() {
        let mut tally = Tally::default();
        tally.record(Some(true));
        tally.record(Some(false));
        tally.record(None);
        tally.record(None);

        assert_eq!(tally.trues, 1);
        assert_eq!(tally.falses, 1);
        assert_eq!(tally.unknowns, 2);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn merge_sums_each_branch() {
        let mut left = Tally {
            trues: 1,
            falses: 2,
            unknowns: 3,
        };
        left.merge(&Tally {
            trues: 10,
            falses: 0,
            unknowns: 1,
        });
        assert_eq!(
            left,
            Tally {
                trues: 11,
                falses: 2,
                unknowns: 4,
            }
        );
    }
}
