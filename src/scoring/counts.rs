//! Raw pass/fail/skip tallies

use super::layering::Outcome;

/// Number of checks per outcome in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub npass: usize,
    pub nfail: usize,
    pub nskip: usize,
}

impl Counts {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Pass => self.npass += 1,
            Outcome::Fail(_) => self.nfail += 1,
            Outcome::Skip => self.nskip += 1,
        }
    }

    /// Checks reported so far
    pub fn total(&self) -> usize {
        self.npass + self.nfail + self.nskip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut counts = Counts::default();
        counts.record(&Outcome::Pass);
        counts.record(&Outcome::Fail("nope".to_string()));
        counts.record(&Outcome::Pass);
        counts.record(&Outcome::Skip);

        assert_eq!(
            counts,
            Counts {
                npass: 2,
                nfail: 1,
                nskip: 1
            }
        );
        assert_eq!(counts.total(), 4);
    }
}
