//! Session scoring.

/// Running tally of answers for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    total: usize,
    answered: usize,
    correct: usize,
}

impl Session {
    /// Creates an empty tally for a session of `total` rounds.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            answered: 0,
            correct: 0,
        }
    }

    /// Records one answer.
    pub fn record(&mut self, is_correct: bool) {
        self.answered += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Returns true once every round has been answered.
    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }

    /// Correct rounds divided by the total rounds in the session.
    ///
    /// Rounds left unanswered after an early quit count against the score.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// Accuracy formatted to two decimal places, e.g. "0.75".
    pub fn accuracy_label(&self) -> String {
        format!("{:.2}", self.accuracy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_fifteen_of_twenty() {
        let mut session = Session::new(20);
        for i in 0..20 {
            session.record(i < 15);
        }
        assert!(session.is_complete());
        assert_eq!(session.correct(), 15);
        assert_eq!(session.accuracy_label(), "0.75");
    }

    #[test]
    fn test_accuracy_before_answers() {
        let session = Session::new(10);
        assert_eq!(session.accuracy(), 0.0);
        assert_eq!(session.accuracy_label(), "0.00");
        assert!(!session.is_complete());
    }

    #[test]
    fn test_accuracy_after_early_quit() {
        let mut session = Session::new(20);
        session.record(true);
        assert!(!session.is_complete());
        assert_eq!(session.accuracy_label(), "0.05");
    }

    #[test]
    fn test_empty_session() {
        assert_eq!(Session::new(0).accuracy_label(), "0.00");
    }

    #[test]
    fn test_accuracy_rounding() {
        let mut session = Session::new(3);
        session.record(true);
        session.record(true);
        session.record(false);
        assert_eq!(session.accuracy_label(), "0.67");
        assert_eq!(session.answered(), 3);
        assert_eq!(session.total(), 3);
    }
}
