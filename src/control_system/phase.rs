use serde::{Deserialize, Serialize};

/// The four signal phases, in cycle order. The index doubles as the phase
/// index pushed to the simulation's signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NsGreen,
    NsYellow,
    EwGreen,
    EwYellow,
}

/// What a policy wants done with the current phase this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hold,
    Advance,
}

impl Phase {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Phase::NsGreen => 0,
            Phase::NsYellow => 1,
            Phase::EwGreen => 2,
            Phase::EwYellow => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Phase> {
        match index {
            0 => Some(Phase::NsGreen),
            1 => Some(Phase::NsYellow),
            2 => Some(Phase::EwGreen),
            3 => Some(Phase::EwYellow),
            _ => None,
        }
    }

    /// Successor in the fixed cycle; wraps from EwYellow back to NsGreen.
    pub fn next(self) -> Phase {
        match self {
            Phase::NsGreen => Phase::NsYellow,
            Phase::NsYellow => Phase::EwGreen,
            Phase::EwGreen => Phase::EwYellow,
            Phase::EwYellow => Phase::NsGreen,
        }
    }

    pub fn is_yellow(self) -> bool {
        matches!(self, Phase::NsYellow | Phase::EwYellow)
    }

    /// Pure transition rule: Hold keeps the phase, Advance steps the cycle.
    pub fn apply(self, action: Action) -> Phase {
        match action {
            Action::Hold => self,
            Action::Advance => self.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_modulo_four() {
        let mut phase = Phase::NsGreen;
        for expected in [Phase::NsYellow, Phase::EwGreen, Phase::EwYellow, Phase::NsGreen] {
            phase = phase.next();
            assert_eq!(phase, expected);
        }
    }

    #[test]
    fn index_round_trips() {
        for index in 0..Phase::COUNT {
            let phase = Phase::from_index(index).unwrap();
            assert_eq!(phase.index(), index);
            assert_eq!(phase.next().index(), (index + 1) % Phase::COUNT);
        }
        assert_eq!(Phase::from_index(4), None);
    }

    #[test]
    fn apply_follows_the_action() {
        assert_eq!(Phase::EwGreen.apply(Action::Hold), Phase::EwGreen);
        assert_eq!(Phase::EwYellow.apply(Action::Advance), Phase::NsGreen);
    }

    #[test]
    fn only_yellows_are_yellow() {
        assert!(Phase::NsYellow.is_yellow());
        assert!(Phase::EwYellow.is_yellow());
        assert!(!Phase::NsGreen.is_yellow());
        assert!(!Phase::EwGreen.is_yellow());
    }
}
