use crate::control_system::phase::{Action, Phase};
use crate::sensing::Observation;

/// A control policy: maps the latest observation and the current phase to a
/// hold-or-advance decision. The closed set of variants is fixed-cycle,
/// pressure-heuristic, and the external learned-policy adapter.
pub trait SignalPolicy {
    fn select_action(&mut self, observation: &Observation, phase: Phase) -> Action;

    /// Label used in logs and evaluation reports.
    fn name(&self) -> &'static str;
}

/// Classic fixed-time control: hold each green for a configured number of
/// ticks and each yellow for another, ignoring the observation entirely.
#[derive(Debug, Clone)]
pub struct FixedCyclePolicy {
    green_ticks: u64,
    yellow_ticks: u64,
    elapsed_in_phase: u64,
}

impl FixedCyclePolicy {
    pub const DEFAULT_GREEN_TICKS: u64 = 30;
    pub const DEFAULT_YELLOW_TICKS: u64 = 3;

    pub fn new(green_ticks: u64, yellow_ticks: u64) -> Self {
        Self {
            green_ticks,
            yellow_ticks,
            elapsed_in_phase: 0,
        }
    }

    fn phase_duration(&self, phase: Phase) -> u64 {
        if phase.is_yellow() {
            self.yellow_ticks
        } else {
            self.green_ticks
        }
    }
}

impl Default for FixedCyclePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GREEN_TICKS, Self::DEFAULT_YELLOW_TICKS)
    }
}

impl SignalPolicy for FixedCyclePolicy {
    fn select_action(&mut self, _observation: &Observation, phase: Phase) -> Action {
        self.elapsed_in_phase += 1;
        if self.elapsed_in_phase >= self.phase_duration(phase) {
            self.elapsed_in_phase = 0;
            Action::Advance
        } else {
            Action::Hold
        }
    }

    fn name(&self) -> &'static str {
        "fixed-cycle"
    }
}

/// Adaptive control driven by approach pressure (the summed density of the
/// two approaches sharing a green).
///
/// A green is surrendered when its own pressure has drained below the low
/// threshold while the opposing axis has demand, or unconditionally when the
/// opposing pressure exceeds the fairness threshold, so no approach can be
/// starved however busy the green side stays. Yellows are never held.
#[derive(Debug, Clone)]
pub struct PressureHeuristicPolicy {
    low_threshold: f64,
    fairness_threshold: f64,
}

impl PressureHeuristicPolicy {
    pub const DEFAULT_LOW_THRESHOLD: f64 = 5.0;
    pub const DEFAULT_FAIRNESS_THRESHOLD: f64 = 50.0;

    pub fn new(low_threshold: f64, fairness_threshold: f64) -> Self {
        Self {
            low_threshold,
            fairness_threshold,
        }
    }
}

impl Default for PressureHeuristicPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_LOW_THRESHOLD,
            Self::DEFAULT_FAIRNESS_THRESHOLD,
        )
    }
}

impl SignalPolicy for PressureHeuristicPolicy {
    fn select_action(&mut self, observation: &Observation, phase: Phase) -> Action {
        let ns = observation.ns_pressure();
        let ew = observation.ew_pressure();
        match phase {
            Phase::NsYellow | Phase::EwYellow => Action::Advance,
            Phase::NsGreen => {
                if (ns < self.low_threshold && ew > self.low_threshold)
                    || ew > self.fairness_threshold
                {
                    Action::Advance
                } else {
                    Action::Hold
                }
            }
            Phase::EwGreen => {
                if (ew < self.low_threshold && ns > self.low_threshold)
                    || ns > self.fairness_threshold
                {
                    Action::Advance
                } else {
                    Action::Hold
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "pressure-heuristic"
    }
}

/// Adapter around an externally trained decision function. The wrapped
/// function sees the raw observation and phase and returns its raw action;
/// the adapter only translates 0 to Hold and anything else to Advance.
pub struct ExternalPolicy {
    decide: Box<dyn FnMut(&Observation, Phase) -> u32>,
}

impl ExternalPolicy {
    pub fn new<F>(decide: F) -> Self
    where
        F: FnMut(&Observation, Phase) -> u32 + 'static,
    {
        Self {
            decide: Box::new(decide),
        }
    }
}

impl SignalPolicy for ExternalPolicy {
    fn select_action(&mut self, observation: &Observation, phase: Phase) -> Action {
        if (self.decide)(observation, phase) == 0 {
            Action::Hold
        } else {
            Action::Advance
        }
    }

    fn name(&self) -> &'static str {
        "external"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> Observation {
        Observation::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Drives a policy through its own transitions, collecting the actions.
    fn drive<P: SignalPolicy>(policy: &mut P, obs: &Observation, steps: usize) -> Vec<Action> {
        let mut phase = Phase::NsGreen;
        let mut actions = Vec::with_capacity(steps);
        for _ in 0..steps {
            let action = policy.select_action(obs, phase);
            phase = phase.apply(action);
            actions.push(action);
        }
        actions
    }

    #[test]
    fn fixed_cycle_produces_the_expected_sequence() {
        let mut policy = FixedCyclePolicy::default();
        let actions = drive(&mut policy, &idle(), 66);

        // NS green: 29 holds then an advance.
        assert!(actions[..29].iter().all(|&a| a == Action::Hold));
        assert_eq!(actions[29], Action::Advance);
        // NS yellow: 2 holds then an advance.
        assert!(actions[30..32].iter().all(|&a| a == Action::Hold));
        assert_eq!(actions[32], Action::Advance);
        // EW green and yellow mirror the first half.
        assert!(actions[33..62].iter().all(|&a| a == Action::Hold));
        assert_eq!(actions[62], Action::Advance);
        assert!(actions[63..65].iter().all(|&a| a == Action::Hold));
        assert_eq!(actions[65], Action::Advance);
    }

    #[test]
    fn fixed_cycle_repeats_every_66_ticks() {
        let mut policy = FixedCyclePolicy::default();
        let actions = drive(&mut policy, &idle(), 198);
        for i in 0..66 {
            assert_eq!(actions[i], actions[i + 66]);
            assert_eq!(actions[i], actions[i + 132]);
        }
    }

    #[test]
    fn pressure_policy_never_holds_a_yellow() {
        let mut policy = PressureHeuristicPolicy::default();
        let observations = [
            idle(),
            Observation::new(40.0, 40.0, 0.0, 0.0),
            Observation::new(0.0, 0.0, 40.0, 40.0),
        ];
        for obs in &observations {
            assert_eq!(policy.select_action(obs, Phase::NsYellow), Action::Advance);
            assert_eq!(policy.select_action(obs, Phase::EwYellow), Action::Advance);
        }
    }

    #[test]
    fn pressure_policy_holds_green_under_demand() {
        let mut policy = PressureHeuristicPolicy::default();
        let obs = Observation::new(10.0, 10.0, 0.0, 0.0);
        assert_eq!(policy.select_action(&obs, Phase::NsGreen), Action::Hold);
    }

    #[test]
    fn pressure_policy_surrenders_a_drained_green() {
        let mut policy = PressureHeuristicPolicy::default();
        // NS drained, EW has demand.
        let obs = Observation::new(1.0, 1.0, 4.0, 4.0);
        assert_eq!(policy.select_action(&obs, Phase::NsGreen), Action::Advance);
        // Symmetric case.
        let obs = Observation::new(4.0, 4.0, 1.0, 1.0);
        assert_eq!(policy.select_action(&obs, Phase::EwGreen), Action::Advance);
    }

    #[test]
    fn pressure_policy_holds_when_both_axes_are_drained() {
        let mut policy = PressureHeuristicPolicy::default();
        let obs = Observation::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(policy.select_action(&obs, Phase::NsGreen), Action::Hold);
        assert_eq!(policy.select_action(&obs, Phase::EwGreen), Action::Hold);
    }

    #[test]
    fn fairness_forces_an_advance_regardless_of_green_pressure() {
        let mut policy = PressureHeuristicPolicy::default();
        // NS is very busy, but EW exceeded the fairness threshold.
        let obs = Observation::new(60.0, 60.0, 26.0, 25.0);
        assert_eq!(policy.select_action(&obs, Phase::NsGreen), Action::Advance);
        let obs = Observation::new(26.0, 25.0, 60.0, 60.0);
        assert_eq!(policy.select_action(&obs, Phase::EwGreen), Action::Advance);
    }

    #[test]
    fn external_adapter_translates_raw_actions() {
        let mut policy = ExternalPolicy::new(|obs, _| if obs.north() > 5.0 { 1 } else { 0 });
        let busy = Observation::new(9.0, 0.0, 0.0, 0.0);
        assert_eq!(policy.select_action(&busy, Phase::NsGreen), Action::Advance);
        assert_eq!(policy.select_action(&idle(), Phase::NsGreen), Action::Hold);
    }
}
