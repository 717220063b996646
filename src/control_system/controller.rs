use crate::control_system::phase::{Action, Phase};
use crate::control_system::policy::SignalPolicy;
use crate::sensing::Observation;
use crate::simulation_engine::SimulationAccess;

/// Owns the signal-phase state machine and mirrors every transition into the
/// simulation. The hold/advance choice itself is delegated to the injected
/// policy.
#[derive(Debug, Clone)]
pub struct SignalController {
    signal_id: Option<String>,
    phase: Phase,
    degraded: bool,
}

impl SignalController {
    /// Resolves the junction's signal. A missing signal is not fatal here:
    /// the controller starts degraded and keeps holding, and the episode
    /// loop decides whether that should end the run.
    pub fn new<S: SimulationAccess>(sim: &S) -> Self {
        let signal_id = sim.signal_ids().into_iter().next();
        let degraded = signal_id.is_none();
        if degraded {
            log::warn!("no traffic signal found at the junction, controller is degraded");
        }
        Self {
            signal_id,
            phase: Phase::NsGreen,
            degraded,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True when the last decision could not be applied to a signal.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Asks the policy for an action and applies the resulting transition to
    /// the simulation. Returns the chosen action and the phase now active.
    pub fn decide<S, P>(
        &mut self,
        sim: &mut S,
        policy: &mut P,
        observation: &Observation,
    ) -> (Action, Phase)
    where
        S: SimulationAccess,
        P: SignalPolicy + ?Sized,
    {
        let Some(signal_id) = self.signal_id.clone() else {
            self.degraded = true;
            log::warn!("no signal to drive, holding {:?}", self.phase);
            return (Action::Hold, self.phase);
        };

        let action = policy.select_action(observation, self.phase);
        if action == Action::Advance {
            let next = self.phase.next();
            match sim.set_phase(&signal_id, next.index()) {
                Ok(()) => {
                    self.phase = next;
                    self.degraded = false;
                }
                Err(e) => {
                    self.degraded = true;
                    log::warn!("phase change rejected ({e}), holding {:?}", self.phase);
                    return (Action::Hold, self.phase);
                }
            }
        } else {
            self.degraded = false;
        }
        (action, self.phase)
    }
}
