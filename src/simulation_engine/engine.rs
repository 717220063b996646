use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::simulation_engine::interface::{ControlError, SimulationAccess, TelemetryError};
use crate::simulation_engine::network::{ApproachAxis, EdgeKind, RoadNetwork};
use crate::simulation_engine::vehicles::{generate_traffic, Vehicle};

/// Minimum bumper-to-bumper gap between queued vehicles.
const MIN_GAP: f64 = 2.5;
/// Movement below this distance per tick counts as halted.
const HALT_THRESHOLD: f64 = 0.1;
/// Number of phases of the central signal (NS green/yellow, EW green/yellow).
const SIGNAL_PHASE_COUNT: usize = 4;
/// CO2 in grams emitted per tick while moving.
const CO2_MOVING_G: f64 = 2.4;
/// CO2 in grams emitted per tick while idling at a stop.
const CO2_IDLE_G: f64 = 0.9;

#[derive(Debug, Clone)]
struct ActiveVehicle {
    vehicle: Vehicle,
    edge_index: usize,
    exit_index: usize,
    lane_pos: f64,
    halted: bool,
}

/// A small synthetic micro-simulation of the four-arm intersection.
///
/// Vehicles depart on their scheduled tick, drive toward the stop line at
/// cruising speed, queue behind each other, cross the junction only while
/// their axis holds green, and leave the network at the end of the exit arm.
/// Deterministic for a fixed seed and phase-command sequence.
pub struct MicroSim {
    network: RoadNetwork,
    pending: VecDeque<Vehicle>,
    active: Vec<ActiveVehicle>,
    tick: u64,
    phase_index: usize,
    arrived_this_tick: usize,
    arrived_total: u64,
}

impl MicroSim {
    pub fn new(network: RoadNetwork, mut vehicles: Vec<Vehicle>) -> Self {
        vehicles.sort_by_key(|v| v.depart_tick);
        Self {
            network,
            pending: vehicles.into(),
            active: Vec::new(),
            tick: 0,
            phase_index: 0,
            arrived_this_tick: 0,
            arrived_total: 0,
        }
    }

    /// Four-arm network with a seeded random departure schedule.
    pub fn four_arm(vehicle_count: usize, seed: u64) -> Self {
        let network = RoadNetwork::four_arm(100.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let vehicles = generate_traffic(&network, vehicle_count, &mut rng);
        Self::new(network, vehicles)
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn arrived_total(&self) -> u64 {
        self.arrived_total
    }

    fn edge_index(&self, edge_id: &str) -> Option<usize> {
        self.network.edges.iter().position(|e| e.id == edge_id)
    }

    fn edge_length(&self, edge_index: usize) -> f64 {
        self.network.edges[edge_index]
            .lanes
            .first()
            .map(|l| l.length)
            .unwrap_or(0.0)
    }

    fn axis_has_green(&self, axis: ApproachAxis) -> bool {
        matches!(
            (self.phase_index, axis),
            (0, ApproachAxis::NorthSouth) | (2, ApproachAxis::EastWest)
        )
    }

    fn entry_blocked(&self, edge_index: usize, length: f64) -> bool {
        self.active
            .iter()
            .any(|v| v.edge_index == edge_index && v.lane_pos < length + MIN_GAP)
    }

    fn spawn_pending(&mut self) {
        while let Some(next) = self.pending.front() {
            if next.depart_tick > self.tick {
                break;
            }
            let entry_index = match self.edge_index(&next.entry_edge) {
                Some(i) => i,
                None => {
                    log::warn!("dropping vehicle {}: unknown entry edge {}", next.id, next.entry_edge);
                    self.pending.pop_front();
                    continue;
                }
            };
            let exit_index = match self.edge_index(&next.exit_edge) {
                Some(i) => i,
                None => {
                    log::warn!("dropping vehicle {}: unknown exit edge {}", next.id, next.exit_edge);
                    self.pending.pop_front();
                    continue;
                }
            };
            if self.entry_blocked(entry_index, next.length) {
                // Entry occupied, retry next tick.
                break;
            }
            let Some(vehicle) = self.pending.pop_front() else {
                break;
            };
            self.active.push(ActiveVehicle {
                vehicle,
                edge_index: entry_index,
                exit_index,
                lane_pos: 0.0,
                halted: false,
            });
        }
    }

    fn move_vehicles(&mut self) {
        // Process each edge front-to-back so followers respect leader gaps.
        let mut order: Vec<usize> = (0..self.active.len()).collect();
        order.sort_by(|&a, &b| {
            let va = &self.active[a];
            let vb = &self.active[b];
            va.edge_index
                .cmp(&vb.edge_index)
                .then(vb.lane_pos.total_cmp(&va.lane_pos))
        });

        let mut arrived: Vec<String> = Vec::new();
        let mut current_edge = usize::MAX;
        let mut leader_back = f64::INFINITY;

        for &i in &order {
            let edge_index = self.active[i].edge_index;
            if edge_index != current_edge {
                current_edge = edge_index;
                leader_back = f64::INFINITY;
            }
            let lane_len = self.edge_length(edge_index);
            let pos = self.active[i].lane_pos;
            let mut target = pos + self.active[i].vehicle.speed;

            match self.network.edges[edge_index].kind {
                EdgeKind::Incoming(axis) => {
                    if target >= lane_len && self.axis_has_green(axis) && target <= leader_back {
                        // Cross the junction onto the exit arm.
                        let carry = target - lane_len;
                        let exit_index = self.active[i].exit_index;
                        self.active[i].edge_index = exit_index;
                        self.active[i].lane_pos = carry;
                        self.active[i].halted = false;
                        continue;
                    }
                    // Red or yellow: hold at the stop line.
                    target = target.min(lane_len);
                }
                EdgeKind::Outgoing => {
                    if target >= lane_len {
                        arrived.push(self.active[i].vehicle.id.clone());
                        continue;
                    }
                }
                EdgeKind::Internal => {}
            }

            target = target.min(leader_back - MIN_GAP).max(pos);
            self.active[i].halted = target - pos < HALT_THRESHOLD;
            self.active[i].lane_pos = target;
            leader_back = target - self.active[i].vehicle.length;
        }

        self.arrived_this_tick = arrived.len();
        self.arrived_total += arrived.len() as u64;
        self.active.retain(|v| !arrived.contains(&v.vehicle.id));
    }

    fn on_edge(&self, edge_id: &str) -> impl Iterator<Item = &ActiveVehicle> {
        let index = self.edge_index(edge_id);
        self.active
            .iter()
            .filter(move |v| Some(v.edge_index) == index)
    }
}

impl SimulationAccess for MicroSim {
    fn lane_length(&self, lane_id: &str) -> Result<f64, TelemetryError> {
        self.network
            .lane(lane_id)
            .map(|l| l.length)
            .ok_or_else(|| TelemetryError::LaneUnavailable(lane_id.to_string()))
    }

    fn vehicles_on_lane(&self, lane_id: &str) -> Result<Vec<String>, TelemetryError> {
        let edge = self
            .network
            .edge_of_lane(lane_id)
            .ok_or_else(|| TelemetryError::LaneUnavailable(lane_id.to_string()))?;
        Ok(self.on_edge(&edge.id).map(|v| v.vehicle.id.clone()).collect())
    }

    fn vehicle_lane_position(&self, vehicle_id: &str) -> Result<f64, TelemetryError> {
        self.active
            .iter()
            .find(|v| v.vehicle.id == vehicle_id)
            .map(|v| v.lane_pos)
            .ok_or_else(|| TelemetryError::VehicleGone(vehicle_id.to_string()))
    }

    fn edge_ids(&self) -> Vec<String> {
        self.network.edge_ids()
    }

    fn edge_waiting_time(&self, edge_id: &str) -> f64 {
        // One waiting-second per halted vehicle per tick.
        self.on_edge(edge_id).filter(|v| v.halted).count() as f64
    }

    fn edge_co2(&self, edge_id: &str) -> f64 {
        self.on_edge(edge_id)
            .map(|v| if v.halted { CO2_IDLE_G } else { CO2_MOVING_G })
            .sum()
    }

    fn edge_halted_count(&self, edge_id: &str) -> usize {
        self.on_edge(edge_id).filter(|v| v.halted).count()
    }

    fn arrived_count(&self) -> usize {
        self.arrived_this_tick
    }

    fn min_expected(&self) -> usize {
        self.pending.len() + self.active.len()
    }

    fn signal_ids(&self) -> Vec<String> {
        self.network
            .junctions
            .iter()
            .filter(|j| j.signalized)
            .map(|j| j.id.clone())
            .collect()
    }

    fn phase(&self, signal_id: &str) -> Result<usize, ControlError> {
        let known = self
            .network
            .junctions
            .iter()
            .any(|j| j.signalized && j.id == signal_id);
        if known {
            Ok(self.phase_index)
        } else {
            Err(ControlError::NoSignal(signal_id.to_string()))
        }
    }

    fn set_phase(&mut self, signal_id: &str, phase_index: usize) -> Result<(), ControlError> {
        let known = self
            .network
            .junctions
            .iter()
            .any(|j| j.signalized && j.id == signal_id);
        if !known {
            return Err(ControlError::NoSignal(signal_id.to_string()));
        }
        if phase_index >= SIGNAL_PHASE_COUNT {
            return Err(ControlError::InvalidPhase {
                signal_id: signal_id.to_string(),
                index: phase_index,
            });
        }
        self.phase_index = phase_index;
        Ok(())
    }

    fn advance(&mut self) {
        self.tick += 1;
        self.spawn_pending();
        self.move_vehicles();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_engine::vehicles::VehicleType;

    fn single_vehicle(entry: &str, exit: &str, depart: u64) -> Vehicle {
        Vehicle::new(
            format!("v_{entry}_{depart}"),
            VehicleType::Car,
            entry.to_string(),
            exit.to_string(),
            depart,
            10.0,
        )
    }

    #[test]
    fn vehicle_crosses_on_green_and_arrives() {
        let net = RoadNetwork::four_arm(100.0);
        let mut sim = MicroSim::new(net, vec![single_vehicle("north_in", "south_out", 0)]);
        // Phase 0 is NS green; 100 units in + 100 out at 10 units/tick.
        for _ in 0..25 {
            sim.advance();
        }
        assert_eq!(sim.min_expected(), 0);
        assert_eq!(sim.arrived_total(), 1);
    }

    #[test]
    fn vehicle_halts_at_red_stop_line() {
        let net = RoadNetwork::four_arm(100.0);
        let mut sim = MicroSim::new(net, vec![single_vehicle("east_in", "west_out", 0)]);
        // Phase 0 keeps the EW axis red.
        for _ in 0..30 {
            sim.advance();
        }
        assert_eq!(sim.min_expected(), 1);
        assert_eq!(sim.edge_halted_count("east_in"), 1);
        assert!(sim.edge_waiting_time("east_in") > 0.0);
        let pos = sim.vehicle_lane_position("v_east_in_0").unwrap();
        assert_eq!(pos, 100.0);
    }

    #[test]
    fn switching_phase_releases_the_queue() {
        let net = RoadNetwork::four_arm(100.0);
        let mut sim = MicroSim::new(net, vec![single_vehicle("east_in", "west_out", 0)]);
        for _ in 0..30 {
            sim.advance();
        }
        sim.set_phase("A1", 2).unwrap();
        for _ in 0..15 {
            sim.advance();
        }
        assert_eq!(sim.arrived_total(), 1);
    }

    #[test]
    fn queued_vehicles_keep_min_gap() {
        let net = RoadNetwork::four_arm(100.0);
        let vehicles = vec![
            single_vehicle("east_in", "north_out", 0),
            single_vehicle("east_in", "south_out", 1),
        ];
        let mut sim = MicroSim::new(net, vehicles);
        for _ in 0..30 {
            sim.advance();
        }
        let ids = sim.vehicles_on_lane("east_in_0").unwrap();
        assert_eq!(ids.len(), 2);
        let front = sim.vehicle_lane_position("v_east_in_0").unwrap();
        let back = sim.vehicle_lane_position("v_east_in_1").unwrap();
        assert!(front > back);
        assert!(front - 4.5 - back >= MIN_GAP - 1e-9);
    }

    #[test]
    fn unknown_lane_and_vehicle_are_reported() {
        let sim = MicroSim::four_arm(0, 1);
        assert!(matches!(
            sim.lane_length("nope_0"),
            Err(TelemetryError::LaneUnavailable(_))
        ));
        assert!(matches!(
            sim.vehicle_lane_position("ghost"),
            Err(TelemetryError::VehicleGone(_))
        ));
    }

    #[test]
    fn set_phase_validates_signal_and_index() {
        let mut sim = MicroSim::four_arm(0, 1);
        assert!(matches!(
            sim.set_phase("B7", 0),
            Err(ControlError::NoSignal(_))
        ));
        assert!(matches!(
            sim.set_phase("A1", 9),
            Err(ControlError::InvalidPhase { .. })
        ));
        assert!(sim.set_phase("A1", 3).is_ok());
        assert_eq!(sim.phase("A1").unwrap(), 3);
    }
}
