use rand::Rng;

use crate::simulation_engine::network::{EdgeKind, RoadNetwork};

/// Different types of vehicles in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Bus,
    Truck,
}

/// A vehicle scheduled to travel from one arm of the intersection to another.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    pub vehicle_type: VehicleType,
    /// Incoming edge the vehicle departs on.
    pub entry_edge: String,
    /// Outgoing edge the vehicle leaves through.
    pub exit_edge: String,
    /// Tick at which the vehicle enters the network.
    pub depart_tick: u64,
    /// Cruising speed in length-units per tick.
    pub speed: f64,
    /// Physical length in length-units.
    pub length: f64,
}

impl Vehicle {
    /// Creates a new vehicle with a predefined length based on type.
    pub fn new(
        id: String,
        vehicle_type: VehicleType,
        entry_edge: String,
        exit_edge: String,
        depart_tick: u64,
        speed: f64,
    ) -> Self {
        let length = match vehicle_type {
            VehicleType::Car => 4.5,
            VehicleType::Bus => 12.0,
            VehicleType::Truck => 16.0,
        };

        Self {
            id,
            vehicle_type,
            entry_edge,
            exit_edge,
            depart_tick,
            speed,
            length,
        }
    }
}

/// Generates a departure schedule of `count` vehicles with random entry and
/// exit arms (no U-turns), one departure per tick.
/// Car: 60%, Truck: 25%, Bus: 15%.
pub fn generate_traffic<R: Rng + ?Sized>(
    net: &RoadNetwork,
    count: usize,
    rng: &mut R,
) -> Vec<Vehicle> {
    let entries: Vec<&str> = net
        .edges
        .iter()
        .filter(|e| matches!(e.kind, EdgeKind::Incoming(_)))
        .map(|e| e.id.as_str())
        .collect();
    let exits: Vec<&str> = net
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Outgoing)
        .map(|e| e.id.as_str())
        .collect();
    if entries.is_empty() || exits.is_empty() {
        return Vec::new();
    }

    let mut vehicles = Vec::with_capacity(count);
    for i in 0..count {
        let entry = entries[rng.random_range(0..entries.len())];
        let entry_arm = entry.trim_end_matches("_in");
        let exit = loop {
            let candidate = exits[rng.random_range(0..exits.len())];
            if candidate.trim_end_matches("_out") != entry_arm {
                break candidate;
            }
        };

        let rand_val: f64 = rng.random_range(0.0..1.0);
        let vehicle_type = if rand_val < 0.60 {
            VehicleType::Car
        } else if rand_val < 0.85 {
            VehicleType::Truck
        } else {
            VehicleType::Bus
        };

        let speed = match vehicle_type {
            VehicleType::Car => rng.random_range(10.0..14.0),
            VehicleType::Bus => rng.random_range(8.0..11.0),
            VehicleType::Truck => rng.random_range(7.0..10.0),
        };

        vehicles.push(Vehicle::new(
            format!("veh{i}"),
            vehicle_type,
            entry.to_string(),
            exit.to_string(),
            i as u64,
            speed,
        ));
    }
    vehicles
}
