use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation_engine::network::RoadNetwork;

/// A junction qualifies as the central intersection once at least this many
/// edges feed into it.
const MIN_INCOMING_EDGES: usize = 3;

/// One of the four cardinal approaches feeding the intersection.
///
/// The label names the side the traffic comes FROM, not the direction it
/// flows: the "North" approach carries vehicles flowing south. Observation
/// vectors are always ordered North, South, East, West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    pub const ALL: [Approach; 4] = [
        Approach::North,
        Approach::South,
        Approach::East,
        Approach::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Approach::North => 0,
            Approach::South => 1,
            Approach::East => 2,
            Approach::West => 3,
        }
    }

    /// Buckets a flow heading into the approach it arrives from.
    ///
    /// `degrees` must already be normalized to `[0, 360)`, with 0 pointing
    /// toward increasing x and 90 toward increasing y. The intervals are
    /// half-open; traffic flowing south (270) comes from the North:
    ///   [225, 315) -> North, [45, 135) -> South,
    ///   [135, 225) -> East,  [315, 360) and [0, 45) -> West.
    pub fn from_heading(degrees: f64) -> Approach {
        if (225.0..315.0).contains(&degrees) {
            Approach::North
        } else if (45.0..135.0).contains(&degrees) {
            Approach::South
        } else if (135.0..225.0).contains(&degrees) {
            Approach::East
        } else {
            Approach::West
        }
    }
}

/// Heading of the final segment of a polyline, in degrees normalized to
/// `[0, 360)`. Returns `None` for degenerate shapes (fewer than two points,
/// or a zero-length final segment) so such edges are dropped rather than
/// misassigned.
pub fn segment_heading(shape: &[(f64, f64)]) -> Option<f64> {
    if shape.len() < 2 {
        return None;
    }
    let (x1, y1) = shape[shape.len() - 2];
    let (x2, y2) = shape[shape.len() - 1];
    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let mut degrees = dy.atan2(dx).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    Some(degrees)
}

/// Setup failed before any ticking could begin.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("no junction with at least {MIN_INCOMING_EDGES} incoming edges")]
    NoCentralJunction,
    #[error("no approach lanes could be classified at junction {0}")]
    NoApproaches(String),
}

/// Read-only mapping from each approach to its incoming lane ids, built once
/// per topology.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneMap {
    junction_id: String,
    lanes: [Vec<String>; 4],
}

impl LaneMap {
    /// Locates the central junction and classifies its incoming edges by the
    /// heading of their final shape segment. Edges with degenerate shapes
    /// are skipped.
    pub fn classify(net: &RoadNetwork) -> Result<Self, ClassifyError> {
        let junction = net
            .junctions
            .iter()
            .find(|j| j.incoming.len() >= MIN_INCOMING_EDGES)
            .ok_or(ClassifyError::NoCentralJunction)?;

        log::info!("classifying approaches at junction {}", junction.id);

        let mut lanes: [Vec<String>; 4] = Default::default();
        for edge_id in &junction.incoming {
            let Some(edge) = net.edge(edge_id) else {
                log::warn!("incoming edge {edge_id} missing from network, skipping");
                continue;
            };
            let Some(heading) = segment_heading(&edge.shape) else {
                log::warn!("edge {edge_id} has a degenerate shape, skipping");
                continue;
            };
            let approach = Approach::from_heading(heading);
            let lane_ids: Vec<String> = edge.lanes.iter().map(|l| l.id.clone()).collect();
            log::info!(
                "mapped lanes {:?} to approach {:?} (heading {:.1})",
                lane_ids,
                approach,
                heading
            );
            lanes[approach.index()].extend(lane_ids);
        }

        if lanes.iter().all(|l| l.is_empty()) {
            return Err(ClassifyError::NoApproaches(junction.id.clone()));
        }

        Ok(Self {
            junction_id: junction.id.clone(),
            lanes,
        })
    }

    pub fn junction_id(&self) -> &str {
        &self.junction_id
    }

    pub fn lanes(&self, approach: Approach) -> &[String] {
        &self.lanes[approach.index()]
    }

    pub fn total_lanes(&self) -> usize {
        self.lanes.iter().map(|l| l.len()).sum()
    }
}
