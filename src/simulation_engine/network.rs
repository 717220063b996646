/// Which signal axis an incoming edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachAxis {
    NorthSouth,
    EastWest,
}

/// Role of an edge relative to the central junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Feeds traffic into the junction; crossing is gated by the signal.
    Incoming(ApproachAxis),
    /// Carries traffic away from the junction to a network exit.
    Outgoing,
    /// Junction-internal connector, excluded from aggregation.
    Internal,
}

/// A single lane of an edge.
#[derive(Debug, Clone)]
pub struct Lane {
    pub id: String,
    /// Length in simulation length-units; the stop line sits at the far end.
    pub length: f64,
}

/// A directed road segment with its polyline shape and lanes.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub kind: EdgeKind,
    /// Polyline in network coordinates, ordered in the direction of flow.
    pub shape: Vec<(f64, f64)>,
    pub lanes: Vec<Lane>,
}

/// A junction and the edges that feed it.
#[derive(Debug, Clone)]
pub struct Junction {
    pub id: String,
    /// Ids of the edges whose flow terminates at this junction.
    pub incoming: Vec<String>,
    pub signalized: bool,
}

/// Static road geometry the simulation runs on.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    pub edges: Vec<Edge>,
    pub junctions: Vec<Junction>,
}

impl RoadNetwork {
    /// Builds the single four-arm intersection: one incoming and one
    /// outgoing edge per cardinal arm, straight shapes meeting at the
    /// origin, and one signal-controlled central junction.
    pub fn four_arm(arm_length: f64) -> Self {
        let l = arm_length;
        let arms: [(&str, ApproachAxis, (f64, f64)); 4] = [
            ("north", ApproachAxis::NorthSouth, (0.0, l)),
            ("south", ApproachAxis::NorthSouth, (0.0, -l)),
            ("east", ApproachAxis::EastWest, (l, 0.0)),
            ("west", ApproachAxis::EastWest, (-l, 0.0)),
        ];

        let mut edges = Vec::new();
        for (name, axis, tip) in arms {
            let in_id = format!("{name}_in");
            edges.push(Edge {
                lanes: vec![Lane {
                    id: format!("{in_id}_0"),
                    length: arm_length,
                }],
                id: in_id,
                kind: EdgeKind::Incoming(axis),
                shape: vec![tip, (0.0, 0.0)],
            });
            let out_id = format!("{name}_out");
            edges.push(Edge {
                lanes: vec![Lane {
                    id: format!("{out_id}_0"),
                    length: arm_length,
                }],
                id: out_id,
                kind: EdgeKind::Outgoing,
                shape: vec![(0.0, 0.0), tip],
            });
        }
        // Connector stubs inside the junction box.
        for i in 0..4 {
            let id = format!(":A1_{i}");
            edges.push(Edge {
                lanes: vec![Lane {
                    id: format!("{id}_0"),
                    length: 7.2,
                }],
                id,
                kind: EdgeKind::Internal,
                shape: vec![(0.0, 0.0)],
            });
        }

        let junctions = vec![Junction {
            id: "A1".to_string(),
            incoming: vec![
                "north_in".to_string(),
                "south_in".to_string(),
                "east_in".to_string(),
                "west_in".to_string(),
            ],
            signalized: true,
        }];

        Self { edges, junctions }
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    pub fn lane(&self, lane_id: &str) -> Option<&Lane> {
        self.edges
            .iter()
            .flat_map(|e| e.lanes.iter())
            .find(|l| l.id == lane_id)
    }

    /// The edge that owns a lane, if any.
    pub fn edge_of_lane(&self, lane_id: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.lanes.iter().any(|l| l.id == lane_id))
    }

    pub fn edge_ids(&self) -> Vec<String> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_arm_has_one_signalized_junction_with_four_incoming() {
        let net = RoadNetwork::four_arm(100.0);
        assert_eq!(net.junctions.len(), 1);
        let junction = &net.junctions[0];
        assert!(junction.signalized);
        assert_eq!(junction.incoming.len(), 4);
        for edge_id in &junction.incoming {
            let edge = net.edge(edge_id).expect("incoming edge exists");
            assert!(matches!(edge.kind, EdgeKind::Incoming(_)));
            assert!(edge.shape.len() >= 2);
        }
    }

    #[test]
    fn lane_lookup_resolves_owning_edge() {
        let net = RoadNetwork::four_arm(100.0);
        let lane = net.lane("north_in_0").expect("lane exists");
        assert_eq!(lane.length, 100.0);
        let edge = net.edge_of_lane("north_in_0").expect("edge exists");
        assert_eq!(edge.id, "north_in");
    }

    #[test]
    fn internal_edges_carry_reserved_prefix() {
        let net = RoadNetwork::four_arm(100.0);
        let internal: Vec<_> = net
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Internal)
            .collect();
        assert!(!internal.is_empty());
        for edge in internal {
            assert!(edge.id.starts_with(crate::simulation_engine::INTERNAL_EDGE_PREFIX));
        }
    }
}
