use std::collections::HashMap;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use nebula_core::topology::{NodeKind, Topology};

// ─── Force simulation constants ───────────────────────────────

const REPULSION: f64 = 500.0;
const SPRING_K: f64 = 0.05;
const SPRING_REST: f64 = 120.0;
const CENTER_GRAVITY: f64 = 0.01;
const DAMPING: f64 = 0.9;
const ALPHA_DECAY: f64 = 0.995;
const ALPHA_MIN: f64 = 0.001;

/// Upper bound on ticks per settle; alpha reaches ALPHA_MIN well before this.
const SETTLE_TICKS: usize = 2000;

pub const CANVAS_WIDTH: f64 = 1180.0;
pub const CANVAS_HEIGHT: f64 = 780.0;
const CENTER: Vec2 = Vec2 { x: 600.0, y: 400.0 };

// ─── Vec2 ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 { Vec2::default() } else { Vec2::new(self.x / len, self.y / len) }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, o: Vec2) {
        *self = *self + o;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, o: Vec2) {
        *self = *self - o;
    }
}

// ─── Layout ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub label: String,
    pub title: String,
    pub kind: NodeKind,
    pub position: Vec2,
    velocity: Vec2,
    /// The core node stays put at the canvas center.
    pinned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    /// Index pairs into `nodes`, in topology edge order.
    pub edges: Vec<(usize, usize)>,
    alpha: f64,
}

impl Layout {
    /// Seeds positions on a spiral around the center, ordered the way the
    /// topology lists its nodes, so the same topology always lays out the
    /// same way.
    pub fn new(topology: &Topology) -> Self {
        let nodes: Vec<PlacedNode> = topology
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let pinned = n.kind == NodeKind::Core;
                PlacedNode {
                    id: n.id.clone(),
                    label: n.label.clone(),
                    title: n.title.clone(),
                    kind: n.kind,
                    position: if pinned { CENTER } else { seed_position(i) },
                    velocity: Vec2::default(),
                    pinned,
                }
            })
            .collect();

        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let edges = topology
            .edges
            .iter()
            .filter_map(|e| Some((*index.get(e.from.as_str())?, *index.get(e.to.as_str())?)))
            .collect();

        Layout { nodes, edges, alpha: 1.0 }
    }

    /// One simulation step. Returns false once the layout has cooled.
    pub fn tick(&mut self) -> bool {
        if self.alpha < ALPHA_MIN {
            return false;
        }
        apply_forces(&mut self.nodes, &self.edges, self.alpha);
        self.alpha *= ALPHA_DECAY;
        self.alpha >= ALPHA_MIN
    }

    /// Run to rest and return the number of ticks taken.
    pub fn settle(&mut self) -> usize {
        let mut ticks = 0;
        while ticks < SETTLE_TICKS && self.tick() {
            ticks += 1;
        }
        tracing::debug!(ticks, nodes = self.nodes.len(), "topology layout settled");
        ticks
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.position)
    }
}

fn seed_position(i: usize) -> Vec2 {
    const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
    let angle = i as f64 * GOLDEN_ANGLE;
    let radius = 60.0 + 72.0 * (i as f64).sqrt();
    CENTER + Vec2::new(angle.cos(), angle.sin()) * radius
}

// ─── Force-directed algorithm ─────────────────────────────────

fn apply_forces(nodes: &mut [PlacedNode], edges: &[(usize, usize)], alpha: f64) {
    let n = nodes.len();

    // 1. Repulsion between all pairs
    for a in 0..n {
        for b in (a + 1)..n {
            let delta = nodes[b].position - nodes[a].position;
            let dist = delta.length().max(1.0);
            let force = delta.normalized() * (REPULSION / (dist * dist)) * alpha;

            if !nodes[a].pinned {
                nodes[a].velocity -= force;
            }
            if !nodes[b].pinned {
                nodes[b].velocity += force;
            }
        }
    }

    // 2. Edge springs
    for &(s, d) in edges {
        let delta = nodes[d].position - nodes[s].position;
        let dist = delta.length().max(1.0);
        let force = delta.normalized() * SPRING_K * (dist - SPRING_REST) * alpha;

        if !nodes[s].pinned {
            nodes[s].velocity += force;
        }
        if !nodes[d].pinned {
            nodes[d].velocity -= force;
        }
    }

    // 3. Center gravity, then integrate with damping
    for node in nodes.iter_mut().filter(|n| !n.pinned) {
        let to_center = CENTER - node.position;
        node.velocity += to_center * CENTER_GRAVITY * alpha;
        node.velocity = node.velocity * DAMPING;
        node.position += node.velocity;

        node.position.x = node.position.x.clamp(20.0, 1160.0);
        node.position.y = node.position.y.clamp(20.0, 760.0);
    }
}

/// Compute a cubic bezier path string for an edge between two points.
pub fn bezier_path(from: Vec2, to: Vec2) -> String {
    let dx = (to.x - from.x).abs() * 0.5;
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        from.x,
        from.y,
        from.x + dx,
        from.y,
        to.x - dx,
        to.y,
        to.x,
        to.y
    )
}

pub fn node_radius(kind: NodeKind) -> f64 {
    match kind {
        NodeKind::Core => 28.0,
        NodeKind::Device => 20.0,
        NodeKind::Server => 22.0,
        NodeKind::Service => 14.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::topology::{TopologyEdge, TopologyNode, CORE_NODE_ID};

    fn node(id: &str, kind: NodeKind) -> TopologyNode {
        TopologyNode {
            id: id.to_string(),
            label: id.to_string(),
            title: String::new(),
            kind,
        }
    }

    fn edge(from: &str, to: &str) -> TopologyEdge {
        TopologyEdge { from: from.to_string(), to: to.to_string() }
    }

    fn sample() -> Topology {
        Topology {
            nodes: vec![
                node(CORE_NODE_ID, NodeKind::Core),
                node("gw", NodeKind::Device),
                node("S1", NodeKind::Server),
                node("V1", NodeKind::Service),
                node("V2", NodeKind::Service),
            ],
            edges: vec![
                edge("gw", CORE_NODE_ID),
                edge("S1", "gw"),
                edge("V1", "S1"),
                edge("V2", "S1"),
            ],
            gateway: Some("gw".to_string()),
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let mut a = Layout::new(&sample());
        let mut b = Layout::new(&sample());
        a.settle();
        b.settle();
        assert_eq!(a, b);
    }

    #[test]
    fn test_core_stays_centered() {
        let mut layout = Layout::new(&sample());
        layout.settle();
        assert_eq!(layout.position(CORE_NODE_ID), Some(CENTER));
    }

    #[test]
    fn test_settle_stays_in_bounds() {
        let mut layout = Layout::new(&sample());
        let ticks = layout.settle();
        assert!(ticks > 0 && ticks < SETTLE_TICKS);
        assert!(!layout.tick());
        for n in &layout.nodes {
            assert!((20.0..=1160.0).contains(&n.position.x), "{} x out of bounds", n.id);
            assert!((20.0..=760.0).contains(&n.position.y), "{} y out of bounds", n.id);
        }
    }

    #[test]
    fn test_edges_resolve_to_indices() {
        let mut topo = sample();
        topo.edges.push(edge("ghost", CORE_NODE_ID));
        let layout = Layout::new(&topo);
        assert_eq!(layout.edges.len(), 4);
        assert_eq!(layout.edges[1], (2, 1));
    }

    #[test]
    fn test_seeds_are_distinct() {
        let layout = Layout::new(&sample());
        for (i, a) in layout.nodes.iter().enumerate() {
            for b in &layout.nodes[i + 1..] {
                assert_ne!(a.position, b.position, "{} and {} share a seed", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_bezier_path_format() {
        let d = bezier_path(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0));
        assert_eq!(d, "M 0 0 C 50 0, 50 50, 100 50");
    }
}
