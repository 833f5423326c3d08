//! Best-first search over the face-adjacency graph.
//!
//! Each search node commits to one sampled location inside one face. Nodes are
//! stored in a per-search arena and refer to their predecessor by index, so the
//! path is recovered by chasing parent indices from the goal back to the start.
//!
//! Admission is "first discovered wins": once a face has a node in the open or
//! closed set, later candidates for that face are dropped even when they would
//! be cheaper. This keeps each face to a single visit and is the reason the
//! returned path is plausible rather than shortest.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::ops::Index;
use std::sync::atomic::{self, AtomicBool};

use nalgebra::Point3;

use super::path::NavPath;
use super::sampler::WaypointSampler;
use crate::error::{NavError, Result};
use crate::mesh::{FaceId, MeshIndex, TriMesh};

/// Accumulated cost given to the goal placeholder. Never used for ordering.
pub const TARGET_SENTINEL_COST: f64 = 1e8;

/// Handle of a node in the search arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A committed candidate waypoint.
#[derive(Debug, Clone, Copy)]
pub struct SearchNode<I: MeshIndex = u32> {
    /// Sampled location, inside or on the boundary of `face`.
    pub location: Point3<f64>,
    /// Face the location belongs to. Node identity for de-duplication.
    pub face: FaceId<I>,
    /// Polyline length from the start node along the parent chain.
    pub g: f64,
    /// Straight-line distance from `location` to the target.
    pub h: f64,
    /// Predecessor in the arena, `None` for the start node.
    pub parent: Option<NodeId>,
}

impl<I: MeshIndex> SearchNode<I> {
    /// Ordering key of the open set.
    #[inline]
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

/// Per-search node storage.
#[derive(Debug)]
struct NodeArena<I: MeshIndex> {
    nodes: Vec<SearchNode<I>>,
}

impl<I: MeshIndex> NodeArena<I> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    fn alloc(&mut self, node: SearchNode<I>) -> NodeId {
        debug_assert!(node.parent.map_or(true, |p| p.0 < self.nodes.len()));
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Link the goal placeholder to the node that reached its face.
    fn attach(&mut self, id: NodeId, parent: NodeId) {
        debug_assert!(self.nodes[id.0].parent.is_none(), "parent assigned twice");
        self.nodes[id.0].parent = Some(parent);
    }

    /// Walk parents from `tail` to the root and return the path in forward order.
    fn reconstruct(&self, tail: NodeId) -> NavPath<I> {
        let mut waypoints = Vec::new();
        let mut faces = Vec::new();
        let mut cursor = Some(tail);

        while let Some(id) = cursor {
            let node = &self.nodes[id.0];
            waypoints.push(node.location);
            faces.push(node.face);
            cursor = node.parent;
            debug_assert!(waypoints.len() <= self.nodes.len(), "cycle in parent chain");
        }

        waypoints.reverse();
        faces.reverse();
        NavPath::new(waypoints, faces)
    }
}

impl<I: MeshIndex> Index<NodeId> for NodeArena<I> {
    type Output = SearchNode<I>;

    fn index(&self, id: NodeId) -> &SearchNode<I> {
        &self.nodes[id.0]
    }
}

/// Entry in the open set's heap.
#[derive(Debug, Clone, Copy)]
struct OpenEntry<I: MeshIndex> {
    key: f64,
    seq: u64,
    node: NodeId,
    face: FaceId<I>,
}

// Min-heap on key, FIFO among equal keys (BinaryHeap is a max-heap).
impl<I: MeshIndex> PartialEq for OpenEntry<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I: MeshIndex> Eq for OpenEntry<I> {}

impl<I: MeshIndex> PartialOrd for OpenEntry<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: MeshIndex> Ord for OpenEntry<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .partial_cmp(&self.key)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// The search frontier: a min-priority queue of nodes keyed by `g + h`, with
/// face-id membership.
///
/// A face is a member from the moment its node is pushed until it is popped.
#[derive(Debug)]
pub struct OpenSet<I: MeshIndex = u32> {
    heap: BinaryHeap<OpenEntry<I>>,
    faces: HashSet<FaceId<I>>,
    next_seq: u64,
}

impl<I: MeshIndex> Default for OpenSet<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> OpenSet<I> {
    /// Create an empty open set.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            faces: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Insert a node under the key `node.f()`.
    pub fn push(&mut self, id: NodeId, node: &SearchNode<I>) {
        self.heap.push(OpenEntry {
            key: node.f(),
            seq: self.next_seq,
            node: id,
            face: node.face,
        });
        self.faces.insert(node.face);
        self.next_seq += 1;
    }

    /// Remove and return the node with the smallest key.
    ///
    /// Among equal keys the earliest pushed comes out first.
    pub fn pop(&mut self) -> Option<NodeId> {
        let entry = self.heap.pop()?;
        self.faces.remove(&entry.face);
        Some(entry.node)
    }

    /// Whether a node for `face` is waiting in the frontier.
    #[inline]
    pub fn contains(&self, face: FaceId<I>) -> bool {
        self.faces.contains(&face)
    }

    /// Number of queued nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the frontier is exhausted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Faces whose node has already been expanded.
#[derive(Debug)]
pub struct ClosedSet<I: MeshIndex = u32> {
    faces: HashSet<FaceId<I>>,
}

impl<I: MeshIndex> Default for ClosedSet<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> ClosedSet<I> {
    /// Create an empty closed set.
    pub fn new() -> Self {
        Self {
            faces: HashSet::new(),
        }
    }

    /// Record `face` as expanded.
    pub fn insert(&mut self, face: FaceId<I>) {
        self.faces.insert(face);
    }

    /// Whether `face` has been expanded.
    #[inline]
    pub fn contains(&self, face: FaceId<I>) -> bool {
        self.faces.contains(&face)
    }

    /// Number of expanded faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Check if nothing has been expanded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// A location pinned to the face that contains it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor<I: MeshIndex = u32> {
    /// The location.
    pub location: Point3<f64>,
    /// Its face.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> Anchor<I> {
    /// Pin `location` to `face`.
    pub fn new(location: Point3<f64>, face: FaceId<I>) -> Self {
        Self { location, face }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the open set.
    pub expanded: usize,
    /// Candidates pushed to the open set, the start node included.
    pub admitted: usize,
    /// Candidates dropped because their face was already open or closed.
    pub discarded: usize,
    /// Nodes left in the open set when the search stopped.
    pub open_remaining: usize,
}

/// Outcome of [`search_astar`].
#[derive(Debug, Clone)]
pub struct SearchResult<I: MeshIndex = u32> {
    /// The path, or `None` if the target face is unreachable from the start.
    pub path: Option<NavPath<I>>,
    /// Search counters.
    pub stats: SearchStats,
}

/// Search the face-adjacency graph from `start` to `target`.
///
/// Nodes are expanded in order of `g + h`. Every neighbor of the expanded face
/// gets a waypoint from `sampler`; the candidate is kept only if its face has
/// no node in the open or closed set yet. The search succeeds when a node in
/// the target face is popped, and the target location is appended after it.
///
/// When `cancel` is given it is polled before every expansion.
///
/// # Errors
///
/// - [`NavError::InvalidParameter`] if either face is out of range.
/// - [`NavError::MalformedAdjacency`] if the sampler needs a shared edge that
///   the declared neighbors do not have.
/// - [`NavError::Cancelled`] if the flag was raised.
pub fn search_astar<I, S>(
    mesh: &TriMesh<I>,
    start: Anchor<I>,
    target: Anchor<I>,
    sampler: &mut S,
    cancel: Option<&AtomicBool>,
) -> Result<SearchResult<I>>
where
    I: MeshIndex,
    S: WaypointSampler + ?Sized,
{
    for (name, face) in [("start.face", start.face), ("target.face", target.face)] {
        if face.index() >= mesh.num_faces() {
            return Err(NavError::invalid_param(name, face, "face index out of range"));
        }
    }

    let mut arena = NodeArena::with_capacity(mesh.num_faces().min(1024) + 2);
    let mut open = OpenSet::new();
    let mut closed = ClosedSet::new();
    let mut stats = SearchStats::default();

    let start_id = arena.alloc(SearchNode {
        location: start.location,
        face: start.face,
        g: 0.0,
        h: (target.location - start.location).norm(),
        parent: None,
    });
    let goal_id = arena.alloc(SearchNode {
        location: target.location,
        face: target.face,
        g: TARGET_SENTINEL_COST,
        h: 0.0,
        parent: None,
    });
    open.push(start_id, &arena[start_id]);
    stats.admitted += 1;

    loop {
        if cancel.is_some_and(|flag| flag.load(atomic::Ordering::Relaxed)) {
            log::debug!("search cancelled after {} expansions", stats.expanded);
            return Err(NavError::Cancelled {
                expanded: stats.expanded,
            });
        }

        let Some(current_id) = open.pop() else {
            break;
        };
        let current = arena[current_id];
        closed.insert(current.face);
        stats.expanded += 1;

        if current.face == target.face {
            arena.attach(goal_id, current_id);
            let path = arena.reconstruct(goal_id);
            stats.open_remaining = open.len();
            log::debug!(
                "reached face {} with {} waypoints ({:?})",
                target.face,
                path.len(),
                stats
            );
            return Ok(SearchResult {
                path: Some(path),
                stats,
            });
        }

        let current_tri = mesh.face_positions(current.face);
        for &neighbor in mesh.face_neighbors(current.face) {
            let neighbor_tri = mesh.face_positions(neighbor);
            let location = sampler
                .sample(&current_tri, &current.location, &neighbor_tri, &target.location)
                .ok_or(NavError::MalformedAdjacency {
                    face: current.face.index(),
                    neighbor: neighbor.index(),
                })?;

            if open.contains(neighbor) || closed.contains(neighbor) {
                stats.discarded += 1;
                continue;
            }

            let node = SearchNode {
                location,
                face: neighbor,
                g: current.g + (location - current.location).norm(),
                h: (location - target.location).norm(),
                parent: Some(current_id),
            };
            log::trace!("admit face {} at f = {:.6}", neighbor, node.f());
            let id = arena.alloc(node);
            open.push(id, &arena[id]);
            stats.admitted += 1;
        }
    }

    stats.open_remaining = open.len();
    log::debug!(
        "face {} unreachable from face {} ({:?})",
        target.face,
        start.face,
        stats
    );
    Ok(SearchResult { path: None, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::navigate::sampler::{EdgeMidpoint, UniformRandom};
    use crate::mesh::{build_from_triangles, Triangle};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn node(face: usize, g: f64, h: f64) -> SearchNode {
        SearchNode {
            location: Point3::origin(),
            face: FaceId::new(face),
            g,
            h,
            parent: None,
        }
    }

    fn two_triangles() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [1, 2, 3]]).unwrap()
    }

    /// Four quadrant triangles around the origin, adjacent in a ring 0-1-2-3-0.
    fn quadrant_fan() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]]).unwrap()
    }

    /// Centroid sampling, except that one face gets scripted locations.
    struct Scripted {
        face: Triangle,
        script: Vec<Point3<f64>>,
    }

    impl WaypointSampler for Scripted {
        fn sample(
            &mut self,
            _current: &Triangle,
            _location: &Point3<f64>,
            neighbor: &Triangle,
            _target: &Point3<f64>,
        ) -> Option<Point3<f64>> {
            if *neighbor == self.face && !self.script.is_empty() {
                return Some(self.script.remove(0));
            }
            let [a, b, c] = neighbor;
            Some(Point3::from((a.coords + b.coords + c.coords) / 3.0))
        }
    }

    #[test]
    fn test_open_set_pops_minimum() {
        let mut open = OpenSet::new();
        open.push(NodeId(0), &node(0, 3.0, 1.0));
        open.push(NodeId(1), &node(1, 0.5, 0.5));
        open.push(NodeId(2), &node(2, 1.0, 1.5));

        assert_eq!(open.len(), 3);
        assert!(open.contains(FaceId::new(1)));
        assert_eq!(open.pop(), Some(NodeId(1)));
        assert!(!open.contains(FaceId::new(1)));
        assert_eq!(open.pop(), Some(NodeId(2)));
        assert_eq!(open.pop(), Some(NodeId(0)));
        assert_eq!(open.pop(), None);
        assert!(open.is_empty());
    }

    #[test]
    fn test_open_set_ties_are_fifo() {
        let mut open = OpenSet::new();
        for i in 0..5 {
            open.push(NodeId(i), &node(i, 1.0, 1.0));
        }
        for i in 0..5 {
            assert_eq!(open.pop(), Some(NodeId(i)));
        }
    }

    #[test]
    fn test_closed_set_membership() {
        let mut closed: ClosedSet = ClosedSet::new();
        assert!(closed.is_empty());
        closed.insert(FaceId::new(4));
        closed.insert(FaceId::new(4));
        assert_eq!(closed.len(), 1);
        assert!(closed.contains(FaceId::new(4)));
        assert!(!closed.contains(FaceId::new(5)));
    }

    #[test]
    fn test_arena_reconstructs_forward_order() {
        let mut arena: NodeArena<u32> = NodeArena::with_capacity(4);
        let a = arena.alloc(node(0, 0.0, 0.0));
        let goal = arena.alloc(node(9, TARGET_SENTINEL_COST, 0.0));
        let b = arena.alloc(SearchNode {
            parent: Some(a),
            ..node(1, 1.0, 0.0)
        });
        arena.attach(goal, b);

        let path = arena.reconstruct(goal);
        assert_eq!(path.faces(), &[FaceId::new(0), FaceId::new(1), FaceId::new(9)]);
    }

    #[test]
    fn test_one_step_search() {
        let mesh = two_triangles();
        let start = Anchor::new(Point3::new(0.0, 0.0, 0.0), FaceId::new(0));
        let target = Anchor::new(Point3::new(1.0, 1.0, 0.0), FaceId::new(1));

        let result = search_astar(&mesh, start, target, &mut EdgeMidpoint, None).unwrap();
        let path = result.path.unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(path.waypoints()[0], start.location);
        assert_relative_eq!(path.waypoints()[1], Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);
        assert_eq!(path.waypoints()[2], target.location);
        assert_eq!(path.faces(), &[FaceId::new(0), FaceId::new(1), FaceId::new(1)]);
        assert_eq!(result.stats.expanded, 2);
        assert_eq!(result.stats.admitted, 2);
    }

    #[test]
    fn test_same_face_search_is_direct() {
        let mesh = two_triangles();
        let start = Anchor::new(Point3::new(0.1, 0.1, 0.0), FaceId::new(0));
        let target = Anchor::new(Point3::new(0.2, 0.1, 0.0), FaceId::new(0));

        let mut sampler = UniformRandom::new(StdRng::seed_from_u64(1));
        let result = search_astar(&mesh, start, target, &mut sampler, None).unwrap();
        let path = result.path.unwrap();
        assert_eq!(path.waypoints(), &[start.location, target.location]);
        assert_eq!(result.stats.expanded, 1);
    }

    #[test]
    fn test_disconnected_exhausts_open_set() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(6.0, 5.0, 0.0),
            Point3::new(5.0, 6.0, 0.0),
        ];
        let mesh: TriMesh =
            build_from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2], [4, 5, 6]]).unwrap();
        let start = Anchor::new(Point3::new(0.1, 0.1, 0.0), FaceId::new(0));
        let target = Anchor::new(Point3::new(5.2, 5.2, 0.0), FaceId::new(2));

        let mut sampler = UniformRandom::new(StdRng::seed_from_u64(5));
        let result = search_astar(&mesh, start, target, &mut sampler, None).unwrap();

        assert!(result.path.is_none());
        assert_eq!(result.stats.open_remaining, 0);
        assert_eq!(result.stats.expanded, 2);
    }

    #[test]
    fn test_first_discovered_node_is_kept() {
        // Face 2 is first reached through face 1 with a poor waypoint at (-1, 0).
        // Face 3 later offers the target itself as a waypoint for face 2, which
        // is cheaper, but the face is already open and the candidate is dropped.
        let mesh = quadrant_fan();
        let far = Point3::new(-1.0, 0.0, 0.0);
        let near = Point3::new(-0.3, -0.3, 0.0);
        let mut sampler = Scripted {
            face: mesh.face_positions(FaceId::new(2)),
            script: vec![far, near],
        };

        let start = Anchor::new(Point3::new(0.1, 0.5, 0.0), FaceId::new(0));
        let target = Anchor::new(Point3::new(-0.3, -0.3, 0.0), FaceId::new(2));
        let result = search_astar(&mesh, start, target, &mut sampler, None).unwrap();
        let path = result.path.unwrap();

        assert_eq!(path.len(), 4);
        assert_eq!(path.faces()[1], FaceId::new(1));
        assert_eq!(path.waypoints()[2], far);
        assert!(sampler.script.is_empty(), "second candidate was never sampled");
        assert!(result.stats.discarded >= 1);

        // The discarded route would have been shorter
        let via_face_3 = (Point3::new(1.0 / 3.0, -1.0 / 3.0, 0.0) - start.location).norm()
            + (near - Point3::new(1.0 / 3.0, -1.0 / 3.0, 0.0)).norm();
        assert!(path.length() > via_face_3);
    }

    #[test]
    fn test_malformed_adjacency_in_edge_mode() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(6.0, 5.0, 0.0),
            Point3::new(5.0, 6.0, 0.0),
        ];
        let mesh: TriMesh =
            crate::mesh::build_with_adjacency(&vertices, &[[0, 1, 2], [3, 4, 5]], &[(0, 1)])
                .unwrap();
        let start = Anchor::new(Point3::new(0.1, 0.1, 0.0), FaceId::new(0));
        let target = Anchor::new(Point3::new(5.2, 5.2, 0.0), FaceId::new(1));

        let err = search_astar(&mesh, start, target, &mut EdgeMidpoint, None).unwrap_err();
        assert!(matches!(err, NavError::MalformedAdjacency { face: 0, neighbor: 1 }));

        // Random sampling never looks for the edge
        let mut sampler = UniformRandom::new(StdRng::seed_from_u64(2));
        let result = search_astar(&mesh, start, target, &mut sampler, None).unwrap();
        assert_eq!(result.path.unwrap().len(), 3);
    }

    #[test]
    fn test_cancelled_before_first_expansion() {
        let mesh = two_triangles();
        let flag = AtomicBool::new(true);
        let start = Anchor::new(Point3::origin(), FaceId::new(0));
        let target = Anchor::new(Point3::new(1.0, 1.0, 0.0), FaceId::new(1));

        let err = search_astar(&mesh, start, target, &mut EdgeMidpoint, Some(&flag)).unwrap_err();
        assert!(matches!(err, NavError::Cancelled { expanded: 0 }));
    }

    #[test]
    fn test_face_out_of_range() {
        let mesh = two_triangles();
        let start = Anchor::new(Point3::origin(), FaceId::new(0));
        let target = Anchor::new(Point3::new(1.0, 1.0, 0.0), FaceId::new(7));

        let err = search_astar(&mesh, start, target, &mut EdgeMidpoint, None).unwrap_err();
        assert!(matches!(err, NavError::InvalidParameter { name: "target.face", .. }));
    }
}
