//! Path planning over the surface of a navigation mesh.
//!
//! [`navigate`] resolves a start and a target location to the faces that
//! contain them, then searches the face-adjacency graph for a chain of faces
//! connecting the two, placing one waypoint in every face along the way.
//!
//! The result is a *plausible* path, not a shortest one: waypoints are sampled
//! per face (see [`SamplingMode`]) and each face is visited at most once.
//!
//! # Example
//!
//! ```
//! use trinav::prelude::*;
//! use trinav::algo::navigate::{navigate, NavigateOptions, SamplingMode};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ];
//! let mesh: TriMesh = build_from_triangles(&vertices, &[[0, 1, 2], [1, 2, 3]]).unwrap();
//!
//! let options = NavigateOptions::default().with_sampling(SamplingMode::OnEdge);
//! let path = navigate(&mesh, Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0), &options)
//!     .unwrap()
//!     .expect("faces are adjacent");
//!
//! assert_eq!(path.len(), 3);
//! ```

mod astar;
mod path;
mod sampler;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

pub use astar::{
    search_astar, Anchor, ClosedSet, NodeId, OpenSet, SearchNode, SearchResult, SearchStats,
    TARGET_SENTINEL_COST,
};
pub use path::NavPath;
pub use sampler::{
    sample_in_triangle, select_point_on_shared_edge, shared_edge, EdgeMidpoint, UniformRandom,
    WaypointSampler,
};

use crate::algo::proximity::closest_points;
use crate::error::{Endpoint, NavError, Result};
use crate::mesh::{MeshIndex, TriMesh};

/// Default distance within which a query point counts as lying on the surface.
pub const DEFAULT_SURFACE_TOLERANCE: f64 = 1e-6;

/// How a waypoint is placed in each face along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Uniformly random over the face's area. Non-deterministic unless seeded.
    #[default]
    Random,
    /// Midpoint of the current location and the target projected onto the
    /// shared edge. Deterministic.
    OnEdge,
}

/// Options for [`navigate`].
#[derive(Debug, Clone)]
pub struct NavigateOptions {
    /// Waypoint placement strategy.
    pub sampling: SamplingMode,

    /// Maximum distance between a query point and the surface.
    pub surface_tolerance: f64,

    /// Seed for [`SamplingMode::Random`]. `None` draws from system entropy.
    pub seed: Option<u64>,

    /// Cooperative cancellation flag, polled before every expansion.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            sampling: SamplingMode::default(),
            surface_tolerance: DEFAULT_SURFACE_TOLERANCE,
            seed: None,
            cancel: None,
        }
    }
}

impl NavigateOptions {
    /// Set the sampling strategy.
    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    /// Set the on-surface tolerance.
    pub fn with_surface_tolerance(mut self, tolerance: f64) -> Self {
        self.surface_tolerance = tolerance;
        self
    }

    /// Seed the random sampler for reproducible paths.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attach a cancellation flag.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn validate(&self) -> Result<()> {
        let tol = self.surface_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(NavError::invalid_param(
                "surface_tolerance",
                tol,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Plan a path on the surface of `mesh` from `start` to `target`.
///
/// Both locations must lie on the surface (within
/// [`NavigateOptions::surface_tolerance`]). If they resolve to the same face the
/// path is just `[start, target]`; otherwise the face-adjacency graph is
/// searched.
///
/// Returns `Ok(None)` when no chain of adjacent faces connects the two.
///
/// # Errors
///
/// - [`NavError::OffSurface`] if either location is too far from the mesh.
/// - [`NavError::EmptyMesh`] if the mesh has no faces.
/// - [`NavError::MalformedAdjacency`] in [`SamplingMode::OnEdge`] when two
///   declared neighbors do not share an edge.
/// - [`NavError::Cancelled`] if the cancellation flag was raised.
pub fn navigate<I: MeshIndex>(
    mesh: &TriMesh<I>,
    start: Point3<f64>,
    target: Point3<f64>,
    options: &NavigateOptions,
) -> Result<Option<NavPath<I>>> {
    options.validate()?;

    let hits = closest_points(mesh, &[start, target])?;
    for (endpoint, hit) in [(Endpoint::Start, &hits[0]), (Endpoint::Target, &hits[1])] {
        if hit.distance > options.surface_tolerance {
            return Err(NavError::OffSurface {
                endpoint,
                distance: hit.distance,
                tolerance: options.surface_tolerance,
            });
        }
    }

    let start = Anchor::new(start, hits[0].face);
    let target = Anchor::new(target, hits[1].face);
    if start.face == target.face {
        log::debug!("start and target share face {}", start.face);
        return Ok(Some(NavPath::direct(start.location, target.location, start.face)));
    }

    let cancel = options.cancel.as_deref();
    let result = match options.sampling {
        SamplingMode::Random => {
            let rng = match options.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            search_astar(mesh, start, target, &mut UniformRandom::new(rng), cancel)?
        }
        SamplingMode::OnEdge => search_astar(mesh, start, target, &mut EdgeMidpoint, cancel)?,
    };

    Ok(result.path)
}

/// Plan many independent paths over the same mesh in parallel.
///
/// Results are in query order. With a seed, query `i` uses `seed + i` so the
/// batch is reproducible regardless of thread scheduling.
pub fn navigate_batch<I: MeshIndex>(
    mesh: &TriMesh<I>,
    queries: &[(Point3<f64>, Point3<f64>)],
    options: &NavigateOptions,
) -> Vec<Result<Option<NavPath<I>>>> {
    queries
        .par_iter()
        .enumerate()
        .map(|(i, &(start, target))| {
            let mut local = options.clone();
            local.seed = options.seed.map(|s| s.wrapping_add(i as u64));
            navigate(mesh, start, target, &local)
        })
        .collect()
}
