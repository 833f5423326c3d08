//! Navigation algorithms.
//!
//! - **Proximity**: closest surface point and containing face for query points
//! - **Navigate**: best-first search over face adjacency with per-face waypoint
//!   sampling

pub mod navigate;
pub mod proximity;
