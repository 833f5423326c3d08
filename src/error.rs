//! Error types for trinav.
//!
//! This module defines all error types used throughout the library.
//!
//! Note that an unreachable target is *not* an error: navigation reports it as
//! `Ok(None)`, since the absence of a path is a legitimate answer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`NavError`].
pub type Result<T> = std::result::Result<T, NavError>;

/// Which end of a navigation query an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The start location.
    Start,
    /// The target location.
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

/// Errors that can occur while building meshes or navigating over them.
#[derive(Error, Debug)]
pub enum NavError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge has more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// An adjacency pair references a face that does not exist, or pairs a
    /// face with itself.
    #[error("adjacency pair ({a}, {b}) is invalid for a mesh with {num_faces} faces")]
    InvalidFaceIndex {
        /// First face of the pair.
        a: usize,
        /// Second face of the pair.
        b: usize,
        /// Number of faces in the mesh.
        num_faces: usize,
    },

    /// A query point is too far from the mesh surface.
    #[error("{endpoint} location is {distance:e} away from the mesh surface (tolerance {tolerance:e})")]
    OffSurface {
        /// Which query point is off the surface.
        endpoint: Endpoint,
        /// Distance to the closest surface point.
        distance: f64,
        /// Tolerance that was exceeded.
        tolerance: f64,
    },

    /// Two faces declared adjacent do not share exactly one edge.
    #[error("faces {face} and {neighbor} are declared adjacent but do not share exactly one edge")]
    MalformedAdjacency {
        /// The face being expanded.
        face: usize,
        /// The neighbor face.
        neighbor: usize,
    },

    /// The search observed its cancellation flag.
    #[error("navigation was cancelled after expanding {expanded} nodes")]
    Cancelled {
        /// Nodes expanded before cancellation.
        expanded: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl NavError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        NavError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error is a precondition violation of the query or mesh,
    /// as opposed to an I/O or cancellation condition.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            NavError::OffSurface { .. }
                | NavError::MalformedAdjacency { .. }
                | NavError::InvalidParameter { .. }
                | NavError::EmptyMesh
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_surface_message() {
        let err = NavError::OffSurface {
            endpoint: Endpoint::Start,
            distance: 8.5,
            tolerance: 1e-6,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("start location"), "unexpected message: {}", msg);
        assert!(err.is_precondition());
    }

    #[test]
    fn test_invalid_param() {
        let err = NavError::invalid_param("surface_tolerance", -1.0, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter: surface_tolerance = -1 (must be non-negative)"
        );
    }

    #[test]
    fn test_io_is_not_precondition() {
        let err: NavError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(!err.is_precondition());
    }
}
