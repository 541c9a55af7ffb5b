//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business
//! logic with output formatting. Lenses are designed to be reusable across
//! different interfaces (CLI, REST API, GUI).
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `TopologyLens`) - the main entry point for all operations
//! - **Args structs** - input arguments for lens methods
//! - **Output types** - return types for callers to consume
//!
//! Internal implementation details (HTTP plumbing, helper functions) are kept
//! private within each lens module. External users should only interact
//! through the lens.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pathlens::lens::topology::{PathQuery, TopologyClient, TopologyLens};
//! ```

// TopologyLens - upstream path fetch and device correlation
pub mod topology;
