#![warn(missing_docs)]

//! Picking route construction.
//!
//! Given a starting point and the candidate storage positions of every
//! requested product, [`plan`] sorts the candidates once by distance to the
//! start and walks them in that order, summing the straight-line legs.
//!
//! [`collect_candidates`] gathers candidates from an asynchronous
//! [`PositionSource`], running lookups concurrently while keeping the result
//! in request order.

pub mod collect;
pub mod planner;
pub mod types;

pub use collect::{
    CollectOptions, LookupError, PositionSource, collect_candidates, resolve,
};
pub use picking_geometry::{Point3D, distance};
pub use planner::{plan, plan_candidates, rank, walk};
pub use types::{Candidate, PickEntry, PickRequest, PickResult, Position};
