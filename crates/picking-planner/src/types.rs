//! Request, candidate and result types shared by the planner and its callers.

use picking_geometry::Point3D;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A storage location where a product can be collected.
///
/// On the wire this is `{positionId, x, y, z}`; any other fields a source
/// sends along (such as `productId`) are ignored.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Identifier of the location, unique within one product's candidates.
    pub position_id: String,
    /// Where the location is.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub point: Point3D,
}

impl Position {
    /// Construct a new position.
    pub fn new(position_id: impl Into<String>, point: Point3D) -> Self {
        Position {
            position_id: position_id.into(),
            point,
        }
    }
}

/// A position merged into the working set, tagged with the product it satisfies.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The requested product this position satisfies.
    pub product_id: String,
    /// The position itself.
    pub position: Position,
}

impl Candidate {
    /// Tag `position` with `product_id`.
    pub fn new(product_id: impl Into<String>, position: Position) -> Self {
        Candidate {
            product_id: product_id.into(),
            position,
        }
    }

    /// Location of the candidate.
    pub fn point(&self) -> Point3D {
        self.position.point
    }
}

/// A picking request that has passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PickRequest {
    /// Product ids to pick, in request order. Duplicates and unknown ids are allowed.
    pub products: Vec<String>,
    /// Where the picker starts.
    pub starting_position: Point3D,
}

/// One stop of a picking route.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickEntry {
    /// Product collected at this stop.
    pub product_id: String,
    /// Position visited.
    pub position_id: String,
}

/// A complete picking route and its travel distance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickResult {
    /// Stops in visiting order.
    pub picking_order: Vec<PickEntry>,
    /// Sum of the straight-line legs from the start through every stop.
    pub distance: f64,
}

impl PickResult {
    /// Number of stops on the route.
    pub fn len(&self) -> usize {
        self.picking_order.len()
    }

    /// Returns `true` if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.picking_order.is_empty()
    }
}
