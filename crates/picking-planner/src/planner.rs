//! Route construction: rank candidates by distance to the start, then walk them.

/*

Picking route = sort once, then walk.

    candidates = every position of every requested product, in request order
    sort candidates by distance(start, candidate), stable
    current = start, total = 0
    for c in candidates:
        total += distance(current, c)
        current = c

Ranking is relative to the start only. Remaining candidates are never
re-ranked from the current position, so this is not nearest-neighbour
routing and makes no optimality claim.

*/

use picking_geometry::{Point3D, distance};
use tracing::debug;

use crate::types::{Candidate, PickEntry, PickRequest, PickResult, Position};

/// Build a picking route for `products` starting at `start`.
///
/// `lookup` is called once per entry of `products`, in order, and returns the
/// candidate positions of that product. An empty result means the product
/// contributes nothing to the route. `lookup` must not fail; callers backed
/// by fallible sources map failures to an empty result before handing the
/// closure in.
///
/// # Arguments
/// * `products` - Requested product ids. Duplicates are looked up once per occurrence.
/// * `start` - Where the picker starts.
/// * `lookup` - Resolves a product id to its candidate positions.
pub fn plan<S, F>(products: &[S], start: Point3D, mut lookup: F) -> PickResult
where
    S: AsRef<str>,
    F: FnMut(&str) -> Vec<Position>,
{
    let mut candidates = Vec::new();
    for product_id in products {
        let product_id = product_id.as_ref();
        candidates.extend(
            lookup(product_id)
                .into_iter()
                .map(|position| Candidate::new(product_id, position)),
        );
    }
    plan_candidates(start, candidates)
}

impl PickRequest {
    /// Plan this request with `lookup`. See [`plan`].
    pub fn plan<F>(&self, lookup: F) -> PickResult
    where
        F: FnMut(&str) -> Vec<Position>,
    {
        plan(&self.products, self.starting_position, lookup)
    }
}

/// Rank and walk an already collected candidate set.
///
/// `candidates` must be in collect order (request order, then source order
/// within a product) since that order breaks distance ties.
pub fn plan_candidates(start: Point3D, mut candidates: Vec<Candidate>) -> PickResult {
    rank(start, &mut candidates);
    let result = walk(start, &candidates);
    debug!(
        stops = result.len(),
        distance = result.distance,
        %start,
        "Planned picking route"
    );
    result
}

/// Stable sort of `candidates` by ascending distance to `start`.
///
/// Equal distances keep their relative order. NaN distances are ordered by
/// `f64::total_cmp` instead of panicking.
pub fn rank(start: Point3D, candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        distance(start, a.point()).total_cmp(&distance(start, b.point()))
    });
}

/// Visit `ranked` in order from `start`, accumulating leg distances.
pub fn walk(start: Point3D, ranked: &[Candidate]) -> PickResult {
    let mut current = start;
    let mut total = 0.0;
    let mut picking_order = Vec::with_capacity(ranked.len());

    for candidate in ranked {
        total += distance(current, candidate.point());
        current = candidate.point();
        picking_order.push(PickEntry {
            product_id: candidate.product_id.clone(),
            position_id: candidate.position.position_id.clone(),
        });
    }

    PickResult {
        picking_order,
        distance: total,
    }
}
