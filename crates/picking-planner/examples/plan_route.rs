use std::collections::HashMap;

use picking_planner::{Point3D, Position, plan};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();

    // A small aisle: x runs along the aisle, y across it, z is shelf height.
    let mut shelves: HashMap<&str, Vec<Position>> = HashMap::new();
    shelves.insert(
        "product-1",
        vec![
            Position::new("A-01-1", Point3D::new(2.0, 0.0, 0.0)),
            Position::new("C-14-3", Point3D::new(28.0, 4.0, 2.0)),
        ],
    );
    shelves.insert(
        "product-2",
        vec![Position::new("B-07-2", Point3D::new(14.0, 2.0, 1.0))],
    );
    shelves.insert(
        "product-3",
        vec![Position::new("A-03-4", Point3D::new(6.0, 0.0, 3.0))],
    );

    let start = Point3D::new(0.0, 0.0, 0.0);
    let products = ["product-1", "product-2", "product-3", "product-unknown"];

    println!("Start: {}", start);
    println!("Requested: {:?}\n", products);

    let result = plan(&products, start, |id| {
        shelves.get(id).cloned().unwrap_or_default()
    });

    println!("Picking order:");
    for (i, stop) in result.picking_order.iter().enumerate() {
        println!("  {:>2}. {} @ {}", i + 1, stop.product_id, stop.position_id);
    }
    println!("\nTotal distance: {:.3}", result.distance);
    info!(stops = result.len(), distance = result.distance, "Route planned");
}
