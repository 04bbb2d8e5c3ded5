//! DBSCAN, OPTICS and Xi on a simple 2D dataset.
//!
//! Run with `RUST_LOG=density_order=debug` to see the algorithms' events.

use density_order::cluster::{
    Clustering, Dbscan, LinearScan, LogProgress, OpticsXi, Points, NOISE,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three well-separated clusters in 2D, one of them denser.
    let data: Vec<Vec<f64>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0)), looser
        vec![10.0, 0.0],
        vec![10.6, 0.4],
        vec![9.5, -0.5],
        vec![10.4, 0.9],
        // Outlier
        vec![20.0, 20.0],
    ];

    // --- DBSCAN (eps=1.0, min_pts=2) ---
    let dbscan = Dbscan::new(1.0, 2);
    let labels = dbscan.fit_predict(&data).unwrap();
    println!("=== DBSCAN (eps=1.0, min_pts=2) ===");
    for (i, label) in labels.iter().enumerate() {
        let tag = if *label == NOISE {
            "NOISE".to_string()
        } else {
            format!("cluster {}", label)
        };
        println!("  point {:2} ({:5.1}, {:5.1}) => {}", i, data[i][0], data[i][1], tag);
    }

    // --- OPTICS + Xi ---
    let query = LinearScan::new(Points::euclidean(&data).unwrap());
    let pipeline = OpticsXi::new(f64::INFINITY, 2, 0.1);
    let (order, xi) = pipeline
        .fit_with_progress(&query, LogProgress::new("optics", 5))
        .unwrap();

    println!("\n=== OPTICS cluster order (min_pts=2) ===");
    for e in order.iter() {
        let pred = e
            .predecessor
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:>4} from {:>4}  reachability {:8.3}", e.id.to_string(), pred, e.reachability);
    }

    println!("\n=== Xi hierarchy (xi=0.1) ===");
    let h = &xi.hierarchy;
    let mut stack: Vec<(usize, usize)> = h.roots().iter().rev().map(|&r| (r, 0)).collect();
    while let Some((i, depth)) = stack.pop() {
        let c = h.get(i).unwrap();
        let members: Vec<String> = c.members.iter().map(|id| id.to_string()).collect();
        println!(
            "  {}{}{} [{}]",
            "  ".repeat(depth),
            c.name,
            if c.noise { " (noise)" } else { "" },
            members.join(", ")
        );
        stack.extend(h.children(i).iter().rev().map(|&ch| (ch, depth + 1)));
    }
}
