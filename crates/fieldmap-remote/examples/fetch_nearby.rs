//! Example: Fetch sites near a coordinate from the public sites database.
//!
//! Usage: cargo run --example fetch_nearby -- <lat> <lon>
//!
//! Set RUST_LOG=debug to watch the coordinator issue the fetch.

use crossbeam_channel::{unbounded, Sender};
use fieldmap_core::{
    AnnotationSink, CoordinatorConfig, FetchError, MapSession, SiteAnnotation,
};
use fieldmap_geo::GeoPoint;
use fieldmap_remote::{HttpSiteService, DEFAULT_ENDPOINT};
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Prints annotations as they arrive and signals the main thread when the
/// round is over.
struct PrintSink {
    done: Sender<usize>,
}

impl AnnotationSink for PrintSink {
    fn add_annotations(&mut self, annotations: &[SiteAnnotation]) {
        for annotation in annotations {
            let location = annotation.location();
            println!(
                "{:<16} {:<32} ({:.4}, {:.4})",
                annotation.title(),
                annotation.subtitle(),
                location.latitude,
                location.longitude
            );
        }
        let _ = self.done.send(annotations.len());
    }

    fn fetch_failed(&mut self, error: &FetchError) {
        eprintln!("Fetch failed: {}", error);
        let _ = self.done.send(0);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <lat> <lon>", args[0]);
        eprintln!("Example: {} 40.7596 -111.8867", args[0]);
        std::process::exit(1);
    }

    let lat: f64 = args[1].parse().expect("Invalid latitude");
    let lon: f64 = args[2].parse().expect("Invalid longitude");

    let service = match HttpSiteService::new(DEFAULT_ENDPOINT) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (done_tx, done_rx) = unbounded();
    let session = MapSession::spawn(
        CoordinatorConfig::default(),
        service,
        PrintSink { done: done_tx },
    );

    // A repeated fix is trivially stable and triggers the initial fetch.
    let fix = GeoPoint::new(lat, lon);
    session.update_location(fix);
    session.update_location(fix);

    match done_rx.recv_timeout(Duration::from_secs(60)) {
        Ok(count) => println!("\n{} site(s) within 10 km", count),
        Err(_) => eprintln!("Timed out waiting for the sites database"),
    }

    session.shutdown();
}
