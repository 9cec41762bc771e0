use anyhow::Result;
use clap::Parser;
use nalgebra::Vector3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ksp_descent::astro::{CoastingVehicle, GeoSite, StateVector, SurfaceTarget};
use ksp_descent::file::{find_body, read_file};
use ksp_descent::planner::{
    ManeuverPlan, Objective, Propulsion, SearchConfiguration, TrajectorySearch,
};

/// Plans a ballistic descent from a circular equatorial orbit to a site on
/// the surface.
#[derive(Debug, Parser)]
struct Args {
    /// Table of bodies to read
    #[arg(long, default_value = "ksp-bodies.txt")]
    bodies: String,
    /// Body to land on
    #[arg(long, default_value = "Mun")]
    body: String,
    /// Altitude of the starting orbit, in meters
    #[arg(long, default_value_t = 20_000.0)]
    altitude: f64,
    /// Landing site latitude, in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    latitude: f64,
    /// Landing site longitude, in degrees
    #[arg(long, default_value_t = 45.0, allow_hyphen_values = true)]
    longitude: f64,
    /// Aim this far above the site, in meters
    #[arg(long, default_value_t = 500.0)]
    height: f64,
    #[arg(long, default_value_t = Objective::MinDeltaV)]
    objective: Objective,
    /// Samples along each axis of the search grid
    #[arg(long, default_value_t = 60)]
    steps: usize,
    /// Earliest departure, in seconds from now
    #[arg(long, default_value_t = 60.0)]
    horizon: f64,
    /// Vehicle mass, in kg
    #[arg(long, default_value_t = 5_000.0)]
    mass: f64,
    /// Available thrust, in N
    #[arg(long, default_value_t = 60_000.0)]
    thrust: f64,
    /// Specific impulse, in s
    #[arg(long, default_value_t = 320.0)]
    isp: f64,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let body = find_body(read_file(&args.bodies)?, &args.body)?;

    let radius = body.radius + args.altitude;
    let speed = (body.mu / radius).sqrt();
    let vehicle = CoastingVehicle::new(
        &body,
        0.0,
        StateVector::new(Vector3::x() * radius, Vector3::y() * speed),
    );
    let target = SurfaceTarget {
        body: body.clone(),
        site: GeoSite::new(args.latitude, args.longitude),
        height: args.height,
    };

    let config = SearchConfiguration {
        objective: args.objective,
        step_count: args.steps,
        max_search_horizon: args.horizon,
    };
    let search = TrajectorySearch::new(&vehicle, &target, body.mu);

    let mut cells = 0;
    let candidate = search.plan(0.0, &config, |_| cells += 1)?;
    info!("evaluated {} cells", cells);

    let propulsion = Propulsion {
        mass: args.mass,
        thrust: args.thrust,
        isp: args.isp,
    };
    let maneuver = ManeuverPlan::from_candidate(&candidate, &propulsion);

    println!(
        "Transfer to ({}, {}) on {}",
        target.site.latitude, target.site.longitude, body.name
    );
    println!("- Departure time: {}", candidate.departure_time);
    println!("- Flight time: {}", candidate.transfer_duration);
    println!("- Arrival time: {}", candidate.arrival_time());
    println!("- Transfer semi-major axis: {}", candidate.semimajor_axis);
    println!("- Delta-v: {}", candidate.delta_v);
    println!("- Burn start: {}", maneuver.start_time);
    println!("- Burn duration: {}", maneuver.duration);
    println!("- Burn vector: {}", maneuver.delta_v.transpose());

    Ok(())
}
