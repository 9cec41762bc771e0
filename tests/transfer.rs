use approx::assert_relative_eq;
use nalgebra::Vector3;

use ksp_descent::astro::{
    CentralBody, CoastingVehicle, GeoSite, StateVector, SurfaceTarget, TargetEphemeris,
    VehicleEphemeris,
};
use ksp_descent::consts::{MUN_MU, MUN_RADIUS, MUN_ROTATION_PERIOD};
use ksp_descent::error::PlannerError;
use ksp_descent::planner::{
    BrakingGuidance, CellOutcome, LambertProblem, ManeuverPlan, Objective, Propulsion,
    SearchConfiguration, TrajectorySearch,
};

const ORBIT_ALTITUDE: f64 = 20_000.0;

fn mun() -> CentralBody {
    CentralBody {
        name: "Mun".to_owned(),
        mu: MUN_MU,
        radius: MUN_RADIUS,
        rotation_period: MUN_ROTATION_PERIOD,
    }
}

/// Circular equatorial orbit 20 km up, heading east.
fn orbiting_vehicle() -> CoastingVehicle {
    let radius = MUN_RADIUS + ORBIT_ALTITUDE;
    let speed = (MUN_MU / radius).sqrt();
    CoastingVehicle::new(
        &mun(),
        0.0,
        StateVector::new(Vector3::x() * radius, Vector3::y() * speed),
    )
}

fn landing_site() -> SurfaceTarget {
    SurfaceTarget {
        body: mun(),
        site: GeoSite::new(0.0, 45.0),
        height: 500.0,
    }
}

fn config(objective: Objective) -> SearchConfiguration {
    SearchConfiguration {
        objective,
        step_count: 24,
        max_search_horizon: 60.0,
    }
}

#[test]
fn test_plan_descent_to_mun() {
    let vehicle = orbiting_vehicle();
    let target = landing_site();
    let search = TrajectorySearch::new(&vehicle, &target, MUN_MU);

    let mut cells = 0;
    let mut feasible = 0;
    let candidate = search
        .plan(0.0, &config(Objective::MinDeltaV), |report| {
            cells += 1;
            if let CellOutcome::Feasible { .. } = report.outcome {
                feasible += 1;
            }
        })
        .unwrap();
    assert_eq!(cells, 24 * 24);
    assert!(feasible > 0);

    // Departure is after the horizon, and within the next orbit
    let radius = MUN_RADIUS + ORBIT_ALTITUDE;
    let period = 2.0 * std::f64::consts::PI * (radius.powi(3) / MUN_MU).sqrt();
    assert!(candidate.departure_time >= 60.0);
    assert!(candidate.departure_time < 60.0 + period);

    // The transfer is inside the feasible window for its own geometry
    let departure = vehicle.state_at(candidate.departure_time).unwrap();
    let arrival_target = target.position_at(candidate.arrival_time());
    let normal = departure.angular_momentum();
    let problem = LambertProblem::new(departure.position, arrival_target, &normal, MUN_MU);
    assert!(problem
        .feasible_window()
        .contains_strictly(candidate.transfer_duration));

    assert_relative_eq!(
        candidate.delta_v,
        (candidate.departure_velocity - departure.velocity).norm(),
        max_relative = 1e-12
    );

    // Flying the burn actually gets us to the site
    let coasted = StateVector::new(departure.position, candidate.departure_velocity)
        .propagate(&mun(), candidate.transfer_duration)
        .unwrap();
    let miss = (coasted.position - arrival_target).norm();
    assert!(miss < 0.01 * MUN_RADIUS, "missed by {} m", miss);

    // And sizing the burn is consistent with the estimator
    let propulsion = Propulsion {
        mass: 5_000.0,
        thrust: 60_000.0,
        isp: 320.0,
    };
    let maneuver = ManeuverPlan::from_candidate(&candidate, &propulsion);
    assert!(maneuver.duration > 0.0);
    assert!(maneuver.start_time < candidate.departure_time);
    assert_relative_eq!(maneuver.duration, propulsion.burn_duration(candidate.delta_v));
}

#[test]
fn test_objectives_rank_consistently() {
    let vehicle = orbiting_vehicle();
    let target = landing_site();
    let search = TrajectorySearch::new(&vehicle, &target, MUN_MU);

    let first = search.plan(0.0, &config(Objective::FirstFeasible), |_| {}).unwrap();
    let cheapest = search.plan(0.0, &config(Objective::MinDeltaV), |_| {}).unwrap();
    let fastest = search.plan(0.0, &config(Objective::MinTransferTime), |_| {}).unwrap();

    let start = 60.0;
    assert!(cheapest.delta_v <= first.delta_v);
    assert!(cheapest.delta_v <= fastest.delta_v);
    assert!(fastest.elapsed_since(start) <= cheapest.elapsed_since(start));
    assert!(fastest.elapsed_since(start) <= first.elapsed_since(start));
}

#[test]
fn test_escaping_vehicle_is_rejected() {
    let radius = MUN_RADIUS + ORBIT_ALTITUDE;
    let escape = (2.0 * MUN_MU / radius).sqrt();
    let vehicle = CoastingVehicle::new(
        &mun(),
        0.0,
        StateVector::new(Vector3::x() * radius, Vector3::y() * escape * 1.2),
    );
    let target = landing_site();
    let search = TrajectorySearch::new(&vehicle, &target, MUN_MU);

    assert!(matches!(
        search.plan(0.0, &config(Objective::MinDeltaV), |_| {}),
        Err(PlannerError::UnboundOrbit { .. })
    ));
}

#[test]
fn test_guidance_holds_course_on_transfer() {
    let vehicle = orbiting_vehicle();
    let target = landing_site();
    let search = TrajectorySearch::new(&vehicle, &target, MUN_MU);
    let candidate = search.plan(0.0, &config(Objective::MinDeltaV), |_| {}).unwrap();

    // Pretend the burn happened instantly, and we're now coasting on the
    // transfer orbit
    let departure = vehicle.state_at(candidate.departure_time).unwrap();
    let on_transfer = CoastingVehicle::new(
        &mun(),
        candidate.departure_time,
        StateVector::new(departure.position, candidate.departure_velocity),
    );
    let guided = TrajectorySearch::new(&on_transfer, &target, MUN_MU);

    let mut guidance = BrakingGuidance::new(candidate.departure_time, candidate.transfer_duration);
    for k in 1..=10 {
        let now = candidate.departure_time + 5.0 * k as f64;
        let command = guidance.step(&guided, now, |_| {}).unwrap();

        // Already on course, so only small corrections are needed
        let speed = on_transfer.state_at(now).unwrap().velocity.norm();
        assert!(command.velocity_change.norm() < 0.01 * speed);
        assert_relative_eq!(
            guidance.arrival_time(),
            candidate.arrival_time(),
            max_relative = 1e-12
        );
    }
}
