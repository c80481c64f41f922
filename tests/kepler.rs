use orrery::base::constants::{AU_M, MU_SUN};
use orrery::base::time::days_to_seconds;
use orrery::base::vector::{dot, norm};
use orrery::orbits::{BodyCatalog, BodyId, KeplerSolver, OrbitalElements, kepler_to_cartesian};

fn circular(a: f64, inclination: f64, period_days: f64) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: a,
        eccentricity: 0.0,
        inclination,
        mean_anomaly_epoch: 0.0,
        orbital_period: days_to_seconds(period_days),
    }
}

#[test]
fn kepler_equation_residual_is_small() {
    let solver = KeplerSolver::default();
    for &(m, e) in &[(0.3, 0.0167), (1.0, 0.5), (2.5, 0.2), (-1.2, 0.093)] {
        let ecc = solver.solve_eccentric_anomaly(m, e);
        let residual = ecc - e * ecc.sin() - m;
        assert!(residual.abs() < 1e-10, "m={m} e={e} residual={residual}");
    }
}

#[test]
fn tolerance_stops_iteration_early_without_losing_accuracy() {
    let solver = KeplerSolver {
        iterations: 50,
        tolerance: Some(1e-13),
    };
    let ecc = solver.solve_eccentric_anomaly(1.0, 0.3);
    assert!((ecc - 0.3 * ecc.sin() - 1.0).abs() < 1e-12);
}

#[test]
fn circular_orbit_returns_to_start_after_one_period() {
    let solver = KeplerSolver::default();
    let el = circular(AU_M, 0.0, 365.25);
    let start = solver.propagate_elements(&el, 0.0);
    let end = solver.propagate_elements(&el, el.orbital_period);
    for k in 0..3 {
        assert!(
            (start.position[k] - end.position[k]).abs() < 1e-6 * AU_M,
            "component {k}: {} vs {}",
            start.position[k],
            end.position[k]
        );
    }
    let speed = norm(&start.velocity);
    assert!((speed - (MU_SUN / AU_M).sqrt()).abs() < 1e-6 * speed);
}

#[test]
fn epoch_position_sits_at_perihelion_on_x_axis() {
    let catalog = BodyCatalog::solar_system();
    let earth = catalog.get(BodyId::Earth);
    let sv = kepler_to_cartesian(earth, 0.0);
    let a = earth.elements.semi_major_axis;
    let e = earth.elements.eccentricity;
    assert!((sv.position[0] - a * (1.0 - e)).abs() < 1.0);
    assert!(sv.position[1].abs() < 1e-6);
    assert!(sv.position[2].abs() < 1e-6);
}

#[test]
fn radius_stays_between_perihelion_and_aphelion() {
    let catalog = BodyCatalog::solar_system();
    let solver = KeplerSolver::default();
    let mars = catalog.get(BodyId::Mars);
    let a = mars.elements.semi_major_axis;
    let e = mars.elements.eccentricity;
    for step in 0..200 {
        let t = mars.elements.orbital_period * step as f64 / 37.0 - 1.0e8;
        let r = norm(&solver.propagate(mars, t).position);
        assert!(r >= a * (1.0 - e) * (1.0 - 1e-9), "t={t} r={r}");
        assert!(r <= a * (1.0 + e) * (1.0 + 1e-9), "t={t} r={r}");
    }
}

#[test]
fn velocity_satisfies_vis_viva() {
    let catalog = BodyCatalog::solar_system();
    let solver = KeplerSolver::default();
    let mars = catalog.get(BodyId::Mars);
    let a = mars.elements.semi_major_axis;
    for step in 0..24 {
        let t = mars.elements.orbital_period * step as f64 / 24.0;
        let sv = solver.propagate(mars, t);
        let r = norm(&sv.position);
        let v2 = dot(&sv.velocity, &sv.velocity);
        let expected = MU_SUN * (2.0 / r - 1.0 / a);
        assert!(
            ((v2 - expected) / expected).abs() < 1e-6,
            "t={t} v2={v2} expected={expected}"
        );
    }
}

#[test]
fn inclination_tilts_orbit_into_y() {
    let solver = KeplerSolver::default();
    let el = circular(AU_M, std::f64::consts::FRAC_PI_2, 100.0);
    let sv = solver.propagate_elements(&el, el.orbital_period / 4.0);
    assert!((sv.position[1] - AU_M).abs() < 1e-6 * AU_M);
    assert!(sv.position[2].abs() < 1e-6 * AU_M);
}

#[test]
fn central_body_is_fixed_at_origin() {
    let catalog = BodyCatalog::solar_system();
    let sun = catalog.get(BodyId::Sun);
    for t in [0.0, 1.0e7, -5.0e9] {
        let sv = kepler_to_cartesian(sun, t);
        assert_eq!(sv.position, [0.0; 3]);
        assert_eq!(sv.velocity, [0.0; 3]);
    }
}

#[test]
fn propagation_is_finite_far_from_epoch() {
    let catalog = BodyCatalog::solar_system();
    let solver = KeplerSolver::default();
    for body in catalog.iter() {
        for t in [-3.0e10, 1.0e11] {
            let sv = solver.propagate(body, t);
            assert!(sv.position.iter().all(|c| c.is_finite()), "{}", body.name);
            assert!(sv.velocity.iter().all(|c| c.is_finite()), "{}", body.name);
        }
    }
}

#[test]
fn catalog_bodies_repeat_after_one_period() {
    let catalog = BodyCatalog::solar_system();
    let solver = KeplerSolver::default();
    for body in catalog.iter().filter(|b| !b.is_central()) {
        let period = body.elements.orbital_period;
        let a = body.elements.semi_major_axis;
        for t in [0.0, 1.0e7, -3.0e8, 2.5 * period] {
            let now = solver.propagate(body, t).position;
            let later = solver.propagate(body, t + period).position;
            for k in 0..3 {
                assert!(
                    (now[k] - later[k]).abs() < 1e-6 * a,
                    "{} t={t} component {k}",
                    body.name
                );
            }
        }
    }
}
