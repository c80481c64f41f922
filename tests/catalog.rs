use orrery::config::BodyConfig;
use orrery::orbits::{BodyCatalog, BodyId, BodyKind, CatalogError};

#[test]
fn builtin_catalog_has_sun_and_eight_planets() {
    let catalog = BodyCatalog::default();
    assert_eq!(catalog.len(), 9);
    let names: Vec<&str> = catalog.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(
        names,
        ["Sun", "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]
    );
    let stars = catalog.iter().filter(|b| b.kind() == BodyKind::Star).count();
    assert_eq!(stars, 1);
    for body in catalog.iter().filter(|b| !b.is_central()) {
        assert!(body.elements.violation().is_none(), "{}", body.name);
    }
}

#[test]
fn lookup_is_case_insensitive() {
    let catalog = BodyCatalog::solar_system();
    assert_eq!(catalog.lookup("MARS").expect("mars").id, BodyId::Mars);
    assert_eq!(catalog.lookup(" earth ").expect("earth").id, BodyId::Earth);
    assert_eq!("Neptune".parse::<BodyId>().expect("parse"), BodyId::Neptune);
    assert_eq!(BodyId::Jupiter.to_string(), "jupiter");
}

#[test]
fn unknown_body_is_rejected() {
    let catalog = BodyCatalog::solar_system();
    let err = catalog.lookup("Pluto").expect_err("pluto is not in the catalog");
    assert!(err.to_string().contains("Pluto"));
}

fn mars_override() -> BodyConfig {
    BodyConfig {
        name: "mars".to_string(),
        mass_kg: 6.39e23,
        radius_km: 3389.5,
        semi_major_axis_au: 1.5,
        eccentricity: 0.1,
        inclination_deg: 0.0,
        mean_anomaly_deg: 90.0,
        orbital_period_days: 680.0,
        color: "#FF0000".to_string(),
    }
}

#[test]
fn overrides_replace_named_records() {
    let catalog = BodyCatalog::with_overrides(&[mars_override()]).expect("override");
    let mars = catalog.get(BodyId::Mars);
    assert_eq!(mars.physical.color, "#FF0000");
    assert!((mars.physical.radius - 3.3895e6).abs() < 1.0);
    assert!((mars.elements.mean_anomaly_epoch - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    // untouched bodies keep their defaults
    assert_eq!(
        catalog.get(BodyId::Earth),
        BodyCatalog::solar_system().get(BodyId::Earth)
    );
}

#[test]
fn overrides_with_bad_elements_are_rejected() {
    let mut bad = mars_override();
    bad.eccentricity = 1.2;
    match BodyCatalog::with_overrides(&[bad]) {
        Err(CatalogError::InvalidElements { body, .. }) => assert_eq!(body, "mars"),
        other => panic!("expected InvalidElements, got {other:?}"),
    }

    let mut sun = mars_override();
    sun.name = "Sun".to_string();
    sun.semi_major_axis_au = 1.0;
    sun.orbital_period_days = 365.0;
    match BodyCatalog::with_overrides(&[sun]) {
        Err(CatalogError::InvalidElements { body, .. }) => assert_eq!(body, "Sun"),
        other => panic!("expected InvalidElements, got {other:?}"),
    }

    let mut star = mars_override();
    star.name = "Sun".to_string();
    star.semi_major_axis_au = 0.0;
    star.eccentricity = 0.0;
    star.orbital_period_days = 0.0;
    let catalog = BodyCatalog::with_overrides(&[star]).expect("sun override");
    assert!(catalog.get(BodyId::Sun).is_central());

    let mut parked = mars_override();
    parked.semi_major_axis_au = 0.0;
    assert!(matches!(
        BodyCatalog::with_overrides(&[parked]),
        Err(CatalogError::InvalidElements { .. })
    ));

    let mut unknown = mars_override();
    unknown.name = "Vulcan".to_string();
    assert!(matches!(
        BodyCatalog::with_overrides(&[unknown]),
        Err(CatalogError::UnknownBody(_))
    ));
}
