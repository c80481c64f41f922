use chrono::{DateTime, Duration, TimeZone, Utc};
use orrery::orbits::{BodyCatalog, KeplerSolver};
use orrery::transfer::{
    HohmannTransfer, TimeWindow, TransferError, TransferPlanner, load_grid, save_grid,
};

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().expect("valid date")
}

fn planner(catalog: &BodyCatalog) -> TransferPlanner<'_> {
    TransferPlanner {
        catalog,
        solver: KeplerSolver::default(),
        epoch: date(2024, 1, 1),
        trajectory_points: 50,
    }
}

#[test]
fn grid_shape_and_axis_dates() {
    let catalog = BodyCatalog::solar_system();
    let grid = planner(&catalog)
        .porkchop(
            "earth",
            "mars",
            TimeWindow::new(date(2024, 1, 1), date(2024, 12, 31)),
            TimeWindow::new(date(2024, 6, 1), date(2025, 12, 31)),
            10,
        )
        .expect("grid");
    assert_eq!(grid.resolution(), 10);
    assert_eq!(grid.arrival_dates.len(), 10);
    for table in [&grid.c3, &grid.delta_v, &grid.time_of_flight] {
        assert_eq!(table.len(), 10);
        assert!(table.iter().all(|row| row.len() == 10));
    }
    assert_eq!(grid.departure_dates[0], date(2024, 1, 1));
    assert_eq!(grid.departure_dates[9], date(2024, 12, 31));
    assert_eq!(grid.arrival_dates[9], date(2025, 12, 31));
    assert_eq!(grid.departure, "Earth");
    assert_eq!(grid.arrival, "Mars");
}

#[test]
fn feasible_cells_carry_the_hohmann_estimate() {
    let catalog = BodyCatalog::solar_system();
    let grid = planner(&catalog)
        .porkchop(
            "Earth",
            "Mars",
            TimeWindow::new(date(2024, 1, 1), date(2024, 12, 31)),
            TimeWindow::new(date(2024, 6, 1), date(2025, 12, 31)),
            12,
        )
        .expect("grid");
    let hohmann = HohmannTransfer::between(
        catalog.lookup("earth").expect("earth"),
        catalog.lookup("mars").expect("mars"),
    );

    let mut feasible = 0;
    let mut infeasible = 0;
    for cell in grid.cells() {
        let tof_days =
            (cell.arrival_date - cell.departure_date).num_milliseconds() as f64 / 86_400_000.0;
        if tof_days > 0.0 {
            feasible += 1;
            let got = cell.time_of_flight_days.expect("feasible tof");
            assert!((got - tof_days).abs() < 1e-6, "got {got} want {tof_days}");
            assert_eq!(cell.delta_v, hohmann.delta_v_total);
            assert_eq!(cell.c3, hohmann.c3);
        } else {
            infeasible += 1;
            assert!(!cell.is_feasible());
            assert_eq!(cell.delta_v, None);
            assert_eq!(cell.c3, None);
        }
    }
    assert!(feasible > 0);
    assert!(infeasible > 0, "windows overlap, so some cells must be infeasible");
}

#[test]
fn offset_windows_use_absolute_time_of_flight() {
    let catalog = BodyCatalog::solar_system();
    let grid = planner(&catalog)
        .porkchop(
            "earth",
            "mars",
            TimeWindow::new(date(2026, 1, 1), date(2026, 1, 31)),
            TimeWindow::new(date(2026, 9, 1), date(2026, 10, 1)),
            4,
        )
        .expect("grid");
    // every arrival is after every departure
    assert!(grid.cells().all(|cell| cell.is_feasible()));
    let first = grid.cell(0, 0).expect("cell");
    let expected = (date(2026, 9, 1) - date(2026, 1, 1)).num_days() as f64;
    assert!((first.time_of_flight_days.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn best_cell_prefers_the_shortest_flight_on_ties() {
    let catalog = BodyCatalog::solar_system();
    let grid = planner(&catalog)
        .porkchop(
            "earth",
            "mars",
            TimeWindow::new(date(2024, 1, 1), date(2024, 3, 1)),
            TimeWindow::new(date(2024, 8, 1), date(2024, 10, 1)),
            5,
        )
        .expect("grid");
    let best = grid.best_cell().expect("feasible cells exist");
    let min_tof = grid
        .cells()
        .filter_map(|c| c.time_of_flight_days)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(best.time_of_flight_days, Some(min_tof));
    assert_eq!(best.departure_index, 4);
    assert_eq!(best.arrival_index, 0);
}

#[test]
fn arrivals_before_departures_are_all_infeasible() {
    let catalog = BodyCatalog::solar_system();
    let grid = planner(&catalog)
        .porkchop(
            "earth",
            "mars",
            TimeWindow::new(date(2027, 1, 1), date(2027, 6, 1)),
            TimeWindow::new(date(2026, 1, 1), date(2026, 6, 1)),
            8,
        )
        .expect("grid");
    assert!(grid.cells().all(|cell| !cell.is_feasible()));
    for table in [&grid.c3, &grid.delta_v, &grid.time_of_flight] {
        assert!(table.iter().flatten().all(Option::is_none));
    }
    assert!(grid.best_cell().is_none());
}

#[test]
fn single_sample_grid_uses_window_starts() {
    let catalog = BodyCatalog::solar_system();
    let grid = planner(&catalog)
        .porkchop(
            "earth",
            "venus",
            TimeWindow::new(date(2024, 1, 1), date(2024, 6, 1)),
            TimeWindow::new(date(2024, 5, 1), date(2024, 9, 1)),
            1,
        )
        .expect("grid");
    assert_eq!(grid.resolution(), 1);
    assert_eq!(grid.departure_dates, vec![date(2024, 1, 1)]);
    assert_eq!(grid.arrival_dates, vec![date(2024, 5, 1)]);
    assert!(grid.cell(0, 0).expect("cell").is_feasible());
    assert!(grid.cell(1, 0).is_none());
}

#[test]
fn identical_windows_leave_diagonal_infeasible() {
    let catalog = BodyCatalog::solar_system();
    let window = TimeWindow::new(date(2024, 1, 1), date(2024, 2, 1));
    let grid = planner(&catalog)
        .porkchop("earth", "mars", window, window, 6)
        .expect("grid");
    for i in 0..6 {
        assert_eq!(grid.time_of_flight[i][i], None);
        if i + 1 < 6 {
            assert!(grid.time_of_flight[i][i + 1].is_some());
            assert_eq!(grid.time_of_flight[i + 1][i], None);
        }
    }
}

#[test]
fn zero_resolution_and_unknown_bodies_are_errors() {
    let catalog = BodyCatalog::solar_system();
    let window = TimeWindow::new(date(2024, 1, 1), date(2024, 2, 1));
    assert!(matches!(
        planner(&catalog).porkchop("earth", "mars", window, window, 0),
        Err(TransferError::InvalidResolution)
    ));
    assert!(matches!(
        planner(&catalog).porkchop("earth", "krypton", window, window, 4),
        Err(TransferError::InvalidBodyName(_))
    ));
}

#[test]
fn grid_survives_a_json_round_trip() {
    let catalog = BodyCatalog::solar_system();
    let grid = planner(&catalog)
        .porkchop(
            "mars",
            "jupiter",
            TimeWindow::new(date(2024, 1, 1), date(2024, 1, 1) + Duration::days(90)),
            TimeWindow::new(date(2025, 1, 1), date(2026, 1, 1)),
            6,
        )
        .expect("grid");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("grid.json");
    save_grid(&path, &grid).expect("save");
    let loaded = load_grid(&path).expect("load");
    assert_eq!(loaded.departure_dates, grid.departure_dates);
    assert_eq!(loaded.arrival_dates, grid.arrival_dates);
    for (a, b) in [
        (&loaded.c3, &grid.c3),
        (&loaded.delta_v, &grid.delta_v),
        (&loaded.time_of_flight, &grid.time_of_flight),
    ] {
        for (row_a, row_b) in a.iter().zip(b) {
            for (x, y) in row_a.iter().zip(row_b) {
                match (x, y) {
                    (Some(x), Some(y)) => assert!((x - y).abs() <= 1e-9 * y.abs()),
                    (None, None) => {}
                    other => panic!("cell mismatch: {other:?}"),
                }
            }
        }
    }
}
