use std::fs;

use orrery::export::porkchop::{Record, write_header};
use orrery::export::trajectory::{Metadata, Sample, write_sidecars};

#[test]
fn porkchop_rows_leave_missing_values_empty() {
    let mut buf: Vec<u8> = Vec::new();
    write_header(&mut buf).expect("header");
    Record {
        depart_unix: 1_704_067_200,
        arrive_unix: 1_720_000_000,
        depart_utc: "2024-01-01T00:00:00+00:00",
        arrive_utc: "2024-07-03T09:46:40+00:00",
        tof_days: Some(184.407407),
        c3: Some(8_675_309.25),
        dv_total: Some(5_594.5),
        origin_body: "Earth",
        dest_body: "Mars",
    }
    .write_to(&mut buf)
    .expect("feasible row");
    Record {
        depart_unix: 1_720_000_000,
        arrive_unix: 1_704_067_200,
        depart_utc: "2024-07-03T09:46:40+00:00",
        arrive_utc: "2024-01-01T00:00:00+00:00",
        tof_days: None,
        c3: None,
        dv_total: None,
        origin_body: "Earth",
        dest_body: "Mars",
    }
    .write_to(&mut buf)
    .expect("infeasible row");

    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("depart_unix,arrive_unix,"));
    assert_eq!(lines[0].split(',').count(), 10);
    assert!(lines[1].contains(",184.407407,8675309.250,5594.500,true,Earth,Mars"));
    assert!(lines[2].ends_with(",,,,false,Earth,Mars"));
}

fn samples(duration_s: f64, n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let progress = i as f64 / (n - 1) as f64;
            Sample {
                time_s: progress * duration_s,
                progress,
                position_m: [1.5e11 * (1.0 + progress), 0.0, 0.0],
                distance_from_sun_m: 1.5e11 * (1.0 + progress),
            }
        })
        .collect()
}

fn metadata(duration_s: f64) -> Metadata<'static> {
    Metadata {
        origin: "Earth",
        destination: "Mars",
        depart_utc: "2026-11-01T00:00:00+00:00",
        arrive_utc: "2027-08-01T00:00:00+00:00",
        duration_s,
        delta_v_m_s: Some(5_594.0),
        c3_m2_s2: None,
    }
}

#[test]
fn long_flights_get_a_daily_sidecar() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out").join("earth_mars.csv");
    let duration = 10.0 * 86_400.0;
    let written = write_sidecars(&output, &metadata(duration), &samples(duration, 41))
        .expect("sidecars");
    assert_eq!(written.len(), 2);

    let full: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).expect("read")).expect("json");
    assert_eq!(full["origin"], "Earth");
    assert_eq!(full["samples"].as_array().expect("samples").len(), 41);
    assert!(full["c3_m2_s2"].is_null());

    assert!(written[1].ends_with("earth_mars_daily.json"));
    let daily: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[1]).expect("read")).expect("json");
    let days = daily["samples"].as_array().expect("samples");
    // days 0 through 10 inclusive; the final sample lands exactly on day 10
    assert_eq!(days.len(), 11);
    assert_eq!(days[10]["progress"], 1.0);
}

#[test]
fn short_flights_skip_the_daily_sidecar() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("hop.csv");
    let written = write_sidecars(&output, &metadata(3_600.0), &samples(3_600.0, 5))
        .expect("sidecars");
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("hop_trajectory.json"));
    assert!(!dir.path().join("hop_daily.json").exists());
}
