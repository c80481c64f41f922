use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;

const HEADER: &str = "depart_unix,arrive_unix,depart_utc,arrive_utc,tof_days,c3_m2_s2,dv_total_m_s,feasible,origin_body,dest_body";

#[test]
fn porkchop_plot_renders_generated_grid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("pork.csv");

    // Overlapping windows leave the lower-right corner infeasible.
    Command::cargo_bin("porkchop")
        .expect("porkchop bin")
        .args([
            "--from",
            "Earth",
            "--to",
            "Mars",
            "--depart-start",
            "2026-09-01",
            "--depart-end",
            "2027-03-01",
            "--arrive-start",
            "2026-12-01",
            "--arrive-end",
            "2027-09-01",
            "--resolution",
            "8",
            "--output",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    for metric in ["tof", "dv"] {
        let png_path = dir.path().join(format!("plots/pork_{metric}.png"));
        Command::cargo_bin("porkchop_plot")
            .expect("porkchop_plot bin")
            .args([
                "--input",
                csv_path.to_str().unwrap(),
                "--output",
                png_path.to_str().unwrap(),
                "--metric",
                metric,
                "--width",
                "400",
                "--height",
                "300",
            ])
            .assert()
            .success();

        let metadata = fs::metadata(&png_path).expect("png metadata");
        assert!(metadata.len() > 0, "{metric} PNG should not be empty");
    }
}

#[test]
fn porkchop_plot_requires_feasible_cells() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("pork.csv");
    let png_path = dir.path().join("pork.png");

    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..3 {
        let depart = 1_800_000_000 + i * 86_400;
        let arrive = depart - 86_400;
        writeln!(file, "{depart},{arrive},D,A,,,,false,Earth,Mars").unwrap();
    }
    drop(file);

    Command::cargo_bin("porkchop_plot")
        .expect("porkchop_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No feasible cells"));
    assert!(!png_path.exists());
}

#[test]
fn porkchop_plot_reports_missing_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("old.csv");
    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "depart_et,arrive_et,feasible,dv_total_km_s").unwrap();
    writeln!(file, "1.0e8,1.2e8,true,5.6").unwrap();
    drop(file);

    Command::cargo_bin("porkchop_plot")
        .expect("porkchop_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            dir.path().join("old.png").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depart_unix"));
}

#[test]
fn porkchop_plot_rejects_unknown_metric() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("pork.csv");
    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "{HEADER}").unwrap();
    writeln!(
        file,
        "1800000000,1820000000,D,A,231.481481,8675309.000,5594.000,true,Earth,Mars"
    )
    .unwrap();
    drop(file);

    Command::cargo_bin("porkchop_plot")
        .expect("porkchop_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            dir.path().join("pork.png").to_str().unwrap(),
            "--metric",
            "vinf_arr",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vinf_arr"));
}
