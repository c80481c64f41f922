//! Export helpers for CSV and JSON artifacts.

pub mod porkchop {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    const HEADER: &str = "depart_unix,arrive_unix,depart_utc,arrive_utc,tof_days,c3_m2_s2,dv_total_m_s,feasible,origin_body,dest_body";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the standard porkchop CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted by the porkchop exporter. `None` values become empty fields.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub depart_unix: i64,
        pub arrive_unix: i64,
        pub depart_utc: &'a str,
        pub arrive_utc: &'a str,
        pub tof_days: Option<f64>,
        pub c3: Option<f64>,
        pub dv_total: Option<f64>,
        pub origin_body: &'a str,
        pub dest_body: &'a str,
    }

    impl Record<'_> {
        /// Serialize the record to CSV, matching the standard header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{}",
                self.depart_unix,
                self.arrive_unix,
                self.depart_utc,
                self.arrive_utc,
                fmt_opt(self.tof_days, 6),
                fmt_opt(self.c3, 3),
                fmt_opt(self.dv_total, 3),
                if self.tof_days.is_some() { "true" } else { "false" },
                self.origin_body,
                self.dest_body,
            )
        }
    }

    fn fmt_opt(value: Option<f64>, precision: usize) -> String {
        match value {
            Some(v) => format!("{v:.precision$}"),
            None => String::new(),
        }
    }
}

pub mod trajectory {
    use orrery_core::constants::SECONDS_PER_DAY;
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::{Path, PathBuf};

    /// Trajectory sample used in exported JSON sidecars.
    #[derive(Debug, Clone, Serialize)]
    pub struct Sample {
        /// Seconds since departure.
        pub time_s: f64,
        pub progress: f64,
        pub position_m: [f64; 3],
        pub distance_from_sun_m: f64,
    }

    /// Metadata describing the exported transfer.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub origin: &'a str,
        pub destination: &'a str,
        pub depart_utc: &'a str,
        pub arrive_utc: &'a str,
        pub duration_s: f64,
        pub delta_v_m_s: Option<f64>,
        pub c3_m2_s2: Option<f64>,
    }

    #[derive(Serialize)]
    struct TrajectorySidecar<'a> {
        origin: &'a str,
        destination: &'a str,
        depart_utc: &'a str,
        arrive_utc: &'a str,
        duration_s: f64,
        delta_v_m_s: Option<f64>,
        c3_m2_s2: Option<f64>,
        samples: &'a [Sample],
    }

    #[derive(Serialize)]
    struct DailySidecar<'a> {
        origin: &'a str,
        destination: &'a str,
        depart_utc: &'a str,
        arrive_utc: &'a str,
        samples: Vec<DailyAggregate>,
    }

    #[derive(Serialize)]
    struct DailyAggregate {
        day_index: usize,
        time_s: f64,
        progress: f64,
        position_m: [f64; 3],
    }

    /// Write the full trajectory sidecar and, for flights of a day or more, a
    /// per-day aggregate next to it. Returns the paths written.
    pub fn write_sidecars(
        output: &Path,
        meta: &Metadata<'_>,
        samples: &[Sample],
    ) -> io::Result<Vec<PathBuf>> {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("trajectory");

        let full_path = parent.join(format!("{}_trajectory.json", stem));
        let daily_path = parent.join(format!("{}_daily.json", stem));
        let mut written = Vec::new();

        let full = TrajectorySidecar {
            origin: meta.origin,
            destination: meta.destination,
            depart_utc: meta.depart_utc,
            arrive_utc: meta.arrive_utc,
            duration_s: meta.duration_s,
            delta_v_m_s: meta.delta_v_m_s,
            c3_m2_s2: meta.c3_m2_s2,
            samples,
        };
        to_writer_pretty(File::create(&full_path)?, &full)?;
        written.push(full_path);

        if meta.duration_s >= SECONDS_PER_DAY {
            let daily = DailySidecar {
                origin: meta.origin,
                destination: meta.destination,
                depart_utc: meta.depart_utc,
                arrive_utc: meta.arrive_utc,
                samples: aggregate_daily(samples),
            };
            to_writer_pretty(File::create(&daily_path)?, &daily)?;
            written.push(daily_path);
        }

        Ok(written)
    }

    /// Keep the last sample of each elapsed day.
    fn aggregate_daily(samples: &[Sample]) -> Vec<DailyAggregate> {
        let mut daily: Vec<DailyAggregate> = Vec::new();
        for sample in samples {
            let day_index = (sample.time_s / SECONDS_PER_DAY).floor().max(0.0) as usize;
            match daily.last_mut() {
                Some(last) if last.day_index == day_index => {
                    last.time_s = sample.time_s;
                    last.progress = sample.progress;
                    last.position_m = sample.position_m;
                }
                _ => daily.push(DailyAggregate {
                    day_index,
                    time_s: sample.time_s,
                    progress: sample.progress,
                    position_m: sample.position_m,
                }),
            }
        }
        daily
    }
}
