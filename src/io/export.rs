//! CSV export for solved schedules and station load profiles.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::market::report::ScheduleReport;

/// Column header for the per-vehicle schedule export.
const SCHEDULE_HEADER: &str = "vehicle,window_start,window_end,power,duration,start,end,cost,feasible";

/// Column header for the per-slot profile export.
const PROFILE_HEADER: &str = "slot,demand,price,within_cap";

/// Exports one row per vehicle to a CSV file at the given path.
///
/// Infeasible vehicles get an empty `cost` cell and `feasible = false`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_schedule_csv(report: &ScheduleReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_schedule_csv(report, io::BufWriter::new(file))
}

/// Writes the per-vehicle schedule as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_csv(report: &ScheduleReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SCHEDULE_HEADER.split(','))?;

    for v in &report.vehicles {
        wtr.write_record(&[
            v.vehicle.to_string(),
            v.window_start.to_string(),
            v.window_end.to_string(),
            v.power.to_string(),
            v.duration.to_string(),
            v.start.to_string(),
            v.end.to_string(),
            v.cost.value().map(|c| format!("{c:.4}")).unwrap_or_default(),
            v.cost.is_finite().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports one row per slot to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_profile_csv(report: &ScheduleReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_profile_csv(report, io::BufWriter::new(file))
}

/// Writes the per-slot demand and price profile as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_profile_csv(report: &ScheduleReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PROFILE_HEADER.split(','))?;

    for s in &report.slots {
        wtr.write_record(&[
            s.slot.to_string(),
            s.demand.to_string(),
            format!("{:.4}", s.price),
            s.within_cap.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{Fleet, Vehicle};
    use crate::market::{Equilibrium, MarketConfig, Schedule, Status};

    fn report(starts: Vec<usize>) -> ScheduleReport {
        let fleet = Fleet::new(vec![Vehicle::new(0, 3, 6, 2), Vehicle::new(0, 3, 6, 2)]);
        let config = MarketConfig::new(3, 1.0, 10, 1.0, 1.0);
        let eq = Equilibrium {
            schedule: Schedule::new(starts),
            sweeps: 1,
            status: Status::Converged,
        };
        ScheduleReport::from_equilibrium(&fleet, &config, &eq)
    }

    fn render(f: impl Fn(&ScheduleReport, &mut Vec<u8>) -> io::Result<()>, r: &ScheduleReport) -> String {
        let mut buf = Vec::new();
        f(r, &mut buf).expect("write to memory");
        String::from_utf8(buf).expect("utf-8")
    }

    #[test]
    fn schedule_header_and_rows() {
        let out = render(|r, w| write_schedule_csv(r, w), &report(vec![0, 2]));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], SCHEDULE_HEADER);
        assert_eq!(lines.len(), 3);
        // two slots at demand 6: 7 * 6 * 2
        assert_eq!(lines[1], "0,0,3,6,2,0,1,84.0000,true");
    }

    #[test]
    fn infeasible_cost_is_blank() {
        let out = render(|r, w| write_schedule_csv(r, w), &report(vec![1, 1]));
        let row = out.lines().nth(1).unwrap_or_default();
        assert!(row.ends_with(",,false"), "{row}");
    }

    #[test]
    fn profile_covers_every_slot() {
        let out = render(|r, w| write_profile_csv(r, w), &report(vec![0, 2]));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], PROFILE_HEADER);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "0,6,7.0000,true");
    }

    #[test]
    fn profile_rows_parse_back() {
        let out = render(|r, w| write_profile_csv(r, w), &report(vec![1, 1]));
        let mut rdr = csv::ReaderBuilder::new().from_reader(out.as_bytes());
        let caps: Vec<bool> = rdr
            .records()
            .map(|rec| rec.expect("row parses")[3].parse().expect("bool column"))
            .collect();
        assert_eq!(caps, vec![true, false, false, true]);
    }

    #[test]
    fn export_writes_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let schedule = dir.path().join("schedule.csv");
        let profile = dir.path().join("profile.csv");
        let r = report(vec![0, 2]);

        export_schedule_csv(&r, &schedule).expect("schedule export");
        export_profile_csv(&r, &profile).expect("profile export");

        let text = std::fs::read_to_string(&schedule).expect("read back");
        assert_eq!(text, render(|r, w| write_schedule_csv(r, w), &r));
        assert!(std::fs::metadata(&profile).is_ok_and(|m| m.len() > 0));
    }
}
