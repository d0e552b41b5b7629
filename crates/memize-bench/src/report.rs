//! Result table

use std::fmt::Write;
use std::time::Duration;

/// One line of the comparison table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    name: String,
    ops_per_sec: f64,
    hit_ratio: Option<f64>,
    evictions: Option<u64>,
    records: Option<usize>,
}

impl Row {
    pub fn timed(name: &str, calls: usize, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let ops_per_sec = if secs > 0.0 { calls as f64 / secs } else { f64::INFINITY };

        Self {
            name: name.to_string(),
            ops_per_sec,
            hit_ratio: None,
            evictions: None,
            records: None,
        }
    }

    pub fn with_hit_ratio(mut self, ratio: f64) -> Self {
        self.hit_ratio = Some(ratio);
        self
    }

    pub fn with_evictions(mut self, evictions: u64) -> Self {
        self.evictions = Some(evictions);
        self
    }

    pub fn with_records(mut self, records: usize) -> Self {
        self.records = Some(records);
        self
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Render rows fastest first
pub fn render(rows: &[Row]) -> String {
    let mut sorted: Vec<&Row> = rows.iter().collect();
    sorted.sort_by(|a, b| b.ops_per_sec.total_cmp(&a.ops_per_sec));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>14} {:>10} {:>10} {:>8}",
        "Name", "Ops / sec", "Hit ratio", "Evictions", "Records"
    );
    for row in sorted {
        let _ = writeln!(
            out,
            "{:<12} {:>14.0} {:>10} {:>10} {:>8}",
            row.name,
            row.ops_per_sec,
            or_dash(row.hit_ratio.map(|r| format!("{:.1}%", r * 100.0))),
            or_dash(row.evictions),
            or_dash(row.records),
        );
    }
    out
}
