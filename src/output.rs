use std::path::Path;

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, info};

use crate::cache::{content_key, WorkbookCache};
use crate::error::ReportError;

/// Serialize rows to CSV bytes. The header comes from the row type, so an
/// empty sheet has no header line.
pub fn render_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, ReportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ReportError> {
    std::fs::write(path, render_csv(rows)?)?;
    Ok(())
}

/// Write a sheet, reusing the cached rendering when the content is unchanged.
pub fn write_sheet<T: Serialize>(
    cache: &mut WorkbookCache,
    path: &Path,
    sheet: &str,
    rows: &[T],
) -> Result<(), ReportError> {
    let key = content_key(sheet, &serde_json::to_string(rows)?);
    let bytes = match cache.get(key).map(<[u8]>::to_vec) {
        Some(bytes) => {
            debug!(sheet, "sheet cache hit");
            bytes
        }
        None => {
            let bytes = render_csv(rows)?;
            cache.insert(key, bytes.clone());
            bytes
        }
    };
    std::fs::write(path, bytes)?;
    info!(sheet, rows = rows.len(), path = %path.display(), "wrote sheet");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ReportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatisticRow;
    use std::time::Duration;

    fn rows() -> Vec<StatisticRow> {
        vec![StatisticRow {
            metric: "Approved".into(),
            value: "1,024".into(),
        }]
    }

    #[test]
    fn renders_csv_with_renamed_headers() {
        let bytes = render_csv(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Metric,Value\nApproved,\"1,024\"\n");
    }

    #[test]
    fn write_sheet_populates_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        let mut cache = WorkbookCache::new(4, Duration::from_secs(60));
        write_sheet(&mut cache, &path, "stats", &rows()).unwrap();
        assert_eq!(cache.len(), 1);
        write_sheet(&mut cache, &path, "stats", &rows()).unwrap();
        assert_eq!(cache.len(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Metric,Value"));
    }

    #[test]
    fn writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &rows()).unwrap();
        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back[0]["Metric"], "Approved");
    }
}
