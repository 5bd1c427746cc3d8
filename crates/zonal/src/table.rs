//! CSV output for zonal result tables

use crate::accumulator::ZonalRow;
use gridstat_core::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column header of the result table
pub const TABLE_HEADER: &str = "zone,min,max,mean,count,sum";

/// Write the result rows as a CSV table.
///
/// One data row per zone in the order given (callers pass the already
/// zone-sorted output of the aggregation). An empty slice produces a
/// header-only table.
pub fn write_zonal_table<W: Write>(writer: &mut W, rows: &[ZonalRow]) -> Result<()> {
    writeln!(writer, "{}", TABLE_HEADER)?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            row.zone, row.min, row.max, row.mean, row.count, row.sum
        )?;
    }
    Ok(())
}

/// Write the result rows as a CSV file at `path`
pub fn write_zonal_table_to_path<P: AsRef<Path>>(path: P, rows: &[ZonalRow]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_zonal_table(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(zone: i32, min: f64, max: f64, mean: f64, count: u64, sum: f64) -> ZonalRow {
        ZonalRow {
            zone,
            min,
            max,
            mean,
            count,
            sum,
        }
    }

    #[test]
    fn test_empty_result_is_header_only() {
        let mut buf = Vec::new();
        write_zonal_table(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "zone,min,max,mean,count,sum\n");
    }

    #[test]
    fn test_row_formatting() {
        let rows = vec![
            row(1, 10.0, 10.0, 10.0, 4, 40.0),
            row(2, -0.5, 3.25, 1.375, 2, 2.75),
        ];

        let mut buf = Vec::new();
        write_zonal_table(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TABLE_HEADER);
        assert_eq!(lines[1], "1,10,10,10,4,40");
        assert_eq!(lines[2], "2,-0.5,3.25,1.375,2,2.75");
    }
}
