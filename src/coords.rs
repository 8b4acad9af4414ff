//! Planar coordinate derivation for well records.
//!
//! The well extract carries longitude/latitude in decimal degrees; the
//! plotting layers expect planar `x`/`y` columns. These are straight copies
//! of lon/lat, never a reprojection.

use crate::record::WellTable;

/// Fills missing `x`/`y` from longitude/latitude.
///
/// Idempotent: records that already carry planar coordinates keep them.
/// Records without either source stay without coordinates; the profiling
/// operations enforce their own null handling.
pub fn normalize(table: WellTable) -> WellTable {
    let columns = table.columns().to_vec();
    let records = table
        .records()
        .iter()
        .cloned()
        .map(|mut record| {
            if record.x.is_none() {
                record.x = record.longitude;
            }
            if record.y.is_none() {
                record.y = record.latitude;
            }
            record
        })
        .collect();
    WellTable::new(records, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{WellColumn, WellRecord};

    fn table_with(record: WellRecord) -> WellTable {
        WellTable::new(
            vec![record],
            vec![WellColumn::Longitude, WellColumn::Latitude],
        )
    }

    #[test]
    fn derives_planar_coordinates_from_lon_lat() {
        let table = table_with(WellRecord {
            longitude: Some(-111.5),
            latitude: Some(34.2),
            ..WellRecord::default()
        });
        let normalized = normalize(table);
        assert_eq!(normalized.records()[0].x, Some(-111.5));
        assert_eq!(normalized.records()[0].y, Some(34.2));
    }

    #[test]
    fn existing_coordinates_are_never_overwritten() {
        let table = table_with(WellRecord {
            longitude: Some(-111.5),
            latitude: Some(34.2),
            x: Some(-110.0),
            y: Some(33.0),
            ..WellRecord::default()
        });
        let normalized = normalize(table);
        assert_eq!(normalized.records()[0].x, Some(-110.0));
        assert_eq!(normalized.records()[0].y, Some(33.0));
    }

    #[test]
    fn normalize_is_idempotent() {
        let table = table_with(WellRecord {
            longitude: Some(-112.0),
            latitude: Some(35.0),
            ..WellRecord::default()
        });
        let once = normalize(table);
        let twice = normalize(once.clone());
        assert_eq!(once.records(), twice.records());
    }

    #[test]
    fn missing_sources_leave_coordinates_absent() {
        let table = table_with(WellRecord::default());
        let normalized = normalize(table);
        assert_eq!(normalized.records()[0].x, None);
        assert_eq!(normalized.records()[0].y, None);
    }
}
