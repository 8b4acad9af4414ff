use proptest::prelude::*;

use well_explorer::engine::{derive_vertical_interval, filter_by_group};
use well_explorer::record::WellRecord;

fn group_value_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[ A-Za-z]{0,12}")
}

fn records_strategy() -> impl Strategy<Value = Vec<WellRecord>> {
    proptest::collection::vec(
        (group_value_strategy(), proptest::option::of(0.0..5000.0f64)),
        0..24,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(aq_name, well_depth)| WellRecord {
                aq_name: aq_name.filter(|v| !v.trim().is_empty()),
                well_depth,
                ..WellRecord::default()
            })
            .collect()
    })
}

/// Random case flip of a selection string.
fn mangle_case(value: &str, flips: &[bool]) -> String {
    value
        .chars()
        .zip(flips.iter().cycle())
        .map(|(c, flip)| {
            if *flip {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn filtering_is_idempotent(records in records_strategy(), selection in "[ A-Za-z]{1,12}") {
        let once = filter_by_group(&records, "aq_name", Some(&selection)).unwrap();
        let twice = filter_by_group(&once, "aq_name", Some(&selection)).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filtering_ignores_case_and_surrounding_whitespace(
        records in records_strategy(),
        selection in "[A-Za-z][ A-Za-z]{0,11}",
        flips in proptest::collection::vec(any::<bool>(), 1..8),
    ) {
        let mangled = format!("  {} ", mangle_case(&selection, &flips));
        let plain = filter_by_group(&records, "aq_name", Some(&selection)).unwrap();
        let fancy = filter_by_group(&records, "aq_name", Some(&mangled)).unwrap();
        prop_assert_eq!(plain, fancy);
    }

    #[test]
    fn depth_to_water_spans_never_invert_for_non_negative_depths(
        rows in proptest::collection::vec(
            (0.0..4000.0f64, proptest::option::of(0.0..1000.0f64)),
            0..24,
        )
    ) {
        let records: Vec<WellRecord> = rows
            .into_iter()
            .map(|(well_alt, wl_dtw)| WellRecord {
                x: Some(-111.0),
                y: Some(34.0),
                well_alt: Some(well_alt),
                wl_dtw,
                ..WellRecord::default()
            })
            .collect();
        let spans = derive_vertical_interval(&records, "depth_to_water").unwrap();
        let with_depth = records.iter().filter(|r| r.wl_dtw.is_some()).count();
        prop_assert_eq!(spans.len(), with_depth);
        for span in spans {
            prop_assert!(span.bottom <= span.top);
        }
    }
}
