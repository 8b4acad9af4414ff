mod common;

use common::fixture_path;

use well_explorer::catalog::LabelCatalog;
use well_explorer::coords;
use well_explorer::engine::{
    self, UNCLASSIFIED_WATER_USE, derive_vertical_interval, filter_by_group, join_water_use,
    summary_stats,
};
use well_explorer::record::{WaterUseTable, WellColumn, WellTable};

fn load_fixture_wells() -> WellTable {
    let table = WellTable::from_csv_path(&fixture_path("wells.csv"), None).expect("load wells");
    coords::normalize(table)
}

#[test]
fn loader_canonicalizes_uppercase_headers() {
    let wells = load_fixture_wells();
    assert_eq!(wells.len(), 5);
    assert!(wells.has_column(WellColumn::SiteId));
    assert!(wells.has_column(WellColumn::ObjectId));
    assert!(wells.has_column(WellColumn::AqName));
    assert!(!wells.has_column(WellColumn::WaterUse));
    assert_eq!(wells.columns().len(), 12);
}

#[test]
fn coordinates_derive_from_decimal_degrees() {
    let wells = load_fixture_wells();
    let first = &wells.records()[0];
    assert_eq!(first.x, Some(-111.85));
    assert_eq!(first.y, Some(33.4));
}

#[test]
fn grouped_stats_exclude_null_groups_and_null_values() {
    let wells = load_fixture_wells();
    let rows = summary_stats(&wells, "well_depth", "aq_name").expect("stats");

    // A-004 has an empty aquifer name and is excluded from grouping.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].group, "Basin Fill");
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].mean, Some(260.0));
    assert_eq!(rows[0].min, Some(220.0));
    assert_eq!(rows[0].max, Some(300.0));
    assert_eq!(rows[1].group, "Fractured Rock");
    assert_eq!(rows[1].count, 1);
    assert_eq!(rows[1].std_dev, None);
}

#[test]
fn grouped_stats_merge_case_variant_spellings() {
    let wells = load_fixture_wells();
    let rows = summary_stats(&wells, "well_depth", "unit_name").expect("stats");

    assert_eq!(rows.len(), 3);
    let granite = rows
        .iter()
        .find(|r| r.group.eq_ignore_ascii_case("granite"))
        .expect("granite group");
    assert_eq!(granite.count, 2);
    assert_eq!(granite.mean, Some(415.0));
}

#[test]
fn filtering_matches_stored_values_with_trailing_whitespace() {
    let wells = load_fixture_wells();
    let filtered = filter_by_group(
        wells.records(),
        "unit_name",
        Some("Cretaceous Sedimentary Rocks"),
    )
    .expect("filter");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].site_id.as_deref(), Some("A-003"));
}

#[test]
fn join_assigns_water_use_and_preserves_unmatched_records() {
    let wells = load_fixture_wells();
    let metadata = WaterUseTable::from_csv_path(&fixture_path("wells_metadata.csv"), None)
        .expect("load metadata");
    assert_eq!(metadata.len(), 3);

    let joined = join_water_use(&wells, &metadata).expect("join");
    assert_eq!(joined.len(), 5);
    assert!(joined.has_column(WellColumn::WaterUse));

    let uses: Vec<Option<&str>> = joined
        .records()
        .iter()
        .map(|r| r.water_use.as_deref())
        .collect();
    assert_eq!(
        uses,
        vec![
            Some("Irrigation"),
            Some("Domestic"),
            None,
            Some("Stock"),
            None
        ]
    );
}

#[test]
fn profile_pipeline_drops_incomplete_rows_and_groups_by_water_use() {
    let wells = load_fixture_wells();
    let metadata = WaterUseTable::from_csv_path(&fixture_path("wells_metadata.csv"), None)
        .expect("load metadata");
    let joined = join_water_use(&wells, &metadata).expect("join");

    // A-003 has no depth-to-water measurement and falls out of the profile.
    let spans = derive_vertical_interval(joined.records(), "depth_to_water").expect("derive");
    assert_eq!(spans.len(), 4);
    for span in &spans {
        assert!(span.top >= span.bottom);
    }

    let grouped = engine::group_spans_by_water_use(spans);
    assert_eq!(grouped.len(), 4);
    assert_eq!(grouped["Irrigation"].len(), 1);
    assert_eq!(grouped["Domestic"].len(), 1);
    assert_eq!(grouped["Stock"].len(), 1);
    assert_eq!(grouped[UNCLASSIFIED_WATER_USE].len(), 1);

    let irrigation = &grouped["Irrigation"][0];
    assert_eq!(irrigation.top, 1200.0);
    assert_eq!(irrigation.bottom, 1165.0);
}

#[test]
fn well_depth_mode_requires_total_depth() {
    let wells = load_fixture_wells();
    let spans = derive_vertical_interval(wells.records(), "well_depth").expect("derive");

    // A-002 lacks a total depth, A-003 lacks depth-to-water.
    assert_eq!(spans.len(), 3);
    let first = &spans[0];
    assert_eq!(first.top, 1165.0);
    assert_eq!(first.bottom, 980.0);
}

#[test]
fn descriptor_labels_resolve_through_the_fallback_chain() {
    let catalog = LabelCatalog::from_descriptor_path(&fixture_path("wells_schema.json"))
        .expect("load descriptor");

    // Curated alias beats the descriptor text.
    assert_eq!(catalog.label("wl_dtw"), "Depth to Water (DTW)");
    // Descriptor text where no alias exists.
    assert_eq!(catalog.label("site_id"), "GWSI site identification number");
    assert_eq!(catalog.label("NAME_ABBR"), "Abbreviated basin name");
    // Raw name as the last resort.
    assert_eq!(catalog.label("mystery"), "mystery");
}

#[test]
fn filtering_then_profiling_composes() {
    let wells = load_fixture_wells();
    let filtered =
        filter_by_group(wells.records(), "basin_name_1", Some("phoenix ama")).expect("filter");
    assert_eq!(filtered.len(), 3);

    let spans = derive_vertical_interval(&filtered, "depth_to_water").expect("derive");
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].top, 1200.0);
    assert_eq!(spans[1].top, 1180.0);
}
