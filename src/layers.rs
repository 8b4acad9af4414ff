//! Hydrologic boundary layers used as map backdrops.
//!
//! Loads GeoJSON polygon layers (state outline, subbasins, management
//! areas, aquifers) into `name + MultiPolygon` features. Backdrop data is
//! read-only reference material; features missing a name or geometry are
//! skipped rather than failing the whole layer.
//!
//! GeoJSON coordinates are WGS84 by specification (RFC 7946), so the
//! "single geographic CRS on load" contract reduces to rejecting files
//! that declare a different legacy `crs`.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use geo_types::{Geometry, MultiPolygon};
use geojson::GeoJson;
use log::warn;

/// The fixed set of backdrop layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    StateBoundary,
    Subbasins,
    ManagementAreas,
    Aquifers,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [
        LayerKind::StateBoundary,
        LayerKind::Subbasins,
        LayerKind::ManagementAreas,
        LayerKind::Aquifers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::StateBoundary => "state-boundary",
            LayerKind::Subbasins => "subbasins",
            LayerKind::ManagementAreas => "management-areas",
            LayerKind::Aquifers => "aquifers",
        }
    }

    /// Property holding each feature's display name.
    pub fn name_property(&self) -> &'static str {
        match self {
            LayerKind::StateBoundary => "NAME",
            LayerKind::Subbasins => "SUBBASIN_NAME",
            LayerKind::ManagementAreas => "BASIN_NAME",
            LayerKind::Aquifers => "AQ_NAME",
        }
    }
}

/// One backdrop polygon set member.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryFeature {
    pub fn polygon_count(&self) -> usize {
        self.geometry.0.len()
    }
}

/// Loads one boundary layer from a GeoJSON file.
///
/// `name_property` overrides the layer kind's default display-name
/// property. Polygon features promote to single-member multi-polygons;
/// non-polygonal geometry is an error naming the offending feature.
pub fn load_layer(
    path: &Path,
    kind: LayerKind,
    name_property: Option<&str>,
) -> Result<Vec<BoundaryFeature>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Opening layer file {path:?}"))?;
    let geojson: GeoJson = raw
        .parse()
        .with_context(|| format!("Parsing GeoJSON layer {path:?}"))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        bail!("Layer {path:?} is not a GeoJSON FeatureCollection");
    };

    reject_foreign_crs(collection.foreign_members.as_ref(), path)?;

    let property = name_property.unwrap_or_else(|| kind.name_property());
    let mut features = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(name) = feature_name(&feature, property) else {
            warn!(
                "Skipping feature {index} of {} layer: no '{property}' property",
                kind.as_str()
            );
            continue;
        };
        let Some(geometry) = feature.geometry else {
            warn!("Skipping feature '{name}' of {} layer: no geometry", kind.as_str());
            continue;
        };
        let geometry = Geometry::<f64>::try_from(geometry.value)
            .map_err(|err| anyhow!("Feature '{name}' has malformed geometry: {err}"))?;
        let multi_polygon = match geometry {
            Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
            Geometry::MultiPolygon(multi) => multi,
            other => bail!(
                "Feature '{name}' of {} layer is {}, expected Polygon or MultiPolygon",
                kind.as_str(),
                geometry_kind(&other)
            ),
        };
        features.push(BoundaryFeature {
            name,
            geometry: multi_polygon,
        });
    }
    Ok(features)
}

fn feature_name(feature: &geojson::Feature, property: &str) -> Option<String> {
    let properties = feature.properties.as_ref()?;
    let value = properties
        .get(property)
        .or_else(|| {
            properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(property))
                .map(|(_, value)| value)
        })?;
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn reject_foreign_crs(
    foreign_members: Option<&geojson::JsonObject>,
    path: &Path,
) -> Result<()> {
    let Some(crs) = foreign_members.and_then(|members| members.get("crs")) else {
        return Ok(());
    };
    let declared = crs
        .pointer("/properties/name")
        .and_then(|name| name.as_str())
        .unwrap_or("<unnamed>");
    let wgs84 = [
        "urn:ogc:def:crs:OGC:1.3:CRS84",
        "urn:ogc:def:crs:EPSG::4326",
        "EPSG:4326",
    ];
    if wgs84.iter().any(|known| known.eq_ignore_ascii_case(declared)) {
        return Ok(());
    }
    bail!("Layer {path:?} declares CRS '{declared}'; reproject to WGS84 before loading")
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "a Point",
        Geometry::Line(_) => "a Line",
        Geometry::LineString(_) => "a LineString",
        Geometry::Polygon(_) => "a Polygon",
        Geometry::MultiPoint(_) => "a MultiPoint",
        Geometry::MultiLineString(_) => "a MultiLineString",
        Geometry::MultiPolygon(_) => "a MultiPolygon",
        Geometry::GeometryCollection(_) => "a GeometryCollection",
        Geometry::Rect(_) => "a Rect",
        Geometry::Triangle(_) => "a Triangle",
    }
}
