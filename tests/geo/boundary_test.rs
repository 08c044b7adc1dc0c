use bdg_report::geo::{BoundaryLayer, CoordTransform, Crs, Geometry};

/// Affine shift standing in for a real projection backend
struct Shift {
    dx: f64,
    dy: f64,
}

impl CoordTransform for Shift {
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.dx, y + self.dy)
    }
}

const DEPARTMENT_LAYER: &str = r#"{
  "type": "FeatureCollection",
  "name": "capa_departamentos",
  "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::22174"}},
  "features": [
    {
      "type": "Feature",
      "properties": {"departamento": "CAPITAL"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[4400000.0, 6520000.0], [4400100.0, 6520000.0], [4400100.0, 6520100.0], [4400000.0, 6520000.0]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"departamento": "RIO CUARTO"},
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [[[[4380000.0, 6300000.0], [4380100.0, 6300000.0], [4380100.0, 6300100.0], [4380000.0, 6300000.0]]]]
      }
    }
  ]
}"#;

/// Test that the crs member is read and features parse
#[test]
fn test_parse_with_crs_member() {
    let layer = BoundaryLayer::from_geojson_str(DEPARTMENT_LAYER).unwrap();

    assert_eq!(layer.crs(), Crs::SOURCE);
    assert_eq!(layer.crs().code(), 22174);
    assert_eq!(layer.len(), 2);
    assert_eq!(
        layer.features()[0].property("departamento").unwrap(),
        "CAPITAL"
    );
}

/// Test that a file without a crs member defaults to the delivery
/// projection
#[test]
fn test_missing_crs_defaults_to_source() {
    let text = r#"{"type": "FeatureCollection", "features": []}"#;

    let layer = BoundaryLayer::from_geojson_str(text).unwrap();

    assert_eq!(layer.crs(), Crs::SOURCE);
    assert!(layer.is_empty());
}

/// Test that the CRS84 spelling is read as the display system
#[test]
fn test_crs84_reads_as_display() {
    let crs = Crs::from_urn("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap();
    assert_eq!(crs, Crs::DISPLAY);
}

/// Test that an unreadable crs name is rejected
#[test]
fn test_unknown_crs_name_is_rejected() {
    assert!(Crs::from_urn("urn:ogc:def:crs:EPSG::faja4").is_err());
}

/// Test that reprojection shifts every position exactly once
#[test]
fn test_reproject_applies_once() {
    let mut layer = BoundaryLayer::from_geojson_str(DEPARTMENT_LAYER).unwrap();
    let shift = Shift { dx: 1.0, dy: -2.0 };

    layer.reproject(&shift);
    assert_eq!(layer.crs(), Crs::DISPLAY);
    let Some(Geometry::Polygon { coordinates }) = &layer.features()[0].geometry else {
        panic!("first feature should stay a polygon");
    };
    assert_eq!(coordinates[0][0], vec![4400001.0, 6519998.0]);

    // Already in display coordinates, so a second call must not move
    // anything.
    layer.reproject(&shift);
    let Some(Geometry::Polygon { coordinates }) = &layer.features()[0].geometry else {
        panic!("first feature should stay a polygon");
    };
    assert_eq!(coordinates[0][0], vec![4400001.0, 6519998.0]);
}

/// Test that export carries the display crs after reprojection
#[test]
fn test_export_after_reproject() {
    let mut layer = BoundaryLayer::from_geojson_str(DEPARTMENT_LAYER).unwrap();
    layer.reproject(&Shift { dx: 0.0, dy: 0.0 });

    let exported = layer.to_geojson().unwrap();

    assert!(exported.contains("urn:ogc:def:crs:EPSG::4326"));
    assert!(exported.contains("MultiPolygon"));
}
