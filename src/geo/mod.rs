//! Department boundary layer for the report map
//!
//! The boundaries arrive as a GeoJSON file projected in EPSG:22174
//! (POSGAR 98 / Argentina faja 4), usually without a `crs` member. The
//! map wants EPSG:4326, so the layer tracks which system its coordinates
//! are in and reprojects exactly once. The projection math itself sits
//! behind [`CoordTransform`] so the layer does not pin a projection
//! library.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::util::safe_read_to_string;
use crate::error::{Error, Result};

/// An EPSG coordinate reference system code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crs(u32);

impl Crs {
    /// The projection the boundary files are delivered in.
    pub const SOURCE: Self = Self(22174);
    /// The geographic system the map widget expects.
    pub const DISPLAY: Self = Self(4326);

    /// Parses a GeoJSON crs name such as `urn:ogc:def:crs:EPSG::22174`
    /// or the short `EPSG:22174` form. `CRS84` is read as EPSG:4326.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedCrs`] when no EPSG code can be read
    /// from the name.
    pub fn from_urn(name: &str) -> Result<Self> {
        if name.ends_with("CRS84") {
            return Ok(Self::DISPLAY);
        }
        name.rsplit(':')
            .next()
            .and_then(|tail| tail.parse::<u32>().ok())
            .map(Self)
            .ok_or_else(|| {
                Error::UnsupportedCrs {
                    name: name.to_string(),
                }
                .into()
            })
    }

    #[must_use]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// The URN form written back into exported GeoJSON.
    #[must_use]
    pub fn to_urn(self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.0)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// A coordinate transform between two reference systems.
///
/// [`BoundaryLayer::reproject`] applies one of these to every position.
/// Implementations wrap whatever projection backend the caller has at
/// hand; the tests use a plain affine shift.
pub trait CoordTransform {
    fn transform(&self, x: f64, y: f64) -> (f64, f64);
}

/// The `crs` member of a GeoJSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrsMember {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: CrsProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
}

impl CrsMember {
    fn named(crs: Crs) -> Self {
        Self {
            kind: "name".to_string(),
            properties: CrsProperties { name: crs.to_urn() },
        }
    }
}

/// Department outlines are polygons or multipolygons; positions keep any
/// extra dimensions beyond x and y untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

impl Geometry {
    fn apply(&mut self, transform: &dyn CoordTransform) {
        match self {
            Self::Polygon { coordinates } => {
                for ring in coordinates {
                    transform_ring(ring, transform);
                }
            }
            Self::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    for ring in polygon {
                        transform_ring(ring, transform);
                    }
                }
            }
        }
    }
}

fn transform_ring(ring: &mut [Vec<f64>], transform: &dyn CoordTransform) {
    for position in ring {
        if position.len() >= 2 {
            let (x, y) = transform.transform(position[0], position[1]);
            position[0] = x;
            position[1] = y;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Map<String, Value>>,
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// A property value by key, when the feature carries properties.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|map| map.get(key))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<CrsMember>,
    pub features: Vec<Feature>,
}

/// A boundary layer with its coordinate system tracked explicitly.
#[derive(Debug, Clone)]
pub struct BoundaryLayer {
    crs: Crs,
    collection: FeatureCollection,
}

impl BoundaryLayer {
    /// Parses a GeoJSON document. A delivered file without a `crs` member
    /// is taken to be in [`Crs::SOURCE`], matching how the files have
    /// always been produced.
    ///
    /// # Errors
    /// Returns an error if the text is not a GeoJSON feature collection
    /// or names a crs that cannot be parsed.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let collection: FeatureCollection =
            serde_json::from_str(text).context("Failed to parse GeoJSON feature collection")?;
        let crs = match &collection.crs {
            Some(member) => Crs::from_urn(&member.properties.name)?,
            None => Crs::SOURCE,
        };
        Ok(Self { crs, collection })
    }

    /// Reads and parses a boundary file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = safe_read_to_string(path, "boundary layer")?;
        Self::from_geojson_str(&text)
            .with_context(|| format!("Failed to load boundary layer from {}", path.display()))
    }

    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.collection.features
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    /// Applies `transform` to every position and records the layer as
    /// being in [`Crs::DISPLAY`]. A layer already in display coordinates
    /// is left untouched, so calling this twice cannot shift the map.
    pub fn reproject(&mut self, transform: &dyn CoordTransform) {
        if self.crs == Crs::DISPLAY {
            return;
        }
        for feature in &mut self.collection.features {
            if let Some(geometry) = &mut feature.geometry {
                geometry.apply(transform);
            }
        }
        self.crs = Crs::DISPLAY;
        self.collection.crs = Some(CrsMember::named(Crs::DISPLAY));
    }

    /// Serializes the layer back to GeoJSON for the map widget.
    pub fn to_geojson(&self) -> Result<String> {
        serde_json::to_string(&self.collection).context("Failed to serialize boundary layer")
    }
}
