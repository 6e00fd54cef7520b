//! World boundary polygons: loading, projection, hit testing, and the country join.

use crate::aggregate::MeasureTotals;
use crate::error::{DashError, Result};
use ahash::AHashMap;
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::path::PathBuf;

/// Default boundary dataset (GeoJSON `FeatureCollection`, one feature per country).
pub const WORLD_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

const MERCATOR_MAX_LAT_DEG: f64 = 85.05112878;

/// A ring of `(lon, lat)` positions in degrees.
pub type Ring = Vec<(f64, f64)>;

/// One country outline: polygons made of an outer ring and optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    pub polygons: Vec<Vec<Ring>>,
}

/// Parse a GeoJSON `FeatureCollection`. Only `Polygon` and `MultiPolygon`
/// geometries are kept; features without a `properties.name` are skipped.
pub fn parse_feature_collection(v: &Value) -> Result<Vec<Boundary>> {
    if v.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(DashError::decode(
            "boundary dataset",
            "expected a GeoJSON FeatureCollection",
        ));
    }
    let features = v
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| DashError::decode("boundary dataset", "missing features array"))?;

    let mut out = Vec::with_capacity(features.len());
    for f in features {
        let Some(name) = f
            .get("properties")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
        else {
            continue;
        };
        let Some(geometry) = f.get("geometry") else {
            continue;
        };
        let coords = geometry.get("coordinates");
        let polygons: Vec<Vec<Ring>> = match (geometry.get("type").and_then(Value::as_str), coords) {
            (Some("Polygon"), Some(c)) => parse_polygon(c).into_iter().collect(),
            (Some("MultiPolygon"), Some(Value::Array(polys))) => {
                polys.iter().filter_map(parse_polygon).collect()
            }
            (kind, _) => {
                log::debug!("skipping {} geometry for {}", kind.unwrap_or("missing"), name);
                continue;
            }
        };
        out.push(Boundary {
            name: name.to_string(),
            polygons,
        });
    }
    Ok(out)
}

fn parse_polygon(v: &Value) -> Option<Vec<Ring>> {
    let rings = v.as_array()?;
    let parsed: Vec<Ring> = rings.iter().filter_map(parse_ring).collect();
    (!parsed.is_empty()).then_some(parsed)
}

fn parse_ring(v: &Value) -> Option<Ring> {
    let ring: Ring = v
        .as_array()?
        .iter()
        .filter_map(|p| {
            let p = p.as_array()?;
            Some((p.first()?.as_f64()?, p.get(1)?.as_f64()?))
        })
        .collect();
    (ring.len() >= 3).then_some(ring)
}

/// Where the map's boundary polygons come from.
pub trait BoundaryProvider: Send + Sync {
    fn load(&self) -> Result<Vec<Boundary>>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

impl fmt::Debug for dyn BoundaryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundaryProvider({})", self.describe())
    }
}

/// Fetch boundaries over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteBoundaries {
    pub url: String,
    http: HttpClient,
}

impl RemoteBoundaries {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: crate::api::http_client(),
        }
    }
}

impl Default for RemoteBoundaries {
    fn default() -> Self {
        Self::new(WORLD_GEOJSON_URL)
    }
}

impl BoundaryProvider for RemoteBoundaries {
    fn load(&self) -> Result<Vec<Boundary>> {
        let v = crate::api::get_json(&self.http, &self.url)?;
        parse_feature_collection(&v)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Read boundaries from a local GeoJSON file.
#[derive(Debug, Clone)]
pub struct FileBoundaries {
    pub path: PathBuf,
}

impl BoundaryProvider for FileBoundaries {
    fn load(&self) -> Result<Vec<Boundary>> {
        let text = std::fs::read_to_string(&self.path)?;
        let v: Value =
            serde_json::from_str(&text).map_err(|e| DashError::decode("boundary file", e))?;
        parse_feature_collection(&v)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Boundaries already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticBoundaries(pub Vec<Boundary>);

impl BoundaryProvider for StaticBoundaries {
    fn load(&self) -> Result<Vec<Boundary>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory boundaries", self.0.len())
    }
}

/// Pick a provider from a CLI value: `http(s)://` URLs are fetched, anything else is a path.
pub fn provider_for(source: &str) -> Box<dyn BoundaryProvider> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Box::new(RemoteBoundaries::new(source))
    } else {
        Box::new(FileBoundaries {
            path: PathBuf::from(source),
        })
    }
}

/// Spherical Mercator with a pixel scale, a geographic center, and a screen translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    pub scale: f64,
    pub center: (f64, f64),
    pub translate: (f64, f64),
}

impl Mercator {
    /// The dashboard's world view for a canvas of `width x height`.
    pub fn world(width: f64, height: f64) -> Self {
        Self {
            scale: 100.0,
            center: (0.0, 20.0),
            translate: (width / 2.0, height / 2.0),
        }
    }

    fn raw(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg
            .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
            .to_radians();
        (lon_deg.to_radians(), (FRAC_PI_4 + lat / 2.0).tan().ln())
    }

    /// Project `(lon, lat)` degrees to screen pixels (y grows downward).
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = Self::raw(lon, lat);
        let (cx, cy) = Self::raw(self.center.0, self.center.1);
        (
            self.translate.0 + self.scale * (x - cx),
            self.translate.1 - self.scale * (y - cy),
        )
    }

    /// Inverse of [`project`](Self::project).
    pub fn invert(&self, px: f64, py: f64) -> (f64, f64) {
        let (cx, cy) = Self::raw(self.center.0, self.center.1);
        let x = (px - self.translate.0) / self.scale + cx;
        let y = (self.translate.1 - py) / self.scale + cy;
        (x.to_degrees(), (2.0 * y.exp().atan() - FRAC_PI_2).to_degrees())
    }
}

/// A boundary projected to screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShape {
    pub name: String,
    pub polygons: Vec<Vec<Vec<(f64, f64)>>>,
}

impl ProjectedShape {
    pub fn project(b: &Boundary, proj: &Mercator) -> Self {
        Self {
            name: b.name.clone(),
            polygons: b
                .polygons
                .iter()
                .map(|rings| {
                    rings
                        .iter()
                        .map(|ring| ring.iter().map(|(lon, lat)| proj.project(*lon, *lat)).collect())
                        .collect()
                })
                .collect(),
        }
    }

    /// Even-odd containment over each polygon's rings, so holes are excluded.
    pub fn contains(&self, p: (f64, f64)) -> bool {
        self.polygons
            .iter()
            .any(|rings| rings.iter().filter(|r| ring_contains(r, p)).count() % 2 == 1)
    }
}

/// Ray-casting point-in-ring test.
pub fn ring_contains(ring: &[(f64, f64)], (x, y): (f64, f64)) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Map a boundary dataset's name onto the record dataset's spelling.
pub fn canonical_country_name(boundary_name: &str) -> &str {
    match boundary_name {
        "USA" => "United States of America",
        other => other,
    }
}

/// Measures joined onto one boundary feature.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShade {
    /// Joined name (record spelling).
    pub name: String,
    pub totals: MeasureTotals,
}

/// Join per-country totals onto boundaries by name; unmatched countries get zeros.
pub fn join_country_totals(
    boundaries: &[Boundary],
    totals: &AHashMap<String, MeasureTotals>,
) -> Vec<CountryShade> {
    boundaries
        .iter()
        .map(|b| {
            let name = canonical_country_name(&b.name);
            CountryShade {
                name: name.to_string(),
                totals: totals.get(name).copied().unwrap_or_default(),
            }
        })
        .collect()
}
