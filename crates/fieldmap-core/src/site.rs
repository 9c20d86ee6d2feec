//! Site records and their map annotations.

use fieldmap_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Elevation value used when the source did not report one.
///
/// Carried through opaquely; the core never interprets it.
pub const ELEVATION_UNKNOWN: f64 = -1.0;

/// A sampling site as returned by a site data source.
///
/// `id` is unique within a data source and is the sole notion of site
/// identity. Everything besides `id`, `name`, and `location` is opaque
/// descriptive payload that the core carries but never inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Source-unique site identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Geographic location.
    pub location: GeoPoint,
    /// Elevation in meters above sea level, or [`ELEVATION_UNKNOWN`].
    #[serde(default = "unknown_elevation")]
    pub elevation_m: f64,
    /// Street address, if reported.
    #[serde(default)]
    pub address: String,
    /// City, if reported.
    #[serde(default)]
    pub city: String,
    /// State or province, if reported.
    #[serde(default)]
    pub state_or_province: String,
    /// Country, if reported.
    #[serde(default)]
    pub country: String,
    /// Free-text comments.
    #[serde(default)]
    pub comments: String,
}

fn unknown_elevation() -> f64 {
    ELEVATION_UNKNOWN
}

impl SiteRecord {
    /// Create a record with the required fields; descriptive fields start
    /// empty and elevation unknown.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: GeoPoint) -> Self {
        SiteRecord {
            id: id.into(),
            name: name.into(),
            location,
            elevation_m: ELEVATION_UNKNOWN,
            address: String::new(),
            city: String::new(),
            state_or_province: String::new(),
            country: String::new(),
            comments: String::new(),
        }
    }
}

/// A site prepared for map display.
///
/// Title and subtitle follow the original presentation: the id is the
/// title, the name the subtitle. Identity, equality, and hashing are
/// defined by the site id alone; two annotations with the same id compare
/// equal even if every other field differs.
#[derive(Debug, Clone)]
pub struct SiteAnnotation {
    record: SiteRecord,
    title: String,
    subtitle: String,
}

impl SiteAnnotation {
    /// Wrap a record for display.
    pub fn from_record(record: SiteRecord) -> Self {
        let title = record.id.clone();
        let subtitle = record.name.clone();
        SiteAnnotation {
            record,
            title,
            subtitle,
        }
    }

    /// The site identifier (also the annotation title).
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// The wrapped site record.
    pub fn record(&self) -> &SiteRecord {
        &self.record
    }

    /// Location on the map.
    pub fn location(&self) -> GeoPoint {
        self.record.location
    }

    /// Callout title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Callout subtitle.
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }
}

impl PartialEq for SiteAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.record.id == other.record.id
    }
}

impl Eq for SiteAnnotation {}

impl Hash for SiteAnnotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.record.id.hash(state);
    }
}
