//! Wire format of the sites database: query bodies and response parsing.
//!
//! The service accepts a POST body with min/max bounds per axis and
//! answers `{"sites": [...]}` where each site is a flat object keyed by
//! the original column names (`Site_ID`, `Site_Name`, `Latitude`, ...).
//! `Site_ID`, `Latitude`, and `Longitude` are required; everything else
//! defaults when absent.

use fieldmap_core::{FetchError, SiteRecord, ELEVATION_UNKNOWN};
use fieldmap_geo::{GeoPoint, GeoWindow};
use serde_json::{json, Value};

/// Build the JSON query body for a bounding window.
pub fn window_query_body(window: &GeoWindow) -> String {
    json!({
        "latitude": { "Min": window.min.latitude, "Max": window.max.latitude },
        "longitude": { "Min": window.min.longitude, "Max": window.max.longitude },
    })
    .to_string()
}

/// Parse a sites response body into records, validating field by field.
pub fn parse_sites_payload(body: &str) -> Result<Vec<SiteRecord>, FetchError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("invalid JSON: {e}")))?;

    let sites = root
        .get("sites")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::malformed("missing \"sites\" array"))?;

    sites
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_site(index, entry))
        .collect()
}

fn parse_site(index: usize, value: &Value) -> Result<SiteRecord, FetchError> {
    let object = value
        .as_object()
        .ok_or_else(|| FetchError::malformed(format!("site {index} is not an object")))?;

    let id = required_string(object, index, "Site_ID")?;
    let latitude = required_number(object, index, "Latitude")?;
    let longitude = required_number(object, index, "Longitude")?;

    let mut record = SiteRecord::new(
        id,
        optional_string(object, "Site_Name"),
        GeoPoint::new(latitude, longitude),
    );
    record.elevation_m = object
        .get("Elevation_mabsl")
        .and_then(Value::as_f64)
        .unwrap_or(ELEVATION_UNKNOWN);
    record.address = optional_string(object, "Address");
    record.city = optional_string(object, "City");
    record.state_or_province = optional_string(object, "State_or_Province");
    record.country = optional_string(object, "Country");
    record.comments = optional_string(object, "Site_Comments");

    Ok(record)
}

fn required_string(
    object: &serde_json::Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<String, FetchError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            FetchError::malformed(format!("site {index}: missing or invalid \"{field}\""))
        })
}

fn required_number(
    object: &serde_json::Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<f64, FetchError> {
    object.get(field).and_then(Value::as_f64).ok_or_else(|| {
        FetchError::malformed(format!("site {index}: missing or invalid \"{field}\""))
    })
}

fn optional_string(object: &serde_json::Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
