//! Request validation helpers
//!
//! The bounding box check runs as a `validator` custom rule on the map query,
//! so an invalid `bbox` is rejected with 400 before any search is issued.

use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

const BBOX_COMPONENTS_COUNT: usize = 4;
const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 90.0;
const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;

/// `validator` entry point for the `bbox` query field
pub fn validate_bbox_field(raw: &str) -> Result<(), ValidationError> {
    check_bbox(raw).map_err(|message| {
        let mut err = ValidationError::new("bbox");
        err.message = Some(Cow::Owned(message));
        err
    })
}

/// Comma separated parts of a bbox string; trailing empty parts are dropped
/// so `"1,2,3,4,"` still has four components
pub(crate) fn split_components(raw: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = raw.trim().split(',').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Check a `minLat,minLon,maxLat,maxLon` string.
///
/// Blank input is valid (the filter is optional). Coordinates must be finite,
/// inside the WGS84 ranges, and describe a box with positive extent.
pub fn check_bbox(raw: &str) -> Result<(), String> {
    if raw.trim().is_empty() {
        return Ok(());
    }

    let components = split_components(raw);
    if components.len() != BBOX_COMPONENTS_COUNT {
        return Err(format!(
            "Invalid number of components. Expected 4, got {}",
            components.len()
        ));
    }

    let parsed: Option<Vec<f64>> = components
        .iter()
        .map(|c| c.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();
    let Some(values) = parsed else {
        return Err("One or more components are not valid numbers.".to_string());
    };

    let (min_lat, min_lon, max_lat, max_lon) = (values[0], values[1], values[2], values[3]);

    check_latitude(min_lat, "minLat")?;
    check_latitude(max_lat, "maxLat")?;
    check_longitude(min_lon, "minLon")?;
    check_longitude(max_lon, "maxLon")?;

    if min_lat >= max_lat {
        return Err("minLat must be less than maxLat.".to_string());
    }
    if min_lon >= max_lon {
        return Err("minLon must be less than maxLon.".to_string());
    }
    Ok(())
}

fn check_latitude(lat: f64, name: &str) -> Result<(), String> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(format!(
            "{name} must be in range [{MIN_LATITUDE:.1}, {MAX_LATITUDE:.1}], got: {lat:.2}"
        ));
    }
    Ok(())
}

fn check_longitude(lon: f64, name: &str) -> Result<(), String> {
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
        return Err(format!(
            "{name} must be in range [{MIN_LONGITUDE:.1}, {MAX_LONGITUDE:.1}], got: {lon:.2}"
        ));
    }
    Ok(())
}

/// Flatten validation errors into `field: message, field: message`
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                if field == "__all__" {
                    message
                } else {
                    format!("{field}: {message}")
                }
            })
        })
        .collect();
    parts.sort();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_valid() {
        assert!(check_bbox("").is_ok());
        assert!(check_bbox("   ").is_ok());
    }

    #[test]
    fn test_valid_box() {
        assert!(check_bbox("55.6,37.5,55.8,37.7").is_ok());
        assert!(check_bbox(" -90 , -180 , 90 , 180 ").is_ok());
    }

    #[test]
    fn test_wrong_component_count() {
        assert_eq!(
            check_bbox("1,2,3").unwrap_err(),
            "Invalid number of components. Expected 4, got 3"
        );
    }

    #[test]
    fn test_trailing_commas_are_ignored() {
        assert!(check_bbox("55.6,37.5,55.8,37.7,").is_ok());
        assert!(check_bbox("55.6,37.5,55.8,37.7,,,").is_ok());
        assert_eq!(
            check_bbox("55.6,,55.8,37.7").unwrap_err(),
            "One or more components are not valid numbers."
        );
        assert_eq!(
            check_bbox("1,2,3,").unwrap_err(),
            "Invalid number of components. Expected 4, got 3"
        );
    }

    #[test]
    fn test_non_numeric_component() {
        assert_eq!(
            check_bbox("1,abc,3,4").unwrap_err(),
            "One or more components are not valid numbers."
        );
        assert!(check_bbox("NaN,1,2,3").is_err());
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert_eq!(
            check_bbox("-91,0,10,10").unwrap_err(),
            "minLat must be in range [-90.0, 90.0], got: -91.00"
        );
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert_eq!(
            check_bbox("0,0,10,181.5").unwrap_err(),
            "maxLon must be in range [-180.0, 180.0], got: 181.50"
        );
    }

    #[test]
    fn test_inverted_bounds() {
        assert_eq!(
            check_bbox("10,0,5,10").unwrap_err(),
            "minLat must be less than maxLat."
        );
        assert_eq!(
            check_bbox("0,10,5,10").unwrap_err(),
            "minLon must be less than maxLon."
        );
    }

    #[test]
    fn test_validator_error_carries_message() {
        let err = validate_bbox_field("1,2").unwrap_err();
        assert_eq!(err.code, "bbox");
        assert_eq!(
            err.message.as_deref(),
            Some("Invalid number of components. Expected 4, got 2")
        );
    }
}
