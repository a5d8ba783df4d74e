use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Query string of `GET /api/v1/events`
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventMapQuery {
    /// First day to include, `YYYY-MM-DD`
    #[param(value_type = Option<String>, format = Date, example = "2025-06-20")]
    pub since: Option<NaiveDate>,

    /// Last day to include, `YYYY-MM-DD`
    #[param(value_type = Option<String>, format = Date, example = "2025-06-21")]
    pub until: Option<NaiveDate>,

    /// Single day to show; ignored when `since` or `until` is set
    #[param(value_type = Option<String>, format = Date, example = "2025-06-20")]
    pub date: Option<NaiveDate>,

    /// `minLat,minLon,maxLat,maxLon`
    #[param(example = "55.6,37.5,55.8,37.7")]
    #[validate(custom(function = "crate::validation::validate_bbox_field"))]
    pub bbox: Option<String>,

    /// Map zoom level; below the configured threshold events are clustered
    #[param(example = 10)]
    pub zoom: Option<i32>,
}
