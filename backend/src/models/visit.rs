use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Clock-in / clock-out log for a schedule. Every field stays empty until the
/// corresponding transition has happened.
#[derive(Debug, Clone, Serialize)]
pub struct Visit {
    pub id: i64,
    pub schedule_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lng: Option<f64>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisitLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// A coordinate pair known to be on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AppError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::validation(
                "coordinates",
                "Invalid latitude or longitude",
            ));
        }
        Ok(Self { latitude, longitude })
    }
}

impl TryFrom<VisitLocationRequest> for Location {
    type Error = AppError;

    fn try_from(req: VisitLocationRequest) -> Result<Self, Self::Error> {
        Location::new(req.latitude, req.longitude)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartVisitResponse {
    pub message: &'static str,
    pub timestamp: DateTime<Local>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndVisitResponse {
    pub message: &'static str,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub duration_minutes: i64,
    pub end_location: Location,
}

/// Whole minutes between clock-in and clock-out, rounded down.
pub fn duration_minutes(start: DateTime<Local>, end: DateTime<Local>) -> i64 {
    (end - start).num_seconds().div_euclid(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn accepts_coordinate_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
        assert!(Location::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        for (lat, lng) in [(90.5, 0.0), (-91.0, 0.0), (0.0, 180.1), (0.0, -200.0)] {
            let err = Location::new(lat, lng).unwrap_err();
            assert!(matches!(err, AppError::Validation { ref field, .. } if field == "coordinates"));
        }
    }

    #[test]
    fn duration_rounds_down_to_minutes() {
        let start = crate::time::parse_timestamp("2025-05-01 09:00:00").unwrap();
        assert_eq!(duration_minutes(start, start + Duration::seconds(59)), 0);
        assert_eq!(duration_minutes(start, start + Duration::seconds(60)), 1);
        assert_eq!(duration_minutes(start, start + Duration::seconds(5_399)), 89);
    }
}
