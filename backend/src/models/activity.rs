use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::non_blank;

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: i64,
    pub schedule_id: i64,
    pub title: String,
    pub description: String,
    pub is_resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivityRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub is_resolved: bool,
    pub reason: Option<String>,
}

impl CreateActivityRequest {
    pub fn validate(self) -> Result<NewActivity, AppError> {
        let title = non_blank(Some(self.title))
            .ok_or_else(|| AppError::validation("title", "Title is required"))?;
        let description = non_blank(Some(self.description))
            .ok_or_else(|| AppError::validation("description", "Description is required"))?;

        Ok(NewActivity {
            title,
            description,
            is_resolved: false,
            reason: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateActivityRequest {
    pub is_resolved: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityResolution {
    pub is_resolved: bool,
    pub reason: Option<String>,
}

impl UpdateActivityRequest {
    /// An unresolved activity must say why it was left open; a resolved one
    /// carries no reason.
    pub fn validate(self) -> Result<ActivityResolution, AppError> {
        if self.is_resolved {
            return Ok(ActivityResolution {
                is_resolved: true,
                reason: None,
            });
        }

        match non_blank(self.reason) {
            Some(reason) => Ok(ActivityResolution {
                is_resolved: false,
                reason: Some(reason),
            }),
            None => Err(AppError::validation(
                "reason",
                "Reason is required when activity is not resolved",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_without_reason_is_rejected() {
        let req = UpdateActivityRequest { is_resolved: false, reason: Some(String::new()) };
        assert!(matches!(req.validate(), Err(AppError::Validation { .. })));

        let req = UpdateActivityRequest { is_resolved: false, reason: None };
        assert!(matches!(req.validate(), Err(AppError::Validation { .. })));
    }

    #[test]
    fn resolved_needs_no_reason() {
        let req = UpdateActivityRequest { is_resolved: true, reason: None };
        assert_eq!(req.validate().unwrap(), ActivityResolution { is_resolved: true, reason: None });
    }

    #[test]
    fn create_requires_title_and_description() {
        let req = CreateActivityRequest { title: " ".into(), description: "x".into() };
        assert!(matches!(req.validate(), Err(AppError::Validation { ref field, .. }) if field == "title"));

        let req = CreateActivityRequest { title: "Laundry".into(), description: "".into() };
        assert!(matches!(req.validate(), Err(AppError::Validation { ref field, .. }) if field == "description"));
    }

    #[test]
    fn missing_is_resolved_fails_to_deserialize() {
        assert!(serde_json::from_str::<UpdateActivityRequest>(r#"{"reason":"x"}"#).is_err());
    }
}
