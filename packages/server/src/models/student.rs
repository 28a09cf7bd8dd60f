use chrono::{DateTime, NaiveDate, Utc};
use common::OnboardingRequest;
use serde::Serialize;

use crate::entity::student;
use crate::error::AppError;

/// School recorded when the request omits one.
pub const DEFAULT_SCHOOL: &str = "Central Public School";

/// Student record as returned by the API.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    #[schema(example = "9220")]
    pub national_id: String,
    #[schema(example = "R-17")]
    pub roll_no: String,
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "7B")]
    pub class_group: String,
    #[schema(example = "Central Public School")]
    pub school: String,
    #[schema(example = "2012-04-19")]
    pub date_of_birth: String,
    #[schema(example = "2026-08-29T08:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<student::Model> for StudentResponse {
    fn from(m: student::Model) -> Self {
        Self {
            national_id: m.national_id,
            roll_no: m.roll_no,
            name: m.name,
            class_group: m.class_group,
            school: m.school,
            date_of_birth: m.date_of_birth,
            created_at: m.created_at,
        }
    }
}

/// Validate an onboarding request body.
pub fn validate_onboarding(request: &OnboardingRequest) -> Result<(), AppError> {
    for (value, name) in [
        (&request.national_id, "national_id"),
        (&request.roll_no, "roll_no"),
        (&request.name, "name"),
        (&request.class_group, "class_group"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{name} must not be empty")));
        }
    }

    if NaiveDate::parse_from_str(&request.date_of_birth, "%Y-%m-%d").is_err() {
        return Err(AppError::Validation(
            "date_of_birth must be an ISO 8601 date (YYYY-MM-DD)".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OnboardingRequest {
        OnboardingRequest {
            national_id: "9220".into(),
            roll_no: "R-17".into(),
            name: "Asha Verma".into(),
            class_group: "7B".into(),
            school: None,
            date_of_birth: "2012-04-19".into(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_onboarding(&request()).is_ok());
    }

    #[test]
    fn test_empty_national_id_rejected() {
        let mut r = request();
        r.national_id = "  ".into();
        assert!(validate_onboarding(&r).is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut r = request();
        r.date_of_birth = "19-04-2012".into();
        assert!(validate_onboarding(&r).is_err());
    }
}
