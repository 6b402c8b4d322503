//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::rating::RatingScore;
use crate::domain::skill::SkillLevel;
use crate::domain::user::{Availability, SkillSide, UserId};
use crate::domain::{Error, swap::SwapStatus};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidEnum,
    InvalidRating,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidEnum => "invalid_enum",
            ErrorCode::InvalidRating => "invalid_rating",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a valid UUID"),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            field_error(
                field,
                format!("{name} must be an RFC 3339 timestamp"),
                ErrorCode::InvalidTimestamp,
                value,
            )
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

pub(crate) fn parse_skill_level(value: &str, field: FieldName) -> Result<SkillLevel, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be beginner, intermediate, advanced, or expert"),
            ErrorCode::InvalidEnum,
            value,
        )
    })
}

pub(crate) fn parse_availability(value: &str, field: FieldName) -> Result<Availability, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!(
                "{name} must be weekdays, weekends, evenings, flexible, or not-available"
            ),
            ErrorCode::InvalidEnum,
            value,
        )
    })
}

pub(crate) fn parse_skill_side(value: &str, field: FieldName) -> Result<SkillSide, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be offered or wanted"),
            ErrorCode::InvalidEnum,
            value,
        )
    })
}

pub(crate) fn parse_swap_status(value: &str, field: FieldName) -> Result<SwapStatus, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be pending, accepted, rejected, cancelled, or completed"),
            ErrorCode::InvalidEnum,
            value,
        )
    })
}

pub(crate) fn parse_rating_score(value: u8, field: FieldName) -> Result<RatingScore, Error> {
    RatingScore::new(value).map_err(|err| {
        field_error(
            field,
            err.to_string(),
            ErrorCode::InvalidRating,
            &value.to_string(),
        )
    })
}
