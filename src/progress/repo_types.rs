use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One row of `user_progress`; unique per `(user_id, module_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_name: String,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_accessed: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A module name that has been trimmed and checked to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Values written by an upsert; the store fills in `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct ProgressUpsert {
    pub user_id: Uuid,
    pub module_name: ModuleName,
    pub is_completed: bool,
    pub last_accessed: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn module_name_is_trimmed() {
        let name = ModuleName::parse("  Deep Learning \n").expect("valid");
        assert_eq!(name.as_str(), "Deep Learning");
    }

    #[test]
    fn blank_module_name_is_rejected() {
        assert!(ModuleName::parse("").is_none());
        assert!(ModuleName::parse(" \t ").is_none());
    }

    #[test]
    fn record_serializes_rfc3339_timestamps() {
        let record = ProgressRecord {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            module_name: "Intro".into(),
            is_completed: true,
            last_accessed: datetime!(2024-05-01 10:30:00 UTC),
            created_at: datetime!(2024-04-30 08:00:00 UTC),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["last_accessed"], "2024-05-01T10:30:00Z");
        assert_eq!(json["created_at"], "2024-04-30T08:00:00Z");
        assert_eq!(json["is_completed"], true);
    }
}
