use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and incident_type are required fields";
pub const INVALID_TYPE_MESSAGE: &str =
    "Invalid incident_type. Must be one of: Fire, Smoke, Emergency";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentType {
    Fire,
    Smoke,
    Emergency,
}

impl IncidentType {
    pub const ALL: [IncidentType; 3] = [
        IncidentType::Fire,
        IncidentType::Smoke,
        IncidentType::Emergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Fire => "Fire",
            IncidentType::Smoke => "Smoke",
            IncidentType::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentType {
    type Err = ValidationError;

    /// Exact, case-sensitive match against the variant names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ValidationError::InvalidType)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Raised for a missing title and a missing type alike.
    #[error("{}", REQUIRED_FIELDS_MESSAGE)]
    MissingRequired,
    #[error("{}", INVALID_TYPE_MESSAGE)]
    InvalidType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub description: String,
    pub incident_type: IncidentType,
    pub location: String,
    pub image: Option<String>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// Text fields of a create request, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub incident_type: Option<String>,
    pub location: Option<String>,
}

/// A submission that passed validation, with every text field trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub title: String,
    pub description: String,
    pub incident_type: IncidentType,
    pub location: String,
}

impl Submission {
    pub fn validate(&self) -> Result<ValidSubmission, ValidationError> {
        let title = non_blank(self.title.as_deref());
        let incident_type = self
            .incident_type
            .as_deref()
            .filter(|t| !t.trim().is_empty());

        let (Some(title), Some(incident_type)) = (title, incident_type) else {
            return Err(ValidationError::MissingRequired);
        };

        Ok(ValidSubmission {
            title: title.to_string(),
            description: trimmed(self.description.as_deref()),
            incident_type: incident_type.parse()?,
            location: trimmed(self.location.as_deref()),
        })
    }
}

impl ValidSubmission {
    pub fn into_incident(
        self,
        id: String,
        created_at: DateTime<Utc>,
        image: Option<String>,
    ) -> Incident {
        Incident {
            id,
            title: self.title,
            description: self.description,
            incident_type: self.incident_type,
            location: self.location,
            image,
            created_at,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Orders incidents most recently created first. The sort is stable, so
/// incidents sharing a timestamp keep their stored order.
pub fn newest_first(mut incidents: Vec<Incident>) -> Vec<Incident> {
    incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    incidents
}

/// ISO-8601 with millisecond precision on output, any RFC 3339 on input.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission(title: Option<&str>, incident_type: Option<&str>) -> Submission {
        Submission {
            title: title.map(String::from),
            description: Some("  smoke on floor 3 ".to_string()),
            incident_type: incident_type.map(String::from),
            location: None,
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let valid = submission(Some("  Kitchen fire "), Some("Fire"))
            .validate()
            .unwrap();
        assert_eq!(valid.title, "Kitchen fire");
        assert_eq!(valid.description, "smoke on floor 3");
        assert_eq!(valid.location, "");
        assert_eq!(valid.incident_type, IncidentType::Fire);
    }

    #[test]
    fn test_missing_fields_share_message() {
        let no_title = submission(None, Some("Fire")).validate().unwrap_err();
        let blank_title = submission(Some("   "), Some("Fire")).validate().unwrap_err();
        let no_type = submission(Some("Alarm"), None).validate().unwrap_err();
        let blank_type = submission(Some("Alarm"), Some("")).validate().unwrap_err();

        for err in [no_title, blank_title, no_type, blank_type] {
            assert_eq!(err, ValidationError::MissingRequired);
            assert!(err.to_string().contains("Title and incident_type are required"));
        }
    }

    #[test]
    fn test_invalid_type() {
        let err = submission(Some("Alarm"), Some("InvalidType"))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidType);
        assert!(err.to_string().contains("Invalid incident_type"));

        // Matching is exact
        assert!("fire".parse::<IncidentType>().is_err());
        assert!(" Fire".parse::<IncidentType>().is_err());
    }

    #[test]
    fn test_every_type_round_trips() {
        for t in IncidentType::ALL {
            let valid = submission(Some("x"), Some(t.as_str())).validate().unwrap();
            assert_eq!(valid.incident_type, t);
            assert_eq!(serde_json::to_value(t).unwrap(), t.as_str());
        }
    }

    #[test]
    fn test_incident_json_shape() {
        let created_at = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        let incident = submission(Some("Alarm"), Some("Smoke"))
            .validate()
            .unwrap()
            .into_incident("1791970200123".to_string(), created_at, None);

        let json = serde_json::to_value(&incident).unwrap();
        assert_eq!(json["created_at"], "2026-10-14T09:30:00.123Z");
        assert_eq!(json["incident_type"], "Smoke");
        assert!(json.get("image").unwrap().is_null());

        let back: Incident = serde_json::from_value(json).unwrap();
        assert_eq!(back, incident);
    }

    #[test]
    fn test_newest_first_keeps_ties_in_order() {
        let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
        let make = |id: &str, secs| {
            submission(Some(id), Some("Fire"))
                .validate()
                .unwrap()
                .into_incident(id.to_string(), at(secs), None)
        };

        let sorted = newest_first(vec![make("a", 10), make("b", 20), make("c", 20), make("d", 5)]);
        let ids: Vec<_> = sorted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a", "d"]);
    }
}
