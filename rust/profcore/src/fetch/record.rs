//! Wire types returned by the review service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Success payload of `GET /professor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorRecord {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    pub reviews: Vec<ReviewEntry>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    /// Percentage 0..=100
    #[serde(default)]
    pub would_take_again: Option<f64>,
    #[serde(default)]
    pub num_ratings: Option<u32>,
    #[serde(default)]
    pub department: Option<String>,
}

/// One student review, in service order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    #[serde(default)]
    pub rating: Option<f64>,
    pub text: String,
    #[serde(default)]
    pub course: Option<String>,
    /// ISO-8601 date or timestamp
    #[serde(default)]
    pub date: Option<String>,
}

// =============================================================================
// Lenient decoding
// =============================================================================

/// Numbers, or numeric strings like `"4.2"`. Anything else is absent.
fn loose_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn loose_u32(value: Option<&Value>) -> Option<u32> {
    let n = loose_f64(value)?;
    (0.0..=f64::from(u32::MAX)).contains(&n).then(|| n.round() as u32)
}

fn loose_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

impl ReviewEntry {
    /// `None` when the entry is not an object or has no string `text`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            rating: loose_f64(object.get("rating")),
            text: loose_string(object.get("text"))?,
            course: loose_string(object.get("course")),
            date: loose_string(object.get("date")),
        })
    }
}

impl ProfessorRecord {
    /// Decode a success body whose `reviews` array has already been checked.
    ///
    /// Optional fields of the wrong type are treated as absent, and review
    /// entries that cannot be read are skipped. A missing `name` is left
    /// empty for the caller to fill in.
    pub fn from_object(object: &Map<String, Value>, reviews: &[Value]) -> Self {
        Self {
            name: loose_string(object.get("name")).unwrap_or_default(),
            rating: loose_f64(object.get("rating")),
            summary: loose_string(object.get("summary")),
            reviews: reviews.iter().filter_map(ReviewEntry::from_value).collect(),
            difficulty: loose_f64(object.get("difficulty")),
            would_take_again: loose_f64(object.get("wouldTakeAgain")),
            num_ratings: loose_u32(object.get("numRatings")),
            department: loose_string(object.get("department")),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub claude_configured: bool,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Error descriptor the service attaches to 4xx/5xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record_deserializes() {
        let json = r#"{
            "name": "Jane Doe",
            "rating": 4.2,
            "difficulty": 3.1,
            "wouldTakeAgain": 87.5,
            "numRatings": 41,
            "department": "Computer Science",
            "summary": "Clear lectures.",
            "reviews": [
                { "rating": 5.0, "text": "Great", "course": "TCSS 142", "date": "2024-03-01" }
            ]
        }"#;
        let record: ProfessorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.rating, Some(4.2));
        assert_eq!(record.would_take_again, Some(87.5));
        assert_eq!(record.num_ratings, Some(41));
        assert_eq!(record.reviews[0].course.as_deref(), Some("TCSS 142"));
    }

    #[test]
    fn test_minimal_record_deserializes() {
        let record: ProfessorRecord =
            serde_json::from_str(r#"{ "name": "Jane Doe", "reviews": [] }"#).unwrap();
        assert!(record.rating.is_none());
        assert!(record.summary.is_none());
        assert!(record.reviews.is_empty());
    }

    #[test]
    fn test_null_optionals_are_absent() {
        let record: ProfessorRecord = serde_json::from_str(
            r#"{ "name": "Jane Doe", "rating": null, "reviews": [ { "text": "ok", "course": null } ] }"#,
        )
        .unwrap();
        assert!(record.rating.is_none());
        assert!(record.reviews[0].course.is_none());
    }

    fn decode(json: &str) -> ProfessorRecord {
        let value: Value = serde_json::from_str(json).unwrap();
        let object = value.as_object().unwrap();
        let reviews = object["reviews"].as_array().unwrap();
        ProfessorRecord::from_object(object, reviews)
    }

    #[test]
    fn test_lenient_decode_tolerates_bad_optionals() {
        let record = decode(
            r#"{ "rating": "4.2", "difficulty": "hard", "numRatings": -3, "summary": 7, "reviews": [] }"#,
        );
        assert_eq!(record.name, "");
        assert_eq!(record.rating, Some(4.2));
        assert!(record.difficulty.is_none());
        assert!(record.num_ratings.is_none());
        assert!(record.summary.is_none());
    }

    #[test]
    fn test_lenient_decode_skips_unreadable_reviews() {
        let record = decode(
            r#"{ "name": "Jane Doe", "reviews": [
                { "rating": 4, "text": "kept" },
                { "rating": 5 },
                "stray string",
                { "text": "also kept", "rating": "n/a", "course": 142 }
            ] }"#,
        );
        let texts: Vec<&str> = record.reviews.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["kept", "also kept"]);
        assert!(record.reviews[1].rating.is_none());
        assert!(record.reviews[1].course.is_none());
    }

    #[test]
    fn test_health_body() {
        let health: ServiceHealth = serde_json::from_str(
            r#"{ "status": "healthy", "school": "UW Tacoma", "claude_configured": true }"#,
        )
        .unwrap();
        assert!(health.is_healthy());
        assert!(health.claude_configured);
    }
}
