use serde::{Deserialize, Serialize};

/// A generated interview as persisted in the `interviews` collection.
///
/// Serialized in camelCase; the frontend reads these documents directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub role: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub level: String,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
    pub user_id: String,
    pub finalized: bool,
    pub cover_image: String,
    /// RFC 3339, millisecond precision, UTC.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_with_document_field_names() {
        let record = InterviewRecord {
            role: "Backend Engineer".to_string(),
            interview_type: "technical".to_string(),
            level: "Senior".to_string(),
            techstack: vec!["Go".to_string()],
            questions: vec!["Why Go?".to_string()],
            user_id: "user-1".to_string(),
            finalized: true,
            cover_image: "/covers/adobe.png".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "Backend Engineer",
                "type": "technical",
                "level": "Senior",
                "techstack": ["Go"],
                "questions": ["Why Go?"],
                "userId": "user-1",
                "finalized": true,
                "coverImage": "/covers/adobe.png",
                "createdAt": "2026-01-01T00:00:00.000Z"
            })
        );
    }
}
