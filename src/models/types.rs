use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub session_id: String,
    pub model: String,
    /// `None` serializes as `null` and lets the server pick the source
    pub source_id: Option<String>,
}

/// Successful answer from `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Error body returned with a non-success status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable detail text.
    ///
    /// A plain string is used verbatim. Validation failures arrive as a list
    /// of `{ "msg": ... }` objects and are joined. Anything else counts as no
    /// detail at all.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Extract the detail text from a raw error body, if it is JSON at all
pub fn parse_error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail_text())
}

/// Identifier as sent by the catalog: some backends use numeric row ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Text(String),
    Number(i64),
}

impl EntryId {
    fn into_string(self) -> String {
        match self {
            EntryId::Text(s) => s,
            EntryId::Number(n) => n.to_string(),
        }
    }
}

/// One entry of `GET /list-sources`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<EntryId>,
}

impl CatalogEntry {
    /// `id` wins over `file_id` when both are present
    pub fn identifier(&self) -> Option<String> {
        self.id
            .clone()
            .or_else(|| self.file_id.clone())
            .map(EntryId::into_string)
    }
}

/// Response of `GET /list-sources`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCatalog {
    #[serde(default)]
    pub excel: Vec<CatalogEntry>,
    #[serde(default)]
    pub rag: Vec<CatalogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_serializes_null_source() {
        let request = ChatRequest {
            question: "hola".to_string(),
            session_id: "user-0a1b2c3d".to_string(),
            model: "llama-3.3-70b".to_string(),
            source_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "question": "hola",
                "session_id": "user-0a1b2c3d",
                "model": "llama-3.3-70b",
                "source_id": null,
            })
        );
    }

    #[test]
    fn test_response_tolerates_missing_extras() {
        let response: ChatResponse = serde_json::from_str(r#"{"answer":"Hi there"}"#).unwrap();
        assert_eq!(response.answer, "Hi there");
        assert_eq!(response.session_id, None);
    }

    #[test]
    fn test_error_detail_shapes() {
        assert_eq!(
            parse_error_detail(r#"{"detail":"bad request"}"#),
            Some("bad request".to_string())
        );
        assert_eq!(
            parse_error_detail(
                r#"{"detail":[{"loc":["body","question"],"msg":"field required"},{"msg":"bad model"}]}"#
            ),
            Some("field required; bad model".to_string())
        );
        assert_eq!(parse_error_detail(r#"{"detail":42}"#), None);
        assert_eq!(parse_error_detail(r#"{"detail":"  "}"#), None);
        assert_eq!(parse_error_detail("Internal Server Error"), None);
        assert_eq!(parse_error_detail(""), None);
    }

    #[test]
    fn test_catalog_entry_identifiers() {
        let catalog: SourceCatalog = serde_json::from_value(json!({
            "excel": [
                {"filename": "report.xlsx", "id": "s1"},
                {"filename": "ventas.xlsx", "file_id": 7},
            ],
            "rag": [
                {"filename": "manual.pdf", "file_id": "r1", "id": "preferred"},
                {"filename": "orphan.pdf"},
            ]
        }))
        .unwrap();

        let ids: Vec<Option<String>> = catalog
            .excel
            .iter()
            .chain(catalog.rag.iter())
            .map(|e| e.identifier())
            .collect();
        assert_eq!(
            ids,
            vec![
                Some("s1".to_string()),
                Some("7".to_string()),
                Some("preferred".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_catalog_missing_groups_default_empty() {
        let catalog: SourceCatalog = serde_json::from_str(r#"{"excel":[]}"#).unwrap();
        assert!(catalog.excel.is_empty());
        assert!(catalog.rag.is_empty());
    }
}
