//! Request and response shapes of the document generation service.
//!
//! Substitution happens in the service. This module only builds requests,
//! reads responses, and checks which placeholders a client-data mapping covers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::model::PlaceholderSet;

/// Flat mapping from placeholder token (or variant key) to replacement text.
pub type ClientData = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub templates: Vec<String>,
    pub client_data: ClientData,
}

impl GenerationRequest {
    pub fn new(templates: Vec<String>, client_data: ClientData) -> Self {
        Self {
            templates,
            client_data,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create request directory: {}", parent.display())
            })?;
        }
        let data =
            serde_json::to_string_pretty(self).context("failed to serialize generation request")?;
        fs::write(path, data)
            .with_context(|| format!("failed to write generation request to {}", path.display()))
    }
}

/// Load a client-data mapping from a JSON object file.
pub fn load_client_data(path: &Path) -> Result<ClientData> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read client data from {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("client data in {} must be a JSON object of strings", path.display()))
}

/// Per-template result returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        template_id: String,
        success: bool,
        filename: String,
        download_url: String,
    },
    #[serde(rename_all = "camelCase")]
    Failure { template_id: String, error: String },
}

impl GenerationOutcome {
    pub fn template_id(&self) -> &str {
        match self {
            GenerationOutcome::Success { template_id, .. }
            | GenerationOutcome::Failure { template_id, .. } => template_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { success: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<GenerationOutcome>,
}

impl BatchResponse {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read generation response {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("invalid generation response in {}", path.display()))
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// How a client-data mapping lines up with a template's placeholders.
///
/// Keys are compared exactly: `[Client Name]` and `clientName` are distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyCoverage {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub unused: Vec<String>,
}

impl KeyCoverage {
    pub fn compute(placeholders: &PlaceholderSet, data: &ClientData) -> Self {
        let mut coverage = KeyCoverage::default();
        for token in placeholders.sorted() {
            if data.contains_key(token) {
                coverage.matched.push(token.to_owned());
            } else {
                coverage.missing.push(token.to_owned());
            }
        }
        coverage.unused = data
            .keys()
            .filter(|key| !placeholders.contains(key))
            .cloned()
            .collect();
        coverage
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_service_field_names() -> Result<()> {
        let mut data = ClientData::new();
        data.insert("[Client Name]".into(), "Sarah Johnson".into());
        let request = GenerationRequest::new(vec!["annual_update".into()], data);

        let value = serde_json::to_value(&request)?;
        assert_eq!(value["templates"][0], "annual_update");
        assert_eq!(value["clientData"]["[Client Name]"], "Sarah Johnson");
        Ok(())
    }

    #[test]
    fn parses_mixed_batch_response() -> Result<()> {
        let response: BatchResponse = serde_json::from_str(
            r#"{"results":[
                {"templateId":"annual_update","success":true,"filename":"annual_update_1.docx","downloadUrl":"/api/download/annual_update_1.docx"},
                {"templateId":"review_report","error":"Template not found"}
            ]}"#,
        )?;

        assert_eq!(response.succeeded(), 1);
        assert_eq!(response.failed(), 1);
        assert_eq!(response.results[1].template_id(), "review_report");
        match &response.results[0] {
            GenerationOutcome::Success { download_url, .. } => {
                assert_eq!(download_url, "/api/download/annual_update_1.docx")
            }
            other => panic!("expected success, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn coverage_matches_keys_exactly() {
        let placeholders: PlaceholderSet =
            ["[Client Name]", "[Date]", "[Risk Level]"].into_iter().collect();
        let mut data = ClientData::new();
        data.insert("[Client Name]".into(), "John Smith".into());
        data.insert("Risk Level".into(), "Moderate".into());
        data.insert("[Date]".into(), "06/02/2024".into());

        let coverage = KeyCoverage::compute(&placeholders, &data);
        assert_eq!(coverage.matched, vec!["[Client Name]", "[Date]"]);
        assert_eq!(coverage.missing, vec!["[Risk Level]"]);
        assert_eq!(coverage.unused, vec!["Risk Level"]);
        assert!(!coverage.is_complete());
    }

    #[test]
    fn loads_client_data_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("client.json");
        fs::write(&path, r#"{"[Date]": "06/02/2024", "date": "06/02/2024"}"#)?;
        let data = load_client_data(&path)?;
        assert_eq!(data.len(), 2);

        fs::write(&path, r#"["not", "an", "object"]"#)?;
        assert!(load_client_data(&path).is_err());
        Ok(())
    }
}
