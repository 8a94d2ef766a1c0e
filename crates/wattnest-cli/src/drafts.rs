//! Draft loading from JSON files

use anyhow::Context;
use automation_core::AutomationDraft;
use std::path::Path;
use tokio::fs;

/// Load an automation draft from a JSON file
pub async fn load_draft(path: &Path) -> anyhow::Result<AutomationDraft> {
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read draft file {}", path.display()))?;

    let draft: AutomationDraft = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse draft file {}", path.display()))?;

    tracing::debug!(
        "Loaded draft '{}' with {} actions from {:?}",
        draft.name,
        draft.actions.len(),
        path
    );
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use automation_core::{AutomationTrigger, RunMode, SolarEvent};
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_draft() {
        let file = write_temp(
            r#"{
                "name": "Evening lights",
                "trigger": { "type": "solar", "event": "sunset", "offset_minutes": -30 },
                "actions": [{
                    "type": "device",
                    "device_id": "lamp-1",
                    "device_name": "Living room lamp",
                    "service": "turn_on",
                    "domain": "light",
                    "parameters": { "brightness": 180 }
                }]
            }"#,
        );

        let draft = load_draft(file.path()).await.unwrap();
        assert_eq!(draft.name, "Evening lights");
        assert!(draft.active);
        assert_eq!(draft.mode, RunMode::Single);
        assert!(matches!(
            draft.trigger,
            Some(AutomationTrigger::Solar {
                event: SolarEvent::Sunset,
                offset_minutes: -30,
                ..
            })
        ));
        assert_eq!(draft.actions.len(), 1);
        assert!(draft.is_valid());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = load_draft(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("Failed to read draft file"));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let file = write_temp(r#"{ "name": 3 }"#);
        let error = load_draft(file.path()).await.unwrap_err();
        assert!(error.to_string().contains("Failed to parse draft file"));
    }
}
