//! Decoding of tracker webhook payloads.

use super::{IssueDomainError, IssueEvent, IssueEventType, IssueSnapshot};
use serde::Deserialize;

const STATUS_FIELD: &str = "status";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload {
    webhook_event: String,
    issue: IssuePayload,
    #[serde(default)]
    changelog: Option<ChangelogPayload>,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    key: String,
    fields: IssueFieldsPayload,
}

#[derive(Debug, Deserialize)]
struct IssueFieldsPayload {
    issuetype: NamedPayload,
    status: NamedPayload,
    project: ProjectPayload,
}

#[derive(Debug, Deserialize)]
struct NamedPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProjectPayload {
    key: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChangelogPayload {
    #[serde(default)]
    items: Vec<ChangeItemPayload>,
}

#[derive(Debug, Deserialize)]
struct ChangeItemPayload {
    field: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

impl ChangelogPayload {
    fn records_status_change(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.field == STATUS_FIELD && item.from != item.to)
    }
}

impl IssueEvent {
    /// Decodes a webhook delivery.
    ///
    /// A delivery without a changelog is treated as not changing the status.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::MalformedPayload`] when the JSON does not
    /// carry the expected fields, [`IssueDomainError::UnknownEventType`] for
    /// unrecognised event identifiers, and [`IssueDomainError::EmptyField`]
    /// for blank issue keys or types.
    pub fn from_payload(payload: &str) -> Result<Self, IssueDomainError> {
        let decoded: WebhookPayload = serde_json::from_str(payload)
            .map_err(|err| IssueDomainError::MalformedPayload(err.to_string()))?;
        let event_type = IssueEventType::from_id(&decoded.webhook_event)?;
        let fields = decoded.issue.fields;
        let issue = IssueSnapshot::new(
            decoded.issue.key,
            fields.issuetype.name,
            fields.status.name,
            fields.project.key,
        )?;
        let status_changed = decoded
            .changelog
            .is_some_and(|changelog| changelog.records_status_change());
        Ok(Self::new(event_type, issue, status_changed))
    }
}
