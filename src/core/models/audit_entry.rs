use std::fmt;

use serde::{Deserialize, Serialize};

/// Actions that get recorded in the audit log.
///
/// Serialized as the Arabic label the dashboard displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "إنشاء متجر")]
    ShopCreated,
    #[serde(rename = "استخدام منشن")]
    MentionUsed,
    #[serde(rename = "تجديد المنشنات")]
    MentionsRenewed,
    #[serde(rename = "تعديل متجر")]
    ShopUpdated,
    #[serde(rename = "حذف متجر")]
    ShopDeleted,
}

impl AuditAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::ShopCreated => "إنشاء متجر",
            AuditAction::MentionUsed => "استخدام منشن",
            AuditAction::MentionsRenewed => "تجديد المنشنات",
            AuditAction::ShopUpdated => "تعديل متجر",
            AuditAction::ShopDeleted => "حذف متجر",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single entry in the audit log (JSON lines format).
///
/// `store`, `actor_name` and `actor_id` are copies taken at write time, so
/// renaming or deleting a shop later leaves history untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub time: chrono::DateTime<chrono::Utc>,
    pub action: AuditAction,
    pub store: String,
    pub actor_name: String,
    pub actor_id: String,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_as_label() {
        let json = serde_json::to_string(&AuditAction::ShopCreated).unwrap();
        assert_eq!(json, "\"إنشاء متجر\"");

        let back: AuditAction = serde_json::from_str("\"حذف متجر\"").unwrap();
        assert_eq!(back, AuditAction::ShopDeleted);
    }
}
