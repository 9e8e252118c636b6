//! Leads screen service — filter/sort helpers over the fetched lead list.

use std::collections::HashMap;

use crate::types::Lead;

/// Lead statuses in the order the filter chips show them.
pub const LEAD_STATUSES: [&str; 5] = ["new", "routed", "contacted", "converted", "lost"];

/// Filter by status; `None` means all.
pub fn filter_by_status<'a>(leads: &'a [Lead], status: Option<&str>) -> Vec<&'a Lead> {
    match status {
        Some(wanted) => leads.iter().filter(|l| l.status == wanted).collect(),
        None => leads.iter().collect(),
    }
}

/// Per-status counts for the filter chips. Statuses outside the known set
/// are counted too — the backend owns the status vocabulary.
pub fn status_counts(leads: &[Lead]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for lead in leads {
        *counts.entry(lead.status.clone()).or_insert(0) += 1;
    }
    counts
}

/// Resolve the display name from the free-form contact payload:
/// `name` for B2C, `firm_name` for B2B, else a placeholder.
pub fn display_name(lead: &Lead) -> String {
    lead.contact_json
        .get("name")
        .or_else(|| lead.contact_json.get("firm_name"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("N/A")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn lead(n: u128, status: &str, contact: serde_json::Value) -> Lead {
        Lead {
            id: Uuid::from_u128(n),
            tenant_id: None,
            source_type: "b2c".into(),
            vertical: Some("mx_divorce".into()),
            status: status.into(),
            contact_json: contact,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_none_returns_all() {
        let leads = vec![
            lead(1, "new", serde_json::json!({})),
            lead(2, "routed", serde_json::json!({})),
        ];
        assert_eq!(filter_by_status(&leads, None).len(), 2);
        assert_eq!(filter_by_status(&leads, Some("new")).len(), 1);
        assert_eq!(filter_by_status(&leads, Some("lost")).len(), 0);
    }

    #[test]
    fn counts_include_unknown_statuses() {
        let leads = vec![
            lead(1, "new", serde_json::json!({})),
            lead(2, "new", serde_json::json!({})),
            lead(3, "escalated", serde_json::json!({})),
        ];
        let counts = status_counts(&leads);
        assert_eq!(counts["new"], 2);
        assert_eq!(counts["escalated"], 1);
    }

    #[test]
    fn display_name_prefers_person_then_firm() {
        let person = lead(1, "new", serde_json::json!({"name": "Ana Torres"}));
        let firm = lead(2, "new", serde_json::json!({"firm_name": "Despacho Ruiz"}));
        let neither = lead(3, "new", serde_json::json!({"email": "x@example.mx"}));

        assert_eq!(display_name(&person), "Ana Torres");
        assert_eq!(display_name(&firm), "Despacho Ruiz");
        assert_eq!(display_name(&neither), "N/A");
    }

    #[test]
    fn blank_names_fall_through() {
        let blank = lead(1, "new", serde_json::json!({"name": "  "}));
        assert_eq!(display_name(&blank), "N/A");
    }
}
