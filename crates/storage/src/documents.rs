//! Conversions from raw BSON documents into display summaries.
//!
//! The dashboard reads whatever schema the lead-generation pipeline wrote and
//! never validates it: an absent, null, or blank field becomes its display
//! default, and non-string values (a numeric score, say) are rendered as-is.

use leadboard_domain::model::{EmailSummary, LeadSummary};
use mongodb::bson::{Bson, Document};

pub(crate) fn lead_summary(doc: &Document) -> LeadSummary {
    LeadSummary {
        name: display_field(doc, "name", LeadSummary::DEFAULT_NAME),
        email: display_field(doc, "email", LeadSummary::FIELD_FALLBACK),
        institution: display_field(doc, "institution", LeadSummary::FIELD_FALLBACK),
        status: display_field(doc, "status", LeadSummary::DEFAULT_STATUS),
        score: display_field(doc, "score", LeadSummary::FIELD_FALLBACK),
    }
}

pub(crate) fn email_summary(doc: &Document) -> EmailSummary {
    EmailSummary {
        recipient: display_field(doc, "recipient", "N/A"),
        subject: display_field(doc, "subject", "N/A"),
        status: display_field(doc, "status", "unknown"),
    }
}

fn display_field(doc: &Document, key: &str, fallback: &str) -> String {
    match doc.get(key) {
        None | Some(Bson::Null) => fallback.to_string(),
        Some(Bson::String(value)) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn lead_fields_fall_back_when_absent() {
        let lead = lead_summary(&doc! { "email": "a@example.edu" });
        assert_eq!(lead.name, "Unknown");
        assert_eq!(lead.email, "a@example.edu");
        assert_eq!(lead.institution, "N/A");
        assert_eq!(lead.status, "New");
        assert_eq!(lead.score, "N/A");
    }

    #[test]
    fn numeric_score_is_rendered_without_validation() {
        let lead = lead_summary(&doc! { "name": "Ada", "score": 87 });
        assert_eq!(lead.score, "87");
    }

    #[test]
    fn null_and_blank_values_use_the_fallback() {
        let lead = lead_summary(&doc! { "name": Bson::Null, "institution": "   " });
        assert_eq!(lead.name, "Unknown");
        assert_eq!(lead.institution, "N/A");
    }

    #[test]
    fn email_summary_defaults() {
        let email = email_summary(&doc! { "status": "sent" });
        assert_eq!(email.recipient, "N/A");
        assert_eq!(email.subject, "N/A");
        assert_eq!(email.status, "sent");
    }
}
