//! The required template catalog.
//!
//! These nine templates are the desired state: the store and the remote
//! provider must always carry a compliant, non-rejected copy of each. The
//! catalog is compiled in and never changes at runtime.

use chrono::Utc;

use crate::model::{
    system_id, AppGroup, TemplateCategory, TemplateDraft, TemplateRecord, TemplateSource,
    DEFAULT_LANGUAGE,
};
use crate::validate::align_examples;

/// A canonical template definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredTemplate {
    pub name: &'static str,
    pub content: &'static str,
    pub category: TemplateCategory,
    pub app_group: AppGroup,
    pub examples: &'static [&'static str],
}

impl RequiredTemplate {
    /// Owned example values.
    pub fn example_values(&self) -> Vec<String> {
        self.examples.iter().map(|e| e.to_string()).collect()
    }

    /// Draft used when this template has to be created remotely.
    pub fn draft(&self) -> TemplateDraft {
        TemplateDraft::new(self.name, self.content, self.category)
            .with_group(self.app_group)
            .with_examples(self.example_values())
    }

    /// Bootstrap record carrying a system id.
    pub fn seed_record(&self) -> TemplateRecord {
        TemplateRecord {
            id: system_id(self.name),
            name: self.name.to_string(),
            content: self.content.to_string(),
            category: self.category,
            app_group: Some(self.app_group),
            source: TemplateSource::Local,
            status: None,
            rejection_reason: None,
            structure: None,
            variable_examples: align_examples(self.content, &self.example_values()),
            language: DEFAULT_LANGUAGE.to_string(),
            updated_at: Utc::now(),
        }
    }
}

/// The required templates, in reconciliation order.
pub const REQUIRED_TEMPLATES: [RequiredTemplate; 9] = [
    RequiredTemplate {
        name: "setu_payment_button",
        content: "Hello {{1}}, your payment of Rs. {{2}} for order {{3}} is ready. Tap the button below to pay securely via UPI.",
        category: TemplateCategory::Utility,
        app_group: AppGroup::Payment,
        examples: &["Priya", "45,000", "ORD-1042"],
    },
    RequiredTemplate {
        name: "payment_link_upi",
        content: "Dear {{1}}, please complete your payment of Rs. {{2}} using this UPI link: {{3}}. The link is valid for 24 hours.",
        category: TemplateCategory::Utility,
        app_group: AppGroup::Payment,
        examples: &["Priya", "45,000", "https://pay.example.in/abc123"],
    },
    RequiredTemplate {
        name: "payment_received",
        content: "Thank you {{1}}! We have received Rs. {{2}} against invoice {{3}}. Your receipt is attached for your records.",
        category: TemplateCategory::Utility,
        app_group: AppGroup::Payment,
        examples: &["Priya", "45,000", "INV-2210"],
    },
    RequiredTemplate {
        name: "payment_reminder",
        content: "Hi {{1}}, a balance of Rs. {{2}} is due on {{3}} for your order. Please visit the store or reply to pay online.",
        category: TemplateCategory::Utility,
        app_group: AppGroup::Payment,
        examples: &["Priya", "12,500", "15 Nov"],
    },
    RequiredTemplate {
        name: "order_confirmation",
        content: "Hi {{1}}, your order {{2}} has been confirmed. Estimated ready date: {{3}}. Thank you for shopping with us!",
        category: TemplateCategory::Utility,
        app_group: AppGroup::OrderStatus,
        examples: &["Priya", "ORD-1042", "20 Nov"],
    },
    RequiredTemplate {
        name: "order_ready_pickup",
        content: "Good news {{1}}! Your order {{2}} is ready for pickup at our {{3}} showroom. Please carry a valid photo ID.",
        category: TemplateCategory::Utility,
        app_group: AppGroup::OrderStatus,
        examples: &["Priya", "ORD-1042", "MG Road"],
    },
    RequiredTemplate {
        name: "order_shipped",
        content: "Hi {{1}}, your order {{2}} has been shipped via {{3}}. Track it here: {{4}}.",
        category: TemplateCategory::Utility,
        app_group: AppGroup::OrderStatus,
        examples: &["Priya", "ORD-1042", "BlueDart", "https://track.example.in/XYZ"],
    },
    RequiredTemplate {
        name: "festive_offer",
        content: "Dear {{1}}, celebrate {{2}} with an exclusive {{3}} off on making charges across our collection. Offer valid till {{4}}.",
        category: TemplateCategory::Marketing,
        app_group: AppGroup::Marketing,
        examples: &["Priya", "Diwali", "20%", "5 Nov"],
    },
    RequiredTemplate {
        name: "support_followup",
        content: "Hi {{1}}, thank you for contacting us about {{2}}. Our team will get back to you within {{3}} hours.",
        category: TemplateCategory::Utility,
        app_group: AppGroup::Support,
        examples: &["Priya", "ring resizing", "24"],
    },
];

/// All required templates in reconciliation order.
pub fn required_templates() -> &'static [RequiredTemplate] {
    &REQUIRED_TEMPLATES
}

/// Look up a required template by name.
pub fn find_required(name: &str) -> Option<&'static RequiredTemplate> {
    REQUIRED_TEMPLATES.iter().find(|r| r.name == name)
}

/// Bootstrap records for every required template missing from `existing`.
///
/// Existing records are matched by name; nothing already present is touched.
pub fn seed_missing(existing: &[TemplateRecord]) -> Vec<TemplateRecord> {
    REQUIRED_TEMPLATES
        .iter()
        .filter(|required| !existing.iter().any(|r| r.name == required.name))
        .map(RequiredTemplate::seed_record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::infer_group;
    use crate::model::is_system_id;
    use crate::validate::{placeholder_count, validate_record};
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_nine_unique_names() {
        let names: HashSet<_> = REQUIRED_TEMPLATES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_examples_match_placeholders() {
        for required in required_templates() {
            assert_eq!(
                required.examples.len(),
                placeholder_count(required.content),
                "{}",
                required.name
            );
        }
    }

    #[test]
    fn test_declared_groups_agree_with_classifier() {
        for required in required_templates() {
            assert_eq!(
                infer_group(required.name, required.content),
                required.app_group,
                "{}",
                required.name
            );
        }
    }

    #[test]
    fn test_seed_record_uses_system_id() {
        let record = REQUIRED_TEMPLATES[0].seed_record();
        assert!(is_system_id(&record.id));
        assert_eq!(record.source, TemplateSource::Local);
        validate_record(&record).unwrap();
    }

    #[test]
    fn test_seed_missing_skips_existing_names() {
        let existing = vec![REQUIRED_TEMPLATES[2].seed_record()];
        let seeded = seed_missing(&existing);
        assert_eq!(seeded.len(), 8);
        assert!(seeded.iter().all(|r| r.name != REQUIRED_TEMPLATES[2].name));
    }

    #[test]
    fn test_find_required() {
        assert!(find_required("setu_payment_button").is_some());
        assert!(find_required("unknown").is_none());
    }
}
