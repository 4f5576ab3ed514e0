//! Group classification for templates without a stored app group.
//!
//! Classification is a case-insensitive substring match over the template's
//! name and content. Rules are checked in table order and the first hit wins,
//! so payment-link wording beats generic payment wording, which beats order
//! wording, and so on.

use crate::model::AppGroup;

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct GroupRule {
    /// Short label, only used in tracing output
    pub label: &'static str,
    pub group: AppGroup,
    pub keywords: &'static [&'static str],
}

/// Priority-ordered classification rules.
pub const GROUP_RULES: &[GroupRule] = &[
    GroupRule {
        label: "payment_link",
        group: AppGroup::Payment,
        keywords: &["upi", "payment link", "pay now", "setu", "pay_link", "paylink"],
    },
    GroupRule {
        label: "payment",
        group: AppGroup::Payment,
        keywords: &["payment", "paid", "invoice", "receipt", "due", "amount", "balance"],
    },
    GroupRule {
        label: "order",
        group: AppGroup::OrderStatus,
        keywords: &[
            "order",
            "shipped",
            "shipping",
            "dispatch",
            "delivery",
            "delivered",
            "tracking",
            "pickup",
            "ready for collection",
        ],
    },
    GroupRule {
        label: "promotion",
        group: AppGroup::Marketing,
        keywords: &[
            "offer",
            "discount",
            "sale",
            "festive",
            "exclusive",
            "collection",
            "gold rate",
            "new arrival",
            "promo",
        ],
    },
    GroupRule {
        label: "support",
        group: AppGroup::Support,
        keywords: &["support", "help", "feedback", "complaint", "query", "assist"],
    },
];

/// Infer a group from a template's name and content.
pub fn infer_group(name: &str, content: &str) -> AppGroup {
    classify_with(GROUP_RULES, name, content)
}

/// Same as [`infer_group`] against a caller-supplied rule table.
pub fn classify_with(rules: &[GroupRule], name: &str, content: &str) -> AppGroup {
    let haystack = format!("{} {}", name, content).to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|rule| {
            tracing::trace!(rule = rule.label, name, "classified template");
            rule.group
        })
        .unwrap_or(AppGroup::Uncategorized)
}
