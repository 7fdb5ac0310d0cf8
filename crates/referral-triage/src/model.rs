use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority tier of a triage category. Variant order is the classification
/// precedence: every `Urgent` rule is considered before any `SemiUrgent`
/// rule, which is considered before any `Routine` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Urgent,
    SemiUrgent,
    Routine,
}

impl Tier {
    /// All tiers in precedence order.
    pub const ALL: [Tier; 3] = [Tier::Urgent, Tier::SemiUrgent, Tier::Routine];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Urgent => "Urgent",
            Tier::SemiUrgent => "Semi-Urgent",
            Tier::Routine => "Routine",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A triage bucket: priority tier plus clinical specialty.
///
/// The display label (e.g. "Urgent - Cardiology") is derived, never parsed;
/// specialty comparisons are plain field comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriageCategory {
    pub tier: Tier,
    pub specialty: String,
}

impl TriageCategory {
    pub fn new(tier: Tier, specialty: impl Into<String>) -> Self {
        Self {
            tier,
            specialty: specialty.into(),
        }
    }

    /// Compound display label, e.g. "Semi-Urgent - Neurology".
    pub fn label(&self) -> String {
        format!("{} - {}", self.tier, self.specialty)
    }
}

impl fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.tier, self.specialty)
    }
}

/// One entry of the static keyword rule table: a triage category and the
/// keyword phrases that select it. Keywords are stored lower-cased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: TriageCategory,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(tier: Tier, specialty: &str, keywords: &[&str]) -> Self {
        Self {
            category: TriageCategory::new(tier, specialty),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Result of classifying a referral summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Exactly one primary category per input.
    pub primary: TriageCategory,
    /// Distinct categories from other specialties that also matched,
    /// sorted lexicographically by label. Never contains the primary's
    /// specialty.
    pub secondary_alerts: Vec<TriageCategory>,
}

impl Classification {
    pub fn secondary_labels(&self) -> Vec<String> {
        self.secondary_alerts.iter().map(|c| c.label()).collect()
    }
}

/// A fetched guideline source page: extracted title plus the full page text
/// with whitespace runs collapsed to single spaces. Produced fresh per fetch
/// attempt; never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidelinePage {
    pub title: String,
    pub url: String,
    pub text: String,
}

/// A snippet extracted from a guideline page. The page title is used for
/// both `source` and `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub source: String,
    pub title: String,
    pub snippet: String,
    pub url: String,
}
