/// Static keyword rule table for multi-system triage.
///
/// The table is configuration data: loaded once at startup, read-only
/// thereafter, and passed explicitly into the classifier. Declaration order
/// within a tier is significant: it is the tie-break that decides which
/// specialty becomes primary when several rules of the same tier match.
use crate::model::{CategoryRule, Tier, TriageCategory};

/// Fallback category when no rule matches.
pub fn fallback_category() -> TriageCategory {
    TriageCategory::new(Tier::Routine, "General Medicine")
}

/// Build the default rule table, grouped by tier in precedence order.
///
/// Specialties deliberately appear in more than one tier (Cardiology,
/// Neurology): a routine-tier match for the primary's own specialty must be
/// suppressed from the secondary alerts, and that path needs real rules to
/// exercise it.
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        // Urgent
        CategoryRule::new(
            Tier::Urgent,
            "Cardiology",
            &["chest pain", "shortness of breath", "palpitations", "syncope"],
        ),
        CategoryRule::new(
            Tier::Urgent,
            "Neurology",
            &["sudden weakness", "facial droop", "slurred speech", "seizure"],
        ),
        CategoryRule::new(
            Tier::Urgent,
            "Gastroenterology",
            &["rectal bleeding", "haematemesis", "melaena", "dysphagia"],
        ),
        CategoryRule::new(Tier::Urgent, "Respiratory", &["haemoptysis", "stridor"]),
        // Semi-Urgent
        CategoryRule::new(
            Tier::SemiUrgent,
            "Cardiology",
            &["exertional chest tightness", "ankle swelling"],
        ),
        CategoryRule::new(
            Tier::SemiUrgent,
            "Neurology",
            &["numbness", "tingling", "recurrent headache", "tremor"],
        ),
        CategoryRule::new(
            Tier::SemiUrgent,
            "Gastroenterology",
            &["persistent diarrhoea", "abdominal pain", "unintentional weight loss"],
        ),
        CategoryRule::new(Tier::SemiUrgent, "Respiratory", &["chronic cough", "wheeze"]),
        // Routine
        CategoryRule::new(
            Tier::Routine,
            "Orthopedics",
            &["stiffness", "joint pain", "back pain", "knee pain"],
        ),
        CategoryRule::new(Tier::Routine, "Dermatology", &["rash", "eczema", "itching"]),
        CategoryRule::new(
            Tier::Routine,
            "General Medicine",
            &["fatigue", "tiredness", "general checkup"],
        ),
    ]
}
