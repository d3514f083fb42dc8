//! User profile — the only state that survives a session.

use serde::{Deserialize, Serialize};

use crate::models::artifacts::{
    EducationEntry, ExperienceEntry, ExtraEntry, ProjectEntry,
};

/// Long-lived identity and career data. Created at sign-in, mutated by
/// profile edits, cleared only on explicit sign-out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub is_authenticated: bool,
    pub profile_id: String,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub summary: String,
    pub academics_summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub achievements: Vec<String>,
    pub extra: Vec<ExtraEntry>,
}

impl UserProfile {
    /// Completeness gate: a profile can drive generation only with a name,
    /// an email, a non-blank summary, and at least one experience or
    /// education entry.
    pub fn is_complete(&self) -> bool {
        if self.name.is_empty() || self.email.is_empty() || self.summary.trim().is_empty() {
            return false;
        }
        if self.experience.is_empty() && self.education.is_empty() {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_profile() -> UserProfile {
        UserProfile {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            summary: "Engineer working on analytical engines.".into(),
            experience: vec![ExperienceEntry {
                company: "Analytical Engines Ltd".into(),
                role: "Engineer".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_profile_with_experience_is_complete() {
        assert!(complete_profile().is_complete());
    }

    #[test]
    fn test_blank_summary_fails_completeness() {
        let mut profile = complete_profile();
        profile.summary = "   ".into();
        assert!(!profile.is_complete());
    }

    #[test]
    fn test_education_alone_satisfies_history_requirement() {
        let mut profile = complete_profile();
        profile.experience.clear();
        profile.education.push(EducationEntry {
            institution: "University of London".into(),
            ..Default::default()
        });
        assert!(profile.is_complete());
    }

    #[test]
    fn test_no_experience_or_education_fails() {
        let mut profile = complete_profile();
        profile.experience.clear();
        assert!(!profile.is_complete());
    }

    #[test]
    fn test_default_profile_is_incomplete_and_unauthenticated() {
        let profile = UserProfile::default();
        assert!(!profile.is_authenticated);
        assert!(!profile.is_complete());
    }
}
