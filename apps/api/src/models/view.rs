use serde::{Deserialize, Serialize};

/// The application views a tool invocation (or the user) can switch between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    #[default]
    Dashboard,
    Resume,
    Roadmap,
    Ats,
    Projects,
    Interview,
    Profile,
}

impl AppView {
    /// Header label for a view. The Projects view must read exactly "PROJECTS"
    /// (matching the system instruction given to the model).
    pub fn label(&self) -> &'static str {
        match self {
            AppView::Dashboard => "DASHBOARD",
            AppView::Resume => "RESUME",
            AppView::Roadmap => "ROADMAP",
            AppView::Ats => "ATS",
            AppView::Projects => "PROJECTS",
            AppView::Interview => "INTERVIEW",
            AppView::Profile => "PROFILE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_serde_lowercase() {
        let view: AppView = serde_json::from_str(r#""roadmap""#).unwrap();
        assert_eq!(view, AppView::Roadmap);
        assert_eq!(serde_json::to_string(&AppView::Ats).unwrap(), r#""ats""#);
    }

    #[test]
    fn test_projects_label_is_uppercase_projects() {
        assert_eq!(AppView::Projects.label(), "PROJECTS");
    }
}
