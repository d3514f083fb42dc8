//! Artifact payloads produced by tool invocations.
//!
//! Field names are camelCase on the wire because they must match the
//! parameter schemas declared to the model. Everything is `#[serde(default)]`
//! tolerant: a missing field degrades to an empty display value downstream,
//! it never fails the dispatch.

use serde::{Deserialize, Serialize};

/// Structured job context extracted by `analyzeJob`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobData {
    pub title: String,
    pub company: String,
    pub location: String,
    pub role_summary: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub tools: Vec<String>,
    pub experience_level: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub location: String,
    pub date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub location: String,
    pub date: String,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub link: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraEntry {
    pub category: String,
    pub details: String,
}

/// Resume artifact set by `generateResume`. `latex_code` carries the layout
/// rendition; the structured fields back the web preview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub skills: Vec<String>,
    pub latex_code: Option<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub achievements: Vec<String>,
    pub extra: Vec<ExtraEntry>,
    /// How closely the generated layout matches the reference, 0–100.
    pub mimic_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourcePlatform {
    YouTube,
    #[default]
    Article,
    Course,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub platform: ResourcePlatform,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoadmapStep {
    pub title: String,
    pub description: String,
    pub topics: Vec<String>,
    pub timeline: String,
    pub status: StepStatus,
}

/// Learning roadmap set by `generateRoadmap`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoadmapData {
    pub steps: Vec<RoadmapStep>,
    pub recommended_resources: Vec<Resource>,
}

/// ATS screening result set by `checkATS`. The score drives the
/// auto-optimization policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtsResult {
    pub score: f64,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewQuestion {
    pub question: String,
    pub category: String,
    pub hint: Option<String>,
}

/// Interview prep assets set by `prepareInterview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewPrepData {
    pub questions: Vec<InterviewQuestion>,
    pub technical_topics: Vec<String>,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideTheme {
    #[default]
    Modern,
    Dark,
    Professional,
    Creative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideFont {
    #[default]
    Sans,
    Serif,
    Mono,
}

/// Where a slide's visual comes from. `Ai` slides get an image-generation
/// call; `None` slides render text-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlideImageType {
    Ai,
    Browser,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slide {
    pub header: String,
    pub content: Vec<String>,
    pub speaker_notes: Option<String>,
    pub image_prompt: Option<String>,
    pub image_type: SlideImageType,
    pub image_url: Option<String>,
}

/// Project slide deck set by `generateProjectsPPT`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideDeck {
    pub title: String,
    pub theme: SlideTheme,
    pub font: SlideFont,
    pub slides: Vec<Slide>,
}
