//! Tool Schema Registry — the fixed menu of operations the model may invoke.
//!
//! ARCHITECTURAL RULE: schemas and the dispatcher stay in lockstep. Adding a
//! capability means adding a `ToolName` variant, a declaration in
//! `registry()`, and a dispatcher arm — the exhaustive match and the lockstep
//! test close the invariant mechanically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every tool name the dispatcher can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    NavigateApp,
    AnalyzeJob,
    GenerateResume,
    GenerateRoadmap,
    CheckAts,
    PrepareInterview,
    GenerateProjectsPpt,
    SyncProfileData,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::AnalyzeJob,
        ToolName::GenerateResume,
        ToolName::GenerateRoadmap,
        ToolName::CheckAts,
        ToolName::PrepareInterview,
        ToolName::GenerateProjectsPpt,
        ToolName::NavigateApp,
        ToolName::SyncProfileData,
    ];

    /// Wire name as declared to the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::NavigateApp => "navigateApp",
            ToolName::AnalyzeJob => "analyzeJob",
            ToolName::GenerateResume => "generateResume",
            ToolName::GenerateRoadmap => "generateRoadmap",
            ToolName::CheckAts => "checkATS",
            ToolName::PrepareInterview => "prepareInterview",
            ToolName::GenerateProjectsPpt => "generateProjectsPPT",
            ToolName::SyncProfileData => "syncProfileData",
        }
    }

    /// Resolves a wire name. `None` for unrecognized names — the dispatcher
    /// treats those as a logged no-op, never a fault.
    pub fn parse(name: &str) -> Option<ToolName> {
        ToolName::ALL.iter().copied().find(|t| t.as_str() == name)
    }
}

/// A tool-invocation request returned by the model. Transient: consumed once
/// by the dispatcher, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// Parameter schema tree, serialized to the model's declaration format
/// (`STRING`/`NUMBER`/`ARRAY`/`OBJECT` with `items`, `properties`, `required`).
#[derive(Debug, Clone, Serialize)]
pub struct ParamSchema {
    #[serde(rename = "type")]
    pub kind: ParamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParamSchema>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<&'static str, ParamSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamKind {
    String,
    Number,
    Array,
    Object,
}

impl ParamSchema {
    fn bare(kind: ParamKind) -> Self {
        ParamSchema {
            kind,
            description: None,
            allowed: vec![],
            items: None,
            properties: BTreeMap::new(),
            required: vec![],
        }
    }

    pub fn string() -> Self {
        Self::bare(ParamKind::String)
    }

    pub fn number() -> Self {
        Self::bare(ParamKind::Number)
    }

    pub fn enumeration(values: &[&'static str]) -> Self {
        let mut schema = Self::bare(ParamKind::String);
        schema.allowed = values.to_vec();
        schema
    }

    pub fn array(item: ParamSchema) -> Self {
        let mut schema = Self::bare(ParamKind::Array);
        schema.items = Some(Box::new(item));
        schema
    }

    pub fn object(
        properties: Vec<(&'static str, ParamSchema)>,
        required: &[&'static str],
    ) -> Self {
        let mut schema = Self::bare(ParamKind::Object);
        schema.properties = properties.into_iter().collect();
        schema.required = required.to_vec();
        schema
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// A declared callable operation: name, model-facing description, and the
/// typed parameter contract the model must satisfy.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    #[serde(serialize_with = "serialize_tool_name")]
    pub name: ToolName,
    pub description: &'static str,
    pub parameters: ParamSchema,
}

fn serialize_tool_name<S: serde::Serializer>(
    name: &ToolName,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(name.as_str())
}

fn string_array() -> ParamSchema {
    ParamSchema::array(ParamSchema::string())
}

fn experience_items() -> ParamSchema {
    ParamSchema::array(ParamSchema::object(
        vec![
            ("company", ParamSchema::string()),
            ("role", ParamSchema::string()),
            ("location", ParamSchema::string()),
            ("date", ParamSchema::string()),
            ("bullets", string_array()),
        ],
        &[],
    ))
}

fn project_items() -> ParamSchema {
    ParamSchema::array(ParamSchema::object(
        vec![
            ("name", ParamSchema::string()),
            ("description", ParamSchema::string()),
            ("link", ParamSchema::string()),
            ("bullets", string_array()),
        ],
        &[],
    ))
}

fn resource_items() -> ParamSchema {
    ParamSchema::array(ParamSchema::object(
        vec![
            ("title", ParamSchema::string()),
            ("url", ParamSchema::string()),
            (
                "platform",
                ParamSchema::enumeration(&["YouTube", "Article", "Course"]),
            ),
            ("description", ParamSchema::string()),
        ],
        &[],
    ))
}

/// Builds the full registry, in the order the declarations are sent to the
/// model. Read-only at runtime; rebuilt per call, which is cheap and keeps
/// the catalog a plain function of nothing.
pub fn registry() -> Vec<ToolDeclaration> {
    vec![
        ToolDeclaration {
            name: ToolName::AnalyzeJob,
            description: "Analyzes job descriptions to extract structured data.",
            parameters: ParamSchema::object(
                vec![
                    ("title", ParamSchema::string()),
                    ("company", ParamSchema::string()),
                    ("location", ParamSchema::string()),
                    ("roleSummary", ParamSchema::string()),
                    ("requiredSkills", string_array()),
                    ("preferredSkills", string_array()),
                    ("tools", string_array()),
                    ("experienceLevel", ParamSchema::string()),
                    ("keywords", string_array()),
                ],
                &[
                    "title",
                    "company",
                    "requiredSkills",
                    "roleSummary",
                    "experienceLevel",
                ],
            ),
        },
        ToolDeclaration {
            name: ToolName::GenerateResume,
            description: "MIMICRY ENGINE: Strictly use the reference resume as a template. \
                Replace content with User Profile data. Phrasing must be ATS-optimized.",
            parameters: ParamSchema::object(
                vec![
                    (
                        "personalInfo",
                        ParamSchema::object(
                            vec![
                                ("name", ParamSchema::string()),
                                ("email", ParamSchema::string()),
                                ("phone", ParamSchema::string()),
                                ("linkedin", ParamSchema::string()),
                                ("github", ParamSchema::string()),
                                ("website", ParamSchema::string()),
                            ],
                            &["name", "email", "phone"],
                        ),
                    ),
                    ("summary", ParamSchema::string()),
                    ("skills", string_array()),
                    ("latexCode", ParamSchema::string()),
                    ("experience", experience_items()),
                    (
                        "education",
                        ParamSchema::array(ParamSchema::object(
                            vec![
                                ("institution", ParamSchema::string()),
                                ("degree", ParamSchema::string()),
                                ("location", ParamSchema::string()),
                                ("date", ParamSchema::string()),
                                ("grade", ParamSchema::string()),
                            ],
                            &[],
                        )),
                    ),
                    ("projects", project_items()),
                    ("achievements", string_array()),
                    (
                        "extra",
                        ParamSchema::array(ParamSchema::object(
                            vec![
                                ("category", ParamSchema::string()),
                                ("details", ParamSchema::string()),
                            ],
                            &[],
                        )),
                    ),
                    ("mimicScore", ParamSchema::number()),
                ],
                &[
                    "personalInfo",
                    "summary",
                    "skills",
                    "latexCode",
                    "experience",
                    "education",
                    "mimicScore",
                ],
            ),
        },
        ToolDeclaration {
            name: ToolName::GenerateRoadmap,
            description: "Creates a step-by-step learning roadmap. You MUST include recommended \
                resources like YouTube playlists or specific professional courses for each module.",
            parameters: ParamSchema::object(
                vec![
                    (
                        "steps",
                        ParamSchema::array(ParamSchema::object(
                            vec![
                                ("title", ParamSchema::string()),
                                ("description", ParamSchema::string()),
                                ("topics", string_array()),
                                ("timeline", ParamSchema::string()),
                                (
                                    "status",
                                    ParamSchema::enumeration(&[
                                        "pending",
                                        "completed",
                                        "in-progress",
                                    ]),
                                ),
                            ],
                            &[],
                        )),
                    ),
                    ("recommendedResources", resource_items()),
                ],
                &["steps", "recommendedResources"],
            ),
        },
        ToolDeclaration {
            name: ToolName::CheckAts,
            description: "Analyzes ATS score and suggests improvements.",
            parameters: ParamSchema::object(
                vec![
                    ("score", ParamSchema::number()),
                    ("matchingSkills", string_array()),
                    ("missingSkills", string_array()),
                    ("suggestions", string_array()),
                ],
                &["score", "matchingSkills", "missingSkills", "suggestions"],
            ),
        },
        ToolDeclaration {
            name: ToolName::PrepareInterview,
            description: "Generates mock questions and prep assets.",
            parameters: ParamSchema::object(
                vec![
                    (
                        "questions",
                        ParamSchema::array(ParamSchema::object(
                            vec![
                                ("question", ParamSchema::string()),
                                ("category", ParamSchema::string()),
                                ("hint", ParamSchema::string()),
                            ],
                            &[],
                        )),
                    ),
                    ("technicalTopics", string_array()),
                    ("resources", resource_items()),
                ],
                &["questions", "technicalTopics", "resources"],
            ),
        },
        ToolDeclaration {
            name: ToolName::GenerateProjectsPpt,
            description: "Creates a visual slide presentation for projects or seminars.",
            parameters: ParamSchema::object(
                vec![
                    ("title", ParamSchema::string()),
                    (
                        "theme",
                        ParamSchema::enumeration(&["modern", "dark", "professional", "creative"]),
                    ),
                    ("font", ParamSchema::enumeration(&["sans", "serif", "mono"])),
                    (
                        "slides",
                        ParamSchema::array(ParamSchema::object(
                            vec![
                                ("header", ParamSchema::string()),
                                ("content", string_array()),
                                ("speakerNotes", ParamSchema::string()),
                                ("imagePrompt", ParamSchema::string()),
                                (
                                    "imageType",
                                    ParamSchema::enumeration(&["AI", "BROWSER", "NONE"]),
                                ),
                            ],
                            &["header", "content", "imageType"],
                        )),
                    ),
                ],
                &["title", "theme", "font", "slides"],
            ),
        },
        ToolDeclaration {
            name: ToolName::NavigateApp,
            description: "Navigates the user to different sections of the CareerOS application.",
            parameters: ParamSchema::object(
                vec![(
                    "targetView",
                    ParamSchema::enumeration(&[
                        "dashboard",
                        "resume",
                        "roadmap",
                        "ats",
                        "projects",
                        "interview",
                        "profile",
                    ])
                    .describe("The view/tab to open."),
                )],
                &["targetView"],
            ),
        },
        ToolDeclaration {
            name: ToolName::SyncProfileData,
            description: "Synchronizes user profile data from a provided LinkedIn or GitHub URL \
                using search grounding.",
            parameters: ParamSchema::object(
                vec![
                    ("platform", ParamSchema::enumeration(&["linkedin", "github"])),
                    ("url", ParamSchema::string()),
                    ("name", ParamSchema::string()),
                    ("summary", ParamSchema::string()),
                    ("skills", string_array()),
                    ("experience", experience_items()),
                    ("projects", project_items()),
                ],
                &["platform", "url", "name", "skills"],
            ),
        },
    ]
}

/// Required top-level fields the model left out of an invocation's arguments.
/// The payload is an untrusted external shape: missing fields are logged as
/// anomalies and degrade to defaults downstream, they do not fail dispatch.
pub fn missing_required_fields(declaration: &ToolDeclaration, args: &Value) -> Vec<&'static str> {
    declaration
        .parameters
        .required
        .iter()
        .filter(|field| args.get(**field).is_none())
        .copied()
        .collect()
}
