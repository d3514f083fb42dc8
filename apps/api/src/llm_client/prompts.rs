// Prompt constants and builders for the orchestration loop.
// Follow-up prompts here are sent as silent turns: they live in the
// conversation history but are never rendered to the user.

use serde_json::json;

use crate::models::profile::UserProfile;

/// Fixed system instruction sent with every model call.
pub const SYSTEM_INSTRUCTION: &str = "You are CareerOS. \
    CORE MISSION: Turn any job post into a tailored application. \
    PROJECTS: The Projects section uses a PPT Generator to visualize ideas. \
    When the user asks to generate a project or slide deck, use 'generateProjectsPPT'. \
    ROADMAPS: You MUST include YouTube playlist links and specific course URLs \
    in the recommendedResources field. \
    VISUALS: Header in the Projects view must say 'PROJECTS'.";

/// Silent follow-up issued right after a resume is generated.
pub const ATS_CHECK_FOLLOW_UP: &str =
    "Perform an ATS check for this newly generated resume based on the job description.";

/// User-visible prompt attached to a job-post upload.
pub const JOB_UPLOAD_PROMPT: &str = "Analyze this job post screenshot.";

/// Silent follow-up requesting a keyword-optimized regeneration, naming the
/// specific gaps the ATS check reported.
pub fn ats_optimization_follow_up(score: f64, missing_skills: &[String]) -> String {
    format!(
        "The current resume has an ATS score of {score}%. \
         Regenerate the resume with keywords: {}.",
        missing_skills.join(", ")
    )
}

/// Layout source for resume generation: mimic an uploaded reference, or
/// render one of the built-in styles.
pub enum ResumeLayout {
    MimicReference,
    Style(String),
}

/// Builds the RESUME ARCHITECT prompt. The profile is the content source of
/// truth; the layout instruction varies with how the user chose a look.
pub fn resume_architect_prompt(profile: &UserProfile, layout: &ResumeLayout) -> String {
    let profile_context = json!({
        "personalInfo": {
            "name": profile.name,
            "email": profile.email,
            "phone": profile.phone,
            "linkedin": profile.linkedin,
            "github": profile.github,
        },
        "summary": profile.summary,
        "experience": profile.experience,
        "education": profile.education,
        "skills": profile.skills,
        "projects": profile.projects,
    });

    let mut prompt = format!(
        "ACT AS A RESUME ARCHITECT.\n\n\
         TASK: Generate a resume using the data provided below.\n\n\
         DATA SOURCE (Use this content EXACTLY):\n{profile_context}\n"
    );

    match layout {
        ResumeLayout::MimicReference => {
            prompt.push_str(
                "\nVISUAL INSTRUCTION: I have uploaded an image of a resume.\n\
                 GOAL: Write LaTeX code that mimics the VISUAL LAYOUT of the uploaded image exactly.\n\
                 - Use the same header style (left/right/center aligned).\n\
                 - Use the same font styles (serif vs sans-serif).\n\
                 - Use the same section spacing and lines.\n\
                 - BUT replace the text content with the DATA SOURCE provided above.\n\
                 - Also return a JSON representation of the resume structure for the web preview.\n",
            );
        }
        ResumeLayout::Style(style) => {
            prompt.push_str(&format!(
                "\nVISUAL INSTRUCTION: Create a {style} style resume.\n\
                 - Generate professional LaTeX code for this style.\n\
                 - Return the JSON structure for web preview.\n"
            ));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimization_follow_up_names_missing_keywords() {
        let prompt = ats_optimization_follow_up(65.0, &["SQL".into(), "Docker".into()]);
        assert!(prompt.contains("65%"));
        assert!(prompt.contains("SQL, Docker"));
    }

    #[test]
    fn test_resume_prompt_embeds_profile_and_style() {
        let profile = UserProfile {
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            skills: vec!["COBOL".into()],
            ..Default::default()
        };
        let prompt =
            resume_architect_prompt(&profile, &ResumeLayout::Style("executive".into()));
        assert!(prompt.contains("RESUME ARCHITECT"));
        assert!(prompt.contains("Grace Hopper"));
        assert!(prompt.contains("executive style resume"));
    }

    #[test]
    fn test_resume_prompt_reference_variant_requests_mimicry() {
        let prompt =
            resume_architect_prompt(&UserProfile::default(), &ResumeLayout::MimicReference);
        assert!(prompt.contains("mimics the VISUAL LAYOUT"));
    }
}
