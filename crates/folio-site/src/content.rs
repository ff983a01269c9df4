#![forbid(unsafe_code)]

//! Static site content: owner details, projects, social links, goals, and the
//! year-in-review cards.
//!
//! Hosts may ship their own content as JSON (camelCase keys); otherwise the
//! built-in [`SiteContent::default`] is used.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// Not valid content JSON.
    Parse(String),
    /// Well-formed but inconsistent (duplicate ids, missing owner).
    Invalid(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "content parse error: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid content: {msg}"),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type ContentResult<T> = Result<T, ContentError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    pub live_link: String,
    pub github_link: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Goal {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonthHighlight {
    pub month: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub name: String,
    pub role: String,
    pub email: String,
    pub resume_url: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub months: Vec<MonthHighlight>,
}

impl SiteContent {
    pub fn from_json(json: &str) -> ContentResult<Self> {
        let content: Self = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    fn validate(&self) -> ContentResult<()> {
        if self.name.trim().is_empty() {
            return Err(ContentError::Invalid("owner name is empty".into()));
        }
        let mut ids = BTreeSet::new();
        for project in &self.projects {
            if !ids.insert(project.id) {
                return Err(ContentError::Invalid(format!(
                    "duplicate project id {}",
                    project.id
                )));
            }
        }
        let mut platforms = BTreeSet::new();
        for social in &self.socials {
            if !platforms.insert(social.icon.as_str()) {
                return Err(ContentError::Invalid(format!(
                    "duplicate social icon {:?}",
                    social.icon
                )));
            }
        }
        if self.goals.len() > usize::from(u16::MAX) || self.months.len() > usize::from(u16::MAX) {
            return Err(ContentError::Invalid("too many list entries".into()));
        }
        Ok(())
    }

    pub fn project(&self, id: u32) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Social link by icon id (`github`, `linkedin`, ...).
    pub fn social(&self, icon: &str) -> Option<&SocialLink> {
        self.socials.iter().find(|s| s.icon == icon)
    }

    /// The logo shows the first word of the owner's name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

fn project(
    id: u32,
    title: &str,
    description: &str,
    tech: &[&str],
    slug: &str,
    year: &str,
) -> Project {
    Project {
        id,
        title: title.to_owned(),
        description: description.to_owned(),
        long_description: None,
        tech: tech.iter().map(|t| (*t).to_owned()).collect(),
        live_link: format!("https://example.com/{slug}-live"),
        github_link: format!("https://github.com/example/{slug}"),
        year: year.to_owned(),
    }
}

fn social(platform: &str, url: &str, icon: &str) -> SocialLink {
    SocialLink {
        platform: platform.to_owned(),
        url: url.to_owned(),
        icon: icon.to_owned(),
    }
}

fn goal(id: u32, text: &str) -> Goal {
    Goal {
        id,
        text: text.to_owned(),
        completed: false,
    }
}

fn month(month: &str, title: &str, description: &str) -> MonthHighlight {
    MonthHighlight {
        month: month.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            name: "Satish Jalan".into(),
            role: "Full Stack & Web3 Developer".into(),
            email: "satishjalan9163@gmail.com".into(),
            resume_url: "https://drive.google.com/file/d/1JjslPgDp8TboJcvraaQLxmgfkGb0mwml/view"
                .into(),
            projects: vec![
                project(
                    1,
                    "Neon Finance",
                    "Decentralized finance dashboard with real-time WebGL data visualization.",
                    &["React", "WebGL", "Solidity", "Tailwind"],
                    "neon",
                    "2024",
                ),
                project(
                    2,
                    "Aero Space",
                    "Interactive educational platform about the solar system.",
                    &["Three.js", "R3F", "GSAP", "Zustand"],
                    "aero",
                    "2023",
                ),
                project(
                    3,
                    "Nexus Chat",
                    "Real-time collaboration tool with AI capabilities.",
                    &["Next.js", "Gemini API", "Socket.io", "Redis"],
                    "nexus",
                    "2023",
                ),
                project(
                    4,
                    "Zen Notes",
                    "Local-first minimalist markdown editor.",
                    &["Electron", "Rust", "React", "Sqlite"],
                    "zen",
                    "2022",
                ),
            ],
            socials: vec![
                social("GitHub", "https://github.com", "github"),
                social("Twitter", "https://twitter.com", "twitter"),
                social("LinkedIn", "https://linkedin.com", "linkedin"),
            ],
            goals: vec![
                goal(1, "Master WebGPU and Compute Shaders"),
                goal(2, "Launch a SaaS product to $5k MRR"),
                goal(3, "Contribute to React Core or Three.js"),
                goal(4, "Write 12 technical articles (1 per month)"),
                goal(5, "Read 24 books (Tech + Fiction)"),
                goal(6, "Run a Marathon"),
                goal(7, "Learn a new spoken language (Spanish)"),
            ],
            months: vec![
                month("Jan", "Fresh Start", "Rebuilt the portfolio from scratch."),
                month("Feb", "Deep Dive", "Went through the Rust book cover to cover."),
                month("Mar", "Ship It", "Launched Neon Finance to the first users."),
                month("Apr", "Open Source", "First merged pull request upstream."),
                month("May", "Motion", "Learned timeline-driven animation properly."),
                month("Jun", "Realtime", "WebSocket fan-out for Nexus Chat."),
                month("Jul", "Contracts", "Audited and shipped two Solidity contracts."),
                month("Aug", "Local First", "Zen Notes went offline-capable."),
                month("Sep", "Speaking", "Gave a talk at a local meetup."),
                month("Oct", "Performance", "Halved bundle size across projects."),
                month("Nov", "Mentoring", "Paired weekly with two junior developers."),
                month("Dec", "Reflect", "Wrote this recap."),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_is_valid() {
        let content = SiteContent::default();
        assert!(content.validate().is_ok());
        assert_eq!(content.first_name(), "Satish");
        assert_eq!(content.project(3).map(|p| p.title.as_str()), Some("Nexus Chat"));
        assert_eq!(content.goals.len(), 7);
        assert_eq!(content.months.len(), 12);
        assert!(content.social("github").is_some());
    }

    #[test]
    fn parses_camel_case_json() {
        let content = SiteContent::from_json(
            r#"{
                "name": "Ada Lovelace",
                "role": "Analyst",
                "email": "ada@example.com",
                "resumeUrl": "https://example.com/cv",
                "projects": [{
                    "id": 7, "title": "Engine", "description": "Difference engine",
                    "liveLink": "https://example.com", "githubLink": "https://example.com/git",
                    "year": "1843"
                }],
                "goals": [{"id": 1, "text": "Publish notes", "completed": true}]
            }"#,
        )
        .unwrap();
        assert_eq!(content.resume_url, "https://example.com/cv");
        assert!(content.projects[0].tech.is_empty());
        assert!(content.goals[0].completed);
        assert!(content.months.is_empty());
    }

    #[test]
    fn rejects_duplicate_project_ids() {
        let mut content = SiteContent::default();
        content.projects[1].id = 1;
        assert!(matches!(content.validate(), Err(ContentError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SiteContent::from_json("{\"name\": 3}"),
            Err(ContentError::Parse(_))
        ));
        assert!(matches!(
            SiteContent::from_json(
                r#"{"name":" ","role":"","email":"","resumeUrl":""}"#
            ),
            Err(ContentError::Invalid(_))
        ));
    }

    #[test]
    fn single_word_name_is_its_own_first_name() {
        let content = SiteContent {
            name: "Prince".into(),
            ..SiteContent::default()
        };
        assert_eq!(content.first_name(), "Prince");
    }
}
