//! The portfolio profile document (`data.json`).

use serde::{Deserialize, Deserializer, Serialize};

/// Structured description of the portfolio owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub personal: Personal,
    pub hero: Hero,
    pub about: About,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
}

impl Profile {
    /// Parse a profile from its JSON text
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub languages: Vec<String>,
    /// GitHub handle, not a URL
    pub github: String,
    /// LinkedIn handle, not a URL
    pub linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub subtitle: String,
    pub professional_summary: String,
    pub technical_expertise: TechnicalExpertise,
    pub interests: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalExpertise {
    pub core_skills: String,
    pub specializations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub date: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// One bullet per entry
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
    pub thesis: Option<String>,
    pub mentor: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

/// Body of an education card.
///
/// A thesis replaces the free-text description entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationContent<'a> {
    pub thesis: Option<&'a str>,
    pub mentor_label: &'static str,
    pub mentor: Option<&'a str>,
    pub link: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl Education {
    pub fn content(&self) -> EducationContent<'_> {
        match present(&self.thesis) {
            Some(thesis) => {
                let mentor = present(&self.mentor);
                EducationContent {
                    thesis: Some(thesis),
                    mentor_label: match mentor {
                        Some(m) if m.contains(',') => "Mentors",
                        _ => "Mentor",
                    },
                    mentor,
                    link: present(&self.link),
                    description: None,
                }
            }
            None => EducationContent {
                thesis: None,
                mentor_label: "Mentor",
                mentor: None,
                link: None,
                description: present(&self.description),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub title: String,
    pub institution: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub instructor: Option<String>,
    pub description: Option<String>,
}

impl Certification {
    /// Instructor line when known, otherwise the description
    pub fn body(&self) -> Option<String> {
        match present(&self.instructor) {
            Some(instructor) => Some(format!("Instructor: {instructor}")),
            None => present(&self.description).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub description: String,
    pub coauthor: Option<String>,
    pub link: Option<String>,
}

/// Optional text that is set and non-empty
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Accept `"2021"` as well as `2021`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
