//! Test fixtures and constants.

use serde_json::{json, Value};
use std::path::Path;

/// Starter template shipped with the crate
pub const TEMPLATE: &str = include_str!("../../site/index.html");

/// Sample profile shipped with the crate
pub const SAMPLE_PROFILE: &str = include_str!("../../site/data.json");

/// Minimal profile with one entry per list section
pub fn minimal_profile() -> Value {
    json!({
        "personal": {
            "name": "Jo Doe",
            "title": "Engineer",
            "email": "jo@example.com",
            "phone": "+38591234567",
            "location": "Remote",
            "languages": ["English"],
            "github": "jodoe",
            "linkedin": "jo-doe"
        },
        "hero": {"description": "Builds things."},
        "about": {
            "subtitle": "Hello",
            "professionalSummary": "Summary",
            "technicalExpertise": {"coreSkills": "Rust", "specializations": "Parsers"},
            "interests": "Chess"
        },
        "experience": [{
            "date": "2020-2022",
            "title": "Engineer",
            "company": "Acme",
            "location": "Remote",
            "description": ["Built X", "Shipped Y"]
        }],
        "education": [{
            "degree": "BSc",
            "institution": "Uni",
            "period": "2016-2020",
            "description": "Computer science"
        }],
        "certifications": [{
            "title": "Cert",
            "institution": "Org",
            "year": 2021
        }],
        "projects": [{
            "title": "Tool",
            "year": "2022",
            "description": "A tool."
        }]
    })
}

/// Write a site directory with the starter template and the given profile
pub fn write_site(dir: &Path, profile: &str) {
    std::fs::write(dir.join("index.html"), TEMPLATE).expect("write template");
    std::fs::write(dir.join("data.json"), profile).expect("write profile");
}
