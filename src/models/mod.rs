pub mod config;
pub mod profile;

pub use config::AppConfig;
pub use profile::{
    About, Certification, Education, EducationContent, Experience, Hero, Personal, Profile,
    Project, TechnicalExpertise,
};
