//! Resume record kinds.
//!
//! String fields default to `""` when absent on read so that records written
//! by older shapes (or hand-edited storage) still load.

use crate::model::dates;
use crate::model::entity::{impl_entity, BaseEntity, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub portfolio: String,
}

impl Person {
    /// Person with every contact field empty.
    pub fn empty(base: BaseEntity) -> Self {
        Self {
            base,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            city: String::new(),
            state: String::new(),
            github: String::new(),
            linkedin: String::new(),
            portfolio: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default, with = "dates::optional_instant")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "dates::optional_instant")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
}

/// One bullet line owned by a `Job`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub description: String,
    pub job_id: EntityId,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillName {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub skill_name: String,
    /// Denormalized: category names, not SkillType ids.
    #[serde(default)]
    pub associated_skill_type_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillType {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub skill_type_name: String,
    /// Denormalized: skill names, not SkillName ids.
    #[serde(default)]
    pub associated_skill_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub degree_name: String,
    #[serde(default, with = "dates::optional_instant")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "dates::optional_instant")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub cert_name: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalSummary {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub summary: String,
}

impl_entity!(
    Person,
    Job,
    JobDescription,
    SkillName,
    SkillType,
    Education,
    Certification,
    Volunteer,
    Project,
    ProfessionalSummary,
);
