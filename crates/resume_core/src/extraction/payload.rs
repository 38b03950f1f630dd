//! Extraction payload decoding and boundary validation.
//!
//! # Responsibility
//! - Decode the loosely shaped upstream JSON into raw optional structs.
//! - Convert raw structs into typed `ExtractedFact` variants, one per kind.
//!
//! # Invariants
//! - Absent strings become `""`; absent sections become empty.
//! - Dates are strict `YYYY-MM-DD`; blank, `present` and `current` mean
//!   "no date"; anything else rejects the payload.
//! - Facts without identifying text (skill, project, summary) are dropped.

use crate::model::dates::parse_calendar_date;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const OPEN_ENDED_DATE_WORDS: &[&str] = &["present", "current"];

pub type PayloadResult<T> = Result<T, PayloadError>;

#[derive(Debug)]
pub enum PayloadError {
    /// Content is not JSON or does not match the payload shape.
    Json(serde_json::Error),
    /// A date field is neither blank nor a valid `YYYY-MM-DD` date.
    InvalidDate { field: String, value: String },
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed extraction payload: {err}"),
            Self::InvalidDate { field, value } => {
                write!(f, "invalid date `{value}` in `{field}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for PayloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidDate { .. } => None,
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPerson {
    /// Id of an already known person; `None` allocates a new one.
    pub id: Option<String>,
    pub name: String,
    /// `None` when the document carried no usable email.
    pub email: Option<String>,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub github: String,
    pub linkedin: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedJob {
    pub job_title: String,
    pub company_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSkill {
    pub skill_name: String,
    pub associated_skill_type_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEducation {
    pub school_name: String,
    pub degree_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCertification {
    pub org_name: String,
    pub cert_name: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVolunteer {
    pub org_name: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedProject {
    pub project_name: String,
    pub project_details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSummary {
    pub summary: String,
}

/// One validated fact from a document, tagged by entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedFact {
    Person(ExtractedPerson),
    Job(ExtractedJob),
    Skill(ExtractedSkill),
    Education(ExtractedEducation),
    Certification(ExtractedCertification),
    Volunteer(ExtractedVolunteer),
    Project(ExtractedProject),
    Summary(ExtractedSummary),
}

/// Validated extraction result for one document, in reconciliation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionPayload {
    facts: Vec<ExtractedFact>,
}

impl ExtractionPayload {
    pub fn new(facts: Vec<ExtractedFact>) -> Self {
        Self { facts }
    }

    /// Decodes and validates upstream JSON text.
    pub fn from_json(text: &str) -> PayloadResult<Self> {
        let raw: RawPayload = serde_json::from_str(text)?;
        raw.into_payload()
    }

    pub fn facts(&self) -> &[ExtractedFact] {
        &self.facts
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    person: Option<RawPerson>,
    jobs: Option<Vec<RawJobEntry>>,
    skills: Option<Vec<RawSkill>>,
    education: Option<Vec<RawEducation>>,
    certifications: Option<Vec<RawCertification>>,
    volunteer: Option<Vec<RawVolunteer>>,
    projects: Option<Vec<RawProject>>,
    summaries: Option<Vec<RawSummary>>,
    /// Older single-summary shape.
    summary: Option<RawSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerson {
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    state: Option<String>,
    github: Option<String>,
    linkedin: Option<String>,
    portfolio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJobEntry {
    job: Option<RawJob>,
    descriptions: Option<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJob {
    job_title: Option<String>,
    company_name: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSkill {
    skill_name: Option<String>,
    associated_skill_type_names: Option<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEducation {
    school_name: Option<String>,
    degree_name: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCertification {
    org_name: Option<String>,
    cert_name: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVolunteer {
    org_name: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    project_name: Option<String>,
    project_details: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    summary: Option<String>,
}

impl RawPayload {
    fn into_payload(self) -> PayloadResult<ExtractionPayload> {
        let mut facts = Vec::new();

        if let Some(person) = self.person {
            facts.push(ExtractedFact::Person(person.into_fact()));
        }

        for (index, entry) in self.jobs.unwrap_or_default().into_iter().enumerate() {
            facts.push(ExtractedFact::Job(entry.into_fact(index)?));
        }

        for skill in self.skills.unwrap_or_default() {
            match skill.into_fact() {
                Some(fact) => facts.push(ExtractedFact::Skill(fact)),
                None => debug!("event=payload_drop module=extraction kind=skill reason=blank_name"),
            }
        }

        for (index, education) in self.education.unwrap_or_default().into_iter().enumerate() {
            facts.push(ExtractedFact::Education(education.into_fact(index)?));
        }

        for certification in self.certifications.unwrap_or_default() {
            facts.push(ExtractedFact::Certification(ExtractedCertification {
                org_name: text(certification.org_name),
                cert_name: text(certification.cert_name),
                details: text(certification.details),
            }));
        }

        for volunteer in self.volunteer.unwrap_or_default() {
            facts.push(ExtractedFact::Volunteer(ExtractedVolunteer {
                org_name: text(volunteer.org_name),
                details: text(volunteer.details),
            }));
        }

        for project in self.projects.unwrap_or_default() {
            let project_name = text(project.project_name);
            if project_name.trim().is_empty() {
                debug!("event=payload_drop module=extraction kind=project reason=blank_name");
                continue;
            }
            facts.push(ExtractedFact::Project(ExtractedProject {
                project_name,
                project_details: text(project.project_details),
            }));
        }

        let summaries = self
            .summaries
            .unwrap_or_default()
            .into_iter()
            .chain(self.summary);
        for raw in summaries {
            let summary = text(raw.summary);
            if summary.trim().is_empty() {
                continue;
            }
            facts.push(ExtractedFact::Summary(ExtractedSummary { summary }));
        }

        Ok(ExtractionPayload::new(facts))
    }
}

impl RawPerson {
    fn into_fact(self) -> ExtractedPerson {
        ExtractedPerson {
            id: self.id.filter(|id| !id.trim().is_empty()),
            name: text(self.name),
            email: self.email.filter(|email| !email.trim().is_empty()),
            phone: text(self.phone),
            city: text(self.city),
            state: text(self.state),
            github: text(self.github),
            linkedin: text(self.linkedin),
            portfolio: text(self.portfolio),
        }
    }
}

impl RawJobEntry {
    fn into_fact(self, index: usize) -> PayloadResult<ExtractedJob> {
        let job = self.job.unwrap_or_default();
        Ok(ExtractedJob {
            start_date: date_field(job.start_date, || format!("jobs[{index}].job.startDate"))?,
            end_date: date_field(job.end_date, || format!("jobs[{index}].job.endDate"))?,
            job_title: text(job.job_title),
            company_name: text(job.company_name),
            location: text(job.location),
            descriptions: self
                .descriptions
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .filter(|line| !line.trim().is_empty())
                .collect(),
        })
    }
}

impl RawSkill {
    fn into_fact(self) -> Option<ExtractedSkill> {
        let skill_name = text(self.skill_name);
        if skill_name.trim().is_empty() {
            return None;
        }

        let mut type_names: Vec<String> = Vec::new();
        for name in self
            .associated_skill_type_names
            .unwrap_or_default()
            .into_iter()
            .flatten()
        {
            if !name.trim().is_empty() && !type_names.contains(&name) {
                type_names.push(name);
            }
        }

        Some(ExtractedSkill {
            skill_name,
            associated_skill_type_names: type_names,
        })
    }
}

impl RawEducation {
    fn into_fact(self, index: usize) -> PayloadResult<ExtractedEducation> {
        Ok(ExtractedEducation {
            start_date: date_field(self.start_date, || format!("education[{index}].startDate"))?,
            end_date: date_field(self.end_date, || format!("education[{index}].endDate"))?,
            school_name: text(self.school_name),
            degree_name: text(self.degree_name),
            location: text(self.location),
        })
    }
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

fn date_field(
    value: Option<String>,
    field: impl FnOnce() -> String,
) -> PayloadResult<Option<DateTime<Utc>>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty()
        || OPEN_ENDED_DATE_WORDS
            .iter()
            .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return Ok(None);
    }
    match parse_calendar_date(trimmed) {
        Some(instant) => Ok(Some(instant)),
        None => Err(PayloadError::InvalidDate {
            field: field(),
            value,
        }),
    }
}
