//! Natural keys per entity kind.
//!
//! Each key can be built from a stored record and from the matching
//! extracted fact so that both sides compare through the same type.
//! Dates compare by instant, independent of their original text.

use crate::extraction::payload::{
    ExtractedCertification, ExtractedEducation, ExtractedJob, ExtractedProject, ExtractedSkill,
    ExtractedSummary, ExtractedVolunteer,
};
use crate::model::resume::{
    Certification, Education, Job, ProfessionalSummary, Project, SkillName, SkillType, Volunteer,
};
use chrono::{DateTime, Utc};

/// Job identity: company plus exact start and end instants.
///
/// Title and location are not part of the key, so two roles at the same
/// company with identical dates collapse into one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobKey<'a> {
    pub company_name: &'a str,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Job> for JobKey<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            company_name: &job.company_name,
            start_date: job.start_date,
            end_date: job.end_date,
        }
    }
}

impl<'a> From<&'a ExtractedJob> for JobKey<'a> {
    fn from(job: &'a ExtractedJob) -> Self {
        Self {
            company_name: &job.company_name,
            start_date: job.start_date,
            end_date: job.end_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillKey<'a>(pub &'a str);

impl<'a> From<&'a SkillName> for SkillKey<'a> {
    fn from(skill: &'a SkillName) -> Self {
        Self(&skill.skill_name)
    }
}

impl<'a> From<&'a ExtractedSkill> for SkillKey<'a> {
    fn from(skill: &'a ExtractedSkill) -> Self {
        Self(&skill.skill_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillTypeKey<'a>(pub &'a str);

impl<'a> From<&'a SkillType> for SkillTypeKey<'a> {
    fn from(skill_type: &'a SkillType) -> Self {
        Self(&skill_type.skill_type_name)
    }
}

/// Education identity: school, degree and start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EducationKey<'a> {
    pub school_name: &'a str,
    pub degree_name: &'a str,
    pub start_date: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Education> for EducationKey<'a> {
    fn from(education: &'a Education) -> Self {
        Self {
            school_name: &education.school_name,
            degree_name: &education.degree_name,
            start_date: education.start_date,
        }
    }
}

impl<'a> From<&'a ExtractedEducation> for EducationKey<'a> {
    fn from(education: &'a ExtractedEducation) -> Self {
        Self {
            school_name: &education.school_name,
            degree_name: &education.degree_name,
            start_date: education.start_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificationKey<'a> {
    pub cert_name: &'a str,
    pub org_name: &'a str,
}

impl<'a> From<&'a Certification> for CertificationKey<'a> {
    fn from(certification: &'a Certification) -> Self {
        Self {
            cert_name: &certification.cert_name,
            org_name: &certification.org_name,
        }
    }
}

impl<'a> From<&'a ExtractedCertification> for CertificationKey<'a> {
    fn from(certification: &'a ExtractedCertification) -> Self {
        Self {
            cert_name: &certification.cert_name,
            org_name: &certification.org_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolunteerKey<'a> {
    pub org_name: &'a str,
    pub details: &'a str,
}

impl<'a> From<&'a Volunteer> for VolunteerKey<'a> {
    fn from(volunteer: &'a Volunteer) -> Self {
        Self {
            org_name: &volunteer.org_name,
            details: &volunteer.details,
        }
    }
}

impl<'a> From<&'a ExtractedVolunteer> for VolunteerKey<'a> {
    fn from(volunteer: &'a ExtractedVolunteer) -> Self {
        Self {
            org_name: &volunteer.org_name,
            details: &volunteer.details,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectKey<'a>(pub &'a str);

impl<'a> From<&'a Project> for ProjectKey<'a> {
    fn from(project: &'a Project) -> Self {
        Self(&project.project_name)
    }
}

impl<'a> From<&'a ExtractedProject> for ProjectKey<'a> {
    fn from(project: &'a ExtractedProject) -> Self {
        Self(&project.project_name)
    }
}

/// Summaries have no business key; the exact text stands in for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryKey<'a>(pub &'a str);

impl<'a> From<&'a ProfessionalSummary> for SummaryKey<'a> {
    fn from(summary: &'a ProfessionalSummary) -> Self {
        Self(&summary.summary)
    }
}

impl<'a> From<&'a ExtractedSummary> for SummaryKey<'a> {
    fn from(summary: &'a ExtractedSummary) -> Self {
        Self(&summary.summary)
    }
}
