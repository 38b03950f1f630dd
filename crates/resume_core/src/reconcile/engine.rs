//! Reconciliation engine.
//!
//! # Responsibility
//! - Apply one validated `ExtractionPayload` to the store registry.
//! - Create dependent records for new facts (job descriptions, skill types).
//!
//! # Invariants
//! - A fact whose natural key matches an existing record causes no write.
//! - A person is only created when the fact carries an email.
//! - The whole payload is merged without yielding; `&mut StoreRegistry`
//!   keeps two payloads from interleaving.

use crate::extraction::payload::{
    ExtractedFact, ExtractedJob, ExtractedPerson, ExtractedSkill, ExtractionPayload,
};
use crate::model::entity::{BaseEntity, Entity};
use crate::model::resume::{
    Certification, Education, Job, JobDescription, Person, ProfessionalSummary, Project,
    SkillName, SkillType, Volunteer,
};
use crate::reconcile::keys::{
    CertificationKey, EducationKey, JobKey, ProjectKey, SkillKey, SkillTypeKey, SummaryKey,
    VolunteerKey,
};
use crate::store::collection::CollectionStore;
use crate::store::registry::StoreRegistry;
use crate::store::{StoreError, StoreResult};
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Record kind touched by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactKind {
    Person,
    Job,
    JobDescription,
    Skill,
    SkillType,
    Education,
    Certification,
    Volunteer,
    Project,
    Summary,
}

impl FactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Job => "job",
            Self::JobDescription => "job_description",
            Self::Skill => "skill",
            Self::SkillType => "skill_type",
            Self::Education => "education",
            Self::Certification => "certification",
            Self::Volunteer => "volunteer",
            Self::Project => "project",
            Self::Summary => "summary",
        }
    }
}

/// Report bucket for a fact; dependent records use their own kinds.
fn fact_kind(fact: &ExtractedFact) -> FactKind {
    match fact {
        ExtractedFact::Person(_) => FactKind::Person,
        ExtractedFact::Job(_) => FactKind::Job,
        ExtractedFact::Skill(_) => FactKind::Skill,
        ExtractedFact::Education(_) => FactKind::Education,
        ExtractedFact::Certification(_) => FactKind::Certification,
        ExtractedFact::Volunteer(_) => FactKind::Volunteer,
        ExtractedFact::Project(_) => FactKind::Project,
        ExtractedFact::Summary(_) => FactKind::Summary,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTally {
    pub added: usize,
    pub skipped: usize,
}

/// Per-kind counts of records added and facts skipped for one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    tallies: BTreeMap<FactKind, KindTally>,
}

impl ReconcileReport {
    pub fn added(&self, kind: FactKind) -> usize {
        self.tallies.get(&kind).map_or(0, |tally| tally.added)
    }

    pub fn skipped(&self, kind: FactKind) -> usize {
        self.tallies.get(&kind).map_or(0, |tally| tally.skipped)
    }

    pub fn total_added(&self) -> usize {
        self.tallies.values().map(|tally| tally.added).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.tallies.values().map(|tally| tally.skipped).sum()
    }

    pub fn tallies(&self) -> impl Iterator<Item = (FactKind, KindTally)> + '_ {
        self.tallies.iter().map(|(kind, tally)| (*kind, *tally))
    }

    fn record(&mut self, kind: FactKind, outcome: MergeOutcome) {
        let tally = self.tallies.entry(kind).or_default();
        match outcome {
            MergeOutcome::Added => tally.added += 1,
            MergeOutcome::Skipped => tally.skipped += 1,
        }
    }
}

/// Merge interrupted by a store failure while applying one fact.
///
/// Records written before the failure stay persisted.
#[derive(Debug)]
pub struct ReconcileError {
    kind: FactKind,
    source: StoreError,
}

impl ReconcileError {
    /// Kind of the fact being merged when the failure happened.
    pub fn kind(&self) -> FactKind {
        self.kind
    }
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to reconcile {} fact: {}",
            self.kind.as_str(),
            self.source
        )
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeOutcome {
    Added,
    Skipped,
}

/// Applies extraction payloads to a borrowed store registry.
pub struct ReconciliationEngine<'r, 's> {
    stores: &'r mut StoreRegistry<'s>,
}

impl<'r, 's> ReconciliationEngine<'r, 's> {
    pub fn new(stores: &'r mut StoreRegistry<'s>) -> Self {
        Self { stores }
    }

    /// Merges every fact of `payload`, in payload order.
    ///
    /// # Errors
    /// - Returns `ReconcileError` on the first store failure; facts merged
    ///   before it remain persisted.
    pub fn reconcile(&mut self, payload: &ExtractionPayload) -> Result<ReconcileReport, ReconcileError> {
        let started_at = Instant::now();
        let mut report = ReconcileReport::default();

        for fact in payload.facts() {
            if let Err(source) = self.merge_fact(fact, &mut report) {
                let kind = fact_kind(fact);
                error!(
                    "event=reconcile module=reconcile status=error kind={} added_before_failure={} error={}",
                    kind.as_str(),
                    report.total_added(),
                    source
                );
                return Err(ReconcileError { kind, source });
            }
        }

        info!(
            "event=reconcile module=reconcile status=ok facts={} added={} skipped={} duration_ms={}",
            payload.facts().len(),
            report.total_added(),
            report.total_skipped(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn merge_fact(&mut self, fact: &ExtractedFact, report: &mut ReconcileReport) -> StoreResult<()> {
        let kind = fact_kind(fact);
        let outcome = match fact {
            ExtractedFact::Person(person) => self.merge_person(person)?,
            ExtractedFact::Job(job) => self.merge_job(job, report)?,
            ExtractedFact::Skill(skill) => self.merge_skill(skill, report)?,
            ExtractedFact::Education(education) => {
                let key = EducationKey::from(education);
                add_unmatched(
                    &mut self.stores.education,
                    |existing| EducationKey::from(existing) == key,
                    |base| Education {
                        base,
                        school_name: education.school_name.clone(),
                        degree_name: education.degree_name.clone(),
                        start_date: education.start_date,
                        end_date: education.end_date,
                        location: education.location.clone(),
                    },
                )?
            }
            ExtractedFact::Certification(certification) => {
                let key = CertificationKey::from(certification);
                add_unmatched(
                    &mut self.stores.certifications,
                    |existing| CertificationKey::from(existing) == key,
                    |base| Certification {
                        base,
                        org_name: certification.org_name.clone(),
                        cert_name: certification.cert_name.clone(),
                        details: certification.details.clone(),
                    },
                )?
            }
            ExtractedFact::Volunteer(volunteer) => {
                let key = VolunteerKey::from(volunteer);
                add_unmatched(
                    &mut self.stores.volunteers,
                    |existing| VolunteerKey::from(existing) == key,
                    |base| Volunteer {
                        base,
                        org_name: volunteer.org_name.clone(),
                        details: volunteer.details.clone(),
                    },
                )?
            }
            ExtractedFact::Project(project) => {
                let key = ProjectKey::from(project);
                add_unmatched(
                    &mut self.stores.projects,
                    |existing| ProjectKey::from(existing) == key,
                    |base| Project {
                        base,
                        project_name: project.project_name.clone(),
                        project_details: project.project_details.clone(),
                    },
                )?
            }
            ExtractedFact::Summary(summary) => {
                let key = SummaryKey::from(summary);
                add_unmatched(
                    &mut self.stores.summaries,
                    |existing| SummaryKey::from(existing) == key,
                    |base| ProfessionalSummary {
                        base,
                        summary: summary.summary.clone(),
                    },
                )?
            }
        };
        report.record(kind, outcome);
        Ok(())
    }

    fn merge_person(&mut self, person: &ExtractedPerson) -> StoreResult<MergeOutcome> {
        let Some(email) = person.email.as_deref() else {
            debug!("event=reconcile_fact module=reconcile status=skipped kind=person reason=no_email");
            return Ok(MergeOutcome::Skipped);
        };
        if self.stores.persons.find_by_email(email).is_some() {
            return Ok(MergeOutcome::Skipped);
        }

        let mut record = match person.id.as_deref() {
            Some(id) => Person::empty(BaseEntity::new(id, true)),
            None => self.stores.persons.create_user()?,
        };
        record.base.included = true;
        record.name = person.name.clone();
        record.email = email.to_string();
        record.phone = person.phone.clone();
        record.city = person.city.clone();
        record.state = person.state.clone();
        record.github = person.github.clone();
        record.linkedin = person.linkedin.clone();
        record.portfolio = person.portfolio.clone();
        self.stores.persons.save_user(record)?;
        Ok(MergeOutcome::Added)
    }

    fn merge_job(
        &mut self,
        job: &ExtractedJob,
        report: &mut ReconcileReport,
    ) -> StoreResult<MergeOutcome> {
        let key = JobKey::from(job);
        if self.stores.jobs.find(|existing| JobKey::from(existing) == key).is_some() {
            return Ok(MergeOutcome::Skipped);
        }

        let job_id = self.stores.jobs.create_id();
        self.stores.jobs.add_item(Job {
            base: BaseEntity::new(job_id.clone(), true),
            job_title: job.job_title.clone(),
            company_name: job.company_name.clone(),
            start_date: job.start_date,
            end_date: job.end_date,
            location: job.location.clone(),
        })?;

        for line in &job.descriptions {
            let description = JobDescription {
                base: BaseEntity::new(self.stores.job_descriptions.create_id(), true),
                description: line.clone(),
                job_id: job_id.clone(),
                checked: false,
            };
            self.stores.job_descriptions.add_item(description)?;
            report.record(FactKind::JobDescription, MergeOutcome::Added);
        }

        Ok(MergeOutcome::Added)
    }

    fn merge_skill(
        &mut self,
        skill: &ExtractedSkill,
        report: &mut ReconcileReport,
    ) -> StoreResult<MergeOutcome> {
        let key = SkillKey::from(skill);
        let outcome = add_unmatched(
            &mut self.stores.skill_names,
            |existing| SkillKey::from(existing) == key,
            |base| SkillName {
                base,
                skill_name: skill.skill_name.clone(),
                associated_skill_type_names: skill.associated_skill_type_names.clone(),
            },
        )?;
        if outcome == MergeOutcome::Skipped {
            return Ok(outcome);
        }

        for type_name in &skill.associated_skill_type_names {
            let type_outcome = add_unmatched(
                &mut self.stores.skill_types,
                |existing| SkillTypeKey::from(existing) == SkillTypeKey(type_name),
                |base| SkillType {
                    base,
                    skill_type_name: type_name.clone(),
                    associated_skill_names: vec![skill.skill_name.clone()],
                },
            )?;
            if type_outcome == MergeOutcome::Added {
                report.record(FactKind::SkillType, type_outcome);
            }
        }

        Ok(outcome)
    }
}

/// Adds `build(fresh base)` unless a record satisfying `matches` exists.
fn add_unmatched<T: Entity>(
    store: &mut CollectionStore<'_, T>,
    matches: impl FnMut(&T) -> bool,
    build: impl FnOnce(BaseEntity) -> T,
) -> StoreResult<MergeOutcome> {
    if store.find(matches).is_some() {
        return Ok(MergeOutcome::Skipped);
    }
    let base = BaseEntity::new(store.create_id(), true);
    store.add_item(build(base))?;
    Ok(MergeOutcome::Added)
}
