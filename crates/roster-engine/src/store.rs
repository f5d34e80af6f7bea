//! Owner of the template records.
//!
//! The store enforces the field invariants, runs the conflict gate on every
//! create and slot-changing update, and is the sole writer of approval and
//! activation state. Records are soft-deleted only; history behind
//! already-generated occurrences is never destroyed.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::approval::ApprovalStatus;
use crate::conflict::{find_conflicts, CandidateSlot, ConflictReport};
use crate::error::{Result, ScheduleError};
use crate::event::{ScheduleEvent, ScheduleEventKind};
use crate::template::{NewTemplate, ScheduleTemplate, TemplatePatch};

/// Deployment-level policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPolicy {
    /// When true (the default), new templates start `Pending` and inactive
    /// until a manager decision. When false, they are created
    /// `AutoApproved` and immediately active.
    #[serde(default = "default_require_approval")]
    pub require_approval: bool,
}

fn default_require_approval() -> bool {
    true
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            require_approval: true,
        }
    }
}

/// In-memory set of template records, keyed by id.
///
/// Keys iterate in `Uuid` order, so conflict reports and listings are
/// deterministic for a given set of records.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    policy: SchedulingPolicy,
    templates: BTreeMap<Uuid, ScheduleTemplate>,
    outbox: Vec<ScheduleEvent>,
}

impl TemplateStore {
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self {
            policy,
            templates: BTreeMap::new(),
            outbox: Vec::new(),
        }
    }

    /// Rebuild a store from previously persisted records. Each record's
    /// field invariants are re-checked; conflicts are not, since the records
    /// were gated when first written.
    pub fn load(policy: SchedulingPolicy, templates: Vec<ScheduleTemplate>) -> Result<Self> {
        let mut store = Self::new(policy);
        for template in templates {
            template.validate()?;
            if store.templates.contains_key(&template.id) {
                return Err(ScheduleError::Validation(format!(
                    "duplicate template id {}",
                    template.id
                )));
            }
            store.templates.insert(template.id, template);
        }
        Ok(store)
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Result<&ScheduleTemplate> {
        self.templates
            .get(&id)
            .ok_or_else(|| ScheduleError::NotFound(format!("template {}", id)))
    }

    pub fn templates(&self) -> impl Iterator<Item = &ScheduleTemplate> {
        self.templates.values()
    }

    /// Templates currently eligible for expansion.
    pub fn active_templates(&self) -> impl Iterator<Item = &ScheduleTemplate> {
        self.templates.values().filter(|t| t.active && !t.deactivated)
    }

    /// Drain the outbound events recorded since the last drain. Consumed by
    /// the notification collaborator; nothing in the engine waits on it.
    pub fn take_events(&mut self) -> Vec<ScheduleEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Pre-flight conflict check: report collisions without mutating
    /// anything. The caller decides whether to reject or merely warn.
    pub fn check_conflicts(
        &self,
        candidate: &CandidateSlot,
        exclude: Option<Uuid>,
    ) -> ConflictReport {
        let scope = self.templates.values().filter(|t| t.in_conflict_scope());
        find_conflicts(candidate, scope, exclude)
    }

    /// Validate and persist a new template.
    ///
    /// The conflict gate scans every non-rejected, non-deactivated template
    /// (pending included), so a slot cannot be claimed twice even before
    /// approval. The resulting state follows
    /// [`SchedulingPolicy::require_approval`].
    pub fn create(&mut self, new: NewTemplate) -> Result<ScheduleTemplate> {
        let now = Utc::now();
        let (approval, active) = if self.policy.require_approval {
            (ApprovalStatus::Pending, false)
        } else {
            (ApprovalStatus::AutoApproved, true)
        };

        let template = ScheduleTemplate {
            id: Uuid::new_v4(),
            course_id: new.course_id,
            teacher_id: new.teacher_id,
            group_id: new.group_id,
            room: new.room,
            building: new.building,
            day: new.day,
            start: new.start,
            end: new.end,
            cadence: new.cadence,
            effective_from: new.effective_from.unwrap_or_else(|| now.date_naive()),
            effective_to: new.effective_to,
            active,
            approval,
            approved_by: None,
            approval_date: None,
            approval_notes: None,
            deactivated: false,
            notes: new.notes,
            created_at: now,
        };
        template.validate()?;
        self.gate(&template.slot(), None)?;

        info!(template_id = %template.id, teacher_id = %template.teacher_id, status = ?approval, "template created");
        self.outbox.push(ScheduleEvent::new(
            ScheduleEventKind::TemplateCreated,
            template.id,
            None,
        ));
        self.templates.insert(template.id, template.clone());
        Ok(template)
    }

    /// Apply a partial update.
    ///
    /// At least one field must be supplied. A change to any slot field
    /// (day, time, room) re-runs the conflict gate against all *other*
    /// in-scope templates before committing. Rejected and deactivated
    /// templates cannot be updated: rejection is terminal, so the caller
    /// resubmits as a new pending template instead.
    pub fn update(&mut self, id: Uuid, patch: TemplatePatch) -> Result<ScheduleTemplate> {
        if patch.is_empty() {
            return Err(ScheduleError::Validation(
                "at least one field must be supplied".into(),
            ));
        }

        let current = self.get(id)?;
        if current.deactivated {
            return Err(ScheduleError::State(format!(
                "template {} is deactivated",
                id
            )));
        }
        if current.approval == ApprovalStatus::Rejected {
            return Err(ScheduleError::State(format!(
                "template {} was rejected; submit a new template instead",
                id
            )));
        }

        let mut updated = current.clone();
        let slot_changed = patch.apply(&mut updated);
        updated.validate()?;
        if slot_changed {
            debug!(template_id = %id, "slot fields changed, re-running conflict gate");
            self.gate(&updated.slot(), Some(id))?;
        }

        self.outbox.push(ScheduleEvent::new(
            ScheduleEventKind::TemplateUpdated,
            id,
            None,
        ));
        self.templates.insert(id, updated.clone());
        Ok(updated)
    }

    /// Manager sign-off: `Pending` becomes `Approved` and the template turns
    /// active, with approver and timestamp stamped on the record.
    pub fn approve(
        &mut self,
        id: Uuid,
        approved_by: Uuid,
        notes: Option<String>,
    ) -> Result<ScheduleTemplate> {
        let template = self.decidable_mut(id, ApprovalStatus::Approved)?;
        template.approval = ApprovalStatus::Approved;
        template.active = true;
        template.approved_by = Some(approved_by);
        template.approval_date = Some(Utc::now());
        template.approval_notes = notes;
        let result = template.clone();

        info!(template_id = %id, approver = %approved_by, "template approved");
        self.outbox.push(ScheduleEvent::new(
            ScheduleEventKind::TemplateApproved,
            id,
            Some(approved_by),
        ));
        Ok(result)
    }

    /// Manager rejection. Notes are mandatory; the template stays inactive
    /// and the rejection is terminal.
    pub fn reject(&mut self, id: Uuid, approved_by: Uuid, notes: &str) -> Result<ScheduleTemplate> {
        if notes.trim().is_empty() {
            return Err(ScheduleError::Validation(
                "rejection requires approval notes".into(),
            ));
        }

        let template = self.decidable_mut(id, ApprovalStatus::Rejected)?;
        template.approval = ApprovalStatus::Rejected;
        template.active = false;
        template.approved_by = Some(approved_by);
        template.approval_date = Some(Utc::now());
        template.approval_notes = Some(notes.to_string());
        let result = template.clone();

        info!(template_id = %id, approver = %approved_by, "template rejected");
        self.outbox.push(ScheduleEvent::new(
            ScheduleEventKind::TemplateRejected,
            id,
            Some(approved_by),
        ));
        Ok(result)
    }

    /// Soft delete. Idempotent; already-generated occurrences keep their
    /// history and the record stays readable.
    pub fn deactivate(&mut self, id: Uuid) -> Result<ScheduleTemplate> {
        let template = self
            .templates
            .get_mut(&id)
            .ok_or_else(|| ScheduleError::NotFound(format!("template {}", id)))?;

        if !template.deactivated {
            template.deactivated = true;
            template.active = false;
            info!(template_id = %id, "template deactivated");
            self.outbox.push(ScheduleEvent::new(
                ScheduleEventKind::TemplateDeactivated,
                id,
                None,
            ));
        }
        Ok(template.clone())
    }

    /// Run the conflict gate: a non-empty report rejects the write with the
    /// conflicting templates identified.
    fn gate(&self, slot: &CandidateSlot, exclude: Option<Uuid>) -> Result<()> {
        let report = self.check_conflicts(slot, exclude);
        if report.is_empty() {
            Ok(())
        } else {
            Err(ScheduleError::Conflict(report.into_hits()))
        }
    }

    /// Fetch a template for an approval decision, enforcing the state
    /// machine: only pending, non-deactivated templates are decidable.
    fn decidable_mut(
        &mut self,
        id: Uuid,
        to: ApprovalStatus,
    ) -> Result<&mut ScheduleTemplate> {
        let template = self
            .templates
            .get_mut(&id)
            .ok_or_else(|| ScheduleError::NotFound(format!("template {}", id)))?;
        if template.deactivated {
            return Err(ScheduleError::State(format!(
                "template {} is deactivated",
                id
            )));
        }
        if !template.approval.may_transition(to) {
            return Err(ScheduleError::State(format!(
                "template {} is {:?}, not pending",
                id, template.approval
            )));
        }
        Ok(template)
    }
}
