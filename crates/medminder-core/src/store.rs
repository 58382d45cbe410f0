//! The profile store: the single source of truth for the active profile.
//!
//! `ProfileStore` holds the active `Profile` together with its medication and
//! health-metric lists, and mirrors them into a `KeyValueStore`:
//!
//!   load(id) → [seed missing lists] → active in memory → mutate → persist
//!
//! Persistence rules:
//!
//! - Every medication or metric mutation rewrites all three records of the
//!   active profile (`user_`, `medications_`, `health_`) before returning.
//!   There are no delta writes.
//! - Profile-only edits (`update_profile`) stay in memory until the next list
//!   mutation or an explicit `save()`.
//! - Operations without an active profile, or addressed to an id that does
//!   not exist, are no-ops reported through `bool` / `Option`, never errors.
//! - On any `Err` the in-memory state is left as it was.

use tracing::{debug, info, warn};

use medminder_contracts::{
    error::MedMinderResult,
    keys::{self, CURRENT_PROFILE_KEY, ONBOARDING_KEY, ONBOARDING_SEEN},
    medication::{Medication, MedicationId, MedicationUpdate, NewMedication},
    metric::HealthMetric,
    profile::{NewProfile, Profile, ProfileId, ProfileUpdate},
};

use crate::{
    config::SeedingPolicy,
    seed::{default_health_metrics, default_medications},
    traits::{Clock, KeyValueStore},
};

/// Today's medication progress for the active profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adherence {
    pub taken: usize,
    pub total: usize,
}

impl Adherence {
    /// Whole-number percentage of doses taken; 0 when nothing is scheduled.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.taken * 100) / self.total) as u8
    }
}

/// Owns the active profile and mediates every read and write of its data.
///
/// Construct one store per front end and inject it; there is no global
/// instance.
pub struct ProfileStore {
    backend: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    seeding: SeedingPolicy,
    active: Option<Profile>,
    medications: Vec<Medication>,
    health_metrics: Vec<HealthMetric>,
}

impl ProfileStore {
    /// Create an empty store (no active profile) over `backend`.
    pub fn new(backend: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            seeding: SeedingPolicy::default(),
            active: None,
            medications: Vec::new(),
            health_metrics: Vec::new(),
        }
    }

    /// Choose when default records are seeded. Defaults to `Lazy`.
    pub fn with_seeding(mut self, seeding: SeedingPolicy) -> Self {
        self.seeding = seeding;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn active_profile(&self) -> Option<&Profile> {
        self.active.as_ref()
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn health_metrics(&self) -> &[HealthMetric] {
        &self.health_metrics
    }

    pub fn medication(&self, id: &MedicationId) -> Option<&Medication> {
        self.medications.iter().find(|m| &m.id == id)
    }

    pub fn adherence(&self) -> Adherence {
        Adherence {
            taken: self.medications.iter().filter(|m| m.taken).count(),
            total: self.medications.len(),
        }
    }

    // ── Loading and switching ────────────────────────────────────────────────

    /// Load whichever profile was last active, if any.
    ///
    /// Returns `Ok(false)` when no last-active id is recorded or its profile
    /// record is gone.
    pub fn restore(&mut self) -> MedMinderResult<bool> {
        match self.backend.get(CURRENT_PROFILE_KEY)? {
            Some(id) if !id.is_empty() => self.load(&ProfileId(id)),
            _ => {
                debug!("no last-active profile recorded");
                Ok(false)
            }
        }
    }

    /// Read the profile `id` and its lists from the backend and make it the
    /// active profile.
    ///
    /// A missing medication list is seeded with one default medication; a
    /// missing metric list with the four default vitals stamped "now". Seeded
    /// lists are written back immediately (the profile record is not), so
    /// loading the same id again reproduces identical state.
    ///
    /// Returns `Ok(false)` and leaves the current state alone when no profile
    /// record exists for `id`. A blob that fails to decode is an `Err`.
    pub fn load(&mut self, id: &ProfileId) -> MedMinderResult<bool> {
        let Some(raw_profile) = self.backend.get(&keys::profile_key(id))? else {
            warn!(profile_id = %id, "no persisted profile record; load skipped");
            return Ok(false);
        };
        let profile: Profile = serde_json::from_str(&raw_profile)?;

        // Decode everything before seeding anything, so a malformed blob
        // leaves the backend untouched too.
        let medications_key = keys::medications_key(id);
        let health_key = keys::health_key(id);
        let stored_medications = match self.backend.get(&medications_key)? {
            Some(raw) => Some(serde_json::from_str::<Vec<Medication>>(&raw)?),
            None => None,
        };
        let stored_health = match self.backend.get(&health_key)? {
            Some(raw) => Some(serde_json::from_str::<Vec<HealthMetric>>(&raw)?),
            None => None,
        };

        let medications = match stored_medications {
            Some(medications) => medications,
            None => {
                let seeded = default_medications();
                self.backend.set(&medications_key, &serde_json::to_string(&seeded)?)?;
                debug!(profile_id = %id, "seeded default medications");
                seeded
            }
        };
        let health_metrics = match stored_health {
            Some(health_metrics) => health_metrics,
            None => {
                let seeded = default_health_metrics(self.clock.now());
                self.backend.set(&health_key, &serde_json::to_string(&seeded)?)?;
                debug!(profile_id = %id, "seeded default health metrics");
                seeded
            }
        };

        self.backend.set(CURRENT_PROFILE_KEY, id.as_str())?;

        info!(
            profile_id = %id,
            medications = medications.len(),
            health_metrics = health_metrics.len(),
            "profile loaded"
        );

        self.active = Some(profile);
        self.medications = medications;
        self.health_metrics = health_metrics;
        Ok(true)
    }

    /// Replace the active state with profile `id`. Same as [`Self::load`].
    pub fn switch_profile(&mut self, id: &ProfileId) -> MedMinderResult<bool> {
        self.load(id)
    }

    /// Register a new profile and make it active.
    ///
    /// The profile gets a fresh id with `createdAt == lastActive == now`, and
    /// is recorded as the last-active profile. Its record is persisted so it
    /// shows up in [`Self::list_all_profiles`] straight away.
    ///
    /// Under `SeedingPolicy::Lazy` the lists start empty in memory and are
    /// not persisted, so the next `load` seeds them. Under `OnCreate` the
    /// defaults are seeded and persisted here.
    pub fn create_profile(&mut self, new: NewProfile) -> MedMinderResult<ProfileId> {
        let now = self.clock.now();
        let id = ProfileId::generate();
        let mut profile = new.into_profile(id.clone(), now);

        let (medications, health_metrics) = match self.seeding {
            SeedingPolicy::Lazy => (Vec::new(), Vec::new()),
            SeedingPolicy::OnCreate => {
                let medications = default_medications();
                profile.total_medications = medications.len() as u32;
                profile.completed_today = 0;
                (medications, default_health_metrics(now))
            }
        };

        self.backend.set(&keys::profile_key(&id), &serde_json::to_string(&profile)?)?;
        if self.seeding == SeedingPolicy::OnCreate {
            self.backend
                .set(&keys::medications_key(&id), &serde_json::to_string(&medications)?)?;
            self.backend
                .set(&keys::health_key(&id), &serde_json::to_string(&health_metrics)?)?;
        }
        self.backend.set(CURRENT_PROFILE_KEY, id.as_str())?;

        info!(profile_id = %id, seeding = ?self.seeding, "profile created");

        self.active = Some(profile);
        self.medications = medications;
        self.health_metrics = health_metrics;
        Ok(id)
    }

    /// Every persisted profile, most recently active first.
    ///
    /// Scans the backend for `user_` keys. Entries that cannot be read or
    /// decoded are logged and skipped.
    pub fn list_all_profiles(&self) -> MedMinderResult<Vec<Profile>> {
        let mut profiles = Vec::new();

        for key in self.backend.keys()? {
            if keys::profile_id_from_key(&key).is_none() {
                continue;
            }
            let raw = match self.backend.get(&key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = %key, error = %e, "could not read profile record; skipping");
                    continue;
                }
            };
            match serde_json::from_str::<Profile>(&raw) {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    warn!(key = %key, error = %e, "malformed profile record; skipping");
                }
            }
        }

        profiles.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        Ok(profiles)
    }

    /// Forget the active profile and the last-active pointer.
    ///
    /// Persisted records are kept; the profile can be loaded again later.
    pub fn sign_out(&mut self) -> MedMinderResult<()> {
        self.backend.remove(CURRENT_PROFILE_KEY)?;
        if let Some(profile) = self.active.take() {
            info!(profile_id = %profile.id, "signed out");
        }
        self.medications.clear();
        self.health_metrics.clear();
        Ok(())
    }

    // ── Saving ───────────────────────────────────────────────────────────────

    /// Persist the active profile and both lists.
    ///
    /// `lastActive` is refreshed to now and `completedToday` /
    /// `totalMedications` are recomputed from the medication list, both in
    /// the written record and in memory. Returns `Ok(false)` with no active
    /// profile.
    pub fn save(&mut self) -> MedMinderResult<bool> {
        let Some(profile) = self.active.as_ref() else {
            return Ok(false);
        };
        let refreshed = self.write_snapshot(profile, &self.medications, &self.health_metrics)?;
        self.active = Some(refreshed);
        Ok(true)
    }

    /// Write all three records for `profile` and return the refreshed
    /// profile. Nothing in memory changes.
    fn write_snapshot(
        &self,
        profile: &Profile,
        medications: &[Medication],
        health_metrics: &[HealthMetric],
    ) -> MedMinderResult<Profile> {
        let refreshed = Profile {
            last_active: self.clock.now(),
            completed_today: medications.iter().filter(|m| m.taken).count() as u32,
            total_medications: medications.len() as u32,
            ..profile.clone()
        };

        let profile_json = serde_json::to_string(&refreshed)?;
        let medications_json = serde_json::to_string(medications)?;
        let health_json = serde_json::to_string(health_metrics)?;

        self.backend.set(&keys::profile_key(&refreshed.id), &profile_json)?;
        self.backend.set(&keys::medications_key(&refreshed.id), &medications_json)?;
        self.backend.set(&keys::health_key(&refreshed.id), &health_json)?;

        debug!(
            profile_id = %refreshed.id,
            completed_today = refreshed.completed_today,
            total_medications = refreshed.total_medications,
            health_metrics = health_metrics.len(),
            "profile saved"
        );

        Ok(refreshed)
    }

    /// Persist `medications` for the active profile, then adopt it in memory.
    fn commit_medications(&mut self, medications: Vec<Medication>) -> MedMinderResult<()> {
        if let Some(profile) = self.active.as_ref() {
            let refreshed = self.write_snapshot(profile, &medications, &self.health_metrics)?;
            self.active = Some(refreshed);
            self.medications = medications;
        }
        Ok(())
    }

    fn commit_health_metrics(&mut self, health_metrics: Vec<HealthMetric>) -> MedMinderResult<()> {
        if let Some(profile) = self.active.as_ref() {
            let refreshed = self.write_snapshot(profile, &self.medications, &health_metrics)?;
            self.active = Some(refreshed);
            self.health_metrics = health_metrics;
        }
        Ok(())
    }

    // ── Mutations ────────────────────────────────────────────────────────────

    /// Merge `update` into the active profile in memory.
    ///
    /// Not persisted until the next list mutation or `save()`. Returns
    /// `false` with no active profile.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> bool {
        match self.active.as_mut() {
            Some(profile) => {
                update.apply_to(profile);
                true
            }
            None => false,
        }
    }

    /// Append a medication with a fresh id and `taken = false`.
    ///
    /// Returns `Ok(None)` with no active profile.
    pub fn add_medication(&mut self, new: NewMedication) -> MedMinderResult<Option<MedicationId>> {
        if self.active.is_none() {
            debug!("add_medication without an active profile; ignored");
            return Ok(None);
        }

        let id = MedicationId::generate();
        let mut medications = self.medications.clone();
        medications.push(new.into_medication(id.clone()));
        self.commit_medications(medications)?;

        info!(medication_id = %id, "medication added");
        Ok(Some(id))
    }

    /// Merge `update` into the medication `id`. `Ok(false)` if not found.
    pub fn update_medication(
        &mut self,
        id: &MedicationId,
        update: MedicationUpdate,
    ) -> MedMinderResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut medications = self.medications.clone();
        update.apply_to(&mut medications[index], self.clock.now());
        self.commit_medications(medications)?;
        Ok(true)
    }

    /// Remove the medication `id`. `Ok(false)` if not found.
    pub fn delete_medication(&mut self, id: &MedicationId) -> MedMinderResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut medications = self.medications.clone();
        let removed = medications.remove(index);
        self.commit_medications(medications)?;

        info!(medication_id = %removed.id, name = %removed.name, "medication deleted");
        Ok(true)
    }

    /// Mark the medication `id` as taken now.
    ///
    /// `Ok(false)` if not found or already taken; an earlier `takenAt` is
    /// never overwritten.
    pub fn mark_medication_taken(&mut self, id: &MedicationId) -> MedMinderResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        if self.medications[index].taken {
            debug!(medication_id = %id, "medication already taken");
            return Ok(false);
        }

        let mut medications = self.medications.clone();
        medications[index].taken = true;
        medications[index].taken_at = Some(self.clock.now());
        self.commit_medications(medications)?;

        info!(medication_id = %id, "medication taken");
        Ok(true)
    }

    /// Replace the active metric list wholesale.
    ///
    /// No merging: metrics absent from `health_metrics` are dropped.
    /// `Ok(false)` with no active profile.
    pub fn update_health_metrics(&mut self, health_metrics: Vec<HealthMetric>) -> MedMinderResult<bool> {
        if self.active.is_none() {
            return Ok(false);
        }
        self.commit_health_metrics(health_metrics)?;
        Ok(true)
    }

    fn position(&self, id: &MedicationId) -> Option<usize> {
        if self.active.is_none() {
            return None;
        }
        self.medications.iter().position(|m| &m.id == id)
    }

    // ── Onboarding ───────────────────────────────────────────────────────────

    pub fn has_seen_onboarding(&self) -> MedMinderResult<bool> {
        Ok(self.backend.get(ONBOARDING_KEY)?.as_deref() == Some(ONBOARDING_SEEN))
    }

    pub fn mark_onboarding_seen(&self) -> MedMinderResult<()> {
        self.backend.set(ONBOARDING_KEY, ONBOARDING_SEEN)
    }
}
