//! Attachment manager.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::bounded;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use grove_core::error::RuntimeError;
use grove_core::{Attachment, GroveConfig, IdentityId};

use crate::startup::StartupReport;
use crate::worker::{Task, WorkerLane};
use crate::Environment;

/// Owns the identity to attachment table and the worker lane.
///
/// Every method that changes the table takes `&mut self`, so the table is
/// only ever mutated from the thread that drives the manager. Recomputation
/// and teardown are queued to the lane and run in submission order.
pub struct AttachmentManager {
    env: Environment,

    /// Shared with the lane; read at the start of every task.
    config: Arc<RwLock<GroveConfig>>,

    lane: Option<WorkerLane>,

    attachments: HashMap<IdentityId, Arc<dyn Attachment>>,
}

impl AttachmentManager {
    /// Create a stopped manager.
    pub fn new(env: Environment, config: GroveConfig) -> Self {
        Self {
            env,
            config: Arc::new(RwLock::new(config)),
            lane: None,
            attachments: HashMap::new(),
        }
    }

    /// The collaborators this manager was built with.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> GroveConfig {
        self.config.read().clone()
    }

    /// Replace the configuration. Takes effect from the next queued task.
    pub fn set_config(&self, config: GroveConfig) {
        *self.config.write() = config;
    }

    pub fn is_running(&self) -> bool {
        self.lane.is_some()
    }

    /// Whether `id` currently has an attachment.
    pub fn is_attached(&self, id: &IdentityId) -> bool {
        self.attachments.contains_key(id)
    }

    /// Number of attached identities.
    pub fn attached_count(&self) -> usize {
        self.attachments.len()
    }

    /// The attachment held for `id`.
    pub fn attachment(&self, id: &IdentityId) -> Option<Arc<dyn Attachment>> {
        self.attachments.get(id).cloned()
    }

    /// Check the declarative data, spawn the lane and attach every identity
    /// already online.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::AlreadyStarted`] if the lane is running,
    /// or with a store error if the declarative data cannot be read.
    pub fn start(&mut self) -> grove_core::Result<StartupReport> {
        if self.lane.is_some() {
            return Err(RuntimeError::AlreadyStarted.into());
        }

        let report = StartupReport::collect(self.env.store.as_ref(), self.env.contexts.as_ref())?;
        report.log();

        self.lane = Some(WorkerLane::spawn(self.env.clone(), self.config.clone())?);

        for id in self.env.host.online_identities() {
            self.attach(id)?;
        }

        info!("Attachment manager started with {} identities", self.attachments.len());
        Ok(report)
    }

    /// Detach everyone, drain the lane and stop it.
    pub fn stop(&mut self) -> Result<(), RuntimeError> {
        let lane = self.lane.take().ok_or(RuntimeError::NotStarted)?;

        let mut result = Ok(());
        for (id, attachment) in self.attachments.drain() {
            if let Err(e) = lane.submit(Task::Detach { id, attachment }) {
                result = Err(e);
            }
        }
        lane.shutdown()?;

        info!("Attachment manager stopped");
        result
    }

    /// Attach to `id` and queue a full recomputation.
    ///
    /// An existing attachment is reused. Returns `false` when the host could
    /// not create one, for example because the identity is offline.
    pub fn attach(&mut self, id: IdentityId) -> Result<bool, RuntimeError> {
        let lane = self.lane.as_ref().ok_or(RuntimeError::NotStarted)?;

        let attachment = match self.attachments.get(&id) {
            Some(existing) => existing.clone(),
            None => match self.env.host.create_attachment(&id) {
                Some(created) => {
                    self.attachments.insert(id, created.clone());
                    created
                }
                None => {
                    warn!("Host could not create an attachment for {}", id);
                    return Ok(false);
                }
            },
        };

        lane.submit(Task::Recompute { id, attachment })?;
        debug!("Queued attach of {}", id);
        Ok(true)
    }

    /// Drop `id` from the table and queue the teardown of its attachment.
    ///
    /// Returns `false` if `id` was not attached.
    pub fn detach(&mut self, id: &IdentityId) -> Result<bool, RuntimeError> {
        let lane = self.lane.as_ref().ok_or(RuntimeError::NotStarted)?;

        match self.attachments.remove(id) {
            Some(attachment) => {
                lane.submit(Task::Detach { id: *id, attachment })?;
                debug!("Queued detach of {}", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Queue a recomputation of `id` if it is attached.
    pub fn update_one(&self, id: &IdentityId) -> Result<bool, RuntimeError> {
        let lane = self.lane.as_ref().ok_or(RuntimeError::NotStarted)?;

        match self.attachments.get(id) {
            Some(attachment) => {
                lane.submit(Task::Recompute {
                    id: *id,
                    attachment: attachment.clone(),
                })?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Queue a recomputation of every attached identity.
    pub fn recompute_all(&self) -> Result<(), RuntimeError> {
        let lane = self.lane.as_ref().ok_or(RuntimeError::NotStarted)?;

        let targets = self
            .attachments
            .iter()
            .map(|(id, attachment)| (*id, attachment.clone()))
            .collect();
        lane.submit(Task::RecomputeAll(targets))
    }

    /// Block until everything queued so far has run.
    pub fn flush(&self) -> Result<(), RuntimeError> {
        let lane = self.lane.as_ref().ok_or(RuntimeError::NotStarted)?;

        let (done, wait) = bounded(1);
        lane.submit(Task::Barrier(done))?;
        wait.recv().map_err(|_| RuntimeError::WorkerGone)
    }
}

impl Drop for AttachmentManager {
    fn drop(&mut self) {
        if self.lane.is_some() {
            if let Err(e) = self.stop() {
                warn!("Attachment manager did not stop cleanly: {}", e);
            }
        }
    }
}
