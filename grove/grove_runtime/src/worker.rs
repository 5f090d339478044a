//! The worker lane.
//!
//! A single named thread drains an unbounded FIFO queue. Every change to
//! attachment contents happens here, one task at a time, so recomputations
//! never interleave.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, warn};

use grove_core::error::RuntimeError;
use grove_core::{Attachment, GroveConfig, IdentityId, User};
use grove_policy::{Definitions, DisplayComposer, IdentityResolver};

use crate::Environment;

const LANE_NAME: &str = "permissions-worker";

/// Work accepted by the lane. Nothing is cancelled once queued.
pub(crate) enum Task {
    /// Clear and reapply one identity.
    Recompute {
        id: IdentityId,
        attachment: Arc<dyn Attachment>,
    },

    /// Clear and reapply every listed identity against one snapshot.
    RecomputeAll(Vec<(IdentityId, Arc<dyn Attachment>)>),

    /// Revoke everything and release the attachment.
    Detach {
        id: IdentityId,
        attachment: Arc<dyn Attachment>,
    },

    /// Signal once every earlier task has run.
    Barrier(Sender<()>),
}

/// Handle to the running lane.
pub(crate) struct WorkerLane {
    sender: Sender<Task>,
    handle: JoinHandle<()>,
}

impl WorkerLane {
    /// Spawn the lane thread.
    pub(crate) fn spawn(
        env: Environment,
        config: Arc<RwLock<GroveConfig>>,
    ) -> Result<Self, RuntimeError> {
        let (sender, receiver) = unbounded();
        let handle = thread::Builder::new()
            .name(LANE_NAME.to_string())
            .spawn(move || run(receiver, env, config))?;

        Ok(Self { sender, handle })
    }

    /// Queue `task` behind everything already submitted.
    pub(crate) fn submit(&self, task: Task) -> Result<(), RuntimeError> {
        self.sender.send(task).map_err(|_| RuntimeError::WorkerGone)
    }

    /// Close the queue, let the lane drain it and wait for the thread.
    pub(crate) fn shutdown(self) -> Result<(), RuntimeError> {
        drop(self.sender);
        self.handle.join().map_err(|_| RuntimeError::WorkerGone)
    }
}

fn run(receiver: Receiver<Task>, env: Environment, config: Arc<RwLock<GroveConfig>>) {
    debug!("Worker lane {} started", LANE_NAME);

    for task in receiver.iter() {
        match task {
            Task::Recompute { id, attachment } => {
                let config = config.read().clone();
                match Definitions::load(env.store.as_ref()) {
                    Ok(definitions) => {
                        let universe = env.universe.all_capabilities();
                        recompute(&env, &config, &definitions, &universe, id, attachment.as_ref());
                    }
                    Err(e) => {
                        attachment.clear();
                        warn!("Could not load definitions for {}: {}", id, e);
                    }
                }
            }
            Task::RecomputeAll(targets) => {
                let config = config.read().clone();
                match Definitions::load(env.store.as_ref()) {
                    Ok(definitions) => {
                        let universe = env.universe.all_capabilities();
                        for (id, attachment) in &targets {
                            recompute(
                                &env,
                                &config,
                                &definitions,
                                &universe,
                                *id,
                                attachment.as_ref(),
                            );
                        }
                        debug!("Recomputed {} attachments", targets.len());
                    }
                    Err(e) => {
                        for (_, attachment) in &targets {
                            attachment.clear();
                        }
                        warn!("Could not load definitions: {}", e);
                    }
                }
            }
            Task::Detach { id, attachment } => {
                attachment.clear();
                attachment.release();
                debug!("Released attachment of {}", id);
            }
            Task::Barrier(done) => {
                // The waiter may have given up; nothing to do then
                let _ = done.send(());
            }
        }
    }

    debug!("Worker lane {} stopped", LANE_NAME);
}

/// Full clear-then-reapply of one identity, then its display name.
fn recompute(
    env: &Environment,
    config: &GroveConfig,
    definitions: &Definitions,
    universe: &[String],
    id: IdentityId,
    attachment: &dyn Attachment,
) {
    attachment.clear();

    let Some(context) = env.host.context_of(&id) else {
        debug!("Identity {} has no context, skipping", id);
        return;
    };

    let resolver = IdentityResolver::new(definitions);
    let user = match resolver.load(env.store.as_ref(), id, &context) {
        Ok(user) => user,
        Err(e) => {
            warn!("Could not resolve identity {} in {}: {}", id, context, e);
            return;
        }
    };

    let effective = resolver.effective(&user, &context, universe);
    for capability in &effective.allow {
        attachment.grant(capability);
    }
    env.host.refresh_commands(&id);

    debug!(
        "Recomputed {} in {}: {} granted, {} denied",
        id,
        context,
        effective.allow.len(),
        effective.deny.len()
    );

    update_display(env, config, &resolver, &user, id, &context);
}

fn update_display(
    env: &Environment,
    config: &GroveConfig,
    resolver: &IdentityResolver<'_>,
    user: &User,
    id: IdentityId,
    context: &str,
) {
    let Some(group) = resolver.highest_group(user, context) else {
        return;
    };
    let Some(base_name) = env.host.name_of(&id) else {
        return;
    };

    let display = DisplayComposer::new(config).compose(user, group, context, &base_name);
    if display.apply_to_chat {
        env.host.set_display_name(&id, &display.name);
    }
    if display.apply_to_list {
        env.host.set_list_name(&id, &display.name);
    }
}
