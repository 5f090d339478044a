//! Group management commands.
//!
//! [`route`] takes a command name and its arguments as typed by an operator
//! and returns a [`CommandOutcome`] for the host to report back. Arguments
//! are `<identity> [ladder]` for `promote`/`demote`, `<identity> <group...>`
//! for `setgroup`/`addgroup`, and nothing for `lpreload`.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use grove_core::error::{ConfigError, Error, StoreError};
use grove_core::types::distinct;
use grove_core::{IdentityId, Ladder};
use grove_policy::{Definitions, IdentityResolver, RankResolver};

use crate::attachment::AttachmentManager;

/// The recognised commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Promote,
    Demote,
    SetGroup,
    AddGroup,
    Reload,
}

impl CommandKind {
    /// Parse a command name, ignoring case, `-` and `_`.
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match key.as_str() {
            "PROMOTE" => Some(Self::Promote),
            "DEMOTE" => Some(Self::Demote),
            "SETGROUP" => Some(Self::SetGroup),
            "ADDGROUP" => Some(Self::AddGroup),
            "LPRELOAD" => Some(Self::Reload),
            _ => None,
        }
    }
}

/// Why a well-formed command did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CommandRejection {
    #[error("Player does not have a group")]
    NoGroup,

    #[error("An appropriate ladder could not be found")]
    NoLadder,

    #[error("Player is at the top of the ladder already")]
    TopOfLadder,

    #[error("Player is at the bottom of the ladder already")]
    BottomOfLadder,

    #[error("No mentioned groups found")]
    NoGroupsFound,

    #[error("An error occurred reloading permissions")]
    ReloadFailed,
}

/// Result of routing one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Promoted { group: String },
    Demoted { group: String },
    GroupsUpdated { groups: Vec<String> },
    Reloaded,
    Rejected(CommandRejection),

    /// Missing arguments or an identity that is not online.
    Usage,

    /// Not a command this router handles.
    Unrecognized,

    /// The change could not be persisted.
    Failed(StoreError),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Promoted { .. }
                | Self::Demoted { .. }
                | Self::GroupsUpdated { .. }
                | Self::Reloaded
        )
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Promoted { .. } => write!(f, "Player promoted"),
            Self::Demoted { .. } => write!(f, "Player demoted"),
            Self::GroupsUpdated { .. } => write!(f, "Player groups updated"),
            Self::Reloaded => write!(f, "Permissions reloaded"),
            Self::Rejected(reason) => write!(f, "{}", reason),
            Self::Usage => write!(f, "Invalid arguments"),
            Self::Unrecognized => write!(f, "Unknown command"),
            Self::Failed(e) => write!(f, "{}", e),
        }
    }
}

/// Run the command `name` with `args`.
///
/// Store read failures and a lost worker lane are returned as errors;
/// everything an operator can act on comes back as a [`CommandOutcome`].
pub fn route(
    manager: &mut AttachmentManager,
    name: &str,
    args: &[&str],
) -> grove_core::Result<CommandOutcome> {
    let Some(kind) = CommandKind::parse(name) else {
        return Ok(CommandOutcome::Unrecognized);
    };

    match kind {
        CommandKind::Promote => move_along_ladder(manager, args, true),
        CommandKind::Demote => move_along_ladder(manager, args, false),
        CommandKind::SetGroup => change_groups(manager, args, true),
        CommandKind::AddGroup => change_groups(manager, args, false),
        CommandKind::Reload => Ok(reload(manager)),
    }
}

/// Resolve the first argument to an online identity.
fn mentioned_identity(manager: &AttachmentManager, args: &[&str]) -> Option<IdentityId> {
    let name = args.first()?;
    manager.environment().host.find_identity(name)
}

fn move_along_ladder(
    manager: &mut AttachmentManager,
    args: &[&str],
    promote: bool,
) -> grove_core::Result<CommandOutcome> {
    let Some(id) = mentioned_identity(manager, args) else {
        return Ok(CommandOutcome::Usage);
    };

    let env = manager.environment().clone();
    let Some(context) = env.host.context_of(&id) else {
        return Ok(CommandOutcome::Usage);
    };

    let definitions = Definitions::load(env.store.as_ref())?;
    let resolver = IdentityResolver::new(&definitions);
    let user = match resolver.load(env.store.as_ref(), id, &context) {
        Ok(user) => user,
        Err(Error::Config(ConfigError::DefaultGroupMissing { .. })) => {
            return Ok(CommandOutcome::Rejected(CommandRejection::NoGroup))
        }
        Err(e) => return Err(e),
    };

    let Some(current) = resolver.highest_group(&user, &context) else {
        return Ok(CommandOutcome::Rejected(CommandRejection::NoGroup));
    };

    let rank = RankResolver::new(&definitions);
    // An unknown ladder name falls back to the first ladder holding the group
    let ladder: Option<&Ladder> = args
        .get(1)
        .and_then(|ladder_name| definitions.ladder(ladder_name))
        .or_else(|| rank.first_ladder_with_group(current));
    let Some(ladder) = ladder else {
        return Ok(CommandOutcome::Rejected(CommandRejection::NoLadder));
    };

    let target = if promote {
        rank.find_promotion(&user, ladder)
    } else {
        rank.find_demotion(&user, ladder)
    };
    let Some(target) = target else {
        let reason = if promote {
            CommandRejection::TopOfLadder
        } else {
            CommandRejection::BottomOfLadder
        };
        return Ok(CommandOutcome::Rejected(reason));
    };

    let group = target.name.clone();
    if let Err(e) = env.store.set_user_groups(&id, &[group.clone()]) {
        warn!("Could not persist groups of {}: {}", id, e);
        return Ok(CommandOutcome::Failed(e));
    }
    manager.update_one(&id)?;

    info!("Moved {} along ladder {} to {}", id, ladder.name, group);
    Ok(if promote {
        CommandOutcome::Promoted { group }
    } else {
        CommandOutcome::Demoted { group }
    })
}

fn change_groups(
    manager: &mut AttachmentManager,
    args: &[&str],
    replace: bool,
) -> grove_core::Result<CommandOutcome> {
    let Some(id) = mentioned_identity(manager, args) else {
        return Ok(CommandOutcome::Usage);
    };
    if args.len() < 2 {
        return Ok(CommandOutcome::Usage);
    }

    let env = manager.environment().clone();
    let definitions = Definitions::load(env.store.as_ref())?;
    let mentioned: Vec<String> = definitions
        .groups_named(&args[1..])
        .into_iter()
        .map(|group| group.name.clone())
        .collect();
    if mentioned.is_empty() {
        return Ok(CommandOutcome::Rejected(CommandRejection::NoGroupsFound));
    }

    let groups = if replace {
        mentioned
    } else {
        let existing = env.store.user_group_names(&id)?;
        distinct(existing.into_iter().chain(mentioned))
    };

    if let Err(e) = env.store.set_user_groups(&id, &groups) {
        warn!("Could not persist groups of {}: {}", id, e);
        return Ok(CommandOutcome::Failed(e));
    }
    manager.update_one(&id)?;

    info!("Set groups of {} to {:?}", id, groups);
    Ok(CommandOutcome::GroupsUpdated { groups })
}

fn reload(manager: &AttachmentManager) -> CommandOutcome {
    match manager.recompute_all() {
        Ok(()) => {
            info!("Permissions reloaded for {} identities", manager.attached_count());
            CommandOutcome::Reloaded
        }
        Err(e) => {
            warn!("Reload failed: {}", e);
            CommandOutcome::Rejected(CommandRejection::ReloadFailed)
        }
    }
}
