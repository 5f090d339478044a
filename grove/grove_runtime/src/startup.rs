//! Startup checks over the declarative data.

use tracing::{info, warn};

use grove_core::error::StoreError;
use grove_core::{ContextDirectory, DeclarativeStore};
use grove_policy::Definitions;

const NOT_INTENDED: &str = "If this is not intended, check the group definitions.";

/// Label used for the global default in [`StartupReport::defaults`].
pub const GLOBAL_LABEL: &str = "global";

/// What the declarative data looked like when the runtime started.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StartupReport {
    /// Number of defined groups.
    pub group_count: usize,

    /// Default groups as `(group name, context name or "global")`, in
    /// declaration order. Only contexts the host knows about are counted.
    pub defaults: Vec<(String, String)>,
}

impl StartupReport {
    /// Inspect the definitions held by `store`.
    pub fn collect(
        store: &dyn DeclarativeStore,
        contexts: &dyn ContextDirectory,
    ) -> Result<Self, StoreError> {
        let definitions = Definitions::load(store)?;
        let known = contexts.all_contexts();

        let defaults = definitions
            .all_defaults(&known)
            .into_iter()
            .map(|group| {
                let scope = if group.is_global_default() {
                    GLOBAL_LABEL.to_string()
                } else {
                    group.default.clone()
                };
                (group.name.clone(), scope)
            })
            .collect();

        Ok(Self {
            group_count: definitions.groups().len(),
            defaults,
        })
    }

    /// Whether some group is the default in every context.
    pub fn has_global_default(&self) -> bool {
        self.defaults.iter().any(|(_, scope)| scope == GLOBAL_LABEL)
    }

    /// Log the findings, warning about anything likely to be a mistake.
    pub fn log(&self) {
        if self.group_count == 0 {
            warn!("No permission groups are defined. {}", NOT_INTENDED);
        } else {
            info!("{} groups defined", self.group_count);
        }

        if self.defaults.is_empty() {
            warn!("No default group has been defined. {}", NOT_INTENDED);
        } else if !self.has_global_default() {
            warn!("No global default group has been defined. {}", NOT_INTENDED);
        } else {
            let listed = self
                .defaults
                .iter()
                .map(|(name, scope)| format!("{}: {}", name, scope))
                .collect::<Vec<_>>()
                .join(", ");
            info!("{} default groups defined ({})", self.defaults.len(), listed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::Group;
    use grove_policy::InMemoryStore;

    struct Contexts(Vec<String>);

    impl ContextDirectory for Contexts {
        fn all_contexts(&self) -> Vec<String> {
            self.0.clone()
        }
    }

    fn contexts(names: &[&str]) -> Contexts {
        Contexts(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_report_lists_known_defaults() {
        let store = InMemoryStore::with_definitions(
            vec![
                Group::new("member").with_default("true"),
                Group::new("builder").with_default("creative"),
                Group::new("lost").with_default("atlantis"),
                Group::new("admin"),
            ],
            Vec::new(),
        );

        let report = StartupReport::collect(&store, &contexts(&["world", "creative"])).unwrap();
        assert_eq!(report.group_count, 4);
        assert_eq!(
            report.defaults,
            vec![
                ("member".to_string(), "global".to_string()),
                ("builder".to_string(), "creative".to_string()),
            ]
        );
        assert!(report.has_global_default());
        report.log();
    }

    #[test]
    fn test_report_without_global_default() {
        let store = InMemoryStore::with_definitions(
            vec![Group::new("builder").with_default("creative")],
            Vec::new(),
        );

        let report = StartupReport::collect(&store, &contexts(&["creative"])).unwrap();
        assert!(!report.has_global_default());
        assert_eq!(report.defaults.len(), 1);
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryStore::new();
        let report = StartupReport::collect(&store, &contexts(&[])).unwrap();
        assert_eq!(report, StartupReport::default());
        report.log();
    }
}
