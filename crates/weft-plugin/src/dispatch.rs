//! Hook entry points driving plugins for a build.
//!
//! The dispatcher owns the registries produced by discovery plus the
//! failure policy fixed at construction. Content items flow through
//! per-extension chains as a fold where each stage's cardinality is free:
//! a plugin can multiply one item into many, collapse many into one, or
//! drop an item by returning an empty sequence. Whole-project hooks
//! invoke their flat registry sequentially for side effects.

use serde_json::Value;

use crate::plugin::{ActionResult, PluginActionError, ProjectPlugin};
use crate::registry::{ContentRegistry, ProjectRegistry};

/// What the dispatcher does when a plugin action fails.
///
/// Fixed at construction and applied uniformly across the content, backup
/// and publication hooks of a single dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first failing plugin aborts the hook and its error is returned.
    #[default]
    Abort,
    /// Failures are logged and skipped: a failing content plugin passes
    /// the element through unchanged, a failing project plugin does not
    /// stop the remaining ones.
    Continue,
}

/// Applies plugins to content items and runs whole-project hooks.
///
/// Registries are immutable once handed over; the dispatcher itself holds
/// no mutable state and may be shared across readers.
pub struct Dispatcher {
    content: ContentRegistry,
    backup: ProjectRegistry,
    publication: ProjectRegistry,
    policy: FailurePolicy,
}

impl Dispatcher {
    /// Create a dispatcher over discovered registries.
    #[must_use]
    pub fn new(
        content: ContentRegistry,
        backup: ProjectRegistry,
        publication: ProjectRegistry,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            content,
            backup,
            publication,
            policy,
        }
    }

    /// The content registry this dispatcher routes with.
    #[must_use]
    pub fn content_registry(&self) -> &ContentRegistry {
        &self.content
    }

    /// The backup registry.
    #[must_use]
    pub fn backup_registry(&self) -> &ProjectRegistry {
        &self.backup
    }

    /// The publication registry.
    #[must_use]
    pub fn publication_registry(&self) -> &ProjectRegistry {
        &self.publication
    }

    /// Route one content item through its extension's plugin chain.
    ///
    /// The item's `extension` field selects the chain. An item without the
    /// field, or with an extension no plugin registered for, passes
    /// through unchanged as `[item]`. Otherwise every plugin in the chain
    /// is applied, in priority order, to every element surviving the
    /// previous stage; the final stage is returned. Cardinality is not
    /// fixed across the chain; fan-out, collapse and drops are all
    /// ordinary outcomes.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], the first failing plugin's
    /// [`PluginActionError`] is returned. Under [`FailurePolicy::Continue`]
    /// this method always returns `Ok`.
    pub fn hook_content(&self, item: Value) -> Result<Vec<Value>, PluginActionError> {
        let chain = match item.get("extension").and_then(Value::as_str) {
            Some(extension) => match self.content.chain(extension) {
                Some(chain) => chain,
                None => return Ok(vec![item]),
            },
            None => return Ok(vec![item]),
        };

        let mut stage = vec![item];
        for plugin in chain {
            let mut next_stage = Vec::with_capacity(stage.len());
            for element in stage {
                let result = match self.policy {
                    FailurePolicy::Abort => plugin.action(element)?,
                    FailurePolicy::Continue => match plugin.action(element.clone()) {
                        Ok(result) => result,
                        Err(error) => {
                            tracing::warn!(
                                plugin = %plugin.register().name,
                                %error,
                                "content plugin failed; element passes through unchanged"
                            );
                            ActionResult::One(element)
                        }
                    },
                };
                match result {
                    ActionResult::One(value) => next_stage.push(value),
                    ActionResult::Many(values) => next_stage.extend(values),
                }
            }
            stage = next_stage;
        }
        Ok(stage)
    }

    /// Run every backup plugin, in priority order, for its side effect.
    ///
    /// # Errors
    ///
    /// Propagation follows the dispatcher's [`FailurePolicy`].
    pub fn hook_backup(&self) -> Result<(), PluginActionError> {
        self.run_project_hook(&self.backup, "backup")
    }

    /// Run every publication plugin, in priority order, for its side
    /// effect.
    ///
    /// # Errors
    ///
    /// Propagation follows the dispatcher's [`FailurePolicy`].
    pub fn hook_publication(&self) -> Result<(), PluginActionError> {
        self.run_project_hook(&self.publication, "publication")
    }

    fn run_project_hook(
        &self,
        registry: &ProjectRegistry,
        hook: &'static str,
    ) -> Result<(), PluginActionError> {
        for plugin in registry.iter() {
            if let Err(error) = run_one(plugin.as_ref()) {
                match self.policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Continue => {
                        tracing::warn!(
                            plugin = %plugin.register().name,
                            hook,
                            %error,
                            "project plugin failed; continuing"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Invoke a single project plugin; return values are ignored by contract.
fn run_one(plugin: &dyn ProjectPlugin) -> Result<(), PluginActionError> {
    plugin.action()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::plugin::{ContentPlugin, Descriptor};
    use crate::registry::{ContentRegistry, ProjectRegistry};
    use serde_json::json;

    fn dispatcher_with_chain(
        plugins: Vec<Arc<dyn ContentPlugin>>,
        policy: FailurePolicy,
    ) -> Dispatcher {
        Dispatcher::new(
            ContentRegistry::from_plugins(plugins),
            ProjectRegistry::default(),
            ProjectRegistry::default(),
            policy,
        )
    }

    /// Duplicates every input item.
    struct Doubler;

    impl ContentPlugin for Doubler {
        fn register(&self) -> Descriptor {
            Descriptor::new("doubler", 10)
        }

        fn extensions(&self) -> Vec<String> {
            vec!["test".to_owned()]
        }

        fn action(&self, item: Value) -> Result<ActionResult, PluginActionError> {
            Ok(vec![item.clone(), item].into())
        }
    }

    /// The constant 1-function.
    struct Constant;

    impl ContentPlugin for Constant {
        fn register(&self) -> Descriptor {
            Descriptor::new("constant", 5)
        }

        fn extensions(&self) -> Vec<String> {
            vec!["test".to_owned()]
        }

        fn action(&self, _item: Value) -> Result<ActionResult, PluginActionError> {
            Ok(json!(1).into())
        }
    }

    /// Drops every input item.
    struct Dropper;

    impl ContentPlugin for Dropper {
        fn register(&self) -> Descriptor {
            Descriptor::new("dropper", 1)
        }

        fn extensions(&self) -> Vec<String> {
            vec!["test".to_owned()]
        }

        fn action(&self, _item: Value) -> Result<ActionResult, PluginActionError> {
            Ok(ActionResult::Many(vec![]))
        }
    }

    /// Always fails.
    struct Failing;

    impl ContentPlugin for Failing {
        fn register(&self) -> Descriptor {
            Descriptor::new("failing", 7)
        }

        fn extensions(&self) -> Vec<String> {
            vec!["test".to_owned()]
        }

        fn action(&self, _item: Value) -> Result<ActionResult, PluginActionError> {
            Err(PluginActionError::new("failing", "boom"))
        }
    }

    /// Records invocations for ordering assertions.
    struct Recorder {
        name: &'static str,
        priority: i32,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl ProjectPlugin for Recorder {
        fn register(&self) -> Descriptor {
            Descriptor::new(self.name, self.priority)
        }

        fn action(&self) -> Result<(), PluginActionError> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                return Err(PluginActionError::new(self.name, "boom"));
            }
            Ok(())
        }
    }

    #[test]
    fn fan_out_then_constant_yields_two_ones() {
        // Doubler (priority 10) runs before Constant (priority 5): one
        // item becomes two, then each maps to 1.
        let dispatcher = dispatcher_with_chain(
            vec![Arc::new(Doubler), Arc::new(Constant)],
            FailurePolicy::Abort,
        );

        let results = dispatcher
            .hook_content(json!({"extension": "test"}))
            .unwrap();

        assert_eq!(results, vec![json!(1), json!(1)]);
    }

    #[test]
    fn unregistered_extension_passes_through() {
        let dispatcher = dispatcher_with_chain(vec![Arc::new(Doubler)], FailurePolicy::Abort);
        let item = json!({"extension": "pdf", "origin": "a.pdf"});

        let results = dispatcher.hook_content(item.clone()).unwrap();

        assert_eq!(results, vec![item]);
    }

    #[test]
    fn item_without_extension_passes_through() {
        let dispatcher = dispatcher_with_chain(vec![Arc::new(Doubler)], FailurePolicy::Abort);
        let item = json!({"origin": "mystery"});

        let results = dispatcher.hook_content(item.clone()).unwrap();

        assert_eq!(results, vec![item]);
    }

    #[test]
    fn empty_sequence_drops_all_items() {
        let dispatcher = dispatcher_with_chain(vec![Arc::new(Dropper)], FailurePolicy::Abort);

        let results = dispatcher
            .hook_content(json!({"extension": "test"}))
            .unwrap();

        assert_eq!(results, Vec::<Value>::new());
    }

    #[test]
    fn drop_happens_even_mid_chain() {
        // Doubler fans out to two elements; Dropper (lower priority, runs
        // second) drops both.
        let dispatcher = dispatcher_with_chain(
            vec![Arc::new(Doubler), Arc::new(Dropper)],
            FailurePolicy::Abort,
        );

        let results = dispatcher
            .hook_content(json!({"extension": "test"}))
            .unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn abort_policy_propagates_content_error() {
        let dispatcher = dispatcher_with_chain(
            vec![Arc::new(Failing), Arc::new(Constant)],
            FailurePolicy::Abort,
        );

        let err = dispatcher
            .hook_content(json!({"extension": "test"}))
            .unwrap_err();

        assert_eq!(err.plugin, "failing");
    }

    #[test]
    fn continue_policy_passes_element_through_failing_plugin() {
        // Failing (priority 7) is skipped for the element; Constant
        // (priority 5) still applies.
        let dispatcher = dispatcher_with_chain(
            vec![Arc::new(Failing), Arc::new(Constant)],
            FailurePolicy::Continue,
        );

        let results = dispatcher
            .hook_content(json!({"extension": "test"}))
            .unwrap();

        assert_eq!(results, vec![json!(1)]);
    }

    #[test]
    fn project_hook_runs_in_priority_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let backup = ProjectRegistry::from_plugins(vec![
            Arc::new(Recorder {
                name: "late",
                priority: 1,
                log: Arc::clone(&log),
                fail: false,
            }),
            Arc::new(Recorder {
                name: "early",
                priority: 9,
                log: Arc::clone(&log),
                fail: false,
            }),
        ]);
        let dispatcher = Dispatcher::new(
            ContentRegistry::default(),
            backup,
            ProjectRegistry::default(),
            FailurePolicy::Abort,
        );

        dispatcher.hook_backup().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["early", "late"]);
    }

    #[test]
    fn abort_policy_stops_project_hook_at_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let publication = ProjectRegistry::from_plugins(vec![
            Arc::new(Recorder {
                name: "breaks",
                priority: 9,
                log: Arc::clone(&log),
                fail: true,
            }),
            Arc::new(Recorder {
                name: "never-runs",
                priority: 1,
                log: Arc::clone(&log),
                fail: false,
            }),
        ]);
        let dispatcher = Dispatcher::new(
            ContentRegistry::default(),
            ProjectRegistry::default(),
            publication,
            FailurePolicy::Abort,
        );

        let err = dispatcher.hook_publication().unwrap_err();

        assert_eq!(err.plugin, "breaks");
        assert_eq!(*log.lock().unwrap(), vec!["breaks"]);
    }

    #[test]
    fn continue_policy_runs_remaining_project_plugins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let backup = ProjectRegistry::from_plugins(vec![
            Arc::new(Recorder {
                name: "breaks",
                priority: 9,
                log: Arc::clone(&log),
                fail: true,
            }),
            Arc::new(Recorder {
                name: "still-runs",
                priority: 1,
                log: Arc::clone(&log),
                fail: false,
            }),
        ]);
        let dispatcher = Dispatcher::new(
            ContentRegistry::default(),
            backup,
            ProjectRegistry::default(),
            FailurePolicy::Continue,
        );

        dispatcher.hook_backup().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["breaks", "still-runs"]);
    }
}
