//! Template model: live bindings between expressions and view-tree regions.
//!
//! Three binding variants share one contract — `update()`: re-render the
//! binding's owned region from current data, given its fixed scope.
//!
//! - [`TextBinding`] substitutes `{{…}}` placeholders in a text node.
//! - [`RepeatBinding`] rebuilds one fragment clone per generated item.
//! - [`ConditionalBinding`] includes or excludes a single fragment clone.
//!
//! Bindings are immutable after discovery: all per-pass state lives in the
//! tree and the action registry, and Repeat/Conditional rediscover their
//! children from scratch on every update. No diffing, no reuse.

pub mod conditional;
pub mod repeat;
pub mod scan;
pub mod text;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::expr::eval::{evaluate, execute, range, Host};
use crate::notify::Notifier;
use crate::scope::Scope;
use crate::store::Store;
use crate::value::Value;

pub use conditional::ConditionalBinding;
pub use repeat::{RepeatBinding, DEFAULT_VAR};
pub use scan::{scan, CLICK_EXPR, FOR_EXPR, FOR_VAR, IF_EXPR};
pub use text::TextBinding;

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// A live binding owning a region of the view tree.
pub enum Binding {
    Text(TextBinding),
    Repeat(RepeatBinding),
    Conditional(ConditionalBinding),
}

impl Binding {
    /// Re-render this binding's owned region from current data.
    pub fn update(&self, ctx: &BindContext) -> Result<()> {
        match self {
            Binding::Text(binding) => binding.update(ctx),
            Binding::Repeat(binding) => binding.update(ctx),
            Binding::Conditional(binding) => binding.update(ctx),
        }
    }
}

// ---------------------------------------------------------------------------
// EngineHost
// ---------------------------------------------------------------------------

/// The host-function allow-list expressions see inside the engine:
/// `range` plus `publish` bound to the change notifier.
pub struct EngineHost {
    notifier: Notifier,
}

impl Host for EngineHost {
    fn call(&self, name: &str, args: Vec<Value>) -> std::result::Result<Value, String> {
        match name {
            "range" => range(&args),
            "publish" => {
                let [topic, message] = <[Value; 2]>::try_from(args)
                    .map_err(|args| format!("publish takes 2 arguments, got {}", args.len()))?;
                let Value::Str(topic) = topic else {
                    return Err(format!("publish topic must be a string, got {}", topic.type_name()));
                };
                self.notifier.publish(&topic, &message);
                Ok(Value::Null)
            }
            other => Err(format!("unknown function `{other}`")),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionRegistry
// ---------------------------------------------------------------------------

/// A click action wired to a node: statement text plus the scope it was
/// discovered under.
#[derive(Clone)]
pub struct Action {
    pub expression: String,
    pub scope: Scope,
}

/// Click actions keyed by node. Shared handle; region clearing prunes
/// entries for destroyed nodes so stale bindings cannot fire.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    inner: Rc<RefCell<HashMap<NodeId, Action>>>,
}

impl ActionRegistry {
    /// Wire a click action to `node`.
    pub fn register(&self, node: NodeId, expression: impl Into<String>, scope: Scope) {
        self.inner.borrow_mut().insert(
            node,
            Action {
                expression: expression.into(),
                scope,
            },
        );
    }

    /// Look up the action wired to `node`.
    pub fn get(&self, node: NodeId) -> Option<Action> {
        self.inner.borrow().get(&node).cloned()
    }

    /// Drop actions wired to any of `removed`.
    pub fn prune(&self, removed: &[NodeId]) {
        if removed.is_empty() {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        for id in removed {
            inner.remove(id);
        }
    }

    /// Number of wired actions.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether no actions are wired.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

// ---------------------------------------------------------------------------
// BindContext
// ---------------------------------------------------------------------------

/// Everything an `update()` pass needs: the tree, the store, the notifier
/// (as the expression host), and the click-action registry.
///
/// Cheap to clone; clones share state. No interior borrow is held across
/// expression evaluation, so an expression that mutates the store — and
/// thereby re-enters `refresh()` — never trips a borrow conflict.
#[derive(Clone)]
pub struct BindContext {
    pub dom: Rc<RefCell<Dom>>,
    pub store: Store,
    pub notifier: Notifier,
    pub actions: ActionRegistry,
}

impl BindContext {
    /// Build a context over shared tree, store, and notifier handles.
    pub fn new(dom: Rc<RefCell<Dom>>, store: Store, notifier: Notifier) -> Self {
        Self {
            dom,
            store,
            notifier,
            actions: ActionRegistry::default(),
        }
    }

    /// Evaluate an expression under the engine's host allow-list.
    pub fn eval(&self, src: &str, scope: &Scope) -> Result<Value> {
        let host = EngineHost {
            notifier: self.notifier.clone(),
        };
        evaluate(src, scope, &host)
    }

    /// Run a statement (UI action): assignments write through the store.
    pub fn exec(&self, src: &str, scope: &Scope) -> Result<Value> {
        let host = EngineHost {
            notifier: self.notifier.clone(),
        };
        execute(src, scope, &host, &self.store)
    }

    /// Clear a binding's owned region (the child list of `owner`) and drop
    /// click actions wired to the destroyed nodes.
    pub fn clear_region(&self, owner: NodeId) {
        let removed = self.dom.borrow_mut().clear_children(owner);
        self.actions.prune(&removed);
    }
}
