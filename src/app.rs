//! Application controller: wires store, notifier, and templates together.
//!
//! [`App::mount`] parses a markup template, wraps the data graph in an
//! observed [`Store`], scans the tree for bindings, and subscribes a refresh
//! listener on the data topic. From then on every observed store write
//! publishes an update message, and the listener re-renders every top-level
//! binding — synchronously, before `set` returns to the caller.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error};

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};
use crate::markup;
use crate::notify::Notifier;
use crate::scope::Scope;
use crate::store::Store;
use crate::template::{scan, BindContext, Binding};
use crate::testing::render_to_string;
use crate::value::Value;

/// Topic every observed store mutation is published on.
pub const DATA_TOPIC: &str = "rivulet::data";

/// The message published for one store mutation:
/// `{type: "UPDATE", name: <path>, value: <new value>}`.
fn update_message(path: &str, value: &Value) -> Value {
    Value::object([
        ("type", Value::from("UPDATE")),
        ("name", Value::from(path)),
        ("value", value.clone()),
    ])
}

/// A mounted view: template tree bound to a reactive data graph.
pub struct App {
    ctx: BindContext,
    templates: Rc<Vec<Binding>>,
    scope: Scope,
    root: NodeId,
    /// Error from the most recent listener-driven refresh, if it failed.
    /// A store write cannot return it (the mutation has already landed), so
    /// it is parked here for [`App::take_refresh_error`].
    refresh_error: Rc<RefCell<Option<Error>>>,
}

impl App {
    /// Parse `template`, wrap `data`, discover bindings, and render once.
    ///
    /// After mount, every observed write through [`App::store`] triggers a
    /// full refresh via the `rivulet::data` topic.
    pub fn mount(template: &str, data: Value) -> Result<App> {
        let dom = markup::parse(template)?;
        let root = match dom.root() {
            Some(root) => root,
            None => {
                return Err(Error::Markup {
                    offset: 0,
                    message: "mounted tree has no root element".into(),
                })
            }
        };

        let notifier = Notifier::new();
        let publisher = notifier.clone();
        let store = Store::new(data, move |path, value| {
            publisher.publish(DATA_TOPIC, &update_message(path, value));
        })?;

        let ctx = BindContext::new(Rc::new(RefCell::new(dom)), store.clone(), notifier);
        let scope = Scope::from_store(store);
        let templates = Rc::new(scan(&ctx, &[root], &scope)?);
        debug!(bindings = templates.len(), "mounted");

        let app = App {
            ctx,
            templates,
            scope,
            root,
            refresh_error: Rc::new(RefCell::new(None)),
        };

        // Refresh on every data update. The binding list is fixed at mount,
        // so a listener firing mid-refresh walks the same immutable set.
        // A failing pass cannot propagate through `Store::set`, so it is
        // logged and parked for `take_refresh_error`.
        let listener_ctx = app.ctx.clone();
        let listener_templates = app.templates.clone();
        let listener_error = app.refresh_error.clone();
        app.ctx.notifier.subscribe(DATA_TOPIC, move |_| {
            if let Err(err) = refresh_all(&listener_ctx, &listener_templates) {
                error!(%err, "refresh aborted");
                *listener_error.borrow_mut() = Some(err);
            }
        });

        app.refresh()?;
        Ok(app)
    }

    /// Re-render every top-level binding, in document order.
    ///
    /// Aborts on the first binding error; regions already rebuilt in this
    /// pass keep their new content.
    pub fn refresh(&self) -> Result<()> {
        refresh_all(&self.ctx, &self.templates)
    }

    /// Take the error from the most recent failed listener-driven refresh.
    ///
    /// Store writes re-render via the data topic, where a binding error
    /// cannot surface through `set` (the write has already landed). It is
    /// parked here instead; `None` means every refresh since the last call
    /// succeeded.
    pub fn take_refresh_error(&self) -> Option<Error> {
        self.refresh_error.borrow_mut().take()
    }

    /// The reactive store. Writes through it re-render the view.
    pub fn store(&self) -> &Store {
        &self.ctx.store
    }

    /// Shared handle to the live view tree.
    pub fn dom(&self) -> Rc<RefCell<Dom>> {
        self.ctx.dom.clone()
    }

    /// The root element of the mounted tree.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Register a listener on an arbitrary topic.
    pub fn subscribe(&self, topic: impl Into<String>, listener: impl Fn(&Value) + 'static) {
        self.ctx.notifier.subscribe(topic, listener);
    }

    /// Publish a message on an arbitrary topic.
    pub fn publish(&self, topic: &str, message: &Value) {
        self.ctx.notifier.publish(topic, message);
    }

    /// Evaluate an expression against the store scope plus `locals`.
    pub fn evaluate(
        &self,
        src: &str,
        locals: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Value> {
        self.ctx.eval(src, &self.scope.merge(locals))
    }

    /// Fire the click action wired to `node`, as a UI event would.
    ///
    /// The action runs under the scope it was discovered in; an assignment
    /// writes through the store and re-renders before this returns.
    pub fn trigger(&self, node: NodeId) -> Result<Value> {
        let action = self.ctx.actions.get(node).ok_or_else(|| {
            Error::expression("click-expr", "no action wired to this node")
        })?;
        self.ctx.exec(&action.expression, &action.scope)
    }

    /// Serialize the current tree to markup.
    pub fn render(&self) -> String {
        render_to_string(&self.ctx.dom.borrow(), self.root)
    }
}

fn refresh_all(ctx: &BindContext, templates: &[Binding]) -> Result<()> {
    for binding in templates {
        binding.update(ctx)?;
    }
    Ok(())
}
