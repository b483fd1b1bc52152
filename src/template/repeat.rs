//! Repeated-block inclusion: one fragment clone per generated item.

use tracing::debug;

use crate::dom::{Fragment, NodeId};
use crate::error::{Error, Result};
use crate::scope::Scope;
use crate::value::Value;

use super::scan::scan;
use super::BindContext;

/// Default element-name binding when no `for-var` is given.
pub const DEFAULT_VAR: &str = "it";

/// A repetition region: the child list of a `for-expr` carrier element.
///
/// The fragment is the carrier's original child markup, captured once at
/// discovery and never mutated. Every update fully discards the region and
/// its descendant bindings and rebuilds both — no reuse across passes.
pub struct RepeatBinding {
    owner: NodeId,
    generator: String,
    var: String,
    fragment: Fragment,
    scope: Scope,
}

impl RepeatBinding {
    pub fn new(
        owner: NodeId,
        generator: impl Into<String>,
        var: impl Into<String>,
        fragment: Fragment,
        scope: Scope,
    ) -> Self {
        Self {
            owner,
            generator: generator.into(),
            var: var.into(),
            fragment,
            scope,
        }
    }

    /// The carrier element whose child list this binding owns.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Rebuild the region: clear, evaluate the generator, stamp one scoped
    /// fragment clone per item, then update every discovered child binding
    /// in creation order.
    pub fn update(&self, ctx: &BindContext) -> Result<()> {
        ctx.clear_region(self.owner);

        let generated = ctx.eval(&self.generator, &self.scope)?;
        let Value::List(items) = generated else {
            return Err(Error::expression(
                &self.generator,
                format!("for-expr must yield a list, got {}", generated.type_name()),
            ));
        };

        debug!(owner = ?self.owner, items = items.len(), "repeat region rebuild");

        // Materialize and scan every item first; child updates run last, in
        // creation order.
        let mut children = Vec::new();
        for item in items {
            let clone_roots = ctx.dom.borrow_mut().instantiate(&self.fragment, self.owner);
            let child_scope = self.scope.merge([(self.var.clone(), item)]);
            children.extend(scan(ctx, &clone_roots, &child_scope)?);
        }
        for child in &children {
            child.update(ctx)?;
        }
        Ok(())
    }
}
