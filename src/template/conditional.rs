//! Conditional inclusion: a fragment present or absent by boolean.

use tracing::debug;

use crate::dom::{Fragment, NodeId};
use crate::error::{Error, Result};
use crate::scope::Scope;
use crate::value::Value;

use super::scan::scan;
use super::BindContext;

/// A conditional region: the child list of an `if-expr` carrier element.
///
/// When the condition holds, the region contains exactly one fresh clone of
/// the cached fragment; otherwise it is empty. A false→true transition
/// stamps a brand-new clone — nothing from an earlier inclusion survives.
pub struct ConditionalBinding {
    owner: NodeId,
    condition: String,
    fragment: Fragment,
    scope: Scope,
}

impl ConditionalBinding {
    pub fn new(
        owner: NodeId,
        condition: impl Into<String>,
        fragment: Fragment,
        scope: Scope,
    ) -> Self {
        Self {
            owner,
            condition: condition.into(),
            fragment,
            scope,
        }
    }

    /// The carrier element whose child list this binding owns.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Rebuild the region: clear, evaluate the condition, and include one
    /// fragment clone when it holds.
    pub fn update(&self, ctx: &BindContext) -> Result<()> {
        ctx.clear_region(self.owner);

        let decided = ctx.eval(&self.condition, &self.scope)?;
        let Value::Bool(include) = decided else {
            return Err(Error::expression(
                &self.condition,
                format!("if-expr must yield a boolean, got {}", decided.type_name()),
            ));
        };

        debug!(owner = ?self.owner, include, "conditional region rebuild");
        if !include {
            return Ok(());
        }

        let clone_roots = ctx.dom.borrow_mut().instantiate(&self.fragment, self.owner);
        let children = scan(ctx, &clone_roots, &self.scope)?;
        for child in &children {
            child.update(ctx)?;
        }
        Ok(())
    }
}
