//! Tree scanner: discover markers, build bindings, wire click actions.
//!
//! One scan routine serves both the initial build and Repeat/Conditional
//! materialization. It walks the given subtrees in document order and
//! consumes declarative markers:
//!
//! - text nodes containing `{{…}}` placeholders → [`TextBinding`]
//! - `for-expr` (+ optional `for-var`) elements → [`RepeatBinding`]
//! - `if-expr` elements → [`ConditionalBinding`]
//! - `click-expr` elements → an entry in the action registry
//!
//! Nesting exclusion: the scanner never descends into a `for-expr` or
//! `if-expr` carrier. Its children are consumed into the cached fragment at
//! discovery time (the live region starts empty and is populated by the
//! first `update()`), so everything beneath it — markers, placeholders,
//! click actions — is discovered only on materialization, under the correct
//! nested scope. When one element carries both markers, `for-expr` wins and
//! the `if-expr` attribute is consumed along with it.
//!
//! Marker attributes are stripped as they are consumed: re-scanning a
//! scanned subtree finds nothing.

use crate::dom::{Fragment, NodeId};
use crate::error::Result;
use crate::scope::Scope;

use super::conditional::ConditionalBinding;
use super::repeat::{RepeatBinding, DEFAULT_VAR};
use super::text::{find_placeholders, TextBinding};
use super::{BindContext, Binding};

/// Repetition marker: generator expression.
pub const FOR_EXPR: &str = "for-expr";
/// Repetition marker: element-name override.
pub const FOR_VAR: &str = "for-var";
/// Conditional marker: boolean expression.
pub const IF_EXPR: &str = "if-expr";
/// Click-action marker: statement run on trigger.
pub const CLICK_EXPR: &str = "click-expr";

/// What the scanner decided about one node, extracted under a single borrow.
enum Discovery {
    Skip,
    Text {
        source: String,
        placeholders: Vec<String>,
    },
    Repeat {
        generator: String,
        var: String,
        click: Option<String>,
    },
    Conditional {
        condition: String,
        click: Option<String>,
    },
    Descend {
        click: Option<String>,
        children: Vec<NodeId>,
    },
}

/// Scan the subtrees rooted at `roots`, in order, under `scope`.
///
/// Returns discovered bindings in document order. Click actions are wired
/// into `ctx.actions` as a side effect.
pub fn scan(ctx: &BindContext, roots: &[NodeId], scope: &Scope) -> Result<Vec<Binding>> {
    let mut bindings = Vec::new();
    for &root in roots {
        scan_node(ctx, root, scope, &mut bindings)?;
    }
    Ok(bindings)
}

fn scan_node(
    ctx: &BindContext,
    id: NodeId,
    scope: &Scope,
    out: &mut Vec<Binding>,
) -> Result<()> {
    let discovery = discover(ctx, id);
    match discovery {
        Discovery::Skip => Ok(()),
        Discovery::Text {
            source,
            placeholders,
        } => {
            out.push(Binding::Text(TextBinding::new(
                id,
                source,
                placeholders,
                scope.clone(),
            )));
            Ok(())
        }
        Discovery::Repeat {
            generator,
            var,
            click,
        } => {
            let fragment = consume_fragment(ctx, id);
            if let Some(expression) = click {
                ctx.actions.register(id, expression, scope.clone());
            }
            out.push(Binding::Repeat(RepeatBinding::new(
                id,
                generator,
                var,
                fragment,
                scope.clone(),
            )));
            Ok(())
        }
        Discovery::Conditional { condition, click } => {
            let fragment = consume_fragment(ctx, id);
            if let Some(expression) = click {
                ctx.actions.register(id, expression, scope.clone());
            }
            out.push(Binding::Conditional(ConditionalBinding::new(
                id,
                condition,
                fragment,
                scope.clone(),
            )));
            Ok(())
        }
        Discovery::Descend { click, children } => {
            if let Some(expression) = click {
                ctx.actions.register(id, expression, scope.clone());
            }
            for child in children {
                scan_node(ctx, child, scope, out)?;
            }
            Ok(())
        }
    }
}

/// Inspect one node and consume its marker attributes, under one borrow.
fn discover(ctx: &BindContext, id: NodeId) -> Discovery {
    let mut dom = ctx.dom.borrow_mut();
    let Some(data) = dom.get_mut(id) else {
        return Discovery::Skip;
    };

    if let Some(text) = data.text_content() {
        let placeholders = find_placeholders(text);
        if placeholders.is_empty() {
            return Discovery::Skip;
        }
        return Discovery::Text {
            source: text.to_owned(),
            placeholders,
        };
    }

    if let Some(generator) = data.take_attr(FOR_EXPR) {
        let var = data.take_attr(FOR_VAR).unwrap_or_else(|| DEFAULT_VAR.into());
        data.take_attr(IF_EXPR); // for-expr wins; consume a co-located if-expr
        let click = data.take_attr(CLICK_EXPR);
        return Discovery::Repeat {
            generator,
            var,
            click,
        };
    }

    if let Some(condition) = data.take_attr(IF_EXPR) {
        let click = data.take_attr(CLICK_EXPR);
        return Discovery::Conditional { condition, click };
    }

    let click = data.take_attr(CLICK_EXPR);
    let children = dom.children(id).to_vec();
    Discovery::Descend { click, children }
}

/// Capture a marker carrier's children as its fragment and empty the live
/// region. The first `update()` repopulates it.
fn consume_fragment(ctx: &BindContext, id: NodeId) -> Fragment {
    let mut dom = ctx.dom.borrow_mut();
    let fragment = dom.snapshot_children(id);
    dom.clear_children(id);
    fragment
}
