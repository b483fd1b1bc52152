//! rivulet — a minimal reactive view-binding engine.
//!
//! A markup template is parsed into a slotmap-backed view tree, a data graph
//! is wrapped in an observed [`Store`], and declarative markers bind the two:
//!
//! - `{{expr}}` in text nodes interpolates expression values,
//! - `for-expr` / `for-var` repeats an element's children per generated item,
//! - `if-expr` includes or excludes an element's children,
//! - `click-expr` wires a statement to fire on trigger.
//!
//! Updates are coarse: every observed store write publishes on the
//! [`app::DATA_TOPIC`] topic and the mounted [`App`] re-renders all of its
//! bindings, discarding and rebuilding repeat/conditional regions outright.
//! No diffing, no partial invalidation.
//!
//! ```
//! use rivulet::{App, Value};
//!
//! let app = App::mount(
//!     r#"<div><p>count: {{count}}</p><button click-expr="count = count + 1">+</button></div>"#,
//!     Value::object([("count", Value::Int(0))]),
//! )
//! .unwrap();
//!
//! let button = app.dom().borrow().query_by_tag("button")[0];
//! app.trigger(button).unwrap();
//! assert_eq!(app.render(), "<div><p>count: 1</p><button>+</button></div>");
//! ```
//!
//! Everything is single-threaded `Rc`/`RefCell` plumbing; handles are cheap
//! to clone and clones share state.

pub mod app;
pub mod dom;
pub mod error;
pub mod expr;
pub mod markup;
pub mod notify;
pub mod scope;
pub mod store;
pub mod template;
pub mod testing;
pub mod value;

pub use app::{App, DATA_TOPIC};
pub use dom::{Dom, NodeData, NodeId};
pub use error::{Error, Result};
pub use notify::Notifier;
pub use scope::Scope;
pub use store::Store;
pub use value::Value;
