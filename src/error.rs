//! Crate-wide error taxonomy.
//!
//! Three failures cover the core: a name missing from every scope layer, an
//! expression that fails to parse or evaluate, and a store path that cannot
//! be observed or traversed. All of them propagate synchronously out of the
//! triggering `update()`/`evaluate()` call; nothing in the core swallows
//! them. The default refresh policy is abort-pass: the first failing binding
//! ends the pass.

/// Errors produced by the binding engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An expression referenced a name absent from every scope layer and the
    /// store namespace.
    #[error("unbound name `{name}` in expression `{expression}`")]
    UnboundName { name: String, expression: String },

    /// An expression failed to parse or evaluate for any other reason.
    /// Carries the offending expression text.
    #[error("expression `{expression}` failed: {message}")]
    Expression { expression: String, message: String },

    /// A store path could not be observed or traversed.
    #[error("cannot observe `{path}`: {message}")]
    Observation { path: String, message: String },

    /// Markup text could not be parsed into a view tree.
    #[error("markup error at byte {offset}: {message}")]
    Markup { offset: usize, message: String },
}

impl Error {
    pub(crate) fn expression(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Expression {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub(crate) fn observation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Observation {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_name_message() {
        let err = Error::UnboundName {
            name: "missing".into(),
            expression: "missing + 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing"));
        assert!(msg.contains("missing + 1"));
    }

    #[test]
    fn expression_message_carries_source() {
        let err = Error::expression("a +", "unexpected end of input");
        assert!(err.to_string().contains("a +"));
    }

    #[test]
    fn observation_message_carries_path() {
        let err = Error::observation("user.name", "no such property");
        assert!(err.to_string().contains("user.name"));
    }
}
