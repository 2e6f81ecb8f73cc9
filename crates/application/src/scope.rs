//! Scope tree definition.
//!
//! A `Scope` is a named test context: an optional asynchronous setup step,
//! an ordered list of named checks, and an ordered list of child Scopes.
//! Building the tree registers work; nothing executes until the runner walks
//! it.
//!
//! Variable ownership: a setup step receives a snapshot of the variables
//! captured by its ancestors and returns the variables it captures itself.
//! The runner merges the returned set into the view handed to this Scope's
//! checks and descendants, so only the owning setup ever writes.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use sonda_domain::CheckFailure;

use crate::error::SetupError;

/// Variables captured by setup steps, keyed by name.
pub type Vars = HashMap<String, Value>;

/// Boxed future returned by a setup step.
pub type SetupFuture = Pin<Box<dyn Future<Output = Result<Vars, SetupError>> + Send>>;

type SetupFn = Box<dyn Fn(Vars) -> SetupFuture + Send + Sync>;
type CheckFn = Box<dyn Fn(&Vars) -> Result<(), CheckFailure> + Send + Sync>;

/// A named check registered on a Scope.
pub struct Check {
    description: String,
    run: CheckFn,
}

impl Check {
    /// Returns the check description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Runs the check against the given variables.
    ///
    /// # Errors
    ///
    /// Returns the `CheckFailure` raised by the check closure.
    pub fn run(&self, vars: &Vars) -> Result<(), CheckFailure> {
        (self.run)(vars)
    }
}

// Closures are not Debug; print only the description.
impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A named test context with setup, checks, and children.
pub struct Scope {
    name: String,
    setup: Option<SetupFn>,
    checks: Vec<Check>,
    children: Vec<Scope>,
}

impl Scope {
    /// Creates an empty Scope with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
            checks: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Registers the setup step for this Scope.
    ///
    /// The closure is called at most once per run, after every ancestor setup
    /// has completed and before any check or child of this Scope runs. It
    /// receives a snapshot of the ancestor-captured variables and returns the
    /// variables it captures.
    #[must_use]
    pub fn with_setup<F, Fut>(mut self, setup: F) -> Self
    where
        F: Fn(Vars) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vars, SetupError>> + Send + 'static,
    {
        self.setup = Some(Box::new(move |vars| Box::pin(setup(vars))));
        self
    }

    /// Registers a named check, run in registration order after setup.
    #[must_use]
    pub fn with_check<F>(mut self, description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Vars) -> Result<(), CheckFailure> + Send + Sync + 'static,
    {
        self.checks.push(Check {
            description: description.into(),
            run: Box::new(check),
        });
        self
    }

    /// Registers a child Scope, run after this Scope's checks.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the Scope name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the registered setup step, if any.
    pub(crate) const fn setup(&self) -> Option<&SetupFn> {
        self.setup.as_ref()
    }

    /// Returns the registered checks in order.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Returns the child Scopes in order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("has_setup", &self.setup.is_some())
            .field("checks", &self.checks.len())
            .field("children", &self.children)
            .finish()
    }
}

/// Fetches a captured variable, failing the setup step if it is absent.
///
/// # Errors
///
/// Returns `SetupError::MissingVar` when the variable was never captured.
pub fn require_var<'a>(vars: &'a Vars, name: &str) -> Result<&'a Value, SetupError> {
    vars.get(name)
        .ok_or_else(|| SetupError::MissingVar(name.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_registration_does_not_execute() {
        let scope = Scope::new("outer")
            .with_setup(|_vars| async { Ok(Vars::new()) })
            .with_check("never run here", |_vars| Err(CheckFailure::new("boom")))
            .with_child(Scope::new("inner"));

        assert_eq!(scope.name(), "outer");
        assert_eq!(scope.checks().len(), 1);
        assert_eq!(scope.children().len(), 1);
        assert_eq!(scope.children()[0].name(), "inner");
    }

    #[test]
    fn test_check_order_is_registration_order() {
        let scope = Scope::new("s")
            .with_check("first", |_| Ok(()))
            .with_check("second", |_| Ok(()));

        let names: Vec<_> = scope.checks().iter().map(Check::description).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_require_var() {
        let mut vars = Vars::new();
        vars.insert("user".to_string(), json!({"name": "Alejandro"}));

        assert_eq!(require_var(&vars, "user").unwrap()["name"], "Alejandro");
        assert!(matches!(
            require_var(&vars, "repository"),
            Err(SetupError::MissingVar(name)) if name == "repository"
        ));
    }
}
