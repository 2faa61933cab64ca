//! Ordered chains of alternative alert mechanisms.
//!
//! A chain is a declarative list of `(name, invoke)` pairs. Evaluation is
//! strictly in order and stops at the first mechanism that succeeds, so a
//! new player or notifier is added by pushing one more entry.

use tracing::debug;

use super::error::AlertError;
use crate::types::FailedAttempt;

type Invoke<'a, I> = Box<dyn Fn(&I) -> Result<(), AlertError> + 'a>;

/// One concrete way of performing an alert.
pub struct Mechanism<'a, I: ?Sized> {
    name: String,
    invoke: Invoke<'a, I>,
}

impl<'a, I: ?Sized> Mechanism<'a, I> {
    /// Creates a named mechanism from an invoke function.
    pub fn new(
        name: impl Into<String>,
        invoke: impl Fn(&I) -> Result<(), AlertError> + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            invoke: Box::new(invoke),
        }
    }

    /// Returns the mechanism name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the mechanism once.
    pub fn invoke(&self, input: &I) -> Result<(), AlertError> {
        (self.invoke)(input)
    }
}

impl<I: ?Sized> std::fmt::Debug for Mechanism<'_, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mechanism")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Result of running a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainRun {
    /// Name of the mechanism that succeeded, if any
    pub succeeded: Option<String>,
    /// Mechanisms that failed before it (or all of them), in order
    pub failures: Vec<FailedAttempt>,
}

/// An ordered list of mechanisms for one kind of alert.
#[derive(Debug)]
pub struct MechanismChain<'a, I: ?Sized> {
    mechanisms: Vec<Mechanism<'a, I>>,
}

impl<'a, I: ?Sized> Default for MechanismChain<'a, I> {
    fn default() -> Self {
        Self {
            mechanisms: Vec::new(),
        }
    }
}

impl<'a, I: ?Sized> MechanismChain<'a, I> {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mechanism to the end of the chain.
    #[must_use]
    pub fn with(mut self, mechanism: Mechanism<'a, I>) -> Self {
        self.mechanisms.push(mechanism);
        self
    }

    /// Appends a mechanism built from a name and invoke function.
    #[must_use]
    pub fn with_fn(
        self,
        name: impl Into<String>,
        invoke: impl Fn(&I) -> Result<(), AlertError> + 'a,
    ) -> Self {
        self.with(Mechanism::new(name, invoke))
    }

    /// Appends a mechanism in place.
    pub fn push(&mut self, mechanism: Mechanism<'a, I>) {
        self.mechanisms.push(mechanism);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mechanisms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mechanisms.is_empty()
    }

    /// Returns mechanism names in evaluation order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.mechanisms.iter().map(Mechanism::name).collect()
    }

    /// Runs the chain until one mechanism succeeds.
    pub fn run(&self, input: &I) -> ChainRun {
        let mut failures = Vec::new();

        for mechanism in &self.mechanisms {
            debug!("Trying mechanism: {}", mechanism.name());
            match mechanism.invoke(input) {
                Ok(()) => {
                    debug!("Mechanism '{}' succeeded", mechanism.name());
                    return ChainRun {
                        succeeded: Some(mechanism.name().to_string()),
                        failures,
                    };
                }
                Err(e) => {
                    debug!("Mechanism '{}' failed: {}", mechanism.name(), e);
                    failures.push(FailedAttempt {
                        mechanism: mechanism.name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        ChainRun {
            succeeded: None,
            failures,
        }
    }
}
