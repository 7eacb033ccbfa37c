//! Optional capabilities resolved once for the whole process.
//!
//! Tree-valued operations depend on the graph container compiled in through
//! the `graph` Cargo feature. Rather than probing for it at every call site,
//! the build's capabilities are captured in [`CAPABILITIES`] and consulted
//! through [`Capabilities::require`].

use std::fmt;

use crate::error::DenaliError;

/// A library capability that may be compiled out of a build.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum Capability {
    /// Graph container used for trees, subtrees and cluster trees.
    Graph,
}

impl Capability {
    /// Returns the stable lowercase name of the capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Graph => "graph",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities available to the running process.
///
/// # Examples
/// ```
/// use denali_core::{CAPABILITIES, Capability};
///
/// assert_eq!(CAPABILITIES.has(Capability::Graph), cfg!(feature = "graph"));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    graph: bool,
}

impl Capabilities {
    /// Resolves the capabilities compiled into this build.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            graph: cfg!(feature = "graph"),
        }
    }

    /// Returns a set with every optional capability disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self { graph: false }
    }

    /// Reports whether `capability` is available.
    #[must_use]
    pub const fn has(self, capability: Capability) -> bool {
        match capability {
            Capability::Graph => self.graph,
        }
    }

    /// Fails with [`DenaliError::MissingDependency`] unless `capability` is
    /// available.
    ///
    /// # Errors
    /// Returns [`DenaliError::MissingDependency`] naming the absent capability.
    ///
    /// # Examples
    /// ```
    /// use denali_core::{Capabilities, Capability, DenaliError};
    ///
    /// let err = Capabilities::none()
    ///     .require(Capability::Graph)
    ///     .expect_err("graph is disabled");
    /// assert!(matches!(err, DenaliError::MissingDependency { .. }));
    /// ```
    pub fn require(self, capability: Capability) -> Result<(), DenaliError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(DenaliError::MissingDependency { capability })
        }
    }
}

/// Capabilities of the current build, resolved at compile time.
pub const CAPABILITIES: Capabilities = Capabilities::detect();
