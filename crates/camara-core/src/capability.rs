// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability declarations and the gate every public operation passes first.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::BridgeError;
use crate::traits::adapter::BackendAdapter;
use crate::types::Capability;

/// The set of operations a backend adapter implements.
///
/// Declared once when the adapter is constructed and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self(capabilities.into_iter().collect())
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fails with [`BridgeError::CapabilityNotSupported`] unless `capability` is declared.
    pub fn require(&self, backend: &str, capability: Capability) -> Result<(), BridgeError> {
        if self.contains(capability) {
            Ok(())
        } else {
            Err(BridgeError::CapabilityNotSupported {
                backend: backend.to_string(),
                capability,
            })
        }
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Whether `adapter` declares `capability`.
pub fn supports<A: BackendAdapter + ?Sized>(adapter: &A, capability: Capability) -> bool {
    adapter.capabilities().contains(capability)
}

/// Gate for adapter entry points. Must run before any normalization or I/O.
pub fn require_capability<A: BackendAdapter + ?Sized>(
    adapter: &A,
    capability: Capability,
) -> Result<(), BridgeError> {
    adapter.capabilities().require(adapter.name(), capability)
}
