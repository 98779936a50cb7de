//! # Module Registry
//!
//! Identity-to-membership table deciding who may append to a guard's queue.
//! No module types, no dispatch: a caller is either in the set or not.

use indexmap::IndexSet;
use shared_types::entities::Address;

use super::errors::DelayError;

/// Set of modules enabled on one guard, in enable order.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: IndexSet<Address>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `module`.
    ///
    /// # Errors
    /// - `InvalidModule`: null or sentinel identity
    /// - `ModuleAlreadyEnabled`: already a member (membership unchanged)
    pub fn enable(&mut self, module: Address) -> Result<(), DelayError> {
        if module.is_zero() || module.is_sentinel() {
            return Err(DelayError::InvalidModule { module });
        }
        if !self.modules.insert(module) {
            return Err(DelayError::ModuleAlreadyEnabled { module });
        }
        Ok(())
    }

    /// Removes `module`. Its already-queued slots stay in the queue.
    ///
    /// # Errors
    /// - `ModuleNotEnabled`: not a member
    pub fn disable(&mut self, module: Address) -> Result<(), DelayError> {
        if self.modules.shift_remove(&module) {
            Ok(())
        } else {
            Err(DelayError::ModuleNotEnabled { module })
        }
    }

    /// Membership query.
    #[must_use]
    pub fn is_enabled(&self, module: &Address) -> bool {
        self.modules.contains(module)
    }

    /// Fails with `ModuleNotEnabled` unless `module` is a member.
    pub fn ensure_enabled(&self, module: Address) -> Result<(), DelayError> {
        if self.is_enabled(&module) {
            Ok(())
        } else {
            Err(DelayError::ModuleNotEnabled { module })
        }
    }

    /// Members in enable order.
    #[must_use]
    pub fn modules(&self) -> Vec<Address> {
        self.modules.iter().copied().collect()
    }

    /// Up to `page_size` members following `start` (or from the beginning
    /// when `start` is the sentinel), plus the cursor for the next page.
    #[must_use]
    pub fn paginated(&self, start: Address, page_size: usize) -> (Vec<Address>, Option<Address>) {
        let from = if start.is_sentinel() {
            0
        } else {
            match self.modules.get_index_of(&start) {
                Some(index) => index + 1,
                None => return (Vec::new(), None),
            }
        };
        let page: Vec<Address> = self
            .modules
            .iter()
            .skip(from)
            .take(page_size)
            .copied()
            .collect();
        let next = if from + page.len() < self.modules.len() {
            page.last().copied()
        } else {
            None
        };
        (page, next)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True when no module is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
