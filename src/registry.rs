//! Builtin module registry
//!
//! Maps every module name the bundler must leave external to the exports it
//! is presumed to provide. The registry has two tiers:
//!
//! - the *base* tier, built once from the scanned package names plus a fixed
//!   set of third-party aliases
//! - the *service* tier, the base tier plus the host UI runtime, derived
//!   lazily on the first service build and shared by every later one
//!
//! Both tiers are immutable once built, so concurrent builds read them freely.

use crate::scanner::PackageDescriptor;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Third-party modules every bundle expects the host to provide
pub const THIRD_PARTY_ALIASES: &[&str] = &["mobx", "redux"];

/// The host UI runtime, external only for service builds
pub const HOST_RUNTIME_MODULE: &str = "rax";

/// What a builtin module is presumed to export
///
/// Serialises as a bare string for self-mapped package names and as a list
/// for aliases with known export names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModuleExports {
    SelfNamed(String),
    Names(Vec<String>),
}

impl ModuleExports {
    pub fn contains(&self, name: &str) -> bool {
        match self {
            ModuleExports::SelfNamed(own) => own == name,
            ModuleExports::Names(names) => names.iter().any(|n| n == name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuiltinRegistry {
    modules: BTreeMap<String, ModuleExports>,
}

impl BuiltinRegistry {
    /// Builds the base tier
    ///
    /// Every descriptor name maps to itself, then the third-party aliases are
    /// overlaid and win on collision. Never fails.
    pub fn build(descriptors: &[PackageDescriptor]) -> Self {
        let mut modules = BTreeMap::new();
        for descriptor in descriptors {
            modules.insert(
                descriptor.name.clone(),
                ModuleExports::SelfNamed(descriptor.name.clone()),
            );
        }
        for alias in THIRD_PARTY_ALIASES {
            modules.insert(
                alias.to_string(),
                ModuleExports::Names(vec![alias.to_string()]),
            );
        }
        Self { modules }
    }

    /// A copy of this registry with one more self-mapped entry
    pub fn with_module(&self, name: &str) -> Self {
        let mut modules = self.modules.clone();
        modules.insert(name.to_string(), ModuleExports::SelfNamed(name.to_string()));
        Self { modules }
    }

    /// Whether a module reference resolves at runtime instead of being bundled
    pub fn is_external(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ModuleExports> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

/// The two registry tiers of a single run
#[derive(Debug)]
pub struct RegistryTiers {
    base: Arc<BuiltinRegistry>,
    service: OnceLock<Arc<BuiltinRegistry>>,
}

impl RegistryTiers {
    pub fn new(base: BuiltinRegistry) -> Self {
        Self {
            base: Arc::new(base),
            service: OnceLock::new(),
        }
    }

    pub fn from_descriptors(descriptors: &[PackageDescriptor]) -> Self {
        Self::new(BuiltinRegistry::build(descriptors))
    }

    pub fn base(&self) -> Arc<BuiltinRegistry> {
        Arc::clone(&self.base)
    }

    /// The base tier plus the host runtime, computed on first call
    pub fn service(&self) -> Arc<BuiltinRegistry> {
        Arc::clone(
            self.service
                .get_or_init(|| Arc::new(self.base.with_module(HOST_RUNTIME_MODULE))),
        )
    }
}
