// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Addresses for modules, resources, resource instances and providers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static path of a module within the configuration tree
///
/// The root module is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModulePath(pub Vec<String>);

impl ModulePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of a child module call below this one
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut steps = self.0.clone();
        steps.push(name.into());
        Self(steps)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for step in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "module.{}", step)?;
            first = false;
        }
        Ok(())
    }
}

/// An ephemeral resource block, identified by type and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceAddr {
    pub type_name: String,
    pub name: String,
}

impl ResourceAddr {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Provider local name implied by the resource type (`demo_token` → `demo`)
    pub fn implied_provider(&self) -> &str {
        self.type_name
            .split_once('_')
            .map(|(prefix, _)| prefix)
            .unwrap_or(&self.type_name)
    }
}

impl fmt::Display for ResourceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ephemeral.{}.{}", self.type_name, self.name)
    }
}

/// Key distinguishing one instance of a repeated resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstanceKey {
    #[default]
    NoKey,
    Int(u32),
    Str(String),
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceKey::NoKey => Ok(()),
            InstanceKey::Int(i) => write!(f, "[{}]", i),
            InstanceKey::Str(s) => write!(f, "[{:?}]", s),
        }
    }
}

/// A resource block as declared in a particular module, before expansion
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigResource {
    pub module: ModulePath,
    pub resource: ResourceAddr,
}

impl ConfigResource {
    pub fn new(module: ModulePath, resource: ResourceAddr) -> Self {
        Self { module, resource }
    }

    /// Address of one expanded instance of this resource
    pub fn instance(&self, key: InstanceKey) -> ResourceInstanceAddr {
        ResourceInstanceAddr {
            module: self.module.clone(),
            resource: self.resource.clone(),
            key,
        }
    }
}

impl fmt::Display for ConfigResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_root() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.module, self.resource)
        }
    }
}

/// Fully-qualified address of a single resource instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceInstanceAddr {
    pub module: ModulePath,
    pub resource: ResourceAddr,
    pub key: InstanceKey,
}

impl ResourceInstanceAddr {
    pub fn containing_resource(&self) -> ConfigResource {
        ConfigResource {
            module: self.module.clone(),
            resource: self.resource.clone(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.resource.type_name
    }
}

impl fmt::Display for ResourceInstanceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_root() {
            write!(f, "{}{}", self.resource, self.key)
        } else {
            write!(f, "{}.{}{}", self.module, self.resource, self.key)
        }
    }
}

/// Address of a provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderConfigAddr {
    pub module: ModulePath,
    pub local_name: String,
    pub alias: Option<String>,
}

impl ProviderConfigAddr {
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            module: ModulePath::root(),
            local_name: local_name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl fmt::Display for ProviderConfigAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.module.is_root() {
            write!(f, "{}.", self.module)?;
        }
        write!(f, "provider[{:?}]", self.local_name)?;
        if let Some(alias) = &self.alias {
            write!(f, ".{}", alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "addr_tests.rs"]
mod tests;
