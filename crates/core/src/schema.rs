// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider-declared schemas for ephemeral resource types

use crate::addr::ResourceAddr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type constraint of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrType {
    String,
    Number,
    Bool,
    List(Box<AttrType>),
    Map(Box<AttrType>),
    Object(BTreeMap<String, AttrType>),
    /// Any type; decided by the value
    Dynamic,
}

/// One attribute of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub ty: AttrType,
    pub required: bool,
    pub optional: bool,
    /// The provider may decide the value when configuration leaves it null
    pub computed: bool,
    pub sensitive: bool,
    #[serde(default)]
    pub description: String,
}

impl Attribute {
    pub fn required(ty: AttrType) -> Self {
        Self {
            ty,
            required: true,
            optional: false,
            computed: false,
            sensitive: false,
            description: String::new(),
        }
    }

    pub fn optional(ty: AttrType) -> Self {
        Self {
            required: false,
            optional: true,
            ..Self::required(ty)
        }
    }

    /// Decided by the provider alone
    pub fn computed(ty: AttrType) -> Self {
        Self {
            required: false,
            optional: false,
            computed: true,
            ..Self::required(ty)
        }
    }

    /// Set by configuration or, when left null, by the provider
    pub fn optional_computed(ty: AttrType) -> Self {
        Self {
            required: false,
            optional: true,
            computed: true,
            ..Self::required(ty)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Configuration may not set this attribute
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// How a nested block repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NestingMode {
    Single,
    List,
}

/// A nested block type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedBlock {
    pub nesting: NestingMode,
    pub block: Schema,
}

/// Shape of a block: its attributes and nested block types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
    pub blocks: BTreeMap<String, NestedBlock>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    pub fn block(mut self, name: impl Into<String>, nesting: NestingMode, block: Schema) -> Self {
        self.blocks
            .insert(name.into(), NestedBlock { nesting, block });
        self
    }
}

/// Every schema a provider exposes for ephemeral resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub ephemeral_resource_types: BTreeMap<String, Schema>,
}

impl ProviderSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource_type(mut self, type_name: impl Into<String>, schema: Schema) -> Self {
        self.ephemeral_resource_types
            .insert(type_name.into(), schema);
        self
    }

    pub fn schema_for_resource(&self, addr: &ResourceAddr) -> Option<&Schema> {
        self.ephemeral_resource_types.get(&addr.type_name)
    }
}
