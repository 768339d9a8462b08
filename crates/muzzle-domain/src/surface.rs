//! Parsed public API surface of one artifact version.
//!
//! Surfaces are loaded from serialized descriptors (see `muzzle-registry`); nothing here
//! inspects bytecode or class files.

use crate::model::Visibility;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "void")]
    pub returns: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub interface: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            interface: false,
            is_final: false,
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }
}

fn void() -> String {
    "void".to_string()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SurfaceDescriptor {
    #[serde(default)]
    classes: Vec<ClassDescriptor>,
}

/// Classes of one artifact version, indexed by fully-qualified name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SurfaceDescriptor", into = "SurfaceDescriptor")]
pub struct ApiSurface {
    classes: BTreeMap<String, ClassDescriptor>,
}

impl From<SurfaceDescriptor> for ApiSurface {
    fn from(value: SurfaceDescriptor) -> Self {
        ApiSurface::new(value.classes)
    }
}

impl From<ApiSurface> for SurfaceDescriptor {
    fn from(value: ApiSurface) -> Self {
        SurfaceDescriptor {
            classes: value.classes.into_values().collect(),
        }
    }
}

impl ApiSurface {
    /// Later descriptors with the same name replace earlier ones.
    pub fn new(classes: impl IntoIterator<Item = ClassDescriptor>) -> Self {
        Self {
            classes: classes.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// `owner` followed by its supertypes known to this surface, breadth-first:
    /// superclass chain before interfaces at each level. Cycles are cut.
    pub fn hierarchy<'a>(&'a self, owner: &str) -> Vec<&'a ClassDescriptor> {
        let mut out = Vec::new();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        let Some(start) = self.class(owner) else {
            return out;
        };
        queue.push_back(start.name.as_str());

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name) {
                continue;
            }
            let Some(class) = self.class(name) else {
                continue;
            };
            out.push(class);
            if let Some(parent) = class.super_class.as_deref() {
                queue.push_back(parent);
            }
            for iface in &class.interfaces {
                queue.push_back(iface.as_str());
            }
        }

        out
    }
}
