use crate::version::ArtifactVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `group:module:version` of one published artifact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactCoordinate {
    group: String,
    module: String,
    version: ArtifactVersion,
}

impl ArtifactCoordinate {
    pub fn new(group: impl Into<String>, module: impl Into<String>, version: ArtifactVersion) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn version(&self) -> &ArtifactVersion {
        &self.version
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

/// Declared visibility. Variant order is "less visible" to "more visible".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    Package,
    Protected,
    #[default]
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Private => "private",
            Visibility::Package => "package",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    Static,
    Instance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Manifestation {
    Final,
    NonFinal,
    Interface,
    NonInterface,
}

/// Modifiers the advice relies on. `visibility` is a minimum; the others are exact when set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub ownership: Option<Ownership>,
    pub manifestation: Option<Manifestation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Class,
    Method,
    Field,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Class => "class",
            ReferenceKind::Method => "method",
            ReferenceKind::Field => "field",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Member {
    Class,
    Method {
        name: String,
        params: Vec<String>,
        returns: String,
    },
    Field {
        name: String,
        field_type: String,
    },
}

/// A named pointer to a class, method or field that the advice touches.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolicReference {
    pub owner: String,
    pub member: Member,
    pub modifiers: Modifiers,
}

impl SymbolicReference {
    pub fn class(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: Member::Class,
            modifiers: Modifiers::default(),
        }
    }

    pub fn method<P, S>(
        owner: impl Into<String>,
        name: impl Into<String>,
        params: P,
        returns: impl Into<String>,
    ) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            owner: owner.into(),
            member: Member::Method {
                name: name.into(),
                params: params.into_iter().map(Into::into).collect(),
                returns: returns.into(),
            },
            modifiers: Modifiers::default(),
        }
    }

    pub fn field(
        owner: impl Into<String>,
        name: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            member: Member::Field {
                name: name.into(),
                field_type: field_type.into(),
            },
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn kind(&self) -> ReferenceKind {
        match self.member {
            Member::Class => ReferenceKind::Class,
            Member::Method { .. } => ReferenceKind::Method,
            Member::Field { .. } => ReferenceKind::Field,
        }
    }
}

/// `Owner`, `Owner#name(A,B):R` or `Owner#name:T`.
impl fmt::Display for SymbolicReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Member::Class => f.write_str(&self.owner),
            Member::Method {
                name,
                params,
                returns,
            } => write!(f, "{}#{}({}):{}", self.owner, name, params.join(","), returns),
            Member::Field { name, field_type } => {
                write!(f, "{}#{}:{}", self.owner, name, field_type)
            }
        }
    }
}

/// The set of references an advice touches. Duplicates are dropped, first occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Advice {
    references: Vec<SymbolicReference>,
}

impl Advice {
    pub fn new(references: impl IntoIterator<Item = SymbolicReference>) -> Self {
        references.into_iter().collect()
    }

    pub fn references(&self) -> &[SymbolicReference] {
        &self.references
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }
}

impl FromIterator<SymbolicReference> for Advice {
    fn from_iter<T: IntoIterator<Item = SymbolicReference>>(iter: T) -> Self {
        let mut references: Vec<SymbolicReference> = Vec::new();
        for r in iter {
            if !references.contains(&r) {
                references.push(r);
            }
        }
        Self { references }
    }
}
