//! Structural matching of one symbolic reference against one API surface.
//!
//! A method matches when name, parameter types and return type are identical and the
//! modifiers are compatible. Methods and fields are searched through the owner's
//! supertypes; the most-derived declaration wins.

use crate::model::{Manifestation, Member, Modifiers, Ownership, SymbolicReference, Visibility};
use crate::surface::{ApiSurface, ClassDescriptor};
use muzzle_types::ReferenceStatus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceCheck {
    pub status: ReferenceStatus,
    /// Human-readable reason for `Missing` and `ShapeMismatch`.
    pub detail: Option<String>,
}

impl ReferenceCheck {
    fn present() -> Self {
        Self {
            status: ReferenceStatus::Present,
            detail: None,
        }
    }

    fn missing(detail: String) -> Self {
        Self {
            status: ReferenceStatus::Missing,
            detail: Some(detail),
        }
    }

    fn mismatch(problems: Vec<String>) -> Self {
        Self {
            status: ReferenceStatus::ShapeMismatch,
            detail: Some(problems.join("; ")),
        }
    }

    pub fn is_present(&self) -> bool {
        self.status == ReferenceStatus::Present
    }
}

pub fn check_reference(surface: &ApiSurface, reference: &SymbolicReference) -> ReferenceCheck {
    let Some(owner) = surface.class(&reference.owner) else {
        return ReferenceCheck::missing(format!("class {} not found", reference.owner));
    };

    match &reference.member {
        Member::Class => check_class(owner, &reference.modifiers),
        Member::Method {
            name,
            params,
            returns,
        } => check_method(surface, reference, name, params, returns),
        Member::Field { name, field_type } => {
            check_field(surface, reference, name, field_type)
        }
    }
}

fn check_class(class: &ClassDescriptor, required: &Modifiers) -> ReferenceCheck {
    let mut problems = Vec::new();
    visibility_problem(class.visibility, required.visibility, &mut problems);
    match required.manifestation {
        Some(Manifestation::Interface) if !class.interface => {
            problems.push("expected an interface, found a class".to_string())
        }
        Some(Manifestation::NonInterface) if class.interface => {
            problems.push("expected a class, found an interface".to_string())
        }
        Some(Manifestation::Final) if !class.is_final => {
            problems.push("expected a final class".to_string())
        }
        Some(Manifestation::NonFinal) if class.is_final => {
            problems.push("class is final".to_string())
        }
        _ => {}
    }

    if problems.is_empty() {
        ReferenceCheck::present()
    } else {
        ReferenceCheck::mismatch(problems)
    }
}

fn check_method(
    surface: &ApiSurface,
    reference: &SymbolicReference,
    name: &str,
    params: &[String],
    returns: &str,
) -> ReferenceCheck {
    let candidates: Vec<_> = surface
        .hierarchy(&reference.owner)
        .into_iter()
        .flat_map(|class| class.methods.iter())
        .filter(|m| m.name == name)
        .collect();

    if candidates.is_empty() {
        return ReferenceCheck::missing(format!(
            "method {}#{} not found",
            reference.owner, name
        ));
    }

    let Some(method) = candidates
        .iter()
        .find(|m| m.params == params && m.returns == returns)
    else {
        let found: Vec<String> = candidates
            .iter()
            .map(|m| format!("({}):{}", m.params.join(","), m.returns))
            .collect();
        return ReferenceCheck::mismatch(vec![format!(
            "no overload ({}):{}; found {}",
            params.join(","),
            returns,
            found.join(", ")
        )]);
    };

    let mut problems = Vec::new();
    visibility_problem(method.visibility, reference.modifiers.visibility, &mut problems);
    ownership_problem(method.is_static, reference.modifiers.ownership, &mut problems);
    finality_problem(method.is_final, reference.modifiers.manifestation, &mut problems);

    if problems.is_empty() {
        ReferenceCheck::present()
    } else {
        ReferenceCheck::mismatch(problems)
    }
}

fn check_field(
    surface: &ApiSurface,
    reference: &SymbolicReference,
    name: &str,
    field_type: &str,
) -> ReferenceCheck {
    let Some(field) = surface
        .hierarchy(&reference.owner)
        .into_iter()
        .flat_map(|class| class.fields.iter())
        .find(|f| f.name == name)
    else {
        return ReferenceCheck::missing(format!("field {}#{} not found", reference.owner, name));
    };

    let mut problems = Vec::new();
    if field.field_type != field_type {
        problems.push(format!(
            "expected type {}, found {}",
            field_type, field.field_type
        ));
    }
    visibility_problem(field.visibility, reference.modifiers.visibility, &mut problems);
    ownership_problem(field.is_static, reference.modifiers.ownership, &mut problems);
    finality_problem(field.is_final, reference.modifiers.manifestation, &mut problems);

    if problems.is_empty() {
        ReferenceCheck::present()
    } else {
        ReferenceCheck::mismatch(problems)
    }
}

fn visibility_problem(actual: Visibility, required: Visibility, out: &mut Vec<String>) {
    if actual < required {
        out.push(format!("expected {required} or wider, found {actual}"));
    }
}

fn ownership_problem(is_static: bool, required: Option<Ownership>, out: &mut Vec<String>) {
    match required {
        Some(Ownership::Static) if !is_static => out.push("expected static, found instance".to_string()),
        Some(Ownership::Instance) if is_static => out.push("expected instance, found static".to_string()),
        _ => {}
    }
}

// Interface/NonInterface only constrain classes.
fn finality_problem(is_final: bool, required: Option<Manifestation>, out: &mut Vec<String>) {
    match required {
        Some(Manifestation::Final) if !is_final => out.push("expected final".to_string()),
        Some(Manifestation::NonFinal) if is_final => out.push("member is final".to_string()),
        _ => {}
    }
}
