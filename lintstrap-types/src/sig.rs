use crate::fact::FactValue;

/// A recursive type signature describing the shape a fact value may take.
///
/// Signatures are either a scalar type, a fixed set of allowed string
/// literals, a homogeneous list of a nested signature, one of several
/// alternatives, or one of the two structured payload shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSig {
    Str,
    Int,
    Bool,
    /// Only the listed string literals are admitted.
    OneOf(Vec<String>),
    /// A list whose every element admits the nested signature.
    ListOf(Box<TypeSig>),
    /// Any of the alternatives admits the value.
    AnyOf(Vec<TypeSig>),
    /// A dependency record (name, optional version constraint, optional URL).
    Dependency,
    /// A lint-task record (task name, path globs, config map).
    LintTask,
}

impl TypeSig {
    /// Convenience constructor for a fixed literal set.
    pub fn one_of(allowed: &[&str]) -> Self {
        TypeSig::OneOf(allowed.iter().map(|s| s.to_string()).collect())
    }

    /// Structural check of `value` against the signature.
    pub fn admits(&self, value: &FactValue) -> bool {
        match (self, value) {
            (TypeSig::Str, FactValue::Str(_)) => true,
            (TypeSig::Int, FactValue::Int(_)) => true,
            (TypeSig::Bool, FactValue::Bool(_)) => true,
            (TypeSig::OneOf(allowed), FactValue::Str(s)) => allowed.iter().any(|a| a == s),
            (TypeSig::ListOf(inner), FactValue::List(items)) => items
                .iter()
                .all(|item| inner.admits(&FactValue::Str(item.clone()))),
            (TypeSig::AnyOf(alts), v) => alts.iter().any(|alt| alt.admits(v)),
            (TypeSig::Dependency, FactValue::Dependency { .. }) => true,
            (TypeSig::LintTask, FactValue::LintTask { .. }) => true,
            _ => false,
        }
    }

    /// Whether a raw operator-entered string parses under this signature.
    ///
    /// Booleans are not parsed here; the prompt layer owns the truthy and
    /// falsy token vocabulary.
    pub fn admits_text(&self, text: &str) -> bool {
        match self {
            TypeSig::Str => true,
            TypeSig::Int => text.trim().parse::<i64>().is_ok(),
            TypeSig::Bool => false,
            TypeSig::OneOf(allowed) => allowed.iter().any(|a| a == text.trim()),
            TypeSig::ListOf(inner) => text.split(',').all(|part| inner.admits_text(part.trim())),
            TypeSig::AnyOf(alts) => alts.iter().any(|alt| alt.admits_text(text)),
            TypeSig::Dependency | TypeSig::LintTask => false,
        }
    }

    /// Human-readable name used in prompts and error messages.
    pub fn describe(&self) -> String {
        match self {
            TypeSig::Str => "string".to_string(),
            TypeSig::Int => "integer".to_string(),
            TypeSig::Bool => "boolean".to_string(),
            TypeSig::OneOf(allowed) => format!("one of {}", allowed.join(", ")),
            TypeSig::ListOf(inner) => format!("list of {}", inner.describe()),
            TypeSig::AnyOf(alts) => alts
                .iter()
                .map(TypeSig::describe)
                .collect::<Vec<_>>()
                .join(" or "),
            TypeSig::Dependency => "dependency record".to_string(),
            TypeSig::LintTask => "lint-task record".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_signatures_admit_matching_values() {
        assert!(TypeSig::Str.admits(&FactValue::Str("space".into())));
        assert!(TypeSig::Int.admits(&FactValue::Int(4)));
        assert!(TypeSig::Bool.admits(&FactValue::Bool(true)));
        assert!(!TypeSig::Int.admits(&FactValue::Str("4".into())));
    }

    #[test]
    fn one_of_restricts_to_listed_literals() {
        let sig = TypeSig::one_of(&["tab", "space"]);
        assert!(sig.admits(&FactValue::Str("tab".into())));
        assert!(!sig.admits(&FactValue::Str("both".into())));
    }

    #[test]
    fn list_of_checks_every_element() {
        let sig = TypeSig::ListOf(Box::new(TypeSig::one_of(&["a", "b"])));
        assert!(sig.admits(&FactValue::List(vec!["a".into(), "b".into()])));
        assert!(!sig.admits(&FactValue::List(vec!["a".into(), "c".into()])));
    }

    #[test]
    fn any_of_tries_alternatives() {
        let sig = TypeSig::AnyOf(vec![TypeSig::Str, TypeSig::ListOf(Box::new(TypeSig::Str))]);
        assert!(sig.admits(&FactValue::Str("./man/doc.1".into())));
        assert!(sig.admits(&FactValue::List(vec!["./man/foo.1".into()])));
        assert!(!sig.admits(&FactValue::Int(1)));
    }

    #[test]
    fn text_admission_follows_the_signature() {
        assert!(TypeSig::Int.admits_text("42"));
        assert!(!TypeSig::Int.admits_text("forty-two"));
        assert!(TypeSig::one_of(&["tab", "space"]).admits_text(" space "));
        assert!(TypeSig::ListOf(Box::new(TypeSig::Int)).admits_text("1, 2, 3"));
        assert!(!TypeSig::ListOf(Box::new(TypeSig::Int)).admits_text("1, two"));
    }
}
