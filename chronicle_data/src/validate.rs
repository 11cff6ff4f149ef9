use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::*;

/// Validation error for broken references or invariants in a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingReference { kind: &'static str, id: String, context: String },
    PrerequisiteCycle { quests: Vec<Id> },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::PrerequisiteCycle { quests } => {
                write!(f, "prerequisite cycle: {}", quests.join(" -> "))
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a catalog.
///
/// ```
/// use chronicle_data::{Catalog, Prerequisite, QuestDef, validate_catalog};
///
/// let mut catalog = Catalog::default();
/// catalog.quests.insert(
///     "second".into(),
///     QuestDef {
///         id: "second".into(),
///         title: "Second".into(),
///         description: "Needs the first.".into(),
///         reward_xp: 10,
///         reward_gold: 5,
///         required_level: 1,
///         prerequisite: Prerequisite::Quest("first".into()),
///     },
/// );
/// assert_eq!(validate_catalog(&catalog).len(), 1);
/// ```
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (key, quest) in &catalog.quests {
        if key != &quest.id {
            errors.push(ValidationError::InvalidValue {
                context: format!("quest keyed '{key}' has id '{}'", quest.id),
            });
        }
        if quest.required_level == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("quest '{key}' requires level 0"),
            });
        }
        if let Some(prereq) = quest.prerequisite.quest_id()
            && !catalog.quests.contains_key(prereq)
        {
            errors.push(ValidationError::MissingReference {
                kind: "quest",
                id: prereq.to_string(),
                context: format!("prerequisite of quest '{key}'"),
            });
        }
    }
    errors.extend(find_cycles(&catalog.quests));

    for (key, item) in &catalog.items {
        if key != &item.id {
            errors.push(ValidationError::InvalidValue {
                context: format!("item keyed '{key}' has id '{}'", item.id),
            });
        }
    }

    errors
}

/// Find every prerequisite cycle, each reported once starting from its smallest id.
fn find_cycles(quests: &QuestCatalog) -> Vec<ValidationError> {
    let mut reported: HashSet<Vec<Id>> = HashSet::new();
    let mut errors = Vec::new();
    for start in quests.keys() {
        let mut path: Vec<Id> = Vec::new();
        let mut seen = BTreeSet::new();
        let mut current = Some(start.as_str());
        while let Some(id) = current {
            if !seen.insert(id) {
                let pos = path.iter().position(|p| p == id).unwrap_or(0);
                let mut cycle = path[pos..].to_vec();
                if let Some(min_pos) = cycle
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.cmp(b.1))
                    .map(|(idx, _)| idx)
                {
                    cycle.rotate_left(min_pos);
                }
                if reported.insert(cycle.clone()) {
                    errors.push(ValidationError::PrerequisiteCycle { quests: cycle });
                }
                break;
            }
            path.push(id.to_string());
            current = quests.get(id).and_then(|q| q.prerequisite.quest_id());
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str, prereq: Option<&str>) -> QuestDef {
        QuestDef {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            reward_xp: 10,
            reward_gold: 5,
            required_level: 1,
            prerequisite: prereq.map_or(Prerequisite::None, |p| Prerequisite::Quest(p.into())),
        }
    }

    fn catalog(quests: Vec<QuestDef>) -> Catalog {
        Catalog {
            quests: quests.into_iter().map(|q| (q.id.clone(), q)).collect(),
            items: ItemCatalog::new(),
        }
    }

    #[test]
    fn valid_chain_has_no_errors() {
        let cat = catalog(vec![quest("a", None), quest("b", Some("a")), quest("c", Some("b"))]);
        assert!(validate_catalog(&cat).is_empty());
    }

    #[test]
    fn missing_prerequisites_are_reported() {
        let cat = catalog(vec![quest("a", Some("ghost"))]);
        let errors = validate_catalog(&cat);
        assert_eq!(
            errors,
            vec![ValidationError::MissingReference {
                kind: "quest",
                id: "ghost".into(),
                context: "prerequisite of quest 'a'".into(),
            }]
        );
    }

    #[test]
    fn cycles_are_reported_once() {
        let cat = catalog(vec![
            quest("x", Some("z")),
            quest("y", Some("x")),
            quest("z", Some("y")),
            quest("tail", Some("x")),
        ]);
        let errors = validate_catalog(&cat);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::PrerequisiteCycle { quests } => {
                assert_eq!(quests, &vec!["x".to_string(), "z".to_string(), "y".to_string()]);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn self_prerequisite_is_a_cycle() {
        let cat = catalog(vec![quest("loop", Some("loop"))]);
        assert!(matches!(
            validate_catalog(&cat).as_slice(),
            [ValidationError::PrerequisiteCycle { quests }] if quests == &vec!["loop".to_string()]
        ));
    }
}
