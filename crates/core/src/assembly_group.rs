//! Assembly group selection rules.
//!
//! A group bundles assemblies under a [`GroupType`]. Within a group each item
//! is identified by its assembly id (the pair is unique), so `conflicts_with`
//! entries and selections are both expressed as assembly ids.
//!
//! Two layers of checks live here:
//!
//! - [`validate_group_items`] guards the shape of a group on create/update.
//! - [`validate_selection`] evaluates a candidate selection against the
//!   group's policy. Selections are never persisted; callers evaluate them
//!   before acting on them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::define_str_enum;
use crate::error::CoreError;
use crate::types::DbId;

define_str_enum! {
    /// Selection policy declared by an assembly group.
    GroupType("group type") {
        Required = "REQUIRED",
        ChooseOne = "CHOOSE_ONE",
        Optional = "OPTIONAL",
        Conflict = "CONFLICT",
    }
}

/// Minimum quantity of an assembly within a group.
pub const MIN_ITEM_QUANTITY: i32 = 1;

/// The parts of a group item the rules care about.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupItemSpec {
    pub assembly_id: DbId,
    pub quantity: i32,
    pub is_default: bool,
    pub conflicts_with: Vec<DbId>,
}

/// Reject quantities below [`MIN_ITEM_QUANTITY`].
pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity < MIN_ITEM_QUANTITY {
        return Err(CoreError::Validation(format!(
            "quantity must be at least {MIN_ITEM_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Structural checks for a group's item list.
///
/// - every quantity is at least 1
/// - an assembly appears at most once
/// - `conflicts_with` only names sibling assemblies, never the item itself
/// - a CHOOSE_ONE group has at most one default item
pub fn validate_group_items(group_type: GroupType, items: &[GroupItemSpec]) -> Result<(), CoreError> {
    let mut seen = BTreeSet::new();
    for item in items {
        validate_quantity(item.quantity)?;
        if !seen.insert(item.assembly_id) {
            return Err(CoreError::Validation(format!(
                "assembly {} appears more than once in the group",
                item.assembly_id
            )));
        }
    }

    for item in items {
        for other in &item.conflicts_with {
            if *other == item.assembly_id {
                return Err(CoreError::Validation(format!(
                    "assembly {} cannot conflict with itself",
                    item.assembly_id
                )));
            }
            if !seen.contains(other) {
                return Err(CoreError::Validation(format!(
                    "assembly {} conflicts with {other}, which is not in the group",
                    item.assembly_id
                )));
            }
        }
    }

    if group_type == GroupType::ChooseOne {
        let defaults = items.iter().filter(|i| i.is_default).count();
        if defaults > 1 {
            return Err(CoreError::Validation(format!(
                "a CHOOSE_ONE group can have at most one default item, got {defaults}"
            )));
        }
    }

    Ok(())
}

/// Selection policy with the data each variant needs to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionPolicy {
    Required,
    ChooseOne { default: Option<DbId> },
    Optional,
    /// Normalised `(low, high)` pairs that may not be chosen together.
    Conflict { pairs: BTreeSet<(DbId, DbId)> },
}

/// A group reduced to what selection evaluation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRule {
    pub members: BTreeSet<DbId>,
    pub defaults: Vec<DbId>,
    pub policy: SelectionPolicy,
}

impl GroupRule {
    pub fn from_items(group_type: GroupType, items: &[GroupItemSpec]) -> Self {
        let members: BTreeSet<DbId> = items.iter().map(|i| i.assembly_id).collect();
        let defaults: Vec<DbId> = items
            .iter()
            .filter(|i| i.is_default)
            .map(|i| i.assembly_id)
            .collect();

        let policy = match group_type {
            GroupType::Required => SelectionPolicy::Required,
            GroupType::ChooseOne => SelectionPolicy::ChooseOne {
                default: defaults.first().copied(),
            },
            GroupType::Optional => SelectionPolicy::Optional,
            GroupType::Conflict => {
                // A conflict declared on either side counts for both.
                let pairs = items
                    .iter()
                    .flat_map(|i| {
                        i.conflicts_with
                            .iter()
                            .map(move |&o| (i.assembly_id.min(o), i.assembly_id.max(o)))
                    })
                    .collect();
                SelectionPolicy::Conflict { pairs }
            }
        };

        Self {
            members,
            defaults,
            policy,
        }
    }
}

/// Why a selection was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionViolation {
    #[error("assemblies {ids:?} are not part of this group")]
    UnknownItems { ids: Vec<DbId> },

    #[error("every item of a REQUIRED group must be selected; missing {ids:?}")]
    MissingRequired { ids: Vec<DbId> },

    #[error("exactly one item of a CHOOSE_ONE group must be selected, got {chosen}")]
    WrongChoiceCount { chosen: usize },

    #[error("assemblies {first} and {second} conflict and cannot be selected together")]
    ConflictingItems { first: DbId, second: DbId },
}

/// Evaluate `chosen` (assembly ids, duplicates ignored) against a group.
pub fn validate_selection(rule: &GroupRule, chosen: &[DbId]) -> Result<(), SelectionViolation> {
    let chosen: BTreeSet<DbId> = chosen.iter().copied().collect();

    let unknown: Vec<DbId> = chosen.difference(&rule.members).copied().collect();
    if !unknown.is_empty() {
        return Err(SelectionViolation::UnknownItems { ids: unknown });
    }

    match &rule.policy {
        SelectionPolicy::Required => {
            let missing: Vec<DbId> = rule.members.difference(&chosen).copied().collect();
            if !missing.is_empty() {
                return Err(SelectionViolation::MissingRequired { ids: missing });
            }
        }
        SelectionPolicy::ChooseOne { .. } => {
            if chosen.len() != 1 {
                return Err(SelectionViolation::WrongChoiceCount {
                    chosen: chosen.len(),
                });
            }
        }
        SelectionPolicy::Optional => {}
        SelectionPolicy::Conflict { pairs } => {
            if let Some(&(first, second)) = pairs
                .iter()
                .find(|(a, b)| chosen.contains(a) && chosen.contains(b))
            {
                return Err(SelectionViolation::ConflictingItems { first, second });
            }
        }
    }

    Ok(())
}

/// The selection a group starts from before the user changes anything.
///
/// REQUIRED groups select everything, CHOOSE_ONE selects its default (if
/// any), and the other policies select the items flagged `is_default`.
pub fn default_selection(rule: &GroupRule) -> Vec<DbId> {
    match &rule.policy {
        SelectionPolicy::Required => rule.members.iter().copied().collect(),
        SelectionPolicy::ChooseOne { default } => default.iter().copied().collect(),
        SelectionPolicy::Optional | SelectionPolicy::Conflict { .. } => rule.defaults.clone(),
    }
}

/// Total price of a selection given `(unit_price, quantity)` per chosen item.
pub fn selection_total(lines: &[(f64, i32)]) -> f64 {
    lines.iter().map(|(price, qty)| price * *qty as f64).sum()
}
