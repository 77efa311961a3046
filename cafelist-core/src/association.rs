//! Category-association consistency rules
//!
//! A café carries exactly one "best" category and zero or more
//! "also good for" categories. Every name must resolve against the
//! canonical category table, and the best category may not be repeated
//! in the also-good-for set.

use std::collections::HashMap;

use thiserror::Error;

/// Error raised while planning a café's category associations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssociationError {
    /// One or more names do not exist in the category table.
    /// Names are sorted so the message is deterministic.
    #[error("categories do not exist: {}", .0.join(", "))]
    UnknownCategories(Vec<String>),

    /// The best category also appears in the also-good-for set
    #[error("category '{0}' is listed as both best_for and also_good_for")]
    DuplicateBest(String),
}

/// Resolved category ids for a café's association set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationPlan {
    /// Category flagged `is_best = true`
    pub best_id: i64,
    /// Categories flagged `is_best = false`, in request order
    pub also_ids: Vec<i64>,
}

/// Validate a proposed best/also-good-for pairing and resolve ids.
///
/// `known` maps category names to their ids (the canonical category
/// table, or the subset covering the requested names). Missing names
/// are collected and reported together. Repeated names inside
/// `also_good_for` collapse to a single association, keeping the
/// first occurrence's position.
pub fn plan_associations(
    best_for: &str,
    also_good_for: &[String],
    known: &HashMap<String, i64>,
) -> Result<AssociationPlan, AssociationError> {
    let mut missing: Vec<String> = Vec::new();

    if !known.contains_key(best_for) {
        missing.push(best_for.to_owned());
    }
    for name in also_good_for {
        if !known.contains_key(name.as_str()) && !missing.contains(name) {
            missing.push(name.clone());
        }
    }
    if !missing.is_empty() {
        missing.sort();
        return Err(AssociationError::UnknownCategories(missing));
    }

    if also_good_for.iter().any(|name| name == best_for) {
        return Err(AssociationError::DuplicateBest(best_for.to_owned()));
    }

    let best_id = known[best_for];
    let mut also_ids = Vec::with_capacity(also_good_for.len());
    for name in also_good_for {
        let id = known[name.as_str()];
        if !also_ids.contains(&id) {
            also_ids.push(id);
        }
    }

    Ok(AssociationPlan { best_id, also_ids })
}
