//! Infeasibility diagnosis.
//!
//! Turns an infeasible-constraint witness into operator-facing sentences,
//! one per constraint, keyed by constraint category. Constraints built by
//! this crate carry their [`ConstraintTag`]; witnesses that only carry
//! names are parsed with [`ConstraintTag::parse`], which recovers `_`
//! inside the leading key only. Anything that cannot be described falls
//! back to `conflicting constraint: <name>`.

use crate::lp::{LpModel, Solution, SolverStatus};
use crate::models::{ConstraintCategory as C, ConstraintTag};

/// Sentence for a tag, or `None` when the tag lacks the keys its
/// category needs.
pub fn describe(tag: &ConstraintTag) -> Option<String> {
    let needed = tag.category.min_keys();
    if tag.keys.len() < needed {
        return None;
    }

    let k = |i: usize| tag.key(i);
    let message = match tag.category {
        C::SourceBalance => format!("Source {} cannot send the full demand.", k(0)),
        C::SinkBalance => format!("Destination {} cannot receive the full demand.", k(0)),
        C::FlowBalance | C::Conservation => format!("Flow cannot be conserved at node {}.", k(0)),
        C::LinkActivation => format!("Link {} → {} cannot carry the flow routed over it.", k(0), k(1)),
        C::Reliability => format!(
            "Reliability cap on link {} → {} leaves too little room for the demand.",
            k(0),
            k(1)
        ),
        C::LoadBalance => format!("Load-balancing cap on link {} → {} is too tight.", k(0), k(1)),
        C::SourceSupply => format!("Source {} cannot send more people than it holds.", k(0)),
        C::SourceMinimum => format!("Nobody can leave source {}.", k(0)),
        C::EdgeLink => format!("Passage {} → {} is needed but cannot be opened.", k(0), k(1)),
        C::ArrivalTime => format!(
            "Reaching exit {} through {} → {} takes too long.",
            k(0),
            k(1),
            k(2)
        ),
        C::HorizonLink => format!("Exit {} is reached after the evacuation deadline.", k(0)),
        C::Horizon => "The maximum evacuation time is too short.".to_string(),
        C::ResourceCapacity => format!(
            "Resource {} is over-committed at instant {}.",
            k(0),
            k(1).trim_start_matches('t')
        ),
        C::Deadline => format!("Mission {} cannot start at {} and meet its deadline.", k(0), k(1)),
        C::SingleStart => format!("Mission {} can be scheduled at most once.", k(0)),
        C::Coverage => format!(
            "Understaffed: not enough '{}' for the {} {} shift.",
            k(2),
            k(0),
            k(1)
        ),
        C::HireLink => format!("{} must be hired to work {} ({}).", k(0), k(1), k(2)),
        C::Unavailable => format!("{} is not available on {} ({}).", k(0), k(1), k(2)),
        C::OnePerDay => format!("{} cannot work more than one shift on {}.", k(0), k(1)),
        C::Rest => format!(
            "Insufficient rest: {}'s guard on {} rules out the morning of {}.",
            k(0),
            k(1),
            k(2)
        ),
        C::GuardSpacing => format!(
            "Guard spacing: {} cannot take guards this close ({} to {}).",
            k(0),
            k(1),
            tag.last_key()
        ),
        C::MorningStreak => format!(
            "Too many consecutive mornings for {} ({} to {}).",
            k(0),
            k(1),
            tag.last_key()
        ),
        C::MaxTotal => format!("Maximum shift count exceeded for {}.", k(0)),
        C::MinTotal => format!("Minimum shift count unreachable for {}.", k(0)),
        C::HireRequired => format!("{} must be hired.", k(0)),
        C::ResourceAvailability => format!("Resource {} is not available in sufficient quantity.", k(0)),
        C::MinimumOutput => format!("The committed output of {} cannot be produced.", k(0)),
    };
    Some(message)
}

/// Generic message for a constraint that cannot be described.
pub fn fallback(name: &str) -> String {
    format!("conflicting constraint: {name}")
}

/// One sentence per tag.
pub fn explain_tags<'a>(tags: impl IntoIterator<Item = &'a ConstraintTag>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| describe(tag).unwrap_or_else(|| fallback(&tag.name())))
        .collect()
}

/// One sentence per constraint name.
pub fn explain_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            ConstraintTag::parse(name)
                .and_then(|tag| describe(&tag))
                .unwrap_or_else(|| fallback(name))
        })
        .collect()
}

/// Explains the infeasible witness of a solution.
///
/// Empty unless the status is infeasible. An empty witness (subset
/// computation failed or unsupported) gives an empty list.
pub fn explain(model: &LpModel, solution: &Solution) -> Vec<String> {
    if solution.status != SolverStatus::Infeasible {
        return Vec::new();
    }
    explain_tags(
        solution
            .infeasible_subset
            .iter()
            .filter(|id| id.index() < model.constraints().len())
            .map(|&id| &model.constraint(id).tag),
    )
}
