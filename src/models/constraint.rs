//! Constraint descriptors.
//!
//! Every linear constraint emitted by a model builder carries a
//! [`ConstraintTag`]: a category plus the ordered entity keys it is
//! about (node, edge endpoints, day, shift, skill, candidate...). The tag
//! renders to the constraint name handed to the optimizer, and the
//! infeasibility diagnoser reads the tag back without string splitting.
//!
//! [`ConstraintTag::parse`] exists for witnesses that only carry names
//! (e.g. subsets reported by another optimizer). Keys are read from the
//! right using the key count of the category, so the leading key may
//! contain `_`; later keys may not. Builders keep the tag for that reason.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Routing source: `outflow - inflow == demand`.
    SourceBalance,
    /// Routing destination: `inflow - outflow == demand`.
    SinkBalance,
    /// Routing intermediate node: `inflow == outflow`.
    FlowBalance,
    /// Routing `flow <= capacity * used`.
    LinkActivation,
    /// Routing per-edge cap at a fraction of total demand.
    Reliability,
    /// Routing per-edge cap at a fraction of edge capacity.
    LoadBalance,
    /// Evacuation source: `outflow - inflow <= supply`.
    SourceSupply,
    /// Evacuation source: at least one unit leaves.
    SourceMinimum,
    /// Evacuation intermediate node: `inflow == outflow`.
    Conservation,
    /// Evacuation `flow <= capacity * used`.
    EdgeLink,
    /// Evacuation `t[sink] >= time * used` for an upstream edge.
    ArrivalTime,
    /// Evacuation `t_max >= t[sink]`.
    HorizonLink,
    /// Evacuation `t_max <= max_time`.
    Horizon,
    /// Mission resource draw at one instant `<=` availability.
    ResourceCapacity,
    /// Mission start that would finish past the deadline, fixed to zero.
    Deadline,
    /// Mission started at most once.
    SingleStart,
    /// Staffing demand for one (day, shift, skill).
    Coverage,
    /// Staffing assignment implies hire.
    HireLink,
    /// Staffing assignment forbidden on an unavailable day.
    Unavailable,
    /// Staffing at most one shift per candidate per day.
    OnePerDay,
    /// Staffing guard shift followed by a morning shift.
    Rest,
    /// Staffing at most one guard shift per rolling window.
    GuardSpacing,
    /// Staffing at most L morning shifts per L+1 day window.
    MorningStreak,
    /// Staffing total shifts `<= max_shifts * hire`.
    MaxTotal,
    /// Staffing total shifts `>= min_shifts * hire`.
    MinTotal,
    /// Staffing candidate must be hired.
    HireRequired,
    /// Production draw on one resource `<=` its availability.
    ResourceAvailability,
    /// Production committed minimum output of one product.
    MinimumOutput,
}

impl ConstraintCategory {
    /// All categories, used for prefix lookups.
    pub const ALL: [ConstraintCategory; 28] = [
        Self::SourceBalance,
        Self::SinkBalance,
        Self::FlowBalance,
        Self::LinkActivation,
        Self::Reliability,
        Self::LoadBalance,
        Self::SourceSupply,
        Self::SourceMinimum,
        Self::Conservation,
        Self::EdgeLink,
        Self::ArrivalTime,
        Self::HorizonLink,
        Self::Horizon,
        Self::ResourceCapacity,
        Self::Deadline,
        Self::SingleStart,
        Self::Coverage,
        Self::HireLink,
        Self::Unavailable,
        Self::OnePerDay,
        Self::Rest,
        Self::GuardSpacing,
        Self::MorningStreak,
        Self::MaxTotal,
        Self::MinTotal,
        Self::HireRequired,
        Self::ResourceAvailability,
        Self::MinimumOutput,
    ];

    /// Number of keys a tag of this category carries.
    ///
    /// `None` for the rolling-window categories, whose tags carry the
    /// candidate followed by every day of the window.
    pub fn key_count(self) -> Option<usize> {
        match self {
            Self::Horizon => Some(0),
            Self::SourceBalance
            | Self::SinkBalance
            | Self::FlowBalance
            | Self::SourceSupply
            | Self::SourceMinimum
            | Self::Conservation
            | Self::HorizonLink
            | Self::SingleStart
            | Self::MaxTotal
            | Self::MinTotal
            | Self::HireRequired
            | Self::ResourceAvailability
            | Self::MinimumOutput => Some(1),
            Self::LinkActivation
            | Self::Reliability
            | Self::LoadBalance
            | Self::EdgeLink
            | Self::ResourceCapacity
            | Self::Deadline
            | Self::OnePerDay => Some(2),
            Self::ArrivalTime | Self::Coverage | Self::HireLink | Self::Unavailable | Self::Rest => Some(3),
            Self::GuardSpacing | Self::MorningStreak => None,
        }
    }

    /// Fewest keys a well-formed tag of this category carries.
    pub fn min_keys(self) -> usize {
        self.key_count().unwrap_or(2)
    }

    /// Name prefix of this category.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::SourceBalance => "flow_balance_source",
            Self::SinkBalance => "flow_balance_dest",
            Self::FlowBalance => "flow_balance",
            Self::LinkActivation => "link_activation",
            Self::Reliability => "reliability",
            Self::LoadBalance => "balance",
            Self::SourceSupply => "source",
            Self::SourceMinimum => "min_source",
            Self::Conservation => "conservation",
            Self::EdgeLink => "link",
            Self::ArrivalTime => "time",
            Self::HorizonLink => "tmax",
            Self::Horizon => "max_time_constraint",
            Self::ResourceCapacity => "res",
            Self::Deadline => "dead",
            Self::SingleStart => "once",
            Self::Coverage => "cover",
            Self::HireLink => "hire_link",
            Self::Unavailable => "unavailable",
            Self::OnePerDay => "one_per_day",
            Self::Rest => "rest_guard_matin",
            Self::GuardSpacing => "spacing_garde",
            Self::MorningStreak => "max_matin_seq",
            Self::MaxTotal => "max_total",
            Self::MinTotal => "min_total",
            Self::HireRequired => "hire_required",
            Self::ResourceAvailability => "R",
            Self::MinimumOutput => "min_output",
        }
    }
}

/// Tagged descriptor attached to a constraint at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintTag {
    /// Constraint category.
    pub category: ConstraintCategory,
    /// Ordered entity keys.
    pub keys: Vec<String>,
}

impl ConstraintTag {
    /// Creates a tag.
    pub fn new(category: ConstraintCategory, keys: Vec<String>) -> Self {
        Self { category, keys }
    }

    /// Tag about a single entity.
    pub fn single(category: ConstraintCategory, key: impl Into<String>) -> Self {
        Self::new(category, vec![key.into()])
    }

    /// Tag about a directed edge.
    pub fn edge(category: ConstraintCategory, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(category, vec![from.into(), to.into()])
    }

    /// Tag without keys.
    pub fn bare(category: ConstraintCategory) -> Self {
        Self::new(category, Vec::new())
    }

    /// Demand coverage of a (day, shift, skill) slot.
    pub fn coverage(day: &str, shift: &str, skill: &str) -> Self {
        Self::new(
            ConstraintCategory::Coverage,
            vec![day.into(), shift.into(), skill.into()],
        )
    }

    /// A per (candidate, day, shift) staffing constraint.
    pub fn slot(category: ConstraintCategory, candidate: &str, day: &str, shift: &str) -> Self {
        Self::new(category, vec![candidate.into(), day.into(), shift.into()])
    }

    /// A per (candidate, window of days) staffing constraint.
    pub fn window(category: ConstraintCategory, candidate: &str, days: &[String]) -> Self {
        let mut keys = Vec::with_capacity(days.len() + 1);
        keys.push(candidate.to_string());
        keys.extend(days.iter().cloned());
        Self::new(category, keys)
    }

    /// Key at `index`, or `"?"` when missing.
    pub fn key(&self, index: usize) -> &str {
        self.keys.get(index).map(String::as_str).unwrap_or("?")
    }

    /// Last key, or `"?"` when there are none.
    pub fn last_key(&self) -> &str {
        self.keys.last().map(String::as_str).unwrap_or("?")
    }

    /// Rendered constraint name.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Recovers a tag from a rendered name.
    ///
    /// Returns `None` when no category fits. A category fits when its
    /// prefix matches and enough keys follow; the longest fitting prefix
    /// wins, so `flow_balance_source_0` is a source balance while
    /// `link_activation_b` is the passage `activation → b`. Surplus
    /// `_`-separated parts are folded into the leading key.
    pub fn parse(name: &str) -> Option<Self> {
        let mut best: Option<Self> = None;

        for category in ConstraintCategory::ALL {
            let prefix = category.prefix();
            let Some(rest) = name.strip_prefix(prefix) else {
                continue;
            };
            let keys = if rest.is_empty() {
                Some(Vec::new())
            } else {
                rest.strip_prefix('_')
                    .filter(|rest| !rest.is_empty())
                    .and_then(|rest| split_keys(rest, category.key_count()))
            };
            let Some(keys) = keys.filter(|keys| keys.len() >= category.min_keys()) else {
                continue;
            };
            let longer = best
                .as_ref()
                .map_or(true, |b| prefix.len() > b.category.prefix().len());
            if longer {
                best = Some(Self { category, keys });
            }
        }

        best
    }
}

/// Splits `rest` into keys, reading fixed-size tags from the right.
fn split_keys(rest: &str, count: Option<usize>) -> Option<Vec<String>> {
    let parts: Vec<&str> = rest.split('_').collect();
    match count {
        Some(0) => None,
        Some(count) if parts.len() < count => None,
        Some(count) => {
            let lead = parts.len() - count + 1;
            let mut keys = Vec::with_capacity(count);
            keys.push(parts[..lead].join("_"));
            keys.extend(parts[lead..].iter().map(|p| p.to_string()));
            Some(keys)
        }
        None => Some(parts.into_iter().map(str::to_string).collect()),
    }
}

impl fmt::Display for ConstraintTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category.prefix())?;
        for key in &self.keys {
            write!(f, "_{key}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_matches_naming_scheme() {
        assert_eq!(
            ConstraintTag::coverage("Mon", "Morning", "nurse").name(),
            "cover_Mon_Morning_nurse"
        );
        assert_eq!(
            ConstraintTag::edge(ConstraintCategory::LinkActivation, "0", "1").name(),
            "link_activation_0_1"
        );
        assert_eq!(ConstraintTag::bare(ConstraintCategory::Horizon).name(), "max_time_constraint");
        assert_eq!(
            ConstraintTag::new(ConstraintCategory::ResourceCapacity, vec!["drones".into(), "t4".into()]).name(),
            "res_drones_t4"
        );
    }

    #[test]
    fn test_parse_prefers_longest_prefix() {
        let tag = ConstraintTag::parse("flow_balance_source_0").unwrap();
        assert_eq!(tag.category, ConstraintCategory::SourceBalance);
        assert_eq!(tag.keys, vec!["0"]);

        let tag = ConstraintTag::parse("flow_balance_3").unwrap();
        assert_eq!(tag.category, ConstraintCategory::FlowBalance);

        let tag = ConstraintTag::parse("min_source_Bureau").unwrap();
        assert_eq!(tag.category, ConstraintCategory::SourceMinimum);

        let tag = ConstraintTag::parse("link_activation_1_2").unwrap();
        assert_eq!(tag.category, ConstraintCategory::LinkActivation);

        let tag = ConstraintTag::parse("link_a_b").unwrap();
        assert_eq!(tag.category, ConstraintCategory::EdgeLink);
    }

    #[test]
    fn test_parse_bare_and_unknown() {
        let tag = ConstraintTag::parse("max_time_constraint").unwrap();
        assert_eq!(tag.category, ConstraintCategory::Horizon);
        assert!(tag.keys.is_empty());

        assert!(ConstraintTag::parse("something_else").is_none());
        // A prefix alone is not a name for a keyed category.
        assert!(ConstraintTag::parse("cover_").is_none());
    }

    #[test]
    fn test_every_category_round_trips_by_name() {
        for category in ConstraintCategory::ALL {
            let count = category.key_count().unwrap_or(4);
            let keys = (0..count).map(|i| format!("k{i}")).collect();
            let tag = ConstraintTag::new(category, keys);
            let parsed = ConstraintTag::parse(&tag.name()).unwrap();
            assert_eq!(parsed, tag, "category {category:?}");
        }
    }

    #[test]
    fn test_parse_keeps_underscores_in_leading_key() {
        let tag = ConstraintTag::parse("min_total_nurse_3").unwrap();
        assert_eq!(tag, ConstraintTag::single(ConstraintCategory::MinTotal, "nurse_3"));

        let tag = ConstraintTag::parse("unavailable_nurse_3_Tue_Guard").unwrap();
        assert_eq!(
            tag,
            ConstraintTag::slot(ConstraintCategory::Unavailable, "nurse_3", "Tue", "Guard")
        );

        let tag = ConstraintTag::parse("time_exit_B_hall_gate").unwrap();
        assert_eq!(tag.category, ConstraintCategory::ArrivalTime);
        assert_eq!(tag.keys, vec!["exit_B", "hall", "gate"]);
    }

    #[test]
    fn test_parse_falls_back_to_shorter_prefix_when_keys_are_missing() {
        let tag = ConstraintTag::parse("link_activation_b").unwrap();
        assert_eq!(tag, ConstraintTag::edge(ConstraintCategory::EdgeLink, "activation", "b"));

        let tag = ConstraintTag::parse("flow_balance_source").unwrap();
        assert_eq!(tag, ConstraintTag::single(ConstraintCategory::FlowBalance, "source"));

        let tag = ConstraintTag::parse("R_steel").unwrap();
        assert_eq!(tag, ConstraintTag::single(ConstraintCategory::ResourceAvailability, "steel"));
    }

    #[test]
    fn test_key_accessors() {
        let tag = ConstraintTag::window(
            ConstraintCategory::GuardSpacing,
            "I1",
            &["Mon".into(), "Tue".into(), "Wed".into()],
        );
        assert_eq!(tag.key(0), "I1");
        assert_eq!(tag.key(1), "Mon");
        assert_eq!(tag.last_key(), "Wed");
        assert_eq!(tag.key(9), "?");
    }
}
