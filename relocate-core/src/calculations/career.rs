//! Cross-country career-stage equivalence.
//!
//! Each country names its training grades differently. Every local stage is
//! mapped to one of four canonical levels, and a stage in one country is
//! translated by finding a stage at the same level in the other.
//!
//! Where a country has several stages at the same level the first one listed
//! is used as the equivalent.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Country;

/// Canonical seniority tier shared by every country's career ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CareerLevel {
    Entry,
    Junior,
    Registrar,
    Consultant,
}

impl CareerLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::Junior => "Junior",
            Self::Registrar => "Registrar",
            Self::Consultant => "Consultant",
        }
    }
}

impl fmt::Display for CareerLevel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

type Ladder = &'static [(&'static str, CareerLevel)];

static UNITED_KINGDOM: Ladder = &[
    ("FY1", CareerLevel::Entry),
    ("FY2", CareerLevel::Entry),
    ("Core Training", CareerLevel::Junior),
    ("Specialty Registrar", CareerLevel::Registrar),
    ("Consultant", CareerLevel::Consultant),
];

static AUSTRALIA: Ladder = &[
    ("Intern", CareerLevel::Entry),
    ("Resident Medical Officer", CareerLevel::Junior),
    ("Registrar", CareerLevel::Registrar),
    ("Consultant/Specialist", CareerLevel::Consultant),
];

static CANADA: Ladder = &[
    ("Resident (PGY1)", CareerLevel::Entry),
    ("Resident (PGY3)", CareerLevel::Junior),
    ("Fellow", CareerLevel::Registrar),
    ("Staff Physician", CareerLevel::Consultant),
];

static GERMANY: Ladder = &[
    ("Assistenzarzt (Year 1)", CareerLevel::Entry),
    ("Assistenzarzt (Year 3)", CareerLevel::Junior),
    ("Facharzt", CareerLevel::Registrar),
    ("Oberarzt", CareerLevel::Consultant),
    ("Chefarzt", CareerLevel::Consultant),
];

static UAE: Ladder = &[
    ("Intern", CareerLevel::Entry),
    ("General Practitioner", CareerLevel::Junior),
    ("Specialist", CareerLevel::Registrar),
    ("Consultant", CareerLevel::Consultant),
];

static NEW_ZEALAND: Ladder = &[
    ("House Officer (PGY1)", CareerLevel::Entry),
    ("House Officer (PGY2)", CareerLevel::Junior),
    ("Registrar", CareerLevel::Registrar),
    ("Senior Medical Officer", CareerLevel::Consultant),
];

/// The career ladder for `country` in declaration order; empty when the
/// country has none.
pub fn stages_for(country: Country) -> &'static [(&'static str, CareerLevel)] {
    match country {
        Country::UnitedKingdom => UNITED_KINGDOM,
        Country::Australia => AUSTRALIA,
        Country::Canada => CANADA,
        Country::Germany => GERMANY,
        Country::Uae => UAE,
        Country::NewZealand => NEW_ZEALAND,
        Country::India | Country::Ireland | Country::UnitedStates => &[],
    }
}

/// Canonical level of `stage` in `country`. Surrounding whitespace is ignored;
/// the label must otherwise match exactly.
pub fn career_level(
    country: Country,
    stage: &str,
) -> Option<CareerLevel> {
    let stage = stage.trim();
    stages_for(country)
        .iter()
        .find(|(label, _)| *label == stage)
        .map(|(_, level)| *level)
}

/// The first stage in `to`'s ladder at the same level as `stage` in `from`.
///
/// Returns `None` when `stage` is not on `from`'s ladder or `to` has no stage
/// at that level. Callers treat `None` as "no comparison for this country".
///
/// # Examples
///
/// ```
/// use relocate_core::Country;
/// use relocate_core::calculations::career::find_equivalent_stage;
///
/// assert_eq!(
///     find_equivalent_stage(Country::UnitedKingdom, "Specialty Registrar", Country::Germany),
///     Some("Facharzt")
/// );
/// assert_eq!(
///     find_equivalent_stage(Country::UnitedKingdom, "Locum", Country::Germany),
///     None
/// );
/// ```
pub fn find_equivalent_stage(
    from: Country,
    stage: &str,
    to: Country,
) -> Option<&'static str> {
    let Some(level) = career_level(from, stage) else {
        debug!(%from, stage, "career stage is not mapped");
        return None;
    };
    stages_for(to)
        .iter()
        .find(|(_, l)| *l == level)
        .map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_supported_country_covers_all_four_levels() {
        let levels = [
            CareerLevel::Entry,
            CareerLevel::Junior,
            CareerLevel::Registrar,
            CareerLevel::Consultant,
        ];
        for country in Country::DESTINATIONS.into_iter().filter(Country::is_supported) {
            for level in levels {
                assert!(
                    stages_for(country).iter().any(|(_, l)| *l == level),
                    "{country} has no {level} stage"
                );
            }
        }
    }

    #[test]
    fn same_level_translates_across_countries() {
        assert_eq!(
            find_equivalent_stage(Country::Australia, "Registrar", Country::Canada),
            Some("Fellow")
        );
        assert_eq!(
            find_equivalent_stage(Country::Canada, "Staff Physician", Country::NewZealand),
            Some("Senior Medical Officer")
        );
    }

    #[test]
    fn first_declared_stage_wins() {
        assert_eq!(
            find_equivalent_stage(Country::Uae, "Consultant", Country::Germany),
            Some("Oberarzt")
        );
        assert_eq!(
            find_equivalent_stage(Country::Australia, "Intern", Country::UnitedKingdom),
            Some("FY1")
        );
    }

    #[test]
    fn translation_to_same_country_normalizes_to_first_stage() {
        assert_eq!(
            find_equivalent_stage(Country::Germany, "Chefarzt", Country::Germany),
            Some("Oberarzt")
        );
    }

    #[test]
    fn whitespace_is_ignored_but_case_is_not() {
        assert_eq!(
            find_equivalent_stage(Country::UnitedKingdom, "  FY2 ", Country::Uae),
            Some("Intern")
        );
        assert_eq!(
            find_equivalent_stage(Country::UnitedKingdom, "fy2", Country::Uae),
            None
        );
    }

    #[test]
    fn unmapped_stage_or_country_gives_none() {
        assert_eq!(
            find_equivalent_stage(Country::UnitedKingdom, "Medical Student", Country::Uae),
            None
        );
        assert_eq!(
            find_equivalent_stage(Country::UnitedKingdom, "Consultant", Country::Ireland),
            None
        );
        assert_eq!(
            find_equivalent_stage(Country::UnitedStates, "Attending", Country::UnitedKingdom),
            None
        );
    }

    #[test]
    fn career_level_lookup() {
        assert_eq!(
            career_level(Country::NewZealand, "Registrar"),
            Some(CareerLevel::Registrar)
        );
        assert_eq!(career_level(Country::India, "Registrar"), None);
    }
}
