//! Monthly savings and migration-cost recovery.
//!
//! Net monthly pay and the monthly cost of living are converted to INR with a
//! single rate. Recovery is the number of whole months of INR savings needed
//! to repay each of the three migration-cost scenarios.
//!
//! When savings are zero or negative there is no recovery period: every
//! scenario is [`Recovery::NotApplicable`]. The guarded division in
//! [`safe_divide`] keeps the arithmetic defined in that case, but its result is
//! discarded rather than reported.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{round_currency, safe_divide};
use crate::models::MigrationCosts;

/// Months needed to recover a migration cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    Months(u32),
    /// Savings are zero or negative; the cost is never recovered.
    NotApplicable,
}

impl Recovery {
    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Months(m) => Some(*m),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Months(_))
    }
}

impl fmt::Display for Recovery {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Months(1) => f.write_str("1 month"),
            Self::Months(m) => write!(f, "{m} months"),
            Self::NotApplicable => f.write_str("n/a"),
        }
    }
}

/// Recovery under the minimum, typical and maximum migration-cost scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryMonths {
    pub min: Recovery,
    pub typical: Recovery,
    pub max: Recovery,
}

impl RecoveryMonths {
    pub const NOT_APPLICABLE: Self = Self {
        min: Recovery::NotApplicable,
        typical: Recovery::NotApplicable,
        max: Recovery::NotApplicable,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsResult {
    pub net_monthly_local: Decimal,
    pub net_monthly_inr: Decimal,
    pub monthly_cost_local: Decimal,
    pub monthly_cost_inr: Decimal,
    pub monthly_savings_local: Decimal,
    pub monthly_savings_inr: Decimal,
    /// `monthly_savings_inr <= 0`, evaluated before rounding.
    pub is_negative_savings: bool,
    pub recovery: RecoveryMonths,
}

/// Computes monthly savings in local currency and INR plus recovery months.
///
/// INR amounts in the result are rounded to whole rupees. The negative-savings
/// flag and the recovery months use the unrounded INR savings.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relocate_core::{Country, MigrationCosts};
/// use relocate_core::calculations::savings::{Recovery, compute_savings};
///
/// let mut costs = MigrationCosts::empty(Country::Australia);
/// costs.total_typical_inr = dec!(1200000);
///
/// let result = compute_savings(dec!(6434), dec!(4000), dec!(55), &costs);
///
/// assert_eq!(result.monthly_savings_inr, dec!(133870));
/// assert_eq!(result.recovery.typical, Recovery::Months(9));
/// ```
pub fn compute_savings(
    net_monthly_local: Decimal,
    monthly_cost_local: Decimal,
    local_to_inr: Decimal,
    migration_costs: &MigrationCosts,
) -> SavingsResult {
    let monthly_savings_local = net_monthly_local - monthly_cost_local;
    let monthly_savings_inr = monthly_savings_local * local_to_inr;
    let is_negative_savings = monthly_savings_inr <= Decimal::ZERO;

    let recovery = if is_negative_savings {
        RecoveryMonths::NOT_APPLICABLE
    } else {
        RecoveryMonths {
            min: recovery_months(migration_costs.total_min_inr, monthly_savings_inr),
            typical: recovery_months(migration_costs.total_typical_inr, monthly_savings_inr),
            max: recovery_months(migration_costs.total_max_inr, monthly_savings_inr),
        }
    };

    SavingsResult {
        net_monthly_local,
        net_monthly_inr: round_currency(net_monthly_local * local_to_inr),
        monthly_cost_local,
        monthly_cost_inr: round_currency(monthly_cost_local * local_to_inr),
        monthly_savings_local,
        monthly_savings_inr: round_currency(monthly_savings_inr),
        is_negative_savings,
        recovery,
    }
}

fn recovery_months(
    total_inr: Decimal,
    monthly_savings_inr: Decimal,
) -> Recovery {
    let months = safe_divide(total_inr.max(Decimal::ZERO), monthly_savings_inr).ceil();
    Recovery::Months(months.to_u32().unwrap_or(u32::MAX))
}
