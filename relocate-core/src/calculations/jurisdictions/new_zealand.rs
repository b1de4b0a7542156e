use rust_decimal::Decimal;
use tracing::debug;

use super::{BreakdownBuilder, TaxJurisdiction, TaxOptions, sanitize_gross};
use crate::calculations::common::{capped_flat, first_rule, marginal_tax, rules_of};
use crate::models::{Country, TaxAdvisory, TaxBreakdown, TaxRule, TaxType};

/// New Zealand: marginal PAYE, ACC earners' levy up to the liable earnings
/// maximum, and the optional KiwiSaver employee contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewZealand;

impl TaxJurisdiction for NewZealand {
    fn country(&self) -> Country {
        Country::NewZealand
    }

    fn compute(
        &self,
        gross: Decimal,
        rules: &[TaxRule],
        options: &TaxOptions,
    ) -> TaxBreakdown {
        let gross = sanitize_gross(Country::NewZealand, gross);

        let income_tax = marginal_tax(gross, &rules_of(rules, TaxType::IncomeTax, None));
        let acc_levy = first_rule(rules, TaxType::AccEarnersLevy, None)
            .map_or(Decimal::ZERO, |rule| capped_flat(gross, rule));

        let mut builder = BreakdownBuilder::new(Country::NewZealand, gross)
            .deduct(TaxType::IncomeTax, income_tax)
            .deduct(TaxType::AccEarnersLevy, acc_levy);

        if options.include_retirement {
            // KiwiSaver applies to all earnings; the row's upper bound is ignored.
            let kiwisaver = match first_rule(rules, TaxType::KiwiSaver, None) {
                Some(rule) => rule.rate() * gross,
                None => {
                    debug!("no KiwiSaver rule; contribution is zero");
                    Decimal::ZERO
                }
            };
            builder = builder.deduct(TaxType::KiwiSaver, kiwisaver);
        } else {
            builder =
                builder.advise(TaxAdvisory::RetirementContributionExcluded(TaxType::KiwiSaver));
        }

        builder.build()
    }
}
