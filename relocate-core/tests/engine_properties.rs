//! Properties that hold across every tax engine and the layers built on it.

use pretty_assertions::assert_eq;
use relocate_core::calculations::{
    ComparisonEngine, ComparisonSelection, CountryData, FigureInputs, Recovery, RecoveryMonths,
    TaxOptions, compute_figures, compute_savings, compute_tax, find_equivalent_stage, stages_for,
};
use relocate_core::{
    CostOfLivingRow, Country, Currency, ExchangeRate, ExchangeRates, LifestyleLevel,
    MigrationCosts, RentType, SalaryBand, SalaryPoint, TaxRule, TaxType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn rule(
    country: Country,
    region: Option<&str>,
    tax_type: TaxType,
    lower: Decimal,
    upper: Option<Decimal>,
    rate: Decimal,
) -> TaxRule {
    TaxRule {
        country,
        region: region.map(str::to_string),
        tax_type,
        bracket_lower: lower,
        bracket_upper: upper,
        rate_percent: rate,
        is_estimate: false,
    }
}

fn national(
    country: Country,
    tax_type: TaxType,
    lower: Decimal,
    upper: Option<Decimal>,
    rate: Decimal,
) -> TaxRule {
    rule(country, None, tax_type, lower, upper, rate)
}

fn rules_for(country: Country) -> Vec<TaxRule> {
    use TaxType::*;
    let n = |t, l, u, r| national(country, t, l, u, r);
    match country {
        Country::UnitedKingdom => vec![
            n(IncomeTax, dec!(0), Some(dec!(12570)), dec!(0)),
            n(IncomeTax, dec!(12570), Some(dec!(50270)), dec!(20)),
            n(IncomeTax, dec!(50270), Some(dec!(125140)), dec!(40)),
            n(IncomeTax, dec!(125140), None, dec!(45)),
            n(NationalInsurance, dec!(0), Some(dec!(12570)), dec!(0)),
            n(NationalInsurance, dec!(12570), Some(dec!(50270)), dec!(8)),
            n(NationalInsurance, dec!(50270), None, dec!(2)),
            n(NhsPension, dec!(0), Some(dec!(13259)), dec!(5.2)),
            n(NhsPension, dec!(13259), Some(dec!(27288)), dec!(6.5)),
            n(NhsPension, dec!(27288), Some(dec!(33247)), dec!(8.3)),
            n(NhsPension, dec!(33247), Some(dec!(49913)), dec!(9.8)),
            n(NhsPension, dec!(49913), Some(dec!(63994)), dec!(10.7)),
            n(NhsPension, dec!(63994), None, dec!(12.5)),
        ],
        Country::Australia => vec![
            n(IncomeTax, dec!(0), Some(dec!(18200)), dec!(0)),
            n(IncomeTax, dec!(18200), Some(dec!(45000)), dec!(16)),
            n(IncomeTax, dec!(45000), Some(dec!(135000)), dec!(30)),
            n(IncomeTax, dec!(135000), Some(dec!(190000)), dec!(37)),
            n(IncomeTax, dec!(190000), None, dec!(45)),
            n(MedicareLevy, dec!(27222), Some(dec!(34027)), dec!(2)),
            n(SuperannuationGuarantee, dec!(0), Some(dec!(260280)), dec!(11.5)),
        ],
        Country::Canada => {
            let on = |l, u, r| rule(country, Some("ON"), ProvincialIncomeTax, l, u, r);
            vec![
                n(IncomeTax, dec!(0), Some(dec!(55867)), dec!(15)),
                n(IncomeTax, dec!(55867), Some(dec!(111733)), dec!(20.5)),
                n(IncomeTax, dec!(111733), Some(dec!(173205)), dec!(26)),
                n(IncomeTax, dec!(173205), Some(dec!(246752)), dec!(29)),
                n(IncomeTax, dec!(246752), None, dec!(33)),
                on(dec!(0), Some(dec!(51446)), dec!(5.05)),
                on(dec!(51446), Some(dec!(102894)), dec!(9.15)),
                on(dec!(102894), Some(dec!(150000)), dec!(11.16)),
                on(dec!(150000), Some(dec!(220000)), dec!(12.16)),
                on(dec!(220000), None, dec!(13.16)),
                n(Cpp, dec!(3500), Some(dec!(68500)), dec!(5.95)),
                n(Cpp2, dec!(68500), Some(dec!(73200)), dec!(4)),
                n(Ei, dec!(0), Some(dec!(63200)), dec!(1.66)),
            ]
        }
        Country::Germany => vec![
            n(HealthInsurance, dec!(0), Some(dec!(66150)), dec!(8.55)),
            n(PensionInsurance, dec!(0), Some(dec!(96600)), dec!(9.3)),
            n(UnemploymentInsurance, dec!(0), Some(dec!(96600)), dec!(1.3)),
            n(LongTermCareInsurance, dec!(0), Some(dec!(66150)), dec!(1.8)),
        ],
        Country::NewZealand => vec![
            n(IncomeTax, dec!(0), Some(dec!(15600)), dec!(10.5)),
            n(IncomeTax, dec!(15600), Some(dec!(53500)), dec!(17.5)),
            n(IncomeTax, dec!(53500), Some(dec!(78100)), dec!(30)),
            n(IncomeTax, dec!(78100), Some(dec!(180000)), dec!(33)),
            n(IncomeTax, dec!(180000), None, dec!(39)),
            n(AccEarnersLevy, dec!(0), Some(dec!(142283)), dec!(1.6)),
            n(KiwiSaver, dec!(0), None, dec!(3)),
        ],
        _ => Vec::new(),
    }
}

fn options_for(country: Country) -> TaxOptions {
    match country {
        Country::Canada => TaxOptions::default().with_region("ON"),
        _ => TaxOptions::default(),
    }
}

fn supported() -> impl Iterator<Item = Country> {
    Country::DESTINATIONS.into_iter().filter(Country::is_supported)
}

fn grosses() -> impl Iterator<Item = Decimal> {
    (0..=60).map(|i| Decimal::from(i * 5_000))
}

// =============================================================================
// Breakdown invariants
// =============================================================================

#[test]
fn net_is_gross_minus_total_deductions() {
    for country in supported() {
        let rules = rules_for(country);
        for gross in grosses() {
            let b = compute_tax(country, gross, &rules, &options_for(country)).unwrap();
            let line_sum: Decimal = b.deductions.iter().map(|l| l.amount).sum();

            assert_eq!(b.total_deductions, line_sum, "{country} at {gross}");
            assert_eq!(b.net_annual, gross - b.total_deductions, "{country} at {gross}");
            assert!(b.net_annual >= Decimal::ZERO, "{country} at {gross} went negative");
        }
    }
}

#[test]
fn zero_gross_yields_zero_everywhere() {
    for country in supported() {
        let b = compute_tax(country, dec!(0), &rules_for(country), &options_for(country)).unwrap();

        assert!(b.deductions.iter().all(|l| l.amount.is_zero()), "{country}");
        assert_eq!(b.total_deductions, dec!(0), "{country}");
        assert_eq!(b.net_annual, dec!(0), "{country}");
        assert_eq!(b.net_monthly, dec!(0), "{country}");
        assert_eq!(b.effective_tax_rate, dec!(0), "{country}");
    }
}

#[test]
fn income_tax_is_monotone_for_bracket_countries() {
    let countries = [
        Country::UnitedKingdom,
        Country::Australia,
        Country::Canada,
        Country::NewZealand,
        Country::Germany,
    ];
    for country in countries {
        let rules = rules_for(country);
        let mut previous = Decimal::ZERO;
        for step in 0..=400 {
            let gross = Decimal::from(step * 997);
            let b = compute_tax(country, gross, &rules, &options_for(country)).unwrap();
            let tax = b.deduction(TaxType::IncomeTax);

            assert!(tax >= previous, "{country}: tax fell at {gross}");
            previous = tax;
        }
    }
}

#[test]
fn income_tax_is_continuous_at_bracket_boundaries() {
    for country in [Country::UnitedKingdom, Country::Australia, Country::NewZealand] {
        let rules = rules_for(country);
        let boundaries = rules
            .iter()
            .filter(|r| r.tax_type == TaxType::IncomeTax)
            .filter_map(|r| r.bracket_upper);
        for boundary in boundaries {
            let at = compute_tax(country, boundary, &rules, &TaxOptions::default()).unwrap();
            let above =
                compute_tax(country, boundary + dec!(1), &rules, &TaxOptions::default()).unwrap();
            let step = above.deduction(TaxType::IncomeTax) - at.deduction(TaxType::IncomeTax);

            assert!(step <= dec!(1), "{country}: jump of {step} at {boundary}");
        }
    }
}

#[test]
fn uae_keeps_the_whole_salary() {
    let b = compute_tax(Country::Uae, dec!(500000), &[], &TaxOptions::default()).unwrap();

    assert_eq!(b.net_annual, dec!(500000));
    assert_eq!(b.net_monthly, dec!(41667));
    assert_eq!(b.effective_tax_rate, dec!(0));
}

#[test]
fn medicare_levy_jumps_past_the_ceiling() {
    let rules = rules_for(Country::Australia);
    let levy = |gross| {
        compute_tax(Country::Australia, gross, &rules, &TaxOptions::default())
            .unwrap()
            .deduction(TaxType::MedicareLevy)
    };

    assert_eq!(levy(dec!(27222)), dec!(0));
    // 10% of the 6805 phase-in range
    assert_eq!(levy(dec!(34027)), dec!(681));
    assert_eq!(levy(dec!(40000)), dec!(800));
}

// =============================================================================
// Savings and stage mapping
// =============================================================================

#[test]
fn cost_above_net_pay_means_no_recovery() {
    let costs = MigrationCosts {
        total_min_inr: dec!(400000),
        total_typical_inr: dec!(600000),
        total_max_inr: dec!(900000),
        ..MigrationCosts::empty(Country::UnitedKingdom)
    };

    for cost in [dec!(3245), dec!(3500), dec!(10000)] {
        let savings = compute_savings(dec!(3245), cost, dec!(107.5), &costs);

        assert!(savings.is_negative_savings);
        assert!(savings.monthly_savings_inr <= Decimal::ZERO);
        assert_eq!(savings.recovery, RecoveryMonths::NOT_APPLICABLE);
        assert_eq!(savings.recovery.typical, Recovery::NotApplicable);
    }
}

#[test]
fn equivalent_stage_always_belongs_to_the_destination() {
    for from in supported() {
        for (stage, _) in stages_for(from) {
            for to in supported() {
                if let Some(found) = find_equivalent_stage(from, stage, to) {
                    assert!(
                        stages_for(to).iter().any(|(s, _)| *s == found),
                        "{from} {stage} mapped to unknown {to} stage {found}"
                    );
                }
            }
        }
    }
}

#[test]
fn unmapped_stage_has_no_equivalent() {
    assert_eq!(
        find_equivalent_stage(Country::UnitedKingdom, "Medical Student", Country::Australia),
        None
    );
}

// =============================================================================
// Comparison
// =============================================================================

fn cost_row(
    country: Country,
    city: &str,
    total: Decimal,
) -> CostOfLivingRow {
    CostOfLivingRow {
        country,
        city: city.to_string(),
        lifestyle: LifestyleLevel::Moderate,
        rent_type: RentType::OneBhk,
        rent: total,
        utilities: dec!(0),
        transport: dec!(0),
        groceries: dec!(0),
        school_fees: dec!(0),
        dining: dec!(0),
        healthcare: dec!(0),
        misc: dec!(0),
        total_monthly_cost: total,
    }
}

fn scenario_costs(
    country: Country,
    min: Decimal,
    typical: Decimal,
    max: Decimal,
) -> MigrationCosts {
    MigrationCosts {
        total_min_inr: min,
        total_typical_inr: typical,
        total_max_inr: max,
        ..MigrationCosts::empty(country)
    }
}

#[test]
fn rows_match_independent_computation() {
    let as_of = chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let rates: ExchangeRates = [(Currency::Gbp, dec!(107.5)), (Currency::Nzd, dec!(52))]
        .into_iter()
        .map(|(currency, rate_to_inr)| ExchangeRate {
            currency,
            rate_to_inr,
            is_live: false,
            as_of,
        })
        .collect();

    let mut uk = CountryData::new(Country::UnitedKingdom);
    uk.tax_rules = rules_for(Country::UnitedKingdom);
    uk.cost_of_living = vec![cost_row(Country::UnitedKingdom, "Manchester", dec!(1800))];
    uk.migration_costs =
        scenario_costs(Country::UnitedKingdom, dec!(300000), dec!(500000), dec!(800000));

    let nz_stage =
        find_equivalent_stage(Country::UnitedKingdom, "Specialty Registrar", Country::NewZealand)
            .unwrap();
    let mut nz = CountryData::new(Country::NewZealand);
    nz.tax_rules = rules_for(Country::NewZealand);
    nz.salary_bands = vec![SalaryBand {
        country: Country::NewZealand,
        career_stage: nz_stage.to_string(),
        sector: "Public (Te Whatu Ora)".to_string(),
        gross_annual_min: dec!(100000),
        gross_annual_typical: dec!(130000),
        gross_annual_max: dec!(160000),
        currency: Currency::Nzd,
        is_estimate: false,
        notes: None,
    }];
    nz.cost_of_living = vec![cost_row(Country::NewZealand, "Auckland", dec!(4000))];
    nz.migration_costs =
        scenario_costs(Country::NewZealand, dec!(400000), dec!(600000), dec!(900000));

    let current_figures = compute_figures(
        &uk,
        &rates,
        &FigureInputs {
            gross_annual: dec!(60000),
            region: None,
            city: "Manchester",
            lifestyle: LifestyleLevel::Moderate,
            rent_type: RentType::OneBhk,
            include_retirement: true,
        },
    );

    let datasets = [uk.clone(), nz.clone()];
    let rows = ComparisonEngine::new(&datasets, &rates).compute_rows(&ComparisonSelection {
        current_country: Country::UnitedKingdom,
        current_city: "Manchester".to_string(),
        career_stage: "Specialty Registrar".to_string(),
        salary_point: SalaryPoint::Typical,
        lifestyle: LifestyleLevel::Moderate,
        rent_type: RentType::OneBhk,
        include_retirement: true,
        current_figures,
    });

    // Current country, from the tax and savings layers directly.
    let options = TaxOptions::default();
    let uk_tax = compute_tax(Country::UnitedKingdom, dec!(60000), &uk.tax_rules, &options).unwrap();
    let uk_savings =
        compute_savings(uk_tax.net_monthly, dec!(1800), dec!(107.5), &uk.migration_costs);
    let current = rows.iter().find(|r| r.is_current_country).unwrap();
    let figures = current.figures.as_ref().unwrap();

    assert_eq!(figures.breakdown, uk_tax);
    assert_eq!(figures.savings, uk_savings);
    assert_eq!(figures.breakdown.net_monthly, dec!(3245));
    // (3245 - 1800) * 107.5 = 155337.5
    assert_eq!(figures.savings.monthly_savings_inr, dec!(155338));
    assert_eq!(
        figures.savings.recovery,
        RecoveryMonths {
            min: Recovery::Months(2),
            typical: Recovery::Months(4),
            max: Recovery::Months(6),
        }
    );

    // Destination, synthesized from the typical band at the representative city.
    let nz_tax = compute_tax(Country::NewZealand, dec!(130000), &nz.tax_rules, &options).unwrap();
    let nz_savings =
        compute_savings(nz_tax.net_monthly, dec!(4000), dec!(52), &nz.migration_costs);
    let nz_row = rows.iter().find(|r| r.country == Country::NewZealand).unwrap();
    let nz_figures = nz_row.figures.as_ref().unwrap();

    assert_eq!(nz_row.career_stage.as_deref(), Some(nz_stage));
    assert_eq!(nz_row.city.as_deref(), Some("Auckland"));
    assert_eq!(nz_figures.breakdown.net_monthly, nz_tax.net_monthly);
    assert_eq!(nz_figures.savings.monthly_savings_inr, nz_savings.monthly_savings_inr);
    assert_eq!(nz_figures.savings.recovery, nz_savings.recovery);
    assert!(!nz_figures.savings.is_negative_savings);
}
