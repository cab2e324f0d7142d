//! Closed-form financial formulas.
//!
//! All functions are pure. Inputs are validated before any arithmetic runs
//! and every denominator, logarithm and fractional power is guarded, so an
//! `Ok` value is always a finite number.
//!
//! Time-value and growth formulas run on `rust_finprim` in decimal
//! arithmetic. Its power and division operators panic on overflow, so the
//! magnitude of each result is bounded in `f64` first.
//!
//! Rates passed as `rate_per_period` are fractions (0.01 for 1% per month);
//! parameters named `*_percent` are percentages (12.0 for 12% a year).
use crate::core::error::{CalcResult, DomainError, InputError};
use clap::ValueEnum;
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::amort_dep_tax::progressive_tax as bracket_tax;
use rust_finprim::rate::{cagr as compound_growth, pct_change};
use rust_finprim::tvm::{fv, pmt, pv};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) fn finite(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { field, value }.into())
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(InputError::Negative { field, value }.into());
    }
    Ok(value)
}

fn growth_rate(field: &'static str, value: f64) -> CalcResult<f64> {
    let value = finite(field, value)?;
    if value < -1.0 {
        return Err(InputError::RateBelowTotalLoss {
            field,
            value: value * 100.0,
        }
        .into());
    }
    Ok(value)
}

fn checked(what: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFiniteResult { what }.into())
    }
}

/// Largest magnitude handed to decimal arithmetic, far enough below
/// `Decimal::MAX` that intermediate products cannot overflow.
const DECIMAL_LIMIT: f64 = 1e20;

fn to_decimal(what: &'static str, value: f64) -> CalcResult<Decimal> {
    if value.abs() > DECIMAL_LIMIT {
        return Err(DomainError::NonFiniteResult { what }.into());
    }
    Decimal::from_f64(value).ok_or_else(|| DomainError::NonFiniteResult { what }.into())
}

fn from_decimal(what: &'static str, value: Decimal) -> CalcResult<f64> {
    let value = value
        .to_f64()
        .ok_or(DomainError::NonFiniteResult { what })?;
    checked(what, value)
}

/// `(1 + rate)^periods`, accurate for rates close to zero.
fn growth_factor(rate: f64, periods: f64) -> f64 {
    (periods * rate.ln_1p()).exp()
}

/// Fails unless compounding `amount` at `rate` for `periods` stays within
/// decimal range, whichever direction the growth goes.
fn ensure_in_range(what: &'static str, amount: f64, rate: f64, periods: f64) -> CalcResult<()> {
    let growth = growth_factor(rate, periods);
    let spread = growth.max(1.0 / growth);
    let magnitude = amount.max(1.0) * spread * (1.0 + rate.abs()) * periods.max(1.0);
    if growth > 0.0
        && periods <= f64::from(u32::MAX)
        && magnitude.is_finite()
        && magnitude <= DECIMAL_LIMIT
    {
        Ok(())
    } else {
        Err(DomainError::NonFiniteResult { what }.into())
    }
}

/// Compounding interval for periodic contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Month,
    Year,
}

impl PeriodUnit {
    pub fn per_year(&self) -> f64 {
        match self {
            PeriodUnit::Month => 12.0,
            PeriodUnit::Year => 1.0,
        }
    }

    /// Converts an annual percentage into a fractional rate per period.
    pub fn rate_per_period(&self, annual_rate_percent: f64) -> f64 {
        annual_rate_percent / 100.0 / self.per_year()
    }
}

/// A fixed contribution made at the start of every period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnuityInput {
    pub contribution: f64,
    pub annual_rate_percent: f64,
    pub periods: f64,
    pub unit: PeriodUnit,
}

impl AnnuityInput {
    pub fn future_value(&self) -> CalcResult<f64> {
        future_value_of_annuity(
            self.contribution,
            self.unit.rate_per_period(self.annual_rate_percent),
            self.periods,
        )
    }

    pub fn invested(&self) -> f64 {
        self.contribution * self.periods
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumpSumInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: f64,
}

impl LumpSumInput {
    pub fn future_value(&self) -> CalcResult<f64> {
        future_value_lump_sum(self.principal, self.annual_rate_percent / 100.0, self.years)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: f64,
}

impl LoanInput {
    pub fn summary(&self) -> CalcResult<LoanSummary> {
        loan_summary(
            self.principal,
            PeriodUnit::Month.rate_per_period(self.annual_rate_percent),
            self.term_months,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthInput {
    pub start_value: f64,
    pub end_value: f64,
    pub periods: f64,
}

impl GrowthInput {
    pub fn cagr(&self) -> CalcResult<f64> {
        cagr(self.start_value, self.end_value, self.periods)
    }
}

/// Future value of an annuity-due: each contribution is made at the start of
/// its period and compounds for that period too.
pub fn future_value_of_annuity(
    contribution: f64,
    rate_per_period: f64,
    periods: f64,
) -> CalcResult<f64> {
    let contribution = non_negative("contribution", contribution)?;
    let rate = growth_rate("rate", rate_per_period)?;
    let periods = non_negative("periods", periods)?;

    if rate == 0.0 {
        return checked("future value", contribution * periods);
    }
    if rate == -1.0 {
        return Ok(0.0);
    }
    ensure_in_range("future value", contribution, rate, periods)?;

    let value = fv(
        to_decimal("rate", rate)?,
        to_decimal("periods", periods)?,
        -to_decimal("contribution", contribution)?,
        None,
        Some(true),
    );
    debug!("annuity-due fv: c={contribution}, r={rate}, n={periods} -> {value}");
    from_decimal("future value", value)
}

/// Contribution per period needed to reach `target` with an annuity-due.
pub fn required_contribution(target: f64, rate_per_period: f64, periods: f64) -> CalcResult<f64> {
    let target = non_negative("target", target)?;
    let rate = growth_rate("rate", rate_per_period)?;
    let periods = non_negative("periods", periods)?;

    if periods == 0.0 {
        return Err(DomainError::DivisionByZero { what: "periods" }.into());
    }
    if rate == 0.0 {
        return checked("required contribution", target / periods);
    }
    if rate == -1.0 {
        return Err(DomainError::DivisionByZero {
            what: "annuity factor",
        }
        .into());
    }
    ensure_in_range("required contribution", target, rate, periods)?;

    let contribution = pmt(
        to_decimal("rate", rate)?,
        to_decimal("periods", periods)?,
        Decimal::ZERO,
        Some(-to_decimal("target", target)?),
        Some(true),
    );
    from_decimal("required contribution", contribution)
}

pub fn future_value_lump_sum(principal: f64, rate: f64, periods: f64) -> CalcResult<f64> {
    let principal = non_negative("principal", principal)?;
    let rate = growth_rate("rate", rate)?;
    let periods = non_negative("periods", periods)?;

    if rate == -1.0 {
        return Ok(if periods == 0.0 { principal } else { 0.0 });
    }
    ensure_in_range("future value", principal, rate, periods)?;

    let value = fv(
        to_decimal("rate", rate)?,
        to_decimal("periods", periods)?,
        Decimal::ZERO,
        Some(to_decimal("principal", principal)?),
        None,
    );
    from_decimal("future value", value)
}

/// Present value of an ordinary annuity (payments at the end of each period).
pub fn present_value_of_annuity(
    payment: f64,
    rate_per_period: f64,
    periods: f64,
) -> CalcResult<f64> {
    let payment = non_negative("payment", payment)?;
    let rate = growth_rate("rate", rate_per_period)?;
    let periods = non_negative("periods", periods)?;

    if rate == 0.0 {
        return checked("present value", payment * periods);
    }
    if rate == -1.0 {
        return Err(DomainError::DivisionByZero {
            what: "discount factor",
        }
        .into());
    }
    ensure_in_range("present value", payment, rate, periods)?;

    let value = pv(
        to_decimal("rate", rate)?,
        to_decimal("periods", periods)?,
        -to_decimal("payment", payment)?,
        None,
        None,
    );
    // Discounted cash flows come back as an outflow
    from_decimal("present value", value.abs())
}

/// Level payment that fully amortizes `principal` over `periods`.
pub fn amortized_payment(principal: f64, rate_per_period: f64, periods: f64) -> CalcResult<f64> {
    let principal = non_negative("principal", principal)?;
    let rate = growth_rate("rate", rate_per_period)?;
    let periods = non_negative("periods", periods)?;

    if periods == 0.0 {
        return Err(DomainError::DivisionByZero { what: "loan term" }.into());
    }
    if rate == 0.0 {
        return checked("payment", principal / periods);
    }
    if rate == -1.0 {
        return Err(DomainError::DivisionByZero {
            what: "amortization factor",
        }
        .into());
    }
    ensure_in_range("payment", principal, rate, periods)?;

    let payment = pmt(
        to_decimal("rate", rate)?,
        to_decimal("periods", periods)?,
        -to_decimal("principal", principal)?,
        None,
        None,
    );
    debug!("amortized payment: p={principal}, r={rate}, n={periods} -> {payment}");
    from_decimal("payment", payment)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanSummary {
    pub payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

pub fn loan_summary(principal: f64, rate_per_period: f64, periods: f64) -> CalcResult<LoanSummary> {
    let payment = amortized_payment(principal, rate_per_period, periods)?;
    let total_payment = payment * periods;
    Ok(LoanSummary {
        payment,
        total_payment,
        total_interest: total_payment - principal,
    })
}

/// Compound growth rate per period, as a percentage.
///
/// Undefined unless `start > 0` and `end >= 0`; a fractional power of a
/// negative ratio has no real value.
pub fn cagr(start: f64, end: f64, periods: f64) -> CalcResult<f64> {
    let start = finite("start value", start)?;
    let end = finite("end value", end)?;
    let periods = non_negative("periods", periods)?;

    if periods == 0.0 {
        return Err(DomainError::DivisionByZero { what: "periods" }.into());
    }
    if start <= 0.0 || end < 0.0 {
        return Err(DomainError::UndefinedGrowth { start, end }.into());
    }
    if end == 0.0 {
        return Ok(-100.0);
    }
    // Log of the per-period growth factor
    let exponent = (end / start).ln() / periods;
    if !exponent.is_finite() || exponent.abs() > DECIMAL_LIMIT.ln() {
        return Err(DomainError::NonFiniteResult {
            what: "growth rate",
        }
        .into());
    }

    let begin = to_decimal("start value", start)?;
    if begin.is_zero() {
        return Err(DomainError::UndefinedGrowth { start, end }.into());
    }
    let rate = compound_growth(
        begin,
        to_decimal("end value", end)?,
        to_decimal("periods", periods)?,
    );
    debug!("cagr: {start} -> {end} over {periods} = {rate}");
    from_decimal("growth rate", rate * Decimal::ONE_HUNDRED)
}

/// Gain or loss on `invested`, as a percentage of it.
pub fn roi(invested: f64, returned: f64) -> CalcResult<f64> {
    let invested = non_negative("invested", invested)?;
    let returned = finite("returned", returned)?;

    if invested == 0.0 {
        return Err(DomainError::DivisionByZero { what: "invested" }.into());
    }
    if ((returned - invested) / invested).abs() > DECIMAL_LIMIT {
        return Err(DomainError::NonFiniteResult { what: "return" }.into());
    }
    let change = pct_change(
        to_decimal("invested", invested)?,
        to_decimal("returned", returned)?,
    )
    .ok_or(DomainError::DivisionByZero { what: "invested" })?;
    from_decimal("return", change * Decimal::ONE_HUNDRED)
}

/// Approximate periods needed to double money at a compound rate.
pub fn rule_of_72(annual_rate_percent: f64) -> CalcResult<f64> {
    let rate = finite("rate", annual_rate_percent)?;

    if rate == 0.0 {
        return Err(DomainError::DivisionByZero { what: "rate" }.into());
    }
    if rate < 0.0 {
        return Err(DomainError::NoSolution {
            reason: "money never doubles at a negative rate".to_string(),
        }
        .into());
    }
    Ok(72.0 / rate)
}

pub fn break_even_units(
    fixed_cost: f64,
    price_per_unit: f64,
    variable_cost_per_unit: f64,
) -> CalcResult<f64> {
    let fixed_cost = non_negative("fixed cost", fixed_cost)?;
    let price = finite("price per unit", price_per_unit)?;
    let variable_cost = finite("variable cost per unit", variable_cost_per_unit)?;

    let margin = price - variable_cost;
    if margin <= 0.0 {
        return Err(DomainError::NoSolution {
            reason: format!(
                "price per unit ({price}) must exceed variable cost per unit ({variable_cost})"
            ),
        }
        .into());
    }
    checked("break-even units", fixed_cost / margin)
}

/// Months needed to clear `balance` with a fixed monthly payment.
pub fn months_to_payoff(
    balance: f64,
    annual_rate_percent: f64,
    monthly_payment: f64,
) -> CalcResult<f64> {
    let balance = non_negative("balance", balance)?;
    let annual_rate = non_negative("rate", annual_rate_percent)?;
    let payment = non_negative("monthly payment", monthly_payment)?;

    if balance == 0.0 {
        return Ok(0.0);
    }

    let rate = PeriodUnit::Month.rate_per_period(annual_rate);
    let interest = balance * rate;
    if payment <= interest {
        return Err(DomainError::PaymentTooLow { payment, interest }.into());
    }
    if rate == 0.0 {
        return Ok(balance / payment);
    }

    let months = -(-interest / payment).ln_1p() / rate.ln_1p();
    debug!("payoff: balance={balance}, r={rate}, payment={payment} -> {months} months");
    checked("months to payoff", months)
}

/// Interest earned without compounding.
pub fn simple_interest(principal: f64, rate_percent: f64, years: f64) -> CalcResult<f64> {
    let principal = non_negative("principal", principal)?;
    let rate = finite("rate", rate_percent)?;
    let years = non_negative("years", years)?;

    Ok(principal * rate * years / 100.0)
}

/// `amount` plus `percent` of itself (tax, VAT, GST, tip).
pub fn add_percentage(amount: f64, percent: f64) -> CalcResult<f64> {
    let amount = non_negative("amount", amount)?;
    let percent = non_negative("percent", percent)?;

    checked("total", amount * (1.0 + percent / 100.0))
}

pub fn apply_discount(price: f64, percent: f64) -> CalcResult<f64> {
    let price = non_negative("price", price)?;
    let percent = non_negative("discount", percent)?;

    if percent > 100.0 {
        return Err(InputError::Invalid {
            field: "discount",
            reason: format!("{percent}% exceeds 100%"),
        }
        .into());
    }
    Ok(price * (1.0 - percent / 100.0))
}

/// `part` as a percentage of `whole`.
pub fn percentage_of(part: f64, whole: f64) -> CalcResult<f64> {
    let part = finite("part", part)?;
    let whole = finite("whole", whole)?;

    if whole == 0.0 {
        return Err(DomainError::DivisionByZero { what: "base amount" }.into());
    }
    checked("percentage", part / whole * 100.0)
}

pub fn gross_margin(cost: f64, revenue: f64) -> CalcResult<f64> {
    let cost = finite("cost", cost)?;
    let revenue = finite("revenue", revenue)?;

    if revenue == 0.0 {
        return Err(DomainError::DivisionByZero { what: "revenue" }.into());
    }
    checked("margin", (revenue - cost) / revenue * 100.0)
}

pub fn unit_price(price: f64, quantity: f64) -> CalcResult<f64> {
    let price = non_negative("price", price)?;
    let quantity = non_negative("quantity", quantity)?;

    if quantity == 0.0 {
        return Err(DomainError::DivisionByZero { what: "quantity" }.into());
    }
    checked("unit price", price / quantity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BetterOffer {
    First,
    Second,
    Same,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitPriceComparison {
    pub first: f64,
    pub second: f64,
    pub better: BetterOffer,
    /// How much cheaper the better offer is per unit, in percent of the dearer one.
    pub saving_percent: f64,
}

pub fn compare_unit_prices(
    first_price: f64,
    first_quantity: f64,
    second_price: f64,
    second_quantity: f64,
) -> CalcResult<UnitPriceComparison> {
    let first = unit_price(first_price, first_quantity)?;
    let second = unit_price(second_price, second_quantity)?;

    let (better, cheap, dear) = if first < second {
        (BetterOffer::First, first, second)
    } else if second < first {
        (BetterOffer::Second, second, first)
    } else {
        (BetterOffer::Same, first, second)
    };
    let saving_percent = if dear > 0.0 {
        (dear - cheap) / dear * 100.0
    } else {
        0.0
    };

    Ok(UnitPriceComparison {
        first,
        second,
        better,
        saving_percent,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepUpResult {
    pub invested: f64,
    pub value: f64,
}

const MAX_SIMULATED_YEARS: f64 = 100.0;

/// SIP whose monthly contribution grows by `step_up_percent` every year.
///
/// Simulated month by month over whole years: contribute, then accrue one
/// month of interest on the running corpus.
pub fn step_up_sip(
    monthly: f64,
    annual_rate_percent: f64,
    years: f64,
    step_up_percent: f64,
) -> CalcResult<StepUpResult> {
    let mut contribution = non_negative("monthly contribution", monthly)?;
    let rate = growth_rate("rate", PeriodUnit::Month.rate_per_period(annual_rate_percent))?;
    let years = non_negative("years", years)?;
    let step_up = non_negative("step-up", step_up_percent)?;

    if years > MAX_SIMULATED_YEARS {
        return Err(InputError::Invalid {
            field: "years",
            reason: format!("step-up plans are limited to {MAX_SIMULATED_YEARS} years"),
        }
        .into());
    }

    let mut invested = 0.0;
    let mut value = 0.0;
    for _ in 0..years.floor() as u32 {
        for _ in 0..12 {
            value += contribution;
            invested += contribution;
            value += value * rate;
        }
        contribution += contribution * step_up / 100.0;
    }

    Ok(StepUpResult {
        invested,
        value: checked("maturity value", value)?,
    })
}

/// A marginal tax band covering income up to `up_to`, starting where the
/// previous band ends. The last band must be open (`up_to == None`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub up_to: Option<f64>,
    pub rate_percent: f64,
}

pub const DEFAULT_TAX_BRACKETS: [TaxBracket; 3] = [
    TaxBracket {
        up_to: Some(10_000.0),
        rate_percent: 0.0,
    },
    TaxBracket {
        up_to: Some(40_000.0),
        rate_percent: 10.0,
    },
    TaxBracket {
        up_to: None,
        rate_percent: 20.0,
    },
];

pub fn progressive_tax(income: f64, brackets: &[TaxBracket]) -> CalcResult<f64> {
    let income = non_negative("income", income)?;

    let table = brackets
        .iter()
        .map(|bracket| -> CalcResult<(Decimal, Decimal)> {
            let upper = match bracket.up_to {
                Some(limit) => {
                    to_decimal("bracket limit", non_negative("bracket limit", limit)?)?
                }
                None => Decimal::MAX,
            };
            let rate = non_negative("bracket rate", bracket.rate_percent)?;
            if rate > 100.0 {
                return Err(InputError::Invalid {
                    field: "bracket rate",
                    reason: format!("{rate}% exceeds 100%"),
                }
                .into());
            }
            Ok((upper, to_decimal("bracket rate", rate / 100.0)?))
        })
        .collect::<CalcResult<Vec<_>>>()?;
    if table.is_empty() {
        return Err(InputError::Invalid {
            field: "tax brackets",
            reason: "at least one bracket is required".to_string(),
        }
        .into());
    }

    let tax = bracket_tax(to_decimal("income", income)?, Decimal::ZERO, &table).ok_or_else(
        || InputError::Invalid {
            field: "tax brackets",
            reason: "bands must ascend and the last one must be open".to_string(),
        },
    )?;
    from_decimal("tax", tax)
}

/// Period a quoted salary refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    Year,
    Month,
    Week,
    Hour,
}

impl PayPeriod {
    pub fn per_year(&self) -> f64 {
        match self {
            PayPeriod::Year => 1.0,
            PayPeriod::Month => 12.0,
            PayPeriod::Week => 52.0,
            // 40 hours a week, 52 weeks a year
            PayPeriod::Hour => 2080.0,
        }
    }
}

pub fn annualize(amount: f64, per: PayPeriod) -> CalcResult<f64> {
    let amount = non_negative("amount", amount)?;
    checked("annual amount", amount * per.per_year())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalaryBreakdown {
    pub yearly: f64,
    pub monthly: f64,
    pub bi_weekly: f64,
    pub weekly: f64,
    pub daily: f64,
    pub hourly: f64,
}

pub fn salary_breakdown(amount: f64, per: PayPeriod) -> CalcResult<SalaryBreakdown> {
    let yearly = annualize(amount, per)?;
    Ok(SalaryBreakdown {
        yearly,
        monthly: yearly / 12.0,
        bi_weekly: yearly / 26.0,
        weekly: yearly / 52.0,
        daily: yearly / 260.0,
        hourly: yearly / 2080.0,
    })
}
