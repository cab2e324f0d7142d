//! The calculator registry.
//!
//! Every tool is a variant of [`Calculator`] carrying its own typed input.
//! The same list generates [`ToolKind`] and its metadata, so a tool cannot be
//! listed without an implementation or implemented without being listed.
use crate::core::currency::{self, CurrencyCode};
use crate::core::error::{CalcResult, DomainError, InputError};
use crate::core::formula::{
    self, AnnuityInput, BetterOffer, GrowthInput, LoanInput, LumpSumInput, PayPeriod,
    PeriodUnit, finite, non_negative,
};
use crate::core::report::{Figure, Report, Unit};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

/// Computes a report from validated inputs.
pub trait Tool {
    fn evaluate(&self) -> CalcResult<Report>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ToolGroup {
    Investments,
    Planning,
    Loans,
    Business,
    Daily,
}

impl ToolGroup {
    pub const ALL: [ToolGroup; 5] = [
        ToolGroup::Investments,
        ToolGroup::Planning,
        ToolGroup::Loans,
        ToolGroup::Business,
        ToolGroup::Daily,
    ];
}

impl Display for ToolGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ToolGroup::Investments => "Investments",
                ToolGroup::Planning => "Planning",
                ToolGroup::Loans => "Loans",
                ToolGroup::Business => "Business",
                ToolGroup::Daily => "Daily Utility",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    /// Subcommand name of the tool.
    pub id: &'static str,
    pub name: &'static str,
    pub group: ToolGroup,
    pub description: &'static str,
}

macro_rules! registry {
    ($(
        $(#[$meta:meta])*
        $variant:ident($input:ty) => $id:literal, $name:literal, $group:ident, $desc:literal;
    )*) => {
        /// A calculator together with its inputs.
        #[derive(Debug, Clone, PartialEq, Subcommand)]
        pub enum Calculator {
            $( $(#[$meta])* $variant($input), )*
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum ToolKind {
            $( $variant, )*
        }

        impl ToolKind {
            pub const ALL: &'static [ToolKind] = &[ $( ToolKind::$variant, )* ];

            pub fn info(&self) -> ToolInfo {
                match self {
                    $( ToolKind::$variant => ToolInfo {
                        id: $id,
                        name: $name,
                        group: ToolGroup::$group,
                        description: $desc,
                    }, )*
                }
            }
        }

        impl Calculator {
            pub fn kind(&self) -> ToolKind {
                match self {
                    $( Calculator::$variant(_) => ToolKind::$variant, )*
                }
            }

            /// Runs the tool. A figure that overflowed to infinity or NaN
            /// fails the whole report.
            pub fn evaluate(&self) -> CalcResult<Report> {
                let report = match self {
                    $( Calculator::$variant(input) => input.evaluate()?, )*
                };
                if let Some(figure) = report.non_finite() {
                    debug!("{}: {} is {}", report.title, figure.label, figure.value);
                    return Err(DomainError::NonFiniteResult { what: "result" }.into());
                }
                Ok(report)
            }
        }
    };
}

registry! {
    /// Systematic Investment Plan with monthly contributions
    Sip(SipInput) => "sip", "SIP Wealth", Investments,
        "Systematic Investment Plan calculator";
    /// SIP whose contribution rises every year
    StepUpSip(StepUpSipInput) => "step-up-sip", "Step-up SIP", Investments,
        "SIP with an annual increase in contribution";
    /// One-time investment compounded yearly
    Lumpsum(LumpsumInput) => "lumpsum", "Lumpsum", Investments,
        "One-time investment growth";
    /// Fixed deposit maturity
    Fd(DepositInput) => "fd", "FD Calc", Investments,
        "Fixed Deposit maturity calculator";
    /// Recurring deposit maturity
    Rd(RecurringDepositInput) => "rd", "RD Calc", Investments,
        "Recurring Deposit planner";
    /// Public Provident Fund maturity
    Ppf(PpfInput) => "ppf", "PPF Calc", Investments,
        "Public Provident Fund estimator";
    /// Certificate of deposit returns
    Cd(CertificateInput) => "cd", "CD Calc", Investments,
        "Certificate of Deposit returns";
    /// Crypto trade profit after exchange fees
    Crypto(CryptoInput) => "crypto", "Crypto Calc", Investments,
        "Profit/Loss calculator with exchange fees";
    /// Compound annual growth rate
    Cagr(CagrInput) => "cagr", "CAGR", Investments,
        "Compound Annual Growth Rate";
    /// Return on investment
    Roi(RoiInput) => "roi", "ROI", Investments,
        "Return on Investment calculator";
    /// Years to double your money
    #[command(name = "rule72", alias = "rule-of-72")]
    Rule72(Rule72Input) => "rule72", "Rule of 72", Investments,
        "Years to double your money";
    /// Simple (non-compounding) interest
    #[command(alias = "simple")]
    SimpleInterest(SimpleInterestInput) => "simple-interest", "Simple Int", Investments,
        "Basic interest calculator";

    /// Split income into needs, wants and savings
    Budget(BudgetInput) => "budget", "Budget 50/30/20", Planning,
        "Smart budget allocation tool";
    /// Corpus needed for financial independence
    Fire(FireInput) => "fire", "FIRE Calc", Planning,
        "Financial Independence Retire Early";
    /// Corpus needed at retirement
    Retirement(RetirementInput) => "retirement", "Retirement", Planning,
        "Corpus needed for retirement";
    /// Emergency fund size
    Emergency(EmergencyInput) => "emergency", "Emergency Fund", Planning,
        "Safety net calculator";
    /// Monthly saving needed to reach a target
    Goal(GoalInput) => "goal", "Goal Planner", Planning,
        "Monthly savings for a target";
    /// Assets minus liabilities
    #[command(alias = "networth")]
    NetWorth(NetWorthInput) => "net-worth", "Net Worth", Planning,
        "Assets vs Liabilities";
    /// Salary converted across pay periods
    Salary(SalaryInput) => "salary", "Salary Breakdown", Planning,
        "Hourly to Yearly converter";
    /// Gross rental yield of a property
    #[command(alias = "rental")]
    RentalYield(RentalYieldInput) => "rental-yield", "Rental Yield", Planning,
        "Property return calculator";
    /// Dividend yield of a stock
    #[command(alias = "dividend")]
    DividendYield(DividendYieldInput) => "dividend-yield", "Div. Yield", Planning,
        "Stock dividend return";
    /// Real estate capitalization rate
    #[command(alias = "caprate")]
    CapRate(CapRateInput) => "cap-rate", "Cap Rate", Planning,
        "Real estate capitalization rate";

    /// Loan EMI with interest breakdown
    Emi(EmiInput) => "emi", "EMI Advanced", Loans,
        "Loan EMI with Interest breakdown";
    /// Monthly mortgage payment
    Mortgage(MortgageInput) => "mortgage", "Mortgage", Loans,
        "Home loan estimator";
    /// Maximum loan affordable on an income
    #[command(alias = "loan_elig")]
    LoanEligibility(LoanEligibilityInput) => "loan-eligibility", "Loan Eligibility", Loans,
        "Max loan amount estimator";
    /// Months needed to clear a debt
    #[command(alias = "debt_pay")]
    DebtPayoff(DebtPayoffInput) => "debt-payoff", "Debt Payoff", Loans,
        "Time to become debt free";

    /// Units to sell to cover fixed costs
    #[command(alias = "breakeven")]
    BreakEven(BreakEvenInput) => "break-even", "Break Even", Business,
        "Units to sell to cover costs";
    /// Gross profit margin
    Margin(MarginInput) => "margin", "Margin", Business,
        "Gross profit margin";

    /// Convert between currencies at fixed rates
    Currency(CurrencyInput) => "currency", "Currency Conv.", Daily,
        "Multi-currency converter";
    /// Fuel cost of a trip
    Fuel(FuelInput) => "fuel", "Fuel Trip", Daily,
        "Trip cost estimator";
    /// Sale price after a discount
    Discount(DiscountInput) => "discount", "Discount", Daily,
        "Sale price calculator";
    /// Tip and bill split
    Tip(TipInput) => "tip", "Tip Calc", Daily,
        "Bill splitter and tip";
    /// Income tax estimate
    Tax(TaxInput) => "tax", "Tax Est", Daily,
        "Income tax estimator";
    /// Price including GST
    Gst(SalesTaxInput) => "gst", "GST Calc", Daily,
        "Goods and Services Tax";
    /// Price including VAT
    Vat(VatInput) => "vat", "VAT Calc", Daily,
        "Value Added Tax";
    /// Future cost under inflation
    Inflation(InflationInput) => "inflation", "Inflation", Daily,
        "Future value of money";
    /// Compare the unit price of two offers
    UnitPrice(UnitPriceInput) => "unit-price", "Unit Price", Daily,
        "Which pack is cheaper per unit";
}

impl ToolKind {
    pub fn in_group(group: ToolGroup) -> impl Iterator<Item = ToolKind> {
        ToolKind::ALL
            .iter()
            .copied()
            .filter(move |kind| kind.info().group == group)
    }
}

fn money(label: &str, value: f64) -> Figure {
    Figure::new(label, value, Unit::Money)
}

fn percent(label: &str, value: f64) -> Figure {
    Figure::new(label, value, Unit::Percent)
}

// --- Investments ---

#[derive(Debug, Clone, PartialEq, Args)]
pub struct SipInput {
    /// Monthly investment
    #[arg(long, default_value_t = 5000.0)]
    pub monthly: f64,
    /// Expected annual return (%)
    #[arg(long, default_value_t = 12.0)]
    pub rate: f64,
    /// Time period in years
    #[arg(long, default_value_t = 10.0)]
    pub years: f64,
}

impl Tool for SipInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let annuity = AnnuityInput {
            contribution: self.monthly,
            annual_rate_percent: self.rate,
            periods: non_negative("years", self.years)? * 12.0,
            unit: PeriodUnit::Month,
        };
        let value = annuity.future_value()?;
        let invested = annuity.invested();
        Ok(Report::new("SIP Wealth", money("Total value", value))
            .with_detail("Invested amount", invested, Unit::Money)
            .with_detail("Wealth gained", value - invested, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct StepUpSipInput {
    /// Starting monthly investment
    #[arg(long, default_value_t = 5000.0)]
    pub monthly: f64,
    /// Expected annual return (%)
    #[arg(long, default_value_t = 12.0)]
    pub rate: f64,
    /// Time period in whole years
    #[arg(long, default_value_t = 10.0)]
    pub years: f64,
    /// Yearly increase in the monthly investment (%)
    #[arg(long, default_value_t = 10.0)]
    pub step_up: f64,
}

impl Tool for StepUpSipInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let result = formula::step_up_sip(self.monthly, self.rate, self.years, self.step_up)?;
        Ok(Report::new("Step-up SIP", money("Total value", result.value))
            .with_detail("Invested amount", result.invested, Unit::Money)
            .with_detail("Wealth gained", result.value - result.invested, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct LumpsumInput {
    /// One-time investment
    #[arg(long, default_value_t = 100000.0)]
    pub amount: f64,
    /// Expected annual return (%)
    #[arg(long, default_value_t = 12.0)]
    pub rate: f64,
    /// Time period in years
    #[arg(long, default_value_t = 10.0)]
    pub years: f64,
}

impl Tool for LumpsumInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let value = LumpSumInput {
            principal: self.amount,
            annual_rate_percent: self.rate,
            years: self.years,
        }
        .future_value()?;
        Ok(Report::new("Lumpsum", money("Total value", value))
            .with_detail("Invested amount", self.amount, Unit::Money)
            .with_detail("Wealth gained", value - self.amount, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct DepositInput {
    /// Deposit amount
    #[arg(long, default_value_t = 10000.0)]
    pub deposit: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 6.5)]
    pub rate: f64,
    /// Tenure in years
    #[arg(long, default_value_t = 5.0)]
    pub years: f64,
}

impl Tool for DepositInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let value = LumpSumInput {
            principal: self.deposit,
            annual_rate_percent: self.rate,
            years: self.years,
        }
        .future_value()?;
        Ok(Report::new("FD Calc", money("Maturity value", value)).with_detail(
            "Interest",
            value - self.deposit,
            Unit::Money,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct RecurringDepositInput {
    /// Monthly deposit
    #[arg(long, default_value_t = 5000.0)]
    pub monthly: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 7.0)]
    pub rate: f64,
    /// Tenure in years
    #[arg(long, default_value_t = 5.0)]
    pub years: f64,
}

impl Tool for RecurringDepositInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let annuity = AnnuityInput {
            contribution: self.monthly,
            annual_rate_percent: self.rate,
            periods: non_negative("years", self.years)? * 12.0,
            unit: PeriodUnit::Month,
        };
        let value = annuity.future_value()?;
        let invested = annuity.invested();
        Ok(Report::new("RD Calc", money("Maturity value", value))
            .with_detail("Invested", invested, Unit::Money)
            .with_detail("Interest", value - invested, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct PpfInput {
    /// Yearly investment
    #[arg(long, default_value_t = 100000.0)]
    pub yearly: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 7.1)]
    pub rate: f64,
    /// Lock-in period in years
    #[arg(long, default_value_t = 15.0)]
    pub years: f64,
}

impl Tool for PpfInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let annuity = AnnuityInput {
            contribution: self.yearly,
            annual_rate_percent: self.rate,
            periods: self.years,
            unit: PeriodUnit::Year,
        };
        let value = annuity.future_value()?;
        let invested = annuity.invested();
        Ok(Report::new("PPF Calc", money("Maturity value", value))
            .with_detail("Total invested", invested, Unit::Money)
            .with_detail("Interest", value - invested, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct CertificateInput {
    /// Deposit amount
    #[arg(long, default_value_t = 10000.0)]
    pub deposit: f64,
    /// Annual percentage yield (%)
    #[arg(long, default_value_t = 5.0)]
    pub apy: f64,
    /// Term in years
    #[arg(long, default_value_t = 3.0)]
    pub years: f64,
}

impl Tool for CertificateInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let value = LumpSumInput {
            principal: self.deposit,
            annual_rate_percent: self.apy,
            years: self.years,
        }
        .future_value()?;
        Ok(Report::new("CD Calc", money("Maturity value", value)).with_detail(
            "Profit",
            value - self.deposit,
            Unit::Money,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct CryptoInput {
    /// Buy price per coin
    #[arg(long, default_value_t = 50000.0)]
    pub buy: f64,
    /// Sell price per coin
    #[arg(long, default_value_t = 55000.0)]
    pub sell: f64,
    /// Number of coins
    #[arg(long, default_value_t = 0.5)]
    pub quantity: f64,
    /// Exchange fee per trade (%)
    #[arg(long, default_value_t = 0.1)]
    pub fee: f64,
}

impl Tool for CryptoInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let quantity = non_negative("quantity", self.quantity)?;
        let fee = non_negative("fee", self.fee)?;
        let cost = non_negative("buy price", self.buy)? * quantity;
        let revenue = non_negative("sell price", self.sell)? * quantity;
        let fees = cost * fee / 100.0 + revenue * fee / 100.0;
        let profit = revenue - cost - fees;
        let roi = formula::roi(cost, revenue - fees)?;
        Ok(Report::new("Crypto Calc", money("Net profit (after fees)", profit))
            .with_detail("ROI", roi, Unit::Percent)
            .with_detail("Total fees", fees, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct CagrInput {
    /// Starting value
    #[arg(long, default_value_t = 10000.0)]
    pub start: f64,
    /// Ending value
    #[arg(long, default_value_t = 20000.0)]
    pub end: f64,
    /// Number of years
    #[arg(long, default_value_t = 5.0)]
    pub years: f64,
}

impl Tool for CagrInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let rate = GrowthInput {
            start_value: self.start,
            end_value: self.end,
            periods: self.years,
        }
        .cagr()?;
        Ok(Report::new("CAGR %", percent("CAGR", rate)).with_note("Annual Growth Rate"))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct RoiInput {
    /// Amount invested
    #[arg(long, default_value_t = 50000.0)]
    pub invested: f64,
    /// Amount returned
    #[arg(long, default_value_t = 65000.0)]
    pub returned: f64,
}

impl Tool for RoiInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let roi = formula::roi(self.invested, self.returned)?;
        Ok(Report::new("ROI %", percent("ROI", roi)).with_detail(
            "Profit",
            self.returned - self.invested,
            Unit::Money,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct Rule72Input {
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 12.0)]
    pub rate: f64,
}

impl Tool for Rule72Input {
    fn evaluate(&self) -> CalcResult<Report> {
        let years = formula::rule_of_72(self.rate)?;
        Ok(
            Report::new("Rule of 72", Figure::new("Years to double", years, Unit::Years))
                .with_note("At compound interest"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct SimpleInterestInput {
    /// Principal amount
    #[arg(long, default_value_t = 10000.0)]
    pub principal: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 5.0)]
    pub rate: f64,
    /// Time in years
    #[arg(long, default_value_t = 2.0)]
    pub years: f64,
}

impl Tool for SimpleInterestInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let interest = formula::simple_interest(self.principal, self.rate, self.years)?;
        Ok(
            Report::new("Simple Int", money("Total amount", self.principal + interest))
                .with_detail("Interest", interest, Unit::Money),
        )
    }
}

// --- Planning ---

#[derive(Debug, Clone, PartialEq, Args)]
pub struct BudgetInput {
    /// Monthly take-home income
    #[arg(long, default_value_t = 5000.0)]
    pub income: f64,
    /// Share for needs (%)
    #[arg(long, default_value_t = 50.0)]
    pub needs: f64,
    /// Share for wants (%)
    #[arg(long, default_value_t = 30.0)]
    pub wants: f64,
    /// Share for savings (%)
    #[arg(long, default_value_t = 20.0)]
    pub savings: f64,
}

impl Tool for BudgetInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let income = non_negative("income", self.income)?;
        let needs = non_negative("needs", self.needs)?;
        let wants = non_negative("wants", self.wants)?;
        let savings = non_negative("savings", self.savings)?;
        let total = needs + wants + savings;
        if (total - 100.0).abs() > 1e-9 {
            return Err(InputError::Invalid {
                field: "budget split",
                reason: format!("shares add up to {total}%, not 100%"),
            }
            .into());
        }

        Ok(Report::new(
            format!("Budget {needs}/{wants}/{savings}"),
            money("Needs", income * needs / 100.0),
        )
        .with_detail("Wants", income * wants / 100.0, Unit::Money)
        .with_detail("Savings", income * savings / 100.0, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct FireInput {
    /// Annual expenses
    #[arg(long, default_value_t = 40000.0)]
    pub annual_expense: f64,
    /// Multiple of annual expenses to hold (25 is a 4% withdrawal rate)
    #[arg(long, default_value_t = 25.0)]
    pub multiple: f64,
}

impl Tool for FireInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let expense = non_negative("annual expense", self.annual_expense)?;
        let multiple = non_negative("multiple", self.multiple)?;
        Ok(
            Report::new("FIRE Calc", money("FIRE number", expense * multiple))
                .with_note("Corpus for financial independence"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct RetirementInput {
    /// Current monthly expenses
    #[arg(long, default_value_t = 3000.0)]
    pub monthly_expense: f64,
    /// Current age
    #[arg(long, default_value_t = 30.0)]
    pub current_age: f64,
    /// Planned retirement age
    #[arg(long, default_value_t = 60.0)]
    pub retire_age: f64,
    /// Expected annual inflation (%)
    #[arg(long, default_value_t = 6.0)]
    pub inflation: f64,
    /// Years the corpus must last after retiring
    #[arg(long, default_value_t = 20.0)]
    pub years_in_retirement: f64,
}

impl Tool for RetirementInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let current_age = non_negative("current age", self.current_age)?;
        let retire_age = non_negative("retire age", self.retire_age)?;
        if retire_age < current_age {
            return Err(InputError::Invalid {
                field: "retire age",
                reason: "must not be before the current age".to_string(),
            }
            .into());
        }
        let years_to_go = retire_age - current_age;
        let years_after = non_negative("years in retirement", self.years_in_retirement)?;

        let monthly_then = formula::future_value_lump_sum(
            self.monthly_expense,
            self.inflation / 100.0,
            years_to_go,
        )?;
        let corpus = monthly_then * 12.0 * years_after;
        Ok(Report::new("Retirement", money("Corpus needed", corpus))
            .with_detail("Monthly expense at retirement", monthly_then, Unit::Money)
            .with_detail("Years to retirement", years_to_go, Unit::Years)
            .with_note(format!("For {years_after} years post-retirement")))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct EmergencyInput {
    /// Monthly expenses
    #[arg(long, default_value_t = 3000.0)]
    pub monthly_expense: f64,
    /// Months of expenses to cover
    #[arg(long, default_value_t = 6.0)]
    pub months: f64,
}

impl Tool for EmergencyInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let expense = non_negative("monthly expense", self.monthly_expense)?;
        let months = non_negative("months", self.months)?;
        Ok(
            Report::new("Emergency Fund", money("Emergency fund", expense * months))
                .with_detail("Coverage", months, Unit::Months)
                .with_note("Keep in liquid assets"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct GoalInput {
    /// Target amount
    #[arg(long, default_value_t = 100000.0)]
    pub target: f64,
    /// Years to reach the target
    #[arg(long, default_value_t = 5.0)]
    pub years: f64,
    /// Expected annual return (%)
    #[arg(long, default_value_t = 10.0)]
    pub rate: f64,
}

impl Tool for GoalInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let months = non_negative("years", self.years)? * 12.0;
        let monthly = formula::required_contribution(
            self.target,
            PeriodUnit::Month.rate_per_period(self.rate),
            months,
        )?;
        Ok(Report::new("Goal Planner", money("Monthly saving", monthly))
            .with_detail("Total invested", monthly * months, Unit::Money)
            .with_note("To reach goal on time"))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct NetWorthInput {
    /// Total assets
    #[arg(long, default_value_t = 500000.0)]
    pub assets: f64,
    /// Total liabilities
    #[arg(long, default_value_t = 200000.0)]
    pub liabilities: f64,
}

impl Tool for NetWorthInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let assets = non_negative("assets", self.assets)?;
        let liabilities = non_negative("liabilities", self.liabilities)?;
        let net = assets - liabilities;
        let note = if net > 0.0 { "Positive Equity" } else { "In Debt" };
        Ok(Report::new("Net Worth", money("Net worth", net)).with_note(note))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct SalaryInput {
    /// Salary amount
    #[arg(long, default_value_t = 50000.0)]
    pub amount: f64,
    /// Period the amount is quoted for
    #[arg(long, value_enum, default_value_t = PayPeriod::Year)]
    pub per: PayPeriod,
}

impl Tool for SalaryInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let b = formula::salary_breakdown(self.amount, self.per)?;
        Ok(Report::new("Salary Breakdown", money("Yearly", b.yearly))
            .with_detail("Monthly", b.monthly, Unit::Money)
            .with_detail("Bi-Weekly", b.bi_weekly, Unit::Money)
            .with_detail("Weekly", b.weekly, Unit::Money)
            .with_detail("Daily", b.daily, Unit::Money)
            .with_detail("Hourly", b.hourly, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct RentalYieldInput {
    /// Property cost
    #[arg(long, default_value_t = 200000.0)]
    pub property_cost: f64,
    /// Monthly rent
    #[arg(long, default_value_t = 1500.0)]
    pub monthly_rent: f64,
}

impl Tool for RentalYieldInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let rent = non_negative("monthly rent", self.monthly_rent)?;
        let yield_pct = formula::percentage_of(rent * 12.0, self.property_cost)?;
        Ok(Report::new("Rental Yield", percent("Rental yield", yield_pct))
            .with_detail("Annual rent", rent * 12.0, Unit::Money)
            .with_note("Gross Annual Yield %"))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct DividendYieldInput {
    /// Share price
    #[arg(long, default_value_t = 100.0)]
    pub share_price: f64,
    /// Annual dividend per share
    #[arg(long, default_value_t = 5.0)]
    pub annual_dividend: f64,
}

impl Tool for DividendYieldInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let yield_pct = formula::percentage_of(self.annual_dividend, self.share_price)?;
        Ok(
            Report::new("Div. Yield", percent("Dividend yield", yield_pct))
                .with_note("Return on stock price"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct CapRateInput {
    /// Net operating income per year
    #[arg(long, default_value_t = 30000.0)]
    pub net_operating_income: f64,
    /// Property value
    #[arg(long, default_value_t = 500000.0)]
    pub property_value: f64,
}

impl Tool for CapRateInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let rate = formula::percentage_of(self.net_operating_income, self.property_value)?;
        Ok(Report::new("Cap Rate", percent("Cap rate", rate)).with_note("Capitalization Rate %"))
    }
}

// --- Loans ---

fn loan_report(title: &str, principal: f64, annual_rate: f64, months: f64) -> CalcResult<Report> {
    let summary = LoanInput {
        principal,
        annual_rate_percent: annual_rate,
        term_months: months,
    }
    .summary()?;
    Ok(Report::new(title, money("Monthly payment", summary.payment))
        .with_detail("Principal", principal, Unit::Money)
        .with_detail("Total interest", summary.total_interest, Unit::Money)
        .with_detail("Total payment", summary.total_payment, Unit::Money)
        .with_detail("Tenure", months, Unit::Months))
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct EmiInput {
    /// Loan amount
    #[arg(long, default_value_t = 500000.0)]
    pub principal: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 9.5)]
    pub rate: f64,
    /// Tenure in years
    #[arg(long, default_value_t = 5.0)]
    pub years: f64,
    /// Tenure in months; overrides --years
    #[arg(long)]
    pub months: Option<f64>,
}

impl Tool for EmiInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let months = match self.months {
            Some(months) => non_negative("months", months)?,
            None => non_negative("years", self.years)? * 12.0,
        };
        loan_report("EMI Advanced", self.principal, self.rate, months)
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct MortgageInput {
    /// Loan amount
    #[arg(long, default_value_t = 300000.0)]
    pub loan: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 6.5)]
    pub rate: f64,
    /// Term in years
    #[arg(long, default_value_t = 30.0)]
    pub years: f64,
}

impl Tool for MortgageInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let months = non_negative("years", self.years)? * 12.0;
        loan_report("Mortgage", self.loan, self.rate, months)
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct LoanEligibilityInput {
    /// Net monthly income
    #[arg(long, default_value_t = 50000.0)]
    pub income: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 8.5)]
    pub rate: f64,
    /// Tenure in years
    #[arg(long, default_value_t = 20.0)]
    pub years: f64,
    /// EMIs already being paid each month
    #[arg(long, default_value_t = 0.0)]
    pub existing_emi: f64,
    /// Share of income lenders allow for EMIs (%)
    #[arg(long, default_value_t = 50.0)]
    pub max_income_share: f64,
}

impl Tool for LoanEligibilityInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let income = non_negative("income", self.income)?;
        let existing = non_negative("existing EMI", self.existing_emi)?;
        let share = non_negative("income share", self.max_income_share)?;
        let months = non_negative("years", self.years)? * 12.0;

        let max_emi = income * share / 100.0 - existing;
        let max_loan = if max_emi > 0.0 {
            formula::present_value_of_annuity(
                max_emi,
                PeriodUnit::Month.rate_per_period(self.rate),
                months,
            )?
        } else {
            0.0
        };
        Ok(
            Report::new("Loan Eligibility", money("Max eligible loan", max_loan)).with_detail(
                "Max affordable EMI",
                max_emi.max(0.0),
                Unit::Money,
            ),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct DebtPayoffInput {
    /// Outstanding balance
    #[arg(long, default_value_t = 5000.0)]
    pub balance: f64,
    /// Annual interest rate (%)
    #[arg(long, default_value_t = 18.0)]
    pub rate: f64,
    /// Monthly payment
    #[arg(long, default_value_t = 200.0)]
    pub monthly_payment: f64,
}

impl Tool for DebtPayoffInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let months = formula::months_to_payoff(self.balance, self.rate, self.monthly_payment)?;
        Ok(Report::new(
            "Debt Payoff",
            Figure::new("Months to payoff", months, Unit::Months),
        )
        .with_detail("Years", months / 12.0, Unit::Years))
    }
}

// --- Business ---

#[derive(Debug, Clone, PartialEq, Args)]
pub struct BreakEvenInput {
    /// Fixed costs
    #[arg(long, default_value_t = 1000.0)]
    pub fixed_cost: f64,
    /// Selling price per unit
    #[arg(long, default_value_t = 50.0)]
    pub price: f64,
    /// Variable cost per unit
    #[arg(long, default_value_t = 20.0)]
    pub variable_cost: f64,
}

impl Tool for BreakEvenInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let units = formula::break_even_units(self.fixed_cost, self.price, self.variable_cost)?;
        Ok(Report::new(
            "Break Even",
            Figure::new("Break-even units", units, Unit::Units),
        )
        .with_detail("Break-even revenue", units * self.price, Unit::Money)
        .with_note("Units to sell to cover costs"))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct MarginInput {
    /// Cost of goods
    #[arg(long, default_value_t = 50.0)]
    pub cost: f64,
    /// Revenue
    #[arg(long, default_value_t = 100.0)]
    pub revenue: f64,
}

impl Tool for MarginInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let margin = formula::gross_margin(self.cost, self.revenue)?;
        Ok(Report::new("Margin", percent("Gross margin", margin))
            .with_detail("Gross profit", self.revenue - self.cost, Unit::Money)
            .with_note("Profitability Ratio"))
    }
}

// --- Daily utility ---

#[derive(Debug, Clone, PartialEq, Args)]
pub struct CurrencyInput {
    /// Amount to convert
    #[arg(long, default_value_t = 1.0)]
    pub amount: f64,
    /// Source currency
    #[arg(long, value_enum, ignore_case = true, default_value_t = CurrencyCode::USD)]
    pub from: CurrencyCode,
    /// Target currency
    #[arg(long, value_enum, ignore_case = true, default_value_t = CurrencyCode::INR)]
    pub to: CurrencyCode,
}

impl Tool for CurrencyInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let amount = non_negative("amount", self.amount)?;
        let converted = currency::convert(amount, self.from, self.to);
        Ok(Report::new(
            "Currency Conv.",
            Figure::new("Converted", converted, Unit::Currency(self.to)),
        )
        .with_detail("Amount", amount, Unit::Currency(self.from))
        .with_detail(
            format!("Rate ({} → {})", self.from, self.to),
            currency::exchange_rate(self.from, self.to),
            Unit::Number,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct FuelInput {
    /// Trip distance (km)
    #[arg(long, default_value_t = 100.0)]
    pub distance: f64,
    /// Fuel efficiency (km per litre)
    #[arg(long, default_value_t = 15.0)]
    pub mileage: f64,
    /// Fuel price per litre
    #[arg(long, default_value_t = 100.0)]
    pub price: f64,
}

impl Tool for FuelInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let distance = non_negative("distance", self.distance)?;
        let mileage = non_negative("mileage", self.mileage)?;
        let price = non_negative("fuel price", self.price)?;
        if mileage == 0.0 {
            return Err(DomainError::DivisionByZero { what: "mileage" }.into());
        }
        let litres = distance / mileage;
        Ok(Report::new("Fuel Trip", money("Trip cost", litres * price)).with_detail(
            "Fuel required",
            litres,
            Unit::Litres,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct DiscountInput {
    /// Original price
    #[arg(long, default_value_t = 500.0)]
    pub price: f64,
    /// Discount (%)
    #[arg(long, default_value_t = 20.0)]
    pub discount: f64,
}

impl Tool for DiscountInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let discounted = formula::apply_discount(self.price, self.discount)?;
        Ok(
            Report::new("Discount", money("Discounted price", discounted)).with_detail(
                "You save",
                self.price - discounted,
                Unit::Money,
            ),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct TipInput {
    /// Bill amount
    #[arg(long, default_value_t = 50.0)]
    pub bill: f64,
    /// Tip (%)
    #[arg(long, default_value_t = 15.0)]
    pub tip: f64,
    /// Number of people splitting the bill
    #[arg(long, default_value_t = 1.0)]
    pub people: f64,
}

impl Tool for TipInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let total = formula::add_percentage(self.bill, self.tip)?;
        let people = non_negative("people", self.people)?;
        if people == 0.0 {
            return Err(DomainError::DivisionByZero { what: "people" }.into());
        }
        Ok(Report::new("Tip Calc", money("Total bill", total))
            .with_detail("Tip", total - self.bill, Unit::Money)
            .with_detail("Per person", total / people, Unit::Money))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct TaxInput {
    /// Annual gross income
    #[arg(long, default_value_t = 60000.0)]
    pub income: f64,
}

impl Tool for TaxInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let tax = formula::progressive_tax(self.income, &formula::DEFAULT_TAX_BRACKETS)?;
        let effective = if self.income > 0.0 {
            formula::percentage_of(tax, self.income)?
        } else {
            0.0
        };
        Ok(Report::new("Tax Est", money("Est. annual tax", tax))
            .with_detail("Effective rate", effective, Unit::Percent)
            .with_detail("Net monthly pay", (self.income - tax) / 12.0, Unit::Money))
    }
}

fn sales_tax_report(title: &str, price: f64, rate: f64) -> CalcResult<Report> {
    let total = formula::add_percentage(price, rate)?;
    Ok(Report::new(title, money("Final amount", total)).with_detail(
        "Tax",
        total - price,
        Unit::Money,
    ))
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct SalesTaxInput {
    /// Price before tax
    #[arg(long, default_value_t = 1000.0)]
    pub price: f64,
    /// GST rate (%)
    #[arg(long, default_value_t = 18.0)]
    pub rate: f64,
}

impl Tool for SalesTaxInput {
    fn evaluate(&self) -> CalcResult<Report> {
        sales_tax_report("GST Calc", self.price, self.rate)
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct VatInput {
    /// Price before tax
    #[arg(long, default_value_t = 100.0)]
    pub price: f64,
    /// VAT rate (%)
    #[arg(long, default_value_t = 20.0)]
    pub rate: f64,
}

impl Tool for VatInput {
    fn evaluate(&self) -> CalcResult<Report> {
        sales_tax_report("VAT Calc", self.price, self.rate)
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct InflationInput {
    /// Current cost
    #[arg(long, default_value_t = 1000.0)]
    pub cost: f64,
    /// Annual inflation (%)
    #[arg(long, default_value_t = 6.0)]
    pub rate: f64,
    /// Years ahead
    #[arg(long, default_value_t = 10.0)]
    pub years: f64,
}

impl Tool for InflationInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let future = LumpSumInput {
            principal: self.cost,
            annual_rate_percent: self.rate,
            years: self.years,
        }
        .future_value()?;
        Ok(Report::new("Inflation", money("Future cost", future))
            .with_note("Effect of purchasing power loss"))
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct UnitPriceInput {
    /// Price of the first offer
    #[arg(long, default_value_t = 100.0)]
    pub first_price: f64,
    /// Quantity in the first offer
    #[arg(long, default_value_t = 500.0)]
    pub first_quantity: f64,
    /// Price of the second offer
    #[arg(long, default_value_t = 180.0)]
    pub second_price: f64,
    /// Quantity in the second offer
    #[arg(long, default_value_t = 1000.0)]
    pub second_quantity: f64,
}

impl Tool for UnitPriceInput {
    fn evaluate(&self) -> CalcResult<Report> {
        let cmp = formula::compare_unit_prices(
            finite("first price", self.first_price)?,
            self.first_quantity,
            finite("second price", self.second_price)?,
            self.second_quantity,
        )?;
        let note = match cmp.better {
            BetterOffer::First => "The first offer is cheaper per unit",
            BetterOffer::Second => "The second offer is cheaper per unit",
            BetterOffer::Same => "Both offers cost the same per unit",
        };
        Ok(Report::new("Unit Price", percent("Saving per unit", cmp.saving_percent))
            .with_detail("First offer per unit", cmp.first, Unit::Money)
            .with_detail("Second offer per unit", cmp.second, Unit::Money)
            .with_note(note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CalcError;
    use clap::{Command, FromArgMatches};

    fn parse(args: &[&str]) -> Calculator {
        let cmd = Calculator::augment_subcommands(Command::new("calc"));
        let matches = cmd.try_get_matches_from(args).unwrap();
        Calculator::from_arg_matches(&matches).unwrap()
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn test_every_tool_has_a_subcommand() {
        let cmd = Calculator::augment_subcommands(Command::new("calc"));
        for kind in ToolKind::ALL {
            let info = kind.info();
            assert!(
                cmd.find_subcommand(info.id).is_some(),
                "no subcommand for {}",
                info.id
            );
        }
        assert_eq!(ToolKind::ALL.len(), 37);
    }

    #[test]
    fn test_every_tool_evaluates_with_defaults() {
        for kind in ToolKind::ALL {
            let id = kind.info().id;
            let calculator = parse(&["calc", id]);
            assert_eq!(calculator.kind(), *kind);
            let report = calculator
                .evaluate()
                .unwrap_or_else(|e| panic!("{id} failed with defaults: {e}"));
            assert!(report.headline.value.is_finite(), "{id}");
            assert!(report.details.iter().all(|f| f.value.is_finite()), "{id}");
        }
    }

    #[test]
    fn test_overflowing_figures_are_domain_errors() {
        let calculators = [
            Calculator::Fire(FireInput {
                annual_expense: 1e308,
                multiple: 25.0,
            }),
            Calculator::Emergency(EmergencyInput {
                monthly_expense: 1e308,
                months: 6.0,
            }),
            Calculator::Budget(BudgetInput {
                income: f64::MAX,
                needs: 50.0,
                wants: 30.0,
                savings: 20.0,
            }),
            Calculator::Tip(TipInput {
                bill: 50.0,
                tip: 15.0,
                people: 1e-320,
            }),
        ];
        for calculator in calculators {
            assert_eq!(
                calculator.evaluate().unwrap_err(),
                CalcError::Domain(DomainError::NonFiniteResult { what: "result" }),
                "{:?}",
                calculator.kind()
            );
        }
    }

    #[test]
    fn test_original_ids_are_aliases() {
        for (alias, kind) in [
            ("loan_elig", ToolKind::LoanEligibility),
            ("debt_pay", ToolKind::DebtPayoff),
            ("breakeven", ToolKind::BreakEven),
            ("networth", ToolKind::NetWorth),
            ("simple", ToolKind::SimpleInterest),
        ] {
            assert_eq!(parse(&["calc", alias]).kind(), kind);
        }
    }

    #[test]
    fn test_groups_partition_tools() {
        let total: usize = ToolGroup::ALL
            .iter()
            .map(|g| ToolKind::in_group(*g).count())
            .sum();
        assert_eq!(total, ToolKind::ALL.len());
        assert_eq!(ToolKind::in_group(ToolGroup::Business).count(), 2);
    }

    #[test]
    fn test_sip_defaults() {
        let report = parse(&["calc", "sip"]).evaluate().unwrap();
        assert_close(report.headline.value, 1_161_695.38, 0.01);
        assert_eq!(report.value("Invested amount"), Some(600_000.0));
        assert_close(report.value("Wealth gained").unwrap(), 561_695.38, 0.01);
    }

    #[test]
    fn test_emi_with_months() {
        let report = parse(&["calc", "emi", "--months", "60"]).evaluate().unwrap();
        assert_close(report.headline.value, 10_500.93, 0.01);
        assert_eq!(report.value("Tenure"), Some(60.0));
        assert_close(report.value("Total interest").unwrap(), 130_055.84, 0.01);
    }

    #[test]
    fn test_domain_errors_surface_as_errors() {
        let err = parse(&["calc", "roi", "--invested", "0"])
            .evaluate()
            .unwrap_err();
        assert!(err.is_domain());

        let err = parse(&["calc", "break-even", "--price", "20", "--variable-cost", "50"])
            .evaluate()
            .unwrap_err();
        assert!(matches!(err, CalcError::Domain(DomainError::NoSolution { .. })));

        let err = parse(&["calc", "debt-payoff", "--monthly-payment", "50"])
            .evaluate()
            .unwrap_err();
        assert_eq!(err.guidance(), "Increase the payment!");

        let err = parse(&["calc", "cagr", "--start=-100"]).evaluate().unwrap_err();
        assert!(matches!(
            err,
            CalcError::Domain(DomainError::UndefinedGrowth { .. })
        ));
    }

    #[test]
    fn test_budget_split_must_total_100() {
        let report = parse(&["calc", "budget", "--income", "4000"]).evaluate().unwrap();
        assert_eq!(report.headline.value, 2000.0);
        assert_eq!(report.value("Wants"), Some(1200.0));
        assert_eq!(report.value("Savings"), Some(800.0));

        let err = parse(&["calc", "budget", "--needs", "60"]).evaluate().unwrap_err();
        assert!(matches!(err, CalcError::Input(InputError::Invalid { .. })));
    }

    #[test]
    fn test_loan_eligibility() {
        let report = parse(&["calc", "loan-eligibility"]).evaluate().unwrap();
        assert_close(report.headline.value, 2_880_770.99, 0.01);
        assert_eq!(report.value("Max affordable EMI"), Some(25_000.0));

        let report = parse(&["calc", "loan-eligibility", "--existing-emi", "30000"])
            .evaluate()
            .unwrap();
        assert_eq!(report.headline.value, 0.0);
        assert_eq!(report.value("Max affordable EMI"), Some(0.0));
    }

    #[test]
    fn test_retirement_and_goal() {
        let report = parse(&["calc", "retirement"]).evaluate().unwrap();
        assert_close(report.headline.value, 4_135_313.64, 0.01);

        let report = parse(&["calc", "goal"]).evaluate().unwrap();
        assert_close(report.headline.value, 1_280.70, 0.01);

        let err = parse(&["calc", "retirement", "--retire-age", "20"])
            .evaluate()
            .unwrap_err();
        assert!(!err.is_domain());
    }

    #[test]
    fn test_currency_and_tax() {
        let report = parse(&["calc", "currency", "--amount", "2", "--from", "usd", "--to", "EUR"])
            .evaluate()
            .unwrap();
        assert_close(report.headline.value, 1.84, 1e-9);
        assert_eq!(report.headline.unit, Unit::Currency(CurrencyCode::EUR));

        let report = parse(&["calc", "tax"]).evaluate().unwrap();
        assert_eq!(report.headline.value, 7000.0);
        assert_close(report.value("Effective rate").unwrap(), 11.67, 0.01);
        assert_close(report.value("Net monthly pay").unwrap(), 4_416.67, 0.01);
    }

    #[test]
    fn test_tip_split_and_fuel_guards() {
        let report = parse(&["calc", "tip", "--bill", "100", "--people", "4"])
            .evaluate()
            .unwrap();
        assert_close(report.headline.value, 115.0, 1e-9);
        assert_close(report.value("Per person").unwrap(), 28.75, 1e-9);

        assert!(parse(&["calc", "tip", "--people", "0"]).evaluate().is_err());
        assert!(parse(&["calc", "fuel", "--mileage", "0"]).evaluate().is_err());
    }

    #[test]
    fn test_net_worth_note() {
        let report = parse(&["calc", "net-worth", "--assets", "100", "--liabilities", "200"])
            .evaluate()
            .unwrap();
        assert_eq!(report.headline.value, -100.0);
        assert_eq!(report.note.as_deref(), Some("In Debt"));
    }
}
