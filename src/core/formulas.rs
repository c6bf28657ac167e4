use super::error::CalcError;
use super::types::{
    EmiResult, FireResult, GoalPlanResult, GrowthResult, RetirementResult, SwpMonth, SwpResult,
};

/// Assumed annual return (percent) used to discount a coast-FIRE corpus
/// back from retirement age to the coast age.
const COAST_FIRE_RETURN_PCT: f64 = 8.0;

/// Lean / standard / fat FIRE corpus multiples of annual expenses.
const LEAN_FIRE_MULTIPLE: f64 = 15.0;
const STANDARD_FIRE_MULTIPLE: f64 = 20.0;
const FAT_FIRE_MULTIPLE: f64 = 25.0;

fn require(cond: bool, msg: &'static str) -> Result<(), CalcError> {
    if cond {
        Ok(())
    } else {
        Err(CalcError::InvalidInput(msg))
    }
}

fn require_non_negative(value: f64, msg: &'static str) -> Result<(), CalcError> {
    require(value.is_finite() && value >= 0.0, msg)
}

/// Compound annual growth rate in percent: `((maturity/initial)^(1/years) - 1) * 100`.
///
/// `initial` and `years` must be strictly positive; a zero maturity value is
/// allowed and yields -100%.
pub fn cagr(initial: f64, maturity: f64, years: f64) -> Result<f64, CalcError> {
    require(
        initial.is_finite() && initial > 0.0,
        "initial investment must be > 0",
    )?;
    require_non_negative(maturity, "maturity value must be >= 0")?;
    require(years.is_finite() && years > 0.0, "duration must be > 0")?;

    Ok(((maturity / initial).powf(1.0 / years) - 1.0) * 100.0)
}

/// Future value of a monthly SIP with an annual step-up.
///
/// Each elapsed year `y` contributes `monthly * 12 * (1 + step/100)^y`, and
/// that year's contribution compounds for the remaining `years - y` years.
/// `years == 0` is the empty schedule and returns all zeros.
pub fn sip_future_value(
    monthly_amount: f64,
    years: u32,
    annual_step_up_pct: f64,
    annual_return_pct: f64,
) -> Result<GrowthResult, CalcError> {
    require_non_negative(monthly_amount, "monthly investment must be >= 0")?;
    require_non_negative(annual_step_up_pct, "annual step-up must be >= 0")?;
    require_non_negative(annual_return_pct, "expected return must be >= 0")?;

    let step = 1.0 + annual_step_up_pct / 100.0;
    let growth = 1.0 + annual_return_pct / 100.0;

    let mut invested = 0.0;
    let mut future_value = 0.0;
    for year in 0..years {
        let yearly_investment = monthly_amount * 12.0 * step.powi(year as i32);
        invested += yearly_investment;
        future_value += yearly_investment * growth.powi((years - year) as i32);
    }

    Ok(GrowthResult {
        invested,
        future_value,
        returns: future_value - invested,
    })
}

/// Lump-sum compound interest: `P * (1 + r/n)^(n*t)`.
pub fn lumpsum_future_value(
    principal: f64,
    annual_return_pct: f64,
    years: f64,
    compounds_per_year: u32,
) -> Result<f64, CalcError> {
    require_non_negative(principal, "principal must be >= 0")?;
    require_non_negative(annual_return_pct, "rate of return must be >= 0")?;
    require_non_negative(years, "duration must be >= 0")?;
    require(compounds_per_year >= 1, "compounding frequency must be >= 1")?;

    let r = annual_return_pct / 100.0;
    let n = compounds_per_year as f64;
    Ok(principal * (1.0 + r / n).powf(n * years))
}

/// Equated monthly installment for a loan.
///
/// Monthly rate `r = rate/1200`, term `n = years * 12`. The zero-rate
/// limit is made explicit: with no interest the installment is simply
/// `principal / n`.
pub fn emi(principal: f64, annual_rate_pct: f64, years: f64) -> Result<EmiResult, CalcError> {
    require_non_negative(principal, "loan amount must be >= 0")?;
    require_non_negative(annual_rate_pct, "interest rate must be >= 0")?;
    require(years.is_finite() && years > 0.0, "loan tenure must be > 0")?;

    let months = years * 12.0;
    let installment = if annual_rate_pct == 0.0 {
        principal / months
    } else {
        let r = annual_rate_pct / 1200.0;
        let factor = (1.0 + r).powf(months);
        principal * r * factor / (factor - 1.0)
    };

    let total_amount = installment * months;
    Ok(EmiResult {
        emi: installment,
        total_interest: total_amount - principal,
        total_amount,
    })
}

/// Month-by-month systematic withdrawal simulation.
///
/// Each month accrues interest on the running balance first, then withdraws
/// `min(monthly_withdrawal, balance + interest)`. The schedule stops early
/// once the balance is exhausted. The accrue-then-withdraw order is load
/// bearing: swapping it changes every subsequent month.
pub fn swp_schedule(
    lump_sum: f64,
    monthly_withdrawal: f64,
    months: u32,
    annual_return_pct: f64,
) -> Result<SwpResult, CalcError> {
    require_non_negative(lump_sum, "lump sum must be >= 0")?;
    require_non_negative(monthly_withdrawal, "monthly withdrawal must be >= 0")?;
    require_non_negative(annual_return_pct, "expected return must be >= 0")?;

    let monthly_rate = annual_return_pct / 100.0 / 12.0;
    let mut balance = lump_sum;
    let mut total_withdrawn = 0.0;
    let mut schedule = Vec::new();

    for month in 1..=months {
        if balance <= 0.0 {
            break;
        }
        let interest = balance * monthly_rate;
        let after_interest = balance + interest;
        let withdrawal = monthly_withdrawal.min(after_interest);
        balance = after_interest - withdrawal;
        total_withdrawn += withdrawal;
        schedule.push(SwpMonth {
            month,
            interest,
            withdrawal,
            balance,
        });
    }

    Ok(SwpResult {
        total_withdrawn,
        remaining_balance: balance,
        months: schedule,
    })
}

/// Retirement corpus and the monthly saving needed to reach it.
///
/// Today's monthly expense is inflated to the retirement age, annuitized
/// over the post-retirement years with the present-value-of-annuity factor,
/// and the required monthly saving is the PMT that grows to that corpus
/// over the accumulation months. At a zero return rate both factors reduce
/// to their linear limits: corpus is the flat sum of post-retirement
/// expenses and the saving is an even split over the accumulation months.
pub fn retirement_plan(
    monthly_expense_today: f64,
    current_age: u32,
    retirement_age: u32,
    life_expectancy: u32,
    inflation_pct: f64,
    return_pct: f64,
) -> Result<RetirementResult, CalcError> {
    require_non_negative(monthly_expense_today, "monthly expense must be >= 0")?;
    require_non_negative(inflation_pct, "inflation rate must be >= 0")?;
    require_non_negative(return_pct, "return rate must be >= 0")?;
    require(
        retirement_age > current_age,
        "retirement age must be greater than current age",
    )?;
    require(
        life_expectancy > retirement_age,
        "life expectancy must be greater than retirement age",
    )?;
    let years_to_save = (retirement_age - current_age) as i32;
    let years_post_retirement = (life_expectancy - retirement_age) as i32;
    let inflation = inflation_pct / 100.0;
    let annual_return = return_pct / 100.0;

    let monthly_expense_at_retirement =
        monthly_expense_today * (1.0 + inflation).powi(years_to_save);
    let annual_expense_at_retirement = monthly_expense_at_retirement * 12.0;

    let saving_months = years_to_save * 12;
    let (corpus_required, monthly_savings_required) = if return_pct == 0.0 {
        // Zero-rate limit: no growth either side of retirement, so the
        // corpus is the flat sum of post-retirement expenses and the
        // saving is an even split of it.
        let corpus = annual_expense_at_retirement * years_post_retirement as f64;
        (corpus, corpus / saving_months as f64)
    } else {
        let corpus = annual_expense_at_retirement
            * ((1.0 - (1.0 + annual_return).powi(-years_post_retirement)) / annual_return);

        let monthly_return = annual_return / 12.0;
        let savings =
            corpus * monthly_return / ((1.0 + monthly_return).powi(saving_months) - 1.0);
        (corpus, savings)
    };

    Ok(RetirementResult {
        corpus_required,
        monthly_savings_required,
    })
}

/// Lean / standard / fat / coast FIRE corpus targets.
///
/// The inflated annual expense at retirement is multiplied by the fixed
/// 15x / 20x / 25x multiples; the coast target discounts the lean-style
/// corpus back to the coast age at the assumed 8% return.
pub fn fire_targets(
    monthly_expense: f64,
    years_to_retirement: u32,
    years_to_coast: u32,
    inflation_pct: f64,
) -> Result<FireResult, CalcError> {
    require_non_negative(monthly_expense, "monthly expense must be >= 0")?;
    require_non_negative(inflation_pct, "inflation rate must be >= 0")?;
    require(
        years_to_coast <= years_to_retirement,
        "coast age cannot be past the retirement age",
    )?;

    let inflation = 1.0 + inflation_pct / 100.0;
    let annual_expense_at_retirement =
        monthly_expense * 12.0 * inflation.powi(years_to_retirement as i32);

    let coast_discount = (1.0 + COAST_FIRE_RETURN_PCT / 100.0).powi(years_to_coast as i32);

    Ok(FireResult {
        lean: annual_expense_at_retirement * LEAN_FIRE_MULTIPLE,
        standard: annual_expense_at_retirement * STANDARD_FIRE_MULTIPLE,
        fat: annual_expense_at_retirement * FAT_FIRE_MULTIPLE,
        coast: annual_expense_at_retirement / coast_discount * LEAN_FIRE_MULTIPLE,
    })
}

/// Monthly investment required to reach an inflation-adjusted goal.
///
/// Returns a zero requirement (not an error) when the grown existing
/// investment already covers the inflated goal, or when the monthly rate
/// is zero.
pub fn goal_planning(
    goal_today: f64,
    existing_investment: f64,
    years: u32,
    inflation_pct: f64,
    return_pct: f64,
) -> Result<GoalPlanResult, CalcError> {
    require_non_negative(goal_today, "financial goal must be >= 0")?;
    require_non_negative(existing_investment, "existing investment must be >= 0")?;
    require_non_negative(inflation_pct, "inflation rate must be >= 0")?;
    require_non_negative(return_pct, "expected return must be >= 0")?;
    require(years >= 1, "years to goal must be >= 1")?;

    let future_goal = goal_today * (1.0 + inflation_pct / 100.0).powi(years as i32);
    let future_existing = existing_investment * (1.0 + return_pct / 100.0).powi(years as i32);

    let monthly_rate = return_pct / 100.0 / 12.0;
    let periods = (years * 12) as i32;
    let shortfall = future_goal - future_existing;

    let monthly_required = if shortfall <= 0.0 || monthly_rate == 0.0 {
        0.0
    } else {
        shortfall * monthly_rate / ((1.0 + monthly_rate).powi(periods) - 1.0)
    };

    Ok(GoalPlanResult {
        future_goal,
        future_existing,
        monthly_required,
    })
}

/// ELSS projection for a monthly plan: a SIP with no annual step-up.
pub fn elss_monthly(
    monthly_amount: f64,
    years: u32,
    annual_return_pct: f64,
) -> Result<GrowthResult, CalcError> {
    sip_future_value(monthly_amount, years, 0.0, annual_return_pct)
}

/// ELSS projection for a one-time investment, compounded annually.
pub fn elss_lumpsum(
    amount: f64,
    years: u32,
    annual_return_pct: f64,
) -> Result<GrowthResult, CalcError> {
    require_non_negative(amount, "investment must be >= 0")?;
    require_non_negative(annual_return_pct, "expected return must be >= 0")?;

    let future_value = amount * (1.0 + annual_return_pct / 100.0).powi(years as i32);
    Ok(GrowthResult {
        invested: amount,
        future_value,
        returns: future_value - amount,
    })
}
