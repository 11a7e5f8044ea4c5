//! Day-rate and IR35 arithmetic for fractional roles.
//!
//! All amounts are annual GBP unless a field name says otherwise. The tax
//! constants are the 2024/25 UK figures; the model is a planning estimate,
//! not tax advice (no personal-allowance taper, flat marginal-relief rate).

use serde::Serialize;

// ─── Role defaults ───────────────────────────────────────────────────────────

/// UK market defaults for a C-suite role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleRates {
  pub code:         &'static str,
  pub label:        &'static str,
  pub avg_day_rate: u32,
  pub min_day_rate: u32,
  pub max_day_rate: u32,
  /// Typical full-time base salary for the same role.
  pub avg_salary:   u32,
}

const fn role(
  code: &'static str,
  label: &'static str,
  avg_day_rate: u32,
  avg_salary: u32,
  min_day_rate: u32,
  max_day_rate: u32,
) -> RoleRates {
  RoleRates { code, label, avg_day_rate, min_day_rate, max_day_rate, avg_salary }
}

pub const ROLE_RATES: &[RoleRates] = &[
  role("ceo", "CEO", 1200, 180_000, 900, 1800),
  role("cfo", "CFO", 1050, 145_000, 800, 1500),
  role("cmo", "CMO", 950, 130_000, 700, 1400),
  role("cto", "CTO", 1100, 155_000, 850, 1600),
  role("coo", "COO", 950, 140_000, 750, 1400),
  role("ciso", "CISO", 1150, 150_000, 900, 1600),
  role("chro", "CHRO", 850, 125_000, 650, 1200),
  role("cpo", "CPO", 1000, 145_000, 800, 1400),
  role("cco", "CCO", 1000, 140_000, 800, 1200),
];

impl RoleRates {
  /// Case-insensitive lookup by role code (`"cfo"`, `"CTO"`, ...).
  pub fn lookup(code: &str) -> Option<&'static RoleRates> {
    ROLE_RATES.iter().find(|r| r.code.eq_ignore_ascii_case(code.trim()))
  }
}

// ─── Candidate / employer views ──────────────────────────────────────────────

pub const WORKING_WEEKS: f64 = 48.0;
const WEEKS_PER_MONTH: f64 = 4.33;
const HOURS_PER_DAY: f64 = 8.0;
/// Employer on-cost multiplier for a full-time hire (NI, pension, benefits).
const FULL_TIME_ON_COST: f64 = 1.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateEarnings {
  pub weekly:  f64,
  pub monthly: f64,
  pub annual:  f64,
}

/// Earnings for a fractional executive working `days_per_week` for each of
/// `clients` clients.
pub fn candidate_earnings(day_rate: f64, days_per_week: f64, clients: u32) -> CandidateEarnings {
  let weekly = day_rate * days_per_week * f64::from(clients);
  CandidateEarnings {
    weekly,
    monthly: weekly * WEEKS_PER_MONTH,
    annual: weekly * WORKING_WEEKS,
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmployerSavings {
  pub full_time_cost:  f64,
  pub fractional_cost: f64,
  pub savings:         f64,
  /// Rounded to the nearest whole percent.
  pub savings_percent: i64,
}

/// Cost of a full-time hire against a fractional one covering
/// `hours_per_week` at `day_rate`.
pub fn employer_savings(full_time_salary: f64, day_rate: f64, hours_per_week: f64) -> EmployerSavings {
  let full_time_cost = full_time_salary * FULL_TIME_ON_COST;
  let fractional_cost = day_rate * (hours_per_week / HOURS_PER_DAY) * WORKING_WEEKS;
  let savings = full_time_cost - fractional_cost;
  let savings_percent = if full_time_cost > 0.0 {
    (savings / full_time_cost * 100.0).round() as i64
  } else {
    0
  };
  EmployerSavings { full_time_cost, fractional_cost, savings, savings_percent }
}

// ─── IR35 ────────────────────────────────────────────────────────────────────

const PERSONAL_ALLOWANCE: f64 = 12_570.0;
const BASIC_RATE: f64 = 0.20;
const BASIC_RATE_LIMIT: f64 = 50_270.0;
const HIGHER_RATE: f64 = 0.40;
const HIGHER_RATE_LIMIT: f64 = 125_140.0;
const ADDITIONAL_RATE: f64 = 0.45;

const NI_PRIMARY_THRESHOLD: f64 = 12_570.0;
const NI_UPPER_EARNINGS_LIMIT: f64 = 50_270.0;
const NI_EMPLOYEE_RATE: f64 = 0.08;
const NI_EMPLOYEE_UPPER_RATE: f64 = 0.02;
const NI_SECONDARY_THRESHOLD: f64 = 9_100.0;
const NI_EMPLOYER_RATE: f64 = 0.138;

const DIVIDEND_ALLOWANCE: f64 = 500.0;
const DIVIDEND_BASIC_RATE: f64 = 0.0875;
const DIVIDEND_HIGHER_RATE: f64 = 0.3375;
const DIVIDEND_ADDITIONAL_RATE: f64 = 0.3935;

const CORP_TAX_SMALL: f64 = 0.19;
const CORP_TAX_MARGINAL: f64 = 0.265;
const CORP_TAX_MAIN: f64 = 0.25;
const CORP_SMALL_PROFITS_LIMIT: f64 = 50_000.0;
const CORP_MAIN_PROFITS_LIMIT: f64 = 250_000.0;

/// Weekly umbrella company fee.
const UMBRELLA_WEEKLY_FEE: f64 = 25.0;
const UMBRELLA_EXPENSES_SHARE: f64 = 0.05;
const LTD_COMPANY_EXPENSES: f64 = 3_000.0;

/// Take-home working through an umbrella company (inside IR35).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InsideIr35 {
  pub gross:          f64,
  pub umbrella_fee:   f64,
  pub employer_ni:    f64,
  pub taxable_gross:  f64,
  pub income_tax:     f64,
  pub employee_ni:    f64,
  pub take_home:      f64,
  pub effective_rate: f64,
}

/// Take-home through a limited company paying salary plus dividends
/// (outside IR35).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutsideIr35 {
  pub gross:           f64,
  pub salary:          f64,
  pub company_profit:  f64,
  pub corporation_tax: f64,
  pub dividends:       f64,
  pub dividend_tax:    f64,
  pub take_home:       f64,
  pub effective_rate:  f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ir35Comparison {
  pub inside:     InsideIr35,
  pub outside:    OutsideIr35,
  /// `outside.take_home - inside.take_home`.
  pub difference: f64,
}

fn percent_of(part: f64, whole: f64) -> f64 {
  if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

fn income_tax(taxable: f64) -> f64 {
  if taxable <= PERSONAL_ALLOWANCE {
    return 0.0;
  }
  let above_pa = taxable - PERSONAL_ALLOWANCE;
  let basic_band = BASIC_RATE_LIMIT - PERSONAL_ALLOWANCE;
  let higher_band = HIGHER_RATE_LIMIT - BASIC_RATE_LIMIT;
  if above_pa <= basic_band {
    above_pa * BASIC_RATE
  } else if above_pa <= HIGHER_RATE_LIMIT - PERSONAL_ALLOWANCE {
    basic_band * BASIC_RATE + (above_pa - basic_band) * HIGHER_RATE
  } else {
    basic_band * BASIC_RATE
      + higher_band * HIGHER_RATE
      + (above_pa - basic_band - higher_band) * ADDITIONAL_RATE
  }
}

fn employee_ni(taxable: f64) -> f64 {
  if taxable <= NI_PRIMARY_THRESHOLD {
    0.0
  } else if taxable <= NI_UPPER_EARNINGS_LIMIT {
    (taxable - NI_PRIMARY_THRESHOLD) * NI_EMPLOYEE_RATE
  } else {
    (NI_UPPER_EARNINGS_LIMIT - NI_PRIMARY_THRESHOLD) * NI_EMPLOYEE_RATE
      + (taxable - NI_UPPER_EARNINGS_LIMIT) * NI_EMPLOYEE_UPPER_RATE
  }
}

fn inside_ir35(gross: f64, weeks_per_year: f64) -> InsideIr35 {
  let umbrella_fee = UMBRELLA_WEEKLY_FEE * weeks_per_year;
  let employer_ni =
    ((gross - umbrella_fee - NI_SECONDARY_THRESHOLD) * NI_EMPLOYER_RATE).max(0.0);
  let expenses = gross * UMBRELLA_EXPENSES_SHARE;
  let taxable_gross = gross - umbrella_fee - employer_ni - expenses;
  let income_tax = income_tax(taxable_gross);
  let employee_ni = employee_ni(taxable_gross);

  InsideIr35 {
    gross,
    umbrella_fee,
    employer_ni,
    taxable_gross,
    income_tax,
    employee_ni,
    take_home: gross - income_tax - employee_ni - umbrella_fee - employer_ni,
    effective_rate: percent_of(income_tax + employee_ni + employer_ni + umbrella_fee, gross),
  }
}

fn outside_ir35(gross: f64) -> OutsideIr35 {
  let salary = PERSONAL_ALLOWANCE;
  let company_profit = gross - salary - LTD_COMPANY_EXPENSES;
  let corp_rate = if company_profit <= CORP_SMALL_PROFITS_LIMIT {
    CORP_TAX_SMALL
  } else if company_profit <= CORP_MAIN_PROFITS_LIMIT {
    CORP_TAX_MARGINAL
  } else {
    CORP_TAX_MAIN
  };
  let corporation_tax = (company_profit * corp_rate).max(0.0);
  let dividends = company_profit - corporation_tax;

  let taxable_dividends = (dividends - DIVIDEND_ALLOWANCE).max(0.0);
  let income_above_pa = salary + dividends - PERSONAL_ALLOWANCE;
  let basic_remaining = (BASIC_RATE_LIMIT - PERSONAL_ALLOWANCE - salary).max(0.0);
  let dividend_tax = if taxable_dividends <= 0.0 {
    0.0
  } else if taxable_dividends <= basic_remaining {
    taxable_dividends * DIVIDEND_BASIC_RATE
  } else if income_above_pa <= HIGHER_RATE_LIMIT - PERSONAL_ALLOWANCE {
    basic_remaining * DIVIDEND_BASIC_RATE
      + (taxable_dividends - basic_remaining) * DIVIDEND_HIGHER_RATE
  } else {
    let higher_band = HIGHER_RATE_LIMIT - BASIC_RATE_LIMIT;
    basic_remaining * DIVIDEND_BASIC_RATE
      + higher_band * DIVIDEND_HIGHER_RATE
      + (taxable_dividends - basic_remaining - higher_band) * DIVIDEND_ADDITIONAL_RATE
  };

  let total_tax = corporation_tax + dividend_tax;
  OutsideIr35 {
    gross,
    salary,
    company_profit,
    corporation_tax,
    dividends,
    dividend_tax,
    take_home: gross - total_tax - LTD_COMPANY_EXPENSES,
    effective_rate: percent_of(total_tax + LTD_COMPANY_EXPENSES, gross),
  }
}

/// Compare take-home inside and outside IR35 for the same engagement.
pub fn ir35_comparison(day_rate: f64, days_per_week: f64, weeks_per_year: f64) -> Ir35Comparison {
  let gross = day_rate * days_per_week * weeks_per_year;
  let inside = inside_ir35(gross, weeks_per_year);
  let outside = outside_ir35(gross);
  Ir35Comparison { inside, outside, difference: outside.take_home - inside.take_home }
}
