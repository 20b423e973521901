//! Payment schedule preview
//!
//! When a proposal is finalized into a contract a payment plan is created.
//! This builds the same installment list locally so it can be shown before
//! the proposal is finalized.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::input::parse_non_negative_decimal;
use super::{add_or_zero, mul_or_zero, round2};

/// Installment count used when none (or zero) is given
pub const DEFAULT_INSTALLMENT_COUNT: u32 = 4;

/// Largest installment count a plan can have
pub const MAX_INSTALLMENT_COUNT: u32 = 32767;

/// How the customer pays for the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Installment,
    Cheque,
    /// Caller supplies each installment explicitly
    Mixed,
}

impl PaymentMethod {
    /// Method recorded on generated installments
    pub fn installment_method(&self) -> InstallmentMethod {
        match self {
            PaymentMethod::Cash | PaymentMethod::Mixed => InstallmentMethod::Cash,
            PaymentMethod::Installment => InstallmentMethod::Transfer,
            PaymentMethod::Cheque => InstallmentMethod::Cheque,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Installment => write!(f, "installment"),
            PaymentMethod::Cheque => write!(f, "cheque"),
            PaymentMethod::Mixed => write!(f, "mixed"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "installment" | "installments" => Ok(PaymentMethod::Installment),
            "cheque" | "check" => Ok(PaymentMethod::Cheque),
            "mixed" => Ok(PaymentMethod::Mixed),
            other => Err(ScheduleError::UnknownMethod(other.to_string())),
        }
    }
}

/// How a single installment is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentMethod {
    Cash,
    Transfer,
    Cheque,
}

impl std::fmt::Display for InstallmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallmentMethod::Cash => write!(f, "cash"),
            InstallmentMethod::Transfer => write!(f, "transfer"),
            InstallmentMethod::Cheque => write!(f, "cheque"),
        }
    }
}

impl std::str::FromStr for InstallmentMethod {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(InstallmentMethod::Cash),
            "transfer" => Ok(InstallmentMethod::Transfer),
            "cheque" | "check" => Ok(InstallmentMethod::Cheque),
            other => Err(ScheduleError::UnknownMethod(other.to_string())),
        }
    }
}

/// One row of the payment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub installment_no: u32,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub method: InstallmentMethod,
}

/// An installment given explicitly by the caller (mixed payment)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstallment {
    /// Falls back to the first due date when missing
    pub due_date: Option<NaiveDate>,
    pub amount: Decimal,
    /// Falls back to cash when missing
    pub method: Option<InstallmentMethod>,
}

impl std::str::FromStr for PlannedInstallment {
    type Err = ScheduleError;

    /// Parse `DATE:AMOUNT` or `DATE:AMOUNT:METHOD`. An unreadable date is
    /// kept as `None`; an unreadable amount reads as zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(ScheduleError::InvalidSpec(s.to_string()));
        }

        let due_date = NaiveDate::parse_from_str(parts[0].trim(), "%Y-%m-%d").ok();
        let amount = parse_non_negative_decimal(parts[1]);
        let method = match parts.get(2) {
            Some(m) => Some(m.parse()?),
            None => None,
        };

        Ok(Self {
            due_date,
            amount,
            method,
        })
    }
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid installment '{0}'. Expected DATE:AMOUNT or DATE:AMOUNT:METHOD")]
    InvalidSpec(String),

    #[error("Unknown payment method '{0}'")]
    UnknownMethod(String),

    #[error("Too many installments: {0} (at most {max})", max = MAX_INSTALLMENT_COUNT)]
    TooManyInstallments(u32),

    #[error("Due date out of range: {0} plus {1} month(s)")]
    DateOutOfRange(NaiveDate, u32),
}

/// `date` plus `months`, clamping the day to the end of a shorter month
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, ScheduleError> {
    date.checked_add_months(Months::new(months))
        .ok_or(ScheduleError::DateOutOfRange(date, months))
}

/// Build the installment list for a contract total.
///
/// Explicit installments always win and make the plan a mixed one. Otherwise
/// an installment plan splits `total` into `count` monthly parts (the last
/// part absorbs the rounding difference) and every other method is a single
/// payment on `first_due`. Every amount is rounded to cents.
pub fn build_schedule(
    method: PaymentMethod,
    total: Decimal,
    first_due: NaiveDate,
    count: u32,
    explicit: &[PlannedInstallment],
) -> Result<Vec<Installment>, ScheduleError> {
    if !explicit.is_empty() {
        return Ok(explicit
            .iter()
            .enumerate()
            .map(|(i, planned)| Installment {
                installment_no: i as u32 + 1,
                due_date: planned.due_date.unwrap_or(first_due),
                amount: round2(planned.amount),
                method: planned
                    .method
                    .unwrap_or_else(|| PaymentMethod::Mixed.installment_method()),
            })
            .collect());
    }

    if method == PaymentMethod::Installment {
        let count = match count {
            0 => DEFAULT_INSTALLMENT_COUNT,
            n if n > MAX_INSTALLMENT_COUNT => return Err(ScheduleError::TooManyInstallments(n)),
            n => n,
        };
        let base = round2(total / Decimal::from(count));
        let mut amounts = vec![base; count as usize];
        let diff = total - mul_or_zero(base, Decimal::from(count));
        if let Some(last) = amounts.last_mut() {
            *last = round2(add_or_zero(*last, diff));
        }

        let mut schedule = Vec::with_capacity(count as usize);
        for (i, amount) in amounts.into_iter().enumerate() {
            schedule.push(Installment {
                installment_no: i as u32 + 1,
                due_date: add_months(first_due, i as u32)?,
                amount,
                method: method.installment_method(),
            });
        }
        return Ok(schedule);
    }

    Ok(vec![Installment {
        installment_no: 1,
        due_date: first_due,
        amount: round2(total),
        method: method.installment_method(),
    }])
}
