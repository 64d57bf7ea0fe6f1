use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::interest::{accrued_interest, days_between, round_half_away};
use crate::loan::{Installment, Loan};
use crate::regrading::late_fees::{late_and_anticipated_fees, LateRepaymentScheduler};
use crate::regrading::options::{CreditContractOptions, LoanType};
use crate::settings::{ApplicationSettings, NonWorkingDates, User};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MicrocreditResult;

/// Which settlement algorithm produced the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegradingPath {
    Standard,
    RealSchedule,
}

/// Breakdown of a regrading amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegradingOutput {
    /// The single payment that fully settles the loan as of the request date.
    pub maximum_amount: Money,
    pub path: RegradingPath,
    /// Outstanding balance the amount was computed against.
    pub olb: Money,
    pub capital_due: Money,
    pub interest_due: Money,
    pub fees_due: Money,
}

/// Computes the maximum amount a client may pay to fully regrade a loan as
/// of a date. Borrows the loan mutably: the real-schedule path permanently
/// reschedules the interest of the installment whose period contains the
/// settlement date.
pub struct RegradingAmountStrategy<'a> {
    loan: &'a mut Loan,
    options: &'a CreditContractOptions,
    user: &'a User,
    settings: &'a ApplicationSettings,
    non_working_dates: &'a NonWorkingDates,
    scheduler: &'a dyn LateRepaymentScheduler,
}

impl<'a> RegradingAmountStrategy<'a> {
    pub fn new(
        loan: &'a mut Loan,
        options: &'a CreditContractOptions,
        user: &'a User,
        settings: &'a ApplicationSettings,
        non_working_dates: &'a NonWorkingDates,
        scheduler: &'a dyn LateRepaymentScheduler,
    ) -> Self {
        RegradingAmountStrategy {
            loan,
            options,
            user,
            settings,
            non_working_dates,
            scheduler,
        }
    }

    pub fn maximum_amount(&mut self, date: NaiveDate) -> MicrocreditResult<RegradingOutput> {
        self.loan.validate()?;
        if self.options.loans_type == LoanType::DecliningFixedPrincipalWithRealInterest {
            self.real_schedule_amount(date)
        } else {
            self.standard_amount(date)
        }
    }

    /// Standard path: balance as of the date, plus remaining interest and
    /// fees, each replaceable by a manual override. No floor at zero —
    /// overrides may legitimately drive the total to any sign.
    fn standard_amount(&mut self, date: NaiveDate) -> MicrocreditResult<RegradingOutput> {
        let olb = self.loan.actual_olb_as_of(date);

        let interest_due = if self.options.cancel_interests {
            self.options.manual_interests_amount
        } else {
            self.loan.remaining_interests(date)
        };

        let fees_due = if self.options.cancel_fees {
            self.options.manual_fees_amount + self.options.manual_commission_amount
        } else {
            late_and_anticipated_fees(
                self.loan,
                self.options,
                self.user,
                self.settings,
                self.non_working_dates,
                self.scheduler,
                date,
            )?
        };

        let decimal_point = if self.loan.use_cents {
            self.settings.interest_rate_decimal_places
        } else {
            0
        };
        let maximum_amount = round_half_away(olb + interest_due + fees_due, decimal_point);

        Ok(RegradingOutput {
            maximum_amount,
            path: RegradingPath::Standard,
            olb,
            capital_due: olb,
            interest_due,
            fees_due,
        })
    }

    /// Real-schedule path, for declining-fixed-principal contracts carrying a
    /// real interest schedule. Walks the installments in ascending number
    /// order, maintaining a last-date-of-payment cursor, and accumulates
    /// unpaid capital and recomputed interest by date-bucket classification
    /// of each installment against `pay_date`. Clamped at zero.
    fn real_schedule_amount(&mut self, pay_date: NaiveDate) -> MicrocreditResult<RegradingOutput> {
        let olb = self.loan.actual_olb();
        let rate = self.loan.interest_rate;
        let days_in_year = self.settings.days_in_a_year(self.loan.start_date.year());
        let rounding_point = if self.loan.use_cents { 2 } else { 0 };
        let count = self.loan.installments.len();

        let mut capital_repayment = Decimal::ZERO;
        let mut interest_payment = Decimal::ZERO;

        let mut last_date_of_payment = self.loan.last_repayment_date();
        if self.loan.start_date > last_date_of_payment {
            last_date_of_payment = self.loan.start_date;
        }

        for i in 0..count {
            let installment = self.loan.installments[i].clone();
            let prev_expected = if i > 0 {
                Some(self.loan.installments[i - 1].expected_date)
            } else {
                None
            };

            if installment.is_repaid() && last_date_of_payment < installment.expected_date {
                last_date_of_payment = installment.expected_date;
            }

            // Capital bucket. The triggers are mutually exclusive: each
            // installment contributes its unpaid capital at most once.
            let mut counted = false;
            if installment.expected_date < pay_date {
                capital_repayment += installment.unpaid_capital();
                counted = true;
            }
            if !counted && installment.number == 1 && self.loan.start_date < pay_date {
                capital_repayment += installment.unpaid_capital();
                counted = true;
            }
            if !counted && installment.expected_date == pay_date {
                capital_repayment += installment.unpaid_capital();
                counted = true;
            }
            if !counted
                && installment.number > 1
                && installment.expected_date != self.loan.start_date
                && installment.expected_date > pay_date
                && prev_expected.map_or(false, |prev| prev < pay_date)
            {
                capital_repayment += installment.unpaid_capital();
            }

            // Interest bucket.
            if installment.is_repaid() || installment.unpaid_interest() == Decimal::ZERO {
                continue;
            }

            if installment.expected_date <= pay_date {
                let mut carried_interest = Decimal::ZERO;
                if installment.paid_interests > Decimal::ZERO
                    && installment.interests_repayment > installment.paid_interests
                {
                    carried_interest = installment.paid_interests;
                }
                if installment.paid_capital == Decimal::ZERO
                    && installment.paid_interests > Decimal::ZERO
                    && installment.paid_interests != installment.interests_repayment
                {
                    carried_interest = self.salvage_interest(
                        &installment,
                        prev_expected,
                        last_date_of_payment,
                        olb,
                        days_in_year,
                        rounding_point,
                    )?;
                }

                let mut effective_date = installment.expected_date;
                // very late repayment of the final installment: the borrower
                // owes interest for every day of delay, through the pay date
                if installment.number as usize == count
                    && installment.expected_date < pay_date
                    && installment.paid_capital == Decimal::ZERO
                {
                    effective_date = pay_date;
                }

                let days = days_between(last_date_of_payment, effective_date);
                let accrued = accrued_interest(olb, rate, days, days_in_year)?;
                interest_payment += round_half_away(accrued + carried_interest, rounding_point)
                    - installment.paid_interests;
                last_date_of_payment = installment.expected_date;
            }

            if installment.number > 1
                && installment.expected_date > pay_date
                && prev_expected.map_or(false, |prev| prev < pay_date)
            {
                // pay_date falls inside this installment's period: correct its
                // scheduled interest to the accrual up to the settlement date
                let paid_interests = installment.paid_interests;
                let day_span = days_between(last_date_of_payment, pay_date).max(0);
                let accrued = accrued_interest(olb, rate, day_span, days_in_year)?;
                let rescheduled = round_half_away(accrued + paid_interests, rounding_point);
                self.loan.installments[i].reschedule_interest(rescheduled);
                interest_payment += rescheduled - paid_interests;
                last_date_of_payment = installment.expected_date;
            }

            if installment.number == 1 && installment.expected_date > pay_date {
                let day_span = days_between(self.loan.start_date, pay_date).max(0);
                let accrued = accrued_interest(olb, rate, day_span, days_in_year)?;
                interest_payment +=
                    round_half_away(accrued, rounding_point) - installment.paid_interests;
            }
        }

        let total = capital_repayment + interest_payment;
        let maximum_amount = if total < Decimal::ZERO {
            Decimal::ZERO
        } else {
            total
        };

        Ok(RegradingOutput {
            maximum_amount,
            path: RegradingPath::RealSchedule,
            olb,
            capital_due: capital_repayment,
            interest_due: interest_payment,
            fees_due: Decimal::ZERO,
        })
    }

    /// Interest salvaged from a partially-paid installment that received no
    /// capital: recompute what should have accrued between the period start
    /// and the payment cursor, at the balance that existed just before the
    /// period started (reconstructed from the ledger). When that historical
    /// balance disagrees with the current one and the recomputation exceeds
    /// the recorded figure, the recorded figure wins.
    fn salvage_interest(
        &self,
        installment: &Installment,
        prev_expected: Option<NaiveDate>,
        last_date_of_payment: NaiveDate,
        actual_olb: Money,
        days_in_year: u32,
        rounding_point: u32,
    ) -> MicrocreditResult<Money> {
        let period_start = prev_expected.unwrap_or(self.loan.start_date);
        let days = days_between(period_start, last_date_of_payment);
        let olb_before_payment = self.loan.actual_olb_as_of(period_start);

        let accrued = accrued_interest(olb_before_payment, self.loan.interest_rate, days, days_in_year)?;
        let mut carried = round_half_away(accrued, rounding_point);

        if installment.paid_interests < carried && actual_olb != olb_before_payment {
            carried = installment.paid_interests;
        }
        Ok(carried)
    }
}

/// Maximum amount a client may pay to fully regrade `loan` as of `date`,
/// under the contract's current options.
///
/// Takes the loan mutably: on the real-schedule path the installment whose
/// period contains `date` has its scheduled interest permanently corrected.
pub fn calculate_maximum_amount_to_regrading_loan(
    loan: &mut Loan,
    options: &CreditContractOptions,
    user: &User,
    settings: &ApplicationSettings,
    non_working_dates: &NonWorkingDates,
    scheduler: &dyn LateRepaymentScheduler,
    date: NaiveDate,
) -> MicrocreditResult<ComputationOutput<RegradingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if options.cancel_interests {
        warnings.push("computed interest replaced by manual amount".into());
    }
    if options.cancel_fees {
        warnings.push("computed fees replaced by manual fee and commission amounts".into());
    }

    let mut strategy =
        RegradingAmountStrategy::new(loan, options, user, settings, non_working_dates, scheduler);
    let output = strategy.maximum_amount(date)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Maximum Amount To Regrading Loan",
        &serde_json::json!({
            "date": date.to_string(),
            "loans_type": options.loans_type,
            "use_cents": loan.use_cents,
            "interest_rate": loan.interest_rate.to_string(),
            "installments": loan.installments.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// A regrading computation as one self-contained document, for tooling
/// surfaces (CLI, bindings) that receive the whole request as JSON. Works on
/// its own copy of the loan; the reschedule side effect stays inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegradingRequest {
    pub loan: Loan,
    #[serde(default)]
    pub options: CreditContractOptions,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub settings: ApplicationSettings,
    #[serde(default)]
    pub non_working_dates: NonWorkingDates,
    pub date: NaiveDate,
}

impl RegradingRequest {
    pub fn execute(
        mut self,
        scheduler: &dyn LateRepaymentScheduler,
    ) -> MicrocreditResult<ComputationOutput<RegradingOutput>> {
        calculate_maximum_amount_to_regrading_loan(
            &mut self.loan,
            &self.options,
            &self.user,
            &self.settings,
            &self.non_working_dates,
            scheduler,
            self.date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::RepaymentLedger;
    use crate::regrading::late_fees::PassthroughScheduler;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// 1000 over four monthly installments, 3% per period, cents on.
    fn loan() -> Loan {
        Loan {
            start_date: d(2024, 1, 1),
            amount: dec!(1000),
            interest_rate: dec!(0.03),
            use_cents: true,
            installments: vec![
                Installment::new(1, d(2024, 2, 1), dec!(250), dec!(30)),
                Installment::new(2, d(2024, 3, 1), dec!(250), dec!(30)),
                Installment::new(3, d(2024, 4, 1), dec!(250), dec!(30)),
                Installment::new(4, d(2024, 5, 1), dec!(250), dec!(30)),
            ],
            events: RepaymentLedger::new(),
        }
    }

    fn compute(
        loan: &mut Loan,
        options: &CreditContractOptions,
        date: NaiveDate,
    ) -> RegradingOutput {
        let user = User::default();
        let settings = ApplicationSettings::default();
        let nwd = NonWorkingDates::default();
        let mut strategy = RegradingAmountStrategy::new(
            loan,
            options,
            &user,
            &settings,
            &nwd,
            &PassthroughScheduler,
        );
        strategy.maximum_amount(date).unwrap()
    }

    #[test]
    fn test_standard_path_full_balance_plus_interest() {
        let mut loan = loan();
        let options = CreditContractOptions::default();
        let out = compute(&mut loan, &options, d(2024, 3, 1));

        assert_eq!(out.path, RegradingPath::Standard);
        assert_eq!(out.olb, dec!(1000));
        // two installments due, 30 interest each, no fees
        assert_eq!(out.interest_due, dec!(60));
        assert_eq!(out.maximum_amount, dec!(1060));
    }

    #[test]
    fn test_standard_path_manual_overrides() {
        let mut loan = loan();
        let options = CreditContractOptions {
            cancel_interests: true,
            manual_interests_amount: dec!(10),
            cancel_fees: true,
            manual_fees_amount: dec!(3),
            manual_commission_amount: dec!(2),
            ..CreditContractOptions::default()
        };
        let out = compute(&mut loan, &options, d(2024, 3, 1));
        assert_eq!(out.maximum_amount, dec!(1015));
    }

    #[test]
    fn test_standard_path_overrides_may_go_negative() {
        let mut loan = loan();
        loan.events.record(d(2024, 2, 1), dec!(1000));
        let options = CreditContractOptions {
            cancel_interests: true,
            manual_interests_amount: dec!(-50),
            cancel_fees: true,
            ..CreditContractOptions::default()
        };
        let out = compute(&mut loan, &options, d(2024, 3, 1));
        // standard path carries the sign through; only the real-schedule
        // path clamps
        assert_eq!(out.maximum_amount, dec!(-50));
    }

    #[test]
    fn test_standard_path_rounding_without_cents() {
        let mut loan = loan();
        loan.use_cents = false;
        let options = CreditContractOptions::default();
        // mid-period: proration yields a fractional interest figure
        let out = compute(&mut loan, &options, d(2024, 2, 16));
        assert_eq!(out.maximum_amount.scale(), 0);
    }

    #[test]
    fn test_real_schedule_settlement_on_first_due_date() {
        let mut loan = loan();
        let options = CreditContractOptions {
            loans_type: LoanType::DecliningFixedPrincipalWithRealInterest,
            ..CreditContractOptions::default()
        };
        let out = compute(&mut loan, &options, d(2024, 2, 1));

        assert_eq!(out.path, RegradingPath::RealSchedule);
        // capital: installment 1 due exactly on the pay date
        assert_eq!(out.capital_due, dec!(250));
        // interest: 31 days on 1000 at 3%/365
        let expected = round_half_away(
            accrued_interest(dec!(1000), dec!(0.03), 31, 365).unwrap(),
            2,
        );
        assert_eq!(out.interest_due, expected);
        assert_eq!(out.maximum_amount, dec!(250) + expected);
    }

    #[test]
    fn test_real_schedule_before_first_installment() {
        let mut loan = loan();
        let options = CreditContractOptions {
            loans_type: LoanType::DecliningFixedPrincipalWithRealInterest,
            ..CreditContractOptions::default()
        };
        let out = compute(&mut loan, &options, d(2024, 1, 16));

        // first-installment trigger: start date precedes the pay date
        assert_eq!(out.capital_due, dec!(250));
        // 15 days of accrual from the start date
        let expected = round_half_away(
            accrued_interest(dec!(1000), dec!(0.03), 15, 365).unwrap(),
            2,
        );
        assert_eq!(out.interest_due, expected);
    }

    #[test]
    fn test_real_schedule_bridging_reschedules_installment() {
        let mut loan = loan();
        let options = CreditContractOptions {
            loans_type: LoanType::DecliningFixedPrincipalWithRealInterest,
            ..CreditContractOptions::default()
        };
        // between installments 1 and 2
        let out = compute(&mut loan, &options, d(2024, 2, 16));

        // installments 1 (due before) and 2 (bridging) both contribute capital
        assert_eq!(out.capital_due, dec!(500));

        // installment 1: 31 days from start; installment 2: 15 more days up
        // to the pay date, and its schedule is rewritten to that figure
        let first = round_half_away(
            accrued_interest(dec!(1000), dec!(0.03), 31, 365).unwrap(),
            2,
        );
        let second = round_half_away(
            accrued_interest(dec!(1000), dec!(0.03), 15, 365).unwrap(),
            2,
        );
        assert_eq!(out.interest_due, first + second);
        assert_eq!(loan.installments[1].interests_repayment, second);
        // the rest of the schedule is untouched
        assert_eq!(loan.installments[2].interests_repayment, dec!(30));
    }

    #[test]
    fn test_real_schedule_clamps_at_zero() {
        let mut loan = loan();
        // capital fully settled everywhere; installment 1 short 10 of
        // interest, the rest settled in full
        for installment in loan.installments.iter_mut() {
            installment.paid_capital = dec!(250);
            installment.paid_interests = dec!(30);
        }
        loan.installments[0].paid_interests = dec!(20);
        loan.events.record(d(2024, 5, 1), dec!(750));

        let options = CreditContractOptions {
            loans_type: LoanType::DecliningFixedPrincipalWithRealInterest,
            ..CreditContractOptions::default()
        };
        let out = compute(&mut loan, &options, d(2024, 6, 1));

        // the cursor starts at the 05-01 repayment, so installment 1 accrues
        // a negative day span larger than its carried interest; the raw total
        // is negative and the clamp floors the answer
        assert!(out.capital_due + out.interest_due < Decimal::ZERO);
        assert_eq!(out.maximum_amount, Decimal::ZERO);
    }

    #[test]
    fn test_entry_point_envelope() {
        let mut loan = loan();
        let options = CreditContractOptions {
            cancel_fees: true,
            ..CreditContractOptions::default()
        };
        let user = User::default();
        let settings = ApplicationSettings::default();
        let nwd = NonWorkingDates::default();

        let out = calculate_maximum_amount_to_regrading_loan(
            &mut loan,
            &options,
            &user,
            &settings,
            &nwd,
            &PassthroughScheduler,
            d(2024, 3, 1),
        )
        .unwrap();

        assert_eq!(out.result.maximum_amount, dec!(1060));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.methodology, "Maximum Amount To Regrading Loan");
    }

    #[test]
    fn test_regrading_request_round_trips_and_executes() {
        let request = RegradingRequest {
            loan: loan(),
            options: CreditContractOptions::default(),
            user: User::default(),
            settings: ApplicationSettings::default(),
            non_working_dates: NonWorkingDates::default(),
            date: d(2024, 3, 1),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: RegradingRequest = serde_json::from_str(&json).unwrap();
        let out = parsed.execute(&PassthroughScheduler).unwrap();
        assert_eq!(out.result.maximum_amount, dec!(1060));
    }

    #[test]
    fn test_empty_schedule_fails_loudly() {
        let mut loan = loan();
        loan.installments.clear();
        let options = CreditContractOptions::default();
        let user = User::default();
        let settings = ApplicationSettings::default();
        let nwd = NonWorkingDates::default();
        let mut strategy = RegradingAmountStrategy::new(
            &mut loan,
            &options,
            &user,
            &settings,
            &nwd,
            &PassthroughScheduler,
        );
        assert!(strategy.maximum_amount(d(2024, 3, 1)).is_err());
    }
}
