//! Functions every formula can call without a binding
//!
//! - `today()` / `today(days)`: date `days` from today in the locale's short form
//! - `currency(amount)` / `eur(amount)`: amount with two decimals in the locale's notation

use chrono::{NaiveDate, TimeDelta};
use rhai::{Dynamic, Engine, EvalAltResult};

use super::value::as_number;
use crate::config::Locale;

type FnResult<T> = Result<T, Box<EvalAltResult>>;

pub(crate) fn register(engine: &mut Engine, locale: &Locale, today: NaiveDate) {
    let date_locale = locale.clone();
    engine.register_fn("today", move || -> FnResult<String> {
        shifted_date(&date_locale, today, 0)
    });

    let date_locale = locale.clone();
    engine.register_fn("today", move |days: Dynamic| -> FnResult<String> {
        shifted_date(&date_locale, today, day_offset(&days))
    });

    for name in ["currency", "eur"] {
        let money_locale = locale.clone();
        engine.register_fn(name, move |amount: Dynamic| -> FnResult<String> {
            currency(&money_locale, &amount)
        });
    }
}

/// Non-numeric offsets count as zero days
fn day_offset(days: &Dynamic) -> i64 {
    as_number(days).map(|n| n.trunc() as i64).unwrap_or(0)
}

fn shifted_date(locale: &Locale, today: NaiveDate, days: i64) -> FnResult<String> {
    TimeDelta::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .map(|date| locale.format_date(date))
        .ok_or_else(|| format!("today({days}) is outside the supported date range").into())
}

fn currency(locale: &Locale, amount: &Dynamic) -> FnResult<String> {
    let number = as_number(amount)
        .ok_or_else(|| format!("currency() expects a number, got '{}'", amount))?;

    locale
        .format_number(number)
        .ok_or_else(|| format!("currency() cannot format {}", number).into())
}
