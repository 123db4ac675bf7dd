// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::macros::format_description;
use time::{Date, Month, Time};

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";
pub const TIME_LAYOUT: &str = "HH:MM";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "฿";
const COMPACT_SUFFIXES: [&str; 3] = ["k", "M", "B"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid money value")]
    InvalidMoney,
    #[error("negative money value")]
    NegativeMoney,
    #[error("invalid date value; expected {DATE_LAYOUT}")]
    InvalidDate,
    #[error("invalid number value")]
    InvalidNumber,
    #[error("invalid time value; expected {TIME_LAYOUT}")]
    InvalidTime,
}

pub type ValueResult<T> = std::result::Result<T, ValueError>;

// `฿4.5M`, `$1,200.50`, `US$ 3B` and bare numbers all normalize to minor units.
pub fn parse_money(input: &str) -> ValueResult<i64> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(ValueError::NegativeMoney);
    }

    let digits_start = trimmed
        .char_indices()
        .find(|(_, ch)| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .map(|(index, _)| index)
        .ok_or(ValueError::InvalidMoney)?;
    let body = &trimmed[digits_start..];
    if body.starts_with('-') {
        return Err(ValueError::NegativeMoney);
    }

    let clean = body.replace(',', "");
    let (number, multiplier) = split_magnitude_suffix(clean.trim_end());
    if number.is_empty() {
        return Err(ValueError::InvalidMoney);
    }

    let parts = number.split('.').collect::<Vec<_>>();
    if parts.len() > 2 {
        return Err(ValueError::InvalidMoney);
    }

    let whole = parse_digits(parts[0], true)?;
    let (frac, frac_len) = match parts.get(1) {
        Some(frac) => {
            // A magnitude suffix buys extra precision: "1.25k" is still exact.
            let max_len = 2 + multiplier.ilog10() as usize;
            if frac.len() > max_len {
                return Err(ValueError::InvalidMoney);
            }
            (parse_digits(frac, false)?, frac.len() as u32)
        }
        None => (0, 0),
    };

    let scale = 10_i128.pow(frac_len);
    let scaled = i128::from(whole)
        .checked_mul(scale)
        .and_then(|value| value.checked_add(i128::from(frac)))
        .and_then(|value| value.checked_mul(i128::from(multiplier) * 100))
        .ok_or(ValueError::InvalidMoney)?;
    i64::try_from(scaled / scale).map_err(|_| ValueError::InvalidMoney)
}

pub fn parse_optional_money(input: &str) -> ValueResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_money(input).map(Some)
}

pub fn format_money(minor: i64, symbol: &str) -> String {
    let (sign, minor) = normalize_sign(minor);
    let whole = minor / 100;
    let remainder = minor % 100;
    format!("{sign}{symbol}{}.{:02}", comma_format(whole), remainder)
}

pub fn format_compact_money(minor: i64, symbol: &str) -> String {
    let (sign, minor) = normalize_sign(minor);
    let units = (minor as f64) / 100.0;
    if units < 1000.0 {
        return format!("{sign}{}", format_money(minor, symbol));
    }

    let mut scale = 0;
    let mut value = units / 1000.0;
    while value >= 1000.0 && scale + 1 < COMPACT_SUFFIXES.len() {
        value /= 1000.0;
        scale += 1;
    }
    let mut rounded = (value * 10.0).round() / 10.0;
    if rounded >= 1000.0 && scale + 1 < COMPACT_SUFFIXES.len() {
        scale += 1;
        rounded = (value / 100.0).round() / 10.0;
    }

    let suffix = COMPACT_SUFFIXES[scale];
    if rounded.fract().abs() < f64::EPSILON {
        format!("{sign}{symbol}{rounded:.0}{suffix}")
    } else {
        format!("{sign}{symbol}{rounded:.1}{suffix}")
    }
}

pub fn parse_number(input: &str) -> ValueResult<f64> {
    let clean = input.trim().replace(',', "");
    let clean = clean.strip_suffix('%').unwrap_or(&clean).trim_end();
    if clean.is_empty() {
        return Err(ValueError::InvalidNumber);
    }
    let value = clean
        .parse::<f64>()
        .map_err(|_| ValueError::InvalidNumber)?;
    if !value.is_finite() {
        return Err(ValueError::InvalidNumber);
    }
    Ok(value)
}

pub fn parse_optional_number(input: &str) -> ValueResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_number(input).map(Some)
}

pub fn parse_date(input: &str) -> ValueResult<Date> {
    Date::parse(input.trim(), &format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValueError::InvalidDate)
}

pub fn parse_optional_date(input: &str) -> ValueResult<Option<Date>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(input).map(Some)
}

pub fn format_date(value: Option<Date>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    value
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

pub fn parse_time(input: &str) -> ValueResult<Time> {
    Time::parse(input.trim(), &format_description!("[hour]:[minute]"))
        .map_err(|_| ValueError::InvalidTime)
}

pub fn format_time(value: Time) -> String {
    value
        .format(&format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

pub fn add_months(date: Date, months: i32) -> Date {
    let base_month = i32::from(date.month() as u8);
    let total_month = base_month - 1 + months;
    let year = date.year() + total_month.div_euclid(12);
    let month = month_from_index(total_month.rem_euclid(12));
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

fn month_from_index(index: i32) -> Month {
    let mut month = Month::January;
    for _ in 0..index.rem_euclid(12) {
        month = month.next();
    }
    month
}

fn split_magnitude_suffix(input: &str) -> (&str, i64) {
    match input.chars().last() {
        Some('k' | 'K') => (input[..input.len() - 1].trim_end(), 1_000),
        Some('M') => (input[..input.len() - 1].trim_end(), 1_000_000),
        Some('B') => (input[..input.len() - 1].trim_end(), 1_000_000_000),
        _ => (input, 1),
    }
}

fn parse_digits(input: &str, allow_empty: bool) -> ValueResult<i64> {
    if input.is_empty() {
        if allow_empty {
            return Ok(0);
        }
        return Err(ValueError::InvalidMoney);
    }
    if !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValueError::InvalidMoney);
    }
    input.parse::<i64>().map_err(|_| ValueError::InvalidMoney)
}

fn comma_format(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn normalize_sign(minor: i64) -> (&'static str, i64) {
    if minor >= 0 {
        return ("", minor);
    }
    if minor == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -minor)
    }
}
