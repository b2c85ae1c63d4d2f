// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! pt-BR money formatting: `1.234,56`.

use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_DECIMALS: u32 = 2;
pub const BRL_MARKER: &str = "R$";

/// Formats `value` with a decimal comma and dot thousands separators.
/// `None` renders as zero. Rounds half away from zero, once.
pub fn format_money(value: Option<Decimal>, decimals: u32) -> String {
    let v = value.unwrap_or(Decimal::ZERO);
    let rounded = v.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(f) = frac_part {
        out.push(',');
        out.push_str(f);
    }
    out
}

/// Float entry point for values coming from loosely typed input.
/// NaN and infinities render as zero.
pub fn format_money_f64(value: Option<f64>, decimals: u32) -> String {
    let d = value
        .filter(|v| v.is_finite())
        .and_then(|v| Decimal::try_from(v).ok());
    format_money(d, decimals)
}

pub fn format_brl(value: Option<Decimal>, decimals: u32) -> String {
    format_with_marker(BRL_MARKER, value, decimals)
}

pub fn format_with_marker(marker: &str, value: Option<Decimal>, decimals: u32) -> String {
    format!("{} {}", marker, format_money(value, decimals))
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
