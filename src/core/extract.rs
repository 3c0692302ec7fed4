//! Heuristic extraction of typed values from free-text provider answers.
//!
//! The financial agent answers in uncontrolled natural language; these
//! functions infer numbers, tri-state booleans, and ISO dates from it.
//! Extraction is best-effort pattern inference, not a parser for a defined
//! grammar: absence of a match yields `None`/`Unknown`, never an error, and
//! callers must treat that as "unknown", not zero.
//!
//! Parsing is locale-naive: `,` is a thousands separator, `.` the decimal
//! point, and dates are recognized only as `YYYY-MM-DD` (first occurrence
//! wins).

use std::ops::Range;

use chrono::NaiveDate;
use regex::Regex;

use crate::core::models::{BillingFacts, Signal};

/// A typed value plus the span it was matched from, kept for debuggability.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    pub value: T,
    pub span: Range<usize>,
}

/// Terms that read as an affirmative signal inside a keyword window.
const AFFIRMATIVE: &[&str] = &["yes", "true", "enabled", "active", "has auto", "with auto"];

/// Terms that read as a negative signal inside a keyword window.
const NEGATIVE: &[&str] = &["no", "false", "disabled", "inactive", "no auto", "without auto"];

/// Gap allowed between a keyword and its number, in non-numeric chars.
const NUMBER_GAP: usize = 20;

/// Window inspected after a keyword for boolean signals.
const BOOL_WINDOW: usize = 40;

/// Proximity used by the full-text boolean fallback scan.
const BOOL_FALLBACK_WINDOW: usize = 20;

// =============================================================================
// Numbers
// =============================================================================

/// Extract the first number following a keyword.
///
/// Matches `<keyword><up to 20 non-digit/non-$/non-minus chars><optional
/// sign/currency><digits with optional thousands separators and decimal>`,
/// then strips currency and group symbols and parses the numeric tail.
#[must_use]
pub fn extract_number(text: &str, keyword_pattern: &str) -> Option<Extraction<f64>> {
    let pattern = format!(
        r"(?i){keyword_pattern}[^0-9$\-]{{0,{NUMBER_GAP}}}(-?\$?\s?-?[0-9][0-9,]*(?:\.[0-9]+)?)"
    );
    let re = Regex::new(&pattern).ok()?;
    let captures = re.captures(text)?;
    let matched = captures.get(1)?;

    let cleaned: String = matched
        .as_str()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let value = cleaned.parse::<f64>().ok()?;

    Some(Extraction {
        value,
        span: matched.range(),
    })
}

// =============================================================================
// Booleans (tri-state)
// =============================================================================

/// Extract a tri-state boolean signal for a keyword.
///
/// Inspects a short window after the first keyword occurrence; the earliest
/// affirmative or negative term in that window decides, with negatives
/// winning ties (so "inactive" is not read as "active"). When the window is
/// silent, falls back to scanning every keyword occurrence for a closely
/// following affirmative term. No signal at all yields
/// [`Signal::Unknown`]; a missing answer is distinct from an explicit
/// "disabled".
#[must_use]
pub fn extract_bool(text: &str, keyword_pattern: &str) -> Signal {
    let Ok(re) = Regex::new(&format!("(?i){keyword_pattern}")) else {
        return Signal::Unknown;
    };

    if let Some(m) = re.find(text) {
        match classify_window(&window_after(text, m.end(), BOOL_WINDOW)) {
            Signal::Unknown => {}
            decided => return decided,
        }
    }

    // Fallback: any keyword occurrence closely followed by an affirmative.
    for m in re.find_iter(text) {
        let window = window_after(text, m.end(), BOOL_FALLBACK_WINDOW);
        if AFFIRMATIVE.iter().any(|term| window.contains(term)) {
            return Signal::Yes;
        }
    }

    Signal::Unknown
}

/// Decide a window by the earliest matching term; negative wins ties.
fn classify_window(window: &str) -> Signal {
    let earliest = |terms: &[&str]| terms.iter().filter_map(|t| window.find(t)).min();
    match (earliest(AFFIRMATIVE), earliest(NEGATIVE)) {
        (Some(aff), Some(neg)) if aff < neg => Signal::Yes,
        (_, Some(_)) => Signal::No,
        (Some(_), None) => Signal::Yes,
        (None, None) => Signal::Unknown,
    }
}

/// Lowercased window of up to `len` bytes after `start`, clamped to a char
/// boundary.
fn window_after(text: &str, start: usize, len: usize) -> String {
    let mut end = (start + len).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[start..end].to_lowercase()
}

// =============================================================================
// Dates
// =============================================================================

/// Extract the first valid `YYYY-MM-DD` date in the text.
#[must_use]
pub fn extract_date(text: &str) -> Option<Extraction<NaiveDate>> {
    // Compiled per call; extraction volume is a handful per account.
    let re = Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").ok()?;
    for captures in re.captures_iter(text) {
        let whole = captures.get(0)?;
        let date = NaiveDate::from_ymd_opt(
            captures[1].parse().ok()?,
            captures[2].parse().ok()?,
            captures[3].parse().ok()?,
        );
        if let Some(value) = date {
            return Some(Extraction {
                value,
                span: whole.range(),
            });
        }
    }
    None
}

// =============================================================================
// Billing facts assembly
// =============================================================================

/// The three free-text answers the billing sub-queries produce.
///
/// Each is independently optional; a failed round trip leaves its slot
/// `None` and only the fields sourced from it stay unknown.
#[derive(Debug, Clone, Default)]
pub struct BillingAnswers {
    /// Balance, credit limit, payment method.
    pub balance_credit: Option<String>,
    /// Current month usage, next month MRC, daily run rate.
    pub usage_forecast: Option<String>,
    /// Auto-recharge status, contract end date.
    pub contract_terms: Option<String>,
}

/// Which answer a field is sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerSlot {
    BalanceCredit,
    UsageForecast,
}

/// Numeric billing fields, as data: new fields need a table row, not a new
/// code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberField {
    Balance,
    CreditLimit,
    CurrentMonthUsage,
    NextMonthMrc,
    DailyRunRate,
}

const NUMBER_FIELDS: &[(NumberField, AnswerSlot, &str)] = &[
    (NumberField::Balance, AnswerSlot::BalanceCredit, "balance"),
    (
        NumberField::CreditLimit,
        AnswerSlot::BalanceCredit,
        "credit limit",
    ),
    (
        NumberField::CurrentMonthUsage,
        AnswerSlot::UsageForecast,
        "usage",
    ),
    (NumberField::NextMonthMrc, AnswerSlot::UsageForecast, "mrc"),
    (
        NumberField::DailyRunRate,
        AnswerSlot::UsageForecast,
        "run.?rate",
    ),
];

/// Recognized payment method phrases, scanned as whole words.
const PAYMENT_METHODS: &[&str] = &["credit card", "invoice", "ach", "wire transfer", "paypal"];

/// Assemble typed billing facts from the three sub-query answers.
#[must_use]
pub fn billing_facts(answers: &BillingAnswers) -> BillingFacts {
    let mut facts = BillingFacts::default();

    for (field, slot, pattern) in NUMBER_FIELDS {
        let answer = match slot {
            AnswerSlot::BalanceCredit => answers.balance_credit.as_deref(),
            AnswerSlot::UsageForecast => answers.usage_forecast.as_deref(),
        };
        let Some(text) = answer else { continue };
        let Some(extraction) = extract_number(text, pattern) else {
            continue;
        };
        tracing::debug!(?field, span = ?extraction.span, value = extraction.value, "extracted");
        let slot = match field {
            NumberField::Balance => &mut facts.balance,
            NumberField::CreditLimit => &mut facts.credit_limit,
            NumberField::CurrentMonthUsage => &mut facts.current_month_usage,
            NumberField::NextMonthMrc => &mut facts.next_month_mrc,
            NumberField::DailyRunRate => &mut facts.daily_run_rate,
        };
        *slot = Some(extraction.value);
    }

    if let Some(text) = answers.balance_credit.as_deref() {
        facts.payment_method = extract_payment_method(text);
    }
    if let Some(text) = answers.contract_terms.as_deref() {
        facts.auto_recharge = extract_bool(text, "auto.?recharge");
        facts.contract_end = extract_date(text).map(|e| e.value);
    }

    facts
}

/// First recognized payment method phrase, by position in the text.
fn extract_payment_method(text: &str) -> Option<String> {
    PAYMENT_METHODS
        .iter()
        .filter_map(|method| {
            let pattern = format!(r"(?i)\b{}\b", method.replace(' ', r"\s+"));
            let position = Regex::new(&pattern).ok()?.find(text)?.start();
            Some((position, *method))
        })
        .min_by_key(|(position, _)| *position)
        .map(|(_, method)| method.to_string())
}
