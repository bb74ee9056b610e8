//! Lamp reward heuristic
//!
//! An ordered list of call matchers picks the lamp-like call; each output
//! field then tries its own ordered rules against that call before falling
//! back to the default in `LampReward::default()`.

use crate::lexical::calls::{constructor_calls, parse_int, CallSite};
use crate::lexical::literal::read_string_argument;
use crate::record::LampReward;
use regex::Regex;
use std::sync::LazyLock;

static SKILL_CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSkill\s*\.\s*([A-Za-z_]\w*)").unwrap());
static PARENTHESISED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]+)\)").unwrap());
static XP_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*)\s*(?:xp|experience)\b").unwrap());
static QUANTITY_TIMES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*x\s+[a-z]").unwrap());

/// The call a matcher selected, with its arguments split once
struct LampCall<'a> {
    text: &'a str,
    args: Vec<&'a str>,
}

impl<'a> LampCall<'a> {
    fn new(site: &CallSite<'a>) -> Self {
        Self {
            text: site.text,
            args: site.arguments(),
        }
    }

    /// First argument that reads as a string literal
    fn first_string_argument(&self) -> Option<String> {
        self.args.iter().find_map(|arg| read_string_argument(arg))
    }
}

struct LampMatcher {
    name: &'static str,
    find: for<'a> fn(&'a str) -> Option<CallSite<'a>>,
}

type FieldRule<T> = fn(&LampCall<'_>) -> Option<T>;

const MATCHERS: &[LampMatcher] = &[
    LampMatcher {
        name: "explicit lamp reward",
        find: explicit_lamp_reward,
    },
    LampMatcher {
        name: "reward named as a lamp",
        find: reward_named_lamp,
    },
];

const SKILL_RULES: &[FieldRule<String>] = &[skills_from_constants, skills_from_parenthesised_text];
const VALUE_RULES: &[FieldRule<i64>] = &[value_from_xp_text, value_from_integer_argument];
const QUANTITY_RULES: &[FieldRule<i64>] = &[quantity_from_text, quantity_from_last_argument];

/// Lamp reward anywhere in the source, or `None` without a lamp-like call
pub fn extract_lamp_reward(source: &str) -> Option<LampReward> {
    let (matcher, site) = MATCHERS
        .iter()
        .find_map(|matcher| (matcher.find)(source).map(|site| (matcher, site)))?;

    crate::log_debug!("Lamp reward matched", "matcher" => matcher.name, "offset" => site.start);

    let call = LampCall::new(&site);
    let defaults = LampReward::default();

    Some(LampReward {
        skills: first_rule(SKILL_RULES, &call).unwrap_or(defaults.skills),
        value: first_rule(VALUE_RULES, &call).unwrap_or(defaults.value),
        quantity: first_rule(QUANTITY_RULES, &call).unwrap_or(defaults.quantity),
    })
}

fn first_rule<T>(rules: &[FieldRule<T>], call: &LampCall<'_>) -> Option<T> {
    rules.iter().find_map(|rule| rule(call))
}

// ============================================================================
// MATCHERS
// ============================================================================

fn explicit_lamp_reward(source: &str) -> Option<CallSite<'_>> {
    constructor_calls(source, "LampReward").into_iter().next()
}

fn reward_named_lamp(source: &str) -> Option<CallSite<'_>> {
    ["ItemReward", "UnlockReward"]
        .iter()
        .flat_map(|kind| constructor_calls(source, kind))
        .filter(|site| {
            site.arguments()
                .first()
                .and_then(|arg| read_string_argument(arg))
                .is_some_and(|title| title.to_lowercase().contains("lamp"))
        })
        .min_by_key(|site| site.start)
}

// ============================================================================
// FIELD RULES
// ============================================================================

fn skills_from_constants(call: &LampCall<'_>) -> Option<String> {
    let skills: Vec<&str> = SKILL_CONSTANT
        .captures_iter(call.text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    (!skills.is_empty()).then(|| skills.join(", "))
}

fn skills_from_parenthesised_text(call: &LampCall<'_>) -> Option<String> {
    let title = call.first_string_argument()?;
    let caps = PARENTHESISED.captures(&title)?;
    let inner = caps.get(1)?.as_str().trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

fn value_from_xp_text(call: &LampCall<'_>) -> Option<i64> {
    let caps = XP_AMOUNT.captures(call.text)?;
    caps.get(1)?.as_str().replace(',', "").parse().ok()
}

fn value_from_integer_argument(call: &LampCall<'_>) -> Option<i64> {
    call.args.iter().find_map(|arg| parse_int(arg))
}

fn quantity_from_text(call: &LampCall<'_>) -> Option<i64> {
    let title = call.first_string_argument()?;
    let caps = QUANTITY_TIMES.captures(&title)?;
    caps.get(1)?.as_str().parse().ok()
}

/// A trailing integer is a quantity only when a value integer precedes it
fn quantity_from_last_argument(call: &LampCall<'_>) -> Option<i64> {
    let (last, leading) = call.args.split_last()?;
    let quantity = parse_int(last)?;
    leading
        .iter()
        .any(|arg| parse_int(arg).is_some())
        .then_some(quantity)
}
