//! Follow-up question selection.
//!
//! A fixed priority table: recovery silences everything, high severity
//! overrides every category rule, then category-specific questions, then a
//! generic fallback.

use serde::Serialize;

use crate::models::{Severity, Trend};

pub const LIFE_THREATENING_QUESTION: &str =
    "Are there any life-threatening signs right now: heavy bleeding that won't stop with \
     pressure, trouble breathing, or is the person unconscious or unresponsive?";
pub const BLEEDING_LOCATION_QUESTION: &str =
    "Where exactly is the bleeding, and how large or deep is the wound?";
pub const BLEEDING_TREND_QUESTION: &str =
    "Has the bleeding stopped, slowed, stayed steady, or is it getting worse?";
pub const BLEEDING_PRESSURE_QUESTION: &str =
    "Have you held firm, steady pressure on the wound for at least 10 minutes without \
     lifting to check?";
pub const BURN_LOCATION_QUESTION: &str =
    "Where is the burn, and roughly how large is it compared with the palm of your hand?";
pub const BURN_DEPTH_QUESTION: &str =
    "Is the burned skin blistering, or does any of it look white, leathery, or charred?";
pub const SOFT_TISSUE_TREND_QUESTION: &str =
    "Is the pain or swelling getting better, staying the same, or getting worse?";
pub const SOFT_TISSUE_MOBILITY_QUESTION: &str =
    "Can you move the area and put weight on it, and how much does that hurt?";
pub const FRACTURE_QUESTION: &str =
    "Have you kept the injured area still and supported, and is there any visible \
     deformity, numbness, or tingling below the injury?";
pub const GENERIC_TREND_QUESTION: &str =
    "Is it getting better, staying the same, or getting worse?";
pub const GENERIC_LOCATION_QUESTION: &str = "Where on the body is the problem?";
pub const GENERIC_PROBE_QUESTION: &str =
    "Is anything new or changing that I should know about?";

const BLEEDING_CATEGORIES: &[&str] = &["bleeding", "hemorrhage", "wound"];
const BURN_CATEGORIES: &[&str] = &["burn", "scald"];
const SOFT_TISSUE_CATEGORIES: &[&str] = &["sprain", "strain", "bruise", "contusion"];
const FRACTURE_CATEGORIES: &[&str] = &["fracture", "break"];

/// State the table is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct FollowUpContext<'a> {
    pub category: Option<&'a str>,
    pub severity: Option<Severity>,
    pub location_known: bool,
    pub trend: Trend,
    pub recovered: bool,
}

/// Which row of the table fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpKind {
    LifeThreatening,
    Location,
    Trend,
    BleedingPressure,
    BurnDepth,
    Mobility,
    Immobilization,
    GenericProbe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUp {
    pub kind: FollowUpKind,
    pub question: &'static str,
}

fn follow_up(kind: FollowUpKind, question: &'static str) -> Option<FollowUp> {
    Some(FollowUp { kind, question })
}

fn in_group(category: Option<&str>, group: &[&str]) -> bool {
    category.is_some_and(|c| group.contains(&c))
}

/// Next question to ask, or `None` when the user reports recovery.
pub fn select_follow_up(ctx: &FollowUpContext<'_>) -> Option<FollowUp> {
    if ctx.recovered {
        return None;
    }

    if ctx.severity == Some(Severity::High) {
        return follow_up(FollowUpKind::LifeThreatening, LIFE_THREATENING_QUESTION);
    }

    let trend_known = ctx.trend.is_known();

    if in_group(ctx.category, BLEEDING_CATEGORIES) {
        return if !ctx.location_known {
            follow_up(FollowUpKind::Location, BLEEDING_LOCATION_QUESTION)
        } else if !trend_known {
            follow_up(FollowUpKind::Trend, BLEEDING_TREND_QUESTION)
        } else {
            follow_up(FollowUpKind::BleedingPressure, BLEEDING_PRESSURE_QUESTION)
        };
    }

    if in_group(ctx.category, BURN_CATEGORIES) {
        return if !ctx.location_known {
            follow_up(FollowUpKind::Location, BURN_LOCATION_QUESTION)
        } else {
            follow_up(FollowUpKind::BurnDepth, BURN_DEPTH_QUESTION)
        };
    }

    if in_group(ctx.category, SOFT_TISSUE_CATEGORIES) {
        return if !trend_known {
            follow_up(FollowUpKind::Trend, SOFT_TISSUE_TREND_QUESTION)
        } else {
            follow_up(FollowUpKind::Mobility, SOFT_TISSUE_MOBILITY_QUESTION)
        };
    }

    if in_group(ctx.category, FRACTURE_CATEGORIES) {
        return follow_up(FollowUpKind::Immobilization, FRACTURE_QUESTION);
    }

    if !trend_known {
        follow_up(FollowUpKind::Trend, GENERIC_TREND_QUESTION)
    } else if !ctx.location_known {
        follow_up(FollowUpKind::Location, GENERIC_LOCATION_QUESTION)
    } else {
        follow_up(FollowUpKind::GenericProbe, GENERIC_PROBE_QUESTION)
    }
}
