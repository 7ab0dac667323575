//! Tailored instructions for when the base instructions would repeat.

use crate::models::{Severity, Trend};

use super::types::TailoredInstructions;

/// Remediation script family, chosen from the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptFamily {
    Fracture,
    Bleeding,
    Burn,
    Allergic,
    Generic,
}

impl ScriptFamily {
    fn for_category(category: Option<&str>) -> Self {
        match category.unwrap_or_default() {
            "fracture" | "break" => Self::Fracture,
            "bleeding" | "hemorrhage" | "wound" | "cut" | "laceration" => Self::Bleeding,
            "burn" | "scald" => Self::Burn,
            "allergic reaction" | "allergic" | "anaphylaxis" => Self::Allergic,
            _ => Self::Generic,
        }
    }

    fn script_name(&self) -> &'static str {
        match self {
            Self::Fracture => "fracture_escalation",
            Self::Bleeding => "bleeding_escalation",
            Self::Burn => "burn_escalation",
            Self::Allergic => "allergic_escalation",
            Self::Generic => "generic_escalation",
        }
    }

    fn steps(&self) -> &'static [&'static str] {
        match self {
            Self::Fracture => &[
                "Do not try to straighten the limb or push a bone back in.",
                "Support the injured part in the position you found it, using padding or a sling.",
                "Check fingers or toes below the injury for colour, warmth, and feeling every few minutes.",
                "Keep the person still and warm until help arrives.",
            ],
            Self::Bleeding => &[
                "Press firmly on the wound with a clean cloth and do not lift it to check.",
                "If blood soaks through, add more cloth on top and keep pressing harder.",
                "Raise the injured part above heart level if that does not cause more pain.",
                "Have the person lie down and keep them warm while you wait for help.",
            ],
            Self::Burn => &[
                "Keep cooling the burn under cool running water for at least 20 minutes.",
                "Remove rings, watches, or clothing near the burn unless stuck to the skin.",
                "Cover the burn loosely with cling film or a clean non-fluffy dressing.",
                "Do not pop blisters or apply creams, ice, or butter.",
            ],
            Self::Allergic => &[
                "If the person has an adrenaline auto-injector, use it in the outer thigh now.",
                "Help them sit up if breathing is hard, or lie flat with legs raised if they feel faint.",
                "If there is no improvement after 5 minutes, give a second auto-injector if available.",
                "Stay with them and watch their breathing until help arrives.",
            ],
            Self::Generic => &[
                "Keep the person still, calm, and comfortable.",
                "Watch their breathing and responsiveness closely.",
                "Do not give food or drink.",
                "Note when symptoms started and any changes to tell responders.",
            ],
        }
    }
}

const MAINTAIN_COURSE_STEPS: &[&str] = &[
    "Keep doing what you are doing; the condition is holding steady.",
    "Check the injured area again in 10 to 15 minutes.",
    "Tell me straight away if anything gets worse or new symptoms appear.",
];

const RECHECK_STEPS: &[&str] = &[
    "Check the injured area every 10 to 15 minutes for changes in pain, swelling, colour, or bleeding.",
    "Keep the area clean, supported, and at rest.",
    "Let me know whether it is getting better, staying the same, or getting worse.",
];

const TAPER_CARE_STEPS: &[&str] = &[
    "The condition is improving, so you can ease off gradually.",
    "Keep the area clean and protected, and rest it for the remainder of the day.",
    "Watch for signs of infection such as increasing redness, warmth, or pus over the next days.",
];

/// Picks a replacement script when the caller's base instructions repeat.
#[derive(Debug, Clone)]
pub struct InstructionTailor {
    emergency_contact: String,
}

impl InstructionTailor {
    pub fn new(emergency_contact: impl Into<String>) -> Self {
        Self {
            emergency_contact: emergency_contact.into(),
        }
    }

    /// `None` unless the caller flagged the base instructions as a repeat.
    pub fn tailor(
        &self,
        category: Option<&str>,
        trend: Trend,
        severity: Option<Severity>,
        repeated: bool,
    ) -> Option<TailoredInstructions> {
        if !repeated {
            return None;
        }

        if trend == Trend::Worse || severity == Some(Severity::High) {
            let family = ScriptFamily::for_category(category);
            let mut steps = vec![format!(
                "Call {} now, or have someone nearby call for you.",
                self.emergency_contact
            )];
            steps.extend(family.steps().iter().map(|s| s.to_string()));
            return Some(TailoredInstructions {
                script: family.script_name().to_string(),
                steps,
                escalated: true,
            });
        }

        let (script, steps) = match trend {
            Trend::Same => ("maintain_course", MAINTAIN_COURSE_STEPS),
            Trend::Better => ("taper_care", TAPER_CARE_STEPS),
            Trend::Unknown | Trend::Worse => ("recheck_periodically", RECHECK_STEPS),
        };
        Some(TailoredInstructions {
            script: script.to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            escalated: false,
        })
    }
}
