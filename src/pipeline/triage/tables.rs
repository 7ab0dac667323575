//! Rule tables driving every triage detector.
//!
//! Tables are plain data handed to each detector at construction. `Default`
//! yields the built-in first-aid tables; callers may deserialize their own
//! (any omitted section falls back to the built-in one).

use serde::{Deserialize, Serialize};

use crate::models::Severity;

/// Complete set of heuristic tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageTables {
    /// Allow-list: words and phrases that signal a first-aid topic.
    pub first_aid_keywords: Vec<String>,
    /// Words that mark a message as off-topic when no first-aid word is present.
    pub off_topic_keywords: Vec<String>,
    /// Category rules, checked in order; first match wins.
    pub categories: Vec<CategoryRule>,
    /// Phrases that raise the severity hint to high.
    pub escalation_markers: Vec<String>,
    pub trend: TrendPatterns,
    pub recovery: RecoveryPatterns,
    /// Body-part words used to decide whether the location is known.
    pub body_parts: Vec<String>,
    /// Terms the clarification detector can suggest, with lay definitions.
    pub known_terms: Vec<KnownTerm>,
}

/// Maps text stems to one emergency category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub stems: Vec<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Regex sources for the three trend families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPatterns {
    pub worse: Vec<String>,
    pub better: Vec<String>,
    pub same: Vec<String>,
}

/// Regex sources for recovery detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryPatterns {
    /// Explicit resolution claims ("bleeding has stopped").
    pub resolution: Vec<String>,
    /// Bare acknowledgements ("yes", "thanks").
    pub confirmation: Vec<String>,
    /// Assistant phrasing that asks whether the problem resolved.
    pub resolution_question: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownTerm {
    pub term: String,
    pub definition: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn rule(category: &str, stems: &[&str], severity: Option<Severity>) -> CategoryRule {
    CategoryRule {
        category: category.to_string(),
        stems: strings(stems),
        severity,
    }
}

fn term(term: &str, definition: &str) -> KnownTerm {
    KnownTerm {
        term: term.to_string(),
        definition: definition.to_string(),
    }
}

impl Default for TriageTables {
    fn default() -> Self {
        Self {
            first_aid_keywords: strings(&[
                "bleed", "bleeding", "blood", "cut", "wound", "injury", "hurt",
                "pain", "ache", "aching", "burn", "scald", "bruise", "fracture",
                "sprain", "strain", "twist", "swelling", "numb", "tingling",
                "broken", "break", "dizzy", "faint", "choke", "choking", "allergic",
                "anaphylaxis", "sting", "bite", "rash", "fever", "headache",
                "migraine", "breathing", "trouble breathing", "emergency",
                "first aid", "ambulance", "wheeze", "seizure", "bleeder", "hemorrhage",
                "poison", "poisoning", "stroke", "heart", "cardiac", "cpr",
            ]),
            off_topic_keywords: strings(&[
                "weather", "stock", "stocks", "crypto", "bitcoin", "recipe", "recipes",
                "football", "soccer", "basketball", "movie", "movies", "politics",
                "election", "homework", "programming", "javascript", "python",
                "lyrics", "song", "joke", "hotel", "flight", "horoscope", "poem",
                "celebrity", "mortgage", "invest", "investing",
            ]),
            categories: vec![
                rule(
                    "bleeding",
                    &["bleed", "blood", "cut", "lacer", "wound", "hemorrh"],
                    Some(Severity::Medium),
                ),
                rule("burn", &["burn", "scald", "blister", "char"], Some(Severity::Medium)),
                rule(
                    "choking",
                    &["chok", "airway", "heimlich", "cant breathe", "can't breathe"],
                    Some(Severity::High),
                ),
                rule(
                    "allergic reaction",
                    &["allerg", "anaphyl", "hives", "swelling"],
                    Some(Severity::High),
                ),
                rule("bruise", &["bruise", "contusion"], None),
                rule("sprain", &["sprain", "strain", "twist"], None),
                rule(
                    "fracture",
                    &["fracture", "broken bone", "break", "crack"],
                    Some(Severity::High),
                ),
                rule("fainting", &["faint", "passed out", "dizzy", "lightheaded"], None),
                rule("headache", &["headache", "migraine"], None),
                rule("poisoning", &["poison", "overdose", "toxic"], None),
            ],
            escalation_markers: strings(&[
                "cannot breathe", "can't breathe", "cant breathe", "not breathing",
                "trouble breathing", "difficulty breathing", "unconscious",
                "unresponsive", "heavy", "severe", "spurting", "gushing",
                "won't stop", "wont stop", "turning blue", "seizure",
            ]),
            trend: TrendPatterns::default(),
            recovery: RecoveryPatterns::default(),
            body_parts: strings(&[
                "head", "scalp", "forehead", "face", "eye", "ear", "nose", "mouth",
                "lip", "jaw", "neck", "throat", "shoulder", "arm", "elbow", "forearm",
                "wrist", "hand", "palm", "finger", "thumb", "chest", "back", "stomach",
                "belly", "abdomen", "hip", "leg", "thigh", "knee", "shin", "calf",
                "ankle", "foot", "heel", "toe",
            ]),
            known_terms: vec![
                term("bleeding", "blood escaping from a cut or wound"),
                term("bruise", "skin discolored by bleeding under it after a knock"),
                term("burn", "skin damaged by heat, chemicals, or electricity"),
                term("scald", "a burn caused by hot liquid or steam"),
                term("sprain", "a stretched or torn ligament, often at the ankle or wrist"),
                term("strain", "an overstretched or torn muscle"),
                term("fracture", "a broken or cracked bone"),
                term("break", "a broken bone"),
                term("choke", "a blocked airway that stops normal breathing"),
                term("allergic", "a reaction of the immune system to a trigger"),
                term("anaphylaxis", "a severe, whole-body allergic reaction"),
                term("faint", "a brief loss of consciousness"),
                term("dizzy", "feeling lightheaded or unsteady"),
                term("headache", "pain anywhere in the head"),
                term("migraine", "an intense, often one-sided headache"),
                term("cut", "a break in the skin from a sharp object"),
                term("laceration", "a deep or jagged cut"),
                term("wound", "any injury that breaks the skin"),
                term("pain", "an unpleasant physical sensation"),
            ],
        }
    }
}

impl Default for TrendPatterns {
    fn default() -> Self {
        Self {
            worse: strings(&[
                r"\bgetting worse\b",
                r"\bworse\b",
                r"\bworsening\b",
                r"\bheavier\b",
                r"\bspreading\b",
                r"\bincreasing\b",
                r"\b(?:getting|even|much|a lot) more (?:pain|blood|swelling)\b",
                r"\bnot (?:getting )?better\b",
                r"\bno better\b",
                r"\bwon'?t stop\b",
                r"\bbigger\b",
            ]),
            better: strings(&[
                r"\bgetting better\b",
                r"\bbetter\b",
                r"\bimprov(?:ing|ed)\b",
                r"\blighter\b",
                r"\bslow(?:ing|ed)(?: down)?\b",
                r"\bless (?:pain|blood|swelling)\b",
                r"\beasing\b",
                r"\bsubsid(?:ing|ed)\b",
                r"\bgoing down\b",
            ]),
            same: strings(&[
                r"\bthe same\b",
                r"\bsame\b",
                r"\bno change\b",
                r"\bunchanged\b",
                r"\bsteady\b",
                r"\bnot changing\b",
                r"\bhasn'?t changed\b",
                r"\bstill\b",
            ]),
        }
    }
}

impl Default for RecoveryPatterns {
    fn default() -> Self {
        Self {
            resolution: strings(&[
                r"\ball good now\b",
                r"\ball better now\b",
                r"\bfeeling (?:fine|okay|ok|better) now\b",
                r"\bfeels? (?:fine|okay|ok|better) now\b",
                r"\bno(?: longer| more)? (?:hurting|hurt|pain|bleeding)(?: anymore)?\b",
                r"\bnot (?:painful|hurting|bleeding) anymore\b",
                r"\bpain (?:is )?gone\b",
                r"\bbleeding (?:has )?stopped\b",
                r"\b(?:pain|hurting|bleeding) (?:has )?stopped\b",
                r"\b(?:has |have )?stopped (?:bleeding|hurting)\b",
                r"\bit'?s healed now\b",
                r"\byes(?:,)? it (?:has )?stopped\b",
                r"\byep(?:,)? it (?:has )?stopped\b",
            ]),
            confirmation: strings(&[
                r"\byes\b",
                r"\byeah\b",
                r"\byep\b",
                r"\bok(?:ay)?\b",
                r"\bthanks\b",
                r"\bthank you\b",
                r"\bappreciate it\b",
            ]),
            // Only yes/no questions that end the message; a multiple-choice
            // prompt ("stopped, slowed, or ...?") is not a resolution question.
            resolution_question: strings(&[
                r"\b(?:has|have) (?:it|they|the \w+) (?:stopped|gone away|resolved|cleared up)(?: now)?\?\s*$",
                r"\b(?:is|are) (?:it|they|the \w+) (?:gone|resolved|better)(?: now)?\?\s*$",
                r"\bare you feeling better(?: now)?\?\s*$",
            ]),
        }
    }
}
