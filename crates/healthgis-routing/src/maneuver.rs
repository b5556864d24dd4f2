//! Fallback instructions for steps the routing service did not describe.

use crate::types::Maneuver;

/// Returns the provider's instruction when present, otherwise one derived
/// from the maneuver type and modifier. Unknown types read "Continue".
#[must_use]
pub fn maneuver_instruction(maneuver: &Maneuver) -> String {
    if let Some(text) = maneuver
        .instruction
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return text.to_string();
    }

    let modifier = maneuver
        .modifier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match maneuver.kind.as_str() {
        "turn" => with_modifier("Turn", modifier, ""),
        "new name" => "Continue on road".to_string(),
        "depart" => "Depart".to_string(),
        "arrive" => "Arrive at destination".to_string(),
        "merge" => "Merge".to_string(),
        "on ramp" => "Take the ramp".to_string(),
        "off ramp" => "Take the exit".to_string(),
        "fork" => with_modifier("Take the", modifier, " fork"),
        "end of road" => with_modifier("At the end of the road, turn", modifier, ""),
        "continue" => "Continue straight".to_string(),
        "roundabout" => "Enter the roundabout".to_string(),
        "rotary" => "Enter the rotary".to_string(),
        _ => "Continue".to_string(),
    }
}

fn with_modifier(prefix: &str, modifier: Option<&str>, suffix: &str) -> String {
    match modifier {
        Some(m) => format!("{prefix} {m}{suffix}"),
        None => format!("{prefix}{suffix}"),
    }
}
