//! Plain-text output for the terminal

use automation_core::{solar, Automation, SimulationResult, SolarEvent};
use std::fmt::Write;

/// One block per automation: header line, then indented triggers and actions
pub fn automations(list: &[Automation]) -> String {
    if list.is_empty() {
        return "No automations\n".to_string();
    }

    let mut out = String::new();
    for automation in list {
        let state = if automation.is_active() { "on" } else { "off" };
        let _ = writeln!(
            out,
            "[{state}] {} ({}, {})",
            automation.name(),
            automation.id(),
            automation.mode().as_str()
        );
        if !automation.description().is_empty() {
            let _ = writeln!(out, "    {}", automation.description());
        }
        for trigger in automation.triggers() {
            let _ = writeln!(out, "    when: {}", trigger.summary());
        }
        for action in automation.actions() {
            let _ = writeln!(out, "    do:   {}", action.summary());
        }
    }
    out
}

pub fn simulation(result: &SimulationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Simulated '{}'", result.automation.name());

    if result.has_conflicts() {
        let _ = writeln!(out, "Conflicts:");
        for conflict in &result.conflicts {
            let _ = write!(out, "  - {}: {}", conflict.kind, conflict.description);
            if let Some(threshold) = conflict.threshold {
                let _ = write!(out, " (threshold {threshold})");
            }
            if !conflict.days.is_empty() {
                let _ = write!(out, " on {}", conflict.days.join(", "));
            }
            out.push('\n');
        }
    } else {
        let _ = writeln!(out, "No conflicts");
    }

    for suggestion in &result.suggestions {
        let _ = write!(out, "Suggestion: {}", suggestion.kind);
        if let Some(time) = &suggestion.new_activation_time {
            let _ = write!(out, ", activate at {time}");
        }
        if let Some(saved) = suggestion.monthly_saved_money {
            let _ = write!(out, ", saves {saved:.2}/month");
        }
        out.push('\n');
    }
    out
}

/// Allowed offsets around an event, one per line
pub fn offsets(event: SolarEvent) -> String {
    solar::presets()
        .iter()
        .map(|offset| format!("{offset:>5}  {}\n", solar::offset_label(event, *offset)))
        .collect()
}
