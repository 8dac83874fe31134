use crate::design::classifier::{MatchedRule, classify_result};
use crate::design::demo::DemoDesign;
use crate::design::design_model::{ModelType, SavedDesign};
use crate::session::session_model::{Selection, SessionState};

// ============================================================================
// Console formatting for designs and session state
// ============================================================================

/// Format the saved design list, marking the displayed entry.
///
/// Produces output like:
/// ```text
/// === Saved designs (2) ===
///
/// * [7] 隐影坦克 (tank)  2024-05-01 08:30
///   [6] 东风-41洲际导弹 (missile)  2024-04-30 21:02
/// ```
pub fn format_design_list(designs: &[SavedDesign], selection: &Selection) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Saved designs ({}) ===\n\n", designs.len()));

    if designs.is_empty() {
        out.push_str("(none yet, try `generate`)\n");
        return out;
    }

    for design in designs {
        let marker = if selection.is_selected(&design.id) { "*" } else { " " };
        out.push_str(&format!(
            "{} [{}] {} ({})  {}\n",
            marker,
            design.id,
            design.name,
            classify_result(&design.result),
            design.created_at.format("%Y-%m-%d %H:%M")
        ));
    }

    out
}

/// Format what the viewer currently displays.
pub fn format_selection(state: SessionState, selection: &Selection) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Session: {:?} ===\n", state));

    let Some(result) = &selection.result else {
        out.push_str("(nothing selected)\n");
        return out;
    };

    out.push_str(&format!(
        "Design:  {} [{}]\n",
        result.name,
        selection.selected_id.as_deref().unwrap_or("unsaved")
    ));
    if let Some(model) = selection.current_model {
        out.push_str(&format!("Model:   {}\n", model));
    }
    if !selection.prompt.is_empty() {
        out.push_str(&format!("Prompt:  {}\n", selection.prompt));
    }
    if !result.description.is_empty() {
        out.push_str(&format!("About:   {}\n", result.description));
    }

    let s = &selection.stats;
    out.push_str(&format!(
        "Stats:   speed {}  armor {}  firepower {}  stealth {}\n",
        s.speed, s.armor, s.firepower, s.stealth
    ));

    if !result.technical_specs.is_empty() {
        out.push_str("Specs:\n");
        for (key, value) in &result.technical_specs {
            out.push_str(&format!("  {}: {}\n", key, value));
        }
    }

    if !result.design_suggestions.is_empty() {
        out.push_str("Suggestions:\n");
        for (i, suggestion) in result.design_suggestions.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, suggestion));
        }
    }

    out
}

pub fn format_demo_designs(demos: &[DemoDesign]) -> String {
    let mut out = String::from("=== Example designs ===\n\n");
    for demo in demos {
        out.push_str(&format!(
            "- {} ({})\n    prompt: {}\n",
            demo.result.name,
            demo.model(),
            demo.prompt
        ));
    }
    out
}

pub fn format_classification(model: ModelType, rule: &MatchedRule) -> String {
    let reason = match rule {
        MatchedRule::Keyword { priority, keyword } => {
            format!("keyword \"{}\" (rule {})", keyword, priority)
        }
        MatchedRule::EquipmentType { keyword } => format!("equipment type \"{}\"", keyword),
        MatchedRule::Hint => "AI model type hint".to_string(),
        MatchedRule::Default => "default".to_string(),
    };
    format!("{} \u{2190} {}\n", model, reason)
}
