use crate::config::EnduranceCfg;
use crate::estimator::Estimate;
use crate::types::BatteryLife;

/// One-line summary, hours to two decimals.
pub fn render_text(life: &BatteryLife) -> String {
    format!(
        "Expected battery life: {} days and {:.2} hours",
        life.days, life.hours
    )
}

pub fn render_json(estimate: &Estimate) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(estimate)
}

/// Aligned `key = value  # description` listing of the effective config.
pub fn render_config(cfg: &EnduranceCfg) -> String {
    let entries = cfg.to_entries();
    let width = entries.iter().map(|(k, _, _)| k.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(key, value, desc)| format!("{key:<width$} = {value:<10} # {desc}"))
        .collect::<Vec<_>>()
        .join("\n")
}
