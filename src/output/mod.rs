pub mod export;

use colored::{ColoredString, Colorize};
use serde_json::Value;

use crate::client::LookupStatus;
use crate::mapper::{CanonicalRecord, DisplayRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Results,
    Json,
    All,
}

impl View {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "results" | "cards" => Some(Self::Results),
            "json" | "raw" => Some(Self::Json),
            "all" | "both" => Some(Self::All),
            _ => None,
        }
    }

    pub fn shows_results(&self) -> bool {
        matches!(self, Self::Results | Self::All)
    }

    pub fn shows_json(&self) -> bool {
        matches!(self, Self::Json | Self::All)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }

    fn key(&self, label: &str) -> ColoredString {
        match self {
            Self::Light => label.bold().blue(),
            Self::Dark => label.bold().bright_white(),
        }
    }

    fn value(&self, text: &str) -> ColoredString {
        match self {
            Self::Light => text.green(),
            Self::Dark => text.bright_green(),
        }
    }

    fn heading(&self, text: &str) -> ColoredString {
        match self {
            Self::Light => text.bold().purple(),
            Self::Dark => text.bold().bright_magenta(),
        }
    }
}

/// Strings render bare; every other value renders as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn capitalize(slot: &str) -> String {
    let mut chars = slot.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn indent(text: &str, by: &str) -> String {
    text.lines()
        .map(|line| format!("{by}{line}\n"))
        .collect()
}

pub fn render_status(status: LookupStatus) -> String {
    format!("{} {}\n", ":: Status:".bold(), status)
}

fn render_canonical(out: &mut String, record: &CanonicalRecord, theme: Theme, pad: &str) {
    for (slot, value) in record.present_slots() {
        out.push_str(&format!(
            "{pad}{:<9} {}\n",
            theme.key(&format!("{}:", capitalize(slot))),
            theme.value(&value_text(value))
        ));
    }
    if let Some(others) = record.others.as_ref() {
        out.push_str(&format!("{pad}{}\n", theme.key("More:")));
        out.push_str(&indent(&pretty(others), &format!("{pad}  ")));
    }
}

fn render_record(out: &mut String, record: &DisplayRecord, theme: Theme, pad: &str) {
    match record {
        DisplayRecord::Canonical(canonical) => render_canonical(out, canonical, theme, pad),
        other => out.push_str(&indent(&pretty(other), pad)),
    }
}

/// Card view for one record, numbered list for several.
pub fn render_results(records: &[DisplayRecord], theme: Theme) -> String {
    let mut out = String::new();
    match records {
        [] => out.push_str("No results\n"),
        [single] => render_record(&mut out, single, theme, ""),
        many => {
            for (idx, record) in many.iter().enumerate() {
                out.push_str(&format!("{}\n", theme.heading(&format!("Result {}", idx + 1))));
                render_record(&mut out, record, theme, "  ");
            }
        }
    }
    out
}

pub fn render_json(raw: &Value) -> String {
    let mut out = pretty(raw);
    out.push('\n');
    out
}
