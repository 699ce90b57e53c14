//! Per-field presentation rules.
//!
//! A rule describes how one card field is labeled and rendered. Rules are
//! built once from the parsed configuration and looked up by field name;
//! fields without an explicit rule get the defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a field value is turned into a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkStyle {
    Email,
    Phone,
}

/// Presentation rule for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: String,
    /// Replaces the dataset column's display name when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub render_html: bool,
    #[serde(default)]
    pub persona: bool,
    /// Width percentage, clamped to 1..=100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_style: Option<LinkStyle>,
    #[serde(default)]
    pub ellipsis: bool,
}

fn default_visible() -> bool {
    true
}

impl FieldRule {
    /// Create a rule with defaults for the given field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            display_name: None,
            visible: true,
            render_html: false,
            persona: false,
            width_pct: None,
            link_style: None,
            ellipsis: false,
        }
    }
}

/// Lookup table of field rules, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRules {
    rules: IndexMap<String, FieldRule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, field: &str) -> &mut FieldRule {
        self.rules
            .entry(field.to_string())
            .or_insert_with(|| FieldRule::new(field))
    }

    /// The rule for a field, or the defaults if none was configured
    pub fn rule(&self, field: &str) -> FieldRule {
        self.rules
            .get(field)
            .cloned()
            .unwrap_or_else(|| FieldRule::new(field))
    }

    /// Whether the field appears on cards
    pub fn is_visible(&self, field: &str) -> bool {
        self.rules.get(field).map(|r| r.visible).unwrap_or(true)
    }

    /// The label to show for a field, honoring display-name overrides
    pub fn label_for(&self, field: &str, fallback: &str) -> String {
        self.rules
            .get(field)
            .and_then(|r| r.display_name.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn set_display_name(&mut self, field: &str, name: impl Into<String>) {
        self.entry(field).display_name = Some(name.into());
    }

    pub fn set_hidden(&mut self, field: &str) {
        self.entry(field).visible = false;
    }

    pub fn set_render_html(&mut self, field: &str) {
        self.entry(field).render_html = true;
    }

    pub fn set_persona(&mut self, field: &str) {
        self.entry(field).persona = true;
    }

    /// Set the width percentage, clamping into 1..=100
    pub fn set_width(&mut self, field: &str, pct: u8) {
        self.entry(field).width_pct = Some(pct.clamp(1, 100));
    }

    pub fn set_link_style(&mut self, field: &str, style: LinkStyle) {
        self.entry(field).link_style = Some(style);
    }

    pub fn set_ellipsis(&mut self, field: &str) {
        self.entry(field).ellipsis = true;
    }

    /// Number of fields with an explicit rule
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One row of the configured stage-order table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOrder {
    pub id: String,
    pub order: i64,
}
