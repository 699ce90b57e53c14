//! Board configuration: the host's recognized options parsed once.
//!
//! The embedding host hands the board a flat map of string options. This
//! module turns that map into a typed [`BoardOptions`] at construction
//! time, collecting a [`ConfigIssue`] per malformed key so one broken value
//! degrades only itself.

use crate::filter::{FilterPreset, QuickFilterFieldConfig};
use cardwall_fields::parse::{parse_field_list, parse_field_map, parse_stage_orders};
use cardwall_fields::{ConfigIssue, FieldRules, LinkStyle, StageOrder};
use std::collections::HashMap;

/// Recognized option keys.
pub mod keys {
    pub const DEFAULT_VIEW: &str = "defaultview";
    pub const DISPLAY_NAMES: &str = "displaynames";
    pub const HIDDEN_FIELDS: &str = "hiddenfields";
    pub const HTML_FIELDS: &str = "htmlfields";
    pub const PERSONA_FIELDS: &str = "personafields";
    pub const EMAIL_FIELDS: &str = "emailfields";
    pub const PHONE_FIELDS: &str = "phonefields";
    pub const ELLIPSIS_FIELDS: &str = "ellipsisfields";
    pub const FIELD_WIDTHS: &str = "fieldwidths";
    pub const QUICK_FILTERS: &str = "quickfilters";
    pub const FILTER_PRESETS: &str = "filterpresets";
    pub const STAGE_ORDER: &str = "stageorder";
    pub const SUM_FIELD: &str = "sumfield";
}

/// Typed board configuration, parsed once at board initialization.
#[derive(Debug, Clone, Default)]
pub struct BoardOptions {
    /// View selected on first load, when it exists in the catalog
    pub default_view: Option<String>,
    /// Per-field presentation rules
    pub rules: FieldRules,
    /// Quick-filter controls to offer
    pub quick_filters: Vec<QuickFilterFieldConfig>,
    /// Named filter snapshots
    pub presets: Vec<FilterPreset>,
    /// Stage-order table for process views
    pub stage_orders: Vec<StageOrder>,
    /// Numeric field summed in column aggregates
    pub sum_field: Option<String>,
    /// Per-key problems found while parsing; surfaced, never fatal
    pub issues: Vec<ConfigIssue>,
}

impl BoardOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host's raw option map.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let mut options = Self::new();
        let value = |key: &str| raw.get(key).map(String::as_str).unwrap_or("");

        options.default_view = raw
            .get(keys::DEFAULT_VIEW)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        options.sum_field = raw
            .get(keys::SUM_FIELD)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (names, issue) = parse_field_map(keys::DISPLAY_NAMES, value(keys::DISPLAY_NAMES));
        options.push_issue(issue);
        for (field, name) in names {
            options.rules.set_display_name(&field, name);
        }

        for (key, apply) in [
            (keys::HIDDEN_FIELDS, FieldRules::set_hidden as fn(&mut FieldRules, &str)),
            (keys::HTML_FIELDS, FieldRules::set_render_html),
            (keys::PERSONA_FIELDS, FieldRules::set_persona),
            (keys::ELLIPSIS_FIELDS, FieldRules::set_ellipsis),
        ] {
            let (fields, issue) = parse_field_list(key, value(key));
            options.push_issue(issue);
            for field in fields {
                apply(&mut options.rules, &field);
            }
        }

        for (key, style) in [
            (keys::EMAIL_FIELDS, LinkStyle::Email),
            (keys::PHONE_FIELDS, LinkStyle::Phone),
        ] {
            let (fields, issue) = parse_field_list(key, value(key));
            options.push_issue(issue);
            for field in fields {
                options.rules.set_link_style(&field, style);
            }
        }

        let (widths, issue) = parse_field_map(keys::FIELD_WIDTHS, value(keys::FIELD_WIDTHS));
        options.push_issue(issue);
        for (field, width) in widths {
            match width.trim().parse::<u8>() {
                Ok(pct) => options.rules.set_width(&field, pct),
                Err(_) => options.push_issue(Some(ConfigIssue::new(
                    keys::FIELD_WIDTHS,
                    format!("width for '{}' must be a number between 1 and 100", field),
                ))),
            }
        }

        let (stage_orders, issue) = parse_stage_orders(keys::STAGE_ORDER, value(keys::STAGE_ORDER));
        options.push_issue(issue);
        options.stage_orders = stage_orders;

        options.quick_filters =
            parse_json_list(keys::QUICK_FILTERS, value(keys::QUICK_FILTERS), &mut options.issues);
        options.presets =
            parse_json_list(keys::FILTER_PRESETS, value(keys::FILTER_PRESETS), &mut options.issues);

        options
    }

    fn push_issue(&mut self, issue: Option<ConfigIssue>) {
        if let Some(issue) = issue {
            self.issues.push(issue);
        }
    }

    /// Builder-style setters used by hosts that configure in code.
    pub fn with_default_view(mut self, name: impl Into<String>) -> Self {
        self.default_view = Some(name.into());
        self
    }

    pub fn with_stage_orders(mut self, orders: Vec<StageOrder>) -> Self {
        self.stage_orders = orders;
        self
    }

    pub fn with_quick_filters(mut self, filters: Vec<QuickFilterFieldConfig>) -> Self {
        self.quick_filters = filters;
        self
    }

    pub fn with_presets(mut self, presets: Vec<FilterPreset>) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_sum_field(mut self, field: impl Into<String>) -> Self {
        self.sum_field = Some(field.into());
        self
    }

    /// Find a preset by id
    pub fn preset(&self, id: &str) -> Option<&FilterPreset> {
        self.presets.iter().find(|p| p.id == id)
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(
    key: &str,
    raw: &str,
    issues: &mut Vec<ConfigIssue>,
) -> Vec<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(raw) {
        Ok(list) => list,
        Err(err) => {
            let issue = ConfigIssue::new(key, format!("malformed JSON array: {}", err));
            tracing::warn!(key = %issue.key, "configuration value degraded: {}", issue.message);
            issues.push(issue);
            Vec::new()
        }
    }
}
