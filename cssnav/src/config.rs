use anyhow::bail;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};
use tower_lsp::lsp_types::{self, ConfigurationItem, InitializeParams, PositionEncodingKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionEncoding {
    Utf16,
    Utf8,
}

impl From<PositionEncoding> for lsp_types::PositionEncodingKind {
    fn from(position_encoding: PositionEncoding) -> Self {
        match position_encoding {
            PositionEncoding::Utf16 => Self::UTF16,
            PositionEncoding::Utf8 => Self::UTF8,
        }
    }
}

/// Configuration set at initialization that won't change within a single session
#[derive(Debug)]
pub struct ConstConfig {
    pub position_encoding: PositionEncoding,
}

impl ConstConfig {
    fn choose_encoding(params: &InitializeParams) -> PositionEncoding {
        let offers_utf8 = params
            .capabilities
            .general
            .as_ref()
            .and_then(|general| general.position_encodings.as_ref())
            .is_some_and(|encodings| encodings.contains(&PositionEncodingKind::UTF8));
        if offers_utf8 {
            PositionEncoding::Utf8
        } else {
            PositionEncoding::Utf16
        }
    }
}

impl From<&InitializeParams> for ConstConfig {
    fn from(params: &InitializeParams) -> Self {
        Self {
            position_encoding: Self::choose_encoding(params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureMode {
    Disable,
    #[default]
    Enable,
}

impl FeatureMode {
    pub fn is_enabled(self) -> bool {
        self == Self::Enable
    }
}

const CONFIG_ITEMS: &[&str] = &["hover", "workspaceSymbols"];

#[derive(Debug, Default)]
pub struct Config {
    pub hover: FeatureMode,
    pub workspace_symbols: FeatureMode,
}

impl Config {
    pub fn get_items() -> Vec<ConfigurationItem> {
        let sections = CONFIG_ITEMS
            .iter()
            .flat_map(|item| [format!("cssnav.{item}"), item.to_string()]);

        sections
            .map(|section| ConfigurationItem {
                section: Some(section),
                ..Default::default()
            })
            .collect()
    }

    /// Pairs the answers to [`Config::get_items`] back up with their item.
    pub fn values_to_map(values: Vec<Value>) -> Map<String, Value> {
        let unpaired_values = values
            .into_iter()
            .tuples()
            .map(|(a, b)| if !a.is_null() { a } else { b });

        CONFIG_ITEMS
            .iter()
            .map(|item| item.to_string())
            .zip(unpaired_values)
            .collect()
    }

    pub fn update(&mut self, update: &Value) -> anyhow::Result<()> {
        match update {
            Value::Object(update) => self.update_by_map(update),
            _ => bail!("got invalid configuration object {update}"),
        }
    }

    /// Unknown keys are ignored. An item that is present but not a valid mode
    /// fails the whole update and leaves the config untouched.
    pub fn update_by_map(&mut self, update: &Map<String, Value>) -> anyhow::Result<()> {
        // settings pushed by the client are nested under our section name
        let update = match update.get("cssnav") {
            Some(Value::Object(section)) => section,
            _ => update,
        };

        let hover = Self::mode(update, "hover")?;
        let workspace_symbols = Self::mode(update, "workspaceSymbols")?;

        if let Some(hover) = hover {
            self.hover = hover;
        }
        if let Some(workspace_symbols) = workspace_symbols {
            self.workspace_symbols = workspace_symbols;
        }
        Ok(())
    }

    fn mode(update: &Map<String, Value>, item: &str) -> anyhow::Result<Option<FeatureMode>> {
        match update.get(item) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match FeatureMode::deserialize(value) {
                Ok(mode) => Ok(Some(mode)),
                Err(err) => bail!("invalid value {value} for `{item}`: {err}"),
            },
        }
    }
}
