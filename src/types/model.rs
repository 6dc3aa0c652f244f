use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a Gemini model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or private models)
    Custom(String),
}

/// Known Gemini model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Gemini 2.5 Pro
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,

    /// Gemini 2.5 Flash
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,

    /// Gemini 2.5 Flash-Lite
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,

    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,

    /// Gemini 2.0 Flash-Lite
    #[serde(rename = "gemini-2.0-flash-lite")]
    Gemini20FlashLite,

    /// Gemini 1.5 Pro
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,

    /// Gemini 1.5 Flash
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,

    /// Gemini 1.5 Flash-8B
    #[serde(rename = "gemini-1.5-flash-8b")]
    Gemini15Flash8B,
}

impl Model {
    /// The default model: the lightweight flash-lite variant.
    pub fn default_model() -> Self {
        Model::Known(KnownModel::Gemini20FlashLite)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::default_model()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::Gemini25Pro => write!(f, "gemini-2.5-pro"),
            KnownModel::Gemini25Flash => write!(f, "gemini-2.5-flash"),
            KnownModel::Gemini25FlashLite => write!(f, "gemini-2.5-flash-lite"),
            KnownModel::Gemini20Flash => write!(f, "gemini-2.0-flash"),
            KnownModel::Gemini20FlashLite => write!(f, "gemini-2.0-flash-lite"),
            KnownModel::Gemini15Pro => write!(f, "gemini-1.5-pro"),
            KnownModel::Gemini15Flash => write!(f, "gemini-1.5-flash"),
            KnownModel::Gemini15Flash8B => write!(f, "gemini-1.5-flash-8b"),
        }
    }
}

/// Error returned when a string does not name a known model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModelError(pub String);

impl fmt::Display for UnknownModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model: {}", self.0)
    }
}

impl std::error::Error for UnknownModelError {}

impl FromStr for KnownModel {
    type Err = UnknownModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini-2.5-pro" => Ok(KnownModel::Gemini25Pro),
            "gemini-2.5-flash" => Ok(KnownModel::Gemini25Flash),
            "gemini-2.5-flash-lite" => Ok(KnownModel::Gemini25FlashLite),
            "gemini-2.0-flash" => Ok(KnownModel::Gemini20Flash),
            "gemini-2.0-flash-lite" => Ok(KnownModel::Gemini20FlashLite),
            "gemini-1.5-pro" => Ok(KnownModel::Gemini15Pro),
            "gemini-1.5-flash" => Ok(KnownModel::Gemini15Flash),
            "gemini-1.5-flash-8b" => Ok(KnownModel::Gemini15Flash8B),
            _ => Err(UnknownModelError(s.to_string())),
        }
    }
}

impl FromStr for Model {
    type Err = UnknownModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownModel::from_str(s).map(Model::Known)
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::Custom(model.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let model = Model::Known(KnownModel::Gemini20FlashLite);
        assert_eq!(model.to_string(), "gemini-2.0-flash-lite");

        let model = Model::Custom("gemini-exp-1206".to_string());
        assert_eq!(model.to_string(), "gemini-exp-1206");
    }

    #[test]
    fn test_default_model() {
        assert_eq!(
            Model::default(),
            Model::Known(KnownModel::Gemini20FlashLite)
        );
    }

    #[test]
    fn test_from_str_known() {
        let model: Model = "gemini-2.5-flash".parse().unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gemini25Flash));
    }

    #[test]
    fn test_from_str_unknown_falls_back_to_custom() {
        let name = "gemini-exp-1206";
        let model = name
            .parse::<Model>()
            .unwrap_or_else(|_| Model::Custom(name.to_string()));
        assert_eq!(model, Model::Custom("gemini-exp-1206".to_string()));
    }

    #[test]
    fn test_known_model_serialization() {
        let model = Model::Known(KnownModel::Gemini20FlashLite);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-2.0-flash-lite""#);
    }

    #[test]
    fn test_custom_model_serialization() {
        let model = Model::Custom("gemini-exp-1206".to_string());
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-exp-1206""#);
    }

    #[test]
    fn test_model_deserialization() {
        let model: Model = serde_json::from_str(r#""gemini-2.5-flash""#).unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gemini25Flash));

        let model: Model = serde_json::from_str(r#""gemini-exp-1206""#).unwrap();
        assert_eq!(model, Model::Custom("gemini-exp-1206".to_string()));
    }
}
