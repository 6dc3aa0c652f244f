//! Configuration for the chat application.
//!
//! Two sources feed a resolved [`ChatConfig`]: a JSON configuration file
//! holding the credential and model name, and CLI arguments parsed via
//! `arrrg`. The file is mandatory and read once at startup; a missing file
//! or missing key is fatal before any remote client is constructed.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::session::{DEFAULT_RETRIES, DEFAULT_SYSTEM_INSTRUCTION};
use crate::typewriter::DEFAULT_TYPE_DELAY;
use crate::types::Model;

/// Default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// The JSON configuration file.
///
/// Exactly two keys are recognized: the API credential and the model name.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    /// The Gemini API credential.
    #[serde(rename = "GOOGLE_AI_STUDIO_API_KEY")]
    pub api_key: String,

    /// The model to converse with.
    #[serde(rename = "MODEL_NAME")]
    pub model_name: String,
}

impl FileConfig {
    /// Loads the configuration file from the given path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is absent, unreadable, or
    /// missing either key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file = File::open(path)
            .map_err(|err| Error::config(format!("cannot open: {err}"), Some(display.clone())))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|err| Error::config(err.to_string(), Some(display)))
    }
}

/// Command-line arguments for the gemchat binary.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Path to the JSON configuration file.
    #[arrrg(optional, "Path to the configuration file (default: config.json)", "PATH")]
    pub config: Option<String>,

    /// Model to use, overriding the configuration file.
    #[arrrg(optional, "Model to use (default: from config file)", "MODEL")]
    pub model: Option<String>,

    /// Number of send attempts on overload.
    #[arrrg(optional, "Send attempts on overload (default: 4)", "N")]
    pub retries: Option<u32>,

    /// Typewriter delay between characters, in milliseconds.
    #[arrrg(optional, "Typewriter delay in milliseconds (default: 30)", "MS")]
    pub type_delay_ms: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// the configuration file and command-line arguments.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to converse with.
    pub model: Model,

    /// The system instruction applied to the conversation.
    pub system_instruction: String,

    /// Number of send attempts on overload.
    pub retries: u32,

    /// Typewriter delay between characters.
    pub type_delay: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.0-flash-lite
    /// - Retries: 4
    /// - Typewriter delay: 30 ms
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            retries: DEFAULT_RETRIES,
            type_delay: DEFAULT_TYPE_DELAY,
            use_color: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Sets the retry limit.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the typewriter delay.
    pub fn with_type_delay(mut self, delay: Duration) -> Self {
        self.type_delay = delay;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Resolves configuration from the config file plus CLI overrides.
    ///
    /// CLI arguments win over the file; the file's model applies when no
    /// `--model` was given.
    pub fn resolve(file: &FileConfig, args: ChatArgs) -> Self {
        let mut config = ChatConfig::new().with_model(parse_model(&file.model_name));
        if let Some(model) = args.model {
            config.model = parse_model(&model);
        }
        if let Some(retries) = args.retries {
            config.retries = retries;
        }
        if let Some(ms) = args.type_delay_ms {
            config.type_delay = Duration::from_millis(ms);
        }
        config.use_color = !args.no_color;
        config
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let mut config = ChatConfig::new();
        if let Some(model) = args.model {
            config.model = parse_model(&model);
        }
        if let Some(retries) = args.retries {
            config.retries = retries;
        }
        if let Some(ms) = args.type_delay_ms {
            config.type_delay = Duration::from_millis(ms);
        }
        config.use_color = !args.no_color;
        config
    }
}

fn parse_model(name: &str) -> Model {
    name.parse::<Model>()
        .unwrap_or_else(|_| Model::Custom(name.to_string()))
}
