//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the conversation history.
    Clear,

    /// Print the conversation history.
    History,

    /// Change the model.
    Model(String),

    /// Set or clear the system instruction.
    /// `None` restores the default instruction.
    System(Option<String>),

    /// Set the number of send attempts on overload.
    Retries(u32),

    /// Set the typewriter delay in milliseconds.
    Delay(u64),

    /// Display session statistics (message count, token totals, etc.).
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use gemchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/model gemini-2.5-flash").is_some());
/// assert!(parse_command("Hello, Gemini!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "history" => ChatCommand::History,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "system" => ChatCommand::System(argument.map(|s| s.to_string())),
        "retries" => match argument {
            Some(arg) => match arg.parse::<u32>() {
                Ok(value) if value >= 1 => ChatCommand::Retries(value),
                _ => ChatCommand::Invalid("/retries expects a positive integer".to_string()),
            },
            None => ChatCommand::Invalid("/retries requires a value".to_string()),
        },
        "delay" => match argument {
            Some(arg) => match arg.parse::<u64>() {
                Ok(value) => ChatCommand::Delay(value),
                Err(_) => {
                    ChatCommand::Invalid("/delay expects milliseconds as an integer".to_string())
                }
            },
            None => ChatCommand::Invalid("/delay requires a value".to_string()),
        },
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear conversation history
  /history               Print the conversation so far
  /model <name>          Change the model (e.g., /model gemini-2.5-flash)
  /system [instruction]  Set system instruction (no argument restores default)
  /retries <n>           Set send attempts on overload
  /delay <ms>            Set typewriter delay in milliseconds
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_clear_and_history() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn parse_model() {
        assert_eq!(
            parse_command("/model gemini-2.5-flash"),
            Some(ChatCommand::Model("gemini-2.5-flash".to_string()))
        );
        assert_eq!(
            parse_command("/model   gemini-2.0-flash-lite  "),
            Some(ChatCommand::Model("gemini-2.0-flash-lite".to_string()))
        );
        assert_eq!(
            parse_command("/model"),
            Some(ChatCommand::Invalid(
                "/model requires a model name".to_string()
            ))
        );
    }

    #[test]
    fn parse_system() {
        assert_eq!(
            parse_command("/system You are a pirate"),
            Some(ChatCommand::System(Some("You are a pirate".to_string())))
        );
        assert_eq!(parse_command("/system"), Some(ChatCommand::System(None)));
    }

    #[test]
    fn parse_retries() {
        assert_eq!(parse_command("/retries 6"), Some(ChatCommand::Retries(6)));
        assert!(matches!(
            parse_command("/retries 0"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("positive")
        ));
        assert!(matches!(
            parse_command("/retries"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_delay() {
        assert_eq!(parse_command("/delay 10"), Some(ChatCommand::Delay(10)));
        assert!(matches!(
            parse_command("/delay soon"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("milliseconds")
        ));
    }

    #[test]
    fn parse_stats() {
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(matches!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("/frobnicate")
        ));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, Gemini!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(!help.is_empty());
        assert!(help.contains("/quit"));
        assert!(help.contains("/clear"));
        assert!(help.contains("/model"));
        assert!(help.contains("/retries"));
    }
}
