//! Interactive chat application for conversing with Gemini.
//!
//! This binary provides a REPL interface that sends each line to the Gemini
//! API and types the reply back incrementally.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; reads credential and model from config.json
//! gemchat
//!
//! # Point at a different configuration file
//! gemchat --config ~/.config/gemchat/config.json
//!
//! # Override the model from the command line
//! gemchat --model gemini-2.5-flash
//!
//! # Disable colors (useful for piping output)
//! gemchat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/history` - Print the conversation so far
//! - `/model <name>` - Change the model
//! - `/retries <n>` - Change the overload retry limit
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arrrg::CommandLine;
use futures::StreamExt;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use gemchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, DEFAULT_CONFIG_PATH, FileConfig, help_text, parse_command,
};
use gemchat::{
    ChatSession, DEFAULT_SYSTEM_INSTRUCTION, Gemini, GeminiChat, Model, PlainTextRenderer,
    Renderer, Role,
};

/// Main entry point for the gemchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemchat [OPTIONS]");
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Configuration problems are fatal before any client is constructed.
    let file = match FileConfig::load(&config_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let config = ChatConfig::resolve(&file, args);

    let client = Gemini::new(Some(file.api_key))?;
    let chat = GeminiChat::new(client, config.model.clone())
        .with_system_instruction(config.system_instruction.as_str());
    let mut session = ChatSession::new(chat)
        .with_retries(config.retries)
        .with_type_delay(config.type_delay);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for stopping typewriter output mid-stream
    let interrupted = Arc::new(AtomicBool::new(false));

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Gemini Chat (model: {})", session.backend().model());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.backend_mut().clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::History => {
                            print_history(&session);
                        }
                        ChatCommand::Model(model_name) => {
                            let model = model_name
                                .parse()
                                .unwrap_or_else(|_| Model::Custom(model_name.clone()));
                            session.backend_mut().set_model(model);
                            renderer.print_info(&format!("Model changed to: {}", model_name));
                        }
                        ChatCommand::System(instruction) => match instruction {
                            Some(instruction) => {
                                session
                                    .backend_mut()
                                    .set_system_instruction(instruction.as_str());
                                renderer.print_info(&format!(
                                    "System instruction set to: {}",
                                    instruction
                                ));
                            }
                            None => {
                                session
                                    .backend_mut()
                                    .set_system_instruction(DEFAULT_SYSTEM_INSTRUCTION);
                                renderer.print_info("System instruction restored to default.");
                            }
                        },
                        ChatCommand::Retries(value) => {
                            session.set_retries(value);
                            renderer.print_info(&format!("retries set to {value}"));
                        }
                        ChatCommand::Delay(ms) => {
                            session.set_type_delay(Duration::from_millis(ms));
                            renderer.print_info(&format!("typewriter delay set to {ms} ms"));
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API and type the reply back
                println!("Gemini:");
                match session.respond(line).await {
                    Ok(mut stream) => {
                        renderer.begin_reply();
                        while let Some(chunk) = stream.next().await {
                            if interrupted.load(Ordering::Relaxed) {
                                break;
                            }
                            renderer.print_chunk(&chunk);
                        }
                        renderer.finish_reply();
                    }
                    Err(e) => {
                        renderer.print_error(&e.to_string());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_history(session: &ChatSession<GeminiChat>) {
    if session.history().is_empty() {
        println!("    (no conversation yet)");
        return;
    }
    for content in session.history() {
        let speaker = match content.role {
            Role::User => "You",
            Role::Model => "Gemini",
        };
        println!("    {}: {}", speaker, content.text());
    }
}

fn print_stats(session: &ChatSession<GeminiChat>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    println!("      Retries: {}", stats.retries);
    println!(
        "      Total tokens: {} in / {} out ({} requests)",
        stats.total_prompt_tokens, stats.total_reply_tokens, stats.total_requests
    );
    if let Some(prompt) = stats.last_turn_prompt_tokens {
        let reply = stats.last_turn_reply_tokens.unwrap_or(0);
        println!("      Last turn tokens: {prompt} in / {reply} out");
    }
}
