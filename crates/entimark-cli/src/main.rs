mod config;

use clap::{Parser, Subcommand};
use entimark_renderer::{ConvertOptions, Entity, MessageConverter, Syntax};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser)]
#[command(version, about = "entimark - render message entities as HTML, Markdown, DokuWiki or text", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Message JSON file (`{"text": ..., "entities": [...]}`); `-` or nothing reads stdin
    input: Option<PathBuf>,

    /// Output syntax: html, markdown/md, docuwiki/dw; anything else renders plain text
    #[arg(short, long, env = "ENTIMARK_SYNTAX")]
    syntax: Option<String>,

    /// Path to a .toml or .json config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render entities that overlap without nesting instead of failing
    #[arg(long)]
    allow_crossing: bool,

    /// Log conversion details to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the recognised syntax names
    Syntaxes,
}

/// A message as sent by the Bot API, or just its text and entities.
#[derive(Debug, Deserialize)]
struct Message {
    #[serde(alias = "caption", alias = "message")]
    text: String,
    #[serde(default, alias = "caption_entities")]
    entities: Option<Vec<Entity>>,
}

fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Syntaxes) => {
            for syntax in Syntax::ALL {
                println!("{:<10} {}", syntax.name(), syntax.aliases().join(", "));
            }
            Ok(())
        }
        None => render_message(cli),
    }
}

fn render_message(cli: Cli) -> Result<()> {
    let config = Config::discover(cli.config.as_deref())?;

    let syntax = cli
        .syntax
        .or(config.syntax)
        .map(|name| Syntax::parse(&name))
        .unwrap_or(Syntax::Html);
    let options = ConvertOptions {
        allow_crossing_spans: cli.allow_crossing || config.allow_crossing_spans,
    };

    let raw = read_input(cli.input.as_ref())?;
    let message: Message = serde_json::from_str(&raw).into_diagnostic()?;
    tracing::debug!(
        %syntax,
        entities = message.entities.as_ref().map_or(0, Vec::len),
        "read message"
    );

    write_message(&message, syntax, options, &mut std::io::stdout().lock())
}

/// Writes the rendered message exactly as converted, with nothing appended.
fn write_message<W: Write>(
    message: &Message,
    syntax: Syntax,
    options: ConvertOptions,
    out: &mut W,
) -> Result<()> {
    let output = MessageConverter::new(&message.text, message.entities.as_deref())
        .with_options(options)
        .to_syntax(syntax)?;
    out.write_all(output.as_bytes()).into_diagnostic()?;
    out.flush().into_diagnostic()
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                return Err(miette::miette!("Input file not found: {}", path.display()));
            }
            std::fs::read_to_string(path).into_diagnostic()
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw).into_diagnostic()?;
            Ok(raw)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use super::*;
    use entimark_renderer::EntityKind;

    #[test]
    fn test_message_from_bot_api_json() {
        let message: Message = serde_json::from_str(
            r#"{"message_id": 7, "text": "hi there", "entities": [{"type": "bold", "offset": 0, "length": 2}]}"#,
        )
        .unwrap();
        assert_eq!(message.text, "hi there");
        assert_eq!(message.entities, Some(vec![Entity::new(EntityKind::Bold, 0, 2)]));
    }

    #[test]
    fn test_message_caption_aliases() {
        let message: Message = serde_json::from_str(
            r#"{"caption": "photo", "caption_entities": [{"type": "italic", "offset": 1, "length": 3}]}"#,
        )
        .unwrap();
        assert_eq!(message.text, "photo");
        assert_eq!(message.entities, Some(vec![Entity::new(EntityKind::Italic, 1, 3)]));

        let message: Message = serde_json::from_str(r#"{"message": "plain"}"#).unwrap();
        assert_eq!(message.text, "plain");
        assert_eq!(message.entities, None);
    }

    fn written(message: &Message, syntax: Syntax) -> String {
        let mut out = Vec::new();
        write_message(message, syntax, ConvertOptions::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_output_is_written_unchanged() {
        let bold = Message {
            text: "hi there".into(),
            entities: Some(vec![Entity::new(EntityKind::Bold, 0, 2)]),
        };
        assert_eq!(written(&bold, Syntax::Markdown), "**hi** there\n");
        assert_eq!(written(&bold, Syntax::Html), "<p><b>hi</b> there</p>");

        let untouched = Message {
            text: "a <b> c".into(),
            entities: None,
        };
        assert_eq!(written(&untouched, Syntax::Markdown), "a <b> c");
    }
}
