//! hilite - grammar-driven syntax highlighter
//!
//! Reads source text from a file or stdin and writes HTML-safe
//! highlighted markup to stdout.

mod config;

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use config::Config;
use hilite::{LanguageRegistry, Options};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut language: Option<String> = None;
    let mut file: Option<PathBuf> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            "--list-languages" => {
                let registry = LanguageRegistry::new();
                for name in registry.list_languages() {
                    println!("{}", name);
                }
                return Ok(());
            }
            "--language" | "-l" => {
                i += 1;
                let name = args
                    .get(i)
                    .ok_or("missing argument for --language")?;
                language = Some(name.clone());
            }
            arg if !arg.starts_with('-') => {
                file = Some(PathBuf::from(arg));
            }
            arg => {
                return Err(format!("unknown option: {}", arg).into());
            }
        }
        i += 1;
    }

    let config = Config::load();
    let mut registry = LanguageRegistry::new();
    registry.set_options(Options {
        class_prefix: config.class_prefix,
        languages: config.languages,
    });

    let text = match &file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let result = match &language {
        Some(name) => registry.highlight(name, &text, false)?,
        None => registry.highlight_auto(&text, None),
    };
    println!("{}", result.markup);

    Ok(())
}

fn print_usage() {
    println!(
        "hilite {} - grammar-driven syntax highlighter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage: hilite [OPTIONS] [FILE]");
    println!();
    println!("Reads FILE (or stdin) and writes highlighted HTML to stdout.");
    println!();
    println!("Options:");
    println!("  -l, --language NAME  Highlight as NAME instead of auto-detecting");
    println!("      --list-languages List registered languages");
    println!("  -h, --help           Show this help message");
    println!("  -V, --version        Show version information");
    println!();
    println!("Configuration is read from ~/.hilite.toml when present:");
    println!("  class-prefix = \"hljs-\"");
    println!("  languages = [\"xml\", \"css\"]");
}

fn print_version() {
    println!("hilite {}", env!("CARGO_PKG_VERSION"));
}
