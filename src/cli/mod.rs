//! CLI module for the Vertex LLM backend
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `config`: resolve and print the model settings

pub mod config;
pub mod serve;

use clap::{Parser, Subcommand};

/// Vertex LLM backend - text generation over Vertex AI Gemini models
#[derive(Parser)]
#[command(name = "vertex-llm-backend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Resolve the model settings from the environment and print them
    Config,
}
