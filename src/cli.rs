use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "board")]
#[command(version)]
#[command(about = "Terminal client for a chat board: post messages, log in, watch live updates")]
pub struct Args {
    /// TOML config file (server host, scheme, log filter)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Board server as host[:port], overrides the config file
    #[arg(long)]
    pub host: Option<String>,

    /// Use https/wss instead of http/ws
    #[arg(long)]
    pub secure: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Post the line to the board.
    Send(String),
    Login(String),
    Register(String),
    Help,
    Quit,
}

impl Command {
    /// Parse a prompt line. Anything not starting with a known slash command
    /// is a message, sent verbatim (empty lines included).
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let (head, rest) = match trimmed.split_once(' ') {
            Some((head, rest)) => (head, rest),
            None => (trimmed, ""),
        };
        match head {
            "/login" => Command::Login(rest.to_string()),
            "/register" => Command::Register(rest.to_string()),
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Send(trimmed.to_string()),
        }
    }
}

pub const HELP: &str = "\
  /login NAME      log in as NAME
  /register NAME   register NAME
  /help            show this help
  /quit            exit
  anything else    post it to the board";
