use std::io::{self, Write};

use clap::{CommandFactory, Parser};
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use board_client::cli::{Args, Command, HELP};
use board_client::render::render_page;
use board_client::{
    subscribe, with_page, AuthForm, BoardClient, ClientConfig, ElementId, Page,
};

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn redraw(client: &BoardClient) {
    let frame = with_page(client.page(), |p| render_page(p));
    print!("\n{frame}{} ", ">".bright_blue().bold());
    let _ = io::stdout().flush();
}

/// Copy the typed value into the form's input and submit it.
async fn run_command(client: &BoardClient, command: Command) {
    let result = match command {
        Command::Send(msg) => {
            with_page(client.page(), |p| p.set_value(ElementId::MessageInput, msg));
            client.submit_message().await.map(|_| ())
        }
        Command::Login(name) => {
            with_page(client.page(), |p| p.set_value(AuthForm::Login.input(), name));
            client.submit_login().await.map(|_| ())
        }
        Command::Register(name) => {
            with_page(client.page(), |p| p.set_value(AuthForm::Register.input(), name));
            client.submit_registration().await.map(|_| ())
        }
        Command::Help | Command::Quit => Ok(()),
    };
    // Failures outside the handled statuses give no on-page feedback.
    if let Err(e) = result {
        warn!(error = %e, "form submission failed");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "board", &mut io::stdout());
        return Ok(());
    }

    let config = ClientConfig::resolve(&args)?;
    init_tracing(&config.logging.filter);
    let endpoints = config.endpoints()?;

    eprintln!(
        "{} {}",
        "board".bright_cyan().bold(),
        format!("server {}", config.server.host).dimmed()
    );

    let page = Page::shared();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    // A failed subscription leaves the board static; the forms still work.
    let _listener = match subscribe(&endpoints.subscribe, page.clone(), Some(update_tx)).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "live updates unavailable");
            None
        }
    };

    let client = BoardClient::new(endpoints, page)?;
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    redraw(&client);
    loop {
        tokio::select! {
            Some(_update) = update_rx.recv() => redraw(&client),
            line = lines.next() => {
                let command = match line {
                    Some(Ok(line)) => Command::parse(&line),
                    Some(Err(e)) => {
                        warn!(error = %e, "could not read input");
                        break;
                    }
                    None => break,
                };
                match command {
                    Command::Quit => break,
                    Command::Help => println!("{}", HELP.dimmed()),
                    other => run_command(&client, other).await,
                }
                redraw(&client);
            }
        }
    }

    Ok(())
}
