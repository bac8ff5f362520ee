use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use todo_client::{
    api::ApiClient,
    board::{Board, Notice},
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the todo service.
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every todo, newest first.
    List,

    Add { content: String },

    /// Replace the content of a todo, picked by list number or id.
    Edit { target: String, content: String },

    Delete { target: String },

    /// Delete every todo currently listed.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut board = Board::new(ApiClient::new(args.url));

    if let Some(Notice::Error(message)) = board.load().await {
        bail!(message);
    }

    let notice = match args.command.unwrap_or(Command::List) {
        Command::List => None,
        Command::Add { content } => {
            board.set_draft(content);
            board.add().await
        }
        Command::Edit { target, content } => {
            let index = board
                .position(&target)
                .with_context(|| format!("No todo matches '{target}'"))?;

            board.toggle_editing(index);
            let id = board
                .editing()
                .map(|row| row.todo.id.clone())
                .context("Row left edit mode")?;

            board.save_edit(&id, &content).await
        }
        Command::Delete { target } => {
            let index = board
                .position(&target)
                .with_context(|| format!("No todo matches '{target}'"))?;
            let id = board.rows()[index].todo.id.clone();

            board.delete(&id).await
        }
        Command::Clear => board.clear_all().await,
    };

    print!("{board}");

    match notice {
        Some(Notice::Error(message)) => bail!(message),
        Some(Notice::Success(message)) => println!("{message}"),
        None => {}
    }

    Ok(())
}
