//! Command-line interface for the remark comment backend.
//!
//! Runs author and comment operations directly against the configured store.
//! It supports both JSON and text output formats.

use std::{process::ExitCode, sync::Arc};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use remark_common::id::generator::IdGenerator;
use remark_service::{
    author::repository::{AuthorInsert, AuthorRepository, AuthorUpdate},
    comment::repository::{CommentInsert, CommentRepository},
    config::{AppConfig, DatabaseConfig, SqliteConfig},
    create_repositories,
    error::{AppError, ErrorBody},
    model::{Author, AuthorId, Comment, CommentId, EnrichedComment, comment::CommentListQuery},
    tracing::tracer::Tracer,
};

/// Command-line interface configuration.
#[derive(Parser)]
#[command(name = "remark-cli")]
#[command(about = "A CLI tool for managing remark authors and comments")]
#[command(version)]
pub struct Cli {
    /// Directory containing `default` and `local` configuration files
    #[arg(long, short, env = "REMARK_CONFIG_PATH")]
    pub config: Option<String>,

    /// SQLite database file, overrides the configured database
    #[arg(long, short)]
    pub database: Option<String>,

    /// Output format (json or text)
    #[arg(long, short = 'J', env = "REMARK_JSON")]
    pub json: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Author operations
    Author {
        /// The author subcommand to execute
        #[command(subcommand)]
        command: AuthorCommands,
    },
    /// Comment operations
    Comment {
        /// The comment subcommand to execute
        #[command(subcommand)]
        command: CommentCommands,
    },
}

/// Author-related operations.
#[derive(Subcommand)]
pub enum AuthorCommands {
    /// Get an author by ID
    Get {
        /// Author ID
        id: String,
    },
    /// List all authors
    List,
    /// Create a new author
    Create {
        /// Author name
        name: String,
        /// Author email
        email: String,
        /// Identity of the author in another system
        #[arg(long)]
        external_id: Option<String>,
    },
    /// Replace the name, email and external ID of an author
    Update {
        /// Author ID
        id: String,
        /// New name
        name: String,
        /// New email
        email: String,
        /// New external ID, cleared if omitted
        #[arg(long)]
        external_id: Option<String>,
    },
    /// Delete an author
    Delete {
        /// Author ID
        id: String,
    },
}

/// Comment-related operations.
#[derive(Subcommand)]
pub enum CommentCommands {
    /// Get a comment by ID, with its author
    Get {
        /// Comment ID
        id: String,
    },
    /// List comments, with their authors
    List {
        /// Only comments by this author
        #[arg(long)]
        author_id: Option<String>,
        /// Only comments on this page
        #[arg(long)]
        page_id: Option<String>,
        /// Only comments with this comment ID
        #[arg(long)]
        comment_id: Option<String>,
        /// Maximum number of comments
        #[arg(long)]
        limit: Option<u32>,
        /// Number of comments to skip
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Create a new comment
    Create {
        /// Author ID
        author_id: String,
        /// Page the comment belongs to
        page_id: String,
        /// Comment text
        content: String,
        /// Optional grouping key
        #[arg(long)]
        comment_id: Option<String>,
    },
    /// Delete a comment
    Delete {
        /// Comment ID
        id: String,
    },
}

#[derive(Serialize)]
struct UpdateOutput<'a> {
    id: &'a str,
    changes: usize,
}

#[derive(Serialize)]
struct DeleteOutput<'a> {
    id: &'a str,
}

/// Exit code for a missing author or comment.
const NOT_FOUND_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_output = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, json_output);
            if is_not_found(&err) {
                ExitCode::from(NOT_FOUND_EXIT_CODE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Prints an error, as an [`ErrorBody`] on standard output in JSON mode.
fn report_error(err: &anyhow::Error, json_output: bool) {
    if json_output {
        match serde_json::to_string_pretty(&error_body(err)) {
            Ok(body) => println!("{body}"),
            Err(_) => eprintln!("Error: {err:#}"),
        }
    } else {
        eprintln!("Error: {err:#}");
    }
}

fn error_body(err: &anyhow::Error) -> ErrorBody {
    err.downcast_ref::<AppError>().map_or_else(
        || ErrorBody {
            error: format!("{err:#}"),
        },
        ErrorBody::from,
    )
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<AppError>()
        .is_some_and(AppError::is_not_found)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(config_path) => AppConfig::load_from(config_path)?,
        None => AppConfig::load()?,
    };
    if let Some(path) = cli.database {
        config.database = DatabaseConfig::Sqlite(SqliteConfig { path });
    }

    Tracer::install(&config).map_err(AppError::Internal)?;

    let executor = config.connect().await?;
    let (author_repository, comment_repository) =
        create_repositories(executor, Arc::new(IdGenerator::new()));

    match cli.command {
        Commands::Author { command } => {
            handle_author_command(&author_repository, command, cli.json).await?;
        }
        Commands::Comment { command } => {
            handle_comment_command(&comment_repository, command, cli.json).await?;
        }
    }

    Ok(())
}

/// Handles author-related CLI commands.
///
/// # Errors
///
/// Returns an error if the input is invalid or a store operation fails.
async fn handle_author_command(
    repository: &AuthorRepository,
    command: AuthorCommands,
    json_output: bool,
) -> Result<()> {
    match command {
        AuthorCommands::Get { id } => {
            let id = AuthorId::new(require("id", &id)?);
            let author = repository
                .get_author(&id)
                .await?
                .ok_or_else(|| AppError::AuthorNotFound(id.clone()))?;
            output_author(&author, json_output)?;
        }

        AuthorCommands::List => {
            let authors = repository.list_authors().await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&authors)?);
            } else {
                println!("Authors ({} total):", authors.len());
                for author in &authors {
                    println!("  - {}: {} <{}>", author.id, author.name, author.email);
                }
            }
        }

        AuthorCommands::Create {
            name,
            email,
            external_id,
        } => {
            let author = repository
                .insert_author(AuthorInsert {
                    name: require("name", &name)?,
                    email: require("email", &email)?,
                    external_id: optional(external_id.as_deref()),
                })
                .await?;
            output_author(&author, json_output)?;
        }

        AuthorCommands::Update {
            id,
            name,
            email,
            external_id,
        } => {
            let id = AuthorId::new(require("id", &id)?);
            let changes = repository
                .update_author(AuthorUpdate {
                    id: &id,
                    name: require("name", &name)?,
                    email: require("email", &email)?,
                    external_id: optional(external_id.as_deref()),
                })
                .await?;
            if json_output {
                let output = UpdateOutput {
                    id: id.as_str(),
                    changes,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Updated {changes} author(s)");
            }
        }

        AuthorCommands::Delete { id } => {
            let id = AuthorId::new(require("id", &id)?);
            repository.delete_author(&id).await?;
            output_deleted(id.as_str(), json_output)?;
        }
    }

    Ok(())
}

/// Handles comment-related CLI commands.
///
/// # Errors
///
/// Returns an error if the input is invalid or a store operation fails.
async fn handle_comment_command(
    repository: &CommentRepository,
    command: CommentCommands,
    json_output: bool,
) -> Result<()> {
    match command {
        CommentCommands::Get { id } => {
            let id = CommentId::new(require("id", &id)?);
            let comment = repository.get_comment(&id).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&comment)?);
            } else {
                print_comment(&comment);
            }
        }

        CommentCommands::List {
            author_id,
            page_id,
            comment_id,
            limit,
            offset,
        } => {
            let query = CommentListQuery {
                author_id: author_id.map(AuthorId::new),
                page_id,
                comment_id,
                limit,
                offset,
            };
            let comments = repository.list_comments(&query).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&comments)?);
            } else {
                println!("Comments ({} total):", comments.len());
                for comment in &comments {
                    println!(
                        "  - {} by {}: {}",
                        comment.comment.id,
                        comment
                            .author
                            .as_ref()
                            .map_or("<unknown>", |author| author.name.as_str()),
                        comment.comment.content
                    );
                }
            }
        }

        CommentCommands::Create {
            author_id,
            page_id,
            content,
            comment_id,
        } => {
            let author_id = AuthorId::new(require("author_id", &author_id)?);
            let comment = repository
                .insert_comment(CommentInsert {
                    author_id: &author_id,
                    content: require("content", &content)?,
                    page_id: require("page_id", &page_id)?,
                    comment_id: optional(comment_id.as_deref()),
                })
                .await?;
            output_comment(&comment, json_output)?;
        }

        CommentCommands::Delete { id } => {
            let id = CommentId::new(require("id", &id)?);
            repository.delete_comment(&id).await?;
            output_deleted(id.as_str(), json_output)?;
        }
    }

    Ok(())
}

/// Trims a required argument and rejects blank values.
fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        bail!("`{field}` is required");
    }
    Ok(value)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn format_create_time(create_time: Option<OffsetDateTime>) -> String {
    create_time
        .and_then(|create_time| create_time.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".into())
}

fn output_author(author: &Author, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(author)?);
    } else {
        println!("Author Details:");
        print_author_fields(author, "  ");
    }
    Ok(())
}

fn print_author_fields(author: &Author, indent: &str) {
    println!("{indent}ID: {}", author.id);
    println!("{indent}Name: {}", author.name);
    println!("{indent}Email: {}", author.email);
    println!(
        "{indent}External ID: {}",
        author.external_id.as_deref().unwrap_or("-")
    );
    println!(
        "{indent}Created: {}",
        format_create_time(author.id.create_time())
    );
}

fn output_comment(comment: &Comment, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(comment)?);
    } else {
        println!("Comment Details:");
        print_comment_fields(comment);
    }
    Ok(())
}

fn print_comment_fields(comment: &Comment) {
    println!("  ID: {}", comment.id);
    println!("  Page: {}", comment.page_id);
    println!("  Author ID: {}", comment.author_id);
    println!(
        "  Comment ID: {}",
        comment.comment_id.as_deref().unwrap_or("-")
    );
    println!("  Content: {}", comment.content);
    println!(
        "  Created: {}",
        format_create_time(comment.id.create_time())
    );
}

fn print_comment(comment: &EnrichedComment) {
    println!("Comment Details:");
    print_comment_fields(&comment.comment);
    if let Some(author) = &comment.author {
        println!("  Author:");
        print_author_fields(author, "    ");
    }
}

fn output_deleted(id: &str, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&DeleteOutput { id })?);
    } else {
        println!("Deleted {id}");
    }
    Ok(())
}
