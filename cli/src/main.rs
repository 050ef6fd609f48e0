mod offline;

use std::path::{Path, PathBuf};

use builder::document::{Document, ImportIssue};
use builder::editor::EditError;
use builder::BuilderError;
use clap::{Args, Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use uuid::Uuid;

const USER_HEADER: &str = "x-user-id";
const ORGANIZATION_HEADER: &str = "x-organization-id";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing identity; pass --user-id/--org-id or set BUILDEASY_USER_ID/BUILDEASY_ORG_ID")]
    MissingIdentity,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("{path}: {source}")]
    File { path: String, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("document rejected: {0}")]
    InvalidDocument(#[from] ImportIssue),
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
}

#[derive(Parser, Debug)]
#[command(name = "buildeasy-cli", about = "BuildEasy document tools and API client")]
struct Cli {
    #[arg(long, env = "BUILDEASY_BASE_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    #[arg(long, env = "BUILDEASY_USER_ID")]
    user_id: Option<Uuid>,

    #[arg(long, env = "BUILDEASY_ORG_ID")]
    org_id: Option<Uuid>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    user_id: Option<Uuid>,
    org_id: Option<Uuid>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is up.
    Ping,
    /// Print the component palette.
    Catalog,
    /// Check that a document file would load.
    Validate { file: PathBuf },
    /// Print preview HTML for a document file.
    Render { file: PathBuf },
    /// Add a component to a document file.
    Add {
        file: PathBuf,
        #[arg(value_name = "TYPE")]
        kind: String,
        /// Property value, coerced by the property's schema type.
        #[arg(long = "prop", value_name = "NAME=VALUE", value_parser = offline::parse_prop)]
        props: Vec<(String, String)>,
    },
    Apps(AppsCommand),
    /// Download a page document.
    Pull {
        app_id: Uuid,
        page_id: Uuid,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload a page document.
    Push { app_id: Uuid, page_id: Uuid, file: PathBuf },
}

#[derive(Args, Debug)]
struct AppsCommand {
    #[command(subcommand)]
    command: AppsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AppsSubcommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, user_id: cli.user_id, org_id: cli.org_id };

    if let Err(e) = run(&ctx, cli.command).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(ctx: &CliContext, command: Command) -> Result<(), CliError> {
    match command {
        Command::Ping => run_ping(ctx).await,
        Command::Catalog => {
            print!("{}", offline::catalog_text());
            Ok(())
        }
        Command::Validate { file } => {
            let summary = offline::validate(&read_file(&file)?)?;
            println!("{}: {summary}", file.display());
            Ok(())
        }
        Command::Render { file } => {
            println!("{}", offline::render(&read_file(&file)?)?);
            Ok(())
        }
        Command::Add { file, kind, props } => {
            let (doc, id) = offline::add_component(&read_file(&file)?, &kind, &props)?;
            write_file(&file, &serde_json::to_string_pretty(&doc)?)?;
            println!("{id}");
            Ok(())
        }
        Command::Apps(apps) => run_apps(ctx, apps).await,
        Command::Pull { app_id, page_id, output } => {
            let path = format!("/api/applications/{app_id}/pages/{page_id}/document");
            let json = api_request(ctx, reqwest::Method::GET, &path, None).await?;
            let doc: Document = serde_json::from_value(json)?;
            let rendered = serde_json::to_string_pretty(&doc)?;
            match output {
                Some(output) => {
                    write_file(&output, &rendered)?;
                    eprintln!("wrote {} components to {}", doc.components.len(), output.display());
                }
                None => println!("{rendered}"),
            }
            Ok(())
        }
        Command::Push { app_id, page_id, file } => {
            let payload: Value = serde_json::from_str(&read_file(&file)?)?;
            // Fail locally with the precise reason instead of a bare 400.
            Document::from_value(&payload)?;
            let path = format!("/api/applications/{app_id}/pages/{page_id}/document");
            let json = api_request(ctx, reqwest::Method::PUT, &path, Some(payload)).await?;
            print_json(&json)
        }
    }
}

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/health", ctx.base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_apps(ctx: &CliContext, apps: AppsCommand) -> Result<(), CliError> {
    match apps.command {
        AppsSubcommand::List => {
            let json = api_request(ctx, reqwest::Method::GET, "/api/applications", None).await?;
            let rows = json.as_array().ok_or(CliError::MissingField("applications"))?;
            for row in rows {
                println!(
                    "{}\t{}\t{}\t{}",
                    row["id"].as_str().unwrap_or_default(),
                    row["slug"].as_str().unwrap_or_default(),
                    row["status"].as_str().unwrap_or_default(),
                    row["name"].as_str().unwrap_or_default(),
                );
            }
            Ok(())
        }
        AppsSubcommand::Create { name, slug, description } => {
            let body = serde_json::json!({ "name": name, "slug": slug, "description": description });
            let json = api_request(ctx, reqwest::Method::POST, "/api/applications", Some(body)).await?;
            print_json(&json)
        }
    }
}

async fn api_request(
    ctx: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let (Some(user_id), Some(org_id)) = (ctx.user_id, ctx.org_id) else {
        return Err(CliError::MissingIdentity);
    };

    let mut headers = HeaderMap::new();
    headers.insert(USER_HEADER, HeaderValue::from_str(&user_id.to_string())?);
    headers.insert(ORGANIZATION_HEADER, HeaderValue::from_str(&org_id.to_string())?);

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;
    let url = format!("{}{}", ctx.base_url.trim_end_matches('/'), path);

    let request = client.request(method, &url);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response
        .json::<Value>()
        .await
        .unwrap_or_else(|_| Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: value.to_string() });
    }

    Ok(value)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::File { path: path.display().to_string(), source })
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, format!("{contents}\n"))
        .map_err(|source| CliError::File { path: path.display().to_string(), source })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
