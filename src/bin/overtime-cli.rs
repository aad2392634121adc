use clap::{Parser, Subcommand};
use overtime::http::api::{HealthResponse, ListingResponse, MatchView};
use url::Url;

#[derive(Parser)]
#[command(name = "overtime-cli")]
#[command(about = "Command-line client for an Overtime server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List matches, spotlight first
    Matches,
    /// Show the stream links of one match
    Streams {
        /// Feed match id
        id: String,
    },
    /// Check server status
    Status,
    /// Drop the server's cached feed
    Refresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Matches => {
            let res = client.get(format!("{base}/api/listing")).send().await?;
            let Some(res) = check(res).await? else {
                return Ok(());
            };
            let listing: ListingResponse = res.json().await?;

            if let Some(spotlight) = &listing.spotlight {
                println!("* {}", summary(spotlight));
            }
            for m in &listing.grid {
                println!("  {}", summary(m));
            }
            if listing.spotlight.is_none() && listing.grid.is_empty() {
                println!("No matches available right now.");
            }
        }
        Commands::Streams { id } => {
            let res = client.get(match_url(base, &id)?).send().await?;
            let Some(res) = check(res).await? else {
                return Ok(());
            };
            let view: MatchView = res.json().await?;

            println!("{}", summary(&view));
            if view.links.is_empty() {
                println!("  Links coming soon...");
            }
            for link in &view.links {
                println!("  {:<12} {}{}", link.label, base, link.href);
            }
        }
        Commands::Status => {
            let res = client.get(format!("{base}/health")).send().await?;
            let Some(res) = check(res).await? else {
                return Ok(());
            };
            let health: HealthResponse = res.json().await?;
            println!("{} (v{})", health.status, health.version);
        }
        Commands::Refresh => {
            let res = client
                .post(format!("{base}/api/cache/invalidate"))
                .send()
                .await?;
            if check(res).await?.is_some() {
                println!("Feed cache invalidated");
            }
        }
    }

    Ok(())
}

/// `{base}/api/matches/{id}` with the id encoded as a single path segment.
fn match_url(base: &str, id: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(["api", "matches", id]);
    Ok(url)
}

/// Print non-success responses and swallow them.
async fn check(res: reqwest::Response) -> Result<Option<reqwest::Response>, reqwest::Error> {
    let status = res.status();
    if status.is_success() {
        return Ok(Some(res));
    }
    eprintln!("Error: server returned status {}", status);
    let text = res.text().await?;
    if !text.is_empty() {
        eprintln!("Response: {}", text);
    }
    Ok(None)
}

fn summary(m: &MatchView) -> String {
    let d = &m.details;
    let live = if d.is_live() { " [LIVE]" } else { "" };
    format!(
        "{:>8}  {}{}  ({})  {} stream(s)",
        d.match_id.as_str(),
        d.title,
        live,
        d.tournament,
        m.links.len()
    )
}
