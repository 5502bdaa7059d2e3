//! # agent-permissions CLI
//!
//! Command-line access to the policy tooling:
//!
//! - `robots`: Show the robots rules that apply to us and check a path
//! - `crawl`: Take a sanitized single-page snapshot
//! - `build`: Build a policy document from toggles
//! - `explain`: Explain an existing policy document
//! - `draft`: Analyze a site and draft a policy with a language model
//! - `schema`: Print the JSON Schema of the policy document

mod telemetry;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use agent_permissions::analysis::analyze_site;
use agent_permissions::crawler::{CrawlOutcome, CrawlerConfig, crawl_page};
use agent_permissions::drafter::PolicyDrafter;
use agent_permissions::model::{Client, DEFAULT_MODEL};
use agent_permissions::policy::{
    ParsedPolicy, PolicyConfig, RateLimitPreset, build_policy, policy_json_schema, read_policy_file,
};
use agent_permissions::robots::{fetch_robots, is_allowed};
use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::instrument;

/// Draft access policies for autonomous agents visiting a website
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the robots.txt rules that apply to this agent
    Robots(RobotsArgs),

    /// Take a single-page snapshot of a URL
    Crawl(CrawlArgs),

    /// Build a policy document from toggles
    Build(BuildArgs),

    /// Explain a policy document
    Explain(ExplainArgs),

    /// Analyze a site and draft a policy with an LLM
    Draft(DraftArgs),

    /// Print the JSON Schema of the policy document
    Schema,
}

#[derive(Args, Debug)]
struct CrawlerArgs {
    /// Maximum characters of page text kept
    #[arg(long, default_value = "8000")]
    max_text_chars: usize,

    /// Maximum characters of page HTML kept
    #[arg(long, default_value = "20000")]
    max_html_chars: usize,

    /// Fetch the page even if robots.txt disallows it
    #[arg(long)]
    ignore_robots: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "20")]
    timeout: u64,
}

impl CrawlerArgs {
    fn config(&self) -> CrawlerConfig {
        CrawlerConfig::builder()
            .max_text_chars(self.max_text_chars)
            .max_html_chars(self.max_html_chars)
            .respect_robots(!self.ignore_robots)
            .timeout_secs(self.timeout)
            .build()
    }
}

#[derive(Args, Debug)]
struct PolicyArgs {
    /// Site name recorded as the policy author
    #[arg(long)]
    site_name: Option<String>,

    /// Forbid reading page content
    #[arg(long)]
    no_read_content: bool,

    /// Forbid reading page metadata
    #[arg(long)]
    no_read_metadata: bool,

    /// Forbid following links
    #[arg(long)]
    no_navigation: bool,

    /// Allow filling in and submitting forms
    #[arg(long)]
    allow_forms: bool,

    /// Allow downloading files
    #[arg(long)]
    allow_downloads: bool,

    /// Do not require human approval for form submission
    #[arg(long)]
    no_human_for_forms: bool,

    /// Navigation rate limit
    #[arg(long, value_enum, default_value_t = RateLimitPreset::Standard)]
    rate_limit: RateLimitPreset,

    /// Do not add the guideline forbidding credential submission
    #[arg(long)]
    allow_login: bool,
}

impl PolicyArgs {
    fn config(&self) -> PolicyConfig {
        PolicyConfig {
            site_name: self.site_name.clone(),
            allow_read_content: !self.no_read_content,
            allow_read_metadata: !self.no_read_metadata,
            allow_navigation: !self.no_navigation,
            allow_forms: self.allow_forms,
            allow_downloads: self.allow_downloads,
            require_human_for_forms: !self.no_human_for_forms,
            rate_limit: self.rate_limit,
            block_login: !self.allow_login,
        }
    }
}

#[derive(Args, Debug)]
struct RobotsArgs {
    /// URL whose origin's robots.txt is read
    #[arg(required = true)]
    url: String,

    /// Path to check (defaults to the URL's path)
    #[arg(short, long)]
    path: Option<String>,

    /// Agent token matched against User-agent lines
    #[arg(short, long, default_value = "agent-permissions")]
    agent: String,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URL to snapshot
    #[arg(required = true)]
    url: String,

    #[command(flatten)]
    crawler: CrawlerArgs,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    policy: PolicyArgs,

    /// Write the document to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    /// Policy document to explain
    #[arg(required = true)]
    file: PathBuf,
}

#[derive(Args, Debug)]
struct DraftArgs {
    /// Site to analyze
    #[arg(required = true)]
    url: String,

    #[command(flatten)]
    policy: PolicyArgs,

    #[command(flatten)]
    crawler: CrawlerArgs,

    /// LLM model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Write the drafted document to a file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _otel = telemetry::init_tracing_subscriber("warn")?;

    match cli.command {
        Commands::Robots(args) => robots_command(args).await?,
        Commands::Crawl(args) => crawl_command(args).await?,
        Commands::Build(args) => build_command(args).await?,
        Commands::Explain(args) => explain_command(args).await?,
        Commands::Draft(args) => draft_command(args).await?,
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&policy_json_schema())?);
        }
    }

    Ok(())
}

#[instrument]
async fn robots_command(args: RobotsArgs) -> anyhow::Result<()> {
    let url = agent_permissions::crawler::normalize_url(&args.url)
        .ok_or_else(|| anyhow!("'{}' is not an http(s) URL", args.url))?;
    let client = CrawlerConfig::default().http_client()?;
    let rules = fetch_robots(&client, &url, &args.agent).await;

    match &rules {
        Some(rules) if !rules.is_empty() => {
            for pattern in &rules.allow {
                println!("Allow: {}", pattern);
            }
            for pattern in &rules.disallow {
                println!("Disallow: {}", pattern);
            }
            if let Some(delay) = rules.crawl_delay {
                println!("Crawl-delay: {}", delay);
            }
        }
        Some(_) => println!("robots.txt has no directives for '{}'", args.agent),
        None => println!("No robots.txt found"),
    }

    let path = args.path.unwrap_or_else(|| url.path().to_string());
    let verdict = if is_allowed(&path, rules.as_ref()) {
        "allowed"
    } else {
        "disallowed"
    };
    println!("{} is {}", path, verdict);

    Ok(())
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let config = args.crawler.config();
    let url = agent_permissions::crawler::normalize_url(&args.url)
        .ok_or_else(|| anyhow!("'{}' is not an http(s) URL", args.url))?;

    let client = config.http_client()?;
    let rules = if config.respect_robots {
        fetch_robots(&client, &url, &config.robots_agent_token).await
    } else {
        None
    };
    let outcome = crawl_page(url.as_str(), rules.as_ref(), &config).await?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

#[instrument]
async fn build_command(args: BuildArgs) -> anyhow::Result<()> {
    let document = build_policy(&args.policy.config());
    let json = document.to_json_pretty()?;

    match args.output {
        Some(output_file) => {
            tokio::fs::write(&output_file, json).await?;
            println!("Saved policy to {}", output_file.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[instrument]
async fn explain_command(args: ExplainArgs) -> anyhow::Result<()> {
    let policy = read_policy_file(&args.file).await?;
    print_policy(&policy)?;
    Ok(())
}

#[instrument]
async fn draft_command(args: DraftArgs) -> anyhow::Result<()> {
    // Reject a missing API key before doing any network work
    let client = Client::new_gemini_from_env(&args.model)?;

    println!("Analyzing {}...", args.url);
    let analysis = analyze_site(&args.url, &args.crawler.config()).await?;
    print_outcome(&analysis.crawl);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Drafting policy with {}", args.model));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let drafter = PolicyDrafter::new(client.completion().clone());
    let draft = drafter.draft(&analysis, &args.policy.config()).await;
    spinner.finish_and_clear();
    let draft = draft?;

    print_policy(&draft.policy)?;

    if let Some(output_file) = args.output {
        tokio::fs::write(&output_file, &draft.raw).await?;
        println!("Saved drafted policy to {}", output_file.display());
    }

    Ok(())
}

fn print_outcome(outcome: &CrawlOutcome) {
    for entry in &outcome.log {
        let status = entry
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} [{}] {}",
            entry.url,
            status,
            entry.reason.as_deref().unwrap_or("")
        );
    }

    let Some(page) = outcome.page() else {
        println!("No page content retrieved");
        return;
    };
    println!("Title: {}", page.title.as_deref().unwrap_or("(none)"));
    println!(
        "Words: {}{}",
        page.word_count,
        if page.is_text_truncated { " (text truncated)" } else { "" }
    );
    println!(
        "Forms: {}, search: {}, login: {}",
        page.has_forms, page.has_search, page.contains_login
    );
}

fn print_policy(policy: &ParsedPolicy) -> std::io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    if policy.is_empty() {
        writeln!(stdout, "{}", policy.summary())?;
        return Ok(());
    }

    if let Some(author) = policy
        .metadata
        .as_ref()
        .and_then(|m| m.get("author"))
        .and_then(|a| a.as_str())
    {
        stdout.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(stdout, "Policy for {}", author)?;
        stdout.reset()?;
    }

    for rule in &policy.resource_rules {
        let (verdict, color) = if rule.allowed {
            ("Allowed", Color::Green)
        } else {
            ("Blocked", Color::Red)
        };
        stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stdout, "{}", verdict)?;
        stdout.reset()?;
        writeln!(stdout, ": {}", rule.describe())?;
    }

    for guideline in &policy.action_guidelines {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(stdout, "{}", guideline.describe())?;
        stdout.reset()?;
    }

    Ok(())
}
