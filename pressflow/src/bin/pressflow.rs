//! Command-line surface: one end-to-end run per invocation.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use pressflow::cancellation::CancellationToken;
use pressflow::cms::{CategoryResolver, WordPressClient};
use pressflow::config::{CmsConfig, RunConfig, RunFile};
use pressflow::events::LoggingEventSink;
use pressflow::observability::init_tracing;
use pressflow::pipeline::{run_pipeline, RunReport};

/// Generate blog articles from keyword/topic combinations and publish them to WordPress.
#[derive(Parser, Debug)]
#[command(name = "pressflow")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and publish every keyword x topic article
    Run(RunArgs),
    /// List the categories of a site
    Categories(CategoriesArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Run file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated keywords, overriding the run file
    #[arg(long)]
    keywords: Option<String>,

    /// Comma-separated topics, overriding the run file
    #[arg(long)]
    topics: Option<String>,

    /// Tone: Funny, Serious or Informative
    #[arg(long)]
    tone: Option<String>,

    /// Target category name
    #[arg(long)]
    category: Option<String>,

    /// Completion service API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// WordPress domain or base URL
    #[arg(long, env = "PRESSFLOW_CMS_DOMAIN")]
    domain: Option<String>,

    /// WordPress admin username
    #[arg(long, env = "PRESSFLOW_CMS_USERNAME")]
    username: Option<String>,

    /// WordPress admin password
    #[arg(long, env = "PRESSFLOW_CMS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    report_json: bool,
}

#[derive(Args, Debug)]
struct CategoriesArgs {
    /// WordPress domain or base URL
    #[arg(long, env = "PRESSFLOW_CMS_DOMAIN")]
    domain: String,

    /// Reject self-signed certificates
    #[arg(long)]
    strict_tls: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let outcome = match cli.command {
        Command::Run(args) => run(args).await,
        Command::Categories(args) => categories(args).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Run aborted");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &RunArgs) -> Result<RunConfig> {
    let file = match &args.config {
        Some(path) => RunFile::load(path)
            .with_context(|| format!("loading run file {}", path.display()))?,
        None => RunFile::default(),
    };

    let mut builder = file.into_builder()?;
    if let Some(keywords) = &args.keywords {
        builder = builder.keywords_text(keywords);
    }
    if let Some(topics) = &args.topics {
        builder = builder.topics_text(topics);
    }
    if let Some(tone) = &args.tone {
        builder = builder.tone(tone.parse()?);
    }
    if let Some(category) = &args.category {
        builder = builder.category(category.clone());
    }
    if let Some(api_key) = &args.api_key {
        builder = builder.api_key(api_key.clone());
    }
    if let Some(domain) = &args.domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(username) = &args.username {
        builder = builder.username(username.clone());
    }
    if let Some(password) = &args.password {
        builder = builder.password(password.clone());
    }

    Ok(builder.build()?)
}

async fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    info!(
        jobs = config.job_count(),
        tone = %config.tone(),
        site = %config.cms().base_url(),
        "Starting run"
    );

    let cancel = Arc::new(CancellationToken::new());
    let on_signal = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing the current call");
            on_signal.cancel("interrupted by operator");
        }
    });

    let report = run_pipeline(&config, Arc::new(LoggingEventSink::default()), cancel).await?;

    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    for (result, article) in report.results.iter().zip(&report.articles) {
        match &result.error_message {
            None => println!("[ok]     Article {}: {}", result.article_number(), article.title()),
            Some(message) => println!(
                "[failed] Article {}: {} ({message})",
                result.article_number(),
                article.title()
            ),
        }
    }
    for article in report.articles.iter().skip(report.results.len()) {
        println!("[skipped] {}", article.title());
    }
    if let Some(reason) = &report.cancelled {
        println!("Cancelled: {reason}");
    }
    println!(
        "Published {} of {} articles ({} failed)",
        report.succeeded(),
        report.articles.len(),
        report.failed()
    );
}

async fn categories(args: CategoriesArgs) -> Result<()> {
    let cms = CmsConfig {
        accept_invalid_certs: !args.strict_tls,
        ..CmsConfig::new(args.domain)
    };
    let resolver = CategoryResolver::new(
        Arc::new(WordPressClient::new(&cms)?),
        cms.categories_per_page,
    );

    for category in resolver.list().await? {
        println!("{:>6}  {}", category.id.0, category.name);
    }
    Ok(())
}
