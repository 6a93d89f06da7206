//! Main entry point for the instabot binary
//!
//! Wires the real services (JSON state file, WebDriver session, site layer)
//! into the follow and unfollow orchestrators.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rand::rngs::StdRng;
use rand::SeedableRng;

use instabot::services::{SiteLayout, WebDriverClient, WebSite};
use instabot::{
    CandidateDiscoveryQueue, CommentPolicy, Credentials, FollowOrchestrator, InstabotError, InstabotResult,
    RelationshipStore, RunReport, SocialSite, UnfollowOrchestrator,
};
use shared::config::DEFAULT_CONFIG_PATH;
use shared::{logging, phase_debug, phase_info, BotConfig, Phase, RunOverrides};

/// Follow accounts found through hashtags and unfollow them after a cooldown
#[derive(Parser)]
#[command(name = "instabot")]
#[command(about = "Follow accounts found through hashtags and unfollow them after a cooldown")]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Path of the persisted configuration
    #[arg(long, env = "INSTABOT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store credentials and default tunables
    Config {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// File with one hashtag per line
        #[arg(short, long)]
        tags: Option<PathBuf>,

        /// File with one comment phrase per line
        #[arg(short, long)]
        comments: Option<PathBuf>,

        /// Chance of commenting on a liked post, 0 to 1
        #[arg(short = 'r', long)]
        comment_probability: Option<f64>,

        /// Days between follow and unfollow (and unfollow and re-follow)
        #[arg(short = 'i', long)]
        cooldown_days: Option<i64>,

        /// Seconds to wait after each page action
        #[arg(short, long)]
        settle_secs: Option<f64>,

        /// Relationship state file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// WebDriver server URL
        #[arg(long)]
        webdriver_url: Option<String>,
    },

    /// Follow new accounts from the configured hashtags
    Follow {
        /// Number of accounts to follow
        #[arg(short = 'n', long)]
        users: usize,

        #[arg(short = 'r', long)]
        comment_probability: Option<f64>,

        #[arg(short = 'i', long)]
        cooldown_days: Option<i64>,

        #[arg(short, long)]
        settle_secs: Option<f64>,

        /// Seed for reproducible candidate order and comment choices
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Unfollow accounts whose cooldown has elapsed
    Unfollow {
        /// Maximum number of accounts to unfollow
        #[arg(short, long)]
        max_users: usize,

        #[arg(short = 'i', long)]
        cooldown_days: Option<i64>,

        #[arg(short, long)]
        settle_secs: Option<f64>,
    },
}

impl Command {
    fn phase(&self) -> Phase {
        match self {
            Command::Config { .. } => Phase::Configure,
            Command::Follow { .. } => Phase::Follow,
            Command::Unfollow { .. } => Phase::Unfollow,
        }
    }
}

fn main() -> InstabotResult<()> {
    dotenv().ok();
    let args = Args::parse();

    Phase::init(args.command.phase());
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(Phase::current(), &format!("config at {}", args.config.display()));

    let result = match args.command {
        Command::Config {
            username,
            password,
            tags,
            comments,
            comment_probability,
            cooldown_days,
            settle_secs,
            database,
            webdriver_url,
        } => {
            let mut config = BotConfig::new(username, password);
            if let Some(tags) = tags {
                config.tags_file = tags;
            }
            if let Some(comments) = comments {
                config.comments_file = comments;
            }
            if let Some(database) = database {
                config.database = database;
            }
            if let Some(url) = webdriver_url {
                config.webdriver_url = url;
            }
            let overrides = RunOverrides {
                comment_probability,
                cooldown_days,
                settle_secs,
            };
            configure(&args.config, config, &overrides)
        }
        Command::Follow {
            users,
            comment_probability,
            cooldown_days,
            settle_secs,
            seed,
        } => {
            let overrides = RunOverrides {
                comment_probability,
                cooldown_days,
                settle_secs,
            };
            follow(&args.config, &overrides, users, seed)
        }
        Command::Unfollow {
            max_users,
            cooldown_days,
            settle_secs,
        } => {
            let overrides = RunOverrides {
                cooldown_days,
                settle_secs,
                ..RunOverrides::default()
            };
            unfollow(&args.config, &overrides, max_users)
        }
    };

    if let Err(e) = &result {
        logging::log_error(Phase::current(), "Run failed", e);
    }
    result
}

fn configure(path: &Path, config: BotConfig, overrides: &RunOverrides) -> InstabotResult<()> {
    let config = config.with_overrides(overrides)?;
    config.save(path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn load_config(path: &Path, overrides: &RunOverrides) -> InstabotResult<BotConfig> {
    let config = BotConfig::load(path)
        .map_err(|e| InstabotError::config(format!("{e} (run `instabot config` first)")))?
        .with_overrides(overrides)?;
    phase_debug!(Phase::current(), "Loaded configuration for {}", config.username);
    Ok(config)
}

/// Connect to the WebDriver server and log in
fn open_site(config: &BotConfig) -> InstabotResult<WebSite<WebDriverClient>> {
    let driver = WebDriverClient::connect(&config.webdriver_url)?;
    let mut site = WebSite::new(
        driver,
        SiteLayout::default(),
        Duration::from_secs_f64(config.settle_secs),
    );
    site.login(&Credentials {
        username: config.username.clone(),
        password: config.password.clone(),
    })?;
    Ok(site)
}

fn follow(path: &Path, overrides: &RunOverrides, users: usize, seed: Option<u64>) -> InstabotResult<()> {
    let config = load_config(path, overrides)?;
    let tags = config.load_tags()?;
    let phrases = config.load_comments()?;
    let mut store = RelationshipStore::load(&config.database)?;
    let mut site = open_site(&config)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut pool = CandidateDiscoveryQueue::new(&mut rng).discover(&mut site, &tags, users)?;
    phase_info!(Phase::current(), "Following up to {} users from {} tags", users, tags.len());

    let result = FollowOrchestrator::new(&mut site, &mut store, rng)
        .with_comments(CommentPolicy::new(config.comment_probability, phrases))
        .run(users, config.cooldown_days, &mut pool);
    print_outcome(result, RunReport::follow)
}

fn unfollow(path: &Path, overrides: &RunOverrides, max_users: usize) -> InstabotResult<()> {
    let config = load_config(path, overrides)?;
    let mut store = RelationshipStore::load(&config.database)?;
    let mut site = open_site(&config)?;

    let today = store.today();
    let result = UnfollowOrchestrator::new(&mut site, &mut store).run(max_users, config.cooldown_days, today);
    print_outcome(result, RunReport::unfollow)
}

/// Print the run summary, including the partial one of an aborted run
fn print_outcome(result: InstabotResult<RunReport>, partial: fn(usize, usize) -> RunReport) -> InstabotResult<()> {
    match result {
        Ok(report) => {
            println!("{report}");
            logging::log_success(Phase::current(), &report.to_string());
            Ok(())
        }
        Err(e) => {
            if let Some((completed, requested)) = e.partial_progress() {
                println!("{}", partial(completed, requested));
            }
            Err(e)
        }
    }
}
