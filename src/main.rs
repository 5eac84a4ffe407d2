//! Chatcolor CLI - manage custom username colors
//!
//! Assigns and removes custom colors, previews colors, and regenerates the
//! room stylesheet. Exit codes are listed by `chatcolor exit-codes`.

// Initialize i18n for the binary - translations are loaded from i18n folder (TOML)
rust_i18n::i18n!("i18n", fallback = "en");

use anyhow::Context;
use chatcolor_core::cli::{check_color, CliResult, ExitCodes};
use chatcolor_core::config::AppConfig;
use chatcolor_core::core::{
    Color, ColorAssignment, ColorBook, ColorError, ColorLookup, ColorRegistry, HttpNotifier,
    InvalidationNotifier, Mutation, NoopNotifier, UpdatePipeline,
};
use chatcolor_core::i18n::{keys, set_locale, Locale};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Chatcolor CLI
#[derive(Parser, Debug)]
#[command(
    name = "chatcolor",
    version,
    about = "Custom username colors and room stylesheet generator",
    long_about = None
)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "CHATCOLOR_CONFIG")]
    config: Option<PathBuf>,

    /// Reply language (en, es)
    #[arg(long)]
    locale: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Give a user a custom color
    Assign {
        /// User name
        user: String,
        /// Color: #hex, rgb(), hsl(), a color name, or @user to borrow a user's color
        color: String,
    },

    /// Remove a user's custom color
    #[command(alias = "delete")]
    Remove {
        /// User name
        user: String,
    },

    /// Preview and validate a color, or a user's color with @user
    #[command(alias = "checkcolor")]
    Check {
        /// Color or @user
        target: String,
    },

    /// Show the color a user renders with
    Show {
        /// User name
        user: String,
    },

    /// List custom colors that differ from the defaults
    List,

    /// Regenerate the stylesheet
    Deploy,

    /// Print exit codes
    ExitCodes,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match run(cli).await {
        Ok(result) => result,
        Err(e) => {
            let code = e
                .downcast_ref::<ColorError>()
                .map_or(ExitCodes::ERROR, ExitCodes::for_error);
            CliResult::error(code, format!("{e:#}"))
        }
    };

    match (&result, result.message()) {
        (CliResult::Success(_), Some(msg)) => println!("{msg}"),
        (CliResult::Error(..), Some(msg)) => eprintln!("Error: {msg}"),
        _ => {}
    }
    result.to_exit_code()
}

async fn run(cli: Cli) -> anyhow::Result<CliResult> {
    let command = match cli.command {
        Commands::ExitCodes => {
            chatcolor_core::cli::print_exit_codes();
            return Ok(CliResult::success());
        }
        command => command,
    };

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("loading configuration")?;

    let locale = match cli.locale.as_deref() {
        Some(code) => Locale::from_code(code).with_context(|| format!("unsupported locale {code:?}"))?,
        None => config.colors.reply_locale,
    };
    set_locale(locale);
    tracing::debug!(locale = locale.code(), "Starting chatcolor v{}", chatcolor_core::VERSION);

    let defaults = Arc::new(config.default_palette()?);

    match command {
        Commands::Check { target } => {
            let book = read_only_book(&config, defaults);
            let report = check_color(&target, &book, &config.colors.locales, &config.checker())?;
            let text = report.render(locale);
            Ok(if report.warning.is_some() {
                CliResult::error(ExitCodes::LOW_CONTRAST, text)
            } else {
                CliResult::success_with_message(text)
            })
        }

        Commands::Show { user } => {
            let registry = read_only_registry(&config, defaults);
            let id = chatcolor_core::UserId::parse(&user)?;
            let book = ColorBook::from_registry(&registry);
            let source = if registry.has_override(id.as_str()) {
                keys::SOURCE_CUSTOM
            } else if registry.defaults().get(id.as_str()).is_some() {
                keys::SOURCE_DEFAULT
            } else {
                keys::SOURCE_HASH
            };
            Ok(CliResult::success_with_message(rust_i18n::t!(
                keys::SHOW,
                user = id.as_str(),
                hex = book.get(id.as_str()).as_str(),
                source = chatcolor_core::t(source)
            )))
        }

        Commands::List => {
            let registry = read_only_registry(&config, defaults);
            let book = ColorBook::from_registry(&registry);
            let lines: Vec<String> = registry
                .overlay_entries()
                .into_iter()
                .map(|(id, assignment)| format!("{id}\t{}", assignment.resolve_hex(&book)))
                .collect();
            Ok(CliResult::success_with_message(lines.join("\n")))
        }

        Commands::Deploy => {
            let (pipeline, notifier) = open_pipeline(&config, defaults)?;
            let count = pipeline.deploy()?;
            notifier.notify();
            notifier.flush().await;
            Ok(CliResult::success_with_message(rust_i18n::t!(keys::DEPLOYED, count = count)))
        }

        Commands::Assign { user, color } => {
            let assignment = parse_assignment(&color, &config.colors.locales)?;
            if let ColorAssignment::Direct { color } = &assignment {
                if let Some(warning) = config.checker().check(&color.to_color()) {
                    tracing::warn!("{}", warning);
                }
            }

            let (pipeline, notifier) = open_pipeline(&config, defaults)?;
            let id = pipeline.apply(Mutation::assign(&user, assignment))?;
            notifier.flush().await;

            let hex = pipeline.color_of(id.as_str());
            Ok(CliResult::success_with_message(rust_i18n::t!(
                keys::ASSIGNED,
                user = id.as_str(),
                name = hex.to_color().name(locale),
                hex = hex.as_str()
            )))
        }

        Commands::Remove { user } => {
            let (pipeline, notifier) = open_pipeline(&config, defaults)?;
            let id = pipeline.apply(Mutation::remove(&user))?;
            notifier.flush().await;
            Ok(CliResult::success_with_message(rust_i18n::t!(keys::REMOVED, user = id.as_str())))
        }

        Commands::ExitCodes => Ok(CliResult::success()),
    }
}

/// `@user` borrows another user's color; anything else must parse as a color
fn parse_assignment(text: &str, locales: &[Locale]) -> Result<ColorAssignment, ColorError> {
    if let Some(name) = text.trim().strip_prefix('@') {
        let id = chatcolor_core::UserId::parse(name)?;
        return Ok(ColorAssignment::named(id.as_str()));
    }
    Color::parse(text, locales)
        .map(|color| ColorAssignment::from_color(&color))
        .ok_or_else(|| ColorError::InvalidColor(text.to_string()))
}

fn read_only_registry(
    config: &AppConfig,
    defaults: Arc<chatcolor_core::DefaultPalette>,
) -> ColorRegistry {
    let mut registry = ColorRegistry::new(defaults);
    registry.merge_persisted(config.store().load().into_overlay());
    registry
}

fn read_only_book(config: &AppConfig, defaults: Arc<chatcolor_core::DefaultPalette>) -> ColorBook {
    ColorBook::from_registry(&read_only_registry(config, defaults))
}

/// Notifier kept concrete so the process can wait for it before exiting
enum Notifier {
    Http(Arc<HttpNotifier>),
    Noop,
}

impl Notifier {
    fn notify(&self) {
        match self {
            Self::Http(http) => http.notify(),
            Self::Noop => NoopNotifier.notify(),
        }
    }

    async fn flush(&self) {
        if let Self::Http(http) = self {
            http.flush().await;
        }
    }
}

fn open_pipeline(
    config: &AppConfig,
    defaults: Arc<chatcolor_core::DefaultPalette>,
) -> Result<(UpdatePipeline, Notifier), ColorError> {
    let (notifier, shared) = match &config.invalidation.endpoint {
        Some(endpoint) => {
            let http = Arc::new(HttpNotifier::new(
                endpoint.clone(),
                config.invalidation.action.clone(),
            ));
            let shared: Arc<dyn InvalidationNotifier> = http.clone();
            (Notifier::Http(http), shared)
        }
        None => {
            let shared: Arc<dyn InvalidationNotifier> = Arc::new(NoopNotifier);
            (Notifier::Noop, shared)
        }
    };

    let pipeline = UpdatePipeline::open(defaults, config.store(), config.room_source(), shared)?;
    Ok((pipeline, notifier))
}
