use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use slangify::client::HttpTranslationClient;
use slangify::clipboard::SystemClipboard;
use slangify::config::SlangConfig;
use slangify::controller::{ControllerOptions, TranslationController};
use slangify::error::SlangError;
use slangify::logging::{init_logging, LogLevel, LogTarget, LoggingConfig};
use slangify::ui::colors::colors_enabled;
use slangify::ui::tui::{run_interactive, UiOptions};
use slangify::ui::ResultPrinter;

#[derive(Parser, Debug)]
#[command(name = "slangify")]
#[command(version)]
#[command(about = "Translate text into slang")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Text to translate ("-" reads stdin). Starts the interactive UI when omitted.
    text: Vec<String>,

    /// Path to a configuration file (default: ./slangify.toml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the translation service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Slang level id (see `slangify levels`)
    #[arg(long, short, global = true)]
    level: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the result at once instead of revealing it line by line
    #[arg(long)]
    no_animation: bool,

    /// Disable colors (also respects NO_COLOR environment variable)
    #[arg(long, global = true)]
    no_color: bool,

    /// Copy the result to the clipboard
    #[arg(long)]
    copy: bool,

    /// Print the final session state as JSON
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available slang levels
    Levels,
    /// Print the effective configuration as TOML
    Config,
}

/// Where the text to translate comes from.
enum Input {
    Text(String),
    Interactive,
}

impl Cli {
    fn input(&self) -> io::Result<Input> {
        let reads_stdin = self.text.len() == 1 && self.text[0] == "-";
        if reads_stdin || (self.text.is_empty() && !io::stdin().is_terminal()) {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            return Ok(Input::Text(buffer));
        }
        if self.text.is_empty() {
            return Ok(Input::Interactive);
        }
        Ok(Input::Text(self.text.join(" ")))
    }

    fn logging(&self, interactive: bool) -> LoggingConfig {
        let config = LoggingConfig::from_verbosity(self.verbose);
        match &self.log_file {
            Some(path) => config.with_output(LogTarget::File(path.clone())),
            // The interactive UI owns the terminal.
            None if interactive => config.with_level(LogLevel::Off).with_env_override(false),
            None => config.with_timestamps(false),
        }
    }

    fn load_config(&self) -> Result<SlangConfig, SlangError> {
        let mut config = SlangConfig::load(self.config.as_deref())?;
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.api.timeout_secs = Some(secs);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let use_color = !cli.no_color && colors_enabled();
    let printer = ResultPrinter::default().with_colors(use_color);

    match run(cli, printer.clone()).await {
        Ok(code) => code,
        Err(err) => {
            let _ = printer.error(&mut io::stderr(), &err.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, printer: ResultPrinter) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let input = match cli.command {
        Some(_) => Input::Text(String::new()),
        None => cli.input()?,
    };
    init_logging(cli.logging(matches!(input, Input::Interactive)))?;

    let config = cli.load_config()?;
    let catalog = config.catalog();

    match cli.command {
        Some(Commands::Levels) => {
            let selected = cli.level.as_deref().unwrap_or(&config.session.default_level);
            printer.levels(&mut io::stdout(), &catalog, selected)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
            return Ok(ExitCode::SUCCESS);
        }
        None => {}
    }

    let client = HttpTranslationClient::from_config(&config.api)?;
    let (controller, events) = TranslationController::new(
        Arc::new(client),
        Arc::new(SystemClipboard),
        catalog,
        ControllerOptions::from(&config.session),
    );
    if let Some(level) = &cli.level {
        controller.select_level(level)?;
    }

    let text = match input {
        Input::Interactive => {
            let options = UiOptions {
                animate: !cli.no_animation,
                timing: config.animation.timing(),
                settle: config.animation.settle(),
                ..UiOptions::default()
            };
            run_interactive(controller, events, options).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Input::Text(text) => text,
    };

    controller.set_input_text(text);
    let attempt = controller.translate(false)?.ok_or(SlangError::EmptyInput)?;
    let outcome = attempt.wait().await;
    tracing::debug!(outcome = %outcome, "one-shot translation finished");

    let state = controller.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    if let Some(error) = &state.error {
        if !cli.json {
            printer.error(&mut io::stderr(), error)?;
        }
        return Ok(ExitCode::FAILURE);
    }

    if !cli.json {
        let lines = state.result_lines();
        let revealer = printer
            .clone()
            .with_timing(config.animation.timing())
            .with_animation(!cli.no_animation && io::stdout().is_terminal());
        revealer.reveal(&mut io::stdout(), &lines).await?;
    }

    if cli.copy {
        controller.copy_result()?;
        printer.copied(&mut io::stderr())?;
    }
    io::stdout().flush()?;
    controller.end_session();
    Ok(ExitCode::SUCCESS)
}
