use clap::{Parser, Subcommand};
use showcase::contact::{self, Field};
use showcase::{config, content, generate, output, simulate};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "One-page portfolio with scroll navigation, a validated contact form, and scroll effects")]
#[command(long_about = "\
One-page portfolio with scroll navigation, a validated contact form, and scroll effects

The page copy lives in page.toml; config.toml adjusts the element contract,
the state classes, the observer thresholds, and the visitor-facing messages.

Content structure:

  content/
  ├── page.toml       # Title, hero, sections, projects, contact copy
  ├── config.toml     # Behavior overrides (optional)
  └── assets/         # Favicon, fonts, the wasm bundle → copied to output root

Commands:
  render     write index.html and copy assets
  check      validate content and report contract lookups that find nothing
  validate   run the contact form rules against the given values
  simulate   replay a JSON script of visitor actions against the page

Run 'showcase gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// More logging (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render index.html into the output directory
    Render,
    /// Validate content without rendering
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Check contact form values the way the page does
    Validate {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Replay scripted visitor actions against the headless page
    Simulate {
        /// JSON array of steps, e.g. [{"click": "#view-projects"}]
        script: PathBuf,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "showcase=info",
            1 => "showcase=debug",
            _ => "showcase=trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render => {
            println!("==> Rendering {} → {}", cli.source.display(), cli.output.display());
            let report = generate::generate(&cli.source, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let page = content::load_content(&cli.source, &site_config)?;
            let document = generate::page_document(&page, &site_config);
            let warnings = generate::contract_warnings(&document, &site_config)?;
            output::print_check_output(&page, &site_config, &warnings);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Validate { name, email, message } => {
            let site_config = config::load_config(&cli.source)?;
            let results: Vec<_> = [(Field::Name, name), (Field::Email, email), (Field::Message, message)]
                .into_iter()
                .map(|(field, value)| (field, contact::validate(field, &value)))
                .collect();
            output::print_validation(&results, &site_config.messages);
            if results.iter().any(|(_, error)| error.is_some()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Simulate { script, json } => {
            let snapshot = simulate::simulate(&cli.source, &script)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                output::print_snapshot(&snapshot);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
