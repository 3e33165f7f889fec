mod artifacts;
mod config;
mod domain;
mod driver;
mod error;
mod journey;
mod pages;
mod report;
mod scenario;
mod selection;
mod validation;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use artifacts::{artifacts_dir, capture_artifacts};
use config::{JourneyConfig, Timeouts};
use driver::web::{new_session, BrowserConfig, BrowserKind, WebPageDriver};
use journey::Journey;
use scenario::{get_scenario, list_scenarios};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HeadlessMode {
    /// Run the browser in headless mode
    Headless,
    /// Run the browser with a visible window
    Windowed,
}

impl HeadlessMode {
    const fn is_headless(self) -> bool {
        matches!(self, Self::Headless)
    }
}

#[derive(Debug, Parser)]
#[command(name = "bookflow-tester", version = "0.3.0")]
#[command(about = "Automated booking-journey QA against the live package-holiday front end")]
struct Args {
    /// Scenario to run (case-insensitive substring of the scenario name)
    #[arg(long, default_value = "family")]
    scenario: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seed for the random selections (same seed, same journey)
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Browser to drive
    #[arg(long, value_enum, default_value_t = BrowserKind::Chrome)]
    browser: BrowserKind,

    /// Run headless where supported
    #[arg(long, value_enum, default_value_t = HeadlessMode::Headless)]
    headless: HeadlessMode,

    /// Connect to a Selenium Grid hub instead of a local driver
    #[arg(long)]
    hub: Option<String>,

    /// Base URL of the booking site
    #[arg(long, default_value = "https://www.tui.nl")]
    base_url: String,

    /// Landing path relative to the base URL
    #[arg(long, default_value = "/h/nl")]
    landing_path: String,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Artifacts directory for screenshots and logs on failure
    #[arg(long, default_value = "target/test-artifacts")]
    artifacts_dir: String,

    /// How many consecutive hotel results to try before giving up
    #[arg(long, default_value_t = 3)]
    max_hotel_retries: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let Some(scenario) = get_scenario(&args.scenario) else {
        eprintln!("⚠️  Unknown scenario: {}", args.scenario.yellow());
        std::process::exit(2);
    };

    let browser_cfg = build_browser_config(&args);
    let session = match new_session(args.browser, &browser_cfg).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("❌ Could not start {:?}: {e}", args.browser);
            std::process::exit(1);
        }
    };

    let web_driver = Arc::new(WebPageDriver::new(session));
    let mut journey = Journey::new(
        web_driver.clone(),
        build_journey_config(&args),
        scenario.clone(),
        args.seed,
    );

    let label = browser_label(args.browser);
    let started = Instant::now();
    match journey.run().await {
        Ok(report) => {
            println!(
                "✅ [{} seed {}] {} - {:?}",
                label.green(),
                args.seed,
                scenario.name,
                started.elapsed()
            );
            write_report(&args, &report)?;
            let _ = web_driver.session().clone().quit().await;
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "❌ [{} seed {}] {} - {:?}: {:#}",
                label.red(),
                args.seed,
                scenario.name,
                started.elapsed(),
                e
            );
            let dir = scenario_artifacts_dir(&args, &label, &scenario.name);
            let _ = capture_artifacts(web_driver.session(), &dir, &e).await;
            let _ = web_driver.session().clone().quit().await;
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn announce_banner() {
    println!("{}", "🧳 Bookflow Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (name, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {name:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn build_browser_config(args: &Args) -> BrowserConfig {
    BrowserConfig {
        headless: args.headless.is_headless(),
        remote_hub: args.hub.clone(),
    }
}

fn build_journey_config(args: &Args) -> JourneyConfig {
    JourneyConfig {
        base_url: args.base_url.clone(),
        landing_path: args.landing_path.clone(),
        max_hotel_retries: args.max_hotel_retries,
        timeouts: Timeouts::default(),
    }
}

fn browser_label(kind: BrowserKind) -> String {
    format!("{kind:?}").to_lowercase()
}

fn scenario_artifacts_dir(args: &Args, browser: &str, scenario: &str) -> String {
    artifacts_dir(&args.artifacts_dir, browser, scenario, args.seed)
}

fn write_report(args: &Args, journey_report: &domain::JourneyReport) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => report::generate_json_report(&mut output_target, journey_report)?,
        "markdown" => report::generate_markdown_report(&mut output_target, journey_report)?,
        _ => report::generate_console_report(&mut output_target, journey_report)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HotelDetails, JourneyReport, PassengerValidationResult, SearchCriteria};
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            scenario: "family".to_string(),
            list_scenarios: false,
            seed: 1337,
            browser: BrowserKind::Chrome,
            headless: HeadlessMode::Headless,
            hub: None,
            base_url: "https://www.tui.nl".to_string(),
            landing_path: "/h/nl".to_string(),
            report: "console".to_string(),
            output: None,
            artifacts_dir: "target/test-artifacts".to_string(),
            max_hotel_retries: 3,
            verbose: false,
        }
    }

    fn sample_report() -> JourneyReport {
        JourneyReport {
            scenario_name: "Couple".to_string(),
            criteria: SearchCriteria {
                departure_airport: "Amsterdam".to_string(),
                destination: "Kreta".to_string(),
                departure_date: "12".to_string(),
                duration: 10,
                adults: 2,
                children: 0,
                child_age: 0,
            },
            hotel: HotelDetails {
                name: "Hotel Aurora".to_string(),
                price: "€499".to_string(),
                board_type: "all inclusive".to_string(),
                rating: "8.4".to_string(),
                index: 0,
            },
            attempts: 1,
            validation: PassengerValidationResult {
                alert_visible: true,
                alert_message: "Controleer de rood gemarkeerde velden".to_string(),
                field_errors: Vec::new(),
            },
            duration: Duration::from_secs(75),
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bookflow-main-{label}-{}", std::process::id()))
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_path("list");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("Family with 1 child"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        let args = base_args();
        assert!(!maybe_list_scenarios(&args).unwrap());
    }

    #[test]
    fn write_report_emits_json_output() {
        let temp = temp_path("report-json");
        let args = Args {
            report: "json".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_report(&args, &sample_report()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("\"scenario_name\": \"Couple\""));
    }

    #[test]
    fn write_report_emits_markdown_output() {
        let temp = temp_path("report-md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_report(&args, &sample_report()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("# Booking Journey Report"));
    }

    #[test]
    fn write_report_defaults_to_console_format() {
        let temp = temp_path("report-console");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_report(&args, &sample_report()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Booking Journey Report"));
        assert!(content.contains("Hotel Aurora"));
    }

    #[test]
    fn build_journey_config_respects_overrides() {
        let args = Args {
            base_url: "https://staging.example".to_string(),
            landing_path: "/x".to_string(),
            max_hotel_retries: 5,
            ..base_args()
        };
        let cfg = build_journey_config(&args);
        assert_eq!(cfg.landing_url(), "https://staging.example/x");
        assert_eq!(cfg.max_hotel_retries, 5);
    }

    #[test]
    fn build_browser_config_respects_headless_and_hub() {
        let args = Args {
            headless: HeadlessMode::Windowed,
            hub: Some("http://remote.example".to_string()),
            ..base_args()
        };
        let cfg = build_browser_config(&args);
        assert!(!cfg.headless);
        assert_eq!(cfg.remote_hub.as_deref(), Some("http://remote.example"));
    }

    #[test]
    fn browser_label_is_lowercase() {
        assert_eq!(browser_label(BrowserKind::Chrome), "chrome");
        assert_eq!(browser_label(BrowserKind::Firefox), "firefox");
    }

    #[test]
    fn scenario_artifacts_dir_includes_seed() {
        let args = base_args();
        let dir = scenario_artifacts_dir(&args, "chrome", "Couple");
        assert!(dir.contains("couple/seed-1337"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
