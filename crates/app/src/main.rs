use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use api::http::HttpBackend;
use api::{ApiConfig, ConfigError, FileTokenStore, Session};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use env_logger::Env;
use services::{AppServices, Clock};
use ui::{App, ServicesApp, UiApp, build_app_context};

const ENV_TOKEN_FILE: &str = "COURSE_TOKEN_FILE";
const DEFAULT_TOKEN_FILE: &str = ".course-token";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout-secs value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--timeout-secs <n>] [--token-file <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {}", ApiConfig::DEFAULT_BASE_URL);
    eprintln!("  --timeout-secs {}", ApiConfig::DEFAULT_TIMEOUT.as_secs());
    eprintln!("  --token-file {DEFAULT_TOKEN_FILE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!(
        "  {}, {}, {ENV_TOKEN_FILE}, RUST_LOG",
        ApiConfig::ENV_BASE_URL,
        ApiConfig::ENV_TIMEOUT_SECS
    );
}

#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    timeout: Option<Duration>,
    token_file: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => parsed.api_url = Some(require_value(args, "--api-url")?),
                "--timeout-secs" => {
                    let value = require_value(args, "--timeout-secs")?;
                    let timeout = api::config::parse_timeout_secs(&value)
                        .map_err(|_| ArgsError::InvalidTimeout { raw: value })?;
                    parsed.timeout = Some(timeout);
                }
                "--token-file" => {
                    parsed.token_file = Some(require_value(args, "--token-file")?.into());
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }

    /// Flags win over the environment, which wins over the defaults.
    fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        self.resolve_config(
            std::env::var(ApiConfig::ENV_BASE_URL).ok(),
            std::env::var(ApiConfig::ENV_TIMEOUT_SECS).ok(),
        )
    }

    /// An invalid environment timeout is an error even when `--api-url` is given.
    fn resolve_config(
        &self,
        env_url: Option<String>,
        env_timeout: Option<String>,
    ) -> Result<ApiConfig, ConfigError> {
        let base_url = self.api_url.clone().or(env_url);
        let config = ApiConfig::resolve(base_url.as_deref(), env_timeout.as_deref())?;
        Ok(match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        })
    }

    fn token_file(&self) -> PathBuf {
        self.token_file.clone().unwrap_or_else(|| {
            std::env::var(ENV_TOKEN_FILE)
                .map_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from)
        })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if parsed.help {
        print_usage();
        return Ok(());
    }

    let config = parsed.api_config()?;
    let token_file = parsed.token_file();
    log::info!(
        "using course API at {} (timeout {}s, token file {})",
        config.base_url(),
        config.timeout().as_secs(),
        token_file.display()
    );

    let session = Session::load(Arc::new(FileTokenStore::new(token_file)));
    let clock = Clock::default_clock();
    let probe = HttpBackend::new(config.clone(), session.clone())?;
    let services = AppServices::new_http(config, session, clock)?;
    let app: Arc<dyn UiApp> = Arc::new(ServicesApp::new(services, clock));
    let context = build_app_context(&app);

    // The UI falls back to sample content on its own; this only reports reachability.
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(err) => {
                log::warn!("health check skipped: {err}");
                return;
            }
        };
        match runtime.block_on(probe.health()) {
            Ok(()) => log::info!("course API is reachable"),
            Err(err) => log::warn!("course API health check failed: {err}"),
        }
    });

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Course Desktop")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = raw.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn parses_flags() {
        let args = parse(&["--api-url", "http://api.test", "--timeout-secs", "5"]).unwrap();
        assert_eq!(args.api_url.as_deref(), Some("http://api.test"));
        assert_eq!(args.timeout, Some(Duration::from_secs(5)));
        assert!(!args.help);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            parse(&["--timeout-secs", "0"]),
            Err(ArgsError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            parse(&["--api-url"]),
            Err(ArgsError::MissingValue { flag: "--api-url" })
        ));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn flags_and_env_layer_over_defaults() {
        let args = parse(&["--api-url", "http://flag.test"]).unwrap();
        let config = args
            .resolve_config(Some("http://env.test".into()), Some("7".into()))
            .unwrap();
        assert_eq!(config.base_url().as_str(), "http://flag.test/");
        assert_eq!(config.timeout(), Duration::from_secs(7));

        let args = parse(&["--timeout-secs", "4"]).unwrap();
        let config = args.resolve_config(Some("http://env.test".into()), Some("7".into())).unwrap();
        assert_eq!(config.base_url().as_str(), "http://env.test/");
        assert_eq!(config.timeout(), Duration::from_secs(4));
    }

    #[test]
    fn invalid_env_timeout_is_reported_with_or_without_url_flag() {
        let with_flag = parse(&["--api-url", "http://flag.test"]).unwrap();
        assert!(matches!(
            with_flag.resolve_config(None, Some("soon".into())),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        let without_flag = parse(&[]).unwrap();
        assert!(matches!(
            without_flag.resolve_config(None, Some("soon".into())),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn token_file_flag_wins() {
        let args = parse(&["--token-file", "/tmp/token"]).unwrap();
        assert_eq!(args.token_file(), PathBuf::from("/tmp/token"));
    }
}
