use std::env;
use std::str::FromStr;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{debug, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use tokio::task::LocalSet;
use user_list_view::{label_button_html, UserListView, ViewConfig};

/// Fetches the user list once and prints it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The users endpoint to read from. Defaults to the local development server.
    #[arg(short, long, env = "USER_LIST_ENDPOINT")]
    endpoint: Option<String>,
    /// How to print the rendered list.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Also render a label button with this text below the list.
    #[arg(long)]
    button: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Html,
}

fn setup_logging() -> anyhow::Result<()> {
    let console = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d} | {l} | {f}:{L} - {m}{n}",
        )))
        .build();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("Info"));

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(
            Root::builder()
                .appender("console")
                .build(LevelFilter::from_str(&log_level).context("Invalid log level")?),
        )
        .context("Failed to build log config")?;

    log4rs::init_config(config).context("Failed to initialise log4rs")?;
    Ok(())
}

fn view_config(args: &Args) -> anyhow::Result<ViewConfig> {
    match &args.endpoint {
        Some(endpoint) => ViewConfig::with_endpoint(endpoint),
        None => Ok(ViewConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging()?;
    let config = view_config(&args)?;
    debug!("reading users from {}", config.endpoint);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Could not build tokio runtime")?;
    let local = LocalSet::new();
    let page = local.block_on(&runtime, async {
        let mut view = UserListView::connect(&config)?;
        if let Some(fetch) = view.mount() {
            // The task itself never fails, only a panic would end up here
            fetch.await.context("User list fetch task panicked")?;
        }
        anyhow::Ok(view.render())
    })?;

    match args.format {
        Format::Text => {
            println!("{}", page.to_text());
            if let Some(button) = args.button {
                println!("[{button}]");
            }
        }
        Format::Html => {
            println!("{}", page.to_html());
            if let Some(button) = args.button {
                println!("{}", label_button_html(button));
            }
        }
    }
    Ok(())
}
