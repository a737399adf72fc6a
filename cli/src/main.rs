use std::rc::Rc;

use authsync::config::ConfigError;
use authsync::net::HttpStatusClient;
use authsync::platform::TokioDelay;
use authsync::{
    CallbackReconciler, Navigator, NetworkFailure, SessionConfig, SessionState, SessionStatus,
    SessionStore,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[from] NetworkFailure),
}

#[derive(Parser, Debug)]
#[command(name = "authsync", about = "Check, start, and end the research assistant login session")]
struct Cli {
    /// Overrides `AUTH_API_BASE_URL` from the session config.
    #[arg(long, env = "AUTH_API_BASE_URL")]
    base_url: Option<String>,

    /// Value of the backend's `session` cookie, as copied from a browser.
    #[arg(long, env = "AUTH_SESSION_COOKIE")]
    session_cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Ask the backend who is signed in.
    Status,
    /// Print the URL that starts the provider sign-in.
    Login,
    /// End the session and confirm with the backend.
    Logout,
    /// Run the post-sign-in landing: confirm the session, then return home.
    Callback,
}

/// Terminal stand-in for a browser: navigation prints the destination.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, to: &str) {
        println!("navigate: {to}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::from_env()?;
    if let Some(base) = cli.base_url.as_deref() {
        config = config.with_api_base_url(base);
    }

    let client = HttpStatusClient::new(&config, cli.session_cookie.as_deref())?;
    let navigator: Rc<dyn Navigator> = Rc::new(PrintNavigator);
    let store = SessionStore::new(&config, Rc::new(client), Rc::clone(&navigator), Rc::new(TokioDelay));

    match cli.command {
        Command::Status => {
            println!("{}", describe(&store.refresh().await));
        }
        Command::Login => store.login(),
        Command::Logout => {
            println!("{}", describe(&store.logout().await));
        }
        Command::Callback => run_callback(&config, store, navigator).await,
    }
    Ok(())
}

async fn run_callback(config: &SessionConfig, store: SessionStore, navigator: Rc<dyn Navigator>) {
    let reconciler = CallbackReconciler::new(store, navigator, Rc::new(TokioDelay), config);
    let (mount, task) = reconciler.mount();

    let mut phases = mount.phases();
    println!("{}", mount.phase().message());
    let printer = async move {
        while phases.changed().await.is_ok() {
            println!("{}", phases.borrow_and_update().message());
        }
    };

    tokio::select! {
        () = async { tokio::join!(task, printer); } => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted; cancelling the pending return");
        }
    }
    mount.teardown();
}

fn describe(state: &SessionState) -> String {
    match state.status() {
        SessionStatus::Authenticated { email } => format!("signed in as {email}"),
        SessionStatus::Unauthenticated => "signed out".to_owned(),
        SessionStatus::Indeterminate => "sign-in status unknown".to_owned(),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
