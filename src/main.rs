use anyhow::{Context, Result};
use cgpa::config::Settings;
use cgpa::session::Session;
use cgpa::utils::share::SharePayload;
use cgpa::utils::telegram::TelegramShare;
use cgpa::utils::theme::{JsonFileStore, ThemeSwitch};
use dotenv::dotenv;
use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::io::BufReader;

// Entry point for the async main function, powered by tokio runtime.
#[tokio::main]
async fn main() -> Result<()> {
    // Loads environment variables from a `.env` file, if present.
    dotenv().ok();

    let settings = Settings::from_env().context("Invalid configuration")?;

    TermLogger::init(
        settings.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto
    ).context("Failed to initialise logging")?;

    // Theme preference survives restarts, course data does not.
    let store = JsonFileStore::new(&settings.prefs_path);
    let theme = ThemeSwitch::init(store, settings.prefers_dark);
    info!("Theme: {}", theme.current());

    let mut session = Session::new(theme, SharePayload::new(settings.share_url.clone()))
        .with_remove_delay(settings.remove_delay)
        .with_celebration_threshold(settings.celebrate_at);

    match &settings.telegram {
        Some(telegram) => {
            info!("Sharing through Telegram chat {}", telegram.chat_id);
            session = session.with_share_target(Box::new(TelegramShare::new(&telegram.bot_token, telegram.chat_id)));
        },
        None => info!("No share target configured, share prints the link"),
    }

    println!("CGPA Calculator, type `help` for commands.");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    if let Err(e) = session.run(stdin, &mut stdout).await {
        error!("Session ended: {:#}", e);
        return Err(e);
    }
    Ok(())
}
