//! Command dispatcher: builds the app from config and drives the services.

use std::time::Duration;

use chrono::Local;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use tokio::signal;
use tokio::time::interval;
use tracing::info;

use super::command::{BoostCommand, Cli, ClaimArgs, Commands, FanArgs, WalletArgs};
use super::output;
use crate::app::App;
use crate::config::Config;
use crate::domain::engagement::FanProfile;
use crate::domain::level::{exp_to_next, progress_percent, resolve_level};
use crate::domain::price::{ResolvedPrice, StoredQuote};
use crate::error::{ClaimError, Error, Result};

/// Parse config, build the app, and run the selected command.
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    if cli.quiet {
        config.logging.level = "error".into();
    }
    config.init_logging();

    let app = App::build(config)?;

    match cli.command {
        Commands::Price => price(&app).await,
        Commands::Status(args) => status(&app, &args).await,
        Commands::Fan(args) => fan(&app, &args).await,
        Commands::Boost(BoostCommand::Start(args)) => boost_start(&app, &args).await,
        Commands::Boost(BoostCommand::Verify(args)) => boost_verify(&app, &args).await,
        Commands::Claim(args) => claim(&app, &args).await,
        Commands::Watch(args) => watch(&app, &args).await,
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn print_price(price: &ResolvedPrice) {
    output::section("Fan token price");
    match price.price_per_token {
        Some(value) => output::key_value("EUR/token", value),
        None => output::key_value("EUR/token", "unavailable"),
    }
    if let Some(base_per_token) = price.base_per_token {
        output::key_value("ETH/token", base_per_token);
    }
    output::key_value("EUR/ETH", price.base_rate);
    output::key_value("source", output::provenance_label(price.provenance));
    if let Some(status) = &price.status {
        output::warn(status);
    }
}

async fn price(app: &App) -> Result<()> {
    if let Some(quote) = app.pricing.hydrate() {
        print_cache_age(&quote);
    }

    let bar = spinner("Resolving price...");
    let price = app.pricing.resolve().await;
    bar.finish_and_clear();

    print_price(&price);
    Ok(())
}

fn print_cache_age(quote: &StoredQuote) {
    let resolved_at = chrono::DateTime::from_timestamp_millis(quote.resolved_at_ms)
        .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".into());
    output::note(&format!("cached quote from {resolved_at}"));
}

async fn status(app: &App, args: &WalletArgs) -> Result<()> {
    let live_price = app.pricing.hydrate().map(|quote| quote.price_per_token);

    let bar = spinner("Reading balances...");
    let snapshot = app.wallet.snapshot(&args.wallet, &app.pricing, live_price).await;
    bar.finish_and_clear();

    output::section("Wallet");
    output::key_value("address", &snapshot.wallet);
    output::key_value("FAN", &snapshot.fan_balance);
    output::key_value("≈ EUR", &snapshot.fan_eur_value);
    output::key_value("CREW", &snapshot.stake_balance);

    output::section("Staking");
    output::key_value("staked", &snapshot.staked);
    output::key_value("claimable", &snapshot.claimable);
    output::key_value("reward pool", &snapshot.reward_pool);
    Ok(())
}

fn print_profile(profile: &FanProfile) {
    let level = resolve_level(profile.total_exp);
    let percent = progress_percent(profile.total_exp, &level);

    output::section(&format!("@{}", profile.username.trim_start_matches('@')));
    output::key_value("level", level.level);
    output::key_value("progress", output::progress_bar(percent));
    output::key_value(
        "tier EXP",
        format!(
            "{} / {}",
            profile.total_exp - i64::from(level.floor),
            i64::from(level.ceiling) - i64::from(level.floor)
        ),
    );
    output::key_value("to next level", exp_to_next(profile.total_exp, &level));
    output::key_value("total EXP", profile.total_exp);
    output::key_value("mining power", profile.mining_power);

    output::section("EXP sources");
    output::key_value("instagram", profile.breakdown.instagram);
    output::key_value("tiktok", profile.breakdown.tiktok);
    output::key_value("facebook", profile.breakdown.facebook);
    output::key_value("stream", profile.breakdown.stream);
    output::key_value("live bonus", profile.breakdown.live_bonus);

    output::section(&format!("Post checks {}/4", profile.checks.completed()));
    for (label, done) in [
        ("like", profile.checks.liked),
        ("comment", profile.checks.commented),
        ("story", profile.checks.storied),
        ("save", profile.checks.saved),
    ] {
        if done {
            output::ok(label);
        } else {
            output::warn(label);
        }
    }
}

async fn fan(app: &App, args: &FanArgs) -> Result<()> {
    let bar = spinner("Verifying fan...");
    let profile = app.engagement.load_profile(&args.fan_id).await?;
    bar.finish_and_clear();

    print_profile(&profile);
    Ok(())
}

async fn boost_start(app: &App, args: &FanArgs) -> Result<()> {
    output::note("Remove your like and save from the post before recording the baseline.");
    let baseline = app.engagement.record_baseline(&args.fan_id).await?;
    output::ok(&format!(
        "Baseline recorded: {} likes, {} saves",
        baseline.likes, baseline.saves
    ));
    output::note("Now like and save the post again, then run `boost verify`.");
    Ok(())
}

async fn boost_verify(app: &App, args: &FanArgs) -> Result<()> {
    let outcome = app.engagement.verify_boost(&args.fan_id).await?;
    output::key_value(
        "likes",
        format!("{} → {}", outcome.baseline.likes, outcome.current.likes),
    );
    output::key_value(
        "saves",
        format!("{} → {}", outcome.baseline.saves, outcome.current.saves),
    );
    if outcome.confirmed() {
        output::ok("Boost confirmed - your EXP will update on the next profile refresh");
    } else {
        output::warn("Counters did not both increase yet - like and save the post, then retry");
    }
    Ok(())
}

async fn claim(app: &App, args: &ClaimArgs) -> Result<()> {
    let profile = app.engagement.load_profile(&args.fan_id).await?;

    let wallet = match args
        .wallet
        .clone()
        .or_else(|| profile.wallet.as_ref().map(|w| w.to_string()))
    {
        Some(wallet) => wallet,
        None => {
            return Err(ClaimError::InvalidWallet {
                reason: "no wallet on the profile; pass --wallet".into(),
            }
            .into());
        }
    };

    if !args.yes {
        let prompt = format!(
            "Submit claim for @{} ({} mining power) to {}?",
            profile.username.trim_start_matches('@'),
            profile.mining_power,
            wallet
        );
        if !Confirm::new().with_prompt(prompt).interact()? {
            output::note("Claim cancelled.");
            return Ok(());
        }
    }

    match app.engagement.submit_claim(&args.fan_id, &wallet, &profile).await {
        Ok(message) => {
            output::ok(&message);
            Ok(())
        }
        Err(Error::Claim(err)) => {
            output::error(&err.to_string());
            Err(err.into())
        }
        Err(err) => Err(err),
    }
}

async fn watch(app: &App, args: &WalletArgs) -> Result<()> {
    if let Some(quote) = app.pricing.hydrate() {
        print_cache_age(&quote);
    }

    info!(wallet = %args.wallet, "Watch started");

    let mut latest_price = app.pricing.resolve().await;
    print_tick("price", &price_line(&latest_price));

    let snapshot = app
        .wallet
        .snapshot(&args.wallet, &app.pricing, latest_price.price_per_token)
        .await;
    print_tick("wallet", &snapshot_line(&snapshot));

    let mut balance_tick = interval(Duration::from_secs(
        app.config.refresh.balance_interval_secs,
    ));
    let mut price_tick = interval(Duration::from_secs(app.config.refresh.price_interval_secs));
    // Both intervals fire immediately once; the initial refresh above
    // already covered that.
    balance_tick.tick().await;
    price_tick.tick().await;

    loop {
        tokio::select! {
            _ = balance_tick.tick() => {
                let snapshot = app
                    .wallet
                    .snapshot(&args.wallet, &app.pricing, latest_price.price_per_token)
                    .await;
                if app.wallet.tracker().is_current(snapshot.sequence) {
                    print_tick("wallet", &snapshot_line(&snapshot));
                }
            }
            _ = price_tick.tick() => {
                latest_price = app.pricing.resolve().await;
                print_tick("price", &price_line(&latest_price));
            }
            _ = signal::ctrl_c() => {
                info!("Watch stopped");
                break;
            }
        }
    }

    Ok(())
}

fn print_tick(kind: &str, line: &str) {
    output::note(&format!(
        "{} [{kind}] {line}",
        Local::now().format("%H:%M:%S")
    ));
}

fn price_line(price: &ResolvedPrice) -> String {
    let value = price
        .price_per_token
        .map(|p| p.to_string())
        .unwrap_or_else(|| "unavailable".into());
    let mut line = format!(
        "EUR/token {value} (EUR/ETH {}, {})",
        price.base_rate,
        price.provenance
    );
    if let Some(status) = &price.status {
        line.push_str(&format!(" - {status}"));
    }
    line
}

fn snapshot_line(snapshot: &crate::service::wallet::WalletSnapshot) -> String {
    format!(
        "FAN {} (≈{} EUR), CREW {}, staked {}, claimable {}",
        snapshot.fan_balance,
        snapshot.fan_eur_value,
        snapshot.stake_balance,
        snapshot.staked,
        snapshot.claimable
    )
}
