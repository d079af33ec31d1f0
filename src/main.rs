use std::{io::Write, time::Duration};

use anyhow::{Context, Result};

use betai::{
    cli::parse_args_from_env,
    config::Config,
    feed::{FeedCache, FeedSource, HttpFeedSource},
    logging::init_tracing,
    render,
    session::Session,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args_from_env()?;
    let config = Config::load(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;
    let logging_guard = init_tracing(&config.logging).context("failed to initialize logging")?;

    let source = HttpFeedSource::new(
        &config.feed.base_url,
        &config.feed.document,
        config.feed.request_timeout(),
    )
    .context("failed to construct feed source")?;
    tracing::info!(
        target: "betai",
        run_id = %logging_guard.run_id(),
        url = %source.document_url(),
        "betai_started"
    );

    let mut session = Session::new(FeedCache::new(source), config.gate.countdown_secs);
    if let Some(match_id) = args.match_id.as_deref() {
        if args.refresh {
            session.refresh().await.map_err(|err| {
                println!("{}", render::failure_state(&err));
                err
            })?;
        }
        return show_match(&session, match_id).await;
    }

    let loaded = if args.refresh {
        session.refresh().await
    } else {
        session.load().await
    };
    if let Err(err) = loaded {
        println!("{}", render::failure_state(&err));
        return Err(err).context("failed to load today's matches");
    }
    print_visible(&session);

    for _ in 0..args.unlocks {
        let Some(offer) = session.unlock_offer() else {
            break;
        };
        println!("\n{}", render::unlock_prompt(&offer));

        let countdown = session.open_gate()?;
        eprint!("advertisement: skip in {}s", countdown.remaining_secs());
        session
            .run_gate(Duration::from_secs(1), |remaining| {
                eprint!("\radvertisement: skip in {remaining}s");
                let _ = std::io::stderr().flush();
            })
            .await?;
        eprintln!();

        session.complete_gate()?;
        print_visible(&session);
    }

    tracing::info!(target: "betai", tier = %session.tier(), "betai_stopped");
    Ok(())
}

async fn show_match<S: FeedSource>(session: &Session<S>, match_id: &str) -> Result<()> {
    match session.record(match_id).await {
        Ok(Some(record)) => println!("{}", render::record_detail(&record)),
        Ok(None) => {
            tracing::info!(target: "betai", match_id = %match_id, "match_not_found");
            println!("{}", render::not_found(match_id));
        }
        Err(err) => {
            println!("{}", render::failure_state(&err));
            return Err(err).context("failed to load match details");
        }
    }
    Ok(())
}

fn print_visible<S: FeedSource>(session: &Session<S>) {
    println!("{}", render::summary_line(&session.summary()));
    for record in session.visible() {
        println!("\n{}", render::record_card(record));
    }
    if session.feed().cached().is_some_and(|records| records.is_empty()) {
        println!("No matches found for today.");
    }
}
