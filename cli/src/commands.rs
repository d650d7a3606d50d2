// Subcommand handlers: call the engine, print plain-text results
use std::io::BufRead;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use engine::data::{LogoChain, LogoSource};
use engine::services::{analysis, news};
use engine::watchlist::Watchlist;
use engine::{GuardianClient, GuardianError};
use shared::models::{ChatRole, FavoriteTicker};
use shared::utils::korean_format::format_relative;

use crate::cli::{Command, CredentialArgs, FavoritesCommand, NewsArgs, WatchlistArgs};
use crate::config::AppConfig;

pub async fn run(command: Command, config: &AppConfig, client: &GuardianClient) -> Result<()> {
    let outcome = dispatch(command, config, client).await;
    match outcome {
        Err(err) => match err.downcast::<GuardianError>() {
            Ok(engine_err) => {
                let engine_err = client.settle(engine_err).await;
                if engine_err.is_auth_failure() {
                    bail!("{}. Run `stock-guardian login <username>` first.", engine_err)
                }
                Err(engine_err.into())
            }
            Err(other) => Err(other),
        },
        ok => ok,
    }
}

async fn dispatch(command: Command, config: &AppConfig, client: &GuardianClient) -> Result<()> {
    match command {
        Command::Login(args) => {
            let password = password(&args)?;
            client.session.login(&args.username, &password).await?;
            println!("로그인 성공");
        }
        Command::Signup(args) => {
            let password = password(&args)?;
            client.session.signup(&args.username, &password).await?;
            println!("회원가입 완료. 이제 로그인하세요.");
        }
        Command::Logout => {
            client.logout().await?;
            println!("로그아웃 되었습니다.");
        }
        Command::Favorites(cmd) => favorites(cmd, client).await?,
        Command::Suggest { input } => {
            for ticker in client.favorites.resolver().suggest(&input) {
                println!("{}\t{}", ticker.code, ticker.canonical_name);
            }
        }
        Command::News(args) => show_news(args, client).await?,
        Command::Analysis { name } => show_analysis(&name, client).await?,
        Command::Ask { term } => {
            let reply = client.terms.ask(&term).await?;
            println!("[{}]", reply.title.unwrap_or_default());
            println!("{}", reply.content);
        }
        Command::History => {
            for message in client.terms.history().await? {
                let speaker = match message.role {
                    ChatRole::User => "나",
                    ChatRole::Bot => "AI",
                };
                match &message.title {
                    Some(title) => println!("{} [{}] {}", speaker, title, message.content),
                    None => println!("{} {}", speaker, message.content),
                }
            }
        }
        Command::Watchlist(args) => watchlist(args, config, client)?,
    }
    Ok(())
}

fn password(args: &CredentialArgs) -> Result<String> {
    if let Some(password) = &args.password {
        return Ok(password.clone());
    }
    eprint!("password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn favorites(cmd: FavoritesCommand, client: &GuardianClient) -> Result<()> {
    match cmd {
        FavoritesCommand::List => {
            let rows = client.favorites.refresh().await?;
            if rows.is_empty() {
                println!("즐겨찾기한 종목이 없습니다.");
            }
            for row in rows.iter() {
                print_favorite(row, &client.settings().logo_url_template);
            }
        }
        FavoritesCommand::Add { input } => {
            // Sync first so an accepted add lands after the server's current rows.
            client.favorites.sync_before_edit().await?;
            let row = client.favorites.add(&input).await?;
            println!("추가됨: {} ({})", row.name, row.code);
        }
        FavoritesCommand::Remove { name } => {
            client.favorites.sync_before_edit().await?;
            let rows = client.favorites.remove(&name).await?;
            println!("삭제됨: {} (남은 종목 {}개)", name.trim(), rows.len());
        }
    }
    Ok(())
}

fn print_favorite(row: &FavoriteTicker, logo_template: &str) {
    let logo = match LogoChain::for_favorite(logo_template, row).current() {
        LogoSource::Url(url) => url,
        LogoSource::Glyph(glyph) => glyph,
    };
    println!("{}\t{}\t{}\t{}", row.code, row.name, row.category, logo);
}

async fn show_news(args: NewsArgs, client: &GuardianClient) -> Result<()> {
    let items = match &args.company {
        Some(company) => client.news.for_company(company).await?,
        None => client.news.fetch().await?,
    };
    let now = Utc::now();
    let shown = news::filter(&items, args.query.as_deref().unwrap_or(""));
    if shown.is_empty() {
        println!("뉴스가 없습니다.");
    }
    for item in shown {
        println!("[{}] {} · {}", item.company, item.title, format_relative(&item.date, now));
        println!("    {}", item.link);
    }
    Ok(())
}

async fn show_analysis(name: &str, client: &GuardianClient) -> Result<()> {
    let result = client.analysis.fetch(name).await?;
    println!("{} ({})", result.company, result.corp_code);
    println!();
    println!("{}", analysis::summary(&result));

    let Some(investors) = result.metrics.as_ref().and_then(|m| m.investors.as_ref()) else {
        return Ok(());
    };
    println!();
    for (label, rows) in [
        ("누적 순매수", &investors.cumulative_net),
        ("누적 매수", &investors.cumulative_buy),
        ("누적 매도", &investors.cumulative_sell),
    ] {
        let cells: Vec<String> =
            analysis::figure_rows(rows).iter().map(|(who, amount)| format!("{} {}", who, amount)).collect();
        println!("{}: {}", label, cells.join(", "));
    }
    if let Some(series) = analysis::InvestorFlowSeries::from_history(&investors.history) {
        println!();
        println!("{:>6} {:>10} {:>10} {:>10}", "", "개인", "외국인", "기관");
        for i in 0..series.len() {
            println!(
                "{:>6} {:>10.1} {:>10.1} {:>10.1}",
                series.labels[i], series.personal[i], series.foreigner[i], series.institution[i]
            );
        }
    }
    Ok(())
}

fn watchlist(args: WatchlistArgs, config: &AppConfig, client: &GuardianClient) -> Result<()> {
    let path = config.watchlist_path();
    let now = Utc::now();
    let mut list = Watchlist::load_or_seed(&path, &client.metadata, now)?;
    if !args.pins.is_empty() {
        for id in &args.pins {
            match list.toggle(id, now) {
                Some(pinned) => tracing::debug!(id = %id, pinned, "Toggled watchlist pin"),
                None => bail!("unknown watchlist id '{}'", id),
            }
        }
        list.save(&path)?;
    }
    for entry in list.view(args.query.as_deref().unwrap_or("")) {
        let pin = if entry.pinned { "★" } else { "☆" };
        println!("{:>3} {} {} {}\t{}", entry.id, pin, entry.glyph, entry.name, entry.category);
    }
    Ok(())
}
