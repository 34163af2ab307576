use std::error::Error;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use osu_api_rust as osu_api;
use osu_api::osu::beatmaps::BeatmapOption;
use osu_api::osu::replay::ReplayOption;
use osu_api::osu::scores::ScoresOption;
use osu_api::osu::user::UserOption;
use osu_api::osu::user_best::UserBestOption;
use osu_api::osu::user_recent::UserRecentOption;
use osu_api::osu::{Client, Mode, UsernameType};
use osu_api::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "osu_api", about = "Query the osu! v1 api")]
struct Cli {
    /// Settings profile under ./profiles, defaults are used if not given
    #[arg(long)]
    profile: Option<String>,

    /// Game mode: 0 osu, 1 taiko, 2 ctb, 3 mania
    #[arg(long, short, global = true, default_value_t = 0)]
    mode: i64,

    /// Treat user arguments as user ids instead of usernames
    #[arg(long, global = true)]
    id: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User { user: String },
    Beatmap { beatmap_id: u32 },
    Scores { beatmap_id: u32 },
    Best { user: String },
    Recent { user: String },
    Match { match_id: u64 },
    Replay { beatmap_id: u32, user: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    // Set up logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to start the logger");

    let cli = Cli::parse();
    let settings = match &cli.profile {
        Some(profile) => Settings::from_profile(profile)?,
        None => Settings::default(),
    };
    let client = Client::from_settings(&settings)?;

    let mode = Mode::from_code(cli.mode).ok_or_else(|| format!("Unknown mode {}", cli.mode))?;
    let user_type = if cli.id {
        UsernameType::Id
    } else {
        UsernameType::Name
    };

    match cli.command {
        Command::User { user } => {
            match client.user(&user, user_type, &[UserOption::Mode(mode)])? {
                Some(user) => print_json(&user)?,
                None => tracing::warn!("No user named {}", user),
            }
        }
        Command::Beatmap { beatmap_id } => print_json(&client.beatmaps(&[
            BeatmapOption::BeatmapId(beatmap_id),
            BeatmapOption::Mode(mode),
            BeatmapOption::IncludeConverted,
        ])?)?,
        Command::Scores { beatmap_id } => {
            print_json(&client.scores(beatmap_id, &[ScoresOption::Mode(mode)])?)?
        }
        Command::Best { user } => print_json(&client.user_best(
            &user,
            user_type,
            &[UserBestOption::Mode(mode)],
        )?)?,
        Command::Recent { user } => print_json(&client.user_recent(
            &user,
            user_type,
            &[UserRecentOption::Mode(mode)],
        )?)?,
        Command::Match { match_id } => match client.multiplayer_match(match_id)? {
            Some(lobby) => print_json(&lobby)?,
            None => tracing::warn!("No match with id {}", match_id),
        },
        Command::Replay { beatmap_id, user } => {
            let replay = client.replay(beatmap_id, &user, user_type, &[ReplayOption::Mode(mode)])?;
            println!(
                "{} frames, {:.1}s",
                replay.content.len(),
                replay.duration().as_secs_f64()
            );
            for event in replay.content.iter().take(10) {
                println!(
                    "+{:>4}ms  ({:>6.1}, {:>6.1})  {:?}",
                    event.time_delta.as_millis(),
                    event.x,
                    event.y,
                    event.pressed()
                );
            }
        }
    }

    Ok(())
}
