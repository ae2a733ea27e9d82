#[macro_use]
extern crate log;

use std::{path::PathBuf, time::Duration};

use blockytime_algos::{SleepSummary, TrendAggregator, helpers::time_math::parse_tz};
use blockytime_db::DatabaseHandler;
use blockytime_types::{
    events::Event,
    sleep::SleepStatsQuery,
    statistics::{StatisticsQuery, TimeSlot},
    trends::GroupBy,
};
use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;

#[derive(Parser)]
pub struct BlockytimeCli {
    #[arg(env, long)]
    pub database_url: String,
    /// Timezone used to bucket trends and statistics
    #[arg(env, long, value_parser = parse_tz, default_value = TrendAggregator::DEFAULT_TIMEZONE.name())]
    pub reporting_timezone: Tz,
    /// Seconds a trend result is reused, 0 disables caching
    #[arg(env, long, default_value_t = 0)]
    pub cache_ttl_secs: u64,
    #[clap(subcommand)]
    pub subcommand: BlockytimeCommand,
}

#[derive(Subcommand)]
pub enum BlockytimeCommand {
    ///
    /// Sleep start/end/duration trends with decaying moving averages
    ///
    SleepStats {
        #[arg(long)]
        start_date: NaiveDate,
        #[arg(long)]
        end_date: NaiveDate,
        #[arg(long, default_value_t = SleepStatsQuery::DEFAULT_CUTOFF_HOUR)]
        cutoff_hour: u32,
        #[arg(long, value_parser = parse_tz, default_value = SleepStatsQuery::DEFAULT_TIMEZONE.name())]
        timezone: Tz,
        #[arg(long, default_value_t = SleepStatsQuery::DEFAULT_START_TIME_CUTOFF_HOUR)]
        start_time_cutoff_hour: u32,
        #[arg(long, default_value_t = SleepStatsQuery::DEFAULT_END_TIME_CUTOFF_HOUR)]
        end_time_cutoff_hour: u32,
        #[arg(long, default_value_t = SleepStatsQuery::DEFAULT_FILTER_START_TIME_AFTER)]
        filter_start_time_after: f64,
        #[arg(long, default_value_t = SleepStatsQuery::DEFAULT_FILTER_END_TIME_AFTER)]
        filter_end_time_after: f64,
        #[arg(long, default_value_t = SleepStatsQuery::DEFAULT_DECAY_FACTOR)]
        decay_factor: f64,
        #[arg(long, default_value_t = SleepStatsQuery::DEFAULT_WINDOW_SIZE)]
        window_size: usize,
        /// Print the latest averages as text instead of JSON
        #[arg(long)]
        summary: bool,
    },
    ///
    /// Hours per type grouped by day, week or month
    ///
    Trends {
        #[arg(long)]
        start_date: NaiveDate,
        #[arg(long)]
        end_date: NaiveDate,
        #[arg(long, default_value = "DAY")]
        group_by: GroupBy,
    },
    ///
    /// Total hours per type
    ///
    Stats {
        #[arg(long)]
        start_date: NaiveDate,
        #[arg(long)]
        end_date: NaiveDate,
        #[arg(long)]
        type_uid: Vec<i32>,
        #[arg(long, requires_all = ["hour", "minute"])]
        time_slot_minutes: Option<u32>,
        #[arg(long, requires = "time_slot_minutes")]
        hour: Option<u32>,
        #[arg(long, requires = "time_slot_minutes")]
        minute: Option<u32>,
        #[arg(long)]
        day_of_week: Option<Weekday>,
    },
    ///
    /// List the type catalog
    ///
    Types,
    ///
    /// Create a type
    ///
    AddType {
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: Option<i64>,
        #[arg(long)]
        priority: Option<i32>,
    },
    ///
    /// Log one block at a unix timestamp
    ///
    AddBlock {
        #[arg(long)]
        type_uid: i32,
        #[arg(long)]
        timestamp: i64,
    },
}

#[derive(Serialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<String>,
}

/// Stdout is reserved for JSON, so a missing `.env` only goes to the log.
fn report_env_file(result: dotenv::Result<PathBuf>) -> bool {
    match result {
        Ok(path) => {
            debug!("loaded {}", path.display());
            true
        }
        Err(error) => {
            warn!(".env not loaded: {error}");
            false
        }
    }
}

fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    let envelope = Envelope {
        data: Some(data),
        error: None,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx::query", log::LevelFilter::Off)
        .filter_module("sea_orm_migration::migrator", log::LevelFilter::Off)
        .init();

    report_env_file(env_file);

    let cli = BlockytimeCli::parse();
    let db_handler = DatabaseHandler::new(cli.database_url)
        .await?
        .with_reporting_timezone(cli.reporting_timezone)
        .with_cache_ttl(Duration::from_secs(cli.cache_ttl_secs));

    let result = run(db_handler, cli.subcommand).await;
    if let Err(error) = &result {
        let envelope = Envelope::<()> {
            data: None,
            error: Some(error.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }

    result
}

async fn run(db_handler: DatabaseHandler, command: BlockytimeCommand) -> anyhow::Result<()> {
    match command {
        BlockytimeCommand::SleepStats {
            start_date,
            end_date,
            cutoff_hour,
            timezone,
            start_time_cutoff_hour,
            end_time_cutoff_hour,
            filter_start_time_after,
            filter_end_time_after,
            decay_factor,
            window_size,
            summary,
        } => {
            let query = SleepStatsQuery::new(start_date, end_date)
                .with_cutoff_hour(cutoff_hour)
                .with_timezone(timezone)
                .with_time_cutoff_hours(start_time_cutoff_hour, end_time_cutoff_hour)
                .with_filters(filter_start_time_after, filter_end_time_after)
                .with_decay_factor(decay_factor)
                .with_window_size(window_size);

            let stats = db_handler.calculate_sleep_stats(query).await?;
            if summary {
                println!("{}", SleepSummary::from(&stats));
                return Ok(());
            }

            print_json(stats)
        }
        BlockytimeCommand::Trends {
            start_date,
            end_date,
            group_by,
        } => {
            let trends = db_handler.get_trends(start_date, end_date, group_by).await?;
            print_json(trends)
        }
        BlockytimeCommand::Stats {
            start_date,
            end_date,
            type_uid,
            time_slot_minutes,
            hour,
            minute,
            day_of_week,
        } => {
            let mut query = StatisticsQuery::new(start_date, end_date);
            if !type_uid.is_empty() {
                query = query.with_type_ids(type_uid);
            }
            if let Some(slot_minutes) = time_slot_minutes {
                query = query.with_time_slot(TimeSlot {
                    slot_minutes,
                    hour: hour.unwrap_or_default(),
                    minute: minute.unwrap_or_default(),
                });
            }
            if let Some(weekday) = day_of_week {
                query = query.with_weekday(weekday);
            }

            let statistics = db_handler.get_statistics(query).await?;
            print_json(statistics)
        }
        BlockytimeCommand::Types => {
            let catalog = db_handler.fetch_type_catalog().await?;
            print_json(catalog)
        }
        BlockytimeCommand::AddType {
            name,
            color,
            priority,
        } => {
            let type_info = db_handler.create_type(&name, color, priority).await?;
            info!("created type `{}` with uid {}", type_info.name, type_info.uid);
            print_json(type_info)
        }
        BlockytimeCommand::AddBlock {
            type_uid,
            timestamp,
        } => {
            let uid = db_handler.create_block(Event::new(type_uid, timestamp)).await?;
            info!("logged block {uid} for type {type_uid}");
            print_json(uid)
        }
    }
}
