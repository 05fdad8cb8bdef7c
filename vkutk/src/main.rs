use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use reqwest::Url;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vkutk_client::plugin::{DayPreference, PluginApi, PreferTime, TimetableRequest};
use vkutk_timetable::color::Palette;
use vkutk_timetable::store::{Retention, SavedTimetable, TimetableStore};
use vkutk_timetable::timetable::{days, TimetableData};
use vkutk_timetable::{DayPolicy, Normalizer, Timetable};

use crate::ascii::{DayView, SavedList, Unscheduled, WeekView};

mod ascii;

#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Args {
  #[arg(long, short, env = "VKUTK_STORE", default_value = "saved_timetables.json")]
  store: PathBuf,
  /// How many saved timetables to keep: 3 on web, all on mobile.
  #[arg(long, short, env = "VKUTK_RETENTION", value_enum, default_value_t = Platform::Web)]
  retention: Platform,
  #[arg(long, short, env = "VKUTK_PALETTE", value_enum, default_value_t = Platform::Web)]
  palette: Platform,
  /// Skip sessions with an unknown day instead of placing them on Monday.
  #[arg(long, env = "VKUTK_STRICT_DAYS")]
  strict_days: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Run the timetable command on the backend and save the result.
  Fetch {
    #[arg(
      long,
      short,
      env = "VKUTK_API_ENDPOINT",
      default_value = "http://localhost:8000"
    )]
    endpoint: Url,
    #[arg(long, short, env = "VKUTK_USER")]
    user: String,
    #[arg(long, short)]
    semester: u8,
    #[arg(long, value_enum)]
    prefer_time: Option<Session>,
    #[arg(long, value_delimiter = ',')]
    prefer_day: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    avoid_day: Vec<String>,
    #[arg(long)]
    lecturer: Option<String>,
  },
  /// Save a timetable command result read from a file, or `-` for stdin.
  Import { file: PathBuf },
  /// List saved timetables, newest first.
  List,
  /// Show one day of a saved timetable.
  Show {
    #[arg(long)]
    id: Option<i64>,
    #[arg(long, short, default_value = "T2")]
    day: String,
  },
  /// Show the whole week of a saved timetable.
  Grid {
    #[arg(long)]
    id: Option<i64>,
  },
  /// Delete a saved timetable by id.
  Delete { id: i64 },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Platform {
  Web,
  Mobile,
}

impl Platform {
  fn retention(self) -> Retention {
    match self {
      Platform::Web => Retention::WEB,
      Platform::Mobile => Retention::MOBILE,
    }
  }

  fn palette(self) -> Palette {
    match self {
      Platform::Web => Palette::WEB,
      Platform::Mobile => Palette::MOBILE,
    }
  }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Session {
  Morning,
  Afternoon,
}

impl From<Session> for PreferTime {
  fn from(session: Session) -> Self {
    match session {
      Session::Morning => PreferTime::Morning,
      Session::Afternoon => PreferTime::Afternoon,
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let store = TimetableStore::new(&args.store, args.retention.retention());

  match &args.command {
    Command::Fetch {
      endpoint,
      user,
      semester,
      prefer_time,
      prefer_day,
      avoid_day,
      lecturer,
    } => {
      let mut request = TimetableRequest::new(user, *semester)?;
      request.prefer_time = prefer_time.map(PreferTime::from);
      request.prefer_lecturer = lecturer.clone();
      for (labels, preference) in [
        (prefer_day, DayPreference::Prefer),
        (avoid_day, DayPreference::Avoid),
      ] {
        for label in labels {
          request
            .day_preferences
            .insert(request_day(label)?, preference);
        }
      }

      let data = PluginApi::new(endpoint.as_str())?
        .execute_timetable(&request)
        .await?;
      print!("{}", Unscheduled(&data.unscheduled_sessions));

      let saved = store.import(data, OffsetDateTime::now_utc())?;
      println!(
        "Saved timetable {} with {} sessions",
        saved.id,
        saved.data.scheduled_sessions.len()
      );
    }
    Command::Import { file } => {
      let data = read_command_result(file)?;
      let saved = store.import(data, OffsetDateTime::now_utc())?;
      println!(
        "Saved timetable {} with {} sessions",
        saved.id,
        saved.data.scheduled_sessions.len()
      );
    }
    Command::List => {
      let saved = store.load();
      if saved.is_empty() {
        println!("No saved timetables in {}", store.path().display());
      } else {
        print!("{}", SavedList(&saved));
      }
    }
    Command::Show { id, day } => {
      let weekday =
        days::weekday(day).ok_or_else(|| anyhow!("Unknown day {:?}, try T2..T7 or CN", day))?;
      let saved = select(&store, *id)?;
      let timetable = normalize(&args, &saved);

      print!(
        "{}",
        DayView {
          timetable: &timetable,
          weekday,
        }
      );
      print!("{}", Unscheduled(&saved.data.unscheduled_sessions));
    }
    Command::Grid { id } => {
      let saved = select(&store, *id)?;
      let timetable = normalize(&args, &saved);

      print!(
        "{}",
        WeekView {
          timetable: &timetable,
        }
      );
      print!("{}", Unscheduled(&saved.data.unscheduled_sessions));
    }
    Command::Delete { id } => {
      if !store.delete(*id)? {
        return Err(anyhow!("No saved timetable with id {}", id));
      }
      println!("Deleted timetable {}", id);
    }
  }

  Ok(())
}

fn select(store: &TimetableStore, id: Option<i64>) -> anyhow::Result<SavedTimetable> {
  match id {
    Some(id) => store
      .get(id)
      .ok_or_else(|| anyhow!("No saved timetable with id {}", id)),
    None => store
      .latest()
      .ok_or_else(|| anyhow!("No saved timetable, run `vkutk fetch` or `vkutk import` first")),
  }
}

fn normalize(args: &Args, saved: &SavedTimetable) -> Timetable {
  let day_policy = if args.strict_days {
    DayPolicy::Strict
  } else {
    DayPolicy::Lenient
  };

  info!(
    "Rendering timetable {} saved at {}",
    saved.id, saved.timestamp
  );

  Normalizer::new(args.palette.palette())
    .with_day_policy(day_policy)
    .normalize_data(&saved.data)
}

/// Maps any known day spelling to the one the backend expects.
fn request_day(label: &str) -> anyhow::Result<String> {
  days::weekday(label)
    .map(|weekday| days::label(weekday).to_string())
    .ok_or_else(|| anyhow!("Unknown day {:?}", label))
}

/// Accepts either the bare timetable or the whole command response.
fn read_command_result(file: &Path) -> anyhow::Result<TimetableData> {
  let text = if file.as_os_str() == "-" {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    text
  } else {
    fs::read_to_string(file).with_context(|| format!("Unable to read {}", file.display()))?
  };

  parse_command_result(&text)
}

fn parse_command_result(text: &str) -> anyhow::Result<TimetableData> {
  let value = match serde_json::from_str(text)? {
    Value::Object(mut response) if response.contains_key("webhook_response") => response
      .remove("webhook_response")
      .unwrap_or_default(),
    value => value,
  };

  serde_json::from_value(value).context("Input is not a timetable command result")
}
