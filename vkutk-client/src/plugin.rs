use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use vkutk_timetable::timetable::TimetableData;

const SEMESTERS: std::ops::RangeInclusive<u8> = 1..=9;

/// Client for the backend's plugin command endpoints.
pub struct PluginApi {
  client: Client,
  base: Url,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PreferTime {
  #[serde(rename = "Sáng")]
  Morning,
  #[serde(rename = "Chiều")]
  Afternoon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPreference {
  Prefer,
  Avoid,
}

#[derive(Clone, Debug, Serialize)]
pub struct TimetableRequest {
  pub auth_userid: String,
  pub semester: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prefer_time: Option<PreferTime>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub day_preferences: BTreeMap<String, DayPreference>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prefer_lecturer: Option<String>,
}

impl TimetableRequest {
  pub fn new(auth_userid: &str, semester: u8) -> anyhow::Result<Self> {
    if !SEMESTERS.contains(&semester) {
      bail!("Semester must be between 1 and 9, got {}", semester);
    }

    Ok(Self {
      auth_userid: auth_userid.to_string(),
      semester: semester.to_string(),
      prefer_time: None,
      day_preferences: BTreeMap::new(),
      prefer_lecturer: None,
    })
  }
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
  #[serde(default)]
  success: bool,
  message: Option<String>,
  webhook_response: Option<Value>,
  /// FastAPI puts errors here, as a string or a list of validation errors.
  detail: Option<Value>,
}

impl PluginApi {
  pub fn new(endpoint: &str) -> anyhow::Result<Self> {
    let mut base = Url::parse(endpoint)?;
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    Ok(Self {
      client: Client::new(),
      base,
    })
  }

  pub fn base(&self) -> &Url {
    &self.base
  }

  /// Runs the `/timetable` command and returns the generated timetable.
  pub async fn execute_timetable(&self, request: &TimetableRequest) -> anyhow::Result<TimetableData> {
    let url = self.base.join("api/plugins/timetable/execute")?;
    info!(
      "Requesting timetable for {}, semester {} from {}",
      request.auth_userid, request.semester, url
    );

    let response = self
      .client
      .post(url)
      .header(ACCEPT, HeaderValue::from_static("application/json"))
      .json(request)
      .send()
      .await?;

    let status = response.status();
    let body = response.text().await?;

    let data = decode_timetable(status, &body)?;
    info!(
      "Received {} scheduled and {} unscheduled sessions",
      data.scheduled_sessions.len(),
      data.unscheduled_sessions.len()
    );

    Ok(data)
  }
}

fn decode_timetable(status: StatusCode, body: &str) -> anyhow::Result<TimetableData> {
  let response = match serde_json::from_str::<CommandResponse>(body) {
    Ok(response) => response,
    Err(_) if !status.is_success() => bail!("HTTP {}: {}", status.as_u16(), body.trim()),
    Err(err) => return Err(anyhow!("Invalid command response: {}", err)),
  };

  if !status.is_success() {
    let detail = match (response.detail, response.message) {
      (Some(Value::String(detail)), _) => detail,
      (Some(detail), _) => detail.to_string(),
      (None, Some(message)) => message,
      (None, None) => format!("HTTP {} error", status.as_u16()),
    };
    bail!("{}", detail);
  }

  if !response.success {
    bail!(
      "{}",
      response.message.unwrap_or_else(|| "Unknown error".to_string())
    );
  }

  let webhook_response = response
    .webhook_response
    .ok_or_else(|| anyhow!("Command response carries no timetable"))?;

  serde_json::from_value(webhook_response).context("Webhook response is not a timetable")
}
