//! Blocking HTTP client for the Nature Remo cloud API.
//!
//! - Blocking client using `ureq` (no async), one network round-trip per call.
//! - Responses are decoded through the records in `crate::models::remo`.
//! - Covers every endpoint of the public `/1/` API.
//!
//! Rate limits
//! - The `X-Rate-Limit-*` and `Date` headers of every response (errors included)
//!   are recorded in a [`RateLimit`] snapshot. Nothing is enforced client-side.
//!
//! The snapshot sits in a `RefCell`, so a client is `!Sync`: use one client per
//! thread or wrap it yourself if calls must be shared.

use chrono::{DateTime, NaiveDateTime, Utc};
use http::{HeaderMap, Method, StatusCode};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;

use crate::error::NatureRemoError;
use crate::models::remo::*;

pub const BASE_URL: &str = "https://api.nature.global";
pub const USER_AGENT: &str = concat!("nature-remo/", env!("CARGO_PKG_VERSION"));

const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Quota counters from the most recent cloud API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    pub checked_at: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimit {
    /// Overwrite each field whose header is present and parses; others keep their value.
    fn update_from_headers(&mut self, headers: &HeaderMap) {
        if let Some(raw) = header_str(headers, "date") {
            match NaiveDateTime::parse_from_str(raw, DATE_FORMAT) {
                Ok(dt) => self.checked_at = Some(dt.and_utc()),
                Err(e) => warn!("ignoring unparsable Date header {:?}: {}", raw, e),
            }
        }
        if let Some(limit) = parse_count(headers, "x-rate-limit-limit") {
            self.limit = Some(limit);
        }
        if let Some(remaining) = parse_count(headers, "x-rate-limit-remaining") {
            self.remaining = Some(remaining);
        }
        if let Some(raw) = header_str(headers, "x-rate-limit-reset") {
            match raw.trim().parse::<i64>().ok().and_then(|s| DateTime::from_timestamp(s, 0)) {
                Some(reset) => self.reset = Some(reset),
                None => warn!("ignoring unparsable X-Rate-Limit-Reset header {:?}", raw),
            }
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_count(headers: &HeaderMap, name: &str) -> Option<u32> {
    let raw = header_str(headers, name)?;
    match raw.trim().parse::<u32>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("ignoring unparsable {} header {:?}: {}", name, raw, e);
            None
        }
    }
}

/// Fields for `update_aircon_settings`; unset or empty fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirConSettings {
    pub operation_mode: Option<String>,
    pub temperature: Option<String>,
    pub air_volume: Option<String>,
    pub air_direction: Option<String>,
    pub button: Option<String>,
}

impl AirConSettings {
    fn form(&self) -> Vec<(&'static str, String)> {
        [
            ("operation_mode", &self.operation_mode),
            ("temperature", &self.temperature),
            ("air_volume", &self.air_volume),
            ("air_direction", &self.air_direction),
            ("button", &self.button),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
        .collect()
    }
}

fn join_ids<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>().join(",")
}

pub struct NatureRemoAPI {
    agent: ureq::Agent,
    access_token: String,
    base_url: String,
    rate_limit: RefCell<RateLimit>,
}

impl NatureRemoAPI {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, BASE_URL)
    }

    /// Same as [`NatureRemoAPI::new`] but against another host (proxy, test server).
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder().http_status_as_error(false).build();
        NatureRemoAPI {
            agent: ureq::Agent::new_with_config(config),
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limit: RefCell::new(RateLimit::default()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Copy of the snapshot taken from the last response received.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit.borrow().clone()
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Perform one request and return the raw body of a 2xx response.
    fn request(&self, method: Method, endpoint: &str, form: &[(&str, String)]) -> Result<String, NatureRemoError> {
        let url = self.url(endpoint);
        let auth = format!("Bearer {}", self.access_token);
        let fields = form
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (*k, v.as_str()))
            .collect::<Vec<_>>();
        debug!(
            "{} {} form_keys={:?}",
            method,
            url,
            fields.iter().map(|(k, _)| *k).collect::<Vec<_>>()
        );

        let result = if method == Method::GET {
            self.agent
                .get(&url)
                .header("Accept", "application/json")
                .header("Authorization", auth.as_str())
                .header("User-Agent", USER_AGENT)
                .call()
        } else {
            let req = self
                .agent
                .post(&url)
                .header("Accept", "application/json")
                .header("Authorization", auth.as_str())
                .header("User-Agent", USER_AGENT);
            if fields.is_empty() {
                req.send_empty()
            } else {
                req.send_form(fields)
            }
        };
        let resp = result.map_err(NatureRemoError::from_transport)?;

        let status = resp.status();
        {
            let mut rate_limit = self.rate_limit.borrow_mut();
            rate_limit.update_from_headers(resp.headers());
            debug!("{} {} -> {} rate_limit={:?}", method, url, status, *rate_limit);
        }

        let body = resp
            .into_body()
            .read_to_string()
            .map_err(NatureRemoError::from_transport)?;
        check_status(status, &body)?;
        Ok(body)
    }

    fn get_json(&self, endpoint: &str) -> Result<Value, NatureRemoError> {
        let body = self.request(Method::GET, endpoint, &[])?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_json(&self, endpoint: &str, form: &[(&str, String)]) -> Result<Value, NatureRemoError> {
        let body = self.request(Method::POST, endpoint, form)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post(&self, endpoint: &str, form: &[(&str, String)]) -> Result<(), NatureRemoError> {
        self.request(Method::POST, endpoint, form).map(|_| ())
    }

    /// Fetch the authenticated user's information.
    pub fn get_user(&self) -> Result<User, NatureRemoError> {
        Ok(User::load(&self.get_json("/1/users/me")?)?)
    }

    pub fn update_user(&self, nickname: &str) -> Result<User, NatureRemoError> {
        let json = self.post_json("/1/users/me", &[("nickname", nickname.to_string())])?;
        Ok(User::load(&json)?)
    }

    /// Fetch the list of Remo devices the user has access to.
    pub fn get_devices(&self) -> Result<Vec<Device>, NatureRemoError> {
        Ok(Device::load_many(&self.get_json("/1/devices")?)?)
    }

    pub fn update_device(&self, device: &str, name: &str) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/devices/{}", device), &[("name", name.to_string())])
    }

    pub fn delete_device(&self, device: &str) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/devices/{}/delete", device), &[])
    }

    /// Set the offset added to the measured temperature.
    pub fn update_temperature_offset(&self, device: &str, offset: i32) -> Result<(), NatureRemoError> {
        self.post(
            &format!("/1/devices/{}/temperature_offset", device),
            &[("offset", offset.to_string())],
        )
    }

    /// Set the offset added to the measured humidity.
    pub fn update_humidity_offset(&self, device: &str, offset: i32) -> Result<(), NatureRemoError> {
        self.post(
            &format!("/1/devices/{}/humidity_offset", device),
            &[("offset", offset.to_string())],
        )
    }

    /// Find the air conditioners best matching an IR signal.
    ///
    /// `message` is the JSON serialized signal (`data`, `freq`, `format`).
    pub fn detect_appliance(&self, message: &str) -> Result<Vec<ApplianceModelAndParams>, NatureRemoError> {
        let json = self.post_json("/1/detectappliance", &[("message", message.to_string())])?;
        Ok(ApplianceModelAndParams::load_many(&json)?)
    }

    pub fn get_appliances(&self) -> Result<Vec<Appliance>, NatureRemoError> {
        Ok(Appliance::load_many(&self.get_json("/1/appliances")?)?)
    }

    /// Register an appliance under `device`.
    ///
    /// `model` is the IRDB model id when the appliance is a known one.
    pub fn create_appliance(
        &self,
        device: &str,
        nickname: &str,
        image: &str,
        model: Option<&str>,
        model_type: Option<&str>,
    ) -> Result<Appliance, NatureRemoError> {
        let mut form = vec![
            ("device", device.to_string()),
            ("nickname", nickname.to_string()),
            ("image", image.to_string()),
        ];
        if let Some(m) = model {
            form.push(("model", m.to_string()));
        }
        if let Some(t) = model_type {
            form.push(("model_type", t.to_string()));
        }
        Ok(Appliance::load(&self.post_json("/1/appliances", &form)?)?)
    }

    /// Reorder appliances; `appliances` must list every appliance id.
    pub fn update_appliance_orders<I, S>(&self, appliances: I) -> Result<(), NatureRemoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.post("/1/appliance_orders", &[("appliances", join_ids(appliances))])
    }

    pub fn delete_appliance(&self, appliance: &str) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/appliances/{}/delete", appliance), &[])
    }

    pub fn update_appliance(&self, appliance: &str, nickname: &str, image: &str) -> Result<Appliance, NatureRemoError> {
        let json = self.post_json(
            &format!("/1/appliances/{}", appliance),
            &[("nickname", nickname.to_string()), ("image", image.to_string())],
        )?;
        Ok(Appliance::load(&json)?)
    }

    pub fn update_aircon_settings(&self, appliance: &str, settings: &AirConSettings) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/appliances/{}/aircon_settings", appliance), &settings.form())
    }

    pub fn send_tv_infrared_signal(&self, appliance: &str, button: &str) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/appliances/{}/tv", appliance), &[("button", button.to_string())])
    }

    pub fn send_light_infrared_signal(&self, appliance: &str, button: &str) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/appliances/{}/light", appliance), &[("button", button.to_string())])
    }

    pub fn get_signals(&self, appliance: &str) -> Result<Vec<Signal>, NatureRemoError> {
        Ok(Signal::load_many(&self.get_json(&format!("/1/appliances/{}/signals", appliance))?)?)
    }

    pub fn create_signal(&self, appliance: &str, name: &str, message: &str, image: &str) -> Result<Signal, NatureRemoError> {
        let json = self.post_json(
            &format!("/1/appliances/{}/signals", appliance),
            &[
                ("name", name.to_string()),
                ("message", message.to_string()),
                ("image", image.to_string()),
            ],
        )?;
        Ok(Signal::load(&json)?)
    }

    /// Reorder the signals of `appliance`; `signals` must list every signal id.
    pub fn update_signal_orders<I, S>(&self, appliance: &str, signals: I) -> Result<(), NatureRemoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.post(
            &format!("/1/appliances/{}/signal_orders", appliance),
            &[("signals", join_ids(signals))],
        )
    }

    pub fn update_signal(&self, signal: &str, name: &str, image: &str) -> Result<(), NatureRemoError> {
        self.post(
            &format!("/1/signals/{}", signal),
            &[("name", name.to_string()), ("image", image.to_string())],
        )
    }

    pub fn delete_signal(&self, signal: &str) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/signals/{}/delete", signal), &[])
    }

    pub fn send_signal(&self, signal: &str) -> Result<(), NatureRemoError> {
        self.post(&format!("/1/signals/{}/send", signal), &[])
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), NatureRemoError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(NatureRemoError::from_response(status, body))
    }
}
