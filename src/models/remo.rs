//! Records returned by the Nature Remo cloud and local APIs.
//!
//! Notes
//! - Every record is a read-only value decoded from a response body.
//! - Unknown JSON fields are ignored; missing required fields are an error.
//! - Date/time fields use `chrono` (`DateTime<Utc>`).
//! - Sensor codes and air-con mode names are open-ended, so they stay map keys.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::utils::to_canonical_json;

/// Load failure; the path names the offending field (e.g. `[0].newest_events.te.val`).
pub type DecodeError = serde_path_to_error::Error<serde_json::Error>;

/// Load/dump operations shared by every record.
pub trait NatureRemoModel: Serialize + DeserializeOwned {
    /// Decode a record from an untyped JSON value.
    fn load(value: &Value) -> Result<Self, DecodeError> {
        serde_path_to_error::deserialize(value)
    }

    /// Decode a JSON array of records.
    fn load_many(value: &Value) -> Result<Vec<Self>, DecodeError> {
        serde_path_to_error::deserialize(value)
    }

    fn from_json_str(s: &str) -> Result<Self, DecodeError> {
        let de = &mut serde_json::Deserializer::from_str(s);
        serde_path_to_error::deserialize(de)
    }

    /// Canonical JSON: sorted keys, ASCII only.
    fn dump(&self) -> Result<String, serde_json::Error> {
        to_canonical_json(self)
    }

    fn as_json_string(&self) -> Result<String, serde_json::Error> {
        self.dump()
    }
}

/// Render a list of records as `[a, b, ...]` using each record's canonical form.
pub fn dump_list<T: NatureRemoModel>(items: &[T]) -> Result<String, serde_json::Error> {
    let parts = items.iter().map(|i| i.dump()).collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", parts.join(", ")))
}

// =====================
// Account
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nickname: String,
}

// =====================
// Devices (the Remo hubs themselves)
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorValue {
    pub val: f64,
    pub created_at: DateTime<Utc>,
}

/// Fields shared by `Device` and the device summary embedded in an appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCore {
    pub id: String,
    pub name: String,
    pub temperature_offset: i64,
    pub humidity_offset: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub firmware_version: String,
    pub mac_address: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(flatten)]
    pub core: DeviceCore,
    /// Latest reading per sensor code (`te`, `hu`, `il`, `mo`, ...).
    pub newest_events: BTreeMap<String, SensorValue>,
}

// =====================
// Appliance models and air conditioner settings
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceModel {
    pub id: String,
    pub manufacturer: String,
    pub remote_name: String,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConParams {
    pub temp: String,
    pub mode: String,
    pub vol: String,
    pub dir: String,
    pub button: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConRangeMode {
    pub temp: Vec<String>,
    pub vol: Vec<String>,
    pub dir: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirConRange {
    /// Keyed by operation mode (`cool`, `warm`, `dry`, `blow`, `auto`, ...).
    pub modes: BTreeMap<String, AirConRangeMode>,
    pub fixed_buttons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirCon {
    pub range: AirConRange,
    pub temp_unit: String,
}

/// One candidate returned by appliance detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceModelAndParams {
    pub model: ApplianceModel,
    pub params: AirConParams,
}

// =====================
// Signals, TVs and lights
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    pub image: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TVState {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TV {
    pub state: TVState,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub brightness: String,
    pub power: String,
    pub last_button: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    pub state: LightState,
    pub buttons: Vec<Button>,
}

// =====================
// Appliance
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    pub nickname: String,
    pub image: String,
    /// `AC`, `TV`, `LIGHT` or `IR`.
    #[serde(rename = "type")]
    pub r#type: String,
    pub device: DeviceCore,
    pub model: Option<ApplianceModel>,
    pub settings: Option<AirConParams>,
    pub aircon: Option<AirCon>,
    pub signals: Vec<Signal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv: Option<TV>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<Light>,
}

// =====================
// Local API
// =====================

/// Raw infrared waveform as exchanged with the local API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IRSignal {
    /// Carrier frequency in kHz.
    pub freq: i64,
    /// Alternating on/off durations in microseconds.
    pub data: Vec<i64>,
    pub format: String,
}

impl NatureRemoModel for User {}
impl NatureRemoModel for SensorValue {}
impl NatureRemoModel for DeviceCore {}
impl NatureRemoModel for Device {}
impl NatureRemoModel for ApplianceModel {}
impl NatureRemoModel for AirConParams {}
impl NatureRemoModel for AirConRangeMode {}
impl NatureRemoModel for AirConRange {}
impl NatureRemoModel for AirCon {}
impl NatureRemoModel for ApplianceModelAndParams {}
impl NatureRemoModel for Signal {}
impl NatureRemoModel for Button {}
impl NatureRemoModel for TVState {}
impl NatureRemoModel for TV {}
impl NatureRemoModel for LightState {}
impl NatureRemoModel for Light {}
impl NatureRemoModel for Appliance {}
impl NatureRemoModel for IRSignal {}
