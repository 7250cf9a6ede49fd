//! Client for the local HTTP API served by a Remo on the LAN.
//!
//! No authentication; the device only exposes `/messages`.

use http::StatusCode;
use log::debug;

use crate::client::USER_AGENT;
use crate::error::NatureRemoError;
use crate::models::remo::{IRSignal, NatureRemoModel};

pub struct NatureRemoLocalAPI {
    agent: ureq::Agent,
    addr: String,
}

impl NatureRemoLocalAPI {
    /// `addr` is the device's host, optionally with a port (`192.168.1.23`).
    pub fn new(addr: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder().http_status_as_error(false).build();
        NatureRemoLocalAPI {
            agent: ureq::Agent::new_with_config(config),
            addr: addr.into(),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{}", self.addr, endpoint)
    }

    /// Fetch the newest IR signal the device received.
    pub fn get_ir_signal(&self) -> Result<IRSignal, NatureRemoError> {
        let url = self.url("/messages");
        debug!("GET {}", url);
        let resp = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Requested-With", USER_AGENT)
            .call()
            .map_err(NatureRemoError::from_transport)?;
        let status = resp.status();
        debug!("GET {} -> {}", url, status);
        check_status(status)?;

        let body = resp
            .into_body()
            .read_to_string()
            .map_err(NatureRemoError::from_transport)?;
        Ok(IRSignal::from_json_str(&body)?)
    }

    /// Emit the IR signal described by `message`, a JSON serialized `IRSignal`.
    ///
    /// The string is posted verbatim as the request body.
    pub fn send_ir_signal(&self, message: &str) -> Result<(), NatureRemoError> {
        let url = self.url("/messages");
        debug!("POST {} ({} bytes)", url, message.len());
        let resp = self
            .agent
            .post(&url)
            .header("Accept", "application/json")
            .header("X-Requested-With", USER_AGENT)
            .send(message)
            .map_err(NatureRemoError::from_transport)?;
        let status = resp.status();
        debug!("POST {} -> {}", url, status);
        check_status(status)
    }
}

fn check_status(status: StatusCode) -> Result<(), NatureRemoError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(NatureRemoError::from_status(status))
    }
}
