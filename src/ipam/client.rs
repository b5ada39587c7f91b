//! phpIPAM REST API client.
//!
//! One value per run, created by the orchestrator. It logs in lazily and
//! logs in again when the token has expired.

use super::session::Token;
use super::Inventory;
use crate::config::IpamArgs;
use crate::error::{MigrateError, Result};
use crate::models::{Address, IpamId, Ipv4, Subnet, Vlan};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

/// Response wrapper every phpIPAM controller uses.
#[derive(Deserialize, Debug)]
pub struct Envelope<T> {
    pub code: u16,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Id of the created object on POST.
    #[serde(default, with = "crate::models::ipam_serde::opt_id")]
    pub id: Option<IpamId>,
}

pub struct IpamClient {
    http: reqwest::Client,
    /// `{endpoint}/{app_id}`
    base: String,
    user: String,
    password: String,
    token: Mutex<Option<Token>>,
    write_delay: Duration,
}

impl IpamClient {
    pub fn new(args: &IpamArgs, write_delay: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("phpipam-legacy-migrator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base: base_url(&args.endpoint, &args.app_id),
            user: args.user.clone(),
            password: args.password.clone().unwrap_or_default(),
            token: Mutex::new(None),
            write_delay,
        })
    }

    /// Log in and keep the new token.
    pub async fn login(&self) -> Result<()> {
        log::debug!("Logging in to {} as {}", self.base, self.user);
        let response = self
            .http
            .post(format!("{}/user/", self.base))
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let token = match decode_envelope::<Token>(status, &body) {
            Ok(Envelope { data: Some(t), .. }) => t,
            Ok(_) => return Err(MigrateError::Auth("login returned no token".into())),
            Err(MigrateError::Api { code, message }) => {
                return Err(MigrateError::Auth(format!("({code}) {message}")))
            }
            Err(e) => return Err(e),
        };
        log::info!("Logged in to phpIPAM, token expires {}", token.expires);
        *self.lock_token()? = Some(token);
        Ok(())
    }

    fn lock_token(&self) -> Result<std::sync::MutexGuard<'_, Option<Token>>> {
        self.token
            .lock()
            .map_err(|_| MigrateError::Auth("session lock poisoned".into()))
    }

    async fn token(&self) -> Result<String> {
        let current = self
            .lock_token()?
            .as_ref()
            .filter(|t| !t.is_expired())
            .map(|t| t.token.clone());
        if let Some(token) = current {
            return Ok(token);
        }
        self.login().await?;
        self.lock_token()?
            .as_ref()
            .map(|t| t.token.clone())
            .ok_or_else(|| MigrateError::Auth("no session token after login".into()))
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.token().await?;
        let url = format!("{}{}", self.base, path);
        log::trace!("{method} {url}");

        let mut request = self.http.request(method, &url).header("token", token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    /// GET that maps phpIPAM's own not-found reply to `None`. A bare 404
    /// (proxy, wrong route) stays an error.
    async fn find<T: DeserializeOwned>(&self, path: &str) -> Result<Option<Vec<T>>> {
        match self.get::<Vec<T>>(path).await {
            Ok(envelope) => Ok(envelope.data),
            Err(MigrateError::NotFound { message }) => {
                log::trace!("{path}: {message}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn create<B: Serialize>(&self, path: &str, body: &B) -> Result<Option<IpamId>> {
        let envelope = self
            .send::<B, serde_json::Value>(Method::POST, path, Some(body))
            .await?;
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }
        Ok(envelope.id)
    }

    async fn address_id(&self, ip: Ipv4Addr, subnet_id: Option<IpamId>) -> Result<Option<IpamId>> {
        let found = self
            .find::<Address>(&format!("/addresses/search/{ip}/"))
            .await?
            .unwrap_or_default();
        Ok(found
            .into_iter()
            .find(|a| subnet_id.is_none() || a.subnet_id == subnet_id)
            .and_then(|a| a.id))
    }
}

#[async_trait(?Send)]
impl Inventory for IpamClient {
    async fn create_vlan(&self, vlan: &Vlan) -> Result<IpamId> {
        if let Some(id) = self.create("/vlans/", vlan).await? {
            return Ok(id);
        }
        self.vlan_by_number(vlan.number)
            .await?
            .and_then(|v| v.id)
            .ok_or(MigrateError::VlanNotFound {
                number: vlan.number,
            })
    }

    async fn create_subnet(&self, subnet: &Subnet) -> Result<IpamId> {
        if let Some(id) = self.create("/subnets/", subnet).await? {
            return Ok(id);
        }
        let cidr = subnet.cidr();
        self.subnet_by_cidr(&cidr)
            .await?
            .and_then(|s| s.id)
            .ok_or(MigrateError::SubnetNotFound {
                cidr: cidr.to_string(),
            })
    }

    async fn create_address(&self, address: &Address) -> Result<IpamId> {
        if let Some(id) = self.create("/addresses/", address).await? {
            return Ok(id);
        }
        self.address_id(address.ip, address.subnet_id)
            .await?
            .ok_or_else(|| MigrateError::Api {
                code: 404,
                message: format!("created address {} not found", address.ip),
            })
    }

    async fn subnet_by_cidr(&self, cidr: &Ipv4) -> Result<Option<Subnet>> {
        let found = self.find::<Subnet>(&format!("/subnets/cidr/{cidr}/")).await?;
        Ok(found.and_then(|subnets| subnets.into_iter().next()))
    }

    async fn vlan_by_number(&self, number: u32) -> Result<Option<Vlan>> {
        let found = self.find::<Vlan>(&format!("/vlans/search/{number}/")).await?;
        Ok(found.and_then(|vlans| vlans.into_iter().find(|v| v.number == number)))
    }
}

fn base_url(endpoint: &str, app_id: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), app_id.trim_matches('/'))
}

/// Parse a response body. phpIPAM's own 404 envelope becomes `NotFound`,
/// any other unsuccessful reply becomes `Api`.
pub fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Envelope<T>> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    let envelope: Envelope<T> = match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(MigrateError::Decode {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            })
        }
        Err(_) => {
            // error pages are not always JSON
            return Err(MigrateError::Api {
                code: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
    };

    if envelope.code == 404 && !envelope.success {
        return Err(MigrateError::NotFound {
            message: envelope.message.unwrap_or_default(),
        });
    }
    if !envelope.success || envelope.code >= 400 || !status.is_success() {
        let code = if envelope.code >= 400 {
            envelope.code
        } else {
            status.as_u16()
        };
        return Err(MigrateError::Api {
            code,
            message: envelope.message.unwrap_or_default(),
        });
    }
    Ok(envelope)
}
