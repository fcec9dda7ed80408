//! Layered client configuration.
//!
//! A [`Config`] is resolved from three tiers, each deep merged over the previous one:
//!
//! 1. the built-in defaults,
//! 2. a named group of a TOML [`ConfigFile`],
//! 3. explicit overrides, usually set through the [`ClientBuilder`](crate::ClientBuilder).
//!
//! The group is the one named explicitly, else the file's `active_config_group`, else
//! `default`.
//!
//! # Example
//!
//! ```toml
//! active_config_group = "default"
//!
//! [default.settings]
//! auth = true
//! debug = false
//! return_as = "json"
//! auto_reset_query = true
//!
//! [default.connection]
//! host = ["db1.example.com", "db2.example.com"]
//! port = [27017, 27018]
//! user_name = "app"
//! user_password = "secret"
//! db_name = "app"
//! db_options = { replicaSet = "rs0" }
//!
//! [default.driver]
//! tls_ca_file = "./certs/ca.pem"
//!
//! [local]
//! connection_string = "mongodb://localhost:27017/test"
//! ```
use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use toml::{Table, Value as TomlValue};

use crate::connection::ConnectionString;
use crate::error::{self, Result};

/// The group used when neither an explicit nor an active group is set.
pub const DEFAULT_GROUP: &str = "default";

/// The shape of query results.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReturnAs {
    /// BSON documents.
    Document,
    /// Relaxed extended JSON values.
    Json,
}

impl Default for ReturnAs {
    fn default() -> Self {
        ReturnAs::Document
    }
}

/// The behaviour of the client.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Whether to authenticate, requiring a user name, password and database.
    pub auth: bool,
    /// Whether errors are returned, rather than logged and ignored.
    pub debug: bool,
    /// The shape of query results.
    pub return_as: ReturnAs,
    /// Whether the query is reset after each terminal operation.
    pub auto_reset_query: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth: true,
            debug: true,
            return_as: ReturnAs::Document,
            auto_reset_query: true,
        }
    }
}

/// The discrete connection parameters.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// The hosts to connect to.
    pub host: Vec<String>,
    /// The port of each host, empty for the default port.
    pub port: Vec<String>,
    /// The user to authenticate as.
    pub user_name: String,
    /// The password of `user_name`.
    pub user_password: String,
    /// The database to use.
    pub db_name: String,
    /// Extra connection string options.
    pub db_options: IndexMap<String, String>,
}

/// Options passed through to the driver.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverConfig {
    /// The CA file used to verify the server's certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca_file: Option<String>,
    /// The certificate and key file used to identify the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_certificate_key_file: Option<String>,
    /// Accept invalid server certificates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_allow_invalid_certificates: Option<bool>,
    /// The application name reported to the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

impl DriverConfig {
    /// The connection string options these settings map to.
    pub fn uri_options(&self) -> Vec<(String, String)> {
        let mut options = Vec::new();
        if self.tls_ca_file.is_some() || self.tls_certificate_key_file.is_some() {
            options.push(("tls".to_owned(), "true".to_owned()));
        }
        if let Some(ref ca) = self.tls_ca_file {
            options.push(("tlsCAFile".to_owned(), ca.clone()));
        }
        if let Some(ref cert_key) = self.tls_certificate_key_file {
            options.push(("tlsCertificateKeyFile".to_owned(), cert_key.clone()));
        }
        if let Some(allow) = self.tls_allow_invalid_certificates {
            options.push(("tlsAllowInvalidCertificates".to_owned(), allow.to_string()));
        }
        if let Some(ref app_name) = self.app_name {
            options.push(("appName".to_owned(), app_name.clone()));
        }
        options
    }
}

/// A fully resolved configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// The client behaviour.
    pub settings: Settings,
    /// A connection string, which replaces `connection` when not empty.
    pub connection_string: String,
    /// The discrete connection parameters.
    pub connection: ConnectionConfig,
    /// Options passed through to the driver.
    pub driver: DriverConfig,
}

impl Config {
    /// Resolves a configuration from the defaults, a group of `file` and `overrides`.
    ///
    /// # Errors
    ///
    /// This method errors if the merged tables do not describe a valid `Config`.
    pub fn resolve(file: Option<&ConfigFile>, group: Option<&str>, overrides: Table) -> Result<Self> {
        let mut table = match TomlValue::try_from(Config::default()).map_err(error::config)? {
            TomlValue::Table(t) => t,
            _ => Table::new(),
        };

        if let Some(file) = file {
            let name = group
                .filter(|g| !g.is_empty())
                .or_else(|| file.active_group())
                .unwrap_or(DEFAULT_GROUP);
            match file.group(name) {
                Some(g) => {
                    debug!("using configuration group '{}'", name);
                    merge(&mut table, g.clone());
                }
                None => debug!("configuration group '{}' not found", name),
            }
        }

        merge(&mut table, overrides);
        normalize(&mut table);

        TomlValue::Table(table)
            .try_into()
            .map_err(|e| error::config(e).during("config"))
    }

    /// Validates the configuration and returns the connection parameters it describes.
    ///
    /// A non empty `connection_string` replaces the `connection` section. Values are trimmed.
    ///
    /// # Errors
    ///
    /// This method errors if no host is given or, when `auth` is enabled, if the user name,
    /// password or database is missing.
    pub fn prepare(&self) -> Result<ConnectionString> {
        let mut cs = if self.connection_string.trim().is_empty() {
            let c = &self.connection;
            let mut ports: Vec<String> = c.port.iter().map(|p| p.trim().to_owned()).collect();
            ports.resize(c.host.len(), String::new());
            ConnectionString {
                hosts: c.host.iter().map(|h| h.trim().to_owned()).collect(),
                ports,
                user_name: c.user_name.clone(),
                password: c.user_password.clone(),
                database: c.db_name.clone(),
                options: c.db_options.clone(),
            }
        } else {
            ConnectionString::parse(&self.connection_string)
        };
        cs.user_name = cs.user_name.trim().to_owned();
        cs.password = cs.password.trim().to_owned();
        cs.database = cs.database.trim().to_owned();

        if cs.hosts.iter().all(String::is_empty) {
            return Err(missing("connection host is a required parameter"));
        }
        if self.settings.auth {
            if cs.user_name.is_empty() {
                return Err(missing("user name is a required parameter"));
            }
            if cs.password.is_empty() {
                return Err(missing("user password is a required parameter"));
            }
            if cs.database.is_empty() {
                return Err(missing("database name is a required parameter"));
            }
        }
        Ok(cs)
    }
}

fn missing(reason: &'static str) -> error::Error {
    error::config(reason).during("prepare")
}

/// A TOML configuration file holding named groups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigFile {
    active_config_group: Option<String>,
    groups: Table,
}

impl ConfigFile {
    /// Loads a configuration file from `path`.
    ///
    /// # Errors
    ///
    /// This method errors if the file cannot be read or is not valid TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            error::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        content.parse()
    }

    /// The group named by `active_config_group`, if set and not empty.
    pub fn active_group(&self) -> Option<&str> {
        self.active_config_group
            .as_deref()
            .filter(|g| !g.trim().is_empty())
    }

    /// The raw table of the group `name`.
    pub fn group(&self, name: &str) -> Option<&Table> {
        self.groups.get(name).and_then(TomlValue::as_table)
    }
}

impl FromStr for ConfigFile {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut groups: Table = toml::from_str(s)
            .map_err(|e| error::config(format!("failed to parse config file: {}", e)))?;
        let active_config_group = match groups.remove("active_config_group") {
            Some(TomlValue::String(group)) => Some(group),
            Some(other) => {
                return Err(error::config(format!(
                    "active_config_group must be a string, found {}",
                    other.type_str()
                )))
            }
            None => None,
        };
        Ok(Self {
            active_config_group,
            groups,
        })
    }
}

/// Deep merges `incoming` into `base`, `incoming` winning on conflicts.
pub fn merge(base: &mut Table, incoming: Table) {
    for (key, value) in incoming {
        match (base.get_mut(&key), value) {
            (Some(TomlValue::Table(existing)), TomlValue::Table(table)) => merge(existing, table),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

// Single host/port values become one element lists, ports become strings.
fn normalize(table: &mut Table) {
    let connection = match table.get_mut("connection") {
        Some(TomlValue::Table(c)) => c,
        _ => return,
    };
    for key in &["host", "port"] {
        if let Some(value) = connection.get_mut(*key) {
            let list = match std::mem::replace(value, TomlValue::Array(vec![])) {
                TomlValue::Array(list) => list,
                single => vec![single],
            };
            *value = TomlValue::Array(list.into_iter().map(stringify).collect());
        }
    }
}

fn stringify(value: TomlValue) -> TomlValue {
    match value {
        TomlValue::Integer(n) => TomlValue::String(n.to_string()),
        other => other,
    }
}
