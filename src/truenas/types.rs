//! TrueNAS REST API Type Definitions
//!
//! Request and response bodies for the `/api/v2.0` endpoints used by tnmanage.
//!
//! # Design Notes
//!
//! - **Property objects**: ZFS properties such as `used` or `compression` come back
//!   as objects (`{"parsed": .., "rawvalue": .., "value": .., "source": ..}`) whose
//!   shapes differ per property. [`PropertyValue`] keeps `parsed` and `value` as raw
//!   JSON and exposes typed accessors for the handful of cases we display.
//! - **Optional Fields**: `#[serde(default)]` is used so that partial responses
//!   (e.g. from `select` queries or older releases) still decode.
//!
//! # API Endpoints Covered
//!
//! - `/pool/dataset` → [`Dataset`], [`CreateDatasetRequest`]
//! - `/pool/dataset/id/{id}` → [`Dataset`], [`DeleteDatasetOptions`]
//! - `/sharing/nfs` → [`NfsShare`]

use serde::{Deserialize, Serialize};

/// Dataset type used for everything `tnmanage add` creates
pub const FILESYSTEM: &str = "FILESYSTEM";

/// One ZFS property as reported by the middleware
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub parsed: serde_json::Value,
    #[serde(default)]
    pub rawvalue: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub source: Option<String>,
}

impl PropertyValue {
    /// `parsed` as a byte count, if the server sent a number
    pub fn parsed_bytes(&self) -> Option<u64> {
        match &self.parsed {
            serde_json::Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            }),
            _ => None,
        }
    }

    /// Human-readable `value`, if the server sent a string
    pub fn display_value(&self) -> Option<&str> {
        self.value.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Full path, `pool/name[/child...]`
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pool: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mountpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication: Option<PropertyValue>,
}

impl Dataset {
    /// True for the pool's root dataset and everything below it
    pub fn belongs_to_pool(&self, pool: &str) -> bool {
        if self.pool == pool || self.id == pool {
            return true;
        }
        !pool.is_empty()
            && self
                .id
                .strip_prefix(pool)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Body of `POST /pool/dataset`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDatasetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Referenced-data quota in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refquota: Option<u64>,
}

/// Body of `DELETE /pool/dataset/id/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeleteDatasetOptions {
    pub recursive: bool,
    pub force: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfsShare {
    /// Assigned by the server; omitted when creating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub path: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maproot_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maproot_group: Option<String>,
    #[serde(rename = "ro", default)]
    pub read_only: bool,
    #[serde(default)]
    pub enabled: bool,
}
