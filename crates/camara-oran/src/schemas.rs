// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RIC policy payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mapping::CellScope;

/// Policy type the RIC uses for QoD PRB prioritisation.
pub const POLICY_TYPE_QOD: &str = "qod_prb_prio";

/// Policy status reported once the RIC applies a policy.
pub const POLICY_ENFORCED: &str = "ENFORCED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyScope {
    #[serde(flatten)]
    pub cell: CellScope,
    pub flow_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub qos_prio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OranPolicy {
    pub policy_type: String,
    pub policy_scope: PolicyScope,
    pub policy_statement: PolicyStatement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotificationData {
    #[serde(default)]
    pub policy_status: Option<String>,
}

/// A policy status notification pushed by the RIC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OranNotification {
    #[serde(default)]
    pub info_type: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: NotificationData,
}

impl OranNotification {
    pub fn resource_id(&self) -> Option<&str> {
        self.subscription_id
            .as_deref()
            .or(self.session_id.as_deref())
            .or(self.id.as_deref())
    }

    pub fn is_enforced(&self) -> bool {
        self.data
            .policy_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(POLICY_ENFORCED))
    }
}

/// Reads the policy id from a RIC response: `policy_id`, `policyId`, `id`, then the `self` link.
pub fn policy_id(response: &Value) -> Option<String> {
    let field = |key: &str| match response.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    field("policy_id")
        .or_else(|| field("policyId"))
        .or_else(|| field("id"))
        .or_else(|| {
            let link = response.get("self")?.as_str()?;
            link.split('?')
                .next()?
                .split('/')
                .rev()
                .find(|s| !s.is_empty())
                .map(str::to_string)
        })
}
