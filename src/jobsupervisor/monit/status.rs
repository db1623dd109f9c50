// src/jobsupervisor/monit/status.rs

//! Monit daemon status as read from its `_status2` XML document.
//!
//! Only the fields the supervisor needs are extracted:
//!
//! ```xml
//! <monit id="4b7b8c1b3b2a" incarnation="1500000000" version="5.2.5">
//!   <server><uptime>42</uptime></server>
//!   <services>
//!     <service name="nats">
//!       <type>3</type>
//!       <status>0</status><monitor>1</monitor><pendingaction>0</pendingaction>
//!     </service>
//!   </services>
//!   <servicegroups>
//!     <servicegroup name="vcap"><service>nats</service></servicegroup>
//!   </servicegroups>
//! </monit>
//! ```
//!
//! Older daemons report the incarnation as `<server><incarnation>` instead of
//! a root attribute; both are accepted.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::jobsupervisor::monit::MonitError;

static ROOT_INCARNATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<monit\b[^>]*\bincarnation="(\d+)""#).unwrap());
static INCARNATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<incarnation>\s*(\d+)\s*</incarnation>").unwrap());
static SERVICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<service\s+name="([^"]+)"\s*>(.*?)</service>"#).unwrap());
static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<servicegroup\s+name="([^"]+)"\s*>(.*?)</servicegroup>"#).unwrap()
});
static GROUP_MEMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<service>\s*([^<]+?)\s*</service>").unwrap());
static NUMERIC_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-z]+)>\s*(\d+)\s*</[a-z]+>").unwrap());

/// Monit `monitor` field: not monitored.
const MONITOR_NOT: u32 = 0;
/// Monit `monitor` field: monitoring is being initialised.
const MONITOR_INIT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitService {
    pub name: String,
    /// Error bitmask; zero when healthy.
    pub status: u32,
    pub monitor: u32,
    pub pending_action: u32,
}

impl MonitService {
    pub fn is_pending(&self) -> bool {
        self.monitor == MONITOR_INIT || self.pending_action != 0
    }

    pub fn is_failing(&self) -> bool {
        self.monitor == MONITOR_NOT || self.status != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitStatus {
    /// Changes every time the daemon (re)loads its configuration.
    pub incarnation: u64,
    pub services: Vec<MonitService>,
    /// Group name → member service names.
    pub groups: BTreeMap<String, Vec<String>>,
}

impl MonitStatus {
    pub fn services_in_group(&self, group: &str) -> Vec<&MonitService> {
        let Some(members) = self.groups.get(group) else {
            return Vec::new();
        };
        self.services
            .iter()
            .filter(|service| members.contains(&service.name))
            .collect()
    }

    pub fn service_names_in_group(&self, group: &str) -> Vec<String> {
        self.services_in_group(group)
            .into_iter()
            .map(|service| service.name.clone())
            .collect()
    }
}

/// First numeric `<tag>n</tag>` of a service block; nested elements such as
/// `<program><status>` come after the service's own fields.
fn field(block: &str, tag: &str) -> u32 {
    NUMERIC_FIELD_RE
        .captures_iter(block)
        .find(|caps| &caps[1] == tag)
        .and_then(|caps| caps[2].parse().ok())
        .unwrap_or(0)
}

/// Parse the XML status document.
pub fn parse_status(xml: &str) -> Result<MonitStatus, MonitError> {
    let incarnation = [&*ROOT_INCARNATION_RE, &*INCARNATION_RE]
        .into_iter()
        .find_map(|re| re.captures(xml))
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| MonitError::Parse("status has no incarnation".to_string()))?;

    let services = SERVICE_RE
        .captures_iter(xml)
        .map(|caps| {
            let block = &caps[2];
            MonitService {
                name: caps[1].to_string(),
                status: field(block, "status"),
                monitor: field(block, "monitor"),
                pending_action: field(block, "pendingaction"),
            }
        })
        .collect();

    let groups = GROUP_RE
        .captures_iter(xml)
        .map(|caps| {
            let members = GROUP_MEMBER_RE
                .captures_iter(&caps[2])
                .map(|m| m[1].to_string())
                .collect();
            (caps[1].to_string(), members)
        })
        .collect();

    Ok(MonitStatus {
        incarnation,
        services,
        groups,
    })
}
