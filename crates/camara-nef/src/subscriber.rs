// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscriber lookups against a simulated core's UE identity service.
//!
//! The identity service resolves an IP address or MSISDN to a SUPI and
//! serves subscriber profiles. When a separate profile service is configured
//! it is asked first for a known SUPI. This module builds the lookup URLs and
//! maps profiles onto the CAMARA device status and number verification
//! answers; [`crate::NefClient`] does the I/O.

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use sha2::{Digest, Sha256};

use camara_core::types::{
    ConnectivityStatus, NumberVerificationRequest, Plmn, ReachabilityStatus, RoamingStatus,
    UeProfile,
};

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// Mobile country code to ISO 3166-1 alpha-2 code and country name.
const MCC_COUNTRIES: &[(&str, &str, &str)] = &[
    ("001", "XX", "Test Network"),
    ("208", "FR", "France"),
    ("310", "US", "United States"),
    ("311", "US", "United States"),
    ("234", "GB", "United Kingdom"),
    ("262", "DE", "Germany"),
    ("222", "IT", "Italy"),
    ("214", "ES", "Spain"),
    ("505", "AU", "Australia"),
    ("440", "JP", "Japan"),
    ("450", "KR", "South Korea"),
    ("460", "CN", "China"),
];

/// URLs of the UE identity and profile services plus the home network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeIdentityEndpoints {
    identity_base: String,
    profile_base: Option<String>,
    home: Plmn,
}

impl UeIdentityEndpoints {
    pub fn new(identity_base: &str, home: Plmn) -> Self {
        Self {
            identity_base: identity_base.trim_end_matches('/').to_string(),
            profile_base: None,
            home,
        }
    }

    pub fn with_profile_base(mut self, base: &str) -> Self {
        self.profile_base = Some(base.trim_end_matches('/').to_string());
        self
    }

    pub fn home(&self) -> &Plmn {
        &self.home
    }

    pub fn msisdn_by_ip(&self, ip: &str) -> String {
        format!("{}/msisdn?ip={}", self.identity_base, encode(ip))
    }

    pub fn supi_by_ip(&self, ip: &str) -> String {
        format!("{}/ue-identity/v1/supi?ip={}", self.identity_base, encode(ip))
    }

    pub fn supi_by_msisdn(&self, msisdn: &str) -> String {
        format!("{}/ue-identity/v1/supi?msisdn={}", self.identity_base, encode(msisdn))
    }

    pub fn profile_by_ip(&self, ip: &str) -> String {
        format!("{}/ue-identity/v1/profile?ip={}", self.identity_base, encode(ip))
    }

    pub fn profile_by_supi(&self, supi: &str) -> String {
        format!("{}/ue-identity/v1/profile?supi={}", self.identity_base, encode(supi))
    }

    /// Profile service record for `supi`, when a profile service is configured.
    pub fn stored_profile(&self, supi: &str) -> Option<String> {
        self.profile_base
            .as_ref()
            .map(|base| format!("{base}/ue-profile/v1/profiles/{}", encode(supi)))
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// The SUPI in an identity service answer, under either key spelling.
pub fn supi_of(body: &Value) -> Option<&str> {
    body.get("Supi")
        .or_else(|| body.get("supi"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// ISO code and name of the country behind a mobile country code.
pub fn country_of(mcc: &str) -> (&'static str, &'static str) {
    MCC_COUNTRIES
        .iter()
        .find(|(code, _, _)| *code == mcc)
        .map_or(("XX", "Unknown"), |(_, iso, name)| (*iso, *name))
}

/// Reachability of a UE. `None` is a UE no service knows about.
pub fn reachability(profile: Option<&UeProfile>, now: DateTime<Utc>) -> ReachabilityStatus {
    ReachabilityStatus {
        reachability_status: profile
            .map_or(ConnectivityStatus::NotConnected, UeProfile::connectivity),
        last_status_time: now,
    }
}

/// Roaming state of a UE relative to `home`.
pub fn roaming(profile: Option<&UeProfile>, home: &Plmn) -> RoamingStatus {
    let Some(serving) = profile
        .and_then(|p| p.plmn.as_ref())
        .filter(|p| !p.mcc.is_empty())
    else {
        return RoamingStatus::default();
    };
    let (code, name) = country_of(&serving.mcc);
    RoamingStatus {
        roaming: serving.mcc != home.mcc || serving.mnc != home.mnc,
        country_code: Some(code.to_string()),
        country_name: Some(vec![name.to_string()]),
    }
}

/// Whether the claim in `request` names `msisdn`.
///
/// Hashed claims compare hex digests without regard to case.
pub fn number_matches(msisdn: &str, request: &NumberVerificationRequest) -> bool {
    let msisdn = msisdn.trim();
    if let Some(phone) = request.phone_number.as_deref().filter(|p| !p.is_empty()) {
        return msisdn == phone.trim();
    }
    match request.hashed_phone_number.as_deref() {
        Some(digest) if !digest.is_empty() => {
            hex::encode(Sha256::digest(msisdn.as_bytes())).eq_ignore_ascii_case(digest.trim())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DIGEST: &str = "42d573cfc315801d4cd8eddd5416b416a0bf298b9b9e12d6b07442c91db42bd8";

    fn endpoints() -> UeIdentityEndpoints {
        UeIdentityEndpoints::new("http://coresim:8103/", Plmn::new("001", "06"))
    }

    fn serving(mcc: &str, mnc: &str) -> UeProfile {
        UeProfile {
            plmn: Some(Plmn::new(mcc, mnc)),
            ..UeProfile::default()
        }
    }

    #[test]
    fn lookup_urls_escape_query_values() {
        let endpoints = endpoints();
        assert_eq!(
            endpoints.msisdn_by_ip("12.1.0.2"),
            "http://coresim:8103/msisdn?ip=12.1.0.2"
        );
        assert_eq!(
            endpoints.supi_by_msisdn("+33612345678"),
            "http://coresim:8103/ue-identity/v1/supi?msisdn=%2B33612345678"
        );
        assert_eq!(
            endpoints.profile_by_ip("2001:db8::1"),
            "http://coresim:8103/ue-identity/v1/profile?ip=2001%3Adb8%3A%3A1"
        );
        assert!(endpoints.stored_profile("001010000000001").is_none());
        assert_eq!(
            endpoints
                .with_profile_base("http://ue-profile:8080/")
                .stored_profile("001010000000001")
                .as_deref(),
            Some("http://ue-profile:8080/ue-profile/v1/profiles/001010000000001")
        );
    }

    #[test]
    fn supi_is_read_under_either_key() {
        assert_eq!(supi_of(&json!({"Supi": "001"})), Some("001"));
        assert_eq!(supi_of(&json!({"supi": "002"})), Some("002"));
        assert_eq!(supi_of(&json!({"Supi": ""})), None);
        assert_eq!(supi_of(&json!({})), None);
    }

    #[test]
    fn home_network_is_not_roaming() {
        let status = roaming(Some(&serving("001", "06")), endpoints().home());
        assert!(!status.roaming);
        assert_eq!(status.country_code.as_deref(), Some("XX"));
        assert_eq!(status.country_name, Some(vec!["Test Network".to_string()]));
    }

    #[test]
    fn foreign_or_other_operator_is_roaming() {
        let home = Plmn::new("001", "06");
        let abroad = roaming(Some(&serving("208", "93")), &home);
        assert!(abroad.roaming);
        assert_eq!(abroad.country_code.as_deref(), Some("FR"));

        let other_operator = roaming(Some(&serving("001", "01")), &home);
        assert!(other_operator.roaming);

        let unknown = roaming(Some(&serving("999", "01")), &home);
        assert_eq!(unknown.country_code.as_deref(), Some("XX"));
        assert_eq!(unknown.country_name, Some(vec!["Unknown".to_string()]));
    }

    #[test]
    fn missing_plmn_or_profile_is_not_roaming() {
        let home = Plmn::new("001", "06");
        assert_eq!(roaming(None, &home), RoamingStatus::default());
        assert_eq!(roaming(Some(&UeProfile::default()), &home), RoamingStatus::default());
        assert_eq!(roaming(Some(&serving("", "06")), &home), RoamingStatus::default());
    }

    #[test]
    fn unknown_ue_is_not_connected() {
        let now = Utc::now();
        let status = reachability(None, now);
        assert_eq!(status.reachability_status, ConnectivityStatus::NotConnected);
        assert_eq!(status.last_status_time, now);
    }

    #[test]
    fn plain_and_hashed_numbers_match() {
        let msisdn = "+33612345678";
        assert!(number_matches(msisdn, &NumberVerificationRequest::plain(" +33612345678")));
        assert!(!number_matches(msisdn, &NumberVerificationRequest::plain("+33612345679")));
        assert!(number_matches(msisdn, &NumberVerificationRequest::hashed(DIGEST)));
        assert!(number_matches(
            msisdn,
            &NumberVerificationRequest::hashed(DIGEST.to_uppercase())
        ));
        assert!(!number_matches("+33612345679", &NumberVerificationRequest::hashed(DIGEST)));
        assert!(!number_matches(msisdn, &NumberVerificationRequest::default()));
    }
}
