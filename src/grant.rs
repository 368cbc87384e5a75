use accesstoken_jwt::{ClaimMap, ClaimValue};

/// A service grant attached to an [`AccessToken`](crate::AccessToken).
///
/// Each grant is written under `grants.<key>` in the token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Access to IP Messaging, keyed `ip_messaging`
    IpMessaging(IpMessagingGrant),
    /// Access to Programmable Video, keyed `rtc`
    Conversations(ConversationsGrant),
}

impl Grant {
    /// The key this grant is stored under in the `grants` claim.
    pub fn key(&self) -> &'static str {
        match self {
            Grant::IpMessaging(_) => IpMessagingGrant::KEY,
            Grant::Conversations(_) => ConversationsGrant::KEY,
        }
    }

    /// The grant payload, containing only the fields that are set.
    pub fn to_payload(&self) -> ClaimMap {
        match self {
            Grant::IpMessaging(grant) => grant.to_payload(),
            Grant::Conversations(grant) => grant.to_payload(),
        }
    }
}

impl From<IpMessagingGrant> for Grant {
    fn from(grant: IpMessagingGrant) -> Self {
        Grant::IpMessaging(grant)
    }
}

impl From<ConversationsGrant> for Grant {
    fn from(grant: ConversationsGrant) -> Self {
        Grant::Conversations(grant)
    }
}

fn insert_non_empty(payload: &mut ClaimMap, key: &str, value: &str) {
    if !value.is_empty() {
        payload.insert(key.to_string(), ClaimValue::from(value));
    }
}

/// Grant to access IP Messaging.
///
/// Empty fields are left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpMessagingGrant {
    pub service_sid: String,
    pub endpoint_id: String,
    pub deployment_role_sid: String,
    pub push_credential_sid: String,
}

impl IpMessagingGrant {
    pub const KEY: &'static str = "ip_messaging";

    pub fn new(
        service_sid: impl Into<String>,
        endpoint_id: impl Into<String>,
        deployment_role_sid: impl Into<String>,
        push_credential_sid: impl Into<String>,
    ) -> Self {
        Self {
            service_sid: service_sid.into(),
            endpoint_id: endpoint_id.into(),
            deployment_role_sid: deployment_role_sid.into(),
            push_credential_sid: push_credential_sid.into(),
        }
    }

    /// A grant for `service_sid` with every other field unset.
    pub fn for_service(service_sid: impl Into<String>) -> Self {
        Self {
            service_sid: service_sid.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint_id(mut self, endpoint_id: impl Into<String>) -> Self {
        self.endpoint_id = endpoint_id.into();
        self
    }

    pub fn with_deployment_role_sid(mut self, deployment_role_sid: impl Into<String>) -> Self {
        self.deployment_role_sid = deployment_role_sid.into();
        self
    }

    pub fn with_push_credential_sid(mut self, push_credential_sid: impl Into<String>) -> Self {
        self.push_credential_sid = push_credential_sid.into();
        self
    }

    pub fn to_payload(&self) -> ClaimMap {
        let mut payload = ClaimMap::new();
        insert_non_empty(&mut payload, "service_sid", &self.service_sid);
        insert_non_empty(&mut payload, "endpoint_id", &self.endpoint_id);
        insert_non_empty(
            &mut payload,
            "deployment_role_sid",
            &self.deployment_role_sid,
        );
        insert_non_empty(
            &mut payload,
            "push_credential_sid",
            &self.push_credential_sid,
        );
        payload
    }
}

/// Grant for Programmable Video access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationsGrant {
    pub configuration_profile_sid: String,
}

impl ConversationsGrant {
    pub const KEY: &'static str = "rtc";

    pub fn new(configuration_profile_sid: impl Into<String>) -> Self {
        Self {
            configuration_profile_sid: configuration_profile_sid.into(),
        }
    }

    pub fn to_payload(&self) -> ClaimMap {
        let mut payload = ClaimMap::new();
        insert_non_empty(
            &mut payload,
            "configuration_profile_sid",
            &self.configuration_profile_sid,
        );
        payload
    }
}
