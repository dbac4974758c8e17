use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Characters that would end or split a single path segment.
const ID_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A REST resource exposed by the admin backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource {
    /// Path segment, e.g. `bank` in `/bank/get/all`.
    pub segment: &'static str,
    /// Key the list endpoint may nest its items under (`data.banks`).
    pub collection_key: &'static str,
    /// Key the record endpoint may nest its record under (`data.bank`).
    pub record_key: &'static str,
}

impl Resource {
    pub const BANK: Resource = Resource {
        segment: "bank",
        collection_key: "banks",
        record_key: "bank",
    };
    pub const MEMBER: Resource = Resource {
        segment: "member",
        collection_key: "members",
        record_key: "member",
    };
    pub const ACTIVITY_LOG: Resource = Resource {
        segment: "activity-log",
        collection_key: "logs",
        record_key: "log",
    };
    pub const LIMIT: Resource = Resource {
        segment: "limit",
        collection_key: "limits",
        record_key: "limit",
    };
    pub const TOPUP: Resource = Resource {
        segment: "topup",
        collection_key: "topups",
        record_key: "topup",
    };

    pub fn list_path(&self) -> String {
        format!("/{}/get/all", self.segment)
    }

    pub fn record_path(&self, id: &str) -> String {
        format!("/{0}/get/{0}/{1}", self.segment, encode_id(id))
    }

    pub fn create_path(&self) -> String {
        format!("/{}/create", self.segment)
    }

    pub fn update_path(&self) -> String {
        format!("/{}/update", self.segment)
    }

    pub fn delete_path(&self, id: &str) -> String {
        format!("/{}/delete/{}", self.segment, encode_id(id))
    }

    pub fn flag_path(&self, flag: StatusFlag) -> String {
        format!("/{}/{}", self.segment, flag.endpoint())
    }
}

fn encode_id(id: &str) -> String {
    utf8_percent_encode(id, ID_SEGMENT).to_string()
}

/// Single-field status switches that bypass the edit diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    Blocked,
    Kyc,
    BankVerification,
}

impl StatusFlag {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Blocked => "block",
            Self::Kyc => "kyc",
            Self::BankVerification => "verify",
        }
    }

    /// Record field the flag writes to.
    pub fn field(self) -> &'static str {
        match self {
            Self::Blocked => "isBlocked",
            Self::Kyc => "kycStatus",
            Self::BankVerification => "status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagUpdate {
    pub id: String,
    pub new_value: Value,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
