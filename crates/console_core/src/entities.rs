use shared::{
    domain::{ActivityLog, Bank, Member, TransactionLimit, WalletTopUp},
    protocol::Resource,
};

use crate::listing::Listable;

impl Listable for Bank {
    const RESOURCE: Resource = Resource::BANK;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.bank_name.as_str(),
            self.account_holder_name.as_str(),
            self.account_number.as_str(),
            self.ifsc_code.as_str(),
            self.owner_name.as_deref().unwrap_or_default(),
        ]
    }

    fn category(&self, key: &str) -> Option<&str> {
        match key {
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listable for Member {
    const RESOURCE: Resource = Resource::MEMBER;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }

    fn category(&self, key: &str) -> Option<&str> {
        match key {
            "role" => Some(self.role.as_str()),
            "kyc" => Some(self.kyc_status.as_str()),
            "blocked" => Some(if self.is_blocked { "blocked" } else { "active" }),
            _ => None,
        }
    }
}

impl Listable for ActivityLog {
    const RESOURCE: Resource = Resource::ACTIVITY_LOG;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.actor_name.as_str(),
            self.action.as_str(),
            self.description.as_str(),
            self.ip_address.as_deref().unwrap_or_default(),
        ]
    }

    fn category(&self, key: &str) -> Option<&str> {
        match key {
            "category" => Some(self.category.as_str()),
            "risk" => Some(self.risk.as_str()),
            _ => None,
        }
    }
}

impl Listable for TransactionLimit {
    const RESOURCE: Resource = Resource::LIMIT;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.service.as_str(), self.member_name.as_deref().unwrap_or_default()]
    }

    fn category(&self, key: &str) -> Option<&str> {
        match key {
            "service" => Some(self.service.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listable for WalletTopUp {
    const RESOURCE: Resource = Resource::TOPUP;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.member_id.as_str(),
            self.member_name.as_deref().unwrap_or_default(),
            self.remark.as_deref().unwrap_or_default(),
        ]
    }

    fn category(&self, key: &str) -> Option<&str> {
        match key {
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}
