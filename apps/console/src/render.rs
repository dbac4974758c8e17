//! Plain-text tables for list pages.

use chrono::{DateTime, Utc};
use console_core::PageView;
use shared::domain::{ActivityLog, Bank, Member, TransactionLimit, WalletTopUp};

pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

fn timestamp(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "-".into(),
    }
}

impl Row for Bank {
    const HEADERS: &'static [&'static str] =
        &["ID", "BANK", "HOLDER", "ACCOUNT", "IFSC", "OWNER", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.bank_name.clone(),
            self.account_holder_name.clone(),
            self.account_number.clone(),
            self.ifsc_code.clone(),
            or_dash(self.owner_name.as_deref()),
            self.status.as_str().to_string(),
        ]
    }
}

impl Row for Member {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "EMAIL", "PHONE", "ROLE", "BALANCE", "KYC", "BLOCKED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.role.as_str().to_string(),
            amount(self.wallet_balance),
            self.kyc_status.as_str().to_string(),
            if self.is_blocked { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Row for ActivityLog {
    const HEADERS: &'static [&'static str] =
        &["WHEN", "ACTOR", "ACTION", "CATEGORY", "RISK", "IP", "DESCRIPTION"];

    fn cells(&self) -> Vec<String> {
        vec![
            timestamp(self.created_at.as_ref()),
            self.actor_name.clone(),
            self.action.clone(),
            self.category.clone(),
            self.risk.as_str().to_string(),
            or_dash(self.ip_address.as_deref()),
            self.description.clone(),
        ]
    }
}

impl Row for TransactionLimit {
    const HEADERS: &'static [&'static str] =
        &["ID", "SERVICE", "MEMBER", "MIN", "MAX", "DAILY", "STATUS"];

    fn cells(&self) -> Vec<String> {
        let member = self
            .member_name
            .as_deref()
            .or(self.member_id.as_ref().map(|id| id.as_str()));
        vec![
            self.id.to_string(),
            self.service.clone(),
            match member {
                Some(member) if !member.is_empty() => member.to_string(),
                _ => "all members".into(),
            },
            amount(self.min_amount),
            amount(self.max_amount),
            amount(self.daily_limit),
            self.status.as_str().to_string(),
        ]
    }
}

impl Row for WalletTopUp {
    const HEADERS: &'static [&'static str] =
        &["ID", "MEMBER", "AMOUNT", "STATUS", "REMARK", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            or_dash(self.member_name.as_deref().or(Some(self.member_id.as_str()))),
            amount(self.amount),
            self.status.as_str().to_string(),
            or_dash(self.remark.as_deref()),
            timestamp(self.created_at.as_ref()),
        ]
    }
}

/// Left-aligned columns separated by two spaces, trailing spaces trimmed.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    out.extend(rows.iter().map(|row| line(row.iter().map(String::as_str).collect())));
    out.join("\n")
}

pub fn render_page<T: Row>(view: &PageView<'_, T>) -> String {
    let body = if view.is_empty() {
        "no results".to_string()
    } else {
        let rows: Vec<Vec<String>> = view.items.iter().map(|item| item.cells()).collect();
        render_table(T::HEADERS, &rows)
    };

    format!(
        "{body}\n\npage {} of {} ({} records)",
        view.page, view.total_pages, view.total_count
    )
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
