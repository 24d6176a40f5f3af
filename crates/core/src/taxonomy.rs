//! Catalog taxonomy enums shared by the store schema, input validation,
//! and presentation filtering.
//!
//! Each enum maps to a PostgreSQL enum type of the same snake_case name
//! (see the initial migration) and serializes as SCREAMING_SNAKE_CASE
//! strings on the wire, so a single definition covers every layer.

use serde::{Deserialize, Serialize};

/// Broad product segment of a dapp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "dapp_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DappKind {
    Defi,
    Nft,
    Social,
    Gaming,
    Tools,
    Other,
}

/// Functional category, settable on both dapps and individual images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Lending,
    Exchange,
    Marketplace,
    Wallet,
    Analytics,
    Governance,
    Launchpad,
    Bridge,
    Other,
}

/// The user journey a screenshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "ui_flow", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiFlow {
    Onboarding,
    Trading,
    Minting,
    Profile,
    Settings,
    Swap,
    Send,
    Receive,
    Other,
}

/// The dominant interface element captured in a screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "ui_element", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiElement {
    Table,
    Dialog,
    Card,
    Form,
    Chart,
    Modal,
    Navigation,
    Button,
    Input,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_screaming_snake() {
        let json = serde_json::to_string(&Category::Exchange).unwrap();
        assert_eq!(json, "\"EXCHANGE\"");
    }

    #[test]
    fn category_rejects_unknown_value() {
        let result: Result<Category, _> = serde_json::from_str("\"STAKING\"");
        assert!(result.is_err());
    }

    #[test]
    fn ui_flow_round_trips() {
        let flow: UiFlow = serde_json::from_str("\"ONBOARDING\"").unwrap();
        assert_eq!(flow, UiFlow::Onboarding);
    }
}
