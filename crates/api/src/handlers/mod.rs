pub mod admin;
pub mod checkout;
pub mod dapp;
pub mod flow;
pub mod image;
pub mod webhook;
