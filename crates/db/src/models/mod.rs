pub mod dapp;
pub mod flow;
pub mod image;
pub mod user;
