// src/notify/mod.rs
//! Outbound delivery of a composed digest.

pub mod email;
pub mod push;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use email::EmailDispatcher;
pub use push::PushDispatcher;

/// Delivery channel selected in the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Email,
    Push,
    Stdout,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Channel::Email => "email",
            Channel::Push => "push",
            Channel::Stdout => "stdout",
        };
        f.write_str(s)
    }
}

#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    /// Deliver one message. An error means the digest was not delivered.
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

pub type DynDispatcher = Arc<dyn Dispatcher>;

/// Prints the digest instead of sending it (dry runs).
pub struct StdoutDispatcher;

#[async_trait::async_trait]
impl Dispatcher for StdoutDispatcher {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        println!("Subject: {subject}\n\n{body}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}
