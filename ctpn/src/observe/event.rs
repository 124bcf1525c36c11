use serde::Serialize;

use crate::net::Token;

/// Owned form of an observer notification, e.g. for forwarding to telemetry consumers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NetEvent<C, B> {
    #[serde(rename_all = "camelCase")]
    TransitionFired {
        transition_id: String,
        binding: B,
        time: i64,
        consumed: Vec<Token<C>>,
        produced: Vec<Token<C>>,
    },
    TimeAdvanced { time: i64 },
}

impl<C, B> NetEvent<C, B> {
    pub fn time(&self) -> i64 {
        match self {
            NetEvent::TransitionFired { time, .. } | NetEvent::TimeAdvanced { time } => *time,
        }
    }
}
