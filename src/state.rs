/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: AccessGate (起動時に構築、以降は読み取り専用)
 *   - sessions: SessionService (cookie の発行 / 検証)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::{access::AccessGate, auth::SessionService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<AccessGate>,
    pub sessions: Arc<SessionService>,
}

impl AppState {
    pub fn new(gate: Arc<AccessGate>, sessions: Arc<SessionService>) -> Self {
        Self { gate, sessions }
    }
}
