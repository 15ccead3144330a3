//! Security-focused logging module to track authentication and authorization events

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::auth::user::Role;

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    // Login events
    LoginSucceeded { identity: String, role: Role },
    LoginFailed { identity: String },
    InactiveLogin { identity: String },

    // Request authentication events
    MissingCredentials,
    TokenRejected,
    UnauthorizedAccess { identity: String },

    // Authorization events
    PermissionDenied { identity: String, required: Role },
}

impl SecurityEvent {
    /// Key used for counters and alert thresholds
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::LoginSucceeded { .. } => "login_success",
            SecurityEvent::LoginFailed { .. } => "login_failed",
            SecurityEvent::InactiveLogin { .. } => "inactive_login",
            SecurityEvent::MissingCredentials => "missing_credentials",
            SecurityEvent::TokenRejected => "token_rejected",
            SecurityEvent::UnauthorizedAccess { .. } => "unauthorized_access",
            SecurityEvent::PermissionDenied { .. } => "permission_denied",
        }
    }
}

#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SecurityEvent,
    timestamp: Instant,
}

#[derive(Default)]
struct LoggerState {
    events: VecDeque<TimestampedEvent>,
    counts: HashMap<&'static str, usize>,
    // Counts since the last alert per key
    pending: HashMap<&'static str, usize>,
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    state: RwLock<LoggerState>,
    max_events: usize,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityLogger {
    /// Create a new security logger with the default thresholds
    pub fn new() -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("login_failed", 5);
        alert_thresholds.insert("token_rejected", 10);
        alert_thresholds.insert("unauthorized_access", 5);
        alert_thresholds.insert("permission_denied", 20);

        Self {
            state: RwLock::new(LoggerState::default()),
            max_events: 10_000,
            alert_thresholds,
        }
    }

    /// Bound the number of retained events
    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events.max(1);
        self
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let key = event.key();

        let alert = {
            let mut state = self.state.write().await;
            state.events.push_back(TimestampedEvent {
                event: event.clone(),
                timestamp: Instant::now(),
            });
            while state.events.len() > self.max_events {
                state.events.pop_front();
            }

            *state.counts.entry(key).or_insert(0) += 1;

            let pending = state.pending.entry(key).or_insert(0);
            *pending += 1;
            match self.alert_thresholds.get(key) {
                Some(&threshold) if *pending >= threshold => {
                    let count = *pending;
                    *pending = 0;
                    Some(count)
                }
                _ => None,
            }
        };

        match &event {
            SecurityEvent::LoginSucceeded { identity, role } => {
                log::info!("SECURITY: Login succeeded - User: {}, Role: {}", identity, role);
            }
            SecurityEvent::LoginFailed { identity } => {
                log::warn!("SECURITY: Login failed - User: {}", identity);
            }
            SecurityEvent::InactiveLogin { identity } => {
                log::warn!("SECURITY: Login attempt on inactive account - User: {}", identity);
            }
            SecurityEvent::MissingCredentials => {
                log::debug!("SECURITY: Request without Authorization header");
            }
            SecurityEvent::TokenRejected => {
                log::warn!("SECURITY: Token rejected");
            }
            SecurityEvent::UnauthorizedAccess { identity } => {
                log::warn!("SECURITY: Token for unknown or inactive account - User: {}", identity);
            }
            SecurityEvent::PermissionDenied { identity, required } => {
                log::warn!("SECURITY: Permission denied - User: {}, Required role: {}", identity, required);
            }
        }

        if let Some(count) = alert {
            log::error!("SECURITY ALERT: {} events of type '{}' detected", count, key);
            log::error!("Sample event: {:?}", event);
        }
    }

    /// Get recent security events
    pub async fn get_recent_events(&self, duration: Duration) -> Vec<SecurityEvent> {
        let state = self.state.read().await;
        state
            .events
            .iter()
            .filter(|e| e.timestamp.elapsed() <= duration)
            .map(|e| e.event.clone())
            .collect()
    }

    /// Get event statistics
    pub async fn get_event_stats(&self) -> HashMap<String, usize> {
        let state = self.state.read().await;
        state
            .counts
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_events_by_kind() {
        let logger = SecurityLogger::new();
        logger.log_event(SecurityEvent::TokenRejected).await;
        logger.log_event(SecurityEvent::TokenRejected).await;
        logger
            .log_event(SecurityEvent::LoginFailed { identity: "x".to_string() })
            .await;

        let stats = logger.get_event_stats().await;
        assert_eq!(stats.get("token_rejected"), Some(&2));
        assert_eq!(stats.get("login_failed"), Some(&1));
        assert_eq!(stats.get("permission_denied"), None);
    }

    #[tokio::test]
    async fn test_recent_events_are_bounded() {
        let logger = SecurityLogger::new().with_max_events(3);
        for _ in 0..5 {
            logger.log_event(SecurityEvent::MissingCredentials).await;
        }
        logger
            .log_event(SecurityEvent::InactiveLogin { identity: "e1".to_string() })
            .await;

        let recent = logger.get_recent_events(Duration::from_secs(60)).await;
        assert_eq!(recent.len(), 3);
        assert_eq!(
            recent.last(),
            Some(&SecurityEvent::InactiveLogin { identity: "e1".to_string() })
        );

        // Counters are not bounded by the buffer
        assert_eq!(logger.get_event_stats().await.get("missing_credentials"), Some(&5));
    }
}
