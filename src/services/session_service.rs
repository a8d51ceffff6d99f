use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

const DEFAULT_TTL_SECS: i64 = 3600;

/// Trip state carried between the intake and display stages, keyed by an
/// opaque token. Entries live in memory only and expire after the TTL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSession {
    pub token: String,
    pub origin: String,
    pub destinations: Vec<String>,
    pub destination_days: Vec<u32>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub travelers: u32,
    pub children: u32,
    pub rooms: u32,
    pub currency: String,
    #[serde(skip)]
    pub itinerary_json: String,
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
}

/// Everything the intake stage hands over for later display.
#[derive(Debug, Clone)]
pub struct NewTripSession {
    pub origin: String,
    pub destinations: Vec<String>,
    pub destination_days: Vec<u32>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub travelers: u32,
    pub children: u32,
    pub rooms: u32,
    pub currency: String,
    pub itinerary_json: String,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, TripSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn from_env() -> Self {
        let ttl_secs = env::var("TRIP_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        Self::new(Duration::seconds(ttl_secs))
    }

    /// Stores a new session and returns its token. Expired entries are swept
    /// on the way in.
    pub fn insert(&self, new: NewTripSession) -> String {
        let token = Uuid::new_v4().to_string();
        let session = TripSession {
            token: token.clone(),
            origin: new.origin,
            destinations: new.destinations,
            destination_days: new.destination_days,
            date_from: new.date_from,
            date_to: new.date_to,
            travelers: new.travelers,
            children: new.children,
            rooms: new.rooms,
            currency: new.currency,
            itinerary_json: new.itinerary_json,
            expires_at: Utc::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().unwrap();
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(token.clone(), session);
        token
    }

    /// Looks up a session; an expired entry is dropped and reported missing.
    pub fn get(&self, token: &str) -> Option<TripSession> {
        {
            let sessions = self.sessions.read().unwrap();
            if let Some(session) = sessions.get(token) {
                if session.expires_at > Utc::now() {
                    return Some(session.clone());
                }
            } else {
                return None;
            }
        }

        self.sessions.write().unwrap().remove(token);
        None
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn insert_sample(store: &SessionStore) -> String {
        store.insert(NewTripSession {
            origin: "New York".to_string(),
            destinations: vec!["Paris".to_string(), "Rome".to_string()],
            destination_days: vec![2, 3],
            date_from: date(2026, 9, 1),
            date_to: date(2026, 9, 5),
            travelers: 2,
            children: 1,
            rooms: 1,
            currency: "USD".to_string(),
            itinerary_json: "{\"itinerary\":[]}".to_string(),
        })
    }

    #[test]
    fn test_insert_then_get_round_trips() {
        let store = SessionStore::new(Duration::seconds(60));
        let token = insert_sample(&store);
        let session = store.get(&token).unwrap();
        assert_eq!(session.destinations, vec!["Paris", "Rome"]);
        assert_eq!(session.destination_days, vec![2, 3]);
        assert_eq!(session.travelers, 2);
    }

    #[test]
    fn test_unknown_token_is_missing() {
        let store = SessionStore::new(Duration::seconds(60));
        assert!(store.get("no-such-token").is_none());
    }

    #[test]
    fn test_expired_session_is_dropped_on_access() {
        let store = SessionStore::new(Duration::seconds(-1));
        let token = insert_sample(&store);
        assert!(store.get(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::seconds(60));
        let a = insert_sample(&store);
        let b = insert_sample(&store);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
