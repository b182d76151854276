//! In-memory repository implementations
//!
//! A single store backs all three repository traits. It enforces the same
//! reaction uniqueness and conditional answered transition as PostgreSQL,
//! so services behave identically against it. Used by tests and by the
//! `memory` storage backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use ama_core::entities::{Message, NewRoom, Reaction, Room};
use ama_core::error::DomainError;
use ama_core::traits::{MessageRepository, ReactionRepository, RepoResult, RoomRepository};

#[derive(Debug, Default)]
struct State {
    last_room_id: i64,
    rooms: BTreeMap<i64, Room>,
    messages: HashMap<Uuid, Message>,
    /// Message ids in insertion order
    message_order: Vec<Uuid>,
    /// message id -> user id -> reaction
    reactions: HashMap<Uuid, HashMap<Uuid, Reaction>>,
}

impl State {
    fn reaction_count(&self, message_id: Uuid) -> i64 {
        self.reactions
            .get(&message_id)
            .map_or(0, |by_user| by_user.len() as i64)
    }

    fn with_count(&self, message: &Message) -> Message {
        Message {
            reaction_count: self.reaction_count(message.id),
            ..message.clone()
        }
    }
}

/// In-memory store implementing every repository trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn create(&self, room: NewRoom) -> RepoResult<Room> {
        let mut state = self.state.lock();
        state.last_room_id += 1;
        let room = room.into_room(state.last_room_id, Utc::now());
        state.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Room>> {
        Ok(self.state.lock().rooms.get(&id).cloned())
    }

    async fn exists(&self, id: i64) -> RepoResult<bool> {
        Ok(self.state.lock().rooms.contains_key(&id))
    }

    async fn list(&self) -> RepoResult<Vec<Room>> {
        // Ids are assigned in creation order
        Ok(self.state.lock().rooms.values().cloned().collect())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: &Message) -> RepoResult<Message> {
        let mut state = self.state.lock();
        if !state.rooms.contains_key(&message.room_id) {
            return Err(DomainError::RoomNotFound(message.room_id));
        }
        if state.messages.contains_key(&message.id) {
            return Err(DomainError::InternalError(format!(
                "Duplicate message id {}",
                message.id
            )));
        }

        let stored = Message {
            reaction_count: 0,
            ..message.clone()
        };
        state.messages.insert(stored.id, stored.clone());
        state.message_order.push(stored.id);
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        let state = self.state.lock();
        Ok(state.messages.get(&id).map(|m| state.with_count(m)))
    }

    async fn find_by_room(&self, room_id: i64) -> RepoResult<Vec<Message>> {
        let state = self.state.lock();
        Ok(state
            .message_order
            .iter()
            .rev()
            .filter_map(|id| state.messages.get(id))
            .filter(|m| m.belongs_to(room_id))
            .map(|m| state.with_count(m))
            .collect())
    }

    async fn mark_answered(&self, id: Uuid, answer: &str) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let message = state
            .messages
            .get_mut(&id)
            .ok_or(DomainError::MessageNotFound(id))?;
        Ok(message.mark_answered(answer))
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn add(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<i64> {
        let mut state = self.state.lock();
        if !state.messages.contains_key(&message_id) {
            return Err(DomainError::MessageNotFound(message_id));
        }

        let by_user = state.reactions.entry(message_id).or_default();
        if by_user.contains_key(&user_id) {
            return Err(DomainError::ReactionAlreadyExists);
        }
        by_user.insert(user_id, Reaction::new(message_id, user_id));
        Ok(by_user.len() as i64)
    }

    async fn remove(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<i64> {
        let mut state = self.state.lock();
        let by_user = state
            .reactions
            .get_mut(&message_id)
            .ok_or(DomainError::ReactionNotFound(message_id))?;
        if by_user.remove(&user_id).is_none() {
            return Err(DomainError::ReactionNotFound(message_id));
        }

        let count = by_user.len() as i64;
        if count == 0 {
            state.reactions.remove(&message_id);
        }
        Ok(count)
    }

    async fn count(&self, message_id: Uuid) -> RepoResult<i64> {
        Ok(self.state.lock().reaction_count(message_id))
    }

    async fn message_ids_for_user(&self, room_id: i64, user_id: Uuid) -> RepoResult<Vec<Uuid>> {
        let state = self.state.lock();
        let mut reacted: Vec<&Reaction> = state
            .reactions
            .iter()
            .filter(|(message_id, _)| {
                state
                    .messages
                    .get(*message_id)
                    .is_some_and(|m| m.belongs_to(room_id))
            })
            .filter_map(|(_, by_user)| by_user.get(&user_id))
            .collect();
        reacted.sort_by_key(|r| r.created_at);
        Ok(reacted.into_iter().map(|r| r.message_id).collect())
    }
}
