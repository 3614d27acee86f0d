use divvy_domain::ParticipantId;
use indexmap::IndexMap;

use crate::{error::LedgerError, model::Participant};

/// Owns every registered participant, keyed by id. Insertion order is
/// observable through the bulk listings and is load-bearing for settlement
/// tie-breaking, hence the `IndexMap`. Created once per session; there is no
/// process-wide singleton.
#[derive(Debug, Default)]
pub struct Registry {
    participants: IndexMap<ParticipantId, Participant>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, participant: Participant) {
        self.participants
            .insert(participant.id().clone(), participant);
    }

    pub fn remove(&mut self, id: &ParticipantId) -> Option<Participant> {
        self.participants.shift_remove(id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants.contains_key(id)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(id)
    }

    /// Lookup that every id-taking operation routes through before touching
    /// any state.
    pub fn require(&self, id: &ParticipantId) -> Result<&Participant, LedgerError> {
        self.participants
            .get(id)
            .ok_or_else(|| LedgerError::ParticipantNotFound(id.clone()))
    }

    pub fn require_mut(&mut self, id: &ParticipantId) -> Result<&mut Participant, LedgerError> {
        self.participants
            .get_mut(id)
            .ok_or_else(|| LedgerError::ParticipantNotFound(id.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
