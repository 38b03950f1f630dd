//! Person registry persisted under the dedicated `users` key.
//!
//! # Invariants
//! - `save_user` replaces by id or appends, then persists the whole list.
//! - Email uniqueness is not enforced here; reconciliation checks
//!   `find_by_email` before creating a person.

use crate::model::entity::{new_entity_id, BaseEntity};
use crate::model::resume::Person;
use crate::storage::kv::KeyValueStore;
use crate::store::collection::{load_records, save_records};
use crate::store::collection_names;
use crate::store::StoreResult;
use log::debug;

pub struct PersonRegistry<'s> {
    storage: &'s dyn KeyValueStore,
    users: Vec<Person>,
}

impl<'s> PersonRegistry<'s> {
    pub fn open(storage: &'s dyn KeyValueStore) -> Self {
        let mut registry = Self {
            storage,
            users: Vec::new(),
        };
        registry.load_items();
        registry
    }

    /// Reloads persons; unreadable data resets to empty and is logged.
    pub fn load_items(&mut self) {
        self.users = load_records(self.storage, collection_names::USERS);
    }

    pub fn users(&self) -> &[Person] {
        &self.users
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.users.iter().find(|user| user.base.id == id)
    }

    /// Exact-match lookup by email.
    pub fn find_by_email(&self, email: &str) -> Option<&Person> {
        self.users.iter().find(|user| user.email == email)
    }

    /// Inserts or replaces `person` by id and persists all persons.
    pub fn save_user(&mut self, person: Person) -> StoreResult<()> {
        match self
            .users
            .iter_mut()
            .find(|existing| existing.base.id == person.base.id)
        {
            Some(existing) => *existing = person,
            None => self.users.push(person),
        }
        self.save_to_storage()
    }

    /// Allocates and persists an empty person (`included = false`).
    pub fn create_user(&mut self) -> StoreResult<Person> {
        let person = Person::empty(BaseEntity::new(new_entity_id(), false));
        debug!(
            "event=person_create module=store status=ok person_id={}",
            person.base.id
        );
        self.save_user(person.clone())?;
        Ok(person)
    }

    pub fn save_to_storage(&self) -> StoreResult<()> {
        save_records(self.storage, collection_names::USERS, &self.users)
    }
}
