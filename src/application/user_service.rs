use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::EntityStore;
use crate::domain::user::User;

use super::listing::paginate;

/// Read side of the user collection. Accounts are created by the auth
/// collaborator, never here.
pub struct UserService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: EntityStore + ?Sized> UserService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>, DomainError> {
        self.store.find_user(user_id)
    }

    pub fn list_users(&self, request: PageRequest) -> Result<Page<User>, DomainError> {
        paginate(
            request,
            &(),
            |_, window| self.store.list_users(window),
            |_| self.store.count_users(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::InMemoryStore;
    use chrono::{Duration, Utc};

    fn seed_users(store: &InMemoryStore, n: usize) {
        let base = Utc::now();
        for i in 0..n {
            let at = base + Duration::seconds(i as i64);
            store
                .insert_user(User {
                    user_id: format!("u{i:02}"),
                    first_name: "Ada".to_string(),
                    last_name: format!("Guest {i}"),
                    email: format!("guest{i}@example.com"),
                    phone: format!("555-01{i:02}"),
                    avatar: None,
                    created_at: at,
                    updated_at: at,
                })
                .unwrap();
        }
    }

    #[test]
    fn listing_follows_creation_order() {
        let store = Arc::new(InMemoryStore::new());
        seed_users(&store, 12);
        let service = UserService::new(store);

        let second = service
            .list_users(PageRequest::parse(Some("2"), None))
            .unwrap();
        assert_eq!(second.total_count, 12);
        let ids: Vec<_> = second.items.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u10", "u11"]);
        assert!(!second.has_next());
    }

    #[test]
    fn garbage_paging_falls_back_to_first_ten() {
        let store = Arc::new(InMemoryStore::new());
        seed_users(&store, 12);
        let page = UserService::new(store)
            .list_users(PageRequest::parse(Some("zero"), Some("-3")))
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 10);
    }

    #[test]
    fn get_user_by_id() {
        let store = Arc::new(InMemoryStore::new());
        seed_users(&store, 1);
        let service = UserService::new(store);
        assert_eq!(service.get_user("u00").unwrap().unwrap().email, "guest0@example.com");
        assert!(service.get_user("missing").unwrap().is_none());
    }
}
