//! Template id namespaces.
//!
//! Ids minted locally carry a prefix so they can never be confused with ids
//! assigned by the remote store:
//!
//! - `sys-<name>` for records seeded from the required catalog
//! - `local-<uuid>` for user-authored records that were never pushed
//!
//! Anything else was handed out by the remote store.

use uuid::Uuid;

const SYSTEM_PREFIX: &str = "sys-";
const LOCAL_PREFIX: &str = "local-";

/// Id for a bootstrap record seeded from the required catalog.
pub fn system_id(name: &str) -> String {
    format!("{SYSTEM_PREFIX}{name}")
}

/// Fresh id for a user-authored local record.
pub fn new_local_id() -> String {
    format!("{LOCAL_PREFIX}{}", Uuid::now_v7())
}

/// True for bootstrap ids.
pub fn is_system_id(id: &str) -> bool {
    id.starts_with(SYSTEM_PREFIX)
}

/// True for user-authored ids that have not been pushed yet.
pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_PREFIX)
}

/// True when the id was assigned by the remote store, i.e. the template
/// actually exists there and can be edited in place.
pub fn is_deployed_id(id: &str) -> bool {
    !id.is_empty() && !is_system_id(id) && !is_local_id(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_ids() {
        let id = system_id("order_confirmation");
        assert_eq!(id, "sys-order_confirmation");
        assert!(is_system_id(&id));
        assert!(!is_deployed_id(&id));
    }

    #[test]
    fn test_local_ids_are_unique_and_undeployed() {
        let a = new_local_id();
        let b = new_local_id();
        assert_ne!(a, b);
        assert!(is_local_id(&a));
        assert!(!is_system_id(&a));
        assert!(!is_deployed_id(&a));
    }

    #[test]
    fn test_remote_ids_are_deployed() {
        assert!(is_deployed_id("1234567890"));
        assert!(!is_deployed_id(""));
    }
}
