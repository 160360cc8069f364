//! Canonical permission keys and their default grants.

use access_db::AccessMap;

/// A single permission key definition.
#[derive(Debug, Clone, Copy)]
pub struct AccessKey {
    pub key: &'static str,
    pub default: bool,
    pub description: &'static str,
}

const fn def(key: &'static str, description: &'static str) -> AccessKey {
    AccessKey {
        key,
        default: false,
        description,
    }
}

pub const ACCESS_KEYS: &[AccessKey] = &[
    def("all_access", "Bypasses every other permission"),
    def("create_user", "Create users"),
    def("update_user", "Update users"),
    def("delete_user", "Delete users"),
    def("update_timed_limit", "Change timed limits"),
    def("update_perma_limit", "Change permanent limits"),
    def("create_db_char", "Create player characters"),
    def("update_db_char", "Update player characters"),
    def("delete_db_char", "Delete player characters"),
    def("update_access", "Change access grants"),
    def("update_note", "Update user notes"),
    def("update_black_list", "Update the black list"),
];

/// All permission keys in catalog order.
pub fn all_access_keys() -> Vec<&'static str> {
    ACCESS_KEYS.iter().map(|k| k.key).collect()
}

/// Default grant for every key.
pub fn base_access() -> AccessMap {
    ACCESS_KEYS
        .iter()
        .map(|k| (k.key.to_string(), k.default))
        .collect()
}
