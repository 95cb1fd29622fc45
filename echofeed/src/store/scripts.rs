use redis::Script;
use std::sync::LazyLock;

pub const DOCUMENT_CREATE_SCRIPT_BODY: &str = include_str!("../../lua/document_create.lua");
pub const DOCUMENT_DELETE_SCRIPT_BODY: &str = include_str!("../../lua/document_delete.lua");
pub const DOCUMENT_PATCH_SCRIPT_BODY: &str = include_str!("../../lua/document_patch.lua");
pub const SET_TOGGLE_SCRIPT_BODY: &str = include_str!("../../lua/set_toggle.lua");
pub const VOTE_TOGGLE_SCRIPT_BODY: &str = include_str!("../../lua/vote_toggle.lua");
pub const FOLLOW_TOGGLE_SCRIPT_BODY: &str = include_str!("../../lua/follow_toggle.lua");
pub const USERNAME_RENAME_SCRIPT_BODY: &str = include_str!("../../lua/username_rename.lua");

pub static DOCUMENT_CREATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_CREATE_SCRIPT_BODY));
pub static DOCUMENT_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_DELETE_SCRIPT_BODY));
pub static DOCUMENT_PATCH_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_PATCH_SCRIPT_BODY));
pub static SET_TOGGLE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(SET_TOGGLE_SCRIPT_BODY));
pub static VOTE_TOGGLE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(VOTE_TOGGLE_SCRIPT_BODY));
pub static FOLLOW_TOGGLE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FOLLOW_TOGGLE_SCRIPT_BODY));
pub static USERNAME_RENAME_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(USERNAME_RENAME_SCRIPT_BODY));
