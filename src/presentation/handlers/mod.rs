mod chat;
mod diagnostics;
mod field_mapping;
mod health;

pub use chat::chat_handler;
pub use diagnostics::{
    debug_index_structure_handler, debug_search_config_handler, test_search_handler,
};
pub use field_mapping::field_mapping_handler;
pub use health::health_handler;
