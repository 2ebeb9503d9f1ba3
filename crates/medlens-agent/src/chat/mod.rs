//! Chat mention watching.

pub mod retry;
pub mod seen;
pub mod stream;
pub mod watcher;

pub use retry::RetryPolicy;
pub use seen::SeenCache;
pub use stream::StreamChatSource;
pub use watcher::{extract_mention, ChatMentionWatcher, WatcherHandle, WatcherHealth};
