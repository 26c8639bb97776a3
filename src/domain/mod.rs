pub mod entry;
pub mod feed;
pub mod notification;
pub mod seen;

pub use entry::Entry;
pub use feed::FeedSource;
pub use notification::Notification;
pub use seen::SeenSet;
