pub mod feed;

pub use feed::{get_feed, metrics_endpoint, FeedHandlerState, USER_ID_HEADER};
