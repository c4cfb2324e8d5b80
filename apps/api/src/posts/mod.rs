// Read API over the post store. No pagination or caching at this layer.

pub mod handlers;
