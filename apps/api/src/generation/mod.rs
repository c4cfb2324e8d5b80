// Blog post generation: prompt → model → draft parse → slug → image → store.
// All model calls go through llm_client; all persistence through sheets::PostStore.

pub mod draft;
pub mod generator;
pub mod handlers;
pub mod image;
pub mod prompts;
pub mod slug;
