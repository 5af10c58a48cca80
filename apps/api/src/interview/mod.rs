// Interview generation: conversation in, stored interview out.
// Model calls go through the `TextGenerator` seam in llm_client, storage through `DocumentStore`.

pub mod covers;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod sanitize;
pub mod store;
