//! These models represent the objects passed around by the dispatch loop
//!
//! There are a few related formats in play:
//! - openai chat messages/tools, sent from the gateway to the LLM
//! - tool call requests, sent from the dispatch loop to the capabilities
//! - the structured recommendation shape the model returns to the user
//!
//! Wire formats are converted at the gateway boundary; everything inside the
//! loop uses the structs defined here.
pub mod content;
pub mod message;
pub mod recommendation;
pub mod role;
pub mod tool;
