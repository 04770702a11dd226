// Resume generation: the LLM-backed rewrite of the whole resume and bullet
// generation for manually added projects.
// All LLM calls go through llm_client, no direct Anthropic SDK calls here.

pub mod bullets;
pub mod prompts;
pub mod rewriter;
