// Project suitability review: analyzers that judge the resume's projects
// against the job, and the user's replacement / manual selections.

pub mod analysis;
pub mod handlers;
pub mod prompts;
pub mod reviewer;
